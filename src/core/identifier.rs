//! Canonical identifiers: `path:ordinal:qualifiedName`.
//!
//! Every extracted definition is rendered to this wire format before it is
//! mapped or compared. The ordinal keeps definitions in file order for
//! display; equality between expected and actual identifiers is computed on
//! the ordinal-stripped form `path:qualifiedName`.

use super::errors::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Width of the zero-padded ordinal segment.
pub const ORDINAL_WIDTH: usize = 3;

static ORDINAL_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r":\d+:").unwrap());
static DUNDER_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^__.+?__$").unwrap());

/// Render a path with `/` separators regardless of platform.
pub fn path_to_wire(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Build the canonical identifier for one definition.
pub fn format_identifier(path: &Path, ordinal: usize, name: &str) -> String {
    format!(
        "{}:{:0>width$}:{}",
        path_to_wire(path),
        ordinal,
        name,
        width = ORDINAL_WIDTH
    )
}

/// Remove the ordinal segment: `a/b.py:003:f` becomes `a/b.py:f`.
pub fn strip_ordinal(identifier: &str) -> String {
    ORDINAL_SEGMENT.replace_all(identifier, ":").into_owned()
}

/// Whether a bare name has the `__x__` shape.
pub fn is_dunder(name: &str) -> bool {
    DUNDER_NAME.is_match(name)
}

/// Stable sort on path, then numeric ordinal; entries sharing both keep
/// their relative order.
pub fn sort_on_path(mut identifiers: Vec<String>) -> Vec<String> {
    identifiers.sort_by(|a, b| path_key(a).cmp(&path_key(b)));
    identifiers
}

fn path_key(identifier: &str) -> (&str, Option<u64>) {
    let prefix = identifier
        .rsplit_once(':')
        .map_or(identifier, |(prefix, _)| prefix);
    match prefix.rsplit_once(':') {
        Some((path, ordinal)) => match ordinal.parse() {
            Ok(ordinal) => (path, Some(ordinal)),
            Err(_) => (prefix, None),
        },
        None => (prefix, None),
    }
}

/// The name part of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualifiedName<'a> {
    /// `Class.method`
    Method { class: &'a str, method: &'a str },
    /// A function, or a class identifier without a method
    Bare(&'a str),
}

impl<'a> QualifiedName<'a> {
    pub fn parse(name: &'a str) -> Self {
        match name.split_once('.') {
            Some((class, method)) => Self::Method { class, method },
            None => Self::Bare(name),
        }
    }

    /// The class this name belongs to, if it looks like a class member or
    /// a class itself (capitalised bare name).
    pub fn class_name(&self) -> Option<&'a str> {
        match *self {
            Self::Method { class, .. } => Some(class),
            Self::Bare(name) if starts_uppercase(name) => Some(name),
            Self::Bare(_) => None,
        }
    }
}

fn starts_uppercase(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Borrowed view over the three segments of a canonical identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedIdentifier<'a> {
    pub path: &'a str,
    pub ordinal: &'a str,
    pub name: &'a str,
}

impl<'a> ParsedIdentifier<'a> {
    /// Split an identifier; anything other than exactly two `:` is a
    /// contract violation between components.
    pub fn parse(identifier: &'a str) -> Result<Self> {
        let mut parts = identifier.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(path), Some(ordinal), Some(name), None) => Ok(Self {
                path,
                ordinal,
                name,
            }),
            _ => Err(Error::MalformedIdentifier(identifier.to_string())),
        }
    }

    pub fn qualified_name(&self) -> QualifiedName<'a> {
        QualifiedName::parse(self.name)
    }
}
