//! Heuristic, non-AST extraction of Python definitions.
//!
//! The scanner works on indentation and header keywords only. It recovers
//! top-level functions and classes, the methods declared at the first
//! indentation level of each class, and superclass names from class
//! headers. Anything it cannot make sense of is skipped.

use crate::core::deduplicate_ordered;
use once_cell::sync::Lazy;
use regex::Regex;

/// Indentation that marks a class member.
const MEMBER_INDENT: &str = "    ";

static DOCSTRING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)""".*?"""|'''.*?'''"#).unwrap());
static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#.*$").unwrap());

static FUNCTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:async\s+)?def\s+([A-Za-z_]\w*)\s*\(").unwrap());
static CLASS_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^class\s+([A-Za-z_]\w*)\s*[:(]").unwrap());
static SUPERCLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z_][A-Za-z_0-9]*)\s*[,\[\)]").unwrap());
static BODY_START: Lazy<Regex> = Lazy::new(|| Regex::new(r": *\n|: *\.\.\. *\n?").unwrap());
static TRAILING_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)[ \t]*#[^'"\n]*$"#).unwrap());

/// A top-level function found in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFunction {
    pub ordinal: usize,
    pub name: String,
}

/// A method's decorators and signature, with the body removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: String,
    pub text: String,
}

/// A top-level class found in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedClass {
    pub ordinal: usize,
    pub name: String,
    /// Declared method names, deduplicated, in declaration order
    pub methods: Vec<String>,
    /// Signature text per method name (first declaration wins)
    pub signatures: Vec<MethodSignature>,
    pub superclasses: Vec<String>,
}

/// Everything recovered from one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PythonExtraction {
    pub functions: Vec<ExtractedFunction>,
    pub classes: Vec<ExtractedClass>,
}

impl PythonExtraction {
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty()
    }
}

/// Collapse docstrings, fenced samples and column-0 comments so their
/// contents cannot be mistaken for definitions.
pub fn neutralize(source: &str) -> String {
    let source = DOCSTRING.replace_all(source, r#"""" """"#);
    let source = CODE_FENCE.replace_all(&source, "``` ```");
    LINE_COMMENT.replace_all(&source, "").into_owned()
}

/// Recover functions and classes from one file's text.
pub fn extract_python(source: &str) -> PythonExtraction {
    let source = neutralize(source);
    let lines: Vec<&str> = source.lines().collect();
    let mut extraction = PythonExtraction::default();
    let mut ordinal = 0;

    for block in definition_blocks(&split_blocks(&lines)) {
        let head = block.head();
        if let Some(name) = capture_name(&FUNCTION_HEADER, head) {
            extraction.functions.push(ExtractedFunction { ordinal, name });
            ordinal += 1;
        } else if let Some(name) = capture_name(&CLASS_HEADER, head) {
            extraction.classes.push(parse_class(ordinal, name, &block));
            ordinal += 1;
        }
    }

    extraction
}

/// Lines of one definition: decorators followed by the header and body.
struct Block<'a> {
    lines: Vec<&'a str>,
    /// Index of the first non-decorator line
    header: usize,
}

impl<'a> Block<'a> {
    fn head(&self) -> &'a str {
        self.lines.get(self.header).copied().unwrap_or_default()
    }
}

/// Split `lines` into groups that each start at an unindented line. Lines
/// before the first group are dropped; bracket-closing lines continue the
/// current group.
fn split_blocks<'a>(lines: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut blocks: Vec<Vec<&'a str>> = Vec::new();

    for &line in lines {
        let starts_block = line.starts_with(|c: char| !c.is_whitespace() && !")]}".contains(c));

        if starts_block {
            blocks.push(vec![line]);
        } else if let Some(current) = blocks.last_mut() {
            current.push(line);
        }
    }

    blocks
}

/// Attach runs of decorator groups to the group that follows them.
fn definition_blocks<'a>(groups: &[Vec<&'a str>]) -> Vec<Block<'a>> {
    let mut blocks = Vec::new();
    let mut pending: Vec<&'a str> = Vec::new();

    for group in groups {
        let head = group.first().map(|l| l.trim_start()).unwrap_or_default();
        if head.starts_with('@') {
            pending.extend(group.iter().copied());
            continue;
        }
        // a comment between decorators and their def belongs to neither
        if head.starts_with('#') && !pending.is_empty() {
            continue;
        }
        let header = pending.len();
        let mut lines = std::mem::take(&mut pending);
        lines.extend(group.iter().copied());
        blocks.push(Block { lines, header });
    }

    blocks
}

fn capture_name(pattern: &Regex, line: &str) -> Option<String> {
    pattern
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|name| !name.is_empty())
}

fn parse_class(ordinal: usize, name: String, block: &Block<'_>) -> ExtractedClass {
    let body = &block.lines[block.header..];
    let header_len = body
        .iter()
        .position(|line| ends_header(line))
        .map_or(1, |i| i + 1);
    let header = body[..header_len].join("\n");
    let superclasses = superclass_names(&header);

    let mut signatures: Vec<MethodSignature> = Vec::new();
    let members: Vec<&str> = body[header_len..]
        .iter()
        .map(|&line| line.strip_prefix(MEMBER_INDENT).unwrap_or(line))
        .collect();

    for member in definition_blocks(&split_blocks(&members)) {
        let Some(method) = capture_name(&FUNCTION_HEADER, member.head()) else {
            continue;
        };
        if signatures.iter().any(|s| s.name == method) {
            continue;
        }
        signatures.push(MethodSignature {
            name: method,
            text: remove_body(&member.lines),
        });
    }

    let methods = deduplicate_ordered(signatures.iter().map(|s| s.name.clone()));

    ExtractedClass {
        ordinal,
        name,
        methods,
        signatures,
        superclasses,
    }
}

fn ends_header(line: &str) -> bool {
    let code = line.split('#').next().unwrap_or(line);
    code.trim_end().ends_with(':')
}

/// Capitalised names in the header's parenthesised base list.
fn superclass_names(header: &str) -> Vec<String> {
    let Some(open) = header.find('(') else {
        return Vec::new();
    };
    deduplicate_ordered(
        SUPERCLASS
            .captures_iter(&header[open..])
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str()),
    )
}

/// Keep decorators and the signature, dropping everything from the first
/// body-starting `:` on.
fn remove_body(lines: &[&str]) -> String {
    let mut text = TRAILING_COMMENT
        .replace_all(&lines.join("\n"), "")
        .into_owned();
    text.push('\n');
    match BODY_START.find(&text) {
        Some(m) => text[..m.start()].to_string(),
        None => text.trim_end().to_string(),
    }
}
