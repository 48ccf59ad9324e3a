//! Documented objects in Markdown API pages.
//!
//! Pages follow the mkdocstrings convention: every documented object gets a
//! heading such as `## ::: package.module.Object`. Code samples are removed
//! before scanning so example headings inside them are not counted.

use super::python::ExtractedFunction;
use once_cell::sync::Lazy;
use regex::Regex;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static OBJECT_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^##+ ::: [a-z_][a-z_0-9.]*\.([A-Za-z_0-9]+)[ \t]*\r?$").unwrap()
});

/// One entry per object heading; the ordinal is the heading's position in
/// the page.
pub fn extract_documented_objects(markdown: &str) -> Vec<ExtractedFunction> {
    let markdown = CODE_FENCE.replace_all(markdown, "");
    OBJECT_HEADING
        .captures_iter(&markdown)
        .filter_map(|c| c.get(1))
        .enumerate()
        .map(|(ordinal, name)| ExtractedFunction {
            ordinal,
            name: name.as_str().to_string(),
        })
        .collect()
}
