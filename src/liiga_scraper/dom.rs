//! Text access on parsed markup, in the shape the page parsers need: the
//! text leading an element, the text trailing it, and its collapsed content.

use scraper::ElementRef;

/// Text nodes directly inside `element`, before its first child element.
pub(crate) fn lead_text(element: &ElementRef) -> String {
    element
        .children()
        .map_while(|node| node.value().as_text().map(|t| &**t))
        .collect()
}

/// Text nodes directly after `element`, up to its next sibling element.
pub(crate) fn tail_text(element: &ElementRef) -> String {
    element
        .next_siblings()
        .map_while(|node| node.value().as_text().map(|t| &**t))
        .collect()
}

/// All descendant text with runs of whitespace collapsed to one space.
pub(crate) fn full_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The content between the first `(` and the following `)`, if any.
pub(crate) fn parenthesized(text: &str) -> Option<&str> {
    let start = text.find('(')? + 1;
    let end = start + text[start..].find(')')?;
    Some(text[start..end].trim())
}
