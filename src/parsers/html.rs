//! Static HTML querying backing [`SnapshotSurface`](crate::surface::SnapshotSurface).
//!
//! Live pages are queried through WebDriver instead; this module only
//! serves saved documents.

use scraper::{Html, Selector};
use std::collections::HashMap;

/// Text and attributes of one element selected from a static document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSnapshot {
    /// Whitespace-normalized text content
    pub text: String,
    /// Element attributes by name
    pub attrs: HashMap<String, String>,
}

/// Selects every element matching `css` in document order.
///
/// Returns an error message if the selector itself does not parse.
pub fn select(html: &str, css: &str) -> Result<Vec<NodeSnapshot>, String> {
    let selector = Selector::parse(css).map_err(|e| format!("invalid selector {css}: {e}"))?;
    let doc = Html::parse_document(html);

    let nodes = doc
        .select(&selector)
        .map(|element| NodeSnapshot {
            text: collapse_whitespace(&element.text().collect::<Vec<_>>().join(" ")),
            attrs: element
                .value()
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        })
        .collect::<Vec<_>>();

    ::log::trace!("Selector {} matched {} elements", css, nodes.len());
    Ok(nodes)
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
