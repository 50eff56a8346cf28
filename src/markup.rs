//! Marker lookups shared by the preview pipeline and the scroll controller.
//!
//! Lookups return an explicit result so each caller decides whether an
//! absent element is fatal (scroll target) or recoverable (preview marker).

use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use std::fmt;

/// Errors surfaced while locating marked elements in parsed markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// The selector text itself failed to parse.
    Selector {
        /// Offending selector text.
        selector: String,
        /// Parser diagnostic.
        message: String,
    },
    /// No element in the document matched the selector.
    MissingElement {
        /// Selector that matched nothing.
        selector: String,
    },
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selector { selector, message } => {
                write!(f, "selector '{selector}' failed to parse: {message}")
            }
            Self::MissingElement { selector } => write!(f, "no element matched '{selector}'"),
        }
    }
}

impl Error for MarkupError {}

/// Parses a CSS selector, mapping failures into [`MarkupError`].
pub fn parse_selector(selector: &str) -> Result<Selector, MarkupError> {
    Selector::parse(selector).map_err(|err| MarkupError::Selector {
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

/// Returns the first element matching `selector`, or a typed absence.
pub fn require_first<'a>(
    document: &'a Html,
    selector: &str,
) -> Result<ElementRef<'a>, MarkupError> {
    let parsed = parse_selector(selector)?;
    document
        .select(&parsed)
        .next()
        .ok_or_else(|| MarkupError::MissingElement {
            selector: selector.to_string(),
        })
}
