//! The announcement preview pipeline: fetch, extract, clip, assemble, mount.
//!
//! Each stage is a standalone function so the pipeline after the network
//! boundary stays exercisable without a server. The runtime wires them
//! together and contains every failure.

use crate::markup::{self, MarkupError};
use crate::snippet;
use lol_html::html_content::ContentType;
use lol_html::{element, HtmlRewriter, Settings};
use reqwest::Client;
use scraper::Html;
use std::cell::Cell;
use std::error::Error;
use std::fmt;
use url::Url;

/// Class shared by the preview container and its clipped text node.
///
/// Both carrying one name is an identifier collision the site's styling
/// depends on, so it is reproduced as-is.
pub const PREVIEW_CLASS: &str = "antext";

/// Selectors locating the three announcement fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSet {
    /// Selector for the announcement title.
    pub title: String,
    /// Selector for the announcement date.
    pub date: String,
    /// Selector for the full announcement text.
    pub text: String,
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self {
            title: ".antitle".to_string(),
            date: ".andate".to_string(),
            text: ".antext".to_string(),
        }
    }
}

/// The three fragments pulled out of the announcement page.
///
/// Markup ownership moves out of the parsed page here: title and date are
/// reused verbatim, while the text node is rebuilt around its clipped
/// content during assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTriple {
    /// Title element, serialized as-is.
    pub title_html: String,
    /// Date element, serialized as-is.
    pub date_html: String,
    /// Tag name of the text element, reused when it is rebuilt.
    pub text_tag: String,
    /// Full text content of the text element.
    pub text: String,
}

/// Errors surfaced by the preview pipeline.
#[derive(Debug)]
pub enum PreviewError {
    /// Transport-level fetch failure.
    Http(reqwest::Error),
    /// The announcement page answered with a non-success status.
    Status {
        /// Requested URL.
        url: String,
        /// Status code received.
        status: u16,
    },
    /// A marker selector was invalid or matched nothing.
    Markup(MarkupError),
    /// The mount point is absent from the host page.
    MountMissing {
        /// Mount selector that matched nothing.
        selector: String,
    },
    /// Rewriting the host markup failed.
    Rewrite(lol_html::errors::RewritingError),
    /// The rewriter produced bytes that were not valid UTF-8.
    Encoding(std::string::FromUtf8Error),
}

impl fmt::Display for PreviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(err) => write!(f, "announcement fetch failed: {err}"),
            Self::Status { url, status } => {
                write!(f, "announcement fetch for {url} returned status {status}")
            }
            Self::Markup(err) => write!(f, "announcement markup: {err}"),
            Self::MountMissing { selector } => {
                write!(f, "mount point '{selector}' not found in host page")
            }
            Self::Rewrite(err) => write!(f, "host rewrite error: {err}"),
            Self::Encoding(err) => write!(f, "host rewrite produced invalid utf-8: {err}"),
        }
    }
}

impl Error for PreviewError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Markup(err) => Some(err),
            Self::Rewrite(err) => Some(err),
            Self::Encoding(err) => Some(err),
            Self::Status { .. } | Self::MountMissing { .. } => None,
        }
    }
}

impl From<MarkupError> for PreviewError {
    fn from(err: MarkupError) -> Self {
        Self::Markup(err)
    }
}

/// Fetches the announcement page body as text.
///
/// The single suspension point of the pipeline. Non-success statuses are
/// rejected here so later stages never see an error page's markup.
pub async fn fetch_announcement(client: &Client, url: &Url) -> Result<String, PreviewError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(PreviewError::Http)?;
    let status = response.status();
    if !status.is_success() {
        return Err(PreviewError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.text().await.map_err(PreviewError::Http)
}

/// Locates the title, date, and text fragments in the announcement markup.
///
/// Any absent marker aborts with a typed error; a partial triple is never
/// produced.
pub fn extract_triple(html: &str, markers: &MarkerSet) -> Result<ExtractedTriple, PreviewError> {
    let document = Html::parse_document(html);
    let title = markup::require_first(&document, &markers.title)?;
    let date = markup::require_first(&document, &markers.date)?;
    let text = markup::require_first(&document, &markers.text)?;
    Ok(ExtractedTriple {
        title_html: title.html(),
        date_html: date.html(),
        text_tag: text.value().name().to_string(),
        text: text.text().collect(),
    })
}

/// Builds the preview container around the clipped triple.
///
/// Order is fixed: title, date, text. The text node keeps its original tag
/// and the [`PREVIEW_CLASS`] marker.
pub fn assemble_preview(triple: &ExtractedTriple, budget: usize) -> String {
    let clipped = snippet::clip_to_budget(&triple.text, budget);
    let mut preview = String::with_capacity(
        triple.title_html.len() + triple.date_html.len() + clipped.len() + 64,
    );
    preview.push_str(&format!("<div class=\"{PREVIEW_CLASS}\">"));
    preview.push_str(&triple.title_html);
    preview.push_str(&triple.date_html);
    preview.push_str(&format!(
        "<{tag} class=\"{PREVIEW_CLASS}\">{text}</{tag}>",
        tag = triple.text_tag,
        text = html_escape::encode_text(&clipped),
    ));
    preview.push_str("</div>");
    preview
}

/// Appends `preview_html` as the last child of the mount point in `host`.
///
/// Everything outside the mount element passes through byte-for-byte. The
/// preview is appended at most once even if the selector matches several
/// elements.
pub fn mount_preview(
    host: &str,
    mount_selector: &str,
    preview_html: &str,
) -> Result<String, PreviewError> {
    // The element! macro panics on an unparsable selector; validate first.
    mount_selector
        .parse::<lol_html::Selector>()
        .map_err(|err| {
            PreviewError::Markup(MarkupError::Selector {
                selector: mount_selector.to_string(),
                message: err.to_string(),
            })
        })?;

    let mounted = Cell::new(false);
    let mut output = Vec::with_capacity(host.len() + preview_html.len());
    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![element!(mount_selector, |el| {
                if !mounted.get() {
                    el.append(preview_html, ContentType::Html);
                    mounted.set(true);
                }
                Ok(())
            })],
            ..Settings::default()
        },
        |chunk: &[u8]| output.extend_from_slice(chunk),
    );
    rewriter
        .write(host.as_bytes())
        .map_err(PreviewError::Rewrite)?;
    rewriter.end().map_err(PreviewError::Rewrite)?;

    if !mounted.get() {
        return Err(PreviewError::MountMissing {
            selector: mount_selector.to_string(),
        });
    }
    String::from_utf8(output).map_err(PreviewError::Encoding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ANNOUNCEMENT: &str = "<html><body>\
        <h2 class=\"antitle\">Open house</h2>\
        <p class=\"andate\">2024-06-14</p>\
        <p class=\"antext\">Doors open at noon. Everyone is welcome.</p>\
        </body></html>";

    #[test]
    fn extracts_the_marked_triple() {
        let triple = extract_triple(ANNOUNCEMENT, &MarkerSet::default()).expect("extract");
        assert_eq!(triple.title_html, "<h2 class=\"antitle\">Open house</h2>");
        assert_eq!(triple.date_html, "<p class=\"andate\">2024-06-14</p>");
        assert_eq!(triple.text_tag, "p");
        assert_eq!(triple.text, "Doors open at noon. Everyone is welcome.");
    }

    #[test]
    fn missing_title_marker_aborts_the_extraction() {
        let html = "<p class=\"andate\">d</p><p class=\"antext\">t</p>";
        let err = extract_triple(html, &MarkerSet::default()).unwrap_err();
        match err {
            PreviewError::Markup(MarkupError::MissingElement { selector }) => {
                assert_eq!(selector, ".antitle");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn assembly_keeps_the_fixed_order_and_shared_class() {
        let triple = extract_triple(ANNOUNCEMENT, &MarkerSet::default()).expect("extract");
        let preview = assemble_preview(&triple, 10);
        assert_eq!(
            preview,
            "<div class=\"antext\">\
             <h2 class=\"antitle\">Open house</h2>\
             <p class=\"andate\">2024-06-14</p>\
             <p class=\"antext\">Doors open...</p>\
             </div>"
        );
    }

    #[test]
    fn assembly_escapes_the_clipped_text() {
        let triple = ExtractedTriple {
            title_html: "<h2 class=\"antitle\">t</h2>".to_string(),
            date_html: "<p class=\"andate\">d</p>".to_string(),
            text_tag: "p".to_string(),
            text: "a < b & c".to_string(),
        };
        let preview = assemble_preview(&triple, 80);
        assert!(preview.contains("a &lt; b &amp; c..."));
    }

    #[test]
    fn mount_appends_as_the_last_child() {
        let host = "<body><div id=\"slot\"><p>existing</p></div><footer></footer></body>";
        let mounted = mount_preview(host, "#slot", "<span>preview</span>").expect("mount");
        assert_eq!(
            mounted,
            "<body><div id=\"slot\"><p>existing</p><span>preview</span></div>\
             <footer></footer></body>"
        );
    }

    #[test]
    fn mount_happens_at_most_once() {
        let host = "<div class=\"slot\"></div><div class=\"slot\"></div>";
        let mounted = mount_preview(host, ".slot", "<i>x</i>").expect("mount");
        assert_eq!(mounted.matches("<i>x</i>").count(), 1);
    }

    #[test]
    fn missing_mount_point_is_reported() {
        let err = mount_preview("<main></main>", "#slot", "<i>x</i>").unwrap_err();
        assert!(matches!(err, PreviewError::MountMissing { .. }));
    }
}
