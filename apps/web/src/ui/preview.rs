//! Preview pane. Shows the latest generation result.
//!
//! Portfolio HTML is rendered through `<iframe srcdoc>` with
//! `sandbox="allow-scripts"` and without `allow-same-origin`: the document
//! runs in an opaque origin and cannot reach the host page's DOM, scripts or
//! cookies. Error messages are plain text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::models::portfolio::GenerationResult;
use crate::ui::html::escape;

pub const DOWNLOAD_FILE_NAME: &str = "portfolio.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewPane<'a> {
    Empty,
    Error(&'a str),
    Rendered(&'a str),
}

impl<'a> PreviewPane<'a> {
    pub fn for_result(result: Option<&'a GenerationResult>) -> Self {
        match result {
            None => PreviewPane::Empty,
            Some(GenerationResult::Failure { error }) => PreviewPane::Error(error),
            Some(GenerationResult::Portfolio { html }) => PreviewPane::Rendered(html),
        }
    }

    pub fn render(&self) -> String {
        match self {
            PreviewPane::Empty => String::new(),
            PreviewPane::Error(message) => format!(
                "<div class=\"portfolio-preview\">\n<h2>Portfolio Preview</h2>\n<div class=\"error-message\"><p>{}</p></div>\n</div>\n",
                escape(message)
            ),
            PreviewPane::Rendered(html) => format!(
                "<div class=\"portfolio-preview\">\n<div class=\"preview-header\">\n<h2>Portfolio Preview</h2>\n<a href=\"{}\" download=\"{}\" class=\"download-btn\">&#11015; Download HTML</a>\n</div>\n<div class=\"preview-container\">\n<iframe title=\"Portfolio Preview\" sandbox=\"allow-scripts\" srcdoc=\"{}\" class=\"preview-iframe\"></iframe>\n</div>\n</div>\n",
                download_href(html),
                DOWNLOAD_FILE_NAME,
                escape(html)
            ),
        }
    }
}

/// `data:` URL carrying the exact portfolio bytes.
pub fn download_href(html: &str) -> String {
    format!("data:text/html;charset=utf-8;base64,{}", STANDARD.encode(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute<'h>(html: &'h str, name: &str) -> &'h str {
        let marker = format!("{name}=\"");
        let start = html.find(&marker).unwrap() + marker.len();
        let end = start + html[start..].find('"').unwrap();
        &html[start..end]
    }

    #[test]
    fn test_empty_pane_renders_nothing() {
        assert_eq!(PreviewPane::for_result(None), PreviewPane::Empty);
        assert!(PreviewPane::Empty.render().is_empty());
    }

    #[test]
    fn test_error_is_plain_text_without_iframe() {
        let result = GenerationResult::Failure {
            error: "bad format".to_string(),
        };
        let html = PreviewPane::for_result(Some(&result)).render();
        assert!(html.contains("<p>bad format</p>"));
        assert!(!html.contains("<iframe"));
        assert!(!html.contains("download="));
    }

    #[test]
    fn test_error_markup_is_not_interpreted() {
        let result = GenerationResult::Failure {
            error: "<b>boom</b>".to_string(),
        };
        let html = PreviewPane::for_result(Some(&result)).render();
        assert!(html.contains("&lt;b&gt;boom&lt;/b&gt;"));
        assert!(!html.contains("<b>boom</b>"));
    }

    #[test]
    fn test_portfolio_is_rendered_in_sandboxed_iframe() {
        let result = GenerationResult::Portfolio {
            html: "<h1>X</h1>".to_string(),
        };
        let html = PreviewPane::for_result(Some(&result)).render();
        assert_eq!(attribute(&html, "srcdoc"), "&lt;h1&gt;X&lt;/h1&gt;");
        assert_eq!(attribute(&html, "sandbox"), "allow-scripts");
        assert!(!html.contains("allow-same-origin"));
    }

    #[test]
    fn test_download_packages_identical_html() {
        let portfolio = "<!DOCTYPE html><html><body><h1>Jane Doe, Engineer</h1><script>alert(\"hi\")</script></body></html>";
        let result = GenerationResult::Portfolio {
            html: portfolio.to_string(),
        };
        let html = PreviewPane::for_result(Some(&result)).render();

        assert_eq!(attribute(&html, "download"), DOWNLOAD_FILE_NAME);
        let href = attribute(&html, "href");
        let encoded = href
            .strip_prefix("data:text/html;charset=utf-8;base64,")
            .unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), portfolio);
    }
}
