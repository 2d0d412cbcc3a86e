//! Markdown to sanitized HTML.

use std::collections::HashSet;

use ammonia::Builder;
use pulldown_cmark::{html, Options, Parser};

use mitra_core::{MarkdownRenderer, SafeHtml};

/// Renders summary markdown with `pulldown-cmark` and cleans it with
/// `ammonia`.
///
/// Scripts, styles, iframes and event-handler attributes never survive;
/// `javascript:` links are dropped and remaining links get
/// `rel="noopener noreferrer"`.
pub struct SanitizingRenderer {
    cleaner: Builder<'static>,
    options: Options,
}

impl SanitizingRenderer {
    pub fn new() -> Self {
        let mut cleaner = Builder::default();
        cleaner
            .url_schemes(HashSet::from(["http", "https", "mailto"]))
            .link_rel(Some("noopener noreferrer"));

        Self {
            cleaner,
            options: Options::ENABLE_STRIKETHROUGH,
        }
    }

    /// Markdown to unsanitized HTML.
    fn to_html(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

impl Default for SanitizingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for SanitizingRenderer {
    fn render(&self, markdown: &str) -> SafeHtml {
        let raw = self.to_html(markdown);
        SafeHtml::from_sanitized(self.cleaner.clean(&raw).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> String {
        SanitizingRenderer::new().render(markdown).into_string()
    }

    #[test]
    fn test_basic_markdown_rendered() {
        let out = render("**Heat** is a *crime* epic.");
        assert!(out.contains("<strong>Heat</strong>"));
        assert!(out.contains("<em>crime</em>"));
        assert!(out.starts_with("<p>"));
    }

    #[test]
    fn test_script_tags_removed() {
        let out = render("Great film <script>alert('x')</script> indeed.");
        assert!(!out.contains("<script"));
        assert!(!out.contains("alert("));
        assert!(out.contains("Great film"));
    }

    #[test]
    fn test_event_handlers_stripped() {
        let out = render(
            r#"<img src="x.png" onerror="alert(1)"> <a href="https://example.com" onclick="steal()">site</a>"#,
        );
        assert!(!out.contains("onerror"));
        assert!(!out.contains("onclick"));
        assert!(out.contains("noopener noreferrer"));
    }

    #[test]
    fn test_javascript_urls_dropped() {
        let out = render("[click me](javascript:alert(1))");
        assert!(!out.contains("javascript:"));
        assert!(out.contains("click me"));
    }

    #[test]
    fn test_iframe_and_style_removed() {
        let out = render("<iframe src=\"https://evil\"></iframe><style>body{}</style>ok");
        assert!(!out.contains("<iframe"));
        assert!(!out.contains("<style"));
        assert!(out.contains("ok"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
    }
}
