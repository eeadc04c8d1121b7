//! Markdown-like generator output to inline-styled HTML.
//!
//! [`MarkdownToHtmlFormatter`] makes one forward pass over the trimmed input
//! lines and tracks a single piece of state: which block (paragraph or
//! unordered list) is currently open. Recognised lines:
//!
//! | Line                                   | Output                          |
//! |----------------------------------------|---------------------------------|
//! | `# Title` (no `##` anywhere)           | `<h1>`                          |
//! | `## Section`                           | `<h2>`                          |
//! | `- item`                               | `<li>` inside a `<ul>`          |
//! | plain text                             | `<p>`, consecutive lines joined |
//! | `*...generated using AI...*`           | footer `<div>`                  |
//! | blank                                  | closes an open list             |
//!
//! Anything else (`### deeper`, `**bold lead-in**`, ...) is dropped and
//! counted in [`FormattedArticle::dropped_lines`]. The formatter never fails.
//! Text is inserted as-is, without HTML escaping.

use serde::{Deserialize, Serialize};

/// Marker that identifies the attribution footer line.
pub const ATTRIBUTION_MARKER: &str = "generated using AI";

/// Inline `style` attribute values for each emitted element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlStyles {
    pub title: String,
    pub section: String,
    pub list: String,
    pub list_item: String,
    pub paragraph: String,
    pub attribution: String,
}

impl Default for HtmlStyles {
    fn default() -> Self {
        Self {
            title: "font-size: 2.5rem; font-weight: 800; color: #212121; margin: 2rem 0 1.5rem 0; line-height: 1.2;".into(),
            section: "font-size: 1.8rem; font-weight: 700; color: #212121; margin: 3rem 0 1.5rem 0; padding-bottom: 0.5rem; border-bottom: 3px solid #1976D2;".into(),
            list: "margin: 1.5rem 0; padding-left: 2rem;".into(),
            list_item: "font-size: 1.1rem; line-height: 1.8; color: #212121; margin-bottom: 0.5rem;".into(),
            paragraph: "font-size: 1.1rem; line-height: 1.8; color: #212121; margin-bottom: 1.5rem;".into(),
            attribution: "margin-top: 3rem; padding-top: 2rem; border-top: 1px solid #E0E0E0; font-size: 0.9rem; color: #757575; font-style: italic;".into(),
        }
    }
}

/// Formatter output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedArticle {
    pub html: String,
    /// Non-blank lines that matched no rule and were left out of `html`.
    pub dropped_lines: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenBlock {
    None,
    Paragraph,
    List,
}

/// Converts generator markdown into styled HTML sections.
#[derive(Debug, Clone, Default)]
pub struct MarkdownToHtmlFormatter {
    styles: HtmlStyles,
}

impl MarkdownToHtmlFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_styles(styles: HtmlStyles) -> Self {
        Self { styles }
    }

    pub fn styles(&self) -> &HtmlStyles {
        &self.styles
    }

    /// Format `raw` into HTML.
    ///
    /// # Example
    ///
    /// ```
    /// use article_pipeline::MarkdownToHtmlFormatter;
    ///
    /// let out = MarkdownToHtmlFormatter::new().format("# Title\n## Intro\nHello\n### skipped");
    /// assert!(out.html.starts_with("<h1 "));
    /// assert!(out.html.ends_with("Hello</p>"));
    /// assert_eq!(out.dropped_lines, 1);
    /// ```
    pub fn format(&self, raw: &str) -> FormattedArticle {
        let mut state = FormatState::new(&self.styles);
        for line in raw.lines() {
            state.feed(line.trim());
        }
        state.finish()
    }
}

struct FormatState<'a> {
    styles: &'a HtmlStyles,
    html: String,
    open: OpenBlock,
    dropped: usize,
}

impl<'a> FormatState<'a> {
    fn new(styles: &'a HtmlStyles) -> Self {
        Self {
            styles,
            html: String::new(),
            open: OpenBlock::None,
            dropped: 0,
        }
    }

    fn feed(&mut self, line: &str) {
        let styles = self.styles;
        if let Some(title) = line.strip_prefix("# ").filter(|_| !line.contains("##")) {
            self.close();
            self.element("h1", &styles.title, title);
        } else if let Some(header) = line.strip_prefix("## ") {
            self.close();
            self.element("h2", &styles.section, header);
        } else if let Some(item) = line.strip_prefix("- ") {
            if self.open != OpenBlock::List {
                self.close();
                self.open_tag("ul", &styles.list);
                self.open = OpenBlock::List;
            }
            self.element("li", &styles.list_item, item);
        } else if line.is_empty() {
            self.close_list();
        } else if !line.starts_with('#') && !line.starts_with('*') {
            self.close_list();
            if self.open == OpenBlock::Paragraph {
                self.html.push(' ');
            } else {
                self.open_tag("p", &styles.paragraph);
                self.open = OpenBlock::Paragraph;
            }
            self.html.push_str(line);
        } else if line.starts_with('*') && line.contains(ATTRIBUTION_MARKER) {
            self.close();
            self.element("div", &styles.attribution, &line[1..]);
        } else {
            self.close_list();
            self.dropped += 1;
            tracing::debug!(line, "formatter dropped unrecognised line");
        }
    }

    fn finish(mut self) -> FormattedArticle {
        self.close();
        FormattedArticle {
            html: self.html,
            dropped_lines: self.dropped,
        }
    }

    fn open_tag(&mut self, tag: &str, style: &str) {
        self.html.push('<');
        self.html.push_str(tag);
        self.html.push_str(" style=\"");
        self.html.push_str(style);
        self.html.push_str("\">");
    }

    fn element(&mut self, tag: &str, style: &str, text: &str) {
        self.open_tag(tag, style);
        self.html.push_str(text);
        self.html.push_str("</");
        self.html.push_str(tag);
        self.html.push('>');
    }

    fn close(&mut self) {
        match self.open {
            OpenBlock::None => return,
            OpenBlock::Paragraph => self.html.push_str("</p>"),
            OpenBlock::List => self.html.push_str("</ul>"),
        }
        self.open = OpenBlock::None;
    }

    fn close_list(&mut self) {
        if self.open == OpenBlock::List {
            self.close();
        }
    }
}
