//! HTML fragments that are escaped by construction.
//!
//! [`Markup`] can only be produced by escaping text, by building an
//! [`Element`] (whose attribute values and text are escaped), or by an explicit
//! [`Markup::trusted`] call for static chrome.

use std::fmt;

/// Escape text for use in HTML element content and quoted attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// An HTML fragment safe to embed in a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Escape `text` into a fragment.
    #[must_use]
    pub fn escape(text: &str) -> Self {
        Self(escape_html(text))
    }

    /// Wrap HTML that is known to be safe without escaping it.
    #[must_use]
    pub fn trusted(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, other: &Self) {
        self.0.push_str(&other.0);
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single HTML element with escaped attributes and content.
#[derive(Debug, Clone)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, Option<String>)>,
    body: Markup,
    void: bool,
}

impl Element {
    /// An element with content and a closing tag.
    #[must_use]
    pub const fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            body: Markup(String::new()),
            void: false,
        }
    }

    /// An element without content or closing tag, such as `input`.
    #[must_use]
    pub const fn void(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            body: Markup(String::new()),
            void: true,
        }
    }

    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl AsRef<str>) -> Self {
        self.attrs.push((name, Some(escape_html(value.as_ref()))));
        self
    }

    /// A boolean attribute such as `checked`.
    #[must_use]
    pub fn flag(mut self, name: &'static str) -> Self {
        self.attrs.push((name, None));
        self
    }

    #[must_use]
    pub fn class(self, class: impl AsRef<str>) -> Self {
        self.attr("class", class)
    }

    /// Append escaped text to the content.
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.body.push(&Markup::escape(text));
        self
    }

    /// Append a fragment to the content.
    #[must_use]
    pub fn child(mut self, markup: &Markup) -> Self {
        self.body.push(markup);
        self
    }

    #[must_use]
    pub fn open_tag(&self) -> Markup {
        let mut html = format!("<{}", self.tag);
        for (name, value) in &self.attrs {
            match value {
                Some(value) => {
                    html.push(' ');
                    html.push_str(name);
                    html.push_str("=\"");
                    html.push_str(value);
                    html.push('"');
                }
                None => {
                    html.push(' ');
                    html.push_str(name);
                }
            }
        }
        html.push('>');
        Markup(html)
    }

    #[must_use]
    pub fn close_tag(&self) -> Markup {
        if self.void {
            Markup::default()
        } else {
            Markup(format!("</{}>", self.tag))
        }
    }

    /// The whole element on one line.
    #[must_use]
    pub fn render(&self) -> Markup {
        let mut html = self.open_tag();
        if !self.void {
            html.push(&self.body);
            html.push(&self.close_tag());
        }
        html
    }
}

/// Line-oriented sink for markup.
///
/// In pretty mode every line is indented by nesting depth and terminated by a
/// newline; in compact mode lines are concatenated. Only whitespace between
/// lines differs, never the content of a line.
#[derive(Debug)]
pub struct MarkupWriter {
    buf: String,
    compact: bool,
    depth: usize,
}

impl MarkupWriter {
    #[must_use]
    pub const fn new(compact: bool) -> Self {
        Self {
            buf: String::new(),
            compact,
            depth: 0,
        }
    }

    pub fn line(&mut self, markup: &Markup) {
        if !self.compact {
            for _ in 0..self.depth {
                self.buf.push('\t');
            }
        }
        self.buf.push_str(markup.as_str());
        if !self.compact {
            self.buf.push('\n');
        }
    }

    /// Write `element`'s opening tag and indent what follows.
    pub fn open(&mut self, element: &Element) {
        self.line(&element.open_tag());
        self.depth += 1;
    }

    /// Dedent and write `element`'s closing tag.
    pub fn close(&mut self, element: &Element) {
        self.depth = self.depth.saturating_sub(1);
        self.line(&element.close_tag());
    }

    /// Write a fragment produced by another writer without re-indenting it.
    ///
    /// Re-indenting would alter multi-line `<textarea>` content.
    pub fn fragment(&mut self, markup: &Markup) {
        self.buf.push_str(markup.as_str());
        if !self.compact && !markup.is_empty() && !markup.as_str().ends_with('\n') {
            self.buf.push('\n');
        }
    }

    #[must_use]
    pub fn finish(self) -> Markup {
        Markup(self.buf)
    }
}
