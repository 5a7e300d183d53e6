//! Minimal buffer-based markup emission.

use std::fmt;

/// String buffer with helpers for emitting XML/HTML elements.
///
/// Attribute values are escaped; text appended through [`append`] is
/// written verbatim because Taconite content is usually pre-rendered markup.
///
/// [`append`]: MarkupBuffer::append
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MarkupBuffer {
    buffer: String,
}

impl MarkupBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
        }
    }

    /// Appends raw text.
    pub fn append(&mut self, text: &str) -> &mut Self {
        self.buffer.push_str(text);
        self
    }

    /// Appends text with markup-significant characters escaped.
    pub fn append_escaped(&mut self, text: &str) -> &mut Self {
        escape_into(&mut self.buffer, text);
        self
    }

    /// Opens an element: `<tag`.
    pub fn element_start(&mut self, tag: &str) -> &mut Self {
        self.buffer.push('<');
        self.buffer.push_str(tag);
        self
    }

    /// Appends ` name="value"`, skipping absent values.
    pub fn append_attribute(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.buffer.push(' ');
            self.buffer.push_str(name);
            self.buffer.push_str("=\"");
            escape_into(&mut self.buffer, value);
            self.buffer.push('"');
        }
        self
    }

    /// Closes an opening tag: `>`.
    pub fn close_tag(&mut self) -> &mut Self {
        self.buffer.push('>');
        self
    }

    /// Self-closes an opening tag: `/>`.
    pub fn element_end_self(&mut self) -> &mut Self {
        self.buffer.push_str("/>");
        self
    }

    /// Writes a closing tag: `</tag>`.
    pub fn element_end(&mut self, tag: &str) -> &mut Self {
        self.buffer.push_str("</");
        self.buffer.push_str(tag);
        self.buffer.push('>');
        self
    }

    /// Returns the buffered markup.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Consumes the buffer and returns the markup.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buffer
    }

    /// Returns the buffered length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` when nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl fmt::Display for MarkupBuffer {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.buffer)
    }
}

/// Escapes `&`, `<`, `>`, `"` and `'` for use in text or attribute values.
#[must_use]
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    escape_into(&mut escaped, text);
    escaped
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
}
