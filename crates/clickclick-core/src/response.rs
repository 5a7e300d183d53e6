//! In-memory response the dispatcher writes into.

use std::error::Error as StdError;

use clickclick_taconite::{CONTENT_TYPE, MarkupBuffer, MutationBatch, escape_markup};

/// HTTP status for a successful response.
pub const STATUS_OK: u16 = 200;
/// HTTP status for a redirect issued by a page.
pub const STATUS_FOUND: u16 = 302;
/// HTTP status for a failed security check.
pub const STATUS_FORBIDDEN: u16 = 403;
/// HTTP status for request-fatal errors.
pub const STATUS_INTERNAL_SERVER_ERROR: u16 = 500;

/// Status, headers of interest and body produced for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    content_type: Option<String>,
    redirect: Option<String>,
    body: String,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: STATUS_OK,
            content_type: None,
            redirect: None,
            body: String::new(),
        }
    }
}

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = Some(content_type.into());
    }

    #[must_use]
    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    /// Issues a redirect to `location`.
    pub fn send_redirect(&mut self, location: impl Into<String>) {
        self.status = STATUS_FOUND;
        self.redirect = Some(location.into());
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Appends text to the body.
    pub fn push_str(&mut self, text: &str) {
        self.body.push_str(text);
    }

    /// Streams partial responses in order and returns the number of bytes
    /// written.
    pub fn write_batches(
        &mut self,
        batches: impl IntoIterator<Item = MutationBatch>,
        charset: &str,
    ) -> usize {
        self.set_content_type(format!("{CONTENT_TYPE}; charset={charset}"));
        let mut buffer = MarkupBuffer::new();
        for batch in batches {
            batch.render(&mut buffer);
        }
        self.body.push_str(buffer.as_str());
        buffer.len()
    }

    /// Replaces the body with an `<error>` document describing `error`.
    pub fn write_ajax_error(&mut self, error: &(dyn StdError + 'static), charset: &str) {
        self.status = STATUS_INTERNAL_SERVER_ERROR;
        self.set_content_type(format!("{CONTENT_TYPE}; charset={charset}"));
        self.body.clear();
        self.body.push_str("<error>\n");
        self.body.push_str(&escape_markup(&error_trace(error)));
        self.body.push_str("\n</error>");
    }
}

/// Formats an error and its source chain, one cause per line.
#[must_use]
pub fn error_trace(error: &(dyn StdError + 'static)) -> String {
    let mut trace = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        trace.push_str("\ncaused by: ");
        trace.push_str(&cause.to_string());
        source = cause.source();
    }
    trace
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests use expect to surface unexpected failures"
)]
mod tests {
    use super::*;
    use crate::listener::ListenerError;

    #[test]
    fn trace_lists_every_cause() {
        let io = std::io::Error::other("disk <full>");
        let error = ListenerError::with_source("save failed", io);
        assert_eq!(error_trace(&error), "save failed\ncaused by: disk <full>");
    }

    #[test]
    fn ajax_error_is_escaped_and_wrapped() {
        let mut response = Response::new();
        response.push_str("partial output");
        response.write_ajax_error(&ListenerError::failed("bad <input>"), "UTF-8");

        assert_eq!(response.status(), STATUS_INTERNAL_SERVER_ERROR);
        assert_eq!(response.body(), "<error>\nbad &lt;input&gt;\n</error>");
        assert_eq!(response.content_type(), Some("text/xml; charset=UTF-8"));
    }

    #[test]
    fn batches_are_written_back_to_back() {
        let mut first = MutationBatch::new();
        first.hide("#a").expect("hide builds");
        let mut response = Response::new();

        let written = response.write_batches([first, MutationBatch::new()], "ISO-8859-1");

        assert_eq!(written, response.body().len());
        assert_eq!(response.body().matches("<taconite>").count(), 2);
        assert_eq!(response.content_type(), Some("text/xml; charset=ISO-8859-1"));
    }

    #[test]
    fn redirect_sets_found_status() {
        let mut response = Response::new();
        response.send_redirect("/login");
        assert_eq!(response.status(), STATUS_FOUND);
        assert_eq!(response.redirect(), Some("/login"));
    }
}
