//! The page lifecycle contract driven by the dispatcher.

use clickclick_taconite::{MarkupBuffer, escape_markup};

use crate::dispatch::DispatchError;
use crate::listener::ListenerError;
use crate::registry::EventPhaseRegistry;
use crate::request::AjaxRequest;
use crate::response::{Response, STATUS_FORBIDDEN, STATUS_INTERNAL_SERVER_ERROR, error_trace};

/// Content type of a full page render.
pub const HTML_CONTENT_TYPE: &str = "text/html";

/// A page the dispatcher can drive through one request.
///
/// Only [`on_init`](Page::on_init) and [`render`](Page::render) are
/// required. Components are expected to register their Ajax behaviour and
/// phase listeners during `on_init`, after which their identities must not
/// change.
pub trait Page {
    /// Returns `false` to deny the request.
    fn on_security_check(&mut self, _request: &AjaxRequest) -> bool {
        true
    }

    /// Writes the denial response for a normal request.
    fn on_security_denied(&mut self, response: &mut Response) {
        response.set_status(STATUS_FORBIDDEN);
    }

    /// Builds the component tree and registers Ajax behaviour.
    ///
    /// # Errors
    ///
    /// Any error is request-fatal.
    fn on_init(&mut self, registry: &mut EventPhaseRegistry) -> Result<(), ListenerError>;

    /// Processes request parameters on the normal path. Returns `false` to
    /// skip the remaining processing hooks.
    ///
    /// # Errors
    ///
    /// Any error is request-fatal.
    fn on_process(&mut self, _registry: &mut EventPhaseRegistry) -> Result<bool, ListenerError> {
        Ok(true)
    }

    /// Called for `GET` requests after processing.
    ///
    /// # Errors
    ///
    /// Any error is request-fatal.
    fn on_get(&mut self, _registry: &mut EventPhaseRegistry) -> Result<(), ListenerError> {
        Ok(())
    }

    /// Called for `POST` requests after processing.
    ///
    /// # Errors
    ///
    /// Any error is request-fatal.
    fn on_post(&mut self, _registry: &mut EventPhaseRegistry) -> Result<(), ListenerError> {
        Ok(())
    }

    /// Called before the page is rendered.
    ///
    /// # Errors
    ///
    /// Any error is request-fatal.
    fn on_render(&mut self, _registry: &mut EventPhaseRegistry) -> Result<(), ListenerError> {
        Ok(())
    }

    /// Renders the full page.
    ///
    /// # Errors
    ///
    /// Any error is request-fatal.
    fn render(&self, buffer: &mut MarkupBuffer) -> Result<(), ListenerError>;

    fn content_type(&self) -> &str {
        HTML_CONTENT_TYPE
    }
}

/// Renders request-fatal errors for normal (non-Ajax) requests.
pub trait ErrorPage: Send + Sync {
    fn render(&self, error: &DispatchError, response: &mut Response);
}

/// Minimal HTML error page listing the error and its causes.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardErrorPage;

impl ErrorPage for StandardErrorPage {
    fn render(&self, error: &DispatchError, response: &mut Response) {
        let mut buffer = MarkupBuffer::new();
        buffer
            .append("<html><head><title>Error</title></head><body>")
            .append("<h1>Internal Server Error</h1><pre>")
            .append(&escape_markup(&error_trace(error)))
            .append("</pre></body></html>");
        *response = Response::new();
        response.set_status(STATUS_INTERNAL_SERVER_ERROR);
        response.set_content_type(HTML_CONTENT_TYPE);
        response.push_str(buffer.as_str());
    }
}
