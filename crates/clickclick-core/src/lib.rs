//! Ajax-aware request dispatch for component pages.
//!
//! A [`RequestDispatcher`] services one request at a time. It creates an
//! [`EventPhaseRegistry`] for the request, lets the [`Page`] register
//! [`AjaxBehavior`]s and phase listeners during initialisation, and then
//! either processes the components the request targets and answers with
//! Taconite partial responses, or runs the normal lifecycle and renders the
//! page.
//!
//! ```no_run
//! use clickclick_config::Config;
//! use clickclick_core::{
//!     AjaxBehavior, AjaxRequest, EventPhaseRegistry, ListenerError, Method, Page,
//!     RequestDispatcher,
//! };
//! use clickclick_taconite::{ComponentRef, MarkupBuffer, MarkupComponent, MutationBatch};
//!
//! struct CounterPage;
//!
//! impl Page for CounterPage {
//!     fn on_init(&mut self, registry: &mut EventPhaseRegistry) -> Result<(), ListenerError> {
//!         let link = MarkupComponent::new("<a id=\"link_id\">+1</a>")
//!             .with_id("link_id")
//!             .into_ref();
//!         registry.register_ajax(AjaxBehavior::new(
//!             link,
//!             |_: &ComponentRef, registry: &mut EventPhaseRegistry| -> Result<bool, ListenerError> {
//!                 let mut batch = MutationBatch::new();
//!                 batch.replace_content("#counter", "5")?;
//!                 registry.attach(batch);
//!                 Ok(true)
//!             },
//!         ));
//!         Ok(())
//!     }
//!
//!     fn render(&self, buffer: &mut MarkupBuffer) -> Result<(), ListenerError> {
//!         buffer.append("<span id=\"counter\">4</span>");
//!         Ok(())
//!     }
//! }
//!
//! let dispatcher = RequestDispatcher::new(&Config::default());
//! let request = AjaxRequest::from_query(Method::Get, "link_id=1")
//!     .with_header("X-Requested-With", "XMLHttpRequest");
//! let dispatched = dispatcher.dispatch(&mut CounterPage, request);
//! assert!(dispatched.response.body().contains("<replaceContent"));
//! ```

mod behavior;
mod dispatch;
mod listener;
mod page;
mod phase;
mod registry;
mod reporter;
mod request;
mod response;
mod targeting;
pub mod telemetry;

pub use behavior::AjaxBehavior;
pub use dispatch::{
    DISPATCH_TARGET, DispatchError, DispatchOutcome, Dispatched, LifecycleStage,
    RequestDispatcher,
};
pub use listener::{ListenerError, PartialListener, PhaseListener, partial_listener};
pub use page::{ErrorPage, HTML_CONTENT_TYPE, Page, StandardErrorPage};
pub use phase::{EventPhase, PhaseError};
pub use registry::{EventPhaseRegistry, REGISTRY_TARGET};
pub use reporter::{DispatchReporter, StructuredDispatchReporter};
pub use request::{AjaxRequest, Method};
pub use response::{
    Response, STATUS_FORBIDDEN, STATUS_FOUND, STATUS_INTERNAL_SERVER_ERROR, STATUS_OK,
    error_trace,
};
pub use targeting::is_targeted;
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests use expect to surface unexpected failures"
)]
mod tests;
