//! Request orchestration.
//!
//! Each call to [`RequestDispatcher::dispatch`] drives one page through
//! security check, initialisation and the pre-process phase, then takes one
//! of two branches:
//!
//! - **Ajax**: the request is transport-marked as Ajax, is not a forward and
//!   at least one Ajax behaviour was registered. Every targeted component is
//!   processed in registration order, post-process and post-render fire, and
//!   the queued partial responses are written. The page is never rendered.
//! - **Normal**: page processing, post-process, the get/post and render
//!   hooks, post-render, then a full page render. Partial responses queued
//!   during a normal request replace the page render.
//!
//! Request-fatal errors clear the registry and produce an `<error>` document
//! for Ajax requests or the configured error page otherwise.

mod errors;

use std::sync::Arc;

use clickclick_config::{AjaxSettings, Config};
use clickclick_taconite::MarkupBuffer;
use strum::Display;

pub use errors::{DispatchError, LifecycleStage};

use crate::page::{ErrorPage, Page, StandardErrorPage};
use crate::phase::EventPhase;
use crate::registry::EventPhaseRegistry;
use crate::reporter::{DispatchReporter, StructuredDispatchReporter};
use crate::request::{AjaxRequest, Method};
use crate::response::Response;
use crate::targeting::{describe, is_targeted};

/// Tracing target for dispatch events.
pub const DISPATCH_TARGET: &str = "clickclick_core::dispatch";

/// How a dispatched request was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DispatchOutcome {
    /// The full page was rendered.
    Rendered,
    /// Partial responses were written instead of the page.
    Partial,
    /// The security check failed.
    Denied,
    /// A request-fatal error was rendered.
    Failed,
}

/// Result of dispatching one request.
#[derive(Debug)]
pub struct Dispatched {
    pub outcome: DispatchOutcome,
    pub response: Response,
}

/// Drives pages through the request lifecycle.
pub struct RequestDispatcher {
    settings: AjaxSettings,
    reporter: Arc<dyn DispatchReporter>,
    error_page: Arc<dyn ErrorPage>,
}

impl RequestDispatcher {
    /// Builds a dispatcher from resolved configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_settings(config.ajax())
    }

    /// Builds a dispatcher with the structured reporter and the standard
    /// error page.
    #[must_use]
    pub fn with_settings(settings: AjaxSettings) -> Self {
        Self {
            settings,
            reporter: Arc::new(StructuredDispatchReporter::new()),
            error_page: Arc::new(StandardErrorPage),
        }
    }

    /// Replaces the lifecycle reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn DispatchReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replaces the error page used for normal requests.
    #[must_use]
    pub fn with_error_page(mut self, error_page: Arc<dyn ErrorPage>) -> Self {
        self.error_page = error_page;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &AjaxSettings {
        &self.settings
    }

    /// Services one request.
    ///
    /// Request-scoped state lives in a registry owned by this call and is
    /// dropped on every exit path.
    pub fn dispatch(&self, page: &mut dyn Page, request: AjaxRequest) -> Dispatched {
        let mut registry = EventPhaseRegistry::new(request, self.settings.clone());
        let span = tracing::info_span!(
            target: DISPATCH_TARGET,
            "request",
            method = %registry.request().method(),
            ajax = registry.is_ajax(),
            forward = registry.request().is_forward()
        );
        let _request = span.enter();
        let mut response = Response::new();
        self.reporter
            .request_started(registry.request(), registry.is_ajax());

        let outcome = match self.run(page, &mut registry, &mut response) {
            Ok(outcome) => outcome,
            Err(error) => {
                registry.mark_error_occurred();
                self.reporter.request_failed(&error);
                if registry.is_ajax() {
                    response.write_ajax_error(&error, &self.settings.charset);
                } else {
                    self.error_page.render(&error, &mut response);
                }
                DispatchOutcome::Failed
            }
        };

        self.reporter.request_completed(outcome, response.status());
        Dispatched { outcome, response }
    }

    fn run(
        &self,
        page: &mut dyn Page,
        registry: &mut EventPhaseRegistry,
        response: &mut Response,
    ) -> Result<DispatchOutcome, DispatchError> {
        if !page.on_security_check(registry.request()) {
            self.reporter.security_denied(registry.is_ajax());
            if !registry.is_ajax() {
                page.on_security_denied(response);
            }
            return Ok(DispatchOutcome::Denied);
        }

        page.on_init(registry)
            .map_err(|source| DispatchError::lifecycle(LifecycleStage::Init, source))?;
        self.fire(registry, EventPhase::PreProcess)?;

        let ajax_branch = registry.is_ajax()
            && !registry.request().is_forward()
            && registry.has_ajax_components();
        if ajax_branch {
            self.ajax_branch(registry, response)
        } else {
            self.normal_branch(page, registry, response)
        }
    }

    fn ajax_branch(
        &self,
        registry: &mut EventPhaseRegistry,
        response: &mut Response,
    ) -> Result<DispatchOutcome, DispatchError> {
        let behaviors = registry.ajax_behaviors().to_vec();
        for behavior in &behaviors {
            let component = behavior.component();
            if !is_targeted(component.as_ref(), registry.request(), registry.settings()) {
                continue;
            }
            let description = describe(component.as_ref());
            self.reporter.component_targeted(&description);
            // A halting result only ends that component's own processing.
            behavior
                .process(registry)
                .map_err(|source| DispatchError::process(description, source))?;
        }

        self.fire(registry, EventPhase::PostProcess)?;
        self.fire(registry, EventPhase::PostRender)?;
        Ok(self.write_batches(registry, response))
    }

    fn normal_branch(
        &self,
        page: &mut dyn Page,
        registry: &mut EventPhaseRegistry,
        response: &mut Response,
    ) -> Result<DispatchOutcome, DispatchError> {
        let mut proceed = page
            .on_process(registry)
            .map_err(|source| DispatchError::lifecycle(LifecycleStage::Process, source))?;
        if proceed {
            proceed = self.fire(registry, EventPhase::PostProcess)?;
        }
        if proceed {
            match registry.request().method() {
                Method::Get => page
                    .on_get(registry)
                    .map_err(|source| DispatchError::lifecycle(LifecycleStage::Get, source))?,
                Method::Post => page
                    .on_post(registry)
                    .map_err(|source| DispatchError::lifecycle(LifecycleStage::Post, source))?,
            }
            page.on_render(registry)
                .map_err(|source| DispatchError::lifecycle(LifecycleStage::Render, source))?;
        }
        self.fire(registry, EventPhase::PostRender)?;

        if registry.pending_batches() > 0 {
            return Ok(self.write_batches(registry, response));
        }

        let mut buffer = MarkupBuffer::new();
        page.render(&mut buffer)
            .map_err(|source| DispatchError::lifecycle(LifecycleStage::PageRender, source))?;
        response.set_content_type(format!(
            "{}; charset={}",
            page.content_type(),
            self.settings.charset
        ));
        response.push_str(buffer.as_str());
        Ok(DispatchOutcome::Rendered)
    }

    fn fire(
        &self,
        registry: &mut EventPhaseRegistry,
        phase: EventPhase,
    ) -> Result<bool, DispatchError> {
        let proceed = registry.fire(phase)?;
        self.reporter.phase_fired(phase, proceed);
        Ok(proceed)
    }

    fn write_batches(
        &self,
        registry: &mut EventPhaseRegistry,
        response: &mut Response,
    ) -> DispatchOutcome {
        let batches = registry.take_batches();
        let count = batches.len();
        let bytes = response.write_batches(batches, &self.settings.charset);
        self.reporter.batches_written(count, bytes);
        DispatchOutcome::Partial
    }
}

impl std::fmt::Debug for RequestDispatcher {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RequestDispatcher")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
