//! Structured reporting of dispatch lifecycle events.

use std::sync::Arc;

use crate::dispatch::{DISPATCH_TARGET, DispatchError, DispatchOutcome};
use crate::phase::EventPhase;
use crate::request::AjaxRequest;

/// Observer for request lifecycle events.
pub trait DispatchReporter: Send + Sync {
    /// Invoked before the security check.
    fn request_started(&self, request: &AjaxRequest, ajax: bool);

    /// Invoked when the page denies the request.
    fn security_denied(&self, ajax: bool);

    /// Invoked after the dispatcher fires a phase.
    fn phase_fired(&self, phase: EventPhase, proceed: bool);

    /// Invoked before a targeted component is processed.
    fn component_targeted(&self, component: &str);

    /// Invoked after partial responses are written.
    fn batches_written(&self, batches: usize, bytes: usize);

    /// Invoked when the request fails.
    fn request_failed(&self, error: &DispatchError);

    /// Invoked once the response is complete.
    fn request_completed(&self, outcome: DispatchOutcome, status: u16);
}

impl<T> DispatchReporter for Arc<T>
where
    T: DispatchReporter + ?Sized,
{
    fn request_started(&self, request: &AjaxRequest, ajax: bool) {
        (**self).request_started(request, ajax);
    }

    fn security_denied(&self, ajax: bool) {
        (**self).security_denied(ajax);
    }

    fn phase_fired(&self, phase: EventPhase, proceed: bool) {
        (**self).phase_fired(phase, proceed);
    }

    fn component_targeted(&self, component: &str) {
        (**self).component_targeted(component);
    }

    fn batches_written(&self, batches: usize, bytes: usize) {
        (**self).batches_written(batches, bytes);
    }

    fn request_failed(&self, error: &DispatchError) {
        (**self).request_failed(error);
    }

    fn request_completed(&self, outcome: DispatchOutcome, status: u16) {
        (**self).request_completed(outcome, status);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredDispatchReporter;

impl StructuredDispatchReporter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DispatchReporter for StructuredDispatchReporter {
    fn request_started(&self, request: &AjaxRequest, ajax: bool) {
        tracing::debug!(
            target: DISPATCH_TARGET,
            event = "request_started",
            method = %request.method(),
            ajax,
            forward = request.is_forward(),
            "dispatching request"
        );
    }

    fn security_denied(&self, ajax: bool) {
        tracing::warn!(
            target: DISPATCH_TARGET,
            event = "security_denied",
            ajax,
            "page denied request"
        );
    }

    fn phase_fired(&self, phase: EventPhase, proceed: bool) {
        tracing::debug!(
            target: DISPATCH_TARGET,
            event = "phase_fired",
            phase = %phase,
            proceed,
            "phase fired"
        );
    }

    fn component_targeted(&self, component: &str) {
        tracing::debug!(
            target: DISPATCH_TARGET,
            event = "component_targeted",
            component,
            "processing targeted component"
        );
    }

    fn batches_written(&self, batches: usize, bytes: usize) {
        tracing::info!(
            target: DISPATCH_TARGET,
            event = "batches_written",
            batches,
            bytes,
            "partial response written"
        );
    }

    fn request_failed(&self, error: &DispatchError) {
        tracing::error!(
            target: DISPATCH_TARGET,
            event = "request_failed",
            error = %error,
            details = ?error,
            "request failed"
        );
    }

    fn request_completed(&self, outcome: DispatchOutcome, status: u16) {
        tracing::info!(
            target: DISPATCH_TARGET,
            event = "request_completed",
            outcome = %outcome,
            status,
            "request completed"
        );
    }
}
