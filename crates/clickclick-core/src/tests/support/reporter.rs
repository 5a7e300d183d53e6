//! Test double for [`DispatchReporter`] that records events for assertions.

use std::sync::Mutex;

use crate::dispatch::{DispatchError, DispatchOutcome};
use crate::phase::EventPhase;
use crate::reporter::DispatchReporter;
use crate::request::AjaxRequest;

/// Dispatch events tracked during tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    RequestStarted { ajax: bool },
    SecurityDenied { ajax: bool },
    PhaseFired(EventPhase),
    ComponentTargeted(String),
    BatchesWritten(usize),
    RequestFailed(String),
    RequestCompleted(DispatchOutcome, u16),
}

#[derive(Debug, Default)]
pub struct RecordingDispatchReporter {
    events: Mutex<Vec<DispatchEvent>>,
}

impl RecordingDispatchReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<DispatchEvent> {
        self.events
            .lock()
            .expect("dispatch reporter mutex poisoned")
            .clone()
    }

    fn record(&self, event: DispatchEvent) {
        self.events
            .lock()
            .expect("dispatch reporter mutex poisoned")
            .push(event);
    }
}

impl DispatchReporter for RecordingDispatchReporter {
    fn request_started(&self, _request: &AjaxRequest, ajax: bool) {
        self.record(DispatchEvent::RequestStarted { ajax });
    }

    fn security_denied(&self, ajax: bool) {
        self.record(DispatchEvent::SecurityDenied { ajax });
    }

    fn phase_fired(&self, phase: EventPhase, _proceed: bool) {
        self.record(DispatchEvent::PhaseFired(phase));
    }

    fn component_targeted(&self, component: &str) {
        self.record(DispatchEvent::ComponentTargeted(component.to_owned()));
    }

    fn batches_written(&self, batches: usize, _bytes: usize) {
        self.record(DispatchEvent::BatchesWritten(batches));
    }

    fn request_failed(&self, error: &DispatchError) {
        self.record(DispatchEvent::RequestFailed(error.to_string()));
    }

    fn request_completed(&self, outcome: DispatchOutcome, status: u16) {
        self.record(DispatchEvent::RequestCompleted(outcome, status));
    }
}
