//! Request-scoped registry of Ajax components, phase listeners and pending
//! partial responses.
//!
//! One registry is created per request and handed mutably to every
//! callback. It is dropped when dispatch returns, so nothing registered for
//! one request can leak into the next.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use clickclick_config::AjaxSettings;
use clickclick_taconite::{ComponentRef, MutationBatch};
use tracing::debug;

use crate::behavior::AjaxBehavior;
use crate::listener::PhaseListener;
use crate::phase::{EventPhase, PhaseError};
use crate::request::AjaxRequest;
use crate::targeting::describe;

/// Tracing target for registry activity.
pub const REGISTRY_TARGET: &str = "clickclick_core::registry";

#[derive(Clone)]
struct ListenerBinding {
    source: ComponentRef,
    listener: Rc<dyn PhaseListener>,
}

/// Per-request state shared between the dispatcher and page callbacks.
pub struct EventPhaseRegistry {
    request: AjaxRequest,
    settings: AjaxSettings,
    ajax: bool,
    behaviors: Vec<AjaxBehavior>,
    listeners: BTreeMap<EventPhase, Vec<ListenerBinding>>,
    last_fired: Option<EventPhase>,
    post_render_fired: bool,
    batches: VecDeque<MutationBatch>,
}

impl EventPhaseRegistry {
    /// Creates an empty registry for `request`.
    #[must_use]
    pub fn new(request: AjaxRequest, settings: AjaxSettings) -> Self {
        let ajax = request.is_ajax_request(&settings);
        Self {
            request,
            settings,
            ajax,
            behaviors: Vec::new(),
            listeners: BTreeMap::new(),
            last_fired: None,
            post_render_fired: false,
            batches: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn request(&self) -> &AjaxRequest {
        &self.request
    }

    #[must_use]
    pub fn settings(&self) -> &AjaxSettings {
        &self.settings
    }

    /// Returns `true` when the transport marked the request as Ajax.
    #[must_use]
    pub fn is_ajax(&self) -> bool {
        self.ajax
    }

    /// Registers an Ajax-aware component.
    ///
    /// Returns `false` when the same component instance is already
    /// registered; the set keeps first-registration order.
    pub fn register_ajax(&mut self, behavior: AjaxBehavior) -> bool {
        let duplicate = self
            .behaviors
            .iter()
            .any(|existing| Rc::ptr_eq(existing.component(), behavior.component()));
        if duplicate {
            return false;
        }
        debug!(
            target: REGISTRY_TARGET,
            component = %describe(behavior.component().as_ref()),
            "registered ajax component"
        );
        self.behaviors.push(behavior);
        true
    }

    /// Returns registered Ajax behaviours in registration order.
    #[must_use]
    pub fn ajax_behaviors(&self) -> &[AjaxBehavior] {
        &self.behaviors
    }

    #[must_use]
    pub fn has_ajax_components(&self) -> bool {
        !self.behaviors.is_empty()
    }

    /// Registers `listener` for `phase` on behalf of `source`.
    ///
    /// A pre-process listener registered after that phase has already fired
    /// is also invoked immediately.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError`] when an immediately invoked listener fails.
    pub fn register(
        &mut self,
        source: &ComponentRef,
        phase: EventPhase,
        listener: impl PhaseListener + 'static,
    ) -> Result<(), PhaseError> {
        self.register_shared(source, phase, Rc::new(listener))
    }

    /// Registers a shared listener instance. See [`register`](Self::register).
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError`] when an immediately invoked listener fails.
    pub fn register_shared(
        &mut self,
        source: &ComponentRef,
        phase: EventPhase,
        listener: Rc<dyn PhaseListener>,
    ) -> Result<(), PhaseError> {
        let binding = ListenerBinding {
            source: ComponentRef::clone(source),
            listener,
        };
        self.listeners
            .entry(phase)
            .or_default()
            .push(binding.clone());

        let late = phase == EventPhase::PreProcess
            && self
                .last_fired
                .is_some_and(|fired| fired >= EventPhase::PreProcess);
        if late {
            debug!(
                target: REGISTRY_TARGET,
                phase = %phase,
                component = %describe(source.as_ref()),
                "late registration fired immediately"
            );
            self.invoke(phase, &binding)?;
        }
        Ok(())
    }

    /// Returns the number of listeners registered for `phase`.
    #[must_use]
    pub fn listener_count(&self, phase: EventPhase) -> usize {
        self.listeners.get(&phase).map_or(0, Vec::len)
    }

    /// Fires every listener for `phase` in registration order.
    ///
    /// All listeners run even after one asks to halt; the result is `true`
    /// only when every listener returned `true`. Post-render fires at most
    /// once per request and later calls return `Ok(true)` without invoking
    /// anything. Listeners registered while the phase is firing are not
    /// invoked by that firing.
    ///
    /// # Errors
    ///
    /// Returns the first listener failure, which ends the firing.
    pub fn fire(&mut self, phase: EventPhase) -> Result<bool, PhaseError> {
        self.last_fired = Some(phase);
        if phase == EventPhase::PostRender {
            if self.post_render_fired {
                return Ok(true);
            }
            self.post_render_fired = true;
        }

        let bindings = self.listeners.get(&phase).cloned().unwrap_or_default();
        let mut proceed = true;
        for binding in &bindings {
            proceed &= self.invoke(phase, binding)?;
        }
        debug!(
            target: REGISTRY_TARGET,
            phase = %phase,
            listeners = bindings.len(),
            proceed,
            "phase fired"
        );
        Ok(proceed)
    }

    fn invoke(&mut self, phase: EventPhase, binding: &ListenerBinding) -> Result<bool, PhaseError> {
        binding
            .listener
            .on_event(&binding.source, self)
            .map_err(|source| PhaseError {
                phase,
                component: describe(binding.source.as_ref()),
                source,
            })
    }

    /// Returns the most recently fired phase.
    #[must_use]
    pub fn last_fired(&self) -> Option<EventPhase> {
        self.last_fired
    }

    #[must_use]
    pub fn post_render_fired(&self) -> bool {
        self.post_render_fired
    }

    /// Queues a partial response for this request.
    pub fn attach(&mut self, batch: MutationBatch) {
        debug!(
            target: REGISTRY_TARGET,
            commands = batch.len(),
            "partial response attached"
        );
        self.batches.push_back(batch);
    }

    /// Returns the number of queued partial responses.
    #[must_use]
    pub fn pending_batches(&self) -> usize {
        self.batches.len()
    }

    /// Removes and returns queued partial responses in attachment order.
    pub fn take_batches(&mut self) -> Vec<MutationBatch> {
        self.batches.drain(..).collect()
    }

    /// Discards registrations after a request-fatal error.
    ///
    /// Components, listeners and queued batches are dropped and the
    /// last-fired marker is reset. Nothing is fired. The post-render guard
    /// is kept so an error path cannot trigger post-render listeners twice.
    pub fn mark_error_occurred(&mut self) {
        debug!(target: REGISTRY_TARGET, "clearing registry after error");
        self.behaviors.clear();
        self.listeners.clear();
        self.batches.clear();
        self.last_fired = None;
    }

    /// Resets all per-request state, including the post-render guard.
    pub fn clear(&mut self) {
        self.mark_error_occurred();
        self.post_render_fired = false;
    }
}

impl fmt::Debug for EventPhaseRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners: BTreeMap<EventPhase, usize> = self
            .listeners
            .iter()
            .map(|(phase, bindings)| (*phase, bindings.len()))
            .collect();
        formatter
            .debug_struct("EventPhaseRegistry")
            .field("ajax", &self.ajax)
            .field("behaviors", &self.behaviors)
            .field("listeners", &listeners)
            .field("last_fired", &self.last_fired)
            .field("post_render_fired", &self.post_render_fired)
            .field("batches", &self.batches.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests use expect to surface unexpected failures"
)]
mod tests;
