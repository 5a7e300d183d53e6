//! Phase listeners and the errors they may raise.

use std::error::Error as StdError;

use clickclick_taconite::{CommandError, ComponentRef, MutationBatch};
use thiserror::Error;

use crate::registry::EventPhaseRegistry;

/// Failure raised by a listener, process handler or page hook.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// A partial-response command could not be built.
    #[error("failed to build partial response command")]
    Command(#[from] CommandError),

    /// Application-defined failure.
    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

impl ListenerError {
    /// Creates an application failure with a message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an application failure wrapping an underlying error.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Failed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Callback invoked when a phase fires or a targeted component processes.
///
/// Returns `Ok(true)` to continue processing and `Ok(false)` to halt. The
/// registry is passed mutably so listeners can attach batches or register
/// further listeners.
pub trait PhaseListener {
    /// Handles the event raised on behalf of `source`.
    ///
    /// # Errors
    ///
    /// Returns a [`ListenerError`], which is fatal to the request.
    fn on_event(
        &self,
        source: &ComponentRef,
        registry: &mut EventPhaseRegistry,
    ) -> Result<bool, ListenerError>;
}

impl<F> PhaseListener for F
where
    F: Fn(&ComponentRef, &mut EventPhaseRegistry) -> Result<bool, ListenerError>,
{
    fn on_event(
        &self,
        source: &ComponentRef,
        registry: &mut EventPhaseRegistry,
    ) -> Result<bool, ListenerError> {
        self(source, registry)
    }
}

/// Adapts an action that may answer with a partial response.
///
/// When the action returns a batch it is attached to the registry and
/// processing halts; otherwise processing continues.
pub struct PartialListener<F> {
    action: F,
}

impl<F> PartialListener<F>
where
    F: Fn(&ComponentRef, &mut EventPhaseRegistry) -> Result<Option<MutationBatch>, ListenerError>,
{
    #[must_use]
    pub fn new(action: F) -> Self {
        Self { action }
    }
}

impl<F> PhaseListener for PartialListener<F>
where
    F: Fn(&ComponentRef, &mut EventPhaseRegistry) -> Result<Option<MutationBatch>, ListenerError>,
{
    fn on_event(
        &self,
        source: &ComponentRef,
        registry: &mut EventPhaseRegistry,
    ) -> Result<bool, ListenerError> {
        match (self.action)(source, registry)? {
            Some(batch) => {
                registry.attach(batch);
                Ok(false)
            }
            None => Ok(true),
        }
    }
}

/// Shorthand for [`PartialListener::new`].
#[must_use]
pub fn partial_listener<F>(action: F) -> PartialListener<F>
where
    F: Fn(&ComponentRef, &mut EventPhaseRegistry) -> Result<Option<MutationBatch>, ListenerError>,
{
    PartialListener::new(action)
}
