//! Error types for request dispatch failures.

use strum::Display;
use thiserror::Error;

use crate::listener::ListenerError;
use crate::phase::PhaseError;
use crate::response::STATUS_INTERNAL_SERVER_ERROR;

/// Page hook that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum LifecycleStage {
    Init,
    Process,
    Get,
    Post,
    Render,
    PageRender,
}

/// Request-fatal failures surfaced while dispatching.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A phase listener failed.
    #[error("event phase failed")]
    Phase(#[from] PhaseError),

    /// A targeted component's handler failed.
    #[error("processing failed for component {component}")]
    Process {
        component: String,
        #[source]
        source: ListenerError,
    },

    /// A page lifecycle hook failed.
    #[error("page {stage} hook failed")]
    Lifecycle {
        stage: LifecycleStage,
        #[source]
        source: ListenerError,
    },
}

impl DispatchError {
    /// Returns the HTTP status reported for this error.
    ///
    /// Every dispatch failure is a server-side failure.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Phase(_) | Self::Process { .. } | Self::Lifecycle { .. } => {
                STATUS_INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Creates a lifecycle error for `stage`.
    #[must_use]
    pub fn lifecycle(stage: LifecycleStage, source: ListenerError) -> Self {
        Self::Lifecycle { stage, source }
    }

    /// Creates a processing error for the described component.
    #[must_use]
    pub fn process(component: impl Into<String>, source: ListenerError) -> Self {
        Self::Process {
            component: component.into(),
            source,
        }
    }
}
