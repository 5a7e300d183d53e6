//! Ajax behaviour: a component paired with the handler that processes it.

use std::fmt;
use std::rc::Rc;

use clickclick_taconite::ComponentRef;

use crate::listener::{ListenerError, PhaseListener};
use crate::registry::EventPhaseRegistry;
use crate::targeting::describe;

/// Makes a component answerable over Ajax.
///
/// When a request targets the component, the dispatcher invokes the handler
/// instead of running the page's normal processing.
#[derive(Clone)]
pub struct AjaxBehavior {
    component: ComponentRef,
    handler: Rc<dyn PhaseListener>,
}

impl AjaxBehavior {
    #[must_use]
    pub fn new(component: ComponentRef, handler: impl PhaseListener + 'static) -> Self {
        Self {
            component,
            handler: Rc::new(handler),
        }
    }

    #[must_use]
    pub fn component(&self) -> &ComponentRef {
        &self.component
    }

    /// Runs the handler for the component.
    ///
    /// # Errors
    ///
    /// Propagates the handler's [`ListenerError`].
    pub fn process(&self, registry: &mut EventPhaseRegistry) -> Result<bool, ListenerError> {
        self.handler.on_event(&self.component, registry)
    }
}

impl fmt::Debug for AjaxBehavior {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AjaxBehavior")
            .field("component", &describe(self.component.as_ref()))
            .finish_non_exhaustive()
    }
}
