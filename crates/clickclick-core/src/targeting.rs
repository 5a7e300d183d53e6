//! Decides which registered components the current request addresses.

use clickclick_config::AjaxSettings;
use clickclick_taconite::Component;

use crate::request::AjaxRequest;

/// Returns `true` when `request` targets `component`.
///
/// A component is targeted when the request carries a parameter named after
/// its id, or when one of the action-trigger parameters holds its name.
/// Components with neither id nor name are never targeted.
#[must_use]
pub fn is_targeted(component: &dyn Component, request: &AjaxRequest, settings: &AjaxSettings) -> bool {
    if let Some(id) = component.id().filter(|id| !id.is_empty()) {
        if request.has_parameter(id) {
            return true;
        }
    }
    component
        .name()
        .filter(|name| !name.is_empty())
        .is_some_and(|name| {
            settings
                .action_trigger_parameters()
                .into_iter()
                .any(|parameter| request.parameter(parameter) == Some(name))
        })
}

/// Describes a component for logs and error messages.
pub(crate) fn describe(component: &dyn Component) -> String {
    match (component.id(), component.name()) {
        (Some(id), _) => format!("#{id}"),
        (None, Some(name)) => format!("[name='{name}']"),
        (None, None) => "<anonymous>".to_owned(),
    }
}
