//! The rendering contract commands need from page components.

use std::fmt;
use std::rc::Rc;

use crate::errors::CommandError;
use crate::markup::MarkupBuffer;
use crate::resource::HeadResource;

/// A renderable page component.
///
/// Identity (`id`, `name`) must be stable once the page has been
/// initialised. [`head_resources`](Component::head_resources) must be
/// idempotent and free of side effects because it may be called more than
/// once per request.
pub trait Component {
    /// Returns the element id, if any.
    fn id(&self) -> Option<&str>;

    /// Returns the element name, if any.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Writes the component's markup.
    fn render(&self, buffer: &mut MarkupBuffer);

    /// Returns the head resources the component depends on.
    fn head_resources(&self) -> Vec<HeadResource> {
        Vec::new()
    }
}

/// Shared handle to a component.
pub type ComponentRef = Rc<dyn Component>;

/// Derives a CSS selector from a component's identity.
///
/// Uses `#id` when an id is set, otherwise `[name='name']`.
///
/// # Errors
///
/// Returns [`CommandError::UnresolvableSelector`] when the component has
/// neither.
pub fn selector_for(component: &dyn Component) -> Result<String, CommandError> {
    if let Some(id) = component.id().filter(|id| !id.is_empty()) {
        return Ok(format!("#{id}"));
    }
    if let Some(name) = component.name().filter(|name| !name.is_empty()) {
        return Ok(format!("[name='{name}']"));
    }
    Err(CommandError::UnresolvableSelector {
        id: component.id().map(str::to_owned),
        name: component.name().map(str::to_owned),
    })
}

/// Renders a component into a new string.
#[must_use]
pub fn render_to_string(component: &dyn Component) -> String {
    let mut buffer = MarkupBuffer::new();
    component.render(&mut buffer);
    buffer.into_string()
}

pub(crate) struct ComponentDebug<'a>(pub(crate) &'a dyn Component);

impl fmt::Debug for ComponentDebug<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Component")
            .field("id", &self.0.id())
            .field("name", &self.0.name())
            .finish_non_exhaustive()
    }
}

/// A component backed by pre-rendered markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupComponent {
    id: Option<String>,
    name: Option<String>,
    markup: String,
    resources: Vec<HeadResource>,
}

impl MarkupComponent {
    #[must_use]
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declares a head resource the component depends on.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<HeadResource>) -> Self {
        self.resources.push(resource.into());
        self
    }

    /// Wraps the component in a shared [`ComponentRef`].
    #[must_use]
    pub fn into_ref(self) -> ComponentRef {
        Rc::new(self)
    }
}

impl Component for MarkupComponent {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn render(&self, buffer: &mut MarkupBuffer) {
        buffer.append(&self.markup);
    }

    fn head_resources(&self) -> Vec<HeadResource> {
        self.resources.clone()
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests use expect to surface construction failures"
)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::id(MarkupComponent::new("").with_id("foo"), "#foo")]
    #[case::id_wins(MarkupComponent::new("").with_id("foo").with_name("bar"), "#foo")]
    #[case::name(MarkupComponent::new("").with_name("bar"), "[name='bar']")]
    fn selector_prefers_id(#[case] component: MarkupComponent, #[case] expected: &str) {
        assert_eq!(selector_for(&component).expect("selector"), expected);
    }

    #[test]
    fn anonymous_component_has_no_selector() {
        let error = selector_for(&MarkupComponent::new("<p/>")).expect_err("no identity");
        assert_eq!(
            error,
            CommandError::UnresolvableSelector {
                id: None,
                name: None
            }
        );
    }

    #[test]
    fn markup_component_renders_verbatim() {
        let component = MarkupComponent::new("<span>5</span>");
        assert_eq!(render_to_string(&component), "<span>5</span>");
    }
}
