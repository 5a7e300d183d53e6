//! Taconite commands: one declarative DOM mutation each.

use std::fmt;
use std::str::FromStr;

use crate::component::{ComponentDebug, ComponentRef, selector_for};
use crate::errors::CommandError;
use crate::markup::MarkupBuffer;
use crate::resource::HeadResource;

/// The mutation a command performs on the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Verb {
    Append,
    Prepend,
    After,
    Before,
    Replace,
    ReplaceContent,
    Attr,
    Wrap,
    Hide,
    Show,
    Eval,
    Remove,
    Empty,
    /// Adds resources to the document head. Takes no selector.
    AddHeader,
    /// A verb understood by a client-side extension.
    Custom(String),
}

impl Verb {
    const BUILT_IN: [Self; 14] = [
        Self::Append,
        Self::Prepend,
        Self::After,
        Self::Before,
        Self::Replace,
        Self::ReplaceContent,
        Self::Attr,
        Self::Wrap,
        Self::Hide,
        Self::Show,
        Self::Eval,
        Self::Remove,
        Self::Empty,
        Self::AddHeader,
    ];

    /// Returns the element name used on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Append => "append",
            Self::Prepend => "prepend",
            Self::After => "after",
            Self::Before => "before",
            Self::Replace => "replace",
            Self::ReplaceContent => "replaceContent",
            Self::Attr => "attr",
            Self::Wrap => "wrap",
            Self::Hide => "hide",
            Self::Show => "show",
            Self::Eval => "eval",
            Self::Remove => "remove",
            Self::Empty => "empty",
            Self::AddHeader => "addHeader",
            Self::Custom(name) => name,
        }
    }

    /// Returns `true` unless the verb operates on the document as a whole.
    #[must_use]
    pub fn requires_selector(&self) -> bool {
        !matches!(self, Self::Eval | Self::AddHeader)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = CommandError;

    /// Maps wire names to built-in verbs and anything else to
    /// [`Verb::Custom`].
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let name = value.trim();
        if name.is_empty() {
            return Err(CommandError::BlankVerb);
        }
        Ok(Self::BUILT_IN
            .into_iter()
            .find(|verb| verb.as_str() == name)
            .unwrap_or_else(|| Self::Custom(name.to_owned())))
    }
}

/// One item of a command's payload.
#[derive(Clone)]
pub enum Content {
    /// Literal markup or script text, written verbatim.
    Text(String),
    /// A component rendered in place; its head resources are hoisted.
    Component(ComponentRef),
    /// A head resource element rendered in place.
    Resource(HeadResource),
}

impl Content {
    fn render(&self, buffer: &mut MarkupBuffer) {
        match self {
            Self::Text(text) => {
                buffer.append(text);
            }
            Self::Component(component) => component.render(buffer),
            Self::Resource(resource) => resource.render(buffer),
        }
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => formatter.debug_tuple("Text").field(text).finish(),
            Self::Component(component) => formatter
                .debug_tuple("Component")
                .field(&ComponentDebug(component.as_ref()))
                .finish(),
            Self::Resource(resource) => formatter.debug_tuple("Resource").field(resource).finish(),
        }
    }
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Content {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<ComponentRef> for Content {
    fn from(value: ComponentRef) -> Self {
        Self::Component(value)
    }
}

impl From<&ComponentRef> for Content {
    fn from(value: &ComponentRef) -> Self {
        Self::Component(ComponentRef::clone(value))
    }
}

impl From<HeadResource> for Content {
    fn from(value: HeadResource) -> Self {
        Self::Resource(value)
    }
}

/// What a command acts on: an explicit selector or a component whose
/// identity yields one.
#[derive(Clone)]
pub enum Target {
    Selector(String),
    Component(ComponentRef),
}

impl Target {
    /// Resolves the target to a selector string.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnresolvableSelector`] for a component with
    /// neither id nor name.
    pub fn resolve(&self) -> Result<String, CommandError> {
        match self {
            Self::Selector(selector) => Ok(selector.clone()),
            Self::Component(component) => selector_for(component.as_ref()),
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selector(selector) => formatter.debug_tuple("Selector").field(selector).finish(),
            Self::Component(component) => formatter
                .debug_tuple("Component")
                .field(&ComponentDebug(component.as_ref()))
                .finish(),
        }
    }
}

impl From<&str> for Target {
    fn from(value: &str) -> Self {
        Self::Selector(value.to_owned())
    }
}

impl From<String> for Target {
    fn from(value: String) -> Self {
        Self::Selector(value)
    }
}

impl From<ComponentRef> for Target {
    fn from(value: ComponentRef) -> Self {
        Self::Component(value)
    }
}

impl From<&ComponentRef> for Target {
    fn from(value: &ComponentRef) -> Self {
        Self::Component(ComponentRef::clone(value))
    }
}

/// A validated, immutable DOM-mutation instruction.
///
/// Build one with [`Command::builder`].
#[derive(Debug, Clone)]
pub struct Command {
    verb: Verb,
    selector: Option<String>,
    name: Option<String>,
    value: Option<String>,
    arguments: Vec<String>,
    content: Vec<Content>,
    character_data: bool,
}

impl Command {
    /// Starts building a command for `verb`.
    #[must_use]
    pub fn builder(verb: Verb) -> CommandBuilder {
        CommandBuilder::new(verb)
    }

    /// Creates the `addHeader` command batches use for hoisted resources.
    pub(crate) fn header(resources: Vec<HeadResource>) -> Self {
        Self {
            verb: Verb::AddHeader,
            selector: None,
            name: None,
            value: None,
            arguments: Vec::new(),
            content: resources.into_iter().map(Content::Resource).collect(),
            character_data: false,
        }
    }

    #[must_use]
    pub fn verb(&self) -> &Verb {
        &self.verb
    }

    #[must_use]
    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    #[must_use]
    pub fn content(&self) -> &[Content] {
        &self.content
    }

    /// Returns `true` when the payload is wrapped in a CDATA section.
    #[must_use]
    pub fn is_character_data(&self) -> bool {
        self.character_data || self.verb == Verb::Eval
    }

    /// Iterates the components carried as content.
    pub fn components(&self) -> impl Iterator<Item = &ComponentRef> {
        self.content.iter().filter_map(|item| match item {
            Content::Component(component) => Some(component),
            Content::Text(_) | Content::Resource(_) => None,
        })
    }

    /// Writes the command element.
    ///
    /// Attributes appear in the order `select`, `name`, `value`, `arg1`..`argN`.
    /// A command without content is self-closing.
    pub fn render(&self, buffer: &mut MarkupBuffer) {
        let tag = self.verb.as_str();
        buffer
            .element_start(tag)
            .append_attribute("select", self.selector.as_deref())
            .append_attribute("name", self.name.as_deref())
            .append_attribute("value", self.value.as_deref());
        for (index, argument) in self.arguments.iter().enumerate() {
            let attribute = format!("arg{}", index + 1);
            buffer.append_attribute(&attribute, Some(argument));
        }

        if self.content.is_empty() {
            buffer.element_end_self();
            return;
        }

        buffer.close_tag();
        let cdata = self.is_character_data();
        if cdata {
            buffer.append("<![CDATA[ ");
        }
        for item in &self.content {
            item.render(buffer);
            buffer.append("\n");
        }
        if cdata {
            buffer.append(" ]]>");
        }
        buffer.element_end(tag);
    }

    /// Renders the command into a new string.
    #[must_use]
    pub fn to_markup(&self) -> String {
        let mut buffer = MarkupBuffer::new();
        self.render(&mut buffer);
        buffer.into_string()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.to_markup())
    }
}

/// Accumulates command parts and validates them once in
/// [`build`](CommandBuilder::build).
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    verb: Verb,
    target: Option<Target>,
    name: Option<String>,
    value: Option<String>,
    arguments: Vec<String>,
    content: Vec<Content>,
    character_data: bool,
}

impl CommandBuilder {
    fn new(verb: Verb) -> Self {
        Self {
            verb,
            target: None,
            name: None,
            value: None,
            arguments: Vec::new(),
            content: Vec::new(),
            character_data: false,
        }
    }

    /// Sets the target selector or component.
    #[must_use]
    pub fn target(mut self, target: impl Into<Target>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Sets the `name`/`value` attribute pair.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self.value = Some(value.into());
        self
    }

    /// Appends a positional argument, rendered as `argN`.
    #[must_use]
    pub fn argument(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    /// Appends positional arguments.
    #[must_use]
    pub fn arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.extend(arguments.into_iter().map(Into::into));
        self
    }

    /// Appends a content item.
    #[must_use]
    pub fn content(mut self, item: impl Into<Content>) -> Self {
        self.content.push(item.into());
        self
    }

    /// Wraps the payload in a CDATA section.
    #[must_use]
    pub fn character_data(mut self, enabled: bool) -> Self {
        self.character_data = enabled;
        self
    }

    /// Validates the parts and produces an immutable [`Command`].
    ///
    /// Without an explicit target, the first component in the content
    /// supplies the selector.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] describing the first violated rule.
    pub fn build(self) -> Result<Command, CommandError> {
        let Self {
            verb,
            target,
            name,
            value,
            arguments,
            content,
            character_data,
        } = self;

        if let Verb::Custom(custom) = &verb {
            if custom.trim().is_empty() {
                return Err(CommandError::BlankVerb);
            }
        }

        let selector = match target {
            Some(target) => Some(target.resolve()?),
            None => content
                .iter()
                .find_map(|item| match item {
                    Content::Component(component) => Some(selector_for(component.as_ref())),
                    Content::Text(_) | Content::Resource(_) => None,
                })
                .transpose()?,
        }
        .filter(|selector| !selector.trim().is_empty());

        if verb.requires_selector() && selector.is_none() {
            return Err(CommandError::missing_selector(verb.as_str()));
        }

        let blank_text = content
            .iter()
            .any(|item| matches!(item, Content::Text(text) if text.trim().is_empty()));
        if blank_text {
            return Err(CommandError::blank_content(verb.as_str()));
        }

        if verb == Verb::Eval && !matches!(content.as_slice(), [Content::Text(_)]) {
            return Err(CommandError::EvalContent {
                found: content.len(),
            });
        }

        if verb == Verb::Attr && name.is_none() && arguments.is_empty() {
            return Err(CommandError::MissingAttribute {
                verb: verb.as_str().to_owned(),
            });
        }

        Ok(Command {
            verb,
            selector,
            name,
            value,
            arguments,
            content,
            character_data,
        })
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests use expect to surface construction failures"
)]
mod tests;
