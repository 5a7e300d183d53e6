//! Ordered command batches and their `<taconite>` serialization.

use std::io::{self, Write};

use tracing::debug;

use crate::command::{Command, Content, Target, Verb};
use crate::component::ComponentRef;
use crate::errors::CommandError;
use crate::head::{HeadResourceSet, HeadSplit};
use crate::markup::MarkupBuffer;
use crate::resource::HeadResource;

/// Tracing target for batch serialization.
pub const BATCH_TARGET: &str = "clickclick_taconite::batch";

/// Content type of a serialized batch.
pub const CONTENT_TYPE: &str = "text/xml";

/// Root element of a serialized batch.
pub const ROOT_TAG: &str = "taconite";

/// An ordered list of commands answering one Ajax request.
///
/// Commands execute client-side in list order. Serializing the batch hoists
/// the head resources of every component in it into `addHeader` commands:
/// styles and script imports ahead of the mutations, inline scripts after.
#[derive(Debug, Clone, Default)]
pub struct MutationBatch {
    commands: Vec<Command>,
}

impl MutationBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a prebuilt command.
    pub fn push(&mut self, command: Command) -> &mut Self {
        self.commands.push(command);
        self
    }

    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn targeted(
        &mut self,
        verb: Verb,
        target: impl Into<Target>,
        content: Option<Content>,
    ) -> Result<&mut Self, CommandError> {
        let mut builder = Command::builder(verb).target(target);
        if let Some(content) = content {
            builder = builder.content(content);
        }
        Ok(self.push(builder.build()?))
    }

    /// Appends content inside the target.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] when the command fails validation.
    pub fn append(
        &mut self,
        target: impl Into<Target>,
        content: impl Into<Content>,
    ) -> Result<&mut Self, CommandError> {
        self.targeted(Verb::Append, target, Some(content.into()))
    }

    /// Prepends content inside the target.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] when the command fails validation.
    pub fn prepend(
        &mut self,
        target: impl Into<Target>,
        content: impl Into<Content>,
    ) -> Result<&mut Self, CommandError> {
        self.targeted(Verb::Prepend, target, Some(content.into()))
    }

    /// Inserts content after the target.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] when the command fails validation.
    pub fn after(
        &mut self,
        target: impl Into<Target>,
        content: impl Into<Content>,
    ) -> Result<&mut Self, CommandError> {
        self.targeted(Verb::After, target, Some(content.into()))
    }

    /// Inserts content before the target.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] when the command fails validation.
    pub fn before(
        &mut self,
        target: impl Into<Target>,
        content: impl Into<Content>,
    ) -> Result<&mut Self, CommandError> {
        self.targeted(Verb::Before, target, Some(content.into()))
    }

    /// Replaces the target element.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] when the command fails validation.
    pub fn replace(
        &mut self,
        target: impl Into<Target>,
        content: impl Into<Content>,
    ) -> Result<&mut Self, CommandError> {
        self.targeted(Verb::Replace, target, Some(content.into()))
    }

    /// Replaces a component's element with its fresh rendering.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnresolvableSelector`] for a component with
    /// neither id nor name.
    pub fn replace_with_self(
        &mut self,
        component: &ComponentRef,
    ) -> Result<&mut Self, CommandError> {
        self.replace(component, component)
    }

    /// Replaces the children of the target.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] when the command fails validation.
    pub fn replace_content(
        &mut self,
        target: impl Into<Target>,
        content: impl Into<Content>,
    ) -> Result<&mut Self, CommandError> {
        self.targeted(Verb::ReplaceContent, target, Some(content.into()))
    }

    /// Replaces the children of a component's element with its rendering.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnresolvableSelector`] for a component with
    /// neither id nor name.
    pub fn replace_content_with_self(
        &mut self,
        component: &ComponentRef,
    ) -> Result<&mut Self, CommandError> {
        self.replace_content(component, component)
    }

    /// Sets one attribute on the target.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] when the command fails validation.
    pub fn attr(
        &mut self,
        target: impl Into<Target>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self, CommandError> {
        let command = Command::builder(Verb::Attr)
            .target(target)
            .attribute(name, value)
            .build()?;
        Ok(self.push(command))
    }

    /// Sets attributes on the target from positional `name, value, ...`
    /// arguments.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::MissingAttribute`] when no arguments are given.
    pub fn attrs<I, S>(
        &mut self,
        target: impl Into<Target>,
        arguments: I,
    ) -> Result<&mut Self, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command = Command::builder(Verb::Attr)
            .target(target)
            .arguments(arguments)
            .build()?;
        Ok(self.push(command))
    }

    /// Wraps the target in the given markup.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] when the command fails validation.
    pub fn wrap(
        &mut self,
        target: impl Into<Target>,
        content: impl Into<Content>,
    ) -> Result<&mut Self, CommandError> {
        self.targeted(Verb::Wrap, target, Some(content.into()))
    }

    /// Hides the target.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] when the target cannot be resolved.
    pub fn hide(&mut self, target: impl Into<Target>) -> Result<&mut Self, CommandError> {
        self.targeted(Verb::Hide, target, None)
    }

    /// Shows the target.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] when the target cannot be resolved.
    pub fn show(&mut self, target: impl Into<Target>) -> Result<&mut Self, CommandError> {
        self.targeted(Verb::Show, target, None)
    }

    /// Removes the target.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] when the target cannot be resolved.
    pub fn remove(&mut self, target: impl Into<Target>) -> Result<&mut Self, CommandError> {
        self.targeted(Verb::Remove, target, None)
    }

    /// Removes the target's children.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] when the target cannot be resolved.
    pub fn empty(&mut self, target: impl Into<Target>) -> Result<&mut Self, CommandError> {
        self.targeted(Verb::Empty, target, None)
    }

    /// Evaluates a script on the client.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::BlankContent`] for a blank script.
    pub fn eval(&mut self, script: impl Into<String>) -> Result<&mut Self, CommandError> {
        let command = Command::builder(Verb::Eval)
            .content(script.into())
            .build()?;
        Ok(self.push(command))
    }

    /// Adds a resource to the document head.
    pub fn add_header(&mut self, resource: impl Into<HeadResource>) -> &mut Self {
        self.add_headers([resource.into()])
    }

    /// Adds resources to the document head in one command.
    pub fn add_headers<I>(&mut self, resources: I) -> &mut Self
    where
        I: IntoIterator<Item = HeadResource>,
    {
        let resources: Vec<HeadResource> = resources.into_iter().collect();
        if resources.is_empty() {
            return self;
        }
        self.push(Command::header(resources))
    }

    /// Adds a contentless command with a custom verb.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::BlankVerb`] for a blank verb, or an error when
    /// the target cannot be resolved.
    pub fn create(
        &mut self,
        verb: &str,
        target: impl Into<Target>,
    ) -> Result<&mut Self, CommandError> {
        let verb = verb.parse::<Verb>()?;
        self.targeted(verb, target, None)
    }

    /// Hoists component head resources into `addHeader` commands.
    fn process_head_elements(&mut self) {
        let resources: HeadResourceSet = self
            .commands
            .iter()
            .flat_map(Command::components)
            .flat_map(|component| component.head_resources())
            .collect();
        if resources.is_empty() {
            return;
        }

        let HeadSplit {
            mut leading,
            mut trailing,
        } = resources.split_for_batch();
        prepare_for_batch(&mut leading);
        prepare_for_batch(&mut trailing);
        debug!(
            target: BATCH_TARGET,
            commands = self.commands.len(),
            leading = leading.len(),
            trailing = trailing.len(),
            "hoisted head resources"
        );

        if !leading.is_empty() {
            self.commands.insert(0, Command::header(leading));
        }
        if !trailing.is_empty() {
            self.commands.push(Command::header(trailing));
        }
    }

    /// Serializes the batch into `buffer`.
    pub fn render(mut self, buffer: &mut MarkupBuffer) {
        self.process_head_elements();
        buffer.element_start(ROOT_TAG).close_tag().append("\n");
        for command in &self.commands {
            command.render(buffer);
            buffer.append("\n");
        }
        buffer.element_end(ROOT_TAG);
    }

    /// Serializes the batch into a new string.
    #[must_use]
    pub fn into_markup(self) -> String {
        let mut buffer = MarkupBuffer::new();
        self.render(&mut buffer);
        buffer.into_string()
    }

    /// Serializes the batch to a writer.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the writer.
    pub fn write_to<W: Write + ?Sized>(self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.into_markup().as_bytes())
    }
}

impl Extend<Command> for MutationBatch {
    fn extend<T: IntoIterator<Item = Command>>(&mut self, iter: T) {
        self.commands.extend(iter);
    }
}

impl FromIterator<Command> for MutationBatch {
    fn from_iter<T: IntoIterator<Item = Command>>(iter: T) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}

fn prepare_for_batch(resources: &mut [HeadResource]) {
    for resource in resources {
        match resource {
            HeadResource::InlineScript(script) => script.prepare_for_batch(),
            HeadResource::InlineStyle(style) => style.prepare_for_batch(),
            HeadResource::ScriptImport(_) | HeadResource::StyleImport(_) => {}
        }
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests use expect to surface construction failures"
)]
mod tests {
    use super::*;
    use crate::component::MarkupComponent;

    #[test]
    fn empty_batch_serializes_to_bare_root() {
        assert_eq!(MutationBatch::new().into_markup(), "<taconite>\n</taconite>");
    }

    #[test]
    fn builders_record_commands_in_order() {
        let mut batch = MutationBatch::new();
        batch
            .hide("#a")
            .and_then(|batch| batch.show("#b"))
            .and_then(|batch| batch.eval("go();"))
            .expect("commands build");
        let verbs: Vec<&str> = batch.commands().iter().map(|c| c.verb().as_str()).collect();
        assert_eq!(verbs, ["hide", "show", "eval"]);
    }

    #[test]
    fn failed_builder_leaves_batch_unchanged() {
        let mut batch = MutationBatch::new();
        let anonymous = MarkupComponent::new("<p/>").into_ref();
        batch.remove(&anonymous).expect_err("no selector");
        assert!(batch.is_empty());
    }

    #[test]
    fn create_accepts_custom_verbs() {
        let mut batch = MutationBatch::new();
        batch.create("highlight", "#row").expect("custom verb");
        assert_eq!(
            batch.into_markup(),
            "<taconite>\n<highlight select=\"#row\"/>\n</taconite>"
        );
    }

    #[test]
    fn create_rejects_blank_verb() {
        let mut batch = MutationBatch::new();
        let error = batch.create(" ", "#row").expect_err("blank verb");
        assert_eq!(error, CommandError::BlankVerb);
    }

    #[test]
    fn explicit_add_headers_are_not_hoisted() {
        let mut batch = MutationBatch::new();
        batch.add_header(HeadResource::style_import("/x.css"));
        batch.add_headers(Vec::new());
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.commands().first().map(Command::selector), Some(None));
    }

    #[test]
    fn replace_with_self_targets_component_identity() {
        let component = MarkupComponent::new("<div id=\"w\"/>").with_id("w").into_ref();
        let mut batch = MutationBatch::new();
        batch.replace_with_self(&component).expect("replace builds");
        assert_eq!(
            batch.into_markup(),
            "<taconite>\n<replace select=\"#w\"><div id=\"w\"/>\n</replace>\n</taconite>"
        );
    }

    #[test]
    fn attrs_use_positional_arguments() {
        let mut batch = MutationBatch::new();
        batch
            .attrs("#f", ["disabled", "disabled"])
            .expect("attrs build");
        assert_eq!(
            batch.into_markup(),
            "<taconite>\n<attr select=\"#f\" arg1=\"disabled\" arg2=\"disabled\"/>\n</taconite>"
        );
    }
}
