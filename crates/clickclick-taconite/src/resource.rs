//! Head resources a component can declare: script and style imports plus
//! inline scripts and styles.

use crate::markup::MarkupBuffer;

const CDATA_OPEN: &str = "/*<![CDATA[*/";
const CDATA_CLOSE: &str = "/*]]>*/";
const DOM_READY_OPEN: &str = "Click.addLoadEvent(function(){";
const DOM_READY_CLOSE: &str = "});";

/// A resource destined for the document head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadResource {
    /// External script, unique by URL.
    ScriptImport(ScriptImport),
    /// Inline script block.
    InlineScript(InlineScript),
    /// External stylesheet, unique by URL.
    StyleImport(StyleImport),
    /// Inline style block.
    InlineStyle(InlineStyle),
}

/// Identity used to deduplicate head resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ResourceKey {
    Script(String),
    Style(String),
    InlineScript(String),
    InlineStyle(String),
}

impl HeadResource {
    /// Creates an external script import.
    #[must_use]
    pub fn script_import(src: impl Into<String>) -> Self {
        Self::ScriptImport(ScriptImport { src: src.into() })
    }

    /// Creates an external stylesheet import.
    #[must_use]
    pub fn style_import(href: impl Into<String>) -> Self {
        Self::StyleImport(StyleImport { href: href.into() })
    }

    /// Returns the deduplication key, or `None` for anonymous inline blocks.
    pub(crate) fn key(&self) -> Option<ResourceKey> {
        match self {
            Self::ScriptImport(import) => Some(ResourceKey::Script(import.src.clone())),
            Self::StyleImport(import) => Some(ResourceKey::Style(import.href.clone())),
            Self::InlineScript(script) => script.id.clone().map(ResourceKey::InlineScript),
            Self::InlineStyle(style) => style.id.clone().map(ResourceKey::InlineStyle),
        }
    }

    /// Writes the resource's markup.
    pub fn render(&self, buffer: &mut MarkupBuffer) {
        match self {
            Self::ScriptImport(import) => import.render(buffer),
            Self::InlineScript(script) => script.render(buffer),
            Self::StyleImport(import) => import.render(buffer),
            Self::InlineStyle(style) => style.render(buffer),
        }
    }

    /// Renders the resource into a new string.
    #[must_use]
    pub fn to_markup(&self) -> String {
        let mut buffer = MarkupBuffer::new();
        self.render(&mut buffer);
        buffer.into_string()
    }
}

impl From<ScriptImport> for HeadResource {
    fn from(value: ScriptImport) -> Self {
        Self::ScriptImport(value)
    }
}

impl From<InlineScript> for HeadResource {
    fn from(value: InlineScript) -> Self {
        Self::InlineScript(value)
    }
}

impl From<StyleImport> for HeadResource {
    fn from(value: StyleImport) -> Self {
        Self::StyleImport(value)
    }
}

impl From<InlineStyle> for HeadResource {
    fn from(value: InlineStyle) -> Self {
        Self::InlineStyle(value)
    }
}

/// `<script type="text/javascript" src="..."></script>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptImport {
    src: String,
}

impl ScriptImport {
    /// Returns the script URL.
    #[must_use]
    pub fn src(&self) -> &str {
        &self.src
    }

    fn render(&self, buffer: &mut MarkupBuffer) {
        buffer
            .element_start("script")
            .append_attribute("type", Some("text/javascript"))
            .append_attribute("src", Some(&self.src))
            .close_tag()
            .element_end("script");
    }
}

/// `<link type="text/css" rel="stylesheet" href="..."/>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleImport {
    href: String,
}

impl StyleImport {
    /// Returns the stylesheet URL.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    fn render(&self, buffer: &mut MarkupBuffer) {
        buffer
            .element_start("link")
            .append_attribute("type", Some("text/css"))
            .append_attribute("rel", Some("stylesheet"))
            .append_attribute("href", Some(&self.href))
            .element_end_self();
    }
}

/// Inline `<script>` block.
///
/// Scripts flagged to run when the page is ready are wrapped in a load-event
/// registration. That flag is meaningless for a partial response, where the
/// page is already loaded, so batches strip it along with the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineScript {
    id: Option<String>,
    content: String,
    execute_on_dom_ready: bool,
    character_data: bool,
}

impl InlineScript {
    /// Creates an anonymous inline script.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: None,
            content: content.into(),
            execute_on_dom_ready: false,
            character_data: false,
        }
    }

    /// Sets the element id, which also makes the script deduplicable.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Marks the script to run once the page has loaded.
    #[must_use]
    pub fn on_dom_ready(mut self) -> Self {
        self.execute_on_dom_ready = true;
        self
    }

    /// Wraps the content in a commented character-data section.
    #[must_use]
    pub fn with_character_data(mut self) -> Self {
        self.character_data = true;
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn executes_on_dom_ready(&self) -> bool {
        self.execute_on_dom_ready
    }

    #[must_use]
    pub fn is_character_data(&self) -> bool {
        self.character_data
    }

    /// Prepares the script for delivery inside a partial response.
    pub(crate) fn prepare_for_batch(&mut self) {
        self.character_data = true;
        if self.execute_on_dom_ready {
            self.execute_on_dom_ready = false;
            self.id = None;
        }
    }

    fn render(&self, buffer: &mut MarkupBuffer) {
        buffer
            .element_start("script")
            .append_attribute("type", Some("text/javascript"))
            .append_attribute("id", self.id.as_deref())
            .close_tag()
            .append("\n");
        if self.character_data {
            buffer.append(CDATA_OPEN).append("\n");
        }
        if self.execute_on_dom_ready {
            buffer.append(DOM_READY_OPEN).append("\n");
        }
        buffer.append(&self.content);
        if self.execute_on_dom_ready {
            buffer.append("\n").append(DOM_READY_CLOSE);
        }
        if self.character_data {
            buffer.append("\n").append(CDATA_CLOSE);
        }
        buffer.append("\n").element_end("script");
    }
}

/// Inline `<style>` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineStyle {
    id: Option<String>,
    content: String,
    character_data: bool,
}

impl InlineStyle {
    /// Creates an anonymous inline style.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: None,
            content: content.into(),
            character_data: false,
        }
    }

    /// Sets the element id, which also makes the style deduplicable.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Wraps the content in a commented character-data section.
    #[must_use]
    pub fn with_character_data(mut self) -> Self {
        self.character_data = true;
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn is_character_data(&self) -> bool {
        self.character_data
    }

    pub(crate) fn prepare_for_batch(&mut self) {
        self.character_data = true;
    }

    fn render(&self, buffer: &mut MarkupBuffer) {
        buffer
            .element_start("style")
            .append_attribute("type", Some("text/css"))
            .append_attribute("id", self.id.as_deref())
            .close_tag()
            .append("\n");
        if self.character_data {
            buffer.append(CDATA_OPEN).append("\n");
        }
        buffer.append(&self.content);
        if self.character_data {
            buffer.append("\n").append(CDATA_CLOSE);
        }
        buffer.append("\n").element_end("style");
    }
}
