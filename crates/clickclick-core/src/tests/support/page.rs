//! Configurable page used to drive the dispatcher through scripted requests.

use std::cell::RefCell;
use std::rc::Rc;

use clickclick_taconite::{ComponentRef, HeadResource, MarkupBuffer, MarkupComponent, MutationBatch};

use crate::behavior::AjaxBehavior;
use crate::dispatch::LifecycleStage;
use crate::listener::{ListenerError, PhaseListener};
use crate::page::Page;
use crate::phase::EventPhase;
use crate::registry::EventPhaseRegistry;
use crate::request::AjaxRequest;

pub const PAGE_MARKUP: &str = "<html><body><span id=\"counter\">4</span></body></html>";

type Listener = (ComponentRef, EventPhase, Rc<dyn PhaseListener>);

/// Page whose hooks record their invocation and follow a script.
#[derive(Default)]
pub struct ScriptedPage {
    log: Rc<RefCell<Vec<String>>>,
    behaviors: Vec<AjaxBehavior>,
    listeners: Vec<Listener>,
    deny: bool,
    halt_processing: bool,
    fail_at: Option<LifecycleStage>,
}

impl ScriptedPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(mut self, behavior: AjaxBehavior) -> Self {
        self.behaviors.push(behavior);
        self
    }

    pub fn with_listener(
        mut self,
        source: ComponentRef,
        phase: EventPhase,
        listener: impl PhaseListener + 'static,
    ) -> Self {
        let listener: Rc<dyn PhaseListener> = Rc::new(listener);
        self.listeners.push((source, phase, listener));
        self
    }

    pub fn denying(mut self) -> Self {
        self.deny = true;
        self
    }

    pub fn halting_processing(mut self) -> Self {
        self.halt_processing = true;
        self
    }

    pub fn failing_at(mut self, stage: LifecycleStage) -> Self {
        self.fail_at = Some(stage);
        self
    }

    /// Returns the hooks invoked so far.
    pub fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    /// Returns a handle for listeners that want to append to the hook log.
    pub fn log_handle(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.log)
    }

    fn enter(&self, hook: &str, stage: Option<LifecycleStage>) -> Result<(), ListenerError> {
        self.log.borrow_mut().push(hook.to_owned());
        match (stage, self.fail_at) {
            (Some(stage), Some(failing)) if stage == failing => {
                Err(ListenerError::failed(format!("{hook} exploded")))
            }
            _ => Ok(()),
        }
    }
}

impl Page for ScriptedPage {
    fn on_security_check(&mut self, _request: &AjaxRequest) -> bool {
        self.log.borrow_mut().push("security_check".to_owned());
        !self.deny
    }

    fn on_init(&mut self, registry: &mut EventPhaseRegistry) -> Result<(), ListenerError> {
        self.enter("init", Some(LifecycleStage::Init))?;
        for behavior in &self.behaviors {
            registry.register_ajax(behavior.clone());
        }
        for (source, phase, listener) in &self.listeners {
            registry
                .register_shared(source, *phase, Rc::clone(listener))
                .map_err(|error| ListenerError::with_source("listener registration failed", error))?;
        }
        Ok(())
    }

    fn on_process(&mut self, _registry: &mut EventPhaseRegistry) -> Result<bool, ListenerError> {
        self.enter("process", Some(LifecycleStage::Process))?;
        Ok(!self.halt_processing)
    }

    fn on_get(&mut self, _registry: &mut EventPhaseRegistry) -> Result<(), ListenerError> {
        self.enter("get", Some(LifecycleStage::Get))
    }

    fn on_post(&mut self, _registry: &mut EventPhaseRegistry) -> Result<(), ListenerError> {
        self.enter("post", Some(LifecycleStage::Post))
    }

    fn on_render(&mut self, _registry: &mut EventPhaseRegistry) -> Result<(), ListenerError> {
        self.enter("render", Some(LifecycleStage::Render))
    }

    fn render(&self, buffer: &mut MarkupBuffer) -> Result<(), ListenerError> {
        self.enter("page_render", Some(LifecycleStage::PageRender))?;
        buffer.append(PAGE_MARKUP);
        Ok(())
    }
}

/// A link with id `link_id` whose handler replaces the counter with `5`.
pub fn counter_behavior() -> AjaxBehavior {
    let link = MarkupComponent::new("<a id=\"link_id\" href=\"#\">+1</a>")
        .with_id("link_id")
        .into_ref();
    AjaxBehavior::new(
        link,
        |_: &ComponentRef, registry: &mut EventPhaseRegistry| -> Result<bool, ListenerError> {
            let mut batch = MutationBatch::new();
            batch.replace_content("#counter", "5")?;
            registry.attach(batch);
            Ok(true)
        },
    )
}

/// A component with id `id` declaring `resources`.
pub fn widget(id: &str, resources: Vec<HeadResource>) -> ComponentRef {
    resources
        .into_iter()
        .fold(
            MarkupComponent::new(format!("<div id=\"{id}\">{id}</div>")).with_id(id),
            |component, resource| component.with_resource(resource),
        )
        .into_ref()
}

/// A button named `trigger` whose handler answers with one batch replacing
/// every widget with its fresh rendering.
pub fn refresh_behavior(trigger: &str, widgets: Vec<ComponentRef>) -> AjaxBehavior {
    let button = MarkupComponent::new(format!("<button name=\"{trigger}\">go</button>"))
        .with_name(trigger)
        .into_ref();
    AjaxBehavior::new(
        button,
        move |_: &ComponentRef, registry: &mut EventPhaseRegistry| -> Result<bool, ListenerError> {
            let mut batch = MutationBatch::new();
            for widget in &widgets {
                batch.replace_with_self(widget)?;
            }
            registry.attach(batch);
            Ok(true)
        },
    )
}

/// Removes newlines so markup can be compared independent of layout.
pub fn normalise(markup: &str) -> String {
    markup.replace('\n', "")
}
