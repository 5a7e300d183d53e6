//! Unit tests for phase ordering, guards and registration rules.

use std::cell::RefCell;
use std::rc::Rc;

use clickclick_taconite::MarkupComponent;
use rstest::{fixture, rstest};

use super::*;
use crate::listener::{ListenerError, partial_listener};
use crate::request::Method;

type Log = Rc<RefCell<Vec<String>>>;

#[fixture]
fn registry() -> EventPhaseRegistry {
    EventPhaseRegistry::new(AjaxRequest::new(Method::Get), AjaxSettings::default())
}

#[fixture]
fn log() -> Log {
    Rc::default()
}

fn component(id: &str) -> ComponentRef {
    MarkupComponent::new(format!("<div id=\"{id}\"/>"))
        .with_id(id)
        .into_ref()
}

fn recorder(
    log: &Log,
    label: &str,
    result: bool,
) -> impl Fn(&ComponentRef, &mut EventPhaseRegistry) -> Result<bool, ListenerError> + 'static {
    let log = Rc::clone(log);
    let label = label.to_owned();
    move |_source: &ComponentRef, _registry: &mut EventPhaseRegistry| {
        log.borrow_mut().push(label.clone());
        Ok(result)
    }
}

fn noop(_source: &ComponentRef, _registry: &mut EventPhaseRegistry) -> Result<bool, ListenerError> {
    Ok(true)
}

#[rstest]
fn registering_the_same_component_twice_keeps_one_entry(mut registry: EventPhaseRegistry) {
    let button = component("save");
    assert!(registry.register_ajax(AjaxBehavior::new(Rc::clone(&button), noop)));
    assert!(!registry.register_ajax(AjaxBehavior::new(Rc::clone(&button), noop)));
    assert_eq!(registry.ajax_behaviors().len(), 1);
}

#[rstest]
fn distinct_components_keep_registration_order(mut registry: EventPhaseRegistry) {
    for id in ["a", "b", "c"] {
        registry.register_ajax(AjaxBehavior::new(component(id), noop));
    }
    let ids: Vec<Option<&str>> = registry
        .ajax_behaviors()
        .iter()
        .map(|behavior| behavior.component().id())
        .collect();
    assert_eq!(ids, [Some("a"), Some("b"), Some("c")]);
}

#[rstest]
fn listeners_fire_in_registration_order(mut registry: EventPhaseRegistry, log: Log) {
    let source = component("src");
    for label in ["A", "B", "C"] {
        registry
            .register(&source, EventPhase::PostProcess, recorder(&log, label, true))
            .expect("registration succeeds");
    }

    let proceed = registry.fire(EventPhase::PostProcess).expect("fire succeeds");

    assert!(proceed);
    assert_eq!(*log.borrow(), ["A", "B", "C"]);
}

#[rstest]
fn halting_listener_does_not_stop_later_listeners(mut registry: EventPhaseRegistry, log: Log) {
    let source = component("src");
    registry
        .register(&source, EventPhase::PostProcess, recorder(&log, "A", false))
        .expect("registration succeeds");
    registry
        .register(&source, EventPhase::PostProcess, recorder(&log, "B", true))
        .expect("registration succeeds");

    let proceed = registry.fire(EventPhase::PostProcess).expect("fire succeeds");

    assert!(!proceed);
    assert_eq!(*log.borrow(), ["A", "B"]);
}

#[rstest]
fn late_pre_process_registration_fires_once(mut registry: EventPhaseRegistry, log: Log) {
    let source = component("src");
    registry.fire(EventPhase::PreProcess).expect("fire succeeds");

    registry
        .register(&source, EventPhase::PreProcess, recorder(&log, "late", true))
        .expect("registration succeeds");
    assert_eq!(*log.borrow(), ["late"]);

    registry.fire(EventPhase::PostProcess).expect("fire succeeds");
    assert_eq!(log.borrow().len(), 1);
}

#[rstest]
fn early_pre_process_registration_waits_for_fire(mut registry: EventPhaseRegistry, log: Log) {
    let source = component("src");
    registry
        .register(&source, EventPhase::PreProcess, recorder(&log, "early", true))
        .expect("registration succeeds");
    assert!(log.borrow().is_empty());

    registry.fire(EventPhase::PreProcess).expect("fire succeeds");
    assert_eq!(*log.borrow(), ["early"]);
}

#[rstest]
fn late_post_process_registration_is_only_stored(mut registry: EventPhaseRegistry, log: Log) {
    let source = component("src");
    registry.fire(EventPhase::PostProcess).expect("fire succeeds");
    registry
        .register(&source, EventPhase::PostProcess, recorder(&log, "late", true))
        .expect("registration succeeds");

    assert!(log.borrow().is_empty());
    assert_eq!(registry.listener_count(EventPhase::PostProcess), 1);
}

#[rstest]
fn post_render_fires_at_most_once(mut registry: EventPhaseRegistry, log: Log) {
    let source = component("src");
    registry
        .register(&source, EventPhase::PostRender, recorder(&log, "render", true))
        .expect("registration succeeds");

    registry.fire(EventPhase::PostRender).expect("first fire");
    registry.fire(EventPhase::PostRender).expect("second fire");

    assert_eq!(log.borrow().len(), 1);
    assert!(registry.post_render_fired());
}

#[rstest]
fn listener_failure_propagates_with_phase(mut registry: EventPhaseRegistry) {
    let source = component("broken");
    registry
        .register(
            &source,
            EventPhase::PostProcess,
            |_: &ComponentRef, _: &mut EventPhaseRegistry| -> Result<bool, ListenerError> {
                Err(ListenerError::failed("boom"))
            },
        )
        .expect("registration succeeds");

    let error = registry
        .fire(EventPhase::PostProcess)
        .expect_err("listener fails");

    assert_eq!(error.phase, EventPhase::PostProcess);
    assert_eq!(error.component, "#broken");
    assert_eq!(error.to_string(), "post_process listener registered by #broken failed");
}

#[rstest]
fn mark_error_occurred_clears_state_without_firing(mut registry: EventPhaseRegistry, log: Log) {
    let source = component("src");
    registry.register_ajax(AjaxBehavior::new(Rc::clone(&source), noop));
    registry
        .register(&source, EventPhase::PostRender, recorder(&log, "render", true))
        .expect("registration succeeds");
    registry.fire(EventPhase::PreProcess).expect("fire succeeds");
    registry.attach(MutationBatch::new());

    registry.mark_error_occurred();

    assert!(!registry.has_ajax_components());
    assert_eq!(registry.listener_count(EventPhase::PostRender), 0);
    assert_eq!(registry.pending_batches(), 0);
    assert_eq!(registry.last_fired(), None);
    assert!(log.borrow().is_empty());
}

#[rstest]
fn clear_resets_post_render_guard(mut registry: EventPhaseRegistry) {
    registry.fire(EventPhase::PostRender).expect("fire succeeds");
    registry.mark_error_occurred();
    assert!(registry.post_render_fired());

    registry.clear();
    assert!(!registry.post_render_fired());
}

#[rstest]
fn batches_drain_in_attachment_order(mut registry: EventPhaseRegistry) {
    let mut first = MutationBatch::new();
    first.hide("#one").expect("hide builds");
    let mut second = MutationBatch::new();
    second.show("#two").expect("show builds");
    registry.attach(first);
    registry.attach(second);

    let drained = registry.take_batches();

    let selectors: Vec<Option<&str>> = drained
        .iter()
        .flat_map(MutationBatch::commands)
        .map(|command| command.selector())
        .collect();
    assert_eq!(selectors, [Some("#one"), Some("#two")]);
    assert_eq!(registry.pending_batches(), 0);
}

#[rstest]
fn partial_listener_attaches_batch_and_halts(mut registry: EventPhaseRegistry) {
    let source = component("counter");
    registry
        .register(
            &source,
            EventPhase::PostProcess,
            partial_listener(|source: &ComponentRef, _: &mut EventPhaseRegistry| {
                let mut batch = MutationBatch::new();
                batch.replace_content(source, "5")?;
                Ok(Some(batch))
            }),
        )
        .expect("registration succeeds");

    let proceed = registry.fire(EventPhase::PostProcess).expect("fire succeeds");

    assert!(!proceed);
    assert_eq!(registry.pending_batches(), 1);
}

#[rstest]
fn partial_listener_without_batch_continues(mut registry: EventPhaseRegistry) {
    let source = component("counter");
    registry
        .register(
            &source,
            EventPhase::PostProcess,
            partial_listener(|_: &ComponentRef, _: &mut EventPhaseRegistry| Ok(None)),
        )
        .expect("registration succeeds");

    assert!(registry.fire(EventPhase::PostProcess).expect("fire succeeds"));
    assert_eq!(registry.pending_batches(), 0);
}
