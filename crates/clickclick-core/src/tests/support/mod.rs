//! Shared doubles for dispatcher tests.

mod page;
mod reporter;

pub use page::{
    PAGE_MARKUP, ScriptedPage, counter_behavior, normalise, refresh_behavior, widget,
};
pub use reporter::{DispatchEvent, RecordingDispatchReporter};
