//! Request lifecycle phases listeners can subscribe to.

use strum::{Display, EnumString};
use thiserror::Error;

use crate::listener::ListenerError;

/// A point in the request lifecycle at which listeners fire.
///
/// Phases are ordered: `PreProcess < PostProcess < PostRender`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum EventPhase {
    /// After page initialisation and before any parameter processing. Fires
    /// for every request.
    PreProcess,
    /// After targeted components have processed.
    PostProcess,
    /// After rendering, or just before a partial response is written. Fires
    /// at most once per request.
    PostRender,
}

/// A listener failed while a phase was firing.
#[derive(Debug, Error)]
#[error("{phase} listener registered by {component} failed")]
pub struct PhaseError {
    /// The phase being fired.
    pub phase: EventPhase,
    /// Description of the listener's source component.
    pub component: String,
    #[source]
    pub source: ListenerError,
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests use expect to surface unexpected failures"
)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn phases_are_ordered() {
        assert!(EventPhase::PreProcess < EventPhase::PostProcess);
        assert!(EventPhase::PostProcess < EventPhase::PostRender);
    }

    #[rstest]
    #[case(EventPhase::PreProcess, "pre_process")]
    #[case(EventPhase::PostProcess, "post_process")]
    #[case(EventPhase::PostRender, "post_render")]
    fn phases_display_in_snake_case(#[case] phase: EventPhase, #[case] expected: &str) {
        assert_eq!(phase.to_string(), expected);
        assert_eq!(expected.parse::<EventPhase>().expect("phase parses"), phase);
    }
}
