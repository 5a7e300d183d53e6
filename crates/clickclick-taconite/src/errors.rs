//! Errors raised while constructing Taconite commands.

use thiserror::Error;

/// Usage errors surfaced when a [`Command`](crate::Command) is built.
///
/// These are raised at the call site constructing the command, never at
/// render time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// A custom verb was blank.
    #[error("command verb must not be blank")]
    BlankVerb,

    /// The verb needs a target selector and none was given or derivable.
    #[error("'{verb}' command requires a target selector")]
    MissingSelector { verb: String },

    /// A component was used as a target but has neither id nor name.
    #[error("no selector could be derived for component (id: {id:?}, name: {name:?})")]
    UnresolvableSelector {
        id: Option<String>,
        name: Option<String>,
    },

    /// A text content item was blank.
    #[error("'{verb}' command content must not be blank")]
    BlankContent { verb: String },

    /// An `eval` command did not carry exactly one script.
    #[error("eval command requires exactly one script, found {found} content items")]
    EvalContent { found: usize },

    /// An `attr` command had neither a name/value pair nor arguments.
    #[error("'{verb}' command requires a name/value pair or attribute arguments")]
    MissingAttribute { verb: String },
}

impl CommandError {
    /// Creates a missing selector error for the given verb.
    pub(crate) fn missing_selector(verb: impl Into<String>) -> Self {
        Self::MissingSelector { verb: verb.into() }
    }

    /// Creates a blank content error for the given verb.
    pub(crate) fn blank_content(verb: impl Into<String>) -> Self {
        Self::BlankContent { verb: verb.into() }
    }
}
