//! Taconite: a declarative command protocol for partial page updates.
//!
//! A [`MutationBatch`] holds ordered [`Command`]s, each naming a DOM
//! mutation, a target selector and an optional payload. Serializing the batch
//! produces a `<taconite>` document that the client-side runtime executes in
//! order:
//!
//! ```text
//! <taconite>
//! <addHeader><script type="text/javascript" src="/clickclick/jquery.js"></script>
//! </addHeader>
//! <replaceContent select="#counter">5
//! </replaceContent>
//! </taconite>
//! ```
//!
//! Head resources declared by components in the batch are deduplicated and
//! hoisted into synthetic `addHeader` commands during serialization.

mod batch;
mod command;
mod component;
mod errors;
mod head;
mod markup;
mod resource;

pub use batch::{BATCH_TARGET, CONTENT_TYPE, MutationBatch, ROOT_TAG};
pub use command::{Command, CommandBuilder, Content, Target, Verb};
pub use component::{Component, ComponentRef, MarkupComponent, render_to_string, selector_for};
pub use errors::CommandError;
pub use head::{HeadResourceSet, HeadSplit};
pub use markup::{MarkupBuffer, escape_markup};
pub use resource::{HeadResource, InlineScript, InlineStyle, ScriptImport, StyleImport};
