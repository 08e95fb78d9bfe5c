//! Prelude for the `bevy_conversations` crate.
pub use super::{ConversationsPlugin, SavedDialogs};
pub use super::{
    asset::loader::*,
    context::*,
    conversation::*,
    engine::*,
    errors::*,
    graph::{builder::*, ids::*, *},
    localization::*,
    notifications::*,
    requirements::*,
};
