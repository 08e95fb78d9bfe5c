//! Types used by the ron loader.
//!
//! The file mirrors the arena: dialogs are listed flat and options name their
//! target by id, so the nesting of the file does not grow with the story.

use serde::Deserialize;

use crate::prelude::{
    DialogId, DialogNode, DialogOption, LocalizedText, Notification, OptionTarget, Requirement,
    RequirementMode,
};

/// The ron dialog asset type.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct RonDialogCollection {
    /// The dialogs that can start a conversation, in order.
    #[serde(default)]
    pub(crate) roots: Vec<DialogId>,
    /// Every dialog of the file.
    #[serde(default)]
    pub(crate) dialogs: Vec<RonDialog>,
}

/// A dialog of the file.
#[derive(Deserialize, Debug, Default, Clone)]
pub(crate) struct RonDialog {
    /// The id of the dialog.
    pub(crate) id: DialogId,
    /// The title, shown in topic lists.
    #[serde(default)]
    pub(crate) title: LocalizedText,
    /// The body text.
    #[serde(default)]
    pub(crate) text: LocalizedText,
    /// Opaque data for the game.
    #[serde(default)]
    pub(crate) tag: String,
    /// How the requirements are combined.
    #[serde(default)]
    pub(crate) requirement_mode: RequirementMode,
    /// The requirements gating the dialog.
    #[serde(default)]
    pub(crate) requirements: Vec<Requirement>,
    /// The choices of the player.
    #[serde(default)]
    pub(crate) options: Vec<RonOption>,
}

impl From<RonDialog> for DialogNode {
    fn from(val: RonDialog) -> Self {
        DialogNode {
            id: val.id,
            title: val.title,
            text: val.text,
            tag: val.tag,
            requirement_mode: val.requirement_mode,
            requirements: val.requirements,
            options: val.options.into_iter().map(|o| o.into()).collect(),
        }
    }
}

/// A choice of a dialog.
#[derive(Deserialize, Debug, Default, Clone)]
pub(crate) struct RonOption {
    /// The label of the choice.
    #[serde(default)]
    pub(crate) text: LocalizedText,
    /// Opaque data for the game.
    #[serde(default)]
    pub(crate) tag: String,
    /// Fired in order when the option is chosen.
    #[serde(default)]
    pub(crate) notifications: Vec<Notification>,
    /// Where the option leads. `None` ends the conversation.
    #[serde(default)]
    pub(crate) next: Option<RonNext>,
}

impl From<RonOption> for DialogOption {
    fn from(val: RonOption) -> Self {
        DialogOption {
            text: val.text,
            tag: val.tag,
            notifications: val.notifications,
            target: match val.next {
                None => OptionTarget::End,
                Some(RonNext::Dialog(id)) => OptionTarget::Dialog(id),
                Some(RonNext::Redirect(id)) => OptionTarget::Redirect(id),
            },
        }
    }
}

/// Where an option leads.
#[derive(Deserialize, Debug, Clone, Copy)]
pub(crate) enum RonNext {
    /// A dialog owned by the option.
    Dialog(DialogId),
    /// A dialog owned elsewhere, closing a loop.
    Redirect(DialogId),
}
