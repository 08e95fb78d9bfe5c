//! Errors that can happen when using `bevy_conversations`.

use thiserror::Error;

use crate::prelude::DialogId;

/// Errors when building a [`DialogGraph`](crate::prelude::DialogGraph).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BuildGraphError {
    /// Multiple dialogs have the same id
    #[error("multiple dialogs have same id: {0}")]
    DuplicateDialogId(DialogId),
    /// A dialog has a negative id, which collides with the sentinel values
    #[error("the dialog id {0} is negative")]
    NegativeId(DialogId),
    /// The root list names a dialog that is not in the graph
    #[error("the root dialog {0} was not found")]
    UnknownRoot(DialogId),
    /// An option of a dialog points to a dialog that is not in the graph
    #[error("the dialog {0} has an option pointing to id {1} which was not found")]
    InvalidTarget(DialogId, DialogId),
    /// Following only non-redirection options leads back to a dialog
    #[error("the dialog {0} loops back on itself without a redirection")]
    CycleWithoutRedirection(DialogId),
    /// The builder was asked to attach to an option that does not exist
    #[error("the dialog {0} has no option {1}")]
    NoSuchOption(DialogId, usize),
    /// The builder was asked to attach to a dialog that does not exist
    #[error("the dialog {0} does not exist")]
    NoSuchDialog(DialogId),
}

/// Errors raised by the collaborators while applying a notification.
///
/// The engine never swallows these: they abort the answer that fired them.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum NotificationError {
    /// The collaborator refused the effect.
    #[error("effect `{kind}` was rejected: {reason}")]
    Rejected {
        /// The kind of the rejected effect.
        kind: String,
        /// Why it was rejected.
        reason: String,
    },
    /// No object with the given name can receive notifications.
    #[error("no object named `{0}` can receive notifications")]
    UnknownObject(String),
}

/// Errors while loading a `.dialog.ron` asset.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DialogLoaderError {
    /// An [IO Error](std::io::Error)
    #[error("Could not read the file: {0}")]
    Io(#[from] std::io::Error),
    /// A [RON Error](serde_ron::error::SpannedError)
    #[error("Could not parse RON: {0}")]
    RonError(#[from] serde_ron::error::SpannedError),
    /// The parsed dialogs do not form a valid graph
    #[error("Invalid dialog graph: {0}")]
    Graph(#[from] BuildGraphError),
}
