//! The screens handed to the game after each engine call.

use crate::prelude::{DialogId, CLOSE_CONVERSATION, TOPIC_LIST_ID};

/// The two shapes of a conversation screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationKind {
    /// A single dialog with its answers.
    Single,
    /// A list of topics to pick from, without body text.
    TopicList,
}

/// A choice shown to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// What to hand back to [`advance`](crate::prelude::ConversationEngine::advance).
    ///
    /// The option position in a [`ConversationKind::Single`] screen, the root
    /// dialog id in a [`ConversationKind::TopicList`] screen, or
    /// [`CLOSE_CONVERSATION`].
    pub index: i32,
    /// The localized label.
    pub text: String,
    /// Opaque data for the game.
    pub tag: String,
}

impl Answer {
    /// Creates an answer.
    pub fn new(index: i32, text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            tag: tag.into(),
        }
    }

    /// Whether picking this answer closes the conversation.
    pub fn closes(&self) -> bool {
        self.index == CLOSE_CONVERSATION
    }
}

/// A conversation screen. Created fresh for every call, never kept by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    /// The dialog shown, or [`TOPIC_LIST_ID`] for topic lists.
    pub id: DialogId,
    /// The localized title.
    pub title: String,
    /// The localized body text.
    pub text: String,
    /// Opaque data for the game.
    pub tag: String,
    /// The shape of the screen.
    pub kind: ConversationKind,
    /// The choices of the player.
    pub answers: Vec<Answer>,
}

impl Conversation {
    /// A screen showing a single dialog.
    pub fn single(
        id: DialogId,
        title: String,
        text: String,
        tag: String,
        answers: Vec<Answer>,
    ) -> Self {
        Self {
            id,
            title,
            text,
            tag,
            kind: ConversationKind::Single,
            answers,
        }
    }

    /// A screen listing topics.
    pub fn topic_list(answers: Vec<Answer>) -> Self {
        Self {
            id: TOPIC_LIST_ID,
            title: String::new(),
            text: String::new(),
            tag: String::new(),
            kind: ConversationKind::TopicList,
            answers,
        }
    }
}
