//! The conversation engine: turns "world context + player choice" into the next screen.

use bevy::{
    log::{debug, warn},
    prelude::Resource,
};
use serde::{Deserialize, Serialize};

use crate::prelude::{
    Answer, Conversation, DialogContext, DialogGraph, DialogId, DialogNode, Language,
    LocalizationFallback, LocalizedText, NotificationError, CLOSE_CONVERSATION, TOPIC_LIST_ID,
};

/// How the engine localizes text and handles dead ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// What to do when a text has no string in the requested language.
    pub fallback: LocalizationFallback,
    /// The language used by [`LocalizationFallback::Language`].
    pub fallback_language: Language,
    /// Add [`end_conversation_text`](Self::end_conversation_text) as an answer
    /// when no option of a dialog is available.
    pub use_end_conversation_fallback: bool,
    /// The label of the injected end of conversation answer.
    pub end_conversation_text: LocalizedText,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fallback: LocalizationFallback::DebugOutput,
            fallback_language: Language::En,
            use_end_conversation_fallback: false,
            end_conversation_text: LocalizedText::new("End Conversation")
                .with(Language::En, "End Conversation"),
        }
    }
}

/// Walks the loaded dialog graph for the NPC, player and world of each call.
///
/// The engine keeps no conversation state between calls: the game hands back the
/// id of the screen it showed and the index of the picked answer.
///
/// # Examples
///
/// ```
/// use bevy_conversations::prelude::*;
///
/// struct Anyone;
///
/// impl DialogRelevantNpc for Anyone {
///     fn meets(&self, _: &Condition) -> bool { true }
///     fn apply(&mut self, _: &Effect, _: &DialogNode) -> Result<(), NotificationError> { Ok(()) }
/// }
/// impl DialogRelevantPlayer for Anyone {
///     fn meets(&self, _: &Condition) -> bool { true }
///     fn apply(&mut self, _: &Effect, _: &DialogNode) -> Result<(), NotificationError> { Ok(()) }
/// }
/// impl DialogRelevantWorldInfo for Anyone {
///     fn meets(&self, _: &Condition) -> bool { true }
///     fn apply(&mut self, _: &Effect, _: &DialogNode) -> Result<(), NotificationError> { Ok(()) }
/// }
///
/// let graph = DialogGraph::new(
///     vec![DialogNode::new(0)
///         .with_text(LocalizedText::new("greeting").with(Language::En, "Well met."))
///         .with_option(DialogOption::new(LocalizedText::new("bye").with(Language::En, "Farewell")))],
///     vec![0],
/// )
/// .unwrap();
///
/// let mut engine = ConversationEngine::default();
/// assert!(engine.load_graph(Some(&graph)));
///
/// let (mut npc, mut player, mut world) = (Anyone, Anyone, Anyone);
/// let mut ctx = DialogContext::new(&mut npc, &mut player, &mut world);
///
/// let screen = engine.discover_topics(&ctx, Language::En).unwrap();
/// assert_eq!(screen.text, "Well met.");
/// assert_eq!(screen.answers[0].text, "Farewell");
///
/// let next = engine.advance(&mut ctx, screen.id, screen.answers[0].index, Language::En);
/// assert_eq!(next, Ok(None));
/// ```
#[derive(Resource, Debug, Default, Clone)]
pub struct ConversationEngine {
    /// Localization and dead end handling.
    settings: EngineSettings,
    /// The loaded graph, if any.
    graph: Option<DialogGraph>,
}

impl ConversationEngine {
    /// Creates an engine with no graph loaded.
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            graph: None,
        }
    }

    /// Loads a graph, replacing the previous one.
    ///
    /// Returns `false` and keeps whatever was loaded before when `graph` is `None`.
    pub fn load_graph(&mut self, graph: Option<&DialogGraph>) -> bool {
        match graph {
            Some(graph) => {
                self.graph = Some(graph.clone());
                true
            }
            None => false,
        }
    }

    /// Whether a graph is loaded.
    pub fn is_loaded(&self) -> bool {
        self.graph.is_some()
    }

    /// The loaded graph.
    pub fn graph(&self) -> Option<&DialogGraph> {
        self.graph.as_ref()
    }

    /// The settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The settings, for changing them.
    pub fn settings_mut(&mut self) -> &mut EngineSettings {
        &mut self.settings
    }

    /// The topics the NPC can talk about right now.
    ///
    /// Returns `None` when no root dialog passes its requirements, the single
    /// dialog when exactly one does, and a topic list of every passing root,
    /// in authoring order, otherwise.
    pub fn discover_topics(&self, ctx: &DialogContext, language: Language) -> Option<Conversation> {
        let Some(graph) = &self.graph else {
            warn!("topics requested but no dialogs are loaded");
            return None;
        };

        let topics: Vec<&DialogNode> = graph
            .roots()
            .filter(|node| node.meets_requirements(ctx))
            .collect();

        match topics.as_slice() {
            [] => None,
            [topic] => Some(self.single(topic, ctx, language)),
            _ => Some(Conversation::topic_list(
                topics
                    .iter()
                    .map(|node| Answer::new(node.id, self.localize(&node.title, language), &node.tag))
                    .collect(),
            )),
        }
    }

    /// The screen that follows picking answer `answer_index` on screen `dialog_id`.
    ///
    /// * `dialog_id == TOPIC_LIST_ID`: `answer_index` is the id of a root dialog
    ///   picked from a topic list, which is shown if it still passes its requirements.
    /// * `answer_index == CLOSE_CONVERSATION`: the conversation is closed.
    /// * otherwise the notifications of the option fire in order and its
    ///   target is shown if it passes its requirements.
    ///
    /// `Ok(None)` means there is nothing more to show.
    ///
    /// # Errors
    ///
    /// A failing notification aborts the call and its error is returned,
    /// the notifications after it do not fire.
    pub fn advance(
        &self,
        ctx: &mut DialogContext,
        dialog_id: DialogId,
        answer_index: i32,
        language: Language,
    ) -> Result<Option<Conversation>, NotificationError> {
        let Some(graph) = &self.graph else {
            warn!("answer to dialog {dialog_id} received but no dialogs are loaded");
            return Ok(None);
        };

        if dialog_id == TOPIC_LIST_ID {
            return Ok(match graph.find_by_id(answer_index) {
                Some(topic) if topic.meets_requirements(ctx) => {
                    Some(self.single(topic, ctx, language))
                }
                _ => {
                    warn!("selection {answer_index} from topic list invalid");
                    None
                }
            });
        }

        let Some(active) = graph.find_by_id(dialog_id) else {
            debug!("dialog {dialog_id} not found");
            return Ok(None);
        };

        let chosen = usize::try_from(answer_index)
            .ok()
            .and_then(|i| active.options.get(i));
        let Some(option) = chosen else {
            if answer_index != CLOSE_CONVERSATION {
                warn!("answer index {answer_index} out of bounds for dialog {dialog_id}");
            }
            return Ok(None);
        };

        for notification in &option.notifications {
            notification.notify(active, ctx)?;
        }

        Ok(match graph.target_of(option) {
            Some(next) if next.meets_requirements(ctx) => Some(self.single(next, ctx, language)),
            _ => None,
        })
    }

    /// The answers of a dialog that are available right now.
    ///
    /// An option is available when it ends the conversation or its target
    /// passes its requirements. When none is and
    /// [`use_end_conversation_fallback`](EngineSettings::use_end_conversation_fallback)
    /// is set, a single [`CLOSE_CONVERSATION`] answer is returned instead.
    pub fn available_answers(
        &self,
        node: &DialogNode,
        ctx: &DialogContext,
        language: Language,
    ) -> Vec<Answer> {
        let graph = self.graph.as_ref();
        if graph.is_none() && node.options.iter().any(|o| o.target.id().is_some()) {
            debug!(
                "answers of dialog {} requested but no dialogs are loaded, only ending options are kept",
                node.id
            );
        }
        let mut answers: Vec<Answer> = node
            .options
            .iter()
            .enumerate()
            .filter(|(_, option)| match option.target.id() {
                None => true,
                Some(target) => graph
                    .and_then(|g| g.node(target))
                    .is_some_and(|next| next.meets_requirements(ctx)),
            })
            .map(|(i, option)| {
                Answer::new(i as i32, self.localize(&option.text, language), &option.tag)
            })
            .collect();

        if answers.is_empty() && self.settings.use_end_conversation_fallback {
            answers.push(Answer::new(
                CLOSE_CONVERSATION,
                self.localize(&self.settings.end_conversation_text, language),
                "",
            ));
        }
        answers
    }

    /// Builds the screen of a single dialog.
    fn single(&self, node: &DialogNode, ctx: &DialogContext, language: Language) -> Conversation {
        Conversation::single(
            node.id,
            self.localize(&node.title, language),
            self.localize(&node.text, language),
            node.tag.clone(),
            self.available_answers(node, ctx, language),
        )
    }

    /// Resolves a text with the configured fallback.
    fn localize(&self, text: &LocalizedText, language: Language) -> String {
        text.resolve(language, self.settings.fallback, self.settings.fallback_language)
    }
}
