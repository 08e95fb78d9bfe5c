//! The dialog graph: dialogs (nodes) connected by options (edges).
//!
//! Dialogs live in an arena keyed by [`DialogId`] and options refer to their
//! target by id. An option either ends the conversation, leads to a dialog it
//! owns, or redirects to a dialog that already exists elsewhere in the graph.
//! Redirections are how authors close loops, so structural traversals
//! ([`DialogGraph::find_by_id`], [`DialogGraph::chain`]) never follow them.

use bevy::{prelude::Asset, reflect::TypePath, utils::HashSet};
use indexmap::IndexMap;

use crate::prelude::{
    gate, BuildGraphError, DialogContext, LocalizedText, Notification, Requirement,
    RequirementMode,
};

pub mod builder;
pub mod ids;

/// The identifier of a dialog, unique within a graph.
///
/// Authored ids are never negative, `-1` is reserved for [`TOPIC_LIST_ID`]
/// and [`CLOSE_CONVERSATION`].
pub type DialogId = i32;

/// The id of a conversation screen listing several topics. Answers picked from
/// such a screen carry the id of the chosen root dialog as their index.
pub const TOPIC_LIST_ID: DialogId = -1;

/// The answer index that closes the conversation.
pub const CLOSE_CONVERSATION: i32 = -1;

/// Where an option leads.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OptionTarget {
    /// The option ends the conversation.
    #[default]
    End,
    /// The option leads to a dialog it owns.
    Dialog(DialogId),
    /// The option loops back to a dialog owned by another option or a root.
    Redirect(DialogId),
}

impl OptionTarget {
    /// The id of the target dialog, if any.
    pub fn id(&self) -> Option<DialogId> {
        match self {
            OptionTarget::End => None,
            OptionTarget::Dialog(id) | OptionTarget::Redirect(id) => Some(*id),
        }
    }

    /// Whether this is a redirection.
    pub fn is_redirection(&self) -> bool {
        matches!(self, OptionTarget::Redirect(_))
    }

    /// The target id, only if it can be followed by structural traversals.
    fn owned(&self) -> Option<DialogId> {
        match self {
            OptionTarget::Dialog(id) => Some(*id),
            _ => None,
        }
    }
}

/// A choice the player can make in a dialog.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DialogOption {
    /// The label of the choice.
    pub text: LocalizedText,
    /// Opaque data for the game.
    pub tag: String,
    /// Fired in order when the option is chosen.
    pub notifications: Vec<Notification>,
    /// Where the option leads.
    pub target: OptionTarget,
}

impl DialogOption {
    /// An option with the given label that ends the conversation.
    pub fn new(text: LocalizedText) -> Self {
        Self {
            text,
            ..Default::default()
        }
    }

    /// Sets the tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Appends a notification.
    pub fn with_notification(mut self, notification: Notification) -> Self {
        self.notifications.push(notification);
        self
    }

    /// Leads the option to a dialog it owns.
    pub fn to(mut self, id: DialogId) -> Self {
        self.target = OptionTarget::Dialog(id);
        self
    }

    /// Redirects the option to an existing dialog.
    pub fn redirect(mut self, id: DialogId) -> Self {
        self.target = OptionTarget::Redirect(id);
        self
    }
}

/// A turn of the conversation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DialogNode {
    /// The id of the dialog.
    pub id: DialogId,
    /// The title, shown in topic lists.
    pub title: LocalizedText,
    /// The body text.
    pub text: LocalizedText,
    /// Opaque data for the game.
    pub tag: String,
    /// How the requirements are combined.
    pub requirement_mode: RequirementMode,
    /// The requirements gating the dialog.
    pub requirements: Vec<Requirement>,
    /// The choices of the player.
    pub options: Vec<DialogOption>,
}

impl DialogNode {
    /// An empty dialog with the given id.
    pub fn new(id: DialogId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: LocalizedText) -> Self {
        self.title = title;
        self
    }

    /// Sets the body text.
    pub fn with_text(mut self, text: LocalizedText) -> Self {
        self.text = text;
        self
    }

    /// Sets the tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Sets how the requirements are combined.
    pub fn with_mode(mut self, mode: RequirementMode) -> Self {
        self.requirement_mode = mode;
        self
    }

    /// Appends a requirement.
    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// Appends an option.
    pub fn with_option(mut self, option: DialogOption) -> Self {
        self.options.push(option);
        self
    }

    /// Whether the dialog can currently be presented.
    pub fn meets_requirements(&self, ctx: &DialogContext) -> bool {
        gate(self.requirement_mode, &self.requirements, ctx)
    }
}

/// A validated dialog graph.
///
/// # Examples
///
/// ```
/// use bevy_conversations::prelude::*;
///
/// let hello = DialogNode::new(0)
///     .with_option(DialogOption::new(LocalizedText::new("ask")).to(1))
///     .with_option(DialogOption::new(LocalizedText::new("bye")));
/// let answer = DialogNode::new(1)
///     .with_option(DialogOption::new(LocalizedText::new("again")).redirect(0));
///
/// let graph = DialogGraph::new(vec![hello, answer], vec![0]).unwrap();
/// assert_eq!(graph.find_by_id(1).map(|d| d.id), Some(1));
/// assert_eq!(graph.chain(0), vec![0, 1]);
/// ```
#[derive(Asset, TypePath, Debug, Default, Clone, PartialEq)]
pub struct DialogGraph {
    /// All dialogs by id, in authoring order.
    nodes: IndexMap<DialogId, DialogNode>,
    /// The dialogs that can start a conversation, in authoring order.
    roots: Vec<DialogId>,
}

impl DialogGraph {
    /// Validates and assembles a graph.
    ///
    /// # Errors
    ///
    /// Fails on duplicate or negative ids, on roots or option targets that
    /// are not in `nodes`, and when non-redirection options form a loop.
    pub fn new(nodes: Vec<DialogNode>, roots: Vec<DialogId>) -> Result<Self, BuildGraphError> {
        let mut arena = IndexMap::with_capacity(nodes.len());
        for node in nodes {
            if node.id < 0 {
                return Err(BuildGraphError::NegativeId(node.id));
            }
            let id = node.id;
            if arena.insert(id, node).is_some() {
                return Err(BuildGraphError::DuplicateDialogId(id));
            }
        }

        let graph = Self {
            nodes: arena,
            roots,
        };
        graph.validation_pass()?;
        Ok(graph)
    }

    /// Checks roots, targets and loops.
    fn validation_pass(&self) -> Result<(), BuildGraphError> {
        if let Some(root) = self.roots.iter().find(|r| !self.nodes.contains_key(*r)) {
            return Err(BuildGraphError::UnknownRoot(*root));
        }

        for node in self.nodes.values() {
            for option in &node.options {
                if let Some(target) = option.target.id() {
                    if !self.nodes.contains_key(&target) {
                        return Err(BuildGraphError::InvalidTarget(node.id, target));
                    }
                }
            }
        }

        self.check_loops()
    }

    /// Depth-first search over owned options with an explicit stack, failing
    /// when a dialog still on the current path is reached again.
    fn check_loops(&self) -> Result<(), BuildGraphError> {
        let mut done = HashSet::default();
        let mut path = HashSet::default();
        for start in self.nodes.keys() {
            if done.contains(start) {
                continue;
            }
            path.insert(*start);
            let mut stack = vec![(*start, self.owned_children(*start))];
            while let Some((id, children)) = stack.last_mut() {
                match children.next() {
                    Some(child) => {
                        if path.contains(&child) {
                            return Err(BuildGraphError::CycleWithoutRedirection(child));
                        }
                        if done.contains(&child) {
                            continue;
                        }
                        path.insert(child);
                        stack.push((child, self.owned_children(child)));
                    }
                    None => {
                        let finished = *id;
                        path.remove(&finished);
                        done.insert(finished);
                        stack.pop();
                    }
                }
            }
        }
        Ok(())
    }

    /// The owned targets of a dialog, collected for a stack frame.
    fn owned_children(&self, id: DialogId) -> std::vec::IntoIter<DialogId> {
        self.owned_targets(id).collect::<Vec<_>>().into_iter()
    }

    /// The targets of the non-redirection options of a dialog.
    fn owned_targets(&self, id: DialogId) -> impl Iterator<Item = DialogId> + '_ {
        owned_targets(&self.nodes, id)
    }

    /// The root dialogs, in authoring order.
    pub fn roots(&self) -> impl Iterator<Item = &DialogNode> {
        self.roots.iter().filter_map(|id| self.nodes.get(id))
    }

    /// The ids of the root dialogs, in authoring order.
    pub fn root_ids(&self) -> &[DialogId] {
        &self.roots
    }

    /// Every dialog of the graph, in authoring order.
    pub fn nodes(&self) -> impl Iterator<Item = &DialogNode> {
        self.nodes.values()
    }

    /// The dialog with the given id, straight from the arena.
    ///
    /// Unlike [`find_by_id`](Self::find_by_id) this also returns dialogs
    /// that are only reachable through redirections.
    pub fn node(&self, id: DialogId) -> Option<&DialogNode> {
        self.nodes.get(&id)
    }

    /// The number of dialogs.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no dialogs.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The dialog an option leads to, redirections included.
    pub fn target_of(&self, option: &DialogOption) -> Option<&DialogNode> {
        option.target.id().and_then(|id| self.nodes.get(&id))
    }

    /// Searches the dialog with the given id, starting from each root in order
    /// and never following redirections.
    ///
    /// A dialog that can only be reached through a redirection is not found.
    pub fn find_by_id(&self, id: DialogId) -> Option<&DialogNode> {
        let mut visited = HashSet::default();
        for root in &self.roots {
            let mut stack = vec![*root];
            while let Some(current) = stack.pop() {
                if !visited.insert(current) {
                    continue;
                }
                let Some(node) = self.nodes.get(&current) else {
                    continue;
                };
                if node.id == id {
                    return Some(node);
                }
                let children: Vec<DialogId> = self.owned_targets(current).collect();
                stack.extend(children.into_iter().rev());
            }
        }
        None
    }

    /// Gathers every dialog of a chain, the root first, without following
    /// redirections. Each dialog appears once.
    ///
    /// Returns an empty vector if `root` is not in the graph.
    pub fn chain(&self, root: DialogId) -> Vec<DialogId> {
        gather_chain(&self.nodes, root)
    }

    /// The dialogs an option of `owner` may redirect to: every dialog of the
    /// `root` chain except `owner` itself.
    pub fn redirect_candidates(&self, root: DialogId, owner: DialogId) -> Vec<DialogId> {
        self.chain(root)
            .into_iter()
            .filter(|id| *id != owner)
            .collect()
    }

    /// Splits the graph back into its dialogs and roots.
    pub(crate) fn into_parts(self) -> (IndexMap<DialogId, DialogNode>, Vec<DialogId>) {
        (self.nodes, self.roots)
    }
}

/// The targets of the non-redirection options of a dialog of the arena.
fn owned_targets(
    nodes: &IndexMap<DialogId, DialogNode>,
    id: DialogId,
) -> impl Iterator<Item = DialogId> + '_ {
    nodes
        .get(&id)
        .into_iter()
        .flat_map(|node| node.options.iter().filter_map(|o| o.target.owned()))
}

/// Pre-order gathering of `root` and everything it owns, skipping redirections.
pub(crate) fn gather_chain(nodes: &IndexMap<DialogId, DialogNode>, root: DialogId) -> Vec<DialogId> {
    let mut gathered = Vec::new();
    if !nodes.contains_key(&root) {
        return gathered;
    }
    let mut seen = HashSet::default();
    let mut stack = vec![root];
    while let Some(current) = stack.pop() {
        if !seen.insert(current) {
            continue;
        }
        gathered.push(current);
        let children: Vec<DialogId> = owned_targets(nodes, current).collect();
        stack.extend(children.into_iter().rev());
    }
    gathered
}
