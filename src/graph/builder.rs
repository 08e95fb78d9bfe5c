//! Programmatic authoring of dialog graphs.
use indexmap::IndexMap;

use crate::prelude::{BuildGraphError, DialogGraph, DialogNode, DialogOption, OptionTarget};

use super::{gather_chain, ids::IdReservations, DialogId};

/// An implementation of the builder pattern for the dialog graph.
///
/// The builder hands out the dialog ids, so two dialogs never share one.
/// New dialogs are either roots or owned by an option of an existing dialog.
/// Loops are closed with [`redirect`](Self::redirect).
///
/// # Examples
///
/// ```
/// use bevy_conversations::prelude::*;
///
/// let mut builder = DialogGraphBuilder::new();
/// let hello = builder.root(
///     DialogNode::default()
///         .with_title(LocalizedText::new("hello").with(Language::En, "Hello"))
///         .with_option(DialogOption::new(LocalizedText::new("who").with(Language::En, "Who are you?")))
///         .with_option(DialogOption::new(LocalizedText::new("bye").with(Language::En, "Bye"))),
/// );
/// let who = builder
///     .sub_dialog(hello, 0, DialogNode::default().with_option(DialogOption::new(LocalizedText::new("back"))))
///     .unwrap();
/// builder.redirect(who, 0, hello).unwrap();
///
/// let graph = builder.build().unwrap();
/// assert_eq!(graph.chain(hello), vec![hello, who]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct DialogGraphBuilder {
    /// The dialogs added so far.
    nodes: IndexMap<DialogId, DialogNode>,
    /// The root dialogs.
    roots: Vec<DialogId>,
    /// The ids handed out.
    ids: IdReservations,
}

impl DialogGraphBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Continues authoring an existing graph.
    pub fn from_graph(graph: DialogGraph) -> Self {
        let ids = IdReservations::from_graph(&graph);
        let (nodes, roots) = graph.into_parts();
        Self { nodes, roots, ids }
    }

    /// Adds a root dialog with a fresh id, which is returned.
    /// The id already set on `node` is ignored.
    pub fn root(&mut self, mut node: DialogNode) -> DialogId {
        node.id = self.ids.reserve();
        let id = node.id;
        self.nodes.insert(id, node);
        self.roots.push(id);
        id
    }

    /// Appends an option to a dialog, returning its index.
    pub fn option(
        &mut self,
        parent: DialogId,
        option: DialogOption,
    ) -> Result<usize, BuildGraphError> {
        let node = self
            .nodes
            .get_mut(&parent)
            .ok_or(BuildGraphError::NoSuchDialog(parent))?;
        node.options.push(option);
        Ok(node.options.len() - 1)
    }

    /// Adds a dialog with a fresh id, owned by option `option` of `parent`.
    ///
    /// Whatever the option owned before is removed, like [`remove`](Self::remove) does.
    pub fn sub_dialog(
        &mut self,
        parent: DialogId,
        option: usize,
        mut node: DialogNode,
    ) -> Result<DialogId, BuildGraphError> {
        let previous = self.option_target(parent, option)?;
        if let OptionTarget::Dialog(owned) = previous {
            self.remove(owned);
        }

        node.id = self.ids.reserve();
        let id = node.id;
        self.nodes.insert(id, node);
        self.set_target(parent, option, OptionTarget::Dialog(id))?;
        Ok(id)
    }

    /// Redirects option `option` of `parent` to an existing dialog.
    pub fn redirect(
        &mut self,
        parent: DialogId,
        option: usize,
        target: DialogId,
    ) -> Result<(), BuildGraphError> {
        if !self.nodes.contains_key(&target) {
            return Err(BuildGraphError::NoSuchDialog(target));
        }
        self.set_target(parent, option, OptionTarget::Redirect(target))
    }

    /// Makes option `option` of `parent` end the conversation.
    ///
    /// A dialog the option owned stays in the builder; use [`remove`](Self::remove) to drop it.
    pub fn end(&mut self, parent: DialogId, option: usize) -> Result<(), BuildGraphError> {
        self.set_target(parent, option, OptionTarget::End)
    }

    /// Removes a dialog together with everything it owns, and releases their ids.
    ///
    /// Every option that led to a removed dialog, redirections included,
    /// now ends the conversation. Returns the removed ids.
    pub fn remove(&mut self, id: DialogId) -> Vec<DialogId> {
        let removed = gather_chain(&self.nodes, id);
        for gone in &removed {
            self.nodes.shift_remove(gone);
            self.ids.release(*gone);
        }
        self.roots.retain(|r| !removed.contains(r));
        for node in self.nodes.values_mut() {
            for option in &mut node.options {
                if option.target.id().is_some_and(|t| removed.contains(&t)) {
                    option.target = OptionTarget::End;
                }
            }
        }
        removed
    }

    /// A dialog added so far, for further editing.
    pub fn node_mut(&mut self, id: DialogId) -> Option<&mut DialogNode> {
        self.nodes.get_mut(&id)
    }

    /// Validates the dialogs and produces the graph.
    pub fn build(self) -> Result<DialogGraph, BuildGraphError> {
        DialogGraph::new(self.nodes.into_values().collect(), self.roots)
    }

    /// The current target of an option.
    fn option_target(&self, parent: DialogId, option: usize) -> Result<OptionTarget, BuildGraphError> {
        let node = self
            .nodes
            .get(&parent)
            .ok_or(BuildGraphError::NoSuchDialog(parent))?;
        node.options
            .get(option)
            .map(|o| o.target)
            .ok_or(BuildGraphError::NoSuchOption(parent, option))
    }

    /// Points an option somewhere else.
    fn set_target(
        &mut self,
        parent: DialogId,
        option: usize,
        target: OptionTarget,
    ) -> Result<(), BuildGraphError> {
        let node = self
            .nodes
            .get_mut(&parent)
            .ok_or(BuildGraphError::NoSuchDialog(parent))?;
        let slot = node
            .options
            .get_mut(option)
            .ok_or(BuildGraphError::NoSuchOption(parent, option))?;
        slot.target = target;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::prelude::LocalizedText;

    fn two_options() -> DialogNode {
        DialogNode::default()
            .with_option(DialogOption::new(LocalizedText::new("a")))
            .with_option(DialogOption::new(LocalizedText::new("b")))
    }

    #[fixture]
    fn builder() -> DialogGraphBuilder {
        DialogGraphBuilder::new()
    }

    #[rstest]
    fn roots_get_fresh_ids(mut builder: DialogGraphBuilder) {
        assert_eq!(builder.root(DialogNode::new(40)), 0);
        assert_eq!(builder.root(DialogNode::new(40)), 1);
        let graph = builder.build().unwrap();
        assert_eq!(graph.root_ids(), &[0, 1]);
    }

    #[rstest]
    fn sub_dialog_is_owned_by_the_option(mut builder: DialogGraphBuilder) {
        let root = builder.root(two_options());
        let child = builder.sub_dialog(root, 1, DialogNode::default()).unwrap();
        let graph = builder.build().unwrap();
        assert_eq!(graph.node(root).unwrap().options[1].target, OptionTarget::Dialog(child));
        assert_eq!(graph.find_by_id(child).map(|d| d.id), Some(child));
    }

    #[rstest]
    fn replacing_a_sub_dialog_drops_the_old_one(mut builder: DialogGraphBuilder) {
        let root = builder.root(two_options());
        let old = builder.sub_dialog(root, 0, two_options()).unwrap();
        let grandchild = builder.sub_dialog(old, 0, DialogNode::default()).unwrap();
        let new = builder.sub_dialog(root, 0, DialogNode::default()).unwrap();

        let graph = builder.build().unwrap();
        assert!(graph.node(grandchild).is_none());
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.chain(root), vec![root, new]);
    }

    #[rstest]
    fn builder_errors(mut builder: DialogGraphBuilder) {
        let root = builder.root(two_options());
        assert_eq!(
            builder.sub_dialog(root, 5, DialogNode::default()),
            Err(BuildGraphError::NoSuchOption(root, 5))
        );
        assert_eq!(
            builder.sub_dialog(9, 0, DialogNode::default()),
            Err(BuildGraphError::NoSuchDialog(9))
        );
        assert_eq!(builder.redirect(root, 0, 9), Err(BuildGraphError::NoSuchDialog(9)));
        assert_eq!(
            builder.option(9, DialogOption::default()),
            Err(BuildGraphError::NoSuchDialog(9))
        );
    }

    #[rstest]
    fn redirect_to_ancestor_builds(mut builder: DialogGraphBuilder) {
        let root = builder.root(two_options());
        let child = builder.sub_dialog(root, 0, two_options()).unwrap();
        builder.redirect(child, 0, root).unwrap();
        builder.redirect(child, 1, child).unwrap();

        let graph = builder.build().unwrap();
        assert_eq!(graph.chain(root), vec![root, child]);
    }

    #[rstest]
    fn remove_unlinks_every_reference(mut builder: DialogGraphBuilder) {
        let first = builder.root(two_options());
        let second = builder.root(two_options());
        let child = builder.sub_dialog(first, 0, two_options()).unwrap();
        let grandchild = builder.sub_dialog(child, 0, DialogNode::default()).unwrap();
        builder.redirect(second, 0, grandchild).unwrap();

        let removed = builder.remove(child);
        assert_eq!(removed, vec![child, grandchild]);

        // released ids are handed out again
        let reused = builder.sub_dialog(first, 1, DialogNode::default()).unwrap();
        assert_eq!(reused, child);

        let graph = builder.build().unwrap();
        assert_eq!(graph.node(first).unwrap().options[0].target, OptionTarget::End);
        assert_eq!(graph.node(second).unwrap().options[0].target, OptionTarget::End);
    }

    #[rstest]
    fn removing_a_root_drops_it_from_roots(mut builder: DialogGraphBuilder) {
        let first = builder.root(DialogNode::default());
        let second = builder.root(DialogNode::default());
        builder.remove(first);
        let graph = builder.build().unwrap();
        assert_eq!(graph.root_ids(), &[second]);
    }

    #[test]
    fn from_graph_keeps_reservations() {
        let graph = DialogGraph::new(vec![DialogNode::new(0), DialogNode::new(1)], vec![0, 1]).unwrap();
        let mut builder = DialogGraphBuilder::from_graph(graph);
        assert_eq!(builder.root(DialogNode::default()), 2);
        let opt = builder.option(0, DialogOption::default()).unwrap();
        assert_eq!(opt, 0);
        builder.node_mut(0).unwrap().tag = "edited".to_string();
        let graph = builder.build().unwrap();
        assert_eq!(graph.node(0).unwrap().tag, "edited");
        assert_eq!(graph.len(), 3);
    }
}
