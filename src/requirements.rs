//! Requirements gate whether a dialog can be presented.

use serde::{Deserialize, Serialize};

use crate::prelude::{
    DialogContext, DialogRelevantNpc, DialogRelevantPlayer, DialogRelevantWorldInfo, Payload,
};

/// A gameplay check, interpreted by the collaborator it is addressed to.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// The kind of check, e.g. `"level_at_least"` or `"has_item"`.
    pub kind: String,
    /// The named counter, flag or item the check looks at, if any.
    #[serde(default)]
    pub key: Option<String>,
    /// The threshold or expected value.
    #[serde(default)]
    pub value: Payload,
}

impl Condition {
    /// Creates a condition of the given kind, without key or value.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Sets the key of the condition.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the value of the condition.
    pub fn value(mut self, value: Payload) -> Self {
        self.value = value;
        self
    }
}

/// A requirement of a dialog. Each variant inspects exactly one collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Requirement {
    /// Checked against the player.
    Player(Condition),
    /// Checked against the NPC.
    Npc(Condition),
    /// Checked against the world.
    World(Condition),
}

impl Requirement {
    /// Evaluates the requirement, asking only the collaborator it targets.
    pub fn evaluate(
        &self,
        player: &dyn DialogRelevantPlayer,
        npc: &dyn DialogRelevantNpc,
        world: &dyn DialogRelevantWorldInfo,
    ) -> bool {
        match self {
            Requirement::Player(condition) => player.meets(condition),
            Requirement::Npc(condition) => npc.meets(condition),
            Requirement::World(condition) => world.meets(condition),
        }
    }

    /// The condition, whatever the target.
    pub fn condition(&self) -> &Condition {
        match self {
            Requirement::Player(c) | Requirement::Npc(c) | Requirement::World(c) => c,
        }
    }
}

/// How the requirements of a dialog are combined.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequirementMode {
    /// Every requirement must pass. No requirements always pass.
    #[default]
    All,
    /// At least one requirement must pass. No requirements never pass.
    Any,
}

/// Combines `requirements` under `mode` for the given collaborators.
///
/// Nothing is cached, every call asks the collaborators again.
pub fn gate(mode: RequirementMode, requirements: &[Requirement], ctx: &DialogContext) -> bool {
    let (player, npc, world) = (&*ctx.player, &*ctx.npc, &*ctx.world);
    match mode {
        RequirementMode::All => requirements
            .iter()
            .all(|r| r.evaluate(player, npc, world)),
        RequirementMode::Any => requirements
            .iter()
            .any(|r| r.evaluate(player, npc, world)),
    }
}
