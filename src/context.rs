//! The collaborators a conversation is evaluated against.
//!
//! The engine never looks inside the NPC, the player or the world. It hands each
//! [`Condition`] and [`Effect`] to the collaborator it targets, which gives it
//! meaning. The catalog of condition and effect kinds is the game's business.

use serde::{Deserialize, Serialize};

use crate::prelude::{Condition, DialogNode, Effect, NotificationError};

/// The kind-specific value carried by a [`Condition`] or an [`Effect`].
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    /// No value.
    #[default]
    None,
    /// A flag.
    Bool(bool),
    /// An integer threshold or amount.
    Int(i64),
    /// A float threshold or amount.
    Float(f64),
    /// A string, e.g. an item or faction name.
    Text(String),
    /// A time span in seconds.
    Seconds(f32),
}

/// The non-collaborator objects a notification can be addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectRef<'a> {
    /// The object hosting the conversation.
    Origin,
    /// An external object, looked up by name.
    Named(&'a str),
}

/// The NPC side of a conversation.
pub trait DialogRelevantNpc {
    /// Whether the NPC satisfies the condition.
    fn meets(&self, condition: &Condition) -> bool;

    /// Applies an effect to the NPC. `origin` is the dialog whose option was chosen.
    fn apply(&mut self, effect: &Effect, origin: &DialogNode) -> Result<(), NotificationError>;
}

/// The player side of a conversation.
pub trait DialogRelevantPlayer {
    /// Whether the player satisfies the condition.
    fn meets(&self, condition: &Condition) -> bool;

    /// Applies an effect to the player. `origin` is the dialog whose option was chosen.
    fn apply(&mut self, effect: &Effect, origin: &DialogNode) -> Result<(), NotificationError>;
}

/// Everything about the world that is neither the NPC nor the player.
pub trait DialogRelevantWorldInfo {
    /// Whether the world satisfies the condition.
    fn meets(&self, condition: &Condition) -> bool;

    /// Applies an effect to the world state. `origin` is the dialog whose option was chosen.
    fn apply(&mut self, effect: &Effect, origin: &DialogNode) -> Result<(), NotificationError>;

    /// Applies an effect to the object hosting the conversation or to another
    /// object of the world.
    ///
    /// The default hands [`ObjectRef::Origin`] to [`apply`](Self::apply) and
    /// rejects every named object.
    fn apply_to_object(
        &mut self,
        object: ObjectRef<'_>,
        effect: &Effect,
        origin: &DialogNode,
    ) -> Result<(), NotificationError> {
        match object {
            ObjectRef::Origin => self.apply(effect, origin),
            ObjectRef::Named(name) => Err(NotificationError::UnknownObject(name.to_string())),
        }
    }
}

/// The three collaborators of a single engine call.
///
/// Built per call by the game and dropped afterwards. The engine only needs
/// shared access for topic discovery and mutable access when an answer fires
/// notifications.
pub struct DialogContext<'a> {
    /// The NPC the player is talking to.
    pub npc: &'a mut dyn DialogRelevantNpc,
    /// The player.
    pub player: &'a mut dyn DialogRelevantPlayer,
    /// The world the conversation happens in.
    pub world: &'a mut dyn DialogRelevantWorldInfo,
}

impl<'a> DialogContext<'a> {
    /// Bundles the collaborators of a call.
    pub fn new(
        npc: &'a mut dyn DialogRelevantNpc,
        player: &'a mut dyn DialogRelevantPlayer,
        world: &'a mut dyn DialogRelevantWorldInfo,
    ) -> Self {
        Self { npc, player, world }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    //! Collaborators backed by plain maps, shared by the tests of the crate.

    use std::collections::{HashMap, HashSet};

    use super::*;

    /// A collaborator whose conditions are flags and counters.
    ///
    /// Condition kinds: `flag` (key must be set), `at_least` (counter `key` >= `Int` value).
    /// Effect kinds: `set` (sets flag `key`), `add` (adds `Int` to counter `key`), `fail`.
    /// Every applied effect is journaled as `"<who>:<kind>:<key>@<origin id>"`.
    #[derive(Debug, Default, Clone)]
    pub(crate) struct Ledger {
        pub(crate) who: &'static str,
        pub(crate) flags: HashSet<String>,
        pub(crate) counters: HashMap<String, i64>,
        pub(crate) journal: Vec<String>,
    }

    impl Ledger {
        pub(crate) fn new(who: &'static str) -> Self {
            Self {
                who,
                ..Default::default()
            }
        }

        fn check(&self, condition: &Condition) -> bool {
            let key = condition.key.as_deref().unwrap_or_default();
            match (condition.kind.as_str(), &condition.value) {
                ("flag", _) => self.flags.contains(key),
                ("at_least", Payload::Int(min)) => {
                    self.counters.get(key).copied().unwrap_or_default() >= *min
                }
                _ => false,
            }
        }

        fn record(&mut self, effect: &Effect, origin: &DialogNode) -> Result<(), NotificationError> {
            let key = effect.key.clone().unwrap_or_default();
            match (effect.kind.as_str(), &effect.value) {
                ("set", _) => {
                    self.flags.insert(key.clone());
                }
                ("add", Payload::Int(n)) => {
                    *self.counters.entry(key.clone()).or_default() += n;
                }
                ("fail", _) => {
                    return Err(NotificationError::Rejected {
                        kind: effect.kind.clone(),
                        reason: format!("{} refuses", self.who),
                    })
                }
                _ => {}
            }
            self.journal
                .push(format!("{}:{}:{}@{}", self.who, effect.kind, key, origin.id));
            Ok(())
        }
    }

    impl DialogRelevantNpc for Ledger {
        fn meets(&self, condition: &Condition) -> bool {
            self.check(condition)
        }

        fn apply(&mut self, effect: &Effect, origin: &DialogNode) -> Result<(), NotificationError> {
            self.record(effect, origin)
        }
    }

    impl DialogRelevantPlayer for Ledger {
        fn meets(&self, condition: &Condition) -> bool {
            self.check(condition)
        }

        fn apply(&mut self, effect: &Effect, origin: &DialogNode) -> Result<(), NotificationError> {
            self.record(effect, origin)
        }
    }

    impl DialogRelevantWorldInfo for Ledger {
        fn meets(&self, condition: &Condition) -> bool {
            self.check(condition)
        }

        fn apply(&mut self, effect: &Effect, origin: &DialogNode) -> Result<(), NotificationError> {
            self.record(effect, origin)
        }

        fn apply_to_object(
            &mut self,
            object: ObjectRef<'_>,
            effect: &Effect,
            origin: &DialogNode,
        ) -> Result<(), NotificationError> {
            match object {
                ObjectRef::Origin => self.record(effect, origin),
                ObjectRef::Named("door") => self.record(effect, origin),
                ObjectRef::Named(other) => Err(NotificationError::UnknownObject(other.to_string())),
            }
        }
    }

    /// The NPC, player and world of a test.
    #[derive(Debug, Clone)]
    pub(crate) struct Cast {
        pub(crate) npc: Ledger,
        pub(crate) player: Ledger,
        pub(crate) world: Ledger,
    }

    impl Default for Cast {
        fn default() -> Self {
            Self {
                npc: Ledger::new("npc"),
                player: Ledger::new("player"),
                world: Ledger::new("world"),
            }
        }
    }

    impl Cast {
        pub(crate) fn context(&mut self) -> DialogContext<'_> {
            DialogContext::new(&mut self.npc, &mut self.player, &mut self.world)
        }

        /// Every journal entry, npc first, then player, then world.
        pub(crate) fn journal(&self) -> Vec<String> {
            self.npc
                .journal
                .iter()
                .chain(&self.player.journal)
                .chain(&self.world.journal)
                .cloned()
                .collect()
        }
    }

    /// A world that only counts the effects applied to it.
    #[derive(Default)]
    struct Bare {
        applied: usize,
    }

    impl DialogRelevantWorldInfo for Bare {
        fn meets(&self, _condition: &Condition) -> bool {
            true
        }

        fn apply(&mut self, _effect: &Effect, _origin: &DialogNode) -> Result<(), NotificationError> {
            self.applied += 1;
            Ok(())
        }
    }

    #[test]
    fn default_object_routing() {
        let node = DialogNode::new(0);
        let effect = Effect::new("open");
        let mut world = Bare::default();
        assert_eq!(world.apply_to_object(ObjectRef::Origin, &effect, &node), Ok(()));
        assert_eq!(world.applied, 1);
        assert_eq!(
            world.apply_to_object(ObjectRef::Named("gate"), &effect, &node),
            Err(NotificationError::UnknownObject("gate".to_string()))
        );
        assert_eq!(world.applied, 1);
    }
}
