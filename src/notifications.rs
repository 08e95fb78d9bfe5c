//! Notifications are the side effects fired when the player picks an option.

use serde::{Deserialize, Serialize};

use crate::prelude::{DialogContext, DialogNode, NotificationError, ObjectRef, Payload};

/// A side effect, interpreted by the collaborator it is addressed to.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// The kind of effect, e.g. `"give_item"` or `"start_quest"`.
    pub kind: String,
    /// The named counter, flag or item the effect changes, if any.
    #[serde(default)]
    pub key: Option<String>,
    /// The amount or value of the effect.
    #[serde(default)]
    pub value: Payload,
}

impl Effect {
    /// Creates an effect of the given kind, without key or value.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Sets the key of the effect.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the value of the effect.
    pub fn value(mut self, value: Payload) -> Self {
        self.value = value;
        self
    }
}

/// Who receives a notification.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationTarget {
    /// The object hosting the conversation.
    #[default]
    Origin,
    /// The NPC.
    Npc,
    /// The player.
    Player,
    /// The world.
    World,
    /// Another object of the world, by name.
    Object(String),
}

/// A side effect attached to a dialog option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Who receives the effect. Left out, it is the origin, which the world
    /// receives through [`apply_to_object`](crate::prelude::DialogRelevantWorldInfo::apply_to_object).
    #[serde(default)]
    pub target: NotificationTarget,
    /// The effect.
    pub effect: Effect,
}

impl Notification {
    /// Creates a notification.
    pub fn new(target: NotificationTarget, effect: Effect) -> Self {
        Self { target, effect }
    }

    /// Hands the effect to its target. `origin` is the dialog owning the chosen option.
    pub fn notify(
        &self,
        origin: &DialogNode,
        ctx: &mut DialogContext,
    ) -> Result<(), NotificationError> {
        match &self.target {
            NotificationTarget::Npc => ctx.npc.apply(&self.effect, origin),
            NotificationTarget::Player => ctx.player.apply(&self.effect, origin),
            NotificationTarget::World => ctx.world.apply(&self.effect, origin),
            NotificationTarget::Origin => {
                ctx.world
                    .apply_to_object(ObjectRef::Origin, &self.effect, origin)
            }
            NotificationTarget::Object(name) => {
                ctx.world
                    .apply_to_object(ObjectRef::Named(name), &self.effect, origin)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::context::tests::Cast;

    #[rstest]
    #[case(NotificationTarget::Npc, "npc:set:k@4")]
    #[case(NotificationTarget::Player, "player:set:k@4")]
    #[case(NotificationTarget::World, "world:set:k@4")]
    #[case(NotificationTarget::Origin, "world:set:k@4")]
    #[case(NotificationTarget::Object("door".to_string()), "world:set:k@4")]
    fn routes_to_target(#[case] target: NotificationTarget, #[case] expected: &str) {
        let mut cast = Cast::default();
        let node = DialogNode::new(4);
        let n = Notification::new(target, Effect::new("set").key("k"));

        assert!(n.notify(&node, &mut cast.context()).is_ok());
        assert_eq!(cast.journal(), vec![expected.to_string()]);
    }

    #[test]
    fn target_defaults_to_origin() {
        let n: Notification =
            serde_ron::from_str(r#"(effect: (kind: "set", key: Some("k")))"#).unwrap();
        assert_eq!(n.target, NotificationTarget::Origin);

        let mut cast = Cast::default();
        assert!(n.notify(&DialogNode::new(2), &mut cast.context()).is_ok());
        assert_eq!(cast.journal(), vec!["world:set:k@2".to_string()]);
    }

    #[test]
    fn unknown_object_is_an_error() {
        let mut cast = Cast::default();
        let node = DialogNode::new(0);
        let n = Notification::new(
            NotificationTarget::Object("chest".to_string()),
            Effect::new("set"),
        );
        assert_eq!(
            n.notify(&node, &mut cast.context()),
            Err(NotificationError::UnknownObject("chest".to_string()))
        );
        assert!(cast.journal().is_empty());
    }

    #[test]
    fn collaborator_failure_propagates() {
        let mut cast = Cast::default();
        let node = DialogNode::new(0);
        let n = Notification::new(NotificationTarget::Player, Effect::new("fail"));
        assert!(matches!(
            n.notify(&node, &mut cast.context()),
            Err(NotificationError::Rejected { .. })
        ));
    }
}
