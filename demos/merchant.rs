//! A terminal conversation with a merchant.
//!
//! Run with `cargo run --example merchant [de]` and pick answers by number.

use std::{
    collections::HashSet,
    io::{self, BufRead, Write},
};

use bevy_conversations::prelude::*;

/// The flags a collaborator has set.
#[derive(Default)]
struct Flags(HashSet<String>);

impl Flags {
    fn meets(&self, condition: &Condition) -> bool {
        match (condition.kind.as_str(), &condition.key) {
            ("flag", Some(key)) => self.0.contains(key),
            _ => false,
        }
    }

    fn set(&mut self, effect: &Effect) -> Result<(), NotificationError> {
        match (effect.kind.as_str(), &effect.key) {
            ("set", Some(key)) => {
                self.0.insert(key.clone());
                Ok(())
            }
            (kind, _) => Err(NotificationError::Rejected {
                kind: kind.to_string(),
                reason: "unsupported".to_string(),
            }),
        }
    }
}

#[derive(Default)]
struct Merchant {
    flags: Flags,
}

impl DialogRelevantNpc for Merchant {
    fn meets(&self, condition: &Condition) -> bool {
        self.flags.meets(condition)
    }

    fn apply(&mut self, effect: &Effect, _origin: &DialogNode) -> Result<(), NotificationError> {
        self.flags.set(effect)
    }
}

struct Traveller {
    gold: i64,
    items: Vec<String>,
    flags: Flags,
}

impl DialogRelevantPlayer for Traveller {
    fn meets(&self, condition: &Condition) -> bool {
        self.flags.meets(condition)
    }

    fn apply(&mut self, effect: &Effect, _origin: &DialogNode) -> Result<(), NotificationError> {
        match (effect.kind.as_str(), &effect.key, &effect.value) {
            ("add", Some(key), Payload::Int(amount)) if key == "gold" => {
                if self.gold + amount < 0 {
                    return Err(NotificationError::Rejected {
                        kind: effect.kind.clone(),
                        reason: "not enough gold".to_string(),
                    });
                }
                self.gold += amount;
                println!("--- gold: {}", self.gold);
                Ok(())
            }
            ("give", Some(item), _) => {
                self.items.push(item.clone());
                println!("--- received {item}");
                Ok(())
            }
            _ => self.flags.set(effect),
        }
    }
}

#[derive(Default)]
struct Village {
    flags: Flags,
}

impl DialogRelevantWorldInfo for Village {
    fn meets(&self, condition: &Condition) -> bool {
        self.flags.meets(condition)
    }

    fn apply(&mut self, effect: &Effect, _origin: &DialogNode) -> Result<(), NotificationError> {
        self.flags.set(effect)
    }

    fn apply_to_object(
        &mut self,
        object: ObjectRef<'_>,
        effect: &Effect,
        origin: &DialogNode,
    ) -> Result<(), NotificationError> {
        println!("--- {object:?} notified by dialog {}: {}", origin.id, effect.kind);
        Ok(())
    }
}

fn main() {
    let language = match std::env::args().nth(1).as_deref() {
        Some("de") => Language::De,
        _ => Language::En,
    };

    let graph =
        parse_dialog_collection(include_bytes!("../assets/dialogs/merchant.dialog.ron")).unwrap();

    let mut engine = ConversationEngine::new(EngineSettings {
        fallback: LocalizationFallback::Language,
        use_end_conversation_fallback: true,
        ..Default::default()
    });
    engine.load_graph(Some(&graph));

    let mut merchant = Merchant::default();
    merchant.flags.0.insert("shop_open".to_string());
    let mut traveller = Traveller {
        gold: 15,
        items: Vec::new(),
        flags: Flags::default(),
    };
    traveller.flags.0.insert("curious".to_string());
    let mut village = Village::default();

    let mut ctx = DialogContext::new(&mut merchant, &mut traveller, &mut village);
    let mut screen = engine.discover_topics(&ctx, language);

    let stdin = io::stdin();
    while let Some(current) = screen {
        println!("-----------------------------------------");
        if current.kind == ConversationKind::Single {
            println!("{}", current.text);
        }
        for (i, answer) in current.answers.iter().enumerate() {
            println!("  {}. {}", i + 1, answer.text);
        }
        if current.answers.is_empty() {
            break;
        }

        print!("> ");
        io::stdout().flush().unwrap();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap() == 0 {
            break;
        }
        let Some(answer) = line
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| current.answers.get(n.wrapping_sub(1)))
        else {
            screen = Some(current);
            continue;
        };

        screen = match engine.advance(&mut ctx, current.id, answer.index, language) {
            Ok(next) => next,
            Err(err) => {
                println!("--- {err}");
                Some(current)
            }
        };
    }

    println!("-----------------------------------------");
    println!("The conversation is over.");
}
