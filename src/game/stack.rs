//! The stack: pending spells and abilities, last in first out

use crate::core::{CardId, PlayerId};
use serde::{Deserialize, Serialize};

/// What a spell or ability is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum Target {
    Card(CardId),
    Player(PlayerId),
}

impl Target {
    pub fn id(&self) -> u32 {
        match self {
            Target::Card(id) => id.as_u32(),
            Target::Player(id) => id.as_u32(),
        }
    }
}

/// One pending object on the stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackEntry {
    /// A cast card; the card itself sits in the Stack zone until it resolves
    Spell {
        card: CardId,
        controller: PlayerId,
        target: Option<Target>,
    },
    /// An activated ability of a permanent
    Ability {
        source: CardId,
        controller: PlayerId,
        ability_name: String,
        target: Option<Target>,
    },
}

impl StackEntry {
    pub fn controller(&self) -> PlayerId {
        match self {
            StackEntry::Spell { controller, .. } | StackEntry::Ability { controller, .. } => {
                *controller
            }
        }
    }

    pub fn source(&self) -> CardId {
        match self {
            StackEntry::Spell { card, .. } => *card,
            StackEntry::Ability { source, .. } => *source,
        }
    }

    pub fn target(&self) -> Option<Target> {
        match self {
            StackEntry::Spell { target, .. } | StackEntry::Ability { target, .. } => *target,
        }
    }
}

/// Strict LIFO container. Resolution is driven by the game, not the stack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stack {
    entries: Vec<StackEntry>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: StackEntry) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<StackEntry> {
        self.entries.pop()
    }

    pub fn peek(&self) -> Option<&StackEntry> {
        self.entries.last()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries from top to bottom
    pub fn iter(&self) -> impl Iterator<Item = &StackEntry> {
        self.entries.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spell(id: u32) -> StackEntry {
        StackEntry::Spell {
            card: CardId::new(id),
            controller: PlayerId::new(0),
            target: None,
        }
    }

    #[test]
    fn test_lifo_order() {
        let mut stack = Stack::new();
        assert!(stack.is_empty());
        assert!(stack.peek().is_none());

        for id in 1..=5 {
            stack.push(spell(id));
        }
        assert_eq!(stack.len(), 5);
        assert_eq!(stack.peek(), Some(&spell(5)));
        assert_eq!(stack.iter().next(), Some(&spell(5)));

        let popped: Vec<u32> = std::iter::from_fn(|| stack.pop())
            .map(|e| e.source().as_u32())
            .collect();
        assert_eq!(popped, vec![5, 4, 3, 2, 1]);
        assert!(stack.pop().is_none());
    }

    #[test]
    fn test_entry_accessors() {
        let ability = StackEntry::Ability {
            source: CardId::new(9),
            controller: PlayerId::new(1),
            ability_name: "Scry".to_string(),
            target: Some(Target::Player(PlayerId::new(0))),
        };
        assert_eq!(ability.controller(), PlayerId::new(1));
        assert_eq!(ability.source(), CardId::new(9));
        assert_eq!(ability.target().map(|t| t.id()), Some(0));
    }

    #[test]
    fn test_target_json_shape() {
        let json = serde_json::to_value(Target::Card(CardId::new(12))).unwrap();
        assert_eq!(json, serde_json::json!({"type": "card", "id": 12}));
    }
}
