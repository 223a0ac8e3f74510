//! Deck lists and their validation against a catalog
//!
//! A deck file has one `count card-id` entry per line. Blank lines, `#`
//! comments and `[section]` headers are skipped.

use crate::core::DefinitionId;
use crate::loader::{CardCatalog, CardDefinition};
use crate::{DuelError, Result};
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub struct DeckLoader;

impl DeckLoader {
    pub fn load_from_file(path: &Path) -> Result<DeckList> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<DeckList> {
        let mut main_deck = Vec::new();

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }

            let (count_str, card_id) = line.split_once(char::is_whitespace).ok_or_else(|| {
                DuelError::InvalidDeckFormat(format!(
                    "line {}: expected `count card-id`",
                    line_no + 1
                ))
            })?;
            let count = count_str.parse::<u8>().map_err(|_| {
                DuelError::InvalidDeckFormat(format!(
                    "line {}: bad count `{count_str}`",
                    line_no + 1
                ))
            })?;

            main_deck.push(DeckEntry {
                card_id: DefinitionId::new(card_id.trim()),
                count,
            });
        }

        if main_deck.is_empty() {
            return Err(DuelError::InvalidDeckFormat("Empty deck".to_string()));
        }

        Ok(DeckList { main_deck })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub card_id: DefinitionId,
    pub count: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckList {
    pub main_deck: Vec<DeckEntry>,
}

impl DeckList {
    /// One entry per id, in order; repeats of the previous id are grouped
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<DefinitionId>,
    {
        let mut main_deck: Vec<DeckEntry> = Vec::new();
        for id in ids {
            let id = id.into();
            match main_deck.last_mut() {
                Some(last) if last.card_id == id && last.count < u8::MAX => last.count += 1,
                _ => main_deck.push(DeckEntry {
                    card_id: id,
                    count: 1,
                }),
            }
        }
        DeckList { main_deck }
    }

    pub fn total_cards(&self) -> usize {
        self.main_deck.iter().map(|e| e.count as usize).sum()
    }

    /// Every copy spelled out, in deck order
    pub fn card_ids(&self) -> impl Iterator<Item = &DefinitionId> {
        self.main_deck
            .iter()
            .flat_map(|e| std::iter::repeat(&e.card_id).take(e.count as usize))
    }
}

/// A deck whose every card resolved to a valid definition
#[derive(Debug, Clone)]
pub struct DeckPlan {
    pub cards: Vec<Arc<CardDefinition>>,
}

impl DeckPlan {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Resolves deck lists against a catalog before any game state exists
pub struct DeckBuilder<'a> {
    catalog: &'a CardCatalog,
}

impl<'a> DeckBuilder<'a> {
    pub fn new(catalog: &'a CardCatalog) -> Self {
        DeckBuilder { catalog }
    }

    /// Fails on the first unknown id or incomplete definition
    pub fn build(&self, deck: &DeckList) -> Result<DeckPlan> {
        let mut cards = Vec::with_capacity(deck.total_cards());
        for entry in &deck.main_deck {
            let def = self.catalog.get_required(entry.card_id.as_str())?;
            def.validate()?;
            cards.extend(std::iter::repeat(def).take(entry.count as usize));
        }
        Ok(DeckPlan { cards })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deck_file() {
        let content = r#"
# burn
[Main]
20 mountain
40 shock
"#;
        let deck = DeckLoader::parse(content).unwrap();
        assert_eq!(deck.main_deck.len(), 2);
        assert_eq!(deck.total_cards(), 60);
        assert_eq!(deck.main_deck[0].card_id.as_str(), "mountain");
        assert_eq!(deck.main_deck[1].count, 40);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(DeckLoader::parse("").is_err());
        assert!(DeckLoader::parse("lots of mountains").is_err());
        assert!(DeckLoader::parse("mountain").is_err());
    }

    #[test]
    fn test_from_ids_groups_runs() {
        let deck = DeckList::from_ids(["a", "a", "b", "a"]);
        assert_eq!(deck.main_deck.len(), 3);
        assert_eq!(deck.total_cards(), 4);
        let ids: Vec<_> = deck.card_ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a", "b", "a"]);
    }

    #[test]
    fn test_builder_validates_against_catalog() {
        let catalog = CardCatalog::from_json_str(
            r#"[{"id": "forest", "name": "Forest", "baseType": "Land", "providesMana": "G"},
                {"id": "blob", "name": "Blob", "baseType": "Creature"}]"#,
        )
        .unwrap();
        let builder = DeckBuilder::new(&catalog);

        let plan = builder.build(&DeckList::from_ids(["forest", "forest"])).unwrap();
        assert_eq!(plan.len(), 2);

        assert!(matches!(
            builder.build(&DeckList::from_ids(["forest", "island"])),
            Err(DuelError::CardNotFound(id)) if id == "island"
        ));
        assert!(matches!(
            builder.build(&DeckList::from_ids(["blob"])),
            Err(DuelError::IncompleteDefinition { .. })
        ));
    }
}
