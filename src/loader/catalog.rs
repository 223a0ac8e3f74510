//! Card catalog: immutable card definitions keyed by id
//!
//! Definitions are JSON objects. A catalog can be read from one JSON array,
//! or from a directory holding one definition per `.json` file (loaded in
//! parallel on the tokio runtime).

use crate::core::{
    BaseType, Card, CardId, CardKind, CardName, Color, DefinitionId, LoyaltyAbility, ManaCost,
    PlayerId, SpellEffect,
};
use crate::{DuelError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn default_price() -> u32 {
    10
}

/// A card as described in the catalog
///
/// Kind-specific fields are optional in the data; which ones are required
/// depends on `base_type` and is checked when the definition is turned into
/// a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDefinition {
    pub id: DefinitionId,
    pub name: CardName,
    /// Kept as text so an unknown type is reported against this card
    pub base_type: String,
    #[serde(default)]
    pub mana_cost: ManaCost,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toughness: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provides_mana: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_loyalty: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loyalty_abilities: Vec<LoyaltyAbility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<SpellEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
    #[serde(default = "default_price")]
    pub price: u32,
}

impl CardDefinition {
    pub fn base_type(&self) -> Result<BaseType> {
        BaseType::parse(&self.base_type).ok_or_else(|| DuelError::UnsupportedBaseType {
            id: self.id.to_string(),
            base_type: self.base_type.clone(),
        })
    }

    fn incomplete(&self, reason: &str) -> DuelError {
        DuelError::IncompleteDefinition {
            id: self.id.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Fresh kind-specific state, or an error if required fields are missing
    pub fn kind(&self) -> Result<CardKind> {
        Ok(match self.base_type()? {
            BaseType::Creature => match (self.power, self.toughness) {
                (Some(power), Some(toughness)) => CardKind::creature(power, toughness),
                _ => return Err(self.incomplete("creature needs power and toughness")),
            },
            BaseType::Land => CardKind::Land {
                produces: self
                    .provides_mana
                    .ok_or_else(|| self.incomplete("land needs providesMana"))?,
            },
            BaseType::Spell => CardKind::Spell {
                effect: self.effect.clone(),
            },
            BaseType::Enchantment => CardKind::Enchantment,
            BaseType::Artifact => CardKind::Artifact,
            BaseType::Planeswalker => CardKind::planeswalker(
                self.initial_loyalty
                    .ok_or_else(|| self.incomplete("planeswalker needs initialLoyalty"))?,
                self.loyalty_abilities.clone(),
            ),
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.kind().map(|_| ())
    }

    /// Build a card instance for its final owner
    pub fn instantiate(&self, id: CardId, owner: PlayerId) -> Result<Card> {
        let kind = self.kind()?;
        let card = Card::new(id, self.id.clone(), self.name.clone(), owner, kind);
        Ok(match card.kind {
            // Lands are free and describe their own mana
            CardKind::Land { produces } => {
                let text = if self.text.is_empty() {
                    format!("Tap to add one {{{produces}}} mana.")
                } else {
                    self.text.clone()
                };
                card.with_text(text)
            }
            _ => card.with_cost(self.mana_cost).with_text(self.text.clone()),
        })
    }
}

/// Lookup table of card definitions
///
/// Built once, then shared read-only (usually behind an `Arc`).
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: FxHashMap<DefinitionId, Arc<CardDefinition>>,
}

impl CardCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later definitions with the same id replace earlier ones
    pub fn from_definitions(definitions: impl IntoIterator<Item = CardDefinition>) -> Self {
        let mut catalog = CardCatalog::new();
        for def in definitions {
            catalog.insert(def);
        }
        catalog
    }

    pub fn insert(&mut self, definition: CardDefinition) {
        self.cards
            .insert(definition.id.clone(), Arc::new(definition));
    }

    /// Parse a JSON array of definitions
    pub fn from_json_str(json: &str) -> Result<Self> {
        let definitions: Vec<CardDefinition> = serde_json::from_str(json)?;
        Ok(Self::from_definitions(definitions))
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Load every `.json` file in a directory, one definition per file
    ///
    /// Files are read concurrently; the first unreadable or malformed file
    /// aborts the load.
    pub async fn load_from_dir(dir: &Path) -> Result<Self> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut tasks = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                tasks.push(tokio::spawn(Self::load_definition(path)));
            }
        }

        let mut catalog = CardCatalog::new();
        for task in tasks {
            catalog.insert(task.await??);
        }
        Ok(catalog)
    }

    async fn load_definition(path: PathBuf) -> Result<CardDefinition> {
        let content = tokio::fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load from a directory of files or a single array file
    pub async fn load(path: &Path) -> Result<Self> {
        if tokio::fs::metadata(path).await?.is_dir() {
            Self::load_from_dir(path).await
        } else {
            let content = tokio::fs::read_to_string(path).await?;
            Self::from_json_str(&content)
        }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<CardDefinition>> {
        self.cards.get(&DefinitionId::from(id))
    }

    pub fn get_required(&self, id: &str) -> Result<Arc<CardDefinition>> {
        self.get(id)
            .cloned()
            .ok_or_else(|| DuelError::CardNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// All definitions, ordered by id
    pub fn definitions(&self) -> Vec<Arc<CardDefinition>> {
        let mut defs: Vec<_> = self.cards.values().cloned().collect();
        defs.sort_by(|a, b| a.id.cmp(&b.id));
        defs
    }

    /// Check every definition can be instantiated
    pub fn validate(&self) -> Result<()> {
        self.definitions().iter().try_for_each(|def| def.validate())
    }
}
