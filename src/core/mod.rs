//! Core game types and entities

pub mod card;
pub mod entity;
pub mod mana;
pub mod player;
pub mod types;

pub use card::{
    BaseType, Card, CardKind, CardType, DamageOutcome, LoyaltyAbility, LoyaltyAbilityKind,
    LoyaltyCost, LoyaltyOutcome, Resolution, SpellEffect, TapState,
};
pub use entity::{EntityId, EntityStore, GameEntity};
pub use mana::{Color, ManaCost, ManaPool};
pub use player::Player;
pub use types::{CardName, DefinitionId, GameId, PlayerName};

/// Card ID type
pub type CardId = EntityId<Card>;

/// Player ID type
pub type PlayerId = EntityId<Player>;
