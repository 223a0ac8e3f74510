//! Serializable snapshots of a game for transports and clients

use crate::core::{
    Card, CardId, CardName, CardType, Color, DefinitionId, LoyaltyAbility, ManaCost, ManaPool,
    Player, PlayerId, PlayerName, TapState,
};
use crate::game::{GameState, StackEntry, TurnPhase};
use crate::zones::{CardZone, Zone};
use crate::Result;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Match result, derived from life totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum GameOutcome {
    InProgress,
    Won { winner: PlayerId },
    Draw,
}

impl GameOutcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub id: CardId,
    pub definition_id: DefinitionId,
    pub name: CardName,
    pub types: SmallVec<[CardType; 2]>,
    pub mana_cost: ManaCost,
    pub text: String,
    pub state: TapState,
    pub current_zone: Zone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toughness: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_toughness: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_summoning_sickness: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provides_mana: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loyalty: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loyalty_abilities: Vec<LoyaltyAbility>,
}

impl From<&Card> for CardSummary {
    fn from(card: &Card) -> Self {
        CardSummary {
            id: card.id,
            definition_id: card.definition_id.clone(),
            name: card.name.clone(),
            types: card.types.clone(),
            mana_cost: card.mana_cost,
            text: card.text.clone(),
            state: card.state,
            current_zone: card.zone,
            power: card.power(),
            toughness: card.toughness(),
            current_toughness: card.current_toughness(),
            has_summoning_sickness: card.is_creature().then(|| card.has_summoning_sickness()),
            provides_mana: card.produces_mana(),
            loyalty: card.loyalty(),
            loyalty_abilities: card.loyalty_abilities().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackEntryKind {
    Spell,
    Ability,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackSummary {
    #[serde(rename = "type")]
    pub kind: StackEntryKind,
    pub source_card_name: CardName,
    pub source_player_name: PlayerName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ability_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: PlayerName,
    pub life: i32,
    pub hand_size: usize,
    /// Only filled in for the player the view was made for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand: Option<Vec<CardSummary>>,
    pub deck_size: usize,
    pub mana_pool: ManaPool,
    pub battlefield: Vec<CardSummary>,
    pub graveyard: Vec<CardSummary>,
}

/// What everyone may see; a player view additionally reveals one hand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicState {
    pub turn_number: u32,
    pub current_phase: TurnPhase,
    pub player_with_priority_id: PlayerId,
    pub active_player: PlayerState,
    pub non_active_player: PlayerState,
    /// Top of the stack first
    pub stack: Vec<StackSummary>,
    pub outcome: GameOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<PlayerId>,
}

pub type PlayerView = PublicState;

impl GameState {
    pub fn card_summary(&self, id: CardId) -> Result<CardSummary> {
        Ok(CardSummary::from(self.card(id)?))
    }

    fn summarize_zone(&self, zone: &CardZone) -> Result<Vec<CardSummary>> {
        zone.iter().map(|id| self.card_summary(id)).collect()
    }

    fn player_state(&self, player: &Player, reveal_hand: bool) -> Result<PlayerState> {
        let hand = if reveal_hand {
            Some(self.summarize_zone(&player.zones.hand)?)
        } else {
            None
        };
        Ok(PlayerState {
            id: player.id,
            name: player.name.clone(),
            life: player.life,
            hand_size: player.zones.hand.len(),
            hand,
            deck_size: player.zones.library.len(),
            mana_pool: player.mana_pool,
            battlefield: self.summarize_zone(&player.zones.battlefield)?,
            graveyard: self.summarize_zone(&player.zones.graveyard)?,
        })
    }

    fn stack_summary(&self, entry: &StackEntry) -> Result<StackSummary> {
        let (kind, ability_name) = match entry {
            StackEntry::Spell { .. } => (StackEntryKind::Spell, None),
            StackEntry::Ability { ability_name, .. } => {
                (StackEntryKind::Ability, Some(ability_name.clone()))
            }
        };
        Ok(StackSummary {
            kind,
            source_card_name: self.card(entry.source())?.name.clone(),
            source_player_name: self.player(entry.controller())?.name.clone(),
            target_id: entry.target().map(|t| t.id()),
            ability_name,
        })
    }

    fn snapshot(&self, viewer: Option<PlayerId>) -> Result<PublicState> {
        let active = self.player(self.active_player_id())?;
        let non_active = self.player(self.non_active_player_id())?;
        Ok(PublicState {
            turn_number: self.turn.turn_number,
            current_phase: self.turn.phase,
            player_with_priority_id: self.turn.priority_player,
            active_player: self.player_state(active, viewer == Some(active.id))?,
            non_active_player: self.player_state(non_active, viewer == Some(non_active.id))?,
            stack: self
                .stack
                .iter()
                .map(|entry| self.stack_summary(entry))
                .collect::<Result<_>>()?,
            outcome: self.outcome(),
            viewer,
        })
    }

    /// Snapshot with both hands hidden
    pub fn public_state(&self) -> Result<PublicState> {
        self.snapshot(None)
    }

    /// Snapshot with `player_id`'s own hand revealed
    pub fn state_for_player(&self, player_id: PlayerId) -> Result<PlayerView> {
        self.player(player_id)?;
        self.snapshot(Some(player_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::core::CardKind;

    fn small_game() -> GameState {
        let mut game = GameState::new_two_player("Alice", "Bob", GameConfig::quiet(3));
        for owner in [PlayerId::new(0), PlayerId::new(1)] {
            for _ in 0..10 {
                let id = game.next_card_id();
                let kind = CardKind::Land {
                    produces: Color::Green,
                };
                let card = Card::new(id, "forest", "Forest", owner, kind);
                game.add_card_to_library(card).unwrap();
            }
        }
        game.start().unwrap();
        game
    }

    #[test]
    fn test_public_state_hides_hands() {
        let game = small_game();
        let state = game.public_state().unwrap();

        assert_eq!(state.turn_number, 1);
        assert_eq!(state.current_phase, TurnPhase::MainPhase1);
        assert_eq!(state.active_player.hand_size, 7);
        assert!(state.active_player.hand.is_none());
        assert!(state.non_active_player.hand.is_none());
        assert_eq!(state.outcome, GameOutcome::InProgress);
    }

    #[test]
    fn test_player_view_reveals_only_own_hand() {
        let game = small_game();
        let view = game.state_for_player(PlayerId::new(1)).unwrap();

        assert!(view.active_player.hand.is_none());
        let hand = view.non_active_player.hand.as_ref().unwrap();
        assert_eq!(hand.len(), 7);
        assert_eq!(hand[0].provides_mana, Some(Color::Green));
        assert_eq!(hand[0].current_zone, Zone::Hand);

        assert!(game.state_for_player(PlayerId::new(5)).is_err());
    }

    #[test]
    fn test_json_field_names() {
        let game = small_game();
        let json = serde_json::to_value(game.public_state().unwrap()).unwrap();
        assert_eq!(json["currentPhase"], "Main Phase 1");
        assert_eq!(json["playerWithPriorityId"], 0);
        assert_eq!(json["activePlayer"]["handSize"], 7);
        assert_eq!(json["outcome"]["status"], "inProgress");
    }
}
