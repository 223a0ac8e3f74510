//! Autopilot: plays both seats of a game without input
//!
//! In its main phases the active player taps every untapped land and casts
//! the first card from hand it can afford; every other decision is a pass.
//! It plays at most one land per turn, although the engine itself does not
//! enforce that limit. Used by the CLI, benchmarks and end-to-end tests.

use crate::core::{CardId, PlayerId};
use crate::game::{GameOutcome, GameState};
use crate::{DuelError, Result};

/// Why an autopilot run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A player's life reached 0
    GameOver,
    TurnLimit,
    /// Safety valve against a game that never advances
    ActionLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutopilotResult {
    pub outcome: GameOutcome,
    pub turns_played: u32,
    pub casts: usize,
    pub passes: usize,
    pub reason: StopReason,
}

pub struct Autopilot<'a> {
    game: &'a mut GameState,
    max_turns: u32,
    max_actions: usize,
    /// Turn in which each seat last played a land
    land_played: [Option<u32>; 2],
    casts: usize,
    passes: usize,
}

impl<'a> Autopilot<'a> {
    pub fn new(game: &'a mut GameState) -> Self {
        Autopilot {
            game,
            max_turns: 100,
            max_actions: 100_000,
            land_played: [None; 2],
            casts: 0,
            passes: 0,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_max_actions(mut self, max_actions: usize) -> Self {
        self.max_actions = max_actions;
        self
    }

    /// Play until the game ends or a limit is hit
    pub fn run(&mut self) -> Result<AutopilotResult> {
        let first_turn = self.game.turn_number();
        let reason = loop {
            if self.game.outcome().is_over() {
                break StopReason::GameOver;
            }
            if self.game.turn_number().saturating_sub(first_turn) >= self.max_turns {
                break StopReason::TurnLimit;
            }
            if self.casts + self.passes >= self.max_actions {
                break StopReason::ActionLimit;
            }
            self.step()?;
        };

        Ok(AutopilotResult {
            outcome: self.game.outcome(),
            turns_played: self.game.turn_number().saturating_sub(first_turn),
            casts: self.casts,
            passes: self.passes,
            reason,
        })
    }

    /// Make one decision for the priority holder
    pub fn step(&mut self) -> Result<()> {
        let player = self.game.priority_player();
        if let Some(card) = self.choose_cast(player)? {
            self.tap_all_lands(player)?;
            match self.game.play_card(player, card, None) {
                Ok(()) => {
                    if self.game.card(card)?.is_land() {
                        let seat = self.seat(player)?;
                        self.land_played[seat] = Some(self.game.turn_number());
                    }
                    self.casts += 1;
                    return Ok(());
                }
                Err(e) if e.is_rejection() => {}
                Err(e) => return Err(e),
            }
        }
        self.game.pass_priority(player)?;
        self.passes += 1;
        Ok(())
    }

    fn seat(&self, player: PlayerId) -> Result<usize> {
        self.game
            .player_idx(player)
            .ok_or(DuelError::PlayerNotInGame(player.as_u32()))
    }

    /// First card in hand payable from the pool plus every untapped land
    ///
    /// Only the active player casts, in a main phase with an empty stack.
    fn choose_cast(&self, player_id: PlayerId) -> Result<Option<CardId>> {
        if player_id != self.game.active_player_id()
            || !self.game.stack.is_empty()
            || !self.game.current_phase().is_main()
        {
            return Ok(None);
        }
        let player = self.game.player(player_id)?;
        let land_allowed =
            self.land_played[self.seat(player_id)?] != Some(self.game.turn_number());

        let mut potential = player.mana_pool;
        for card_id in player.zones.battlefield.iter() {
            let card = self.game.card(card_id)?;
            if let (Some(color), false) = (card.produces_mana(), card.is_tapped()) {
                potential.add_mana(color, 1);
            }
        }

        for card_id in player.zones.hand.iter() {
            let card = self.game.card(card_id)?;
            if card.is_land() && !land_allowed {
                continue;
            }
            if potential.can_pay(&card.mana_cost) {
                return Ok(Some(card_id));
            }
        }
        Ok(None)
    }

    fn tap_all_lands(&mut self, player_id: PlayerId) -> Result<()> {
        let untapped: Vec<CardId> = self
            .game
            .player(player_id)?
            .zones
            .battlefield
            .iter()
            .filter(|&id| {
                self.game
                    .card(id)
                    .map(|c| c.is_land() && !c.is_tapped())
                    .unwrap_or(false)
            })
            .collect();
        for land in untapped {
            self.game.tap_for_mana(player_id, land)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::core::{Card, CardKind, Color, ManaCost};

    fn forest_and_bears_game(seed: u64) -> GameState {
        let mut game = GameState::new_two_player("Alice", "Bob", GameConfig::quiet(seed));
        for owner in [PlayerId::new(0), PlayerId::new(1)] {
            for i in 0..24 {
                let id = game.next_card_id();
                let card = if i % 2 == 0 {
                    let kind = CardKind::Land {
                        produces: Color::Green,
                    };
                    Card::new(id, "forest", "Forest", owner, kind)
                } else {
                    let kind = CardKind::creature(2, 2);
                    Card::new(id, "bears", "Grizzly Bears", owner, kind)
                        .with_cost(ManaCost::from_string("1G"))
                };
                game.add_card_to_library(card).unwrap();
            }
        }
        game.start().unwrap();
        game
    }

    #[test]
    fn test_runs_until_someone_decks_out() {
        let mut game = forest_and_bears_game(4);
        let result = Autopilot::new(&mut game).run().unwrap();

        assert_eq!(result.reason, StopReason::GameOver);
        assert!(result.outcome.is_over());
        assert!(result.casts > 0);
        assert!(game.players.iter().any(|p| p.zones.battlefield.len() > 1));
    }

    #[test]
    fn test_one_land_per_turn() {
        let mut game = forest_and_bears_game(9);
        Autopilot::new(&mut game).with_max_turns(1).run().unwrap();

        let lands = game.players[0]
            .zones
            .battlefield
            .iter()
            .filter(|&id| game.card(id).unwrap().is_land())
            .count();
        assert!(lands <= 1);
    }

    #[test]
    fn test_turn_limit() {
        let mut game = forest_and_bears_game(2);
        let result = Autopilot::new(&mut game).with_max_turns(3).run().unwrap();
        assert_eq!(result.reason, StopReason::TurnLimit);
        assert_eq!(result.turns_played, 3);
        assert_eq!(result.outcome, GameOutcome::InProgress);
    }
}
