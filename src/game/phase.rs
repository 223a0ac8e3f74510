//! Turn phases and turn bookkeeping

use crate::core::PlayerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phases of a turn, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    Untap,
    Upkeep,
    Draw,
    #[serde(rename = "Main Phase 1")]
    MainPhase1,
    Combat,
    #[serde(rename = "Main Phase 2")]
    MainPhase2,
    #[serde(rename = "End Step")]
    EndStep,
    Cleanup,
}

impl TurnPhase {
    /// Next phase in turn order; None after Cleanup (the turn is over)
    pub fn next(&self) -> Option<TurnPhase> {
        match self {
            TurnPhase::Untap => Some(TurnPhase::Upkeep),
            TurnPhase::Upkeep => Some(TurnPhase::Draw),
            TurnPhase::Draw => Some(TurnPhase::MainPhase1),
            TurnPhase::MainPhase1 => Some(TurnPhase::Combat),
            TurnPhase::Combat => Some(TurnPhase::MainPhase2),
            TurnPhase::MainPhase2 => Some(TurnPhase::EndStep),
            TurnPhase::EndStep => Some(TurnPhase::Cleanup),
            TurnPhase::Cleanup => None,
        }
    }

    /// Phases that advance on a single pass by the active player
    pub fn is_auto_pass(&self) -> bool {
        matches!(
            self,
            TurnPhase::Untap
                | TurnPhase::Upkeep
                | TurnPhase::Draw
                | TurnPhase::EndStep
                | TurnPhase::Cleanup
        )
    }

    pub fn is_main(&self) -> bool {
        matches!(self, TurnPhase::MainPhase1 | TurnPhase::MainPhase2)
    }
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnPhase::Untap => "Untap",
            TurnPhase::Upkeep => "Upkeep",
            TurnPhase::Draw => "Draw",
            TurnPhase::MainPhase1 => "Main Phase 1",
            TurnPhase::Combat => "Combat",
            TurnPhase::MainPhase2 => "Main Phase 2",
            TurnPhase::EndStep => "End Step",
            TurnPhase::Cleanup => "Cleanup",
        };
        f.write_str(name)
    }
}

/// Where the game is within the turn cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnStructure {
    /// 0 before the first turn starts, then 1, 2, ...
    pub turn_number: u32,

    pub phase: TurnPhase,

    /// Index into `GameState::players` of whose turn it is
    pub active_player_idx: usize,

    /// Holder of priority; exactly one player at any time
    pub priority_player: PlayerId,

    /// Player who took the latest stack-relevant action (cast or pass)
    pub last_actor: Option<PlayerId>,
}

impl TurnStructure {
    pub fn new(first_player: PlayerId) -> Self {
        TurnStructure {
            turn_number: 0,
            phase: TurnPhase::Untap,
            active_player_idx: 0,
            priority_player: first_player,
            last_actor: None,
        }
    }

    /// Bump the turn counter and pick the active player by parity:
    /// odd turns belong to the first player, even turns to the second.
    pub fn next_turn(&mut self) {
        self.turn_number += 1;
        self.active_player_idx = if self.turn_number % 2 == 1 { 0 } else { 1 };
        self.phase = TurnPhase::Untap;
        self.last_actor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_progression() {
        let mut phase = TurnPhase::Untap;
        let mut seen = vec![phase];
        while let Some(next) = phase.next() {
            seen.push(next);
            phase = next;
        }
        assert_eq!(seen.len(), 8);
        assert_eq!(seen[3], TurnPhase::MainPhase1);
        assert_eq!(phase, TurnPhase::Cleanup);
    }

    #[test]
    fn test_auto_pass_phases() {
        let auto: Vec<_> = [
            TurnPhase::Untap,
            TurnPhase::Upkeep,
            TurnPhase::Draw,
            TurnPhase::MainPhase1,
            TurnPhase::Combat,
            TurnPhase::MainPhase2,
            TurnPhase::EndStep,
            TurnPhase::Cleanup,
        ]
        .into_iter()
        .filter(TurnPhase::is_auto_pass)
        .collect();
        assert_eq!(auto.len(), 5);
        assert!(!TurnPhase::Combat.is_auto_pass());
    }

    #[test]
    fn test_turn_parity() {
        let mut turn = TurnStructure::new(PlayerId::new(0));
        assert_eq!(turn.turn_number, 0);

        turn.next_turn();
        assert_eq!((turn.turn_number, turn.active_player_idx), (1, 0));
        turn.next_turn();
        assert_eq!((turn.turn_number, turn.active_player_idx), (2, 1));
        turn.next_turn();
        assert_eq!((turn.turn_number, turn.active_player_idx), (3, 0));
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(TurnPhase::MainPhase1.to_string(), "Main Phase 1");
        assert_eq!(
            serde_json::to_string(&TurnPhase::EndStep).unwrap(),
            "\"End Step\""
        );
    }
}
