//! Error types for the duel engine

use crate::core::GameId;
use thiserror::Error;

/// Hard failures: bad data, missing entities, I/O
#[derive(Error, Debug)]
pub enum DuelError {
    #[error("Card definition not found in catalog: {0}")]
    CardNotFound(String),

    #[error("Invalid deck format: {0}")]
    InvalidDeckFormat(String),

    #[error("Incomplete definition for {id}: {reason}")]
    IncompleteDefinition { id: String, reason: String },

    #[error("Unsupported base type '{base_type}' for card {id}")]
    UnsupportedBaseType { id: String, base_type: String },

    #[error("Entity not found: {0}")]
    EntityNotFound(u32),

    #[error("Game not found: {0}")]
    GameNotFound(GameId),

    #[error("Player {0} is not part of this game")]
    PlayerNotInGame(u32),

    #[error("Action rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

impl DuelError {
    /// True when the error is a refused game action rather than a defect.
    ///
    /// Rejections leave the game untouched; a transport typically maps them
    /// to a client error.
    pub fn is_rejection(&self) -> bool {
        matches!(self, DuelError::Rejected(_))
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            DuelError::Rejected(r) => Some(*r),
            _ => None,
        }
    }
}

/// A game action the rules refuse
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("player is not a participant in this game")]
    NotParticipant,

    #[error("player does not hold priority")]
    NoPriority,

    #[error("card is not in the player's hand")]
    CardNotInHand,

    #[error("card cannot be played right now")]
    NotPlayable,

    #[error("not enough mana to pay the cost")]
    InsufficientMana,

    #[error("the stack must be empty")]
    StackNotEmpty,

    #[error("not enough loyalty")]
    InsufficientLoyalty,

    #[error("abilities with an X loyalty cost are not supported")]
    VariableLoyaltyCost,

    #[error("card is not on the player's battlefield")]
    NotOnBattlefield,

    #[error("card is not a planeswalker")]
    NotAPlaneswalker,

    #[error("no such loyalty ability")]
    NoSuchAbility,

    #[error("card is not a land")]
    NotALand,

    #[error("card is already tapped")]
    AlreadyTapped,

    #[error("target is not a player or card in this game")]
    InvalidTarget,
}

pub type Result<T> = std::result::Result<T, DuelError>;
