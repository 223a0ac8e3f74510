//! Turn structure, the stack and the game engine

pub mod autopilot;
pub mod logger;
pub mod phase;
pub mod stack;
pub mod state;
pub mod view;

pub use autopilot::{Autopilot, AutopilotResult, StopReason};
pub use logger::{GameLogger, LogEntry, OutputFormat, OutputMode, VerbosityLevel};
pub use phase::{TurnPhase, TurnStructure};
pub use stack::{Stack, StackEntry, Target};
pub use state::GameState;
pub use view::{
    CardSummary, GameOutcome, PlayerState, PlayerView, PublicState, StackEntryKind, StackSummary,
};
