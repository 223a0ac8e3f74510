//! Duel Engine - rules engine for a two-player trading card duel
//!
//! Turn and priority state machine, a LIFO stack, mana payment and six
//! card kinds, plus a concurrent registry for hosting many games at once.

pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod registry;
pub mod zones;

pub use config::{GameConfig, RegistryConfig};
pub use error::{DuelError, Rejection, Result};
