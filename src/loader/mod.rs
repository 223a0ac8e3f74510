//! Card catalog, deck and game loaders
//!
//! The catalog is JSON (one array, or a directory of per-card files); decks
//! are plain `count card-id` lists.

pub mod catalog;
pub mod deck;
pub mod game_init;

pub use catalog::{CardCatalog, CardDefinition};
pub use deck::{DeckBuilder, DeckEntry, DeckList, DeckLoader, DeckPlan};
pub use game_init::GameInitializer;
