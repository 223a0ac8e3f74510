//! Registry of running games
//!
//! Many games are hosted at once and actions for them arrive concurrently.
//! The map lock is only held to look up, insert or remove a game; each game
//! has its own mutex, so every action on one game runs to completion before
//! the next one starts while different games proceed in parallel.

use crate::config::RegistryConfig;
use crate::core::{CardId, GameId, PlayerId};
use crate::game::{GameState, PlayerView, PublicState, Target};
use crate::loader::{CardCatalog, DeckList, GameInitializer};
use crate::{DuelError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// One side of a new game: a player name and a flat list of card ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub name: String,
    pub deck: Vec<String>,
}

impl Seat {
    pub fn new(name: impl Into<String>, deck: Vec<String>) -> Self {
        Seat {
            name: name.into(),
            deck,
        }
    }
}

/// A hosted game and the time it was last touched
#[derive(Debug)]
pub struct GameEntry {
    pub game: GameState,
    last_activity: Instant,
}

impl GameEntry {
    fn new(game: GameState) -> Self {
        GameEntry {
            game,
            last_activity: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }
}

type SharedEntry = Arc<Mutex<GameEntry>>;

struct RegistryInner {
    catalog: Arc<CardCatalog>,
    config: RegistryConfig,
    games: RwLock<FxHashMap<GameId, SharedEntry>>,
    next_id: AtomicU64,
}

/// Hosts games keyed by `GameId`
///
/// Cloning is cheap and yields a handle to the same registry.
#[derive(Clone)]
pub struct GameRegistry {
    inner: Arc<RegistryInner>,
}

impl GameRegistry {
    pub fn new(catalog: Arc<CardCatalog>, config: RegistryConfig) -> Self {
        GameRegistry {
            inner: Arc::new(RegistryInner {
                catalog,
                config,
                games: RwLock::new(FxHashMap::default()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn catalog(&self) -> &CardCatalog {
        &self.inner.catalog
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }

    /// Build both decks, start the game and register it
    ///
    /// Nothing is registered if either deck fails to build.
    pub async fn start_game(&self, player1: Seat, player2: Seat) -> Result<(GameId, PublicState)> {
        let deck1 = DeckList::from_ids(player1.deck);
        let deck2 = DeckList::from_ids(player2.deck);
        let game = GameInitializer::new(&self.inner.catalog).init_game(
            player1.name,
            &deck1,
            player2.name,
            &deck2,
            self.inner.config.game.clone(),
        )?;
        let state = game.public_state()?;

        let id = GameId::new(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner
            .games
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(GameEntry::new(game))));
        Ok((id, state))
    }

    async fn entry(&self, id: GameId) -> Result<SharedEntry> {
        self.inner
            .games
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(DuelError::GameNotFound(id))
    }

    /// Run `action` with exclusive access to one game
    pub async fn with_game<R>(
        &self,
        id: GameId,
        action: impl FnOnce(&mut GameState) -> Result<R>,
    ) -> Result<R> {
        let entry = self.entry(id).await?;
        let mut entry = entry.lock().await;
        entry.touch();
        action(&mut entry.game)
    }

    pub async fn cast_spell(
        &self,
        id: GameId,
        player: PlayerId,
        card: CardId,
        target: Option<u32>,
    ) -> Result<PlayerView> {
        self.with_game(id, |game| {
            let target = target.map(|t| target_from_id(game, t));
            game.play_card(player, card, target)?;
            game.state_for_player(player)
        })
        .await
    }

    pub async fn pass_priority(&self, id: GameId, player: PlayerId) -> Result<PlayerView> {
        self.with_game(id, |game| {
            game.pass_priority(player)?;
            game.state_for_player(player)
        })
        .await
    }

    /// Advance the phase; returns the view of whoever is active afterwards
    pub async fn advance_phase(&self, id: GameId) -> Result<PlayerView> {
        self.with_game(id, |game| {
            game.advance_phase()?;
            game.state_for_player(game.active_player_id())
        })
        .await
    }

    pub async fn tap_for_mana(
        &self,
        id: GameId,
        player: PlayerId,
        land: CardId,
    ) -> Result<PlayerView> {
        self.with_game(id, |game| {
            game.tap_for_mana(player, land)?;
            game.state_for_player(player)
        })
        .await
    }

    pub async fn activate_loyalty_ability(
        &self,
        id: GameId,
        player: PlayerId,
        planeswalker: CardId,
        ability_index: usize,
        target: Option<u32>,
    ) -> Result<PlayerView> {
        self.with_game(id, |game| {
            let target = target.map(|t| target_from_id(game, t));
            game.activate_loyalty_ability(player, planeswalker, ability_index, target)?;
            game.state_for_player(player)
        })
        .await
    }

    pub async fn public_state(&self, id: GameId) -> Result<PublicState> {
        self.with_game(id, |game| game.public_state()).await
    }

    pub async fn state_for_player(&self, id: GameId, player: PlayerId) -> Result<PlayerView> {
        self.with_game(id, |game| game.state_for_player(player)).await
    }

    /// Remove a game; false if it was not registered
    pub async fn end_game(&self, id: GameId) -> bool {
        self.inner.games.write().await.remove(&id).is_some()
    }

    pub async fn game_ids(&self) -> Vec<GameId> {
        let mut ids: Vec<GameId> = self.inner.games.read().await.keys().copied().collect();
        ids.sort();
        ids
    }

    pub async fn len(&self) -> usize {
        self.inner.games.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remove games nobody touched for longer than `max_idle`
    ///
    /// A game whose lock is held right now is in use and never reaped.
    pub async fn reap_idle(&self, max_idle: Duration) -> Vec<GameId> {
        let mut games = self.inner.games.write().await;
        let mut reaped: Vec<GameId> = games
            .iter()
            .filter(|(_, entry)| {
                entry
                    .try_lock()
                    .map(|entry| entry.idle_for() > max_idle)
                    .unwrap_or(false)
            })
            .map(|(id, _)| *id)
            .collect();
        for id in &reaped {
            games.remove(id);
        }
        reaped.sort();
        reaped
    }

    /// Reap idle games periodically on the tokio runtime
    ///
    /// Uses `idle_timeout_secs` and `reap_interval_secs` from the config.
    /// Abort the returned handle to stop it.
    pub fn spawn_reaper(&self) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(registry.config().reap_interval());
            loop {
                interval.tick().await;
                registry.reap_idle(registry.config().idle_timeout()).await;
            }
        })
    }
}

/// Player and card ids share one counter, so a bare id is unambiguous
fn target_from_id(game: &GameState, id: u32) -> Target {
    let player = PlayerId::new(id);
    if game.is_participant(player) {
        Target::Player(player)
    } else {
        Target::Card(CardId::new(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::TurnPhase;
    use crate::Rejection;

    fn registry() -> GameRegistry {
        let catalog = CardCatalog::from_json_str(
            r#"[{"id": "forest", "name": "Forest", "baseType": "Land", "providesMana": "G"},
                {"id": "bears", "name": "Grizzly Bears", "baseType": "Creature",
                 "manaCost": {"C": 1, "G": 1}, "power": 2, "toughness": 2}]"#,
        )
        .unwrap();
        let config = RegistryConfig {
            game: GameConfig::quiet(21),
            ..RegistryConfig::default()
        };
        GameRegistry::new(Arc::new(catalog), config)
    }

    fn seat(name: &str) -> Seat {
        let mut deck = vec!["forest".to_string(); 20];
        deck.extend(vec!["bears".to_string(); 20]);
        Seat::new(name, deck)
    }

    #[tokio::test]
    async fn test_start_and_query() {
        let registry = registry();
        let (id, state) = registry.start_game(seat("Alice"), seat("Bob")).await.unwrap();

        assert_eq!(state.turn_number, 1);
        assert_eq!(state.current_phase, TurnPhase::MainPhase1);
        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.game_ids().await, vec![id]);

        let view = registry.state_for_player(id, PlayerId::new(0)).await.unwrap();
        assert_eq!(view.active_player.hand.as_ref().map(Vec::len), Some(7));
        assert!(view.non_active_player.hand.is_none());
    }

    #[tokio::test]
    async fn test_bad_deck_registers_nothing() {
        let registry = registry();
        let result = registry
            .start_game(seat("Alice"), Seat::new("Bob", vec!["unknown".into()]))
            .await;
        assert!(matches!(result, Err(DuelError::CardNotFound(_))));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_rejections_and_unknown_games() {
        let registry = registry();
        let (id, _) = registry.start_game(seat("Alice"), seat("Bob")).await.unwrap();

        let err = registry.pass_priority(id, PlayerId::new(1)).await.unwrap_err();
        assert_eq!(err.rejection(), Some(Rejection::NoPriority));

        let view = registry.state_for_player(id, PlayerId::new(0)).await.unwrap();
        let card = view.active_player.hand.as_ref().unwrap()[0].id;
        let err = registry
            .cast_spell(id, PlayerId::new(0), card, Some(9999))
            .await
            .unwrap_err();
        assert_eq!(err.rejection(), Some(Rejection::InvalidTarget));

        let missing = GameId::new(999);
        assert!(matches!(
            registry.public_state(missing).await,
            Err(DuelError::GameNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_pass_then_advance() {
        let registry = registry();
        let (id, _) = registry.start_game(seat("Alice"), seat("Bob")).await.unwrap();

        let view = registry.pass_priority(id, PlayerId::new(0)).await.unwrap();
        assert_eq!(view.player_with_priority_id, PlayerId::new(1));
        let view = registry.pass_priority(id, PlayerId::new(1)).await.unwrap();
        assert_eq!(view.current_phase, TurnPhase::Combat);

        let view = registry.advance_phase(id).await.unwrap();
        assert_eq!(view.current_phase, TurnPhase::MainPhase2);
        assert_eq!(view.viewer, Some(PlayerId::new(0)));
    }

    #[tokio::test]
    async fn test_end_game() {
        let registry = registry();
        let (id, _) = registry.start_game(seat("Alice"), seat("Bob")).await.unwrap();
        assert!(registry.end_game(id).await);
        assert!(!registry.end_game(id).await);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_reap_idle() {
        let registry = registry();
        let (old, _) = registry.start_game(seat("Alice"), seat("Bob")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(250)).await;
        let (fresh, _) = registry.start_game(seat("Carol"), seat("Dan")).await.unwrap();

        assert!(registry.reap_idle(Duration::from_secs(3600)).await.is_empty());
        assert_eq!(
            registry.reap_idle(Duration::from_millis(150)).await,
            vec![old]
        );
        assert_eq!(registry.game_ids().await, vec![fresh]);
    }
}
