//! Main game state structure and the turn/priority engine

use crate::config::GameConfig;
use crate::core::{
    Card, CardId, Color, DamageOutcome, EntityId, EntityStore, LoyaltyOutcome, Player, PlayerId,
    PlayerName, Resolution, SpellEffect,
};
use crate::game::{
    GameLogger, GameOutcome, Stack, StackEntry, Target, TurnPhase, TurnStructure, VerbosityLevel,
};
use crate::zones::Zone;
use crate::{DuelError, Rejection, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// Verbose event logging, compiled out without the `verbose-logging` feature
macro_rules! log_verbose {
    ($game:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $game.logger.verbose(&format!($($arg)*));
        }
    };
}

/// Complete state of one duel
///
/// All mutation goes through the methods below. Operations that the rules
/// can refuse check every precondition first and return
/// `DuelError::Rejected` without touching anything.
#[derive(Debug, Clone)]
pub struct GameState {
    /// All cards in the game
    pub cards: EntityStore<Card>,

    /// Exactly two players; index 0 plays the odd turns
    pub players: Vec<Player>,

    pub stack: Stack,

    pub turn: TurnStructure,

    pub config: GameConfig,

    /// Shuffling RNG, seeded from the config for reproducible games
    rng: ChaCha12Rng,

    /// Shared counter for player and card IDs
    next_entity_id: u32,

    pub logger: GameLogger,
}

impl GameState {
    /// Create a game with two players and empty zones
    pub fn new_two_player(
        player1_name: impl Into<PlayerName>,
        player2_name: impl Into<PlayerName>,
        config: GameConfig,
    ) -> Self {
        let p1_id = PlayerId::new(0);
        let p2_id = PlayerId::new(1);
        let players = vec![
            Player::new(p1_id, player1_name, config.starting_life),
            Player::new(p2_id, player2_name, config.starting_life),
        ];

        let rng = match config.seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::from_entropy(),
        };

        let mut logger = GameLogger::with_verbosity(config.verbosity);
        logger.set_output_mode(config.output_mode);
        logger.set_output_format(config.output_format);

        GameState {
            cards: EntityStore::new(),
            players,
            stack: Stack::new(),
            turn: TurnStructure::new(p1_id),
            config,
            rng,
            next_entity_id: 2,
            logger,
        }
    }

    pub fn next_card_id(&mut self) -> CardId {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Register a card and put it on top of its owner's library
    pub fn add_card_to_library(&mut self, mut card: Card) -> Result<CardId> {
        let id = card.id;
        let idx = self.player_idx_or_err(card.owner)?;
        card.zone = Zone::Library;
        self.players[idx].zones.library.add(id);
        self.cards.insert(id, card);
        Ok(id)
    }

    /// Shuffle both libraries, deal opening hands and begin turn 1
    ///
    /// Does nothing once the first turn has started.
    pub fn start(&mut self) -> Result<()> {
        if self.turn.turn_number > 0 {
            return Ok(());
        }
        for player in &mut self.players {
            player.zones.library.shuffle(&mut self.rng);
        }
        for idx in 0..self.players.len() {
            let player_id = self.players[idx].id;
            for _ in 0..self.config.opening_hand_size {
                self.draw_card(player_id)?;
            }
        }
        self.start_next_turn()
    }

    // ---- lookups -------------------------------------------------------

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(DuelError::PlayerNotInGame(id.as_u32()))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DuelError::PlayerNotInGame(id.as_u32()))
    }

    pub fn player_idx(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    fn player_idx_or_err(&self, id: PlayerId) -> Result<usize> {
        self.player_idx(id)
            .ok_or(DuelError::PlayerNotInGame(id.as_u32()))
    }

    pub fn card(&self, id: CardId) -> Result<&Card> {
        self.cards.get(id)
    }

    pub fn is_participant(&self, id: PlayerId) -> bool {
        self.player_idx(id).is_some()
    }

    pub fn active_player_id(&self) -> PlayerId {
        self.players[self.turn.active_player_idx].id
    }

    pub fn non_active_player_id(&self) -> PlayerId {
        self.players[1 - self.turn.active_player_idx].id
    }

    pub fn opponent_of(&self, id: PlayerId) -> Result<PlayerId> {
        let idx = self.player_idx_or_err(id)?;
        Ok(self.players[1 - idx].id)
    }

    pub fn priority_player(&self) -> PlayerId {
        self.turn.priority_player
    }

    pub fn current_phase(&self) -> TurnPhase {
        self.turn.phase
    }

    pub fn turn_number(&self) -> u32 {
        self.turn.turn_number
    }

    pub fn outcome(&self) -> GameOutcome {
        let lost: Vec<bool> = self.players.iter().map(Player::has_lost).collect();
        match (lost[0], lost[1]) {
            (false, false) => GameOutcome::InProgress,
            (true, true) => GameOutcome::Draw,
            (false, true) => GameOutcome::Won {
                winner: self.players[0].id,
            },
            (true, false) => GameOutcome::Won {
                winner: self.players[1].id,
            },
        }
    }

    fn player_label(&self, id: PlayerId) -> String {
        self.player(id)
            .map(|p| p.name.to_string())
            .unwrap_or_else(|_| format!("player {id}"))
    }

    fn card_label(&self, id: CardId) -> String {
        self.cards
            .get(id)
            .map(|c| format!("{} ({})", c.name, id))
            .unwrap_or_else(|_| format!("card {id}"))
    }

    fn reject(&self, rejection: Rejection) -> DuelError {
        self.logger.event(
            VerbosityLevel::Verbose,
            "rejection",
            &format!("Rejected: {rejection}"),
        );
        DuelError::Rejected(rejection)
    }

    fn ensure_participant(&self, id: PlayerId) -> Result<()> {
        if self.is_participant(id) {
            Ok(())
        } else {
            Err(self.reject(Rejection::NotParticipant))
        }
    }

    fn ensure_priority(&self, id: PlayerId) -> Result<()> {
        self.ensure_participant(id)?;
        if self.turn.priority_player == id {
            Ok(())
        } else {
            Err(self.reject(Rejection::NoPriority))
        }
    }

    // ---- zones ---------------------------------------------------------

    /// Move a card between zones of its owner
    ///
    /// The only place zone membership changes; the card's `zone` field and the
    /// owning collections are updated together. Stack membership is carried by
    /// the stack entry, which callers push or pop around the move.
    pub fn move_card(&mut self, card_id: CardId, to: Zone) -> Result<()> {
        let (owner, from) = {
            let card = self.cards.get(card_id)?;
            (card.owner, card.zone)
        };
        let idx = self.player_idx_or_err(owner)?;
        if !self.cards.get_mut(card_id)?.move_to(to) {
            return Ok(());
        }

        let zones = &mut self.players[idx].zones;
        if let Some(zone) = zones.get_zone_mut(from) {
            zone.remove(card_id);
        }
        if let Some(zone) = zones.get_zone_mut(to) {
            zone.add(card_id);
        }

        log_verbose!(
            self,
            "{} moves from {} to {}",
            self.card_label(card_id),
            from,
            to
        );
        Ok(())
    }

    /// Draw the top card of a library
    ///
    /// Drawing from an empty library drops the player's life to 0.
    pub fn draw_card(&mut self, player_id: PlayerId) -> Result<Option<CardId>> {
        let top = self.player(player_id)?.zones.library.peek_top();
        match top {
            Some(card_id) => {
                self.move_card(card_id, Zone::Hand)?;
                log_verbose!(
                    self,
                    "{} draws {}",
                    self.player_label(player_id),
                    self.card_label(card_id)
                );
                Ok(Some(card_id))
            }
            None => {
                self.player_mut(player_id)?.life = 0;
                self.logger.normal(&format!(
                    "{} cannot draw from an empty library",
                    self.player_label(player_id)
                ));
                Ok(None)
            }
        }
    }

    /// Untap every permanent of both players and clear summoning sickness
    pub fn untap_all(&mut self) -> Result<()> {
        let permanents: Vec<CardId> = self
            .players
            .iter()
            .flat_map(|p| p.zones.battlefield.iter())
            .collect();
        for card_id in permanents {
            let card = self.cards.get_mut(card_id)?;
            card.untap();
            card.remove_summoning_sickness();
        }
        Ok(())
    }

    /// Damage wears off at Cleanup
    fn remove_all_damage(&mut self) -> Result<()> {
        let permanents: Vec<CardId> = self
            .players
            .iter()
            .flat_map(|p| p.zones.battlefield.iter())
            .collect();
        for card_id in permanents {
            self.cards.get_mut(card_id)?.remove_all_damage();
        }
        Ok(())
    }

    fn discard_to_hand_size(&mut self, player_id: PlayerId) -> Result<()> {
        let max = self.config.max_hand_size;
        loop {
            let hand = &self.player(player_id)?.zones.hand;
            let Some(card_id) = hand.first().filter(|_| hand.len() > max) else {
                return Ok(());
            };
            self.move_card(card_id, Zone::Graveyard)?;
            self.logger.normal(&format!(
                "{} discards {}",
                self.player_label(player_id),
                self.card_label(card_id)
            ));
        }
    }

    // ---- turn structure ------------------------------------------------

    fn start_next_turn(&mut self) -> Result<()> {
        self.begin_turn();
        self.go_to_phase(TurnPhase::Untap)
    }

    fn begin_turn(&mut self) {
        self.turn.next_turn();
        self.logger.event(
            VerbosityLevel::Minimal,
            "turn",
            &format!(
                "Turn {} ({})",
                self.turn.turn_number,
                self.player_label(self.active_player_id())
            ),
        );
    }

    /// Enter `phase`, then keep going while the phase needs no decision
    ///
    /// Automatic phases are passed by the active player as soon as their
    /// handler ran, so the game only ever rests in a phase where someone acts.
    fn go_to_phase(&mut self, phase: TurnPhase) -> Result<()> {
        let mut pending = Some(phase);
        while let Some(phase) = pending {
            self.enter_phase(phase)?;
            pending = if phase.is_auto_pass() && self.stack.is_empty() {
                self.turn.last_actor = None;
                match phase.next() {
                    Some(next) => Some(next),
                    None => {
                        self.begin_turn();
                        Some(TurnPhase::Untap)
                    }
                }
            } else {
                None
            };
        }
        Ok(())
    }

    fn enter_phase(&mut self, phase: TurnPhase) -> Result<()> {
        let active = self.active_player_id();
        self.turn.phase = phase;
        self.turn.priority_player = active;
        self.turn.last_actor = None;
        self.logger.event(
            VerbosityLevel::Normal,
            "phase",
            &format!("{} - {}", self.turn.turn_number, phase),
        );

        match phase {
            TurnPhase::Untap => self.untap_all()?,
            TurnPhase::Draw => {
                if self.turn.turn_number == 1 && self.turn.active_player_idx == 0 {
                    log_verbose!(self, "{} skips the first draw", self.player_label(active));
                } else {
                    self.draw_card(active)?;
                }
            }
            TurnPhase::MainPhase1 | TurnPhase::MainPhase2 => {
                self.player_mut(active)?.empty_mana_pool();
            }
            TurnPhase::Cleanup => {
                self.player_mut(active)?.empty_mana_pool();
                self.discard_to_hand_size(active)?;
                self.remove_all_damage()?;
            }
            TurnPhase::Upkeep | TurnPhase::Combat | TurnPhase::EndStep => {}
        }
        Ok(())
    }

    /// Move to the next phase, or the next turn after Cleanup
    ///
    /// Refused while anything is on the stack.
    pub fn advance_phase(&mut self) -> Result<()> {
        if !self.stack.is_empty() {
            return Err(self.reject(Rejection::StackNotEmpty));
        }
        self.turn.last_actor = None;
        match self.turn.phase.next() {
            Some(next) => self.go_to_phase(next),
            None => self.start_next_turn(),
        }
    }

    // ---- priority and the stack ----------------------------------------

    /// Put a card from hand on the stack, without paying for it
    ///
    /// Priority then goes to the opponent, who gets the first chance to respond.
    pub fn add_spell_to_stack(
        &mut self,
        player_id: PlayerId,
        card_id: CardId,
        target: Option<Target>,
    ) -> Result<()> {
        self.ensure_priority(player_id)?;
        self.check_castable(player_id, card_id)?;
        self.check_target(target)?;
        let opponent = self.opponent_of(player_id)?;

        self.move_card(card_id, Zone::Stack)?;
        self.stack.push(StackEntry::Spell {
            card: card_id,
            controller: player_id,
            target,
        });
        self.turn.last_actor = Some(player_id);
        self.turn.priority_player = opponent;

        self.logger.event(
            VerbosityLevel::Normal,
            "stack",
            &format!(
                "{} casts {}",
                self.player_label(player_id),
                self.card_label(card_id)
            ),
        );
        Ok(())
    }

    fn check_castable(&self, player_id: PlayerId, card_id: CardId) -> Result<()> {
        let player = self.player(player_id)?;
        if !player.zones.hand.contains(card_id) {
            return Err(self.reject(Rejection::CardNotInHand));
        }
        let card = self.cards.get(card_id)?;
        if card.zone != Zone::Hand {
            return Err(self.reject(Rejection::CardNotInHand));
        }
        if !card.can_be_played(player) {
            return Err(self.reject(Rejection::NotPlayable));
        }
        Ok(())
    }

    /// A target must name a participant or a card of this game
    fn check_target(&self, target: Option<Target>) -> Result<()> {
        let valid = match target {
            None => true,
            Some(Target::Player(player_id)) => self.is_participant(player_id),
            Some(Target::Card(card_id)) => self.cards.contains(card_id),
        };
        if valid {
            Ok(())
        } else {
            Err(self.reject(Rejection::InvalidTarget))
        }
    }

    /// Cast a card from hand: pay its cost, then put it on the stack
    pub fn play_card(
        &mut self,
        player_id: PlayerId,
        card_id: CardId,
        target: Option<Target>,
    ) -> Result<()> {
        self.ensure_priority(player_id)?;
        self.check_castable(player_id, card_id)?;
        self.check_target(target)?;

        let cost = self.cards.get(card_id)?.mana_cost;
        if !self.player_mut(player_id)?.pay_mana_cost(&cost) {
            return Err(self.reject(Rejection::InsufficientMana));
        }
        log_verbose!(self, "{} pays {}", self.player_label(player_id), cost);
        self.add_spell_to_stack(player_id, card_id, target)
    }

    /// Resolve the top of the stack
    ///
    /// Priority always returns to the active player afterwards. Returns false
    /// when the stack was empty, which still resets priority.
    pub fn resolve_stack(&mut self) -> Result<bool> {
        let resolved = match self.stack.pop() {
            Some(StackEntry::Spell {
                card,
                controller,
                target,
            }) => {
                self.resolve_spell(card, controller, target)?;
                true
            }
            Some(StackEntry::Ability {
                source,
                ability_name,
                ..
            }) => {
                self.logger.event(
                    VerbosityLevel::Normal,
                    "stack",
                    &format!("{} of {} resolves", ability_name, self.card_label(source)),
                );
                true
            }
            None => false,
        };
        self.turn.priority_player = self.active_player_id();
        self.turn.last_actor = None;
        Ok(resolved)
    }

    fn resolve_spell(
        &mut self,
        card_id: CardId,
        controller: PlayerId,
        target: Option<Target>,
    ) -> Result<()> {
        let resolution = self.cards.get_mut(card_id)?.resolve();
        match resolution {
            Resolution::Permanent => {
                self.move_card(card_id, Zone::Battlefield)?;
                self.logger.event(
                    VerbosityLevel::Normal,
                    "stack",
                    &format!("{} enters the battlefield", self.card_label(card_id)),
                );
            }
            Resolution::Spell(effect) => {
                let text = self.cards.get(card_id)?.text.clone();
                self.logger.event(
                    VerbosityLevel::Normal,
                    "stack",
                    &format!("{} resolves: {}", self.card_label(card_id), text),
                );
                if let Some(effect) = effect {
                    self.apply_spell_effect(&effect, controller, target)?;
                }
                self.move_card(card_id, Zone::Graveyard)?;
            }
        }
        Ok(())
    }

    fn apply_spell_effect(
        &mut self,
        effect: &SpellEffect,
        controller: PlayerId,
        target: Option<Target>,
    ) -> Result<()> {
        match *effect {
            SpellEffect::DealDamage { amount } => match target {
                Some(Target::Player(player_id)) if !self.is_participant(player_id) => {
                    log_verbose!(
                        self,
                        "player {} is not in the game; damage fizzles",
                        player_id
                    );
                    Ok(())
                }
                Some(Target::Player(player_id)) => self.deal_damage_to_player(player_id, amount),
                Some(Target::Card(card_id)) => self.deal_damage_to_permanent(card_id, amount),
                None => {
                    let opponent = self.opponent_of(controller)?;
                    self.deal_damage_to_player(opponent, amount)
                }
            },
            SpellEffect::DrawCards { count } => {
                for _ in 0..count {
                    self.draw_card(controller)?;
                }
                Ok(())
            }
            SpellEffect::GainLife { amount } => {
                self.player_mut(controller)?.gain_life(amount);
                Ok(())
            }
        }
    }

    fn deal_damage_to_permanent(&mut self, card_id: CardId, amount: i32) -> Result<()> {
        let card = match self.cards.get(card_id) {
            Ok(card) if card.zone == Zone::Battlefield => card,
            _ => {
                log_verbose!(self, "{} is gone; damage fizzles", self.card_label(card_id));
                return Ok(());
            }
        };
        if let Some(loyalty) = card.loyalty() {
            self.modify_loyalty(card_id, -amount.clamp(0, loyalty.max(0)))?;
        } else {
            self.take_damage(card_id, amount)?;
        }
        Ok(())
    }

    /// Pass priority
    ///
    /// On an empty stack the pass advances the phase when the phase is
    /// automatic or the opponent passed last; otherwise priority flips. On a
    /// non-empty stack only the non-active player's pass resolves the top
    /// entry. The passer is recorded as last actor unless the pass moved the
    /// game into a new phase, which starts with a clean slate.
    pub fn pass_priority(&mut self, player_id: PlayerId) -> Result<()> {
        self.ensure_priority(player_id)?;
        let other = self.opponent_of(player_id)?;
        let position = (self.turn.turn_number, self.turn.phase);

        self.logger.normal(&format!("{} passes", self.player_label(player_id)));

        if self.stack.is_empty() {
            if self.turn.phase.is_auto_pass() || self.turn.last_actor == Some(other) {
                self.advance_phase()?;
            } else {
                self.turn.priority_player = other;
            }
        } else if player_id == self.non_active_player_id() {
            self.resolve_stack()?;
        } else {
            self.turn.priority_player = other;
        }

        if (self.turn.turn_number, self.turn.phase) == position {
            self.turn.last_actor = Some(player_id);
        }
        Ok(())
    }

    // ---- permanents ----------------------------------------------------

    /// Tap a land for one mana of its color; does not use the stack
    pub fn tap_for_mana(&mut self, player_id: PlayerId, card_id: CardId) -> Result<Color> {
        self.ensure_participant(player_id)?;
        if !self.player(player_id)?.zones.battlefield.contains(card_id) {
            return Err(self.reject(Rejection::NotOnBattlefield));
        }
        let card = self.cards.get(card_id)?;
        let Some(color) = card.produces_mana() else {
            return Err(self.reject(Rejection::NotALand));
        };
        if card.is_tapped() {
            return Err(self.reject(Rejection::AlreadyTapped));
        }

        self.cards.get_mut(card_id)?.tap();
        self.player_mut(player_id)?.add_mana(color, 1);
        log_verbose!(
            self,
            "{} taps {} for {}",
            self.player_label(player_id),
            self.card_label(card_id),
            color
        );
        Ok(color)
    }

    /// Activate a planeswalker's loyalty ability
    ///
    /// The loyalty cost is paid immediately and the ability goes on the stack.
    /// A planeswalker paid down to zero dies, but its ability still resolves.
    pub fn activate_loyalty_ability(
        &mut self,
        player_id: PlayerId,
        card_id: CardId,
        ability_index: usize,
        target: Option<Target>,
    ) -> Result<()> {
        self.ensure_priority(player_id)?;
        if !self.player(player_id)?.zones.battlefield.contains(card_id) {
            return Err(self.reject(Rejection::NotOnBattlefield));
        }
        self.check_target(target)?;
        let opponent = self.opponent_of(player_id)?;

        let paid = self.cards.get_mut(card_id)?.activate_loyalty_ability(ability_index);
        let (ability, outcome) = match paid {
            Ok(paid) => paid,
            Err(rejection) => return Err(self.reject(rejection)),
        };

        self.logger.event(
            VerbosityLevel::Normal,
            "stack",
            &format!(
                "{} activates {} of {}",
                self.player_label(player_id),
                ability,
                self.card_label(card_id)
            ),
        );
        if outcome == LoyaltyOutcome::Destroyed {
            self.move_card(card_id, Zone::Graveyard)?;
            self.logger.normal(&format!("{} dies", self.card_label(card_id)));
        }

        self.stack.push(StackEntry::Ability {
            source: card_id,
            controller: player_id,
            ability_name: ability.name,
            target,
        });
        self.turn.last_actor = Some(player_id);
        self.turn.priority_player = opponent;
        Ok(())
    }

    /// Damage a creature on the battlefield; lethal damage sends it to the graveyard
    pub fn take_damage(&mut self, card_id: CardId, amount: i32) -> Result<DamageOutcome> {
        if self.cards.get(card_id)?.zone != Zone::Battlefield {
            return Err(self.reject(Rejection::NotOnBattlefield));
        }
        let outcome = self.cards.get_mut(card_id)?.take_damage(amount);
        log_verbose!(self, "{} takes {} damage", self.card_label(card_id), amount);
        if outcome == DamageOutcome::Destroyed {
            self.move_card(card_id, Zone::Graveyard)?;
            self.logger.normal(&format!("{} dies", self.card_label(card_id)));
        }
        Ok(outcome)
    }

    /// Change a planeswalker's loyalty; at zero or below it goes to the graveyard
    pub fn modify_loyalty(&mut self, card_id: CardId, amount: i32) -> Result<LoyaltyOutcome> {
        if self.cards.get(card_id)?.zone != Zone::Battlefield {
            return Err(self.reject(Rejection::NotOnBattlefield));
        }
        let modified = self.cards.get_mut(card_id)?.modify_loyalty(amount);
        let outcome = match modified {
            Ok(outcome) => outcome,
            Err(rejection) => return Err(self.reject(rejection)),
        };
        log_verbose!(self, "{} loyalty {:+}", self.card_label(card_id), amount);
        if outcome == LoyaltyOutcome::Destroyed {
            self.move_card(card_id, Zone::Graveyard)?;
            self.logger.normal(&format!("{} dies", self.card_label(card_id)));
        }
        Ok(outcome)
    }

    pub fn deal_damage_to_player(&mut self, player_id: PlayerId, amount: i32) -> Result<()> {
        self.player_mut(player_id)?.take_damage(amount);
        self.logger.normal(&format!(
            "{} takes {} damage",
            self.player_label(player_id),
            amount
        ));
        if self.player(player_id)?.has_lost() {
            self.logger.minimal(&format!("{} has lost", self.player_label(player_id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardKind, ManaCost};

    fn game_with_libraries(cards_per_player: usize) -> GameState {
        let mut game = GameState::new_two_player("Alice", "Bob", GameConfig::quiet(7));
        for owner in [PlayerId::new(0), PlayerId::new(1)] {
            for _ in 0..cards_per_player {
                let id = game.next_card_id();
                let card = Card::new(id, "bear", "Bear", owner, CardKind::creature(2, 2))
                    .with_cost(ManaCost::from_string("1G"));
                game.add_card_to_library(card).unwrap();
            }
        }
        game
    }

    #[test]
    fn test_start_deals_hands_and_rests_in_main_phase() {
        let mut game = game_with_libraries(20);
        game.start().unwrap();

        assert_eq!(game.turn_number(), 1);
        assert_eq!(game.current_phase(), TurnPhase::MainPhase1);
        assert_eq!(game.active_player_id(), PlayerId::new(0));
        assert_eq!(game.priority_player(), PlayerId::new(0));
        assert_eq!(game.players[0].zones.hand.len(), 7);
        assert_eq!(game.players[1].zones.hand.len(), 7);
        assert_eq!(game.players[0].zones.library.len(), 13);

        // Starting twice is a no-op
        game.start().unwrap();
        assert_eq!(game.players[0].zones.hand.len(), 7);
    }

    #[test]
    fn test_move_card_keeps_zone_field_and_collections_in_sync() {
        let mut game = game_with_libraries(3);
        let card_id = game.players[0].zones.library.peek_top().unwrap();

        game.move_card(card_id, Zone::Hand).unwrap();
        assert_eq!(game.card(card_id).unwrap().zone, Zone::Hand);
        assert!(game.players[0].zones.hand.contains(card_id));
        assert!(!game.players[0].zones.library.contains(card_id));

        // Same zone: nothing happens
        game.move_card(card_id, Zone::Hand).unwrap();
        assert_eq!(game.players[0].zones.hand.len(), 1);
    }

    #[test]
    fn test_empty_library_draw_sets_life_to_zero() {
        let mut game = game_with_libraries(0);
        assert_eq!(game.draw_card(PlayerId::new(1)).unwrap(), None);
        assert_eq!(game.players[1].life, 0);
        assert_eq!(
            game.outcome(),
            GameOutcome::Won {
                winner: PlayerId::new(0)
            }
        );
    }

    #[test]
    fn test_rejection_is_logged_when_capturing() {
        let mut game = game_with_libraries(10);
        game.start().unwrap();

        let err = game.pass_priority(PlayerId::new(1)).unwrap_err();
        assert_eq!(err.rejection(), Some(Rejection::NoPriority));
        assert!(game
            .logger
            .logs()
            .iter()
            .any(|entry| entry.category == Some("rejection")));
    }
}
