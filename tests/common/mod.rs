//! Shared builders for integration tests

#![allow(dead_code)]

use duel_engine::core::{Card, CardId, CardKind, Color, ManaCost, PlayerId};
use duel_engine::game::GameState;
use duel_engine::zones::Zone;
use duel_engine::GameConfig;

pub const ALICE: PlayerId = PlayerId::new(0);
pub const BOB: PlayerId = PlayerId::new(1);

/// A started game whose libraries hold `library_size` vanilla 2/2s each
pub fn started_game(seed: u64, library_size: usize) -> GameState {
    let mut game = GameState::new_two_player("Alice", "Bob", GameConfig::quiet(seed));
    for owner in [ALICE, BOB] {
        for _ in 0..library_size {
            let id = game.next_card_id();
            let kind = CardKind::creature(2, 2);
            let card = Card::new(id, "grizzly_bears", "Grizzly Bears", owner, kind)
                .with_cost(ManaCost::from_string("1G"));
            game.add_card_to_library(card).unwrap();
        }
    }
    game.start().unwrap();
    game
}

/// Create a card and put it straight into `zone` for `owner`
pub fn put_card(
    game: &mut GameState,
    owner: PlayerId,
    name: &str,
    kind: CardKind,
    cost: &str,
    zone: Zone,
) -> CardId {
    let id = game.next_card_id();
    let card = Card::new(id, name.to_lowercase().replace(' ', "_"), name, owner, kind)
        .with_cost(ManaCost::from_string(cost));
    game.add_card_to_library(card).unwrap();
    game.move_card(id, zone).unwrap();
    id
}

pub fn in_hand(
    game: &mut GameState,
    owner: PlayerId,
    name: &str,
    kind: CardKind,
    cost: &str,
) -> CardId {
    put_card(game, owner, name, kind, cost, Zone::Hand)
}

pub fn land_in_play(game: &mut GameState, owner: PlayerId, color: Color) -> CardId {
    let kind = CardKind::Land { produces: color };
    put_card(game, owner, "Land", kind, "", Zone::Battlefield)
}
