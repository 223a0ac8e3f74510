//! Game initialization from decks
//!
//! Both decks are resolved against the catalog before the game is created,
//! so a bad deck never leaves a half-built game behind.

use crate::config::GameConfig;
use crate::core::{PlayerId, PlayerName};
use crate::game::GameState;
use crate::loader::{CardCatalog, DeckBuilder, DeckList, DeckPlan};
use crate::Result;

pub struct GameInitializer<'a> {
    catalog: &'a CardCatalog,
}

impl<'a> GameInitializer<'a> {
    pub fn new(catalog: &'a CardCatalog) -> Self {
        GameInitializer { catalog }
    }

    /// Build and start a two-player game
    ///
    /// The returned game has shuffled libraries, dealt opening hands and
    /// rests in turn 1, first main phase.
    pub fn init_game(
        &self,
        player1_name: impl Into<PlayerName>,
        player1_deck: &DeckList,
        player2_name: impl Into<PlayerName>,
        player2_deck: &DeckList,
        config: GameConfig,
    ) -> Result<GameState> {
        let builder = DeckBuilder::new(self.catalog);
        let plan1 = builder.build(player1_deck)?;
        let plan2 = builder.build(player2_deck)?;

        let mut game = GameState::new_two_player(player1_name, player2_name, config);
        let player1_id = game.players[0].id;
        let player2_id = game.players[1].id;

        Self::load_plan_into_game(&mut game, player1_id, &plan1)?;
        Self::load_plan_into_game(&mut game, player2_id, &plan2)?;

        game.start()?;
        Ok(game)
    }

    fn load_plan_into_game(game: &mut GameState, owner: PlayerId, plan: &DeckPlan) -> Result<()> {
        for def in &plan.cards {
            let card_id = game.next_card_id();
            let card = def.instantiate(card_id, owner)?;
            game.add_card_to_library(card)?;
        }
        Ok(())
    }
}
