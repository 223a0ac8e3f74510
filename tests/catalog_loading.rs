//! Loading the bundled catalog and decks, then playing them out

use duel_engine::core::{CardId, CardType, Color, LoyaltyCost, PlayerId};
use duel_engine::game::{Autopilot, StopReason};
use duel_engine::loader::{CardCatalog, DeckBuilder, DeckLoader, GameInitializer};
use duel_engine::{DuelError, GameConfig, Result};
use std::path::{Path, PathBuf};

fn data(path: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(path)
}

#[test]
fn test_bundled_catalog_is_valid() -> Result<()> {
    let catalog = CardCatalog::load_from_file(&data("data/catalog.json"))?;
    assert!(catalog.len() >= 20);
    catalog.validate()?;

    let forest = catalog.get_required("forest")?;
    assert_eq!(forest.provides_mana, Some(Color::Green));

    let sage = catalog.get_required("ember_sage")?;
    assert_eq!(sage.price, 100);
    assert_eq!(sage.loyalty_abilities[1].cost, LoyaltyCost::Fixed(2));
    assert_eq!(sage.loyalty_abilities[2].cost, LoyaltyCost::X);

    // Default price applies when the field is absent
    assert_eq!(catalog.get_required("grizzly_bears")?.price, 10);
    Ok(())
}

#[test]
fn test_spell_definitions_become_instants() -> Result<()> {
    let catalog = CardCatalog::load_from_file(&data("data/catalog.json"))?;
    let def = catalog.get_required("shock")?;
    let card = def.instantiate(CardId::new(40), PlayerId::new(0))?;
    assert_eq!(card.types.as_slice(), &[CardType::Instant]);
    assert_eq!(card.text, "Shock deals 2 damage to any target.");
    Ok(())
}

#[tokio::test]
async fn test_directory_catalog_skips_other_files() -> Result<()> {
    let catalog = CardCatalog::load(&data("data/cards")).await?;
    assert_eq!(catalog.len(), 3);
    assert!(catalog.contains("forest"));
    assert!(catalog.contains("wild_growth"));
    catalog.validate()?;

    let single_file = CardCatalog::load(&data("data/catalog.json")).await?;
    similar_asserts::assert_eq!(
        catalog.get_required("grizzly_bears")?.mana_cost,
        single_file.get_required("grizzly_bears")?.mana_cost
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_directory_is_an_io_error() {
    let result = CardCatalog::load(&data("data/no_such_dir")).await;
    assert!(matches!(result, Err(DuelError::IoError(_))));
}

#[test]
fn test_bundled_decks_build() -> Result<()> {
    let catalog = CardCatalog::load_from_file(&data("data/catalog.json"))?;
    let builder = DeckBuilder::new(&catalog);
    for name in ["wildwood", "cinder_peaks", "mixed"] {
        let deck = DeckLoader::load_from_file(&data(&format!("test_decks/{name}.dck")))?;
        let plan = builder.build(&deck)?;
        assert_eq!(plan.len(), 40, "{name}");
    }
    Ok(())
}

#[test]
fn test_autopilot_duel_is_reproducible() -> Result<()> {
    let catalog = CardCatalog::load_from_file(&data("data/catalog.json"))?;
    let green = DeckLoader::load_from_file(&data("test_decks/wildwood.dck"))?;
    let red = DeckLoader::load_from_file(&data("test_decks/cinder_peaks.dck"))?;
    let init = GameInitializer::new(&catalog);

    let play = |seed: u64| -> Result<_> {
        let mut game = init.init_game("Green", &green, "Red", &red, GameConfig::quiet(seed))?;
        let result = Autopilot::new(&mut game).run()?;
        Ok((result, game.public_state()?))
    };

    let (result, state) = play(77)?;
    assert_eq!(result.reason, StopReason::GameOver);
    assert!(state.outcome.is_over());
    assert!(result.casts > 0);

    let (again, again_state) = play(77)?;
    assert_eq!(result, again);
    similar_asserts::assert_eq!(state, again_state);
    Ok(())
}
