//! Duel Engine - Main Binary
//!
//! Inspect card catalogs, validate decks and run autopilot duels

use anyhow::Context;
use clap::{Parser, Subcommand};
use duel_engine::{
    game::{Autopilot, OutputFormat, VerbosityLevel},
    loader::{CardCatalog, DeckBuilder, DeckLoader, GameInitializer},
    GameConfig,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "duel")]
#[command(about = "Duel Engine - two-player card duel rules engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the definitions in a catalog
    Catalog {
        /// Catalog JSON file (array of definitions) or directory of per-card files
        #[arg(value_name = "CATALOG")]
        path: PathBuf,
    },

    /// Check a deck against a catalog
    Deck {
        /// Deck file (`count card-id` per line)
        #[arg(value_name = "DECK")]
        deck: PathBuf,

        #[arg(long, short = 'c', default_value = "data/catalog.json")]
        catalog: PathBuf,
    },

    /// Run a duel between two decks on autopilot
    Play {
        #[arg(value_name = "PLAYER1_DECK")]
        deck1: PathBuf,

        #[arg(value_name = "PLAYER2_DECK")]
        deck2: PathBuf,

        #[arg(long, short = 'c', default_value = "data/catalog.json")]
        catalog: PathBuf,

        #[arg(long, default_value = "Player 1")]
        p1_name: String,

        #[arg(long, default_value = "Player 2")]
        p2_name: String,

        /// Game config JSON; command line flags override it
        #[arg(long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Set random seed for deterministic games
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many turns
        #[arg(long, default_value_t = 100)]
        turns: u32,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityLevel,

        /// Log events as JSON lines
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Catalog { path } => run_catalog(&path).await?,
        Commands::Deck { deck, catalog } => run_deck(&deck, &catalog).await?,
        Commands::Play {
            deck1,
            deck2,
            catalog,
            p1_name,
            p2_name,
            config,
            seed,
            turns,
            verbosity,
            json,
        } => {
            let mut game_config = match config {
                Some(path) => GameConfig::load_from_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => GameConfig::default(),
            };
            game_config.verbosity = verbosity;
            if json {
                game_config.output_format = OutputFormat::Json;
            }
            if seed.is_some() {
                game_config.seed = seed;
            }
            run_play(
                &catalog,
                (p1_name.as_str(), deck1.as_path()),
                (p2_name.as_str(), deck2.as_path()),
                game_config,
                turns,
            )
            .await?
        }
    }

    Ok(())
}

async fn load_catalog(path: &Path) -> anyhow::Result<CardCatalog> {
    CardCatalog::load(path)
        .await
        .with_context(|| format!("loading catalog {}", path.display()))
}

async fn run_catalog(path: &Path) -> anyhow::Result<()> {
    let catalog = load_catalog(path).await?;
    for def in catalog.definitions() {
        let status = match def.validate() {
            Ok(()) => String::new(),
            Err(e) => format!("  [invalid: {e}]"),
        };
        println!(
            "{:<24} {:<28} {:<13} {:>5}  {}{}",
            def.id, def.name, def.base_type, def.mana_cost, def.price, status
        );
    }
    println!("{} definitions", catalog.len());
    Ok(())
}

async fn run_deck(deck_path: &Path, catalog_path: &Path) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path).await?;
    let deck = DeckLoader::load_from_file(deck_path)
        .with_context(|| format!("loading deck {}", deck_path.display()))?;
    let plan = DeckBuilder::new(&catalog)
        .build(&deck)
        .with_context(|| format!("building deck {}", deck_path.display()))?;
    println!(
        "{}: {} cards, {} distinct",
        deck_path.display(),
        plan.len(),
        deck.main_deck.len()
    );
    Ok(())
}

async fn run_play(
    catalog_path: &Path,
    (p1_name, deck1_path): (&str, &Path),
    (p2_name, deck2_path): (&str, &Path),
    config: GameConfig,
    max_turns: u32,
) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path).await?;
    let deck1 = DeckLoader::load_from_file(deck1_path)
        .with_context(|| format!("loading deck {}", deck1_path.display()))?;
    let deck2 = DeckLoader::load_from_file(deck2_path)
        .with_context(|| format!("loading deck {}", deck2_path.display()))?;

    let mut game =
        GameInitializer::new(&catalog).init_game(p1_name, &deck1, p2_name, &deck2, config)?;

    let result = Autopilot::new(&mut game).with_max_turns(max_turns).run()?;
    game.logger.minimal(&format!(
        "Finished after {} turns ({:?}): {} casts, {} passes",
        result.turns_played, result.reason, result.casts, result.passes
    ));

    println!("{}", serde_json::to_string_pretty(&game.public_state()?)?);
    Ok(())
}
