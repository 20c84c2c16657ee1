//! Wordcraft - morpheme word-building game CLI.

#![warn(missing_docs)]

mod cli;

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use wordcraft::{
    CatalogService, FreeBuildOutcome, GameMode, GameRepository, GameSession, GameStateEvent,
    PlayerService, SubmitOutcome, seed_sample_catalog,
};

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let db_path = cli
        .db_path
        .clone()
        .or_else(|| std::env::var("WORDCRAFT_DB").ok())
        .unwrap_or_else(|| "wordcraft.db".to_string());

    let repository = GameRepository::new(db_path)?;

    match cli.command {
        Command::Init => run_init(&repository),
        Command::Morphemes => run_morphemes(&repository),
        Command::Words => run_words(&repository),
        Command::AddMorpheme { text, definition } => {
            let catalog = CatalogService::new(repository);
            let morpheme = catalog.add_morpheme(&text, &definition)?;
            println!("added morpheme {}: {}", morpheme.id(), morpheme.text());
            Ok(())
        }
        Command::AddWord {
            text,
            morphemes,
            points,
            definition,
        } => {
            let catalog = CatalogService::new(repository);
            let word = catalog.add_word(&text, &morphemes, points, &definition)?;
            println!("added word {}: {} ({} pts)", word.id(), word.text(), word.points());
            Ok(())
        }
        Command::Export => {
            let catalog = CatalogService::new(repository);
            println!("{}", catalog.export_json()?);
            Ok(())
        }
        Command::Play { player, mode } => run_play(repository, &player, mode),
    }
}

/// Creates the schema and seeds the sample catalog.
fn run_init(repository: &GameRepository) -> Result<()> {
    repository.run_migrations()?;
    let seeded = seed_sample_catalog(repository)?;
    info!(seeded, "Database initialized");
    if seeded {
        println!("database initialized and sample catalog seeded");
    } else {
        println!("database initialized (catalog already populated)");
    }
    Ok(())
}

fn run_morphemes(repository: &GameRepository) -> Result<()> {
    let catalog = CatalogService::new(repository.clone());
    for morpheme in catalog.morphemes()? {
        println!(
            "{:>4}  {:<12} {}",
            morpheme.id(),
            morpheme.text(),
            morpheme.definition()
        );
    }
    Ok(())
}

fn run_words(repository: &GameRepository) -> Result<()> {
    let catalog = CatalogService::new(repository.clone());
    for word in catalog.words()? {
        println!(
            "{:>4}  {:<16} {:?} {} pts  {}",
            word.id(),
            word.text(),
            word.morpheme_ids(),
            word.points(),
            word.definition()
        );
    }
    Ok(())
}

/// Minimal line-oriented play loop driving one game session.
fn run_play(repository: GameRepository, player_name: &str, mode: GameMode) -> Result<()> {
    let players = PlayerService::new(repository.clone());
    let catalog = CatalogService::new(repository.clone());

    let player = players.get_or_create(player_name)?;
    let morphemes = catalog.morphemes()?;
    if morphemes.is_empty() {
        println!("the catalog is empty; run `wordcraft init` first");
        return Ok(());
    }

    let mut session = GameSession::start(repository, &player, mode);
    session.add_listener(|event: &GameStateEvent| {
        if let GameStateEvent::ScoreUpdated(score) = event {
            println!("score: {score}");
        }
    });

    println!("playing as {} in {} mode", player.username(), mode);
    println!("available morphemes:");
    for (index, morpheme) in morphemes.iter().enumerate() {
        println!(
            "  [{}] {:<12} {}",
            index + 1,
            morpheme.text(),
            morpheme.definition()
        );
    }
    println!("commands: <number> toggle, submit, clear, reset, quit");

    let stdin = std::io::stdin();
    loop {
        let selection: Vec<String> = session
            .state()
            .selection()
            .iter()
            .map(|m| m.text().clone())
            .collect();
        print!("[{}] > ", selection.join(" + "));
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        match input {
            "" => continue,
            "quit" | "q" => break,
            "clear" => session.clear_selection(),
            "reset" => session.reset_for_new_round(),
            "submit" | "s" => match mode {
                GameMode::Catalog => match session.submit()? {
                    SubmitOutcome::EmptySelection => println!("select some morphemes first"),
                    SubmitOutcome::NotAWord { text } => {
                        println!("'{text}' is not a registered word");
                    }
                    SubmitOutcome::Accepted { word, points } => {
                        println!("'{}' accepted for {} pts", word.text(), points);
                        session.clear_selection();
                    }
                    SubmitOutcome::AcceptedNotPersisted { word, points, error } => {
                        println!(
                            "'{}' accepted for {} pts, but saving failed: {}",
                            word.text(),
                            points,
                            error
                        );
                        session.clear_selection();
                    }
                },
                GameMode::FreeBuild => {
                    print!("definition: ");
                    std::io::stdout().flush()?;
                    let mut definition = String::new();
                    stdin.lock().read_line(&mut definition)?;
                    match session.submit_free_build(definition.trim()) {
                        FreeBuildOutcome::EmptySelection => {
                            println!("select some morphemes first");
                        }
                        FreeBuildOutcome::Rejected(rejection) => println!("rejected: {rejection}"),
                        FreeBuildOutcome::Accepted { text, points } => {
                            println!("'{text}' created for {points} pts");
                        }
                        FreeBuildOutcome::AcceptedNotPersisted { text, points, error } => {
                            println!(
                                "'{text}' created for {points} pts, but saving failed: {error}"
                            );
                        }
                    }
                }
            },
            _ => match input.parse::<usize>() {
                Ok(number) if (1..=morphemes.len()).contains(&number) => {
                    session.toggle_morpheme(&morphemes[number - 1]);
                }
                _ => println!("unknown command: {input}"),
            },
        }
    }

    let final_score = players
        .score(session.state().player_id())
        .context("reading final score")?;
    println!("goodbye, {player_name} - saved score: {final_score}");
    Ok(())
}
