//! Command-line interface for wordcraft.

use clap::{Parser, Subcommand};
use wordcraft::GameMode;

/// Wordcraft - morpheme word-building game engine
#[derive(Parser, Debug)]
#[command(name = "wordcraft")]
#[command(about = "Morpheme word-building game engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the SQLite database (defaults to $WORDCRAFT_DB, then
    /// wordcraft.db)
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database schema and seed the sample catalog
    Init,

    /// List all morphemes in the catalog
    Morphemes,

    /// List all words in the catalog
    Words,

    /// Add a morpheme to the catalog
    AddMorpheme {
        /// Display text of the morpheme
        text: String,

        /// Definition of the morpheme
        definition: String,
    },

    /// Add a word to the catalog
    AddWord {
        /// Display text of the word
        text: String,

        /// Ordered morpheme ids composing the word, comma-separated
        #[arg(long, value_delimiter = ',', required = true)]
        morphemes: Vec<i32>,

        /// Point value of the word
        #[arg(long)]
        points: i32,

        /// Definition of the word
        #[arg(long, default_value = "")]
        definition: String,
    },

    /// Export the catalog as JSON
    Export,

    /// Play a game session in the terminal
    Play {
        /// Player profile name (created on first use)
        #[arg(long)]
        player: String,

        /// Game mode
        #[arg(long, value_enum, default_value_t = GameMode::Catalog)]
        mode: GameMode,
    },
}
