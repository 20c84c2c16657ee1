//! Wordcraft library - morpheme word-building game engine
//!
//! Players select ordered sequences of morphemes; the engine validates the
//! sequence against a database-backed word catalog (or scores it with the
//! free-build formula) and records points.
//!
//! # Architecture
//!
//! - **Db**: diesel/SQLite persistence for the catalog, player profiles and
//!   construction records
//! - **Game**: pure in-memory core - selection state machine, events,
//!   scoring policies
//! - **Catalog**: word validation and editor operations over the store
//! - **Session**: one player's live session orchestrating submit flows
//!
//! # Example
//!
//! ```no_run
//! use wordcraft::{CatalogService, GameMode, GameRepository, GameSession, PlayerService};
//!
//! # fn example() -> Result<(), wordcraft::DbError> {
//! let repository = GameRepository::new("wordcraft.db".to_string())?;
//! repository.run_migrations()?;
//!
//! let players = PlayerService::new(repository.clone());
//! let player = players.get_or_create("alice")?;
//!
//! let catalog = CatalogService::new(repository.clone());
//! let mut session = GameSession::start(repository, &player, GameMode::Catalog);
//! for morpheme in catalog.morphemes()? {
//!     session.toggle_morpheme(&morpheme);
//! }
//! let outcome = session.submit()?;
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod catalog;
mod db;
mod game;
mod player;
mod session;

// Crate-level exports - persistence layer
pub use db::{DbError, GameRepository, Morpheme, Player, Word, seed_sample_catalog};

// Crate-level exports - game core
pub use game::{
    ConstructedWord, DefinitionRejection, GameMode, GameState, GameStateEvent, GameStateListener,
    ListenerId, free_build_points, validate_definition,
};

// Crate-level exports - services
pub use catalog::{CatalogError, CatalogService, construct_word_text, morpheme_ids};
pub use player::PlayerService;

// Crate-level exports - session orchestration
pub use session::{FreeBuildOutcome, GameSession, SubmitOutcome};
