//! Database persistence layer for the morpheme catalog, player profiles
//! and construction records.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only
mod seed;

pub use error::DbError;
pub use models::{Morpheme, Player, Word};
pub use repository::GameRepository;
pub use seed::seed_sample_catalog;

pub(crate) use models::{NewMorpheme, NewPlayer, NewPlayerWord, NewWord, NewWordMorpheme, WordRow};
