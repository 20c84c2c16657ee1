//! Catalog and validation service over the word/morpheme store.

use derive_more::{Display, Error};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::db::{DbError, GameRepository, Morpheme, Word};

/// Errors from catalog editor operations.
#[derive(Debug, Display, Error)]
pub enum CatalogError {
    /// Morpheme or word text was empty.
    #[display("text must not be empty")]
    EmptyText,
    /// A morpheme definition was empty.
    #[display("a definition is required")]
    EmptyDefinition,
    /// A word was given no morphemes.
    #[display("a word needs at least one morpheme")]
    EmptyMorphemeSequence,
    /// A word was given a non-positive point value.
    #[display("word points must be positive, got {points}")]
    NonPositivePoints {
        /// The rejected point value.
        points: i32,
    },
    /// The underlying store failed.
    #[display("{_0}")]
    Db(DbError),
    /// Export serialization failed.
    #[display("export failed: {_0}")]
    Json(serde_json::Error),
}

impl From<DbError> for CatalogError {
    fn from(err: DbError) -> Self {
        Self::Db(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Snapshot of the whole catalog, used by the JSON export.
#[derive(Debug, Serialize)]
struct CatalogExport {
    morphemes: Vec<Morpheme>,
    words: Vec<Word>,
}

/// Service layer for catalog reads, word validation and editor operations.
///
/// Wraps [`GameRepository`]: gameplay loads the morpheme set once per
/// session through [`Self::morphemes`], while validation queries the store
/// per submission.
#[derive(Debug, Clone)]
pub struct CatalogService {
    repository: GameRepository,
}

impl CatalogService {
    /// Creates a new catalog service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: GameRepository) -> Self {
        Self { repository }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &GameRepository {
        &self.repository
    }

    /// Loads all known morphemes, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store fails.
    #[instrument(skip(self))]
    pub fn morphemes(&self) -> Result<Vec<Morpheme>, DbError> {
        self.repository.list_morphemes()
    }

    /// Loads all catalog words with their ordered morpheme sequences.
    ///
    /// Editor tooling; gameplay never needs the full word list.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store fails.
    #[instrument(skip(self))]
    pub fn words(&self) -> Result<Vec<Word>, DbError> {
        self.repository.list_words()
    }

    /// Validates a candidate construction against the catalog.
    ///
    /// Matches only when a stored word has this exact display text **and**
    /// an ordered morpheme-id sequence positionally equal to the candidate.
    /// The two-step check guards against text collisions with different
    /// decompositions. `Ok(None)` is the expected miss outcome.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store fails.
    #[instrument(skip(self, text), fields(text = %text))]
    pub fn validate_word(
        &self,
        text: &str,
        morpheme_ids: &[i32],
    ) -> Result<Option<Word>, DbError> {
        self.repository.validate_word(text, morpheme_ids)
    }

    /// Adds a morpheme to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] for empty text or definition, or if the
    /// store fails.
    #[instrument(skip(self))]
    pub fn add_morpheme(&self, text: &str, definition: &str) -> Result<Morpheme, CatalogError> {
        if text.trim().is_empty() {
            return Err(CatalogError::EmptyText);
        }
        if definition.trim().is_empty() {
            return Err(CatalogError::EmptyDefinition);
        }

        let morpheme = self
            .repository
            .add_morpheme(text.to_string(), definition.to_string())?;
        info!(morpheme_id = morpheme.id(), "Morpheme added to catalog");
        Ok(morpheme)
    }

    /// Adds a word to the catalog with its ordered morpheme sequence.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] for empty text, an empty sequence,
    /// non-positive points, or if the store fails.
    #[instrument(skip(self))]
    pub fn add_word(
        &self,
        text: &str,
        morpheme_ids: &[i32],
        points: i32,
        definition: &str,
    ) -> Result<Word, CatalogError> {
        if text.trim().is_empty() {
            return Err(CatalogError::EmptyText);
        }
        if morpheme_ids.is_empty() {
            return Err(CatalogError::EmptyMorphemeSequence);
        }
        if points <= 0 {
            return Err(CatalogError::NonPositivePoints { points });
        }

        let word = self.repository.add_word(
            text.to_string(),
            morpheme_ids.to_vec(),
            points,
            definition.to_string(),
        )?;
        info!(word_id = word.id(), "Word added to catalog");
        Ok(word)
    }

    /// Exports the whole catalog as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the store fails or serialization fails.
    #[instrument(skip(self))]
    pub fn export_json(&self) -> Result<String, CatalogError> {
        let export = CatalogExport {
            morphemes: self.repository.list_morphemes()?,
            words: self.repository.list_words()?,
        };
        debug!(
            morphemes = export.morphemes.len(),
            words = export.words.len(),
            "Exporting catalog"
        );
        Ok(serde_json::to_string_pretty(&export)?)
    }
}

/// Concatenates the display texts of a selection, in order.
pub fn construct_word_text(selection: &[Morpheme]) -> String {
    selection.iter().map(|m| m.text().as_str()).collect()
}

/// Extracts the ordered morpheme ids of a selection.
pub fn morpheme_ids(selection: &[Morpheme]) -> Vec<i32> {
    selection.iter().map(|m| *m.id()).collect()
}
