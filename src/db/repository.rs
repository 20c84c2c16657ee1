//! Database repository for the morpheme catalog, player profiles and
//! construction records.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::db::{
    DbError, Morpheme, NewMorpheme, NewPlayer, NewPlayerWord, NewWord, NewWordMorpheme, Player,
    Word, WordRow, schema,
};

/// Embedded schema migrations, applied by [`GameRepository::run_migrations`].
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for catalog, player and scoring operations.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository connected to the database at the given path.
    ///
    /// Use `":memory:"` for an in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is invalid.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails to apply.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        debug!("Running pending migrations");
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration error: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Players
    // ─────────────────────────────────────────────────────────────

    /// Creates a new player profile with a zero score.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the username is already taken or a database
    /// error occurs.
    #[instrument(skip(self))]
    pub fn create_player(&self, username: String) -> Result<Player, DbError> {
        debug!(username = %username, "Creating player");
        let mut conn = self.connection()?;

        let new_player = NewPlayer::new(username);

        let player = diesel::insert_into(schema::players::table)
            .values(&new_player)
            .returning(Player::as_returning())
            .get_result(&mut conn)?;

        info!(player_id = player.id(), username = %player.username(), "Player created");
        Ok(player)
    }

    /// Gets a player by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_player(&self, player_id: i32) -> Result<Option<Player>, DbError> {
        let mut conn = self.connection()?;

        let player = schema::players::table
            .find(player_id)
            .first::<Player>(&mut conn)
            .optional()?;

        Ok(player)
    }

    /// Gets a player by username. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_player_by_name(&self, username: &str) -> Result<Option<Player>, DbError> {
        debug!(username = %username, "Looking up player by name");
        let mut conn = self.connection()?;

        let player = schema::players::table
            .filter(schema::players::username.eq(username))
            .first::<Player>(&mut conn)
            .optional()?;

        Ok(player)
    }

    /// Lists all player profiles, ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_players(&self) -> Result<Vec<Player>, DbError> {
        let mut conn = self.connection()?;

        let players = schema::players::table
            .order(schema::players::created_at.asc())
            .load::<Player>(&mut conn)?;

        info!(count = players.len(), "Players loaded");
        Ok(players)
    }

    /// Gets the persistent score for a player.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the player does not exist or a database error
    /// occurs.
    #[instrument(skip(self))]
    pub fn get_score(&self, player_id: i32) -> Result<i32, DbError> {
        let mut conn = self.connection()?;

        let score = schema::players::table
            .find(player_id)
            .select(schema::players::score)
            .first::<i32>(&mut conn)?;

        Ok(score)
    }

    /// Adds a score delta to a player's persistent score.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the player does not exist or a database error
    /// occurs.
    #[instrument(skip(self))]
    pub fn add_score(&self, player_id: i32, delta: i32) -> Result<(), DbError> {
        debug!(player_id, delta, "Adding score delta");
        let mut conn = self.connection()?;

        let updated = diesel::update(schema::players::table.find(player_id))
            .set(schema::players::score.eq(schema::players::score + delta))
            .execute(&mut conn)?;

        if updated == 0 {
            warn!(player_id, "Score update matched no player");
            return Err(DbError::new(format!("No player with id {}", player_id)));
        }

        info!(player_id, delta, "Score updated");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Catalog: morphemes and words
    // ─────────────────────────────────────────────────────────────

    /// Adds a morpheme to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn add_morpheme(&self, text: String, definition: String) -> Result<Morpheme, DbError> {
        debug!(text = %text, "Adding morpheme");
        let mut conn = self.connection()?;

        let new_morpheme = NewMorpheme::new(text, definition);

        let morpheme = diesel::insert_into(schema::morphemes::table)
            .values(&new_morpheme)
            .returning(Morpheme::as_returning())
            .get_result(&mut conn)?;

        info!(morpheme_id = morpheme.id(), text = %morpheme.text(), "Morpheme added");
        Ok(morpheme)
    }

    /// Lists all morphemes in the catalog, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_morphemes(&self) -> Result<Vec<Morpheme>, DbError> {
        let mut conn = self.connection()?;

        let morphemes = schema::morphemes::table
            .order(schema::morphemes::id.asc())
            .load::<Morpheme>(&mut conn)?;

        info!(count = morphemes.len(), "Morphemes loaded");
        Ok(morphemes)
    }

    /// Adds a word with its ordered morpheme sequence, in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the word text is already taken or a database
    /// error occurs.
    #[instrument(skip(self))]
    pub fn add_word(
        &self,
        text: String,
        morpheme_ids: Vec<i32>,
        points: i32,
        definition: String,
    ) -> Result<Word, DbError> {
        debug!(text = %text, ?morpheme_ids, points, "Adding word");
        let mut conn = self.connection()?;

        let word = conn.transaction::<_, DbError, _>(|conn| {
            let new_word = NewWord::new(text, points, definition);

            let row = diesel::insert_into(schema::words::table)
                .values(&new_word)
                .returning(WordRow::as_returning())
                .get_result::<WordRow>(conn)?;

            for (position, morpheme_id) in morpheme_ids.iter().enumerate() {
                let junction = NewWordMorpheme::new(*row.id(), *morpheme_id, position as i32);
                diesel::insert_into(schema::word_morphemes::table)
                    .values(&junction)
                    .execute(conn)?;
            }

            Ok(Word::new(
                *row.id(),
                row.text().clone(),
                morpheme_ids,
                *row.points(),
                row.definition().clone(),
            ))
        })?;

        info!(word_id = word.id(), text = %word.text(), "Word added");
        Ok(word)
    }

    /// Lists all catalog words with their ordered morpheme sequences.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_words(&self) -> Result<Vec<Word>, DbError> {
        let mut conn = self.connection()?;

        let rows = schema::words::table
            .order(schema::words::id.asc())
            .load::<WordRow>(&mut conn)?;

        let mut words = Vec::with_capacity(rows.len());
        for row in rows {
            let ids = Self::ordered_morpheme_ids(&mut conn, *row.id())?;
            words.push(Word::new(
                *row.id(),
                row.text().clone(),
                ids,
                *row.points(),
                row.definition().clone(),
            ));
        }

        info!(count = words.len(), "Words loaded");
        Ok(words)
    }

    /// Loads the morpheme ids of a word, ordered by stored position.
    fn ordered_morpheme_ids(conn: &mut SqliteConnection, word_id: i32) -> Result<Vec<i32>, DbError> {
        let ids = schema::word_morphemes::table
            .filter(schema::word_morphemes::word_id.eq(word_id))
            .order(schema::word_morphemes::position.asc())
            .select(schema::word_morphemes::morpheme_id)
            .load::<i32>(conn)?;
        Ok(ids)
    }

    /// Validates a candidate construction against the catalog.
    ///
    /// Looks up the word by display text, then compares the stored ordered
    /// morpheme-id sequence positionally with the candidate. Both checks
    /// must pass; a word whose text matches but whose decomposition differs
    /// is not a match. A miss is an expected outcome and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, text), fields(text = %text))]
    pub fn validate_word(
        &self,
        text: &str,
        candidate_ids: &[i32],
    ) -> Result<Option<Word>, DbError> {
        let mut conn = self.connection()?;

        let row = schema::words::table
            .filter(schema::words::text.eq(text))
            .first::<WordRow>(&mut conn)
            .optional()?;

        let Some(row) = row else {
            debug!(text = %text, "No catalog word with this text");
            return Ok(None);
        };

        let stored_ids = Self::ordered_morpheme_ids(&mut conn, *row.id())?;
        if stored_ids.as_slice() != candidate_ids {
            debug!(
                word_id = row.id(),
                ?stored_ids,
                ?candidate_ids,
                "Morpheme sequence mismatch"
            );
            return Ok(None);
        }

        info!(word_id = row.id(), text = %row.text(), "Word validated");
        Ok(Some(Word::new(
            *row.id(),
            row.text().clone(),
            stored_ids,
            *row.points(),
            row.definition().clone(),
        )))
    }

    // ─────────────────────────────────────────────────────────────
    //  Progress records
    // ─────────────────────────────────────────────────────────────

    /// Idempotently records that a player has solved a catalog word.
    ///
    /// Returns `true` if a new association row was inserted, `false` if the
    /// pair was already recorded.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn record_word_solved(&self, player_id: i32, word_id: i32) -> Result<bool, DbError> {
        let mut conn = self.connection()?;

        let inserted = diesel::insert_or_ignore_into(schema::player_words::table)
            .values(&NewPlayerWord::new(player_id, word_id))
            .execute(&mut conn)?;

        debug!(player_id, word_id, inserted, "Word-solved association recorded");
        Ok(inserted > 0)
    }

    /// Lists the ids of catalog words a player has solved.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn words_solved(&self, player_id: i32) -> Result<Vec<i32>, DbError> {
        let mut conn = self.connection()?;

        let ids = schema::player_words::table
            .filter(schema::player_words::player_id.eq(player_id))
            .order(schema::player_words::word_id.asc())
            .select(schema::player_words::word_id)
            .load::<i32>(&mut conn)?;

        Ok(ids)
    }

    /// Records a successful catalog construction in one transaction: adds
    /// the point delta to the player's score and idempotently inserts the
    /// player-word association.
    ///
    /// Repeat constructions of the same word still score; only the
    /// association is deduplicated.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the player does not exist or a database error
    /// occurs. On error, neither effect is applied.
    #[instrument(skip(self))]
    pub fn record_construction(
        &self,
        player_id: i32,
        word_id: i32,
        points: i32,
    ) -> Result<(), DbError> {
        debug!(player_id, word_id, points, "Recording construction");
        let mut conn = self.connection()?;

        conn.transaction::<_, DbError, _>(|conn| {
            let updated = diesel::update(schema::players::table.find(player_id))
                .set(schema::players::score.eq(schema::players::score + points))
                .execute(conn)?;

            if updated == 0 {
                return Err(DbError::new(format!("No player with id {}", player_id)));
            }

            diesel::insert_or_ignore_into(schema::player_words::table)
                .values(&NewPlayerWord::new(player_id, word_id))
                .execute(conn)?;

            Ok(())
        })?;

        info!(player_id, word_id, points, "Construction recorded");
        Ok(())
    }
}
