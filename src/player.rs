//! Player profile business logic layer.

use tracing::{debug, info, instrument};

use crate::db::{DbError, GameRepository, Player};

/// Service layer for player profile operations.
///
/// Wraps [`GameRepository`] with get-or-create semantics and score access.
/// Authentication is out of scope; callers arrive with an already-known
/// identity.
#[derive(Debug, Clone)]
pub struct PlayerService {
    repository: GameRepository,
}

impl PlayerService {
    /// Creates a new player service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: GameRepository) -> Self {
        Self { repository }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &GameRepository {
        &self.repository
    }

    /// Returns an existing player by username or creates one if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store fails.
    #[instrument(skip(self))]
    pub fn get_or_create(&self, username: &str) -> Result<Player, DbError> {
        debug!(username = %username, "Getting or creating player");

        if let Some(player) = self.repository.get_player_by_name(username)? {
            info!(player_id = player.id(), "Existing player found");
            return Ok(player);
        }

        info!(username = %username, "Creating new player");
        self.repository.create_player(username.to_string())
    }

    /// Gets a player by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store fails.
    #[instrument(skip(self))]
    pub fn get(&self, player_id: i32) -> Result<Option<Player>, DbError> {
        self.repository.get_player(player_id)
    }

    /// Lists all player profiles, ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store fails.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Player>, DbError> {
        self.repository.list_players()
    }

    /// Gets a player's persistent score.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the player does not exist or the store fails.
    #[instrument(skip(self))]
    pub fn score(&self, player_id: i32) -> Result<i32, DbError> {
        self.repository.get_score(player_id)
    }

    /// Adds a score delta to a player's persistent score.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the player does not exist or the store fails.
    #[instrument(skip(self))]
    pub fn add_score(&self, player_id: i32, delta: i32) -> Result<(), DbError> {
        self.repository.add_score(player_id, delta)
    }
}
