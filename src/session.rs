//! One player's live game session.
//!
//! Owns the selection state machine and orchestrates the two submit flows:
//! catalog validation and free-build scoring. State is single-session,
//! single-player; the player identity travels explicitly through every
//! scoring and persistence call.

use tracing::{debug, info, instrument, warn};

use crate::catalog::{self, CatalogService};
use crate::db::{DbError, GameRepository, Morpheme, Player, Word};
use crate::game::{
    DefinitionRejection, GameMode, GameState, GameStateListener, ListenerId, free_build_points,
    validate_definition,
};
use crate::player::PlayerService;

/// Outcome of a catalog-mode submission.
///
/// Acceptance and persistence are reported separately: a construction the
/// engine accepted but could not durably record is still accepted, and the
/// in-memory state reflects it.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Nothing was selected; expected outcome, no state change.
    EmptySelection,
    /// The sequence is not a registered word; expected outcome, no state
    /// change.
    NotAWord {
        /// Concatenated text of the rejected candidate.
        text: String,
    },
    /// The word was validated, recorded in memory and persisted.
    Accepted {
        /// The validated catalog word.
        word: Word,
        /// Points awarded.
        points: i32,
    },
    /// The word was validated and recorded in memory, but persisting the
    /// score and association failed. No retry is attempted here.
    AcceptedNotPersisted {
        /// The validated catalog word.
        word: Word,
        /// Points awarded in memory.
        points: i32,
        /// The persistence fault.
        error: DbError,
    },
}

/// Outcome of a free-build submission.
#[derive(Debug)]
pub enum FreeBuildOutcome {
    /// Nothing was selected; expected outcome, no state change.
    EmptySelection,
    /// The supplied definition failed the relevance check; no score change.
    Rejected(DefinitionRejection),
    /// The construction was scored, recorded in memory and the score delta
    /// persisted.
    Accepted {
        /// Concatenated text of the construction.
        text: String,
        /// Points awarded by the formula.
        points: i32,
    },
    /// The construction was scored and recorded in memory, but persisting
    /// the score delta failed.
    AcceptedNotPersisted {
        /// Concatenated text of the construction.
        text: String,
        /// Points awarded in memory.
        points: i32,
        /// The persistence fault.
        error: DbError,
    },
}

/// One player's live game session: state machine plus services.
#[derive(Debug)]
pub struct GameSession {
    catalog: CatalogService,
    players: PlayerService,
    state: GameState,
    mode: GameMode,
}

impl GameSession {
    /// Starts a session for a player, priming the live score cache from the
    /// player's persistent score.
    #[instrument(skip(repository, player), fields(player_id = player.id()))]
    pub fn start(repository: GameRepository, player: &Player, mode: GameMode) -> Self {
        info!(player_id = player.id(), username = %player.username(), mode = %mode, "Starting game session");
        Self {
            catalog: CatalogService::new(repository.clone()),
            players: PlayerService::new(repository),
            state: GameState::new(*player.id(), *player.score()),
            mode,
        }
    }

    /// The session's game mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Read-only access to the session's state machine.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Registers a game-state listener.
    pub fn add_listener(&mut self, listener: impl GameStateListener + 'static) -> ListenerId {
        self.state.add_listener(listener)
    }

    /// Unregisters a game-state listener.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.state.remove_listener(id)
    }

    /// Toggles a morpheme in the selection.
    pub fn toggle_morpheme(&mut self, morpheme: &Morpheme) {
        self.state.toggle_morpheme(morpheme);
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.state.clear_selection();
    }

    /// Resets the session for a new round.
    pub fn reset_for_new_round(&mut self) {
        self.state.reset_for_new_round();
    }

    /// Submits the current selection against the catalog.
    ///
    /// On acceptance the construction is recorded in the state machine
    /// first (optimistic in-memory update), then the score delta and
    /// player-word association are persisted in one transaction. The
    /// selection is left intact; callers decide when to clear.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] only if the validation lookup itself fails;
    /// persistence faults after acceptance are reported through
    /// [`SubmitOutcome::AcceptedNotPersisted`].
    #[instrument(skip(self), fields(player_id = self.state.player_id()))]
    pub fn submit(&mut self) -> Result<SubmitOutcome, DbError> {
        let selection = self.state.selection();
        if selection.is_empty() {
            debug!("Submit with empty selection");
            return Ok(SubmitOutcome::EmptySelection);
        }

        let text = catalog::construct_word_text(selection);
        let ids = catalog::morpheme_ids(selection);

        let Some(word) = self.catalog.validate_word(&text, &ids)? else {
            debug!(text = %text, "Candidate is not a registered word");
            return Ok(SubmitOutcome::NotAWord { text });
        };

        let points = *word.points();
        self.state.record_constructed_word(word.clone());

        match self.catalog.repository().record_construction(
            self.state.player_id(),
            *word.id(),
            points,
        ) {
            Ok(()) => {
                info!(word_id = word.id(), points, "Construction accepted and persisted");
                Ok(SubmitOutcome::Accepted { word, points })
            }
            Err(error) => {
                warn!(word_id = word.id(), %error, "Construction accepted but not persisted");
                Ok(SubmitOutcome::AcceptedNotPersisted {
                    word,
                    points,
                    error,
                })
            }
        }
    }

    /// Submits the current selection in free-build mode with a
    /// player-supplied definition.
    ///
    /// The catalog is not consulted. On acceptance the construction is
    /// recorded in the state machine, the selection is cleared, and the
    /// score delta is persisted; free-build constructions are never written
    /// to the player-word association store.
    #[instrument(skip(self, definition), fields(player_id = self.state.player_id()))]
    pub fn submit_free_build(&mut self, definition: &str) -> FreeBuildOutcome {
        let selection = self.state.selection();
        if selection.is_empty() {
            debug!("Free-build submit with empty selection");
            return FreeBuildOutcome::EmptySelection;
        }

        if let Err(rejection) = validate_definition(definition, selection) {
            debug!(%rejection, "Free-build definition rejected");
            return FreeBuildOutcome::Rejected(rejection);
        }

        let points = free_build_points(selection.len());
        let text = catalog::construct_word_text(selection);

        self.state
            .record_free_build(text.clone(), definition.trim().to_string(), points);
        self.state.clear_selection();

        match self.players.add_score(self.state.player_id(), points) {
            Ok(()) => {
                info!(text = %text, points, "Free-build construction accepted and persisted");
                FreeBuildOutcome::Accepted { text, points }
            }
            Err(error) => {
                warn!(text = %text, %error, "Free-build construction accepted but not persisted");
                FreeBuildOutcome::AcceptedNotPersisted {
                    text,
                    points,
                    error,
                }
            }
        }
    }
}
