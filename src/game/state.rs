//! Selection state machine for one active game session.
//!
//! Holds the ordered morpheme selection, the session's constructed-word
//! history and the live score cache for exactly one player, and notifies
//! registered listeners synchronously after each mutation.

use tracing::{debug, instrument};

use crate::db::{Morpheme, Word};
use crate::game::event::{
    ConstructedWord, GameStateEvent, GameStateListener, ListenerId, Listeners,
};

/// In-memory game state for one player session.
///
/// Owned by exactly one session; no operation here touches the database.
/// All mutations emit [`GameStateEvent`]s to registered listeners, in
/// registration order, before returning.
#[derive(Debug)]
pub struct GameState {
    player_id: i32,
    selection: Vec<Morpheme>,
    constructed_words: Vec<ConstructedWord>,
    score: i32,
    listeners: Listeners,
}

impl GameState {
    /// Creates a fresh state for a player, priming the score cache with the
    /// player's persistent score.
    #[instrument]
    pub fn new(player_id: i32, initial_score: i32) -> Self {
        Self {
            player_id,
            selection: Vec::new(),
            constructed_words: Vec::new(),
            score: initial_score,
            listeners: Listeners::new(),
        }
    }

    /// Registers a listener; returns a handle for [`Self::remove_listener`].
    pub fn add_listener(&mut self, listener: impl GameStateListener + 'static) -> ListenerId {
        self.listeners.add(Box::new(listener))
    }

    /// Unregisters a listener. Returns `false` if the handle was unknown.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// The player this session belongs to.
    pub fn player_id(&self) -> i32 {
        self.player_id
    }

    /// Read-only view of the ordered selection.
    pub fn selection(&self) -> &[Morpheme] {
        &self.selection
    }

    /// Whether a morpheme with this id is currently selected.
    pub fn is_selected(&self, morpheme_id: i32) -> bool {
        self.selection.iter().any(|m| *m.id() == morpheme_id)
    }

    /// The session's constructed-word history, oldest first.
    pub fn constructed_words(&self) -> &[ConstructedWord] {
        &self.constructed_words
    }

    /// The live score cache.
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Toggles a morpheme in the selection.
    ///
    /// If a morpheme with the same id is present, its first occurrence is
    /// removed and `MorphemeDeselected` is emitted; otherwise the morpheme
    /// is appended and `MorphemeSelected` is emitted.
    ///
    /// Because the second toggle of a morpheme removes it, the same
    /// morpheme cannot be selected twice through this interface, so words
    /// that repeat a morpheme are not constructible here. Carried over from
    /// the source design.
    #[instrument(skip(self, morpheme), fields(morpheme_id = morpheme.id(), text = %morpheme.text()))]
    pub fn toggle_morpheme(&mut self, morpheme: &Morpheme) {
        if let Some(pos) = self.selection.iter().position(|m| m.id() == morpheme.id()) {
            let removed = self.selection.remove(pos);
            debug!(pos, "Morpheme deselected");
            self.listeners
                .notify(&GameStateEvent::MorphemeDeselected(removed));
        } else {
            self.selection.push(morpheme.clone());
            debug!(len = self.selection.len(), "Morpheme selected");
            self.listeners
                .notify(&GameStateEvent::MorphemeSelected(morpheme.clone()));
        }
    }

    /// Empties the selection, emitting exactly one `SelectionCleared`.
    #[instrument(skip(self))]
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.listeners.notify(&GameStateEvent::SelectionCleared);
    }

    /// Records a validated catalog word in the session history and adds its
    /// points to the live score cache.
    ///
    /// Emits `WordConstructed` followed by `ScoreUpdated`.
    #[instrument(skip(self, word), fields(word_id = word.id(), points = word.points()))]
    pub fn record_constructed_word(&mut self, word: Word) {
        assert!(*word.points() > 0, "catalog word must have positive points");

        let entry = ConstructedWord::Catalog(word);
        self.record_entry(entry);
    }

    /// Records a free-build construction in the session history and adds
    /// its formula points to the live score cache.
    ///
    /// Emits `WordConstructed` followed by `ScoreUpdated`. Free-build
    /// constructions are session-local; they are never written to the
    /// player-word association store.
    #[instrument(skip(self, text, definition), fields(text = %text))]
    pub fn record_free_build(&mut self, text: String, definition: String, points: i32) {
        assert!(points > 0, "free-build construction must have positive points");

        let entry = ConstructedWord::FreeBuild {
            text,
            definition,
            points,
        };
        self.record_entry(entry);
    }

    fn record_entry(&mut self, entry: ConstructedWord) {
        self.score += entry.points();
        self.constructed_words.push(entry.clone());
        self.listeners
            .notify(&GameStateEvent::WordConstructed(entry));
        self.listeners
            .notify(&GameStateEvent::ScoreUpdated(self.score));
    }

    /// Replaces the live score cache, emitting `ScoreUpdated` only if the
    /// value actually changed.
    #[instrument(skip(self))]
    pub fn set_score(&mut self, new_score: i32) {
        let old_score = self.score;
        self.score = new_score;
        if old_score != new_score {
            self.listeners
                .notify(&GameStateEvent::ScoreUpdated(new_score));
        }
    }

    /// Clears the selection (emitting `SelectionCleared`) then emits
    /// `RoundReset`, so observers can distinguish a deliberate reset from a
    /// simple clear.
    #[instrument(skip(self))]
    pub fn reset_for_new_round(&mut self) {
        self.clear_selection();
        self.listeners.notify(&GameStateEvent::RoundReset);
    }
}
