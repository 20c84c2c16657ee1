//! Game-state change events and the listener registry.
//!
//! Observers register callback handles with the selection state machine and
//! are invoked synchronously, in registration order, within the mutating
//! call. Events are never persisted.

use serde::Serialize;
use tracing::instrument;

use crate::db::{Morpheme, Word};

/// An entry in the session's constructed-word history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ConstructedWord {
    /// A catalog word validated against the stored lexicon.
    Catalog(Word),
    /// A free-build construction with a player-supplied definition.
    FreeBuild {
        /// Concatenated morpheme texts.
        text: String,
        /// Definition supplied by the player.
        definition: String,
        /// Points awarded by the free-build formula.
        points: i32,
    },
}

impl ConstructedWord {
    /// Returns the display text of the construction.
    pub fn text(&self) -> &str {
        match self {
            Self::Catalog(word) => word.text(),
            Self::FreeBuild { text, .. } => text,
        }
    }

    /// Returns the points this construction scored.
    pub fn points(&self) -> i32 {
        match self {
            Self::Catalog(word) => *word.points(),
            Self::FreeBuild { points, .. } => *points,
        }
    }
}

/// Emitted by [`GameState`](crate::GameState) after each state mutation.
///
/// Each variant is emitted exactly once per triggering operation;
/// `WordConstructed` is always immediately followed by `ScoreUpdated` when
/// the score changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameStateEvent {
    /// A morpheme was appended to the selection.
    MorphemeSelected(Morpheme),
    /// A morpheme was removed from the selection.
    MorphemeDeselected(Morpheme),
    /// The selection was emptied.
    SelectionCleared,
    /// A construction was recorded in the session history.
    WordConstructed(ConstructedWord),
    /// The live score cache changed; carries the new score.
    ScoreUpdated(i32),
    /// The session was reset for a new round.
    RoundReset,
}

/// Observer of game-state changes.
///
/// Blanket-implemented for closures, so `state.add_listener(|event| ...)`
/// works directly.
pub trait GameStateListener {
    /// Called synchronously after each state mutation.
    fn on_game_state_changed(&mut self, event: &GameStateEvent);
}

impl<F: FnMut(&GameStateEvent)> GameStateListener for F {
    fn on_game_state_changed(&mut self, event: &GameStateEvent) {
        self(event)
    }
}

/// Handle identifying a registered listener, used to unregister it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered registry of listeners, notified in registration order.
pub(crate) struct Listeners {
    entries: Vec<(ListenerId, Box<dyn GameStateListener>)>,
    next_id: u64,
}

impl Listeners {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn add(&mut self, listener: Box<dyn GameStateListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() < before
    }

    #[instrument(skip(self, event), fields(listeners = self.entries.len()))]
    pub(crate) fn notify(&mut self, event: &GameStateEvent) {
        for (_, listener) in &mut self.entries {
            listener.on_game_state_changed(event);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
