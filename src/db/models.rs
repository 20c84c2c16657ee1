//! Database models and domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema;

/// Player profile database model.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Getters, Serialize)]
#[diesel(table_name = schema::players)]
pub struct Player {
    id: i32,
    username: String,
    score: i32,
    created_at: NaiveDateTime,
}

/// Insertable player model for creating new profiles.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::players)]
pub struct NewPlayer {
    username: String,
}

/// Morpheme: atomic word-building unit with display text and definition.
///
/// Immutable once created; the catalog assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Getters, Serialize, new)]
#[diesel(table_name = schema::morphemes)]
pub struct Morpheme {
    id: i32,
    text: String,
    definition: String,
}

/// Insertable morpheme model.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::morphemes)]
pub struct NewMorpheme {
    text: String,
    definition: String,
}

/// Raw `words` table row. Assembled into a [`Word`] together with its
/// ordered morpheme ids from the junction table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::words)]
pub struct WordRow {
    id: i32,
    text: String,
    points: i32,
    definition: String,
}

/// Insertable word model.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::words)]
pub struct NewWord {
    text: String,
    points: i32,
    definition: String,
}

/// Insertable junction row tying a word to one morpheme at one position.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::word_morphemes)]
pub struct NewWordMorpheme {
    word_id: i32,
    morpheme_id: i32,
    position: i32,
}

/// Insertable player-word association row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::player_words)]
pub struct NewPlayerWord {
    player_id: i32,
    word_id: i32,
}

/// A catalog word: an ordered sequence of morpheme ids with a fixed point
/// value.
///
/// The ordered id sequence is the source of truth for validity; the display
/// text corresponds to the concatenated morpheme texts by convention only.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, new)]
pub struct Word {
    id: i32,
    text: String,
    morpheme_ids: Vec<i32>,
    points: i32,
    definition: String,
}
