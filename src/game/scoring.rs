//! Scoring policies for word constructions.
//!
//! Two strategies, selected by game mode and never mixed for a single
//! construction: catalog scoring uses the word's stored point value;
//! free-build scoring computes points from the selection length and guards
//! acceptance with a lexical definition-relevance check.

use derive_more::{Display, Error};
use tracing::{debug, instrument};

use crate::db::Morpheme;

/// Game mode selecting the scoring and validation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, clap::ValueEnum)]
#[strum(serialize_all = "kebab-case")]
pub enum GameMode {
    /// Submissions are checked against stored catalog words.
    Catalog,
    /// Any sequence is accepted, scored by formula, subject to the
    /// definition-relevance check.
    FreeBuild,
}

/// Computes free-build points for a selection of `n` morphemes.
///
/// Points = `n + (n-1)²`, rewarding longer combinations superlinearly:
/// 1→1, 2→3, 3→7, 4→12, 5→19.
///
/// # Panics
///
/// Panics if `n` is zero; callers reject empty selections before scoring.
#[instrument]
pub fn free_build_points(n: usize) -> i32 {
    assert!(n >= 1, "free-build scoring requires at least one morpheme");
    let n = n as i32;
    n + (n - 1) * (n - 1)
}

/// Why a free-build definition was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum DefinitionRejection {
    /// The supplied definition was empty or whitespace.
    #[display("a definition is required to validate the word")]
    Empty,
    /// No token of the definition relates to this morpheme's stored
    /// definition.
    #[display(
        "the definition must include at least one word related to the morpheme '{text}' ({definition})"
    )]
    UnrelatedMorpheme {
        /// Display text of the unmatched morpheme.
        text: String,
        /// Stored definition of the unmatched morpheme.
        definition: String,
    },
}

/// Best-effort lexical check that a player-supplied definition relates to
/// every selected morpheme.
///
/// The user definition is lowercased and split on whitespace and
/// punctuation; each morpheme's stored definition must share at least one
/// token with it. Morpheme tokens shorter than three characters are
/// skipped, and a match is token equality or containment in either
/// direction. Heuristic only; a miss is a rejection, not a fault.
///
/// # Errors
///
/// Returns [`DefinitionRejection`] naming the first morpheme with no
/// related token, or [`DefinitionRejection::Empty`] for a blank definition.
#[instrument(skip(user_definition, morphemes), fields(morphemes = morphemes.len()))]
pub fn validate_definition(
    user_definition: &str,
    morphemes: &[Morpheme],
) -> Result<(), DefinitionRejection> {
    let normalized = user_definition.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(DefinitionRejection::Empty);
    }

    let user_tokens: Vec<&str> = tokenize(&normalized);

    for morpheme in morphemes {
        let morpheme_def = morpheme.definition().to_lowercase();
        let morpheme_tokens = tokenize(&morpheme_def);

        let related = morpheme_tokens
            .iter()
            .filter(|token| token.len() >= 3)
            .any(|token| {
                user_tokens
                    .iter()
                    .any(|user| user == token || user.contains(token) || token.contains(user))
            });

        if !related {
            debug!(morpheme = %morpheme.text(), "No related token in user definition");
            return Err(DefinitionRejection::UnrelatedMorpheme {
                text: morpheme.text().clone(),
                definition: morpheme.definition().clone(),
            });
        }
    }

    Ok(())
}

/// Splits a definition into tokens on whitespace and punctuation.
fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| c.is_whitespace() || matches!(c, '.' | ',' | ';' | ':' | '!' | '?'))
        .filter(|token| !token.is_empty())
        .collect()
}
