//! Sample catalog data for a fresh database.

use tracing::{info, instrument};

use crate::db::{DbError, GameRepository};

/// Seeds the sample French catalog into an empty database.
///
/// Inserts a starter set of morphemes and two words built from them:
/// *refaire* (re + faire) and *prévoir* (pré + voir), both worth 5 points.
/// Returns `false` without touching anything if the catalog already has
/// morphemes.
///
/// # Errors
///
/// Returns [`DbError`] if a database error occurs.
#[instrument(skip(repository))]
pub fn seed_sample_catalog(repository: &GameRepository) -> Result<bool, DbError> {
    if !repository.list_morphemes()?.is_empty() {
        info!("Catalog already populated, skipping seed");
        return Ok(false);
    }

    let samples = [
        ("dé", "Enlever ou inverser"),
        ("re", "De nouveau ou en arrière"),
        ("pré", "Avant"),
        ("jouer", "Pratiquer un jeu ou un divertissement"),
        ("faire", "Accomplir une action"),
        ("voir", "Percevoir avec les yeux"),
        ("able", "Capable d'être"),
        ("ment", "De manière"),
        ("tion", "Action ou procédé"),
    ];

    let mut ids = std::collections::HashMap::new();
    for (text, definition) in samples {
        let morpheme = repository.add_morpheme(text.to_string(), definition.to_string())?;
        ids.insert(text, *morpheme.id());
    }

    repository.add_word(
        "refaire".to_string(),
        vec![ids["re"], ids["faire"]],
        5,
        "Faire de nouveau, recommencer une action".to_string(),
    )?;

    repository.add_word(
        "prévoir".to_string(),
        vec![ids["pré"], ids["voir"]],
        5,
        "Anticiper ou prévoir ce qui va se passer".to_string(),
    )?;

    info!("Sample catalog seeded");
    Ok(true)
}
