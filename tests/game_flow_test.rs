//! End-to-end tests for game sessions: catalog submit flow, free-build
//! flow, and event observation.

use std::cell::RefCell;
use std::rc::Rc;

use tempfile::NamedTempFile;

use wordcraft::{
    CatalogService, ConstructedWord, FreeBuildOutcome, GameMode, GameRepository, GameSession,
    GameStateEvent, Morpheme, PlayerService, SubmitOutcome, seed_sample_catalog,
};

/// Temp database with schema and the sample catalog applied.
fn setup_seeded_db() -> (NamedTempFile, GameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    seed_sample_catalog(&repo).expect("Seed failed");
    (db_file, repo)
}

fn morpheme_by_text(catalog: &CatalogService, text: &str) -> Morpheme {
    catalog
        .morphemes()
        .expect("Morphemes failed")
        .into_iter()
        .find(|m| m.text() == text)
        .unwrap_or_else(|| panic!("No morpheme '{text}' in catalog"))
}

#[test]
fn catalog_submit_accepts_seeded_word() {
    let (_db, repo) = setup_seeded_db();
    let players = PlayerService::new(repo.clone());
    let catalog = CatalogService::new(repo.clone());

    let player = players.get_or_create("alice").expect("Player failed");
    let re = morpheme_by_text(&catalog, "re");
    let faire = morpheme_by_text(&catalog, "faire");

    let mut session = GameSession::start(repo.clone(), &player, GameMode::Catalog);
    session.toggle_morpheme(&re);
    session.toggle_morpheme(&faire);

    let outcome = session.submit().expect("Submit failed");
    let SubmitOutcome::Accepted { word, points } = outcome else {
        panic!("Expected acceptance, got {outcome:?}");
    };
    assert_eq!(word.text(), "refaire");
    assert_eq!(points, 5);

    // Optimistic in-memory update and durable record agree.
    assert_eq!(session.state().score(), 5);
    assert_eq!(players.score(*player.id()).expect("Score failed"), 5);
    assert_eq!(
        repo.words_solved(*player.id()).expect("Query failed"),
        vec![*word.id()]
    );
}

#[test]
fn catalog_submit_twice_scores_twice_but_associates_once() {
    let (_db, repo) = setup_seeded_db();
    let players = PlayerService::new(repo.clone());
    let catalog = CatalogService::new(repo.clone());

    let player = players.get_or_create("bob").expect("Player failed");
    let re = morpheme_by_text(&catalog, "re");
    let faire = morpheme_by_text(&catalog, "faire");

    let mut session = GameSession::start(repo.clone(), &player, GameMode::Catalog);

    for _ in 0..2 {
        session.toggle_morpheme(&re);
        session.toggle_morpheme(&faire);
        let outcome = session.submit().expect("Submit failed");
        assert!(matches!(outcome, SubmitOutcome::Accepted { .. }));
        session.clear_selection();
    }

    assert_eq!(session.state().score(), 10);
    assert_eq!(players.score(*player.id()).expect("Score failed"), 10);
    assert_eq!(
        repo.words_solved(*player.id())
            .expect("Query failed")
            .len(),
        1
    );
}

#[test]
fn catalog_submit_rejects_wrong_order() {
    let (_db, repo) = setup_seeded_db();
    let players = PlayerService::new(repo.clone());
    let catalog = CatalogService::new(repo.clone());

    let player = players.get_or_create("carol").expect("Player failed");
    let re = morpheme_by_text(&catalog, "re");
    let faire = morpheme_by_text(&catalog, "faire");

    let mut session = GameSession::start(repo.clone(), &player, GameMode::Catalog);
    session.toggle_morpheme(&faire);
    session.toggle_morpheme(&re);

    let outcome = session.submit().expect("Submit failed");
    let SubmitOutcome::NotAWord { text } = outcome else {
        panic!("Expected rejection, got {outcome:?}");
    };
    assert_eq!(text, "fairere");
    assert_eq!(session.state().score(), 0);
    assert_eq!(players.score(*player.id()).expect("Score failed"), 0);
}

#[test]
fn catalog_submit_with_empty_selection() {
    let (_db, repo) = setup_seeded_db();
    let players = PlayerService::new(repo.clone());

    let player = players.get_or_create("dave").expect("Player failed");
    let mut session = GameSession::start(repo, &player, GameMode::Catalog);

    let outcome = session.submit().expect("Submit failed");
    assert!(matches!(outcome, SubmitOutcome::EmptySelection));
}

#[test]
fn session_score_cache_primed_from_store() {
    let (_db, repo) = setup_seeded_db();
    let players = PlayerService::new(repo.clone());

    let player = players.get_or_create("eve").expect("Player failed");
    players.add_score(*player.id(), 9).expect("Add failed");
    let player = players
        .get(*player.id())
        .expect("Get failed")
        .expect("Player missing");

    let session = GameSession::start(repo, &player, GameMode::Catalog);
    assert_eq!(session.state().score(), 9);
}

#[test]
fn free_build_accepts_related_definition() {
    let (_db, repo) = setup_seeded_db();
    let players = PlayerService::new(repo.clone());
    let catalog = CatalogService::new(repo.clone());

    let player = players.get_or_create("frank").expect("Player failed");
    let de = morpheme_by_text(&catalog, "dé");
    let faire = morpheme_by_text(&catalog, "faire");
    let ment = morpheme_by_text(&catalog, "ment");

    let mut session = GameSession::start(repo.clone(), &player, GameMode::FreeBuild);
    session.toggle_morpheme(&de);
    session.toggle_morpheme(&faire);
    session.toggle_morpheme(&ment);

    // Shares a token with each stored definition: inverser / accomplir / manière.
    let outcome =
        session.submit_free_build("inverser une action accomplie, d'une certaine manière");
    let FreeBuildOutcome::Accepted { text, points } = outcome else {
        panic!("Expected acceptance, got {outcome:?}");
    };
    assert_eq!(text, "défairement");
    assert_eq!(points, 7);

    // Score persisted; selection cleared; no association row written.
    assert_eq!(session.state().score(), 7);
    assert_eq!(players.score(*player.id()).expect("Score failed"), 7);
    assert!(session.state().selection().is_empty());
    assert!(repo.words_solved(*player.id()).expect("Query failed").is_empty());

    // The construction lives in the in-memory session history.
    assert_eq!(session.state().constructed_words().len(), 1);
    assert!(matches!(
        session.state().constructed_words()[0],
        ConstructedWord::FreeBuild { points: 7, .. }
    ));
}

#[test]
fn free_build_rejects_unrelated_definition() {
    let (_db, repo) = setup_seeded_db();
    let players = PlayerService::new(repo.clone());
    let catalog = CatalogService::new(repo.clone());

    let player = players.get_or_create("grace").expect("Player failed");
    let de = morpheme_by_text(&catalog, "dé");
    let faire = morpheme_by_text(&catalog, "faire");
    let ment = morpheme_by_text(&catalog, "ment");

    let mut session = GameSession::start(repo.clone(), &player, GameMode::FreeBuild);
    session.toggle_morpheme(&de);
    session.toggle_morpheme(&faire);
    session.toggle_morpheme(&ment);

    let outcome = session.submit_free_build("zzz yyy xxx");
    assert!(matches!(outcome, FreeBuildOutcome::Rejected(_)));

    // No score change anywhere; selection kept for the player to edit.
    assert_eq!(session.state().score(), 0);
    assert_eq!(players.score(*player.id()).expect("Score failed"), 0);
    assert_eq!(session.state().selection().len(), 3);
    assert!(session.state().constructed_words().is_empty());
}

#[test]
fn free_build_rejects_empty_definition_and_selection() {
    let (_db, repo) = setup_seeded_db();
    let players = PlayerService::new(repo.clone());
    let catalog = CatalogService::new(repo.clone());

    let player = players.get_or_create("hank").expect("Player failed");
    let mut session = GameSession::start(repo.clone(), &player, GameMode::FreeBuild);

    let outcome = session.submit_free_build("une définition");
    assert!(matches!(outcome, FreeBuildOutcome::EmptySelection));

    let re = morpheme_by_text(&catalog, "re");
    session.toggle_morpheme(&re);
    let outcome = session.submit_free_build("   ");
    assert!(matches!(outcome, FreeBuildOutcome::Rejected(_)));
    assert_eq!(players.score(*player.id()).expect("Score failed"), 0);
}

#[test]
fn session_events_flow_through_listener() {
    let (_db, repo) = setup_seeded_db();
    let players = PlayerService::new(repo.clone());
    let catalog = CatalogService::new(repo.clone());

    let player = players.get_or_create("iris").expect("Player failed");
    let re = morpheme_by_text(&catalog, "re");
    let faire = morpheme_by_text(&catalog, "faire");

    let mut session = GameSession::start(repo, &player, GameMode::Catalog);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    session.add_listener(move |event: &GameStateEvent| sink.borrow_mut().push(event.clone()));

    session.toggle_morpheme(&re);
    session.toggle_morpheme(&faire);
    session.submit().expect("Submit failed");

    let events = events.borrow();
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], GameStateEvent::MorphemeSelected(_)));
    assert!(matches!(events[1], GameStateEvent::MorphemeSelected(_)));
    assert!(matches!(events[2], GameStateEvent::WordConstructed(_)));
    assert_eq!(events[3], GameStateEvent::ScoreUpdated(5));
}
