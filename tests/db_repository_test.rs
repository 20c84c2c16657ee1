//! Tests for database repository operations.

use tempfile::NamedTempFile;

use wordcraft::GameRepository;

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, GameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    (db_file, repo)
}

#[test]
fn test_create_player() {
    let (_db, repo) = setup_test_db();
    let player = repo
        .create_player("Alice".to_string())
        .expect("Create failed");
    assert_eq!(player.username(), "Alice");
    assert!(*player.id() > 0);
    assert_eq!(*player.score(), 0);
}

#[test]
fn test_create_player_duplicate_name_fails() {
    let (_db, repo) = setup_test_db();
    repo.create_player("Bob".to_string())
        .expect("First create failed");
    let result = repo.create_player("Bob".to_string());
    assert!(result.is_err(), "Duplicate name should fail");
}

#[test]
fn test_get_player_by_name() {
    let (_db, repo) = setup_test_db();
    repo.create_player("Carol".to_string())
        .expect("Create failed");
    let found = repo.get_player_by_name("Carol").expect("Query failed");
    assert!(found.is_some());
    assert_eq!(found.unwrap().username(), "Carol");

    let missing = repo.get_player_by_name("NoSuchPlayer").expect("Query failed");
    assert!(missing.is_none());
}

#[test]
fn test_add_score_accumulates() {
    let (_db, repo) = setup_test_db();
    let player = repo
        .create_player("Dave".to_string())
        .expect("Create failed");

    repo.add_score(*player.id(), 5).expect("Add failed");
    repo.add_score(*player.id(), 7).expect("Add failed");

    let score = repo.get_score(*player.id()).expect("Score failed");
    assert_eq!(score, 12);
}

#[test]
fn test_add_score_unknown_player_fails() {
    let (_db, repo) = setup_test_db();
    assert!(repo.add_score(999, 5).is_err());
}

#[test]
fn test_add_and_list_morphemes() {
    let (_db, repo) = setup_test_db();
    repo.add_morpheme("re".to_string(), "De nouveau".to_string())
        .expect("Add failed");
    repo.add_morpheme("faire".to_string(), "Accomplir une action".to_string())
        .expect("Add failed");

    let morphemes = repo.list_morphemes().expect("List failed");
    assert_eq!(morphemes.len(), 2);
    assert_eq!(morphemes[0].text(), "re");
    assert_eq!(morphemes[1].text(), "faire");
    assert!(morphemes[0].id() < morphemes[1].id());
}

#[test]
fn test_add_word_preserves_ordered_sequence() {
    let (_db, repo) = setup_test_db();
    let re = repo
        .add_morpheme("re".to_string(), "De nouveau".to_string())
        .expect("Add failed");
    let faire = repo
        .add_morpheme("faire".to_string(), "Accomplir".to_string())
        .expect("Add failed");

    let word = repo
        .add_word(
            "refaire".to_string(),
            vec![*re.id(), *faire.id()],
            5,
            "Faire de nouveau".to_string(),
        )
        .expect("Add word failed");

    assert_eq!(word.text(), "refaire");
    assert_eq!(word.morpheme_ids(), &vec![*re.id(), *faire.id()]);
    assert_eq!(*word.points(), 5);

    let words = repo.list_words().expect("List failed");
    assert_eq!(words.len(), 1);
    assert_eq!(words[0], word);
}

#[test]
fn test_add_word_allows_repeated_morpheme() {
    let (_db, repo) = setup_test_db();
    let bon = repo
        .add_morpheme("bon".to_string(), "Sucrerie".to_string())
        .expect("Add failed");

    let word = repo
        .add_word(
            "bonbon".to_string(),
            vec![*bon.id(), *bon.id()],
            3,
            "Une sucrerie".to_string(),
        )
        .expect("Add word failed");

    assert_eq!(word.morpheme_ids(), &vec![*bon.id(), *bon.id()]);
}

#[test]
fn test_validate_word_exact_match() {
    let (_db, repo) = setup_test_db();
    let re = repo
        .add_morpheme("re".to_string(), "De nouveau".to_string())
        .expect("Add failed");
    let faire = repo
        .add_morpheme("faire".to_string(), "Accomplir".to_string())
        .expect("Add failed");
    let word = repo
        .add_word(
            "refaire".to_string(),
            vec![*re.id(), *faire.id()],
            5,
            String::new(),
        )
        .expect("Add word failed");

    let validated = repo
        .validate_word("refaire", &[*re.id(), *faire.id()])
        .expect("Validate failed");
    assert_eq!(validated, Some(word));
}

#[test]
fn test_validate_word_is_order_sensitive() {
    let (_db, repo) = setup_test_db();
    let re = repo
        .add_morpheme("re".to_string(), "De nouveau".to_string())
        .expect("Add failed");
    let faire = repo
        .add_morpheme("faire".to_string(), "Accomplir".to_string())
        .expect("Add failed");
    repo.add_word(
        "refaire".to_string(),
        vec![*re.id(), *faire.id()],
        5,
        String::new(),
    )
    .expect("Add word failed");

    // Same multiset, reversed order: no match.
    let validated = repo
        .validate_word("refaire", &[*faire.id(), *re.id()])
        .expect("Validate failed");
    assert!(validated.is_none());
}

#[test]
fn test_validate_word_rejects_wrong_decomposition() {
    let (_db, repo) = setup_test_db();
    let re = repo
        .add_morpheme("re".to_string(), "De nouveau".to_string())
        .expect("Add failed");
    let faire = repo
        .add_morpheme("faire".to_string(), "Accomplir".to_string())
        .expect("Add failed");
    let de = repo
        .add_morpheme("dé".to_string(), "Enlever".to_string())
        .expect("Add failed");
    repo.add_word(
        "refaire".to_string(),
        vec![*re.id(), *faire.id()],
        5,
        String::new(),
    )
    .expect("Add word failed");

    // Text matches a stored word, but the candidate decomposition differs.
    assert!(
        repo.validate_word("refaire", &[*de.id(), *faire.id()])
            .expect("Validate failed")
            .is_none()
    );
    // Prefix of the stored sequence: length differs, no match.
    assert!(
        repo.validate_word("refaire", &[*re.id()])
            .expect("Validate failed")
            .is_none()
    );
}

#[test]
fn test_validate_word_unknown_text() {
    let (_db, repo) = setup_test_db();
    let validated = repo.validate_word("inconnu", &[1, 2]).expect("Validate failed");
    assert!(validated.is_none());
}

#[test]
fn test_record_word_solved_is_idempotent() {
    let (_db, repo) = setup_test_db();
    let player = repo
        .create_player("Eve".to_string())
        .expect("Create failed");
    let m = repo
        .add_morpheme("voir".to_string(), "Percevoir".to_string())
        .expect("Add failed");
    let word = repo
        .add_word("voir".to_string(), vec![*m.id()], 2, String::new())
        .expect("Add word failed");

    let first = repo
        .record_word_solved(*player.id(), *word.id())
        .expect("Record failed");
    let second = repo
        .record_word_solved(*player.id(), *word.id())
        .expect("Record failed");

    assert!(first);
    assert!(!second);
    assert_eq!(repo.words_solved(*player.id()).expect("Query failed"), vec![*word.id()]);
}

#[test]
fn test_record_construction_updates_score_and_association() {
    let (_db, repo) = setup_test_db();
    let player = repo
        .create_player("Frank".to_string())
        .expect("Create failed");
    let m = repo
        .add_morpheme("voir".to_string(), "Percevoir".to_string())
        .expect("Add failed");
    let word = repo
        .add_word("voir".to_string(), vec![*m.id()], 2, String::new())
        .expect("Add word failed");

    repo.record_construction(*player.id(), *word.id(), *word.points())
        .expect("Record failed");

    assert_eq!(repo.get_score(*player.id()).expect("Score failed"), 2);
    assert_eq!(
        repo.words_solved(*player.id()).expect("Query failed"),
        vec![*word.id()]
    );
}

#[test]
fn test_record_construction_rescoring_keeps_single_association() {
    let (_db, repo) = setup_test_db();
    let player = repo
        .create_player("Grace".to_string())
        .expect("Create failed");
    let m = repo
        .add_morpheme("voir".to_string(), "Percevoir".to_string())
        .expect("Add failed");
    let word = repo
        .add_word("voir".to_string(), vec![*m.id()], 2, String::new())
        .expect("Add word failed");

    repo.record_construction(*player.id(), *word.id(), 2)
        .expect("Record failed");
    repo.record_construction(*player.id(), *word.id(), 2)
        .expect("Record failed");

    // Re-solving scores again; the association stays deduplicated.
    assert_eq!(repo.get_score(*player.id()).expect("Score failed"), 4);
    assert_eq!(
        repo.words_solved(*player.id())
            .expect("Query failed")
            .len(),
        1
    );
}

#[test]
fn test_record_construction_unknown_player_applies_nothing() {
    let (_db, repo) = setup_test_db();
    let m = repo
        .add_morpheme("voir".to_string(), "Percevoir".to_string())
        .expect("Add failed");
    let word = repo
        .add_word("voir".to_string(), vec![*m.id()], 2, String::new())
        .expect("Add word failed");

    assert!(repo.record_construction(999, *word.id(), 2).is_err());
    assert!(repo.words_solved(999).expect("Query failed").is_empty());
}
