// tests/importer_tests.rs

use quizbank::importer::{ImportError, ImportWarning, Importer, parse_option, parse_questions};
use quizbank::models::question::AnswerLetter;
use quizbank::store::{self, QuestionRepository};

/// Opens a fresh, migrated database inside a temp dir.
/// The dir must outlive the repository.
async fn temp_repo() -> (QuestionRepository, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}", dir.path().join("quiz.db").display());

    let pool = store::open_pool(&url, 1)
        .await
        .expect("Failed to open test database");
    store::run_migrations(&pool)
        .await
        .expect("Failed to migrate database");

    (QuestionRepository::new(pool), dir)
}

#[test]
fn parse_option_strips_marker() {
    let option = parse_option("  B) 4 Y  ");
    assert_eq!(option.text, "B) 4");
    assert!(option.marked);

    let option = parse_option("A) 3");
    assert_eq!(option.text, "A) 3");
    assert!(!option.marked);
}

#[test]
fn parse_option_needs_space_before_marker() {
    // "Y" glued to the text is part of the option, not a marker.
    let option = parse_option("C) BUY");
    assert_eq!(option.text, "C) BUY");
    assert!(!option.marked);

    // Lowercase is not a marker either.
    let option = parse_option("C) yes y");
    assert!(!option.marked);
}

#[test]
fn parses_single_block() {
    let batch = parse_questions("What is 2+2?\nA) 3\nB) 4 Y\nC) 5\n---\n").unwrap();

    assert_eq!(batch.questions.len(), 1);
    let q = &batch.questions[0];
    assert_eq!(q.question_text, "What is 2+2?");
    assert_eq!(q.option_a, "A) 3");
    assert_eq!(q.option_b, "B) 4");
    assert_eq!(q.option_c, "C) 5");
    assert_eq!(q.option_d, "_");
    assert_eq!(q.correct_answer, "B");
    assert_eq!(q.image_filename, None);
    assert!(batch.warnings.is_empty());
}

#[test]
fn marker_letter_is_positional() {
    // The option text starts with "X)", but it sits in slot C.
    let batch = parse_questions("Q\nfirst\nsecond\nX) third Y\n\n").unwrap();
    assert_eq!(batch.questions[0].correct_answer, "C");
    assert_eq!(batch.questions[0].option_c, "X) third");
}

#[test]
fn no_marker_gives_placeholder_and_warning() {
    let batch = parse_questions("Q\na\nb\nc\n---\n").unwrap();

    assert_eq!(batch.questions[0].correct_answer, "_");
    assert_eq!(
        batch.warnings,
        vec![ImportWarning::NoMarker { block: 1, line: 1 }]
    );
}

#[test]
fn last_marker_wins_and_is_flagged() {
    let input = "Q1\na Y\nb\nc Y\n---\nQ2\na Y\nb Y\nc\n---\n";
    let batch = parse_questions(input).unwrap();

    assert_eq!(batch.questions[0].correct_answer, "C");
    assert_eq!(batch.questions[1].correct_answer, "B");
    assert_eq!(batch.questions[0].option_a, "a");
    assert_eq!(batch.questions[0].option_c, "c");

    assert_eq!(
        batch.warnings,
        vec![
            ImportWarning::MultipleMarkers {
                block: 1,
                line: 1,
                marked: vec![AnswerLetter::A, AnswerLetter::C],
                kept: AnswerLetter::C,
            },
            ImportWarning::MultipleMarkers {
                block: 2,
                line: 6,
                marked: vec![AnswerLetter::A, AnswerLetter::B],
                kept: AnswerLetter::B,
            },
        ]
    );
}

#[test]
fn display_text_round_trips() {
    let option_lines = ["Paris Y", "London", "Berlin"];
    let input = format!("Capital of France?\n{}\n---\n", option_lines.join("\n"));
    let batch = parse_questions(&input).unwrap();
    let q = &batch.questions[0];

    let rebuilt: Vec<String> = [
        (&q.option_a, "A"),
        (&q.option_b, "B"),
        (&q.option_c, "C"),
    ]
    .iter()
    .map(|(text, letter)| {
        if q.correct_answer == *letter {
            format!("{} Y", text)
        } else {
            text.to_string()
        }
    })
    .collect();

    assert_eq!(rebuilt, option_lines);
}

#[test]
fn keeps_block_order_and_handles_crlf() {
    let input = "One\r\na Y\r\nb\r\nc\r\n---\r\nTwo\r\na\r\nb Y\r\nc\r\n---\r\n";
    let batch = parse_questions(input).unwrap();

    let texts: Vec<&str> = batch
        .questions
        .iter()
        .map(|q| q.question_text.as_str())
        .collect();
    assert_eq!(texts, ["One", "Two"]);
    assert_eq!(batch.questions[0].option_c, "c");
    assert_eq!(batch.questions[1].correct_answer, "B");
}

#[test]
fn last_separator_may_be_missing() {
    let batch = parse_questions("Q\na\nb Y\nc").unwrap();
    assert_eq!(batch.questions.len(), 1);
    assert_eq!(batch.questions[0].correct_answer, "B");
}

#[test]
fn short_blank_tail_is_malformed() {
    let err = parse_questions("Q\na\nb Y\nc\n---\n\n").unwrap_err();

    match err {
        ImportError::MalformedInput { block, line, found } => {
            assert_eq!(block, 2);
            assert_eq!(line, 6);
            assert_eq!(found, 1);
        }
        other => panic!("Expected MalformedInput, got {:?}", other),
    }
}

#[test]
fn full_blank_tail_is_another_question() {
    let batch = parse_questions("Q\na\nb Y\nc\n---\n   \n\n\n\n\n").unwrap();

    assert_eq!(batch.questions.len(), 2);
    let blank = &batch.questions[1];
    assert_eq!(blank.question_text, "");
    assert_eq!(blank.option_a, "");
    assert_eq!(blank.correct_answer, "_");
}

#[test]
fn empty_input_yields_nothing() {
    let batch = parse_questions("").unwrap();
    assert!(batch.questions.is_empty());
    assert!(batch.warnings.is_empty());
}

#[test]
fn empty_text_is_accepted() {
    // Known permissive boundary: blank question and option lines are not rejected.
    let batch = parse_questions("\n\n Y\n\n---\n").unwrap();

    let q = &batch.questions[0];
    assert_eq!(q.question_text, "");
    assert_eq!(q.option_a, "");
    assert_eq!(q.option_b, "Y");
    assert_eq!(q.option_c, "");
}

#[test]
fn truncated_block_is_malformed() {
    let input = "Q1\na\nb Y\nc\n---\nQ2\na\n";
    let err = parse_questions(input).unwrap_err();

    match err {
        ImportError::MalformedInput { block, line, found } => {
            assert_eq!(block, 2);
            assert_eq!(line, 6);
            assert_eq!(found, 2);
        }
        other => panic!("Expected MalformedInput, got {:?}", other),
    }
}

#[tokio::test]
async fn import_inserts_in_file_order() {
    let (repo, _dir) = temp_repo().await;

    let input = "First?\nA) 1 Y\nB) 2\nC) 3\n---\nSecond?\nA) 1\nB) 2\nC) 3 Y\n---\n";
    let report = Importer::new(&repo).import_str(input).await.unwrap();

    assert_eq!(report.inserted, 2);
    assert_eq!(report.ids.len(), 2);
    assert!(report.ids[0] < report.ids[1]);

    let stored = repo.list_all().await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].question_text, "First?");
    assert_eq!(stored[0].correct_answer, "A");
    assert_eq!(stored[1].question_text, "Second?");
    assert_eq!(stored[1].correct_answer, "C");
    assert_eq!(stored[1].option_d, "_");
    assert!(stored.iter().all(|q| q.image_filename.is_none()));
}

#[tokio::test]
async fn truncated_file_inserts_nothing() {
    let (repo, _dir) = temp_repo().await;

    let input = "Complete?\na Y\nb\nc\n---\nWhat is 2+2?\nA) 3\n";
    let result = Importer::new(&repo).import_str(input).await;

    assert!(matches!(result, Err(ImportError::MalformedInput { .. })));
    assert!(repo.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn import_file_reads_from_disk() {
    let (repo, dir) = temp_repo().await;
    let path = dir.path().join("questions.txt");
    std::fs::write(&path, "What is 2+2?\nA) 3\nB) 4 Y\nC) 5\n---\n").unwrap();

    let report = Importer::new(&repo).import_file(&path).await.unwrap();
    assert_eq!(report.inserted, 1);

    let question = repo.get(report.ids[0]).await.unwrap();
    assert_eq!(question.option_b, "B) 4");
    assert_eq!(question.correct_answer, "B");
}

#[tokio::test]
async fn import_missing_file_is_io_error() {
    let (repo, dir) = temp_repo().await;
    let result = Importer::new(&repo)
        .import_file(dir.path().join("nope.txt"))
        .await;

    assert!(matches!(result, Err(ImportError::Io { .. })));
}
