// src/importer.rs

//! Bulk import of questions from the plain-text block format.
//!
//! Each question takes five lines:
//!
//! ```text
//! What is 2+2?
//! A) 3
//! B) 4 Y
//! C) 5
//! ---
//! ```
//!
//! The first line is the question, the next three are options A, B and C, and
//! the fifth line is a separator that is skipped. An option line ending in
//! `" Y"` marks that option as the correct one.

use std::{fmt, path::Path};

use serde::Serialize;

use crate::{
    models::question::{AnswerLetter, NO_ANSWER, NewQuestion, UNUSED_OPTION},
    store::{QuestionRepository, StoreError},
};

/// Lines per question block, separator included.
pub const BLOCK_LINES: usize = 5;

/// Lines of a block that must be present: the question and three options.
const REQUIRED_LINES: usize = 4;

const CORRECT_MARKER: &str = " Y";

const IMPORTED_SLOTS: [AnswerLetter; 3] = [AnswerLetter::A, AnswerLetter::B, AnswerLetter::C];

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("malformed input: block {block} starting at line {line} has {found} of the 4 required lines")]
    MalformedInput {
        block: usize,
        line: usize,
        found: usize,
    },

    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Data-quality findings that do not stop an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportWarning {
    /// More than one option carried the marker; the last one (in A, B, C
    /// order) was kept.
    MultipleMarkers {
        block: usize,
        line: usize,
        marked: Vec<AnswerLetter>,
        kept: AnswerLetter,
    },

    /// No option carried the marker; the question was stored with `_`.
    NoMarker { block: usize, line: usize },
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportWarning::MultipleMarkers {
                block,
                line,
                marked,
                kept,
            } => {
                let letters: Vec<&str> = marked.iter().map(|l| l.as_str()).collect();
                write!(
                    f,
                    "block {} (line {}) marks {} as correct, keeping {}",
                    block,
                    line,
                    letters.join(", "),
                    kept
                )
            }
            ImportWarning::NoMarker { block, line } => {
                write!(f, "block {} (line {}) has no correct answer marked", block, line)
            }
        }
    }
}

/// One option line after marker detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOption {
    pub text: String,
    pub marked: bool,
}

/// Questions parsed from one input, in block order.
#[derive(Debug, Default)]
pub struct ImportBatch {
    pub questions: Vec<NewQuestion>,
    pub warnings: Vec<ImportWarning>,
}

/// Summary of a completed import.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub inserted: usize,
    pub ids: Vec<i64>,
    pub warnings: Vec<ImportWarning>,
}

/// Trims an option line and strips the trailing `" Y"` marker if present.
pub fn parse_option(line: &str) -> ParsedOption {
    let line = line.trim();
    match line.strip_suffix(CORRECT_MARKER) {
        Some(text) => ParsedOption {
            text: text.to_string(),
            marked: true,
        },
        None => ParsedOption {
            text: line.to_string(),
            marked: false,
        },
    }
}

/// Parses every block of `input`.
///
/// The separator line of the final block may be missing. Any other short
/// block fails the whole parse, including one made only of blank lines.
pub fn parse_questions(input: &str) -> Result<ImportBatch, ImportError> {
    let lines: Vec<&str> = input.lines().collect();
    let mut batch = ImportBatch::default();
    let mut start = 0;

    while start < lines.len() {
        let block_no = batch.questions.len() + 1;
        let line_no = start + 1;
        let block = lines
            .get(start..start + REQUIRED_LINES)
            .ok_or(ImportError::MalformedInput {
                block: block_no,
                line: line_no,
                found: lines.len() - start,
            })?;

        let options = [block[1], block[2], block[3]].map(parse_option);

        // Every marker overwrites the previous one.
        let mut correct = None;
        let mut marked = Vec::new();
        for (letter, option) in IMPORTED_SLOTS.into_iter().zip(&options) {
            if option.marked {
                correct = Some(letter);
                marked.push(letter);
            }
        }

        match correct {
            None => batch.warnings.push(ImportWarning::NoMarker {
                block: block_no,
                line: line_no,
            }),
            Some(kept) if marked.len() > 1 => batch.warnings.push(ImportWarning::MultipleMarkers {
                block: block_no,
                line: line_no,
                marked,
                kept,
            }),
            Some(_) => {}
        }

        let [option_a, option_b, option_c] = options.map(|o| o.text);
        batch.questions.push(NewQuestion {
            question_text: block[0].trim().to_string(),
            option_a,
            option_b,
            option_c,
            option_d: UNUSED_OPTION.to_string(),
            correct_answer: correct
                .map_or(NO_ANSWER, AnswerLetter::as_str)
                .to_string(),
            image_filename: None,
        });

        start += BLOCK_LINES;
    }

    Ok(batch)
}

/// Parses question files and writes the result to the store in one batch.
pub struct Importer<'a> {
    repo: &'a QuestionRepository,
}

impl<'a> Importer<'a> {
    pub fn new(repo: &'a QuestionRepository) -> Self {
        Self { repo }
    }

    /// Imports questions from text already in memory.
    /// Nothing is written unless the whole input parses.
    pub async fn import_str(&self, input: &str) -> Result<ImportReport, ImportError> {
        let batch = parse_questions(input)?;

        for warning in &batch.warnings {
            tracing::warn!("Import: {}", warning);
        }

        let ids = self.repo.create_many(&batch.questions).await?;
        tracing::info!("{} questions added to the database.", ids.len());

        Ok(ImportReport {
            inserted: ids.len(),
            ids,
            warnings: batch.warnings,
        })
    }

    pub async fn import_file(&self, path: impl AsRef<Path>) -> Result<ImportReport, ImportError> {
        let path = path.as_ref();
        let input = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ImportError::Io {
                path: path.display().to_string(),
                source,
            })?;

        tracing::info!("Importing questions from {}", path.display());
        self.import_str(&input).await
    }
}
