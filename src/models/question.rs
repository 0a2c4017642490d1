// src/models/question.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::{Validate, ValidationError};

/// Placeholder stored in an option slot that is not in use.
/// The importer always writes it into `option_d`.
pub const UNUSED_OPTION: &str = "_";

/// Stored in `correct_answer` when no option was marked as correct.
pub const NO_ANSWER: &str = "_";

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    pub question_text: String,

    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,

    /// One of "A".."D", or "_" when no answer is marked.
    /// Kept as the raw stored string; the grader is responsible for rejecting
    /// anything outside that set.
    pub correct_answer: String,

    /// Name of the blob inside the image store, if any.
    pub image_filename: Option<String>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Question {
    /// Display text of the option slot addressed by `letter`.
    pub fn option(&self, letter: AnswerLetter) -> &str {
        match letter {
            AnswerLetter::A => &self.option_a,
            AnswerLetter::B => &self.option_b,
            AnswerLetter::C => &self.option_c,
            AnswerLetter::D => &self.option_d,
        }
    }
}

/// The four option slots of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
}

impl AnswerLetter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not an option letter")]
pub struct ParseLetterError(pub String);

/// Case-insensitive: "b" and "B" both address `option_b`.
impl FromStr for AnswerLetter {
    type Err = ParseLetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            _ => Err(ParseLetterError(s.to_string())),
        }
    }
}

/// Field values of a question before the store assigns it an id.
/// Used for inserts and for full-field replacement on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: String,
    pub image_filename: Option<String>,
}

/// DTO for sending a question to a quiz taker (excludes the answer).
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub image_filename: Option<String>,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            question_text: q.question_text,
            option_a: q.option_a,
            option_b: q.option_b,
            option_c: q.option_c,
            option_d: q.option_d,
            image_filename: q.image_filename,
        }
    }
}

/// Text fields of the manual-entry form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = validate_answer_slot))]
pub struct QuestionForm {
    #[validate(length(min = 1, max = 500))]
    pub question_text: String,
    #[validate(length(min = 1, max = 200))]
    pub option_a: String,
    #[validate(length(min = 1, max = 200))]
    pub option_b: String,
    #[validate(length(min = 1, max = 200))]
    pub option_c: String,
    #[validate(length(min = 1, max = 200))]
    pub option_d: String,
    #[validate(custom(function = validate_answer_key))]
    pub correct_answer: String,
}

impl QuestionForm {
    pub fn into_new_question(self, image_filename: Option<String>) -> NewQuestion {
        NewQuestion {
            question_text: self.question_text,
            option_a: self.option_a,
            option_b: self.option_b,
            option_c: self.option_c,
            option_d: self.option_d,
            correct_answer: self.correct_answer,
            image_filename,
        }
    }

    fn option(&self, letter: AnswerLetter) -> &str {
        match letter {
            AnswerLetter::A => &self.option_a,
            AnswerLetter::B => &self.option_b,
            AnswerLetter::C => &self.option_c,
            AnswerLetter::D => &self.option_d,
        }
    }
}

fn validate_answer_key(answer: &str) -> Result<(), ValidationError> {
    match answer {
        "A" | "B" | "C" | "D" | NO_ANSWER => Ok(()),
        _ => Err(ValidationError::new("unknown_answer_letter")),
    }
}

/// A marked answer must point at a slot that is actually in use.
fn validate_answer_slot(form: &QuestionForm) -> Result<(), ValidationError> {
    let Ok(letter) = form.correct_answer.parse::<AnswerLetter>() else {
        // "_" or an invalid key, the field-level check reports the latter.
        return Ok(());
    };
    if form.option(letter) == UNUSED_OPTION {
        return Err(ValidationError::new("answer_points_at_unused_option"));
    }
    Ok(())
}
