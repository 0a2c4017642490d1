// src/models/grade.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::question::Question;

/// DTO for submitting a quiz attempt.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitQuizRequest {
    /// User's answers map.
    /// Key: Question ID as a string (form field names are strings)
    /// Value: selected option letter
    #[serde(default)]
    pub answers: HashMap<String, String>,
}

/// Outcome for one question of a graded quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question: Question,

    /// Display text of the option the user picked, `None` when unanswered.
    pub user_answer: Option<String>,

    /// Display text of the correct option, `None` when the question has no
    /// marked answer.
    pub correct_answer: Option<String>,

    pub is_correct: bool,
}

/// Result of grading a whole submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeReport {
    pub results: Vec<QuestionResult>,
    pub score: usize,
    pub total: usize,
}
