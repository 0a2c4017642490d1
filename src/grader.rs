// src/grader.rs

use std::collections::HashMap;

use crate::{
    models::{
        grade::{GradeReport, QuestionResult},
        question::{AnswerLetter, NO_ANSWER, Question},
    },
    store::{QuestionRepository, StoreError},
};

#[derive(Debug, thiserror::Error)]
pub enum GradeError {
    #[error("question {question_id}: '{letter}' is not one of A, B, C, D")]
    UnknownAnswerLetter { question_id: i64, letter: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Grades a submission against `questions`, in the order given.
///
/// `answers` maps a question id (as a string) to the submitted letter.
/// A missing or empty entry counts as unanswered, which is never correct.
/// A question is correct only if the submitted letter equals the stored
/// `correct_answer` exactly (case-sensitive).
pub fn grade(
    questions: &[Question],
    answers: &HashMap<String, String>,
) -> Result<GradeReport, GradeError> {
    let mut score = 0;
    let mut results = Vec::with_capacity(questions.len());

    for question in questions {
        let submitted = answers
            .get(&question.id.to_string())
            .map(String::as_str)
            .filter(|a| !a.is_empty());

        let correct_answer = match question.correct_answer.as_str() {
            NO_ANSWER => None,
            key => Some(option_text(question, key)?),
        };

        let user_answer = submitted
            .map(|letter| option_text(question, letter))
            .transpose()?;

        let is_correct = submitted.is_some_and(|a| a == question.correct_answer);
        if is_correct {
            score += 1;
        }

        results.push(QuestionResult {
            question: question.clone(),
            user_answer,
            correct_answer,
            is_correct,
        });
    }

    Ok(GradeReport {
        results,
        score,
        total: questions.len(),
    })
}

fn option_text(question: &Question, letter: &str) -> Result<String, GradeError> {
    let letter: AnswerLetter = letter
        .parse()
        .map_err(|_| GradeError::UnknownAnswerLetter {
            question_id: question.id,
            letter: letter.to_string(),
        })?;
    Ok(question.option(letter).to_string())
}

/// Grades submissions against every question in the store.
pub struct Grader<'a> {
    repo: &'a QuestionRepository,
}

impl<'a> Grader<'a> {
    pub fn new(repo: &'a QuestionRepository) -> Self {
        Self { repo }
    }

    pub async fn grade_submission(
        &self,
        answers: &HashMap<String, String>,
    ) -> Result<GradeReport, GradeError> {
        let questions = self.repo.list_all().await?;
        let report = grade(&questions, answers)?;

        tracing::info!("Quiz graded: {}/{}", report.score, report.total);
        Ok(report)
    }
}
