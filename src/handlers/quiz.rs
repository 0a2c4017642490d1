// src/handlers/quiz.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    error::AppError,
    grader::Grader,
    models::{grade::SubmitQuizRequest, question::PublicQuestion},
    store::QuestionRepository,
};

/// Returns the quiz: every stored question, in order, without answers.
pub async fn get_quiz(
    State(repo): State<QuestionRepository>,
) -> Result<impl IntoResponse, AppError> {
    let questions = repo.list_all().await.map_err(|e| {
        tracing::error!("Failed to fetch quiz questions: {:?}", e);
        e
    })?;

    let paper: Vec<PublicQuestion> = questions.into_iter().map(PublicQuestion::from).collect();
    Ok(Json(paper))
}

/// Grades a submitted quiz.
///
/// * Every stored question is graded; ones missing from `answers` count as unanswered.
/// * One point per correct answer, no partial credit.
/// * Letters outside A-D are rejected with 400.
pub async fn submit_quiz(
    State(repo): State<QuestionRepository>,
    Json(req): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let report = Grader::new(&repo).grade_submission(&req.answers).await?;
    Ok(Json(report))
}
