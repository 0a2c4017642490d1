// src/handlers/questions.rs

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    importer::Importer,
    models::question::QuestionForm,
    store::{ImageStore, QuestionRepository},
};

/// An image chosen in the question form.
/// Only constructed when the part carries both a file name and some bytes.
#[derive(Debug)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// A decoded `multipart/form-data` question submission.
struct QuestionSubmission {
    form: QuestionForm,
    image: Option<ImageUpload>,
}

/// Reads the six text fields and the optional `image` part.
/// Text is kept as typed apart from surrounding whitespace.
/// Missing text fields stay empty and are rejected by validation.
async fn read_submission(mut multipart: Multipart) -> Result<QuestionSubmission, AppError> {
    let mut form = QuestionForm::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            "image" => {
                let file_name = field.file_name().map(str::to_owned).unwrap_or_default();
                let bytes = field.bytes().await?;
                if !file_name.is_empty() && !bytes.is_empty() {
                    image = Some(ImageUpload { file_name, bytes });
                }
            }
            "question_text" => form.question_text = field.text().await?.trim().to_string(),
            "option_a" => form.option_a = field.text().await?.trim().to_string(),
            "option_b" => form.option_b = field.text().await?.trim().to_string(),
            "option_c" => form.option_c = field.text().await?.trim().to_string(),
            "option_d" => form.option_d = field.text().await?.trim().to_string(),
            "correct_answer" => form.correct_answer = field.text().await?.trim().to_string(),
            other => tracing::debug!("Ignoring unknown form field '{}'", other),
        }
    }

    Ok(QuestionSubmission { form, image })
}

/// Removes an image that no row references any more.
/// The row change has already happened, so a failure here is only logged.
async fn discard_image(images: &ImageStore, name: &str) {
    if let Err(e) = images.delete(name).await {
        tracing::warn!("Failed to delete image '{}': {:?}", name, e);
    }
}

/// Lists every question, answers included.
pub async fn list_questions(
    State(repo): State<QuestionRepository>,
) -> Result<impl IntoResponse, AppError> {
    let questions = repo.list_all().await.map_err(|e| {
        tracing::error!("Failed to list questions: {:?}", e);
        e
    })?;

    Ok(Json(questions))
}

/// Retrieves a single question by ID.
pub async fn get_question(
    State(repo): State<QuestionRepository>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let question = repo.get(id).await?;
    Ok(Json(question))
}

/// Creates a question from a multipart form, storing its image if one was sent.
pub async fn create_question(
    State(repo): State<QuestionRepository>,
    State(images): State<ImageStore>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let submission = read_submission(multipart).await?;
    submission
        .form
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let image_filename = match &submission.image {
        Some(upload) => Some(images.save(&upload.file_name, &upload.bytes).await?),
        None => None,
    };

    let question = submission.form.into_new_question(image_filename.clone());
    let id = match repo.create(&question).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to create question: {:?}", e);
            if let Some(name) = &image_filename {
                discard_image(&images, name).await;
            }
            return Err(e.into());
        }
    };

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// Replaces all text fields of a question.
///
/// A newly uploaded image replaces the old one, whose file is then deleted.
/// Without an upload the existing image reference is kept.
pub async fn update_question(
    State(repo): State<QuestionRepository>,
    State(images): State<ImageStore>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let existing = repo.get(id).await?;

    let submission = read_submission(multipart).await?;
    submission
        .form
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let new_image = match &submission.image {
        Some(upload) => Some(images.save(&upload.file_name, &upload.bytes).await?),
        None => None,
    };

    let image_filename = new_image.clone().or(existing.image_filename.clone());
    let question = submission.form.into_new_question(image_filename);

    if let Err(e) = repo.update(id, &question).await {
        if let Some(name) = &new_image {
            discard_image(&images, name).await;
        }
        return Err(e.into());
    }

    if let (Some(_), Some(old)) = (&new_image, &existing.image_filename) {
        discard_image(&images, old).await;
    }

    Ok(StatusCode::OK)
}

/// Deletes a question by ID together with its image file.
pub async fn delete_question(
    State(repo): State<QuestionRepository>,
    State(images): State<ImageStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = repo.delete(id).await?;

    if let Some(name) = &deleted.image_filename {
        discard_image(&images, name).await;
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Bulk-imports questions from a plain-text body in the five-line block format.
pub async fn import_questions(
    State(repo): State<QuestionRepository>,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    let report = Importer::new(&repo).import_str(&body).await?;
    Ok((StatusCode::CREATED, Json(report)))
}
