// src/store/questions.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::models::question::{NewQuestion, Question};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("question {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// CRUD access to the `questions` table.
///
/// Ids come from SQLite `AUTOINCREMENT`, so an id is never handed out twice,
/// even after the row holding it was deleted.
#[derive(Debug, Clone)]
pub struct QuestionRepository {
    pool: SqlitePool,
}

impl QuestionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a single question and returns its id.
    pub async fn create(&self, question: &NewQuestion) -> Result<i64, StoreError> {
        let id = insert_question(&self.pool, question, Utc::now()).await?;
        tracing::debug!("Created question {}", id);
        Ok(id)
    }

    /// Inserts all questions in one transaction, in slice order.
    /// Either every row is written or none is.
    pub async fn create_many(&self, questions: &[NewQuestion]) -> Result<Vec<i64>, StoreError> {
        let created_at = Utc::now();
        let mut tx = self.pool.begin().await?;

        let mut ids = Vec::with_capacity(questions.len());
        for question in questions {
            ids.push(insert_question(&mut *tx, question, created_at).await?);
        }

        tx.commit().await?;
        tracing::debug!("Created {} questions in one batch", ids.len());
        Ok(ids)
    }

    /// All questions in their natural order (ascending id).
    pub async fn list_all(&self) -> Result<Vec<Question>, StoreError> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT
                id, question_text,
                option_a, option_b, option_c, option_d,
                correct_answer, image_filename, created_at
            FROM questions
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    pub async fn get(&self, id: i64) -> Result<Question, StoreError> {
        sqlx::query_as::<_, Question>(
            r#"
            SELECT
                id, question_text,
                option_a, option_b, option_c, option_d,
                correct_answer, image_filename, created_at
            FROM questions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))
    }

    /// Replaces every field of the question, including the image reference.
    pub async fn update(&self, id: i64, question: &NewQuestion) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE questions SET
                question_text = ?,
                option_a = ?,
                option_b = ?,
                option_c = ?,
                option_d = ?,
                correct_answer = ?,
                image_filename = ?
            WHERE id = ?
            "#,
        )
        .bind(question.question_text.as_str())
        .bind(question.option_a.as_str())
        .bind(question.option_b.as_str())
        .bind(question.option_c.as_str())
        .bind(question.option_d.as_str())
        .bind(question.correct_answer.as_str())
        .bind(question.image_filename.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    /// Deletes the question and returns the row as it was,
    /// so the caller can clean up the image it referenced.
    pub async fn delete(&self, id: i64) -> Result<Question, StoreError> {
        sqlx::query_as::<_, Question>(
            r#"
            DELETE FROM questions
            WHERE id = ?
            RETURNING
                id, question_text,
                option_a, option_b, option_c, option_d,
                correct_answer, image_filename, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))
    }
}

async fn insert_question<'e, E>(
    executor: E,
    question: &NewQuestion,
    created_at: DateTime<Utc>,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO questions
        (question_text, option_a, option_b, option_c, option_d, correct_answer, image_filename, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(question.question_text.as_str())
    .bind(question.option_a.as_str())
    .bind(question.option_b.as_str())
    .bind(question.option_c.as_str())
    .bind(question.option_d.as_str())
    .bind(question.correct_answer.as_str())
    .bind(question.image_filename.as_deref())
    .bind(created_at)
    .fetch_one(executor)
    .await
}
