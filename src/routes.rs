// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{questions, quiz},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges the sub-routers (questions, quiz).
/// * Serves uploaded images from the image store under `/uploads`.
/// * Applies global middleware (Trace, CORS, body limit).
/// * Injects global state (repository, image store, config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let question_routes = Router::new()
        .route(
            "/",
            get(questions::list_questions).post(questions::create_question),
        )
        .route("/import", post(questions::import_questions))
        .route(
            "/{id}",
            get(questions::get_question)
                .put(questions::update_question)
                .delete(questions::delete_question),
        );

    let quiz_routes = Router::new()
        .route("/", get(quiz::get_quiz))
        .route("/submit", post(quiz::submit_quiz));

    let uploads = ServeDir::new(state.images.root());
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .nest("/api/questions", question_routes)
        .nest("/api/quiz", quiz_routes)
        .nest_service("/uploads", uploads)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(body_limit),
        )
        .with_state(state)
}
