use crate::{
    config::Config,
    store::{ImageStore, QuestionRepository},
};
use axum::extract::FromRef;

/// Everything a handler needs, passed explicitly through the router.
#[derive(Clone)]
pub struct AppState {
    pub questions: QuestionRepository,
    pub images: ImageStore,
    pub config: Config,
}

impl FromRef<AppState> for QuestionRepository {
    fn from_ref(state: &AppState) -> Self {
        state.questions.clone()
    }
}

impl FromRef<AppState> for ImageStore {
    fn from_ref(state: &AppState) -> Self {
        state.images.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
