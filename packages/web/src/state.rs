//! Shared application state.

use std::sync::Arc;

use notebook_api::profile_image::ImageFetcher;
use sqlx::PgPool;

/// Handed to every handler; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub images: Arc<ImageFetcher>,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            images: Arc::new(ImageFetcher::new()),
        }
    }
}
