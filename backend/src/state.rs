//! Application state management
//!
//! Shared resources handed to every handler through Axum's state extraction.

use crate::config::AppConfig;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
///
/// `PgPool` is internally reference counted and the config sits behind an
/// `Arc`, so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Get a reference to the database pool
    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
