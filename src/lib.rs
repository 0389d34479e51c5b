//! Computers for Schools Kenya donation tracker
//!
//! REST JSON API recording equipment donations and school requests, turning
//! collected donations into refurbishable inventory and delivering that
//! inventory to schools.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub repository: repository::Repository,
}
