//! Market Scan
//!
//! Vehicle attendance tracking from license-plate scans: a REST JSON API
//! over recorded scans, with daily, weekly and monthly aggregates and
//! persisted daily reports.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod engine;
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
}
