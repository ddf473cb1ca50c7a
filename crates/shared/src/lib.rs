//! Shared types, errors, and configuration for Bodega.
//!
//! This crate provides common pieces used across all other crates:
//! - Application-wide error types with stable HTTP mappings
//! - Configuration management

pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
