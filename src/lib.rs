//! # genrisk
//!
//! Genetic disease risk predictor for a single clinical operator.
//!
//! This crate provides:
//! - A static catalog of hereditary disorders with their inheritance patterns
//! - A family and pregnancy history questionnaire, one-hot encoded against
//!   the column list the model was trained on
//! - Inference with JSON-exported classifiers, optionally verified against a
//!   signed manifest
//! - Terminal UI for local-only use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (catalog, questionnaire, predictions)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (exported models, artifact loading)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use config::AppConfig;
pub use domain::{PredictionResult, QuestionnaireResponse, RiskLabel};

/// Result type for genrisk operations
pub type Result<T> = std::result::Result<T, GenriskError>;

/// Main error type for genrisk
#[derive(Debug, thiserror::Error)]
pub enum GenriskError {
    #[error("Model artifacts unavailable: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    #[error("Model error: {0}")]
    Model(#[from] ports::ModelError),

    #[error("Invalid questionnaire: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
