//! Application layer: Use cases and services.
//!
//! This module wires the domain encoder to the classifier port to implement
//! the single use case of the application: predicting a risk level from a
//! questionnaire.

mod context;
mod predictor;

pub use context::ModelContext;
pub use predictor::PredictorService;
