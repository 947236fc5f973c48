//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the integration with the exported artifacts:
//! - `model`: JSON-exported classifiers implementing `Classifier`
//! - `artifacts`: artifact directory loading and integrity checks

pub mod artifacts;
pub mod model;

pub use artifacts::{load_artifacts, ArtifactError, IntegrityPolicy, LoadedArtifacts, Verification};
pub use model::ExportedClassifier;
