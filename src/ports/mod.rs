//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the application and the exported model.

mod classifier;

pub use classifier::{argmax, check_width, Classifier, ModelError};
