//! Model context: the loaded classifier and its training schema.

use std::path::Path;

use crate::adapters::{load_artifacts, ExportedClassifier, IntegrityPolicy, Verification};
use crate::ports::{Classifier, ModelError};
use crate::GenriskError;

/// Immutable pairing of a classifier with the columns it was trained on.
///
/// Built once at startup and shared read-only afterwards. Construction
/// guarantees the column list is as wide as the model input, so an encoded
/// row always has the shape the classifier expects.
#[derive(Debug)]
pub struct ModelContext<C = ExportedClassifier>
where
    C: Classifier,
{
    classifier: C,
    known_columns: Vec<String>,
    verification: Verification,
}

impl<C> ModelContext<C>
where
    C: Classifier,
{
    /// Pair a classifier with its column list.
    ///
    /// # Errors
    /// Returns `ModelError::ShapeMismatch` if the column count differs from
    /// the model's input width.
    pub fn new(classifier: C, known_columns: Vec<String>) -> Result<Self, ModelError> {
        if known_columns.len() != classifier.n_features() {
            return Err(ModelError::ShapeMismatch {
                expected: classifier.n_features(),
                got: known_columns.len(),
            });
        }
        Ok(Self {
            classifier,
            known_columns,
            verification: Verification::Unverified,
        })
    }

    #[must_use]
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    #[must_use]
    pub fn known_columns(&self) -> &[String] {
        &self.known_columns
    }

    /// How the artifacts behind this context were verified.
    #[must_use]
    pub fn verification(&self) -> Verification {
        self.verification
    }
}

impl ModelContext<ExportedClassifier> {
    /// Load both artifacts from `dir` and build the context.
    ///
    /// # Errors
    /// Returns error if artifacts cannot be read, verified or parsed, or if
    /// the column list does not match the model width.
    pub fn load(dir: &Path, policy: &IntegrityPolicy) -> Result<Self, GenriskError> {
        let loaded = load_artifacts(dir, policy)?;
        let mut context = Self::new(loaded.classifier, loaded.known_columns)?;
        context.verification = loaded.verification;
        Ok(context)
    }
}
