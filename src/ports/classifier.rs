//! Classifier port: Trait for a pre-trained risk model.
//!
//! This trait abstracts the exported model format from the application
//! logic. Implementations expose the two inference calls of a
//! scikit-learn style classifier.

use crate::domain::RiskLabel;

/// Errors raised by model inference or model validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Input has {got} features, model expects {expected}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("Invalid model parameters: {0}")]
    InvalidModel(String),
}

/// Trait for classification models.
///
/// Implementations provide:
/// - The ordered list of classes the probabilities refer to
/// - The expected input width
/// - Per-class probability estimates for one row
pub trait Classifier: Send + Sync {
    /// Classes in the order `predict_proba` reports them.
    fn classes(&self) -> &[RiskLabel];

    /// Number of input columns the model was trained on.
    fn n_features(&self) -> usize;

    /// Estimate the probability of each class for one row.
    ///
    /// # Errors
    /// Returns `ModelError::ShapeMismatch` if `row` has the wrong width.
    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, ModelError>;

    /// Predict the class of one row.
    ///
    /// Picks the most probable class; the first class wins a tie.
    ///
    /// # Errors
    /// Returns `ModelError::ShapeMismatch` if `row` has the wrong width.
    fn predict(&self, row: &[f64]) -> Result<RiskLabel, ModelError> {
        let proba = self.predict_proba(row)?;
        let best = argmax(&proba).ok_or_else(|| {
            ModelError::InvalidModel("model produced no class probabilities".into())
        })?;
        self.classes().get(best).copied().ok_or_else(|| {
            ModelError::InvalidModel(format!("class index {best} out of range"))
        })
    }
}

/// Index of the largest value; first index on ties, `None` when empty.
#[must_use]
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Check that an input row has the width the model expects.
///
/// # Errors
/// Returns `ModelError::ShapeMismatch` on mismatch.
pub fn check_width(expected: usize, row: &[f64]) -> Result<(), ModelError> {
    if row.len() == expected {
        Ok(())
    } else {
        Err(ModelError::ShapeMismatch {
            expected,
            got: row.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<f64>);

    impl Classifier for Fixed {
        fn classes(&self) -> &[RiskLabel] {
            &[RiskLabel::High, RiskLabel::Low, RiskLabel::Moderate]
        }

        fn n_features(&self) -> usize {
            2
        }

        fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
            check_width(self.n_features(), row)?;
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_argmax_first_wins_ties() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), Some(1));
        assert_eq!(argmax(&[0.9]), Some(0));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_default_predict_uses_class_order() {
        let model = Fixed(vec![0.1, 0.3, 0.6]);
        assert_eq!(model.predict(&[0.0, 1.0]), Ok(RiskLabel::Moderate));

        let model = Fixed(vec![0.5, 0.5, 0.0]);
        assert_eq!(model.predict(&[0.0, 1.0]), Ok(RiskLabel::High));
    }

    #[test]
    fn test_width_mismatch() {
        let model = Fixed(vec![1.0, 0.0, 0.0]);
        assert_eq!(
            model.predict(&[0.0]),
            Err(ModelError::ShapeMismatch {
                expected: 2,
                got: 1
            })
        );
    }
}
