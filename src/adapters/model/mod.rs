//! Exported classifier adapter: Implementation of `Classifier` for models
//! exported from the training pipeline as JSON.
//!
//! Two model kinds are supported, selected by the `kind` tag:
//!
//! - `random_forest`: scikit-learn's flattened tree arrays per estimator.
//!   Each tree votes with the normalized class counts of the reached leaf
//!   and the forest averages the votes.
//! - `logistic_regression`: one coefficient row and intercept per class,
//!   turned into probabilities with a softmax.
//!
//! Class labels are parsed into `RiskLabel` on load, so an artifact with an
//! unexpected label is rejected at startup rather than at prediction time.

use serde::{Deserialize, Serialize};

use crate::domain::RiskLabel;
use crate::ports::{check_width, Classifier, ModelError};

/// Leaf marker in `children_left` / `children_right`.
const TREE_LEAF: i64 = -1;

/// One decision tree in scikit-learn's array layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Class counts (or weights) per node.
    pub value: Vec<Vec<f64>>,
}

impl ExportedTree {
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), ModelError> {
        let n = self.children_left.len();
        if n == 0 {
            return Err(ModelError::InvalidModel("tree has no nodes".into()));
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(ModelError::InvalidModel(
                "tree array lengths do not match".into(),
            ));
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == TREE_LEAF {
                if self.value[node].len() != n_classes {
                    return Err(ModelError::InvalidModel(format!(
                        "leaf {node} has {} class values, expected {n_classes}",
                        self.value[node].len()
                    )));
                }
                if self.value[node].iter().any(|v| !v.is_finite() || *v < 0.0) {
                    return Err(ModelError::InvalidModel(format!(
                        "leaf {node} has negative or non-finite class values"
                    )));
                }
                continue;
            }

            // Children always come after their parent in the flattened layout,
            // which also rules out cycles.
            for child in [left, right] {
                if child <= node as i64 || child as usize >= n {
                    return Err(ModelError::InvalidModel(format!(
                        "node {node} has invalid child index {child}"
                    )));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(ModelError::InvalidModel(format!(
                    "node {node} splits on invalid feature {feature}"
                )));
            }
        }
        Ok(())
    }

    /// Normalized class distribution of the leaf reached by `row`.
    fn leaf_proba(&self, row: &[f64]) -> Vec<f64> {
        let mut node = 0usize;
        while self.children_left[node] != TREE_LEAF {
            let feature = self.feature[node] as usize;
            node = if row[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        let counts = &self.value[node];
        let total: f64 = counts.iter().sum();
        if total > 0.0 {
            counts.iter().map(|c| c / total).collect()
        } else {
            vec![1.0 / counts.len() as f64; counts.len()]
        }
    }
}

/// Model parameters exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportedClassifier {
    RandomForest {
        classes: Vec<RiskLabel>,
        n_features: usize,
        trees: Vec<ExportedTree>,
    },
    LogisticRegression {
        classes: Vec<RiskLabel>,
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
}

impl ExportedClassifier {
    /// Parse a model artifact and check its internal consistency.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidModel` if the JSON is malformed or the
    /// parameters are inconsistent.
    pub fn from_json(content: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(content)
            .map_err(|e| ModelError::InvalidModel(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    /// Human readable model kind, for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RandomForest { .. } => "random_forest",
            Self::LogisticRegression { .. } => "logistic_regression",
        }
    }

    /// Check structural invariants of the exported parameters.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidModel` describing the first violation.
    pub fn validate(&self) -> Result<(), ModelError> {
        let classes = self.classes();
        if classes.len() < 2 {
            return Err(ModelError::InvalidModel(
                "model must have at least two classes".into(),
            ));
        }
        for (i, c) in classes.iter().enumerate() {
            if classes[..i].contains(c) {
                return Err(ModelError::InvalidModel(format!("duplicate class {c}")));
            }
        }

        match self {
            Self::RandomForest {
                n_features, trees, ..
            } => {
                if *n_features == 0 {
                    return Err(ModelError::InvalidModel("n_features must be > 0".into()));
                }
                if trees.is_empty() {
                    return Err(ModelError::InvalidModel("forest has no trees".into()));
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(*n_features, classes.len()).map_err(|e| {
                        ModelError::InvalidModel(format!("tree {i}: {e}"))
                    })?;
                }
            }
            Self::LogisticRegression {
                coef, intercept, ..
            } => {
                if coef.len() != classes.len() || intercept.len() != classes.len() {
                    return Err(ModelError::InvalidModel(
                        "coef and intercept need one entry per class".into(),
                    ));
                }
                let width = coef[0].len();
                if width == 0 || coef.iter().any(|row| row.len() != width) {
                    return Err(ModelError::InvalidModel(
                        "coefficient rows must share a non-zero width".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

impl Classifier for ExportedClassifier {
    fn classes(&self) -> &[RiskLabel] {
        match self {
            Self::RandomForest { classes, .. } | Self::LogisticRegression { classes, .. } => {
                classes
            }
        }
    }

    fn n_features(&self) -> usize {
        match self {
            Self::RandomForest { n_features, .. } => *n_features,
            Self::LogisticRegression { coef, .. } => coef.first().map_or(0, Vec::len),
        }
    }

    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_width(self.n_features(), row)?;

        match self {
            Self::RandomForest { classes, trees, .. } => {
                let mut acc = vec![0.0; classes.len()];
                for tree in trees {
                    for (a, p) in acc.iter_mut().zip(tree.leaf_proba(row)) {
                        *a += p;
                    }
                }
                let n = trees.len() as f64;
                Ok(acc.into_iter().map(|a| a / n).collect())
            }
            Self::LogisticRegression {
                coef, intercept, ..
            } => {
                let logits: Vec<f64> = coef
                    .iter()
                    .zip(intercept)
                    .map(|(w, b)| w.iter().zip(row).map(|(wi, xi)| wi * xi).sum::<f64>() + b)
                    .collect();
                Ok(softmax(&logits))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump_forest() -> ExportedClassifier {
        // One split on feature 0 at 0.5, classes High / Low.
        ExportedClassifier::RandomForest {
            classes: vec![RiskLabel::High, RiskLabel::Low],
            n_features: 2,
            trees: vec![
                ExportedTree {
                    children_left: vec![1, -1, -1],
                    children_right: vec![2, -1, -1],
                    feature: vec![0, -2, -2],
                    threshold: vec![0.5, -2.0, -2.0],
                    value: vec![vec![10.0, 10.0], vec![1.0, 9.0], vec![8.0, 2.0]],
                },
                ExportedTree {
                    children_left: vec![-1],
                    children_right: vec![-1],
                    feature: vec![-2],
                    threshold: vec![-2.0],
                    value: vec![vec![1.0, 1.0]],
                },
            ],
        }
    }

    #[test]
    fn test_forest_averages_leaf_distributions() {
        let model = stump_forest();
        model.validate().expect("valid forest");

        let proba = model.predict_proba(&[0.0, 3.0]).expect("predict");
        assert!((proba[0] - 0.3).abs() < 1e-12);
        assert!((proba[1] - 0.7).abs() < 1e-12);
        assert_eq!(model.predict(&[0.0, 3.0]), Ok(RiskLabel::Low));

        // Threshold is inclusive on the left branch.
        let at_threshold = model.predict_proba(&[0.5, 0.0]).expect("predict");
        assert!((at_threshold[1] - 0.7).abs() < 1e-12);

        assert_eq!(model.predict(&[1.0, 0.0]), Ok(RiskLabel::High));
    }

    #[test]
    fn test_logistic_softmax() {
        let model = ExportedClassifier::LogisticRegression {
            classes: vec![RiskLabel::High, RiskLabel::Low, RiskLabel::Moderate],
            coef: vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 0.0]],
            intercept: vec![0.0, 0.0, 0.0],
        };
        model.validate().expect("valid logistic model");

        let proba = model.predict_proba(&[0.0, 0.0]).expect("predict");
        for p in &proba {
            assert!((p - 1.0 / 3.0).abs() < 1e-12);
        }

        let proba = model.predict_proba(&[0.0, 5.0]).expect("predict");
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(model.predict(&[0.0, 5.0]), Ok(RiskLabel::Low));
    }

    #[test]
    fn test_from_json_rejects_unknown_label() {
        let json = r#"{"kind":"logistic_regression","classes":["High","Severe"],
            "coef":[[1.0],[0.0]],"intercept":[0.0,0.0]}"#;
        assert!(ExportedClassifier::from_json(json).is_err());
    }

    #[test]
    fn test_from_json_roundtrip_tagged() {
        let json = serde_json::to_string(&stump_forest()).expect("serialize");
        assert!(json.contains("\"kind\":\"random_forest\""));
        let parsed = ExportedClassifier::from_json(&json).expect("parse");
        assert_eq!(parsed.n_features(), 2);
        assert_eq!(parsed.kind(), "random_forest");
    }

    #[test]
    fn test_validate_rejects_bad_tree() {
        let mut model = stump_forest();
        if let ExportedClassifier::RandomForest { trees, .. } = &mut model {
            trees[0].feature[0] = 7;
        }
        assert!(model.validate().is_err());

        let mut model = stump_forest();
        if let ExportedClassifier::RandomForest { trees, .. } = &mut model {
            trees[0].children_left[0] = 0;
        }
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_width_checked_before_traversal() {
        let model = stump_forest();
        assert_eq!(
            model.predict_proba(&[1.0]),
            Err(ModelError::ShapeMismatch {
                expected: 2,
                got: 1
            })
        );
    }
}
