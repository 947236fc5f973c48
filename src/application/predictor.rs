//! Predictor service: Orchestrates encoding and classification.
//!
//! This service coordinates:
//! - Questionnaire validation
//! - One-hot encoding against the model's column list
//! - Label and probability inference
//! - Confidence computation

use std::sync::Arc;

use crate::adapters::ExportedClassifier;
use crate::domain::{encode, PredictionResult, QuestionnaireResponse};
use crate::ports::Classifier;
use crate::GenriskError;

use super::ModelContext;

/// Service for running risk predictions against a loaded model.
pub struct PredictorService<C = ExportedClassifier>
where
    C: Classifier,
{
    context: Arc<ModelContext<C>>,
}

impl<C> Clone for PredictorService<C>
where
    C: Classifier,
{
    fn clone(&self) -> Self {
        Self {
            context: Arc::clone(&self.context),
        }
    }
}

impl<C> PredictorService<C>
where
    C: Classifier,
{
    /// Create a new predictor service.
    pub fn new(context: Arc<ModelContext<C>>) -> Self {
        Self { context }
    }

    #[must_use]
    pub fn context(&self) -> &ModelContext<C> {
        &self.context
    }

    /// Run the full prediction pipeline on one questionnaire.
    ///
    /// Performs:
    /// 1. Validate numeric answers
    /// 2. Encode against the known columns
    /// 3. Predict label and class probabilities
    ///
    /// # Errors
    /// Returns `GenriskError::Validation` for out-of-range answers and
    /// `GenriskError::Model` if the classifier rejects the row.
    pub fn predict(&self, response: &QuestionnaireResponse) -> Result<PredictionResult, GenriskError> {
        response
            .validate()
            .map_err(|errors| GenriskError::Validation(errors.join(", ")))?;

        let vector = encode(response, self.context.known_columns());
        tracing::debug!("Encoded questionnaire into {} features", vector.len());

        let classifier = self.context.classifier();
        let label = classifier.predict(vector.values())?;
        let proba = classifier.predict_proba(vector.values())?;

        let probabilities = classifier
            .classes()
            .iter()
            .copied()
            .zip(proba)
            .collect();
        let result = PredictionResult::new(label, probabilities);

        tracing::info!(
            "Prediction complete: label={}, confidence={:.2}%",
            result.label,
            result.confidence
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::IntegrityPolicy;
    use crate::domain::{
        DiseaseCatalog, FolicAcid, Gender, Grandparent, PregnancyHistory, RiskLabel, YesNo,
    };
    use crate::ports::{check_width, ModelError};
    use std::path::Path;

    #[derive(Debug)]
    struct Uniform {
        width: usize,
    }

    impl Classifier for Uniform {
        fn classes(&self) -> &[RiskLabel] {
            &[RiskLabel::High, RiskLabel::Low, RiskLabel::Moderate]
        }

        fn n_features(&self) -> usize {
            self.width
        }

        fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
            check_width(self.width, row)?;
            Ok(vec![0.25, 0.25, 0.5])
        }
    }

    fn shipped_service() -> PredictorService {
        let context = ModelContext::load(Path::new("models"), &IntegrityPolicy::default())
            .expect("Shipped artifacts should load");
        PredictorService::new(Arc::new(context))
    }

    fn canonical_response() -> QuestionnaireResponse {
        QuestionnaireResponse::default()
    }

    #[test]
    fn test_context_rejects_width_mismatch() {
        let err = ModelContext::new(Uniform { width: 3 }, vec!["a".into(), "b".into()])
            .expect_err("width mismatch");
        assert_eq!(
            err,
            ModelError::ShapeMismatch {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn test_confidence_from_stub() {
        let context = ModelContext::new(Uniform { width: 2 }, vec!["x".into(), "y".into()])
            .expect("valid context");
        let service = PredictorService::new(Arc::new(context));

        let result = service.predict(&canonical_response()).expect("predict");
        assert_eq!(result.label, RiskLabel::Moderate);
        assert!((result.confidence - 50.0).abs() < 1e-9);
        assert_eq!(result.probabilities.len(), 3);
    }

    #[test]
    fn test_invalid_response_is_not_sent_to_model() {
        let context = ModelContext::new(Uniform { width: 1 }, vec!["x".into()])
            .expect("valid context");
        let service = PredictorService::new(Arc::new(context));

        let response = QuestionnaireResponse {
            previous_abortions: 9,
            ..Default::default()
        };
        assert!(matches!(
            service.predict(&response),
            Err(GenriskError::Validation(_))
        ));
    }

    #[test]
    fn test_shipped_columns_align_with_model() {
        let service = shipped_service();
        let context = service.context();
        assert_eq!(
            context.known_columns().len(),
            context.classifier().n_features()
        );

        let vector = encode(&canonical_response(), context.known_columns());
        assert_eq!(vector.columns(), context.known_columns());
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let service = shipped_service();
        let first = service.predict(&canonical_response()).expect("predict");
        for _ in 0..5 {
            let again = service.predict(&canonical_response()).expect("predict");
            assert_eq!(again.label, first.label);
            assert_eq!(again.probabilities, first.probabilities);
        }
    }

    #[test]
    fn test_confidence_matches_max_probability() {
        let service = shipped_service();
        let responses = [
            canonical_response(),
            QuestionnaireResponse {
                mother_affected: YesNo::Yes,
                father_affected: YesNo::Yes,
                grandparents: [Grandparent::PaternalGrandfather].into_iter().collect(),
                previous_abortions: 4,
                mother_age: 44.0,
                ..Default::default()
            },
        ];

        for response in &responses {
            let result = service.predict(response).expect("predict");
            let max = result
                .probabilities
                .iter()
                .map(|(_, p)| *p)
                .fold(f64::MIN, f64::max);
            assert!((0.0..=100.0).contains(&result.confidence));
            assert!((result.confidence - max * 100.0).abs() < 1e-9);
            assert_eq!(result.probability_of(result.label), Some(max));
        }
    }

    #[test]
    fn test_cystic_fibrosis_scenario() {
        let disorder = DiseaseCatalog
            .entry("Autosomal Recessive Disorders", "Cystic Fibrosis")
            .expect("disorder exists");
        assert_eq!(disorder.symptoms.len(), 3);

        let response = QuestionnaireResponse {
            mother_affected: YesNo::No,
            father_affected: YesNo::No,
            grandparents: Default::default(),
            gender: Gender::Male,
            birth_defects: crate::domain::BirthDefects::No,
            folic_acid: FolicAcid::Yes,
            pregnancy: PregnancyHistory::none(),
            previous_abortions: 0,
            ..Default::default()
        };

        let service = shipped_service();
        let result = service.predict(&response).expect("predict");

        assert_eq!(result.label, RiskLabel::Low);
        assert!((result.confidence - 75.0).abs() < 1e-9);
        assert_eq!(
            result.label.recommendation(),
            "Low risk. Maintain regular check-ups and a healthy lifestyle."
        );
    }

    #[test]
    fn test_family_history_raises_risk() {
        let response = QuestionnaireResponse {
            mother_affected: YesNo::Yes,
            father_affected: YesNo::Yes,
            grandparents: [Grandparent::MaternalGrandmother].into_iter().collect(),
            ..Default::default()
        };

        let result = shipped_service().predict(&response).expect("predict");
        assert_eq!(result.label, RiskLabel::High);
        assert!(result.label.recommendation().contains("genetic counselor"));
    }
}
