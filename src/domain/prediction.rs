//! Prediction result types.
//!
//! Represents the output of the genetic risk classifier and the advice shown
//! for each risk level.

use serde::{Deserialize, Serialize};

use super::catalog::DisorderEntry;

/// Risk level predicted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum RiskLabel {
    /// Low inherited risk
    Low,
    /// Moderate risk, surveillance recommended
    Moderate,
    /// High risk, counselling advised
    High,
}

impl RiskLabel {
    /// Recommended next steps for this risk level.
    #[must_use]
    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::High => {
                "Consult a genetic counselor immediately. Early screening and prenatal tests advised."
            }
            Self::Moderate => "Genetic consultation recommended. Maintain medical surveillance.",
            Self::Low => "Low risk. Maintain regular check-ups and a healthy lifestyle.",
        }
    }

    /// Class label as stored in the model artifact.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

impl std::str::FromStr for RiskLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "moderate" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            other => Err(format!("unknown risk label {other:?}")),
        }
    }
}

impl TryFrom<String> for RiskLabel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Classifier output for one questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted class
    pub label: RiskLabel,

    /// Highest class probability, as a percentage (0 to 100)
    pub confidence: f64,

    /// Probability of every class, in model class order
    pub probabilities: Vec<(RiskLabel, f64)>,
}

impl PredictionResult {
    /// Build a result from the predicted label and class distribution.
    ///
    /// Confidence is the largest probability scaled to a percentage.
    #[must_use]
    pub fn new(label: RiskLabel, probabilities: Vec<(RiskLabel, f64)>) -> Self {
        let max = probabilities
            .iter()
            .map(|(_, p)| *p)
            .fold(0.0_f64, f64::max);
        Self {
            label,
            confidence: (max * 100.0).clamp(0.0, 100.0),
            probabilities,
        }
    }

    /// Probability assigned to one class, if the model knows it.
    #[must_use]
    pub fn probability_of(&self, label: RiskLabel) -> Option<f64> {
        self.probabilities
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, p)| *p)
    }
}

/// A displayed assessment: which disorder was asked about and what came out.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub disorder: &'static DisorderEntry,
    pub result: PredictionResult,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    #[must_use]
    pub fn new(disorder: &'static DisorderEntry, result: PredictionResult) -> Self {
        Self {
            disorder,
            result,
            created_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_max_probability() {
        let result = PredictionResult::new(
            RiskLabel::Moderate,
            vec![
                (RiskLabel::High, 0.2),
                (RiskLabel::Low, 0.25),
                (RiskLabel::Moderate, 0.55),
            ],
        );
        assert!((result.confidence - 55.0).abs() < 1e-9);
        assert_eq!(result.probability_of(RiskLabel::Low), Some(0.25));
    }

    #[test]
    fn test_confidence_bounds() {
        let empty = PredictionResult::new(RiskLabel::Low, Vec::new());
        assert_eq!(empty.confidence, 0.0);

        let certain = PredictionResult::new(RiskLabel::High, vec![(RiskLabel::High, 1.0)]);
        assert!((certain.confidence - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_recommendations_are_distinct() {
        let all = [RiskLabel::Low, RiskLabel::Moderate, RiskLabel::High];
        for a in all {
            for b in all {
                if a != b {
                    assert_ne!(a.recommendation(), b.recommendation());
                }
            }
        }
        assert!(RiskLabel::High.recommendation().starts_with("Consult a genetic counselor"));
    }

    #[test]
    fn test_parse_label() {
        assert_eq!("High".parse::<RiskLabel>(), Ok(RiskLabel::High));
        assert_eq!(" moderate ".parse::<RiskLabel>(), Ok(RiskLabel::Moderate));
        assert!("Severe".parse::<RiskLabel>().is_err());
        assert_eq!(RiskLabel::Low.as_str().parse::<RiskLabel>(), Ok(RiskLabel::Low));
    }
}
