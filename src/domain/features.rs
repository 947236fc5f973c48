//! One-hot encoding of questionnaire records.
//!
//! Mirrors dummy encoding followed by a reindex against the model's column
//! list: numeric fields keep their column, each categorical field turns into
//! a single `"{field}_{value}"` indicator, then the row is projected onto the
//! known columns with zero fill.

use std::collections::HashMap;

use super::questionnaire::{FieldValue, QuestionnaireResponse, RawRecord};

/// A model input row aligned to a fixed column list.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFeatureVector<'a> {
    columns: &'a [String],
    values: Vec<f64>,
}

impl<'a> EncodedFeatureVector<'a> {
    /// Column names, identical to the list the vector was encoded against.
    #[must_use]
    pub fn columns(&self) -> &'a [String] {
        self.columns
    }

    /// Row values in column order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }
}

/// Indicator column name for a categorical value.
#[must_use]
pub fn indicator_column(field: &str, value: &str) -> String {
    format!("{field}_{value}")
}

/// Expand a raw record into generated columns.
///
/// Only the indicator of the observed value is produced; absent indicators
/// are implicitly zero.
#[must_use]
pub fn expand_indicators(record: &RawRecord) -> HashMap<String, f64> {
    record
        .fields()
        .iter()
        .map(|(field, value)| match value {
            FieldValue::Numeric(v) => ((*field).to_string(), *v),
            FieldValue::Categorical(v) => (indicator_column(field, v), 1.0),
        })
        .collect()
}

/// Encode a response against the model's known columns.
///
/// Never fails. Generated columns unknown to the model are dropped and
/// known columns that were not generated are zero.
#[must_use]
pub fn encode<'a>(
    response: &QuestionnaireResponse,
    known_columns: &'a [String],
) -> EncodedFeatureVector<'a> {
    let generated = expand_indicators(&response.to_record());

    let values: Vec<f64> = known_columns
        .iter()
        .map(|c| generated.get(c.as_str()).copied().unwrap_or(0.0))
        .collect();

    let dropped = generated
        .keys()
        .filter(|k| !known_columns.iter().any(|c| c == *k))
        .count();
    if dropped > 0 {
        // Column names reveal answers; only the count is logged.
        tracing::debug!("{} generated column(s) not known to the model", dropped);
    }

    EncodedFeatureVector {
        columns: known_columns,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::questionnaire::{
        columns, BirthDefects, Choice, FolicAcid, Gender, Grandparent, YesNo,
    };

    fn known(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn test_numeric_and_indicator_columns() {
        let response = QuestionnaireResponse {
            mother_age: 41.0,
            mother_affected: YesNo::Yes,
            previous_abortions: 3,
            ..Default::default()
        };
        let cols = known(&[
            columns::PREVIOUS_ABORTIONS,
            "Maternal gene_Yes",
            "Maternal gene_No",
            columns::MOTHER_AGE,
        ]);

        let vector = encode(&response, &cols);
        assert_eq!(vector.values(), &[3.0, 1.0, 0.0, 41.0]);
    }

    #[test]
    fn test_columns_match_known_list_exactly() {
        let cols = known(&[
            "Zeta",
            "Gender_Female",
            columns::FATHER_AGE,
            "Birth defects_Multiple",
            "Gender_Male",
        ]);

        let responses = [
            QuestionnaireResponse::default(),
            QuestionnaireResponse {
                gender: Gender::Female,
                birth_defects: BirthDefects::Multiple,
                grandparents: Grandparent::OPTIONS.iter().copied().collect(),
                ..Default::default()
            },
        ];

        for response in &responses {
            let vector = encode(response, &cols);
            assert_eq!(vector.columns(), cols.as_slice());
            assert_eq!(vector.len(), cols.len());
            assert_eq!(vector.get("Zeta"), Some(0.0));
        }
    }

    #[test]
    fn test_unseen_values_are_silently_lost() {
        // A model trained without "Not Sure" or "Unknown" has no column for them.
        let cols = known(&[
            "Folic acid details (peri-conceptional)_No",
            "Folic acid details (peri-conceptional)_Yes",
            "Gender_Female",
            "Gender_Male",
        ]);
        let response = QuestionnaireResponse {
            folic_acid: FolicAcid::NotSure,
            gender: Gender::Unknown,
            ..Default::default()
        };

        let vector = encode(&response, &cols);
        assert!(vector.values().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_empty_known_columns() {
        let vector = encode(&QuestionnaireResponse::default(), &[]);
        assert!(vector.is_empty());
    }

    #[test]
    fn test_expand_indicators_derived_flags() {
        let response = QuestionnaireResponse {
            grandparents: [Grandparent::PaternalGrandmother].into_iter().collect(),
            ..Default::default()
        };
        let generated = expand_indicators(&response.to_record());

        assert_eq!(generated.get("Inherited from father_No"), Some(&1.0));
        assert!(!generated.contains_key("Inherited from father_Yes"));
        assert_eq!(generated.get("Genes in mother's side_No"), Some(&1.0));
        assert_eq!(generated.len(), 15);
    }
}
