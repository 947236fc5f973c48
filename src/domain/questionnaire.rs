//! Family and pregnancy history questionnaire.
//!
//! Field names and categorical values match the column names the risk model
//! was trained on, so the raw record can be dummy-encoded directly.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Column names of the raw record, in training order.
pub mod columns {
    pub const MOTHER_AGE: &str = "Mother's age";
    pub const FATHER_AGE: &str = "Father's age";
    pub const BIRTH_DEFECTS: &str = "Birth defects";
    pub const GENDER: &str = "Gender";
    pub const MATERNAL_SIDE: &str = "Genes in mother's side";
    pub const INHERITED_FROM_FATHER: &str = "Inherited from father";
    pub const MATERNAL_GENE: &str = "Maternal gene";
    pub const PATERNAL_GENE: &str = "Paternal gene";
    pub const FOLIC_ACID: &str = "Folic acid details (peri-conceptional)";
    pub const MATERNAL_ILLNESS: &str = "H/O serious maternal illness";
    pub const RADIATION_EXPOSURE: &str = "H/O radiation exposure (x-ray)";
    pub const SUBSTANCE_ABUSE: &str = "H/O substance abuse";
    pub const ASSISTED_CONCEPTION: &str = "Assisted conception IVF/ART";
    pub const PREVIOUS_ANOMALIES: &str = "History of anomalies in previous pregnancies";
    pub const PREVIOUS_ABORTIONS: &str = "No. of previous abortion";
}

/// Default parental ages used when the form is first opened.
pub const DEFAULT_MOTHER_AGE: f64 = 30.0;
pub const DEFAULT_FATHER_AGE: f64 = 32.0;

/// Upper bound of the previous-abortion slider.
pub const MAX_PREVIOUS_ABORTIONS: u8 = 5;

/// Common behaviour of the fixed-choice answers.
pub trait Choice: Copy + Eq + 'static {
    /// Options in the order the form presents them.
    const OPTIONS: &'static [Self];

    /// Value as it appears in the training data.
    fn as_str(&self) -> &'static str;
}

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl Choice for $name {
            const OPTIONS: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum!(
    /// Plain yes/no answer.
    YesNo { Yes => "Yes", No => "No" }
);

choice_enum!(
    /// Observed birth defects.
    BirthDefects { No => "No", Yes => "Yes", Singular => "Singular", Multiple => "Multiple" }
);

choice_enum!(
    /// Gender of the child.
    Gender { Male => "Male", Female => "Female", Unknown => "Unknown" }
);

choice_enum!(
    /// Folic acid intake around conception.
    FolicAcid { Yes => "Yes", No => "No", NotSure => "Not Sure" }
);

choice_enum!(
    /// Grandparent known to have the disorder.
    Grandparent {
        MaternalGrandmother => "Maternal Grandmother",
        MaternalGrandfather => "Maternal Grandfather",
        PaternalGrandmother => "Paternal Grandmother",
        PaternalGrandfather => "Paternal Grandfather",
    }
);

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// History flags for the current and previous pregnancies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PregnancyHistory {
    pub serious_maternal_illness: YesNo,
    pub radiation_exposure: YesNo,
    pub substance_abuse: YesNo,
    pub assisted_conception: YesNo,
    pub previous_anomalies: YesNo,
}

impl PregnancyHistory {
    /// Every flag answered "No".
    #[must_use]
    pub fn none() -> Self {
        Self {
            serious_maternal_illness: YesNo::No,
            radiation_exposure: YesNo::No,
            substance_abuse: YesNo::No,
            assisted_conception: YesNo::No,
            previous_anomalies: YesNo::No,
        }
    }
}

/// One completed questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireResponse {
    pub mother_age: f64,
    pub father_age: f64,
    pub birth_defects: BirthDefects,
    pub gender: Gender,
    pub grandparents: BTreeSet<Grandparent>,
    pub mother_affected: YesNo,
    pub father_affected: YesNo,
    pub folic_acid: FolicAcid,
    pub pregnancy: PregnancyHistory,
    pub previous_abortions: u8,
}

/// A raw record value before indicator expansion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Numeric(f64),
    Categorical(&'static str),
}

/// Flat field-name → value mapping handed to the encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    fields: Vec<(&'static str, FieldValue)>,
}

impl RawRecord {
    /// Fields in training column order.
    #[must_use]
    pub fn fields(&self) -> &[(&'static str, FieldValue)] {
        &self.fields
    }

    /// Value of one field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| *value)
    }
}

impl Default for QuestionnaireResponse {
    fn default() -> Self {
        Self {
            mother_age: DEFAULT_MOTHER_AGE,
            father_age: DEFAULT_FATHER_AGE,
            birth_defects: BirthDefects::No,
            gender: Gender::Male,
            grandparents: BTreeSet::new(),
            mother_affected: YesNo::No,
            father_affected: YesNo::No,
            folic_acid: FolicAcid::No,
            pregnancy: PregnancyHistory::none(),
            previous_abortions: 0,
        }
    }
}

impl QuestionnaireResponse {
    /// "Genes in mother's side": either maternal grandparent affected.
    #[must_use]
    pub fn genes_in_mothers_side(&self) -> YesNo {
        YesNo::from(
            self.grandparents.contains(&Grandparent::MaternalGrandmother)
                || self.grandparents.contains(&Grandparent::MaternalGrandfather),
        )
    }

    /// "Inherited from father": only the paternal grandfather counts.
    ///
    /// The paternal grandmother does not count. The trained model was fitted
    /// on this asymmetric rule, so changing it needs a retrained model.
    #[must_use]
    pub fn inherited_from_father(&self) -> YesNo {
        YesNo::from(self.grandparents.contains(&Grandparent::PaternalGrandfather))
    }

    /// Flatten the response into model column names and raw values.
    #[must_use]
    pub fn to_record(&self) -> RawRecord {
        use columns::*;
        use FieldValue::{Categorical, Numeric};

        RawRecord {
            fields: vec![
                (MOTHER_AGE, Numeric(self.mother_age)),
                (FATHER_AGE, Numeric(self.father_age)),
                (BIRTH_DEFECTS, Categorical(self.birth_defects.as_str())),
                (GENDER, Categorical(self.gender.as_str())),
                (MATERNAL_SIDE, Categorical(self.genes_in_mothers_side().as_str())),
                (
                    INHERITED_FROM_FATHER,
                    Categorical(self.inherited_from_father().as_str()),
                ),
                (MATERNAL_GENE, Categorical(self.mother_affected.as_str())),
                (PATERNAL_GENE, Categorical(self.father_affected.as_str())),
                (FOLIC_ACID, Categorical(self.folic_acid.as_str())),
                (
                    MATERNAL_ILLNESS,
                    Categorical(self.pregnancy.serious_maternal_illness.as_str()),
                ),
                (
                    RADIATION_EXPOSURE,
                    Categorical(self.pregnancy.radiation_exposure.as_str()),
                ),
                (
                    SUBSTANCE_ABUSE,
                    Categorical(self.pregnancy.substance_abuse.as_str()),
                ),
                (
                    ASSISTED_CONCEPTION,
                    Categorical(self.pregnancy.assisted_conception.as_str()),
                ),
                (
                    PREVIOUS_ANOMALIES,
                    Categorical(self.pregnancy.previous_anomalies.as_str()),
                ),
                (PREVIOUS_ABORTIONS, Numeric(f64::from(self.previous_abortions))),
            ],
        }
    }

    /// Validate that numeric answers are within accepted ranges.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(15.0..=60.0).contains(&self.mother_age) {
            errors.push(format!("Mother's age {} out of range [15, 60]", self.mother_age));
        }
        if !(15.0..=90.0).contains(&self.father_age) {
            errors.push(format!("Father's age {} out of range [15, 90]", self.father_age));
        }
        if self.previous_abortions > MAX_PREVIOUS_ABORTIONS {
            errors.push(format!(
                "Previous abortions {} out of range [0, {}]",
                self.previous_abortions, MAX_PREVIOUS_ABORTIONS
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
