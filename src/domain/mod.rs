//! Domain layer: Core business types and logic.
//!
//! This module contains the disorder catalog, the questionnaire, the
//! feature encoder and the prediction result types. Nothing here touches the
//! filesystem or the terminal.

pub mod catalog;
pub mod features;
mod prediction;
pub mod questionnaire;

pub use catalog::{DiseaseCatalog, DisorderEntry, InheritanceType};
pub use features::{encode, EncodedFeatureVector};
pub use prediction::{Assessment, PredictionResult, RiskLabel};
pub use questionnaire::{
    BirthDefects, Choice, FolicAcid, Gender, Grandparent, PregnancyHistory,
    QuestionnaireResponse, YesNo,
};
