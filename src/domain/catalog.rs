//! Static catalog of genetic disorders.
//!
//! Each disorder belongs to one inheritance category and carries its
//! transmission mode and a short list of common symptoms shown next to the
//! questionnaire.

use serde::Serialize;

/// Genetic transmission mode of a disorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InheritanceType {
    AutosomalDominant,
    AutosomalRecessive,
    XLinkedRecessive,
    Mitochondrial,
}

impl InheritanceType {
    /// All inheritance modes, in catalog order.
    pub const ALL: [InheritanceType; 4] = [
        Self::AutosomalDominant,
        Self::AutosomalRecessive,
        Self::XLinkedRecessive,
        Self::Mitochondrial,
    ];
}

impl std::fmt::Display for InheritanceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AutosomalDominant => write!(f, "Autosomal Dominant"),
            Self::AutosomalRecessive => write!(f, "Autosomal Recessive"),
            Self::XLinkedRecessive => write!(f, "X-linked Recessive"),
            Self::Mitochondrial => write!(f, "Mitochondrial"),
        }
    }
}

/// One disorder record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisorderEntry {
    pub category: &'static str,
    pub name: &'static str,
    pub inheritance: InheritanceType,
    pub symptoms: &'static [&'static str],
}

/// A named group of disorders sharing an inheritance pattern.
#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub name: &'static str,
    pub disorders: &'static [DisorderEntry],
}

macro_rules! disorder {
    ($category:expr, $name:expr, $inheritance:ident, [$($symptom:expr),+ $(,)?]) => {
        DisorderEntry {
            category: $category,
            name: $name,
            inheritance: InheritanceType::$inheritance,
            symptoms: &[$($symptom),+],
        }
    };
}

const DOMINANT: &str = "Autosomal Dominant Disorders";
const RECESSIVE: &str = "Autosomal Recessive Disorders";
const X_LINKED: &str = "X-linked Recessive Disorders";
const MITOCHONDRIAL: &str = "Mitochondrial Inheritance";

static CATALOG: [Category; 4] = [
    Category {
        name: DOMINANT,
        disorders: &[
            disorder!(DOMINANT, "Huntington’s Disease", AutosomalDominant, [
                "Involuntary movements",
                "Cognitive decline",
                "Mood swings",
            ]),
            disorder!(DOMINANT, "Marfan Syndrome", AutosomalDominant, [
                "Tall stature",
                "Long limbs",
                "Heart defects",
            ]),
            disorder!(DOMINANT, "Achondroplasia", AutosomalDominant, [
                "Short limbs",
                "Large head",
                "Frequent ear infections",
            ]),
            disorder!(DOMINANT, "Familial Hypercholesterolemia", AutosomalDominant, [
                "High LDL",
                "Xanthomas",
                "Early heart disease",
            ]),
            disorder!(DOMINANT, "Neurofibromatosis Type 1 (NF1)", AutosomalDominant, [
                "Skin spots",
                "Neurofibromas",
                "Learning difficulties",
            ]),
            disorder!(DOMINANT, "Polycystic Kidney Disease (Adult Type)", AutosomalDominant, [
                "High blood pressure",
                "Kidney cysts",
                "Flank pain",
            ]),
        ],
    },
    Category {
        name: RECESSIVE,
        disorders: &[
            disorder!(RECESSIVE, "Cystic Fibrosis", AutosomalRecessive, [
                "Cough",
                "Respiratory infections",
                "Salty skin",
            ]),
            disorder!(RECESSIVE, "Sickle Cell Anemia", AutosomalRecessive, [
                "Anemia",
                "Pain crises",
                "Swelling",
            ]),
            disorder!(RECESSIVE, "Tay-Sachs Disease", AutosomalRecessive, [
                "Muscle weakness",
                "Seizures",
                "Vision loss",
            ]),
            disorder!(RECESSIVE, "Phenylketonuria (PKU)", AutosomalRecessive, [
                "Intellectual disability",
                "Musty odor",
                "Skin rashes",
            ]),
            disorder!(RECESSIVE, "Thalassemia", AutosomalRecessive, [
                "Fatigue",
                "Pale skin",
                "Enlarged spleen",
            ]),
            disorder!(RECESSIVE, "Gaucher’s Disease", AutosomalRecessive, [
                "Bone pain",
                "Anemia",
                "Enlarged liver",
            ]),
        ],
    },
    Category {
        name: X_LINKED,
        disorders: &[
            disorder!(X_LINKED, "Hemophilia A and B", XLinkedRecessive, [
                "Bleeding",
                "Joint pain",
                "Bruising",
            ]),
            disorder!(X_LINKED, "Duchenne Muscular Dystrophy", XLinkedRecessive, [
                "Muscle weakness",
                "Gait abnormality",
                "Enlarged calves",
            ]),
            disorder!(X_LINKED, "Color Blindness (Red-Green)", XLinkedRecessive, [
                "Color vision issues",
                "Difficulty distinguishing red & green",
            ]),
            disorder!(X_LINKED, "Fragile X Syndrome", XLinkedRecessive, [
                "Learning disabilities",
                "Long face",
                "Hyperactivity",
            ]),
            disorder!(X_LINKED, "G6PD Deficiency", XLinkedRecessive, [
                "Fatigue",
                "Jaundice",
                "Dark urine",
            ]),
        ],
    },
    Category {
        name: MITOCHONDRIAL,
        disorders: &[
            disorder!(MITOCHONDRIAL, "Leber’s Hereditary Optic Neuropathy (LHON)", Mitochondrial, [
                "Vision loss",
                "Eye pain",
                "Central vision issues",
            ]),
            disorder!(MITOCHONDRIAL, "Mitochondrial Myopathy", Mitochondrial, [
                "Muscle weakness",
                "Fatigue",
                "Exercise intolerance",
            ]),
            disorder!(MITOCHONDRIAL, "MELAS Syndrome", Mitochondrial, [
                "Seizures",
                "Stroke-like episodes",
                "Lactic acidosis",
            ]),
        ],
    },
];

/// Read-only view over the built-in disorder table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiseaseCatalog;

impl DiseaseCatalog {
    /// All categories, in display order.
    #[must_use]
    pub fn categories(&self) -> &'static [Category] {
        &CATALOG
    }

    /// Category names, in display order.
    pub fn category_names(&self) -> impl Iterator<Item = &'static str> {
        CATALOG.iter().map(|c| c.name)
    }

    /// Disorders listed under `category`; empty if the category is unknown.
    #[must_use]
    pub fn disorders(&self, category: &str) -> &'static [DisorderEntry] {
        CATALOG
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.disorders)
            .unwrap_or(&[])
    }

    /// Find one disorder by category and name.
    #[must_use]
    pub fn entry(&self, category: &str, name: &str) -> Option<&'static DisorderEntry> {
        self.disorders(category).iter().find(|d| d.name == name)
    }

    /// Inheritance pattern and symptoms of a disorder.
    ///
    /// The form only ever asks for keys it has just listed, so `None` means
    /// the caller built the key by hand.
    #[must_use]
    pub fn lookup(
        &self,
        category: &str,
        name: &str,
    ) -> Option<(InheritanceType, &'static [&'static str])> {
        self.entry(category, name)
            .map(|d| (d.inheritance, d.symptoms))
    }
}
