//! Feature schema and label lookup
//!
//! The column layout the pipeline is trained on and served with, plus the
//! mapping from stress codes to display text. Both are plain values so tests
//! can swap in fixtures.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of a feature column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Integer rating, standardized before the classifier
    Numeric,
    /// Free-text category, one-hot encoded before the classifier
    Categorical,
}

/// Inclusive bounds for an integer-scale feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericBounds {
    pub min: i64,
    pub max: i64,
}

impl NumericBounds {
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// A single feature column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    pub kind: FeatureKind,
    pub bounds: Option<NumericBounds>,
}

impl FeatureSpec {
    pub fn numeric(name: impl Into<String>, bounds: Option<NumericBounds>) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Numeric,
            bounds,
        }
    }

    pub fn categorical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Categorical,
            bounds: None,
        }
    }
}

/// Ordered feature layout plus the raw-to-internal column renames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// Features in request/row order
    pub features: Vec<FeatureSpec>,
    /// Raw CSV header -> internal column name
    pub renames: Vec<(String, String)>,
    /// Label column (after renaming)
    pub target: String,
}

impl FeatureSchema {
    /// The survey layout the stress model is built on.
    pub fn stress_survey() -> Self {
        let scale = Some(NumericBounds { min: 1, max: 5 });
        Self {
            features: vec![
                FeatureSpec::categorical("acadmic_stage"),
                FeatureSpec::numeric("Peer pressure", scale),
                FeatureSpec::numeric("Academic pressure from your home", scale),
                FeatureSpec::categorical("Study Environment"),
                FeatureSpec::categorical("strategy_used"),
                FeatureSpec::categorical("bad_habbits"),
                FeatureSpec::numeric("academic_competation", scale),
            ],
            renames: vec![
                ("Your Academic Stage".into(), "acadmic_stage".into()),
                ("What coping strategy you use as a student?".into(), "strategy_used".into()),
                (
                    "Do you have any bad habits like smoking, drinking on a daily basis?".into(),
                    "bad_habbits".into(),
                ),
                (
                    "What would you rate the academic  competition in your student life".into(),
                    "academic_competation".into(),
                ),
                ("Rate your academic stress index".into(), "stress_level".into()),
            ],
            target: "stress_level".into(),
        }
    }

    /// Feature names in row order
    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns_of(FeatureKind::Numeric)
    }

    pub fn categorical_columns(&self) -> Vec<String> {
        self.columns_of(FeatureKind::Categorical)
    }

    pub fn get(&self, name: &str) -> Option<&FeatureSpec> {
        self.features.iter().find(|f| f.name == name)
    }

    fn columns_of(&self, kind: FeatureKind) -> Vec<String> {
        self.features
            .iter()
            .filter(|f| f.kind == kind)
            .map(|f| f.name.clone())
            .collect()
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::stress_survey()
    }
}

/// Stress code -> display text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMap {
    labels: BTreeMap<i64, String>,
}

impl LabelMap {
    pub fn new(labels: BTreeMap<i64, String>) -> Self {
        Self { labels }
    }

    /// English and Bangla labels for the five stress levels.
    pub fn bilingual() -> Self {
        let labels = [
            (1, "1 - very low (খুব কম)"),
            (2, "2 - কম (Low)"),
            (3, "3 - মাঝারি (Medium)"),
            (4, "4 - বেশি (High)"),
            (5, "5 - অনেক বেশি (Very High)"),
        ]
        .into_iter()
        .map(|(code, text)| (code, text.to_string()))
        .collect();
        Self { labels }
    }

    /// Display text for a code, falling back to the code itself
    pub fn display(&self, code: i64) -> String {
        self.labels
            .get(&code)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }
}

impl Default for LabelMap {
    fn default() -> Self {
        Self::bilingual()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survey_column_order() {
        let schema = FeatureSchema::stress_survey();
        assert_eq!(
            schema.feature_names(),
            vec![
                "acadmic_stage",
                "Peer pressure",
                "Academic pressure from your home",
                "Study Environment",
                "strategy_used",
                "bad_habbits",
                "academic_competation",
            ]
        );
    }

    #[test]
    fn test_split_by_kind() {
        let schema = FeatureSchema::stress_survey();
        assert_eq!(
            schema.categorical_columns(),
            vec!["acadmic_stage", "Study Environment", "strategy_used", "bad_habbits"]
        );
        assert_eq!(
            schema.numeric_columns(),
            vec!["Peer pressure", "Academic pressure from your home", "academic_competation"]
        );
    }

    #[test]
    fn test_label_fallback() {
        let labels = LabelMap::bilingual();
        assert_eq!(labels.display(4), "4 - বেশি (High)");
        assert_eq!(labels.display(9), "9");
    }

    #[test]
    fn test_bounds() {
        let bounds = NumericBounds { min: 1, max: 5 };
        assert!(bounds.contains(1));
        assert!(bounds.contains(5));
        assert!(!bounds.contains(0));
        assert!(!bounds.contains(6));
    }
}
