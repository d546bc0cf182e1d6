use serde::{Deserialize, Serialize};

/// Why an alert scored the way it did.
///
/// Contribution order is meaningful and must survive a round trip through
/// the store, which is why this is a sequence rather than a map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    #[serde(default)]
    pub feature_importance: Vec<FeatureContribution>,
}

impl Explanation {
    pub fn new(feature_importance: Vec<FeatureContribution>) -> Self {
        Self { feature_importance }
    }
}

/// One scoring feature that fired, and how much it moved the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: String,
    pub value: i64,
    pub impact: f64,
}

impl FeatureContribution {
    pub fn new(feature: impl Into<String>, value: i64, impact: f64) -> Self {
        Self {
            feature: feature.into(),
            value,
            impact,
        }
    }
}
