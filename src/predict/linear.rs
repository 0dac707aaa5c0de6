use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{HearthError, Result};

use super::{
    Feature, PredictOptions, PricePredictor, PropertyDescription, CATEGORICAL_COLUMNS,
    NUMERIC_COLUMNS,
};

const ARTIFACT: &str = "price model";

/// An exported linear pipeline: scaled numeric coefficients plus one-hot
/// weights per categorical column, predicting `log1p(price)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearPipeline {
    pub intercept: f64,
    #[serde(default)]
    pub numeric: BTreeMap<String, f64>,
    #[serde(default)]
    pub categorical: BTreeMap<String, BTreeMap<String, f64>>,
    /// Numeric levels seen in training, surfaced to pickers only.
    #[serde(default)]
    pub levels: BTreeMap<String, Vec<f64>>,
}

impl LinearPipeline {
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let pipeline: Self = serde_json::from_slice(data)?;
        pipeline.check()?;
        Ok(pipeline)
    }

    /// Every column must be one the description can provide, and every
    /// weight must be finite.
    fn check(&self) -> Result<()> {
        if !self.intercept.is_finite() {
            return Err(HearthError::integrity(ARTIFACT, "intercept is not finite"));
        }
        for (column, weight) in &self.numeric {
            if !NUMERIC_COLUMNS.contains(&column.as_str()) {
                return Err(HearthError::integrity(
                    ARTIFACT,
                    format!("unknown numeric column '{column}'"),
                ));
            }
            if !weight.is_finite() {
                return Err(HearthError::integrity(
                    ARTIFACT,
                    format!("weight for '{column}' is not finite"),
                ));
            }
        }
        for (column, weights) in &self.categorical {
            if !CATEGORICAL_COLUMNS.contains(&column.as_str()) {
                return Err(HearthError::integrity(
                    ARTIFACT,
                    format!("unknown categorical column '{column}'"),
                ));
            }
            if weights.is_empty() {
                return Err(HearthError::integrity(
                    ARTIFACT,
                    format!("categorical column '{column}' has no categories"),
                ));
            }
            if let Some((category, _)) = weights.iter().find(|(_, w)| !w.is_finite()) {
                return Err(HearthError::integrity(
                    ARTIFACT,
                    format!("weight for '{column}={category}' is not finite"),
                ));
            }
        }
        Ok(())
    }
}

impl PricePredictor for LinearPipeline {
    fn predict(&self, description: &PropertyDescription) -> Result<f64> {
        let mut total = self.intercept;
        for (column, feature) in description.features() {
            match feature {
                Feature::Numeric(value) => {
                    if let Some(weight) = self.numeric.get(column) {
                        total += weight * value;
                    }
                }
                Feature::Categorical(value) => {
                    if let Some(weights) = self.categorical.get(column) {
                        let weight = weights.get(value).ok_or_else(|| {
                            HearthError::InvalidArgument(format!(
                                "unknown {column} '{value}'"
                            ))
                        })?;
                        total += weight;
                    }
                }
            }
        }
        Ok(total)
    }

    fn options(&self) -> PredictOptions {
        let categorical = self
            .categorical
            .iter()
            .map(|(column, weights)| (column.clone(), weights.keys().cloned().collect()))
            .collect();
        let levels = self
            .levels
            .iter()
            .map(|(column, values)| {
                let mut sorted = values.clone();
                sorted.sort_by(f64::total_cmp);
                sorted.dedup();
                (column.clone(), sorted)
            })
            .collect();
        PredictOptions {
            categorical,
            levels,
        }
    }
}
