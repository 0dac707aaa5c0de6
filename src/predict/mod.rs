//! Price prediction through an externally trained pipeline.
//!
//! The pipeline is a black box behind [`PricePredictor`]: given a property
//! description it returns a natural-log price, which [`PriceRange`] turns
//! into a displayable band in crore.

pub mod linear;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{HearthError, Result};
use crate::types::round2;

pub use linear::LinearPipeline;

/// Half-width of the reported price band, in crore.
pub const PRICE_BAND_CRORE: f64 = 0.22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Flat,
    House,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Flat => "flat",
            PropertyType::House => "house",
        }
    }
}

/// What a caller knows about the property being priced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDescription {
    pub property_type: PropertyType,
    pub sector: String,
    pub bedrooms: f64,
    pub bathrooms: f64,
    /// Balcony bucket as listed, e.g. `"2"` or `"3+"`.
    pub balcony: String,
    /// Age or possession bracket, e.g. `"Relatively New"`.
    pub age_possession: String,
    /// Square feet.
    pub built_up_area: f64,
    #[serde(default)]
    pub servant_room: bool,
    #[serde(default)]
    pub store_room: bool,
    pub furnishing_type: String,
    pub luxury_category: String,
    pub floor_category: String,
}

/// A single input column for the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature<'a> {
    Numeric(f64),
    Categorical(&'a str),
}

/// Feature columns in the order the pipeline was trained on.
pub const NUMERIC_COLUMNS: [&str; 5] = [
    "bedRoom",
    "bathroom",
    "built_up_area",
    "servant room",
    "store room",
];

pub const CATEGORICAL_COLUMNS: [&str; 7] = [
    "property_type",
    "sector",
    "balcony",
    "agePossession",
    "furnishing_type",
    "luxury_category",
    "floor_category",
];

impl PropertyDescription {
    /// Reject inputs no pipeline could score.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("bedrooms", self.bedrooms),
            ("bathrooms", self.bathrooms),
            ("built_up_area", self.built_up_area),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(HearthError::InvalidArgument(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.sector.trim().is_empty() {
            return Err(HearthError::InvalidArgument("sector must not be empty".into()));
        }
        Ok(())
    }

    /// The description as named pipeline columns.
    pub fn features(&self) -> Vec<(&'static str, Feature<'_>)> {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        vec![
            ("property_type", Feature::Categorical(self.property_type.as_str())),
            ("sector", Feature::Categorical(&self.sector)),
            ("bedRoom", Feature::Numeric(self.bedrooms)),
            ("bathroom", Feature::Numeric(self.bathrooms)),
            ("balcony", Feature::Categorical(&self.balcony)),
            ("agePossession", Feature::Categorical(&self.age_possession)),
            ("built_up_area", Feature::Numeric(self.built_up_area)),
            ("servant room", Feature::Numeric(flag(self.servant_room))),
            ("store room", Feature::Numeric(flag(self.store_room))),
            ("furnishing_type", Feature::Categorical(&self.furnishing_type)),
            ("luxury_category", Feature::Categorical(&self.luxury_category)),
            ("floor_category", Feature::Categorical(&self.floor_category)),
        ]
    }
}

/// Estimated price band in crore, rounded for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

impl PriceRange {
    /// Invert the pipeline's `log1p` target and widen into a band.
    pub fn from_log_price(log_price: f64) -> Self {
        let base = log_price.exp_m1();
        Self {
            low: round2(base - PRICE_BAND_CRORE),
            high: round2(base + PRICE_BAND_CRORE),
        }
    }
}

/// Values the pipeline accepts, for populating pickers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictOptions {
    /// Known categories per categorical column, sorted.
    pub categorical: BTreeMap<String, Vec<String>>,
    /// Observed levels per numeric column (bedroom counts etc.), sorted.
    pub levels: BTreeMap<String, Vec<f64>>,
}

/// A trained inference pipeline consumed as a black box.
pub trait PricePredictor: Send + Sync {
    /// Natural-log-scaled price for the described property.
    fn predict(&self, description: &PropertyDescription) -> Result<f64>;

    /// Vocabularies the pipeline was trained on.
    fn options(&self) -> PredictOptions;

    /// Validate, predict and convert to a price band.
    fn price_range(&self, description: &PropertyDescription) -> Result<PriceRange> {
        description.validate()?;
        let log_price = self.predict(description)?;
        if !log_price.is_finite() {
            return Err(HearthError::Internal(format!(
                "pipeline produced a non-finite prediction: {log_price}"
            )));
        }
        Ok(PriceRange::from_log_price(log_price))
    }
}
