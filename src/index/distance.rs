//! Property-to-location distance table with radius queries.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{HearthError, Result};
use crate::types::{LocationName, PropertyName, SearchHit};

const ARTIFACT: &str = "distance table";

/// Immutable table of distances in meters from every property to every
/// reference location.
///
/// Stored column-major: a radius query touches one location column only.
#[derive(Debug, Clone)]
pub struct DistanceIndex {
    properties: Vec<PropertyName>,
    locations: Vec<LocationName>,
    location_lookup: HashMap<LocationName, usize>,
    property_lookup: HashMap<PropertyName, usize>,
    columns: Vec<Vec<f64>>,
}

impl DistanceIndex {
    /// Build the index from row-major data: `rows[p][l]` is the distance in
    /// meters from `properties[p]` to `locations[l]`.
    ///
    /// # Errors
    /// `HearthError::Integrity` on duplicate names, ragged rows, or cells that
    /// are negative or not finite.
    pub fn new(
        properties: Vec<PropertyName>,
        locations: Vec<LocationName>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self> {
        if rows.len() != properties.len() {
            return Err(HearthError::integrity(
                ARTIFACT,
                format!("{} property names for {} rows", properties.len(), rows.len()),
            ));
        }

        let location_lookup = unique_lookup(&locations, "location")?;
        let property_lookup = unique_lookup(&properties, "property")?;

        let mut columns = vec![Vec::with_capacity(properties.len()); locations.len()];
        for (p, row) in rows.into_iter().enumerate() {
            if row.len() != locations.len() {
                return Err(HearthError::integrity(
                    ARTIFACT,
                    format!(
                        "row '{}' has {} cells, expected {}",
                        properties[p],
                        row.len(),
                        locations.len()
                    ),
                ));
            }
            for (l, meters) in row.into_iter().enumerate() {
                if !meters.is_finite() || meters < 0.0 {
                    return Err(HearthError::integrity(
                        ARTIFACT,
                        format!(
                            "distance from '{}' to '{}' is {meters}",
                            properties[p], locations[l]
                        ),
                    ));
                }
                columns[l].push(meters);
            }
        }

        Ok(Self {
            properties,
            locations,
            location_lookup,
            property_lookup,
            columns,
        })
    }

    /// Properties strictly closer than `radius_km` to `location`, nearest
    /// first. Equal distances keep table row order.
    ///
    /// An empty result is a valid outcome, not an error.
    pub fn query(&self, location: &str, radius_km: f64) -> Result<Vec<SearchHit>> {
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(HearthError::InvalidArgument(format!(
                "radius must be a positive number of kilometers, got {radius_km}"
            )));
        }
        let column = self.column(location)?;
        let limit_m = radius_km * 1000.0;

        let mut hits: Vec<SearchHit> = column
            .iter()
            .enumerate()
            .filter(|(_, &meters)| meters < limit_m)
            .map(|(p, &meters)| SearchHit {
                name: self.properties[p].clone(),
                distance_m: meters,
            })
            .collect();

        // Stable: ties stay in row order.
        hits.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));

        debug!(location, radius_km, hits = hits.len(), "radius query");
        Ok(hits)
    }

    /// Distance in meters between one property and one location.
    pub fn distance(&self, property: &str, location: &str) -> Result<f64> {
        let column = self.column(location)?;
        let p = self
            .property_lookup
            .get(property)
            .ok_or_else(|| HearthError::not_found("property", property))?;
        Ok(column[*p])
    }

    /// Location names sorted alphabetically.
    pub fn locations(&self) -> Vec<LocationName> {
        let mut names = self.locations.clone();
        names.sort();
        names
    }

    /// Property names in table row order.
    pub fn properties(&self) -> &[PropertyName] {
        &self.properties
    }

    pub fn contains_property(&self, name: &str) -> bool {
        self.property_lookup.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    fn column(&self, location: &str) -> Result<&[f64]> {
        self.location_lookup
            .get(location)
            .map(|&l| self.columns[l].as_slice())
            .ok_or_else(|| HearthError::not_found("location", location))
    }
}

fn unique_lookup(names: &[String], kind: &str) -> Result<HashMap<String, usize>> {
    let mut lookup = HashMap::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        if lookup.insert(name.clone(), i).is_some() {
            return Err(HearthError::integrity(
                ARTIFACT,
                format!("duplicate {kind} name '{name}'"),
            ));
        }
    }
    Ok(lookup)
}
