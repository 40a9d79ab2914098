//! Static parish boundary dataset.
//!
//! The dataset is a GeoJSON feature collection fetched once per view and
//! shared read-only afterwards. Each usable feature becomes a [`Region`]
//! keyed by its stable id (`feature.id`, else `properties.id`). Features
//! without an id or without polygonal geometry are skipped, not fatal.

#[cfg(test)]
#[path = "dataset_test.rs"]
mod dataset_test;

use crate::geojson::{Feature, Geometry};

/// Why the dataset could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("request failed with status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed dataset: {0}")]
    Parse(String),
}

/// One administrative region from the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: String,
    /// Human-readable name for labels and the hover popup.
    pub name: String,
    pub geometry: Geometry,
}

/// Every region of the boundary dataset, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryDataset {
    regions: Vec<Region>,
}

impl BoundaryDataset {
    #[must_use]
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// Parse a GeoJSON feature collection.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] if the text is not JSON or has no
    /// `features` array. Individual bad features are skipped with a warning.
    pub fn from_geojson(text: &str) -> Result<Self, LoadError> {
        let root: serde_json::Value = serde_json::from_str(text).map_err(|e| LoadError::Parse(e.to_string()))?;
        let Some(features) = root.get("features").and_then(serde_json::Value::as_array) else {
            return Err(LoadError::Parse("missing features array".into()));
        };

        let mut regions = Vec::with_capacity(features.len());
        for (index, raw) in features.iter().enumerate() {
            let feature = match serde_json::from_value::<Feature>(raw.clone()) {
                Ok(f) => f,
                Err(e) => {
                    log::warn!("boundary feature {index} skipped: {e}");
                    continue;
                }
            };
            match region_from_feature(feature) {
                Some(region) => regions.push(region),
                None => log::warn!("boundary feature {index} skipped: no id or not a polygon"),
            }
        }
        Ok(Self { regions })
    }

    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    #[must_use]
    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

fn region_from_feature(feature: Feature) -> Option<Region> {
    if matches!(feature.geometry, Geometry::Point(_)) {
        return None;
    }
    let id = feature.resolved_id()?;
    let name = feature
        .str_prop("name_full")
        .or_else(|| feature.str_prop("name"))
        .map_or_else(|| format!("PARROQUIA_{id}"), str::to_owned);
    Some(Region { id, name, geometry: feature.geometry })
}
