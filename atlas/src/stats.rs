//! Per-parish statistics edited on the dashboard.
//!
//! Persisted field names are `poblacion`, `area` and `metadata` so existing
//! saved books keep loading. Density is always derived, never stored.

#[cfg(test)]
#[path = "stats_test.rs"]
mod stats_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Census figures for one region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParishStats {
    #[serde(rename = "poblacion", default)]
    pub population: u64,
    #[serde(rename = "area", default)]
    pub area_km2: f64,
    #[serde(default)]
    pub metadata: String,
}

impl ParishStats {
    /// Inhabitants per square kilometer, or 0 when the area is unknown.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn density(&self) -> f64 {
        if self.area_km2 > 0.0 { self.population as f64 / self.area_km2 } else { 0.0 }
    }
}

/// Sparse stats edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsPatch {
    pub population: Option<u64>,
    pub area_km2: Option<f64>,
    pub metadata: Option<String>,
}

/// Stats for every region that has been edited, keyed by region id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsBook {
    entries: BTreeMap<String, ParishStats>,
}

impl StatsBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, region_id: &str) -> Option<&ParishStats> {
        self.entries.get(region_id)
    }

    /// Stats for a region, zeroed if it was never edited.
    #[must_use]
    pub fn get_or_default(&self, region_id: &str) -> ParishStats {
        self.entries.get(region_id).cloned().unwrap_or_default()
    }

    /// Apply an edit, creating the entry on first use. Negative or
    /// non-finite areas are ignored.
    pub fn update(&mut self, region_id: &str, patch: &StatsPatch) {
        let entry = self.entries.entry(region_id.to_owned()).or_default();
        if let Some(p) = patch.population {
            entry.population = p;
        }
        if let Some(a) = patch.area_km2.filter(|a| a.is_finite() && *a >= 0.0) {
            entry.area_km2 = a;
        }
        if let Some(m) = &patch.metadata {
            entry.metadata.clone_from(m);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParishStats)> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
