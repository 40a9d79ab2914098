//! Persistence port: a string key-value store and the blobs kept in it.
//!
//! Each collection lives under its own fixed key as JSON text. State is read
//! once when the view mounts and written on an explicit save. A missing key
//! means an empty collection. A malformed blob is logged and also treated as
//! empty, so a corrupt entry never blocks the map from opening.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, json};

use crate::doc::{EntityStore, Marker, Signal, new_entity_id};
use crate::geo;
use crate::geojson::{Feature, FeatureCollection, FeatureId, Geometry};
use crate::registry::{Person, Registry};
use crate::stats::StatsBook;
use crate::style::ParishStylePatch;

/// Marker points, stored as a GeoJSON feature collection.
pub const MARKERS_KEY: &str = "markers_fc";
pub const SIGNALS_KEY: &str = "signals_list";
pub const OVERRIDES_KEY: &str = "parish_overrides";
pub const PEOPLE_KEY: &str = "people_registry";
pub const STATS_KEY: &str = "parroquia_stats_galileo";

/// A write to the key-value store failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("write to {key} rejected: {reason}")]
    Write { key: String, reason: String },
    #[error("could not encode {key}: {reason}")]
    Encode { key: String, reason: String },
}

/// Minimal string key-value store.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend refuses the write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory [`KvStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Everything read back from storage at mount.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedState {
    pub markers: Vec<Marker>,
    pub signals: Vec<Signal>,
    pub overrides: BTreeMap<String, ParishStylePatch>,
    pub people: Vec<Person>,
    pub stats: StatsBook,
}

/// Read every key, falling back to empty collections.
#[must_use]
pub fn load_state<K: KvStore + ?Sized>(kv: &K) -> PersistedState {
    PersistedState {
        markers: read_json::<FeatureCollection, _>(kv, MARKERS_KEY).map(markers_from_fc).unwrap_or_default(),
        signals: read_json(kv, SIGNALS_KEY).unwrap_or_default(),
        overrides: read_json(kv, OVERRIDES_KEY).unwrap_or_default(),
        people: read_json(kv, PEOPLE_KEY).unwrap_or_default(),
        stats: read_json(kv, STATS_KEY).unwrap_or_default(),
    }
}

/// Write every key.
///
/// # Errors
///
/// Stops at and returns the first [`StorageError`].
pub fn save_state<K: KvStore + ?Sized>(kv: &mut K, store: &EntityStore, registry: &Registry, stats: &StatsBook) -> Result<(), StorageError> {
    write_json(kv, MARKERS_KEY, &markers_to_fc(store.markers()))?;
    write_json(kv, SIGNALS_KEY, store.signals())?;
    write_json(kv, OVERRIDES_KEY, store.overrides())?;
    write_json(kv, PEOPLE_KEY, registry)?;
    write_json(kv, STATS_KEY, stats)?;
    log::debug!(
        "saved {} markers, {} signals, {} overrides",
        store.markers().len(),
        store.signals().len(),
        store.overrides().len()
    );
    Ok(())
}

fn read_json<T: DeserializeOwned, K: KvStore + ?Sized>(kv: &K, key: &str) -> Option<T> {
    let raw = kv.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("ignoring malformed {key}: {e}");
            None
        }
    }
}

fn write_json<T: Serialize + ?Sized, K: KvStore + ?Sized>(kv: &mut K, key: &str, value: &T) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Encode { key: key.to_owned(), reason: e.to_string() })?;
    kv.set(key, &raw)
}

// =============================================================
// Marker collection
// =============================================================

/// Encode markers as point features with `{id, rotation}` properties.
#[must_use]
pub fn markers_to_fc(markers: &[Marker]) -> FeatureCollection {
    FeatureCollection::new(
        markers
            .iter()
            .map(|m| {
                let mut props = Map::new();
                props.insert("id".into(), json!(m.id));
                props.insert("rotation".into(), json!(m.rotation));
                let mut feature = geo::point_feature(m.coordinate, props);
                feature.id = Some(FeatureId::from(m.id.as_str()));
                feature
            })
            .collect(),
    )
}

/// Decode markers from point features. Non-point features are skipped and
/// features without an id get a fresh one.
#[must_use]
pub fn markers_from_fc(fc: FeatureCollection) -> Vec<Marker> {
    fc.features.into_iter().filter_map(marker_from_feature).collect()
}

fn marker_from_feature(feature: Feature) -> Option<Marker> {
    let Geometry::Point(coordinate) = &feature.geometry else {
        log::warn!("stored marker skipped: not a point");
        return None;
    };
    let id = feature.resolved_id().unwrap_or_else(|| new_entity_id("m"));
    let rotation = feature.properties.get("rotation").and_then(serde_json::Value::as_f64).unwrap_or(0.0);
    Some(Marker { id, coordinate: *coordinate, rotation: geo::normalize_bearing(rotation) })
}
