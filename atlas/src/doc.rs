//! Document model: markers, signals, parish overrides, and the entity store.
//!
//! This module defines the user-placed entities (`Marker`, `Signal`), sparse
//! update types for incremental edits (`MarkerPatch`, `SignalPatch`), and the
//! store that owns them together with the parish style overrides and global
//! defaults (`EntityStore`).
//!
//! The store is the single source of truth. Every mutation builds a fresh
//! collection and swaps it in behind an `Arc`, so a consumer holding an older
//! snapshot can detect change with `Arc::ptr_eq` or by comparing
//! [`EntityStore::revision`]. Mutations aimed at an id that no longer exists
//! are no-ops that report `false`.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{CIRCLE_STEPS, FULL_BEAM_DEG, METERS_PER_KM, MIN_BEAM_DEG, MIN_RADIUS_KM, SECTOR_STEPS};
use crate::geo::{self, LngLat};
use crate::geojson::Geometry;
use crate::style::{self, ParishStyle, ParishStylePatch};

/// Opaque entity identifier, unique for the lifetime of a store.
pub type EntityId = String;

/// Generate a fresh id with a short kind prefix (`m`, `s`).
#[must_use]
pub fn new_entity_id(prefix: &str) -> EntityId {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

/// Convert a UI-facing radius in meters to the stored kilometers.
#[must_use]
pub fn radius_km_from_m(radius_m: f64) -> f64 {
    radius_m / METERS_PER_KM
}

/// Convert a stored radius in kilometers to the UI-facing meters.
#[must_use]
pub fn radius_m_from_km(radius_km: f64) -> f64 {
    radius_km * METERS_PER_KM
}

// =============================================================
// Marker
// =============================================================

/// A placed point entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: EntityId,
    /// Fixed at creation.
    pub coordinate: LngLat,
    /// Heading in degrees, `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
}

impl Marker {
    /// A new marker with a fresh id and zero rotation.
    #[must_use]
    pub fn new(coordinate: LngLat) -> Self {
        Self { id: new_entity_id("m"), coordinate, rotation: 0.0 }
    }
}

/// Sparse update for a marker. Only `rotation` is mutable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarkerPatch {
    pub rotation: Option<f64>,
}

// =============================================================
// Signal
// =============================================================

/// The two kinds of radiating entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    /// Omnidirectional; beamwidth is always a full turn.
    Pulse,
    /// Directional wedge.
    Sector,
}

/// A radiating entity: a circle (pulse) or a wedge (sector) around an origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub id: EntityId,
    pub kind: SignalKind,
    /// Fixed at creation.
    pub origin: LngLat,
    pub radius_km: f64,
    /// Bisector bearing. Retained but unused for pulses.
    pub azimuth_deg: f64,
    pub beamwidth_deg: f64,
    pub color: String,
}

impl Signal {
    /// A new signal with a fresh id. Parameters are brought into range.
    #[must_use]
    pub fn new(kind: SignalKind, origin: LngLat, radius_km: f64, azimuth_deg: f64, beamwidth_deg: f64, color: &str) -> Self {
        Self {
            id: new_entity_id("s"),
            kind,
            origin,
            radius_km,
            azimuth_deg,
            beamwidth_deg,
            color: color.to_owned(),
        }
        .normalized()
    }

    /// Enforce the data-model invariants: pulses span a full turn, sectors
    /// stay within `[10, 360]`, angles sit in `[0, 360)`, radius is positive.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.radius_km = geo::clamp_radius(self.radius_km);
        self.azimuth_deg = finite_or(self.azimuth_deg, 0.0);
        self.azimuth_deg = geo::normalize_bearing(self.azimuth_deg);
        self.beamwidth_deg = match self.kind {
            SignalKind::Pulse => FULL_BEAM_DEG,
            SignalKind::Sector => clamp_beamwidth(self.beamwidth_deg),
        };
        self
    }

    /// Radius in meters, as the control surface shows it.
    #[must_use]
    pub fn radius_m(&self) -> f64 {
        radius_m_from_km(self.radius_km)
    }

    /// Start and end bearings of the coverage wedge.
    #[must_use]
    pub fn bearings(&self) -> (f64, f64) {
        geo::beam_bearings(self.azimuth_deg, self.beamwidth_deg)
    }

    /// Coverage polygon at full radius.
    #[must_use]
    pub fn footprint(&self) -> Geometry {
        self.polygon_at(self.radius_km)
    }

    /// Sweep polygon at `progress` of the full radius, never thinner than
    /// [`MIN_RADIUS_KM`].
    #[must_use]
    pub fn wave(&self, progress: f64) -> Geometry {
        self.polygon_at((self.radius_km * progress).max(MIN_RADIUS_KM))
    }

    fn polygon_at(&self, radius_km: f64) -> Geometry {
        let steps = match self.kind {
            SignalKind::Pulse => CIRCLE_STEPS,
            SignalKind::Sector => SECTOR_STEPS,
        };
        geo::beam_polygon(self.origin, radius_km, self.azimuth_deg, self.beamwidth_deg, steps)
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

fn clamp_beamwidth(deg: f64) -> f64 {
    finite_or(deg, FULL_BEAM_DEG).clamp(MIN_BEAM_DEG, FULL_BEAM_DEG)
}

/// Sparse update for a signal, in control-surface units.
///
/// `radius_m` is meters. [`EntityStore::update_signal`] is the one place that
/// converts it to the stored kilometers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalPatch {
    pub radius_m: Option<f64>,
    pub azimuth_deg: Option<f64>,
    pub beamwidth_deg: Option<f64>,
    pub color: Option<String>,
}

// =============================================================
// Store
// =============================================================

/// In-memory store of every user-placed entity and parish style.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    markers: Arc<Vec<Marker>>,
    signals: Arc<Vec<Signal>>,
    overrides: Arc<BTreeMap<String, ParishStylePatch>>,
    defaults: Arc<ParishStyle>,
    revision: u64,
}

impl EntityStore {
    /// Create an empty store with the stock parish defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    /// Monotonic counter bumped by every effective mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Shared handle to the current marker collection.
    #[must_use]
    pub fn markers_snapshot(&self) -> Arc<Vec<Marker>> {
        Arc::clone(&self.markers)
    }

    /// Shared handle to the current signal collection.
    #[must_use]
    pub fn signals_snapshot(&self) -> Arc<Vec<Signal>> {
        Arc::clone(&self.signals)
    }

    #[must_use]
    pub fn overrides(&self) -> &BTreeMap<String, ParishStylePatch> {
        &self.overrides
    }

    #[must_use]
    pub fn parish_defaults(&self) -> &ParishStyle {
        &self.defaults
    }

    #[must_use]
    pub fn marker(&self, id: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn signal(&self, id: &str) -> Option<&Signal> {
        self.signals.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn parish_override(&self, region_id: &str) -> Option<&ParishStylePatch> {
        self.overrides.get(region_id)
    }

    /// Effective style for a region: defaults overlaid with its override.
    #[must_use]
    pub fn resolve_parish(&self, region_id: &str) -> ParishStyle {
        style::resolve(&self.defaults, self.overrides.get(region_id))
    }

    #[must_use]
    pub fn has_signals(&self) -> bool {
        !self.signals.is_empty()
    }

    // --- Markers ---

    /// Append a marker and return its id.
    pub fn add_marker(&mut self, marker: Marker) -> EntityId {
        let id = marker.id.clone();
        let mut next = Vec::with_capacity(self.markers.len() + 1);
        next.extend(self.markers.iter().cloned());
        next.push(Marker { rotation: geo::normalize_bearing(finite_or(marker.rotation, 0.0)), ..marker });
        self.markers = Arc::new(next);
        self.bump();
        id
    }

    /// Apply a partial update. Returns `false` if no marker has this id or
    /// the patch carries nothing usable.
    pub fn update_marker(&mut self, id: &str, patch: &MarkerPatch) -> bool {
        if self.marker(id).is_none() {
            log::debug!("update_marker: no marker {id}");
            return false;
        }
        let Some(rotation) = patch.rotation.filter(|r| r.is_finite()) else {
            return false;
        };
        let next = self
            .markers
            .iter()
            .map(|m| {
                if m.id != id {
                    return m.clone();
                }
                Marker { rotation: geo::normalize_bearing(rotation), ..m.clone() }
            })
            .collect();
        self.markers = Arc::new(next);
        self.bump();
        true
    }

    /// Remove a marker. Returns `false` if no marker has this id.
    pub fn remove_marker(&mut self, id: &str) -> bool {
        if self.marker(id).is_none() {
            log::debug!("remove_marker: no marker {id}");
            return false;
        }
        self.markers = Arc::new(self.markers.iter().filter(|m| m.id != id).cloned().collect());
        self.bump();
        true
    }

    // --- Signals ---

    /// Append a signal (normalized) and return its id.
    pub fn add_signal(&mut self, signal: Signal) -> EntityId {
        let signal = signal.normalized();
        let id = signal.id.clone();
        let mut next = Vec::with_capacity(self.signals.len() + 1);
        next.extend(self.signals.iter().cloned());
        next.push(signal);
        self.signals = Arc::new(next);
        self.bump();
        id
    }

    /// Apply a partial update. `radius_m` is converted to kilometers here.
    /// A beamwidth patch on a pulse is ignored. Returns `false` if no signal
    /// has this id.
    pub fn update_signal(&mut self, id: &str, patch: &SignalPatch) -> bool {
        if self.signal(id).is_none() {
            log::debug!("update_signal: no signal {id}");
            return false;
        }
        let next = self
            .signals
            .iter()
            .map(|s| {
                if s.id != id {
                    return s.clone();
                }
                let mut updated = s.clone();
                if let Some(m) = patch.radius_m.filter(|m| m.is_finite()) {
                    updated.radius_km = radius_km_from_m(m);
                }
                if let Some(a) = patch.azimuth_deg.filter(|a| a.is_finite()) {
                    updated.azimuth_deg = a;
                }
                if let Some(b) = patch.beamwidth_deg.filter(|_| s.kind == SignalKind::Sector) {
                    updated.beamwidth_deg = b;
                }
                if let Some(c) = &patch.color {
                    updated.color.clone_from(c);
                }
                updated.normalized()
            })
            .collect();
        self.signals = Arc::new(next);
        self.bump();
        true
    }

    /// Remove a signal. Returns `false` if no signal has this id.
    pub fn remove_signal(&mut self, id: &str) -> bool {
        if self.signal(id).is_none() {
            log::debug!("remove_signal: no signal {id}");
            return false;
        }
        self.signals = Arc::new(self.signals.iter().filter(|s| s.id != id).cloned().collect());
        self.bump();
        true
    }

    // --- Parish styles ---

    /// Merge `patch` into the region's override, creating it on first edit.
    /// Returns `false` if nothing survives sanitizing.
    pub fn set_parish_override(&mut self, region_id: &str, patch: &ParishStylePatch) -> bool {
        let patch = patch.sanitized();
        if patch.is_empty() {
            return false;
        }
        let mut next = (*self.overrides).clone();
        let merged = next.get(region_id).map_or_else(|| patch.clone(), |existing| existing.merged(&patch));
        next.insert(region_id.to_owned(), merged);
        self.overrides = Arc::new(next);
        self.bump();
        true
    }

    /// Drop the region's whole override. Returns `false` if it had none.
    pub fn reset_parish_override(&mut self, region_id: &str) -> bool {
        if !self.overrides.contains_key(region_id) {
            log::debug!("reset_parish_override: no override for {region_id}");
            return false;
        }
        let mut next = (*self.overrides).clone();
        next.remove(region_id);
        self.overrides = Arc::new(next);
        self.bump();
        true
    }

    /// Overlay `patch` on the global parish defaults.
    /// Returns `false` if nothing survives sanitizing.
    pub fn set_global_parish_defaults(&mut self, patch: &ParishStylePatch) -> bool {
        if patch.sanitized().is_empty() {
            return false;
        }
        let mut next = (*self.defaults).clone();
        next.apply(patch);
        self.defaults = Arc::new(next);
        self.bump();
        true
    }

    // --- Bulk ---

    /// Replace every collection with persisted state. Signals are normalized
    /// on the way in so a hand-edited blob cannot break the pulse invariant.
    pub fn load(&mut self, markers: Vec<Marker>, signals: Vec<Signal>, overrides: BTreeMap<String, ParishStylePatch>) {
        self.markers = Arc::new(markers);
        self.signals = Arc::new(signals.into_iter().map(Signal::normalized).collect());
        self.overrides = Arc::new(overrides.into_iter().map(|(k, v)| (k, v.sanitized())).collect());
        self.bump();
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}
