//! Interaction model: placement tools, selection, and the control surface.
//!
//! `Tool` is the one-shot placement tool the user has armed. `UiState` holds
//! the ephemeral interaction state (armed tool, selection, hover) that is
//! never persisted. `PlacementConfig` holds the defaults new signals are
//! placed with, and `ControlValues` is what the control surface displays:
//! the selected signal's values when one is selected, otherwise the
//! placement defaults.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ANGLE_DEG, DEFAULT_RADIUS_M, DEFAULT_SIGNAL_COLOR, FULL_BEAM_DEG, MIN_BEAM_DEG};
use crate::doc::{EntityId, Signal, SignalKind, SignalPatch};
use crate::geo;

/// Which placement tool is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Clicks select (default).
    #[default]
    None,
    /// Next click drops a marker.
    PlaceMarker,
    /// Next click drops an omnidirectional signal.
    PlacePulse,
    /// Next click drops a directional signal.
    PlaceSector,
}

impl Tool {
    /// The tool after the user presses `requested`: pressing the armed tool
    /// again disarms it, anything else replaces it.
    #[must_use]
    pub fn toggled(self, requested: Tool) -> Tool {
        if self == requested { Tool::None } else { requested }
    }

    /// Signal kind this tool places, if it places a signal.
    #[must_use]
    pub fn signal_kind(self) -> Option<SignalKind> {
        match self {
            Self::PlacePulse => Some(SignalKind::Pulse),
            Self::PlaceSector => Some(SignalKind::Sector),
            Self::None | Self::PlaceMarker => None,
        }
    }
}

/// The kind of an addressable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Marker,
    Signal,
    Parish,
}

/// Reference to one entity: what it is and its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl EntityRef {
    #[must_use]
    pub fn marker(id: impl Into<EntityId>) -> Self {
        Self { kind: EntityKind::Marker, id: id.into() }
    }

    #[must_use]
    pub fn signal(id: impl Into<EntityId>) -> Self {
        Self { kind: EntityKind::Signal, id: id.into() }
    }

    #[must_use]
    pub fn parish(id: impl Into<EntityId>) -> Self {
        Self { kind: EntityKind::Parish, id: id.into() }
    }
}

/// Ephemeral interaction state visible to the render sync.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// Currently armed placement tool.
    pub tool: Tool,
    /// The entity being edited, if any. At most one.
    pub selected: Option<EntityRef>,
    /// Region under the pointer, if any.
    pub hovered_parish: Option<EntityId>,
}

impl UiState {
    /// Whether `id` is the selected entity of `kind`.
    #[must_use]
    pub fn is_selected(&self, kind: EntityKind, id: &str) -> bool {
        self.selected.as_ref().is_some_and(|s| s.kind == kind && s.id == id)
    }

    /// Selected id if the selection is of `kind`.
    #[must_use]
    pub fn selected_of(&self, kind: EntityKind) -> Option<&str> {
        self.selected.as_ref().filter(|s| s.kind == kind).map(|s| s.id.as_str())
    }
}

/// Defaults applied to newly placed signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementConfig {
    pub radius_m: f64,
    /// Sector aperture.
    pub angle_deg: f64,
    pub azimuth_deg: f64,
    pub color: String,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_RADIUS_M,
            angle_deg: DEFAULT_ANGLE_DEG,
            azimuth_deg: 0.0,
            color: DEFAULT_SIGNAL_COLOR.to_owned(),
        }
    }
}

impl PlacementConfig {
    /// Overlay the present fields of `patch`, keeping values in range.
    pub fn apply(&mut self, patch: &ControlPatch) {
        if let Some(r) = patch.radius_m.filter(|r| r.is_finite() && *r > 0.0) {
            self.radius_m = r;
        }
        if let Some(a) = patch.angle_deg.filter(|a| a.is_finite()) {
            self.angle_deg = a.clamp(MIN_BEAM_DEG, FULL_BEAM_DEG);
        }
        if let Some(a) = patch.azimuth_deg.filter(|a| a.is_finite()) {
            self.azimuth_deg = geo::normalize_bearing(a);
        }
        if let Some(c) = &patch.color {
            self.color.clone_from(c);
        }
    }
}

/// What the control surface shows. Always in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlValues {
    pub radius_m: f64,
    pub angle_deg: f64,
    pub azimuth_deg: f64,
    pub color: String,
}

impl From<&PlacementConfig> for ControlValues {
    fn from(config: &PlacementConfig) -> Self {
        Self {
            radius_m: config.radius_m,
            angle_deg: config.angle_deg,
            azimuth_deg: config.azimuth_deg,
            color: config.color.clone(),
        }
    }
}

impl From<&Signal> for ControlValues {
    fn from(signal: &Signal) -> Self {
        Self {
            radius_m: signal.radius_m(),
            angle_deg: signal.beamwidth_deg,
            azimuth_deg: signal.azimuth_deg,
            color: signal.color.clone(),
        }
    }
}

/// One edit from the control surface. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlPatch {
    #[serde(default)]
    pub radius_m: Option<f64>,
    #[serde(default)]
    pub angle_deg: Option<f64>,
    #[serde(default)]
    pub azimuth_deg: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
}

impl From<&ControlPatch> for SignalPatch {
    fn from(patch: &ControlPatch) -> Self {
        Self {
            radius_m: patch.radius_m.filter(|r| *r > 0.0),
            azimuth_deg: patch.azimuth_deg,
            beamwidth_deg: patch.angle_deg,
            color: patch.color.clone(),
        }
    }
}

/// Render-mode switches that affect parish materialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    /// Extrude parishes by their resolved height.
    pub isometric: bool,
    /// Draw outlines only; fill opacity is forced to zero.
    pub outline_only: bool,
}
