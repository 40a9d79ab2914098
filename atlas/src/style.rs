//! Parish styling: global defaults, sparse per-region overrides, and the
//! shallow merge that resolves one from the other.
//!
//! The effective style for a region is `{...defaults, ...override}`: a field
//! present in the override wins, an absent one falls back to the default.
//! Resolution is recomputed on every render pass and never cached.

#[cfg(test)]
#[path = "style_test.rs"]
mod style_test;

use serde::{Deserialize, Serialize};

/// A complete parish style. Used for the global defaults and as the
/// resolved output of [`resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParishStyle {
    pub visible: bool,
    /// Fill opacity in `[0, 1]`.
    pub opacity: f64,
    pub color: String,
    pub extrusion_height_m: f64,
    pub outline_color: String,
    pub outline_width_px: f64,
    pub label_color: String,
    pub label_size_px: f64,
    pub label_halo_color: String,
    pub label_halo_width_px: f64,
}

impl Default for ParishStyle {
    fn default() -> Self {
        Self {
            visible: true,
            opacity: 0.3,
            color: "#7F66FF".to_owned(),
            extrusion_height_m: 40.0,
            outline_color: "#7F66FF".to_owned(),
            outline_width_px: 2.0,
            label_color: "#FFFFFF".to_owned(),
            label_size_px: 12.0,
            label_halo_color: "#000000".to_owned(),
            label_halo_width_px: 1.0,
        }
    }
}

impl ParishStyle {
    /// Overlay every field present in `patch`.
    pub fn apply(&mut self, patch: &ParishStylePatch) {
        let patch = patch.sanitized();
        if let Some(v) = patch.visible {
            self.visible = v;
        }
        if let Some(v) = patch.opacity {
            self.opacity = v;
        }
        if let Some(v) = patch.color {
            self.color = v;
        }
        if let Some(v) = patch.extrusion_height_m {
            self.extrusion_height_m = v;
        }
        if let Some(v) = patch.outline_color {
            self.outline_color = v;
        }
        if let Some(v) = patch.outline_width_px {
            self.outline_width_px = v;
        }
        if let Some(v) = patch.label_color {
            self.label_color = v;
        }
        if let Some(v) = patch.label_size_px {
            self.label_size_px = v;
        }
        if let Some(v) = patch.label_halo_color {
            self.label_halo_color = v;
        }
        if let Some(v) = patch.label_halo_width_px {
            self.label_halo_width_px = v;
        }
    }
}

/// Sparse style patch. Only present fields are applied.
///
/// Older saved overrides used `height`, `outlineWidth`, `labelSize` and
/// `labelHaloWidth`; those names are still accepted on read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParishStylePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "height")]
    pub extrusion_height_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "outlineWidth")]
    pub outline_width_px: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "labelSize")]
    pub label_size_px: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_halo_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "labelHaloWidth")]
    pub label_halo_width_px: Option<f64>,
}

impl ParishStylePatch {
    /// Whether the patch carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fold `newer` on top of `self`; fields present in `newer` win.
    #[must_use]
    pub fn merged(&self, newer: &ParishStylePatch) -> ParishStylePatch {
        let newer = newer.sanitized();
        ParishStylePatch {
            visible: newer.visible.or(self.visible),
            opacity: newer.opacity.or(self.opacity),
            color: newer.color.or_else(|| self.color.clone()),
            extrusion_height_m: newer.extrusion_height_m.or(self.extrusion_height_m),
            outline_color: newer.outline_color.or_else(|| self.outline_color.clone()),
            outline_width_px: newer.outline_width_px.or(self.outline_width_px),
            label_color: newer.label_color.or_else(|| self.label_color.clone()),
            label_size_px: newer.label_size_px.or(self.label_size_px),
            label_halo_color: newer.label_halo_color.or_else(|| self.label_halo_color.clone()),
            label_halo_width_px: newer.label_halo_width_px.or(self.label_halo_width_px),
        }
    }

    /// Clamp numeric fields into their valid ranges. Non-finite numbers are dropped.
    #[must_use]
    pub fn sanitized(&self) -> ParishStylePatch {
        ParishStylePatch {
            opacity: self.opacity.filter(|v| v.is_finite()).map(|v| v.clamp(0.0, 1.0)),
            extrusion_height_m: non_negative(self.extrusion_height_m),
            outline_width_px: non_negative(self.outline_width_px),
            label_size_px: non_negative(self.label_size_px),
            label_halo_width_px: non_negative(self.label_halo_width_px),
            ..self.clone()
        }
    }
}

fn non_negative(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite()).map(|v| v.max(0.0))
}

/// Effective style: `defaults` overlaid with `override_patch`, if any.
#[must_use]
pub fn resolve(defaults: &ParishStyle, override_patch: Option<&ParishStylePatch>) -> ParishStyle {
    let mut style = defaults.clone();
    if let Some(patch) = override_patch {
        style.apply(patch);
    }
    style
}
