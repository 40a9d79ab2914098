//! Render sync: materializes entity state into renderer-ready features.
//!
//! This module is the only place that knows the renderer's property names.
//! It receives read-only views of the store, the interaction state and the
//! boundary dataset and produces feature collections. It never mutates any
//! application state and never reads its own previous output, so calling
//! [`materialize`] twice on unchanged inputs yields equal collections.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::dataset::{BoundaryDataset, Region};
use crate::doc::{EntityStore, Marker, Signal};
use crate::geo;
use crate::geojson::{Feature, FeatureCollection, FeatureId};
use crate::input::{EntityKind, RenderOptions, UiState};
use crate::style::ParishStyle;

/// One feature collection per renderer source.
///
/// Signal areas and signal centers live in separate sources so that the same
/// entity id never appears twice within one source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOutput {
    pub signal_areas: FeatureCollection,
    pub signal_centers: FeatureCollection,
    pub markers: FeatureCollection,
    pub parishes: FeatureCollection,
}

/// Recompute every renderer source from authoritative state.
#[must_use]
pub fn materialize(store: &EntityStore, ui: &UiState, dataset: &BoundaryDataset, options: RenderOptions) -> RenderOutput {
    let signals = store.signals();
    RenderOutput {
        signal_areas: FeatureCollection::new(signals.iter().map(|s| signal_area(s, ui)).collect()),
        signal_centers: FeatureCollection::new(signals.iter().map(|s| signal_center(s, ui)).collect()),
        markers: FeatureCollection::new(store.markers().iter().map(|m| marker_point(m, ui)).collect()),
        parishes: FeatureCollection::new(
            dataset
                .regions()
                .iter()
                .map(|r| parish_feature(r, &store.resolve_parish(&r.id), ui, options))
                .collect(),
        ),
    }
}

// =============================================================
// Signals
// =============================================================

fn signal_props(signal: &Signal, ui: &UiState) -> Map<String, Value> {
    let mut props = Map::new();
    props.insert("id".into(), json!(signal.id));
    props.insert("kind".into(), json!(signal.kind));
    props.insert("color".into(), json!(signal.color));
    props.insert("selected".into(), json!(ui.is_selected(EntityKind::Signal, &signal.id)));
    props
}

fn signal_area(signal: &Signal, ui: &UiState) -> Feature {
    Feature::new(Some(FeatureId::from(signal.id.as_str())), signal.footprint(), signal_props(signal, ui))
}

fn signal_center(signal: &Signal, ui: &UiState) -> Feature {
    let mut feature = geo::point_feature(signal.origin, signal_props(signal, ui));
    feature.id = Some(FeatureId::from(signal.id.as_str()));
    feature
}

// =============================================================
// Markers
// =============================================================

fn marker_point(marker: &Marker, ui: &UiState) -> Feature {
    let mut props = Map::new();
    props.insert("id".into(), json!(marker.id));
    props.insert("selected".into(), json!(ui.is_selected(EntityKind::Marker, &marker.id)));
    props.insert("rotation".into(), json!(marker.rotation));
    let mut feature = geo::point_feature(marker.coordinate, props);
    feature.id = Some(FeatureId::from(marker.id.as_str()));
    feature
}

// =============================================================
// Parishes
// =============================================================

/// Fill opacity after visibility and outline-only mode are applied.
#[must_use]
pub fn effective_fill_opacity(style: &ParishStyle, options: RenderOptions) -> f64 {
    if !style.visible || options.outline_only { 0.0 } else { style.opacity }
}

/// Extrusion after isometric mode is applied.
#[must_use]
pub fn effective_extrusion(style: &ParishStyle, options: RenderOptions) -> f64 {
    if options.isometric { style.extrusion_height_m } else { 0.0 }
}

fn parish_feature(region: &Region, style: &ParishStyle, ui: &UiState, options: RenderOptions) -> Feature {
    let mut props = Map::new();
    props.insert("id".into(), json!(region.id));
    props.insert("name".into(), json!(region.name));
    props.insert("visible".into(), json!(style.visible));
    props.insert("color".into(), json!(style.color));
    props.insert("opacity".into(), json!(effective_fill_opacity(style, options)));
    props.insert("extrusionHeightM".into(), json!(effective_extrusion(style, options)));
    props.insert("outlineColor".into(), json!(style.outline_color));
    props.insert("outlineWidthPx".into(), json!(style.outline_width_px));
    props.insert("labelColor".into(), json!(style.label_color));
    props.insert("labelSizePx".into(), json!(style.label_size_px));
    props.insert("labelHaloColor".into(), json!(style.label_halo_color));
    props.insert("labelHaloWidthPx".into(), json!(style.label_halo_width_px));
    props.insert("selected".into(), json!(ui.is_selected(EntityKind::Parish, &region.id)));
    props.insert("hovered".into(), json!(ui.hovered_parish.as_deref() == Some(region.id.as_str())));
    Feature::new(Some(FeatureId::from(region.id.as_str())), region.geometry.clone(), props)
}
