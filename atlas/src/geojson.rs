//! GeoJSON wire types handed to the rendering layer.
//!
//! Only the subset the map consumes is modelled: points, polygons and
//! multipolygons, features with an optional top-level id, and feature
//! collections. Properties stay an open JSON object so each layer can carry
//! whatever paint inputs it needs.

use serde::{Deserialize, Deserializer, Serialize};

use crate::geo::LngLat;

/// A closed linear ring. The first and last coordinates are equal.
pub type Ring = Vec<LngLat>;

/// Feature geometry, tagged by `"type"` as in GeoJSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(LngLat),
    /// Outer ring followed by holes.
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    /// The outer ring of a polygon, or of the first part of a multipolygon.
    #[must_use]
    pub fn outer_ring(&self) -> Option<&Ring> {
        match self {
            Self::Point(_) => None,
            Self::Polygon(rings) => rings.first(),
            Self::MultiPolygon(parts) => parts.first().and_then(|rings| rings.first()),
        }
    }
}

/// Feature identifier. GeoJSON allows either a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Text(String),
    Number(serde_json::Number),
}

impl FeatureId {
    /// Stringified form used as the region / entity key.
    #[must_use]
    pub fn as_key(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum FeatureTag {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum CollectionTag {
    #[default]
    FeatureCollection,
}

/// A single GeoJSON feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default)]
    tag: FeatureTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
    pub geometry: Geometry,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

/// GeoJSON allows `"properties": null`.
fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<serde_json::Map<String, serde_json::Value>, D::Error> {
    Ok(Option::<serde_json::Map<String, serde_json::Value>>::deserialize(d)?.unwrap_or_default())
}

impl Feature {
    #[must_use]
    pub fn new(id: Option<FeatureId>, geometry: Geometry, properties: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { tag: FeatureTag::Feature, id, geometry, properties }
    }

    /// The feature's id, falling back to `properties.id` when the top-level id is absent.
    #[must_use]
    pub fn resolved_id(&self) -> Option<String> {
        if let Some(id) = &self.id {
            return Some(id.as_key());
        }
        match self.properties.get("id")? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// String property lookup.
    #[must_use]
    pub fn str_prop(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(serde_json::Value::as_str)
    }
}

/// An ordered collection of features, the unit a renderer source consumes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default)]
    tag: CollectionTag,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    #[must_use]
    pub fn new(features: Vec<Feature>) -> Self {
        Self { tag: CollectionTag::FeatureCollection, features }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
