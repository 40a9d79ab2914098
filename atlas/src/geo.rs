//! Geometry kernel: spherical sector and circle synthesis.
//!
//! Everything here is a pure function of its inputs. Polygons are built from
//! great-circle destination points around an origin, so a sector of radius
//! `r` is a ring of points at exactly `r` kilometers from the origin along
//! evenly spaced bearings. Bearings are compass bearings (0 = north,
//! clockwise) and are normalized internally; radii at or below zero are
//! clamped to [`MIN_RADIUS_KM`] instead of being rejected.

#[cfg(test)]
#[path = "geo_test.rs"]
mod geo_test;

use serde::{Deserialize, Serialize};

use crate::consts::{CIRCLE_STEPS, EARTH_RADIUS_KM, FULL_BEAM_DEG, MIN_RADIUS_KM};
use crate::geojson::{Feature, Geometry, Ring};

/// A geographic coordinate. Serialized as a GeoJSON `[lng, lat]` position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    #[must_use]
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl TryFrom<Vec<f64>> for LngLat {
    type Error = String;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        match value.as_slice() {
            // Altitude, when present, is ignored.
            [lng, lat, ..] => Ok(Self::new(*lng, *lat)),
            _ => Err(format!("position needs at least 2 numbers, got {}", value.len())),
        }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(value: LngLat) -> Self {
        [value.lng, value.lat]
    }
}

/// Normalize any finite bearing into `[0, 360)`.
#[must_use]
pub fn normalize_bearing(deg: f64) -> f64 {
    let b = deg.rem_euclid(FULL_BEAM_DEG);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if b >= FULL_BEAM_DEG { 0.0 } else { b }
}

/// Wrap a longitude into `[-180, 180)`.
#[must_use]
pub fn wrap_lng(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// Clamp a radius to something the destination formula can draw.
#[must_use]
pub fn clamp_radius(radius_km: f64) -> f64 {
    if radius_km.is_finite() && radius_km > MIN_RADIUS_KM { radius_km } else { MIN_RADIUS_KM }
}

/// Great-circle destination from `origin`, `distance_km` along `bearing_deg`.
#[must_use]
pub fn destination(origin: LngLat, distance_km: f64, bearing_deg: f64) -> LngLat {
    let delta = distance_km / EARTH_RADIUS_KM;
    let theta = normalize_bearing(bearing_deg).to_radians();
    let phi1 = origin.lat.to_radians();
    let lambda1 = origin.lng.to_radians();

    let sin_phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).clamp(-1.0, 1.0);
    let phi2 = sin_phi2.asin();
    let y = theta.sin() * delta.sin() * phi1.cos();
    let x = delta.cos() - phi1.sin() * sin_phi2;
    let lambda2 = lambda1 + y.atan2(x);

    LngLat::new(wrap_lng(lambda2.to_degrees()), phi2.to_degrees())
}

/// Great-circle distance between two coordinates.
#[must_use]
pub fn haversine_km(a: LngLat, b: LngLat) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lng - a.lng).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Start and end bearings of a beam centered on `azimuth_deg`.
#[must_use]
pub fn beam_bearings(azimuth_deg: f64, beamwidth_deg: f64) -> (f64, f64) {
    let half = beamwidth_deg / 2.0;
    (azimuth_deg - half, azimuth_deg + half)
}

/// A full circle of `steps` arc points (at least [`CIRCLE_STEPS`]) plus the closing point.
#[must_use]
pub fn circle_polygon(origin: LngLat, radius_km: f64, steps: usize) -> Geometry {
    let radius = clamp_radius(radius_km);
    let steps = steps.max(CIRCLE_STEPS);
    #[allow(clippy::cast_precision_loss)]
    let step_deg = FULL_BEAM_DEG / steps as f64;

    let mut ring: Ring = Vec::with_capacity(steps + 1);
    for i in 0..steps {
        #[allow(clippy::cast_precision_loss)]
        let bearing = step_deg * i as f64;
        ring.push(destination(origin, radius, bearing));
    }
    ring.push(ring[0]);
    Geometry::Polygon(vec![ring])
}

/// A pie slice from `start_bearing_deg` clockwise to `end_bearing_deg`.
///
/// The ring runs origin → `steps + 1` arc points → origin. A span of a full
/// turn or more is drawn by [`circle_polygon`] so there is no seam at the
/// wrap point.
#[must_use]
pub fn sector_polygon(origin: LngLat, radius_km: f64, start_bearing_deg: f64, end_bearing_deg: f64, steps: usize) -> Geometry {
    let span = end_bearing_deg - start_bearing_deg;
    if span.abs() >= FULL_BEAM_DEG {
        return circle_polygon(origin, radius_km, steps);
    }
    let span = if span < 0.0 { span.rem_euclid(FULL_BEAM_DEG) } else { span };
    let radius = clamp_radius(radius_km);
    let steps = steps.max(1);
    #[allow(clippy::cast_precision_loss)]
    let step_deg = span / steps as f64;

    let mut ring: Ring = Vec::with_capacity(steps + 3);
    ring.push(origin);
    for i in 0..=steps {
        #[allow(clippy::cast_precision_loss)]
        let bearing = start_bearing_deg + step_deg * i as f64;
        ring.push(destination(origin, radius, bearing));
    }
    ring.push(origin);
    Geometry::Polygon(vec![ring])
}

/// Sector or circle for a beam of `beamwidth_deg` centered on `azimuth_deg`.
#[must_use]
pub fn beam_polygon(origin: LngLat, radius_km: f64, azimuth_deg: f64, beamwidth_deg: f64, steps: usize) -> Geometry {
    let (start, end) = beam_bearings(azimuth_deg, beamwidth_deg);
    sector_polygon(origin, radius_km, start, end, steps)
}

/// Wrap a coordinate in a point feature.
#[must_use]
pub fn point_feature(origin: LngLat, properties: serde_json::Map<String, serde_json::Value>) -> Feature {
    Feature::new(None, Geometry::Point(origin), properties)
}

/// Even-odd containment test against a polygon or multipolygon.
///
/// Holes fall out of the even-odd rule: a point inside a hole crosses the
/// outer ring and the hole ring, so it counts as outside.
#[must_use]
pub fn point_in_geometry(pt: LngLat, geometry: &Geometry) -> bool {
    match geometry {
        Geometry::Point(_) => false,
        Geometry::Polygon(rings) => point_in_rings(pt, rings),
        Geometry::MultiPolygon(parts) => parts.iter().any(|rings| point_in_rings(pt, rings)),
    }
}

fn point_in_rings(pt: LngLat, rings: &[Ring]) -> bool {
    let mut inside = false;
    for ring in rings {
        if ring.len() < 3 {
            continue;
        }
        let mut j = ring.len() - 1;
        for i in 0..ring.len() {
            let (a, b) = (ring[i], ring[j]);
            if (a.lat > pt.lat) != (b.lat > pt.lat) {
                let cross_lng = a.lng + (pt.lat - a.lat) / (b.lat - a.lat) * (b.lng - a.lng);
                if pt.lng < cross_lng {
                    inside = !inside;
                }
            }
            j = i;
        }
    }
    inside
}
