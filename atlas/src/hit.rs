#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Camera;
use crate::consts::HIT_RADIUS_PX;
use crate::dataset::BoundaryDataset;
use crate::doc::EntityStore;
use crate::geo::{self, LngLat};
use crate::input::EntityRef;

/// Test what is under `pt`, in fixed priority order: signal centers, then
/// markers, then parish regions. The first class with a hit wins even if a
/// later class is also hit. Within the point classes the nearest entity
/// inside the pixel slop wins.
#[must_use]
pub fn hit_test(pt: LngLat, store: &EntityStore, dataset: &BoundaryDataset, camera: &Camera) -> Option<EntityRef> {
    let slop_km = camera.screen_dist_to_km(HIT_RADIUS_PX);

    if let Some(id) = nearest_within(pt, slop_km, store.signals().iter().map(|s| (s.id.as_str(), s.origin))) {
        return Some(EntityRef::signal(id));
    }
    if let Some(id) = nearest_within(pt, slop_km, store.markers().iter().map(|m| (m.id.as_str(), m.coordinate))) {
        return Some(EntityRef::marker(id));
    }
    hit_parish(pt, dataset).map(EntityRef::parish)
}

/// The first region (in dataset order) containing `pt`.
#[must_use]
pub fn hit_parish(pt: LngLat, dataset: &BoundaryDataset) -> Option<&str> {
    dataset
        .regions()
        .iter()
        .find(|r| geo::point_in_geometry(pt, &r.geometry))
        .map(|r| r.id.as_str())
}

fn nearest_within<'a>(pt: LngLat, slop_km: f64, candidates: impl Iterator<Item = (&'a str, LngLat)>) -> Option<&'a str> {
    candidates
        .map(|(id, at)| (id, geo::haversine_km(pt, at)))
        .filter(|(_, d)| *d <= slop_km)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}
