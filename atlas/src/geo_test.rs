#![allow(clippy::float_cmp)]

use super::*;

const ORIGIN: LngLat = LngLat { lng: -71.15, lat: 8.58 };

fn ring_of(geometry: &Geometry) -> &Ring {
    match geometry {
        Geometry::Polygon(rings) => &rings[0],
        other => panic!("expected polygon, got {other:?}"),
    }
}

fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

// =============================================================
// Bearings
// =============================================================

#[test]
fn normalize_bearing_wraps_negative_and_large() {
    assert_eq!(normalize_bearing(-90.0), 270.0);
    assert_eq!(normalize_bearing(450.0), 90.0);
    assert_eq!(normalize_bearing(360.0), 0.0);
    assert_eq!(normalize_bearing(0.0), 0.0);
}

#[test]
fn normalize_bearing_tiny_negative_stays_below_360() {
    let b = normalize_bearing(-1e-20);
    assert!((0.0..360.0).contains(&b));
}

#[test]
fn beam_bearings_center_on_azimuth() {
    assert_eq!(beam_bearings(90.0, 60.0), (60.0, 120.0));
    assert_eq!(beam_bearings(0.0, 360.0), (-180.0, 180.0));
}

#[test]
fn wrap_lng_folds_antimeridian() {
    assert!(approx(wrap_lng(190.0), -170.0, 1e-9));
    assert!(approx(wrap_lng(-190.0), 170.0, 1e-9));
    assert!(approx(wrap_lng(-71.0), -71.0, 1e-9));
}

// =============================================================
// Destination / distance
// =============================================================

#[test]
fn destination_north_increases_latitude_only() {
    let p = destination(ORIGIN, 10.0, 0.0);
    assert!(p.lat > ORIGIN.lat);
    assert!(approx(p.lng, ORIGIN.lng, 1e-9));
}

#[test]
fn destination_east_increases_longitude() {
    let p = destination(ORIGIN, 10.0, 90.0);
    assert!(p.lng > ORIGIN.lng);
}

#[test]
fn destination_distance_round_trips_through_haversine() {
    for bearing in [0.0, 45.0, 133.0, 270.0, -30.0, 725.0] {
        let p = destination(ORIGIN, 2.5, bearing);
        assert!(approx(haversine_km(ORIGIN, p), 2.5, 1e-6), "bearing {bearing}");
    }
}

#[test]
fn destination_negative_bearing_matches_normalized() {
    let a = destination(ORIGIN, 1.0, -90.0);
    let b = destination(ORIGIN, 1.0, 270.0);
    assert!(approx(a.lng, b.lng, 1e-12));
    assert!(approx(a.lat, b.lat, 1e-12));
}

#[test]
fn haversine_same_point_is_zero() {
    assert_eq!(haversine_km(ORIGIN, ORIGIN), 0.0);
}

// =============================================================
// Sector polygon
// =============================================================

#[test]
fn sector_ring_is_closed() {
    for beam in [10.0, 60.0, 179.0, 300.0, 360.0] {
        let (start, end) = beam_bearings(45.0, beam);
        let geom = sector_polygon(ORIGIN, 0.5, start, end, 32);
        let ring = ring_of(&geom);
        assert_eq!(ring.first(), ring.last(), "beam {beam}");
    }
}

#[test]
fn sector_vertex_count_scales_with_steps() {
    let small = sector_polygon(ORIGIN, 1.0, 60.0, 120.0, 8);
    let large = sector_polygon(ORIGIN, 1.0, 60.0, 120.0, 32);
    assert_eq!(ring_of(&small).len(), 8 + 3);
    assert_eq!(ring_of(&large).len(), 32 + 3);
}

#[test]
fn sector_starts_and_ends_at_origin() {
    let geom = sector_polygon(ORIGIN, 1.0, 60.0, 120.0, 16);
    let ring = ring_of(&geom);
    assert_eq!(ring[0], ORIGIN);
    assert_eq!(ring[ring.len() - 1], ORIGIN);
}

#[test]
fn sector_arc_follows_requested_bearings() {
    let (start, end) = beam_bearings(90.0, 60.0);
    let geom = sector_polygon(ORIGIN, 1.0, start, end, 12);
    let ring = ring_of(&geom);
    let first_arc = ring[1];
    let last_arc = ring[ring.len() - 2];
    let expect_first = destination(ORIGIN, 1.0, 60.0);
    let expect_last = destination(ORIGIN, 1.0, 120.0);
    assert!(approx(first_arc.lng, expect_first.lng, 1e-12) && approx(first_arc.lat, expect_first.lat, 1e-12));
    assert!(approx(last_arc.lng, expect_last.lng, 1e-12) && approx(last_arc.lat, expect_last.lat, 1e-12));
}

#[test]
fn sector_arc_points_lie_on_radius() {
    let geom = sector_polygon(ORIGIN, 3.0, -20.0, 20.0, 16);
    let ring = ring_of(&geom);
    for p in &ring[1..ring.len() - 1] {
        assert!(approx(haversine_km(ORIGIN, *p), 3.0, 1e-6));
    }
}

#[test]
fn sector_wrapping_span_is_normalized() {
    // 350° → 10° crosses north; the arc is 20° wide, not 340°.
    let geom = sector_polygon(ORIGIN, 1.0, 350.0, 10.0, 4);
    let ring = ring_of(&geom);
    for p in &ring[1..ring.len() - 1] {
        assert!(p.lat > ORIGIN.lat, "arc should stay on the northern side");
    }
}

#[test]
fn sector_zero_radius_is_clamped_not_degenerate() {
    let geom = sector_polygon(ORIGIN, 0.0, 0.0, 90.0, 8);
    let ring = ring_of(&geom);
    assert!(approx(haversine_km(ORIGIN, ring[1]), MIN_RADIUS_KM, 1e-9));
}

#[test]
fn sector_negative_or_nan_radius_is_clamped() {
    for r in [-5.0, f64::NAN, f64::NEG_INFINITY] {
        let geom = sector_polygon(ORIGIN, r, 0.0, 90.0, 8);
        let ring = ring_of(&geom);
        assert!(ring.iter().all(|p| p.lng.is_finite() && p.lat.is_finite()));
    }
}

// =============================================================
// Full circle equivalence
// =============================================================

#[test]
fn full_beam_delegates_to_circle() {
    let sector = sector_polygon(ORIGIN, 0.5, -180.0, 180.0, 64);
    let circle = circle_polygon(ORIGIN, 0.5, 64);
    assert_eq!(sector, circle);
}

#[test]
fn full_beam_has_no_seam_against_circle() {
    let sector = beam_polygon(ORIGIN, 0.5, 0.0, 360.0, 360);
    let circle = circle_polygon(ORIGIN, 0.5, 360);
    let (s, c) = (ring_of(&sector), ring_of(&circle));
    assert_eq!(s.len(), 361);
    for (a, b) in s.iter().zip(c.iter()) {
        let ra = haversine_km(ORIGIN, *a);
        let rb = haversine_km(ORIGIN, *b);
        assert!((ra - rb).abs() < 1e-9);
        assert!(approx(ra, 0.5, 1e-6));
    }
}

#[test]
fn circle_enforces_minimum_resolution() {
    let circle = circle_polygon(ORIGIN, 1.0, 4);
    assert_eq!(ring_of(&circle).len(), CIRCLE_STEPS + 1);
}

#[test]
fn circle_ring_is_closed() {
    let circle = circle_polygon(ORIGIN, 1.0, 100);
    let ring = ring_of(&circle);
    assert_eq!(ring.first(), ring.last());
    assert_eq!(ring.len(), 101);
}

// =============================================================
// Point in polygon
// =============================================================

fn square(x0: f64, y0: f64, size: f64) -> Ring {
    vec![
        LngLat::new(x0, y0),
        LngLat::new(x0 + size, y0),
        LngLat::new(x0 + size, y0 + size),
        LngLat::new(x0, y0 + size),
        LngLat::new(x0, y0),
    ]
}

#[test]
fn point_in_polygon_inside_and_outside() {
    let geom = Geometry::Polygon(vec![square(0.0, 0.0, 10.0)]);
    assert!(point_in_geometry(LngLat::new(5.0, 5.0), &geom));
    assert!(!point_in_geometry(LngLat::new(15.0, 5.0), &geom));
}

#[test]
fn point_in_polygon_respects_holes() {
    let geom = Geometry::Polygon(vec![square(0.0, 0.0, 10.0), square(4.0, 4.0, 2.0)]);
    assert!(!point_in_geometry(LngLat::new(5.0, 5.0), &geom));
    assert!(point_in_geometry(LngLat::new(1.0, 1.0), &geom));
}

#[test]
fn point_in_multipolygon_checks_every_part() {
    let geom = Geometry::MultiPolygon(vec![vec![square(0.0, 0.0, 1.0)], vec![square(10.0, 10.0, 1.0)]]);
    assert!(point_in_geometry(LngLat::new(10.5, 10.5), &geom));
    assert!(!point_in_geometry(LngLat::new(5.0, 5.0), &geom));
}

#[test]
fn point_geometry_never_contains() {
    assert!(!point_in_geometry(ORIGIN, &Geometry::Point(ORIGIN)));
}

// =============================================================
// Serde
// =============================================================

#[test]
fn lnglat_serializes_as_position() {
    let json = serde_json::to_string(&LngLat::new(-71.15, 8.58)).unwrap();
    assert_eq!(json, "[-71.15,8.58]");
}

#[test]
fn lnglat_ignores_altitude() {
    let p: LngLat = serde_json::from_str("[1.0, 2.0, 300.0]").unwrap();
    assert_eq!(p, LngLat::new(1.0, 2.0));
}

#[test]
fn lnglat_rejects_short_position() {
    assert!(serde_json::from_str::<LngLat>("[1.0]").is_err());
}

#[test]
fn point_feature_wraps_properties() {
    let mut props = serde_json::Map::new();
    props.insert("id".into(), "a".into());
    let f = point_feature(ORIGIN, props);
    assert_eq!(f.geometry, Geometry::Point(ORIGIN));
    assert_eq!(f.str_prop("id"), Some("a"));
}
