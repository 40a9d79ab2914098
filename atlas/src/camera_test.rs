#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn camera_default_is_home() {
    let cam = Camera::default();
    assert_eq!(cam.center, LngLat::new(-71.1505, 8.582));
    assert_eq!(cam.zoom, 12.6);
}

#[test]
fn meters_per_pixel_halves_per_zoom_level() {
    let a = Camera { center: LngLat::new(0.0, 0.0), zoom: 10.0 };
    let b = Camera { center: LngLat::new(0.0, 0.0), zoom: 11.0 };
    assert!((a.meters_per_pixel() / b.meters_per_pixel() - 2.0).abs() < 1e-9);
}

#[test]
fn meters_per_pixel_shrinks_with_latitude() {
    let equator = Camera { center: LngLat::new(0.0, 0.0), zoom: 12.0 };
    let north = Camera { center: LngLat::new(0.0, 60.0), zoom: 12.0 };
    assert!((north.meters_per_pixel() / equator.meters_per_pixel() - 0.5).abs() < 1e-9);
}

#[test]
fn screen_dist_to_km_scales_linearly() {
    let cam = Camera::default();
    let one = cam.screen_dist_to_km(1.0);
    assert!((cam.screen_dist_to_km(10.0) - 10.0 * one).abs() < 1e-12);
    assert!((one - cam.meters_per_pixel() / 1000.0).abs() < 1e-12);
}

#[test]
fn fly_to_recenters_and_zooms_in() {
    let mut cam = Camera::default();
    cam.fly_to(LngLat::new(-71.0, 8.0));
    assert_eq!(cam.center, LngLat::new(-71.0, 8.0));
    assert_eq!(cam.zoom, 15.0);
}

#[test]
fn fly_to_never_zooms_out() {
    let mut cam = Camera { center: LngLat::new(0.0, 0.0), zoom: 17.0 };
    cam.fly_to(LngLat::new(1.0, 1.0));
    assert_eq!(cam.zoom, 17.0);
}

#[test]
fn sync_copies_base_map_view() {
    let mut cam = Camera::default();
    cam.sync(LngLat::new(2.0, 3.0), 9.5);
    assert_eq!(cam, Camera { center: LngLat::new(2.0, 3.0), zoom: 9.5 });
}
