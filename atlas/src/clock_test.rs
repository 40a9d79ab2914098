#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{Signal, SignalKind};
use crate::geo::{self, LngLat};
use crate::geojson::Geometry;

#[derive(Default)]
struct CountingScheduler {
    requested: u32,
    cancelled: u32,
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&mut self) {
        self.requested += 1;
    }

    fn cancel_frame(&mut self) {
        self.cancelled += 1;
    }
}

const ORIGIN: LngLat = LngLat { lng: -71.15, lat: 8.58 };

fn store_with_pulse(radius_km: f64) -> EntityStore {
    let mut store = EntityStore::new();
    store.add_signal(Signal::new(SignalKind::Pulse, ORIGIN, radius_km, 0.0, 360.0, "#fff"));
    store
}

// =============================================================
// Phase math
// =============================================================

#[test]
fn phase_is_monotonic_within_a_cycle() {
    let mut last = -1.0;
    for t in (0..3000).step_by(100) {
        let p = phase(f64::from(t), SWEEP_PERIOD_MS);
        assert!(p > last, "phase at {t} did not increase");
        last = p;
    }
}

#[test]
fn phase_resets_at_cycle_boundary() {
    assert!(phase(2999.0, SWEEP_PERIOD_MS) > 0.99);
    assert_eq!(phase(3000.0, SWEEP_PERIOD_MS), 0.0);
    assert!((phase(3001.0, SWEEP_PERIOD_MS) - 1.0 / 3000.0).abs() < 1e-12);
}

#[test]
fn phase_stays_in_unit_interval() {
    for t in [0.0, 1.0, 1_700_000_000_123.0, -500.0] {
        let p = phase(t, SWEEP_PERIOD_MS);
        assert!((0.0..1.0).contains(&p), "phase({t}) = {p}");
    }
    assert_eq!(phase(100.0, 0.0), 0.0);
}

#[test]
fn phase_of_tiny_negative_time_wraps_to_zero() {
    let p = phase(-1e-13, SWEEP_PERIOD_MS);
    assert!((0.0..1.0).contains(&p), "phase = {p}");
    assert_eq!(phase(-1e-13, BREATH_PERIOD_MS), 0.0);
}

#[test]
fn wave_opacity_fades_from_peak() {
    assert_eq!(wave_opacity(0.0), 0.4);
    assert!((wave_opacity(0.5) - 0.2).abs() < 1e-12);
    assert_eq!(wave_opacity(1.0), 0.0);
}

#[test]
fn breathing_opacity_spans_floor_to_one() {
    assert!((breathing_opacity(0.0) - 0.35).abs() < 1e-12);
    assert!((breathing_opacity(1000.0) - 1.0).abs() < 1e-12);
    for t in (0..2000).step_by(50) {
        let o = breathing_opacity(f64::from(t));
        assert!((0.35..=1.0).contains(&o));
    }
}

// =============================================================
// Wave frames
// =============================================================

#[test]
fn wave_grows_with_progress() {
    let store = store_with_pulse(1.0);
    let radius_at = |t: f64| {
        let frame = wave_frame(t, &store);
        let ring = frame.features.features[0].geometry.outer_ring().unwrap().clone();
        geo::haversine_km(ORIGIN, ring[1])
    };
    let early = radius_at(300.0);
    let late = radius_at(2700.0);
    assert!((early - 0.1).abs() < 1e-3);
    assert!((late - 0.9).abs() < 1e-3);
}

#[test]
fn wave_at_cycle_start_is_not_degenerate() {
    let store = store_with_pulse(1.0);
    let frame = wave_frame(0.0, &store);
    let Geometry::Polygon(rings) = &frame.features.features[0].geometry else {
        unreachable!("pulse wave must be a polygon");
    };
    assert!(rings[0].len() > 3);
    assert!(rings[0].iter().all(|p| p.lng.is_finite() && p.lat.is_finite()));
}

#[test]
fn wave_frame_carries_signal_id_and_color() {
    let store = store_with_pulse(0.5);
    let frame = wave_frame(1500.0, &store);
    let f = &frame.features.features[0];
    assert_eq!(f.resolved_id().as_deref(), Some(store.signals()[0].id.as_str()));
    assert_eq!(f.properties["color"], "#fff");
    assert!((frame.opacity - 0.2).abs() < 1e-12);
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn no_signals_yields_empty_frame_and_keeps_ticking() {
    let mut clock = AnimationClock::new();
    let mut sched = CountingScheduler::default();
    clock.start(&mut sched);
    let frame = clock.tick(1234.0, &EntityStore::new(), &mut sched).unwrap();
    assert!(frame.features.is_empty());
    assert_eq!(sched.requested, 2);
}

#[test]
fn tick_reflects_signals_added_mid_run() {
    let mut clock = AnimationClock::new();
    let mut sched = CountingScheduler::default();
    clock.start(&mut sched);
    let mut store = EntityStore::new();
    assert!(clock.tick(0.0, &store, &mut sched).unwrap().features.is_empty());
    store.add_signal(Signal::new(SignalKind::Sector, ORIGIN, 0.5, 90.0, 60.0, "#f00"));
    assert_eq!(clock.tick(16.0, &store, &mut sched).unwrap().features.len(), 1);
}

#[test]
fn tick_does_not_mutate_store() {
    let store = store_with_pulse(0.5);
    let before = store.revision();
    let mut clock = AnimationClock::new();
    let mut sched = CountingScheduler::default();
    clock.start(&mut sched);
    clock.tick(100.0, &store, &mut sched);
    assert_eq!(store.revision(), before);
}

#[test]
fn stop_cancels_and_ignores_late_ticks() {
    let mut clock = AnimationClock::new();
    let mut sched = CountingScheduler::default();
    clock.start(&mut sched);
    clock.stop(&mut sched);
    assert_eq!(sched.cancelled, 1);
    assert!(!clock.is_running());

    let store = store_with_pulse(0.5);
    assert!(clock.tick(100.0, &store, &mut sched).is_none());
    assert_eq!(sched.requested, 1);
    assert_eq!(clock.ticks(), 0);
}

#[test]
fn start_and_stop_are_idempotent_and_restartable() {
    let mut clock = AnimationClock::new();
    let mut sched = CountingScheduler::default();
    clock.start(&mut sched);
    clock.start(&mut sched);
    assert_eq!(sched.requested, 1);
    clock.stop(&mut sched);
    clock.stop(&mut sched);
    assert_eq!(sched.cancelled, 1);
    clock.start(&mut sched);
    assert!(clock.is_running());
    assert_eq!(sched.requested, 2);
}
