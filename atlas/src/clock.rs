//! Animation clock: the sweep wave drawn over every signal.
//!
//! The clock is a cancelable periodic task. The host supplies a
//! [`FrameScheduler`] (display-refresh callbacks in the browser, a counter in
//! tests) and calls [`AnimationClock::tick`] once per frame. The clock only
//! reads the store and produces an ephemeral [`WaveFrame`]; it never
//! mutates entity state.

#[cfg(test)]
#[path = "clock_test.rs"]
mod clock_test;

use std::f64::consts::TAU;

use serde::Serialize;
use serde_json::{Map, json};

use crate::consts::{BREATH_PERIOD_MS, SWEEP_PERIOD_MS, WAVE_PEAK_OPACITY};
use crate::doc::EntityStore;
use crate::geojson::{Feature, FeatureCollection, FeatureId};

/// Breathing opacity floor and swing.
const BREATH_FLOOR: f64 = 0.35;
const BREATH_SWING: f64 = 0.65;

/// Position within the current cycle, in `[0, 1)`.
#[must_use]
pub fn phase(now_ms: f64, period_ms: f64) -> f64 {
    if period_ms.is_nan() || period_ms <= 0.0 || !now_ms.is_finite() {
        return 0.0;
    }
    let p = now_ms.rem_euclid(period_ms) / period_ms;
    // rem_euclid can round up to the full period for tiny negative inputs.
    if p >= 1.0 { 0.0 } else { p }
}

/// Wave layer opacity: full at the origin, fading to zero at full radius.
#[must_use]
pub fn wave_opacity(progress: f64) -> f64 {
    WAVE_PEAK_OPACITY * (1.0 - progress.clamp(0.0, 1.0))
}

/// Smooth pulsing opacity for the signal area fill.
#[must_use]
pub fn breathing_opacity(now_ms: f64) -> f64 {
    let p = phase(now_ms, BREATH_PERIOD_MS);
    BREATH_FLOOR + BREATH_SWING * (0.5 - 0.5 * (TAU * p).cos())
}

/// Port for scheduling the next display frame.
pub trait FrameScheduler {
    /// Ask for one more [`AnimationClock::tick`] on the next frame.
    fn request_frame(&mut self);
    /// Drop the pending frame request, if any.
    fn cancel_frame(&mut self);
}

/// Ephemeral output of one tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveFrame {
    /// One wave polygon per signal; empty when there are no signals.
    pub features: FeatureCollection,
    pub opacity: f64,
    pub breathing_opacity: f64,
}

/// Compute the wave layer at `now_ms` from the current signals.
#[must_use]
pub fn wave_frame(now_ms: f64, store: &EntityStore) -> WaveFrame {
    let progress = phase(now_ms, SWEEP_PERIOD_MS);
    let features = store
        .signals()
        .iter()
        .map(|s| {
            let mut props = Map::new();
            props.insert("id".into(), json!(s.id));
            props.insert("color".into(), json!(s.color));
            Feature::new(Some(FeatureId::from(s.id.as_str())), s.wave(progress), props)
        })
        .collect();
    WaveFrame {
        features: FeatureCollection::new(features),
        opacity: wave_opacity(progress),
        breathing_opacity: breathing_opacity(now_ms),
    }
}

/// Start/stop lifecycle around the per-frame wave computation.
#[derive(Debug, Default)]
pub struct AnimationClock {
    running: bool,
    ticks: u64,
}

impl AnimationClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames produced since construction.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Begin ticking. Starting a running clock does nothing.
    pub fn start<F: FrameScheduler>(&mut self, scheduler: &mut F) {
        if self.running {
            return;
        }
        self.running = true;
        scheduler.request_frame();
    }

    /// Stop ticking and cancel the pending frame.
    pub fn stop<F: FrameScheduler>(&mut self, scheduler: &mut F) {
        if !self.running {
            return;
        }
        self.running = false;
        scheduler.cancel_frame();
    }

    /// Handle one frame. Returns `None` once stopped, so a frame that was
    /// already in flight at teardown is dropped. While running, the next
    /// frame is always requested, even with no signals, so a newly placed
    /// signal animates immediately.
    pub fn tick<F: FrameScheduler>(&mut self, now_ms: f64, store: &EntityStore, scheduler: &mut F) -> Option<WaveFrame> {
        if !self.running {
            return None;
        }
        self.ticks += 1;
        scheduler.request_frame();
        if !store.has_signals() {
            return Some(WaveFrame::default());
        }
        Some(wave_frame(now_ms, store))
    }
}
