//! Shared numeric constants for the atlas crate.

// ── Geometry ────────────────────────────────────────────────────

/// Mean Earth radius in kilometers (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Smallest radius the kernel will draw. Anything at or below zero is clamped here.
pub const MIN_RADIUS_KM: f64 = 0.001;

/// Meters per kilometer. The control surface speaks meters, the store kilometers.
pub const METERS_PER_KM: f64 = 1000.0;

/// Arc points for a full circle. Below this the ring visibly facets.
pub const CIRCLE_STEPS: usize = 64;

/// Arc points for a directional sector.
pub const SECTOR_STEPS: usize = 32;

// ── Signals ─────────────────────────────────────────────────────

/// Beamwidth of a pulse, and the upper bound for a sector.
pub const FULL_BEAM_DEG: f64 = 360.0;

/// Narrowest sector the control surface allows.
pub const MIN_BEAM_DEG: f64 = 10.0;

/// Default placement radius in meters.
pub const DEFAULT_RADIUS_M: f64 = 500.0;

/// Default sector aperture in degrees.
pub const DEFAULT_ANGLE_DEG: f64 = 60.0;

/// Default signal color.
pub const DEFAULT_SIGNAL_COLOR: &str = "#7F66FF";

// ── Animation ───────────────────────────────────────────────────

/// Period of the expanding radar sweep.
pub const SWEEP_PERIOD_MS: f64 = 3000.0;

/// Period of the breathing opacity on signal centers.
pub const BREATH_PERIOD_MS: f64 = 2000.0;

/// Opacity of the wave at the start of a sweep.
pub const WAVE_PEAK_OPACITY: f64 = 0.4;

// ── Camera ──────────────────────────────────────────────────────

/// Longitude of the initial map center (Libertador, Mérida).
pub const HOME_LNG: f64 = -71.1505;

/// Latitude of the initial map center.
pub const HOME_LAT: f64 = 8.582;

/// Initial zoom level.
pub const HOME_ZOOM: f64 = 12.6;

/// Zoom level `fly_to` brings the camera to at minimum.
pub const FLY_TO_ZOOM: f64 = 15.0;

/// Web-mercator ground resolution at the equator for zoom 0 with 512 px tiles, in meters per pixel.
pub const MERCATOR_EQUATOR_MPP: f64 = 78_271.516_96;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for signal centers and markers.
pub const HIT_RADIUS_PX: f64 = 10.0;
