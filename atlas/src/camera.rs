#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{FLY_TO_ZOOM, HOME_LAT, HOME_LNG, HOME_ZOOM, MERCATOR_EQUATOR_MPP};
use crate::geo::LngLat;

/// Web-mercator camera mirrored from the base map.
///
/// `zoom` is the base map's zoom level (512 px tiles).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: LngLat,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { center: LngLat::new(HOME_LNG, HOME_LAT), zoom: HOME_ZOOM }
    }
}

impl Camera {
    /// Ground meters covered by one screen pixel at the center latitude.
    #[must_use]
    pub fn meters_per_pixel(&self) -> f64 {
        MERCATOR_EQUATOR_MPP * self.center.lat.to_radians().cos() / 2f64.powf(self.zoom)
    }

    /// Convert a screen-space distance (pixels) to kilometers on the ground.
    #[must_use]
    pub fn screen_dist_to_km(&self, px: f64) -> f64 {
        px * self.meters_per_pixel() / 1000.0
    }

    /// Recenter on `target`, zooming in to at least [`FLY_TO_ZOOM`].
    pub fn fly_to(&mut self, target: LngLat) {
        self.center = target;
        self.zoom = self.zoom.max(FLY_TO_ZOOM);
    }

    /// Sync from the base map after the user pans or zooms.
    pub fn sync(&mut self, center: LngLat, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
    }
}
