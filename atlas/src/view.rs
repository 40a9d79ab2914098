//! Map view lifecycle: mount, async loads, save, frames, teardown.
//!
//! `MapView` owns the [`EngineCore`] plus the two host ports (storage and
//! frame scheduling). The host performs the actual network requests and
//! hands the results back through [`MapView::finish_credential`] and
//! [`MapView::finish_dataset`] together with the [`LoadTicket`] it got when
//! the load began. A result whose ticket belongs to an earlier mount, or
//! that arrives after teardown, is dropped.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clock::{AnimationClock, FrameScheduler, WaveFrame};
use crate::consts::{HOME_LAT, HOME_LNG, HOME_ZOOM};
use crate::dataset::{BoundaryDataset, LoadError};
use crate::engine::{Action, EngineCore};
use crate::geo::LngLat;
use crate::persist::{self, KvStore, StorageError};

/// Where the host fetches the map credential.
pub const KEY_ENDPOINT: &str = "/api/key";
/// Where the host fetches the parish boundaries.
pub const DATASET_URL: &str = "/data/parroquias_libertador_14.geojson";
const STYLE_URL: &str = "https://api.maptiler.com/maps/dataviz/style.json";

/// Raw reply from the credential endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct KeyBody {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Everything needed to construct the base map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapInit {
    pub style_url: String,
    pub center: LngLat,
    pub zoom: f64,
}

/// The base map cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapInitError {
    #[error("map key is not configured: {0}")]
    MissingKey(String),
    #[error("malformed key response: {0}")]
    Malformed(String),
}

/// Turn the credential reply into map settings. A missing key is a hard
/// stop: the caller must not construct the renderer.
///
/// # Errors
///
/// [`MapInitError::MissingKey`] on a non-2xx status or an empty key,
/// [`MapInitError::Malformed`] if a 2xx body is not the expected JSON.
pub fn map_init_from_response(response: &KeyResponse) -> Result<MapInit, MapInitError> {
    let parsed = serde_json::from_str::<KeyBody>(&response.body);
    if !(200..300).contains(&response.status) {
        let reason = match parsed {
            Ok(KeyBody { error: Some(e), .. }) => e,
            _ => format!("status {}", response.status),
        };
        return Err(MapInitError::MissingKey(reason));
    }
    let body = parsed.map_err(|e| MapInitError::Malformed(e.to_string()))?;
    let key = body.key.filter(|k| !k.trim().is_empty()).ok_or_else(|| MapInitError::MissingKey("empty key".into()))?;
    Ok(MapInit {
        style_url: format!("{STYLE_URL}?key={}", key.trim()),
        center: LngLat::new(HOME_LNG, HOME_LAT),
        zoom: HOME_ZOOM,
    })
}

/// Base map state as the host should present it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MapStatus {
    #[default]
    Idle,
    Loading,
    Ready(MapInit),
    /// Shown to the user; no renderer is built.
    Failed(MapInitError),
}

/// Proof of which mount a load was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// One mounted map view.
pub struct MapView<K: KvStore, F: FrameScheduler> {
    pub core: EngineCore,
    clock: AnimationClock,
    storage: K,
    scheduler: F,
    generation: u64,
    mounted: bool,
    status: MapStatus,
}

impl<K: KvStore, F: FrameScheduler> MapView<K, F> {
    #[must_use]
    pub fn new(storage: K, scheduler: F) -> Self {
        Self {
            core: EngineCore::new(),
            clock: AnimationClock::new(),
            storage,
            scheduler,
            generation: 0,
            mounted: false,
            status: MapStatus::Idle,
        }
    }

    // --- Lifecycle ---

    /// Load persisted state and start the animation clock.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        let state = persist::load_state(&self.storage);
        self.core = EngineCore::new();
        self.core.load(state);
        self.generation += 1;
        self.mounted = true;
        self.status = MapStatus::Idle;
        self.clock.start(&mut self.scheduler);
        log::info!(
            "map view mounted (generation {}, {} markers, {} signals)",
            self.generation,
            self.core.store.markers().len(),
            self.core.store.signals().len()
        );
    }

    /// Stop the clock and detach. In-flight loads are dropped on arrival.
    pub fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.clock.stop(&mut self.scheduler);
        self.mounted = false;
        log::info!("map view torn down (generation {})", self.generation);
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[must_use]
    pub fn status(&self) -> &MapStatus {
        &self.status
    }

    #[must_use]
    pub fn storage(&self) -> &K {
        &self.storage
    }

    #[must_use]
    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    // --- Async loads ---

    /// Mark the credential and dataset loads as started for this mount.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.status = MapStatus::Loading;
        LoadTicket { generation: self.generation }
    }

    fn accepts(&self, ticket: LoadTicket) -> bool {
        self.mounted && ticket.generation == self.generation
    }

    /// Apply the credential reply. Returns `None` if the ticket is stale.
    pub fn finish_credential(&mut self, ticket: LoadTicket, response: &KeyResponse) -> Option<Result<MapInit, MapInitError>> {
        if !self.accepts(ticket) {
            log::debug!("dropping credential result for generation {}", ticket.generation);
            return None;
        }
        let result = map_init_from_response(response);
        self.status = match &result {
            Ok(init) => MapStatus::Ready(init.clone()),
            Err(e) => {
                log::error!("map initialization failed: {e}");
                MapStatus::Failed(e.clone())
            }
        };
        Some(result)
    }

    /// Apply the dataset fetch result. On failure the parish layer stays
    /// empty and everything else keeps working.
    pub fn finish_dataset(&mut self, ticket: LoadTicket, result: Result<String, LoadError>) -> Vec<Action> {
        if !self.accepts(ticket) {
            log::debug!("dropping dataset result for generation {}", ticket.generation);
            return Vec::new();
        }
        match result.and_then(|text| BoundaryDataset::from_geojson(&text)) {
            Ok(dataset) => {
                log::info!("boundary dataset loaded: {} regions", dataset.len());
                self.core.set_dataset(Arc::new(dataset))
            }
            Err(e) => {
                log::warn!("boundary dataset unavailable: {e}");
                Vec::new()
            }
        }
    }

    // --- Persistence / frames ---

    /// Write the current state through the storage port.
    ///
    /// # Errors
    ///
    /// Propagates the first [`StorageError`] from the backend.
    pub fn save(&mut self) -> Result<(), StorageError> {
        persist::save_state(&mut self.storage, &self.core.store, &self.core.registry, &self.core.stats)
    }

    /// One display frame. `None` once torn down.
    pub fn on_frame(&mut self, now_ms: f64) -> Option<WaveFrame> {
        self.clock.tick(now_ms, &self.core.store, &mut self.scheduler)
    }
}
