//! Browser glue: `localStorage`, `requestAnimationFrame`, and fetches.
//!
//! Compiled only with the `web` feature. Everything here is a thin adapter
//! from a browser API to one of the ports the core defines, so the core
//! stays testable natively.
//!
//! The page drives the map through the exported [`AtlasMap`] handle. Values
//! cross the boundary as JSON strings: actions, frames and renderer sources
//! go out, control and style patches come in.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_net::http::Request;
use js_sys::Function;
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::clock::{FrameScheduler, WaveFrame};
use crate::dataset::LoadError;
use crate::engine::{Action, EngineCore};
use crate::geo::LngLat;
use crate::input::{ControlPatch, EntityRef, Tool};
use crate::style::ParishStylePatch;
use crate::persist::{KvStore, StorageError};
use crate::view::{DATASET_URL, KEY_ENDPOINT, KeyResponse, MapInit, MapInitError, MapView};

/// The view type the browser host drives.
pub type WebView = MapView<LocalStorage, RafScheduler>;
pub type SharedView = Rc<RefCell<WebView>>;

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Route `log` output to the browser console. Returns `false` if a logger
/// was already installed.
pub fn init_logging() -> bool {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).is_ok()
}

/// Runs when the module is instantiated.
#[wasm_bindgen(start)]
pub fn boot() {
    if !init_logging() {
        log::debug!("console logger already installed");
    }
}

// =============================================================
// Storage
// =============================================================

/// [`KvStore`] over `window.localStorage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

fn local_storage() -> Option<web_sys::Storage> {
    match web_sys::window()?.local_storage() {
        Ok(storage) => storage,
        Err(e) => {
            log::warn!("localStorage unavailable: {e:?}");
            None
        }
    }
}

impl KvStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        match local_storage()?.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("localStorage read of {key} failed: {e:?}");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = local_storage().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write { key: key.to_owned(), reason: format!("{e:?}") })
    }
}

// =============================================================
// Frames
// =============================================================

/// [`FrameScheduler`] over `requestAnimationFrame`.
///
/// The frame callback lives in a shared slot filled by [`start`], because
/// the callback needs the view and the view owns this scheduler.
#[derive(Default)]
pub struct RafScheduler {
    slot: FrameSlot,
    handle: Option<i32>,
}

impl RafScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let slot = self.slot.borrow();
        let Some(cb) = slot.as_ref() else {
            return;
        };
        match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => log::warn!("requestAnimationFrame failed: {e:?}"),
        }
    }

    fn cancel_frame(&mut self) {
        let (Some(handle), Some(window)) = (self.handle.take(), web_sys::window()) else {
            return;
        };
        if let Err(e) = window.cancel_animation_frame(handle) {
            log::warn!("cancelAnimationFrame failed: {e:?}");
        }
    }
}

// =============================================================
// Fetches
// =============================================================

/// Fetch the map credential. Network failures come back as a status-0
/// response so they surface through the same hard-stop path.
pub async fn fetch_key() -> KeyResponse {
    match Request::get(KEY_ENDPOINT).send().await {
        Ok(resp) => {
            let status = resp.status();
            let body = match resp.text().await {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("reading key response failed: {e}");
                    String::new()
                }
            };
            KeyResponse { status, body }
        }
        Err(e) => KeyResponse { status: 0, body: serde_json::json!({ "error": e.to_string() }).to_string() },
    }
}

/// Fetch the boundary dataset text.
///
/// # Errors
///
/// [`LoadError::Network`] on transport failure, [`LoadError::Status`] on a
/// non-2xx reply.
pub async fn fetch_dataset() -> Result<String, LoadError> {
    let resp = Request::get(DATASET_URL).send().await.map_err(|e| LoadError::Network(e.to_string()))?;
    if !(200..300).contains(&resp.status()) {
        return Err(LoadError::Status(resp.status()));
    }
    resp.text().await.map_err(|e| LoadError::Network(e.to_string()))
}

// =============================================================
// Bootstrap
// =============================================================

#[must_use]
pub fn new_view() -> SharedView {
    Rc::new(RefCell::new(MapView::new(LocalStorage, RafScheduler::new())))
}

/// Mount the view, wire the frame loop, and start both loads.
///
/// `on_wave` receives every animation frame, `on_ready` the credential
/// outcome (the host builds the base map only on `Ok`), and `on_actions` the
/// actions produced once the dataset lands.
pub fn start<W, R, A>(view: &SharedView, mut on_wave: W, on_ready: R, on_actions: A)
where
    W: FnMut(&WaveFrame) + 'static,
    R: FnOnce(Result<MapInit, MapInitError>) + 'static,
    A: FnOnce(Vec<Action>) + 'static,
{
    let slot = Rc::clone(&view.borrow().scheduler().slot);
    let weak = Rc::downgrade(view);
    *slot.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        let Some(view) = weak.upgrade() else {
            return;
        };
        let frame = view.borrow_mut().on_frame(now);
        if let Some(frame) = frame {
            on_wave(&frame);
        }
    }) as Box<dyn FnMut(f64)>));

    view.borrow_mut().mount();
    let ticket = view.borrow_mut().begin_load();

    let for_key = Rc::clone(view);
    spawn_local(async move {
        let response = fetch_key().await;
        let outcome = for_key.borrow_mut().finish_credential(ticket, &response);
        if let Some(outcome) = outcome {
            on_ready(outcome);
        }
    });

    let for_dataset = Rc::clone(view);
    spawn_local(async move {
        let result = fetch_dataset().await;
        let actions = for_dataset.borrow_mut().finish_dataset(ticket, result);
        on_actions(actions);
    });
}

// =============================================================
// Exported handle
// =============================================================

fn to_json<T: Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("encoding for host failed: {e}");
            "null".to_owned()
        }
    }
}

fn from_json<T: DeserializeOwned>(what: &str, text: &str) -> Result<T, JsValue> {
    serde_json::from_str(text).map_err(|e| JsValue::from_str(&format!("invalid {what}: {e}")))
}

fn from_value<T: DeserializeOwned>(what: &str, value: serde_json::Value) -> Result<T, JsValue> {
    serde_json::from_value(value).map_err(|e| JsValue::from_str(&format!("invalid {what}: {e}")))
}

fn notify(callback: &Function, payload: &str) {
    if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(payload)) {
        log::warn!("host callback threw: {e:?}");
    }
}

/// One map view as seen from the page.
///
/// Every handler returns the resulting actions as a JSON array; the page
/// calls [`AtlasMap::materialize`] when it sees a `renderNeeded` action.
#[wasm_bindgen]
pub struct AtlasMap {
    view: SharedView,
}

impl Default for AtlasMap {
    fn default() -> Self {
        Self { view: new_view() }
    }
}

impl AtlasMap {
    fn apply<F>(&self, handler: F) -> String
    where
        F: FnOnce(&mut EngineCore) -> Vec<Action>,
    {
        let actions = handler(&mut self.view.borrow_mut().core);
        to_json(&actions)
    }
}

#[wasm_bindgen]
impl AtlasMap {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> AtlasMap {
        Self::default()
    }

    /// Load saved state, start the wave clock, and fetch the credential and
    /// dataset.
    ///
    /// `on_wave` gets every frame, `on_ready` the map settings or
    /// `{"error": ...}` (build no base map then), `on_actions` the actions
    /// produced when the dataset lands. Mounting a mounted view does nothing.
    pub fn mount(&self, on_wave: Function, on_ready: Function, on_actions: Function) {
        if self.view.borrow().is_mounted() {
            return;
        }
        start(
            &self.view,
            move |frame| notify(&on_wave, &to_json(frame)),
            move |outcome| {
                let payload = match outcome {
                    Ok(init) => to_json(&init),
                    Err(e) => to_json(&serde_json::json!({ "error": e.to_string() })),
                };
                notify(&on_ready, &payload);
            },
            move |actions| notify(&on_actions, &to_json(&actions)),
        );
    }

    /// Stop the clock and release the frame callback. Loads still in flight
    /// are dropped when they land.
    pub fn teardown(&self) {
        let mut view = self.view.borrow_mut();
        view.teardown();
        *view.scheduler().slot.borrow_mut() = None;
    }

    /// Persist markers, signals, overrides, people and stats.
    ///
    /// # Errors
    ///
    /// The storage failure message.
    pub fn save(&self) -> Result<(), JsValue> {
        self.view.borrow_mut().save().map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn sync_camera(&self, lng: f64, lat: f64, zoom: f64) {
        self.view.borrow_mut().core.sync_camera(LngLat::new(lng, lat), zoom);
    }

    pub fn on_map_click(&self, lng: f64, lat: f64) -> String {
        self.apply(|core| core.on_map_click(LngLat::new(lng, lat)))
    }

    pub fn on_pointer_move(&self, lng: f64, lat: f64) -> String {
        self.apply(|core| core.on_pointer_move(LngLat::new(lng, lat)))
    }

    /// `tool` is one of `place_marker`, `place_pulse`, `place_sector`, `none`.
    ///
    /// # Errors
    ///
    /// Unknown tool name.
    pub fn arm_tool(&self, tool: &str) -> Result<String, JsValue> {
        let tool: Tool = from_value("tool", serde_json::Value::String(tool.to_owned()))?;
        Ok(self.apply(|core| core.arm_tool(tool)))
    }

    /// # Errors
    ///
    /// Unknown entity kind.
    pub fn select(&self, kind: &str, id: &str) -> Result<String, JsValue> {
        let target: EntityRef = from_value("entity", serde_json::json!({ "kind": kind, "id": id }))?;
        Ok(self.apply(|core| core.select(target)))
    }

    pub fn deselect(&self) -> String {
        self.apply(EngineCore::deselect)
    }

    pub fn delete_selected(&self) -> String {
        self.apply(EngineCore::delete_selected)
    }

    pub fn control_values(&self) -> String {
        to_json(&self.view.borrow().core.control_values())
    }

    /// # Errors
    ///
    /// `patch` is not a control patch object.
    pub fn update_controls(&self, patch: &str) -> Result<String, JsValue> {
        let patch: ControlPatch = from_json("control patch", patch)?;
        Ok(self.apply(|core| core.update_controls(&patch)))
    }

    pub fn set_marker_rotation(&self, rotation_deg: f64) -> String {
        self.apply(|core| core.set_marker_rotation(rotation_deg))
    }

    pub fn parish_style_values(&self) -> String {
        to_json(&self.view.borrow().core.parish_style_values())
    }

    /// # Errors
    ///
    /// `patch` is not a parish style patch object.
    pub fn edit_parish_style(&self, patch: &str) -> Result<String, JsValue> {
        let patch: ParishStylePatch = from_json("style patch", patch)?;
        Ok(self.apply(|core| core.edit_parish_style(&patch)))
    }

    pub fn reset_selected_parish(&self) -> String {
        self.apply(EngineCore::reset_selected_parish)
    }

    pub fn set_isometric(&self, on: bool) -> String {
        self.apply(|core| core.set_isometric(on))
    }

    pub fn set_outline_only(&self, on: bool) -> String {
        self.apply(|core| core.set_outline_only(on))
    }

    /// Renderer sources for the current state.
    pub fn materialize(&self) -> String {
        to_json(&self.view.borrow().core.materialize())
    }

    /// Name for the hover popup, if the pointer is over a parish.
    pub fn hovered_name(&self) -> Option<String> {
        self.view.borrow().core.hovered_name().map(str::to_owned)
    }
}
