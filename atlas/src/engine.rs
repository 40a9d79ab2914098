use std::sync::Arc;

use serde::Serialize;

use crate::camera::Camera;
use crate::dataset::BoundaryDataset;
use crate::doc::{EntityStore, Marker, MarkerPatch, Signal, SignalPatch, radius_km_from_m};
use crate::geo::LngLat;
use crate::hit;
use crate::input::{ControlPatch, ControlValues, EntityKind, EntityRef, PlacementConfig, RenderOptions, Tool, UiState};
use crate::persist::PersistedState;
use crate::registry::{self, ExploreItem, ExploreKind, Person, Registry, RegistryError};
use crate::render::{self, RenderOutput};
use crate::stats::{StatsBook, StatsPatch};
use crate::style::{ParishStyle, ParishStylePatch};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from handlers for the host to process.
///
/// On the wire each action is `{"type": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Action {
    /// Entity or style state changed; call [`EngineCore::materialize`].
    RenderNeeded,
    SelectionChanged(Option<EntityRef>),
    EntityCreated(EntityRef),
    EntityDeleted(EntityRef),
    /// Move the base map camera.
    FlyTo { center: LngLat, zoom: f64 },
    /// Parish under the pointer changed. `name` feeds the hover popup.
    HoverChanged { region: Option<String>, name: Option<String> },
}

/// Core application state: everything the map view owns apart from the
/// browser handles, so it can be driven and tested without a renderer.
///
/// Handlers receive the pointer coordinate and read the current tool and
/// placement config from `self` at call time; nothing is captured ahead of
/// the event.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub store: EntityStore,
    pub ui: UiState,
    pub config: PlacementConfig,
    pub camera: Camera,
    /// Loaded once per view, shared read-only.
    pub dataset: Arc<BoundaryDataset>,
    pub registry: Registry,
    pub stats: StatsBook,
    pub options: RenderOptions,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Hydrate from persisted state. Clears any selection.
    pub fn load(&mut self, state: PersistedState) {
        self.store.load(state.markers, state.signals, state.overrides);
        self.registry = Registry::from_people(state.people);
        self.stats = state.stats;
        self.ui.selected = None;
    }

    /// Install the boundary dataset once it has loaded.
    pub fn set_dataset(&mut self, dataset: Arc<BoundaryDataset>) -> Vec<Action> {
        self.dataset = dataset;
        vec![Action::RenderNeeded]
    }

    /// Mirror the base map camera after a user pan or zoom.
    pub fn sync_camera(&mut self, center: LngLat, zoom: f64) {
        self.camera.sync(center, zoom);
    }

    // --- Tool / pointer ---

    /// Arm `tool`, or disarm it if it is already armed.
    pub fn arm_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.ui.tool = self.ui.tool.toggled(tool);
        Vec::new()
    }

    /// A click on the map surface.
    ///
    /// With a tool armed this places the entity, disarms the tool, and
    /// selects the new entity in one step. Otherwise it hit-tests and selects
    /// whatever is on top, or clears the selection on a miss.
    pub fn on_map_click(&mut self, pt: LngLat) -> Vec<Action> {
        match self.ui.tool {
            Tool::None => {
                let target = hit::hit_test(pt, &self.store, &self.dataset, &self.camera);
                self.set_selection(target)
            }
            tool => self.place(tool, pt),
        }
    }

    fn place(&mut self, tool: Tool, pt: LngLat) -> Vec<Action> {
        let created = match tool.signal_kind() {
            Some(kind) => {
                let c = &self.config;
                let signal = Signal::new(kind, pt, radius_km_from_m(c.radius_m), c.azimuth_deg, c.angle_deg, &c.color);
                EntityRef::signal(self.store.add_signal(signal))
            }
            None => EntityRef::marker(self.store.add_marker(Marker::new(pt))),
        };
        self.ui.tool = Tool::None;
        self.ui.selected = Some(created.clone());
        vec![
            Action::EntityCreated(created.clone()),
            Action::SelectionChanged(Some(created)),
            Action::RenderNeeded,
        ]
    }

    /// Track the parish under the pointer for hover styling and the popup.
    pub fn on_pointer_move(&mut self, pt: LngLat) -> Vec<Action> {
        let (region, name) = match hit::hit_parish(pt, &self.dataset).and_then(|id| self.dataset.region(id)) {
            Some(r) => (Some(r.id.clone()), Some(r.name.clone())),
            None => (None, None),
        };
        if region == self.ui.hovered_parish {
            return Vec::new();
        }
        self.ui.hovered_parish.clone_from(&region);
        vec![Action::HoverChanged { region, name }, Action::RenderNeeded]
    }

    // --- Selection ---

    /// Select an entity. Ids that do not exist are ignored.
    pub fn select(&mut self, target: EntityRef) -> Vec<Action> {
        if !self.exists(&target) {
            log::debug!("select: no {:?} {}", target.kind, target.id);
            return Vec::new();
        }
        self.set_selection(Some(target))
    }

    pub fn deselect(&mut self) -> Vec<Action> {
        self.set_selection(None)
    }

    fn set_selection(&mut self, target: Option<EntityRef>) -> Vec<Action> {
        if self.ui.selected == target {
            return Vec::new();
        }
        self.ui.selected.clone_from(&target);
        vec![Action::SelectionChanged(target), Action::RenderNeeded]
    }

    fn exists(&self, target: &EntityRef) -> bool {
        match target.kind {
            EntityKind::Marker => self.store.marker(&target.id).is_some(),
            EntityKind::Signal => self.store.signal(&target.id).is_some(),
            EntityKind::Parish => self.dataset.region(&target.id).is_some(),
        }
    }

    /// Delete the selected marker or signal and return to idle. Parishes are
    /// static and cannot be deleted.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(target) = self.ui.selected.clone() else {
            return Vec::new();
        };
        let removed = match target.kind {
            EntityKind::Marker => self.store.remove_marker(&target.id),
            EntityKind::Signal => self.store.remove_signal(&target.id),
            EntityKind::Parish => return Vec::new(),
        };
        self.ui.selected = None;
        let mut actions = Vec::with_capacity(3);
        if removed {
            actions.push(Action::EntityDeleted(target));
        }
        actions.push(Action::SelectionChanged(None));
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Control surface ---

    /// Values the signal controls should show: the selected signal's, else
    /// the placement defaults.
    #[must_use]
    pub fn control_values(&self) -> ControlValues {
        match self.selected_signal() {
            Some(signal) => ControlValues::from(signal),
            None => ControlValues::from(&self.config),
        }
    }

    /// Apply a control edit to the selected signal, or to the placement
    /// defaults when no signal is selected.
    pub fn update_controls(&mut self, patch: &ControlPatch) -> Vec<Action> {
        if let Some(id) = self.ui.selected_of(EntityKind::Signal).map(str::to_owned) {
            if self.store.update_signal(&id, &SignalPatch::from(patch)) {
                return vec![Action::RenderNeeded];
            }
            return Vec::new();
        }
        self.config.apply(patch);
        Vec::new()
    }

    fn selected_signal(&self) -> Option<&Signal> {
        self.ui.selected_of(EntityKind::Signal).and_then(|id| self.store.signal(id))
    }

    /// Rotate the selected marker.
    pub fn set_marker_rotation(&mut self, rotation_deg: f64) -> Vec<Action> {
        let Some(id) = self.ui.selected_of(EntityKind::Marker).map(str::to_owned) else {
            return Vec::new();
        };
        if self.store.update_marker(&id, &MarkerPatch { rotation: Some(rotation_deg) }) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Parish styling ---

    /// Style the parish controls should show: the selected parish's resolved
    /// style, else the global defaults.
    #[must_use]
    pub fn parish_style_values(&self) -> ParishStyle {
        match self.ui.selected_of(EntityKind::Parish) {
            Some(id) => self.store.resolve_parish(id),
            None => self.store.parish_defaults().clone(),
        }
    }

    /// Edit the selected parish's override, or the global defaults when no
    /// parish is selected.
    pub fn edit_parish_style(&mut self, patch: &ParishStylePatch) -> Vec<Action> {
        let changed = match self.ui.selected_of(EntityKind::Parish).map(str::to_owned) {
            Some(id) => self.store.set_parish_override(&id, patch),
            None => self.store.set_global_parish_defaults(patch),
        };
        if changed { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Drop the selected parish's whole override.
    pub fn reset_selected_parish(&mut self) -> Vec<Action> {
        let Some(id) = self.ui.selected_of(EntityKind::Parish).map(str::to_owned) else {
            return Vec::new();
        };
        if self.store.reset_parish_override(&id) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    pub fn set_isometric(&mut self, on: bool) -> Vec<Action> {
        if self.options.isometric == on {
            return Vec::new();
        }
        self.options.isometric = on;
        vec![Action::RenderNeeded]
    }

    pub fn set_outline_only(&mut self, on: bool) -> Vec<Action> {
        if self.options.outline_only == on {
            return Vec::new();
        }
        self.options.outline_only = on;
        vec![Action::RenderNeeded]
    }

    // --- Registry / explorer / stats ---

    /// # Errors
    ///
    /// See [`Registry::register`].
    pub fn register_person(&mut self, person: Person) -> Result<(), RegistryError> {
        self.registry.register(person)
    }

    pub fn remove_person(&mut self, id: &str) -> bool {
        self.registry.remove(id)
    }

    #[must_use]
    pub fn explore(&self, filter: &str) -> Vec<ExploreItem> {
        registry::explore(filter, &self.store, &self.registry)
    }

    /// Pick an explorer row: select the entity it names, if any, and fly to
    /// its location.
    pub fn select_from_explorer(&mut self, item: &ExploreItem) -> Vec<Action> {
        let mut actions = match item.kind {
            ExploreKind::Marker => self.select(EntityRef::marker(item.id.as_str())),
            ExploreKind::Signal => self.select(EntityRef::signal(item.id.as_str())),
            ExploreKind::Person => Vec::new(),
        };
        if let Some(center) = item.location {
            self.camera.fly_to(center);
            actions.push(Action::FlyTo { center, zoom: self.camera.zoom });
        }
        actions
    }

    pub fn update_stats(&mut self, region_id: &str, patch: &StatsPatch) {
        self.stats.update(region_id, patch);
    }

    // --- Render ---

    /// Current renderer sources.
    #[must_use]
    pub fn materialize(&self) -> RenderOutput {
        render::materialize(&self.store, &self.ui, &self.dataset, self.options)
    }

    /// Name of the hovered parish, for the popup.
    #[must_use]
    pub fn hovered_name(&self) -> Option<&str> {
        let id = self.ui.hovered_parish.as_deref()?;
        self.dataset.region(id).map(|r| r.name.as_str())
    }
}
