//! Person registry and the explorer search over everything on the map.
//!
//! People are keyed by their national id number. A person may be linked to a
//! location, which the explorer uses to fly the camera there.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use serde::{Deserialize, Serialize};

use crate::doc::{EntityStore, SignalKind};
use crate::geo::LngLat;

/// A registered person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// National id number, unique within the registry.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub whatsapp: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng_lat: Option<LngLat>,
}

impl Person {
    #[must_use]
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            whatsapp: String::new(),
            address: String::new(),
            email: String::new(),
            lng_lat: None,
        }
    }
}

/// Why a registration was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("id and name are required")]
    MissingField,
    #[error("person {0} is already registered")]
    Duplicate(String),
}

/// Registered people in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    people: Vec<Person>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted records, dropping invalid or duplicate entries.
    #[must_use]
    pub fn from_people(people: Vec<Person>) -> Self {
        let mut registry = Self::new();
        for person in people {
            let id = person.id.clone();
            if let Err(e) = registry.register(person) {
                log::warn!("registry entry {id:?} dropped: {e}");
            }
        }
        registry
    }

    #[must_use]
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.people.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Add a person. Id and name are trimmed and must be non-empty.
    ///
    /// # Errors
    ///
    /// [`RegistryError::MissingField`] if id or name is blank,
    /// [`RegistryError::Duplicate`] if the id is already registered.
    pub fn register(&mut self, mut person: Person) -> Result<(), RegistryError> {
        person.id = person.id.trim().to_owned();
        person.name = person.name.trim().to_owned();
        if person.id.is_empty() || person.name.is_empty() {
            return Err(RegistryError::MissingField);
        }
        if self.get(&person.id).is_some() {
            return Err(RegistryError::Duplicate(person.id));
        }
        self.people.push(person);
        Ok(())
    }

    /// Remove a person. Returns `false` if nobody has this id.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.people.len();
        self.people.retain(|p| p.id != id);
        let removed = self.people.len() != before;
        if !removed {
            log::debug!("registry remove: no person {id}");
        }
        removed
    }
}

// =============================================================
// Explorer
// =============================================================

/// What an explorer row points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExploreKind {
    Marker,
    Signal,
    Person,
}

/// One explorer row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreItem {
    pub kind: ExploreKind,
    pub id: String,
    pub label: String,
    /// Where to fly when the row is picked. People may have none.
    pub location: Option<LngLat>,
}

/// List markers, signals and people matching `filter`.
///
/// Matching is a case-insensitive substring test on the id, and for people
/// also on the name. An empty filter lists everything.
#[must_use]
pub fn explore(filter: &str, store: &EntityStore, registry: &Registry) -> Vec<ExploreItem> {
    let needle = filter.trim().to_lowercase();
    let hit = |s: &str| needle.is_empty() || s.to_lowercase().contains(&needle);

    let markers = store.markers().iter().filter(|m| hit(&m.id)).map(|m| ExploreItem {
        kind: ExploreKind::Marker,
        id: m.id.clone(),
        label: m.id.clone(),
        location: Some(m.coordinate),
    });
    let signals = store.signals().iter().filter(|s| hit(&s.id)).map(|s| {
        let kind = match s.kind {
            SignalKind::Pulse => "PULSE",
            SignalKind::Sector => "SECTOR",
        };
        ExploreItem {
            kind: ExploreKind::Signal,
            id: s.id.clone(),
            label: format!("{kind} {}", s.id),
            location: Some(s.origin),
        }
    });
    let people = registry.people().iter().filter(|p| hit(&p.id) || hit(&p.name)).map(|p| ExploreItem {
        kind: ExploreKind::Person,
        id: p.id.clone(),
        label: p.name.clone(),
        location: p.lng_lat,
    });

    markers.chain(signals).chain(people).collect()
}
