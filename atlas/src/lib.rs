//! Map core for the parish signal planner.
//!
//! This crate owns everything between the user's pointer and the map
//! renderer: the entity model (markers, signals, parish style overrides),
//! the tool and selection state machine, hit-testing, spherical sector
//! geometry, the render sync that turns state into GeoJSON sources, and the
//! animation clock for the sweep wave. The host (browser glue under the
//! `web` feature, or tests) wires pointer events in and renderer sources
//! out, and persists state through a key-value port.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EngineCore`] and the [`engine::Action`]s it emits |
//! | [`view`] | Mount/teardown lifecycle and async load guards |
//! | [`doc`] | Entity store: markers, signals, parish overrides |
//! | [`style`] | Parish style defaults, patches, and resolution |
//! | [`input`] | Tools, selection, placement config, control surface |
//! | [`hit`] | Priority hit-testing |
//! | [`render`] | Render sync (`materialize`) |
//! | [`clock`] | Sweep wave animation and the frame scheduler port |
//! | [`geo`] | Great-circle geometry kernel |
//! | [`geojson`] | GeoJSON wire types |
//! | [`camera`] | Map camera mirror for pixel-to-ground conversion |
//! | [`dataset`] | Parish boundary dataset |
//! | [`persist`] | Key-value persistence port |
//! | [`registry`] | Person registry and explorer search |
//! | [`stats`] | Per-parish statistics |
//! | [`consts`] | Shared numeric constants |
//! | `web` | Browser adapters (feature `web`) |

pub mod camera;
pub mod clock;
pub mod consts;
pub mod dataset;
pub mod doc;
pub mod engine;
pub mod geo;
pub mod geojson;
pub mod hit;
pub mod input;
pub mod persist;
pub mod registry;
pub mod render;
pub mod stats;
pub mod style;
pub mod view;
#[cfg(feature = "web")]
pub mod web;
