//! Field/screen rendering and navigation engine for the instrument cluster.
//!
//! Screens are declared as static tables of [`Layout`] records, each binding a
//! [`Field`] to a rectangle on the display. The [`Engine`] owns the runtime
//! state and redraws only what changed every tick:
//!
//! - [`field`]: the displayable/interactive units (text, editable, menu, graph, custom)
//! - [`layout`]: placement of a field on screen, color modes, borders
//! - `render`: variant dispatch and the dirty-tracked redraw pass
//! - [`navigator`]: the bounded stack of expanded menus and scroll window
//! - [`editable`]: numeric/enum values edited in place
//! - [`graph`]: rolling telemetry plots with threshold overlays
//! - [`timing`]: the blink clock shared by animations and graph sampling
//! - [`screen`] / [`engine`]: screen lifecycle, press dispatch and the per-tick driver
//! - [`draw`]: the primitive drawing port and its embedded-graphics adapter
//!
//! # no_std Compatibility
//!
//! This crate is `no_std` and never allocates. Host tests link std.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

#[macro_use]
mod logging;

pub mod colors;
pub mod config;
pub mod draw;
pub mod editable;
pub mod engine;
pub mod field;
pub mod fonts;
pub mod graph;
pub mod input;
pub mod layout;
pub mod navigator;
mod render;
pub mod screen;
pub mod thresholds;
pub mod timing;
pub mod widgets;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use config::EngineConfig;
pub use draw::{Canvas, DrawingPort};
pub use editable::{EditKind, Editable, NumberCell, NumberSpec};
pub use engine::Engine;
pub use field::{CustomRender, Field, FieldKind, Scrollable};
pub use graph::{Graph, GraphCache};
pub use input::{ButtonEvents, ButtonLevels, ButtonMap};
pub use layout::{Area, Border, ColorMode, Coord, Layout, Modifier};
pub use screen::{PressHandler, Response, Screen, ScreenHooks};
pub use thresholds::{ThresholdLevels, ThresholdMode, Thresholds};
pub use widgets::WarningText;
