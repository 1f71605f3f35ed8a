//! Headless pixel grid and paint engine for the pixelboard editor.
//!
//! This crate owns everything between a raw pointer position and a cell
//! write: the grid model, the mapping from on-screen coordinates to cells,
//! and the stroke state machine that turns pointer events into de-duplicated
//! paint operations. It has no UI or I/O dependencies. The host feeds it
//! events through [`input::StrokeInput`] and reacts to the returned
//! [`engine::Action`]s (repaint a cell, persist the grid).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Paint session state machine and the [`engine::EngineCore`] host wrapper |
//! | [`grid`] | Grid dimensions, cell colors, and the selected color |
//! | [`color`] | RGB color values and their `#rrggbb` text form |
//! | [`mapper`] | Screen point to cell index conversion |
//! | [`input`] | Pointer buttons, stroke state, and the input trait |
//! | [`preview`] | Plain-text rendering of a grid |
//! | [`consts`] | Default dimensions, colors, and limits |

pub mod color;
pub mod consts;
pub mod engine;
pub mod grid;
pub mod input;
pub mod mapper;
pub mod preview;
