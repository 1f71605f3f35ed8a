//! Pixel grid editor with a versioned remote gallery.
//!
//! | Module | Role |
//! |---|---|
//! | [`config`] | environment-driven settings |
//! | [`error`] | [`error::ErrorCode`] classification |
//! | [`cache`] | local durable cache for editor state and credentials |
//! | [`store`] | versioned content store client (GitHub contents API) |
//! | [`services`] | artifact format, gallery repository, editor controller |
//!
//! Painting itself lives in the headless `canvas` crate.

pub mod cache;
pub mod config;
pub mod error;
pub mod services;
pub mod store;
