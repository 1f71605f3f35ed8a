//! Service layer: artifact format, repository, and the editor controller.
//!
//! `editor` drives `gallery`, which speaks the `artifact` format to a
//! [`crate::store::ContentStore`].

pub mod artifact;
pub mod editor;
pub mod gallery;
