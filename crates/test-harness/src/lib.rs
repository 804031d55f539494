//! Shared fixtures and assertions for cross-crate tests.
//!
//! # Key Components
//!
//! - [`fixtures`] — canonical box model/geometry files as JSON strings
//! - [`assertions`] — coordinate-vector comparison helpers

pub mod assertions;
pub mod fixtures;

pub use assertions::{assert_coords_close, assert_vectors_close};
pub use fixtures::HarnessError;
