//! Desktop shell for the TextCompare diff page.
//!
//! The GTK front end lives behind the `gui` feature; everything here builds
//! without native GUI libraries.

pub mod content;
pub mod paths;
pub mod settings;
pub mod state_store;

pub use state_store::{Bounds, GeometryEvent, GeometrySource, WindowState, WindowStateStore};
