//! Sift - search widget core for static content sites
//!
//! This library implements the client-side search widget of a statically
//! generated site: a one-shot loader for the prebuilt search document, a
//! Tantivy index over weighted record fields, debounced query execution,
//! HTML result rendering with match highlighting, and an overlay controller
//! that owns selection and keyboard navigation.
//!
//! The host UI (browser shell, test harness) is reached only through the
//! [`surface::Surface`] capability trait.

pub mod config;
pub mod index;
pub mod interface;
pub mod loader;
pub mod models;
pub mod render;
pub mod surface;
mod widget;

pub use config::{Platform, WidgetConfig};
pub use interface::*;
pub use widget::SearchWidget;
