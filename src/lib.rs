//! Headless UI widgets with a ratatui gallery.
//!
//! Every widget in [`widgets`] is a plain state machine: input methods return
//! events and the host decides how to draw. The [`app`] and [`ui`] modules
//! host one of each in a terminal.

pub mod app;
pub mod config;
pub mod error;
pub mod suggest;
pub mod theme;
pub mod ui;
pub mod util;
pub mod widgets;

pub use error::WidgetError;
