//! UI layer for the desktop form: app shell and response styling.

pub mod app;
pub mod theme;

pub use app::CurioNestApp;
