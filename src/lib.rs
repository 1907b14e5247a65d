// Interval Grid Library
// Calendar-aligned interval editing core: model, geometry, snapping, gestures and batch edits

pub mod editor;
pub mod error;
pub mod interaction;
pub mod models;
pub mod services;
pub mod utils;

pub use editor::IntervalEditor;
pub use error::{EditorError, EditorResult};
