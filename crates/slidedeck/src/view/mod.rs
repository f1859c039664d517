//! Read-only projections of the navigation state for drawing.

pub mod display;
pub mod progress;

pub use display::DisplayModel;
pub use progress::{Marker, Progress};
