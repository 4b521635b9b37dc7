//! SketchWire rendering: hit testing over the scene store, and the Vello
//! paint collaborator that turns a canvas into drawing commands.

pub mod hit;
pub mod paint;

pub use hit::{HIT_RADIUS, contains_at, intersects, intersects_items};
pub use paint::paint_canvas;
