//! SketchWire core: the scene-graph data model for a connected-vector
//! drawing editor.
//!
//! Shapes reference their vertices through stable handles into a single
//! [`model::Store`] arena; two shapes holding the same handle are connected
//! at that vertex. On top of the model sit the identity-preserving clone,
//! exact bounds math, and the [`canvas::Canvas`] document with its editing
//! operations.

pub mod canvas;
pub mod clone;
pub mod geom;
pub mod id;
pub mod model;
pub mod persist;

pub use canvas::Canvas;
pub use clone::{CloneMap, clone_items, clone_node, clone_opt};
pub use id::NodeId;
pub use model::*;
