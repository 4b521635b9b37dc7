//! SketchWire editing layer: pointer tools, editing commands, and the
//! [`Editor`] shell that hosts embed.
//!
//! The host translates device events into canvas-local presses, moves,
//! and releases; every document mutation flows through here into the
//! `sw-core` canvas.

pub mod commands;
pub mod editor;
pub mod input;
pub mod surface;
pub mod tools;

pub use commands::EditorCommand;
pub use editor::Editor;
pub use input::{Modifiers, Pointer};
pub use surface::{FigureSurface, ToolSurface};
pub use tools::{
    CubicTool, EllipseTool, LineTool, PathMode, PathTool, QuadTool, RectTool, SelectTool, Tool,
    ToolStyle,
};
