//! The editor shell: one canvas, a tool palette, and event dispatch.

use crate::commands::{self, EditorCommand};
use crate::input::{Modifiers, Pointer};
use crate::tools::{
    CubicTool, EllipseTool, LineTool, PathTool, QuadTool, RectTool, SelectTool, Tool, ToolStyle,
};
use sw_core::Canvas;
use sw_core::model::{Brush, Color, Node, Pen, Store};

/// Owns the document and the tool palette; the host feeds it pointer
/// events, commands, and tool switches.
pub struct Editor {
    pub canvas: Canvas,
    tools: Vec<Box<dyn Tool>>,
    active: usize,
}

impl Editor {
    /// A new editor with the default palette and template style seeded
    /// into the document store. The select tool starts active.
    pub fn new(width: f64, height: f64) -> Self {
        let mut canvas = Canvas::new(width, height);
        let style = default_style(&mut canvas.store);
        let tools: Vec<Box<dyn Tool>> = vec![
            Box::new(SelectTool::new()),
            Box::new(LineTool::new(style)),
            Box::new(QuadTool::new(style)),
            Box::new(CubicTool::new(style)),
            Box::new(RectTool::new(style)),
            Box::new(EllipseTool::new(style)),
            Box::new(PathTool::new(style)),
        ];
        Self {
            canvas,
            tools,
            active: 0,
        }
    }

    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn active_tool(&self) -> &'static str {
        self.tools[self.active].name()
    }

    /// Switch the active tool by name; unknown names leave the palette
    /// unchanged and report `false`.
    pub fn set_tool(&mut self, name: &str) -> bool {
        match self.tools.iter().position(|t| t.name() == name) {
            Some(pos) => {
                self.active = pos;
                log::debug!("tool: {name}");
                true
            }
            None => false,
        }
    }

    pub fn pressed(&mut self, x: f64, y: f64, pointer: Pointer, mods: Modifiers) {
        self.tools[self.active].pressed(&mut self.canvas, x, y, pointer, mods);
    }

    pub fn moved(&mut self, x: f64, y: f64, pointer: Pointer, mods: Modifiers) {
        self.tools[self.active].moved(&mut self.canvas, x, y, pointer, mods);
    }

    pub fn released(&mut self, x: f64, y: f64, pointer: Pointer, mods: Modifiers) {
        self.tools[self.active].released(&mut self.canvas, x, y, pointer, mods);
    }

    pub fn apply(&mut self, command: EditorCommand) {
        commands::apply(&mut self.canvas, command);
    }
}

/// Template style every construction tool stamps (clones) onto the
/// shapes it creates: a light solid fill and a black 2px pen.
fn default_style(store: &mut Store) -> ToolStyle {
    let fill = store.alloc(Node::Brush(Brush::Solid(Color::rgba(0.85, 0.88, 0.92, 1.0))));
    let stroke = store.alloc(Node::Brush(Brush::Solid(Color::BLACK)));
    let pen = store.alloc(Node::Pen(Pen {
        brush: Some(stroke),
        ..Pen::default()
    }));
    ToolStyle {
        brush: Some(fill),
        pen: Some(pen),
    }
}
