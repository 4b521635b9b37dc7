//! The surface a construction tool draws onto.
//!
//! Top-level tools commit shapes straight into the canvas item list. The
//! path tool reuses the very same segment tools but points them at a
//! figure inside a pending path: [`FigureSurface`] routes commits into the
//! figure's segment list while overlays, hover feedback, and redraw
//! requests still land on the real canvas.

use sw_core::model::{Node, Store};
use sw_core::{Canvas, NodeId};

/// What a construction tool needs from its target: store access, the item
/// scope for snapping, a commit sink, and render feedback channels.
pub trait ToolSurface {
    fn store(&self) -> &Store;
    fn store_mut(&mut self) -> &mut Store;

    /// The items snap lookups search, back-to-front.
    fn items(&self) -> Vec<NodeId>;
    /// Commit a finished shape.
    fn add_item(&mut self, id: NodeId);
    /// Take a shape back out (cancelled commits).
    fn remove_item(&mut self, id: NodeId);

    fn add_hover(&mut self, id: NodeId);
    fn clear_hovered(&mut self);
    fn add_decorator(&mut self, id: NodeId);
    fn remove_decorator(&mut self, id: NodeId);
    fn request_redraw(&mut self);
}

impl ToolSurface for Canvas {
    fn store(&self) -> &Store {
        &self.store
    }

    fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    fn items(&self) -> Vec<NodeId> {
        self.items.clone()
    }

    fn add_item(&mut self, id: NodeId) {
        self.items.push(id);
    }

    fn remove_item(&mut self, id: NodeId) {
        self.items.retain(|&i| i != id);
    }

    fn add_hover(&mut self, id: NodeId) {
        Canvas::add_hover(self, id);
    }

    fn clear_hovered(&mut self) {
        Canvas::clear_hovered(self);
    }

    fn add_decorator(&mut self, id: NodeId) {
        Canvas::add_decorator(self, id);
    }

    fn remove_decorator(&mut self, id: NodeId) {
        Canvas::remove_decorator(self, id);
    }

    fn request_redraw(&mut self) {
        Canvas::request_redraw(self);
    }
}

/// A pending path's current figure, viewed as a tool surface.
///
/// `items()` exposes only that figure's segments, so a segment tool's
/// snap lookup finds the previous segment's endpoint and chains onto it.
pub struct FigureSurface<'a> {
    canvas: &'a mut Canvas,
    path: NodeId,
}

impl<'a> FigureSurface<'a> {
    pub fn new(canvas: &'a mut Canvas, path: NodeId) -> Self {
        Self { canvas, path }
    }
}

impl ToolSurface for FigureSurface<'_> {
    fn store(&self) -> &Store {
        &self.canvas.store
    }

    fn store_mut(&mut self) -> &mut Store {
        &mut self.canvas.store
    }

    fn items(&self) -> Vec<NodeId> {
        match self.canvas.store.get(self.path) {
            Some(Node::Path(p)) => p
                .figures
                .last()
                .map(|f| f.segments.to_vec())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    fn add_item(&mut self, id: NodeId) {
        // Segment styles only serve the construction preview; the
        // committed contour is stroked and filled by the path node.
        match self.canvas.store.get_mut(id) {
            Some(Node::Line(s)) => s.pen = None,
            Some(Node::Cubic(s)) => {
                s.pen = None;
                s.brush = None;
            }
            Some(Node::Quad(s)) => {
                s.pen = None;
                s.brush = None;
            }
            _ => {}
        }
        if let Some(Node::Path(p)) = self.canvas.store.get_mut(self.path)
            && let Some(figure) = p.figures.last_mut()
        {
            figure.segments.push(id);
        }
    }

    fn remove_item(&mut self, id: NodeId) {
        if let Some(Node::Path(p)) = self.canvas.store.get_mut(self.path) {
            for figure in p.figures.iter_mut() {
                figure.segments.retain(|&mut s| s != id);
            }
        }
    }

    fn add_hover(&mut self, id: NodeId) {
        self.canvas.add_hover(id);
    }

    fn clear_hovered(&mut self) {
        self.canvas.clear_hovered();
    }

    fn add_decorator(&mut self, id: NodeId) {
        self.canvas.add_decorator(id);
    }

    fn remove_decorator(&mut self, id: NodeId) {
        self.canvas.remove_decorator(id);
    }

    fn request_redraw(&mut self) {
        self.canvas.request_redraw();
    }
}
