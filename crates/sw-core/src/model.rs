//! Scene-graph data model for SketchWire documents.
//!
//! Every node — points, segments, shapes, paths, groups, and the style
//! objects they reference — lives in a single [`Store`] arena keyed by
//! [`NodeId`]. Shapes do not own their vertices; they hold point *handles*,
//! and two shapes referencing the same handle are connected at that vertex:
//! moving the point moves both shapes.

use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Colors & Brushes ────────────────────────────────────────────────────

/// RGBA color, 4 × f32 in [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
}

/// A gradient stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32, // 0.0 .. 1.0
    pub color: Color,
}

/// A point in the unit square of a shape's bounds — gradient anchors are
/// relative so the brush stretches with the shape it paints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativePoint {
    pub x: f64,
    pub y: f64,
}

impl RelativePoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Fill paint. Brushes are arena nodes so a tool template brush can be
/// shared, then cloned per constructed shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Brush {
    Solid(Color),
    LinearGradient {
        start: RelativePoint,
        end: RelativePoint,
        stops: Vec<GradientStop>,
    },
    RadialGradient {
        center: RelativePoint,
        radius: f64,
        stops: Vec<GradientStop>,
    },
}

// ─── Pens ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Dash pattern in stroke-width multiples, plus a phase offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashStyle {
    pub pattern: Vec<f64>,
    pub offset: f64,
}

/// Stroke paint. The pen's color comes from a referenced [`Brush`] node;
/// `None` means the stroke is skipped at paint time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    pub brush: Option<NodeId>,
    pub thickness: f64,
    pub dashes: Option<DashStyle>,
    pub cap: StrokeCap,
    pub join: StrokeJoin,
    pub miter_limit: f64,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            brush: None,
            thickness: 2.0,
            dashes: None,
            cap: StrokeCap::Butt,
            join: StrokeJoin::Miter,
            miter_limit: 4.0,
        }
    }
}

// ─── Geometry nodes ──────────────────────────────────────────────────────

/// A mutable vertex. The unit of sharing: every shape endpoint is a handle
/// to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Straight segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: NodeId,
    pub end: NodeId,
    pub pen: Option<NodeId>,
    pub stroked: bool,
}

/// Cubic Bézier segment: start, two control points, end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cubic {
    pub start: NodeId,
    pub c1: NodeId,
    pub c2: NodeId,
    pub end: NodeId,
    pub brush: Option<NodeId>,
    pub pen: Option<NodeId>,
    pub stroked: bool,
    pub filled: bool,
}

/// Quadratic Bézier segment: start, one control point, end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub start: NodeId,
    pub control: NodeId,
    pub end: NodeId,
    pub brush: Option<NodeId>,
    pub pen: Option<NodeId>,
    pub stroked: bool,
    pub filled: bool,
}

/// Axis-aligned rectangle between two corner points, optionally rounded.
/// The corners are ordinary shared-able points; a drag can leave them
/// inverted, bounds math normalizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub top_left: NodeId,
    pub bottom_right: NodeId,
    pub brush: Option<NodeId>,
    pub pen: Option<NodeId>,
    pub stroked: bool,
    pub filled: bool,
    pub radius_x: f64,
    pub radius_y: f64,
}

/// Ellipse inscribed in the rectangle between two corner points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub top_left: NodeId,
    pub bottom_right: NodeId,
    pub brush: Option<NodeId>,
    pub pen: Option<NodeId>,
    pub stroked: bool,
    pub filled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// One contiguous contour of a [`Path`]: an ordered run of segment handles
/// (Line / Cubic / Quad nodes). For a visually continuous contour, segment
/// i+1's start must be the *same handle* as segment i's end — the tools
/// wire that; the model does not enforce it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Figure {
    pub segments: SmallVec<[NodeId; 4]>,
    pub closed: bool,
}

/// Multi-contour path. Figures are owned inline; their segments are arena
/// shapes so endpoints can be shared with siblings outside the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub figures: SmallVec<[Figure; 1]>,
    pub brush: Option<NodeId>,
    pub pen: Option<NodeId>,
    pub stroked: bool,
    pub filled: bool,
    pub fill_rule: FillRule,
}

impl Path {
    /// Total segment count across all figures.
    pub fn segment_count(&self) -> usize {
        self.figures.iter().map(|f| f.segments.len()).sum()
    }
}

/// Ordered container of child nodes (shapes, points, nested groups).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Group {
    pub children: Vec<NodeId>,
}

// ─── The node sum type ───────────────────────────────────────────────────

/// Every variant the scene store can hold. Hit-testing, cloning, and
/// painting are exhaustive matches over this enum, so "what kinds of node
/// exist" stays a compile-time question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Point(Point),
    Line(Line),
    Cubic(Cubic),
    Quad(Quad),
    Rect(Rectangle),
    Ellipse(Ellipse),
    Path(Path),
    Group(Group),
    Brush(Brush),
    Pen(Pen),
}

impl Node {
    /// Handle prefix used when minting a fresh id for this variant.
    pub fn kind_prefix(&self) -> &'static str {
        match self {
            Node::Point(_) => "point",
            Node::Line(_) => "line",
            Node::Cubic(_) => "cubic",
            Node::Quad(_) => "quad",
            Node::Rect(_) => "rect",
            Node::Ellipse(_) => "ellipse",
            Node::Path(_) => "path",
            Node::Group(_) => "group",
            Node::Brush(_) => "brush",
            Node::Pen(_) => "pen",
        }
    }

    /// Whether this node is a drawable scene item (participates in
    /// hit-testing and painting) as opposed to a style object.
    pub fn is_drawable(&self) -> bool {
        !matches!(self, Node::Brush(_) | Node::Pen(_))
    }

    pub fn brush(&self) -> Option<NodeId> {
        match self {
            Node::Cubic(s) => s.brush,
            Node::Quad(s) => s.brush,
            Node::Rect(s) => s.brush,
            Node::Ellipse(s) => s.brush,
            Node::Path(s) => s.brush,
            _ => None,
        }
    }

    pub fn pen(&self) -> Option<NodeId> {
        match self {
            Node::Line(s) => s.pen,
            Node::Cubic(s) => s.pen,
            Node::Quad(s) => s.pen,
            Node::Rect(s) => s.pen,
            Node::Ellipse(s) => s.pen,
            Node::Path(s) => s.pen,
            _ => None,
        }
    }
}

// ─── Store ───────────────────────────────────────────────────────────────

/// Arena of all nodes in a document, keyed by stable handles.
///
/// Nodes are never destroyed by editing operations — removal from the
/// containers that reference them is sufficient; an unreferenced node is
/// simply unreachable garbage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Store {
    nodes: HashMap<NodeId, Node>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under a freshly generated handle and return it.
    ///
    /// A decoded document may already occupy low-numbered handles while
    /// the process-wide counter starts over, so generation retries until
    /// the handle is genuinely free — allocation must never overwrite a
    /// loaded node.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let prefix = node.kind_prefix();
        let mut id = NodeId::generated(prefix);
        while self.nodes.contains_key(&id) {
            id = NodeId::generated(prefix);
        }
        self.nodes.insert(id, node);
        id
    }

    /// Shorthand: allocate a new [`Point`] at (x, y).
    pub fn alloc_point(&mut self, x: f64, y: f64) -> NodeId {
        self.alloc(Node::Point(Point::new(x, y)))
    }

    pub fn insert(&mut self, id: NodeId, node: Node) {
        self.nodes.insert(id, node);
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn point(&self, id: NodeId) -> Option<&Point> {
        match self.nodes.get(&id) {
            Some(Node::Point(p)) => Some(p),
            _ => None,
        }
    }

    pub fn point_mut(&mut self, id: NodeId) -> Option<&mut Point> {
        match self.nodes.get_mut(&id) {
            Some(Node::Point(p)) => Some(p),
            _ => None,
        }
    }

    pub fn is_point(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(&id), Some(Node::Point(_)))
    }

    /// Set a point's coordinates. No-op if `id` is not a point.
    pub fn set_point(&mut self, id: NodeId, x: f64, y: f64) {
        if let Some(p) = self.point_mut(id) {
            p.x = x;
            p.y = y;
        }
    }

    /// Collect the constituent point handles of a node, in field order,
    /// recursing into groups and path figures. Each handle appears once
    /// even when shared within the node.
    pub fn collect_points(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let mut push = |out: &mut Vec<NodeId>, p: NodeId| {
            if !out.contains(&p) {
                out.push(p);
            }
        };
        match self.nodes.get(&id) {
            Some(Node::Point(_)) => push(out, id),
            Some(Node::Line(s)) => {
                push(out, s.start);
                push(out, s.end);
            }
            Some(Node::Cubic(s)) => {
                push(out, s.start);
                push(out, s.c1);
                push(out, s.c2);
                push(out, s.end);
            }
            Some(Node::Quad(s)) => {
                push(out, s.start);
                push(out, s.control);
                push(out, s.end);
            }
            Some(Node::Rect(s)) => {
                push(out, s.top_left);
                push(out, s.bottom_right);
            }
            Some(Node::Ellipse(s)) => {
                push(out, s.top_left);
                push(out, s.bottom_right);
            }
            Some(Node::Path(s)) => {
                let segments: Vec<NodeId> = s
                    .figures
                    .iter()
                    .flat_map(|f| f.segments.iter().copied())
                    .collect();
                for seg in segments {
                    self.collect_points(seg, out);
                }
            }
            Some(Node::Group(g)) => {
                let children = g.children.clone();
                for child in children {
                    self.collect_points(child, out);
                }
            }
            Some(Node::Brush(_)) | Some(Node::Pen(_)) | None => {}
        }
    }

    /// Translate each listed point once. Callers dedup across shapes so a
    /// shared vertex moves exactly once.
    pub fn translate_points(&mut self, points: &[NodeId], dx: f64, dy: f64) {
        for &id in points {
            if let Some(p) = self.point_mut(id) {
                p.x += dx;
                p.y += dy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_uses_kind_prefix() {
        let mut store = Store::new();
        let p = store.alloc_point(1.0, 2.0);
        assert!(p.as_str().starts_with("point_"));
        assert_eq!(store.point(p), Some(&Point::new(1.0, 2.0)));
    }

    #[test]
    fn alloc_never_overwrites_loaded_handles() {
        let mut store = Store::new();
        // Occupy the handles the counter would mint next, the way a
        // decoded document occupies them in a fresh process.
        let current = NodeId::generated("point");
        let n: u64 = current
            .as_str()
            .trim_start_matches("point_")
            .parse()
            .unwrap();
        let loaded: Vec<NodeId> = (1..=3)
            .map(|i| {
                let id = NodeId::intern(&format!("point_{}", n + i));
                store.insert(id, Node::Point(Point::new(42.0, 42.0)));
                id
            })
            .collect();

        for _ in 0..5 {
            store.alloc_point(0.0, 0.0);
        }

        for id in loaded {
            assert_eq!(store.point(id), Some(&Point::new(42.0, 42.0)));
        }
        assert_eq!(store.len(), 8);
    }

    #[test]
    fn collect_points_dedups_shared_vertex() {
        let mut store = Store::new();
        let a = store.alloc_point(0.0, 0.0);
        let shared = store.alloc_point(10.0, 0.0);
        let c = store.alloc_point(20.0, 0.0);
        let l1 = store.alloc(Node::Line(Line {
            start: a,
            end: shared,
            pen: None,
            stroked: true,
        }));
        let l2 = store.alloc(Node::Line(Line {
            start: shared,
            end: c,
            pen: None,
            stroked: true,
        }));
        let group = store.alloc(Node::Group(Group {
            children: vec![l1, l2],
        }));

        let mut points = Vec::new();
        store.collect_points(group, &mut points);
        assert_eq!(points, vec![a, shared, c]);
    }

    #[test]
    fn translate_moves_each_point_once() {
        let mut store = Store::new();
        let p = store.alloc_point(5.0, 5.0);
        store.translate_points(&[p], 3.0, -1.0);
        let moved = store.point(p).unwrap();
        assert_eq!((moved.x, moved.y), (8.0, 4.0));
    }

    #[test]
    fn path_segment_count_spans_figures() {
        let mut store = Store::new();
        let mk_line = |store: &mut Store| {
            let a = store.alloc_point(0.0, 0.0);
            let b = store.alloc_point(1.0, 1.0);
            store.alloc(Node::Line(Line {
                start: a,
                end: b,
                pen: None,
                stroked: true,
            }))
        };
        let s1 = mk_line(&mut store);
        let s2 = mk_line(&mut store);
        let s3 = mk_line(&mut store);
        let path = Path {
            figures: smallvec::smallvec![
                Figure {
                    segments: smallvec::smallvec![s1, s2],
                    closed: true,
                },
                Figure {
                    segments: smallvec::smallvec![s3],
                    closed: false,
                },
            ],
            brush: None,
            pen: None,
            stroked: true,
            filled: false,
            fill_rule: FillRule::NonZero,
        };
        assert_eq!(path.segment_count(), 3);
    }
}
