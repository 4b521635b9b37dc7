//! Bounds math over the scene store.
//!
//! Bounding boxes are *tight* boxes of the rendered geometry: Bézier
//! segments measure true curve extrema (control points may lie outside the
//! visible curve, so a control-point hull would over-report). The empty
//! case is an explicit `None`, never a degenerate box that could overlap
//! real geometry.

use crate::id::NodeId;
use crate::model::{Node, Path, Store};
use kurbo::{BezPath, CubicBez, QuadBez, Rect, Shape};

/// The square of side `2 * radius` centered on (x, y) used to turn a
/// pointer position into a hit region.
pub fn hit_square(x: f64, y: f64, radius: f64) -> Rect {
    Rect::new(x - radius, y - radius, x + radius, y + radius)
}

/// AABB overlap, inclusive of touching edges.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}

fn pt(store: &Store, id: NodeId) -> Option<kurbo::Point> {
    store.point(id).map(|p| kurbo::Point::new(p.x, p.y))
}

/// Flatten a path's figures into one `BezPath`.
///
/// Continuity is followed by handle identity: a segment whose start is not
/// the previous segment's end opens a fresh subpath rather than silently
/// joining disconnected geometry.
pub fn path_bez(store: &Store, path: &Path) -> BezPath {
    let mut bez = BezPath::new();
    for figure in &path.figures {
        let mut prev_end: Option<NodeId> = None;
        for &seg in &figure.segments {
            let (start, end) = match store.get(seg) {
                Some(Node::Line(s)) => (s.start, s.end),
                Some(Node::Cubic(s)) => (s.start, s.end),
                Some(Node::Quad(s)) => (s.start, s.end),
                _ => continue,
            };
            if prev_end != Some(start) {
                if let Some(p) = pt(store, start) {
                    bez.move_to(p);
                }
            }
            match store.get(seg) {
                Some(Node::Line(s)) => {
                    if let Some(p) = pt(store, s.end) {
                        bez.line_to(p);
                    }
                }
                Some(Node::Cubic(s)) => {
                    if let (Some(c1), Some(c2), Some(p)) =
                        (pt(store, s.c1), pt(store, s.c2), pt(store, s.end))
                    {
                        bez.curve_to(c1, c2, p);
                    }
                }
                Some(Node::Quad(s)) => {
                    if let (Some(c), Some(p)) = (pt(store, s.control), pt(store, s.end)) {
                        bez.quad_to(c, p);
                    }
                }
                _ => {}
            }
            prev_end = Some(end);
        }
        if figure.closed && !figure.segments.is_empty() {
            bez.close_path();
        }
    }
    bez
}

/// Tight bounding box of one node, or `None` for empty/undrawable nodes.
pub fn bounds_of(store: &Store, id: NodeId) -> Option<Rect> {
    match store.get(id)? {
        Node::Point(p) => {
            let at = kurbo::Point::new(p.x, p.y);
            Some(Rect::from_points(at, at))
        }
        Node::Line(s) => Some(Rect::from_points(pt(store, s.start)?, pt(store, s.end)?)),
        Node::Cubic(s) => {
            let curve = CubicBez::new(
                pt(store, s.start)?,
                pt(store, s.c1)?,
                pt(store, s.c2)?,
                pt(store, s.end)?,
            );
            Some(curve.bounding_box())
        }
        Node::Quad(s) => {
            let curve = QuadBez::new(
                pt(store, s.start)?,
                pt(store, s.control)?,
                pt(store, s.end)?,
            );
            Some(curve.bounding_box())
        }
        Node::Rect(s) => Some(Rect::from_points(
            pt(store, s.top_left)?,
            pt(store, s.bottom_right)?,
        )),
        Node::Ellipse(s) => Some(Rect::from_points(
            pt(store, s.top_left)?,
            pt(store, s.bottom_right)?,
        )),
        Node::Path(path) => {
            if path.segment_count() == 0 {
                return None;
            }
            Some(path_bez(store, path).bounding_box())
        }
        Node::Group(g) => bounds_of_items(store, &g.children),
        Node::Brush(_) | Node::Pen(_) => None,
    }
}

/// Union of per-item bounds. Empty input (or all-empty items) is `None`.
pub fn bounds_of_items(store: &Store, items: &[NodeId]) -> Option<Rect> {
    let mut acc: Option<Rect> = None;
    for &id in items {
        if let Some(b) = bounds_of(store, id) {
            acc = Some(match acc {
                Some(total) => total.union(b),
                None => b,
            });
        }
    }
    acc
}
