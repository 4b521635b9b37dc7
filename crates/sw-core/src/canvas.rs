//! The canvas document: committed items, selection, transient overlays,
//! and every editing operation the tools and the host invoke.
//!
//! All mutation happens on the single event-handling call stack — there is
//! no background work and no locking. Each operation finishes by
//! recomputing the selection-bounds decorator and firing a fire-and-forget
//! invalidate notification; the canvas never waits for (or assumes) an
//! actual repaint.

use crate::clone::{CloneMap, clone_items};
use crate::geom;
use crate::id::NodeId;
use crate::model::{Brush, Color, Group, Node, Pen, Rectangle, Store};
use serde::{Deserialize, Serialize};

/// The document plus its transient editing state.
///
/// `items` is the committed document, back-to-front. `selected` keeps
/// insertion order for deterministic iteration; `hovered` holds snap
/// candidates for render feedback only; `decorators` holds in-progress
/// shapes and overlays that are painted but never part of the document.
#[derive(Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub store: Store,
    pub items: Vec<NodeId>,

    #[serde(skip)]
    pub selected: Vec<NodeId>,
    #[serde(skip)]
    pub hovered: Vec<NodeId>,
    #[serde(skip)]
    pub decorators: Vec<NodeId>,

    /// The single reusable selection-bounds rectangle decorator,
    /// allocated lazily; shown by membership in `decorators`.
    #[serde(skip)]
    selection_bounds: Option<NodeId>,
    /// Clipboard of cloned nodes, detached from the live document.
    #[serde(skip)]
    clipboard: Vec<NodeId>,

    #[serde(skip)]
    dirty: bool,
    #[serde(skip)]
    on_invalidate: Option<Box<dyn FnMut()>>,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            store: Store::new(),
            items: Vec::new(),
            selected: Vec::new(),
            hovered: Vec::new(),
            decorators: Vec::new(),
            selection_bounds: None,
            clipboard: Vec::new(),
            dirty: false,
            on_invalidate: None,
        }
    }

    // ─── Invalidate ──────────────────────────────────────────────────────

    /// Install the redraw observer. The callback must be cheap; it is
    /// invoked synchronously after every mutating operation.
    pub fn set_invalidate_handler(&mut self, handler: impl FnMut() + 'static) {
        self.on_invalidate = Some(Box::new(handler));
    }

    /// Mark the canvas dirty and notify the observer, if any.
    pub fn request_redraw(&mut self) {
        self.dirty = true;
        if let Some(handler) = self.on_invalidate.as_mut() {
            handler();
        }
    }

    /// Read and clear the dirty flag (host-side frame pump).
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn finish(&mut self) {
        self.update_selection_bounds();
        self.request_redraw();
    }

    // ─── Selection & hover ───────────────────────────────────────────────

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected.contains(&id)
    }

    pub fn select(&mut self, id: NodeId) {
        if !self.selected.contains(&id) {
            self.selected.push(id);
        }
    }

    pub fn toggle_selected(&mut self, id: NodeId) {
        if let Some(pos) = self.selected.iter().position(|&s| s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn select_all(&mut self) {
        self.selected = self.items.clone();
        self.finish();
    }

    pub fn add_hover(&mut self, id: NodeId) {
        if !self.hovered.contains(&id) {
            self.hovered.push(id);
        }
    }

    pub fn clear_hovered(&mut self) {
        self.hovered.clear();
    }

    // ─── Decorators ──────────────────────────────────────────────────────

    pub fn add_decorator(&mut self, id: NodeId) {
        if !self.decorators.contains(&id) {
            self.decorators.push(id);
        }
    }

    pub fn remove_decorator(&mut self, id: NodeId) {
        self.decorators.retain(|&d| d != id);
    }

    /// Recompute the selection-bounds decorator: shown and sized to the
    /// selection's union bounds when non-empty, hidden otherwise.
    pub fn update_selection_bounds(&mut self) {
        match geom::bounds_of_items(&self.store, &self.selected) {
            Some(b) => {
                let rect = self.ensure_selection_bounds();
                let (tl, br) = match self.store.get(rect) {
                    Some(Node::Rect(r)) => (r.top_left, r.bottom_right),
                    _ => return,
                };
                self.store.set_point(tl, b.x0, b.y0);
                self.store.set_point(br, b.x1, b.y1);
                self.add_decorator(rect);
            }
            None => {
                if let Some(rect) = self.selection_bounds {
                    self.remove_decorator(rect);
                }
            }
        }
    }

    fn ensure_selection_bounds(&mut self) -> NodeId {
        if let Some(rect) = self.selection_bounds {
            return rect;
        }
        let brush = self
            .store
            .alloc(Node::Brush(Brush::Solid(Color::rgba(0.3, 0.5, 0.9, 1.0))));
        let pen = self.store.alloc(Node::Pen(Pen {
            brush: Some(brush),
            thickness: 1.0,
            ..Pen::default()
        }));
        let tl = self.store.alloc_point(0.0, 0.0);
        let br = self.store.alloc_point(0.0, 0.0);
        let rect = self.store.alloc(Node::Rect(Rectangle {
            top_left: tl,
            bottom_right: br,
            brush: None,
            pen: Some(pen),
            stroked: true,
            filled: false,
            radius_x: 0.0,
            radius_y: 0.0,
        }));
        self.selection_bounds = Some(rect);
        rect
    }

    // ─── Editing operations ──────────────────────────────────────────────

    /// Translate the whole selection. Points shared between selected shapes
    /// are deduplicated first so a shared vertex moves exactly once.
    pub fn move_selected(&mut self, dx: f64, dy: f64) {
        let mut points = Vec::new();
        for &id in &self.selected {
            self.store.collect_points(id, &mut points);
        }
        self.store.translate_points(&points, dx, dy);
        log::trace!("move_selected dx={dx} dy={dy} points={}", points.len());
        self.finish();
    }

    /// Remove the selected items from the document. The nodes themselves
    /// stay in the store; unreferenced means gone.
    pub fn delete_selected(&mut self) {
        let selected = std::mem::take(&mut self.selected);
        self.items.retain(|id| !selected.contains(id));
        log::debug!("delete: removed {} item(s)", selected.len());
        self.finish();
    }

    /// Clone the selection into the clipboard with one fresh clone map, so
    /// the clipboard cluster is internally consistent but fully detached
    /// from the live document.
    pub fn copy(&mut self) {
        let mut map = CloneMap::new();
        self.clipboard = clone_items(&mut self.store, &self.selected.clone(), &mut map);
        log::debug!("copy: {} item(s)", self.clipboard.len());
    }

    pub fn cut(&mut self) {
        self.copy();
        self.delete_selected();
    }

    /// Clone the clipboard into the document and select the clones. Each
    /// paste uses a fresh map, so pasting twice never aliases between the
    /// two pasted clusters.
    pub fn paste(&mut self) {
        let mut map = CloneMap::new();
        let pasted = clone_items(&mut self.store, &self.clipboard.clone(), &mut map);
        self.items.extend(&pasted);
        self.selected = pasted;
        self.finish();
    }

    /// Wrap the selection (in selection order) into a new group appended to
    /// the document, and select the group.
    pub fn group_selected(&mut self) {
        if self.selected.is_empty() {
            return;
        }
        let children = std::mem::take(&mut self.selected);
        self.items.retain(|id| !children.contains(id));
        let group = self.store.alloc(Node::Group(Group { children }));
        self.items.push(group);
        self.selected = vec![group];
        log::debug!("group: created {group:?}");
        self.finish();
    }

    /// Splice every selected group's children — and every selected path's
    /// figure segments, as standalone shapes — back into the document in
    /// place, selecting the spliced nodes. Selected nodes that are neither
    /// stay selected.
    pub fn ungroup_selected(&mut self) {
        let snapshot = std::mem::take(&mut self.selected);
        let mut selection = Vec::new();
        for id in snapshot {
            let replacement: Option<Vec<NodeId>> = match self.store.get(id) {
                Some(Node::Group(g)) => Some(g.children.clone()),
                Some(Node::Path(p)) => Some(
                    p.figures
                        .iter()
                        .flat_map(|f| f.segments.iter().copied())
                        .collect(),
                ),
                _ => None,
            };
            match replacement {
                Some(children) => {
                    if let Some(pos) = self.items.iter().position(|&i| i == id) {
                        self.items.splice(pos..=pos, children.iter().copied());
                        selection.extend(children);
                    }
                }
                None => selection.push(id),
            }
        }
        self.selected = selection;
        self.finish();
    }

    // ─── Point wiring ────────────────────────────────────────────────────

    /// Rewire the first endpoint reference in the item tree that currently
    /// equals `hit` to reference `selected` instead — unless the rewire
    /// would make two endpoints of that same shape alias each other (the
    /// zero-length-segment guard; the search then continues). Returns
    /// whether any rewire happened.
    pub fn connect_point(&mut self, selected: NodeId, hit: NodeId) -> bool {
        if selected == hit {
            return false;
        }
        let items = self.items.clone();
        for id in items {
            if rewire_first(&mut self.store, id, hit, selected) {
                log::debug!("connect: {hit:?} -> {selected:?}");
                self.finish();
                return true;
            }
        }
        false
    }

    /// Replace the first endpoint usage of `point` with a freshly allocated
    /// point at the same coordinates, breaking that one usage's aliasing.
    /// Other usages of `point` stay connected to each other. The fresh
    /// point is only allocated once a usage is found, so a no-change call
    /// leaves the store untouched.
    pub fn disconnect_point(&mut self, point: NodeId) -> bool {
        let Some(at) = self.store.point(point).copied() else {
            return false;
        };
        let Some(pos) = self
            .items
            .iter()
            .position(|&id| uses_point(&self.store, id, point))
        else {
            return false;
        };
        let item = self.items[pos];
        let fresh = self.store.alloc_point(at.x, at.y);
        if rewire_first_unguarded(&mut self.store, item, point, fresh) {
            log::debug!("disconnect: {point:?} -> {fresh:?}");
            self.finish();
            return true;
        }
        false
    }
}

/// Whether `point` appears as an endpoint field anywhere in the item tree.
fn uses_point(store: &Store, id: NodeId, point: NodeId) -> bool {
    match store.get(id) {
        Some(Node::Group(g)) => g.children.iter().any(|&c| uses_point(store, c, point)),
        Some(Node::Path(p)) => p
            .figures
            .iter()
            .flat_map(|f| f.segments.iter())
            .any(|&s| uses_point(store, s, point)),
        Some(Node::Line(s)) => s.start == point || s.end == point,
        Some(Node::Cubic(s)) => [s.start, s.c1, s.c2, s.end].contains(&point),
        Some(Node::Quad(s)) => [s.start, s.control, s.end].contains(&point),
        Some(Node::Rect(s)) => s.top_left == point || s.bottom_right == point,
        Some(Node::Ellipse(s)) => s.top_left == point || s.bottom_right == point,
        _ => false,
    }
}

/// Rewire one endpoint field of the shape (or, recursively, of a group's
/// children / a path's segments): first field equal to `from` becomes `to`,
/// skipping shapes where `to` is already an endpoint.
fn rewire_first(store: &mut Store, id: NodeId, from: NodeId, to: NodeId) -> bool {
    rewire(store, id, from, to, true)
}

fn rewire_first_unguarded(store: &mut Store, id: NodeId, from: NodeId, to: NodeId) -> bool {
    rewire(store, id, from, to, false)
}

fn rewire(store: &mut Store, id: NodeId, from: NodeId, to: NodeId, guard: bool) -> bool {
    // Containers recurse depth-first over a snapshot of their child ids.
    let children: Option<Vec<NodeId>> = match store.get(id) {
        Some(Node::Group(g)) => Some(g.children.clone()),
        Some(Node::Path(p)) => Some(
            p.figures
                .iter()
                .flat_map(|f| f.segments.iter().copied())
                .collect(),
        ),
        _ => None,
    };
    if let Some(children) = children {
        return children
            .into_iter()
            .any(|child| rewire(store, child, from, to, guard));
    }

    let Some(node) = store.get_mut(id) else {
        return false;
    };
    match node {
        Node::Line(s) => rewire_fields(&mut [&mut s.start, &mut s.end], from, to, guard),
        Node::Cubic(s) => rewire_fields(
            &mut [&mut s.start, &mut s.c1, &mut s.c2, &mut s.end],
            from,
            to,
            guard,
        ),
        Node::Quad(s) => {
            rewire_fields(&mut [&mut s.start, &mut s.control, &mut s.end], from, to, guard)
        }
        Node::Rect(s) => rewire_fields(&mut [&mut s.top_left, &mut s.bottom_right], from, to, guard),
        Node::Ellipse(s) => {
            rewire_fields(&mut [&mut s.top_left, &mut s.bottom_right], from, to, guard)
        }
        _ => false,
    }
}

fn rewire_fields(fields: &mut [&mut NodeId], from: NodeId, to: NodeId, guard: bool) -> bool {
    if guard && fields.iter().any(|f| **f == to) {
        return false;
    }
    for field in fields.iter_mut() {
        if **field == from {
            **field = to;
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Figure, FillRule, Line, Path};
    use smallvec::smallvec;

    fn line(canvas: &mut Canvas, ax: f64, ay: f64, bx: f64, by: f64) -> NodeId {
        let a = canvas.store.alloc_point(ax, ay);
        let b = canvas.store.alloc_point(bx, by);
        let l = canvas.store.alloc(Node::Line(Line {
            start: a,
            end: b,
            pen: None,
            stroked: true,
        }));
        canvas.items.push(l);
        l
    }

    fn line_ends(canvas: &Canvas, id: NodeId) -> (NodeId, NodeId) {
        match canvas.store.get(id) {
            Some(Node::Line(l)) => (l.start, l.end),
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn move_selected_moves_shared_point_once() {
        let mut canvas = Canvas::new(800.0, 600.0);
        let l1 = line(&mut canvas, 0.0, 0.0, 10.0, 0.0);
        let l2 = line(&mut canvas, 10.0, 0.0, 20.0, 0.0);
        // Wire the shared vertex by hand.
        let (_, shared) = line_ends(&canvas, l1);
        if let Some(Node::Line(l)) = canvas.store.get_mut(l2) {
            l.start = shared;
        }

        canvas.select(l1);
        canvas.select(l2);
        canvas.move_selected(10.0, 0.0);

        let p = canvas.store.point(shared).unwrap();
        assert_eq!((p.x, p.y), (20.0, 0.0), "moved once, not twice");
        let (s2, _) = line_ends(&canvas, l2);
        assert_eq!(s2, shared, "still sharing");
    }

    #[test]
    fn select_all_and_delete() {
        let mut canvas = Canvas::new(800.0, 600.0);
        line(&mut canvas, 0.0, 0.0, 1.0, 1.0);
        line(&mut canvas, 2.0, 2.0, 3.0, 3.0);

        canvas.select_all();
        assert_eq!(canvas.selected.len(), 2);

        canvas.delete_selected();
        assert!(canvas.items.is_empty());
        assert!(canvas.selected.is_empty());
    }

    #[test]
    fn group_then_ungroup_restores_items_in_place() {
        let mut canvas = Canvas::new(800.0, 600.0);
        let l1 = line(&mut canvas, 0.0, 0.0, 1.0, 1.0);
        let l2 = line(&mut canvas, 2.0, 2.0, 3.0, 3.0);

        canvas.select(l1);
        canvas.select(l2);
        canvas.group_selected();

        assert_eq!(canvas.items.len(), 1);
        let group = canvas.items[0];
        assert!(matches!(canvas.store.get(group), Some(Node::Group(_))));
        assert_eq!(canvas.selected, vec![group]);

        canvas.ungroup_selected();
        assert_eq!(canvas.items, vec![l1, l2]);
        assert_eq!(canvas.selected, vec![l1, l2]);
    }

    #[test]
    fn ungroup_decomposes_path_into_segments() {
        let mut canvas = Canvas::new(800.0, 600.0);
        let s1 = line(&mut canvas, 0.0, 0.0, 5.0, 0.0);
        let s2 = line(&mut canvas, 5.0, 0.0, 5.0, 5.0);
        let s3 = line(&mut canvas, 5.0, 5.0, 0.0, 0.0);
        canvas.items.clear(); // segments belong to the path, not the top level
        let path = canvas.store.alloc(Node::Path(Path {
            figures: smallvec![
                Figure {
                    segments: smallvec![s1, s2],
                    closed: false,
                },
                Figure {
                    segments: smallvec![s3],
                    closed: false,
                },
            ],
            brush: None,
            pen: None,
            stroked: true,
            filled: false,
            fill_rule: FillRule::NonZero,
        }));
        canvas.items.push(path);

        canvas.select(path);
        canvas.ungroup_selected();

        assert_eq!(canvas.items, vec![s1, s2, s3]);
        assert_eq!(canvas.selected, vec![s1, s2, s3]);
    }

    #[test]
    fn connect_point_rewires_first_match_only() {
        let mut canvas = Canvas::new(800.0, 600.0);
        let l1 = line(&mut canvas, 0.0, 0.0, 10.0, 0.0);
        let l2 = line(&mut canvas, 10.0, 0.0, 20.0, 0.0);
        let (_, hit) = line_ends(&canvas, l1);
        let (dragged, _) = line_ends(&canvas, l2);

        assert!(canvas.connect_point(dragged, hit));

        let (_, e1) = line_ends(&canvas, l1);
        assert_eq!(e1, dragged, "first line's end rewired to the dragged point");
    }

    #[test]
    fn connect_point_refuses_zero_length_segment() {
        let mut canvas = Canvas::new(800.0, 600.0);
        let l1 = line(&mut canvas, 0.0, 0.0, 10.0, 0.0);
        let (start, end) = line_ends(&canvas, l1);

        // Connecting one end of a line onto its own other end would leave
        // the line with both endpoints aliased.
        assert!(!canvas.connect_point(start, end));
        assert_eq!(line_ends(&canvas, l1), (start, end));
    }

    #[test]
    fn connect_point_on_absent_point_is_noop() {
        let mut canvas = Canvas::new(800.0, 600.0);
        line(&mut canvas, 0.0, 0.0, 10.0, 0.0);
        let ghost = canvas.store.alloc_point(99.0, 99.0);
        let other = canvas.store.alloc_point(98.0, 98.0);
        assert!(!canvas.connect_point(other, ghost));
    }

    #[test]
    fn disconnect_breaks_one_usage_only() {
        let mut canvas = Canvas::new(800.0, 600.0);
        let l1 = line(&mut canvas, 0.0, 0.0, 10.0, 0.0);
        let l2 = line(&mut canvas, 10.0, 0.0, 20.0, 0.0);
        let l3 = line(&mut canvas, 10.0, 0.0, 10.0, 20.0);
        let (_, shared) = line_ends(&canvas, l1);
        for l in [l2, l3] {
            if let Some(Node::Line(s)) = canvas.store.get_mut(l) {
                s.start = shared;
            }
        }

        assert!(canvas.disconnect_point(shared));

        // First usage (l1.end) got the fresh point; l2/l3 still share.
        let (_, e1) = line_ends(&canvas, l1);
        assert_ne!(e1, shared);
        let fresh = canvas.store.point(e1).unwrap();
        assert_eq!((fresh.x, fresh.y), (10.0, 0.0));
        assert_eq!(line_ends(&canvas, l2).0, shared);
        assert_eq!(line_ends(&canvas, l3).0, shared);
    }

    #[test]
    fn disconnect_absent_point_reports_no_change() {
        let mut canvas = Canvas::new(800.0, 600.0);
        line(&mut canvas, 0.0, 0.0, 10.0, 0.0);
        let loose = canvas.store.alloc_point(50.0, 50.0);
        let before = canvas.store.len();
        // The point exists but no shape endpoint references it; the
        // no-change call must not leave a stray replacement point behind.
        assert!(!canvas.disconnect_point(loose));
        assert_eq!(canvas.store.len(), before);
    }

    #[test]
    fn selection_bounds_decorator_tracks_selection() {
        let mut canvas = Canvas::new(800.0, 600.0);
        let l = line(&mut canvas, 10.0, 10.0, 30.0, 40.0);

        canvas.select(l);
        canvas.update_selection_bounds();
        assert_eq!(canvas.decorators.len(), 1);
        let rect = canvas.decorators[0];
        let (tl, br) = match canvas.store.get(rect) {
            Some(Node::Rect(r)) => (r.top_left, r.bottom_right),
            other => panic!("expected rect, got {other:?}"),
        };
        let tl = canvas.store.point(tl).unwrap();
        let br = canvas.store.point(br).unwrap();
        assert_eq!((tl.x, tl.y, br.x, br.y), (10.0, 10.0, 30.0, 40.0));

        canvas.clear_selection();
        canvas.update_selection_bounds();
        assert!(canvas.decorators.is_empty(), "hidden when selection empty");
    }

    #[test]
    fn redraw_notification_fires_on_operations() {
        use std::cell::Cell;
        use std::rc::Rc;

        let mut canvas = Canvas::new(800.0, 600.0);
        let l = line(&mut canvas, 0.0, 0.0, 1.0, 1.0);
        let fired = Rc::new(Cell::new(0u32));
        let observer = Rc::clone(&fired);
        canvas.set_invalidate_handler(move || observer.set(observer.get() + 1));

        canvas.select(l);
        canvas.move_selected(1.0, 1.0);
        assert!(canvas.take_dirty());
        assert_eq!(fired.get(), 1);
    }
}
