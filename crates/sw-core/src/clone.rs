//! Identity-preserving clone over the scene store.
//!
//! A [`CloneMap`] threads through one whole clone invocation and maps
//! original handles to their already-produced clones. If two shapes
//! reference the same point (or the same brush template) before cloning,
//! their clones reference the same *cloned* point afterwards — the aliasing
//! topology of the graph is reproduced exactly, never flattened.
//!
//! This is what makes copy/paste keep vertex connectivity inside the pasted
//! cluster while fully detaching it from the live document, and what gives
//! each tool-constructed shape an independent copy of the tool's template
//! style.

use crate::id::NodeId;
use crate::model::{Node, Store};
use std::collections::HashMap;

/// Original handle → cloned handle, for one clone invocation.
pub type CloneMap = HashMap<NodeId, NodeId>;

/// Clone the node graph reachable from `id`, returning the clone's handle.
///
/// The fresh handle is registered in `map` *before* children are visited,
/// so diamond-shared references (and even cycles) reachable from children
/// short-circuit to the clone under construction instead of duplicating it.
///
/// Cloning a handle with no store entry is the identity — there is nothing
/// to copy, and dangling references stay exactly as given (the store only
/// guarantees it reproduces graphs, it does not validate them).
pub fn clone_node(store: &mut Store, id: NodeId, map: &mut CloneMap) -> NodeId {
    if let Some(&existing) = map.get(&id) {
        return existing;
    }
    let original = match store.get(id) {
        Some(node) => node.clone(),
        None => return id,
    };
    let fresh = NodeId::generated(original.kind_prefix());
    map.insert(id, fresh);

    let cloned = match original {
        // Leaves: no owned references.
        Node::Point(p) => Node::Point(p),
        Node::Brush(b) => Node::Brush(b),

        Node::Pen(mut pen) => {
            pen.brush = clone_opt(store, pen.brush, map);
            Node::Pen(pen)
        }
        Node::Line(mut s) => {
            s.start = clone_node(store, s.start, map);
            s.end = clone_node(store, s.end, map);
            s.pen = clone_opt(store, s.pen, map);
            Node::Line(s)
        }
        Node::Cubic(mut s) => {
            s.start = clone_node(store, s.start, map);
            s.c1 = clone_node(store, s.c1, map);
            s.c2 = clone_node(store, s.c2, map);
            s.end = clone_node(store, s.end, map);
            s.brush = clone_opt(store, s.brush, map);
            s.pen = clone_opt(store, s.pen, map);
            Node::Cubic(s)
        }
        Node::Quad(mut s) => {
            s.start = clone_node(store, s.start, map);
            s.control = clone_node(store, s.control, map);
            s.end = clone_node(store, s.end, map);
            s.brush = clone_opt(store, s.brush, map);
            s.pen = clone_opt(store, s.pen, map);
            Node::Quad(s)
        }
        Node::Rect(mut s) => {
            s.top_left = clone_node(store, s.top_left, map);
            s.bottom_right = clone_node(store, s.bottom_right, map);
            s.brush = clone_opt(store, s.brush, map);
            s.pen = clone_opt(store, s.pen, map);
            Node::Rect(s)
        }
        Node::Ellipse(mut s) => {
            s.top_left = clone_node(store, s.top_left, map);
            s.bottom_right = clone_node(store, s.bottom_right, map);
            s.brush = clone_opt(store, s.brush, map);
            s.pen = clone_opt(store, s.pen, map);
            Node::Ellipse(s)
        }
        Node::Path(mut path) => {
            for figure in path.figures.iter_mut() {
                for seg in figure.segments.iter_mut() {
                    *seg = clone_node(store, *seg, map);
                }
            }
            path.brush = clone_opt(store, path.brush, map);
            path.pen = clone_opt(store, path.pen, map);
            Node::Path(path)
        }
        Node::Group(mut g) => {
            for child in g.children.iter_mut() {
                *child = clone_node(store, *child, map);
            }
            Node::Group(g)
        }
    };

    store.insert(fresh, cloned);
    fresh
}

/// Clone an optional style reference. An absent style clones to absent.
pub fn clone_opt(store: &mut Store, id: Option<NodeId>, map: &mut CloneMap) -> Option<NodeId> {
    id.map(|id| clone_node(store, id, map))
}

/// Clone a whole item sequence through one shared map, preserving aliasing
/// *between* the items as well as within each.
pub fn clone_items(store: &mut Store, ids: &[NodeId], map: &mut CloneMap) -> Vec<NodeId> {
    ids.iter().map(|&id| clone_node(store, id, map)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Brush, Color, Group, Line, Node, Pen, Store};

    fn line(store: &mut Store, start: NodeId, end: NodeId, pen: Option<NodeId>) -> NodeId {
        store.alloc(Node::Line(Line {
            start,
            end,
            pen,
            stroked: true,
        }))
    }

    #[test]
    fn shared_point_stays_shared_in_clone() {
        let mut store = Store::new();
        let a = store.alloc_point(0.0, 0.0);
        let shared = store.alloc_point(10.0, 0.0);
        let c = store.alloc_point(20.0, 10.0);
        let l1 = line(&mut store, a, shared, None);
        let l2 = line(&mut store, shared, c, None);

        let mut map = CloneMap::new();
        let cloned = clone_items(&mut store, &[l1, l2], &mut map);

        let (c1, c2) = match (store.get(cloned[0]), store.get(cloned[1])) {
            (Some(Node::Line(x)), Some(Node::Line(y))) => (x.clone(), y.clone()),
            other => panic!("expected two lines, got {other:?}"),
        };
        // Reference-equal to each other, distinct from the original.
        assert_eq!(c1.end, c2.start);
        assert_ne!(c1.end, shared);
    }

    #[test]
    fn clone_is_independent_of_original() {
        let mut store = Store::new();
        let a = store.alloc_point(1.0, 1.0);
        let b = store.alloc_point(9.0, 9.0);
        let original = line(&mut store, a, b, None);

        let mut map = CloneMap::new();
        let cloned = clone_node(&mut store, original, &mut map);

        let cloned_start = match store.get(cloned) {
            Some(Node::Line(l)) => l.start,
            other => panic!("expected line, got {other:?}"),
        };
        store.set_point(cloned_start, 100.0, 100.0);

        let orig_start = store.point(a).unwrap();
        assert_eq!((orig_start.x, orig_start.y), (1.0, 1.0));
    }

    #[test]
    fn absent_style_clones_to_absent() {
        let mut store = Store::new();
        let a = store.alloc_point(0.0, 0.0);
        let b = store.alloc_point(1.0, 0.0);
        let l = line(&mut store, a, b, None);

        let mut map = CloneMap::new();
        let cloned = clone_node(&mut store, l, &mut map);
        match store.get(cloned) {
            Some(Node::Line(l)) => assert_eq!(l.pen, None),
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn diamond_shared_pen_and_brush_survive() {
        let mut store = Store::new();
        let brush = store.alloc(Node::Brush(Brush::Solid(Color::BLACK)));
        let pen = store.alloc(Node::Pen(Pen {
            brush: Some(brush),
            ..Pen::default()
        }));
        let a = store.alloc_point(0.0, 0.0);
        let b = store.alloc_point(5.0, 0.0);
        let c = store.alloc_point(5.0, 5.0);
        let l1 = line(&mut store, a, b, Some(pen));
        let l2 = line(&mut store, b, c, Some(pen));

        let mut map = CloneMap::new();
        let cloned = clone_items(&mut store, &[l1, l2], &mut map);

        let (p1, p2) = match (store.get(cloned[0]), store.get(cloned[1])) {
            (Some(Node::Line(x)), Some(Node::Line(y))) => (x.pen, y.pen),
            other => panic!("expected two lines, got {other:?}"),
        };
        assert_eq!(p1, p2, "both clones share one cloned pen");
        assert_ne!(p1, Some(pen), "cloned pen is not the original");

        let cloned_brush = match store.get(p1.unwrap()) {
            Some(Node::Pen(p)) => p.brush,
            other => panic!("expected pen, got {other:?}"),
        };
        assert_ne!(cloned_brush, Some(brush));
    }

    #[test]
    fn group_clone_preserves_intra_group_aliasing() {
        let mut store = Store::new();
        let a = store.alloc_point(0.0, 0.0);
        let shared = store.alloc_point(4.0, 4.0);
        let c = store.alloc_point(8.0, 0.0);
        let l1 = line(&mut store, a, shared, None);
        let l2 = line(&mut store, shared, c, None);
        let group = store.alloc(Node::Group(Group {
            children: vec![l1, l2],
        }));

        let mut map = CloneMap::new();
        let cloned_group = clone_node(&mut store, group, &mut map);

        let children = match store.get(cloned_group) {
            Some(Node::Group(g)) => g.children.clone(),
            other => panic!("expected group, got {other:?}"),
        };
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|&c| ![l1, l2].contains(&c)));

        let (e1, s2) = match (store.get(children[0]), store.get(children[1])) {
            (Some(Node::Line(x)), Some(Node::Line(y))) => (x.end, y.start),
            other => panic!("expected two lines, got {other:?}"),
        };
        assert_eq!(e1, s2);
    }

    #[test]
    fn dangling_handle_clones_to_itself() {
        let mut store = Store::new();
        let ghost = NodeId::generated("point");
        let mut map = CloneMap::new();
        assert_eq!(clone_node(&mut store, ghost, &mut map), ghost);
    }
}
