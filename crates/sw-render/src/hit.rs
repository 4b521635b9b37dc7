//! Hit testing: pointer position → node lookup.
//!
//! Both queries walk an ordered item sequence in *reverse* (last inserted =
//! painted topmost = wins ties). Within one item, constituent points take
//! priority over the item's body, so a vertex handle always beats the body
//! of its own shape when both are within the hit radius.

use kurbo::Rect;
use sw_core::geom::{self, hit_square, overlaps};
use sw_core::model::{Node, Store};
use sw_core::NodeId;

/// Default pointer tolerance in canvas units.
pub const HIT_RADIUS: f64 = 7.5;

/// Caller-supplied candidate filter; return `false` to keep searching.
pub type HitFilter<'a> = &'a dyn Fn(&Store, NodeId) -> bool;

/// Accept-everything filter.
pub fn any(_: &Store, _: NodeId) -> bool {
    true
}

/// Accept only point nodes (snap-candidate lookups).
pub fn points_only(store: &Store, id: NodeId) -> bool {
    store.is_point(id)
}

/// Find the topmost node within `radius` of (x, y).
///
/// The pointer expands into a square of side `2 * radius`; per item the
/// item's constituent points are tested first (groups and path figures
/// recursed), then the item's own tight bounds. Groups hit as one
/// bounding-box unit for body tests. The first match passing `filter`
/// wins; an empty item list simply misses.
pub fn contains_at(
    store: &Store,
    items: &[NodeId],
    x: f64,
    y: f64,
    radius: f64,
    filter: HitFilter<'_>,
) -> Option<NodeId> {
    let square = hit_square(x, y, radius);
    for &item in items.iter().rev() {
        // Vertex handles first.
        let mut points = Vec::new();
        store.collect_points(item, &mut points);
        for p in points {
            if let Some(point) = store.point(p)
                && square.contains(kurbo::Point::new(point.x, point.y))
                && filter(store, p)
            {
                log::trace!("hit vertex {p:?} of {item:?}");
                return Some(p);
            }
        }
        // Then the body (for a bare point item, the point test above
        // already covered it).
        if !store.is_point(item)
            && let Some(bounds) = geom::bounds_of(store, item)
            && overlaps(bounds, square)
            && filter(store, item)
        {
            return Some(item);
        }
    }
    None
}

/// Marquee test for one item: a point matches when inside `rect`; any shape
/// or group matches when its tight bounding box intersects `rect`. The box
/// test (not exact geometry) is deliberate — cheap, with an acceptable
/// false-positive rate for a marquee.
pub fn intersects(store: &Store, item: NodeId, rect: Rect) -> Option<NodeId> {
    match store.get(item)? {
        Node::Point(p) => rect.contains(kurbo::Point::new(p.x, p.y)).then_some(item),
        node if node.is_drawable() => {
            let bounds = geom::bounds_of(store, item)?;
            overlaps(bounds, rect).then_some(item)
        }
        _ => None,
    }
}

/// All items intersecting `rect`, topmost first.
pub fn intersects_items(store: &Store, items: &[NodeId], rect: Rect) -> Vec<NodeId> {
    items
        .iter()
        .rev()
        .filter_map(|&item| intersects(store, item, rect))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_core::model::{Group, Line, Rectangle};

    fn line(store: &mut Store, ax: f64, ay: f64, bx: f64, by: f64) -> NodeId {
        let a = store.alloc_point(ax, ay);
        let b = store.alloc_point(bx, by);
        store.alloc(Node::Line(Line {
            start: a,
            end: b,
            pen: None,
            stroked: true,
        }))
    }

    fn rect(store: &mut Store, x0: f64, y0: f64, x1: f64, y1: f64) -> NodeId {
        let tl = store.alloc_point(x0, y0);
        let br = store.alloc_point(x1, y1);
        store.alloc(Node::Rect(Rectangle {
            top_left: tl,
            bottom_right: br,
            brush: None,
            pen: None,
            stroked: true,
            filled: false,
            radius_x: 0.0,
            radius_y: 0.0,
        }))
    }

    #[test]
    fn empty_items_miss_cleanly() {
        let store = Store::new();
        assert_eq!(contains_at(&store, &[], 0.0, 0.0, HIT_RADIUS, &any), None);
    }

    #[test]
    fn vertex_beats_its_own_shape_body() {
        let mut store = Store::new();
        let l = line(&mut store, 0.0, 0.0, 100.0, 0.0);
        let end = match store.get(l) {
            Some(Node::Line(s)) => s.end,
            _ => unreachable!(),
        };
        let hit = contains_at(&store, &[l], 99.0, 1.0, HIT_RADIUS, &any);
        assert_eq!(hit, Some(end), "the endpoint wins over the line body");
    }

    #[test]
    fn topmost_item_wins_overlap() {
        let mut store = Store::new();
        let below = rect(&mut store, 0.0, 0.0, 50.0, 50.0);
        let above = rect(&mut store, 25.0, 25.0, 75.0, 75.0);
        let items = [below, above];
        // Body hit in the overlap zone, away from any vertex.
        let hit = contains_at(&store, &items, 40.0, 35.0, 2.0, &any);
        assert_eq!(hit, Some(above));
    }

    #[test]
    fn filter_skips_rejected_candidates() {
        let mut store = Store::new();
        let l = line(&mut store, 0.0, 0.0, 100.0, 0.0);
        let start = match store.get(l) {
            Some(Node::Line(s)) => s.start,
            _ => unreachable!(),
        };
        // Points-only: the body can never match, the vertex can.
        let hit = contains_at(&store, &[l], 1.0, 1.0, HIT_RADIUS, &points_only);
        assert_eq!(hit, Some(start));
        let miss = contains_at(&store, &[l], 50.0, 0.0, 2.0, &points_only);
        assert_eq!(miss, None);
    }

    #[test]
    fn group_points_recurse_but_body_is_one_box() {
        let mut store = Store::new();
        let inner = line(&mut store, 10.0, 10.0, 90.0, 10.0);
        let group = store.alloc(Node::Group(Group {
            children: vec![inner],
        }));
        let start = match store.get(inner) {
            Some(Node::Line(s)) => s.start,
            _ => unreachable!(),
        };
        // Child vertex is reachable through the group...
        let hit = contains_at(&store, &[group], 11.0, 9.0, HIT_RADIUS, &any);
        assert_eq!(hit, Some(start));
        // ...while a body hit resolves to the group itself.
        let hit = contains_at(&store, &[group], 50.0, 10.0, 2.0, &any);
        assert_eq!(hit, Some(group));
    }

    #[test]
    fn marquee_uses_bounding_box_not_exact_geometry() {
        let mut store = Store::new();
        // A diagonal line whose box covers far more than its stroke.
        let l = line(&mut store, 0.0, 0.0, 100.0, 100.0);
        // Marquee overlaps the box corner the line never visits.
        let marquee = Rect::new(80.0, 0.0, 100.0, 20.0);
        assert_eq!(intersects(&store, l, marquee), Some(l));
    }

    #[test]
    fn intersects_items_is_topmost_first() {
        let mut store = Store::new();
        let a = rect(&mut store, 0.0, 0.0, 20.0, 20.0);
        let b = rect(&mut store, 10.0, 10.0, 30.0, 30.0);
        let hits = intersects_items(&store, &[a, b], Rect::new(0.0, 0.0, 40.0, 40.0));
        assert_eq!(hits, vec![b, a]);
    }

    #[test]
    fn point_matches_marquee_only_when_inside() {
        let mut store = Store::new();
        let p = store.alloc_point(5.0, 5.0);
        assert_eq!(intersects(&store, p, Rect::new(0.0, 0.0, 10.0, 10.0)), Some(p));
        assert_eq!(intersects(&store, p, Rect::new(6.0, 6.0, 10.0, 10.0)), None);
    }
}
