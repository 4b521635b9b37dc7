//! Scene graph → Vello drawing commands.
//!
//! Paints a canvas in three layers: committed items, then construction /
//! overlay decorators, then hovered snap candidates. Each shape honors its
//! stroke/fill flags; a missing brush or pen simply skips that paint, it is
//! never an error.

use kurbo::{Affine, BezPath, Cap, Circle, Join, Rect, Stroke};
use peniko::color::DynamicColor;
use peniko::{ColorStop, Fill, Gradient};
use sw_core::model::{
    Brush, Color, FillRule, Node, Pen, Store, StrokeCap, StrokeJoin,
};
use sw_core::{Canvas, NodeId, geom};
use vello::Scene;

/// Radius of the marker drawn for point nodes.
const POINT_MARK_RADIUS: f64 = 3.0;
/// Radius of the highlight ring drawn for hovered snap candidates.
const HOVER_RING_RADIUS: f64 = 5.0;

/// Paint the whole canvas into a freshly-cleared `Scene`.
/// The caller presents the scene; painting never mutates the document.
pub fn paint_canvas(scene: &mut Scene, canvas: &Canvas) {
    for &item in &canvas.items {
        paint_node(scene, &canvas.store, item);
    }
    for &decorator in &canvas.decorators {
        paint_node(scene, &canvas.store, decorator);
    }
    for &hover in &canvas.hovered {
        paint_hover(scene, &canvas.store, hover);
    }
}

fn paint_node(scene: &mut Scene, store: &Store, id: NodeId) {
    match store.get(id) {
        Some(Node::Point(p)) => {
            let mark = Circle::new((p.x, p.y), POINT_MARK_RADIUS);
            scene.fill(
                Fill::NonZero,
                Affine::IDENTITY,
                to_color(Color::rgba(0.35, 0.35, 0.35, 1.0)),
                None,
                &mark,
            );
        }
        Some(Node::Line(s)) => {
            if !s.stroked {
                return;
            }
            if let (Some(a), Some(b)) = (store.point(s.start), store.point(s.end)) {
                let shape = kurbo::Line::new((a.x, a.y), (b.x, b.y));
                stroke_shape(scene, store, &shape, s.pen);
            }
        }
        Some(Node::Cubic(s)) => {
            if let Some(bez) = segment_bez(store, id) {
                if s.filled {
                    fill_shape(scene, store, &bez, s.brush, Fill::NonZero);
                }
                if s.stroked {
                    stroke_shape(scene, store, &bez, s.pen);
                }
            }
        }
        Some(Node::Quad(s)) => {
            if let Some(bez) = segment_bez(store, id) {
                if s.filled {
                    fill_shape(scene, store, &bez, s.brush, Fill::NonZero);
                }
                if s.stroked {
                    stroke_shape(scene, store, &bez, s.pen);
                }
            }
        }
        Some(Node::Rect(s)) => {
            let (Some(tl), Some(br)) = (store.point(s.top_left), store.point(s.bottom_right))
            else {
                return;
            };
            let rect = Rect::from_points((tl.x, tl.y), (br.x, br.y));
            // kurbo corners are circular; the x radius drives rounding.
            let shape = rect.to_rounded_rect(s.radius_x);
            if s.filled {
                fill_shape(scene, store, &shape, s.brush, Fill::NonZero);
            }
            if s.stroked {
                stroke_shape(scene, store, &shape, s.pen);
            }
        }
        Some(Node::Ellipse(s)) => {
            let (Some(tl), Some(br)) = (store.point(s.top_left), store.point(s.bottom_right))
            else {
                return;
            };
            let rect = Rect::from_points((tl.x, tl.y), (br.x, br.y));
            let shape = kurbo::Ellipse::new(
                rect.center(),
                (rect.width() / 2.0, rect.height() / 2.0),
                0.0,
            );
            if s.filled {
                fill_shape(scene, store, &shape, s.brush, Fill::NonZero);
            }
            if s.stroked {
                stroke_shape(scene, store, &shape, s.pen);
            }
        }
        Some(Node::Path(path)) => {
            let bez = geom::path_bez(store, path);
            if bez.elements().is_empty() {
                return;
            }
            if path.filled {
                let rule = match path.fill_rule {
                    FillRule::NonZero => Fill::NonZero,
                    FillRule::EvenOdd => Fill::EvenOdd,
                };
                fill_shape(scene, store, &bez, path.brush, rule);
            }
            if path.stroked {
                stroke_shape(scene, store, &bez, path.pen);
            }
        }
        Some(Node::Group(g)) => {
            for &child in &g.children {
                paint_node(scene, store, child);
            }
        }
        Some(Node::Brush(_)) | Some(Node::Pen(_)) | None => {}
    }
}

fn paint_hover(scene: &mut Scene, store: &Store, id: NodeId) {
    if let Some(p) = store.point(id) {
        let ring = Circle::new((p.x, p.y), HOVER_RING_RADIUS);
        let stroke = Stroke::new(1.5);
        scene.stroke(
            &stroke,
            Affine::IDENTITY,
            to_color(Color::rgba(0.95, 0.45, 0.1, 1.0)),
            None,
            &ring,
        );
    }
}

/// One Line/Cubic/Quad segment as a `BezPath`.
fn segment_bez(store: &Store, id: NodeId) -> Option<BezPath> {
    let mut bez = BezPath::new();
    match store.get(id)? {
        Node::Cubic(s) => {
            let (a, c1, c2, b) = (
                store.point(s.start)?,
                store.point(s.c1)?,
                store.point(s.c2)?,
                store.point(s.end)?,
            );
            bez.move_to((a.x, a.y));
            bez.curve_to((c1.x, c1.y), (c2.x, c2.y), (b.x, b.y));
        }
        Node::Quad(s) => {
            let (a, c, b) = (
                store.point(s.start)?,
                store.point(s.control)?,
                store.point(s.end)?,
            );
            bez.move_to((a.x, a.y));
            bez.quad_to((c.x, c.y), (b.x, b.y));
        }
        _ => return None,
    }
    Some(bez)
}

// ─── Fill and stroke ─────────────────────────────────────────────────────

fn fill_shape<S: kurbo::Shape>(
    scene: &mut Scene,
    store: &Store,
    shape: &S,
    brush: Option<NodeId>,
    rule: Fill,
) {
    let Some(brush) = resolve_brush(store, brush, shape.bounding_box()) else {
        return;
    };
    scene.fill(rule, Affine::IDENTITY, &brush, None, shape);
}

fn stroke_shape<S: kurbo::Shape>(scene: &mut Scene, store: &Store, shape: &S, pen: Option<NodeId>) {
    let Some(Node::Pen(pen)) = pen.and_then(|id| store.get(id)) else {
        return;
    };
    let Some(brush) = resolve_brush(store, pen.brush, shape.bounding_box()) else {
        return;
    };
    let stroke = to_stroke(pen);
    scene.stroke(&stroke, Affine::IDENTITY, &brush, None, shape);
}

fn to_stroke(pen: &Pen) -> Stroke {
    let mut stroke = Stroke::new(pen.thickness)
        .with_caps(match pen.cap {
            StrokeCap::Butt => Cap::Butt,
            StrokeCap::Round => Cap::Round,
            StrokeCap::Square => Cap::Square,
        })
        .with_join(match pen.join {
            StrokeJoin::Miter => Join::Miter,
            StrokeJoin::Round => Join::Round,
            StrokeJoin::Bevel => Join::Bevel,
        })
        .with_miter_limit(pen.miter_limit);
    if let Some(dashes) = &pen.dashes {
        // Dash pattern is stored in thickness multiples.
        stroke = stroke.with_dashes(
            dashes.offset * pen.thickness,
            dashes.pattern.iter().map(|d| d * pen.thickness),
        );
    }
    stroke
}

// ─── Brush resolution ────────────────────────────────────────────────────

/// Resolve a brush node into a peniko brush, mapping relative gradient
/// anchors through the shape's bounds. `None` (or a dangling handle) means
/// skip the paint entirely.
fn resolve_brush(store: &Store, brush: Option<NodeId>, bounds: Rect) -> Option<peniko::Brush> {
    let Some(Node::Brush(brush)) = brush.and_then(|id| store.get(id)) else {
        return None;
    };
    let at = |p: &sw_core::model::RelativePoint| {
        kurbo::Point::new(
            bounds.x0 + p.x * bounds.width(),
            bounds.y0 + p.y * bounds.height(),
        )
    };
    Some(match brush {
        Brush::Solid(color) => peniko::Brush::Solid(to_color(*color)),
        Brush::LinearGradient { start, end, stops } => peniko::Brush::Gradient(
            Gradient::new_linear(at(start), at(end)).with_stops(to_stops(stops).as_slice()),
        ),
        Brush::RadialGradient {
            center,
            radius,
            stops,
        } => {
            let r = radius * bounds.width().max(bounds.height());
            peniko::Brush::Gradient(
                Gradient::new_radial(at(center), r as f32).with_stops(to_stops(stops).as_slice()),
            )
        }
    })
}

fn to_stops(stops: &[sw_core::model::GradientStop]) -> Vec<ColorStop> {
    stops
        .iter()
        .map(|s| ColorStop {
            offset: s.offset,
            color: DynamicColor::from_alpha_color(to_color(s.color)),
        })
        .collect()
}

fn to_color(c: Color) -> peniko::Color {
    peniko::Color::new([c.r, c.g, c.b, c.a])
}
