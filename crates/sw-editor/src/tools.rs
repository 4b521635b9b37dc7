//! Pointer tools: one explicit state machine per tool.
//!
//! Construction tools place anchors on primary presses and keep the
//! trailing anchors tracking the cursor between presses, so the pending
//! shape previews live as a canvas decorator. A secondary press cancels
//! the pending shape (for the path tool it commits instead). With
//! try-to-connect on, every anchor press first looks for an existing
//! point under the cursor and reuses its handle instead of allocating a
//! fresh one — that reuse *is* the connection.

use crate::input::{Modifiers, Pointer};
use crate::surface::{FigureSurface, ToolSurface};
use kurbo::Rect;
use smallvec::smallvec;
use sw_core::model::{
    Brush, Color, Cubic, DashStyle, Ellipse, Figure, FillRule, Line, Node, Path, Pen, Quad,
    Rectangle, Store,
};
use sw_core::{Canvas, CloneMap, NodeId, clone_opt};
use sw_render::hit::{self, HIT_RADIUS};

/// A pointer tool. The editor routes host events to the active tool;
/// coordinates are canvas-local.
pub trait Tool {
    fn name(&self) -> &'static str;
    fn pressed(&mut self, canvas: &mut Canvas, x: f64, y: f64, pointer: Pointer, mods: Modifiers);
    fn moved(&mut self, canvas: &mut Canvas, x: f64, y: f64, pointer: Pointer, mods: Modifiers);
    fn released(&mut self, canvas: &mut Canvas, x: f64, y: f64, pointer: Pointer, mods: Modifiers) {
        let _ = (canvas, x, y, pointer, mods);
    }
}

/// Template style a construction tool stamps onto each shape it creates.
/// The referenced brush/pen nodes are cloned per shape, so editing one
/// committed shape's style never affects its siblings. `None` clones to
/// `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolStyle {
    pub brush: Option<NodeId>,
    pub pen: Option<NodeId>,
}

impl ToolStyle {
    /// Clone the template style nodes for one new shape. A single clone
    /// map keeps a brush shared between fill and pen shared in the copy
    /// too.
    fn instantiate(&self, store: &mut Store) -> (Option<NodeId>, Option<NodeId>) {
        let mut map = CloneMap::new();
        (
            clone_opt(store, self.brush, &mut map),
            clone_opt(store, self.pen, &mut map),
        )
    }
}

// ─── Snap helpers ────────────────────────────────────────────────────────

fn own_points(store: &Store, id: NodeId) -> Vec<NodeId> {
    let mut points = Vec::new();
    store.collect_points(id, &mut points);
    points
}

/// Existing point under the cursor, skipping `exclude` (the pending
/// shape's own anchors, which would otherwise always self-snap).
fn snap_candidate(surface: &dyn ToolSurface, x: f64, y: f64, exclude: &[NodeId]) -> Option<NodeId> {
    let items = surface.items();
    hit::contains_at(surface.store(), &items, x, y, HIT_RADIUS, &|store, id| {
        store.is_point(id) && !exclude.contains(&id)
    })
}

/// Snap to an existing point or allocate a fresh one at (x, y).
fn anchor(surface: &mut dyn ToolSurface, x: f64, y: f64, try_connect: bool) -> NodeId {
    if try_connect && let Some(p) = snap_candidate(&*surface, x, y, &[]) {
        log::trace!("anchor snapped to {p:?}");
        return p;
    }
    surface.store_mut().alloc_point(x, y)
}

/// Refresh the hover highlight to the current snap candidate, if any.
fn refresh_snap_hover(
    surface: &mut dyn ToolSurface,
    x: f64,
    y: f64,
    try_connect: bool,
    exclude: &[NodeId],
) {
    surface.clear_hovered();
    if try_connect && let Some(p) = snap_candidate(&*surface, x, y, exclude) {
        surface.add_hover(p);
    }
}

// ─── Line tool ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum LineState {
    Start,
    /// `end` tracks the cursor until the second press.
    End { line: NodeId, end: NodeId },
}

pub struct LineTool {
    state: LineState,
    pub try_connect: bool,
    style: ToolStyle,
}

impl LineTool {
    pub fn new(style: ToolStyle) -> Self {
        Self {
            state: LineState::Start,
            try_connect: true,
            style,
        }
    }

    fn in_progress(&self) -> bool {
        !matches!(self.state, LineState::Start)
    }

    fn press_on(&mut self, surface: &mut dyn ToolSurface, x: f64, y: f64, pointer: Pointer) {
        match pointer {
            Pointer::Secondary => self.cancel_on(surface),
            Pointer::None => {}
            Pointer::Primary => match self.state {
                LineState::Start => {
                    let start = anchor(surface, x, y, self.try_connect);
                    let end = surface.store_mut().alloc_point(x, y);
                    let (_, pen) = self.style.instantiate(surface.store_mut());
                    let line = surface.store_mut().alloc(Node::Line(Line {
                        start,
                        end,
                        pen,
                        stroked: true,
                    }));
                    surface.add_decorator(line);
                    surface.request_redraw();
                    self.state = LineState::End { line, end };
                }
                LineState::End { line, end } => {
                    surface.store_mut().set_point(end, x, y);
                    if self.try_connect {
                        let own = own_points(surface.store(), line);
                        if let Some(snap) = snap_candidate(&*surface, x, y, &own)
                            && let Some(Node::Line(s)) = surface.store_mut().get_mut(line)
                        {
                            s.end = snap;
                        }
                    }
                    surface.clear_hovered();
                    surface.remove_decorator(line);
                    surface.add_item(line);
                    surface.request_redraw();
                    log::debug!("line committed: {line:?}");
                    self.state = LineState::Start;
                }
            },
        }
    }

    fn move_on(&mut self, surface: &mut dyn ToolSurface, x: f64, y: f64) {
        if let LineState::End { line, end } = self.state {
            surface.store_mut().set_point(end, x, y);
            let own = own_points(surface.store(), line);
            refresh_snap_hover(surface, x, y, self.try_connect, &own);
            surface.request_redraw();
        }
    }

    fn cancel_on(&mut self, surface: &mut dyn ToolSurface) {
        if let LineState::End { line, .. } = self.state {
            surface.remove_decorator(line);
            surface.clear_hovered();
            surface.request_redraw();
            self.state = LineState::Start;
        }
    }
}

impl Tool for LineTool {
    fn name(&self) -> &'static str {
        "line"
    }

    fn pressed(&mut self, canvas: &mut Canvas, x: f64, y: f64, pointer: Pointer, _mods: Modifiers) {
        self.press_on(canvas, x, y, pointer);
    }

    fn moved(&mut self, canvas: &mut Canvas, x: f64, y: f64, _pointer: Pointer, _mods: Modifiers) {
        self.move_on(canvas, x, y);
    }
}

// ─── Rect tool ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum CornerState {
    Idle,
    Drag { shape: NodeId, corner: NodeId },
}

pub struct RectTool {
    state: CornerState,
    pub try_connect: bool,
    style: ToolStyle,
}

impl RectTool {
    pub fn new(style: ToolStyle) -> Self {
        Self {
            state: CornerState::Idle,
            try_connect: true,
            style,
        }
    }
}

impl Tool for RectTool {
    fn name(&self) -> &'static str {
        "rect"
    }

    fn pressed(&mut self, canvas: &mut Canvas, x: f64, y: f64, pointer: Pointer, _mods: Modifiers) {
        match pointer {
            Pointer::Secondary => {
                if let CornerState::Drag { shape, .. } = self.state {
                    canvas.remove_decorator(shape);
                    canvas.clear_hovered();
                    canvas.request_redraw();
                    self.state = CornerState::Idle;
                }
            }
            Pointer::None => {}
            Pointer::Primary => match self.state {
                CornerState::Idle => {
                    let top_left = anchor(canvas, x, y, self.try_connect);
                    let corner = canvas.store.alloc_point(x, y);
                    let (brush, pen) = self.style.instantiate(&mut canvas.store);
                    let shape = canvas.store.alloc(Node::Rect(Rectangle {
                        top_left,
                        bottom_right: corner,
                        brush,
                        pen,
                        stroked: true,
                        filled: brush.is_some(),
                        radius_x: 0.0,
                        radius_y: 0.0,
                    }));
                    canvas.add_decorator(shape);
                    canvas.request_redraw();
                    self.state = CornerState::Drag { shape, corner };
                }
                CornerState::Drag { shape, corner } => {
                    canvas.store.set_point(corner, x, y);
                    if self.try_connect {
                        let own = own_points(&canvas.store, shape);
                        if let Some(snap) = snap_candidate(&*canvas, x, y, &own)
                            && let Some(Node::Rect(s)) = canvas.store.get_mut(shape)
                        {
                            s.bottom_right = snap;
                        }
                    }
                    canvas.clear_hovered();
                    canvas.remove_decorator(shape);
                    canvas.items.push(shape);
                    canvas.request_redraw();
                    log::debug!("rect committed: {shape:?}");
                    self.state = CornerState::Idle;
                }
            },
        }
    }

    fn moved(&mut self, canvas: &mut Canvas, x: f64, y: f64, _pointer: Pointer, _mods: Modifiers) {
        if let CornerState::Drag { shape, corner } = self.state {
            canvas.store.set_point(corner, x, y);
            let own = own_points(&canvas.store, shape);
            refresh_snap_hover(canvas, x, y, self.try_connect, &own);
            canvas.request_redraw();
        }
    }
}

// ─── Ellipse tool ────────────────────────────────────────────────────────

pub struct EllipseTool {
    state: CornerState,
    pub try_connect: bool,
    style: ToolStyle,
}

impl EllipseTool {
    pub fn new(style: ToolStyle) -> Self {
        Self {
            state: CornerState::Idle,
            try_connect: true,
            style,
        }
    }
}

impl Tool for EllipseTool {
    fn name(&self) -> &'static str {
        "ellipse"
    }

    fn pressed(&mut self, canvas: &mut Canvas, x: f64, y: f64, pointer: Pointer, _mods: Modifiers) {
        match pointer {
            Pointer::Secondary => {
                if let CornerState::Drag { shape, .. } = self.state {
                    canvas.remove_decorator(shape);
                    canvas.clear_hovered();
                    canvas.request_redraw();
                    self.state = CornerState::Idle;
                }
            }
            Pointer::None => {}
            Pointer::Primary => match self.state {
                CornerState::Idle => {
                    let top_left = anchor(canvas, x, y, self.try_connect);
                    let corner = canvas.store.alloc_point(x, y);
                    let (brush, pen) = self.style.instantiate(&mut canvas.store);
                    let shape = canvas.store.alloc(Node::Ellipse(Ellipse {
                        top_left,
                        bottom_right: corner,
                        brush,
                        pen,
                        stroked: true,
                        filled: brush.is_some(),
                    }));
                    canvas.add_decorator(shape);
                    canvas.request_redraw();
                    self.state = CornerState::Drag { shape, corner };
                }
                CornerState::Drag { shape, corner } => {
                    canvas.store.set_point(corner, x, y);
                    if self.try_connect {
                        let own = own_points(&canvas.store, shape);
                        if let Some(snap) = snap_candidate(&*canvas, x, y, &own)
                            && let Some(Node::Ellipse(s)) = canvas.store.get_mut(shape)
                        {
                            s.bottom_right = snap;
                        }
                    }
                    canvas.clear_hovered();
                    canvas.remove_decorator(shape);
                    canvas.items.push(shape);
                    canvas.request_redraw();
                    log::debug!("ellipse committed: {shape:?}");
                    self.state = CornerState::Idle;
                }
            },
        }
    }

    fn moved(&mut self, canvas: &mut Canvas, x: f64, y: f64, _pointer: Pointer, _mods: Modifiers) {
        if let CornerState::Drag { shape, corner } = self.state {
            canvas.store.set_point(corner, x, y);
            let own = own_points(&canvas.store, shape);
            refresh_snap_hover(canvas, x, y, self.try_connect, &own);
            canvas.request_redraw();
        }
    }
}

// ─── Quad tool ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum QuadState {
    Idle,
    /// Control and end track the cursor together (straight-line preview).
    End {
        quad: NodeId,
        control: NodeId,
        end: NodeId,
    },
    /// End is settled; only the control point follows the cursor.
    Control { quad: NodeId, control: NodeId },
}

pub struct QuadTool {
    state: QuadState,
    pub try_connect: bool,
    style: ToolStyle,
}

impl QuadTool {
    pub fn new(style: ToolStyle) -> Self {
        Self {
            state: QuadState::Idle,
            try_connect: true,
            style,
        }
    }

    fn in_progress(&self) -> bool {
        !matches!(self.state, QuadState::Idle)
    }

    fn press_on(&mut self, surface: &mut dyn ToolSurface, x: f64, y: f64, pointer: Pointer) {
        match pointer {
            Pointer::Secondary => self.cancel_on(surface),
            Pointer::None => {}
            Pointer::Primary => match self.state {
                QuadState::Idle => {
                    let start = anchor(surface, x, y, self.try_connect);
                    let control = surface.store_mut().alloc_point(x, y);
                    let end = surface.store_mut().alloc_point(x, y);
                    let (brush, pen) = self.style.instantiate(surface.store_mut());
                    let quad = surface.store_mut().alloc(Node::Quad(Quad {
                        start,
                        control,
                        end,
                        brush,
                        pen,
                        stroked: true,
                        filled: false,
                    }));
                    surface.add_decorator(quad);
                    surface.request_redraw();
                    self.state = QuadState::End { quad, control, end };
                }
                QuadState::End { quad, control, end } => {
                    surface.store_mut().set_point(control, x, y);
                    surface.store_mut().set_point(end, x, y);
                    if self.try_connect {
                        let own = own_points(surface.store(), quad);
                        if let Some(snap) = snap_candidate(&*surface, x, y, &own)
                            && let Some(Node::Quad(s)) = surface.store_mut().get_mut(quad)
                        {
                            s.end = snap;
                        }
                    }
                    surface.request_redraw();
                    self.state = QuadState::Control { quad, control };
                }
                QuadState::Control { quad, control } => {
                    surface.store_mut().set_point(control, x, y);
                    if self.try_connect {
                        let own = own_points(surface.store(), quad);
                        if let Some(snap) = snap_candidate(&*surface, x, y, &own)
                            && let Some(Node::Quad(s)) = surface.store_mut().get_mut(quad)
                        {
                            s.control = snap;
                        }
                    }
                    surface.clear_hovered();
                    surface.remove_decorator(quad);
                    surface.add_item(quad);
                    surface.request_redraw();
                    log::debug!("quad committed: {quad:?}");
                    self.state = QuadState::Idle;
                }
            },
        }
    }

    fn move_on(&mut self, surface: &mut dyn ToolSurface, x: f64, y: f64) {
        match self.state {
            QuadState::Idle => {}
            QuadState::End { quad, control, end } => {
                surface.store_mut().set_point(control, x, y);
                surface.store_mut().set_point(end, x, y);
                let own = own_points(surface.store(), quad);
                refresh_snap_hover(surface, x, y, self.try_connect, &own);
                surface.request_redraw();
            }
            QuadState::Control { quad, control } => {
                surface.store_mut().set_point(control, x, y);
                let own = own_points(surface.store(), quad);
                refresh_snap_hover(surface, x, y, self.try_connect, &own);
                surface.request_redraw();
            }
        }
    }

    fn cancel_on(&mut self, surface: &mut dyn ToolSurface) {
        match self.state {
            QuadState::Idle => {}
            QuadState::End { quad, .. } | QuadState::Control { quad, .. } => {
                surface.remove_decorator(quad);
                surface.clear_hovered();
                surface.request_redraw();
                self.state = QuadState::Idle;
            }
        }
    }
}

impl Tool for QuadTool {
    fn name(&self) -> &'static str {
        "quad"
    }

    fn pressed(&mut self, canvas: &mut Canvas, x: f64, y: f64, pointer: Pointer, _mods: Modifiers) {
        self.press_on(canvas, x, y, pointer);
    }

    fn moved(&mut self, canvas: &mut Canvas, x: f64, y: f64, _pointer: Pointer, _mods: Modifiers) {
        self.move_on(canvas, x, y);
    }
}

// ─── Cubic tool ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum CubicState {
    Idle,
    /// Both controls and the end track the cursor.
    End {
        cubic: NodeId,
        c1: NodeId,
        c2: NodeId,
        end: NodeId,
    },
    /// End settled; c1 and c2 track the cursor together.
    C2 { cubic: NodeId, c1: NodeId, c2: NodeId },
    /// Only c1 still follows the cursor.
    C1 { cubic: NodeId, c1: NodeId },
}

pub struct CubicTool {
    state: CubicState,
    pub try_connect: bool,
    style: ToolStyle,
}

impl CubicTool {
    pub fn new(style: ToolStyle) -> Self {
        Self {
            state: CubicState::Idle,
            try_connect: true,
            style,
        }
    }

    fn in_progress(&self) -> bool {
        !matches!(self.state, CubicState::Idle)
    }

    fn snap_field(
        &self,
        surface: &mut dyn ToolSurface,
        cubic: NodeId,
        x: f64,
        y: f64,
        pick: fn(&mut Cubic) -> &mut NodeId,
    ) {
        if !self.try_connect {
            return;
        }
        let own = own_points(surface.store(), cubic);
        if let Some(snap) = snap_candidate(&*surface, x, y, &own)
            && let Some(Node::Cubic(s)) = surface.store_mut().get_mut(cubic)
        {
            *pick(s) = snap;
        }
    }

    fn press_on(&mut self, surface: &mut dyn ToolSurface, x: f64, y: f64, pointer: Pointer) {
        match pointer {
            Pointer::Secondary => self.cancel_on(surface),
            Pointer::None => {}
            Pointer::Primary => match self.state {
                CubicState::Idle => {
                    let start = anchor(surface, x, y, self.try_connect);
                    let c1 = surface.store_mut().alloc_point(x, y);
                    let c2 = surface.store_mut().alloc_point(x, y);
                    let end = surface.store_mut().alloc_point(x, y);
                    let (brush, pen) = self.style.instantiate(surface.store_mut());
                    let cubic = surface.store_mut().alloc(Node::Cubic(Cubic {
                        start,
                        c1,
                        c2,
                        end,
                        brush,
                        pen,
                        stroked: true,
                        filled: false,
                    }));
                    surface.add_decorator(cubic);
                    surface.request_redraw();
                    self.state = CubicState::End { cubic, c1, c2, end };
                }
                CubicState::End { cubic, c1, c2, end } => {
                    for p in [c1, c2, end] {
                        surface.store_mut().set_point(p, x, y);
                    }
                    self.snap_field(surface, cubic, x, y, |s| &mut s.end);
                    surface.request_redraw();
                    self.state = CubicState::C2 { cubic, c1, c2 };
                }
                CubicState::C2 { cubic, c1, c2 } => {
                    for p in [c1, c2] {
                        surface.store_mut().set_point(p, x, y);
                    }
                    self.snap_field(surface, cubic, x, y, |s| &mut s.c2);
                    surface.request_redraw();
                    self.state = CubicState::C1 { cubic, c1 };
                }
                CubicState::C1 { cubic, c1 } => {
                    surface.store_mut().set_point(c1, x, y);
                    self.snap_field(surface, cubic, x, y, |s| &mut s.c1);
                    surface.clear_hovered();
                    surface.remove_decorator(cubic);
                    surface.add_item(cubic);
                    surface.request_redraw();
                    log::debug!("cubic committed: {cubic:?}");
                    self.state = CubicState::Idle;
                }
            },
        }
    }

    fn move_on(&mut self, surface: &mut dyn ToolSurface, x: f64, y: f64) {
        let (cubic, tracking): (NodeId, &[NodeId]) = match &self.state {
            CubicState::Idle => return,
            CubicState::End { cubic, c1, c2, end } => (*cubic, &[*c1, *c2, *end]),
            CubicState::C2 { cubic, c1, c2 } => (*cubic, &[*c1, *c2]),
            CubicState::C1 { cubic, c1 } => (*cubic, &[*c1]),
        };
        for &p in tracking {
            surface.store_mut().set_point(p, x, y);
        }
        let own = own_points(surface.store(), cubic);
        refresh_snap_hover(surface, x, y, self.try_connect, &own);
        surface.request_redraw();
    }

    fn cancel_on(&mut self, surface: &mut dyn ToolSurface) {
        let cubic = match self.state {
            CubicState::Idle => return,
            CubicState::End { cubic, .. }
            | CubicState::C2 { cubic, .. }
            | CubicState::C1 { cubic, .. } => cubic,
        };
        surface.remove_decorator(cubic);
        surface.clear_hovered();
        surface.request_redraw();
        self.state = CubicState::Idle;
    }
}

impl Tool for CubicTool {
    fn name(&self) -> &'static str {
        "cubic"
    }

    fn pressed(&mut self, canvas: &mut Canvas, x: f64, y: f64, pointer: Pointer, _mods: Modifiers) {
        self.press_on(canvas, x, y, pointer);
    }

    fn moved(&mut self, canvas: &mut Canvas, x: f64, y: f64, _pointer: Pointer, _mods: Modifiers) {
        self.move_on(canvas, x, y);
    }
}

// ─── Path tool ───────────────────────────────────────────────────────────

/// What the next path segment will be. `Move` closes the current figure
/// and opens a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMode {
    Line,
    Cubic,
    Quad,
    Move,
}

/// Builds multi-figure paths by embedding the segment tools and pointing
/// them at the pending path's current figure. Mode changes apply to the
/// next segment; a segment mid-construction finishes in the mode it
/// started in. A secondary press commits the path (or discards it when no
/// segment was finished).
pub struct PathTool {
    pub mode: PathMode,
    pub close_figures: bool,
    style: ToolStyle,
    path: Option<NodeId>,
    active: Option<PathMode>,
    line: LineTool,
    quad: QuadTool,
    cubic: CubicTool,
}

impl PathTool {
    pub fn new(style: ToolStyle) -> Self {
        // The embedded tools stroke the in-flight segment with the
        // template pen so the preview is visible; on commit into the
        // figure the segment style is stripped and the path node strokes
        // and fills the whole outline.
        let segment_style = ToolStyle {
            brush: None,
            pen: style.pen,
        };
        Self {
            mode: PathMode::Line,
            close_figures: false,
            style,
            path: None,
            active: None,
            line: LineTool::new(segment_style),
            quad: QuadTool::new(segment_style),
            cubic: CubicTool::new(segment_style),
        }
    }

    pub fn set_try_connect(&mut self, on: bool) {
        self.line.try_connect = on;
        self.quad.try_connect = on;
        self.cubic.try_connect = on;
    }

    fn ensure_path(&mut self, canvas: &mut Canvas) -> NodeId {
        if let Some(path) = self.path {
            return path;
        }
        let (brush, pen) = self.style.instantiate(&mut canvas.store);
        let path = canvas.store.alloc(Node::Path(Path {
            figures: smallvec![Figure::default()],
            brush,
            pen,
            stroked: true,
            filled: false,
            fill_rule: FillRule::NonZero,
        }));
        canvas.add_decorator(path);
        self.path = Some(path);
        log::debug!("path started: {path:?}");
        path
    }

    /// Close out the current figure and open an empty one.
    fn open_figure(&mut self, canvas: &mut Canvas, path: NodeId) {
        if let Some(Node::Path(p)) = canvas.store.get_mut(path) {
            if let Some(figure) = p.figures.last_mut()
                && !figure.segments.is_empty()
            {
                figure.closed = self.close_figures;
                p.figures.push(Figure::default());
            }
            canvas.request_redraw();
        }
    }

    /// Finalize on secondary press: cancel any half-built segment, drop
    /// empty figures, and commit the path when it has segments.
    fn commit(&mut self, canvas: &mut Canvas) {
        let Some(path) = self.path.take() else {
            return;
        };
        if let Some(active) = self.active.take() {
            let mut surface = FigureSurface::new(canvas, path);
            match active {
                PathMode::Line => self.line.cancel_on(&mut surface),
                PathMode::Quad => self.quad.cancel_on(&mut surface),
                PathMode::Cubic => self.cubic.cancel_on(&mut surface),
                PathMode::Move => {}
            }
        }
        let close = self.close_figures;
        let committed = match canvas.store.get_mut(path) {
            Some(Node::Path(p)) => {
                p.figures.retain(|f| !f.segments.is_empty());
                if let Some(figure) = p.figures.last_mut() {
                    figure.closed = close;
                }
                p.segment_count() > 0
            }
            _ => false,
        };
        canvas.remove_decorator(path);
        if committed {
            canvas.items.push(path);
            log::debug!("path committed: {path:?}");
        }
        canvas.clear_hovered();
        canvas.request_redraw();
    }
}

impl Tool for PathTool {
    fn name(&self) -> &'static str {
        "path"
    }

    fn pressed(&mut self, canvas: &mut Canvas, x: f64, y: f64, pointer: Pointer, _mods: Modifiers) {
        match pointer {
            Pointer::Secondary => self.commit(canvas),
            Pointer::None => {}
            Pointer::Primary => {
                let path = self.ensure_path(canvas);
                // A segment under construction finishes in its own mode.
                let mode = self.active.unwrap_or(self.mode);
                if mode == PathMode::Move {
                    self.open_figure(canvas, path);
                    return;
                }
                let mut surface = FigureSurface::new(canvas, path);
                match mode {
                    PathMode::Line => self.line.press_on(&mut surface, x, y, pointer),
                    PathMode::Quad => self.quad.press_on(&mut surface, x, y, pointer),
                    PathMode::Cubic => self.cubic.press_on(&mut surface, x, y, pointer),
                    PathMode::Move => unreachable!("handled above"),
                }
                let pending = match mode {
                    PathMode::Line => self.line.in_progress(),
                    PathMode::Quad => self.quad.in_progress(),
                    PathMode::Cubic => self.cubic.in_progress(),
                    PathMode::Move => false,
                };
                self.active = pending.then_some(mode);
            }
        }
    }

    fn moved(&mut self, canvas: &mut Canvas, x: f64, y: f64, _pointer: Pointer, _mods: Modifiers) {
        let (Some(path), Some(active)) = (self.path, self.active) else {
            return;
        };
        let mut surface = FigureSurface::new(canvas, path);
        match active {
            PathMode::Line => self.line.move_on(&mut surface, x, y),
            PathMode::Quad => self.quad.move_on(&mut surface, x, y),
            PathMode::Cubic => self.cubic.move_on(&mut surface, x, y),
            PathMode::Move => {}
        }
    }
}

// ─── Select tool ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum SelectState {
    Idle,
    /// Incremental drag: each move translates the selection by the delta
    /// since the previous event. `connect` is off for Alt-initiated drags
    /// so a just-disconnected point does not reconnect on release.
    Drag {
        last_x: f64,
        last_y: f64,
        connect: bool,
    },
    Band { origin_x: f64, origin_y: f64 },
}

/// The rubber-band rectangle decorator, allocated once and reused.
#[derive(Debug, Clone, Copy)]
struct BandRect {
    rect: NodeId,
    near: NodeId,
    far: NodeId,
}

/// Selection, dragging, rubber-band marquee, and the connect/disconnect
/// gestures:
/// dropping a lone dragged point onto another point rewires them into one
/// shared handle, and an Alt-press on a point tears its first usage off
/// onto a fresh handle.
pub struct SelectTool {
    state: SelectState,
    pub try_connect: bool,
    band: Option<BandRect>,
}

impl Default for SelectTool {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectTool {
    pub fn new() -> Self {
        Self {
            state: SelectState::Idle,
            try_connect: true,
            band: None,
        }
    }

    fn ensure_band(&mut self, canvas: &mut Canvas) -> BandRect {
        if let Some(band) = self.band {
            return band;
        }
        let brush = canvas
            .store
            .alloc(Node::Brush(Brush::Solid(Color::rgba(0.3, 0.5, 0.9, 1.0))));
        let pen = canvas.store.alloc(Node::Pen(Pen {
            brush: Some(brush),
            thickness: 1.0,
            dashes: Some(DashStyle {
                pattern: vec![4.0, 4.0],
                offset: 0.0,
            }),
            ..Pen::default()
        }));
        let near = canvas.store.alloc_point(0.0, 0.0);
        let far = canvas.store.alloc_point(0.0, 0.0);
        let rect = canvas.store.alloc(Node::Rect(Rectangle {
            top_left: near,
            bottom_right: far,
            brush: None,
            pen: Some(pen),
            stroked: true,
            filled: false,
            radius_x: 0.0,
            radius_y: 0.0,
        }));
        let band = BandRect { rect, near, far };
        self.band = Some(band);
        band
    }

    /// The one dragged point, when the selection is exactly one point.
    fn dragged_point(&self, canvas: &Canvas) -> Option<NodeId> {
        match canvas.selected.as_slice() {
            &[only] if canvas.store.is_point(only) => Some(only),
            _ => None,
        }
    }
}

impl Tool for SelectTool {
    fn name(&self) -> &'static str {
        "select"
    }

    fn pressed(&mut self, canvas: &mut Canvas, x: f64, y: f64, pointer: Pointer, mods: Modifiers) {
        if pointer != Pointer::Primary {
            // Secondary abandons a rubber band in progress.
            if let SelectState::Band { .. } = self.state
                && let Some(band) = self.band
            {
                canvas.remove_decorator(band.rect);
                canvas.request_redraw();
            }
            self.state = SelectState::Idle;
            return;
        }
        let hit = hit::contains_at(&canvas.store, &canvas.items, x, y, HIT_RADIUS, &hit::any);
        match hit {
            Some(hit) => {
                if mods.alt && canvas.store.is_point(hit) {
                    canvas.disconnect_point(hit);
                }
                if mods.ctrl {
                    canvas.toggle_selected(hit);
                } else if !canvas.is_selected(hit) {
                    canvas.clear_selection();
                    canvas.select(hit);
                }
                canvas.update_selection_bounds();
                canvas.request_redraw();
                self.state = SelectState::Drag {
                    last_x: x,
                    last_y: y,
                    connect: !mods.alt,
                };
            }
            None => {
                if !mods.ctrl {
                    canvas.clear_selection();
                    canvas.update_selection_bounds();
                }
                let band = self.ensure_band(canvas);
                canvas.store.set_point(band.near, x, y);
                canvas.store.set_point(band.far, x, y);
                canvas.add_decorator(band.rect);
                canvas.request_redraw();
                self.state = SelectState::Band {
                    origin_x: x,
                    origin_y: y,
                };
            }
        }
    }

    fn moved(&mut self, canvas: &mut Canvas, x: f64, y: f64, _pointer: Pointer, _mods: Modifiers) {
        match self.state {
            SelectState::Idle => {
                canvas.clear_hovered();
                if self.try_connect
                    && let Some(p) = hit::contains_at(
                        &canvas.store,
                        &canvas.items,
                        x,
                        y,
                        HIT_RADIUS,
                        &hit::points_only,
                    )
                {
                    canvas.add_hover(p);
                }
                canvas.request_redraw();
            }
            SelectState::Drag {
                last_x,
                last_y,
                connect,
            } => {
                canvas.move_selected(x - last_x, y - last_y);
                self.state = SelectState::Drag {
                    last_x: x,
                    last_y: y,
                    connect,
                };
                // Connect feedback while a lone point is in flight.
                if let Some(dragged) = self.dragged_point(canvas) {
                    canvas.clear_hovered();
                    if self.try_connect
                        && connect
                        && let Some(p) = hit::contains_at(
                            &canvas.store,
                            &canvas.items,
                            x,
                            y,
                            HIT_RADIUS,
                            &|store, id| store.is_point(id) && id != dragged,
                        )
                    {
                        canvas.add_hover(p);
                    }
                }
            }
            SelectState::Band { .. } => {
                if let Some(band) = self.band {
                    canvas.store.set_point(band.far, x, y);
                    canvas.request_redraw();
                }
            }
        }
    }

    fn released(&mut self, canvas: &mut Canvas, x: f64, y: f64, _pointer: Pointer, mods: Modifiers) {
        match self.state {
            SelectState::Idle => {}
            SelectState::Drag { connect, .. } => {
                if self.try_connect
                    && connect
                    && let Some(dragged) = self.dragged_point(canvas)
                    && let Some(target) = hit::contains_at(
                        &canvas.store,
                        &canvas.items,
                        x,
                        y,
                        HIT_RADIUS,
                        &|store, id| store.is_point(id) && id != dragged,
                    )
                    && canvas.connect_point(dragged, target)
                {
                    log::debug!("drop-connect {dragged:?} onto {target:?}");
                }
                canvas.clear_hovered();
                canvas.update_selection_bounds();
                canvas.request_redraw();
                self.state = SelectState::Idle;
            }
            SelectState::Band { origin_x, origin_y } => {
                let rect = Rect::from_points((origin_x, origin_y), (x, y));
                let hits = hit::intersects_items(&canvas.store, &canvas.items, rect);
                if mods.ctrl {
                    for h in hits {
                        canvas.toggle_selected(h);
                    }
                } else {
                    canvas.clear_selection();
                    for h in hits {
                        canvas.select(h);
                    }
                }
                if let Some(band) = self.band {
                    canvas.remove_decorator(band.rect);
                }
                canvas.update_selection_bounds();
                canvas.request_redraw();
                self.state = SelectState::Idle;
            }
        }
    }
}
