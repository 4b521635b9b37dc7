//! End-to-end editing sessions through the public `Editor` surface.

use pretty_assertions::assert_eq;
use sw_core::NodeId;
use sw_core::model::Node;
use sw_editor::{Editor, EditorCommand, Modifiers, Pointer};

fn click(editor: &mut Editor, x: f64, y: f64) {
    editor.pressed(x, y, Pointer::Primary, Modifiers::NONE);
    editor.released(x, y, Pointer::Primary, Modifiers::NONE);
}

fn line_ends(editor: &Editor, id: NodeId) -> (NodeId, NodeId) {
    match editor.canvas.store.get(id) {
        Some(Node::Line(l)) => (l.start, l.end),
        other => panic!("expected line, got {other:?}"),
    }
}

#[test]
fn drawing_a_connected_polyline_and_dragging_its_joint() {
    let mut editor = Editor::new(800.0, 600.0);

    // Two lines drawn end-to-start; try-to-connect shares the joint.
    editor.set_tool("line");
    click(&mut editor, 100.0, 100.0);
    click(&mut editor, 200.0, 100.0);
    click(&mut editor, 200.0, 100.0);
    click(&mut editor, 200.0, 200.0);
    assert_eq!(editor.canvas.items.len(), 2);
    let (l1, l2) = (editor.canvas.items[0], editor.canvas.items[1]);
    let joint = line_ends(&editor, l1).1;
    assert_eq!(line_ends(&editor, l2).0, joint);

    // Dragging the joint bends both lines.
    editor.set_tool("select");
    editor.pressed(200.0, 100.0, Pointer::Primary, Modifiers::NONE);
    assert_eq!(editor.canvas.selected, vec![joint]);
    editor.moved(250.0, 150.0, Pointer::Primary, Modifiers::NONE);
    editor.released(250.0, 150.0, Pointer::Primary, Modifiers::NONE);

    let moved = editor.canvas.store.point(joint).unwrap();
    assert_eq!((moved.x, moved.y), (250.0, 150.0));
    assert_eq!(line_ends(&editor, l1).1, joint, "still one shared handle");
}

#[test]
fn band_select_group_move_and_ungroup() {
    let mut editor = Editor::new(800.0, 600.0);

    editor.set_tool("rect");
    click(&mut editor, 100.0, 100.0);
    click(&mut editor, 140.0, 140.0);
    click(&mut editor, 200.0, 100.0);
    click(&mut editor, 240.0, 140.0);

    // Rubber band over both rectangles.
    editor.set_tool("select");
    editor.pressed(80.0, 80.0, Pointer::Primary, Modifiers::NONE);
    editor.moved(260.0, 160.0, Pointer::Primary, Modifiers::NONE);
    editor.released(260.0, 160.0, Pointer::Primary, Modifiers::NONE);
    assert_eq!(editor.canvas.selected.len(), 2);

    editor.apply(EditorCommand::Group);
    assert_eq!(editor.canvas.items.len(), 1);
    let group = editor.canvas.items[0];

    // Dragging the group body moves every member.
    editor.pressed(170.0, 120.0, Pointer::Primary, Modifiers::NONE);
    assert_eq!(editor.canvas.selected, vec![group]);
    editor.moved(170.0, 170.0, Pointer::Primary, Modifiers::NONE);
    editor.released(170.0, 170.0, Pointer::Primary, Modifiers::NONE);

    editor.apply(EditorCommand::Ungroup);
    assert_eq!(editor.canvas.items.len(), 2);
    let mut corners: Vec<(f64, f64)> = editor
        .canvas
        .items
        .iter()
        .map(|&id| match editor.canvas.store.get(id) {
            Some(Node::Rect(r)) => {
                let p = editor.canvas.store.point(r.top_left).unwrap();
                (p.x, p.y)
            }
            other => panic!("expected rect, got {other:?}"),
        })
        .collect();
    corners.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(corners, vec![(100.0, 150.0), (200.0, 150.0)]);
}

#[test]
fn pasted_cluster_keeps_internal_sharing_but_not_external() {
    let mut editor = Editor::new(800.0, 600.0);

    editor.set_tool("line");
    click(&mut editor, 0.0, 0.0);
    click(&mut editor, 60.0, 0.0);
    click(&mut editor, 60.0, 0.0);
    click(&mut editor, 60.0, 60.0);
    let (l1, l2) = (editor.canvas.items[0], editor.canvas.items[1]);
    let joint = line_ends(&editor, l1).1;

    editor.apply(EditorCommand::SelectAll);
    editor.apply(EditorCommand::Copy);
    editor.apply(EditorCommand::Paste);

    assert_eq!(editor.canvas.items.len(), 4);
    let (c1, c2) = (editor.canvas.items[2], editor.canvas.items[3]);
    assert_ne!(c1, l1);
    let pasted_joint = line_ends(&editor, c1).1;
    assert_eq!(
        line_ends(&editor, c2).0,
        pasted_joint,
        "sharing survives inside the pasted cluster"
    );
    assert_ne!(pasted_joint, joint, "but never back into the original");
    let _ = l2;
}

#[test]
fn deleting_one_shape_leaves_a_shared_vertex_usable() {
    let mut editor = Editor::new(800.0, 600.0);

    editor.set_tool("line");
    click(&mut editor, 0.0, 0.0);
    click(&mut editor, 60.0, 0.0);
    click(&mut editor, 60.0, 0.0);
    click(&mut editor, 60.0, 60.0);
    let (l1, l2) = (editor.canvas.items[0], editor.canvas.items[1]);
    let joint = line_ends(&editor, l1).1;

    // Delete the first line only; the joint handle stays live for l2.
    editor.set_tool("select");
    click(&mut editor, 30.0, 0.0);
    assert_eq!(editor.canvas.selected, vec![l1]);
    editor.apply(EditorCommand::Delete);

    assert_eq!(editor.canvas.items, vec![l2]);
    assert_eq!(line_ends(&editor, l2).0, joint);
    assert!(editor.canvas.store.contains(joint));
}
