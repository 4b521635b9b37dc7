//! A scripted editing session, driven the way a host would drive the
//! editor. Run with `RUST_LOG=debug` to watch the operations go by.

use sw_editor::{Editor, EditorCommand, Modifiers, Pointer};

fn click(editor: &mut Editor, x: f64, y: f64) {
    editor.pressed(x, y, Pointer::Primary, Modifiers::NONE);
    editor.released(x, y, Pointer::Primary, Modifiers::NONE);
}

fn main() {
    env_logger::init();

    let mut editor = Editor::new(800.0, 600.0);

    // A connected zig-zag: three lines sharing their joints.
    editor.set_tool("line");
    click(&mut editor, 100.0, 300.0);
    click(&mut editor, 200.0, 200.0);
    click(&mut editor, 200.0, 200.0);
    click(&mut editor, 300.0, 300.0);
    click(&mut editor, 300.0, 300.0);
    click(&mut editor, 400.0, 200.0);

    // A rectangle next to it.
    editor.set_tool("rect");
    click(&mut editor, 450.0, 200.0);
    editor.moved(550.0, 300.0, Pointer::None, Modifiers::NONE);
    click(&mut editor, 550.0, 300.0);

    // Select everything, group it, duplicate the group, and shift the
    // copy down.
    editor.set_tool("select");
    editor.apply(EditorCommand::SelectAll);
    editor.apply(EditorCommand::Group);
    editor.apply(EditorCommand::Copy);
    editor.apply(EditorCommand::Paste);
    editor.canvas.move_selected(0.0, 150.0);

    println!(
        "session done: {} item(s), {} node(s) in the store",
        editor.canvas.items.len(),
        editor.canvas.store.len()
    );
}
