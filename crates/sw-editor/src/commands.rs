//! Keyboard-driven editing commands.
//!
//! The host owns the key map; it translates shortcuts into commands and
//! hands them to [`apply`].

use sw_core::Canvas;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    SelectAll,
    Delete,
    Cut,
    Copy,
    Paste,
    Group,
    Ungroup,
}

pub fn apply(canvas: &mut Canvas, command: EditorCommand) {
    log::debug!("command: {command:?}");
    match command {
        EditorCommand::SelectAll => canvas.select_all(),
        EditorCommand::Delete => canvas.delete_selected(),
        EditorCommand::Cut => canvas.cut(),
        EditorCommand::Copy => canvas.copy(),
        EditorCommand::Paste => canvas.paste(),
        EditorCommand::Group => canvas.group_selected(),
        EditorCommand::Ungroup => canvas.ungroup_selected(),
    }
}
