//! Pointer and keyboard-modifier input types.
//!
//! The host delivers canvas-local coordinates plus a pointer-kind
//! classification and a modifier set; everything else (event loops, device
//! handling, key maps) stays on the host side.

/// Which button state a pointer event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    /// Main button — advances tool state machines.
    Primary,
    /// Alternate button — cancels / commits, per tool.
    Secondary,
    /// No button pressed (hover movement).
    None,
}

/// Keyboard modifier set accompanying a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        alt: false,
        ctrl: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };
}
