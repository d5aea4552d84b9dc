//! Drawing mode state machine driven by modifier keys.
//!
//! Modes are level-triggered on the held modifiers: every key press
//! re-evaluates the mode from the current flags, every key release returns
//! to [`DrawMode::CreateDelete`].

use crate::input::{Key, KeyEvent};

/// Gestures recognized by the drawing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    /// Free-hand strokes create polygons.
    Create,
    /// Clicking a polygon deletes it.
    Delete,
    /// Both create and delete gestures are recognized. Resting mode.
    #[default]
    CreateDelete,
    /// Vertices can be dragged.
    Edit,
    /// No drawing gestures; dragging pans the view.
    View,
}

impl DrawMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            DrawMode::Create => "Create",
            DrawMode::Delete => "Delete",
            DrawMode::CreateDelete => "Create/Delete",
            DrawMode::Edit => "Edit",
            DrawMode::View => "View",
        }
    }

    pub fn allows_create(&self) -> bool {
        matches!(self, DrawMode::Create | DrawMode::CreateDelete)
    }

    pub fn allows_delete(&self) -> bool {
        matches!(self, DrawMode::Delete | DrawMode::CreateDelete)
    }

    pub fn allows_edit(&self) -> bool {
        matches!(self, DrawMode::Edit)
    }

    pub fn is_view(&self) -> bool {
        matches!(self, DrawMode::View)
    }
}

/// What a key event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Nothing changed.
    Ignored,
    /// The active mode changed.
    ModeChanged(DrawMode),
    /// Shift+Left/Right: step the palette by -1 or +1. Mode is untouched.
    CyclePalette(i32),
}

impl KeyOutcome {
    /// Whether the host should suppress the platform's default key action.
    pub fn prevent_default(&self) -> bool {
        matches!(self, KeyOutcome::CyclePalette(_))
    }
}

/// Holds the active [`DrawMode`].
#[derive(Debug, Clone, Default)]
pub struct DrawModeController {
    mode: DrawMode,
}

impl DrawModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    /// Force a mode. Returns true if it changed.
    pub fn set_mode(&mut self, mode: DrawMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Handle a key press.
    ///
    /// Shift+Left/Right is intercepted before mode evaluation. Otherwise
    /// Alt selects Edit and Shift or Meta select View; View wins when both
    /// are held. A press with no modifiers leaves the mode alone.
    pub fn key_down(&mut self, event: &KeyEvent) -> KeyOutcome {
        let mods = event.modifiers;

        if mods.shift {
            match event.key {
                Key::Left => return KeyOutcome::CyclePalette(-1),
                Key::Right => return KeyOutcome::CyclePalette(1),
                _ => {}
            }
        }

        let target = if mods.shift || mods.meta {
            Some(DrawMode::View)
        } else if mods.alt {
            Some(DrawMode::Edit)
        } else {
            None
        };

        match target {
            Some(mode) if self.set_mode(mode) => {
                log::debug!("Draw mode: {}", mode.name());
                KeyOutcome::ModeChanged(mode)
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Handle a key release: always back to the resting mode.
    pub fn key_up(&mut self, _event: &KeyEvent) -> KeyOutcome {
        if self.set_mode(DrawMode::CreateDelete) {
            log::debug!("Draw mode: {}", DrawMode::CreateDelete.name());
            KeyOutcome::ModeChanged(DrawMode::CreateDelete)
        } else {
            KeyOutcome::Ignored
        }
    }
}
