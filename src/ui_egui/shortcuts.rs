use egui::{Key, Modifiers};

/// Keyboard commands the calendar reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Escape: cancel the active gesture, else close the editor
    Close,
    /// Ctrl+S / Cmd+S: save the open draft
    Save,
}

/// Map a key press to a calendar shortcut
pub fn shortcut_for(key: Key, modifiers: Modifiers) -> Option<Shortcut> {
    match key {
        Key::Escape => Some(Shortcut::Close),
        // `command` is Ctrl on Linux/Windows and Cmd on macOS
        Key::S if modifiers.command || modifiers.ctrl || modifiers.mac_cmd => Some(Shortcut::Save),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_closes() {
        assert_eq!(shortcut_for(Key::Escape, Modifiers::NONE), Some(Shortcut::Close));
    }

    #[test]
    fn test_save_needs_modifier() {
        assert_eq!(shortcut_for(Key::S, Modifiers::NONE), None);
        assert_eq!(shortcut_for(Key::S, Modifiers::CTRL), Some(Shortcut::Save));
        assert_eq!(shortcut_for(Key::S, Modifiers::COMMAND), Some(Shortcut::Save));
        assert_eq!(shortcut_for(Key::S, Modifiers::MAC_CMD), Some(Shortcut::Save));
    }

    #[test]
    fn test_other_keys_ignored() {
        assert_eq!(shortcut_for(Key::Enter, Modifiers::CTRL), None);
    }
}
