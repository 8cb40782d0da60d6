use serde::{Deserialize, Serialize};

/// Key name that moves the player left.
pub const KEY_LEFT: &str = "ArrowLeft";
/// Key name that moves the player right.
pub const KEY_RIGHT: &str = "ArrowRight";
/// Key name that jumps.
pub const KEY_JUMP: &str = "ArrowUp";
/// Key name that fires (the browser reports the space bar as `" "`).
pub const KEY_FIRE: &str = " ";

/// Pressed state of the logical keys the simulation reads.
///
/// The input layer writes it on key events; the simulation only reads it,
/// except that winning a level clears every key so nothing stays held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub fire: bool,
}

impl InputState {
    /// Update a key by its logical name. Returns `false` for unmapped names.
    pub fn set_key(&mut self, name: &str, pressed: bool) -> bool {
        match name {
            KEY_LEFT => self.left = pressed,
            KEY_RIGHT => self.right = pressed,
            KEY_JUMP => self.jump = pressed,
            KEY_FIRE | "Space" => self.fire = pressed,
            _ => {
                tracing::trace!(key = name, "ignoring unmapped key");
                return false;
            },
        }
        true
    }

    pub fn is_pressed(&self, name: &str) -> bool {
        match name {
            KEY_LEFT => self.left,
            KEY_RIGHT => self.right,
            KEY_JUMP => self.jump,
            KEY_FIRE | "Space" => self.fire,
            _ => false,
        }
    }

    /// Horizontal intent: -1 (left), 0, or +1 (right). Opposing keys cancel.
    pub fn move_dir(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names_map_to_fields() {
        let mut input = InputState::default();
        assert!(input.set_key("ArrowLeft", true));
        assert!(input.set_key("ArrowUp", true));
        assert!(input.set_key(" ", true));
        assert!(input.left && input.jump && input.fire);
        assert!(!input.right);
        assert!(input.is_pressed("Space"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut input = InputState::default();
        assert!(!input.set_key("KeyQ", true));
        assert_eq!(input, InputState::default());
        assert!(!input.is_pressed("KeyQ"));
    }

    #[test]
    fn opposing_keys_cancel() {
        let input = InputState {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(input.move_dir(), 0.0);
    }

    #[test]
    fn clear_releases_everything() {
        let mut input = InputState {
            left: true,
            right: true,
            jump: true,
            fire: true,
        };
        input.clear();
        assert_eq!(input, InputState::default());
    }
}
