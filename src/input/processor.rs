//! Converts raw platform events into navigation input.
//!
//! The `InputProcessor` owns the transient input state (pointer position,
//! look button, fast-move sources) and the key-binding map. It sits between
//! raw window events and whatever [`InputListener`](super::InputListener)
//! drives the camera, and only ever emits *transitions*: holding a key that
//! is already held produces nothing.

use super::event::{InputEvent, MouseButton};
use super::keyboard::NavAction;
use super::listener::NavInput;
use crate::options::KeybindingOptions;

/// Converts raw window events and key strings into [`NavInput`]s.
///
/// # Usage
///
/// ```
/// use camkit::input::{InputProcessor, NavAction, NavInput};
///
/// let mut processor = InputProcessor::new();
/// let input = processor.handle_key("KeyW", true);
/// assert_eq!(
///     input,
///     Some(NavInput::Action { action: NavAction::MoveForward, pressed: true })
/// );
/// // Key repeat is not a transition.
/// assert_eq!(processor.handle_key("KeyW", true), None);
/// ```
#[derive(Debug, Clone)]
pub struct InputProcessor {
    /// Last reported cursor position in physical pixels.
    pointer: Option<(f32, f32)>,
    /// Actions currently held, indexed like [`NavAction::ALL`].
    held: [bool; NavAction::ALL.len()],
    /// Whether the shift modifier is currently reported.
    shift_modifier: bool,
    /// Whether a key bound to [`NavAction::FastMove`] is held.
    fast_key: bool,
    /// Key string ↔ action mapping and the look button.
    keybindings: KeybindingOptions,
}

impl InputProcessor {
    /// Create a processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_keybindings(KeybindingOptions::default())
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_keybindings(keybindings: KeybindingOptions) -> Self {
        Self {
            pointer: None,
            held: [false; NavAction::ALL.len()],
            shift_modifier: false,
            fast_key: false,
            keybindings,
        }
    }

    /// Last cursor position, if any has been reported.
    #[must_use]
    pub fn pointer(&self) -> Option<(f32, f32)> {
        self.pointer
    }

    /// Whether `action` is currently held.
    #[must_use]
    pub fn is_held(&self, action: NavAction) -> bool {
        self.held[action_index(action)]
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn keybindings(&self) -> &KeybindingOptions {
        &self.keybindings
    }

    /// Replace the key bindings. Held actions stay latched until released.
    pub fn set_keybindings(&mut self, keybindings: KeybindingOptions) {
        self.keybindings = keybindings;
    }

    /// Translate a key press/release. `key` uses the
    /// `winit::keyboard::KeyCode` debug format (`"KeyW"`, `"PageUp"`).
    /// Returns `None` for unbound keys and for non-transitions.
    pub fn handle_key(&mut self, key: &str, pressed: bool) -> Option<NavInput> {
        let action = self.keybindings.lookup(key)?;
        if action == NavAction::FastMove {
            self.fast_key = pressed;
            return self.sync_fast_move();
        }
        self.transition(action, pressed)
    }

    /// Process a raw input event and return zero or one navigation inputs.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<NavInput> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.pointer = Some((x, y));
                Some(NavInput::PointerMoved { x, y })
            }
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed)
            }
            InputEvent::ModifiersChanged { shift } => {
                self.shift_modifier = shift;
                self.sync_fast_move()
            }
        }
    }

    /// Release everything currently held, e.g. when the window loses focus.
    pub fn release_all(&mut self) -> Vec<NavInput> {
        self.shift_modifier = false;
        self.fast_key = false;
        NavAction::ALL
            .iter()
            .filter_map(|action| self.transition(*action, false))
            .collect()
    }

    fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
    ) -> Option<NavInput> {
        if button != self.keybindings.look_button {
            return None;
        }
        self.transition(NavAction::Look, pressed)
    }

    /// Fast-move is held while either the shift modifier or a bound key is.
    fn sync_fast_move(&mut self) -> Option<NavInput> {
        let held = self.shift_modifier || self.fast_key;
        self.transition(NavAction::FastMove, held)
    }

    fn transition(
        &mut self,
        action: NavAction,
        pressed: bool,
    ) -> Option<NavInput> {
        let slot = &mut self.held[action_index(action)];
        if *slot == pressed {
            return None;
        }
        *slot = pressed;
        let state = if pressed { "pressed" } else { "released" };
        log::trace!("{action:?} {state}");
        Some(NavInput::Action { action, pressed })
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Slot of `action` in the held table; matches the order of
/// [`NavAction::ALL`].
const fn action_index(action: NavAction) -> usize {
    match action {
        NavAction::MoveForward => 0,
        NavAction::MoveBack => 1,
        NavAction::MoveLeft => 2,
        NavAction::MoveRight => 3,
        NavAction::MoveUp => 4,
        NavAction::MoveDown => 5,
        NavAction::FastMove => 6,
        NavAction::Look => 7,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(action: NavAction, pressed: bool) -> Option<NavInput> {
        Some(NavInput::Action { action, pressed })
    }

    #[test]
    fn default_bindings_cover_movement() {
        let mut p = InputProcessor::new();
        let expected = [
            ("KeyW", NavAction::MoveForward),
            ("KeyS", NavAction::MoveBack),
            ("KeyA", NavAction::MoveLeft),
            ("KeyD", NavAction::MoveRight),
            ("PageUp", NavAction::MoveUp),
            ("PageDown", NavAction::MoveDown),
        ];
        for (key, nav) in expected {
            assert_eq!(p.handle_key(key, true), action(nav, true), "{key}");
        }
        assert_eq!(p.handle_key("KeyZ", true), None);
    }

    #[test]
    fn only_transitions_are_emitted() {
        let mut p = InputProcessor::new();
        assert!(p.handle_key("KeyW", true).is_some());
        assert!(p.handle_key("KeyW", true).is_none());
        assert!(p.is_held(NavAction::MoveForward));
        assert_eq!(
            p.handle_key("KeyW", false),
            action(NavAction::MoveForward, false)
        );
        assert!(p.handle_key("KeyW", false).is_none());
    }

    #[test]
    fn look_follows_configured_button() {
        let mut p = InputProcessor::new();
        let left = InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        };
        assert_eq!(p.handle_event(left), None);

        let right = InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed: true,
        };
        assert_eq!(p.handle_event(right), action(NavAction::Look, true));

        let mut bindings = KeybindingOptions::default();
        bindings.look_button = MouseButton::Left;
        p.set_keybindings(bindings);
        let left_up = InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        };
        assert_eq!(p.handle_event(left_up), action(NavAction::Look, false));
    }

    #[test]
    fn shift_and_fast_key_merge() {
        let mut p = InputProcessor::new();
        let shift_down = InputEvent::ModifiersChanged { shift: true };
        let shift_up = InputEvent::ModifiersChanged { shift: false };

        assert_eq!(
            p.handle_event(shift_down),
            action(NavAction::FastMove, true)
        );
        // The bound shift key arrives as well; still one press.
        assert_eq!(p.handle_key("ShiftLeft", true), None);
        assert_eq!(p.handle_event(shift_up), None);
        assert_eq!(
            p.handle_key("ShiftLeft", false),
            action(NavAction::FastMove, false)
        );
    }

    #[test]
    fn cursor_is_tracked() {
        let mut p = InputProcessor::new();
        assert_eq!(p.pointer(), None);
        let input = p.handle_event(InputEvent::CursorMoved { x: 3.0, y: 4.0 });
        assert_eq!(input, Some(NavInput::PointerMoved { x: 3.0, y: 4.0 }));
        assert_eq!(p.pointer(), Some((3.0, 4.0)));
    }

    #[test]
    fn release_all_emits_each_held_action_once() {
        let mut p = InputProcessor::new();
        let _ = p.handle_key("KeyW", true);
        let _ = p.handle_key("KeyD", true);
        let released = p.release_all();
        assert_eq!(released.len(), 2);
        assert!(p.release_all().is_empty());
    }

    #[test]
    fn every_action_has_its_own_slot() {
        for (slot, action) in NavAction::ALL.into_iter().enumerate() {
            assert_eq!(action_index(action), slot, "{action:?}");
        }

        let mut p = InputProcessor::new();
        let _ = p.handle_key("KeyD", true);
        for action in NavAction::ALL {
            let held = action == NavAction::MoveRight;
            assert_eq!(p.is_held(action), held, "{action:?}");
        }
    }
}
