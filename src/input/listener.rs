//! Capability-based input delivery.
//!
//! A listener declares which [`InputKind`]s it consumes; [`dispatch`] only
//! offers it inputs of those kinds. There is no base type with empty
//! handlers to override.

use super::keyboard::NavAction;

/// Latched input transition delivered to navigators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavInput {
    /// A bound action was pressed or released.
    Action {
        /// Which action changed.
        action: NavAction,
        /// `true` on press, `false` on release.
        pressed: bool,
    },
    /// Absolute pointer position, sampled at least once per frame.
    PointerMoved {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },
}

/// The kinds of [`NavInput`] a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// [`NavInput::Action`].
    Action,
    /// [`NavInput::PointerMoved`].
    Pointer,
}

impl NavInput {
    /// The capability needed to receive this input.
    #[must_use]
    pub const fn kind(&self) -> InputKind {
        match self {
            Self::Action { .. } => InputKind::Action,
            Self::PointerMoved { .. } => InputKind::Pointer,
        }
    }
}

/// Something that consumes navigation input.
pub trait InputListener {
    /// Input kinds this listener wants. Inputs of other kinds are never
    /// offered to [`handle_input`](Self::handle_input) by [`dispatch`].
    fn capabilities(&self) -> &[InputKind];

    /// Consume one input. Returns `true` if it changed the listener's state.
    fn handle_input(&mut self, input: &NavInput) -> bool;

    /// Whether this listener declares `kind`.
    fn accepts(&self, kind: InputKind) -> bool {
        self.capabilities().contains(&kind)
    }
}

/// Offer `input` to every listener that declares its kind. Returns how many
/// listeners consumed it.
pub fn dispatch(
    listeners: &mut [&mut dyn InputListener],
    input: &NavInput,
) -> usize {
    let kind = input.kind();
    listeners
        .iter_mut()
        .filter(|listener| listener.accepts(kind))
        .map(|listener| listener.handle_input(input))
        .filter(|consumed| *consumed)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct PointerOnly {
        seen: Vec<NavInput>,
    }

    impl InputListener for PointerOnly {
        fn capabilities(&self) -> &[InputKind] {
            &[InputKind::Pointer]
        }

        fn handle_input(&mut self, input: &NavInput) -> bool {
            self.seen.push(*input);
            true
        }
    }

    #[derive(Default)]
    struct Everything {
        count: usize,
    }

    impl InputListener for Everything {
        fn capabilities(&self) -> &[InputKind] {
            &[InputKind::Action, InputKind::Pointer]
        }

        fn handle_input(&mut self, _input: &NavInput) -> bool {
            self.count += 1;
            false
        }
    }

    #[test]
    fn dispatch_respects_capabilities() {
        let mut pointer = PointerOnly::default();
        let mut all = Everything::default();

        let press = NavInput::Action {
            action: NavAction::MoveForward,
            pressed: true,
        };
        let moved = NavInput::PointerMoved { x: 1.0, y: 2.0 };

        {
            let mut listeners: [&mut dyn InputListener; 2] =
                [&mut pointer, &mut all];
            assert_eq!(dispatch(&mut listeners, &press), 0);
            assert_eq!(dispatch(&mut listeners, &moved), 1);
        }

        assert_eq!(pointer.seen, vec![moved]);
        assert_eq!(all.count, 2);
    }

    #[test]
    fn kind_matches_variant() {
        let moved = NavInput::PointerMoved { x: 0.0, y: 0.0 };
        assert_eq!(moved.kind(), InputKind::Pointer);
        let action = NavInput::Action {
            action: NavAction::Look,
            pressed: false,
        };
        assert_eq!(action.kind(), InputKind::Action);
    }
}
