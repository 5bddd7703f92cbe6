use serde::{Deserialize, Serialize};

/// Navigation actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// move_forward = "KeyW"
/// fast_move = "ShiftLeft"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavAction {
    /// Move along the camera forward axis.
    MoveForward,
    /// Move against the camera forward axis.
    MoveBack,
    /// Move against the camera right axis.
    MoveLeft,
    /// Move along the camera right axis.
    MoveRight,
    /// Move along the camera up axis.
    MoveUp,
    /// Move against the camera up axis.
    MoveDown,
    /// Multiply the speed cap while held.
    FastMove,
    /// Turn pointer motion into yaw/pitch while held.
    Look,
}

impl NavAction {
    /// Every action, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::MoveForward,
        Self::MoveBack,
        Self::MoveLeft,
        Self::MoveRight,
        Self::MoveUp,
        Self::MoveDown,
        Self::FastMove,
        Self::Look,
    ];

    /// Whether this is one of the six movement actions.
    #[must_use]
    pub const fn is_movement(self) -> bool {
        !matches!(self, Self::FastMove | Self::Look)
    }
}
