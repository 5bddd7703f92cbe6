use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::input::{MouseButton, NavAction};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "KeybindingTable")]
/// Configurable navigation bindings mapping actions to key codes.
pub struct KeybindingOptions {
    /// Maps action → key string (e.g. `MoveForward` → `"KeyW"`).
    pub bindings: HashMap<NavAction, String>,
    /// Mouse button that enables look while held.
    pub look_button: MouseButton,
    /// Reverse lookup cache (key string → action). Rebuilt on load.
    #[serde(skip)]
    key_to_action: HashMap<String, NavAction>,
}

/// On-disk shape of [`KeybindingOptions`]; deserializing through it keeps
/// the reverse map in sync with whatever the file contained.
#[derive(Deserialize)]
#[serde(default)]
struct KeybindingTable {
    bindings: HashMap<NavAction, String>,
    look_button: MouseButton,
}

impl Default for KeybindingTable {
    fn default() -> Self {
        Self {
            bindings: HashMap::from([
                (NavAction::MoveForward, "KeyW".into()),
                (NavAction::MoveBack, "KeyS".into()),
                (NavAction::MoveLeft, "KeyA".into()),
                (NavAction::MoveRight, "KeyD".into()),
                (NavAction::MoveUp, "PageUp".into()),
                (NavAction::MoveDown, "PageDown".into()),
                (NavAction::FastMove, "ShiftLeft".into()),
            ]),
            look_button: MouseButton::Right,
        }
    }
}

impl From<KeybindingTable> for KeybindingOptions {
    fn from(table: KeybindingTable) -> Self {
        let mut opts = Self {
            bindings: table.bindings,
            look_button: table.look_button,
            key_to_action: HashMap::new(),
        };
        opts.rebuild_reverse_map();
        opts
    }
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        KeybindingTable::default().into()
    }
}

impl KeybindingOptions {
    /// Rebuild the reverse lookup map (key string → action). Call after
    /// editing [`bindings`](Self::bindings) directly.
    pub fn rebuild_reverse_map(&mut self) {
        self.key_to_action.clear();
        for (action, key) in &self.bindings {
            let previous = self.key_to_action.insert(key.clone(), *action);
            if let Some(previous) = previous {
                log::warn!(
                    "key {key} bound to both {previous:?} and {action:?}"
                );
            }
        }
    }

    /// Bind `action` to `key`, replacing its previous key.
    pub fn bind(&mut self, action: NavAction, key: impl Into<String>) {
        let _ = self.bindings.insert(action, key.into());
        self.rebuild_reverse_map();
    }

    /// Look up the action for a key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<NavAction> {
        self.key_to_action.get(key).copied()
    }

    /// Key currently bound to `action`.
    #[must_use]
    pub fn key_for(&self, action: NavAction) -> Option<&str> {
        self.bindings.get(&action).map(String::as_str)
    }
}
