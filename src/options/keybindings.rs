use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::input::KeyAction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Configurable keyboard bindings mapping actions to key codes.
pub struct KeybindingOptions {
    /// Maps action → key string (e.g. `Exit` → `"Escape"`).
    pub bindings: HashMap<KeyAction, String>,
    /// Reverse lookup cache (key string → action). Rebuilt on load.
    #[serde(skip)]
    key_to_action: HashMap<String, KeyAction>,
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        let bindings = HashMap::from([
            (KeyAction::ToggleAnimation, "Space".into()),
            (KeyAction::YawLeft, "ArrowLeft".into()),
            (KeyAction::YawRight, "ArrowRight".into()),
            (KeyAction::PitchUp, "ArrowUp".into()),
            (KeyAction::PitchDown, "ArrowDown".into()),
            (KeyAction::LightLeft, "KeyJ".into()),
            (KeyAction::LightRight, "KeyL".into()),
            (KeyAction::LightUp, "KeyU".into()),
            (KeyAction::LightDown, "KeyO".into()),
            (KeyAction::LightForward, "KeyI".into()),
            (KeyAction::LightBack, "KeyK".into()),
            (KeyAction::ZoomIn, "Equal".into()),
            (KeyAction::ZoomOut, "Minus".into()),
            (KeyAction::ResetCamera, "KeyR".into()),
            (KeyAction::Exit, "Escape".into()),
        ]);

        let mut opts = Self {
            bindings,
            key_to_action: HashMap::new(),
        };
        opts.rebuild_reverse_map();
        opts
    }
}

impl KeybindingOptions {
    /// Rebuild the reverse lookup map (key string → action).
    pub fn rebuild_reverse_map(&mut self) {
        self.key_to_action.clear();
        for (action, key) in &self.bindings {
            if let Some(previous) = self.key_to_action.insert(key.clone(), *action)
            {
                log::warn!("key {key} bound to both {previous:?} and {action:?}");
            }
        }
    }

    /// Look up the action for a key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.key_to_action.get(key).copied()
    }

    /// Key bound to `action`, if any.
    #[must_use]
    pub fn key_for(&self, action: KeyAction) -> Option<&str> {
        self.bindings.get(&action).map(String::as_str)
    }
}
