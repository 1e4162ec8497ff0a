use crate::models::action::Action;
use crate::models::keyboard_mapping::ModifierKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pointer buttons in X11 numbering
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left
    Button1,
    /// Middle
    Button2,
    /// Right
    Button3,
    /// Wheel up
    Button4,
    /// Wheel down
    Button5,
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MouseButton::Button1 => "Button1",
            MouseButton::Button2 => "Button2",
            MouseButton::Button3 => "Button3",
            MouseButton::Button4 => "Button4",
            MouseButton::Button5 => "Button5",
        };
        f.write_str(name)
    }
}

/// Entry of the host's `mouse` list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MouseBinding {
    /// Press, move, release. `start` runs on press and seeds the drag.
    Drag {
        modifiers: Vec<ModifierKey>,
        button: MouseButton,
        action: Action,
        #[serde(skip_serializing_if = "Option::is_none")]
        start: Option<Action>,
    },
    Click {
        modifiers: Vec<ModifierKey>,
        button: MouseButton,
        action: Action,
    },
}

impl MouseBinding {
    pub fn drag(
        modifiers: Vec<ModifierKey>,
        button: MouseButton,
        action: Action,
        start: Action,
    ) -> Self {
        MouseBinding::Drag {
            modifiers,
            button,
            action,
            start: Some(start),
        }
    }

    pub fn click(modifiers: Vec<ModifierKey>, button: MouseButton, action: Action) -> Self {
        MouseBinding::Click {
            modifiers,
            button,
            action,
        }
    }

    pub fn modifiers(&self) -> &[ModifierKey] {
        match self {
            MouseBinding::Drag { modifiers, .. } | MouseBinding::Click { modifiers, .. } => {
                modifiers
            }
        }
    }

    pub fn button(&self) -> MouseButton {
        match self {
            MouseBinding::Drag { button, .. } | MouseBinding::Click { button, .. } => *button,
        }
    }

    pub fn action(&self) -> &Action {
        match self {
            MouseBinding::Drag { action, .. } | MouseBinding::Click { action, .. } => action,
        }
    }

    /// Sorted modifiers plus button, for duplicate detection
    pub fn chord(&self) -> (Vec<ModifierKey>, MouseButton) {
        let mut modifiers = self.modifiers().to_vec();
        modifiers.sort();
        modifiers.dedup();
        (modifiers, self.button())
    }
}
