use crate::models::action::Action;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Modifier keys as the X11/Wayland host names them
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    /// Super / Windows key
    Mod4,
    /// Alt key
    Mod1,
    Shift,
    Control,
}

impl ModifierKey {
    pub fn token(&self) -> &'static str {
        match self {
            ModifierKey::Mod4 => "mod4",
            ModifierKey::Mod1 => "mod1",
            ModifierKey::Shift => "shift",
            ModifierKey::Control => "control",
        }
    }
}

impl FromStr for ModifierKey {
    type Err = KeyBindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mod4" | "super" => Ok(ModifierKey::Mod4),
            "mod1" | "alt" => Ok(ModifierKey::Mod1),
            "shift" => Ok(ModifierKey::Shift),
            "control" | "ctrl" => Ok(ModifierKey::Control),
            _ => Err(KeyBindingError::UnknownModifier(s.to_string())),
        }
    }
}

impl fmt::Display for ModifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Modifier set plus key symbol. Modifiers are kept sorted and deduplicated
/// so two spellings of the same chord compare equal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct KeyCombination {
    pub modifiers: Vec<ModifierKey>,
    pub key: String,
}

impl KeyCombination {
    pub fn new(modifiers: Vec<ModifierKey>, key: impl Into<String>) -> Self {
        let mut sorted_modifiers = modifiers;
        sorted_modifiers.sort();
        sorted_modifiers.dedup();

        KeyCombination {
            modifiers: sorted_modifiers,
            key: key.into(),
        }
    }
}

impl FromStr for KeyCombination {
    type Err = KeyBindingError;

    /// Parse `mod4+shift+h` style chords; the last segment is the key symbol
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let (key, modifiers) = match parts.split_last() {
            Some((key, modifiers)) if !key.is_empty() => (key, modifiers),
            _ => return Err(KeyBindingError::EmptyKey),
        };

        let modifiers = modifiers
            .iter()
            .map(|m| m.parse::<ModifierKey>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(KeyCombination::new(modifiers, *key))
    }
}

impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier)?;
        }
        f.write_str(&self.key)
    }
}

/// One `Key(...)` entry of the host's `keys` list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyBinding {
    /// Modifiers in declaration order
    pub modifiers: Vec<ModifierKey>,
    /// Key symbol, e.g. `h`, `Tab`, `space`
    pub key: String,
    pub action: Action,
    pub description: String,
}

impl KeyBinding {
    pub fn new(
        modifiers: Vec<ModifierKey>,
        key: impl Into<String>,
        action: Action,
        description: impl Into<String>,
    ) -> Self {
        KeyBinding {
            modifiers,
            key: key.into(),
            action,
            description: description.into(),
        }
    }

    /// Binding whose description is derived from its action
    pub fn described_by_action(
        modifiers: Vec<ModifierKey>,
        key: impl Into<String>,
        action: Action,
    ) -> Self {
        let description = action.default_description();
        Self::new(modifiers, key, action, description)
    }

    pub fn combination(&self) -> KeyCombination {
        KeyCombination::new(self.modifiers.clone(), self.key.clone())
    }

    pub fn conflicts_with(&self, other: &KeyBinding) -> bool {
        self.combination() == other.combination()
    }

    pub fn validate(&self) -> Result<(), KeyBindingError> {
        if self.key.trim().is_empty() {
            return Err(KeyBindingError::EmptyKey);
        }

        if self.modifiers.is_empty() {
            return Err(KeyBindingError::NoModifiers);
        }

        if self.description.trim().is_empty() {
            return Err(KeyBindingError::EmptyDescription);
        }

        if let Some(Err(err)) = self.action.spawn_argv() {
            return Err(KeyBindingError::InvalidCommand(err.to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KeyBindingError {
    #[error("Key symbol cannot be empty")]
    EmptyKey,

    #[error("Key binding must have at least one modifier key")]
    NoModifiers,

    #[error("Key binding description cannot be empty")]
    EmptyDescription,

    #[error("Unknown modifier key: {0}")]
    UnknownModifier(String),

    #[error("Invalid spawn command: {0}")]
    InvalidCommand(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combination_normalizes_modifiers() {
        let a = KeyCombination::new(
            vec![ModifierKey::Shift, ModifierKey::Mod4, ModifierKey::Shift],
            "h",
        );
        let b = KeyCombination::new(vec![ModifierKey::Mod4, ModifierKey::Shift], "h");

        assert_eq!(a, b);
        assert_eq!(a.modifiers.len(), 2);
        assert_eq!(a.to_string(), "mod4+shift+h");
    }

    #[test]
    fn test_combination_parsing() {
        let combo: KeyCombination = "control+mod4+r".parse().unwrap();
        assert_eq!(combo.modifiers, vec![ModifierKey::Mod4, ModifierKey::Control]);
        assert_eq!(combo.key, "r");

        let bare: KeyCombination = "Tab".parse().unwrap();
        assert!(bare.modifiers.is_empty());

        assert!("hyper+x".parse::<KeyCombination>().is_err());
        assert!("mod4+".parse::<KeyCombination>().is_err());
    }

    #[test]
    fn test_binding_validation() {
        let ok = KeyBinding::described_by_action(vec![ModifierKey::Mod4], "q", Action::KillWindow);
        assert!(ok.validate().is_ok());
        assert_eq!(ok.description, "Kill focused window");

        let no_mods = KeyBinding::new(vec![], "q", Action::KillWindow, "Kill");
        assert_eq!(no_mods.validate(), Err(KeyBindingError::NoModifiers));

        let bad_spawn = KeyBinding::new(
            vec![ModifierKey::Mod4],
            "x",
            Action::spawn("echo 'unterminated"),
            "Broken",
        );
        assert!(matches!(
            bad_spawn.validate(),
            Err(KeyBindingError::InvalidCommand(_))
        ));
    }
}
