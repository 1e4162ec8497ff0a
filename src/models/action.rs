//! Commands that key and mouse bindings resolve to
//!
//! Actions are plain data. The host window manager interprets them against
//! live window state; nothing here touches a window.

use serde::{Deserialize, Serialize};

/// Command bound to a key or mouse button
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    /// Move focus to the next window in the layout
    LayoutNext,
    /// Directional focus. Not emitted by the default tables; available to
    /// hosts and user settings that bind them.
    LayoutLeft,
    LayoutRight,
    LayoutDown,
    LayoutUp,
    /// Move the focused window within the layout
    ShuffleLeft,
    ShuffleRight,
    ShuffleDown,
    ShuffleUp,
    /// Grow the focused window towards an edge
    GrowLeft,
    GrowRight,
    GrowDown,
    GrowUp,
    /// Reset all window sizes in the layout
    Normalize,
    /// Cycle the group to its next layout
    NextLayout,
    KillWindow,
    ReloadConfig,
    Shutdown,
    /// Launch an external program from a command line
    Spawn { command: String },
    /// Show a group on the current screen
    ToScreen { group: String },
    /// Move the focused window to a group
    ToGroup { group: String, switch_group: bool },
    SetPositionFloating,
    SetSizeFloating,
    GetPosition,
    GetSize,
    BringToFront,
}

impl Action {
    pub fn spawn(command: impl Into<String>) -> Self {
        Action::Spawn {
            command: command.into(),
        }
    }

    /// Dotted command path in the host's command graph
    pub fn command_path(&self) -> String {
        match self {
            Action::LayoutNext => "layout.next".to_string(),
            Action::LayoutLeft => "layout.left".to_string(),
            Action::LayoutRight => "layout.right".to_string(),
            Action::LayoutDown => "layout.down".to_string(),
            Action::LayoutUp => "layout.up".to_string(),
            Action::ShuffleLeft => "layout.shuffle_left".to_string(),
            Action::ShuffleRight => "layout.shuffle_right".to_string(),
            Action::ShuffleDown => "layout.shuffle_down".to_string(),
            Action::ShuffleUp => "layout.shuffle_up".to_string(),
            Action::GrowLeft => "layout.grow_left".to_string(),
            Action::GrowRight => "layout.grow_right".to_string(),
            Action::GrowDown => "layout.grow_down".to_string(),
            Action::GrowUp => "layout.grow_up".to_string(),
            Action::Normalize => "layout.normalize".to_string(),
            Action::NextLayout => "next_layout".to_string(),
            Action::KillWindow => "window.kill".to_string(),
            Action::ReloadConfig => "reload_config".to_string(),
            Action::Shutdown => "shutdown".to_string(),
            Action::Spawn { .. } => "spawn".to_string(),
            Action::ToScreen { group } => format!("group[{}].toscreen", group),
            Action::ToGroup { .. } => "window.togroup".to_string(),
            Action::SetPositionFloating => "window.set_position_floating".to_string(),
            Action::SetSizeFloating => "window.set_size_floating".to_string(),
            Action::GetPosition => "window.get_position".to_string(),
            Action::GetSize => "window.get_size".to_string(),
            Action::BringToFront => "window.bring_to_front".to_string(),
        }
    }

    /// Group this action targets, if any
    pub fn target_group(&self) -> Option<&str> {
        match self {
            Action::ToScreen { group } | Action::ToGroup { group, .. } => Some(group),
            _ => None,
        }
    }

    /// Fallback description used when a binding has none
    pub fn default_description(&self) -> String {
        match self {
            Action::LayoutNext => "Move window focus to other window".to_string(),
            Action::LayoutLeft => "Move focus to left".to_string(),
            Action::LayoutRight => "Move focus to right".to_string(),
            Action::LayoutDown => "Move focus down".to_string(),
            Action::LayoutUp => "Move focus up".to_string(),
            Action::ShuffleLeft => "Move window to the left".to_string(),
            Action::ShuffleRight => "Move window to the right".to_string(),
            Action::ShuffleDown => "Move window down".to_string(),
            Action::ShuffleUp => "Move window up".to_string(),
            Action::GrowLeft => "Grow window to the left".to_string(),
            Action::GrowRight => "Grow window to the right".to_string(),
            Action::GrowDown => "Grow window down".to_string(),
            Action::GrowUp => "Grow window up".to_string(),
            Action::Normalize => "Reset all window sizes".to_string(),
            Action::NextLayout => "Toggle between layouts".to_string(),
            Action::KillWindow => "Kill focused window".to_string(),
            Action::ReloadConfig => "Reload the config".to_string(),
            Action::Shutdown => "Shutdown Qtile".to_string(),
            Action::Spawn { command } => format!("Launch {}", command),
            Action::ToScreen { group } => format!("Switch to group {}", group),
            Action::ToGroup {
                group,
                switch_group: true,
            } => format!("Switch to & move focused window to group {}", group),
            Action::ToGroup { group, .. } => format!("Move focused window to group {}", group),
            Action::SetPositionFloating => "Drag floating window".to_string(),
            Action::SetSizeFloating => "Resize floating window".to_string(),
            Action::GetPosition => "Read window position".to_string(),
            Action::GetSize => "Read window size".to_string(),
            Action::BringToFront => "Bring window to front".to_string(),
        }
    }

    /// Argument vector for spawn actions
    pub fn spawn_argv(&self) -> Option<Result<Vec<String>, ActionError>> {
        match self {
            Action::Spawn { command } => Some(split_command_line(command)),
            _ => None,
        }
    }
}

/// Split a command line into arguments, honouring single and double quotes
/// and backslash escapes outside single quotes.
pub fn split_command_line(line: &str) -> Result<Vec<String>, ActionError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') => quote = None,
            (Some('"'), '"') => quote = None,
            (Some('"'), '\\') | (None, '\\') => match chars.next() {
                Some(escaped) => {
                    current.push(escaped);
                    in_word = true;
                }
                None => return Err(ActionError::TrailingEscape(line.to_string())),
            },
            (Some(_), c) => current.push(c),
            (None, '\'') | (None, '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(ActionError::UnterminatedQuote(line.to_string()));
    }
    if in_word {
        args.push(current);
    }
    if args.is_empty() {
        return Err(ActionError::EmptyCommand);
    }

    Ok(args)
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error("Command line is empty")]
    EmptyCommand,

    #[error("Unterminated quote in command line: {0}")]
    UnterminatedQuote(String),

    #[error("Command line ends with an escape character: {0}")]
    TrailingEscape(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_quoted_arguments() {
        let argv = split_command_line("VBoxManage startvm 'Kali Linux'").unwrap();
        assert_eq!(argv, vec!["VBoxManage", "startvm", "Kali Linux"]);

        let argv = split_command_line("rofi  -show drun").unwrap();
        assert_eq!(argv, vec!["rofi", "-show", "drun"]);

        let argv = split_command_line(r#"sh -c "echo \"hi\"""#).unwrap();
        assert_eq!(argv, vec!["sh", "-c", "echo \"hi\""]);
    }

    #[test]
    fn test_split_empty_quotes_is_an_argument() {
        let argv = split_command_line("printf ''").unwrap();
        assert_eq!(argv, vec!["printf", ""]);
    }

    #[test]
    fn test_split_errors() {
        assert_eq!(split_command_line("   "), Err(ActionError::EmptyCommand));
        assert!(matches!(
            split_command_line("echo 'open"),
            Err(ActionError::UnterminatedQuote(_))
        ));
        assert!(matches!(
            split_command_line("echo \\"),
            Err(ActionError::TrailingEscape(_))
        ));
    }

    #[test]
    fn test_command_paths() {
        assert_eq!(Action::ShuffleLeft.command_path(), "layout.shuffle_left");
        assert_eq!(
            Action::ToScreen {
                group: "3".to_string()
            }
            .command_path(),
            "group[3].toscreen"
        );
        assert_eq!(Action::spawn("brave").command_path(), "spawn");
    }

    #[test]
    fn test_serialized_shape() {
        let action = Action::ToGroup {
            group: "2".to_string(),
            switch_group: true,
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["op"], "to_group");
        assert_eq!(json["group"], "2");
        assert_eq!(json["switch_group"], true);

        let unit = serde_json::to_value(Action::NextLayout).unwrap();
        assert_eq!(unit, serde_json::json!({ "op": "next_layout" }));

        let spawn = Action::spawn("rofi -show drun");
        let json = serde_json::to_value(&spawn).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "op": "spawn", "command": "rofi -show drun" })
        );
        let back: Action = serde_json::from_value(json).unwrap();
        assert_eq!(back, spawn);
    }

    #[test]
    fn test_directional_focus_deserializes() {
        let action: Action = serde_json::from_str(r#"{"op":"layout_left"}"#).unwrap();
        assert_eq!(action, Action::LayoutLeft);
        assert_eq!(action.command_path(), "layout.left");
        assert_eq!(Action::Shutdown.default_description(), "Shutdown Qtile");
    }

    #[test]
    fn test_spawn_argv_only_for_spawn() {
        assert!(Action::KillWindow.spawn_argv().is_none());
        let argv = Action::spawn("thunar").spawn_argv().unwrap().unwrap();
        assert_eq!(argv, vec!["thunar"]);
    }
}
