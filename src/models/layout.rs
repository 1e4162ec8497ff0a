use crate::models::palette::ColorPair;
use crate::models::window_rule::{WindowMatch, WindowProperties};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Window arrangement algorithms provided by the host
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// Stack of columns; moving past the last column creates a new one
    Columns,
    /// One window fills the screen
    Max,
    /// Master pane on the left, stack on the right
    MonadTall,
    /// Master pane on top, stack below
    MonadWide,
}

impl LayoutKind {
    /// Name groups use to pick their initial layout
    pub fn name(&self) -> &'static str {
        match self {
            LayoutKind::Columns => "columns",
            LayoutKind::Max => "max",
            LayoutKind::MonadTall => "monadtall",
            LayoutKind::MonadWide => "monadwide",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Entry of the host's `layouts` list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutSpec {
    pub kind: LayoutKind,
    /// Gap in pixels around each window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_focus: Option<ColorPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_normal: Option<ColorPair>,
}

impl LayoutSpec {
    /// Layout with host defaults for every option
    pub fn plain(kind: LayoutKind) -> Self {
        LayoutSpec {
            kind,
            margin: None,
            border_width: None,
            border_focus: None,
            border_normal: None,
        }
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn with_borders(mut self, width: u32, focus: ColorPair, normal: ColorPair) -> Self {
        self.border_width = Some(width);
        self.border_focus = Some(focus);
        self.border_normal = Some(normal);
        self
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Layout that floating windows are placed in, with the rules that decide
/// which windows float instead of tiling
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FloatingLayout {
    pub float_rules: Vec<WindowMatch>,
}

impl FloatingLayout {
    pub fn new(float_rules: Vec<WindowMatch>) -> Self {
        FloatingLayout { float_rules }
    }

    pub fn should_float(&self, window: &WindowProperties) -> bool {
        self.float_rules.iter().any(|rule| rule.matches(window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::palette::{Color, ColorPair};

    #[test]
    fn test_layout_names() {
        assert_eq!(LayoutKind::MonadTall.name(), "monadtall");
        assert_eq!(
            serde_json::to_value(LayoutKind::MonadWide).unwrap(),
            serde_json::json!("monadwide")
        );
    }

    #[test]
    fn test_plain_layout_serializes_only_kind() {
        let json = serde_json::to_value(LayoutSpec::plain(LayoutKind::Max)).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "max" }));
    }

    #[test]
    fn test_borders() {
        let focus = ColorPair::solid(Color::new("dc7360").unwrap());
        let normal = ColorPair::solid(Color::new("6e3a30").unwrap());
        let layout = LayoutSpec::plain(LayoutKind::Columns)
            .with_margin(5)
            .with_borders(2, focus.clone(), normal);

        assert_eq!(layout.margin, Some(5));
        assert_eq!(layout.border_width, Some(2));
        assert_eq!(layout.border_focus, Some(focus));
    }

    #[test]
    fn test_should_float() {
        let floating = FloatingLayout::new(vec![
            WindowMatch::wm_class("ssh-askpass"),
            WindowMatch::title("branchdialog"),
        ]);

        assert!(floating.should_float(&WindowProperties::new(&["ssh-askpass"], "")));
        assert!(floating.should_float(&WindowProperties::new(&["gitk"], "branchdialog")));
        assert!(!floating.should_float(&WindowProperties::new(&["kitty"], "zsh")));
    }
}
