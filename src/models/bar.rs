//! Screens, bars and the widgets placed on them

use crate::models::palette::ColorPair;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Status bar widgets the host knows how to draw
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    GroupBox,
    CurrentLayout,
    Prompt,
    WindowName,
    /// XEmbed tray; X11 only
    Systray,
    /// StatusNotifierItem tray, usable under Wayland. Not placed by the
    /// default bar; available to hosts and user settings.
    StatusNotifier,
    /// Not placed by the default bar
    Battery,
    Backlight,
    Clock,
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Value of a single widget option
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Color(ColorPair),
    Text(String),
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<u32> for OptionValue {
    fn from(value: u32) -> Self {
        OptionValue::Int(i64::from(value))
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

impl From<ColorPair> for OptionValue {
    fn from(value: ColorPair) -> Self {
        OptionValue::Color(value)
    }
}

/// One widget instance on a bar. Options are keyed by the host's option
/// names and kept sorted, so equal inputs serialize identically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Widget {
    pub kind: WidgetKind,
    #[serde(default)]
    pub options: BTreeMap<String, OptionValue>,
}

impl Widget {
    pub fn new(kind: WidgetKind) -> Self {
        Widget {
            kind,
            options: BTreeMap::new(),
        }
    }

    pub fn option(mut self, name: &str, value: impl Into<OptionValue>) -> Self {
        self.options.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }
}

/// Options applied to every widget unless it overrides them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WidgetDefaults {
    pub font: String,
    pub fontsize: u32,
    pub padding: u32,
}

impl Default for WidgetDefaults {
    fn default() -> Self {
        WidgetDefaults {
            font: "Ubuntu Bold".to_string(),
            fontsize: 12,
            padding: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    pub widgets: Vec<Widget>,
    /// Height in pixels for horizontal bars
    pub size: u32,
}

impl Bar {
    pub fn new(widgets: Vec<Widget>, size: u32) -> Self {
        Bar { widgets, size }
    }

    pub fn find(&self, kind: WidgetKind) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.kind == kind)
    }
}

/// Entry of the host's `screens` list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Screen {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<Bar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Bar>,
}

impl Screen {
    pub fn with_top(bar: Bar) -> Self {
        Screen {
            top: Some(bar),
            bottom: None,
        }
    }

    pub fn bars(&self) -> impl Iterator<Item = &Bar> {
        self.top.iter().chain(self.bottom.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::palette::Color;

    #[test]
    fn test_option_values_serialize_untagged() {
        let widget = Widget::new(WidgetKind::Clock)
            .option("format", "%m-%d %I:%M %p")
            .option("fontsize", 23u32)
            .option("markup", false)
            .option("background", ColorPair::solid(Color::new("321a16").unwrap()));

        let json = serde_json::to_value(&widget).unwrap();
        assert_eq!(json["kind"], "Clock");
        assert_eq!(json["options"]["fontsize"], 23);
        assert_eq!(json["options"]["markup"], false);
        assert_eq!(
            json["options"]["background"],
            serde_json::json!(["321a16", "321a16"])
        );
    }

    #[test]
    fn test_option_value_round_trip_picks_colour() {
        let value: OptionValue = serde_json::from_str(r#"["dc7360","dc7360"]"#).unwrap();
        assert!(matches!(value, OptionValue::Color(_)));

        let value: OptionValue = serde_json::from_str(r#""text""#).unwrap();
        assert_eq!(value, OptionValue::Text("text".to_string()));
    }

    #[test]
    fn test_screen_bars() {
        let screen = Screen::with_top(Bar::new(vec![Widget::new(WidgetKind::Prompt)], 25));
        assert_eq!(screen.bars().count(), 1);
        assert!(screen.top.as_ref().unwrap().find(WidgetKind::Prompt).is_some());
        assert!(screen.top.as_ref().unwrap().find(WidgetKind::Clock).is_none());
    }

    #[test]
    fn test_optional_widget_kinds_deserialize() {
        let widget: Widget =
            serde_json::from_str(r#"{"kind":"StatusNotifier","options":{}}"#).unwrap();
        assert_eq!(widget.kind, WidgetKind::StatusNotifier);

        let kind: WidgetKind = serde_json::from_str(r#""Battery""#).unwrap();
        assert_eq!(kind, WidgetKind::Battery);
    }
}
