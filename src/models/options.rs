use crate::models::window_rule::WindowMatch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the host reacts when a window asks to be activated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FocusOnActivation {
    /// Focus if the window is on the current group, otherwise mark urgent
    #[default]
    Smart,
    Focus,
    Urgent,
    Never,
}

/// Scalar options the host reads by name next to the binding tables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralOptions {
    /// Binder that derives group keys dynamically; `None` since group keys
    /// are declared up front
    pub dgroups_key_binder: Option<String>,
    pub dgroups_app_rules: Vec<WindowMatch>,
    pub follow_mouse_focus: bool,
    pub bring_front_click: bool,
    pub cursor_warp: bool,
    pub auto_fullscreen: bool,
    pub focus_on_window_activation: FocusOnActivation,
    pub reconfigure_screens: bool,
    /// Let applications minimize themselves when they lose focus
    pub auto_minimize: bool,
    /// Wayland input device rules, keyed by device glob
    pub wl_input_rules: Option<BTreeMap<String, BTreeMap<String, String>>>,
    /// Name reported to clients. Some Java toolkits only behave with "LG3D".
    pub wmname: String,
}

impl Default for GeneralOptions {
    fn default() -> Self {
        GeneralOptions {
            dgroups_key_binder: None,
            dgroups_app_rules: Vec::new(),
            follow_mouse_focus: true,
            bring_front_click: false,
            cursor_warp: false,
            auto_fullscreen: true,
            focus_on_window_activation: FocusOnActivation::Smart,
            reconfigure_screens: true,
            auto_minimize: true,
            wl_input_rules: None,
            wmname: "LG3D".to_string(),
        }
    }
}
