//! Configuration handed to the host window manager
//!
//! `Config::load` is the single entry point the host calls on startup and
//! on every reload. The returned value is never mutated; a reload builds a
//! new one.

pub mod builder;
pub mod persistence;
pub mod settings;
pub mod validator;

pub use builder::{group_keys, ConfigBuilder};
pub use persistence::{ExportFormat, PersistenceError, SettingsStore, SettingsStoreConfig};
pub use settings::{ConfigParseError, Settings, SettingsParser};
pub use validator::{ConfigValidator, ValidationResult, ValidationRule, ValidationSeverity};

use crate::models::{
    bar::{Screen, WidgetDefaults},
    group::Group,
    keyboard_mapping::KeyBinding,
    layout::{FloatingLayout, LayoutSpec},
    mouse::MouseBinding,
    options::GeneralOptions,
};
use crate::services::hooks::{HookEvent, HookSubscription};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything the host reads by name, in one value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub keys: Vec<KeyBinding>,
    pub groups: Vec<Group>,
    pub layouts: Vec<LayoutSpec>,
    pub floating_layout: FloatingLayout,
    pub widget_defaults: WidgetDefaults,
    pub extension_defaults: WidgetDefaults,
    pub screens: Vec<Screen>,
    pub mouse: Vec<MouseBinding>,
    #[serde(flatten)]
    pub options: GeneralOptions,
    pub hooks: Vec<HookSubscription>,
}

impl Config {
    /// Build every table from `settings`. Never fails and never runs hooks.
    pub fn load(settings: &Settings) -> Self {
        let builder = ConfigBuilder::new(settings);
        let groups = builder.groups();
        let keys = builder.keys(&groups);

        let config = Config {
            keys,
            groups,
            layouts: builder.layouts(),
            floating_layout: builder.floating_layout(),
            widget_defaults: settings.widget_defaults.clone(),
            extension_defaults: settings.widget_defaults.clone(),
            screens: builder.screens(),
            mouse: builder.mouse(),
            options: GeneralOptions::default(),
            hooks: builder.hooks(),
        };

        debug!(
            keys = config.keys.len(),
            groups = config.groups.len(),
            layouts = config.layouts.len(),
            "Configuration built"
        );
        config
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn layout(&self, name: &str) -> Option<&LayoutSpec> {
        self.layouts.iter().find(|l| l.name() == name)
    }

    /// Subscriptions for one lifecycle event, in declaration order
    pub fn hooks_for(&self, event: HookEvent) -> Vec<&HookSubscription> {
        self.hooks.iter().filter(|h| h.event == event).collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::load(&Settings::default())
    }
}
