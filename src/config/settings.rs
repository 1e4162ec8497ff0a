use crate::models::{
    bar::WidgetDefaults,
    keyboard_mapping::ModifierKey,
    palette::Palette,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigParseError {
    #[error("File IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

/// User-tunable inputs that the declarative tables are built from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Modifier every binding starts with
    pub modifier: ModifierKey,
    pub terminal: String,
    pub file_manager: String,
    pub browser: String,
    /// Application launcher command line
    pub launcher: String,
    /// Command line that boots the virtual machine
    pub vm_command: String,
    /// Gap in pixels around tiled windows
    pub layout_margin: u32,
    pub border_width: u32,
    /// Top bar height in pixels
    pub bar_size: u32,
    /// Directory name under /sys/class/backlight
    pub backlight_device: String,
    /// Percent per brightness step
    pub backlight_step: u32,
    /// Command that sets brightness; `{0}` is replaced by the percentage
    pub brightness_command: String,
    /// strftime format of the clock widget
    pub clock_format: String,
    /// Script run on first startup; `None` means `~/.config/qtile/autostart.sh`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autostart_script: Option<PathBuf>,
    // Tables stay last: TOML emits them after plain values.
    pub palette: Palette,
    pub widget_defaults: WidgetDefaults,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            modifier: ModifierKey::Mod4,
            terminal: "terminator".to_string(),
            file_manager: "thunar".to_string(),
            browser: "brave".to_string(),
            launcher: "rofi -show drun".to_string(),
            vm_command: "VBoxManage startvm 'Kali Linux'".to_string(),
            layout_margin: 5,
            border_width: 2,
            bar_size: 25,
            backlight_device: "intel_backlight".to_string(),
            backlight_step: 5,
            brightness_command: "brightnessctl set {0}%".to_string(),
            clock_format: "%m-%d %I:%M %p".to_string(),
            autostart_script: None,
            palette: Palette::default(),
            widget_defaults: WidgetDefaults::default(),
        }
    }
}

/// Reads `settings.toml`, applies environment overrides and checks values
pub struct SettingsParser {
    warnings: Vec<String>,
}

impl SettingsParser {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    pub fn parse_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Settings, ConfigParseError> {
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content)
    }

    pub fn parse_str(&mut self, content: &str) -> Result<Settings, ConfigParseError> {
        let settings: Settings = toml::from_str(content)?;
        self.validate(&settings)?;
        Ok(settings)
    }

    /// Override program choices from `TILERC_TERMINAL`, `TILERC_BROWSER`
    /// and `TILERC_FILE_MANAGER`
    pub fn apply_env_overrides(&mut self, settings: &mut Settings) {
        self.apply_overrides(settings, |name| std::env::var(name).ok());
    }

    fn apply_overrides<F>(&mut self, settings: &mut Settings, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let targets: [(&str, &mut String); 3] = [
            ("TILERC_TERMINAL", &mut settings.terminal),
            ("TILERC_BROWSER", &mut settings.browser),
            ("TILERC_FILE_MANAGER", &mut settings.file_manager),
        ];

        for (var, field) in targets {
            match lookup(var) {
                Some(value) if !value.trim().is_empty() => *field = value,
                Some(_) => self
                    .warnings
                    .push(format!("Ignoring empty environment override {}", var)),
                None => {}
            }
        }
    }

    pub fn get_warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn validate(&mut self, settings: &Settings) -> Result<(), ConfigParseError> {
        // Static bindings add shift and control on top of the main modifier.
        if matches!(settings.modifier, ModifierKey::Shift | ModifierKey::Control) {
            return Err(ConfigParseError::ValidationError {
                message: format!(
                    "Modifier '{}' cannot be the main modifier; use mod4 or mod1",
                    settings.modifier
                ),
            });
        }

        let programs = [
            ("terminal", &settings.terminal),
            ("file_manager", &settings.file_manager),
            ("browser", &settings.browser),
            ("launcher", &settings.launcher),
            ("vm_command", &settings.vm_command),
        ];

        for (name, value) in programs {
            if value.trim().is_empty() {
                return Err(ConfigParseError::ValidationError {
                    message: format!("Program '{}' cannot be empty", name),
                });
            }
            crate::models::action::split_command_line(value).map_err(|e| {
                ConfigParseError::ValidationError {
                    message: format!("Program '{}' is not a valid command line: {}", name, e),
                }
            })?;
        }

        if settings.bar_size == 0 {
            return Err(ConfigParseError::ValidationError {
                message: "Bar size must be positive".to_string(),
            });
        }

        if settings.backlight_device.is_empty() || settings.backlight_device.contains('/') {
            return Err(ConfigParseError::ValidationError {
                message: format!(
                    "Backlight device '{}' must be a single directory name",
                    settings.backlight_device
                ),
            });
        }

        if settings.backlight_step == 0 || settings.backlight_step > 100 {
            return Err(ConfigParseError::ValidationError {
                message: format!(
                    "Backlight step {} must be between 1 and 100",
                    settings.backlight_step
                ),
            });
        }

        if !settings.brightness_command.contains("{0}") {
            self.warnings.push(format!(
                "Brightness command '{}' has no {{0}} placeholder; the level will not be passed",
                settings.brightness_command
            ));
        }

        if settings.layout_margin > 100 {
            self.warnings.push(format!(
                "Layout margin {} is unusually large",
                settings.layout_margin
            ));
        }

        Ok(())
    }
}

impl Default for SettingsParser {
    fn default() -> Self {
        Self::new()
    }
}
