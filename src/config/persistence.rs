use crate::config::settings::{ConfigParseError, Settings, SettingsParser};
use crate::config::Config;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

pub const SETTINGS_FILE_NAME: &str = "settings.toml";

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
    #[error(transparent)]
    Parse(#[from] ConfigParseError),
}

/// Output format of an exported `Config`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Toml,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "toml" => Ok(ExportFormat::Toml),
            _ => Err(format!("Invalid export format: {}", s)),
        }
    }
}

impl ExportFormat {
    pub fn render(&self, config: &Config) -> Result<String, PersistenceError> {
        Ok(match self {
            ExportFormat::Json => serde_json::to_string_pretty(config)?,
            ExportFormat::Toml => toml::to_string_pretty(config)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStoreConfig {
    pub config_dir: PathBuf,
    pub file_name: String,
}

impl SettingsStoreConfig {
    pub fn in_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            file_name: SETTINGS_FILE_NAME.to_string(),
        }
    }

    /// Point the store at an explicit settings file, e.g. from `--config`
    pub fn for_file(path: &Path) -> Self {
        let config_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| SETTINGS_FILE_NAME.to_string());

        Self {
            config_dir,
            file_name,
        }
    }
}

impl Default for SettingsStoreConfig {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tilerc");

        Self::in_dir(config_dir)
    }
}

/// Settings file on disk plus config export
#[derive(Debug, Clone)]
pub struct SettingsStore {
    config: SettingsStoreConfig,
}

impl SettingsStore {
    pub fn new(config: SettingsStoreConfig) -> Self {
        Self { config }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config.config_dir.join(&self.config.file_name)
    }

    /// Create the config directory and a default settings file if missing.
    /// Returns whether a new file was written.
    pub fn initialize_config_directory(&self) -> Result<bool, PersistenceError> {
        if !self.config.config_dir.exists() {
            fs::create_dir_all(&self.config.config_dir)?;
        }

        let settings_file = self.settings_path();
        if settings_file.exists() {
            debug!(path = %settings_file.display(), "Settings file already present");
            return Ok(false);
        }

        self.save_settings(&Settings::default())?;
        info!(path = %settings_file.display(), "Wrote default settings");
        Ok(true)
    }

    /// Load settings; a missing file yields the defaults. Parser warnings are
    /// returned alongside.
    pub fn load_settings(&self) -> Result<(Settings, Vec<String>), PersistenceError> {
        let file_path = self.settings_path();
        let mut parser = SettingsParser::new();

        let mut settings = if file_path.exists() {
            parser.parse_file(&file_path)?
        } else {
            debug!(path = %file_path.display(), "No settings file, using defaults");
            Settings::default()
        };
        parser.apply_env_overrides(&mut settings);

        Ok((settings, parser.get_warnings().to_vec()))
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), PersistenceError> {
        let content = toml::to_string_pretty(settings)?;
        write_atomic(&self.settings_path(), &content)
    }

    /// Write the built config where the host can pick it up
    pub fn export_config(
        &self,
        config: &Config,
        format: ExportFormat,
        path: &Path,
    ) -> Result<(), PersistenceError> {
        let content = format.render(config)?;
        write_atomic(path, &content)?;
        info!(path = %path.display(), ?format, "Exported configuration");
        Ok(())
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(SettingsStoreConfig::default())
    }
}

fn write_atomic(path: &Path, content: &str) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)?;
    fs::rename(temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::new(SettingsStoreConfig::in_dir(dir.path().join("tilerc")))
    }

    #[test]
    fn test_initialize_writes_defaults_once() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.initialize_config_directory().unwrap());
        assert!(store.settings_path().exists());
        assert!(!store.initialize_config_directory().unwrap());
    }

    #[test]
    fn test_saved_settings_load_back() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.initialize_config_directory().unwrap();

        let settings = Settings {
            terminal: "foot".to_string(),
            layout_margin: 10,
            ..Settings::default()
        };
        store.save_settings(&settings).unwrap();

        let (loaded, _) = store.load_settings().unwrap();
        assert_eq!(loaded.layout_margin, 10);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let (settings, warnings) = store_in(&dir).load_settings().unwrap();
        assert_eq!(settings.layout_margin, Settings::default().layout_margin);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_export_json() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let out = dir.path().join("out").join("config.json");

        store
            .export_config(&Config::default(), ExportFormat::Json, &out)
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        for key in ["keys", "groups", "layouts", "screens", "mouse", "floating_layout", "wmname"] {
            assert!(value.get(key).is_some(), "missing top-level key {}", key);
        }
        assert!(!out.with_extension("tmp").exists());
    }

    #[test]
    fn test_store_for_explicit_file() {
        let config = SettingsStoreConfig::for_file(Path::new("/tmp/tilerc/laptop.toml"));
        let store = SettingsStore::new(config);
        assert_eq!(store.settings_path(), PathBuf::from("/tmp/tilerc/laptop.toml"));

        let bare = SettingsStoreConfig::for_file(Path::new("laptop.toml"));
        assert_eq!(bare.config_dir, PathBuf::from("."));
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!(ExportFormat::from_str("JSON").unwrap(), ExportFormat::Json);
        assert!(ExportFormat::from_str("yaml").is_err());
    }
}
