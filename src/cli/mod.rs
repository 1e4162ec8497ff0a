//! Command-line interface for tilerc
//!
//! Inspect, validate and export the configuration, and run the small host
//! loop that fires the startup hooks.

use crate::{
    config::{
        Config, ConfigValidator, ExportFormat, Settings, SettingsStore, SettingsStoreConfig,
        ValidationSeverity,
    },
    lifecycle::LifecycleManager,
    services::{BacklightDevice, HookDispatcher, HookEvent},
    Result, TileRcError,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// tilerc command-line interface
#[derive(Parser, Debug)]
#[command(name = "tilerc")]
#[command(about = "Declarative configuration for a tiling window manager")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct TileRcCli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file path (defaults to ~/.config/tilerc/settings.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable JSON output for machine-readable results
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the configuration and report structural problems
    Check,

    /// Print or write the built configuration
    Dump {
        /// Output format (json, toml)
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List key bindings
    Keys,

    /// List groups with their labels and default layouts
    Groups,

    /// Create the settings directory and a default settings file
    Init,

    /// Run the startup_once hooks now
    Autostart,

    /// Show the configured backlight level
    Backlight,

    /// Load the configuration and serve reloads until stopped
    Run,
}

/// Executes one parsed command
pub struct TileRcCliExecutor {
    store: SettingsStore,
    json_output: bool,
}

impl TileRcCliExecutor {
    pub fn new(store: SettingsStore, json_output: bool) -> Self {
        Self { store, json_output }
    }

    pub async fn execute(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Check => self.check(),
            Commands::Dump { format, output } => self.dump(format, output.as_deref()),
            Commands::Keys => self.keys(),
            Commands::Groups => self.groups(),
            Commands::Init => self.init(),
            Commands::Autostart => self.autostart().await,
            Commands::Backlight => self.backlight(),
            Commands::Run => {
                let manager = LifecycleManager::new(self.store.clone(), HookDispatcher::system());
                manager.run().await
            }
        }
    }

    fn load(&self) -> Result<(Settings, Config)> {
        let (settings, warnings) = self.store.load_settings()?;
        for warning in warnings {
            eprintln!("warning: {}", warning);
        }
        let config = Config::load(&settings);
        Ok((settings, config))
    }

    fn check(&self) -> Result<()> {
        let (settings, config) = self.load()?;
        let findings = ConfigValidator::new(settings.modifier)?.validate_full_config(&config);

        if self.json_output {
            let entries: Vec<_> = findings
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "rule": f.rule.name,
                        "severity": severity_label(&f.rule.severity),
                        "entity_type": f.entity_type,
                        "entity": f.entity,
                        "message": f.message,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else if findings.is_empty() {
            println!(
                "Configuration OK: {} keys, {} groups, {} layouts",
                config.keys.len(),
                config.groups.len(),
                config.layouts.len()
            );
        } else {
            for finding in &findings {
                println!(
                    "[{}] {}: {}",
                    severity_label(&finding.rule.severity),
                    finding.rule.name,
                    finding.message
                );
            }
        }

        if ConfigValidator::has_errors(&findings) {
            return Err(TileRcError::ValidationError(format!(
                "{} problem(s) found",
                findings.iter().filter(|f| f.is_error()).count()
            ))
            .into());
        }
        Ok(())
    }

    fn dump(&self, format: ExportFormat, output: Option<&Path>) -> Result<()> {
        let (_, config) = self.load()?;
        match output {
            Some(path) => self.store.export_config(&config, format, path)?,
            None => println!("{}", format.render(&config)?),
        }
        Ok(())
    }

    fn keys(&self) -> Result<()> {
        let (_, config) = self.load()?;

        if self.json_output {
            println!("{}", serde_json::to_string_pretty(&config.keys)?);
            return Ok(());
        }

        let chords: Vec<String> = config
            .keys
            .iter()
            .map(|k| k.combination().to_string())
            .collect();
        let width = chords.iter().map(String::len).max().unwrap_or(0);
        for (chord, binding) in chords.iter().zip(&config.keys) {
            println!("  {:<width$}  {}", chord, binding.description, width = width);
        }
        Ok(())
    }

    fn groups(&self) -> Result<()> {
        let (_, config) = self.load()?;

        if self.json_output {
            println!("{}", serde_json::to_string_pretty(&config.groups)?);
            return Ok(());
        }

        for group in &config.groups {
            println!(
                "  {} {} (layout: {}, {} match rule(s))",
                group.name,
                group.display_label(),
                group.layout.as_deref().unwrap_or("default"),
                group.matches.len()
            );
        }
        Ok(())
    }

    fn init(&self) -> Result<()> {
        let path = self.store.settings_path();
        if self.store.initialize_config_directory()? {
            println!("Wrote default settings to {}", path.display());
        } else {
            println!("Settings already present at {}", path.display());
        }
        Ok(())
    }

    async fn autostart(&self) -> Result<()> {
        let manager = LifecycleManager::new(self.store.clone(), HookDispatcher::system());
        manager.reload().await?;
        let report = manager.fire(HookEvent::StartupOnce).await?;

        if self.json_output {
            let report_json = serde_json::json!({
                "event": report.event,
                "invoked": report.invoked,
                "failures": report.failures,
            });
            println!("{}", serde_json::to_string_pretty(&report_json)?);
        } else {
            for path in &report.invoked {
                println!("Ran {}", path.display());
            }
            if report.failures > 0 {
                println!("{} hook(s) failed, see log", report.failures);
            }
        }
        Ok(())
    }

    fn backlight(&self) -> Result<()> {
        let (settings, _) = self.load()?;
        let device = BacklightDevice::new(&settings.backlight_device);
        let level = device.read()?;

        if self.json_output {
            let level_json = serde_json::json!({
                "device": settings.backlight_device,
                "raw": level.raw,
                "max": level.max,
                "percent": level.percent(),
            });
            println!("{}", serde_json::to_string_pretty(&level_json)?);
        } else {
            println!("{}: {}%", settings.backlight_device, level.percent());
        }
        Ok(())
    }
}

fn severity_label(severity: &ValidationSeverity) -> &'static str {
    match severity {
        ValidationSeverity::Error => "error",
        ValidationSeverity::Warning => "warning",
        ValidationSeverity::Info => "info",
    }
}

/// Resolve the settings store for the parsed flags and run the command
pub async fn run_cli(cli: TileRcCli) -> Result<()> {
    let store_config = match &cli.config {
        Some(path) => SettingsStoreConfig::for_file(path),
        None => SettingsStoreConfig::default(),
    };
    debug!(dir = %store_config.config_dir.display(), "Using settings directory");

    let executor = TileRcCliExecutor::new(SettingsStore::new(store_config), cli.json);
    info!(command = ?cli.command, "Executing command");

    if let Err(e) = executor.execute(cli.command).await {
        error!("Command failed: {}", e);
        if cli.json {
            let error_json = serde_json::json!({
                "error": e.to_string(),
                "success": false,
            });
            println!("{}", serde_json::to_string_pretty(&error_json)?);
        }
        return Err(e);
    }

    Ok(())
}
