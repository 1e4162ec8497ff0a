//! Host loop for the bundled binary
//!
//! Loads the configuration, fires the startup hooks and rebuilds the
//! configuration on SIGHUP until SIGINT or SIGTERM arrives.

use crate::{
    config::{Config, ConfigValidator, SettingsStore},
    services::{HookDispatcher, HookEvent, HookReport},
    Result, TileRcError,
};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error, info, instrument, warn};

/// Why the loop woke up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopSignal {
    Reload,
    Shutdown,
}

/// Owns the live configuration and the hook dispatcher across reloads
pub struct LifecycleManager {
    store: SettingsStore,
    dispatcher: HookDispatcher,
    config: Arc<RwLock<Config>>,
}

impl LifecycleManager {
    pub fn new(store: SettingsStore, dispatcher: HookDispatcher) -> Self {
        Self {
            store,
            dispatcher,
            config: Arc::new(RwLock::new(Config::default())),
        }
    }

    /// Shared handle to the live configuration
    pub fn config(&self) -> Arc<RwLock<Config>> {
        self.config.clone()
    }

    /// Build the configuration and fire the startup events in order
    #[instrument(skip_all)]
    pub async fn start(&self) -> Result<Vec<HookReport>> {
        info!("tilerc v{} starting", env!("CARGO_PKG_VERSION"));
        self.reload().await?;

        let mut reports = Vec::new();
        for event in [
            HookEvent::StartupOnce,
            HookEvent::Startup,
            HookEvent::StartupComplete,
        ] {
            reports.push(self.fire(event).await?);
        }
        Ok(reports)
    }

    /// Rebuild the configuration from the settings file. The previous
    /// configuration stays live when the new one fails validation.
    #[instrument(skip_all)]
    pub async fn reload(&self) -> Result<()> {
        let (settings, warnings) = self.store.load_settings()?;
        for warning in &warnings {
            warn!("{}", warning);
        }

        let config = Config::load(&settings);
        let findings = ConfigValidator::new(settings.modifier)?.validate_full_config(&config);
        for finding in findings.iter().filter(|f| !f.is_error()) {
            debug!(rule = %finding.rule.name, "{}", finding.message);
        }
        if ConfigValidator::has_errors(&findings) {
            let messages: Vec<&str> = findings
                .iter()
                .filter(|f| f.is_error())
                .map(|f| f.message.as_str())
                .collect();
            return Err(TileRcError::ValidationError(messages.join("; ")).into());
        }

        *self.config.write().await = config;
        info!(path = %self.store.settings_path().display(), "Configuration loaded");
        Ok(())
    }

    /// Fire one event against the live configuration's hooks. Scripts run
    /// on the blocking pool.
    pub async fn fire(&self, event: HookEvent) -> Result<HookReport> {
        let subscriptions = self.config.read().await.hooks.clone();
        let dispatcher = self.dispatcher.clone();

        let report =
            tokio::task::spawn_blocking(move || dispatcher.fire(event, &subscriptions)).await?;
        if report.failures > 0 {
            warn!(?event, failures = report.failures, "Some hooks failed");
        }
        Ok(report)
    }

    /// Start, then serve reload requests until asked to stop
    #[instrument(skip_all)]
    pub async fn run(&self) -> Result<()> {
        let (tx, rx) = mpsc::channel(8);
        listen_for_signals(tx)?;

        self.start().await?;
        info!("Waiting for signals (SIGHUP reloads, SIGINT/SIGTERM exit)");
        self.serve(rx).await
    }

    /// Handle loop signals until a shutdown arrives or the sender goes away
    async fn serve(&self, mut signals: mpsc::Receiver<LoopSignal>) -> Result<()> {
        while let Some(signal) = signals.recv().await {
            match signal {
                LoopSignal::Reload => {
                    if let Err(e) = self.reload().await {
                        error!("Reload failed, keeping previous configuration: {}", e);
                        continue;
                    }
                    self.fire(HookEvent::Startup).await?;
                }
                LoopSignal::Shutdown => break,
            }
        }

        self.fire(HookEvent::Shutdown).await?;
        info!("tilerc stopped");
        Ok(())
    }
}

/// Register the signal streams once and forward them to the loop
#[cfg(unix)]
fn listen_for_signals(tx: mpsc::Sender<LoopSignal>) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        loop {
            let received = tokio::select! {
                _ = sighup.recv() => {
                    info!("Received SIGHUP");
                    LoopSignal::Reload
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM");
                    LoopSignal::Shutdown
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT (Ctrl+C)");
                    LoopSignal::Shutdown
                }
            };
            if tx.send(received).await.is_err() || received == LoopSignal::Shutdown {
                break;
            }
        }
    });
    Ok(())
}

#[cfg(not(unix))]
fn listen_for_signals(tx: mpsc::Sender<LoopSignal>) -> Result<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C"),
            Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
        }
        let _ = tx.send(LoopSignal::Shutdown).await;
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, SettingsStoreConfig};
    use crate::services::hooks::MockCommandRunner;
    use std::path::Path;
    use tempfile::TempDir;

    fn manager(dir: &TempDir, runner: MockCommandRunner) -> LifecycleManager {
        let store = SettingsStore::new(SettingsStoreConfig::in_dir(dir.path().join("tilerc")));
        let dispatcher =
            HookDispatcher::new(Arc::new(runner)).with_home_dir(dir.path().join("home"));
        LifecycleManager::new(store, dispatcher)
    }

    #[tokio::test]
    async fn test_startup_runs_autostart_once() {
        let dir = TempDir::new().unwrap();
        let expected = dir.path().join("home/.config/qtile/autostart.sh");

        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(move |path: &Path| path == expected.as_path())
            .times(1)
            .returning(|_| Ok(Some(0)));

        let manager = manager(&dir, runner);
        let reports = manager.start().await.unwrap();
        assert_eq!(reports[0].event, HookEvent::StartupOnce);
        assert_eq!(reports[0].invoked.len(), 1);
        assert!(reports[1].invoked.is_empty());

        // A second start in the same process must not rerun the script
        let reports = manager.start().await.unwrap();
        assert!(reports[0].suppressed);
    }

    #[tokio::test]
    async fn test_failing_script_does_not_abort_start() {
        let dir = TempDir::new().unwrap();
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(1).returning(|_| {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))
        });

        let reports = manager(&dir, runner).start().await.unwrap();
        assert_eq!(reports[0].failures, 1);
    }

    #[tokio::test]
    async fn test_reload_rebuilds_from_settings() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir, MockCommandRunner::new());
        manager.reload().await.unwrap();

        let settings = Settings {
            layout_margin: 12,
            ..Settings::default()
        };
        manager.store.save_settings(&settings).unwrap();
        manager.reload().await.unwrap();

        let config = manager.config();
        let config = config.read().await;
        assert_eq!(config.layouts[0].margin, Some(12));
    }

    fn margin_settings(margin: u32) -> Settings {
        Settings {
            layout_margin: margin,
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn test_bad_settings_keep_previous_config() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir, MockCommandRunner::new());
        manager.store.initialize_config_directory().unwrap();
        manager.store.save_settings(&margin_settings(12)).unwrap();
        manager.reload().await.unwrap();

        std::fs::write(manager.store.settings_path(), "bar_size = 0\n").unwrap();
        assert!(manager.reload().await.is_err());

        let config = manager.config();
        let config = config.read().await;
        assert_eq!(config.layouts[0].margin, Some(12));
        assert_eq!(config.screens[0].top.as_ref().unwrap().size, 25);
    }

    #[tokio::test]
    async fn test_serve_reloads_until_shutdown() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir, MockCommandRunner::new());
        manager.reload().await.unwrap();
        manager.store.save_settings(&margin_settings(7)).unwrap();

        let (tx, rx) = mpsc::channel(4);
        tx.send(LoopSignal::Reload).await.unwrap();
        tx.send(LoopSignal::Shutdown).await.unwrap();
        // Anything queued after shutdown is left unread
        tx.send(LoopSignal::Reload).await.unwrap();
        manager.serve(rx).await.unwrap();

        let config = manager.config();
        assert_eq!(config.read().await.layouts[0].margin, Some(7));
    }

    #[tokio::test]
    async fn test_serve_survives_failed_reload() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir, MockCommandRunner::new());
        manager.store.save_settings(&margin_settings(3)).unwrap();
        manager.reload().await.unwrap();
        std::fs::write(manager.store.settings_path(), "bar_size = 0\n").unwrap();

        let (tx, rx) = mpsc::channel(4);
        tx.send(LoopSignal::Reload).await.unwrap();
        tx.send(LoopSignal::Reload).await.unwrap();
        drop(tx);
        manager.serve(rx).await.unwrap();

        let config = manager.config();
        assert_eq!(config.read().await.layouts[0].margin, Some(3));
    }
}
