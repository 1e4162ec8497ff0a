//! The autostart hook runs once, and only when its event fires

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tilerc::{
    config::{SettingsStore, SettingsStoreConfig},
    lifecycle::LifecycleManager,
    services::{CommandRunner, Hook, HookDispatcher, HookEvent, HookSubscription},
    Config, Settings,
};

/// Records every program it is asked to run
#[derive(Default)]
struct RecordingRunner {
    calls: Mutex<Vec<PathBuf>>,
    exit_code: Option<i32>,
}

impl RecordingRunner {
    fn exiting_with(code: i32) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            exit_code: Some(code),
        }
    }

    fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &Path) -> io::Result<Option<i32>> {
        self.calls.lock().unwrap().push(program.to_path_buf());
        Ok(self.exit_code)
    }
}

fn dispatcher(runner: &Arc<RecordingRunner>, home: &Path) -> HookDispatcher {
    HookDispatcher::new(runner.clone()).with_home_dir(home.to_path_buf())
}

#[test]
fn building_the_config_runs_nothing() {
    let runner = Arc::new(RecordingRunner::exiting_with(0));
    let _dispatcher = dispatcher(&runner, Path::new("/home/test"));

    let config = Config::load(&Settings::default());
    let _again = Config::load(&Settings::default());

    assert_eq!(config.hooks.len(), 1);
    assert!(runner.calls().is_empty());
}

#[test]
fn startup_once_runs_home_script_exactly_once() {
    let home = TempDir::new().unwrap();
    let runner = Arc::new(RecordingRunner::exiting_with(0));
    let dispatcher = dispatcher(&runner, home.path());
    let config = Config::load(&Settings::default());

    let first = dispatcher.fire(HookEvent::StartupOnce, &config.hooks);
    let second = dispatcher.fire(HookEvent::StartupOnce, &config.hooks);

    let expected = home.path().join(".config/qtile/autostart.sh");
    assert_eq!(runner.calls(), vec![expected.clone()]);
    assert_eq!(first.invoked, vec![expected]);
    assert_eq!(first.failures, 0);
    assert!(second.suppressed);
    assert!(second.invoked.is_empty());
}

#[test]
fn reload_with_cloned_dispatcher_does_not_rerun() {
    let home = TempDir::new().unwrap();
    let runner = Arc::new(RecordingRunner::exiting_with(0));
    let dispatcher = dispatcher(&runner, home.path());

    let before = Config::load(&Settings::default());
    dispatcher.fire(HookEvent::StartupOnce, &before.hooks);

    let after = Config::load(&Settings::default());
    let clone = dispatcher.clone();
    let report = clone.fire(HookEvent::StartupOnce, &after.hooks);

    assert!(report.suppressed);
    assert_eq!(runner.calls().len(), 1);
}

#[test]
fn failing_script_is_counted_not_propagated() {
    let runner = Arc::new(RecordingRunner::exiting_with(127));
    let dispatcher = dispatcher(&runner, Path::new("/home/test"));
    let hooks = vec![HookSubscription::new(
        HookEvent::StartupOnce,
        Hook::RunScript {
            path: PathBuf::from("/opt/missing.sh"),
        },
    )];

    let report = dispatcher.fire(HookEvent::StartupOnce, &hooks);
    assert_eq!(report.failures, 1);
    assert_eq!(report.invoked, vec![PathBuf::from("/opt/missing.sh")]);
}

#[test]
fn startup_event_repeats() {
    let runner = Arc::new(RecordingRunner::default());
    let dispatcher = dispatcher(&runner, Path::new("/home/test"));
    let hooks = vec![HookSubscription::new(
        HookEvent::Startup,
        Hook::RunScript {
            path: PathBuf::from("/usr/local/bin/setbg"),
        },
    )];

    dispatcher.fire(HookEvent::Startup, &hooks);
    dispatcher.fire(HookEvent::Startup, &hooks);
    assert_eq!(runner.calls().len(), 2);
}

#[tokio::test]
async fn lifecycle_start_fires_autostart_once() {
    let dir = TempDir::new().unwrap();
    let runner = Arc::new(RecordingRunner::exiting_with(0));
    let store = SettingsStore::new(SettingsStoreConfig::in_dir(dir.path().join("tilerc")));
    let manager = LifecycleManager::new(store, dispatcher(&runner, dir.path()));

    manager.start().await.unwrap();
    manager.reload().await.unwrap();
    manager.start().await.unwrap();

    assert_eq!(
        runner.calls(),
        vec![dir.path().join(".config/qtile/autostart.sh")]
    );
}
