//! Lifecycle hooks
//!
//! Hooks are declared as data in the config and fired by whoever owns the
//! lifecycle (the host, or `LifecycleManager` in the bundled binary). The
//! exit status of a hook's script is logged and otherwise ignored.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Location of the autostart script relative to the user's home
pub const AUTOSTART_RELATIVE_PATH: &str = ".config/qtile/autostart.sh";

/// Host lifecycle events a hook can subscribe to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HookEvent {
    /// First start of the host process; never again on restart or reload
    StartupOnce,
    /// Every start, including restarts
    Startup,
    /// After the host finished setting up screens and groups
    StartupComplete,
    Shutdown,
}

impl HookEvent {
    /// Whether the event fires at most once per process
    pub fn is_once(&self) -> bool {
        matches!(self, HookEvent::StartupOnce)
    }
}

/// What a hook does when its event fires
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Hook {
    /// Run the program at an absolute path
    RunScript { path: PathBuf },
    /// Run a program relative to the invoking user's home directory,
    /// resolved at the moment the hook fires
    HomeScript { relative: PathBuf },
}

impl Hook {
    pub fn autostart() -> Self {
        Hook::HomeScript {
            relative: PathBuf::from(AUTOSTART_RELATIVE_PATH),
        }
    }

    pub fn resolve(&self, home: Option<&Path>) -> Result<PathBuf, HookError> {
        match self {
            Hook::RunScript { path } => Ok(path.clone()),
            Hook::HomeScript { relative } => home
                .map(|home| home.join(relative))
                .ok_or(HookError::HomeDirectoryUnavailable),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HookSubscription {
    pub event: HookEvent,
    pub hook: Hook,
}

impl HookSubscription {
    pub fn new(event: HookEvent, hook: Hook) -> Self {
        Self { event, hook }
    }
}

#[derive(Error, Debug)]
pub enum HookError {
    #[error("Home directory could not be determined")]
    HomeDirectoryUnavailable,
    #[error("Failed to run {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Runs external programs synchronously
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Run `program` without arguments and wait for it. Returns the exit code,
    /// or `None` when the process was killed by a signal.
    fn run(&self, program: &Path) -> std::io::Result<Option<i32>>;
}

/// Runner backed by `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &Path) -> std::io::Result<Option<i32>> {
        let status = Command::new(program).status()?;
        Ok(status.code())
    }
}

/// Outcome of firing one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookReport {
    pub event: HookEvent,
    /// Programs that were started, in subscription order
    pub invoked: Vec<PathBuf>,
    /// Hooks that could not start or exited unsuccessfully
    pub failures: usize,
    /// Event was a once-only event that had already fired
    pub suppressed: bool,
}

type HomeResolver = Arc<dyn Fn() -> Option<PathBuf> + Send + Sync>;

/// Fires hook subscriptions through a `CommandRunner`. Clones share the
/// record of which once-only events already fired.
#[derive(Clone)]
pub struct HookDispatcher {
    runner: Arc<dyn CommandRunner>,
    home: HomeResolver,
    fired: Arc<Mutex<HashSet<HookEvent>>>,
}

impl HookDispatcher {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            home: Arc::new(dirs::home_dir),
            fired: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Dispatcher running real processes
    pub fn system() -> Self {
        Self::new(Arc::new(SystemCommandRunner))
    }

    /// Resolve home-relative hooks against `home` instead of the user's home
    pub fn with_home_dir(mut self, home: PathBuf) -> Self {
        self.home = Arc::new(move || Some(home.clone()));
        self
    }

    pub fn has_fired(&self, event: HookEvent) -> bool {
        self.fired
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(&event)
    }

    /// Fire `event`, running every subscription to it in order
    #[instrument(skip(self, subscriptions))]
    pub fn fire(&self, event: HookEvent, subscriptions: &[HookSubscription]) -> HookReport {
        let mut report = HookReport {
            event,
            invoked: Vec::new(),
            failures: 0,
            suppressed: false,
        };

        {
            let mut fired = self
                .fired
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if event.is_once() && fired.contains(&event) {
                debug!("Event already fired once, skipping hooks");
                report.suppressed = true;
                return report;
            }
            fired.insert(event);
        }

        let home = (self.home)();
        for subscription in subscriptions.iter().filter(|s| s.event == event) {
            match self.run_hook(&subscription.hook, home.as_deref()) {
                Ok((path, code)) => {
                    match code {
                        Some(0) => debug!(path = %path.display(), "Hook finished"),
                        Some(code) => {
                            warn!(path = %path.display(), code, "Hook exited unsuccessfully");
                            report.failures += 1;
                        }
                        None => {
                            warn!(path = %path.display(), "Hook terminated by signal");
                            report.failures += 1;
                        }
                    }
                    report.invoked.push(path);
                }
                Err(e) => {
                    warn!("Hook failed: {}", e);
                    report.failures += 1;
                }
            }
        }

        report
    }

    fn run_hook(&self, hook: &Hook, home: Option<&Path>) -> Result<(PathBuf, Option<i32>), HookError> {
        let path = hook.resolve(home)?;
        info!(path = %path.display(), "Running hook");

        let code = self.runner.run(&path).map_err(|source| HookError::Spawn {
            path: path.clone(),
            source,
        })?;

        Ok((path, code))
    }
}

impl std::fmt::Debug for HookDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookDispatcher")
            .field("fired", &self.fired)
            .finish_non_exhaustive()
    }
}
