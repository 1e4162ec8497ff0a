//! Runtime helpers driven by the host or the bundled binary

pub mod backlight;
pub mod hooks;
pub mod keyboard_handler;
pub mod window_classifier;

pub use backlight::{BacklightDevice, BacklightError, BrightnessLevel};
pub use hooks::{
    CommandRunner, Hook, HookDispatcher, HookError, HookEvent, HookReport, HookSubscription,
    SystemCommandRunner,
};
pub use keyboard_handler::{KeyDispatcher, KeyDispatcherMetrics};
pub use window_classifier::{Placement, WindowClassifier};
