//! Declarative entities handed to the host window manager

pub mod action;
pub mod bar;
pub mod group;
pub mod keyboard_mapping;
pub mod layout;
pub mod mouse;
pub mod options;
pub mod palette;
pub mod window_rule;

pub use action::*;
pub use bar::*;
pub use group::*;
pub use keyboard_mapping::*;
pub use layout::*;
pub use mouse::*;
pub use options::*;
pub use palette::*;
pub use window_rule::*;
