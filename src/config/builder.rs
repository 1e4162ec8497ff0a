//! Turns `Settings` into the declarative tables the host reads
//!
//! Every function here is pure: the same settings always produce the same
//! tables, in the same order. Nothing is validated or executed.

use crate::config::settings::Settings;
use crate::models::{
    action::Action,
    bar::{Bar, Screen, Widget, WidgetKind},
    group::Group,
    keyboard_mapping::{KeyBinding, ModifierKey},
    layout::{FloatingLayout, LayoutKind, LayoutSpec},
    mouse::{MouseBinding, MouseButton},
    window_rule::WindowMatch,
};
use crate::services::backlight::BacklightDevice;
use crate::services::hooks::{Hook, HookEvent, HookSubscription};

pub struct ConfigBuilder<'a> {
    settings: &'a Settings,
}

impl<'a> ConfigBuilder<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    fn modifier(&self) -> ModifierKey {
        self.settings.modifier
    }

    /// Static key bindings followed by the bindings derived from `groups`
    pub fn keys(&self, groups: &[Group]) -> Vec<KeyBinding> {
        let m = self.modifier();
        let shift = ModifierKey::Shift;
        let control = ModifierKey::Control;
        let s = self.settings;

        let mut keys = vec![
            KeyBinding::new(vec![m], "space", Action::LayoutNext, "Move window focus to other window"),
            // Moving out of range in the columns layout creates a new column.
            KeyBinding::new(vec![m, shift], "h", Action::ShuffleLeft, "Move window to the left"),
            KeyBinding::new(vec![m, shift], "l", Action::ShuffleRight, "Move window to the right"),
            KeyBinding::new(vec![m, shift], "j", Action::ShuffleDown, "Move window down"),
            KeyBinding::new(vec![m, shift], "k", Action::ShuffleUp, "Move window up"),
            // A window on the screen edge shrinks when grown towards that edge.
            KeyBinding::new(vec![m, control], "h", Action::GrowLeft, "Grow window to the left"),
            KeyBinding::new(vec![m, control], "l", Action::GrowRight, "Grow window to the right"),
            KeyBinding::new(vec![m, control], "j", Action::GrowDown, "Grow window down"),
            KeyBinding::new(vec![m, control], "k", Action::GrowUp, "Grow window up"),
            KeyBinding::new(vec![m], "n", Action::Normalize, "Reset all window sizes"),
            KeyBinding::new(vec![m], "t", Action::spawn(&s.terminal), "Launch terminal"),
            KeyBinding::new(vec![m], "Tab", Action::NextLayout, "Toggle between layouts"),
            KeyBinding::new(vec![m], "q", Action::KillWindow, "Kill focused window"),
            KeyBinding::new(vec![m, control], "r", Action::ReloadConfig, "Reload the config"),
            KeyBinding::new(vec![m], "m", Action::Shutdown, "Shutdown Qtile"),
            KeyBinding::new(vec![m], "r", Action::spawn(&s.launcher), "Spawn a command using a prompt widget"),
            KeyBinding::new(vec![m], "f", Action::spawn(&s.file_manager), "Spawn file managers"),
            KeyBinding::new(vec![m], "k", Action::spawn(&s.vm_command), "Starts kali vm"),
            KeyBinding::new(vec![m], "b", Action::spawn(&s.browser), "Starts the browser"),
            KeyBinding::new(vec![m, control], "b", Action::spawn("blueman-manager"), "Opens blueman manager"),
            KeyBinding::new(vec![m, control], "n", Action::spawn("nm-applet"), "Starts nm-applet"),
        ];

        keys.extend(group_keys(groups, m));
        keys
    }

    pub fn groups(&self) -> Vec<Group> {
        vec![
            Group::new("1")
                .with_label("\u{f269}")
                .with_match(WindowMatch::any_wm_class(&["LibreWolf", "firefox", "brave"])),
            Group::new("2")
                .with_label("\u{e795}")
                .with_match(WindowMatch::any_wm_class(&["terminator", "kitty"]))
                .with_layout(LayoutKind::MonadWide.name()),
            Group::new("3")
                .with_label("\u{f0a1e}")
                .with_match(WindowMatch::wm_class("code-oss")),
            Group::new("4")
                .with_label("\u{f0d45}")
                .with_match(WindowMatch::any_wm_class(&["telegram-desktop", "webcord"]))
                .with_layout(LayoutKind::MonadTall.name()),
            Group::new("5")
                .with_label("\u{f05b}")
                .with_layout(LayoutKind::Max.name()),
            Group::new("6")
                .with_label("\u{ea7a}")
                .with_match(WindowMatch::any_wm_class(&["VirtualBox Machine", "VirtualBox Manager"])),
            Group::new("7").with_label("\u{f03d}"),
            Group::new("8").with_label("A"),
            Group::new("9").with_label("B"),
        ]
    }

    pub fn layouts(&self) -> Vec<LayoutSpec> {
        let s = self.settings;
        let focus = s.palette.accent.clone();
        let normal = s.palette.accent_dark.clone();

        vec![
            LayoutSpec::plain(LayoutKind::Columns)
                .with_margin(s.layout_margin)
                .with_borders(s.border_width, focus.clone(), normal.clone()),
            LayoutSpec::plain(LayoutKind::Max),
            LayoutSpec::plain(LayoutKind::MonadTall)
                .with_margin(s.layout_margin)
                .with_borders(s.border_width, focus.clone(), normal.clone()),
            LayoutSpec::plain(LayoutKind::MonadWide)
                .with_margin(s.layout_margin)
                .with_borders(s.border_width, focus, normal),
        ]
    }

    pub fn floating_layout(&self) -> FloatingLayout {
        FloatingLayout::new(vec![
            WindowMatch::wm_class("confirmreset"),
            WindowMatch::wm_class("makebranch"),
            WindowMatch::wm_class("maketag"),
            WindowMatch::wm_class("ssh-askpass"),
            WindowMatch::wm_class("unityhub"),
            WindowMatch::wm_class("blueman-manager"),
            WindowMatch::title("branchdialog"),
            WindowMatch::wm_class("nm-applet"),
            WindowMatch::wm_class("ocs-url"),
            WindowMatch::wm_class("JetBrains Toolbox"),
            WindowMatch::wm_class("kwalletd5"),
            WindowMatch::wm_class("github desktop"),
            WindowMatch::wm_class("blueman-applet"),
        ])
    }

    /// Ordered widget list of the top bar
    pub fn widgets(&self) -> Vec<Widget> {
        let s = self.settings;
        let background = s.palette.background.clone();
        let accent = s.palette.accent.clone();
        let dark = s.palette.accent_dark.clone();
        let device = BacklightDevice::new(&s.backlight_device);

        vec![
            Widget::new(WidgetKind::GroupBox)
                .option("fontsize", 23u32)
                .option("background", background.clone())
                .option("highlight_method", "text")
                .option("this_current_screen_border", dark)
                .option("active", accent.clone())
                .option("foreground", accent.clone())
                .option("inactive", accent)
                .option("fontshadow", "000000"),
            Widget::new(WidgetKind::CurrentLayout).option("background", background.clone()),
            Widget::new(WidgetKind::Prompt).option("background", background.clone()),
            Widget::new(WidgetKind::WindowName).option("background", background.clone()),
            // Systray does not work under Wayland; StatusNotifier replaces it there.
            Widget::new(WidgetKind::Systray).option("background", background.clone()),
            Widget::new(WidgetKind::Backlight)
                .option("background", background.clone())
                .option("backlight_name", "backlight")
                .option("brightness_file", device.brightness_file().display().to_string())
                .option(
                    "max_brightness_file",
                    device.max_brightness_file().display().to_string(),
                )
                .option("step", s.backlight_step)
                .option("change_command", s.brightness_command.as_str()),
            Widget::new(WidgetKind::Clock)
                .option("format", s.clock_format.as_str())
                .option("background", background),
        ]
    }

    pub fn screens(&self) -> Vec<Screen> {
        vec![Screen::with_top(Bar::new(self.widgets(), self.settings.bar_size))]
    }

    /// Drag and click bindings for floating windows
    pub fn mouse(&self) -> Vec<MouseBinding> {
        let m = self.modifier();
        vec![
            MouseBinding::drag(
                vec![m],
                MouseButton::Button1,
                Action::SetPositionFloating,
                Action::GetPosition,
            ),
            MouseBinding::drag(
                vec![m],
                MouseButton::Button3,
                Action::SetSizeFloating,
                Action::GetSize,
            ),
            MouseBinding::click(vec![m], MouseButton::Button2, Action::BringToFront),
        ]
    }

    /// The autostart script, run once on first startup
    pub fn hooks(&self) -> Vec<HookSubscription> {
        let hook = match &self.settings.autostart_script {
            Some(path) => Hook::RunScript { path: path.clone() },
            None => Hook::autostart(),
        };

        vec![HookSubscription::new(HookEvent::StartupOnce, hook)]
    }
}

/// Two bindings per group: switch to it, and move the focused window there
/// while following it
pub fn group_keys(groups: &[Group], modifier: ModifierKey) -> Vec<KeyBinding> {
    groups
        .iter()
        .flat_map(|group| {
            [
                KeyBinding::new(
                    vec![modifier],
                    group.name.clone(),
                    Action::ToScreen {
                        group: group.name.clone(),
                    },
                    format!("Switch to group {}", group.name),
                ),
                KeyBinding::new(
                    vec![modifier, ModifierKey::Shift],
                    group.name.clone(),
                    Action::ToGroup {
                        group: group.name.clone(),
                        switch_group: true,
                    },
                    format!("Switch to & move focused window to group {}", group.name),
                ),
            ]
        })
        .collect()
}
