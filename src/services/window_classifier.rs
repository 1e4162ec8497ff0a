use crate::config::Config;
use crate::models::group::Group;
use crate::models::layout::FloatingLayout;
use crate::models::window_rule::WindowProperties;
use tracing::trace;

/// Where a newly mapped window should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// First group whose rules accept the window; `None` keeps it on the
    /// current group
    pub group: Option<String>,
    pub floating: bool,
}

/// Applies group match rules and float rules to window properties
pub struct WindowClassifier<'a> {
    groups: &'a [Group],
    floating: &'a FloatingLayout,
}

impl<'a> WindowClassifier<'a> {
    pub fn new(groups: &'a [Group], floating: &'a FloatingLayout) -> Self {
        Self { groups, floating }
    }

    pub fn from_config(config: &'a Config) -> Self {
        Self::new(&config.groups, &config.floating_layout)
    }

    pub fn classify(&self, window: &WindowProperties) -> Placement {
        let group = self
            .groups
            .iter()
            .find(|g| g.accepts(window))
            .map(|g| g.name.clone());
        let floating = self.floating.should_float(window);

        trace!(?window, ?group, floating, "Classified window");
        Placement { group, floating }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_default_rules() {
        let config = Config::load(&Settings::default());
        let classifier = WindowClassifier::from_config(&config);

        let browser = classifier.classify(&WindowProperties::new(&["brave-browser", "brave"], "New Tab"));
        assert_eq!(browser.group.as_deref(), Some("1"));
        assert!(!browser.floating);

        let vm = classifier.classify(&WindowProperties::new(&["VirtualBox Manager"], "Oracle VM"));
        assert_eq!(vm.group.as_deref(), Some("6"));

        let applet = classifier.classify(&WindowProperties::new(&["nm-applet"], "Network"));
        assert_eq!(applet.group, None);
        assert!(applet.floating);
    }

    #[test]
    fn test_window_can_match_group_and_float() {
        let groups = vec![Group::new("2").with_match(crate::models::WindowMatch::wm_class("kitty"))];
        let floating = FloatingLayout::new(vec![crate::models::WindowMatch::title("scratch")]);
        let classifier = WindowClassifier::new(&groups, &floating);

        let placement = classifier.classify(&WindowProperties::new(&["kitty"], "scratch"));
        assert_eq!(
            placement,
            Placement {
                group: Some("2".to_string()),
                floating: true
            }
        );
    }
}
