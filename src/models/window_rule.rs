use serde::{Deserialize, Serialize};

/// Properties of a live window that match rules are tested against
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowProperties {
    /// WM_CLASS values (instance and class) or the Wayland app id
    pub wm_class: Vec<String>,
    pub title: String,
}

impl WindowProperties {
    pub fn new(wm_class: &[&str], title: impl Into<String>) -> Self {
        WindowProperties {
            wm_class: wm_class.iter().map(|c| c.to_string()).collect(),
            title: title.into(),
        }
    }
}

/// Window predicate. Every criterion given must hold; within `wm_class`
/// any listed class is enough.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowMatch {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wm_class: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl WindowMatch {
    pub fn wm_class(class: impl Into<String>) -> Self {
        WindowMatch {
            wm_class: vec![class.into()],
            title: None,
        }
    }

    pub fn any_wm_class(classes: &[&str]) -> Self {
        WindowMatch {
            wm_class: classes.iter().map(|c| c.to_string()).collect(),
            title: None,
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        WindowMatch {
            wm_class: Vec::new(),
            title: Some(title.into()),
        }
    }

    /// A rule with no criteria never matches anything
    pub fn is_empty(&self) -> bool {
        self.wm_class.is_empty() && self.title.is_none()
    }

    pub fn matches(&self, window: &WindowProperties) -> bool {
        if self.is_empty() {
            return false;
        }

        if !self.wm_class.is_empty()
            && !self
                .wm_class
                .iter()
                .any(|wanted| window.wm_class.iter().any(|have| have == wanted))
        {
            return false;
        }

        match &self.title {
            Some(title) => &window.title == title,
            None => true,
        }
    }
}
