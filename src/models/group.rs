//! Group model
//!
//! A group is a named virtual desktop. Windows land in it automatically
//! when one of its match rules accepts them.

use crate::models::window_rule::{WindowMatch, WindowProperties};
use crate::{Result, TileRcError};
use serde::{Deserialize, Serialize};

/// Entry of the host's `groups` list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    /// Unique name, also the key symbol of its derived bindings
    pub name: String,

    /// Text shown in the group box widget; defaults to the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Rules that pull new windows into this group
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<WindowMatch>,

    /// Name of the layout the group starts in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Group {
            name: name.into(),
            label: None,
            matches: Vec::new(),
            layout: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_match(mut self, rule: WindowMatch) -> Self {
        self.matches.push(rule);
        self
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn accepts(&self, window: &WindowProperties) -> bool {
        self.matches.iter().any(|rule| rule.matches(window))
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TileRcError::ValidationError("Group name cannot be empty".to_string()).into());
        }

        if self.name.chars().any(char::is_whitespace) {
            return Err(TileRcError::ValidationError(format!(
                "Group name '{}' cannot contain whitespace",
                self.name
            ))
            .into());
        }

        Ok(())
    }
}
