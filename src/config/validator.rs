use crate::config::settings::ConfigParseError;
use crate::config::Config;
use crate::models::{
    action::Action,
    group::Group,
    keyboard_mapping::{KeyBinding, KeyBindingError, KeyCombination, ModifierKey},
    layout::{FloatingLayout, LayoutSpec},
    mouse::MouseBinding,
};
use crate::services::hooks::{HookEvent, HookSubscription};
use regex::Regex;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub name: String,
    pub description: String,
    pub severity: ValidationSeverity,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub rule: ValidationRule,
    pub message: String,
    /// Name or chord of the offending entry
    pub entity: Option<String>,
    pub entity_type: String,
}

impl ValidationResult {
    pub fn is_error(&self) -> bool {
        self.rule.severity == ValidationSeverity::Error
    }
}

/// Structural checks over a built `Config`
pub struct ConfigValidator {
    rules: Vec<ValidationRule>,
    allowed_modifiers: HashSet<ModifierKey>,
    key_symbol_regex: Regex,
}

impl ConfigValidator {
    /// Validator accepting `modifier` plus shift and control in key bindings
    pub fn new(modifier: ModifierKey) -> Result<Self, ConfigParseError> {
        let key_symbol_regex = Regex::new(r"^(?:[[:alnum:]]|[A-Za-z][A-Za-z0-9_]+)$").map_err(|e| {
            ConfigParseError::ValidationError {
                message: format!("Failed to compile key symbol regex: {}", e),
            }
        })?;

        Ok(Self {
            rules: Self::default_rules(),
            allowed_modifiers: [modifier, ModifierKey::Shift, ModifierKey::Control]
                .into_iter()
                .collect(),
            key_symbol_regex,
        })
    }

    pub fn validate_full_config(&self, config: &Config) -> Vec<ValidationResult> {
        let mut results = Vec::new();

        results.extend(self.validate_groups(&config.groups));
        results.extend(self.validate_key_bindings(&config.keys));
        results.extend(self.validate_group_bindings(&config.groups, &config.keys));
        results.extend(self.validate_layouts(&config.layouts, &config.groups));
        results.extend(self.validate_float_rules(&config.floating_layout));
        results.extend(self.validate_mouse_bindings(&config.mouse));
        results.extend(self.validate_hooks(&config.hooks));

        results
    }

    pub fn has_errors(results: &[ValidationResult]) -> bool {
        results.iter().any(ValidationResult::is_error)
    }

    pub fn validate_groups(&self, groups: &[Group]) -> Vec<ValidationResult> {
        let mut results = Vec::new();
        let mut seen = HashSet::new();

        for group in groups {
            if let Err(e) = group.validate() {
                results.push(self.report(
                    "invalid_group_name",
                    e.to_string(),
                    "Group",
                    Some(group.name.clone()),
                ));
                continue;
            }

            if !seen.insert(group.name.as_str()) {
                results.push(self.report(
                    "duplicate_group_name",
                    format!("Group name '{}' is used by multiple groups", group.name),
                    "Group",
                    Some(group.name.clone()),
                ));
            }
        }

        results
    }

    pub fn validate_key_bindings(&self, keys: &[KeyBinding]) -> Vec<ValidationResult> {
        let mut results = Vec::new();
        let mut combinations: HashMap<KeyCombination, &str> = HashMap::new();

        for binding in keys {
            let combination = binding.combination();
            let chord = combination.to_string();

            if let Err(e) = binding.validate() {
                let rule = match e {
                    KeyBindingError::NoModifiers => "empty_modifier_set",
                    KeyBindingError::InvalidCommand(_) => "invalid_spawn_command",
                    _ => "incomplete_key_binding",
                };
                results.push(self.report(
                    rule,
                    format!("Key binding '{}': {}", chord, e),
                    "KeyBinding",
                    Some(chord.clone()),
                ));
            }

            for modifier in &binding.modifiers {
                if !self.allowed_modifiers.contains(modifier) {
                    results.push(self.report(
                        "foreign_modifier",
                        format!("Key binding '{}' uses undeclared modifier '{}'", chord, modifier),
                        "KeyBinding",
                        Some(chord.clone()),
                    ));
                }
            }

            if !self.key_symbol_regex.is_match(&binding.key) {
                results.push(self.report(
                    "invalid_key_symbol",
                    format!("'{}' is not a valid key symbol", binding.key),
                    "KeyBinding",
                    Some(chord.clone()),
                ));
            }

            if let Some(existing) = combinations.insert(combination, &binding.description) {
                results.push(self.report(
                    "duplicate_key_combination",
                    format!(
                        "Key combination '{}' is bound twice ('{}' and '{}')",
                        chord, existing, binding.description
                    ),
                    "KeyBinding",
                    Some(chord),
                ));
            }
        }

        results
    }

    /// Every group needs exactly one switch binding and one move-and-switch
    /// binding, both naming the group in their description
    pub fn validate_group_bindings(
        &self,
        groups: &[Group],
        keys: &[KeyBinding],
    ) -> Vec<ValidationResult> {
        let mut results = Vec::new();

        for group in groups {
            let derived: Vec<&KeyBinding> = keys
                .iter()
                .filter(|k| k.action.target_group() == Some(group.name.as_str()))
                .collect();

            let switches = derived
                .iter()
                .filter(|k| matches!(k.action, Action::ToScreen { .. }))
                .count();
            let moves = derived
                .iter()
                .filter(|k| {
                    matches!(
                        k.action,
                        Action::ToGroup {
                            switch_group: true,
                            ..
                        }
                    )
                })
                .count();

            if derived.len() != 2 || switches != 1 || moves != 1 {
                results.push(self.report(
                    "group_binding_count",
                    format!(
                        "Group '{}' has {} derived bindings ({} switch, {} move); expected one of each",
                        group.name,
                        derived.len(),
                        switches,
                        moves
                    ),
                    "Group",
                    Some(group.name.clone()),
                ));
            }

            for binding in derived {
                if !binding.description.contains(&group.name) {
                    results.push(self.report(
                        "group_binding_description",
                        format!(
                            "Binding '{}' targets group '{}' but its description does not name it",
                            binding.combination(),
                            group.name
                        ),
                        "KeyBinding",
                        Some(binding.combination().to_string()),
                    ));
                }
            }
        }

        results
    }

    pub fn validate_layouts(&self, layouts: &[LayoutSpec], groups: &[Group]) -> Vec<ValidationResult> {
        let mut results = Vec::new();
        let mut names = HashSet::new();

        if layouts.is_empty() {
            results.push(self.report(
                "no_layouts",
                "At least one layout must be declared".to_string(),
                "Layout",
                None,
            ));
        }

        for layout in layouts {
            if !names.insert(layout.name()) {
                results.push(self.report(
                    "duplicate_layout",
                    format!("Layout '{}' is declared more than once", layout.name()),
                    "Layout",
                    Some(layout.name().to_string()),
                ));
            }
        }

        for group in groups {
            if let Some(ref wanted) = group.layout {
                if !names.contains(wanted.as_str()) {
                    results.push(self.report(
                        "unknown_group_layout",
                        format!(
                            "Group '{}' starts in layout '{}', which is not declared",
                            group.name, wanted
                        ),
                        "Group",
                        Some(group.name.clone()),
                    ));
                }
            }
        }

        results
    }

    pub fn validate_float_rules(&self, floating: &FloatingLayout) -> Vec<ValidationResult> {
        floating
            .float_rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.is_empty())
            .map(|(index, _)| {
                self.report(
                    "empty_float_rule",
                    format!("Float rule #{} has no criteria and never matches", index),
                    "FloatRule",
                    Some(index.to_string()),
                )
            })
            .collect()
    }

    pub fn validate_mouse_bindings(&self, mouse: &[MouseBinding]) -> Vec<ValidationResult> {
        let mut results = Vec::new();
        let mut chords = HashSet::new();

        for binding in mouse {
            let (modifiers, button) = binding.chord();
            let label = modifiers
                .iter()
                .map(|m| m.token())
                .chain(std::iter::once(""))
                .collect::<Vec<_>>()
                .join("+")
                + &button.to_string();

            if !chords.insert((modifiers, button)) {
                results.push(self.report(
                    "duplicate_mouse_binding",
                    format!("Mouse chord '{}' is bound more than once", label),
                    "MouseBinding",
                    Some(label),
                ));
            }
        }

        results
    }

    pub fn validate_hooks(&self, hooks: &[HookSubscription]) -> Vec<ValidationResult> {
        let count = hooks
            .iter()
            .filter(|h| h.event == HookEvent::StartupOnce)
            .count();

        if count == 1 {
            return Vec::new();
        }

        vec![self.report(
            "startup_hook_count",
            format!("{} startup_once hooks are registered; one is expected", count),
            "Hook",
            None,
        )]
    }

    fn report(
        &self,
        rule: &str,
        message: String,
        entity_type: &str,
        entity: Option<String>,
    ) -> ValidationResult {
        let rule = self.get_rule(rule).unwrap_or_else(|| ValidationRule {
            name: rule.to_string(),
            description: String::new(),
            severity: ValidationSeverity::Error,
        });

        ValidationResult {
            rule,
            message,
            entity,
            entity_type: entity_type.to_string(),
        }
    }

    fn get_rule(&self, name: &str) -> Option<ValidationRule> {
        self.rules.iter().find(|r| r.name == name).cloned()
    }

    fn default_rules() -> Vec<ValidationRule> {
        let rule = |name: &str, description: &str, severity| ValidationRule {
            name: name.to_string(),
            description: description.to_string(),
            severity,
        };

        vec![
            rule(
                "invalid_group_name",
                "Group names must be non-empty and free of whitespace",
                ValidationSeverity::Error,
            ),
            rule("duplicate_group_name", "Group names must be unique", ValidationSeverity::Error),
            rule("empty_modifier_set", "Key bindings need at least one modifier", ValidationSeverity::Error),
            rule(
                "incomplete_key_binding",
                "Key bindings need a key symbol and a description",
                ValidationSeverity::Error,
            ),
            rule(
                "foreign_modifier",
                "Key bindings may only use the main modifier, shift and control",
                ValidationSeverity::Error,
            ),
            rule("invalid_key_symbol", "Key symbols must be well formed", ValidationSeverity::Error),
            rule(
                "invalid_spawn_command",
                "Spawned command lines must be parseable",
                ValidationSeverity::Error,
            ),
            rule(
                "duplicate_key_combination",
                "A key combination can only be bound once",
                ValidationSeverity::Error,
            ),
            rule(
                "group_binding_count",
                "Each group has one switch and one move-and-switch binding",
                ValidationSeverity::Error,
            ),
            rule(
                "group_binding_description",
                "Group binding descriptions name their group",
                ValidationSeverity::Error,
            ),
            rule("no_layouts", "At least one layout is required", ValidationSeverity::Error),
            rule("duplicate_layout", "Layouts should be declared once", ValidationSeverity::Warning),
            rule(
                "unknown_group_layout",
                "A group's initial layout must be declared",
                ValidationSeverity::Error,
            ),
            rule("empty_float_rule", "Float rules should have criteria", ValidationSeverity::Warning),
            rule(
                "duplicate_mouse_binding",
                "A mouse chord should only be bound once",
                ValidationSeverity::Warning,
            ),
            rule(
                "startup_hook_count",
                "One autostart hook is expected",
                ValidationSeverity::Info,
            ),
        ]
    }
}
