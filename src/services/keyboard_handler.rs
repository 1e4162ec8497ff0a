use crate::models::action::Action;
use crate::models::keyboard_mapping::{KeyBinding, KeyCombination};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Counters for dispatch activity
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeyDispatcherMetrics {
    pub registered_bindings: usize,
    pub shadowed_bindings: usize,
    pub dispatched: u64,
    pub unbound: u64,
}

/// Index from key combination to the action bound to it
#[derive(Debug, Default)]
pub struct KeyDispatcher {
    index: HashMap<KeyCombination, usize>,
    bindings: Vec<KeyBinding>,
    metrics: KeyDispatcherMetrics,
}

impl KeyDispatcher {
    /// Build the index. When a combination is bound twice the first binding
    /// wins, matching declaration order.
    pub fn new(bindings: &[KeyBinding]) -> Self {
        let mut index = HashMap::new();
        let mut shadowed = 0;

        for (position, binding) in bindings.iter().enumerate() {
            let combination = binding.combination();
            if let Some(&first) = index.get(&combination) {
                let first: &KeyBinding = &bindings[first];
                warn!(
                    shortcut = %combination,
                    kept = %first.description,
                    dropped = %binding.description,
                    "Key combination bound twice"
                );
                shadowed += 1;
                continue;
            }
            index.insert(combination, position);
        }

        let metrics = KeyDispatcherMetrics {
            registered_bindings: index.len(),
            shadowed_bindings: shadowed,
            ..KeyDispatcherMetrics::default()
        };

        Self {
            index,
            bindings: bindings.to_vec(),
            metrics,
        }
    }

    /// Look up without touching the counters
    pub fn lookup(&self, combination: &KeyCombination) -> Option<&KeyBinding> {
        self.index.get(combination).map(|&i| &self.bindings[i])
    }

    /// Resolve a pressed combination to its action
    pub fn resolve(&mut self, combination: &KeyCombination) -> Option<&Action> {
        match self.index.get(combination) {
            Some(&i) => {
                self.metrics.dispatched += 1;
                let binding = &self.bindings[i];
                debug!(shortcut = %combination, command = %binding.action.command_path(), "Key dispatched");
                Some(&binding.action)
            }
            None => {
                self.metrics.unbound += 1;
                debug!(shortcut = %combination, "No binding for key");
                None
            }
        }
    }

    /// Bindings in declaration order, shadowed ones excluded
    pub fn active_bindings(&self) -> Vec<&KeyBinding> {
        let mut positions: Vec<usize> = self.index.values().copied().collect();
        positions.sort_unstable();
        positions.into_iter().map(|i| &self.bindings[i]).collect()
    }

    pub fn metrics(&self) -> &KeyDispatcherMetrics {
        &self.metrics
    }
}
