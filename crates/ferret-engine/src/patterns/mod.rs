//! Detection of UI workflow facts from a discovered inventory.

pub mod rules;

pub use ferret_common::lint_conflicts;
pub use rules::Rule;

use ferret_common::{Inventory, UiPatternFact};
use tracing::{debug, info, warn};

/// Applies a fixed, ordered rule table to an inventory.
pub struct PatternDetector {
    rules: Vec<(&'static str, Rule)>,
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternDetector {
    pub fn new() -> Self {
        Self {
            rules: rules::RULES.to_vec(),
        }
    }

    /// Replace the rule table. Order is preserved and decides conflicts.
    pub fn with_rules(rules: Vec<(&'static str, Rule)>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|(name, _)| *name)
    }

    /// Run every rule once, in declared order.
    ///
    /// An empty inventory or a page with no recognizable structure yields no
    /// facts, which is a valid result.
    pub fn detect(&self, inventory: &Inventory) -> Vec<UiPatternFact> {
        if inventory.is_empty() {
            debug!("empty inventory, no patterns to detect");
            return Vec::new();
        }

        let mut facts = Vec::new();
        for (name, rule) in &self.rules {
            match rule(inventory) {
                Some(fact) => {
                    info!(
                        rule = *name,
                        trigger = %fact.trigger,
                        dependent = %fact.dependent_type,
                        "detected ui pattern"
                    );
                    facts.push(fact);
                }
                None => debug!(rule = *name, "rule did not match"),
            }
        }

        for conflict in lint_conflicts(&facts) {
            warn!(
                dependent = %conflict.dependent_type,
                kept = %conflict.kept,
                ignored = %conflict.ignored,
                "conflicting pattern facts, first declared wins"
            );
        }
        facts
    }
}
