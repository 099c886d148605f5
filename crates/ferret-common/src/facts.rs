use crate::semantic::SemanticType;
use serde::{Deserialize, Serialize};

/// A discovered structural relationship between two semantic types.
///
/// `dependent_type` is only reachable after interacting with `trigger`
/// (e.g. logout sits inside the user menu). Facts are advisory: the
/// compiler may use them to insert prerequisite steps, and their absence
/// never blocks compilation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UiPatternFact {
    pub name: String,
    pub trigger: SemanticType,
    pub dependent_type: SemanticType,
}

impl UiPatternFact {
    pub fn new(
        name: impl Into<String>,
        trigger: impl Into<SemanticType>,
        dependent_type: impl Into<SemanticType>,
    ) -> Self {
        Self {
            name: name.into(),
            trigger: trigger.into(),
            dependent_type: dependent_type.into(),
        }
    }
}

/// Two facts proposing different triggers for the same dependent type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactConflict {
    pub dependent_type: SemanticType,
    /// Name of the fact that wins (first in declared order).
    pub kept: String,
    pub ignored: String,
}

/// Every pair of facts that names the same dependent type with different
/// triggers. The earlier fact in `facts` is the one kept.
pub fn lint_conflicts(facts: &[UiPatternFact]) -> Vec<FactConflict> {
    let mut conflicts = Vec::new();
    for (i, kept) in facts.iter().enumerate() {
        if facts[..i]
            .iter()
            .any(|earlier| earlier.dependent_type == kept.dependent_type)
        {
            continue;
        }
        for later in &facts[i + 1..] {
            if later.dependent_type == kept.dependent_type && later.trigger != kept.trigger {
                conflicts.push(FactConflict {
                    dependent_type: kept.dependent_type.clone(),
                    kept: kept.name.clone(),
                    ignored: later.name.clone(),
                });
            }
        }
    }
    conflicts
}
