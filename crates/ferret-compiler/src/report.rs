use ferret_common::FactConflict;
use serde::{Deserialize, Serialize};

/// Quality summary of one compilation batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationReport {
    /// Instructions processed, including failed ones.
    pub total_steps: usize,
    pub generic_fallback_count: usize,
    /// Prerequisite steps inserted from pattern facts.
    pub pattern_facts_applied: usize,
    pub compile_errors: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fact_conflicts: Vec<FactConflict>,
}
