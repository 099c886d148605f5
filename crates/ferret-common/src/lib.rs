pub mod facts;
pub mod inventory;
pub mod plan;
pub mod semantic;

pub mod config {
    pub mod schema;
}

pub use facts::{FactConflict, UiPatternFact, lint_conflicts};
pub use inventory::{ElementDescriptor, Inventory};
pub use plan::{ActionPlanStep, LiteralArg, Operation};
pub use semantic::{CandidateError, SelectorCandidate, SelectorKind, SemanticType, Tier};
