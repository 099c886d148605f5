pub mod actions;
pub mod config;
pub mod discovery;
pub mod driver;
pub mod patterns;
pub mod registry;
pub mod resolution;
pub mod runner;

pub use actions::FillOutcome;
pub use discovery::{CandidateDiscovery, MergeSummary, Proposal};
pub use driver::{Driver, DriverError, ElementHandle};
pub use patterns::PatternDetector;
pub use registry::{RegistryError, RegistrySnapshot, SelectorRegistry, SharedRegistry};
pub use resolution::{ElementResolver, ResolutionResult, ResolveOptions};
pub use runner::{PlanRunner, RunError, StepReport};
