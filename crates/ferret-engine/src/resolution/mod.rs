pub mod capture;
pub mod resolver;
pub mod result;

pub use resolver::{ElementResolver, ResolveOptions};
pub use result::{Attempt, AttemptOutcome, DebugCapture, ResolutionResult};
