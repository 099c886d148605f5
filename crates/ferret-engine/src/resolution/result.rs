use crate::driver::ElementHandle;
use ferret_common::{SelectorCandidate, SemanticType};
use std::fmt;
use std::path::PathBuf;

/// Why a single candidate did or did not produce the element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Matched,
    /// The query returned no nodes.
    NoMatch,
    /// Nodes matched but none was visible.
    NotVisible,
    /// Visible nodes matched but none carried the text qualifier.
    NoTextMatch,
    /// Visible nodes matched but none was enabled (interactive operations only).
    NotEnabled,
    /// The per-candidate wait elapsed.
    TimedOut,
    QueryFailed(String),
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptOutcome::Matched => f.write_str("matched"),
            AttemptOutcome::NoMatch => f.write_str("no match"),
            AttemptOutcome::NotVisible => f.write_str("not visible"),
            AttemptOutcome::NoTextMatch => f.write_str("text qualifier not found"),
            AttemptOutcome::NotEnabled => f.write_str("not enabled"),
            AttemptOutcome::TimedOut => f.write_str("timed out"),
            AttemptOutcome::QueryFailed(reason) => write!(f, "query failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub candidate: SelectorCandidate,
    pub outcome: AttemptOutcome,
}

/// Screenshot captured after an exhausted resolution.
#[derive(Debug, Clone)]
pub struct DebugCapture {
    pub name: String,
    /// Where the capture was written, if a screenshot directory is configured
    /// and the write succeeded.
    pub path: Option<PathBuf>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ResolutionResult {
    pub semantic_type: SemanticType,
    pub found: bool,
    pub element: Option<ElementHandle>,
    pub candidate_used: Option<SelectorCandidate>,
    pub attempts: Vec<Attempt>,
    pub debug_capture: Option<DebugCapture>,
}

impl ResolutionResult {
    pub(crate) fn found(
        semantic_type: SemanticType,
        element: ElementHandle,
        candidate: SelectorCandidate,
        attempts: Vec<Attempt>,
    ) -> Self {
        Self {
            semantic_type,
            found: true,
            element: Some(element),
            candidate_used: Some(candidate),
            attempts,
            debug_capture: None,
        }
    }

    pub(crate) fn exhausted(semantic_type: SemanticType, attempts: Vec<Attempt>) -> Self {
        Self {
            semantic_type,
            found: false,
            element: None,
            candidate_used: None,
            attempts,
            debug_capture: None,
        }
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }

    /// Multi-line description of every attempt, for assertion messages.
    pub fn failure_report(&self) -> String {
        let mut report = format!(
            "Could not resolve '{}' after {} candidate(s)",
            self.semantic_type,
            self.attempts.len()
        );
        for (i, attempt) in self.attempts.iter().enumerate() {
            report.push_str(&format!(
                "\n  {}. [{:?}] {} -> {}",
                i + 1,
                attempt.candidate.tier(),
                attempt.candidate,
                attempt.outcome
            ));
        }
        if let Some(capture) = &self.debug_capture {
            report.push_str(&format!("\n  screenshot: {}", capture.name));
        }
        report
    }
}
