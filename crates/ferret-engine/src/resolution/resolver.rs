//! Priority-ordered fallback resolution of semantic types.

use super::capture::capture_debug;
use super::result::{Attempt, AttemptOutcome, ResolutionResult};
use crate::driver::{Driver, DriverError, ElementHandle, bounded};
use crate::registry::{RegistryError, RegistrySnapshot, SelectorRegistry};
use ferret_common::config::schema::ResolverConfig;
use ferret_common::{SelectorCandidate, SemanticType};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Per-call knobs for [`ElementResolver::resolve`].
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Case-insensitive text the chosen element must contain.
    pub qualifier: Option<String>,
    /// Interactive operations also require the element to be enabled.
    pub require_enabled: bool,
    /// Overrides the configured per-candidate wait.
    pub timeout: Option<Duration>,
    /// Take a debug capture when every candidate is exhausted. Polling
    /// callers turn this off and capture once at their own deadline.
    pub capture: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            qualifier: None,
            require_enabled: false,
            timeout: None,
            capture: true,
        }
    }
}

impl ResolveOptions {
    pub fn interactive() -> Self {
        Self {
            require_enabled: true,
            ..Default::default()
        }
    }

    pub fn with_qualifier(mut self, qualifier: Option<&str>) -> Self {
        self.qualifier = qualifier.map(str::to_string);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn without_capture(mut self) -> Self {
        self.capture = false;
        self
    }
}

/// Maps a semantic type to one live element using the registry.
///
/// Holds only an immutable registry snapshot and configuration, so one
/// resolver can serve any number of pages. It never retries the whole
/// candidate list; retry and backoff belong to the caller.
#[derive(Debug, Clone)]
pub struct ElementResolver {
    registry: RegistrySnapshot,
    config: ResolverConfig,
}

/// How far a node got through the checks; higher is closer to a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Progress {
    NotVisible,
    NoTextMatch,
    NotEnabled,
}

impl From<Progress> for AttemptOutcome {
    fn from(p: Progress) -> Self {
        match p {
            Progress::NotVisible => AttemptOutcome::NotVisible,
            Progress::NoTextMatch => AttemptOutcome::NoTextMatch,
            Progress::NotEnabled => AttemptOutcome::NotEnabled,
        }
    }
}

impl ElementResolver {
    pub fn new(registry: RegistrySnapshot, config: ResolverConfig) -> Self {
        Self { registry, config }
    }

    pub fn from_registry(registry: SelectorRegistry, config: ResolverConfig) -> Self {
        Self::new(Arc::new(registry), config)
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn registry(&self) -> &SelectorRegistry {
        &self.registry
    }

    /// Resolve `semantic_type` against the page behind `driver`.
    ///
    /// Candidates are tried in registry order and the first qualifying node
    /// wins. When every candidate is exhausted the result has
    /// `found == false` and one attempt per candidate. The only error is an
    /// unregistered type.
    pub async fn resolve<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        semantic_type: &SemanticType,
        options: &ResolveOptions,
    ) -> Result<ResolutionResult, RegistryError> {
        let candidates = self.registry.lookup(semantic_type)?;
        let wait = options
            .timeout
            .unwrap_or_else(|| self.config.candidate_timeout());
        let mut attempts = Vec::with_capacity(candidates.len());

        for (i, candidate) in candidates.into_iter().enumerate() {
            debug!(
                %semantic_type,
                attempt = i + 1,
                tier = ?candidate.tier(),
                %candidate,
                "trying candidate"
            );

            let outcome = match bounded(wait, driver.query_all(&candidate, wait)).await {
                Ok(nodes) if nodes.is_empty() => AttemptOutcome::NoMatch,
                Ok(nodes) => match self.select_node(driver, &nodes, options, wait).await {
                    Ok(element) => {
                        info!(%semantic_type, %candidate, "resolved element");
                        attempts.push(Attempt {
                            candidate: candidate.clone(),
                            outcome: AttemptOutcome::Matched,
                        });
                        return Ok(ResolutionResult::found(
                            semantic_type.clone(),
                            element,
                            candidate,
                            attempts,
                        ));
                    }
                    Err(progress) => progress.into(),
                },
                Err(DriverError::Timeout(_)) => AttemptOutcome::TimedOut,
                Err(e) => AttemptOutcome::QueryFailed(e.to_string()),
            };

            debug!(%semantic_type, %candidate, %outcome, "candidate rejected");
            attempts.push(Attempt { candidate, outcome });
        }

        warn!(
            %semantic_type,
            attempts = attempts.len(),
            qualifier = options.qualifier.as_deref().unwrap_or(""),
            "all candidates exhausted"
        );
        let mut result = ResolutionResult::exhausted(semantic_type.clone(), attempts);
        if options.capture {
            result.debug_capture = capture_debug(driver, semantic_type, &self.config).await;
        }
        Ok(result)
    }

    /// First node that is visible, carries the qualifier and (if required)
    /// is enabled. Driver errors on a node count as that check failing.
    async fn select_node<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        nodes: &[ElementHandle],
        options: &ResolveOptions,
        wait: Duration,
    ) -> Result<ElementHandle, Progress> {
        let qualifier = options.qualifier.as_ref().map(|q| q.to_lowercase());
        let mut best = Progress::NotVisible;

        for node in nodes {
            if !check(bounded(wait, driver.is_visible(node)).await, node, "visibility") {
                continue;
            }

            if let Some(q) = &qualifier {
                let text = match bounded(wait, driver.text_content(node)).await {
                    Ok(text) => text,
                    Err(e) => {
                        debug!(element = %node, "text read failed: {}", e);
                        String::new()
                    }
                };
                if !text.to_lowercase().contains(q.as_str()) {
                    best = best.max(Progress::NoTextMatch);
                    continue;
                }
            }

            if options.require_enabled
                && !check(bounded(wait, driver.is_enabled(node)).await, node, "enabled")
            {
                best = best.max(Progress::NotEnabled);
                continue;
            }

            return Ok(node.clone());
        }

        Err(best)
    }
}

fn check(
    result: Result<bool, DriverError>,
    node: &ElementHandle,
    what: &str,
) -> bool {
    match result {
        Ok(ok) => ok,
        Err(e) => {
            debug!(element = %node, check = what, "check failed: {}", e);
            false
        }
    }
}
