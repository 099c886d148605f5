//! Selector registry: semantic type -> tiered selector candidates.
//!
//! The registry is loaded once (built-in table, optionally extended from a
//! YAML file) and afterwards only grows through [`SelectorRegistry::merge`].
//! Nothing is ever removed.

pub mod builtin;
pub mod loader;

pub use loader::{RegistryFile, RegistryLoadError, RegistryLoader};

use ferret_common::{CandidateError, SelectorCandidate, SemanticType, Tier};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Semantic type '{0}' is not registered")]
    NotRegistered(SemanticType),
    #[error("Invalid candidate for '{semantic_type}': {source}")]
    InvalidCandidate {
        semantic_type: SemanticType,
        #[source]
        source: CandidateError,
    },
}

#[derive(Debug, Clone, Default)]
struct TierBuckets {
    buckets: [Vec<SelectorCandidate>; 3],
}

impl TierBuckets {
    fn push(&mut self, candidate: SelectorCandidate) {
        self.buckets[candidate.tier().index()].push(candidate);
    }

    fn ordered(&self) -> Vec<SelectorCandidate> {
        self.buckets.iter().flatten().cloned().collect()
    }

    fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

/// Versioned table of per-semantic-type candidates.
#[derive(Debug, Clone, Default)]
pub struct SelectorRegistry {
    version: u64,
    entries: BTreeMap<SemanticType, TierBuckets>,
}

impl SelectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the application-agnostic default table.
    pub fn builtin() -> Self {
        builtin::builtin_registry()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Append a candidate at the end of its tier bucket.
    pub fn register(
        &mut self,
        semantic_type: impl Into<SemanticType>,
        candidate: SelectorCandidate,
    ) {
        let semantic_type = semantic_type.into();
        debug!(%semantic_type, %candidate, tier = ?candidate.tier(), "registering candidate");
        self.entries.entry(semantic_type).or_default().push(candidate);
        self.version += 1;
    }

    /// Validate and register a raw expression, inferring its kind.
    pub fn register_expression(
        &mut self,
        semantic_type: impl Into<SemanticType>,
        expression: &str,
        tier: Tier,
    ) -> Result<(), RegistryError> {
        let semantic_type = semantic_type.into();
        let candidate = SelectorCandidate::inferred(expression, tier).map_err(|source| {
            RegistryError::InvalidCandidate {
                semantic_type: semantic_type.clone(),
                source,
            }
        })?;
        self.register(semantic_type, candidate);
        Ok(())
    }

    /// Candidates for `semantic_type`: all High, then Medium, then Low,
    /// FIFO within each tier. Always a fresh copy.
    pub fn lookup(
        &self,
        semantic_type: &SemanticType,
    ) -> Result<Vec<SelectorCandidate>, RegistryError> {
        self.entries
            .get(semantic_type)
            .map(TierBuckets::ordered)
            .ok_or_else(|| RegistryError::NotRegistered(semantic_type.clone()))
    }

    /// Inject a page-specific candidate discovered at analysis time.
    ///
    /// The candidate goes to the front of the High tier so it is tried
    /// before every generic entry. Returns `false` when the same expression
    /// already leads the list.
    pub fn merge(
        &mut self,
        semantic_type: impl Into<SemanticType>,
        expression: &str,
    ) -> Result<bool, RegistryError> {
        let semantic_type = semantic_type.into();
        let candidate = SelectorCandidate::inferred(expression, Tier::High).map_err(|source| {
            RegistryError::InvalidCandidate {
                semantic_type: semantic_type.clone(),
                source,
            }
        })?;

        let entry = self.entries.entry(semantic_type.clone()).or_default();
        let high = &mut entry.buckets[Tier::High.index()];
        if high
            .first()
            .is_some_and(|c| c.expression() == candidate.expression())
        {
            return Ok(false);
        }
        info!(%semantic_type, expression = candidate.expression(), "merged discovered candidate");
        high.insert(0, candidate);
        self.version += 1;
        Ok(true)
    }

    /// Append every candidate of `other`, keeping tiers and order.
    pub fn extend(&mut self, other: &SelectorRegistry) {
        for (semantic_type, buckets) in &other.entries {
            for candidate in buckets.ordered() {
                self.register(semantic_type.clone(), candidate);
            }
        }
    }

    pub fn contains(&self, semantic_type: &SemanticType) -> bool {
        self.entries.contains_key(semantic_type)
    }

    pub fn candidate_count(&self, semantic_type: &SemanticType) -> usize {
        self.entries.get(semantic_type).map_or(0, TierBuckets::len)
    }

    pub fn types(&self) -> impl Iterator<Item = &SemanticType> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable registry copy handed to executions.
pub type RegistrySnapshot = Arc<SelectorRegistry>;

/// Registry shared between the analysis phase (single writer) and parallel
/// executions (many readers).
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<SelectorRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: SelectorRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::new(guard.clone())
    }

    pub fn lookup(
        &self,
        semantic_type: &SemanticType,
    ) -> Result<Vec<SelectorCandidate>, RegistryError> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .lookup(semantic_type)
    }

    pub fn merge(
        &self,
        semantic_type: impl Into<SemanticType>,
        expression: &str,
    ) -> Result<bool, RegistryError> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .merge(semantic_type, expression)
    }

    pub fn version(&self) -> u64 {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).version()
    }
}
