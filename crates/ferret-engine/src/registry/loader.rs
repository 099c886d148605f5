use super::{RegistryError, SelectorRegistry};
use ferret_common::{SelectorCandidate, SelectorKind, SemanticType, Tier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RegistryLoadError {
    #[error("Failed to read registry file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse registry file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateEntry {
    pub expression: String,
    pub tier: Tier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SelectorKind>,
}

/// On-disk selector table.
///
/// ```yaml
/// version: 1
/// types:
///   username_field:
///     - { expression: "#user", tier: high }
///     - { expression: "input[name=username]", tier: medium }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryFile {
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub types: BTreeMap<String, Vec<CandidateEntry>>,
}

impl RegistryFile {
    /// Validate every entry and build a registry. Any composite or empty
    /// expression rejects the whole file. A declared `version` is a floor
    /// for the registry's own counter.
    pub fn into_registry(self) -> Result<SelectorRegistry, RegistryError> {
        let mut registry = SelectorRegistry::new();
        for (name, entries) in self.types {
            let semantic_type = SemanticType::new(name);
            for entry in entries {
                let kind = entry
                    .kind
                    .unwrap_or_else(|| SelectorKind::infer(&entry.expression));
                let candidate = SelectorCandidate::new(entry.expression, entry.tier, kind).map_err(
                    |source| RegistryError::InvalidCandidate {
                        semantic_type: semantic_type.clone(),
                        source,
                    },
                )?;
                registry.register(semantic_type.clone(), candidate);
            }
        }
        if let Some(version) = self.version {
            registry.version = registry.version.max(version);
        }
        Ok(registry)
    }
}

pub struct RegistryLoader;

impl RegistryLoader {
    pub fn parse(content: &str) -> Result<SelectorRegistry, RegistryLoadError> {
        let file: RegistryFile = serde_yaml::from_str(content)?;
        Ok(file.into_registry()?)
    }

    pub async fn load_from(path: &Path) -> Result<SelectorRegistry, RegistryLoadError> {
        let content = tokio::fs::read_to_string(path).await?;
        let registry = Self::parse(&content)?;
        info!(path = %path.display(), types = registry.len(), "loaded selector registry");
        Ok(registry)
    }

    /// Built-in table (optional) followed by the file's entries, which land
    /// behind the built-in candidates of the same tier.
    pub async fn load_layered(
        use_builtin: bool,
        path: Option<&Path>,
    ) -> Result<SelectorRegistry, RegistryLoadError> {
        let mut registry = if use_builtin {
            SelectorRegistry::builtin()
        } else {
            SelectorRegistry::new()
        };
        if let Some(path) = path {
            let loaded = Self::load_from(path).await?;
            registry.extend(&loaded);
        }
        Ok(registry)
    }
}
