use super::schema::FerretConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Overrides the search below with one explicit config file.
pub const CONFIG_ENV: &str = "FERRET_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Candidate config files in lookup order: `$FERRET_CONFIG`,
    /// `./ferret.yaml`, then `~/.ferret/config.yaml`.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(3);
        if let Some(explicit) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            paths.push(PathBuf::from(explicit));
        }
        paths.push(PathBuf::from("ferret.yaml"));
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".ferret").join("config.yaml"));
        }
        paths
    }

    /// First existing file from [`Self::search_paths`], or defaults.
    ///
    /// An explicit `$FERRET_CONFIG` that does not exist is an error rather
    /// than a silent fall through to the next location.
    pub async fn load_default() -> Result<FerretConfig, ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV).is_some_and(|v| !v.is_empty());
        for (i, path) in Self::search_paths().into_iter().enumerate() {
            if path.exists() || (explicit && i == 0) {
                return Self::load_from(&path).await;
            }
            debug!(path = %path.display(), "no config here");
        }
        info!("no ferret config found, using defaults");
        Ok(FerretConfig::default())
    }

    /// Read one file. Relative `registry.path` and `resolver.screenshot_dir`
    /// are taken relative to the file's own directory.
    pub async fn load_from(path: &Path) -> Result<FerretConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let mut config: FerretConfig = serde_yaml::from_str(&content)?;
        if let Some(base) = path.parent() {
            anchor(&mut config, base);
        }
        info!(
            path = %path.display(),
            framework = config.emitter.framework.name(),
            registry = ?config.registry.path,
            "loaded ferret config"
        );
        Ok(config)
    }
}

fn anchor(config: &mut FerretConfig, base: &Path) {
    let rebase = |p: &mut PathBuf| {
        if p.is_relative() {
            *p = base.join(&*p);
        }
    };
    if let Some(path) = config.registry.path.as_mut() {
        rebase(path);
    }
    if let Some(dir) = config.resolver.screenshot_dir.as_mut() {
        rebase(dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_rebases_relative_paths_only() {
        let mut config = FerretConfig::default();
        config.registry.path = Some(PathBuf::from("selectors.yaml"));
        config.resolver.screenshot_dir = Some(PathBuf::from("/tmp/captures"));

        anchor(&mut config, Path::new("/srv/suite"));
        assert_eq!(config.registry.path, Some(PathBuf::from("/srv/suite/selectors.yaml")));
        assert_eq!(config.resolver.screenshot_dir, Some(PathBuf::from("/tmp/captures")));
    }
}
