use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FerretConfig {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub compiler: CompilerConfig,
    #[serde(default)]
    pub emitter: EmitterConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Wait bound for a single candidate to attach.
    #[serde(default = "default_candidate_timeout_ms")]
    pub candidate_timeout_ms: u64,
    /// Shorter bound used by visibility checks.
    #[serde(default = "default_visibility_timeout_ms")]
    pub visibility_timeout_ms: u64,
    #[serde(default = "default_capture_timeout_ms")]
    pub capture_timeout_ms: u64,
    #[serde(default = "default_capture_on_failure")]
    pub capture_on_failure: bool,
    #[serde(default)]
    pub screenshot_dir: Option<PathBuf>,
}

impl ResolverConfig {
    pub fn candidate_timeout(&self) -> Duration {
        Duration::from_millis(self.candidate_timeout_ms)
    }

    pub fn visibility_timeout(&self) -> Duration {
        Duration::from_millis(self.visibility_timeout_ms)
    }

    pub fn capture_timeout(&self) -> Duration {
        Duration::from_millis(self.capture_timeout_ms)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            candidate_timeout_ms: default_candidate_timeout_ms(),
            visibility_timeout_ms: default_visibility_timeout_ms(),
            capture_timeout_ms: default_capture_timeout_ms(),
            capture_on_failure: default_capture_on_failure(),
            screenshot_dir: None,
        }
    }
}

fn default_candidate_timeout_ms() -> u64 {
    5000
}

fn default_visibility_timeout_ms() -> u64 {
    1000
}

fn default_capture_timeout_ms() -> u64 {
    3000
}

fn default_capture_on_failure() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl RunnerConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_max_retries() -> usize {
    2
}

fn default_retry_delay_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    #[serde(default = "default_apply_pattern_facts")]
    pub apply_pattern_facts: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            apply_pattern_facts: default_apply_pattern_facts(),
        }
    }
}

fn default_apply_pattern_facts() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetFramework {
    #[default]
    PlaywrightPython,
    SeleniumPython,
    PlaywrightTypescript,
}

impl TargetFramework {
    pub fn name(self) -> &'static str {
        match self {
            TargetFramework::PlaywrightPython => "playwright-python",
            TargetFramework::SeleniumPython => "selenium-python",
            TargetFramework::PlaywrightTypescript => "playwright-typescript",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "playwright-python" | "playwright" => Some(TargetFramework::PlaywrightPython),
            "selenium-python" | "selenium" => Some(TargetFramework::SeleniumPython),
            "playwright-typescript" | "playwright-ts" => {
                Some(TargetFramework::PlaywrightTypescript)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitterConfig {
    #[serde(default)]
    pub framework: TargetFramework,
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            framework: TargetFramework::default(),
            indent: default_indent(),
        }
    }
}

fn default_indent() -> usize {
    4
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_use_builtin")]
    pub use_builtin: bool,
    #[serde(default = "default_registry_path")]
    pub path: Option<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            use_builtin: default_use_builtin(),
            path: default_registry_path(),
        }
    }
}

fn default_use_builtin() -> bool {
    true
}

fn default_registry_path() -> Option<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".ferret").join("selectors.yaml"))
        .filter(|p| p.exists())
}
