use ferret_common::config::schema::TargetFramework;
use ferret_engine::config::loader::CONFIG_ENV;
use ferret_engine::config::{ConfigError, ConfigLoader};
use serial_test::serial;
use std::ffi::OsString;

/// Sets an environment variable for the lifetime of the guard.
struct EnvGuard {
    key: &'static str,
    previous: Option<OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, value: impl Into<OsString>) -> Self {
        let previous = std::env::var_os(key);
        // Every test in this file is #[serial].
        unsafe { std::env::set_var(key, value.into()) };
        Self { key, previous }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => unsafe { std::env::set_var(self.key, value) },
            None => unsafe { std::env::remove_var(self.key) },
        }
    }
}

#[tokio::test]
#[serial]
async fn test_partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ferret.yaml");
    std::fs::write(
        &path,
        "resolver:\n  candidate_timeout_ms: 2500\nemitter:\n  framework: selenium-python\n",
    )
    .unwrap();

    let config = ConfigLoader::load_from(&path).await.unwrap();
    assert_eq!(config.resolver.candidate_timeout_ms, 2500);
    assert_eq!(config.resolver.visibility_timeout_ms, 1000);
    assert!(config.resolver.capture_on_failure);
    assert_eq!(config.runner.max_retries, 2);
    assert!(config.compiler.apply_pattern_facts);
    assert_eq!(config.emitter.framework, TargetFramework::SeleniumPython);
    assert_eq!(config.emitter.indent, 4);
}

#[tokio::test]
#[serial]
async fn test_invalid_yaml_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ferret.yaml");
    std::fs::write(&path, "resolver: [unterminated").unwrap();
    assert!(matches!(
        ConfigLoader::load_from(&path).await,
        Err(ConfigError::Parse(_))
    ));
}

#[tokio::test]
#[serial]
async fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        ConfigLoader::load_from(&dir.path().join("absent.yaml")).await,
        Err(ConfigError::Io(_))
    ));
}

#[tokio::test]
#[serial]
async fn test_load_default_prefers_local_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ferret.yaml"), "runner:\n  max_retries: 7\n").unwrap();
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let loaded = ConfigLoader::load_default().await;
    std::env::set_current_dir(previous).unwrap();

    assert_eq!(loaded.unwrap().runner.max_retries, 7);
}

#[tokio::test]
#[serial]
async fn test_explicit_config_env_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("suite.yaml");
    std::fs::write(&path, "emitter:\n  framework: playwright-typescript\n").unwrap();
    let _env = EnvGuard::set(CONFIG_ENV, &path);

    assert_eq!(ConfigLoader::search_paths()[0], path);
    let config = ConfigLoader::load_default().await.unwrap();
    assert_eq!(config.emitter.framework, TargetFramework::PlaywrightTypescript);
}

#[tokio::test]
#[serial]
async fn test_missing_explicit_config_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let _env = EnvGuard::set(CONFIG_ENV, dir.path().join("absent.yaml"));
    assert!(matches!(
        ConfigLoader::load_default().await,
        Err(ConfigError::Io(_))
    ));
}

#[tokio::test]
#[serial]
async fn test_registry_section_keeps_home_selectors() {
    let home = tempfile::tempdir().unwrap();
    let selectors = home.path().join(".ferret").join("selectors.yaml");
    std::fs::create_dir_all(selectors.parent().unwrap()).unwrap();
    std::fs::write(&selectors, "types: {}\n").unwrap();
    let _home = EnvGuard::set("HOME", home.path());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ferret.yaml");
    std::fs::write(&path, "registry:\n  use_builtin: false\n").unwrap();

    let config = ConfigLoader::load_from(&path).await.unwrap();
    assert!(!config.registry.use_builtin);
    assert_eq!(config.registry.path, Some(selectors));
}

#[tokio::test]
#[serial]
async fn test_relative_paths_follow_the_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ferret.yaml");
    std::fs::write(
        &path,
        "registry:\n  path: selectors/app.yaml\nresolver:\n  screenshot_dir: captures\n",
    )
    .unwrap();

    let config = ConfigLoader::load_from(&path).await.unwrap();
    assert_eq!(config.registry.path, Some(dir.path().join("selectors/app.yaml")));
    assert_eq!(config.resolver.screenshot_dir, Some(dir.path().join("captures")));
}
