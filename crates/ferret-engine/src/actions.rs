//! Interactions built on top of resolution.
//!
//! None of these raise on a missing element: not-found is an ordinary
//! `false` / [`FillOutcome::NotFound`] that the caller turns into an
//! assertion failure. The only error is an unregistered semantic type.

use crate::driver::{Driver, bounded};
use crate::registry::RegistryError;
use crate::resolution::capture::capture_debug;
use crate::resolution::{ElementResolver, ResolveOptions, ResolutionResult};
use ferret_common::SemanticType;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, warn};

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillOutcome {
    Filled,
    NotFound { report: String },
    InteractionFailed(String),
    /// The write went through but the value read back differs.
    VerificationFailed { expected: String, actual: String },
}

impl FillOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FillOutcome::Filled)
    }
}

impl ElementResolver {
    async fn resolve_with<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        semantic_type: &SemanticType,
        options: ResolveOptions,
    ) -> Result<ResolutionResult, RegistryError> {
        self.resolve(driver, semantic_type, &options).await
    }

    /// Resolve and click. `Ok(false)` when nothing resolved or the click failed.
    pub async fn click<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        semantic_type: &SemanticType,
        qualifier: Option<&str>,
    ) -> Result<bool, RegistryError> {
        let result = self
            .resolve_with(
                driver,
                semantic_type,
                ResolveOptions::interactive().with_qualifier(qualifier),
            )
            .await?;
        let Some(element) = result.element else {
            return Ok(false);
        };

        match bounded(self.config().candidate_timeout(), driver.click(&element)).await {
            Ok(()) => {
                info!(%semantic_type, "clicked");
                Ok(true)
            }
            Err(e) => {
                error!(%semantic_type, "click failed: {}", e);
                Ok(false)
            }
        }
    }

    /// Resolve, set the value, then read it back and require an exact match.
    pub async fn fill<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        semantic_type: &SemanticType,
        value: &str,
    ) -> Result<FillOutcome, RegistryError> {
        let result = self
            .resolve_with(driver, semantic_type, ResolveOptions::interactive())
            .await?;
        let Some(element) = result.element.clone() else {
            return Ok(FillOutcome::NotFound {
                report: result.failure_report(),
            });
        };

        let limit = self.config().candidate_timeout();
        if let Err(e) = bounded(limit, driver.type_text(&element, value)).await {
            error!(%semantic_type, "fill failed: {}", e);
            return Ok(FillOutcome::InteractionFailed(e.to_string()));
        }

        let actual = match bounded(limit, driver.read_value(&element)).await {
            Ok(actual) => actual,
            Err(e) => {
                error!(%semantic_type, "could not read back value: {}", e);
                return Ok(FillOutcome::InteractionFailed(e.to_string()));
            }
        };

        if actual == value {
            info!(%semantic_type, "filled");
            Ok(FillOutcome::Filled)
        } else {
            warn!(%semantic_type, "value read back does not match what was typed");
            Ok(FillOutcome::VerificationFailed {
                expected: value.to_string(),
                actual,
            })
        }
    }

    fn visibility_options(&self, qualifier: Option<&str>) -> ResolveOptions {
        ResolveOptions::default()
            .with_qualifier(qualifier)
            .with_timeout(self.config().visibility_timeout())
    }

    /// Visibility check with the short visibility timeout.
    pub async fn is_visible<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        semantic_type: &SemanticType,
        qualifier: Option<&str>,
    ) -> Result<bool, RegistryError> {
        let options = self.visibility_options(qualifier);
        Ok(self.resolve_with(driver, semantic_type, options).await?.found)
    }

    /// Text content of the resolved element, if any.
    pub async fn get_text<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        semantic_type: &SemanticType,
        qualifier: Option<&str>,
    ) -> Result<Option<String>, RegistryError> {
        let result = self
            .resolve_with(
                driver,
                semantic_type,
                ResolveOptions::default().with_qualifier(qualifier),
            )
            .await?;
        let Some(element) = result.element else {
            return Ok(None);
        };
        match bounded(self.config().candidate_timeout(), driver.text_content(&element)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) => {
                error!(%semantic_type, "could not read text: {}", e);
                Ok(None)
            }
        }
    }

    /// True if the resolved element's text contains `expected` (case-sensitive).
    pub async fn contains_text<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        semantic_type: &SemanticType,
        qualifier: Option<&str>,
        expected: &str,
    ) -> Result<bool, RegistryError> {
        Ok(self
            .get_text(driver, semantic_type, qualifier)
            .await?
            .is_some_and(|text| text.contains(expected)))
    }

    /// Case-insensitive check of the current URL. Driver errors read as `false`.
    pub async fn url_contains<D: Driver + ?Sized>(&self, driver: &mut D, fragment: &str) -> bool {
        match bounded(self.config().candidate_timeout(), driver.current_url()).await {
            Ok(url) => url.to_lowercase().contains(&fragment.to_lowercase()),
            Err(e) => {
                warn!("could not read current url: {}", e);
                false
            }
        }
    }

    /// Poll visibility until `timeout` elapses. Polls never capture; one
    /// debug capture is taken when the deadline passes.
    pub async fn wait_for<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        semantic_type: &SemanticType,
        timeout: Duration,
    ) -> Result<bool, RegistryError> {
        let deadline = Instant::now() + timeout;
        loop {
            let options = self.visibility_options(None).without_capture();
            if self.resolve_with(driver, semantic_type, options).await?.found {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                warn!(%semantic_type, ?timeout, "element did not appear");
                capture_debug(driver, semantic_type, self.config()).await;
                return Ok(false);
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }
}
