//! Direct execution of action plans against a driver.
//!
//! The resolver never retries; retry and backoff live here, per step.

use crate::actions::FillOutcome;
use crate::driver::Driver;
use crate::registry::RegistryError;
use crate::resolution::ElementResolver;
use ferret_common::config::schema::RunnerConfig;
use ferret_common::{ActionPlanStep, Operation};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("Step '{step}' needs test data '{key}' which was not provided")]
    MissingTestData { step: String, key: String },
    #[error("Step '{step}' has no argument")]
    MissingArgument { step: String },
    #[error("Step '{step}' failed: {detail}")]
    StepFailed { step: String, detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub description: String,
    pub attempts: usize,
}

pub struct PlanRunner {
    resolver: ElementResolver,
    config: RunnerConfig,
    test_data: HashMap<String, String>,
}

impl PlanRunner {
    pub fn new(resolver: ElementResolver, config: RunnerConfig) -> Self {
        Self {
            resolver,
            config,
            test_data: HashMap::new(),
        }
    }

    pub fn with_test_data(mut self, test_data: HashMap<String, String>) -> Self {
        self.test_data = test_data;
        self
    }

    /// Run the plan prerequisites first. Stops at the first step that still
    /// fails after its retries.
    pub async fn run<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        plan: &ActionPlanStep,
    ) -> Result<Vec<StepReport>, RunError> {
        let mut reports = Vec::new();
        for step in plan.execution_order() {
            reports.push(self.run_step(driver, step).await?);
        }
        info!(steps = reports.len(), "plan passed");
        Ok(reports)
    }

    async fn run_step<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        step: &ActionPlanStep,
    ) -> Result<StepReport, RunError> {
        let description = step.describe();
        let max_attempts = self.config.max_retries + 1;
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(step = %description, attempt, "executing step");
            match self.execute(driver, step).await? {
                None => {
                    return Ok(StepReport {
                        description,
                        attempts: attempt,
                    });
                }
                Some(detail) if attempt >= max_attempts => {
                    warn!(step = %description, attempts = attempt, "step failed: {}", detail);
                    return Err(RunError::StepFailed {
                        step: description,
                        detail,
                    });
                }
                Some(detail) => {
                    debug!(step = %description, attempt, "retrying after failure: {}", detail);
                    tokio::time::sleep(self.config.retry_delay()).await;
                }
            }
        }
    }

    fn argument(&self, step: &ActionPlanStep) -> Result<String, RunError> {
        let arg = step.first_arg().ok_or_else(|| RunError::MissingArgument {
            step: step.describe(),
        })?;
        arg.resolve(&self.test_data)
            .ok_or_else(|| RunError::MissingTestData {
                step: step.describe(),
                key: arg.to_string(),
            })
    }

    /// `Ok(None)` on success, `Ok(Some(detail))` on a retryable failure.
    async fn execute<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        step: &ActionPlanStep,
    ) -> Result<Option<String>, RunError> {
        let target = &step.target_type;
        let qualifier = step.qualifier.as_deref();

        if target.is_page() && step.operation != Operation::UrlContains {
            return Err(RunError::StepFailed {
                step: step.describe(),
                detail: format!("'{}' cannot be used with {}", target, step.operation.name()),
            });
        }

        let failure = match step.operation {
            Operation::Click => (!self.resolver.click(driver, target, qualifier).await?)
                .then(|| format!("could not click '{}'", target)),
            Operation::Fill => {
                let value = self.argument(step)?;
                match self.resolver.fill(driver, target, &value).await? {
                    FillOutcome::Filled => None,
                    FillOutcome::NotFound { report } => Some(report),
                    FillOutcome::InteractionFailed(reason) => Some(reason),
                    FillOutcome::VerificationFailed { expected, actual } => Some(format!(
                        "value mismatch: expected '{}', read back '{}'",
                        expected, actual
                    )),
                }
            }
            Operation::IsVisible => (!self.resolver.is_visible(driver, target, qualifier).await?)
                .then(|| format!("'{}' is not visible", target)),
            Operation::ContainsText => {
                let expected = self.argument(step)?;
                (!self
                    .resolver
                    .contains_text(driver, target, qualifier, &expected)
                    .await?)
                    .then(|| format!("'{}' does not contain '{}'", target, expected))
            }
            Operation::UrlContains => {
                let fragment = match step.first_arg() {
                    Some(_) => self.argument(step)?,
                    None => String::new(),
                };
                (!self.resolver.url_contains(driver, &fragment).await)
                    .then(|| format!("url does not contain '{}'", fragment))
            }
        };
        Ok(failure)
    }
}
