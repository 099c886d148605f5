use async_trait::async_trait;
use ferret_common::SelectorCandidate;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Opaque reference to a live DOM node, owned by the driver that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Error)]
pub enum DriverError {
    #[error("Operation not supported by driver: {0}")]
    NotSupported(String),
    #[error("Element detached from the page: {0}")]
    Detached(String),
    #[error("Driver operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
    #[error("Driver error: {0}")]
    Other(String),
}

/// The browser surface the engine depends on.
///
/// Any automation library (CDP, WebDriver, a test double) can sit behind
/// this trait. Each page/browser context owns its own driver; nothing here
/// is shared across test cases.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Return every node matching the candidate, waiting up to `wait` for
    /// at least one to attach. An empty vector means nothing matched.
    async fn query_all(
        &mut self,
        candidate: &SelectorCandidate,
        wait: Duration,
    ) -> Result<Vec<ElementHandle>, DriverError>;

    async fn is_visible(&mut self, element: &ElementHandle) -> Result<bool, DriverError>;

    async fn is_enabled(&mut self, element: &ElementHandle) -> Result<bool, DriverError>;

    async fn click(&mut self, element: &ElementHandle) -> Result<(), DriverError>;

    /// Replace the element's value with `text`.
    async fn type_text(&mut self, element: &ElementHandle, text: &str) -> Result<(), DriverError>;

    async fn read_value(&mut self, element: &ElementHandle) -> Result<String, DriverError>;

    /// Rendered text of the element. Used for text qualifiers and text checks.
    async fn text_content(&mut self, _element: &ElementHandle) -> Result<String, DriverError> {
        Err(DriverError::NotSupported("text_content".into()))
    }

    async fn current_url(&mut self) -> Result<String, DriverError>;

    /// Capture a PNG of the current viewport.
    async fn screenshot(&mut self) -> Result<Vec<u8>, DriverError>;
}

/// Run a driver call under a local deadline. Elapsed deadlines become
/// `DriverError::Timeout`; nothing outside this call is cancelled.
pub(crate) async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T, DriverError>
where
    F: std::future::Future<Output = Result<T, DriverError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(DriverError::Timeout(limit)),
    }
}
