#![allow(dead_code)]

use async_trait::async_trait;
use ferret_common::SelectorCandidate;
use ferret_common::config::schema::ResolverConfig;
use ferret_engine::driver::{Driver, DriverError, ElementHandle};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FakeNode {
    pub id: String,
    pub visible: bool,
    pub enabled: bool,
    pub text: String,
    pub value: String,
    /// When set, typed text is replaced by this value.
    pub sticky_value: Option<String>,
}

impl FakeNode {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            visible: true,
            enabled: true,
            text: String::new(),
            value: String::new(),
            sticky_value: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn sticky(mut self, value: &str) -> Self {
        self.sticky_value = Some(value.to_string());
        self
    }
}

/// In-memory page keyed by selector expression.
#[derive(Debug, Default)]
pub struct FakePage {
    pub url: String,
    selectors: HashMap<String, Vec<String>>,
    nodes: HashMap<String, FakeNode>,
    pub hanging: HashSet<String>,
    pub screenshot_fails: bool,
    pub queried: Vec<String>,
    pub clicks: Vec<String>,
    /// Clicks that make a node visible, keyed by the clicked node id.
    pub reveals: HashMap<String, String>,
    pub screenshots_taken: usize,
}

impl FakePage {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn with(mut self, expression: &str, node: FakeNode) -> Self {
        self.selectors
            .entry(expression.to_string())
            .or_default()
            .push(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
        self
    }

    pub fn hang_on(mut self, expression: &str) -> Self {
        self.hanging.insert(expression.to_string());
        self
    }

    pub fn revealing(mut self, clicked: &str, revealed: &str) -> Self {
        self.reveals.insert(clicked.to_string(), revealed.to_string());
        self
    }

    pub fn node(&self, id: &str) -> &FakeNode {
        &self.nodes[id]
    }

    fn get(&self, element: &ElementHandle) -> Result<&FakeNode, DriverError> {
        self.nodes
            .get(element.id())
            .ok_or_else(|| DriverError::Detached(element.id().to_string()))
    }
}

#[async_trait]
impl Driver for FakePage {
    async fn query_all(
        &mut self,
        candidate: &SelectorCandidate,
        _wait: Duration,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        let expression = candidate.expression().to_string();
        self.queried.push(expression.clone());
        if self.hanging.contains(&expression) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok(self
            .selectors
            .get(&expression)
            .map(|ids| ids.iter().map(ElementHandle::new).collect())
            .unwrap_or_default())
    }

    async fn is_visible(&mut self, element: &ElementHandle) -> Result<bool, DriverError> {
        Ok(self.get(element)?.visible)
    }

    async fn is_enabled(&mut self, element: &ElementHandle) -> Result<bool, DriverError> {
        Ok(self.get(element)?.enabled)
    }

    async fn click(&mut self, element: &ElementHandle) -> Result<(), DriverError> {
        self.get(element)?;
        self.clicks.push(element.id().to_string());
        if let Some(revealed) = self.reveals.get(element.id()).cloned()
            && let Some(node) = self.nodes.get_mut(&revealed)
        {
            node.visible = true;
        }
        Ok(())
    }

    async fn type_text(&mut self, element: &ElementHandle, text: &str) -> Result<(), DriverError> {
        let node = self
            .nodes
            .get_mut(element.id())
            .ok_or_else(|| DriverError::Detached(element.id().to_string()))?;
        node.value = node.sticky_value.clone().unwrap_or_else(|| text.to_string());
        Ok(())
    }

    async fn read_value(&mut self, element: &ElementHandle) -> Result<String, DriverError> {
        Ok(self.get(element)?.value.clone())
    }

    async fn text_content(&mut self, element: &ElementHandle) -> Result<String, DriverError> {
        Ok(self.get(element)?.text.clone())
    }

    async fn current_url(&mut self) -> Result<String, DriverError> {
        Ok(self.url.clone())
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, DriverError> {
        self.screenshots_taken += 1;
        if self.screenshot_fails {
            return Err(DriverError::Other("renderer crashed".into()));
        }
        Ok(vec![0x89, b'P', b'N', b'G'])
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub fn fast_config() -> ResolverConfig {
    ResolverConfig {
        candidate_timeout_ms: 200,
        visibility_timeout_ms: 100,
        capture_timeout_ms: 200,
        capture_on_failure: true,
        screenshot_dir: None,
    }
}
