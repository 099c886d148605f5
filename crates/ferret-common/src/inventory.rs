use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Discovery tooling emits `null` for attributes that are absent; drop them.
fn deserialize_nullable_string_map<'de, D>(
    deserializer: D,
) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let map: HashMap<String, Option<String>> = HashMap::deserialize(deserializer)?;
    Ok(map
        .into_iter()
        .filter_map(|(k, v)| v.map(|val| (k, val)))
        .collect())
}

/// One element found while discovering an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    pub tag: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string_map")]
    pub attributes: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// `/`-separated ancestor chain ending with the element itself,
    /// e.g. `/html/body/header/div[2]/ul/li[3]/a`.
    pub path: String,
}

impl ElementDescriptor {
    pub fn new(tag: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn tag_lower(&self) -> String {
        self.tag.to_lowercase()
    }

    pub fn role(&self) -> Option<&str> {
        self.attr("role")
    }

    /// Lowercased visible text plus the attributes that usually carry a label.
    pub fn text_haystack(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(t) = &self.text {
            parts.push(t);
        }
        for key in ["aria-label", "title", "value", "placeholder", "alt"] {
            if let Some(v) = self.attr(key) {
                parts.push(v);
            }
        }
        parts.join(" ").to_lowercase()
    }

    /// Lowercased identifying attributes (id, class, name, data-testid).
    pub fn attribute_haystack(&self) -> String {
        ["id", "class", "name", "data-testid", "data-test", "data-qa"]
            .iter()
            .filter_map(|k| self.attr(k))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// True if any keyword occurs in the element's text or identifying attributes.
    pub fn mentions_any(&self, keywords: &[&str]) -> bool {
        let text = self.text_haystack();
        let attrs = self.attribute_haystack();
        keywords
            .iter()
            .any(|k| text.contains(k) || attrs.contains(k))
    }

    pub fn has_class_fragment(&self, fragments: &[&str]) -> bool {
        match self.attr("class") {
            Some(class) => {
                let class = class.to_lowercase();
                fragments.iter().any(|f| class.contains(f))
            }
            None => false,
        }
    }

    /// True if this element sits strictly inside `ancestor` in the DOM.
    pub fn is_nested_under(&self, ancestor: &ElementDescriptor) -> bool {
        let prefix = ancestor.path.trim_end_matches('/');
        !prefix.is_empty()
            && self.path.len() > prefix.len() + 1
            && self.path.starts_with(prefix)
            && self.path.as_bytes()[prefix.len()] == b'/'
    }
}

/// Immutable snapshot of everything discovered on an application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    elements: Vec<ElementDescriptor>,
}

impl Inventory {
    pub fn new(elements: Vec<ElementDescriptor>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[ElementDescriptor] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn filter<'a, F>(&'a self, predicate: F) -> Vec<&'a ElementDescriptor>
    where
        F: Fn(&ElementDescriptor) -> bool,
    {
        self.elements.iter().filter(|e| predicate(*e)).collect()
    }
}

impl From<Vec<ElementDescriptor>> for Inventory {
    fn from(elements: Vec<ElementDescriptor>) -> Self {
        Self::new(elements)
    }
}
