use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Logical element role such as `login_button`.
///
/// This is the unit of indirection between instructions and concrete DOM:
/// instructions name semantic types, the registry maps them to selectors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SemanticType(String);

impl SemanticType {
    /// Reserved type for checks against the page itself (URL checks).
    /// Never looked up in a registry.
    pub const PAGE: &'static str = "page";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn page() -> Self {
        Self(Self::PAGE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_page(&self) -> bool {
        self.0 == Self::PAGE
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SemanticType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SemanticType {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Priority tier of a candidate. Lookup order is High, Medium, Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::High, Tier::Medium, Tier::Low];

    pub fn index(self) -> usize {
        match self {
            Tier::High => 0,
            Tier::Medium => 1,
            Tier::Low => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorKind {
    Attribute,
    Css,
    Text,
    Xpath,
}

impl SelectorKind {
    /// Guess the kind from the expression syntax.
    pub fn infer(expression: &str) -> Self {
        let trimmed = expression.trim_start();
        if trimmed.starts_with("//") || trimmed.starts_with("(//") || trimmed.starts_with("xpath=")
        {
            SelectorKind::Xpath
        } else if trimmed.starts_with("text=") {
            SelectorKind::Text
        } else if trimmed.starts_with('[') {
            SelectorKind::Attribute
        } else {
            SelectorKind::Css
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SelectorKind::Attribute => "attribute",
            SelectorKind::Css => "css",
            SelectorKind::Text => "text",
            SelectorKind::Xpath => "xpath",
        }
    }

    /// Separator that would join alternatives at the top level of an expression.
    fn alternative_separator(self) -> Option<char> {
        match self {
            SelectorKind::Attribute | SelectorKind::Css => Some(','),
            SelectorKind::Xpath => Some('|'),
            SelectorKind::Text => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CandidateError {
    #[error("Selector expression is empty")]
    EmptyExpression,
    #[error(
        "Composite selector '{expression}': each alternative must be registered as its own candidate"
    )]
    CompositeSelector { expression: String },
}

/// One concrete selector expression plus its priority tier.
///
/// Immutable once created; construction validates that the expression is a
/// single selector and not several alternatives joined together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SelectorCandidate {
    expression: String,
    tier: Tier,
    kind: SelectorKind,
}

impl SelectorCandidate {
    pub fn new(
        expression: impl Into<String>,
        tier: Tier,
        kind: SelectorKind,
    ) -> Result<Self, CandidateError> {
        let expression = expression.into().trim().to_string();
        if expression.is_empty() {
            return Err(CandidateError::EmptyExpression);
        }
        if let Some(sep) = kind.alternative_separator()
            && has_top_level(&expression, sep)
        {
            return Err(CandidateError::CompositeSelector { expression });
        }
        Ok(Self {
            expression,
            tier,
            kind,
        })
    }

    /// Build a candidate with the kind inferred from the expression.
    pub fn inferred(expression: impl Into<String>, tier: Tier) -> Result<Self, CandidateError> {
        let expression = expression.into();
        let kind = SelectorKind::infer(&expression);
        Self::new(expression, tier, kind)
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn kind(&self) -> SelectorKind {
        self.kind
    }
}

impl fmt::Display for SelectorCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.name(), self.expression)
    }
}

#[derive(Deserialize)]
struct RawCandidate {
    expression: String,
    tier: Tier,
    #[serde(default)]
    kind: Option<SelectorKind>,
}

impl<'de> Deserialize<'de> for SelectorCandidate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawCandidate::deserialize(deserializer)?;
        let kind = raw
            .kind
            .unwrap_or_else(|| SelectorKind::infer(&raw.expression));
        SelectorCandidate::new(raw.expression, raw.tier, kind).map_err(serde::de::Error::custom)
    }
}

/// True when `sep` occurs outside brackets, parentheses and quotes.
fn has_top_level(expression: &str, sep: char) -> bool {
    let mut depth = 0usize;
    let mut in_quote: Option<char> = None;
    let mut escaped = false;

    for c in expression.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        if let Some(q) = in_quote {
            if c == q {
                in_quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => in_quote = Some(c),
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            _ if c == sep && depth == 0 => return true,
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_inference() {
        assert_eq!(SelectorKind::infer("[data-testid*='login']"), SelectorKind::Attribute);
        assert_eq!(SelectorKind::infer("//button[@id='x']"), SelectorKind::Xpath);
        assert_eq!(SelectorKind::infer("text=Sign in"), SelectorKind::Text);
        assert_eq!(SelectorKind::infer("button:has-text('Login')"), SelectorKind::Css);
    }

    #[test]
    fn test_rejects_comma_joined_css() {
        let err = SelectorCandidate::inferred("#login, .login-btn", Tier::High).unwrap_err();
        assert!(matches!(err, CandidateError::CompositeSelector { .. }));
    }

    #[test]
    fn test_allows_nested_separators() {
        assert!(SelectorCandidate::inferred(":is(nav, header) a", Tier::Low).is_ok());
        assert!(SelectorCandidate::inferred("[title='a, b']", Tier::Low).is_ok());
        assert!(SelectorCandidate::inferred("//a[contains(., 'x|y')]", Tier::Low).is_ok());
        assert!(SelectorCandidate::new("Hello, world", Tier::Low, SelectorKind::Text).is_ok());
    }

    #[test]
    fn test_rejects_xpath_union() {
        let err = SelectorCandidate::inferred("//a | //button", Tier::Medium).unwrap_err();
        assert!(matches!(err, CandidateError::CompositeSelector { .. }));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(
            SelectorCandidate::inferred("   ", Tier::High).unwrap_err(),
            CandidateError::EmptyExpression
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: SelectorCandidate =
            serde_yaml::from_str("{ expression: '#user', tier: high }").unwrap();
        assert_eq!(ok.kind(), SelectorKind::Css);
        let bad: Result<SelectorCandidate, _> =
            serde_yaml::from_str("{ expression: '#a, #b', tier: low }");
        assert!(bad.is_err());
    }
}
