use crate::semantic::SemanticType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Click,
    Fill,
    IsVisible,
    ContainsText,
    UrlContains,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Click => "click",
            Operation::Fill => "fill",
            Operation::IsVisible => "is_visible",
            Operation::ContainsText => "contains_text",
            Operation::UrlContains => "url_contains",
        }
    }

    /// Operations that act on the element and therefore need it enabled.
    pub fn is_interactive(self) -> bool {
        matches!(self, Operation::Click | Operation::Fill)
    }
}

/// A literal argument carried by a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LiteralArg {
    /// Quoted literal taken verbatim from the instruction.
    Text(String),
    /// Key into the test-data map, substituted at run or emit time.
    TestData(String),
}

impl LiteralArg {
    /// Resolve against the test-data map. Missing keys yield `None`.
    pub fn resolve(&self, test_data: &HashMap<String, String>) -> Option<String> {
        match self {
            LiteralArg::Text(t) => Some(t.clone()),
            LiteralArg::TestData(key) => test_data.get(key).cloned(),
        }
    }
}

impl fmt::Display for LiteralArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralArg::Text(t) => write!(f, "\"{}\"", t),
            LiteralArg::TestData(k) => write!(f, "${{{}}}", k),
        }
    }
}

/// One node of a compiled action plan.
///
/// Prerequisites run before the step itself, in order. The tree never
/// contains a semantic type as its own ancestor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlanStep {
    pub target_type: SemanticType,
    pub operation: Operation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub literal_args: Vec<LiteralArg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<ActionPlanStep>,
}

impl ActionPlanStep {
    pub fn new(target_type: impl Into<SemanticType>, operation: Operation) -> Self {
        Self {
            target_type: target_type.into(),
            operation,
            literal_args: Vec::new(),
            qualifier: None,
            prerequisites: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: LiteralArg) -> Self {
        self.literal_args.push(arg);
        self
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    pub fn with_prerequisite(mut self, step: ActionPlanStep) -> Self {
        self.prerequisites.push(step);
        self
    }

    pub fn first_arg(&self) -> Option<&LiteralArg> {
        self.literal_args.first()
    }

    /// Number of nodes in this tree, including the root.
    pub fn node_count(&self) -> usize {
        1 + self
            .prerequisites
            .iter()
            .map(ActionPlanStep::node_count)
            .sum::<usize>()
    }

    /// Steps in execution order: each step's prerequisites, then the step.
    pub fn execution_order(&self) -> Vec<&ActionPlanStep> {
        let mut out = Vec::with_capacity(self.node_count());
        self.collect_in_order(&mut out);
        out
    }

    fn collect_in_order<'a>(&'a self, out: &mut Vec<&'a ActionPlanStep>) {
        for pre in &self.prerequisites {
            pre.collect_in_order(out);
        }
        out.push(self);
    }

    /// Short human-readable description, used in reports and logs.
    pub fn describe(&self) -> String {
        let mut s = format!("{} {}", self.operation.name(), self.target_type);
        if let Some(q) = &self.qualifier {
            s.push_str(&format!(" [{}]", q));
        }
        for arg in &self.literal_args {
            s.push_str(&format!(" {}", arg));
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_order_runs_prerequisites_first() {
        let plan = ActionPlanStep::new("login_button", Operation::Click)
            .with_prerequisite(
                ActionPlanStep::new("username_field", Operation::Fill)
                    .with_arg(LiteralArg::TestData("valid_username".into())),
            )
            .with_prerequisite(
                ActionPlanStep::new("password_field", Operation::Fill)
                    .with_arg(LiteralArg::TestData("valid_password".into())),
            );

        let order: Vec<&str> = plan
            .execution_order()
            .iter()
            .map(|s| s.target_type.as_str())
            .collect();
        assert_eq!(order, vec!["username_field", "password_field", "login_button"]);
        assert_eq!(plan.node_count(), 3);
    }

    #[test]
    fn test_literal_resolution() {
        let mut data = HashMap::new();
        data.insert("valid_username".to_string(), "Admin".to_string());
        assert_eq!(
            LiteralArg::TestData("valid_username".into()).resolve(&data),
            Some("Admin".to_string())
        );
        assert_eq!(LiteralArg::TestData("missing".into()).resolve(&data), None);
        assert_eq!(
            LiteralArg::Text("hello".into()).resolve(&data),
            Some("hello".to_string())
        );
    }

    #[test]
    fn test_describe() {
        let step = ActionPlanStep::new("navigation_item", Operation::Click).with_qualifier("Admin");
        assert_eq!(step.describe(), "click navigation_item [Admin]");
    }
}
