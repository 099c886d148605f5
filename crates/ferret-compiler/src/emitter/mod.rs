//! Textual rendering of action plans.

pub mod syntax;

use crate::compiler::CompiledInstruction;
use ferret_common::config::schema::{EmitterConfig, TargetFramework};
use ferret_common::{ActionPlanStep, LiteralArg, Operation};
use syntax::{Syntax, syntax_for};

/// Renders plans through one framework's syntax table.
///
/// Walks prerequisites first, in order. Every decision is already in the
/// plan; this only spells it.
#[derive(Debug, Clone)]
pub struct CodeEmitter {
    framework: TargetFramework,
    syntax: &'static Syntax,
    indent: String,
}

impl CodeEmitter {
    pub fn new(framework: TargetFramework, indent: usize) -> Self {
        Self {
            framework,
            syntax: syntax_for(framework),
            indent: " ".repeat(indent),
        }
    }

    pub fn from_config(config: &EmitterConfig) -> Self {
        Self::new(config.framework, config.indent)
    }

    pub fn framework(&self) -> TargetFramework {
        self.framework
    }

    /// One line per step, each indented.
    pub fn emit_plan(&self, plan: &ActionPlanStep) -> Vec<String> {
        plan.execution_order()
            .into_iter()
            .map(|step| format!("{}{}", self.indent, self.render(step)))
            .collect()
    }

    /// Comment with the source instruction, then the plan.
    pub fn emit(&self, compiled: &CompiledInstruction) -> String {
        let mut lines = vec![format!(
            "{}{} {}",
            self.indent,
            self.syntax.comment,
            compiled.instruction.trim()
        )];
        if compiled.generic_fallback {
            lines.push(format!(
                "{}{} unrecognized instruction, checking the page responds",
                self.indent, self.syntax.comment
            ));
        }
        lines.extend(self.emit_plan(&compiled.plan));
        lines.join("\n")
    }

    pub fn emit_all(&self, compiled: &[CompiledInstruction]) -> String {
        compiled
            .iter()
            .map(|c| self.emit(c))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn literal(&self, arg: &LiteralArg) -> String {
        match arg {
            LiteralArg::Text(text) => self.syntax.quoted(text),
            LiteralArg::TestData(key) => self
                .syntax
                .test_data
                .replace("{key}", &self.syntax.quoted(key)),
        }
    }

    fn render(&self, step: &ActionPlanStep) -> String {
        let s = self.syntax;
        let qualifier = step.qualifier.as_deref().map(|q| s.quoted(q));
        let value = step
            .first_arg()
            .map(|a| self.literal(a))
            .unwrap_or_else(|| s.quoted(""));

        let template = match (step.operation, qualifier.is_some()) {
            (Operation::Click, false) => s.click,
            (Operation::Click, true) => s.click_qualified,
            (Operation::Fill, _) => s.fill,
            (Operation::IsVisible, false) => s.is_visible,
            (Operation::IsVisible, true) => s.is_visible_qualified,
            (Operation::ContainsText, false) => s.contains_text,
            (Operation::ContainsText, true) => s.contains_text_qualified,
            (Operation::UrlContains, _) => s.url_contains,
        };

        substitute(
            template,
            &[
                ("{type}", step.target_type.as_str()),
                ("{q}", qualifier.as_deref().unwrap_or("")),
                ("{value}", value.as_str()),
            ],
        )
    }
}

/// Single-pass placeholder substitution; inserted text is never rescanned.
fn substitute(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;
    'scan: while !rest.is_empty() {
        for (placeholder, value) in values {
            if let Some(tail) = rest.strip_prefix(placeholder) {
                out.push_str(value);
                rest = tail;
                continue 'scan;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    out
}
