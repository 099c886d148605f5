//! Free-text instruction to action plan compilation.

use crate::dictionary::{self, Lookup};
use crate::normalizer::{self, literal_or_bare};
use crate::report::CompilationReport;
use crate::templates::{TemplateKind, TemplateMatch, match_instruction};
use ferret_common::config::schema::CompilerConfig;
use ferret_common::{
    ActionPlanStep, FactConflict, LiteralArg, Operation, SemanticType, UiPatternFact,
    lint_conflicts,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Cyclic prerequisite: '{semantic_type}' is its own ancestor ({chain})")]
    CyclicPrerequisite {
        semantic_type: SemanticType,
        chain: String,
    },
    #[error("Malformed instruction '{instruction}': {reason}")]
    Malformed { instruction: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledInstruction {
    pub instruction: String,
    pub plan: ActionPlanStep,
    /// Set when no template recognized the instruction.
    pub generic_fallback: bool,
    /// Names of the facts that inserted prerequisites, in insertion order.
    pub facts_applied: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FailedInstruction {
    pub index: usize,
    pub instruction: String,
    pub error: CompileError,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutput {
    pub compiled: Vec<CompiledInstruction>,
    pub failed: Vec<FailedInstruction>,
    pub report: CompilationReport,
}

pub struct ValidationCompiler {
    facts: Vec<UiPatternFact>,
    conflicts: Vec<FactConflict>,
    config: CompilerConfig,
}

impl ValidationCompiler {
    pub fn new(facts: Vec<UiPatternFact>, config: CompilerConfig) -> Self {
        let conflicts = lint_conflicts(&facts);
        for conflict in &conflicts {
            warn!(
                dependent = %conflict.dependent_type,
                kept = %conflict.kept,
                ignored = %conflict.ignored,
                "conflicting pattern facts, first declared wins"
            );
        }
        Self {
            facts,
            conflicts,
            config,
        }
    }

    /// A compiler that never consults pattern facts.
    pub fn without_facts() -> Self {
        Self::new(
            Vec::new(),
            CompilerConfig {
                apply_pattern_facts: false,
            },
        )
    }

    pub fn facts(&self) -> &[UiPatternFact] {
        &self.facts
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn conflicts(&self) -> &[FactConflict] {
        &self.conflicts
    }

    pub fn compile(&self, instruction: &str) -> Result<CompiledInstruction, CompileError> {
        let text = normalizer::normalize(instruction);
        let (plan, generic_fallback) = match match_instruction(&text) {
            Some(m) => {
                debug!(template = m.kind.name(), instruction = %text, "matched template");
                (build(&m, &text)?, false)
            }
            None => {
                warn!(instruction = %text, "no template matched, using page responsiveness check");
                (
                    ActionPlanStep::new(SemanticType::page(), Operation::UrlContains)
                        .with_arg(LiteralArg::Text(String::new())),
                    true,
                )
            }
        };

        let mut facts_applied = Vec::new();
        let plan = if self.config.apply_pattern_facts {
            self.augment(plan, &mut Vec::new(), &mut facts_applied)?
        } else {
            plan
        };

        Ok(CompiledInstruction {
            instruction: instruction.to_string(),
            plan,
            generic_fallback,
            facts_applied,
        })
    }

    /// Compile every instruction. A failing instruction is recorded and
    /// never stops the batch.
    pub fn compile_batch<I, S>(&self, instructions: I) -> BatchOutput
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut output = BatchOutput::default();
        for (index, instruction) in instructions.into_iter().enumerate() {
            let instruction = instruction.as_ref();
            output.report.total_steps += 1;
            match self.compile(instruction) {
                Ok(compiled) => {
                    if compiled.generic_fallback {
                        output.report.generic_fallback_count += 1;
                    }
                    output.report.pattern_facts_applied += compiled.facts_applied.len();
                    output.compiled.push(compiled);
                }
                Err(error) => {
                    warn!(index, instruction, "instruction failed to compile: {}", error);
                    output.report.compile_errors += 1;
                    output.failed.push(FailedInstruction {
                        index,
                        instruction: instruction.to_string(),
                        error,
                    });
                }
            }
        }
        output.report.fact_conflicts = self.conflicts.clone();

        info!(
            total = output.report.total_steps,
            fallbacks = output.report.generic_fallback_count,
            facts_applied = output.report.pattern_facts_applied,
            errors = output.report.compile_errors,
            "compiled instruction batch"
        );
        output
    }

    fn fact_for(&self, target: &SemanticType) -> Option<&UiPatternFact> {
        self.facts.iter().find(|f| &f.dependent_type == target)
    }

    /// Prepend fact-driven prerequisites to `step` and all its descendants.
    fn augment(
        &self,
        mut step: ActionPlanStep,
        ancestors: &mut Vec<SemanticType>,
        applied: &mut Vec<String>,
    ) -> Result<ActionPlanStep, CompileError> {
        if ancestors.contains(&step.target_type) {
            let chain = ancestors
                .iter()
                .chain(std::iter::once(&step.target_type))
                .map(SemanticType::as_str)
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(CompileError::CyclicPrerequisite {
                semantic_type: step.target_type,
                chain,
            });
        }
        ancestors.push(step.target_type.clone());

        let mut prerequisites = Vec::with_capacity(step.prerequisites.len() + 1);
        if let Some(fact) = self.fact_for(&step.target_type) {
            debug!(fact = %fact.name, target = %step.target_type, "inserting prerequisite");
            applied.push(fact.name.clone());
            let trigger = ActionPlanStep::new(fact.trigger.clone(), Operation::Click);
            prerequisites.push(self.augment(trigger, ancestors, applied)?);
        }
        for pre in std::mem::take(&mut step.prerequisites) {
            prerequisites.push(self.augment(pre, ancestors, applied)?);
        }
        step.prerequisites = prerequisites;

        ancestors.pop();
        Ok(step)
    }
}

fn malformed(text: &str, reason: impl Into<String>) -> CompileError {
    CompileError::Malformed {
        instruction: text.to_string(),
        reason: reason.into(),
    }
}

fn required<'t>(m: &TemplateMatch<'t>, name: &str, text: &str) -> Result<&'t str, CompileError> {
    m.get(name)
        .ok_or_else(|| malformed(text, format!("missing {}", name)))
}

fn targeted(lookup: Lookup, operation: Operation) -> ActionPlanStep {
    let step = ActionPlanStep::new(lookup.semantic_type, operation);
    match lookup.qualifier {
        Some(q) => step.with_qualifier(q),
        None => step,
    }
}

fn field(m: &TemplateMatch<'_>, text: &str) -> Result<SemanticType, CompileError> {
    let phrase = normalizer::phrase(required(m, "field", text)?);
    dictionary::field_type(&phrase)
        .ok_or_else(|| malformed(text, format!("no input field matches '{}'", phrase)))
}

fn validity_key(m: &TemplateMatch<'_>, stem: &str) -> String {
    match m.get("validity") {
        Some(v) => format!("{}_{}", v.to_lowercase(), stem),
        None => stem.to_string(),
    }
}

fn build(m: &TemplateMatch<'_>, text: &str) -> Result<ActionPlanStep, CompileError> {
    let step = match m.kind {
        TemplateKind::UrlContains => {
            ActionPlanStep::new(SemanticType::page(), Operation::UrlContains)
                .with_arg(literal_or_bare(required(m, "value", text)?))
        }
        TemplateKind::ContainsText => {
            let phrase = normalizer::phrase(required(m, "target", text)?);
            let target = dictionary::verify_target(&phrase);
            targeted(target, Operation::ContainsText)
                .with_arg(literal_or_bare(required(m, "value", text)?))
        }
        TemplateKind::EnterValue => {
            let value = literal_or_bare(required(m, "value", text)?);
            if matches!(&value, LiteralArg::Text(t) if t.is_empty()) {
                return Err(malformed(text, "empty value"));
            }
            ActionPlanStep::new(field(m, text)?, Operation::Fill).with_arg(value)
        }
        TemplateKind::EnterTestData => {
            let field = field(m, text)?;
            let key = validity_key(m, dictionary::field_key(&field));
            ActionPlanStep::new(field, Operation::Fill).with_arg(LiteralArg::TestData(key))
        }
        TemplateKind::LoginWithCredentials => ActionPlanStep::new("login_button", Operation::Click)
            .with_prerequisite(
                ActionPlanStep::new("username_field", Operation::Fill)
                    .with_arg(LiteralArg::TestData(validity_key(m, "username"))),
            )
            .with_prerequisite(
                ActionPlanStep::new("password_field", Operation::Fill)
                    .with_arg(LiteralArg::TestData(validity_key(m, "password"))),
            ),
        TemplateKind::VerifyDisplayed
        | TemplateKind::VerifyAvailable
        | TemplateKind::VerifyPresent => {
            let phrase = normalizer::phrase(required(m, "target", text)?);
            let target = dictionary::verify_target(&phrase);
            targeted(target, Operation::IsVisible)
        }
        TemplateKind::Logout => ActionPlanStep::new("logout_button", Operation::Click),
        TemplateKind::Click => {
            let phrase = normalizer::phrase(required(m, "target", text)?);
            let target = dictionary::click_target(&phrase);
            targeted(target, Operation::Click)
        }
    };
    Ok(step)
}
