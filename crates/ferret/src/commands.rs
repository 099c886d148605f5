use anyhow::{Context, Result, bail};
use ferret_common::config::schema::{FerretConfig, TargetFramework};
use ferret_common::{Inventory, UiPatternFact};
use ferret_compiler::{CodeEmitter, ValidationCompiler};
use ferret_engine::discovery::CandidateDiscovery;
use ferret_engine::patterns::PatternDetector;
use ferret_engine::registry::RegistryLoader;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Instruction files are either a bare list or `{ instructions: [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstructionFile {
    List(Vec<String>),
    Named { instructions: Vec<String> },
}

impl InstructionFile {
    fn into_instructions(self) -> Vec<String> {
        match self {
            InstructionFile::List(list) => list,
            InstructionFile::Named { instructions } => instructions,
        }
    }
}

pub struct CompileOptions {
    pub instructions: PathBuf,
    pub inventory: Option<PathBuf>,
    pub framework: Option<String>,
    pub report: Option<PathBuf>,
    pub no_facts: bool,
}

async fn read_inventory(path: &Path) -> Result<Inventory> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading inventory {}", path.display()))?;
    let inventory: Inventory = serde_json::from_str(&content)
        .with_context(|| format!("parsing inventory {}", path.display()))?;
    info!(elements = inventory.len(), "loaded inventory");
    Ok(inventory)
}

async fn read_instructions(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading instructions {}", path.display()))?;
    let file: InstructionFile = serde_yaml::from_str(&content)
        .with_context(|| format!("parsing instructions {}", path.display()))?;
    Ok(file.into_instructions())
}

pub async fn compile(config: &FerretConfig, options: CompileOptions) -> Result<()> {
    let instructions = read_instructions(&options.instructions).await?;

    let facts: Vec<UiPatternFact> = match &options.inventory {
        Some(path) => PatternDetector::new().detect(&read_inventory(path).await?),
        None => Vec::new(),
    };

    let mut compiler_config = config.compiler.clone();
    if options.no_facts {
        compiler_config.apply_pattern_facts = false;
    }
    let compiler = ValidationCompiler::new(facts, compiler_config);

    let mut emitter_config = config.emitter.clone();
    if let Some(name) = &options.framework {
        match TargetFramework::parse(name) {
            Some(framework) => emitter_config.framework = framework,
            None => bail!("unknown framework '{}'", name),
        }
    }
    let emitter = CodeEmitter::from_config(&emitter_config);

    let output = compiler.compile_batch(&instructions);
    for failed in &output.failed {
        warn!(line = failed.index + 1, "{}", failed.error);
    }
    println!("{}", emitter.emit_all(&output.compiled));

    let report = serde_json::to_string_pretty(&output.report)?;
    match &options.report {
        Some(path) => tokio::fs::write(path, report)
            .await
            .with_context(|| format!("writing report {}", path.display()))?,
        None => eprintln!("{}", report),
    }
    Ok(())
}

pub async fn detect(inventory: &Path, proposals: bool) -> Result<()> {
    let inventory = read_inventory(inventory).await?;
    let facts = PatternDetector::new().detect(&inventory);
    let mut out = serde_json::json!({ "facts": facts });
    if proposals {
        let proposed: Vec<_> = CandidateDiscovery::new()
            .propose(&inventory)
            .into_iter()
            .map(|p| {
                serde_json::json!({
                    "semanticType": p.semantic_type,
                    "expression": p.expression,
                    "path": p.path,
                })
            })
            .collect();
        out["proposals"] = serde_json::Value::from(proposed);
    }
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

pub async fn registry(
    config: &FerretConfig,
    file: Option<&Path>,
    lookup: Option<&str>,
) -> Result<()> {
    let path = file.or(config.registry.path.as_deref());
    let registry = RegistryLoader::load_layered(config.registry.use_builtin, path)
        .await
        .context("loading selector registry")?;

    match lookup {
        Some(name) => {
            for (i, candidate) in registry.lookup(&name.into())?.iter().enumerate() {
                println!("{:>3}. [{:?}] {}", i + 1, candidate.tier(), candidate);
            }
        }
        None => {
            for ty in registry.types() {
                println!("{:<24} {}", ty.as_str(), registry.candidate_count(ty));
            }
            println!(
                "{} types, version {}",
                registry.len(),
                registry.version()
            );
        }
    }
    Ok(())
}
