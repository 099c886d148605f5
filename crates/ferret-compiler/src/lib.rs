pub mod compiler;
pub mod dictionary;
pub mod emitter;
pub mod normalizer;
pub mod report;
pub mod templates;

pub use compiler::{
    BatchOutput, CompileError, CompiledInstruction, FailedInstruction, ValidationCompiler,
};
pub use emitter::CodeEmitter;
pub use report::CompilationReport;
