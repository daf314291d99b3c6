//! fil-codegen: FIL program -> Python text.
//!
//! Generation runs two passes over the same traversal order:
//!
//! 1. **Stubs** -- one `def NAME(p0, ..):` with a `pass` body for every
//!    instruction occurrence, nested instructions first.
//! 2. **Statements** -- one call or assignment per program line.
//!
//! Each stub is followed by a blank line and each statement by a newline.
//! Generation is atomic: on error no text is returned.

use fil_core::{FilError, ParseOptions, Program};
use serde::{Deserialize, Serialize};

pub mod emit;

pub use emit::{render_fragment, render_instruction, statement, stub_definition};

/// How pass 1 treats instructions that share a signature and arity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StubPolicy {
    /// Every instruction occurrence gets its own stub, duplicates included.
    #[default]
    PerOccurrence,
    /// Only the first occurrence of each (signature, arity) pair gets a stub.
    DedupeBySignature,
}

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub stubs: StubPolicy,
    /// Indentation of the stub body.
    pub indent: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            stubs: StubPolicy::PerOccurrence,
            indent: "\t".to_owned(),
        }
    }
}

/// Generate the Python document for an already-built program.
pub fn generate(program: &Program, options: &GenerateOptions) -> Result<String, FilError> {
    let mut out = String::new();
    let stubs = emit::emit_stubs(program, options, &mut out)?;
    let statements = emit::emit_statements(program, &mut out)?;
    tracing::debug!(stubs, statements, bytes = out.len(), "generated python");
    Ok(out)
}

/// Parse, build and generate in one step.
pub fn translate(
    source: &str,
    parse: &ParseOptions,
    options: &GenerateOptions,
) -> Result<String, FilError> {
    let program = fil_core::parse_program_with(source, parse)?;
    generate(&program, options)
}

/// Translate with default options, encoding any failure as its diagnostic
/// text. Never returns partial output.
pub fn run(source: &str) -> String {
    match translate(source, &ParseOptions::default(), &GenerateOptions::default()) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(error = %e, "translation failed");
            e.to_string()
        }
    }
}
