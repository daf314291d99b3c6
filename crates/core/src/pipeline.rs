//! Front end: FIL source text -> typed program.
//!
//! Thin orchestrator over the lexer, parser and AST builder.

use crate::ast::Program;
use crate::build;
use crate::error::FilError;
use crate::lexer;
use crate::parser::{self, ParseOptions};

/// Parse `source` with default options.
pub fn parse_program(source: &str) -> Result<Program, FilError> {
    parse_program_with(source, &ParseOptions::default())
}

/// Parse `source` and build the typed program, or return the first error.
pub fn parse_program_with(source: &str, options: &ParseOptions) -> Result<Program, FilError> {
    let tokens = lexer::lex(source)?;
    let tree = parser::parse(&tokens, options)?;
    build::build_program(&tree)
}
