#![allow(clippy::result_large_err)]
//! fil-core: FIL front end.
//!
//! Turns FIL source text into a typed [`Program`]: lexer, recursive-descent
//! parser producing a [`ParseTree`], and the AST builder that reduces it.
//!
//! # Public API
//!
//! - [`parse_program()`] / [`parse_program_with()`] -- the whole front end
//! - [`FilError`] -- the single error type (syntax or unsupported construct)
//! - AST types: [`Program`], [`Line`], [`Assignment`], [`Instruction`],
//!   [`Fragment`], [`MultipartIdentifier`], [`NumberLiteral`],
//!   [`PercentLiteral`], [`Keyword`]

/// FIL language version accepted by this front end.
pub const FIL_VERSION: &str = "0.1a";

pub mod ast;
pub mod build;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod pipeline;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{
    Assignment, Fragment, Instruction, Keyword, Line, MultipartIdentifier, NumberLiteral,
    PercentLiteral, Program,
};
pub use error::FilError;
pub use parser::{ParseOptions, ParseTree, DEFAULT_MAX_DEPTH};

// ── Convenience re-exports: pipeline entry points ────────────────────

pub use build::build_program;
pub use pipeline::{parse_program, parse_program_with};
