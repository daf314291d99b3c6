//! Typed FIL program.
//!
//! Produced by the AST builder from the parse tree and consumed by the code
//! generator. All nodes are immutable once built; derived fields are
//! computed in the constructors.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::FilError;

// ──────────────────────────────────────────────
// Literals
// ──────────────────────────────────────────────

/// A number exactly as written (`-1_000`, `2.5`) with its value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberLiteral {
    pub text: String,
    pub value: Decimal,
}

/// A percent literal. `text` carries the trailing `%`; `value` is the
/// number before it (`42%` has value 42).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentLiteral {
    pub text: String,
    pub value: Decimal,
}

impl PercentLiteral {
    pub fn new(number_text: &str, value: Decimal) -> Self {
        PercentLiteral {
            text: format!("{}%", number_text),
            value,
        }
    }
}

// ──────────────────────────────────────────────
// Names
// ──────────────────────────────────────────────

/// A variable name merged from consecutive lowercase words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultipartIdentifier {
    parts: Vec<String>,
    name: String,
}

impl MultipartIdentifier {
    /// Fails when `parts` is empty.
    pub fn new(parts: Vec<String>) -> Result<Self, FilError> {
        if parts.is_empty() {
            return Err(FilError::unsupported("identifier with no fragments"));
        }
        let name = parts.join("_");
        Ok(MultipartIdentifier { parts, name })
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Canonical name: parts joined with `_`.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Structural marker inside an instruction. Never a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyword {
    pub text: String,
}

// ──────────────────────────────────────────────
// Instructions
// ──────────────────────────────────────────────

/// One direct child of an instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fragment {
    Number(NumberLiteral),
    Percent(PercentLiteral),
    Identifier(MultipartIdentifier),
    Keyword(Keyword),
    Instruction(Instruction),
}

impl Fragment {
    pub fn is_keyword(&self) -> bool {
        matches!(self, Fragment::Keyword(_))
    }
}

/// An ordered, non-empty fragment sequence.
///
/// `signature_name` joins the direct-child keywords with `_`; parameters are
/// the direct children that are not keywords, in order. Keywords inside a
/// nested instruction belong to that instruction only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instruction {
    signature_name: String,
    fragments: Vec<Fragment>,
    #[serde(skip)]
    parameter_slots: Vec<usize>,
}

impl Instruction {
    /// Fails when `fragments` is empty.
    pub fn new(fragments: Vec<Fragment>) -> Result<Self, FilError> {
        if fragments.is_empty() {
            return Err(FilError::unsupported("instruction with no fragments"));
        }
        let keywords: Vec<&str> = fragments
            .iter()
            .filter_map(|f| match f {
                Fragment::Keyword(k) => Some(k.text.as_str()),
                _ => None,
            })
            .collect();
        let signature_name = keywords.join("_");
        let parameter_slots = fragments
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_keyword())
            .map(|(i, _)| i)
            .collect();
        Ok(Instruction {
            signature_name,
            fragments,
            parameter_slots,
        })
    }

    pub fn signature_name(&self) -> &str {
        &self.signature_name
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Non-keyword direct children, left to right.
    pub fn parameters(&self) -> impl ExactSizeIterator<Item = &Fragment> + '_ {
        self.parameter_slots.iter().map(|&i| &self.fragments[i])
    }

    pub fn arity(&self) -> usize {
        self.parameter_slots.len()
    }

    /// The lone fragment of a keyword-free, single-fragment instruction
    /// (`42%.`): such an instruction is a plain value, not a call.
    pub fn as_bare_value(&self) -> Option<&Fragment> {
        match self.fragments.as_slice() {
            [only] if !only.is_keyword() => Some(only),
            _ => None,
        }
    }
}

// ──────────────────────────────────────────────
// Lines
// ──────────────────────────────────────────────

/// `target : source .`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub target: MultipartIdentifier,
    pub source: Instruction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Line {
    Instruction(Instruction),
    Assignment(Assignment),
}

impl Line {
    /// The instruction this line evaluates.
    pub fn instruction(&self) -> &Instruction {
        match self {
            Line::Instruction(i) => i,
            Line::Assignment(a) => &a.source,
        }
    }
}

/// Lines in parse order, which is also emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    pub lines: Vec<Line>,
}
