//! Concrete parse tree. One node per grammar production that survives
//! parsing; punctuation is dropped once it has been matched.

use rust_decimal::Decimal;
use serde::Serialize;

/// Source position of the first token of a node (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum ParseNode {
    Number {
        text: String,
        value: Decimal,
        pos: Pos,
    },
    Percent {
        text: String,
        value: Decimal,
        pos: Pos,
    },
    /// Greedy run of identifier fragments, unjoined.
    Ident { fragments: Vec<String>, pos: Pos },
    Keyword { text: String, pos: Pos },
    /// `fragment+`; bracketed instructions appear as nested `Instr` children.
    Instr { children: Vec<ParseNode>, pos: Pos },
    /// `identifier ":" instruction`
    Assign {
        target: Box<ParseNode>,
        source: Box<ParseNode>,
        pos: Pos,
    },
}

impl ParseNode {
    pub fn pos(&self) -> Pos {
        match self {
            ParseNode::Number { pos, .. }
            | ParseNode::Percent { pos, .. }
            | ParseNode::Ident { pos, .. }
            | ParseNode::Keyword { pos, .. }
            | ParseNode::Instr { pos, .. }
            | ParseNode::Assign { pos, .. } => *pos,
        }
    }

    /// Short name of the production, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseNode::Number { .. } => "number",
            ParseNode::Percent { .. } => "percent",
            ParseNode::Ident { .. } => "identifier",
            ParseNode::Keyword { .. } => "keyword",
            ParseNode::Instr { .. } => "instruction",
            ParseNode::Assign { .. } => "assignment",
        }
    }
}

/// The whole parsed input: one node per terminated line, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseTree {
    pub lines: Vec<ParseNode>,
}
