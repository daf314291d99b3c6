//! AST builder: reduces the parse tree to the typed program, bottom-up.

use crate::ast::{
    Assignment, Fragment, Instruction, Keyword, Line, MultipartIdentifier, NumberLiteral,
    PercentLiteral, Program,
};
use crate::error::FilError;
use crate::parser::{ParseNode, ParseTree};

pub fn build_program(tree: &ParseTree) -> Result<Program, FilError> {
    let lines = tree
        .lines
        .iter()
        .map(build_line)
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(lines = lines.len(), "built program");
    Ok(Program { lines })
}

fn build_line(node: &ParseNode) -> Result<Line, FilError> {
    match node {
        ParseNode::Instr { .. } => Ok(Line::Instruction(build_instruction(node)?)),
        ParseNode::Assign { target, source, .. } => Ok(Line::Assignment(Assignment {
            target: build_identifier(target)?,
            source: build_instruction(source)?,
        })),
        other => Err(misplaced(other, "a line")),
    }
}

fn build_instruction(node: &ParseNode) -> Result<Instruction, FilError> {
    match node {
        ParseNode::Instr { children, .. } => {
            let fragments = children
                .iter()
                .map(build_fragment)
                .collect::<Result<Vec<_>, _>>()?;
            Instruction::new(fragments)
        }
        other => Err(misplaced(other, "an instruction")),
    }
}

fn build_identifier(node: &ParseNode) -> Result<MultipartIdentifier, FilError> {
    match node {
        ParseNode::Ident { fragments, .. } => MultipartIdentifier::new(fragments.clone()),
        other => Err(misplaced(other, "an identifier")),
    }
}

fn build_fragment(node: &ParseNode) -> Result<Fragment, FilError> {
    Ok(match node {
        ParseNode::Number { text, value, .. } => Fragment::Number(NumberLiteral {
            text: text.clone(),
            value: *value,
        }),
        ParseNode::Percent { text, value, .. } => {
            Fragment::Percent(PercentLiteral::new(text, *value))
        }
        ParseNode::Ident { .. } => Fragment::Identifier(build_identifier(node)?),
        ParseNode::Keyword { text, .. } => Fragment::Keyword(Keyword { text: text.clone() }),
        ParseNode::Instr { .. } => Fragment::Instruction(build_instruction(node)?),
        ParseNode::Assign { .. } => return Err(misplaced(node, "a fragment")),
    })
}

fn misplaced(node: &ParseNode, expected: &str) -> FilError {
    let pos = node.pos();
    FilError::unsupported(format!(
        "{} at line {}, column {} where {} was expected",
        node.kind(),
        pos.line,
        pos.column,
        expected
    ))
}
