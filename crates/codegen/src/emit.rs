//! The two emission passes and expression rendering.
//!
//! Both passes walk the program in the same order: lines in program order,
//! then each instruction's parameters left to right, depth first.

use std::collections::HashSet;

use fil_core::{Fragment, FilError, Instruction, Line, Program};

use crate::{GenerateOptions, StubPolicy};

/// Pass 1: one stub per instruction occurrence, nested stubs before the
/// stub of the instruction containing them. Returns the number emitted.
pub(crate) fn emit_stubs(
    program: &Program,
    options: &GenerateOptions,
    out: &mut String,
) -> Result<usize, FilError> {
    let mut pass = StubPass {
        options,
        seen: HashSet::new(),
        emitted: 0,
        out,
    };
    for line in &program.lines {
        pass.visit(line.instruction())?;
    }
    Ok(pass.emitted)
}

struct StubPass<'a> {
    options: &'a GenerateOptions,
    /// (signature, arity) pairs already emitted; only consulted when
    /// deduplicating.
    seen: HashSet<(String, usize)>,
    emitted: usize,
    out: &'a mut String,
}

impl StubPass<'_> {
    fn visit(&mut self, instr: &Instruction) -> Result<(), FilError> {
        for param in instr.parameters() {
            match param {
                Fragment::Instruction(inner) => self.visit(inner)?,
                Fragment::Number(_) | Fragment::Percent(_) | Fragment::Identifier(_) => {}
                Fragment::Keyword(k) => return Err(keyword_as_value(&k.text)),
            }
        }
        if instr.as_bare_value().is_some() {
            return Ok(());
        }
        if self.options.stubs == StubPolicy::DedupeBySignature
            && !self
                .seen
                .insert((instr.signature_name().to_owned(), instr.arity()))
        {
            return Ok(());
        }
        self.out.push_str(&stub_definition(instr, &self.options.indent));
        self.out.push_str("\n\n");
        self.emitted += 1;
        Ok(())
    }
}

/// `def NAME(p0, p1):` followed by an indented `pass`.
pub fn stub_definition(instr: &Instruction, indent: &str) -> String {
    let params: Vec<String> = (0..instr.arity()).map(|i| format!("p{}", i)).collect();
    format!(
        "def {}({}):\n{}pass",
        instr.signature_name(),
        params.join(", "),
        indent
    )
}

/// Pass 2: one statement per top-level line. Returns the number emitted.
pub(crate) fn emit_statements(program: &Program, out: &mut String) -> Result<usize, FilError> {
    for line in &program.lines {
        out.push_str(&statement(line)?);
        out.push('\n');
    }
    Ok(program.lines.len())
}

pub fn statement(line: &Line) -> Result<String, FilError> {
    match line {
        Line::Instruction(instr) => render_instruction(instr),
        Line::Assignment(a) => Ok(format!(
            "{} = {}",
            a.target.name(),
            render_instruction(&a.source)?
        )),
    }
}

/// A call expression, or the lone value of a bare-value instruction.
pub fn render_instruction(instr: &Instruction) -> Result<String, FilError> {
    if let Some(value) = instr.as_bare_value() {
        return render_fragment(value);
    }
    let args = instr
        .parameters()
        .map(render_fragment)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("{}({})", instr.signature_name(), args.join(", ")))
}

/// Render a fragment in value position.
pub fn render_fragment(fragment: &Fragment) -> Result<String, FilError> {
    match fragment {
        Fragment::Number(n) => Ok(n.text.clone()),
        Fragment::Percent(p) => Ok(p.text.clone()),
        Fragment::Identifier(i) => Ok(i.name().to_owned()),
        Fragment::Instruction(i) => render_instruction(i),
        Fragment::Keyword(k) => Err(keyword_as_value(&k.text)),
    }
}

fn keyword_as_value(text: &str) -> FilError {
    FilError::unsupported(format!("keyword '{}' used as a value", text))
}
