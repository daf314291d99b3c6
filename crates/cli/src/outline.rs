//! Indented text rendering of a typed program for `fil parse`.

use std::fmt::Write;

use fil_core::{Fragment, Instruction, Line, Program};

pub(crate) fn render(program: &Program) -> String {
    let mut out = String::new();
    for line in &program.lines {
        match line {
            Line::Instruction(instr) => write_instruction(&mut out, instr, 0),
            Line::Assignment(a) => {
                let _ = writeln!(out, "assignment {}", a.target.name());
                write_instruction(&mut out, &a.source, 1);
            }
        }
    }
    out
}

fn write_instruction(out: &mut String, instr: &Instruction, depth: usize) {
    let pad = "  ".repeat(depth);
    let name = if instr.signature_name().is_empty() {
        "<no keyword>"
    } else {
        instr.signature_name()
    };
    let _ = writeln!(out, "{}instruction {} ({} params)", pad, name, instr.arity());
    for fragment in instr.fragments() {
        let pad = "  ".repeat(depth + 1);
        match fragment {
            Fragment::Number(n) => {
                let _ = writeln!(out, "{}number {}", pad, n.text);
            }
            Fragment::Percent(p) => {
                let _ = writeln!(out, "{}percent {} = {}", pad, p.text, p.value);
            }
            Fragment::Identifier(i) => {
                let _ = writeln!(out, "{}identifier {}", pad, i.name());
            }
            Fragment::Keyword(k) => {
                let _ = writeln!(out, "{}keyword {}", pad, k.text);
            }
            Fragment::Instruction(inner) => write_instruction(out, inner, depth + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_shows_nesting_and_keywords() {
        let program = fil_core::parse_program("z: a FROM [INNER b] 5%.").unwrap();
        assert_eq!(
            render(&program),
            "assignment z
  instruction FROM (3 params)
    identifier a
    keyword FROM
    instruction INNER (1 params)
      identifier b
    percent 5% = 5
"
        );
    }
}
