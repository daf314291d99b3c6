//! Recursive-descent parser for FIL.
//!
//! ```text
//! fragment     := Number | Percent | identifier | Keyword | "[" instruction "]"
//! identifier   := identFragment+
//! instruction  := fragment+
//! assignment   := identifier ":" instruction
//! lineBody     := instruction | assignment
//! line         := lineBody "."
//! program      := line+
//! ```
//!
//! Every alternative is chosen by the class of its leading token, so the
//! parser never backtracks. The first error aborts the whole parse.
use crate::error::FilError;
use crate::lexer::{Spanned, Token};

mod tree;

pub use tree::{ParseNode, ParseTree, Pos};

/// Default ceiling on `[...]` nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest bracket nesting accepted before the parse is rejected.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned], options: &ParseOptions) -> Self {
        Parser {
            tokens,
            pos: 0,
            max_depth: options.max_depth,
        }
    }

    fn cur(&self) -> &Spanned {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.cur().token
    }

    fn cur_pos(&self) -> Pos {
        let s = self.cur();
        Pos {
            line: s.line,
            column: s.column,
        }
    }

    fn advance(&mut self) -> &Spanned {
        let t = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn err(&self, msg: impl Into<String>) -> FilError {
        let p = self.cur_pos();
        FilError::syntax(p.line, p.column, msg)
    }

    fn expect(&mut self, expected: Token, label: &str) -> Result<(), FilError> {
        if self.peek() == &expected {
            self.advance();
            Ok(())
        } else {
            Err(self.err(format!(
                "expected {}, found {}",
                label,
                self.peek().describe()
            )))
        }
    }

    fn starts_fragment(&self) -> bool {
        matches!(
            self.peek(),
            Token::Number { .. }
                | Token::Percent { .. }
                | Token::Ident(_)
                | Token::Keyword(_)
                | Token::LBracket
        )
    }

    fn parse_program(&mut self) -> Result<ParseTree, FilError> {
        let mut lines = Vec::new();
        while self.peek() != &Token::Eof {
            let body = self.parse_line_body()?;
            self.expect(Token::Dot, "'.' to end the line")?;
            tracing::trace!(line = body.pos().line, kind = body.kind(), "parsed line");
            lines.push(body);
        }
        Ok(ParseTree { lines })
    }

    /// `lineBody`: an identifier run followed by `:` makes an assignment,
    /// anything else is an instruction. The identifier run is parsed once
    /// and reused as the instruction's first fragment when no `:` follows.
    fn parse_line_body(&mut self) -> Result<ParseNode, FilError> {
        let start = self.cur_pos();
        if !matches!(self.peek(), Token::Ident(_)) {
            return self.parse_instruction(0, Vec::new());
        }

        let ident = self.parse_identifier();
        if self.peek() == &Token::Colon {
            self.advance();
            let source = self.parse_instruction(0, Vec::new())?;
            return Ok(ParseNode::Assign {
                target: Box::new(ident),
                source: Box::new(source),
                pos: start,
            });
        }
        self.parse_instruction(0, vec![ident])
    }

    /// `instruction := fragment+`, with `seed` holding fragments the caller
    /// already consumed.
    fn parse_instruction(
        &mut self,
        depth: usize,
        seed: Vec<ParseNode>,
    ) -> Result<ParseNode, FilError> {
        let pos = seed.first().map(ParseNode::pos).unwrap_or(self.cur_pos());
        let mut children = seed;
        while self.starts_fragment() {
            children.push(self.parse_fragment(depth)?);
        }
        if children.is_empty() {
            return Err(self.err(format!(
                "expected an instruction, found {}",
                self.peek().describe()
            )));
        }
        Ok(ParseNode::Instr { children, pos })
    }

    fn parse_fragment(&mut self, depth: usize) -> Result<ParseNode, FilError> {
        let pos = self.cur_pos();
        match self.peek().clone() {
            Token::Number { text, value } => {
                self.advance();
                Ok(ParseNode::Number { text, value, pos })
            }
            Token::Percent { text, value } => {
                self.advance();
                Ok(ParseNode::Percent { text, value, pos })
            }
            Token::Ident(_) => Ok(self.parse_identifier()),
            Token::Keyword(text) => {
                self.advance();
                Ok(ParseNode::Keyword { text, pos })
            }
            Token::LBracket => {
                if depth >= self.max_depth {
                    return Err(self.err(format!(
                        "brackets nested deeper than {} levels",
                        self.max_depth
                    )));
                }
                self.advance();
                let inner = self.parse_instruction(depth + 1, Vec::new())?;
                self.expect(Token::RBracket, "']' to close the bracket")?;
                Ok(inner)
            }
            other => Err(self.err(format!("expected a fragment, found {}", other.describe()))),
        }
    }

    /// `identifier := identFragment+` -- greedy, so adjacent lowercase words
    /// always land in the same node. Caller guarantees one `Ident` is next.
    fn parse_identifier(&mut self) -> ParseNode {
        let pos = self.cur_pos();
        let mut fragments = Vec::new();
        while let Token::Ident(w) = self.peek() {
            fragments.push(w.clone());
            self.advance();
        }
        ParseNode::Ident { fragments, pos }
    }
}

pub fn parse(tokens: &[Spanned], options: &ParseOptions) -> Result<ParseTree, FilError> {
    let mut p = Parser::new(tokens, options);
    let tree = p.parse_program()?;
    tracing::debug!(lines = tree.lines.len(), "parsed program");
    Ok(tree)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer;

    fn parse_src(src: &str) -> Result<ParseTree, FilError> {
        let tokens = lexer::lex(src)?;
        parse(&tokens, &ParseOptions::default())
    }

    fn ident(node: &ParseNode) -> Vec<String> {
        match node {
            ParseNode::Ident { fragments, .. } => fragments.clone(),
            other => panic!("expected identifier, got {:?}", other),
        }
    }

    #[test]
    fn assignment_splits_target_and_source() {
        let tree = parse_src("first part: value OF x.").unwrap();
        assert_eq!(tree.lines.len(), 1);
        match &tree.lines[0] {
            ParseNode::Assign { target, source, .. } => {
                assert_eq!(ident(target), vec!["first", "part"]);
                match source.as_ref() {
                    ParseNode::Instr { children, .. } => assert_eq!(children.len(), 3),
                    other => panic!("expected instruction, got {:?}", other),
                }
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn leading_identifier_without_colon_starts_an_instruction() {
        let tree = parse_src("some table FROM x.").unwrap();
        match &tree.lines[0] {
            ParseNode::Instr { children, .. } => {
                assert_eq!(ident(&children[0]), vec!["some", "table"]);
                assert!(matches!(&children[1], ParseNode::Keyword { text, .. } if text == "FROM"));
                assert_eq!(ident(&children[2]), vec!["x"]);
            }
            other => panic!("expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn keyword_terminates_identifier_run() {
        let tree = parse_src("a b OF c d.").unwrap();
        match &tree.lines[0] {
            ParseNode::Instr { children, .. } => {
                assert_eq!(children.len(), 3);
                assert_eq!(ident(&children[0]), vec!["a", "b"]);
                assert_eq!(ident(&children[2]), vec!["c", "d"]);
            }
            other => panic!("expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn brackets_nest_as_single_children() {
        let tree = parse_src("FROM [INNER [DEEP x] OF y] z.").unwrap();
        let ParseNode::Instr { children, .. } = &tree.lines[0] else {
            panic!("expected instruction");
        };
        assert_eq!(children.len(), 3);
        let ParseNode::Instr { children: inner, .. } = &children[1] else {
            panic!("expected nested instruction");
        };
        assert_eq!(inner.len(), 4);
        assert!(matches!(&inner[1], ParseNode::Instr { .. }));
    }

    #[test]
    fn missing_terminator_reports_end_of_input() {
        let err = parse_src("x: FOO").unwrap_err();
        assert_eq!(
            err.to_string(),
            "syntax error at line 1, column 7: expected '.' to end the line, found end of input"
        );
    }

    #[test]
    fn colon_inside_instruction_is_rejected() {
        let err = parse_src("FOO a: b.").unwrap_err();
        assert_eq!(err.position(), Some((1, 6)));
    }

    #[test]
    fn empty_brackets_are_rejected() {
        let err = parse_src("FOO [].").unwrap_err();
        assert_eq!(err.position(), Some((1, 6)));
        assert!(err.to_string().contains("expected an instruction, found ']'"));
    }

    #[test]
    fn unclosed_bracket_is_rejected() {
        let err = parse_src("FOO [BAR x.").unwrap_err();
        assert!(err.to_string().contains("expected ']' to close the bracket, found '.'"));
    }

    #[test]
    fn assignment_without_source_is_rejected() {
        let err = parse_src("x: .").unwrap_err();
        assert_eq!(err.position(), Some((1, 4)));
    }

    #[test]
    fn empty_input_is_an_empty_program() {
        let tree = parse_src("  \n\t ").unwrap();
        assert!(tree.lines.is_empty());
    }

    #[test]
    fn nesting_ceiling_stops_runaway_brackets() {
        let deep = format!("{}X{}.", "[".repeat(10), "]".repeat(10));
        let tokens = lexer::lex(&deep).unwrap();
        assert!(parse(&tokens, &ParseOptions { max_depth: 10 }).is_ok());
        let err = parse(&tokens, &ParseOptions { max_depth: 9 }).unwrap_err();
        assert_eq!(err.position(), Some((1, 10)));
        assert!(err.to_string().contains("nested deeper than 9 levels"));
    }

    #[test]
    fn stray_closing_bracket_is_rejected() {
        let err = parse_src("FOO ].").unwrap_err();
        assert_eq!(err.position(), Some((1, 5)));
    }
}
