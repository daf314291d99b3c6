use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::FilError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal -- source text as written, plus its exact value
    Number { text: String, value: Decimal },
    /// Number immediately followed by `%` -- text excludes the suffix
    Percent { text: String, value: Decimal },
    /// All-lowercase word (may contain `-` and `_`)
    Ident(String),
    /// All-uppercase word
    Keyword(String),
    // Punctuation
    LBracket,
    RBracket,
    Colon,
    Dot,
    // End of input
    Eof,
}

impl Token {
    /// Human-readable description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Token::Number { text, .. } => format!("number '{}'", text),
            Token::Percent { text, .. } => format!("percent '{}%'", text),
            Token::Ident(w) => format!("identifier '{}'", w),
            Token::Keyword(w) => format!("keyword '{}'", w),
            Token::LBracket => "'['".to_owned(),
            Token::RBracket => "']'".to_owned(),
            Token::Colon => "':'".to_owned(),
            Token::Dot => "'.'".to_owned(),
            Token::Eof => "end of input".to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    pub line: u32,
    pub column: u32,
}

/// Cursor over the source characters that keeps line/column in step.
struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl Cursor {
    fn new(src: &str) -> Self {
        Cursor {
            chars: src.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            s.push(c);
            self.bump();
        }
        s
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_digit_char(c: char) -> bool {
    c.is_ascii_digit() || c == '_'
}

/// Exact decimal value of a numeric literal: sign kept, `+` and digit
/// separators dropped.
fn decimal_value(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .trim_start_matches('+')
        .chars()
        .filter(|c| *c != '_')
        .collect();
    Decimal::from_str(&cleaned).ok()
}

pub fn lex(src: &str) -> Result<Vec<Spanned>, FilError> {
    let mut tokens = Vec::new();
    let mut cur = Cursor::new(src);

    while let Some(c) = cur.peek() {
        if c.is_whitespace() {
            cur.bump();
            continue;
        }

        let (line, column) = (cur.line, cur.column);

        // Number or percent
        let signed = (c == '-' || c == '+') && cur.peek_at(1).is_some_and(|n| n.is_ascii_digit());
        if c.is_ascii_digit() || signed {
            let mut text = String::new();
            if signed {
                text.push(c);
                cur.bump();
            }
            text.push_str(&cur.take_while(is_digit_char));
            if cur.peek() == Some('.') && cur.peek_at(1).is_some_and(|n| n.is_ascii_digit()) {
                cur.bump();
                text.push('.');
                text.push_str(&cur.take_while(is_digit_char));
            }
            if text.ends_with('_') || text.contains("_.") {
                return Err(FilError::syntax(
                    line,
                    column,
                    format!("malformed number '{}': separator must sit between digits", text),
                ));
            }
            let value = decimal_value(&text).ok_or_else(|| {
                FilError::syntax(line, column, format!("number '{}' is out of range", text))
            })?;
            let token = if cur.peek() == Some('%') {
                cur.bump();
                Token::Percent { text, value }
            } else {
                Token::Number { text, value }
            };
            tokens.push(Spanned {
                token,
                line,
                column,
            });
            continue;
        }

        let punct = match c {
            '[' => Some(Token::LBracket),
            ']' => Some(Token::RBracket),
            ':' => Some(Token::Colon),
            '.' => Some(Token::Dot),
            _ => None,
        };
        if let Some(token) = punct {
            cur.bump();
            tokens.push(Spanned {
                token,
                line,
                column,
            });
            continue;
        }

        // Word: case decides identifier fragment versus keyword
        if c.is_ascii_alphabetic() || c == '_' {
            let word = cur.take_while(is_word_char);
            let has_upper = word.chars().any(|ch| ch.is_ascii_uppercase());
            let has_lower = word.chars().any(|ch| ch.is_ascii_lowercase());
            let token = match (has_upper, has_lower) {
                (true, true) => {
                    return Err(FilError::syntax(
                        line,
                        column,
                        format!(
                            "mixed-case word '{}': use lowercase for names, uppercase for keywords",
                            word
                        ),
                    ));
                }
                (true, false) => {
                    if !c.is_ascii_uppercase() || word.contains('-') {
                        return Err(FilError::syntax(
                            line,
                            column,
                            format!(
                                "invalid keyword '{}': keywords are uppercase letters, digits and '_'",
                                word
                            ),
                        ));
                    }
                    Token::Keyword(word)
                }
                (false, _) => Token::Ident(word),
            };
            tokens.push(Spanned {
                token,
                line,
                column,
            });
            continue;
        }

        return Err(FilError::syntax(
            line,
            column,
            format!("unexpected character {:?}", c),
        ));
    }

    tokens.push(Spanned {
        token: Token::Eof,
        line: cur.line,
        column: cur.column,
    });
    tracing::trace!(count = tokens.len(), "lexed source");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        lex(src)
            .expect("lex should succeed")
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn case_splits_identifiers_from_keywords() {
        assert_eq!(
            kinds("value FROM some-table"),
            vec![
                Token::Ident("value".into()),
                Token::Keyword("FROM".into()),
                Token::Ident("some-table".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn numbers_keep_text_and_value() {
        let toks = kinds("-1_000 +2.50 3");
        assert_eq!(
            toks[0],
            Token::Number {
                text: "-1_000".into(),
                value: dec("-1000")
            }
        );
        assert_eq!(
            toks[1],
            Token::Number {
                text: "+2.50".into(),
                value: dec("2.50")
            }
        );
        assert_eq!(
            toks[2],
            Token::Number {
                text: "3".into(),
                value: dec("3")
            }
        );
    }

    #[test]
    fn percent_requires_adjacent_suffix() {
        assert_eq!(
            kinds("42%")[0],
            Token::Percent {
                text: "42".into(),
                value: dec("42")
            }
        );
        let err = lex("42 %").unwrap_err();
        assert_eq!(err.position(), Some((1, 4)));
    }

    #[test]
    fn trailing_dot_is_a_terminator_not_a_fraction() {
        assert_eq!(
            kinds("5."),
            vec![
                Token::Number {
                    text: "5".into(),
                    value: dec("5")
                },
                Token::Dot,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let toks = lex("a: B.\n  c [D].").unwrap();
        let pos: Vec<(u32, u32)> = toks.iter().map(|t| (t.line, t.column)).collect();
        assert_eq!(
            pos,
            vec![
                (1, 1),
                (1, 2),
                (1, 4),
                (1, 5),
                (2, 3),
                (2, 5),
                (2, 6),
                (2, 7),
                (2, 8),
                (2, 9),
            ]
        );
    }

    #[test]
    fn mixed_case_word_is_rejected() {
        let err = lex("x: Foo.").unwrap_err();
        assert!(err.to_string().contains("mixed-case word 'Foo'"), "{}", err);
        assert_eq!(err.position(), Some((1, 4)));
    }

    #[test]
    fn lone_minus_is_unexpected() {
        let err = lex("a - b.").unwrap_err();
        assert_eq!(err.position(), Some((1, 3)));
        assert!(err.to_string().contains("unexpected character '-'"));
    }

    #[test]
    fn dangling_separator_is_rejected() {
        assert!(lex("1_.").is_err());
    }
}
