//! Byte-position scanner for filter expressions.

use super::span::Span;
use super::token::{Token, TokenKind};
use crate::ast::Operator;
use crate::error::FilterError;

fn is_stop_char(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | ';' | '<' | '>' | '=' | '!' | '\'' | '"')
}

/// Hand-rolled recursive-descent-friendly scanner: `peek`/`advance` over byte
/// offsets into the original `&str`, producing one `Token` per call to
/// `next_token`.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn scan_word(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_stop_char(c) {
                break;
            }
            self.advance();
        }
        let span = Span::new(start, self.pos);
        Token::new(TokenKind::Word(self.input[start..self.pos].to_string()), span)
    }

    fn scan_quoted(&mut self, quote: char) -> Result<Token, FilterError> {
        let start = self.pos;
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.advance() {
                None => {
                    return Err(FilterError::InvalidSyntax {
                        message: "unterminated quoted string".to_string(),
                        offset: start,
                    });
                }
                Some(c) if c == quote => {
                    if self.peek() == Some(quote) {
                        value.push(quote);
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(c) => value.push(c),
            }
        }
        let span = Span::new(start, self.pos);
        Ok(Token::new(TokenKind::QuotedString(value), span))
    }

    /// Produces the next token, or `TokenKind::Eof` once the input is
    /// exhausted. `Eof` is returned repeatedly; it never errors.
    pub fn next_token(&mut self) -> Result<Token, FilterError> {
        self.skip_whitespace();
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, Span::new(start, start)));
        };
        match c {
            ',' => {
                self.advance();
                Ok(Token::new(TokenKind::Comma, Span::new(start, self.pos)))
            }
            ';' => {
                self.advance();
                Ok(Token::new(TokenKind::Semicolon, Span::new(start, self.pos)))
            }
            '\'' | '"' => self.scan_quoted(c),
            '<' => {
                self.advance();
                let op = if self.peek() == Some('=') {
                    self.advance();
                    Operator::Le
                } else {
                    Operator::Lt
                };
                Ok(Token::new(TokenKind::Op(op), Span::new(start, self.pos)))
            }
            '>' => {
                self.advance();
                let op = if self.peek() == Some('=') {
                    self.advance();
                    Operator::Ge
                } else {
                    Operator::Gt
                };
                Ok(Token::new(TokenKind::Op(op), Span::new(start, self.pos)))
            }
            '!' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::new(TokenKind::Op(Operator::Ne), Span::new(start, self.pos)))
                } else {
                    Err(FilterError::InvalidSyntax {
                        message: "expected '=' after '!'".to_string(),
                        offset: start,
                    })
                }
            }
            '=' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                }
                Ok(Token::new(TokenKind::Op(Operator::Eq), Span::new(start, self.pos)))
            }
            _ => Ok(self.scan_word()),
        }
    }

    /// Collects every token up to and including the trailing `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, FilterError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_simple_condition() {
        assert_eq!(
            kinds("name=test"),
            vec![
                TokenKind::Word("name".to_string()),
                TokenKind::Op(Operator::Eq),
                TokenKind::Word("test".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("< <= > >= = == !="),
            vec![
                TokenKind::Op(Operator::Lt),
                TokenKind::Op(Operator::Le),
                TokenKind::Op(Operator::Gt),
                TokenKind::Op(Operator::Ge),
                TokenKind::Op(Operator::Eq),
                TokenKind::Op(Operator::Eq),
                TokenKind::Op(Operator::Ne),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_connectives() {
        assert_eq!(
            kinds("a=1,b=2;c=3"),
            vec![
                TokenKind::Word("a".to_string()),
                TokenKind::Op(Operator::Eq),
                TokenKind::Word("1".to_string()),
                TokenKind::Comma,
                TokenKind::Word("b".to_string()),
                TokenKind::Op(Operator::Eq),
                TokenKind::Word("2".to_string()),
                TokenKind::Semicolon,
                TokenKind::Word("c".to_string()),
                TokenKind::Op(Operator::Eq),
                TokenKind::Word("3".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_string_with_escaped_quote() {
        assert_eq!(
            kinds("name='O''Brien'"),
            vec![
                TokenKind::Word("name".to_string()),
                TokenKind::Op(Operator::Eq),
                TokenKind::QuotedString("O'Brien".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_wildcard_and_path_chars_stay_in_word() {
        assert_eq!(
            kinds("name=test*,path=/a/b-c.txt"),
            vec![
                TokenKind::Word("name".to_string()),
                TokenKind::Op(Operator::Eq),
                TokenKind::Word("test*".to_string()),
                TokenKind::Comma,
                TokenKind::Word("path".to_string()),
                TokenKind::Op(Operator::Eq),
                TokenKind::Word("/a/b-c.txt".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_input_sanitisation_whitespace() {
        assert_eq!(
            kinds("  name  =  test  "),
            vec![
                TokenKind::Word("name".to_string()),
                TokenKind::Op(Operator::Eq),
                TokenKind::Word("test".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string_errors() {
        let err = Lexer::new("name='oops").tokenize().unwrap_err();
        assert!(matches!(err, FilterError::InvalidSyntax { .. }));
    }

    #[test]
    fn test_bang_without_equals_errors() {
        let err = Lexer::new("name!test").tokenize().unwrap_err();
        assert!(matches!(err, FilterError::InvalidSyntax { .. }));
    }

    #[test]
    fn test_span_tracking() {
        let tokens = Lexer::new("ab=1").tokenize().unwrap();
        assert_eq!(tokens[0].span, Span::new(0, 2));
        assert_eq!(tokens[1].span, Span::new(2, 3));
        assert_eq!(tokens[2].span, Span::new(3, 4));
    }
}
