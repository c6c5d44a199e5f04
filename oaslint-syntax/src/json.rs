//! A `logos`-lexed, hand-written recursive-descent JSON parser that emits
//! the shared [`ParseEvent`] stream with byte spans (§4.1).
//!
//! JSON has no comments and no indentation sensitivity, so unlike the YAML
//! front end this one owns its own tokenizer rather than leaning on an
//! external crate for it.

use logos::Logos;

use crate::error::ParseError;
use crate::events::ParseEvent;
use crate::events::ScalarKind;
use crate::span::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum Token {
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,
    #[regex(r"-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Number,
}

/// Parses a JSON document into the shared event stream.
///
/// On success, returns a complete event stream and an empty error list.
/// On failure, returns the events produced before the error and a single
/// [`ParseError`] describing the best-effort failure location, per §4.1.
pub fn parse(text: &str) -> (Vec<ParseEvent>, Vec<ParseError>) {
    let tokens: Vec<(Token, Span)> = Token::lexer(text)
        .spanned()
        .filter_map(|(tok, range)| {
            tok.ok()
                .map(|t| (t, Span::new(range.start as u32, range.end as u32)))
        })
        .collect();

    let mut parser = Parser {
        text,
        tokens,
        pos: 0,
        events: Vec::new(),
    };

    match parser.parse_value() {
        Ok(()) => {
            parser.events.push(ParseEvent::DocEnd);
            (parser.events, Vec::new())
        }
        Err(e) => (parser.events, vec![e]),
    }
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<(Token, Span)>,
    pos: usize,
    events: Vec<ParseEvent>,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&(Token, Span)> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<(Token, Span)> {
        let t = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        t
    }

    fn eof_span(&self) -> Span {
        let end = self.tokens.last().map(|(_, s)| s.end).unwrap_or(0);
        Span::new(end, end)
    }

    fn parse_value(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            Some((Token::LBrace, _)) => self.parse_object(),
            Some((Token::LBracket, _)) => self.parse_array(),
            Some((Token::String, span)) => {
                let span = *span;
                self.bump();
                self.events.push(ParseEvent::Scalar {
                    kind: ScalarKind::String,
                    text: unquote(&self.slice_of(span)),
                    span,
                    anchor: None,
                    alias: None,
                });
                Ok(())
            }
            Some((Token::Number, span)) => {
                let span = *span;
                let text = self.slice_of(span);
                self.bump();
                self.events.push(ParseEvent::Scalar {
                    kind: ScalarKind::Number,
                    text,
                    span,
                    anchor: None,
                    alias: None,
                });
                Ok(())
            }
            Some((Token::True, span)) => self.push_const(*span, "true", ScalarKind::Boolean),
            Some((Token::False, span)) => self.push_const(*span, "false", ScalarKind::Boolean),
            Some((Token::Null, span)) => self.push_const(*span, "null", ScalarKind::Null),
            Some((_, span)) => Err(ParseError::new("unexpected token", *span)),
            None => Err(ParseError::new("unexpected end of input", self.eof_span())),
        }
    }

    fn push_const(&mut self, span: Span, text: &str, kind: ScalarKind) -> Result<(), ParseError> {
        self.bump();
        self.events.push(ParseEvent::Scalar {
            kind,
            text: text.to_string(),
            span,
            anchor: None,
            alias: None,
        });
        Ok(())
    }

    fn parse_object(&mut self) -> Result<(), ParseError> {
        let (_, open) = self.bump().expect("caller checked LBrace");
        self.events.push(ParseEvent::MapStart { span: open, anchor: None });

        if matches!(self.peek(), Some((Token::RBrace, _))) {
            let (_, close) = self.bump().unwrap();
            self.events.push(ParseEvent::MapEnd { span: close });
            return Ok(());
        }

        loop {
            let (key_text, key_span) = match self.bump() {
                Some((Token::String, span)) => (unquote(&self.slice_of(span)), span),
                Some((_, span)) => return Err(ParseError::new("expected string key", span)),
                None => return Err(ParseError::new("unexpected end of input", self.eof_span())),
            };
            self.events.push(ParseEvent::Key { text: key_text, span: key_span });

            match self.bump() {
                Some((Token::Colon, _)) => {}
                Some((_, span)) => return Err(ParseError::new("expected ':'", span)),
                None => return Err(ParseError::new("unexpected end of input", self.eof_span())),
            }

            self.parse_value()?;

            match self.bump() {
                Some((Token::Comma, _)) => continue,
                Some((Token::RBrace, span)) => {
                    self.events.push(ParseEvent::MapEnd { span });
                    return Ok(());
                }
                Some((_, span)) => return Err(ParseError::new("expected ',' or '}'", span)),
                None => return Err(ParseError::new("unexpected end of input", self.eof_span())),
            }
        }
    }

    fn parse_array(&mut self) -> Result<(), ParseError> {
        let (_, open) = self.bump().expect("caller checked LBracket");
        self.events.push(ParseEvent::SeqStart { span: open, anchor: None });

        if matches!(self.peek(), Some((Token::RBracket, _))) {
            let (_, close) = self.bump().unwrap();
            self.events.push(ParseEvent::SeqEnd { span: close });
            return Ok(());
        }

        loop {
            self.parse_value()?;
            match self.bump() {
                Some((Token::Comma, _)) => continue,
                Some((Token::RBracket, span)) => {
                    self.events.push(ParseEvent::SeqEnd { span });
                    return Ok(());
                }
                Some((_, span)) => return Err(ParseError::new("expected ',' or ']'", span)),
                None => return Err(ParseError::new("unexpected end of input", self.eof_span())),
            }
        }
    }

    fn slice_of(&self, span: Span) -> String {
        self.text[span.start as usize..span.end as usize].to_string()
    }
}

/// Removes surrounding quotes and resolves `\"`, `\\`, `\n`, `\t`, `\uXXXX`
/// escapes in a raw JSON string token's text.
fn unquote(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    if !inner.contains('\\') {
        return inner.to_string();
    }

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = (0..4).filter_map(|_| chars.next()).collect();
                if let Ok(code) = u32::from_str_radix(&hex, 16) {
                    if let Some(c) = char::from_u32(code) {
                        out.push(c);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_object() {
        let (events, errors) = parse(r#"{"a": 1, "b": true}"#);
        assert!(errors.is_empty());
        assert!(events.iter().any(|e| matches!(e, ParseEvent::Key { text, .. } if text == "a")));
        assert!(events.iter().any(|e| matches!(e, ParseEvent::Key { text, .. } if text == "b")));
    }

    #[test]
    fn reports_error_on_trailing_comma() {
        let (_events, errors) = parse(r#"{"a": 1,}"#);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn unquotes_escaped_string() {
        let (events, errors) = parse(r#"{"a": "x\ny"}"#);
        assert!(errors.is_empty());
        let scalar = events
            .iter()
            .find_map(|e| match e {
                ParseEvent::Scalar { text, kind: ScalarKind::String, .. } if text.contains('\n') => Some(text),
                _ => None,
            })
            .expect("escaped scalar");
        assert_eq!(scalar, "x\ny");
    }
}
