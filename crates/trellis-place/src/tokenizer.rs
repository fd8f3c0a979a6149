//! Description tokenizer.
//!
//! Raw scanning is done by a `logos` lexer over single characters, numbers
//! and identifiers. A cooking pass then folds `[...]` into arrays, `(...)`
//! into parameter lists, `|` plus an optional number into splitters, and
//! identifiers into keywords.

use std::ops::Range;

use logos::Logos;

use crate::error::{ParseError, ParseErrorKind};
use crate::number::{Number, RepeatedArray};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[token("<")]
    DivStart,
    #[token(">")]
    DivEnd,
    #[token("|")]
    Pipe,
    #[token("=")]
    Equal,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(",")]
    Comma,
    #[regex(r"-?[0-9]+(\.[0-9]+)?%?")]
    Number,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
}

/// Reserved words of the description language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Weight,
    Min,
    Max,
    Width,
    Height,
    Arrange,
    HFit,
    VFit,
    Gap,
    Grid,
    Margin,
    Collapse,
    Dock,
    Fit,
    Vert,
    Switchable,
    Left,
    Right,
    Top,
    Bottom,
    Undisplayed,
    Invisible,
}

impl Keyword {
    pub fn from_ident(ident: &str) -> Option<Self> {
        Some(match ident {
            "weight" => Keyword::Weight,
            "min" => Keyword::Min,
            "max" => Keyword::Max,
            "width" => Keyword::Width,
            "height" => Keyword::Height,
            "arrange" => Keyword::Arrange,
            "hfit" => Keyword::HFit,
            "vfit" => Keyword::VFit,
            "gap" => Keyword::Gap,
            "grid" => Keyword::Grid,
            "margin" => Keyword::Margin,
            "collapse" => Keyword::Collapse,
            "dock" => Keyword::Dock,
            "fit" => Keyword::Fit,
            "vert" => Keyword::Vert,
            "switchable" => Keyword::Switchable,
            "left" => Keyword::Left,
            "right" => Keyword::Right,
            "top" => Keyword::Top,
            "bottom" => Keyword::Bottom,
            "undisplayed" => Keyword::Undisplayed,
            "invisible" => Keyword::Invisible,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Weight => "weight",
            Keyword::Min => "min",
            Keyword::Max => "max",
            Keyword::Width => "width",
            Keyword::Height => "height",
            Keyword::Arrange => "arrange",
            Keyword::HFit => "hfit",
            Keyword::VFit => "vfit",
            Keyword::Gap => "gap",
            Keyword::Grid => "grid",
            Keyword::Margin => "margin",
            Keyword::Collapse => "collapse",
            Keyword::Dock => "dock",
            Keyword::Fit => "fit",
            Keyword::Vert => "vert",
            Keyword::Switchable => "switchable",
            Keyword::Left => "left",
            Keyword::Right => "right",
            Keyword::Top => "top",
            Keyword::Bottom => "bottom",
            Keyword::Undisplayed => "undisplayed",
            Keyword::Invisible => "invisible",
        }
    }
}

/// Marker closing a repeating array: `[1,2,repeated]`.
const REPEATED: &str = "repeated";

/// A cooked token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    DivStart,
    DivEnd,
    /// `|`, with the number that followed it, if any.
    Splitter(Number),
    Equal,
    Array(RepeatedArray),
    Parameters(Vec<Number>),
    Number(Number),
    Keyword(Keyword),
    Identifier(String),
}

impl TokenKind {
    /// Short human-readable form for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::DivStart => "'<'".to_string(),
            TokenKind::DivEnd => "'>'".to_string(),
            TokenKind::Splitter(_) => "'|'".to_string(),
            TokenKind::Equal => "'='".to_string(),
            TokenKind::Array(_) => "array".to_string(),
            TokenKind::Parameters(_) => "parameter list".to_string(),
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::Keyword(k) => format!("keyword '{}'", k.as_str()),
            TokenKind::Identifier(name) => format!("name '{}'", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

/// Read a number literal: integer, real, or percent when `%`-suffixed.
pub fn parse_number(text: &str, offset: usize) -> Result<Number, ParseError> {
    let invalid = || ParseError::new(ParseErrorKind::InvalidNumber, offset);
    if let Some(body) = text.strip_suffix('%') {
        let value: f64 = body.parse().map_err(|_| invalid())?;
        return Ok(Number::percent(value));
    }
    if text.contains('.') {
        let value: f64 = text.parse().map_err(|_| invalid())?;
        return Ok(Number::Real(value));
    }
    text.parse::<i32>().map(Number::Integer).map_err(|_| invalid())
}

fn raw_tokens(source: &str) -> Result<Vec<(RawToken, Range<usize>)>, ParseError> {
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                let c = source[span.start..].chars().next().unwrap_or('\0');
                let kind = if c.is_ascii_digit() || c == '-' || c == '.' || c == '%' {
                    ParseErrorKind::InvalidNumber
                } else {
                    ParseErrorKind::InvalidCharacter(c)
                };
                return Err(ParseError::new(kind, span.start));
            }
        }
    }

    Ok(tokens)
}

struct Cooker<'a> {
    source: &'a str,
    raw: Vec<(RawToken, Range<usize>)>,
    pos: usize,
}

impl<'a> Cooker<'a> {
    fn peek(&self) -> Option<RawToken> {
        self.raw.get(self.pos).map(|(token, _)| *token)
    }

    fn bump(&mut self) -> Option<(RawToken, Range<usize>)> {
        let token = self.raw.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn end_offset(&self) -> usize {
        self.source.len()
    }

    fn number(&self, span: &Range<usize>) -> Result<Number, ParseError> {
        parse_number(&self.source[span.clone()], span.start)
    }

    /// Comma-separated numbers up to `close`; `allow_repeated` accepts a
    /// trailing `repeated` marker.
    fn sequence(
        &mut self,
        close: RawToken,
        allow_repeated: bool,
        error: ParseErrorKind,
        start: usize,
    ) -> Result<(Vec<Number>, bool, usize), ParseError> {
        let mut values = Vec::new();
        let mut repeated = false;
        loop {
            let Some((token, span)) = self.bump() else {
                return Err(ParseError::new(error, self.end_offset()));
            };
            match token {
                RawToken::Number if !repeated => values.push(self.number(&span)?),
                RawToken::Identifier
                    if allow_repeated
                        && !repeated
                        && !values.is_empty()
                        && &self.source[span.clone()] == REPEATED =>
                {
                    repeated = true;
                }
                _ => return Err(ParseError::new(error, span.start)),
            }
            let Some((token, span)) = self.bump() else {
                return Err(ParseError::new(error, self.end_offset()));
            };
            match token {
                RawToken::Comma => continue,
                t if t == close => return Ok((values, repeated, span.end)),
                _ => return Err(ParseError::new(error, span.start.max(start))),
            }
        }
    }

    fn cook(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        while let Some((token, span)) = self.bump() {
            let start = span.start;
            let (kind, end) = match token {
                RawToken::DivStart => (TokenKind::DivStart, span.end),
                RawToken::DivEnd => (TokenKind::DivEnd, span.end),
                RawToken::Equal => (TokenKind::Equal, span.end),
                RawToken::Pipe => {
                    if self.peek() == Some(RawToken::Number) {
                        let Some((_, number_span)) = self.bump() else {
                            break;
                        };
                        (
                            TokenKind::Splitter(self.number(&number_span)?),
                            number_span.end,
                        )
                    } else {
                        (TokenKind::Splitter(Number::None), span.end)
                    }
                }
                RawToken::BracketOpen => {
                    let (values, repeated, end) = self.sequence(
                        RawToken::BracketClose,
                        true,
                        ParseErrorKind::InvalidArray,
                        start,
                    )?;
                    (
                        TokenKind::Array(RepeatedArray::from_values(values, repeated)),
                        end,
                    )
                }
                RawToken::ParenOpen => {
                    let (values, _, end) = self.sequence(
                        RawToken::ParenClose,
                        false,
                        ParseErrorKind::InvalidParameters,
                        start,
                    )?;
                    (TokenKind::Parameters(values), end)
                }
                RawToken::Number => (TokenKind::Number(self.number(&span)?), span.end),
                RawToken::Identifier => {
                    let text = &self.source[span.clone()];
                    let kind = match Keyword::from_ident(text) {
                        Some(keyword) => TokenKind::Keyword(keyword),
                        None => TokenKind::Identifier(text.to_string()),
                    };
                    (kind, span.end)
                }
                RawToken::BracketClose => {
                    return Err(ParseError::new(ParseErrorKind::InvalidArray, start));
                }
                RawToken::ParenClose => {
                    return Err(ParseError::new(ParseErrorKind::InvalidParameters, start));
                }
                RawToken::Comma => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedToken("','".to_string()),
                        start,
                    ));
                }
            };
            tokens.push(Token {
                kind,
                span: start..end,
            });
        }
        Ok(tokens)
    }
}

/// Tokenize a description.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let raw = raw_tokens(source)?;
    Cooker {
        source,
        raw,
        pos: 0,
    }
    .cook()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .expect("tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keywords_and_names() {
        assert_eq!(
            kinds("<left weight=30%>"),
            vec![
                TokenKind::DivStart,
                TokenKind::Keyword(Keyword::Left),
                TokenKind::Keyword(Keyword::Weight),
                TokenKind::Equal,
                TokenKind::Number(Number::percent(30.0)),
                TokenKind::DivEnd,
            ]
        );
        assert_eq!(
            kinds("sidebar"),
            vec![TokenKind::Identifier("sidebar".to_string())]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("12 -3 2.5"),
            vec![
                TokenKind::Number(Number::Integer(12)),
                TokenKind::Number(Number::Integer(-3)),
                TokenKind::Number(Number::Real(2.5)),
            ]
        );
    }

    #[test]
    fn test_splitter_with_weight() {
        assert_eq!(
            kinds("<a>|40%<b>"),
            vec![
                TokenKind::DivStart,
                TokenKind::Identifier("a".to_string()),
                TokenKind::DivEnd,
                TokenKind::Splitter(Number::percent(40.0)),
                TokenKind::DivStart,
                TokenKind::Identifier("b".to_string()),
                TokenKind::DivEnd,
            ]
        );
    }

    #[test]
    fn test_arrays() {
        assert_eq!(
            kinds("[10, 20%]"),
            vec![TokenKind::Array(RepeatedArray::from_values(
                vec![Number::Integer(10), Number::percent(20.0)],
                false
            ))]
        );
        assert_eq!(
            kinds("[5,repeated]"),
            vec![TokenKind::Array(RepeatedArray::from_values(
                vec![Number::Integer(5)],
                true
            ))]
        );
    }

    #[test]
    fn test_parameters() {
        assert_eq!(
            kinds("collapse(0,1,2,1)"),
            vec![
                TokenKind::Keyword(Keyword::Collapse),
                TokenKind::Parameters(vec![0.into(), 1.into(), 2.into(), 1.into()]),
            ]
        );
    }

    #[test]
    fn test_spans_cover_cooked_tokens() {
        let tokens = tokenize("gap=[1,2]").expect("tokenize");
        assert_eq!(tokens[2].span, 4..9);
    }

    #[test]
    fn test_invalid_character() {
        let err = tokenize("<a $>").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidCharacter('$'));
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn test_malformed_array() {
        assert_eq!(
            tokenize("[1,]").unwrap_err().kind,
            ParseErrorKind::InvalidArray
        );
        assert_eq!(
            tokenize("[1 2]").unwrap_err().kind,
            ParseErrorKind::InvalidArray
        );
        assert_eq!(
            tokenize("[repeated]").unwrap_err().kind,
            ParseErrorKind::InvalidArray
        );
        assert_eq!(
            tokenize("[1,2").unwrap_err().kind,
            ParseErrorKind::InvalidArray
        );
    }

    #[test]
    fn test_malformed_number() {
        assert_eq!(
            tokenize("weight=1.").unwrap_err().kind,
            ParseErrorKind::InvalidNumber
        );
        assert_eq!(
            tokenize("weight=99999999999").unwrap_err().kind,
            ParseErrorKind::InvalidNumber
        );
    }
}
