//! Token stream with brace nesting and stream insertion.
//!
//! Source text is lexed by `cssparser`. Its parser hands out nested blocks
//! as single tokens; [`lex`] walks into every block and writes the closing
//! delimiter out as a token of its own, so the result is one flat list whose
//! texts concatenate back to the input.
//!
//! Streams live in a small arena. The last one is active; when it runs dry
//! it is dropped and reading continues with the one below, so inserted text
//! (a mixin body) reads as if it had been written inline.
//!
//! Nesting: an `{` is reported at the level outside it and the level goes
//! up before the next token; a `}` lowers the level before it is reported.
//! A brace pair is therefore seen at the same level on both ends.

use std::vec;

use cssparser::{ParseError, Parser, ParserInput, SourcePosition, Token as CssToken};
use tracing::trace;

use crate::token::{Token, TokenKind};

/// Lex `source` into a flat token list.
pub fn lex(source: &str) -> Vec<Token> {
    let mut input = ParserInput::new(source);
    let mut parser = Parser::new(&mut input);
    let mut tokens = Vec::new();
    if let Err(error) = flatten(&mut parser, &mut tokens) {
        trace!(?error, "CSS lexing stopped early");
    }
    tokens
}

fn flatten<'i>(parser: &mut Parser<'i, '_>, out: &mut Vec<Token>) -> Result<(), ParseError<'i, ()>> {
    loop {
        let start = parser.position();
        let kind = match parser.next_including_whitespace_and_comments() {
            Ok(token) => kind_of(token),
            Err(_) => return Ok(()),
        };
        out.push(Token::new(kind, parser.slice_from(start)));

        let Some(close) = closing_kind(kind) else {
            continue;
        };
        let end: SourcePosition = parser.parse_nested_block(|nested| {
            flatten(nested, out)?;
            Ok(nested.position())
        })?;
        // Empty when the block runs to the end of input unclosed.
        let text = parser.slice_from(end);
        if !text.is_empty() {
            out.push(Token::new(close, text));
        }
    }
}

fn closing_kind(kind: TokenKind) -> Option<TokenKind> {
    match kind {
        TokenKind::Function | TokenKind::OpenParen => Some(TokenKind::CloseParen),
        TokenKind::OpenSquare => Some(TokenKind::CloseSquare),
        TokenKind::OpenBrace => Some(TokenKind::CloseBrace),
        _ => None,
    }
}

fn kind_of(token: &CssToken<'_>) -> TokenKind {
    match token {
        CssToken::Ident(_) => TokenKind::Ident,
        CssToken::Function(_) => TokenKind::Function,
        CssToken::AtKeyword(_) => TokenKind::AtKeyword,
        CssToken::Hash(_) | CssToken::IDHash(_) => TokenKind::Hash,
        CssToken::QuotedString(_) => TokenKind::String,
        CssToken::BadString(_) => TokenKind::BadString,
        CssToken::UnquotedUrl(_) => TokenKind::Url,
        CssToken::BadUrl(_) => TokenKind::BadUrl,
        CssToken::Number { .. } => TokenKind::Number,
        CssToken::Percentage { .. } => TokenKind::Percentage,
        CssToken::Dimension { .. } => TokenKind::Dimension,
        CssToken::WhiteSpace(_) => TokenKind::Whitespace,
        CssToken::Comment(_) => TokenKind::Comment,
        CssToken::CDO => TokenKind::Cdo,
        CssToken::CDC => TokenKind::Cdc,
        CssToken::Colon => TokenKind::Colon,
        CssToken::Semicolon => TokenKind::Semicolon,
        CssToken::Comma => TokenKind::Comma,
        CssToken::ParenthesisBlock => TokenKind::OpenParen,
        CssToken::SquareBracketBlock => TokenKind::OpenSquare,
        CssToken::CurlyBracketBlock => TokenKind::OpenBrace,
        CssToken::CloseParenthesis => TokenKind::CloseParen,
        CssToken::CloseSquareBracket => TokenKind::CloseSquare,
        CssToken::CloseCurlyBracket => TokenKind::CloseBrace,
        CssToken::Delim(_)
        | CssToken::IncludeMatch
        | CssToken::DashMatch
        | CssToken::PrefixMatch
        | CssToken::SuffixMatch
        | CssToken::SubstringMatch => TokenKind::Delim,
    }
}

#[derive(Debug)]
pub struct Tokenizer {
    streams: Vec<vec::IntoIter<Token>>,
    nesting: usize,
    pending_open: bool,
}

impl Tokenizer {
    pub fn new(source: &str) -> Self {
        Self {
            streams: vec![lex(source).into_iter()],
            nesting: 0,
            pending_open: false,
        }
    }

    /// Current brace nesting level.
    pub fn nesting(&self) -> usize {
        self.nesting
    }

    /// Number of inserted streams still open. A stream whose last token was
    /// just read still counts until the next read moves past it, so an
    /// insertion made from the tail of another one nests inside it.
    pub fn depth(&self) -> usize {
        self.streams.len().saturating_sub(1)
    }

    /// Splice `text` into the stream at the current position.
    pub fn insert(&mut self, text: &str) {
        self.streams.push(lex(text).into_iter());
    }

    pub fn next_token(&mut self) -> Option<Token> {
        let token = loop {
            let stream = self.streams.last_mut()?;
            match stream.next() {
                Some(token) => break token,
                None if self.streams.len() > 1 => {
                    self.streams.pop();
                }
                None => return None,
            }
        };

        if std::mem::take(&mut self.pending_open) {
            self.nesting += 1;
        }
        match token.kind {
            TokenKind::OpenBrace => self.pending_open = true,
            TokenKind::CloseBrace => self.nesting = self.nesting.saturating_sub(1),
            _ => {}
        }

        Some(token)
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}
