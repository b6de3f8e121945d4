//! Owned CSS tokens.
//!
//! A token keeps its raw source text, so concatenating every token's text
//! reproduces the input exactly. Escapes are not decoded. Malformed strings
//! and URLs are `BadString`/`BadUrl` tokens rather than errors.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    /// Identifier immediately followed by `(`; the text includes the paren.
    Function,
    AtKeyword,
    Hash,
    String,
    BadString,
    /// Unquoted `url(...)`, including the closing paren.
    Url,
    BadUrl,
    Number,
    Percentage,
    Dimension,
    Whitespace,
    Comment,
    Cdo,
    Cdc,
    Colon,
    Semicolon,
    Comma,
    OpenSquare,
    CloseSquare,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    /// Any other single code point, and the attribute matchers (`~=`, `|=`,
    /// `^=`, `$=`, `*=`).
    Delim,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Name part of the token: function name without `(`, at-keyword
    /// without `@`, hash without `#`. Other tokens return their text.
    pub fn value(&self) -> &str {
        match self.kind {
            TokenKind::Function => self.text.strip_suffix('(').unwrap_or(&self.text),
            TokenKind::AtKeyword => self.text.strip_prefix('@').unwrap_or(&self.text),
            TokenKind::Hash => self.text.strip_prefix('#').unwrap_or(&self.text),
            _ => &self.text,
        }
    }

    pub fn is_delim(&self, c: char) -> bool {
        self.kind == TokenKind::Delim && self.text.len() == c.len_utf8() && self.text.starts_with(c)
    }

    /// Ident with the given name, ASCII case-insensitive.
    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Ident && self.text.eq_ignore_ascii_case(name)
    }

    pub fn is_at_keyword(&self, name: &str) -> bool {
        self.kind == TokenKind::AtKeyword && self.value().eq_ignore_ascii_case(name)
    }

    /// Whitespace or comment.
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// Target of an unquoted `url(...)` token, or the contents of a string.
    pub fn url_value(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Url => {
                let start = self.text.find('(')? + 1;
                let end = self.text.rfind(')').filter(|end| *end >= start).unwrap_or(self.text.len());
                Some(self.text[start..end].trim())
            }
            TokenKind::String => {
                let quote = self.text.chars().next()?;
                let inner = &self.text[quote.len_utf8()..];
                Some(inner.strip_suffix(quote).unwrap_or(inner))
            }
            _ => None,
        }
    }
}
