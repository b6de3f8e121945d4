use std::path::PathBuf;

use tracing::trace;

use super::CssTransformer;
use crate::error::{CssError, Result};
use crate::token::{Token, TokenKind};
use crate::mixins::MixinRegistry;
use crate::scope::{ScopeFrame, ScopeKind, ScopeStack};
use crate::tokenizer::Tokenizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Mode {
    /// Transform and produce output.
    Emit,
    /// Only record top-level `@define-mixin` blocks (mixin source files).
    Harvest,
}

/// State for transforming one file.
pub(super) struct Session<'a> {
    pub(super) transformer: &'a CssTransformer,
    pub(super) registry: &'a mut MixinRegistry,
    pub(super) tokens: Tokenizer,
    pending: Option<Token>,
    /// Filesystem path; keys this file's mixins and anchors mixin URLs.
    pub(super) file: PathBuf,
    /// Path as given by the host, for diagnostics.
    pub(super) logical: String,
    pub(super) mode: Mode,
    /// Class suffix, set for module files.
    hash: Option<String>,
    scopes: ScopeStack,
    /// Scope of an explicit directive waiting for its `{`.
    pending_scope: Option<ScopeKind>,
    out: String,
}

impl<'a> Session<'a> {
    pub(super) fn new(
        transformer: &'a CssTransformer,
        registry: &'a mut MixinRegistry,
        source: &str,
        file: PathBuf,
        logical: String,
        mode: Mode,
        hash: Option<String>,
    ) -> Self {
        Self {
            transformer,
            registry,
            out: String::with_capacity(if mode == Mode::Emit { source.len() } else { 0 }),
            tokens: Tokenizer::new(source),
            pending: None,
            file,
            logical,
            mode,
            hash,
            scopes: ScopeStack::new(),
            pending_scope: None,
        }
    }

    pub(super) fn run(mut self) -> Result<String> {
        while let Some(token) = self.next() {
            self.handle(token)?;
        }
        Ok(self.out)
    }

    pub(super) fn next(&mut self) -> Option<Token> {
        self.pending.take().or_else(|| self.tokens.next_token())
    }

    /// Return a token to the stream. At most one token is held back.
    pub(super) fn push_back(&mut self, token: Token) {
        debug_assert!(self.pending.is_none());
        self.pending = Some(token);
    }

    /// Read past whitespace and comments, appending them to `raw`.
    pub(super) fn skip_trivia(&mut self, raw: &mut String) -> Option<Token> {
        loop {
            let token = self.next()?;
            if !token.is_trivia() {
                return Some(token);
            }
            raw.push_str(&token.text);
        }
    }

    /// Next non-trivia token if it satisfies `accept`, otherwise push it back.
    pub(super) fn expect(
        &mut self,
        raw: &mut String,
        accept: impl FnOnce(&Token) -> bool,
    ) -> Option<Token> {
        let token = self.skip_trivia(raw)?;
        if accept(&token) {
            Some(token)
        } else {
            self.push_back(token);
            None
        }
    }

    pub(super) fn emit(&mut self, token: Token) {
        self.out.push_str(&token.text);
    }

    pub(super) fn emit_str(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn handle(&mut self, token: Token) -> Result<()> {
        if token.is_at_keyword("define-mixin") {
            return self.define_mixin(token);
        }
        if self.mode == Mode::Harvest {
            return Ok(());
        }

        let module = self.hash.is_some();
        match token.kind {
            TokenKind::AtKeyword if token.is_at_keyword("mixin") => return self.use_mixin(token),
            TokenKind::Delim if module && token.is_delim('.') => self.class(token),
            TokenKind::Colon if module => return self.colon(token),
            TokenKind::OpenBrace => self.open_brace(token),
            TokenKind::CloseBrace => self.close_brace(token),
            TokenKind::Semicolon => {
                self.pending_scope = None;
                self.emit(token);
            }
            _ => self.emit(token),
        }
        Ok(())
    }

    fn push_hash(&mut self) {
        if let Some(hash) = &self.hash {
            self.out.push_str(hash);
        }
    }

    fn class(&mut self, dot: Token) {
        match self.next() {
            Some(name) if name.kind == TokenKind::Ident => {
                self.out.push('.');
                self.out.push_str(&name.text);
                if self.scopes.hashes_classes() {
                    self.push_hash();
                }
            }
            Some(other) => {
                self.emit(dot);
                self.push_back(other);
            }
            None => self.emit(dot),
        }
    }

    fn colon(&mut self, colon: Token) -> Result<()> {
        let Some(next) = self.next() else {
            self.emit(colon);
            return Ok(());
        };

        let kind = match next.kind {
            TokenKind::Function => ScopeKind::from_name(next.value()),
            TokenKind::Ident => ScopeKind::from_name(&next.text),
            _ => None,
        };

        match kind {
            Some(kind) if next.kind == TokenKind::Function => self.scope_function(kind, colon, next),
            Some(kind) => self.scope_block(kind, colon, next),
            None => {
                self.emit(colon);
                self.push_back(next);
                Ok(())
            }
        }
    }

    /// `:global(...)` / `:local(...)`: the argument replaces the directive.
    fn scope_function(&mut self, kind: ScopeKind, colon: Token, function: Token) -> Result<()> {
        let mut argument = Vec::new();
        let mut depth = 1usize;
        while let Some(token) = self.next() {
            match token.kind {
                TokenKind::Function | TokenKind::OpenParen => depth += 1,
                TokenKind::CloseParen => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            argument.push(token);
        }

        if !contains_class(&argument) {
            let argument: String = argument.iter().map(|t| t.text.as_str()).collect();
            return Err(CssError::MalformedScopeDirective {
                directive: format!("{}{}{argument})", colon.text, function.text),
                file: self.logical.clone(),
            });
        }

        trace!(scope = kind.as_str(), "Explicit scope directive");
        self.emit_selector(&argument, kind == ScopeKind::Local)?;
        self.pending_scope = Some(kind);
        Ok(())
    }

    /// Bare `:global` / `:local` up to the next `{`.
    fn scope_block(&mut self, kind: ScopeKind, colon: Token, ident: Token) -> Result<()> {
        let mut span = Vec::new();
        let terminator = loop {
            match self.next() {
                Some(token)
                    if matches!(
                        token.kind,
                        TokenKind::OpenBrace | TokenKind::Semicolon | TokenKind::CloseBrace
                    ) =>
                {
                    break Some(token);
                }
                Some(token) => span.push(token),
                None => break None,
            }
        };

        let brace = match terminator {
            Some(token) if token.kind == TokenKind::OpenBrace => token,
            other => {
                // Not followed by a rule block; leave it as written.
                self.emit(colon);
                self.emit(ident);
                let hash = self.scopes.hashes_classes();
                self.emit_selector(&span, hash)?;
                if let Some(token) = other {
                    self.push_back(token);
                }
                return Ok(());
            }
        };

        let level = self.tokens.nesting();
        let start = if self.at_selector_start() {
            span.iter().position(|t| !t.is_trivia()).unwrap_or(span.len())
        } else {
            0
        };
        let selector = &span[start..];

        if selector.is_empty() {
            trace!(scope = kind.as_str(), level, "Scope block");
            self.scopes.push(ScopeFrame {
                kind,
                level,
                explicit: false,
                wrapper: true,
            });
            return Ok(());
        }

        let explicit = contains_class(selector);
        self.emit_selector(selector, kind == ScopeKind::Local)?;
        self.scopes.push(ScopeFrame {
            kind,
            level,
            explicit,
            wrapper: false,
        });
        self.emit(brace);
        Ok(())
    }

    fn open_brace(&mut self, brace: Token) {
        if let Some(kind) = self.pending_scope.take() {
            self.scopes.push(ScopeFrame {
                kind,
                level: self.tokens.nesting(),
                explicit: true,
                wrapper: false,
            });
        }
        self.emit(brace);
    }

    fn close_brace(&mut self, brace: Token) {
        self.pending_scope = None;
        let closed = self.scopes.close(self.tokens.nesting());
        if closed.is_some_and(|frame| frame.wrapper) {
            return;
        }
        self.emit(brace);
    }

    /// Emit selector tokens, hashing class names when `hash` is set.
    ///
    /// A `:global(...)`/`:local(...)` inside the selector overrides `hash`
    /// for its argument and is unwrapped like the top-level form.
    fn emit_selector(&mut self, tokens: &[Token], hash: bool) -> Result<()> {
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            if token.kind == TokenKind::Colon {
                if let Some((kind, end)) = nested_directive(tokens, i + 1) {
                    let argument = &tokens[i + 2..end];
                    if !contains_class(argument) {
                        let end = (end + 1).min(tokens.len());
                        return Err(CssError::MalformedScopeDirective {
                            directive: tokens[i..end].iter().map(|t| t.text.as_str()).collect(),
                            file: self.logical.clone(),
                        });
                    }
                    self.emit_selector(argument, kind == ScopeKind::Local)?;
                    i = end + 1;
                    continue;
                }
            }

            self.out.push_str(&token.text);
            if token.is_delim('.') {
                if let Some(name) = tokens.get(i + 1).filter(|t| t.kind == TokenKind::Ident) {
                    self.out.push_str(&name.text);
                    if hash {
                        self.push_hash();
                    }
                    i += 1;
                }
            }
            i += 1;
        }
        Ok(())
    }

    /// Whether output sits where a new selector begins, so leading
    /// whitespace carries no combinator meaning.
    fn at_selector_start(&self) -> bool {
        self.out
            .chars()
            .next_back()
            .is_none_or(|c| c.is_whitespace() || matches!(c, '{' | '}' | ';' | ','))
    }
}

/// A `global(`/`local(` function at `at`: its kind and the index of the
/// matching `)`, or `tokens.len()` when the argument runs to the end.
fn nested_directive(tokens: &[Token], at: usize) -> Option<(ScopeKind, usize)> {
    let function = tokens.get(at).filter(|t| t.kind == TokenKind::Function)?;
    let kind = ScopeKind::from_name(function.value())?;

    let mut depth = 1usize;
    for (offset, token) in tokens[at + 1..].iter().enumerate() {
        match token.kind {
            TokenKind::Function | TokenKind::OpenParen => depth += 1,
            TokenKind::CloseParen => {
                depth -= 1;
                if depth == 0 {
                    return Some((kind, at + 1 + offset));
                }
            }
            _ => {}
        }
    }
    Some((kind, tokens.len()))
}

fn contains_class(tokens: &[Token]) -> bool {
    tokens
        .windows(2)
        .any(|pair| pair[0].is_delim('.') && pair[1].kind == TokenKind::Ident)
}
