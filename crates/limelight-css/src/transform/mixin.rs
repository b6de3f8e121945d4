//! `@define-mixin` and `@mixin` handling.

use std::path::{Path, PathBuf};

use limelight_core::paths::to_logical;
use limelight_resolver::{ResolutionHint, ResolutionKind};
use tracing::{debug, trace, warn};

use super::session::{Mode, Session};
use crate::error::Result;
use crate::token::{Token, TokenKind};

/// A parsed `@mixin` statement.
struct MixinUse {
    /// Source text of the statement, for pass-through.
    raw: String,
    /// Body to insert, when the mixin is known.
    body: Option<String>,
}

impl Session<'_> {
    pub(super) fn define_mixin(&mut self, at: Token) -> Result<()> {
        let level = self.tokens.nesting();
        let mut raw = at.text;

        let Some(name) = self.expect(&mut raw, |t| t.kind == TokenKind::Ident) else {
            self.emit_str(&raw);
            return Ok(());
        };
        raw.push_str(&name.text);

        if self.expect(&mut raw, |t| t.kind == TokenKind::OpenBrace).is_none() {
            self.emit_str(&raw);
            return Ok(());
        }

        if level > 0 {
            debug!(file = %self.logical, name = %name.text, "Ignoring @define-mixin inside a block");
            self.skip_block(level);
            return Ok(());
        }

        let body = self.capture_body(level)?;
        trace!(file = %self.logical, name = %name.text, "Defined mixin");
        self.registry.define(&self.file, &name.text, body.trim());

        // Whitespace after a definition goes with it.
        loop {
            match self.next() {
                Some(token) if token.kind == TokenKind::Whitespace => {}
                Some(token) => {
                    self.push_back(token);
                    break;
                }
                None => break,
            }
        }
        Ok(())
    }

    /// Discard tokens through the `}` closing a block opened at `level`.
    fn skip_block(&mut self, level: usize) {
        while let Some(token) = self.next() {
            if token.kind == TokenKind::CloseBrace && self.tokens.nesting() == level {
                break;
            }
        }
    }

    /// Text of a definition block, with `@mixin` uses already expanded.
    fn capture_body(&mut self, level: usize) -> Result<String> {
        let mut body = String::new();
        while let Some(token) = self.next() {
            if token.kind == TokenKind::CloseBrace && self.tokens.nesting() == level {
                break;
            }
            if token.is_at_keyword("mixin") {
                let usage = self.read_mixin_use(token)?;
                body.push_str(usage.body.as_deref().unwrap_or(&usage.raw));
            } else {
                body.push_str(&token.text);
            }
        }
        Ok(body)
    }

    pub(super) fn use_mixin(&mut self, at: Token) -> Result<()> {
        let usage = self.read_mixin_use(at)?;
        let max_depth = self.transformer.options().max_mixin_depth;

        match usage.body {
            Some(body) if self.tokens.depth() < max_depth => {
                trace!(file = %self.logical, depth = self.tokens.depth(), "Expanding mixin");
                self.tokens.insert(&body);
            }
            Some(_) => {
                warn!(
                    file = %self.logical,
                    statement = %usage.raw.trim(),
                    max_depth,
                    "Mixin expansion nested too deeply, leaving it in place"
                );
                self.emit_str(&usage.raw);
            }
            None => self.emit_str(&usage.raw),
        }
        Ok(())
    }

    /// Parse `@mixin name;` or `@mixin name from url(...);` after the
    /// at-keyword.
    fn read_mixin_use(&mut self, at: Token) -> Result<MixinUse> {
        let mut raw = at.text;

        let Some(name) = self.expect(&mut raw, |t| t.kind == TokenKind::Ident) else {
            return Ok(MixinUse { raw, body: None });
        };
        raw.push_str(&name.text);

        let Some(next) = self.skip_trivia(&mut raw) else {
            let body = self.registry.get(&self.file, &name.text).map(str::to_owned);
            return Ok(MixinUse { raw, body });
        };

        match next.kind {
            TokenKind::Semicolon => {
                raw.push_str(&next.text);
                let body = self.registry.get(&self.file, &name.text).map(str::to_owned);
                Ok(MixinUse { raw, body })
            }
            TokenKind::Ident if next.is_ident("from") => {
                raw.push_str(&next.text);
                let Some(source) = self.read_source(&mut raw) else {
                    return Ok(MixinUse { raw, body: None });
                };
                match self.skip_trivia(&mut raw) {
                    None => {}
                    Some(token) if token.kind == TokenKind::Semicolon => raw.push_str(&token.text),
                    Some(token) => {
                        self.push_back(token);
                        return Ok(MixinUse { raw, body: None });
                    }
                }
                let body = self.load_from(&source, &name.text)?;
                Ok(MixinUse { raw, body })
            }
            _ => {
                self.push_back(next);
                Ok(MixinUse { raw, body: None })
            }
        }
    }

    /// `url(path)`, `url("path")` or `"path"`.
    fn read_source(&mut self, raw: &mut String) -> Option<String> {
        let token = self.skip_trivia(raw)?;
        match token.kind {
            TokenKind::Url | TokenKind::String => {
                raw.push_str(&token.text);
                token.url_value().map(str::to_owned)
            }
            TokenKind::Function if token.value().eq_ignore_ascii_case("url") => {
                raw.push_str(&token.text);
                let value = self.skip_trivia(raw)?;
                raw.push_str(&value.text);
                if value.kind != TokenKind::String {
                    return None;
                }
                let close = self.skip_trivia(raw)?;
                if close.kind != TokenKind::CloseParen {
                    self.push_back(close);
                    return None;
                }
                raw.push_str(&close.text);
                value.url_value().map(str::to_owned)
            }
            _ => {
                self.push_back(token);
                None
            }
        }
    }

    /// Look up `name` in the file `source` points to, harvesting that file's
    /// definitions the first time it is referenced.
    fn load_from(&mut self, source: &str, name: &str) -> Result<Option<String>> {
        let dir = self
            .file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.transformer.root().to_path_buf());

        let resolution = self.transformer.resolver.resolve_with_hint(
            source,
            &dir,
            ResolutionHint::ImportedFromCss,
        )?;
        if !resolution.matched || resolution.target.kind == ResolutionKind::Url {
            warn!(file = %self.logical, source, "Mixin source is not a local file, leaving @mixin in place");
            return Ok(None);
        }

        let target = PathBuf::from(resolution.target.path);
        if self.registry.mark_loaded(&target) {
            match self.transformer.runtime.read_to_string(&target) {
                Ok(contents) => {
                    debug!(path = %target.display(), "Loading mixins");
                    let logical = to_logical(self.transformer.root(), &target)
                        .unwrap_or_else(|| target.display().to_string());
                    Session::new(
                        self.transformer,
                        &mut *self.registry,
                        &contents,
                        target.clone(),
                        logical,
                        Mode::Harvest,
                        None,
                    )
                    .run()?;
                }
                Err(e) => {
                    warn!(file = %self.logical, path = %target.display(), error = %e, "Could not read mixin file");
                }
            }
        }

        Ok(self.registry.get(&target, name).map(str::to_owned))
    }
}
