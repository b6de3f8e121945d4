//! `:global` / `:local` scope frames.

/// Which way a scope directive points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    Local,
}

impl ScopeKind {
    /// Parse a directive name (`global` / `local`), ASCII case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("global") {
            Some(ScopeKind::Global)
        } else if name.eq_ignore_ascii_case("local") {
            Some(ScopeKind::Local)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScopeKind::Global => "global",
            ScopeKind::Local => "local",
        }
    }
}

/// An open scope region, closed by the `}` seen at `level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeFrame {
    pub kind: ScopeKind,
    pub level: usize,
    /// The directive named its selector (`:global(.x)`, `:global .x`) and
    /// does not affect nested rules.
    pub explicit: bool,
    /// Bare `:global { ... }` block: its braces are dropped from output.
    pub wrapper: bool,
}

/// Scope frames, innermost last.
#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: ScopeFrame) {
        self.frames.push(frame);
    }

    /// Pop the innermost frame if it was opened at `level`.
    pub fn close(&mut self, level: usize) -> Option<ScopeFrame> {
        if self.frames.last()?.level == level {
            self.frames.pop()
        } else {
            None
        }
    }

    /// Whether class selectors here get the file hash. The innermost frame
    /// that scopes its nested rules decides; outside any, classes are local.
    pub fn hashes_classes(&self) -> bool {
        self.frames
            .iter()
            .rev()
            .find(|frame| !frame.explicit)
            .is_none_or(|frame| frame.kind == ScopeKind::Local)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
