use std::fmt;

/// What went wrong while reading a markup string.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupErrorKind {
    /// `<` with no `>` before the end of input.
    UnterminatedTag,
    /// `<name>` where `name` is not a recognised tag.
    UnknownTag(String),
    /// `<col=...>` / `<col_bg=...>` whose argument is not `(r,g,b)`,
    /// or an argument attached to a tag that takes none.
    BadArgument(String),
    /// `</name>` with no matching open tag.
    UnmatchedClose(String),
    /// A tag still open when the input ended.
    Unclosed(String),
}

/// A diagnostic produced while parsing markup.
///
/// Markup errors never abort parsing; see the crate docs for the recovery
/// policy applied to each kind.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupError {
    pub kind: MarkupErrorKind,
    /// 1-based character column where the offending tag starts.
    pub col: usize,
}

impl MarkupError {
    pub(crate) fn new(kind: MarkupErrorKind, col: usize) -> Self {
        Self { kind, col }
    }
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            MarkupErrorKind::UnterminatedTag => {
                write!(f, "markup error at col {}: unterminated tag", self.col)
            }
            MarkupErrorKind::UnknownTag(name) => {
                write!(f, "markup error at col {}: unknown tag {:?}", self.col, name)
            }
            MarkupErrorKind::BadArgument(arg) => {
                write!(f, "markup error at col {}: bad tag argument {:?}", self.col, arg)
            }
            MarkupErrorKind::UnmatchedClose(name) => {
                write!(f, "markup error at col {}: closing tag </{}> was never opened", self.col, name)
            }
            MarkupErrorKind::Unclosed(name) => {
                write!(f, "markup error at col {}: tag <{}> is never closed", self.col, name)
            }
        }
    }
}

impl std::error::Error for MarkupError {}
