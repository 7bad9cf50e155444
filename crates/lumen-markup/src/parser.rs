use crate::error::{MarkupError, MarkupErrorKind};
use crate::lexer::{Lexer, Token, TokenWithCol};
use crate::style::{Style, Tag};

/// One printable character with every style active at its position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StyledChar {
    pub ch: char,
    pub style: Style,
    /// 1-based column of the character in the source string.
    pub col: usize,
}

/// Result of parsing a markup string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Markup {
    pub chars: Vec<StyledChar>,
    pub diagnostics: Vec<MarkupError>,
}

impl Markup {
    /// The characters without any markup.
    pub fn plain_text(&self) -> String {
        self.chars.iter().map(|c| c.ch).collect()
    }

    /// True when the source contained no malformed markup.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

// ── Parser ────────────────────────────────────────────────────────────────

pub struct Parser {
    tokens: Vec<TokenWithCol>,
    /// Open tags, outermost first, with the column they were opened at.
    stack: Vec<(Tag, usize)>,
    diagnostics: Vec<MarkupError>,
}

impl Parser {
    pub fn new(tokens: Vec<TokenWithCol>, diagnostics: Vec<MarkupError>) -> Self {
        Self { tokens, stack: Vec::new(), diagnostics }
    }

    pub fn parse_markup(mut self) -> Markup {
        let mut chars = Vec::with_capacity(self.tokens.len());
        let mut style = Style::default();

        let tokens = std::mem::take(&mut self.tokens);
        for TokenWithCol { token, col } in tokens {
            match token {
                Token::Char(ch) => chars.push(StyledChar { ch, style, col }),
                Token::Open(tag) => {
                    self.stack.push((tag, col));
                    style = Style::from_stack(&self.stack);
                }
                Token::Close(name) => {
                    // Closes the innermost open tag of that name, so crossed
                    // nesting like `<b><i></b></i>` still resolves.
                    match self.stack.iter().rposition(|(t, _)| t.name == name) {
                        Some(idx) => {
                            self.stack.remove(idx);
                            style = Style::from_stack(&self.stack);
                        }
                        None => self.diagnostics.push(MarkupError::new(
                            MarkupErrorKind::UnmatchedClose(name.as_str().to_string()),
                            col,
                        )),
                    }
                }
            }
        }

        for (tag, col) in self.stack.drain(..) {
            self.diagnostics.push(MarkupError::new(
                MarkupErrorKind::Unclosed(tag.name.as_str().to_string()),
                col,
            ));
        }
        self.diagnostics.sort_by_key(|d| d.col);

        Markup { chars, diagnostics: self.diagnostics }
    }
}

/// Parses a markup string, recovering from every error.
///
/// Never fails: malformed markup is reported in [`Markup::diagnostics`].
pub fn parse(src: &str) -> Markup {
    let (tokens, diagnostics) = Lexer::new(src).tokenize();
    Parser::new(tokens, diagnostics).parse_markup()
}

/// Parses a markup string, failing on the first diagnostic.
pub fn parse_strict(src: &str) -> Result<Markup, MarkupError> {
    let mut markup = parse(src);
    if markup.diagnostics.is_empty() {
        Ok(markup)
    } else {
        Err(markup.diagnostics.swap_remove(0))
    }
}
