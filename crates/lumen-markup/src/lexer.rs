use crate::error::{MarkupError, MarkupErrorKind};
use crate::style::{Tag, TagName};

// ── Token ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A printable character (anything that is not part of a well-formed tag).
    Char(char),
    /// `<name>` or `<name=(r,g,b)>`.
    Open(Tag),
    /// `</name>`.
    Close(TagName),
}

/// Token plus the 1-based column where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithCol {
    pub token: Token,
    pub col: usize,
}

// ── Lexer ─────────────────────────────────────────────────────────────────

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    diagnostics: Vec<MarkupError>,
}

impl Lexer {
    pub fn new(src: &str) -> Self {
        Self { chars: src.chars().collect(), pos: 0, diagnostics: Vec::new() }
    }

    /// Splits the source into characters and tags.
    ///
    /// Malformed tags are reported and re-emitted as literal characters, so
    /// the returned stream always covers the whole input.
    pub fn tokenize(mut self) -> (Vec<TokenWithCol>, Vec<MarkupError>) {
        let mut tokens = Vec::with_capacity(self.chars.len());

        while self.pos < self.chars.len() {
            let ch = self.chars[self.pos];
            if ch != '<' {
                tokens.push(TokenWithCol { token: Token::Char(ch), col: self.pos + 1 });
                self.pos += 1;
                continue;
            }

            let start = self.pos;
            let Some(end) = self.find_tag_end(start) else {
                // No `>` anywhere ahead: everything left is plain text.
                self.diagnostics
                    .push(MarkupError::new(MarkupErrorKind::UnterminatedTag, start + 1));
                for (i, &c) in self.chars[start..].iter().enumerate() {
                    tokens.push(TokenWithCol { token: Token::Char(c), col: start + i + 1 });
                }
                self.pos = self.chars.len();
                break;
            };

            let body: String = self.chars[start + 1..end].iter().collect();
            match self.lex_tag_body(&body, start + 1) {
                Some(token) => tokens.push(TokenWithCol { token, col: start + 1 }),
                None => {
                    for (i, &c) in self.chars[start..=end].iter().enumerate() {
                        tokens.push(TokenWithCol { token: Token::Char(c), col: start + i + 1 });
                    }
                }
            }
            self.pos = end + 1;
        }

        (tokens, self.diagnostics)
    }

    fn find_tag_end(&self, start: usize) -> Option<usize> {
        self.chars[start + 1..].iter().position(|&c| c == '>').map(|off| start + 1 + off)
    }

    /// Interprets the text between `<` and `>`; `None` means "not a tag".
    fn lex_tag_body(&mut self, body: &str, col: usize) -> Option<Token> {
        if let Some(name) = body.strip_prefix('/') {
            return match TagName::from_name(name) {
                Some(tag) => Some(Token::Close(tag)),
                None => {
                    self.report(MarkupErrorKind::UnknownTag(name.to_string()), col);
                    None
                }
            };
        }

        let (name, arg) = match body.split_once('=') {
            Some((name, arg)) => (name, Some(arg)),
            None => (body, None),
        };

        let Some(tag) = TagName::from_name(name) else {
            self.report(MarkupErrorKind::UnknownTag(name.to_string()), col);
            return None;
        };

        match (tag.takes_color(), arg) {
            (true, Some(arg)) => match parse_color_triple(arg) {
                Some(rgb) => Some(Token::Open(Tag { name: tag, color: Some(rgb) })),
                None => {
                    self.report(MarkupErrorKind::BadArgument(arg.to_string()), col);
                    None
                }
            },
            (true, None) => {
                self.report(MarkupErrorKind::BadArgument(String::new()), col);
                None
            }
            (false, Some(arg)) => {
                self.report(MarkupErrorKind::BadArgument(arg.to_string()), col);
                None
            }
            (false, None) => Some(Token::Open(Tag { name: tag, color: None })),
        }
    }

    fn report(&mut self, kind: MarkupErrorKind, col: usize) {
        self.diagnostics.push(MarkupError::new(kind, col));
    }
}

// ── colour argument ───────────────────────────────────────────────────────

/// Parses `(r,g,b)`: three unsigned decimals, optional whitespace around each,
/// decimal point optional (`1`, `0.5`, `.5`, `1.` are all accepted).
pub(crate) fn parse_color_triple(arg: &str) -> Option<[f32; 3]> {
    let inner = arg.trim().strip_prefix('(')?.strip_suffix(')')?;
    let mut parts = inner.split(',');
    let mut rgb = [0.0f32; 3];
    for slot in &mut rgb {
        *slot = parse_component(parts.next()?)?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(rgb)
}

fn parse_component(s: &str) -> Option<f32> {
    let s = s.trim();
    let digits_ok = !s.is_empty()
        && s.chars().all(|c| c.is_ascii_digit() || c == '.')
        && s.chars().filter(|&c| c == '.').count() <= 1
        && s.chars().any(|c| c.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    // `f32::from_str` rejects a trailing bare `.`; the grammar allows it.
    let s = s.strip_suffix('.').unwrap_or(s);
    if s.starts_with('.') {
        format!("0{s}").parse().ok()
    } else {
        s.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<Token> {
        Lexer::new(src).tokenize().0.into_iter().map(|t| t.token).collect()
    }

    // ── colour triples ────────────────────────────────────────────────────

    #[test]
    fn color_triple_integers() {
        assert_eq!(parse_color_triple("(1,0,0)"), Some([1.0, 0.0, 0.0]));
    }

    #[test]
    fn color_triple_whitespace_and_decimals() {
        assert_eq!(parse_color_triple("( 0.5 , .25,1. )"), Some([0.5, 0.25, 1.0]));
    }

    #[test]
    fn color_triple_rejects_wrong_arity() {
        assert_eq!(parse_color_triple("(1,0)"), None);
        assert_eq!(parse_color_triple("(1,0,0,1)"), None);
    }

    #[test]
    fn color_triple_rejects_garbage() {
        assert_eq!(parse_color_triple("(a,0,0)"), None);
        assert_eq!(parse_color_triple("1,0,0"), None);
        assert_eq!(parse_color_triple("(1..0,0,0)"), None);
        assert_eq!(parse_color_triple("(.,0,0)"), None);
    }

    // ── tokens ────────────────────────────────────────────────────────────

    #[test]
    fn plain_text_is_chars() {
        assert_eq!(lex("ab"), vec![Token::Char('a'), Token::Char('b')]);
    }

    #[test]
    fn open_and_close() {
        assert_eq!(
            lex("<fx_w>x</fx_w>"),
            vec![
                Token::Open(Tag { name: TagName::Wave, color: None }),
                Token::Char('x'),
                Token::Close(TagName::Wave),
            ]
        );
    }

    #[test]
    fn unterminated_tag_becomes_text() {
        let (tokens, diags) = Lexer::new("a<b").tokenize();
        assert_eq!(tokens.len(), 3);
        assert_eq!(diags[0].kind, MarkupErrorKind::UnterminatedTag);
        assert_eq!(diags[0].col, 2);
    }

    #[test]
    fn argument_on_plain_tag_is_rejected() {
        let (tokens, diags) = Lexer::new("<b=(1,1,1)>").tokenize();
        assert!(tokens.iter().all(|t| matches!(t.token, Token::Char(_))));
        assert!(matches!(diags[0].kind, MarkupErrorKind::BadArgument(_)));
    }
}
