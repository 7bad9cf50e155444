//! Lexer and parser for **Lumen text markup**.
//!
//! This crate is intentionally dependency-free so it can be used by tools
//! that only need to validate or strip markup, without pulling in the GPU
//! engine.
//!
//! # Grammar
//!
//! | Markup | Effect |
//! |--------|--------|
//! | `<b>` `<i>` `<u>` `<s>` | bold, italic, underline, strikethrough |
//! | `<fx_s>` `<fx_w>` `<fx_r>` | shake, wave, rainbow effects |
//! | `<col=(r,g,b)>` | foreground colour |
//! | `<col_bg=(r,g,b)>` | background colour |
//!
//! Every tag is closed with `</name>`. Tags nest freely; each character
//! carries the union of all tags open at its position.
//!
//! # Recovery
//!
//! - `<` with no closing `>`: the rest of the input is literal text.
//! - unknown tag or malformed argument: the whole `<...>` is literal text.
//! - `</name>` with nothing to close: dropped.
//! - tag left open: applies to the end of the input.
//!
//! Each case is recorded in [`Markup::diagnostics`].
//!
//! # Quick start
//!
//! ```rust
//! use lumen_markup::parse;
//!
//! let markup = parse("<b>Hi</b> <col=(1,0,0)>there</col>");
//! assert_eq!(markup.plain_text(), "Hi there");
//! assert!(markup.chars[0].style.bold);
//! assert_eq!(markup.chars[3].style.color, Some([1.0, 0.0, 0.0]));
//! ```

pub mod error;
pub mod lexer;
pub mod parser;
pub mod style;

pub use error::{MarkupError, MarkupErrorKind};
pub use parser::{parse, parse_strict, Markup, StyledChar};
pub use style::{Style, Tag, TagName};

#[cfg(test)]
mod parse_tests {
    use super::*;

    fn ok(src: &str) -> Markup { parse_strict(src).unwrap() }
    fn err(src: &str) -> MarkupError { parse_strict(src).unwrap_err() }

    #[test] fn empty_input() { assert!(ok("").chars.is_empty()); }
    #[test] fn plain_text() { assert_eq!(ok("hello").plain_text(), "hello"); }
    #[test] fn every_style_tag() { ok("<b>a</b><i>b</i><u>c</u><s>d</s>"); }
    #[test] fn every_effect_tag() { ok("<fx_s>a</fx_s><fx_w>b</fx_w><fx_r>c</fx_r>"); }
    #[test] fn background_tag() { ok("<col_bg=(0,0,0.5)>x</col_bg>"); }
    #[test] fn tags_produce_no_chars() { assert_eq!(ok("<b></b><u></u>").chars.len(), 0); }
    #[test] fn err_unknown_tag() { err("<blink>x</blink>"); }
    #[test] fn err_unterminated() { err("abc <b"); }
    #[test] fn err_unmatched_close() { err("x</b>"); }
    #[test] fn err_unclosed() { err("<i>x"); }
    #[test] fn err_color_without_argument() { err("<col>x</col>"); }

    #[test]
    fn end_to_end_styles() {
        let m = ok("<b>Hi</b> <col=(1,0,0)>there</col>");
        assert_eq!(m.chars.len(), 8);
        assert!(m.chars[0].style.bold && m.chars[1].style.bold);
        assert!(!m.chars[2].style.bold);
        assert_eq!(m.chars[2].style.color, None);
        for c in &m.chars[3..] {
            assert_eq!(c.style.color, Some([1.0, 0.0, 0.0]));
            assert!(!c.style.bold);
        }
    }

    #[test]
    fn nested_styles_union() {
        let m = ok("<b><col=(0,1,0)><fx_s>x</fx_s></col></b>");
        let s = m.chars[0].style;
        assert!(s.bold && s.shake);
        assert_eq!(s.color, Some([0.0, 1.0, 0.0]));
    }

    #[test]
    fn innermost_color_wins_and_outer_resumes() {
        let m = ok("<col=(1,0,0)>a<col=(0,0,1)>b</col>c</col>");
        assert_eq!(m.chars[0].style.color, Some([1.0, 0.0, 0.0]));
        assert_eq!(m.chars[1].style.color, Some([0.0, 0.0, 1.0]));
        assert_eq!(m.chars[2].style.color, Some([1.0, 0.0, 0.0]));
    }

    #[test]
    fn crossed_nesting_resolves() {
        let m = ok("<b><i>a</b>b</i>");
        assert!(m.chars[0].style.bold && m.chars[0].style.italic);
        assert!(!m.chars[1].style.bold && m.chars[1].style.italic);
    }

    #[test]
    fn unterminated_tag_keeps_active_styles() {
        let m = parse("<u>a<b");
        assert_eq!(m.plain_text(), "a<b");
        assert!(m.chars.iter().all(|c| c.style.underline));
        assert_eq!(m.diagnostics.len(), 2); // unterminated + unclosed <u>
    }

    #[test]
    fn unknown_tag_is_literal() {
        let m = parse("<wobble>x");
        assert_eq!(m.plain_text(), "<wobble>x");
        assert_eq!(m.diagnostics[0].kind, MarkupErrorKind::UnknownTag("wobble".into()));
    }

    #[test]
    fn unclosed_tag_runs_to_end() {
        let m = parse("a<fx_w>bc");
        assert!(!m.chars[0].style.wave);
        assert!(m.chars[1].style.wave && m.chars[2].style.wave);
        assert_eq!(m.diagnostics[0].kind, MarkupErrorKind::Unclosed("fx_w".into()));
        assert_eq!(m.diagnostics[0].col, 2);
    }

    #[test]
    fn columns_point_at_source() {
        let m = ok("<b>ab</b>");
        assert_eq!(m.chars[0].col, 4);
        assert_eq!(m.chars[1].col, 5);
    }
}
