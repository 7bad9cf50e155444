//! Marked-up text: layout, effects and scroll reveal.

mod animation;
mod font;
mod glyph;
pub(crate) mod glyph_cache;
mod layout;
mod text_block;

pub use animation::{EffectClock, EffectConfig, ScrollConfig, ScrollReveal};
pub use font::{FontCache, FontFamily, FontId, FontLoadError, FontVariant, GlyphMeasure};
pub use glyph::{Glyph, RevealState};
pub use layout::{layout, Alignment, LayoutItem, LayoutParams, Line, TextLayout, WrapMode};
pub use text_block::{Text, TextStyle};
