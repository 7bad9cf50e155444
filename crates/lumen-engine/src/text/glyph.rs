use lumen_markup::Style;

use crate::coords::Vector2f;
use crate::paint::Rgba;
use crate::render::Shape;

use super::font::FontVariant;

/// Where a glyph is in the scroll-reveal sequence. Only moves forward.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd)]
pub enum RevealState {
    Hidden,
    /// Next in line to be revealed.
    Revealing,
    #[default]
    Visible,
}

impl RevealState {
    /// Moves to `next` unless that would go backwards.
    #[inline]
    pub fn advance_to(&mut self, next: RevealState) {
        if next > *self {
            *self = next;
        }
    }
}

/// GPU quads of one glyph, built on first draw after a layout.
#[derive(Debug, Default)]
pub(crate) struct GlyphQuads {
    pub built: bool,
    pub background: Option<Shape>,
    pub body: Option<Shape>,
    /// Underline and strikethrough bars.
    pub lines: Vec<Shape>,
}

/// One character of a [`Text`](super::Text), identified by its index.
#[derive(Debug)]
pub struct Glyph {
    pub ch: char,
    pub style: Style,
    pub color: Rgba,
    pub background: Option<Rgba>,
    pub variant: FontVariant,
    /// Top-left of the glyph's cell in text-local pixels.
    pub position: Vector2f,
    pub advance: f32,
    pub reveal: RevealState,
    pub(crate) quads: GlyphQuads,
}

impl Glyph {
    /// Markup colours take the base colour's alpha.
    pub fn new(ch: char, style: Style, base: Rgba) -> Self {
        let tint = |[r, g, b]: [f32; 3]| Rgba::new(r, g, b, base.a);
        Self {
            ch,
            style,
            color: style.color.map_or(base, tint),
            background: style.background.map(tint),
            variant: FontVariant::for_style(style.bold, style.italic),
            position: Vector2f::zero(),
            advance: 0.0,
            reveal: RevealState::Visible,
            quads: GlyphQuads::default(),
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.reveal == RevealState::Visible
    }
}
