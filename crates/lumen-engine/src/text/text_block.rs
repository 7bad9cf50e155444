use crate::coords::{Rectangle, Vector2f};
use crate::paint::{Hsva, Rgba};
use crate::render::{Canvas, RenderTarget, Renderable, Shader, Shape};
use crate::transform::Transform;

use super::animation::{EffectClock, EffectConfig, ScrollConfig, ScrollReveal};
use super::font::{FontFamily, FontId, GlyphMeasure};
use super::glyph::{Glyph, GlyphQuads, RevealState};
use super::layout::{layout, Alignment, LayoutItem, LayoutParams, Line, WrapMode};

/// How a [`Text`] is set.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: FontId,
    /// Pixel size.
    pub size: f32,
    /// Colour of glyphs without a `col` tag.
    pub color: Rgba,
    pub wrap: WrapMode,
    pub alignment: Alignment,
    /// Wrap width in pixels; `None` never wraps.
    pub max_width: Option<f32>,
    /// Extra pixels between lines; may be negative.
    pub line_spacing: f32,
    pub effects: EffectConfig,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: FontId::from("default"),
            size: 24.0,
            color: Rgba::WHITE,
            wrap: WrapMode::Word,
            alignment: Alignment::Left,
            max_width: None,
            line_spacing: 0.0,
            effects: EffectConfig::default(),
        }
    }
}

/// A block of marked-up text with per-glyph effects and optional
/// scroll reveal.
///
/// Layout happens on the first draw after a change, using the font
/// registered under [`TextStyle::font`] in the graphics context;
/// [`relayout`](Self::relayout) runs it eagerly against any
/// [`GlyphMeasure`].
#[derive(Debug)]
pub struct Text {
    style: TextStyle,
    position: Vector2f,
    source: String,

    glyphs: Vec<Glyph>,
    lines: Vec<Line>,
    size: Vector2f,
    line_height: f32,
    ascent: f32,
    layout_dirty: bool,
    /// Font generation the layout was measured against.
    font_generation: u64,

    effects: EffectClock,
    scroll_config: Option<ScrollConfig>,
    scroll: Option<ScrollReveal>,

    warned_font: bool,
    warned_fallback: bool,
}

impl Default for Text {
    fn default() -> Self {
        Self::new(TextStyle::default())
    }
}

impl Text {
    pub fn new(style: TextStyle) -> Self {
        Self {
            style,
            position: Vector2f::zero(),
            source: String::new(),
            glyphs: Vec::new(),
            lines: Vec::new(),
            size: Vector2f::zero(),
            line_height: 0.0,
            ascent: 0.0,
            layout_dirty: true,
            font_generation: 0,
            effects: EffectClock::default(),
            scroll_config: None,
            scroll: None,
            warned_font: false,
            warned_fallback: false,
        }
    }

    /// Replaces the content. Discards every glyph and all animation state;
    /// with scrolling enabled the reveal starts over.
    pub fn set_text(&mut self, source: &str) {
        let markup = lumen_markup::parse(source);
        for diagnostic in &markup.diagnostics {
            log::warn!("text {source:?}: {diagnostic}");
        }

        let base = self.style.color;
        self.glyphs = markup
            .chars
            .iter()
            .map(|c| Glyph::new(c.ch, c.style, base))
            .collect();
        self.source = source.to_string();
        self.effects = EffectClock::default();
        self.layout_dirty = true;
        self.restart_reveal();
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    #[inline]
    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Changes the style, keeping the content and reveal progress.
    pub fn set_style(&mut self, style: TextStyle) {
        self.style = style;
        let base = self.style.color;
        for g in &mut self.glyphs {
            let reveal = g.reveal;
            *g = Glyph::new(g.ch, g.style, base);
            g.reveal = reveal;
        }
        self.layout_dirty = true;
    }

    /// Top-left corner in target pixels.
    pub fn set_position(&mut self, position: Vector2f) {
        self.position = position;
    }

    #[inline]
    pub fn position(&self) -> Vector2f {
        self.position
    }

    /// Laid-out size in pixels; zero until the first layout.
    #[inline]
    pub fn size(&self) -> Vector2f {
        self.size
    }

    #[inline]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    // ── animation ─────────────────────────────────────────────────────────

    /// Advances effects and scroll reveal by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.effects.advance(dt, &self.style.effects);

        let Some(scroll) = &mut self.scroll else {
            return;
        };
        let glyphs = &mut self.glyphs;
        scroll.advance(dt, |i| {
            if let Some(g) = glyphs.get_mut(i) {
                g.reveal.advance_to(RevealState::Visible);
            }
        });
        if let Some(g) = scroll.head().and_then(|i| glyphs.get_mut(i)) {
            g.reveal.advance_to(RevealState::Revealing);
        }
    }

    /// `Some` hides every glyph and reveals them over time; `None` shows
    /// everything at once.
    pub fn set_scrolling(&mut self, config: Option<ScrollConfig>) {
        if self.scroll_config.map(|c| c.pause_marker) != config.map(|c| c.pause_marker) {
            self.layout_dirty = true;
        }
        self.scroll_config = config;
        self.restart_reveal();
    }

    pub fn skip_reveal(&mut self) {
        if let Some(scroll) = &mut self.scroll {
            let glyphs = &mut self.glyphs;
            scroll.skip(|i| {
                if let Some(g) = glyphs.get_mut(i) {
                    g.reveal.advance_to(RevealState::Visible);
                }
            });
        }
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.scroll.as_ref().map_or(true, ScrollReveal::is_done)
    }

    fn restart_reveal(&mut self) {
        match self.scroll_config {
            Some(config) => {
                for g in &mut self.glyphs {
                    g.reveal = RevealState::Hidden;
                }
                let scroll = ScrollReveal::new(config, self.glyphs.iter().map(|g| g.ch).enumerate());
                if let Some(g) = scroll.head().and_then(|i| self.glyphs.get_mut(i)) {
                    g.reveal = RevealState::Revealing;
                }
                self.scroll = Some(scroll);
            }
            None => {
                for g in &mut self.glyphs {
                    g.reveal = RevealState::Visible;
                }
                self.scroll = None;
            }
        }
    }

    // ── layout ────────────────────────────────────────────────────────────

    fn pause_marker(&self) -> Option<char> {
        self.scroll_config.map(|c| c.pause_marker)
    }

    fn is_drawn(&self, glyph: &Glyph) -> bool {
        !glyph.ch.is_whitespace() && Some(glyph.ch) != self.pause_marker()
    }

    /// Measures and positions every glyph.
    pub fn relayout(&mut self, measure: &dyn GlyphMeasure) {
        let size = self.style.size;
        let marker = self.pause_marker();
        let items: Vec<LayoutItem> = self
            .glyphs
            .iter()
            .map(|g| {
                if Some(g.ch) == marker {
                    LayoutItem::hidden(g.ch)
                } else if g.ch == '\n' {
                    LayoutItem::new(g.ch, 0.0)
                } else {
                    LayoutItem::new(g.ch, measure.advance(g.ch, g.variant, size))
                }
            })
            .collect();

        self.line_height = measure.line_height(size);
        self.ascent = measure.ascent(size);
        let params = LayoutParams {
            max_width: self.style.max_width,
            wrap: self.style.wrap,
            alignment: self.style.alignment,
            line_height: self.line_height,
            line_spacing: self.style.line_spacing,
        };
        let laid_out = layout(&items, &params);

        for ((g, item), position) in self.glyphs.iter_mut().zip(&items).zip(&laid_out.positions) {
            g.advance = item.advance;
            g.position = *position;
            g.quads = GlyphQuads::default();
        }
        self.lines = laid_out.lines;
        self.size = laid_out.size;
        self.layout_dirty = false;
    }

    fn note_fallbacks(&mut self, family: &FontFamily) {
        if self.warned_fallback {
            return;
        }
        if let Some(g) = self.glyphs.iter().find(|g| !family.has_variant(g.variant)) {
            log::debug!(
                "font {}: no {} face, falling back to Regular",
                self.style.font,
                g.variant.suffix()
            );
            self.warned_fallback = true;
        }
    }

    // ── drawing ───────────────────────────────────────────────────────────

    fn build_quads(&mut self, index: usize, canvas: &mut Canvas<'_>) {
        let ctx = canvas.ctx();
        let font = self.style.font.clone();
        let size = self.style.size;
        let (ascent, line_height) = (self.ascent, self.line_height);
        let drawn = self.is_drawn(&self.glyphs[index]);
        let marker = self.pause_marker();

        let raster = if drawn {
            let g = &self.glyphs[index];
            canvas.graphics().glyph(&ctx, &font, g.variant, g.ch, size)
        } else {
            None
        };

        let g = &mut self.glyphs[index];
        let cell = decoration_rects(g.position, g.advance, ascent, line_height, size);
        let mut quads = GlyphQuads { built: true, ..Default::default() };

        if let Some(bg) = g.background.filter(|_| g.ch != '\n') {
            let mut shape = Shape::new();
            shape.as_rectangle(cell.background).set_color(bg);
            quads.background = Some(shape);
        }

        // body and bars stay white; the glyph colour is applied as a tint
        if let Some(raster) = raster {
            if let Some(texture) = raster.texture {
                let top = g.position.y + ascent - raster.offset.y - raster.size.y;
                let mut shape = Shape::new();
                shape
                    .as_rectangle(Rectangle::new(g.position.x + raster.offset.x, top, raster.size.x, raster.size.y))
                    .set_texture(Some(texture));
                quads.body = Some(shape);
            }
        }

        if g.ch != '\n' && Some(g.ch) != marker {
            let bars = [(g.style.underline, cell.underline), (g.style.strikethrough, cell.strikethrough)];
            for (_, rect) in bars.into_iter().filter(|(on, _)| *on) {
                let mut shape = Shape::new();
                shape.as_rectangle(rect);
                quads.lines.push(shape);
            }
        }
        g.quads = quads;
    }
}

/// Cell-relative rectangles of one glyph, in text pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Decorations {
    /// The whole line-height cell behind the glyph.
    background: Rectangle,
    /// Just under the baseline.
    underline: Rectangle,
    /// Through the middle of lowercase letters.
    strikethrough: Rectangle,
}

fn decoration_rects(position: Vector2f, advance: f32, ascent: f32, line_height: f32, size: f32) -> Decorations {
    let bar = (size / 16.0).max(1.0);
    Decorations {
        background: Rectangle::new(position.x, position.y, advance, line_height),
        underline: Rectangle::new(position.x, position.y + ascent + bar, advance, bar),
        strikethrough: Rectangle::new(position.x, position.y + ascent * 0.65 - bar * 0.5, advance, bar),
    }
}

fn effect_offset(clock: &EffectClock, config: &EffectConfig, index: usize, glyph: &Glyph) -> Vector2f {
    let mut offset = Vector2f::zero();
    if glyph.style.shake {
        offset += clock.shake_offset(index, config);
    }
    if glyph.style.wave {
        offset.y += clock.wave_offset(index, config);
    }
    offset
}

fn effect_color(clock: &EffectClock, config: &EffectConfig, index: usize, glyph: &Glyph) -> Rgba {
    if glyph.style.rainbow {
        Hsva::new(clock.rainbow_hue(index, config), 1.0, 1.0, glyph.color.a).to_rgba()
    } else {
        glyph.color
    }
}

impl Renderable for Text {
    fn render(&mut self, canvas: &mut Canvas<'_>, transform: &Transform, shader: Option<&Shader>) {
        if self.glyphs.is_empty() {
            return;
        }

        let generation = canvas.graphics().font_generation(&self.style.font);
        if self.layout_dirty || generation != self.font_generation {
            let family = match canvas.graphics().fonts().get(&self.style.font) {
                Ok(family) => family,
                Err(e) => {
                    if !self.warned_font {
                        log::warn!("text not drawn: {e}");
                        self.warned_font = true;
                    }
                    return;
                }
            };
            self.relayout(family);
            self.note_fallbacks(family);
            self.font_generation = generation;
        }

        let target = canvas.size();
        if target.x <= 0.0 || target.y <= 0.0 {
            return;
        }
        // text pixels -> target-local [0, 1]
        let local = Transform::identity()
            .translate(self.position)
            .scale(1.0 / target.x, 1.0 / target.y, Vector2f::zero());
        let base = transform.combine_with(&local);

        for i in 0..self.glyphs.len() {
            if self.glyphs[i].is_visible() && !self.glyphs[i].quads.built {
                self.build_quads(i, canvas);
            }
        }

        let (clock, config) = (self.effects, self.style.effects);
        let placed: Vec<(usize, Transform)> = self
            .glyphs
            .iter()
            .enumerate()
            .filter(|(_, g)| g.is_visible())
            .map(|(i, g)| {
                let offset = effect_offset(&clock, &config, i, g);
                (i, base.combine_with(&Transform::identity().translate(offset)))
            })
            .collect();

        for &(i, ref t) in &placed {
            if let Some(bg) = &mut self.glyphs[i].quads.background {
                bg.render(canvas, t, shader);
            }
        }

        let tints: Vec<Rgba> = placed
            .iter()
            .map(|&(i, _)| effect_color(&clock, &config, i, &self.glyphs[i]))
            .collect();

        for (&(i, ref t), &tint) in placed.iter().zip(&tints) {
            if let Some(body) = &mut self.glyphs[i].quads.body {
                body.render_tinted(canvas, t, shader, tint);
            }
        }

        for (&(i, ref t), &tint) in placed.iter().zip(&tints) {
            for bar in &mut self.glyphs[i].quads.lines {
                bar.render_tinted(canvas, t, shader, tint);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GraphicsContext;
    use crate::text::FontVariant;

    /// Every glyph `size / 2` wide, lines `size` tall.
    struct HalfEm;

    impl GlyphMeasure for HalfEm {
        fn advance(&self, _: char, _: FontVariant, size: f32) -> f32 { size * 0.5 }
        fn line_height(&self, size: f32) -> f32 { size }
        fn ascent(&self, size: f32) -> f32 { size * 0.8 }
    }

    fn text(src: &str) -> Text {
        let mut t = Text::new(TextStyle { size: 10.0, ..TextStyle::default() });
        t.set_text(src);
        t
    }

    fn visible(t: &Text) -> usize {
        t.glyphs().iter().filter(|g| g.is_visible()).count()
    }

    // ── content ───────────────────────────────────────────────────────────

    #[test]
    fn set_text_strips_markup() {
        let t = text("<b>Hi</b> <col=(1,0,0)>there</col>");
        assert_eq!(t.glyphs().len(), 8);
        assert_eq!(t.text(), "<b>Hi</b> <col=(1,0,0)>there</col>");
        assert!(t.glyphs()[0].style.bold);
    }

    #[test]
    fn malformed_markup_still_yields_glyphs() {
        let t = text("a<b");
        assert_eq!(t.glyphs().len(), 3);
    }

    #[test]
    fn relayout_positions_glyphs() {
        let mut t = text("ab cd");
        t.relayout(&HalfEm);
        assert_eq!(t.glyphs()[1].position, Vector2f::new(5.0, 0.0));
        assert_eq!(t.size(), Vector2f::new(25.0, 10.0));
    }

    #[test]
    fn wraps_at_max_width() {
        let mut t = text("ab cd");
        t.set_style(TextStyle { size: 10.0, max_width: Some(12.0), ..TextStyle::default() });
        t.relayout(&HalfEm);
        assert_eq!(t.lines().len(), 2);
        assert_eq!(t.glyphs()[3].position, Vector2f::new(0.0, 10.0));
    }

    // ── scroll reveal ─────────────────────────────────────────────────────

    #[test]
    fn scrolling_hides_then_reveals() {
        let mut t = text("abcd");
        t.set_scrolling(Some(ScrollConfig { rate: 2.0, ..ScrollConfig::default() }));
        assert_eq!(visible(&t), 0);
        assert_eq!(t.glyphs()[0].reveal, RevealState::Revealing);

        t.update(1.0);
        assert_eq!(visible(&t), 2);
        assert_eq!(t.glyphs()[2].reveal, RevealState::Revealing);
        assert!(!t.is_fully_revealed());

        t.skip_reveal();
        assert_eq!(visible(&t), 4);
        assert!(t.is_fully_revealed());
    }

    #[test]
    fn set_text_restarts_reveal() {
        let mut t = text("ab");
        t.set_scrolling(Some(ScrollConfig::default()));
        t.skip_reveal();
        t.set_text("xyz");
        assert_eq!(visible(&t), 0);
        t.set_scrolling(None);
        assert_eq!(visible(&t), 3);
    }

    #[test]
    fn pause_marker_is_zero_width_while_scrolling() {
        let mut t = text("a|b");
        t.set_scrolling(Some(ScrollConfig::default()));
        t.relayout(&HalfEm);
        assert_eq!(t.glyphs()[1].advance, 0.0);
        assert_eq!(t.glyphs()[2].position.x, 5.0);
        assert!(!t.is_drawn(&t.glyphs()[1]));
    }

    #[test]
    fn justified_line_ignores_pause_marker() {
        let mut t = text("ab.| cd");
        t.set_style(TextStyle {
            size: 10.0,
            max_width: Some(20.0),
            alignment: Alignment::Justify,
            ..TextStyle::default()
        });
        t.set_scrolling(Some(ScrollConfig::default()));
        t.relayout(&HalfEm);

        assert_eq!(t.lines().len(), 2);
        let dot = &t.glyphs()[2];
        assert!((dot.position.x + dot.advance - 20.0).abs() < 1e-4, "right edge {}", dot.position.x + dot.advance);
        assert!((t.glyphs()[1].position.x - 7.5).abs() < 1e-4);
    }

    // ── decorations ───────────────────────────────────────────────────────

    #[test]
    fn decoration_rects_sit_in_the_cell() {
        let d = decoration_rects(Vector2f::new(4.0, 20.0), 6.0, 8.0, 12.0, 32.0);
        // bar is size / 16
        assert_eq!(d.background, Rectangle::new(4.0, 20.0, 6.0, 12.0));
        assert_eq!(d.underline, Rectangle::new(4.0, 30.0, 6.0, 2.0));
        assert_eq!(d.strikethrough.size, Vector2f::new(6.0, 2.0));
        assert!((d.strikethrough.top_left.y - 24.2).abs() < 1e-4);
    }

    #[test]
    fn decoration_bars_are_at_least_one_pixel() {
        let d = decoration_rects(Vector2f::zero(), 5.0, 8.0, 10.0, 10.0);
        assert_eq!(d.underline.size.y, 1.0);
        assert_eq!(d.underline.top_left.y, 9.0);
        assert_eq!(d.strikethrough.size.y, 1.0);
    }

    // ── fonts ─────────────────────────────────────────────────────────────

    #[test]
    fn font_generation_starts_at_zero() {
        let t = text("a");
        assert_eq!(t.font_generation, GraphicsContext::new().font_generation(&t.style().font));
    }

    // ── effects ───────────────────────────────────────────────────────────

    #[test]
    fn only_flagged_glyphs_move() {
        let mut t = text("a<fx_w>b</fx_w>");
        t.update(0.3);
        let cfg = t.style().effects;
        let still = effect_offset(&t.effects, &cfg, 0, &t.glyphs()[0]);
        let waving = effect_offset(&t.effects, &cfg, 1, &t.glyphs()[1]);
        assert_eq!(still, Vector2f::zero());
        assert!(waving.y != 0.0 && waving.x == 0.0);
    }

    #[test]
    fn rainbow_keeps_alpha() {
        let mut t = Text::new(TextStyle { color: Rgba::new(1.0, 1.0, 1.0, 0.25), ..TextStyle::default() });
        t.set_text("<fx_r>x</fx_r>");
        t.update(0.1);
        let c = effect_color(&t.effects, &t.style().effects, 0, &t.glyphs()[0]);
        assert_eq!(c.a, 0.25);
    }
}
