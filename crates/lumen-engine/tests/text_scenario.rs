use lumen_engine::coords::Vector2f;
use lumen_engine::paint::Rgba;
use lumen_engine::text::{
    Alignment, FontVariant, GlyphMeasure, RevealState, ScrollConfig, Text, TextStyle,
};

/// Every glyph half an em wide, one em per line.
struct HalfEm;

impl GlyphMeasure for HalfEm {
    fn advance(&self, _: char, _: FontVariant, size: f32) -> f32 {
        size * 0.5
    }
    fn line_height(&self, size: f32) -> f32 {
        size
    }
    fn ascent(&self, size: f32) -> f32 {
        size * 0.8
    }
}

fn styled(style: TextStyle, src: &str) -> Text {
    let mut t = Text::new(style);
    t.set_text(src);
    t.relayout(&HalfEm);
    t
}

fn shown(t: &Text) -> String {
    t.glyphs().iter().filter(|g| g.is_visible()).map(|g| g.ch).collect()
}

// ── markup ────────────────────────────────────────────────────────────────

#[test]
fn markup_styles_reach_glyphs() {
    let base = Rgba::new(1.0, 1.0, 1.0, 0.5);
    let t = styled(
        TextStyle { color: base, ..TextStyle::default() },
        "<b>Hi</b> <col=(1,0,0)>there</col>",
    );

    let g = t.glyphs();
    assert_eq!(g.len(), 8);
    assert!(g[0].style.bold && g[1].style.bold);
    assert_eq!(g[0].variant, FontVariant::Bold);
    assert_eq!(g[2].variant, FontVariant::Regular);
    assert_eq!(g[2].color, base);
    for glyph in &g[3..] {
        assert_eq!(glyph.color, Rgba::new(1.0, 0.0, 0.0, 0.5));
    }
}

#[test]
fn malformed_markup_stays_readable() {
    let t = styled(TextStyle::default(), "a <blink>b");
    let plain: String = t.glyphs().iter().map(|g| g.ch).collect();
    assert_eq!(plain, "a <blink>b");
}

// ── layout ────────────────────────────────────────────────────────────────

#[test]
fn right_and_center_alignment() {
    let style = |alignment| TextStyle {
        size: 10.0,
        max_width: Some(30.0),
        alignment,
        ..TextStyle::default()
    };

    let right = styled(style(Alignment::Right), "ab");
    assert_eq!(right.glyphs()[0].position, Vector2f::new(20.0, 0.0));

    let center = styled(style(Alignment::Center), "ab");
    assert_eq!(center.glyphs()[0].position, Vector2f::new(10.0, 0.0));
    assert_eq!(center.size(), Vector2f::new(30.0, 10.0));
}

#[test]
fn newlines_start_paragraphs() {
    let t = styled(
        TextStyle { size: 10.0, line_spacing: 2.0, ..TextStyle::default() },
        "ab\ncd",
    );
    assert_eq!(t.lines().len(), 2);
    assert!(t.lines()[0].ends_paragraph);
    assert_eq!(t.glyphs()[3].position, Vector2f::new(0.0, 12.0));
    assert_eq!(t.size().y, 22.0);
}

// ── scroll reveal ─────────────────────────────────────────────────────────

#[test]
fn reveal_pauses_after_full_stop() {
    let mut t = styled(TextStyle::default(), "a.b");
    t.set_scrolling(Some(ScrollConfig {
        rate: 1.0,
        pause_multiplier: 2,
        ..ScrollConfig::default()
    }));
    assert_eq!(shown(&t), "");

    t.update(1.0);
    assert_eq!(shown(&t), "a");
    t.update(1.0);
    assert_eq!(shown(&t), "a.");
    assert_eq!(t.glyphs()[2].reveal, RevealState::Revealing);

    t.update(2.0);
    assert_eq!(shown(&t), "a.");
    t.update(1.0);
    assert_eq!(shown(&t), "a.b");
    assert!(t.is_fully_revealed());
}

#[test]
fn restyling_keeps_reveal_progress() {
    let mut t = styled(TextStyle::default(), "abc");
    t.set_scrolling(Some(ScrollConfig { rate: 1.0, ..ScrollConfig::default() }));
    t.update(1.0);
    t.set_style(TextStyle { color: Rgba::BLACK, ..TextStyle::default() });
    assert_eq!(shown(&t), "a");
    assert_eq!(t.glyphs()[0].color, Rgba::BLACK);
}
