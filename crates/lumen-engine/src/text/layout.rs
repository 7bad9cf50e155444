//! Line breaking and alignment.
//!
//! Works on pre-measured advances so it never touches a font; see
//! [`GlyphMeasure`](super::GlyphMeasure) for where advances come from.

use std::ops::Range;

use crate::coords::Vector2f;

const EPSILON: f32 = 1e-4;

/// Where lines may break.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum WrapMode {
    /// Break at whitespace; a word wider than the line overflows alone.
    #[default]
    Word,
    /// Break between any two glyphs.
    Character,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Alignment {
    #[default]
    Left,
    Right,
    Center,
    /// Stretch every line but the last of each paragraph to the full width.
    Justify,
}

/// One glyph as the layout sees it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayoutItem {
    pub ch: char,
    pub advance: f32,
    /// Never drawn and takes no space; justification skips it.
    pub hidden: bool,
}

impl LayoutItem {
    #[inline]
    pub fn new(ch: char, advance: f32) -> Self {
        Self { ch, advance, hidden: false }
    }

    /// A zero-width marker, such as a scroll pause.
    #[inline]
    pub fn hidden(ch: char) -> Self {
        Self { ch, advance: 0.0, hidden: true }
    }

    #[inline]
    fn is_space(self) -> bool {
        self.ch.is_whitespace()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayoutParams {
    /// `None` never wraps.
    pub max_width: Option<f32>,
    pub wrap: WrapMode,
    pub alignment: Alignment,
    pub line_height: f32,
    /// Extra pixels between lines; may be negative.
    pub line_spacing: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            max_width: None,
            wrap: WrapMode::Word,
            alignment: Alignment::Left,
            line_height: 0.0,
            line_spacing: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Glyph indices on this line, trailing whitespace and `\n` included.
    pub range: Range<usize>,
    /// Width without trailing whitespace.
    pub width: f32,
    /// Last line of its paragraph (followed by `\n` or end of text).
    pub ends_paragraph: bool,
}

/// Result of laying out a run of glyphs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLayout {
    /// Top-left of each glyph's cell, relative to the text origin.
    pub positions: Vec<Vector2f>,
    pub lines: Vec<Line>,
    pub size: Vector2f,
}

impl TextLayout {
    pub fn line_of(&self, index: usize) -> Option<usize> {
        self.lines.iter().position(|l| l.range.contains(&index))
    }
}

pub fn layout(items: &[LayoutItem], params: &LayoutParams) -> TextLayout {
    let lines = break_lines(items, params);

    let widest = lines.iter().map(|l| l.width).fold(0.0, f32::max);
    let box_width = params.max_width.unwrap_or(widest);
    let pitch = params.line_height + params.line_spacing;

    let mut positions = vec![Vector2f::zero(); items.len()];
    for (row, line) in lines.iter().enumerate() {
        let y = row as f32 * pitch;
        let slack = (box_width - line.width).max(0.0);

        // non-hidden glyphs up to and including the last drawn one
        let content = line
            .range
            .clone()
            .rev()
            .find(|&i| !items[i].is_space() && !items[i].hidden)
            .map_or(0, |last| items[line.range.start..=last].iter().filter(|g| !g.hidden).count());

        let (offset, gap) = match params.alignment {
            Alignment::Left => (0.0, 0.0),
            Alignment::Right => (slack, 0.0),
            Alignment::Center => (slack * 0.5, 0.0),
            Alignment::Justify if !line.ends_paragraph && content >= 2 => {
                (0.0, slack / (content - 1) as f32)
            }
            Alignment::Justify => (0.0, 0.0),
        };

        let mut pen = offset;
        // hidden items share the slot of the glyph after them
        let mut slot = 0usize;
        for idx in line.range.clone() {
            let spread = gap * slot.min(content.saturating_sub(1)) as f32;
            positions[idx] = Vector2f::new(pen + spread, y);
            pen += items[idx].advance;
            if !items[idx].hidden {
                slot += 1;
            }
        }
    }

    let height = match lines.len() {
        0 => 0.0,
        n => (n as f32 * params.line_height + (n - 1) as f32 * params.line_spacing).max(0.0),
    };

    TextLayout {
        positions,
        lines,
        size: Vector2f::new(box_width.max(widest), height),
    }
}

fn break_lines(items: &[LayoutItem], params: &LayoutParams) -> Vec<Line> {
    let max = params.max_width.unwrap_or(f32::INFINITY);
    let mut lines = Vec::new();

    let mut start = 0;
    let mut pen = 0.0f32;
    let mut width = 0.0f32;
    let mut has_content = false;

    let mut i = 0;
    while i < items.len() {
        let item = items[i];

        if item.ch == '\n' {
            lines.push(Line { range: start..i + 1, width, ends_paragraph: true });
            start = i + 1;
            pen = 0.0;
            width = 0.0;
            has_content = false;
            i += 1;
            continue;
        }

        if item.hidden {
            i += 1;
            continue;
        }

        if item.is_space() {
            pen += item.advance;
            i += 1;
            continue;
        }

        let end = match params.wrap {
            WrapMode::Word => items[i..]
                .iter()
                .position(|g| g.is_space())
                .map_or(items.len(), |n| i + n),
            WrapMode::Character => i + 1,
        };
        let unit: f32 = items[i..end].iter().map(|g| g.advance).sum();

        if has_content && pen + unit > max + EPSILON {
            lines.push(Line { range: start..i, width, ends_paragraph: false });
            start = i;
            pen = 0.0;
        }

        pen += unit;
        width = pen;
        has_content = true;
        i = end;
    }

    if start < items.len() || items.last().is_some_and(|g| g.ch == '\n') {
        lines.push(Line { range: start..items.len(), width, ends_paragraph: true });
    }
    lines
}
