/// Recognised tag names.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TagName {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Shake,
    Wave,
    Rainbow,
    Color,
    Background,
}

impl TagName {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "b" => TagName::Bold,
            "i" => TagName::Italic,
            "u" => TagName::Underline,
            "s" => TagName::Strikethrough,
            "fx_s" => TagName::Shake,
            "fx_w" => TagName::Wave,
            "fx_r" => TagName::Rainbow,
            "col" => TagName::Color,
            "col_bg" => TagName::Background,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TagName::Bold => "b",
            TagName::Italic => "i",
            TagName::Underline => "u",
            TagName::Strikethrough => "s",
            TagName::Shake => "fx_s",
            TagName::Wave => "fx_w",
            TagName::Rainbow => "fx_r",
            TagName::Color => "col",
            TagName::Background => "col_bg",
        }
    }

    /// Colour tags require a `=(r,g,b)` argument; every other tag rejects one.
    #[inline]
    pub fn takes_color(self) -> bool {
        matches!(self, TagName::Color | TagName::Background)
    }
}

/// Opening tag with its optional colour argument.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tag {
    pub name: TagName,
    pub color: Option<[f32; 3]>,
}

/// Union of every style active at one character.
///
/// Colours are raw `(r, g, b)` triples exactly as written in the markup;
/// the innermost open colour tag wins.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub shake: bool,
    pub wave: bool,
    pub rainbow: bool,
    pub color: Option<[f32; 3]>,
    pub background: Option<[f32; 3]>,
}

impl Style {
    /// Folds the open-tag stack (outermost first) into a style.
    pub(crate) fn from_stack(stack: &[(Tag, usize)]) -> Self {
        let mut style = Style::default();
        for (tag, _) in stack {
            match tag.name {
                TagName::Bold => style.bold = true,
                TagName::Italic => style.italic = true,
                TagName::Underline => style.underline = true,
                TagName::Strikethrough => style.strikethrough = true,
                TagName::Shake => style.shake = true,
                TagName::Wave => style.wave = true,
                TagName::Rainbow => style.rainbow = true,
                TagName::Color => style.color = tag.color,
                TagName::Background => style.background = tag.color,
            }
        }
        style
    }

    /// True when any time-based effect is active.
    #[inline]
    pub fn is_animated(&self) -> bool {
        self.shake || self.wave || self.rainbow
    }
}
