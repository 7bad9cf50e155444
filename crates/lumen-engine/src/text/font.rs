use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Error returned by font loading and lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Name a font family is registered under, e.g. `"NotoSans"`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub String);

impl From<&str> for FontId {
    fn from(id: &str) -> Self {
        FontId(id.to_string())
    }
}

impl fmt::Display for FontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the four faces of a family.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum FontVariant {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontVariant {
    pub fn for_style(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => FontVariant::Regular,
            (true, false) => FontVariant::Bold,
            (false, true) => FontVariant::Italic,
            (true, true) => FontVariant::BoldItalic,
        }
    }

    /// File name suffix: `<dir>/<id>-<suffix>.ttf`.
    pub fn suffix(self) -> &'static str {
        match self {
            FontVariant::Regular => "Regular",
            FontVariant::Bold => "Bold",
            FontVariant::Italic => "Italic",
            FontVariant::BoldItalic => "BoldItalic",
        }
    }

    const ALL: [FontVariant; 4] = [
        FontVariant::Regular,
        FontVariant::Bold,
        FontVariant::Italic,
        FontVariant::BoldItalic,
    ];
}

/// Horizontal metrics the layout engine needs.
pub trait GlyphMeasure {
    /// Pen advance of `ch` at `size` px.
    fn advance(&self, ch: char, variant: FontVariant, size: f32) -> f32;

    /// Baseline-to-baseline distance at `size` px.
    fn line_height(&self, size: f32) -> f32;

    /// Distance from the top of a line to its baseline.
    fn ascent(&self, size: f32) -> f32;
}

fn parse_font(bytes: &[u8], what: &str) -> Result<fontdue::Font, FontLoadError> {
    fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
        .map_err(|e| FontLoadError(format!("{what}: {e}")))
}

/// A regular face plus optional bold/italic faces.
pub struct FontFamily {
    regular: fontdue::Font,
    bold: Option<fontdue::Font>,
    italic: Option<fontdue::Font>,
    bold_italic: Option<fontdue::Font>,
}

impl fmt::Debug for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFamily")
            .field("bold", &self.bold.is_some())
            .field("italic", &self.italic.is_some())
            .field("bold_italic", &self.bold_italic.is_some())
            .finish()
    }
}

impl FontFamily {
    pub fn from_bytes(regular: &[u8]) -> Result<Self, FontLoadError> {
        Ok(Self {
            regular: parse_font(regular, "regular face")?,
            bold: None,
            italic: None,
            bold_italic: None,
        })
    }

    /// Adds or replaces a non-regular face.
    pub fn with_variant(mut self, variant: FontVariant, bytes: &[u8]) -> Result<Self, FontLoadError> {
        let font = parse_font(bytes, variant.suffix())?;
        match variant {
            FontVariant::Regular => self.regular = font,
            FontVariant::Bold => self.bold = Some(font),
            FontVariant::Italic => self.italic = Some(font),
            FontVariant::BoldItalic => self.bold_italic = Some(font),
        }
        Ok(self)
    }

    /// Reads `<dir>/<id>-Regular.ttf` and whichever of the bold, italic
    /// and bold-italic files exist.
    pub fn load_dir(dir: impl AsRef<Path>, id: &FontId) -> Result<Self, FontLoadError> {
        let dir = dir.as_ref();
        let path_of = |v: FontVariant| dir.join(format!("{}-{}.ttf", id.0, v.suffix()));

        let regular_path = path_of(FontVariant::Regular);
        let bytes = std::fs::read(&regular_path)
            .map_err(|e| FontLoadError(format!("{}: {e}", regular_path.display())))?;
        let mut family = Self::from_bytes(&bytes)?;

        for variant in &FontVariant::ALL[1..] {
            let path = path_of(*variant);
            if let Ok(bytes) = std::fs::read(&path) {
                family = family.with_variant(*variant, &bytes)?;
            } else {
                log::debug!("font {id}: no {} face at {}", variant.suffix(), path.display());
            }
        }
        Ok(family)
    }

    pub fn has_variant(&self, variant: FontVariant) -> bool {
        match variant {
            FontVariant::Regular => true,
            FontVariant::Bold => self.bold.is_some(),
            FontVariant::Italic => self.italic.is_some(),
            FontVariant::BoldItalic => self.bold_italic.is_some(),
        }
    }

    /// The requested face, or the regular one when it is missing.
    pub(crate) fn face(&self, variant: FontVariant) -> &fontdue::Font {
        let face = match variant {
            FontVariant::Regular => None,
            FontVariant::Bold => self.bold.as_ref(),
            FontVariant::Italic => self.italic.as_ref(),
            FontVariant::BoldItalic => self.bold_italic.as_ref(),
        };
        face.unwrap_or(&self.regular)
    }
}

impl GlyphMeasure for FontFamily {
    fn advance(&self, ch: char, variant: FontVariant, size: f32) -> f32 {
        self.face(variant).metrics(ch, size).advance_width
    }

    fn line_height(&self, size: f32) -> f32 {
        self.regular
            .horizontal_line_metrics(size)
            .map(|m| m.new_line_size)
            .unwrap_or(size * 1.2)
    }

    fn ascent(&self, size: f32) -> f32 {
        self.regular
            .horizontal_line_metrics(size)
            .map(|m| m.ascent)
            .unwrap_or(size * 0.8)
    }
}

/// Font families by id. Mutated only through
/// [`GraphicsContext`](crate::context::GraphicsContext) so replacing a
/// family also drops its rasterized glyphs.
#[derive(Debug, Default)]
pub struct FontCache {
    families: HashMap<FontId, FontFamily>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `id` from `dir` unless it is already cached.
    pub(crate) fn load_dir(&mut self, dir: impl AsRef<Path>, id: &FontId) -> Result<&FontFamily, FontLoadError> {
        if !self.families.contains_key(id) {
            let family = FontFamily::load_dir(dir, id)?;
            log::info!("loaded font family {id} ({family:?})");
            self.families.insert(id.clone(), family);
        }
        self.get(id)
    }

    /// Registers an already-parsed family. Returns `true` when it replaced
    /// a previous one.
    pub(crate) fn insert(&mut self, id: FontId, family: FontFamily) -> bool {
        self.families.insert(id, family).is_some()
    }

    pub fn get(&self, id: &FontId) -> Result<&FontFamily, FontLoadError> {
        self.families
            .get(id)
            .ok_or_else(|| FontLoadError(format!("unknown font id {id}")))
    }

    #[inline]
    pub fn contains(&self, id: &FontId) -> bool {
        self.families.contains_key(id)
    }
}
