use std::fmt;
use std::rc::Rc;

use crate::coords::Rectangle;

use super::image::{Image, PixelRect};
use super::shape::Shape;
use super::texture::Texture;

/// Error returned by [`Spritesheet::apply_frame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpriteError {
    FrameOutOfRange { index: usize, count: usize },
}

impl fmt::Display for SpriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpriteError::FrameOutOfRange { index, count } => {
                write!(f, "frame {index} out of range (sheet has {count} frames)")
            }
        }
    }
}

impl std::error::Error for SpriteError {}

/// An image cut into a `columns x rows` grid of frames.
///
/// Each frame is trimmed to the opaque pixels of its cell; a fully
/// transparent cell keeps the whole cell.
#[derive(Debug, Clone)]
pub struct Spritesheet {
    image_size: (u32, u32),
    frames: Vec<PixelRect>,
    texture: Option<Rc<Texture>>,
}

impl Spritesheet {
    /// Frames are numbered row by row, left to right. Cells are
    /// `width / columns` by `height / rows`; remainder pixels are ignored.
    pub fn new(image: &Image, columns: u32, rows: u32) -> Self {
        let (width, height) = image.size();
        let (cell_w, cell_h) = match (columns, rows) {
            (0, _) | (_, 0) => (0, 0),
            _ => (width / columns, height / rows),
        };

        let mut frames = Vec::new();
        if cell_w > 0 && cell_h > 0 {
            for row in 0..rows {
                for col in 0..columns {
                    let cell = PixelRect::new(col * cell_w, row * cell_h, cell_w, cell_h);
                    frames.push(image.opaque_bounds(cell).unwrap_or(cell));
                }
            }
        } else {
            log::warn!("spritesheet grid {columns}x{rows} does not fit a {width}x{height} image");
        }

        Self {
            image_size: (width, height),
            frames,
            texture: None,
        }
    }

    /// Attaches the texture the frames are sampled from.
    pub fn with_texture(mut self, texture: Rc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    #[inline]
    pub fn texture(&self) -> Option<&Rc<Texture>> {
        self.texture.as_ref()
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Trimmed frame in image pixels.
    #[inline]
    pub fn frame_rect(&self, index: usize) -> Option<PixelRect> {
        self.frames.get(index).copied()
    }

    /// Trimmed frame in normalized texture coordinates.
    pub fn frame_uv(&self, index: usize) -> Option<Rectangle> {
        let r = self.frame_rect(index)?;
        let (w, h) = (self.image_size.0 as f32, self.image_size.1 as f32);
        Some(Rectangle::new(
            r.x as f32 / w,
            r.y as f32 / h,
            r.w as f32 / w,
            r.h as f32 / h,
        ))
    }

    /// Points `shape` at frame `index`, attaching the sheet's texture if any.
    pub fn apply_frame(&self, shape: &mut Shape, index: usize) -> Result<(), SpriteError> {
        let uv = self.frame_uv(index).ok_or(SpriteError::FrameOutOfRange {
            index,
            count: self.frame_count(),
        })?;
        if let Some(texture) = &self.texture {
            shape.set_texture(Some(Rc::clone(texture)));
        }
        shape.set_texture_rectangle(uv);
        Ok(())
    }
}
