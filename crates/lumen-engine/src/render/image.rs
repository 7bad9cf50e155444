use std::fmt;
use std::path::{Path, PathBuf};

use crate::paint::Rgba;

/// Error returned by [`Image`] I/O and slicing.
#[derive(Debug)]
pub enum ImageError {
    Load { path: PathBuf, source: image::ImageError },
    Save { path: PathBuf, source: image::ImageError },
    OutOfBounds { region: PixelRect, size: (u32, u32) },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Load { path, source } => {
                write!(f, "failed to load image {}: {source}", path.display())
            }
            ImageError::Save { path, source } => {
                write!(f, "failed to save image {}: {source}", path.display())
            }
            ImageError::OutOfBounds { region, size } => write!(
                f,
                "region {}x{} at ({}, {}) exceeds image size {}x{}",
                region.w, region.h, region.x, region.y, size.0, size.1
            ),
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImageError::Load { source, .. } | ImageError::Save { source, .. } => Some(source),
            ImageError::OutOfBounds { .. } => None,
        }
    }
}

/// Integer pixel rectangle inside an image.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn fits_in(self, (width, height): (u32, u32)) -> bool {
        self.x.checked_add(self.w).is_some_and(|r| r <= width)
            && self.y.checked_add(self.h).is_some_and(|b| b <= height)
    }
}

/// CPU RGBA8 pixel buffer.
///
/// Pixels are stored as sRGB bytes with straight alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pixels: image::RgbaImage,
}

impl Image {
    /// An image filled with `color`.
    pub fn create(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            pixels: image::RgbaImage::from_pixel(width, height, color.into()),
        }
    }

    /// Wraps tightly packed RGBA8 bytes; `None` if the length does not match.
    pub fn from_rgba8(width: u32, height: u32, bytes: Vec<u8>) -> Option<Self> {
        image::RgbaImage::from_raw(width, height, bytes).map(|pixels| Self { pixels })
    }

    /// White pixels whose alpha is the given coverage mask (one byte per pixel).
    pub fn from_coverage(width: u32, height: u32, coverage: &[u8]) -> Option<Self> {
        if coverage.len() != (width as usize) * (height as usize) {
            return None;
        }
        let bytes = coverage.iter().flat_map(|&a| [255, 255, 255, a]).collect();
        Self::from_rgba8(width, height, bytes)
    }

    /// Decodes any format enabled in the `image` crate features.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| ImageError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            pixels: decoded.to_rgba8(),
        })
    }

    /// Encodes by file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ImageError> {
        let path = path.as_ref();
        self.pixels.save(path).map_err(|source| ImageError::Save {
            path: path.to_path_buf(),
            source,
        })
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        let (w, h) = self.size();
        w == 0 || h == 0
    }

    /// Colour at `(x, y)`. Panics when out of range; guard with [`size`](Self::size).
    #[inline]
    pub fn at(&self, x: u32, y: u32) -> Rgba {
        (*self.pixels.get_pixel(x, y)).into()
    }

    /// Panics when out of range; guard with [`size`](Self::size).
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        self.pixels.put_pixel(x, y, color.into());
    }

    /// Every pixel in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, Rgba)> + '_ {
        self.pixels.enumerate_pixels().map(|(x, y, p)| (x, y, (*p).into()))
    }

    /// Every pixel in row-major order, as mutable RGBA bytes.
    pub fn pixels_mut(&mut self) -> impl Iterator<Item = (u32, u32, &mut [u8; 4])> + '_ {
        self.pixels.enumerate_pixels_mut().map(|(x, y, p)| (x, y, &mut p.0))
    }

    /// Tightly packed RGBA8 rows, ready for upload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Copies a region into a new image.
    pub fn sub_image(&self, region: PixelRect) -> Result<Image, ImageError> {
        if !region.fits_in(self.size()) {
            return Err(ImageError::OutOfBounds {
                region,
                size: self.size(),
            });
        }
        let view = image::imageops::crop_imm(&self.pixels, region.x, region.y, region.w, region.h);
        Ok(Image {
            pixels: view.to_image(),
        })
    }

    /// Smallest rectangle inside `region` holding every pixel with non-zero
    /// alpha; `None` when the region is fully transparent.
    pub fn opaque_bounds(&self, region: PixelRect) -> Option<PixelRect> {
        if !region.fits_in(self.size()) {
            return None;
        }
        let mut min = (u32::MAX, u32::MAX);
        let mut max = (0u32, 0u32);
        let mut any = false;
        for y in region.y..region.y + region.h {
            for x in region.x..region.x + region.w {
                if self.pixels.get_pixel(x, y).0[3] > 0 {
                    any = true;
                    min = (min.0.min(x), min.1.min(y));
                    max = (max.0.max(x), max.1.max(y));
                }
            }
        }
        any.then(|| PixelRect::new(min.0, min.1, max.0 - min.0 + 1, max.1 - min.1 + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Rgba { Rgba::rgb(1.0, 0.0, 0.0) }

    // ── pixels ────────────────────────────────────────────────────────────

    #[test]
    fn create_fills_every_pixel() {
        let img = Image::create(3, 2, red());
        assert_eq!(img.size(), (3, 2));
        assert!(img.pixels().all(|(_, _, c)| c == red()));
        assert_eq!(img.as_bytes().len(), 3 * 2 * 4);
    }

    #[test]
    fn set_then_at() {
        let mut img = Image::create(2, 2, Rgba::TRANSPARENT);
        img.set(1, 0, Rgba::WHITE);
        assert_eq!(img.at(1, 0), Rgba::WHITE);
        assert_eq!(img.at(0, 0), Rgba::TRANSPARENT);
    }

    #[test]
    #[should_panic]
    fn at_out_of_range_panics() {
        let img = Image::create(2, 2, Rgba::WHITE);
        let _ = img.at(2, 0);
    }

    #[test]
    fn pixels_mut_writes_through() {
        let mut img = Image::create(2, 1, Rgba::BLACK);
        for (_, _, px) in img.pixels_mut() {
            px[1] = 255;
        }
        assert_eq!(img.at(1, 0), Rgba::rgb(0.0, 1.0, 0.0));
    }

    #[test]
    fn coverage_becomes_white_alpha() {
        let img = Image::from_coverage(2, 1, &[0, 255]).unwrap();
        assert_eq!(img.at(0, 0).to_u8(), [255, 255, 255, 0]);
        assert_eq!(img.at(1, 0), Rgba::WHITE);
        assert!(Image::from_coverage(2, 2, &[0]).is_none());
    }

    // ── regions ───────────────────────────────────────────────────────────

    #[test]
    fn sub_image_copies_region() {
        let mut img = Image::create(4, 4, Rgba::BLACK);
        img.set(2, 3, Rgba::WHITE);
        let sub = img.sub_image(PixelRect::new(2, 2, 2, 2)).unwrap();
        assert_eq!(sub.size(), (2, 2));
        assert_eq!(sub.at(0, 1), Rgba::WHITE);
    }

    #[test]
    fn sub_image_out_of_bounds() {
        let img = Image::create(4, 4, Rgba::BLACK);
        assert!(matches!(
            img.sub_image(PixelRect::new(3, 0, 2, 1)),
            Err(ImageError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn opaque_bounds_trims_transparent_border() {
        let mut img = Image::create(5, 5, Rgba::TRANSPARENT);
        img.set(1, 2, Rgba::WHITE);
        img.set(3, 3, Rgba::WHITE);
        assert_eq!(
            img.opaque_bounds(PixelRect::new(0, 0, 5, 5)),
            Some(PixelRect::new(1, 2, 3, 2))
        );
        assert_eq!(img.opaque_bounds(PixelRect::new(0, 0, 1, 1)), None);
    }

    // ── files ─────────────────────────────────────────────────────────────

    #[test]
    fn save_then_load_png() {
        let path = std::env::temp_dir().join(format!("lumen-image-{}.png", std::process::id()));
        let mut img = Image::create(3, 3, Rgba::TRANSPARENT);
        img.set(1, 1, Rgba::from_u8(10, 20, 30, 40));
        img.save(&path).unwrap();
        let back = Image::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(back, img);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        assert!(matches!(
            Image::load("/definitely/not/here.png"),
            Err(ImageError::Load { .. })
        ));
    }
}
