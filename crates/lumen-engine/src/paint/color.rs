/// Straight-alpha RGBA colour, every channel in `[0, 1]`.
///
/// Invariant: `a = 1` is fully opaque, `a = 0` fully transparent.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Channels rounded to bytes; out-of-range values are clamped first.
    #[inline]
    pub fn to_u8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    #[inline]
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Channel-wise mean; `None` for an empty input.
    pub fn average<I: IntoIterator<Item = Rgba>>(colors: I) -> Option<Rgba> {
        let (sum, n) = colors.into_iter().fold(([0.0f32; 4], 0usize), |(acc, n), c| {
            ([acc[0] + c.r, acc[1] + c.g, acc[2] + c.b, acc[3] + c.a], n + 1)
        });
        (n > 0).then(|| {
            let k = 1.0 / n as f32;
            Rgba::new(sum[0] * k, sum[1] * k, sum[2] * k, sum[3] * k)
        })
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Decodes the colour channels from sRGB to linear light. Alpha is
    /// left as is.
    #[inline]
    pub fn to_linear(self) -> Self {
        Self::new(srgb_to_linear(self.r), srgb_to_linear(self.g), srgb_to_linear(self.b), self.a)
    }

    /// Linear clear colour for wgpu.
    #[inline]
    pub(crate) fn to_wgpu(self) -> wgpu::Color {
        let Rgba { r, g, b, a } = self.to_linear();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }
}

/// IEC 61966-2-1 decoding curve.
#[inline]
fn srgb_to_linear(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

impl From<[f32; 3]> for Rgba {
    #[inline]
    fn from([r, g, b]: [f32; 3]) -> Self {
        Rgba::rgb(r, g, b)
    }
}

impl From<image::Rgba<u8>> for Rgba {
    #[inline]
    fn from(p: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = p.0;
        Rgba::from_u8(r, g, b, a)
    }
}

impl From<Rgba> for image::Rgba<u8> {
    #[inline]
    fn from(c: Rgba) -> Self {
        image::Rgba(c.to_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u8_conversion_round_trips() {
        let c = Rgba::from_u8(12, 128, 255, 0);
        assert_eq!(c.to_u8(), [12, 128, 255, 0]);
    }

    #[test]
    fn to_u8_clamps() {
        assert_eq!(Rgba::new(-1.0, 2.0, 0.5, 1.0).to_u8(), [0, 255, 128, 255]);
    }

    #[test]
    fn average_of_colors() {
        let avg = Rgba::average([Rgba::BLACK, Rgba::WHITE]).unwrap();
        assert_eq!(avg, Rgba::new(0.5, 0.5, 0.5, 1.0));
        assert!(Rgba::average(std::iter::empty()).is_none());
    }

    #[test]
    fn to_linear_decodes_srgb() {
        let c = Rgba::new(0.5, 0.0, 1.0, 0.25).to_linear();
        assert!((c.r - 0.2140).abs() < 1e-3, "r = {}", c.r);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 1.0).abs() < 1e-6);
        assert_eq!(c.a, 0.25);
    }

    #[test]
    fn clear_colour_is_linear() {
        let c = Rgba::rgb(0.5, 0.5, 0.5).to_wgpu();
        assert!((c.r - 0.2140).abs() < 1e-3);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn alpha_one_is_opaque_constant() {
        assert_eq!(Rgba::WHITE.a, 1.0);
        assert_eq!(Rgba::TRANSPARENT.a, 0.0);
    }
}
