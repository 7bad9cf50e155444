use super::Rgba;

/// Saturation below which the hue is treated as undefined.
const ACHROMATIC_EPSILON: f32 = 0.001;

/// Hue/saturation/value colour with straight alpha, every channel in `[0, 1]`.
///
/// `h` is a fraction of a full turn (`0.5` = cyan).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Hsva {
    pub h: f32,
    pub s: f32,
    pub v: f32,
    pub a: f32,
}

impl Hsva {
    #[inline]
    pub const fn new(h: f32, s: f32, v: f32, a: f32) -> Self {
        Self { h, s, v, a }
    }

    /// Converts from RGBA. Achromatic colours get hue `0`.
    pub fn from_rgba(c: Rgba) -> Self {
        Self::from_rgba_with_hue(c, 0.0)
    }

    /// Converts from RGBA, keeping `previous_hue` when the colour has no
    /// meaningful hue (saturation or value near zero).
    pub fn from_rgba_with_hue(c: Rgba, previous_hue: f32) -> Self {
        let max = c.r.max(c.g).max(c.b);
        let min = c.r.min(c.g).min(c.b);
        let delta = max - min;

        let v = max;
        let s = if max > 0.0 { delta / max } else { 0.0 };

        let h = if s <= ACHROMATIC_EPSILON || delta <= f32::EPSILON {
            previous_hue
        } else {
            let sector = if max == c.r {
                ((c.g - c.b) / delta).rem_euclid(6.0)
            } else if max == c.g {
                (c.b - c.r) / delta + 2.0
            } else {
                (c.r - c.g) / delta + 4.0
            };
            sector / 6.0
        };

        Hsva { h, s, v, a: c.a }
    }

    pub fn to_rgba(self) -> Rgba {
        let h = self.h.rem_euclid(1.0) * 6.0;
        let s = self.s.clamp(0.0, 1.0);
        let v = self.v.clamp(0.0, 1.0);

        let c = v * s;
        let x = c * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Rgba::new(r + m, g + m, b + m, self.a)
    }

    /// True when the hue carries no information.
    #[inline]
    pub fn is_achromatic(self) -> bool {
        self.s <= ACHROMATIC_EPSILON
    }
}

impl From<Rgba> for Hsva {
    #[inline]
    fn from(c: Rgba) -> Self {
        Hsva::from_rgba(c)
    }
}

impl From<Hsva> for Rgba {
    #[inline]
    fn from(c: Hsva) -> Self {
        c.to_rgba()
    }
}
