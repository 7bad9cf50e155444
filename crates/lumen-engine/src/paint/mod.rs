//! Colour model.
//!
//! - [`Rgba`]: straight (non-premultiplied) alpha; `a = 1` is opaque
//! - [`Hsva`]: hue/saturation/value with the same alpha convention
//! - HTML colour codes (`#RRGGBB`, `#RRGGBBAA`)
//!
//! Colour channels are sRGB-encoded, the same encoding as texture bytes
//! and HTML codes: `0.5` grey is byte `128`. Textures are sampled through
//! sRGB views, so vertex colours, tints and clears are decoded to linear
//! ([`Rgba::to_linear`]) before they reach the GPU. Alpha is always linear.

mod color;
mod hsva;
mod html;

pub use color::Rgba;
pub use hsva::Hsva;
pub use html::ColorParseError;
