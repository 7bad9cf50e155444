//! Lumen engine crate.
//!
//! 2D drawing on wgpu: shapes, textures, shaders, render textures and
//! animated rich text, plus the window runtime that drives an [`core::App`].
//!
//! Drawing space is target-local: `(0, 0)` is the top-left corner of the
//! target and `(1, 1)` the bottom-right.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod context;
pub mod paint;
pub mod render;
pub mod text;
pub mod transform;

pub use lumen_markup as markup;
