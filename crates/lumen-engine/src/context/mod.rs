//! State shared by everything drawn through one GPU device.

mod color_selection;
mod graphics;
mod reentrancy;

pub use color_selection::ColorSelection;
pub use graphics::GraphicsContext;
pub use reentrancy::{ReentrancyFlag, ReentrancyGuard};
