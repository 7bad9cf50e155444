pub mod common;
pub mod ctx;
pub mod image;
pub mod render_texture;
pub(crate) mod resources;
pub mod shader;
pub mod shape;
pub mod spritesheet;
pub mod target;
pub mod texture;

pub use common::{Topology, SHADER_PARAM_SLOTS};
pub use ctx::RenderCtx;
pub use image::{Image, ImageError, PixelRect};
pub use render_texture::{FramebufferStatus, RenderTexture};
pub use shader::{Shader, ShaderError, INVALID_PROGRAM_ID, NOOP_PROGRAM_ID};
pub use shape::{frame_thickness, Shape, ShapeError, ShapeKind};
pub use spritesheet::{SpriteError, Spritesheet};
pub use target::{Canvas, RenderTarget, Renderable};
pub use texture::{FilterMode, Texture, WrapMode};
