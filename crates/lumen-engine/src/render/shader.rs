use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::context::GraphicsContext;

use super::common::{
    straight_alpha_blend, Topology, Vertex, NOOP_FRAGMENT_WGSL, PRELUDE_WGSL,
    SHADER_PARAM_SLOTS, TEXTURE_FORMAT,
};
use super::RenderCtx;

/// Program id reported by a shader whose compilation failed.
pub const INVALID_PROGRAM_ID: u64 = 0;
/// Program id of the shared passthrough program.
pub const NOOP_PROGRAM_ID: u64 = 1;

static NEXT_PROGRAM_ID: AtomicU64 = AtomicU64::new(NOOP_PROGRAM_ID + 1);

/// Error returned by [`Shader::set_param`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    ParamSlotOutOfRange { slot: usize },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::ParamSlotOutOfRange { slot } => write!(
                f,
                "shader parameter slot {slot} out of range (0..{SHADER_PARAM_SLOTS})"
            ),
        }
    }
}

impl std::error::Error for ShaderError {}

// ── program ───────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct PipelineKey {
    format: wgpu::TextureFormat,
    topology: Topology,
}

/// A compiled vertex+fragment module plus the pipelines built from it.
///
/// Pipelines are created on first use per (target format, topology).
pub(crate) struct Program {
    id: u64,
    module: wgpu::ShaderModule,
    pipelines: RefCell<HashMap<PipelineKey, wgpu::RenderPipeline>>,
}

impl Program {
    fn compile(device: &wgpu::Device, label: &str, fragment: &str, id: u64) -> Self {
        let source = format!("{PRELUDE_WGSL}\n{fragment}");
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        Self {
            id,
            module,
            pipelines: RefCell::new(HashMap::new()),
        }
    }

    /// The shared passthrough program.
    pub(crate) fn noop(device: &wgpu::Device) -> Self {
        log::debug!("compiling noop shader program");
        Self::compile(device, "lumen noop shader", NOOP_FRAGMENT_WGSL, NOOP_PROGRAM_ID)
    }

    #[inline]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn pipeline(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        format: wgpu::TextureFormat,
        topology: Topology,
    ) -> wgpu::RenderPipeline {
        let key = PipelineKey { format, topology };
        if let Some(p) = self.pipelines.borrow().get(&key) {
            return p.clone();
        }

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lumen shape pipeline"),
            layout: Some(layout),

            vertex: wgpu::VertexState {
                module: &self.module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &self.module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(straight_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: topology.to_wgpu(),
                strip_index_format: topology.strip_index_format(),
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipelines.borrow_mut().insert(key, pipeline.clone());
        pipeline
    }
}

// ── shader ────────────────────────────────────────────────────────────────

enum ShaderProgram {
    /// The context's passthrough program, resolved at draw time.
    Shared,
    Custom(Program),
    Failed,
}

/// Program selection plus the parameters uploaded with every draw.
///
/// [`Shader::noop`] never owns GPU state: it is resolved against the
/// [`GraphicsContext`] passed to each draw, so it can be created before any
/// device exists. Custom programs are released with their `Shader`.
pub struct Shader {
    program: ShaderProgram,
    params: [[f32; 4]; SHADER_PARAM_SLOTS],
    warned_invalid: Cell<bool>,
}

impl Default for Shader {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for Shader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shader")
            .field("program_id", &self.program_id())
            .field("params", &self.params)
            .finish()
    }
}

impl Shader {
    /// Selects the shared passthrough program (vertex colour times texture).
    pub fn noop() -> Self {
        Self::with_program(ShaderProgram::Shared)
    }

    fn with_program(program: ShaderProgram) -> Self {
        Self {
            program,
            params: [[0.0; 4]; SHADER_PARAM_SLOTS],
            warned_invalid: Cell::new(false),
        }
    }

    pub(crate) fn failed() -> Self {
        Self::with_program(ShaderProgram::Failed)
    }

    /// Compiles a custom WGSL fragment stage against the shared vertex stage.
    ///
    /// The source must define `fs_main(v: VsOut) -> @location(0) vec4<f32>`
    /// and may read `draw.params[0..2]`, `t_diffuse` and `s_diffuse`.
    /// On failure the diagnostics are logged and the returned shader is
    /// invalid (`program_id() == 0`); drawing with it is skipped.
    pub fn from_fragment(graphics: &mut GraphicsContext, ctx: &RenderCtx<'_>, source: &str) -> Self {
        let resources = graphics.gpu_mut();
        resources.ensure(ctx);
        let Some(layout) = resources.pipeline_layout() else {
            log::error!("shader compilation skipped: GPU resources unavailable");
            return Self::failed();
        };

        let id = NEXT_PROGRAM_ID.fetch_add(1, Ordering::Relaxed);

        // Compile and build one pipeline so both WGSL and interface errors
        // surface here instead of at the first draw.
        let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let program = Program::compile(ctx.device, "lumen custom shader", source, id);
        let _ = program.pipeline(ctx.device, layout, TEXTURE_FORMAT, Topology::TriangleList);

        match pollster::block_on(scope.pop()) {
            None => {
                log::debug!("compiled shader program {id}");
                Self::with_program(ShaderProgram::Custom(program))
            }
            Some(err) => {
                log::error!("shader compilation failed: {err}");
                Self::failed()
            }
        }
    }

    /// `0` when compilation failed, [`NOOP_PROGRAM_ID`] for the shared program.
    pub fn program_id(&self) -> u64 {
        match &self.program {
            ShaderProgram::Shared => NOOP_PROGRAM_ID,
            ShaderProgram::Custom(p) => p.id(),
            ShaderProgram::Failed => INVALID_PROGRAM_ID,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.program_id() != INVALID_PROGRAM_ID
    }

    #[inline]
    pub fn is_noop(&self) -> bool {
        matches!(self.program, ShaderProgram::Shared)
    }

    /// Sets `draw.params[slot]` for subsequent draws.
    pub fn set_param(&mut self, slot: usize, value: [f32; 4]) -> Result<(), ShaderError> {
        let p = self
            .params
            .get_mut(slot)
            .ok_or(ShaderError::ParamSlotOutOfRange { slot })?;
        *p = value;
        Ok(())
    }

    #[inline]
    pub fn params(&self) -> [[f32; 4]; SHADER_PARAM_SLOTS] {
        self.params
    }

    /// Picks the program to draw with. `None` for a failed shader, with a
    /// warning the first time.
    pub(crate) fn resolve<'s>(&'s self, noop: &'s Program) -> Option<&'s Program> {
        match &self.program {
            ShaderProgram::Shared => Some(noop),
            ShaderProgram::Custom(p) => Some(p),
            ShaderProgram::Failed => {
                if !self.warned_invalid.replace(true) {
                    log::warn!("draw skipped: shader failed to compile");
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_is_valid_and_shared() {
        let s = Shader::default();
        assert!(s.is_valid());
        assert!(s.is_noop());
        assert_eq!(s.program_id(), NOOP_PROGRAM_ID);
    }

    #[test]
    fn failed_shader_reports_program_zero() {
        let s = Shader::failed();
        assert_eq!(s.program_id(), 0);
        assert!(!s.is_valid());
    }

    #[test]
    fn params_are_stored_per_slot() {
        let mut s = Shader::noop();
        s.set_param(1, [1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.params()[0], [0.0; 4]);
        assert_eq!(s.params()[1], [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn param_slot_out_of_range() {
        let mut s = Shader::noop();
        assert_eq!(
            s.set_param(SHADER_PARAM_SLOTS, [0.0; 4]),
            Err(ShaderError::ParamSlotOutOfRange { slot: SHADER_PARAM_SLOTS })
        );
    }
}
