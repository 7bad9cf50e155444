use std::rc::Rc;

use lumen_engine::coords::{Circle, Rectangle, Triangle, Vector2f};
use lumen_engine::core::{App, AppControl, FrameCtx, SetupCtx};
use lumen_engine::device::GpuInit;
use lumen_engine::input::Key;
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::paint::{Hsva, Rgba};
use lumen_engine::render::{frame_thickness, RenderTarget, RenderTexture, Shader, Shape, Texture};
use lumen_engine::text::{Alignment, FontId, ScrollConfig, Text, TextStyle};
use lumen_engine::transform::Transform;
use lumen_engine::window::{Runtime, RuntimeConfig};

const INTRO: &str = "<b>Lumen</b> studio.| Shapes, <col=(1,0.6,0.2)>render textures</col> \
and <fx_w>animated</fx_w> <fx_r>rich text</fx_r>.| Press <u>Space</u> to skip, \
<fx_s>Esc</fx_s> to quit.";

/// Fades the vertex colour by `params[0].x`.
const PULSE: &str = r#"
@fragment
fn fs_main(v: VsOut) -> @location(0) vec4<f32> {
    let tex = textureSample(t_diffuse, s_diffuse, v.tex_coords);
    return vec4<f32>(v.color.rgb * tex.rgb, v.color.a * tex.a * draw.params[0].x);
}
"#;

const BACKGROUND: Rgba = Rgba::new(0.06, 0.07, 0.09, 1.0);

/// A gallery of everything the engine draws.
struct Studio {
    panel: Shape,
    border: Shape,
    dot: Shape,
    spinner: Shape,
    thumbnail: Shape,
    spin_degrees: f32,

    pulse: Option<Shader>,
    offscreen: Option<RenderTexture>,
    text: Option<Text>,
}

impl Studio {
    fn new() -> Self {
        let mut panel = Shape::new();
        panel.as_rectangle(Rectangle::new(0.05, 0.55, 0.4, 0.4));

        let mut dot = Shape::new();
        dot.as_circle(Circle::new(Vector2f::new(0.75, 0.75), 0.12), 48)
            .set_color(Rgba::new(0.3, 0.7, 1.0, 0.8));

        let mut spinner = Shape::new();
        spinner.as_triangle(Triangle::new(
            Vector2f::new(0.5, 0.1),
            Vector2f::new(0.9, 0.9),
            Vector2f::new(0.1, 0.9),
        ));
        let corners = [
            Rgba::new(1.0, 0.2, 0.2, 1.0),
            Rgba::new(0.2, 1.0, 0.2, 1.0),
            Rgba::new(0.2, 0.2, 1.0, 1.0),
        ];
        for (i, color) in corners.into_iter().enumerate() {
            if let Err(e) = spinner.set_vertex_color(i, color) {
                log::warn!("spinner: {e}");
            }
        }

        let mut thumbnail = Shape::new();
        thumbnail.as_rectangle(Rectangle::new(0.55, 0.05, 0.4, 0.4));

        Self {
            panel,
            border: Shape::new(),
            dot,
            spinner,
            thumbnail,
            spin_degrees: 0.0,
            pulse: None,
            offscreen: None,
            text: None,
        }
    }
}

impl App for Studio {
    fn on_realize(&mut self, ctx: &mut SetupCtx<'_, '_>) {
        let render_ctx = ctx.gpu.render_ctx();

        let offscreen = RenderTexture::create(&render_ctx, 256, 256);
        self.thumbnail.set_texture(Some(offscreen.texture()));
        self.offscreen = Some(offscreen);

        let paper = Texture::create(&render_ctx, 1, 1, Rgba::new(0.9, 0.85, 0.7, 1.0));
        self.panel.set_texture(Some(Rc::new(paper)));

        let pulse = Shader::from_fragment(ctx.graphics, &render_ctx, PULSE);
        if pulse.is_valid() {
            self.pulse = Some(pulse);
        }

        // the hue arrow keys edit
        let selection = ctx.graphics.colors_mut();
        selection.set_hsva(Hsva::new(0.6, 0.5, 0.9, 1.0));
        selection.on_change(|sel| log::debug!("selection now {}", sel.html()));

        let font = FontId::from("default");
        match std::env::var("LUMEN_FONT_DIR") {
            Ok(dir) => match ctx.graphics.load_fonts(&dir, &font) {
                Ok(()) => {
                    let mut text = Text::new(TextStyle {
                        font,
                        size: 28.0,
                        max_width: Some(520.0),
                        alignment: Alignment::Justify,
                        ..TextStyle::default()
                    });
                    text.set_text(INTRO);
                    text.set_position(Vector2f::new(24.0, 24.0));
                    text.set_scrolling(Some(ScrollConfig::default()));
                    self.text = Some(text);
                }
                Err(e) => log::warn!("no text: {e}"),
            },
            Err(_) => log::warn!("LUMEN_FONT_DIR not set; text disabled"),
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) || ctx.input_frame.close_requested() {
            return AppControl::Exit;
        }

        let dt = ctx.time.dt;
        self.spin_degrees = (self.spin_degrees + dt * 90.0) % 360.0;

        let selection = ctx.graphics.colors_mut();
        let mut hsva = selection.hsva();
        if ctx.input.key_down(Key::ArrowRight) {
            hsva.h = (hsva.h + dt * 0.25).rem_euclid(1.0);
            selection.set_hsva(hsva);
        } else if ctx.input.key_down(Key::ArrowLeft) {
            hsva.h = (hsva.h - dt * 0.25).rem_euclid(1.0);
            selection.set_hsva(hsva);
        }
        let accent = selection.current();

        if let Some(text) = &mut self.text {
            if ctx.input_frame.key_pressed(Key::Space) {
                text.skip_reveal();
            }
            text.update(dt);
        }

        if let Some(pulse) = &mut self.pulse {
            let alpha = 0.6 + 0.4 * (ctx.time.elapsed as f32 * 2.0).sin();
            if let Err(e) = pulse.set_param(0, [alpha, 0.0, 0.0, 0.0]) {
                log::warn!("pulse: {e}");
            }
        }

        let spin = Transform::identity().rotate(self.spin_degrees, Vector2f::new(0.5, 0.5));
        let Self { panel, border, dot, spinner, thumbnail, pulse, offscreen, text, .. } = self;

        ctx.render(BACKGROUND, |canvas| {
            if let Some(offscreen) = offscreen {
                offscreen.render(canvas, Some(Rgba::TRANSPARENT), |inner| {
                    inner.render(spinner, Some(&spin), None);
                });
            }

            let bounds = Rectangle::new(0.02, 0.02, 0.96, 0.96);
            border
                .as_frame(bounds, frame_thickness(4.0, canvas.size()))
                .set_color(accent);

            canvas.render(panel, None, None);
            canvas.render(thumbnail, None, None);
            canvas.render(dot, None, pulse.as_ref());
            canvas.render(border, None, None);
            if let Some(text) = text {
                canvas.render(text, None, None);
            }
        })
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        log::debug!("studio resized to {width}x{height}");
    }

    fn on_shutdown(&mut self) {
        log::info!("studio closing");
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(
        RuntimeConfig {
            title: "Lumen Studio".to_string(),
            ..RuntimeConfig::default()
        },
        GpuInit {
            present_mode: wgpu::PresentMode::AutoVsync,
            ..GpuInit::default()
        },
        Studio::new(),
    )
}
