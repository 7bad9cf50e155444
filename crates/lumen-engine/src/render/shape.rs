use std::fmt;
use std::rc::Rc;

use wgpu::util::DeviceExt;

use crate::coords::{Circle, Rectangle, Triangle, Vector2f};
use crate::paint::Rgba;
use crate::transform::Transform;

use super::common::{Topology, Vertex};
use super::shader::Shader;
use super::target::{Canvas, DrawCall, Renderable};
use super::texture::Texture;
use super::RenderCtx;

/// Error returned by per-vertex setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    VertexOutOfRange { index: usize, count: usize },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::VertexOutOfRange { index, count } => {
                write!(f, "vertex index {index} out of range (shape has {count} vertices)")
            }
        }
    }
}

impl std::error::Error for ShapeError {}

/// Which primitive a shape currently holds.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShapeKind {
    Empty,
    Triangle,
    Rectangle,
    Circle,
    Line,
    Polygon,
    Frame,
}

/// Frame edge thickness in target-local units for an edge `pixels` wide,
/// so horizontal and vertical edges look equally thick on a non-square target.
pub fn frame_thickness(pixels: f32, target_size: Vector2f) -> Vector2f {
    let axis = |extent: f32| if extent > 0.0 { pixels / extent } else { 0.0 };
    Vector2f::new(axis(target_size.x), axis(target_size.y))
}

/// Vertex arrays plus a topology, drawn in the target's local `[0, 1]` space.
///
/// `positions`, `colors` and `tex_coords` always have the same length.
/// GPU buffers are rebuilt lazily after any change and released on drop.
pub struct Shape {
    kind: ShapeKind,
    positions: Vec<Vector2f>,
    colors: Vec<Rgba>,
    tex_coords: Vec<Vector2f>,
    topology: Topology,
    indices: Vec<u32>,

    texture: Option<Rc<Texture>>,
    texture_rect: Rectangle,

    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    vertices_dirty: bool,
    indices_dirty: bool,
}

impl Default for Shape {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("kind", &self.kind)
            .field("vertices", &self.positions.len())
            .field("topology", &self.topology)
            .field("textured", &self.texture.is_some())
            .finish()
    }
}

impl Shape {
    /// An empty shape; draws nothing until given a primitive.
    pub fn new() -> Self {
        Self {
            kind: ShapeKind::Empty,
            positions: Vec::new(),
            colors: Vec::new(),
            tex_coords: Vec::new(),
            topology: Topology::TriangleList,
            indices: Vec::new(),
            texture: None,
            texture_rect: Rectangle::unit(),
            vertex_buffer: None,
            index_buffer: None,
            vertices_dirty: true,
            indices_dirty: true,
        }
    }

    // ── primitives ────────────────────────────────────────────────────────

    /// Three vertices.
    pub fn as_triangle(&mut self, triangle: Triangle) -> &mut Self {
        self.reset(ShapeKind::Triangle, triangle.points().to_vec(), Topology::TriangleList, vec![0, 1, 2])
    }

    /// Four vertices: top-left, top-right, bottom-right, bottom-left.
    pub fn as_rectangle(&mut self, rect: Rectangle) -> &mut Self {
        let positions = vec![rect.top_left, rect.top_right(), rect.max(), rect.bottom_left()];
        self.reset(ShapeKind::Rectangle, positions, Topology::TriangleList, vec![0, 1, 2, 0, 2, 3])
    }

    /// `segments + 1` vertices: the centre, then the ring. `segments` is at least 3.
    pub fn as_circle(&mut self, circle: Circle, segments: u32) -> &mut Self {
        let n = segments.max(3);
        let step = std::f32::consts::TAU / n as f32;

        let mut positions = Vec::with_capacity(n as usize + 1);
        positions.push(circle.center);
        positions.extend((0..n).map(|i| circle.point_at(i as f32 * step)));

        // fan around vertex 0, closing back onto the first ring vertex
        let indices = (0..n).flat_map(|i| [0, 1 + i, 1 + (i + 1) % n]).collect();
        self.reset(ShapeKind::Circle, positions, Topology::TriangleList, indices)
    }

    /// Two vertices.
    pub fn as_line(&mut self, from: Vector2f, to: Vector2f) -> &mut Self {
        self.reset(ShapeKind::Line, vec![from, to], Topology::LineList, vec![0, 1])
    }

    /// One vertex per point, filled as a fan around the first point
    /// (exact for convex polygons).
    pub fn as_polygon(&mut self, points: &[Vector2f]) -> &mut Self {
        let n = points.len() as u32;
        let indices = (1..n.saturating_sub(1)).flat_map(|i| [0, i, i + 1]).collect();
        self.reset(ShapeKind::Polygon, points.to_vec(), Topology::TriangleList, indices)
    }

    /// Eight vertices: the outer corners then the inner corners, each
    /// clockwise from top-left. `thickness` is per axis; see [`frame_thickness`].
    pub fn as_frame(&mut self, rect: Rectangle, thickness: Vector2f) -> &mut Self {
        let inner = rect.inset(thickness.x, thickness.y);
        let positions = vec![
            rect.top_left,
            rect.top_right(),
            rect.max(),
            rect.bottom_left(),
            inner.top_left,
            inner.top_right(),
            inner.max(),
            inner.bottom_left(),
        ];
        self.reset(
            ShapeKind::Frame,
            positions,
            Topology::TriangleStrip,
            vec![0, 4, 1, 5, 2, 6, 3, 7, 0, 4],
        )
    }

    /// Replaces every vertex array. Colours become the previous average
    /// colour (white for a new shape); texture coordinates map the
    /// bounding box onto the texture rectangle.
    fn reset(
        &mut self,
        kind: ShapeKind,
        positions: Vec<Vector2f>,
        topology: Topology,
        indices: Vec<u32>,
    ) -> &mut Self {
        let fill = Rgba::average(self.colors.iter().copied()).unwrap_or(Rgba::WHITE);
        self.kind = kind;
        self.colors = vec![fill; positions.len()];
        self.positions = positions;
        self.topology = topology;
        self.indices = indices;
        self.remap_tex_coords();
        self.indices_dirty = true;
        self
    }

    fn remap_tex_coords(&mut self) {
        let bbox = Rectangle::bounding(&self.positions).unwrap_or_default();
        let tr = self.texture_rect;
        self.tex_coords = self
            .positions
            .iter()
            .map(|&p| tr.top_left + bbox.relative(p).scaled(tr.size))
            .collect();
        self.vertices_dirty = true;
    }

    // ── vertices ──────────────────────────────────────────────────────────

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn positions(&self) -> &[Vector2f] {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    #[inline]
    pub fn tex_coords(&self) -> &[Vector2f] {
        &self.tex_coords
    }

    fn check(&self, index: usize) -> Result<(), ShapeError> {
        if index < self.vertex_count() {
            Ok(())
        } else {
            Err(ShapeError::VertexOutOfRange {
                index,
                count: self.vertex_count(),
            })
        }
    }

    pub fn set_vertex_position(&mut self, index: usize, position: Vector2f) -> Result<(), ShapeError> {
        self.check(index)?;
        self.positions[index] = position;
        self.vertices_dirty = true;
        Ok(())
    }

    pub fn set_vertex_color(&mut self, index: usize, color: Rgba) -> Result<(), ShapeError> {
        self.check(index)?;
        self.colors[index] = color;
        self.vertices_dirty = true;
        Ok(())
    }

    pub fn set_vertex_texture_coordinate(
        &mut self,
        index: usize,
        tex_coords: Vector2f,
    ) -> Result<(), ShapeError> {
        self.check(index)?;
        self.tex_coords[index] = tex_coords;
        self.vertices_dirty = true;
        Ok(())
    }

    /// Paints every vertex.
    pub fn set_color(&mut self, color: Rgba) -> &mut Self {
        self.colors.iter_mut().for_each(|c| *c = color);
        self.vertices_dirty = true;
        self
    }

    /// Average of the vertex colours; transparent for an empty shape.
    pub fn get_color(&self) -> Rgba {
        Rgba::average(self.colors.iter().copied()).unwrap_or(Rgba::TRANSPARENT)
    }

    // ── texture ───────────────────────────────────────────────────────────

    /// The caller keeps the texture alive by holding its own `Rc`.
    pub fn set_texture(&mut self, texture: Option<Rc<Texture>>) -> &mut Self {
        self.texture = texture;
        self
    }

    #[inline]
    pub fn texture(&self) -> Option<&Rc<Texture>> {
        self.texture.as_ref()
    }

    /// Maps the shape's bounding box onto `rect`, given in normalized
    /// texture coordinates. Persists across primitive changes.
    pub fn set_texture_rectangle(&mut self, rect: Rectangle) -> &mut Self {
        self.texture_rect = rect;
        self.remap_tex_coords();
        self
    }

    #[inline]
    pub fn texture_rectangle(&self) -> Rectangle {
        self.texture_rect
    }

    // ── GPU ───────────────────────────────────────────────────────────────

    #[inline]
    pub(crate) fn needs_upload(&self) -> bool {
        self.vertices_dirty || self.indices_dirty
    }

    fn vertices(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.colors)
            .zip(&self.tex_coords)
            .map(|((&p, &c), &t)| Vertex::new(p, c, t))
            .collect()
    }

    /// Fresh buffers instead of in-place writes: a shape edited between two
    /// draws of the same frame must not rewrite what the first draw reads.
    fn ensure_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.vertices_dirty || self.vertex_buffer.is_none() {
            self.vertex_buffer = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("lumen shape vbo"),
                contents: bytemuck::cast_slice(&self.vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            }));
            self.vertices_dirty = false;
        }

        if self.indices_dirty || self.index_buffer.is_none() {
            self.index_buffer = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("lumen shape ibo"),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            }));
            self.indices_dirty = false;
        }
    }
}

impl Shape {
    /// Draws with every vertex colour multiplied by `tint`, without
    /// touching the vertex buffer.
    pub(crate) fn render_tinted(
        &mut self,
        canvas: &mut Canvas<'_>,
        transform: &Transform,
        shader: Option<&Shader>,
        tint: Rgba,
    ) {
        if self.indices.is_empty() {
            return;
        }

        self.ensure_buffers(&canvas.ctx());
        let (Some(vertices), Some(indices)) = (&self.vertex_buffer, &self.index_buffer) else {
            return;
        };

        canvas.draw(DrawCall {
            vertices,
            indices,
            index_count: self.indices.len() as u32,
            topology: self.topology,
            transform,
            shader,
            texture: self.texture.as_deref(),
            tint,
        });
    }
}

impl Renderable for Shape {
    fn render(&mut self, canvas: &mut Canvas<'_>, transform: &Transform, shader: Option<&Shader>) {
        self.render_tinted(canvas, transform, shader, Rgba::WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vector2f { Vector2f::new(x, y) }

    fn close(a: Vector2f, b: Vector2f) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5
    }

    fn assert_consistent(s: &Shape) {
        assert_eq!(s.positions().len(), s.vertex_count());
        assert_eq!(s.colors().len(), s.vertex_count());
        assert_eq!(s.tex_coords().len(), s.vertex_count());
        assert!(s.indices().iter().all(|&i| (i as usize) < s.vertex_count()));
    }

    // ── vertex counts ─────────────────────────────────────────────────────

    #[test]
    fn vertex_counts_per_primitive() {
        let mut s = Shape::new();
        assert_eq!(s.vertex_count(), 0);

        s.as_triangle(Triangle::new(v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0)));
        assert_eq!(s.vertex_count(), 3);
        assert_consistent(&s);

        s.as_rectangle(Rectangle::new(0.1, 0.1, 0.5, 0.5));
        assert_eq!(s.vertex_count(), 4);
        assert_consistent(&s);

        s.as_circle(Circle::new(v(0.5, 0.5), 0.25), 32);
        assert_eq!(s.vertex_count(), 33);
        assert_consistent(&s);

        s.as_line(v(0.0, 0.0), v(1.0, 1.0));
        assert_eq!(s.vertex_count(), 2);
        assert_consistent(&s);

        s.as_polygon(&[v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.5, 1.5), v(0.0, 1.0)]);
        assert_eq!(s.vertex_count(), 5);
        assert_consistent(&s);

        s.as_frame(Rectangle::new(0.0, 0.0, 1.0, 1.0), v(0.1, 0.1));
        assert_eq!(s.vertex_count(), 8);
        assert_consistent(&s);
    }

    #[test]
    fn circle_segments_clamped_to_three() {
        let mut s = Shape::new();
        s.as_circle(Circle::new(v(0.0, 0.0), 1.0), 1);
        assert_eq!(s.vertex_count(), 4);
    }

    // ── topology ──────────────────────────────────────────────────────────

    #[test]
    fn circle_fan_closes_the_ring() {
        let mut s = Shape::new();
        s.as_circle(Circle::new(v(0.5, 0.5), 0.5), 4);
        assert_eq!(s.topology(), Topology::TriangleList);
        assert_eq!(s.indices(), &[0, 1, 2, 0, 2, 3, 0, 3, 4, 0, 4, 1]);
        assert!(close(s.positions()[0], v(0.5, 0.5)));
        assert!(close(s.positions()[1], v(1.0, 0.5)));
    }

    #[test]
    fn rectangle_is_two_triangles() {
        let mut s = Shape::new();
        s.as_rectangle(Rectangle::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(s.indices(), &[0, 1, 2, 0, 2, 3]);
        assert_eq!(s.positions()[2], v(1.0, 1.0));
    }

    #[test]
    fn frame_is_an_indexed_strip() {
        let mut s = Shape::new();
        s.as_frame(Rectangle::new(0.0, 0.0, 1.0, 1.0), v(0.1, 0.2));
        assert_eq!(s.topology(), Topology::TriangleStrip);
        assert_eq!(s.indices(), &[0, 4, 1, 5, 2, 6, 3, 7, 0, 4]);
        assert!(close(s.positions()[4], v(0.1, 0.2)));
        assert!(close(s.positions()[6], v(0.9, 0.8)));
    }

    #[test]
    fn line_is_a_line_list() {
        let mut s = Shape::new();
        s.as_line(v(0.0, 0.0), v(1.0, 0.0));
        assert_eq!(s.topology(), Topology::LineList);
        assert_eq!(s.kind(), ShapeKind::Line);
    }

    #[test]
    fn degenerate_polygon_has_no_triangles() {
        let mut s = Shape::new();
        s.as_polygon(&[v(0.0, 0.0), v(1.0, 0.0)]);
        assert_eq!(s.vertex_count(), 2);
        assert!(s.indices().is_empty());
    }

    #[test]
    fn frame_thickness_corrects_aspect() {
        let t = frame_thickness(4.0, v(800.0, 400.0));
        assert_eq!(t, v(0.005, 0.01));
        assert_eq!(frame_thickness(4.0, v(0.0, 0.0)), v(0.0, 0.0));
    }

    // ── setters ───────────────────────────────────────────────────────────

    #[test]
    fn setters_reject_out_of_range_index() {
        let mut s = Shape::new();
        s.as_triangle(Triangle::new(v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0)));
        let err = ShapeError::VertexOutOfRange { index: 3, count: 3 };
        assert_eq!(s.set_vertex_color(3, Rgba::BLACK), Err(err.clone()));
        assert_eq!(s.set_vertex_position(3, v(0.0, 0.0)), Err(err.clone()));
        assert_eq!(s.set_vertex_texture_coordinate(3, v(0.0, 0.0)), Err(err));
        assert!(s.set_vertex_color(2, Rgba::BLACK).is_ok());
    }

    #[test]
    fn get_color_is_the_average() {
        let mut s = Shape::new();
        s.as_line(v(0.0, 0.0), v(1.0, 0.0));
        s.set_vertex_color(0, Rgba::new(1.0, 0.0, 0.0, 1.0)).unwrap();
        s.set_vertex_color(1, Rgba::new(0.0, 0.0, 1.0, 0.0)).unwrap();
        assert_eq!(s.get_color(), Rgba::new(0.5, 0.0, 0.5, 0.5));
    }

    #[test]
    fn set_color_paints_every_vertex_and_survives_reshape() {
        let mut s = Shape::new();
        s.as_rectangle(Rectangle::unit()).set_color(Rgba::BLACK);
        assert!(s.colors().iter().all(|&c| c == Rgba::BLACK));
        s.as_circle(Circle::new(v(0.5, 0.5), 0.5), 8);
        assert!(s.colors().iter().all(|&c| c == Rgba::BLACK));
    }

    // ── texture mapping ───────────────────────────────────────────────────

    #[test]
    fn default_tex_coords_cover_the_texture() {
        let mut s = Shape::new();
        s.as_rectangle(Rectangle::new(0.2, 0.2, 0.4, 0.4));
        assert_eq!(s.tex_coords(), &[v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)]);
    }

    #[test]
    fn texture_rectangle_maps_bounding_box() {
        let mut s = Shape::new();
        s.as_rectangle(Rectangle::new(0.0, 0.0, 1.0, 1.0));
        s.set_texture_rectangle(Rectangle::new(0.5, 0.0, 0.25, 0.5));
        assert!(close(s.tex_coords()[0], v(0.5, 0.0)));
        assert!(close(s.tex_coords()[2], v(0.75, 0.5)));
    }

    // ── dirty tracking ────────────────────────────────────────────────────

    #[test]
    fn edits_mark_buffers_dirty() {
        let mut s = Shape::new();
        s.as_rectangle(Rectangle::unit());
        assert!(s.needs_upload());
        s.vertices_dirty = false;
        s.indices_dirty = false;
        assert!(!s.needs_upload());
        s.set_color(Rgba::BLACK);
        assert!(s.needs_upload());
    }
}
