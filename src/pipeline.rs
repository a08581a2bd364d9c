//! Vertex-to-fragment orchestration (§4.7–§4.11): clipping, perspective divide, the viewport
//! transform, culling and dispatch to a rasterizer.

use crate::error::DrawError;
use crate::framebuffer::Framebuffer;
use crate::interpolate::Attributes;
use crate::math::{IVec2, Vec4};
use crate::polygon::{ClipResult, Polygon, Vertex, CLIP_PLANES};
use crate::rasterizer::{fill, line};
use crate::viewport::Viewport;

/// The set of color values a fragment shader produces, one per bound color attachment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FragmentOutput<const N: usize> {
    pub attachments: [Vec4; N],
}

impl<const N: usize> Default for FragmentOutput<N> {
    fn default() -> Self {
        Self {
            attachments: [Vec4::zero(); N],
        }
    }
}

/// Whether a draw call rasterizes triangle edges or triangle interiors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RasterizationTopology {
    Line,
    Fill,
}

/// Which winding of a triangle, if any, is discarded before rasterization.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CullSide {
    None,
    Back,
    Front,
}

/// Which winding order of window-space vertices is considered front-facing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CullOrder {
    ClockWise,
    CounterClockWise,
}

/// The caller-supplied configuration of a draw call: read-only for the duration of the call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PipelineState {
    pub topology: RasterizationTopology,
    pub depth_test_enable: bool,
    pub viewport: Viewport,
    pub cull_side: CullSide,
    pub cull_order: CullOrder,
}

impl PipelineState {
    /// Filled, depth-tested, back-face culled with a clockwise front face — the common case for
    /// solid opaque geometry.
    pub fn fill(viewport: Viewport) -> Self {
        Self {
            topology: RasterizationTopology::Fill,
            depth_test_enable: true,
            viewport,
            cull_side: CullSide::Back,
            cull_order: CullOrder::ClockWise,
        }
    }

    /// Wireframe, depth-tested, uncloaked — the common case for debug overlays and edge-only
    /// rendering, where there is no well-defined front face to cull.
    pub fn line(viewport: Viewport) -> Self {
        Self {
            topology: RasterizationTopology::Line,
            depth_test_enable: true,
            viewport,
            cull_side: CullSide::None,
            cull_order: CullOrder::ClockWise,
        }
    }
}

/// A reusable vertex/fragment shader pair bound to a fixed vertex layout.
///
/// `VS` and `FS` are ordinary generic closures or function items rather than a boxed/type-erased
/// callable: monomorphizing the pipeline per shader pair lets the optimizer inline straight
/// through both stages, at the cost of one `Pipeline` type per distinct shader pair.
pub struct Pipeline<A, SD, const N: usize, VS, FS> {
    vertex_stride: usize,
    vertex_shader: VS,
    fragment_shader: FS,
    _marker: core::marker::PhantomData<fn(SD) -> A>,
}

impl<A, SD, const N: usize, VS, FS> Pipeline<A, SD, N, VS, FS>
where
    A: Attributes,
    VS: Fn(u32, &[u8], &mut SD) -> Vertex<A>,
    FS: Fn(&A, IVec2, f32, &mut FragmentOutput<N>, &mut SD),
{
    /// Bind a vertex shader (vertex index, raw vertex bytes, shader data → clip-space vertex) and
    /// a fragment shader to a vertex buffer laid out with `vertex_stride` bytes per vertex.
    pub fn new(vertex_stride: usize, vertex_shader: VS, fragment_shader: FS) -> Self {
        Self {
            vertex_stride,
            vertex_shader,
            fragment_shader,
            _marker: core::marker::PhantomData,
        }
    }

    /// Draw `count` vertices from `vertex_data` as `count / 3` triangles, in submission order.
    pub fn draw(
        &self,
        framebuffer: &mut Framebuffer,
        vertex_data: &[u8],
        count: usize,
        state: &PipelineState,
        shader_data: &mut SD,
    ) -> Result<(), DrawError> {
        self.draw_impl(framebuffer, vertex_data, None, count, state, shader_data)
    }

    /// As [`Self::draw`], but vertices are fetched through `indices` rather than sequentially.
    pub fn draw_indexed(
        &self,
        framebuffer: &mut Framebuffer,
        vertex_data: &[u8],
        indices: &[u32],
        count: usize,
        state: &PipelineState,
        shader_data: &mut SD,
    ) -> Result<(), DrawError> {
        self.draw_impl(framebuffer, vertex_data, Some(indices), count, state, shader_data)
    }

    fn draw_impl(
        &self,
        framebuffer: &mut Framebuffer,
        vertex_data: &[u8],
        indices: Option<&[u32]>,
        count: usize,
        state: &PipelineState,
        shader_data: &mut SD,
    ) -> Result<(), DrawError> {
        if count % 3 != 0 {
            log::debug!("draw rejected: vertex count {} is not a multiple of 3", count);
            return Err(DrawError::VertexCountNotMultipleOfThree(count));
        }

        let mut index = 0;
        while index < count {
            let polygon = self.vertex_shader_evaluation(vertex_data, indices, index, shader_data);
            self.clipping_evaluation(polygon, 0, framebuffer, state, shader_data);
            index += 3;
        }
        Ok(())
    }

    fn vertex_shader_evaluation(
        &self,
        vertex_data: &[u8],
        indices: Option<&[u32]>,
        index: usize,
        shader_data: &mut SD,
    ) -> Polygon<A> {
        let vertices = core::array::from_fn(|i| {
            let vertex_index = match indices {
                Some(idx) => idx[index + i] as usize,
                None => index + i,
            };
            let start = vertex_index * self.vertex_stride;
            let bytes = &vertex_data[start..start + self.vertex_stride];
            (self.vertex_shader)((index + i) as u32, bytes, shader_data)
        });

        Polygon { vertices }
    }

    fn clipping_evaluation(
        &self,
        polygon: Polygon<A>,
        planes_done: u8,
        framebuffer: &mut Framebuffer,
        state: &PipelineState,
        shader_data: &mut SD,
    ) {
        let mut planes_done = planes_done;
        for (i, &plane) in CLIP_PLANES.iter().enumerate() {
            let bit = 1u8 << i;
            if planes_done & bit != 0 {
                continue;
            }
            planes_done |= bit;

            match polygon.clip_against_plane(plane) {
                ClipResult::Inside => continue,
                ClipResult::Outside => {
                    log::trace!("triangle discarded by clip plane {:?}", plane);
                    return;
                }
                ClipResult::One(clipped) => {
                    self.clipping_evaluation(clipped, planes_done, framebuffer, state, shader_data);
                    return;
                }
                ClipResult::Two(a, b) => {
                    self.clipping_evaluation(a, planes_done, framebuffer, state, shader_data);
                    self.clipping_evaluation(b, planes_done, framebuffer, state, shader_data);
                    return;
                }
            }
        }

        let mut polygon = polygon;
        homogeneous_division(&mut polygon);
        viewport_transform(&mut polygon, &state.viewport);

        if culling_evaluation(state.cull_side, state.cull_order, &polygon) {
            log::trace!("triangle culled");
            return;
        }

        log::trace!("rasterizing triangle via {:?}", state.topology);
        let fragment_shader = &self.fragment_shader;
        match state.topology {
            RasterizationTopology::Line => {
                line::rasterize(&polygon, framebuffer, state.depth_test_enable, |attrs, pos, z, out| {
                    fragment_shader(&attrs, pos, z, out, shader_data)
                });
            }
            RasterizationTopology::Fill => {
                fill::rasterize(&polygon, framebuffer, &state.viewport, state.depth_test_enable, |attrs, pos, z, out| {
                    fragment_shader(&attrs, pos, z, out, shader_data)
                });
            }
        }
    }
}

/// Perspective divide: replace `(x,y,z,w)` with `(x/w, y/w, z/w, 1/w)` and scale the attributes
/// by `1/w`, so later perspective-correct interpolation only has to rescale by `1/w_interp`
/// (§4.7).
fn homogeneous_division<A: Attributes>(polygon: &mut Polygon<A>) {
    for vertex in polygon.vertices.iter_mut() {
        let inv_w = 1.0 / vertex.position.w;
        vertex.position.x *= inv_w;
        vertex.position.y *= inv_w;
        vertex.position.z *= inv_w;
        vertex.position.w = inv_w;
        vertex.attributes *= inv_w;
    }
}

/// Map NDC `[-1,1]^3` onto the pixel rectangle and depth range described by `viewport` (§4.4).
fn viewport_transform<A>(polygon: &mut Polygon<A>, viewport: &Viewport) {
    let half_width = viewport.width as f32 / 2.0;
    let half_height = viewport.height as f32 / 2.0;
    let depth_delta = viewport.max_depth - viewport.min_depth;

    for vertex in polygon.vertices.iter_mut() {
        vertex.position.x = (vertex.position.x + 1.0) * half_width + viewport.x as f32;
        vertex.position.y = (1.0 - vertex.position.y) * half_height + viewport.y as f32;
        vertex.position.z = vertex.position.z * depth_delta + viewport.min_depth;
    }
}

/// Whether `polygon` (already in window space) should be discarded per §4.7's truth table.
fn culling_evaluation<A>(cull_side: CullSide, cull_order: CullOrder, polygon: &Polygon<A>) -> bool {
    if cull_side == CullSide::None {
        return false;
    }

    let v0 = polygon.vertices[0].position;
    let v1 = polygon.vertices[1].position;
    let v2 = polygon.vertices[2].position;
    let screen_z = (v2.x - v0.x) * (v1.y - v0.y) - (v2.y - v0.y) * (v1.x - v0.x);

    match (cull_side, cull_order) {
        (CullSide::Back, CullOrder::ClockWise) => screen_z >= 0.0,
        (CullSide::Back, CullOrder::CounterClockWise) => screen_z <= 0.0,
        (CullSide::Front, CullOrder::ClockWise) => screen_z <= 0.0,
        (CullSide::Front, CullOrder::CounterClockWise) => screen_z >= 0.0,
        (CullSide::None, _) => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Image;
    use crate::math::Vec4 as V4;
    use crate::pixel::PixelFormat;

    fn triangle_vertex(index: u32, bytes: &[u8], _sd: &mut ()) -> Vertex<V4> {
        let pos = f32::from_le_bytes(bytes[0..4].try_into().unwrap());
        let _ = index;
        Vertex::new(V4::new(pos, pos, 0.0, 1.0), V4::zero())
    }

    fn white_fragment(_attrs: &V4, _pos: IVec2, _z: f32, out: &mut FragmentOutput<1>, _sd: &mut ()) {
        out.attachments[0] = V4::one();
    }

    #[test]
    fn draw_rejects_count_not_multiple_of_three() {
        let pipeline = Pipeline::new(4, triangle_vertex, white_fragment);
        let mut color = Image::new(4, 4, PixelFormat::Rgba32Packed);
        let mut fb = Framebuffer::new(vec![&mut color], None);
        let state = PipelineState::fill(Viewport::new(0, 0, 4, 4, 0.0, 1.0));
        let data = [0u8; 16];
        let mut sd = ();

        let err = pipeline.draw(&mut fb, &data, 4, &state, &mut sd).unwrap_err();
        assert_eq!(err, DrawError::VertexCountNotMultipleOfThree(4));
    }

    #[test]
    fn draw_fills_a_triangle_fully_inside_the_viewport() {
        fn vertex_shader(index: u32, _bytes: &[u8], _sd: &mut ()) -> Vertex<V4> {
            let positions = [
                V4::new(-0.5, -0.5, 0.0, 1.0),
                V4::new(0.5, -0.5, 0.0, 1.0),
                V4::new(-0.5, 0.5, 0.0, 1.0),
            ];
            Vertex::new(positions[index as usize % 3], V4::zero())
        }

        let pipeline = Pipeline::new(4, vertex_shader, white_fragment);
        let mut color = Image::new(8, 8, PixelFormat::Rgba32Packed);
        let mut fb = Framebuffer::new(vec![&mut color], None);
        let mut state = PipelineState::fill(Viewport::new(0, 0, 8, 8, 0.0, 1.0));
        // This triangle's winding is back-facing in window space; disable culling so the
        // test exercises fill rasterization rather than the cull stage.
        state.cull_side = CullSide::None;
        let data = [0u8; 12];
        let mut sd = ();

        pipeline.draw(&mut fb, &data, 3, &state, &mut sd).unwrap();

        assert_eq!(fb.color(0).unwrap().get_color(4, 4), V4::one());
    }
}
