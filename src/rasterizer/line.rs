//! Bresenham-style wireframe rasterization (§4.8, line mode).

use crate::framebuffer::Framebuffer;
use crate::interpolate::Attributes;
use crate::math::IVec2;
use crate::pipeline::FragmentOutput;
use crate::polygon::Polygon;
use crate::rasterizer::{depth_test_passes, write_fragment};

const EDGES: [(usize, usize); 3] = [(0, 1), (1, 2), (2, 0)];

/// Rasterize the three edges of `polygon` as lines, invoking `fragment_shader` once per covered
/// pixel that passes the depth test.
pub(crate) fn rasterize<A, const N: usize>(
    polygon: &Polygon<A>,
    framebuffer: &mut Framebuffer,
    depth_test_enable: bool,
    mut fragment_shader: impl FnMut(A, IVec2, f32, &mut FragmentOutput<N>),
) where
    A: Attributes,
{
    for &(a, b) in &EDGES {
        rasterize_edge(polygon, a, b, framebuffer, depth_test_enable, &mut fragment_shader);
    }
}

fn rasterize_edge<A, const N: usize>(
    polygon: &Polygon<A>,
    a: usize,
    b: usize,
    framebuffer: &mut Framebuffer,
    depth_test_enable: bool,
    fragment_shader: &mut impl FnMut(A, IVec2, f32, &mut FragmentOutput<N>),
) where
    A: Attributes,
{
    let start_vertex = polygon.vertices[a];
    let end_vertex = polygon.vertices[b];

    let start = IVec2::new(
        start_vertex.position.x.floor() as i64,
        start_vertex.position.y.floor() as i64,
    );
    let end = IVec2::new(end_vertex.position.x.floor() as i64, end_vertex.position.y.floor() as i64);

    let start_z = start_vertex.position.z;
    let start_inv_w = start_vertex.position.w;
    let start_attrs = start_vertex.attributes;

    let dx = (end.x - start.x).abs();
    let dy = (end.y - start.y).abs();
    let major_axis = dx.max(dy);

    // A zero-length edge has nothing to step across.
    if major_axis == 0 {
        return;
    }

    let x_major = dx > dy;
    let major_step: i64 = if x_major {
        if end.x < start.x {
            -1
        } else {
            1
        }
    } else if end.y < start.y {
        -1
    } else {
        1
    };
    let minor_step: i64 = if x_major {
        if end.y < start.y {
            -1
        } else {
            1
        }
    } else if end.x < start.x {
        -1
    } else {
        1
    };
    let minor_axis_total = dx.min(dy);

    let step_z = (end_vertex.position.z - start_z) / major_axis as f32;
    let step_inv_w = (end_vertex.position.w - start_inv_w) / major_axis as f32;
    let step_attrs = (end_vertex.attributes - start_attrs).div_i64(major_axis);

    let major_end = if x_major { end.x } else { end.y };
    let mut major_pos = if x_major { start.x } else { start.y };
    let mut minor_pos = if x_major { start.y } else { start.x };
    let mut minor_accum = minor_axis_total;
    let mut i: i64 = 0;

    while major_pos != major_end {
        let (x, y) = if x_major { (major_pos, minor_pos) } else { (minor_pos, major_pos) };
        let z = start_z + step_z * i as f32;
        let inv_w = start_inv_w + step_inv_w * i as f32;
        let attrs = start_attrs + step_attrs * i as f32;

        if depth_test_passes(framebuffer, depth_test_enable, x, y, z) {
            let true_w = 1.0 / inv_w;
            let mut output = FragmentOutput::default();
            fragment_shader(attrs * true_w, IVec2::new(x, y), z, &mut output);
            write_fragment(framebuffer, x, y, z, &output);
        }

        major_pos += major_step;
        minor_accum += minor_axis_total;
        if minor_accum >= major_axis {
            minor_accum -= major_axis;
            minor_pos += minor_step;
        }
        i += 1;
    }
}
