//! Bounding-box barycentric rasterization with the top-left fill rule (§4.8, fill mode).
//!
//! Unlike the line rasterizer, this has no counterpart in the reference implementation — its own
//! fill stage was left unimplemented. The construction here is the standard edge-function
//! rasterizer (see e.g. Pineda 1988 / Fabian Giesen's "Triangle Rasterization Rules"), generalized
//! from the line rasterizer's `base + step*i` perspective-correction technique to three
//! dimensions via barycentric weights instead of a single edge parameter.

use crate::framebuffer::Framebuffer;
use crate::interpolate::Attributes;
use crate::math::{IVec2, Vec2};
use crate::pipeline::FragmentOutput;
use crate::polygon::Polygon;
use crate::rasterizer::{depth_test_passes_against, write_fragment};
use crate::viewport::Viewport;

#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}

#[inline]
fn is_top_left(a: Vec2, b: Vec2) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dy == 0.0 && dx > 0.0) || dy > 0.0
}

/// The fixed per-triangle geometry the coverage test and attribute interpolation are computed
/// against, shared between the sequential and `par` row-splitting paths.
struct TriangleGeometry<A> {
    p0: Vec2,
    p1: Vec2,
    p2: Vec2,
    area: f32,
    v0: crate::polygon::Vertex<A>,
    v1: crate::polygon::Vertex<A>,
    v2: crate::polygon::Vertex<A>,
}

/// A window-space bounding box, already clamped to the viewport's pixel rectangle.
#[derive(Copy, Clone)]
struct BoundingBox {
    min_x: i64,
    max_x: i64,
    min_y: i64,
    max_y: i64,
}

fn triangle_geometry<A: Attributes>(polygon: &Polygon<A>) -> Option<(TriangleGeometry<A>, BoundingBox)> {
    let mut v = polygon.vertices;
    let p = |i: usize| Vec2::new(v[i].position.x, v[i].position.y);

    let mut area = edge(p(0), p(1), p(2));
    if area == 0.0 {
        return None;
    }
    if area < 0.0 {
        v.swap(1, 2);
        area = -area;
    }

    let (p0, p1, p2) = (p(0), p(1), p(2));
    let min_x = p0.x.min(p1.x).min(p2.x).floor() as i64;
    let max_x = p0.x.max(p1.x).max(p2.x).ceil() as i64;
    let min_y = p0.y.min(p1.y).min(p2.y).floor() as i64;
    let max_y = p0.y.max(p1.y).max(p2.y).ceil() as i64;

    Some((
        TriangleGeometry {
            p0,
            p1,
            p2,
            area,
            v0: v[0],
            v1: v[1],
            v2: v[2],
        },
        BoundingBox { min_x, max_x, min_y, max_y },
    ))
}

fn clamp_to_viewport(bbox: BoundingBox, viewport: &Viewport) -> BoundingBox {
    let vp_min_x = viewport.x as i64;
    let vp_max_x = viewport.x as i64 + viewport.width as i64 - 1;
    let vp_min_y = viewport.y as i64;
    let vp_max_y = viewport.y as i64 + viewport.height as i64 - 1;

    BoundingBox {
        min_x: bbox.min_x.max(vp_min_x),
        max_x: bbox.max_x.min(vp_max_x),
        min_y: bbox.min_y.max(vp_min_y),
        max_y: bbox.max_y.min(vp_max_y),
    }
}

/// Test pixel-center coverage at `(x, y)` and, if covered and depth-tested, return the
/// perspective-corrected attributes and depth ready for the fragment shader.
#[inline]
fn shade_pixel<A: Attributes>(
    geom: &TriangleGeometry<A>,
    depth_image: Option<&crate::image::Image>,
    depth_test_enable: bool,
    x: i64,
    y: i64,
) -> Option<(f32, A)> {
    let pt = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

    let e0 = edge(geom.p1, geom.p2, pt);
    let e1 = edge(geom.p2, geom.p0, pt);
    let e2 = edge(geom.p0, geom.p1, pt);

    let covered = (e0 > 0.0 || (e0 == 0.0 && is_top_left(geom.p1, geom.p2)))
        && (e1 > 0.0 || (e1 == 0.0 && is_top_left(geom.p2, geom.p0)))
        && (e2 > 0.0 || (e2 == 0.0 && is_top_left(geom.p0, geom.p1)));
    if !covered {
        return None;
    }

    let w0 = e0 / geom.area;
    let w1 = e1 / geom.area;
    let w2 = e2 / geom.area;

    let z = w0 * geom.v0.position.z + w1 * geom.v1.position.z + w2 * geom.v2.position.z;
    let inv_w = w0 * geom.v0.position.w + w1 * geom.v1.position.w + w2 * geom.v2.position.w;

    if !depth_test_passes_against(depth_image, depth_test_enable, x, y, z) {
        return None;
    }

    let true_w = 1.0 / inv_w;
    let attrs = Attributes::weighted_sum3(geom.v0.attributes, geom.v1.attributes, geom.v2.attributes, w0, w1, w2);
    Some((z, attrs * true_w))
}

/// Rasterize `polygon`'s interior, invoking `fragment_shader` once per covered pixel that passes
/// the depth test.
#[cfg(not(feature = "par"))]
pub(crate) fn rasterize<A, const N: usize>(
    polygon: &Polygon<A>,
    framebuffer: &mut Framebuffer,
    viewport: &Viewport,
    depth_test_enable: bool,
    mut fragment_shader: impl FnMut(A, IVec2, f32, &mut FragmentOutput<N>),
) where
    A: Attributes,
{
    let Some((geom, bbox)) = triangle_geometry(polygon) else {
        return;
    };
    let bbox = clamp_to_viewport(bbox, viewport);

    for y in bbox.min_y..=bbox.max_y {
        for x in bbox.min_x..=bbox.max_x {
            if let Some((z, attrs)) = shade_pixel(&geom, framebuffer.depth(), depth_test_enable, x, y) {
                let mut output = FragmentOutput::default();
                fragment_shader(attrs, IVec2::new(x, y), z, &mut output);
                write_fragment(framebuffer, x, y, z, &output);
            }
        }
    }
}

/// As the sequential [`rasterize`], but partitions the bounding box's rows across a scoped
/// thread pool for the coverage test, depth test and attribute interpolation (§5's `par`
/// scheduling model).
///
/// The fragment shader itself always runs back on the calling thread, once per covered pixel, in
/// ascending row order: the shader signature threads a `&mut SD` the caller owns exclusively, and
/// splitting that borrow across threads would be unsound, so only the embarrassingly-parallel
/// coverage math is handed to workers. Because a single triangle never covers the same pixel
/// twice, every worker's rows are disjoint and the depth attachment is only ever read (never
/// written) while workers run, so no attachment aliases across threads.
#[cfg(feature = "par")]
pub(crate) fn rasterize<A, const N: usize>(
    polygon: &Polygon<A>,
    framebuffer: &mut Framebuffer,
    viewport: &Viewport,
    depth_test_enable: bool,
    mut fragment_shader: impl FnMut(A, IVec2, f32, &mut FragmentOutput<N>),
) where
    A: Attributes,
{
    let Some((geom, bbox)) = triangle_geometry(polygon) else {
        return;
    };
    let bbox = clamp_to_viewport(bbox, viewport);
    if bbox.min_y > bbox.max_y || bbox.min_x > bbox.max_x {
        return;
    }

    let row_count = (bbox.max_y - bbox.min_y + 1) as usize;
    let worker_count = num_cpus::get().max(1).min(row_count);
    let rows_per_worker = (row_count + worker_count - 1) / worker_count;

    let depth_image = framebuffer.depth();
    let geom = &geom;

    let chunks: Vec<Vec<(i64, i64, f32, A)>> = crossbeam_utils::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(worker_count);
        for worker in 0..worker_count {
            let chunk_min_y = bbox.min_y + (worker * rows_per_worker) as i64;
            let chunk_max_y = (chunk_min_y + rows_per_worker as i64 - 1).min(bbox.max_y);
            handles.push(scope.spawn(move |_| {
                let mut fragments = Vec::new();
                for y in chunk_min_y..=chunk_max_y {
                    for x in bbox.min_x..=bbox.max_x {
                        if let Some((z, attrs)) = shade_pixel(geom, depth_image, depth_test_enable, x, y) {
                            fragments.push((x, y, z, attrs));
                        }
                    }
                }
                fragments
            }));
        }
        handles.into_iter().map(|h| h.join().expect("fill rasterizer worker panicked")).collect()
    })
    .expect("fill rasterizer scope panicked");

    for fragments in chunks {
        for (x, y, z, attrs) in fragments {
            let mut output = FragmentOutput::default();
            fragment_shader(attrs, IVec2::new(x, y), z, &mut output);
            write_fragment(framebuffer, x, y, z, &output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Image;
    use crate::math::Vec4;
    use crate::pixel::PixelFormat;
    use crate::polygon::Vertex;

    fn vtx(x: f32, y: f32) -> Vertex<f32> {
        Vertex::new(Vec4::new(x, y, 0.0, 1.0), 0.0)
    }

    fn vp(w: u32, h: u32) -> Viewport {
        Viewport::new(0, 0, w, h, 0.0, 1.0)
    }

    #[test]
    fn fills_interior_pixels_of_a_right_triangle() {
        let mut color = Image::new(8, 8, PixelFormat::Rgba32Packed);
        let mut fb = Framebuffer::new(vec![&mut color], None);
        let poly = Polygon::new(vtx(0.0, 0.0), vtx(4.0, 0.0), vtx(0.0, 4.0));

        let mut count = 0;
        rasterize::<_, 1>(&poly, &mut fb, &vp(8, 8), false, |_attrs, _pos, _z, out: &mut FragmentOutput<1>| {
            out.attachments[0] = Vec4::one();
            count += 1;
        });

        // a right triangle with legs n covers n*(n-1)/2 pixel centers under the top-left rule.
        assert_eq!(count, 6);
    }

    #[test]
    fn zero_area_triangle_is_skipped() {
        let mut color = Image::new(4, 4, PixelFormat::Rgba32Packed);
        let mut fb = Framebuffer::new(vec![&mut color], None);
        let poly = Polygon::new(vtx(1.0, 1.0), vtx(2.0, 1.0), vtx(3.0, 1.0));

        let mut count = 0;
        rasterize::<_, 1>(&poly, &mut fb, &vp(4, 4), false, |_attrs, _pos, _z, _out: &mut FragmentOutput<1>| {
            count += 1;
        });

        assert_eq!(count, 0);
    }

    #[test]
    fn bounding_box_is_clamped_to_viewport() {
        let mut color = Image::new(2, 2, PixelFormat::Rgba32Packed);
        let mut fb = Framebuffer::new(vec![&mut color], None);
        let poly = Polygon::new(vtx(-5.0, -5.0), vtx(10.0, -5.0), vtx(-5.0, 10.0));

        let mut count = 0;
        rasterize::<_, 1>(&poly, &mut fb, &vp(2, 2), false, |_attrs, _pos, _z, _out: &mut FragmentOutput<1>| {
            count += 1;
        });

        assert_eq!(count, 4); // clamped to the full 2x2 viewport
    }
}
