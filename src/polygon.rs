//! Vertices, triangles and homogeneous clip-space clipping (§4.6).

use crate::interpolate::Attributes;
use crate::math::Vec4;
use core::ops::{Add, Mul, Sub};

/// A clip-space vertex: a homogeneous position plus an arbitrary interpolated attribute record.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex<A> {
    pub position: Vec4,
    pub attributes: A,
}

impl<A> Vertex<A> {
    pub fn new(position: Vec4, attributes: A) -> Self {
        Self { position, attributes }
    }
}

impl<A: Attributes> Vertex<A> {
    /// `a + (b - a) * t`, applied componentwise to both the position and the attributes.
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        Self {
            position: a.position + (b.position - a.position) * t,
            attributes: Attributes::lerp(a.attributes, b.attributes, t),
        }
    }
}

impl<A: Attributes> Add for Vertex<A> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            position: self.position + rhs.position,
            attributes: self.attributes + rhs.attributes,
        }
    }
}

impl<A: Attributes> Sub for Vertex<A> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            position: self.position - rhs.position,
            attributes: self.attributes - rhs.attributes,
        }
    }
}

impl<A: Attributes> Mul<f32> for Vertex<A> {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self {
            position: self.position * rhs,
            attributes: self.attributes * rhs,
        }
    }
}

/// A triangle of three clip-space vertices, wound in the order the vertex shader emitted them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Polygon<A> {
    pub vertices: [Vertex<A>; 3],
}

impl<A> Polygon<A> {
    pub fn new(v0: Vertex<A>, v1: Vertex<A>, v2: Vertex<A>) -> Self {
        Self { vertices: [v0, v1, v2] }
    }
}

/// One of the six finite clip-volume planes, plus the `w > 0` plane that rejects points behind
/// the eye. Ordered the way [`Polygon::clip_against_plane`] must be applied: `w` first, so the
/// remaining five tests can assume `w` is positive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClipPlane {
    PositiveW,
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

/// All seven clip planes, in the order a full clip pass must test them.
pub const CLIP_PLANES: [ClipPlane; 7] = [
    ClipPlane::PositiveW,
    ClipPlane::PositiveX,
    ClipPlane::NegativeX,
    ClipPlane::PositiveY,
    ClipPlane::NegativeY,
    ClipPlane::PositiveZ,
    ClipPlane::NegativeZ,
];

/// Whether `position` lies outside the half-space `plane` describes.
pub fn is_vertex_outside(plane: ClipPlane, position: Vec4) -> bool {
    let (x, y, z, w) = (position.x, position.y, position.z, position.w);
    match plane {
        ClipPlane::PositiveW => w < f32::EPSILON,
        ClipPlane::PositiveX => x > w,
        ClipPlane::NegativeX => x < -w,
        ClipPlane::PositiveY => y > w,
        ClipPlane::NegativeY => y < -w,
        ClipPlane::PositiveZ => z > w,
        ClipPlane::NegativeZ => z < -w,
    }
}

/// The interpolation factor `t` at which the segment `start -> end` crosses `plane`.
pub fn plane_lerp_factor(plane: ClipPlane, start: Vec4, end: Vec4) -> f32 {
    match plane {
        ClipPlane::PositiveW => (f32::EPSILON - start.w) / (end.w - start.w),
        ClipPlane::PositiveX => (start.x - start.w) / ((end.w - start.w) - (end.x - start.x)),
        ClipPlane::NegativeX => -(start.w + start.x) / ((end.x - start.x) + (end.w - start.w)),
        ClipPlane::PositiveY => (start.y - start.w) / ((end.w - start.w) - (end.y - start.y)),
        ClipPlane::NegativeY => -(start.w + start.y) / ((end.y - start.y) + (end.w - start.w)),
        ClipPlane::PositiveZ => (start.z - start.w) / ((end.w - start.w) - (end.z - start.z)),
        ClipPlane::NegativeZ => -(start.w + start.z) / ((end.z - start.z) + (end.w - start.w)),
    }
}

/// The outcome of clipping one [`Polygon`] against one [`ClipPlane`].
///
/// An enum carrying its own payload, rather than the reference implementation's
/// `(ClipResult, &mut (Polygon, Polygon))` out-parameter pair: the caller can match on exactly
/// the triangles that exist instead of reading uninitialized slots.
pub enum ClipResult<A> {
    /// All three vertices are inside the plane; the polygon is unchanged.
    Inside,
    /// All three vertices are outside the plane; the polygon is entirely discarded.
    Outside,
    /// Two vertices were outside; clipping produces a single smaller triangle.
    One(Polygon<A>),
    /// One vertex was outside; clipping produces a quad, emitted as two triangles.
    Two(Polygon<A>, Polygon<A>),
}

impl<A: Attributes> Polygon<A> {
    /// Clip this triangle against a single plane, per the Sutherland-Hodgman construction used
    /// throughout the pipeline's clip stage.
    pub fn clip_against_plane(&self, plane: ClipPlane) -> ClipResult<A> {
        let mut outside_mask: u32 = 0;
        for i in 0..3 {
            if is_vertex_outside(plane, self.vertices[i].position) {
                outside_mask |= 1 << i;
            }
        }

        match outside_mask.count_ones() {
            0 => ClipResult::Inside,
            3 => ClipResult::Outside,
            2 => {
                // Exactly one vertex survives; rebuild a single triangle around it.
                let target = (0..3).find(|&i| outside_mask & (1 << i) == 0).unwrap();
                let prev = (target + 2) % 3;
                let post = (target + 1) % 3;

                let prev_t = plane_lerp_factor(plane, self.vertices[prev].position, self.vertices[target].position);
                let post_t = plane_lerp_factor(plane, self.vertices[post].position, self.vertices[target].position);

                ClipResult::One(Polygon::new(
                    Vertex::lerp(self.vertices[prev], self.vertices[target], prev_t),
                    self.vertices[target],
                    Vertex::lerp(self.vertices[post], self.vertices[target], post_t),
                ))
            }
            _ => {
                // Exactly one vertex is outside; the other two survive, the edges through the
                // outside vertex are clipped, producing a quad split into two triangles.
                let target = (0..3).find(|&i| outside_mask & (1 << i) != 0).unwrap();
                let prev = (target + 2) % 3;
                let post = (target + 1) % 3;

                let prev_t = plane_lerp_factor(plane, self.vertices[target].position, self.vertices[prev].position);
                let post_t = plane_lerp_factor(plane, self.vertices[target].position, self.vertices[post].position);

                let clipped_prev = Vertex::lerp(self.vertices[target], self.vertices[prev], prev_t);
                let clipped_post = Vertex::lerp(self.vertices[target], self.vertices[post], post_t);

                ClipResult::Two(
                    Polygon::new(self.vertices[prev], clipped_prev, self.vertices[post]),
                    Polygon::new(self.vertices[post], clipped_prev, clipped_post),
                )
            }
        }
    }
}
