//! The small set of vector types used throughout the pipeline.
//!
//! These are thin aliases over [`vek`]'s vector types rather than hand-rolled arithmetic: the
//! pipeline only ever needs componentwise `+`, `-`, scalar `*`/`/`, and component access, all of
//! which `vek` already provides, tested, for any float or integer element type.

/// A 2-component single-precision float vector.
pub type Vec2 = vek::Vec2<f32>;

/// A 3-component single-precision float vector.
pub type Vec3 = vek::Vec3<f32>;

/// A 4-component single-precision float vector, used for homogeneous clip-space positions and
/// colors alike.
pub type Vec4 = vek::Vec4<f32>;

/// A 2-component signed-integer vector, wide enough to hold rasterizer pixel coordinates without
/// overflow at any reasonable image size.
pub type IVec2 = vek::Vec2<i64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec4_componentwise_arithmetic() {
        let a = Vec4::new(1.0, 2.0, 3.0, 4.0);
        let b = Vec4::new(0.5, 0.5, 0.5, 0.5);
        assert_eq!(a + b, Vec4::new(1.5, 2.5, 3.5, 4.5));
        assert_eq!(a - b, Vec4::new(0.5, 1.5, 2.5, 3.5));
        assert_eq!(a * 2.0, Vec4::new(2.0, 4.0, 6.0, 8.0));
        assert_eq!(a / 2.0, Vec4::new(0.5, 1.0, 1.5, 2.0));
    }

    #[test]
    fn ivec2_holds_large_pixel_offsets() {
        let p = IVec2::new(1_000_000_000, -1_000_000_000);
        assert_eq!(p.x, 1_000_000_000);
        assert_eq!(p.y, -1_000_000_000);
    }
}
