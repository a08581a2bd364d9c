//! The arithmetic capability contract a vertex attribute record must satisfy to be carried
//! through the pipeline (§4.5).

use core::ops::{Add, AddAssign, Mul, MulAssign, Sub};

/// The operations the pipeline needs to be able to perform on a vertex attribute record in order
/// to clip, perspective-divide and interpolate it.
///
/// A blanket implementation covers any type that already implements the required operator
/// traits, so ordinary attribute records — `f32`, `vek` vectors, tuples of either — get this for
/// free. The one capability this trait adds beyond plain operator overloading is [`div_i64`],
/// used by the rasterizer to divide an edge's total attribute delta by its pixel-length; it is
/// expressed in terms of [`Mul<f32>`] rather than requiring attribute types to implement
/// `Div<i64>` directly, since no vector-math crate does that and the pipeline never needs any
/// other integer division.
///
/// Also requires [`Send`] + [`Sync`]: the `par` fill rasterizer hands attribute values across a
/// scoped thread pool for interpolation before the fragment shader runs back on the calling
/// thread (see [`crate::rasterizer::fill`]), and shares the source triangle's vertices by
/// reference with every worker. Every practical attribute record — floats, `vek` vectors, tuples
/// of either — is `Send + Sync` for free, so this never costs callers anything in practice.
///
/// [`div_i64`]: Attributes::div_i64
pub trait Attributes:
    Copy
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f32, Output = Self>
    + MulAssign<f32>
    + AddAssign
{
    /// Divide every component of `self` by `n`, the length in pixels of the edge this delta will
    /// be stepped across.
    #[inline]
    fn div_i64(self, n: i64) -> Self {
        self * (1.0 / n as f32)
    }

    /// Linearly interpolate between `a` and `b`: `a + (b - a) * t`.
    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }

    /// The weighted sum `a*wa + b*wb + c*wc`, used by the barycentric fill rasterizer.
    #[inline]
    fn weighted_sum3(a: Self, b: Self, c: Self, wa: f32, wb: f32, wc: f32) -> Self {
        a * wa + b * wb + c * wc
    }
}

impl<T> Attributes for T where
    T: Copy
        + Send
        + Sync
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<f32, Output = T>
        + MulAssign<f32>
        + AddAssign
{
}

macro_rules! impl_tuple_ops {
    ($($idx:tt : $t:ident),+) => {
        impl<$($t: Add<Output = $t>),+> Add for ($($t,)+) {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                ($(self.$idx + rhs.$idx,)+)
            }
        }

        impl<$($t: Sub<Output = $t>),+> Sub for ($($t,)+) {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                ($(self.$idx - rhs.$idx,)+)
            }
        }

        impl<$($t: Mul<f32, Output = $t>),+> Mul<f32> for ($($t,)+) {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: f32) -> Self {
                ($(self.$idx * rhs,)+)
            }
        }

        impl<$($t: MulAssign<f32>),+> MulAssign<f32> for ($($t,)+) {
            #[inline]
            fn mul_assign(&mut self, rhs: f32) {
                $(self.$idx *= rhs;)+
            }
        }

        impl<$($t: AddAssign),+> AddAssign for ($($t,)+) {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                $(self.$idx += rhs.$idx;)+
            }
        }
    };
}

impl_tuple_ops!(0: A);
impl_tuple_ops!(0: A, 1: B);
impl_tuple_ops!(0: A, 1: B, 2: C);
impl_tuple_ops!(0: A, 1: B, 2: C, 3: D);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    #[test]
    fn lerp_matches_manual_interpolation() {
        let a = 1.0f32;
        let b = 3.0f32;
        assert_eq!(Attributes::lerp(a, b, 0.5), 2.0);
    }

    #[test]
    fn weighted_sum_of_vec3_is_linear_combination() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = Vec3::new(0.0, 0.0, 1.0);
        let mixed = Attributes::weighted_sum3(a, b, c, 0.2, 0.3, 0.5);
        assert!((mixed - Vec3::new(0.2, 0.3, 0.5)).magnitude() < 1e-6);
    }

    #[test]
    fn div_i64_matches_scalar_division() {
        let v = Vec3::new(10.0, 20.0, 30.0);
        assert!((v.div_i64(10) - Vec3::new(1.0, 2.0, 3.0)).magnitude() < 1e-6);
    }

    #[test]
    fn tuple_attribute_combines_componentwise() {
        let a = (Vec3::new(1.0, 1.0, 1.0), 2.0f32);
        let b = (Vec3::new(2.0, 2.0, 2.0), 4.0f32);
        let sum = a + b;
        assert_eq!(sum.1, 6.0);
        assert!((sum.0 - Vec3::new(3.0, 3.0, 3.0)).magnitude() < 1e-6);
    }
}
