//! Conversion between normalized float colors/depths and packed 32-bit pixel storage.
//!
//! The rasterizer and [`crate::Image`] never touch raw bytes directly; every read or write goes
//! through one of the four functions here, parameterized on a [`PixelFormat`].

use crate::math::Vec4;

/// The pixel formats an [`crate::Image`] may be created with.
///
/// Every variant occupies exactly 4 bytes per texel. The four packed variants store the same
/// four 8-bit channels in different byte orders; `Depth32Sfloat` stores a single `f32` and is
/// never interpreted as a color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgba32Packed,
    Bgra32Packed,
    Argb32Packed,
    Abgr32Packed,
    Depth32Sfloat,
}

impl PixelFormat {
    /// The size, in bytes, of one texel in this format. Always 4 for every variant this crate
    /// supports.
    #[inline]
    pub const fn texel_size(self) -> usize {
        4
    }
}

#[inline]
fn channel_to_byte(value: f32) -> u32 {
    (value.clamp(0.0, 1.0) * 255.0) as u32
}

#[inline]
fn byte_to_channel(value: u8) -> f32 {
    (1.0 / 255.0) * value as f32
}

/// Clamp, quantize and pack a color into a texel, honoring `fmt`'s channel order.
///
/// For `Depth32Sfloat`, `color.x` is stored verbatim as a float, without clamping.
pub fn encode_color(fmt: PixelFormat, out: &mut [u8; 4], color: Vec4) {
    let packed = match fmt {
        PixelFormat::Rgba32Packed => {
            (channel_to_byte(color.x) << 24)
                | (channel_to_byte(color.y) << 16)
                | (channel_to_byte(color.z) << 8)
                | (channel_to_byte(color.w) << 0)
        }
        PixelFormat::Bgra32Packed => {
            (channel_to_byte(color.x) << 8)
                | (channel_to_byte(color.y) << 16)
                | (channel_to_byte(color.z) << 24)
                | (channel_to_byte(color.w) << 0)
        }
        PixelFormat::Argb32Packed => {
            (channel_to_byte(color.x) << 16)
                | (channel_to_byte(color.y) << 8)
                | (channel_to_byte(color.z) << 0)
                | (channel_to_byte(color.w) << 24)
        }
        PixelFormat::Abgr32Packed => {
            (channel_to_byte(color.x) << 0)
                | (channel_to_byte(color.y) << 8)
                | (channel_to_byte(color.z) << 16)
                | (channel_to_byte(color.w) << 24)
        }
        PixelFormat::Depth32Sfloat => {
            *out = color.x.to_le_bytes();
            return;
        }
    };
    *out = packed.to_le_bytes();
}

/// Unpack a texel into a color, honoring `fmt`'s channel order. Inverse of [`encode_color`].
///
/// For `Depth32Sfloat`, returns `(d, 0, 0, 0)` where `d` is the stored float.
pub fn decode_color(fmt: PixelFormat, data: &[u8; 4]) -> Vec4 {
    if let PixelFormat::Depth32Sfloat = fmt {
        return Vec4::new(f32::from_le_bytes(*data), 0.0, 0.0, 0.0);
    }

    let packed = u32::from_le_bytes(*data);
    let channel = |shift: u32| byte_to_channel(((packed >> shift) & 0xFF) as u8);

    match fmt {
        PixelFormat::Rgba32Packed => Vec4::new(channel(24), channel(16), channel(8), channel(0)),
        PixelFormat::Bgra32Packed => Vec4::new(channel(8), channel(16), channel(24), channel(0)),
        PixelFormat::Argb32Packed => Vec4::new(channel(16), channel(8), channel(0), channel(24)),
        PixelFormat::Abgr32Packed => Vec4::new(channel(0), channel(8), channel(16), channel(24)),
        PixelFormat::Depth32Sfloat => unreachable!(),
    }
}

/// Write a raw depth float into a texel. Format-independent: every format stores the bits the
/// same way when treated as a depth attachment.
pub fn encode_depth(_fmt: PixelFormat, out: &mut [u8; 4], depth: f32) {
    *out = depth.to_le_bytes();
}

/// Read a raw depth float out of a texel. Inverse of [`encode_depth`], and likewise
/// format-independent.
pub fn decode_depth(_fmt: PixelFormat, data: &[u8; 4]) -> f32 {
    f32::from_le_bytes(*data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLOR_FORMATS: [PixelFormat; 4] = [
        PixelFormat::Rgba32Packed,
        PixelFormat::Bgra32Packed,
        PixelFormat::Argb32Packed,
        PixelFormat::Abgr32Packed,
    ];

    #[test]
    fn color_round_trips_within_one_quantization_step() {
        for fmt in COLOR_FORMATS {
            for k in 0..=255u32 {
                let c = k as f32 / 255.0;
                let color = Vec4::new(c, c, c, c);
                let mut bytes = [0u8; 4];
                encode_color(fmt, &mut bytes, color);
                let back = decode_color(fmt, &bytes);
                assert!((back.x - color.x).abs() <= 1.0 / 255.0, "{:?} {:?}", fmt, back);
                assert!((back.y - color.y).abs() <= 1.0 / 255.0);
                assert!((back.z - color.z).abs() <= 1.0 / 255.0);
                assert!((back.w - color.w).abs() <= 1.0 / 255.0);
            }
        }
    }

    #[test]
    fn color_clamps_out_of_range_channels() {
        let mut bytes = [0u8; 4];
        encode_color(PixelFormat::Rgba32Packed, &mut bytes, Vec4::new(-1.0, 2.0, 0.5, 0.0));
        let back = decode_color(PixelFormat::Rgba32Packed, &bytes);
        assert_eq!(back.x, 0.0);
        assert_eq!(back.y, 1.0);
    }

    #[test]
    fn depth_round_trips_bitwise() {
        for d in [0.0f32, 1.0, -1.0, 0.5, 123.456, f32::MIN_POSITIVE, -0.0] {
            for fmt in COLOR_FORMATS.iter().copied().chain([PixelFormat::Depth32Sfloat]) {
                let mut bytes = [0u8; 4];
                encode_depth(fmt, &mut bytes, d);
                assert_eq!(decode_depth(fmt, &bytes).to_bits(), d.to_bits());
            }
        }
    }

    #[test]
    fn depth_format_round_trips_via_color_path_too() {
        let mut bytes = [0u8; 4];
        encode_color(PixelFormat::Depth32Sfloat, &mut bytes, Vec4::new(0.25, 0.0, 0.0, 0.0));
        let back = decode_color(PixelFormat::Depth32Sfloat, &bytes);
        assert_eq!(back, Vec4::new(0.25, 0.0, 0.0, 0.0));
    }

    #[test]
    fn same_scene_in_rgba_and_bgra_decodes_equal() {
        let color = Vec4::new(0.2, 0.4, 0.6, 0.8);
        let mut rgba = [0u8; 4];
        let mut bgra = [0u8; 4];
        encode_color(PixelFormat::Rgba32Packed, &mut rgba, color);
        encode_color(PixelFormat::Bgra32Packed, &mut bgra, color);
        let rgba_back = decode_color(PixelFormat::Rgba32Packed, &rgba);
        let bgra_back = decode_color(PixelFormat::Bgra32Packed, &bgra);
        assert!((rgba_back - bgra_back).magnitude() < 1e-5);
    }
}
