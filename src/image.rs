//! A 2-D array of pixels with format metadata — the storage [`crate::Framebuffer`] attachments
//! are built from.

use crate::math::Vec4;
use crate::pixel::{self, PixelFormat};

/// A 2-dimensional image backed by a flat byte buffer, interpreted according to its
/// [`PixelFormat`].
///
/// Either both `width` and `height` are zero and the backing buffer is empty, or both are
/// non-zero and the buffer holds exactly `width * height * 4` bytes. Out-of-range accesses are
/// never an error: writes are silently ignored, color reads yield a zero vector, and depth reads
/// yield `NaN`.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Image {
    /// Create a new image of the given size and format. `width * height == 0` creates an empty
    /// image regardless of `format`.
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        let mut image = Self {
            width: 0,
            height: 0,
            format,
            data: Vec::new(),
        };
        image.resize(width, height, format);
        image
    }

    /// Replace this image's dimensions and format, reallocating the backing buffer. `width *
    /// height == 0` empties the buffer.
    pub fn resize(&mut self, width: usize, height: usize, format: PixelFormat) {
        self.width = width;
        self.height = height;
        self.format = format;
        self.data.clear();
        if width * height != 0 {
            self.data.resize(width * height * format.texel_size(), 0);
        }
    }

    /// Equivalent to `resize(0, 0, format)`.
    pub fn destroy(&mut self) {
        self.resize(0, 0, self.format);
    }

    /// Whether this image currently owns a non-empty backing buffer.
    pub fn is_created(&self) -> bool {
        !self.data.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The raw backing buffer, e.g. for blitting to a display surface.
    pub fn mapped_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the raw backing buffer.
    pub fn mapped_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    fn texel_offset(&self, i: usize, j: usize) -> Option<usize> {
        if i >= self.width || j >= self.height {
            None
        } else {
            Some((j * self.width + i) * self.format.texel_size())
        }
    }

    /// Read the color at `(i, j)`, decoded per this image's format. Out-of-range coordinates
    /// yield a zero vector.
    pub fn get_color(&self, i: usize, j: usize) -> Vec4 {
        match self.texel_offset(i, j) {
            Some(offset) => {
                let texel: &[u8; 4] = self.data[offset..offset + 4].try_into().unwrap();
                pixel::decode_color(self.format, texel)
            }
            None => Vec4::zero(),
        }
    }

    /// Write `color` at `(i, j)`, encoded per this image's format. Out-of-range coordinates are
    /// a no-op.
    pub fn set_color(&mut self, i: usize, j: usize, color: Vec4) {
        if let Some(offset) = self.texel_offset(i, j) {
            let format = self.format;
            let texel: &mut [u8; 4] = (&mut self.data[offset..offset + 4]).try_into().unwrap();
            pixel::encode_color(format, texel, color);
        }
    }

    /// Read the depth at `(i, j)`. Out-of-range coordinates yield `NaN`.
    pub fn get_depth(&self, i: usize, j: usize) -> f32 {
        match self.texel_offset(i, j) {
            Some(offset) => {
                let texel: &[u8; 4] = self.data[offset..offset + 4].try_into().unwrap();
                pixel::decode_depth(self.format, texel)
            }
            None => f32::NAN,
        }
    }

    /// Write `depth` at `(i, j)`. Out-of-range coordinates are a no-op.
    pub fn set_depth(&mut self, i: usize, j: usize, depth: f32) {
        if let Some(offset) = self.texel_offset(i, j) {
            let format = self.format;
            let texel: &mut [u8; 4] = (&mut self.data[offset..offset + 4]).try_into().unwrap();
            pixel::encode_depth(format, texel, depth);
        }
    }
}
