//! An ordered set of color attachments plus an optional depth attachment (§4.3).

use crate::image::Image;
use crate::math::Vec4;
use crate::pixel::PixelFormat;

/// The value a [`Framebuffer`] attachment is cleared to.
///
/// A tagged enum rather than the untagged union the reference implementation uses: Rust has no
/// ergonomic equivalent, and the caller always knows statically whether they're clearing a color
/// or a depth attachment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ClearValue {
    Color(Vec4),
    Depth(f32),
}

/// A borrowed collection of render targets: zero or more color attachments in a fixed order, and
/// at most one depth attachment.
///
/// The images a `Framebuffer` references must outlive it and must not be resized while it is in
/// use by a draw call.
pub struct Framebuffer<'a> {
    colors: Vec<&'a mut Image>,
    depth: Option<&'a mut Image>,
}

impl<'a> Framebuffer<'a> {
    /// Bind `colors` (in order) and an optional `depth` attachment.
    pub fn new(colors: Vec<&'a mut Image>, depth: Option<&'a mut Image>) -> Self {
        Self { colors, depth }
    }

    /// The number of bound color attachments.
    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    pub fn color(&self, index: usize) -> Option<&Image> {
        self.colors.get(index).map(|img| &**img)
    }

    pub fn color_mut(&mut self, index: usize) -> Option<&mut Image> {
        self.colors.get_mut(index).map(|img| &mut **img)
    }

    pub fn depth(&self) -> Option<&Image> {
        self.depth.as_deref()
    }

    pub fn depth_mut(&mut self) -> Option<&mut Image> {
        self.depth.as_deref_mut()
    }

    /// Fill the color attachment at `index` with `value`. A no-op if no attachment is bound at
    /// that index.
    ///
    /// If the attachment happens to have format [`PixelFormat::Depth32Sfloat`], it is filled with
    /// `value`'s depth component (falling back to `0.0` if a `Color` value was passed); otherwise
    /// it is filled with `value`'s color component (falling back to the zero vector if a `Depth`
    /// value was passed). This mirrors the reference implementation's attachment-format dispatch.
    pub fn clear_color(&mut self, value: ClearValue, index: usize) {
        let Some(image) = self.colors.get_mut(index) else {
            return;
        };

        if image.format() == PixelFormat::Depth32Sfloat {
            let depth = match value {
                ClearValue::Depth(d) => d,
                ClearValue::Color(_) => 0.0,
            };
            fill_depth(image, depth);
        } else {
            let color = match value {
                ClearValue::Color(c) => c,
                ClearValue::Depth(d) => Vec4::new(d, d, d, d),
            };
            fill_color(image, color);
        }
    }

    /// Fill the depth attachment, if any, with `value`. A no-op otherwise.
    pub fn clear_depth(&mut self, value: f32) {
        if let Some(image) = self.depth.as_deref_mut() {
            fill_depth(image, value);
        }
    }
}

fn fill_color(image: &mut Image, color: Vec4) {
    for j in 0..image.height() {
        for i in 0..image.width() {
            image.set_color(i, j, color);
        }
    }
}

fn fill_depth(image: &mut Image, depth: f32) {
    for j in 0..image.height() {
        for i in 0..image.width() {
            image.set_depth(i, j, depth);
        }
    }
}
