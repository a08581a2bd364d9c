//! A software graphics pipeline: clip, rasterize and shade triangles and lines entirely on the
//! CPU, imitating the fixed-function stages of a GPU (vertex processing, clipping, perspective
//! divide, viewport transform, back-face culling, rasterization, depth test, attachment write).
//!
//! The pipeline is generic over a caller-supplied vertex attribute record (see [`Attributes`]),
//! vertex/fragment shader pair ([`Pipeline`]), and set of pixel attachments ([`Framebuffer`] of
//! [`Image`]s). It does not parse model files, open windows, or sample textures — callers supply
//! vertex/index buffers and shader callables, and copy the finished color attachment to a display
//! surface themselves.

pub mod error;
pub mod framebuffer;
pub mod image;
pub mod interpolate;
pub mod math;
pub mod pipeline;
pub mod pixel;
pub mod polygon;
pub mod rasterizer;
pub mod viewport;

pub use error::DrawError;
pub use framebuffer::{ClearValue, Framebuffer};
pub use image::Image;
pub use interpolate::Attributes;
pub use math::{IVec2, Vec2, Vec3, Vec4};
pub use pipeline::{CullOrder, CullSide, FragmentOutput, Pipeline, PipelineState, RasterizationTopology};
pub use pixel::PixelFormat;
pub use polygon::{ClipPlane, ClipResult, Polygon, Vertex, CLIP_PLANES};
pub use viewport::Viewport;
