//! wgpu sink for laid-out text.
//!
//! The caller owns the device, queue and surface; this module only uploads
//! the atlas and draws [`QuadBatch`](crate::text::QuadBatch)es.
//!
//! Convention: vertex positions are pixels (top-left origin, +Y down); the
//! vertex shader converts to NDC with a viewport uniform.

mod text;

pub use text::{TextColor, TextDraw, TextPipeline};
