//! FieldSketch Render Library
//!
//! Paint pass for a FieldSketch [`Canvas`](fieldsketch_core::Canvas). Drawing
//! goes through the core [`Surface`](fieldsketch_core::Surface) trait, so the
//! same pass feeds a browser 2D context, a native backend or the headless
//! [`RecordingSurface`](fieldsketch_core::RecordingSurface).

mod renderer;

pub use renderer::{GridStyle, RenderContext, Renderer};
