//! # Render Module
//!
//! The gradient material and the renderer that keeps blob GPU buffers in
//! sync with the simulation.

mod material;
mod renderer;

pub use material::{BlendUniform, CameraUniform, GradientMaterial, ModelUniform};
pub use renderer::BlobRenderer;
