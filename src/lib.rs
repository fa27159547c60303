//! # gloop
//!
//! An interactive toy: deformable blob meshes with per-vertex mass-spring
//! physics, poked and dragged with the pointer, rendered through wgpu with a
//! two-color gradient shader and tuned live from an egui panel.
//!
//! The interesting parts live in [`sim`]: blob physics, the blob registry,
//! pointer projection and the drag state machine, all GPU-free and tested
//! without a device. [`render`] keeps GPU buffers in sync with the
//! simulation, and [`app::Viewer`] ties both to a window.
//!
//! ## Example
//!
//! ```
//! use gloop::math::Vector3;
//! use gloop::sim::{shared, Params, Simulation};
//!
//! let mut sim = Simulation::new(shared(Params::default()));
//! sim.spawn_at(Vector3::ZERO);
//! assert_eq!(sim.registry.len(), 1);
//! ```

#![warn(missing_docs)]

pub mod app;
pub mod camera;
pub mod core;
pub mod geometry;
pub mod math;
pub mod render;
pub mod sim;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
