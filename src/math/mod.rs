//! # Math Module
//!
//! Minimal 3D math for the blob simulation: vectors, camera matrices,
//! picking rays and colors.

mod color;
mod matrix4;
mod plane;
mod ray;
mod sphere;
mod vector3;

pub use color::Color;
pub use matrix4::Matrix4;
pub use plane::Plane;
pub use ray::Ray;
pub use sphere::Sphere;
pub use vector3::Vector3;
