//! Geometric primitives shared by the collision, scene, and combat crates.

mod aabb;

pub use aabb::Aabb;
