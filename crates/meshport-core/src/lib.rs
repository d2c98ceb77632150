//! Meshport Core Library
//!
//! In-memory geometry consumed and produced by the `meshport-io` codecs:
//! a flat [`Mesh`] with optional per-point channels, vertex-colored
//! [`Edge`]s, an optional [`Material`], and a [`Scene`] grouping meshes
//! loaded from one file.

pub mod color;
pub mod material;
pub mod mesh;
pub mod scene;

pub use color::Color;
pub use material::Material;
pub use mesh::{Edge, Mesh};
pub use scene::Scene;
