//! Renderer-facing side of the scene: the explicit scene context, per-draw
//! uniforms and the vertex layout meshes are uploaded with.
//! Device/surface setup lives with the windowing layer, not here.

pub mod layout;
pub mod scene;

pub use layout::{MESH_ATTRIBUTES, MESH_LAYOUT};
pub use scene::{DrawItem, ObjectUniforms, Scene, SceneObject};
