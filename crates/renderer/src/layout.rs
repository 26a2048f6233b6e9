//! GPU vertex layout for [`asset::Vertex`] streams.

use asset::Vertex;
use wgpu::{VertexAttribute, VertexBufferLayout, VertexStepMode};

/// location 0: position (vec3), location 1: uv (vec2).
pub const MESH_ATTRIBUTES: [VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

/// Interleaved `[x, y, z, u, v]`, one entry per vertex.
pub const MESH_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: Vertex::STRIDE as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &MESH_ATTRIBUTES,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_vertex_struct() {
        assert_eq!(MESH_LAYOUT.array_stride, 5 * 4);
        assert_eq!(MESH_ATTRIBUTES[0].offset, 0);
        assert_eq!(MESH_ATTRIBUTES[0].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(MESH_ATTRIBUTES[1].offset, Vertex::UV_OFFSET as u64);
        assert_eq!(MESH_ATTRIBUTES[1].format, wgpu::VertexFormat::Float32x2);
        assert_eq!(MESH_ATTRIBUTES[1].shader_location, 1);
    }
}
