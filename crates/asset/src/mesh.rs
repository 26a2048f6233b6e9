//! CPU-side mesh representation used by loaders.

use bytemuck::{Pod, Zeroable};

/// Number of `f32` components per vertex in the interleaved stream.
pub const FLOATS_PER_VERTEX: usize = 5;

/// Interleaved vertex: position followed by texture coordinate.
/// Values are in object space; read-only once built.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    position: [f32; 3],
    uv: [f32; 2],
}

impl Vertex {
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
    /// Byte offset of `uv` inside a vertex.
    pub const UV_OFFSET: usize = 3 * std::mem::size_of::<f32>();

    pub fn new(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }

    #[inline]
    pub fn position(&self) -> [f32; 3] {
        self.position
    }

    #[inline]
    pub fn uv(&self) -> [f32; 2] {
        self.uv
    }

    #[inline]
    pub fn to_array(self) -> [f32; FLOATS_PER_VERTEX] {
        let [x, y, z] = self.position;
        let [u, v] = self.uv;
        [x, y, z, u, v]
    }
}

/// Axis-aligned bounds of a mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds {
    pub fn extent(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// Non-indexed triangle list: every 3 consecutive vertices form one triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    vertices: Vec<Vertex>,
}

impl MeshBuffer {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Iterate over complete triangles. A trailing partial triangle is skipped.
    pub fn triangles(&self) -> impl Iterator<Item = &[Vertex; 3]> {
        self.vertices
            .chunks_exact(3)
            .filter_map(|chunk| <&[Vertex; 3]>::try_from(chunk).ok())
    }

    /// Flat `[x, y, z, u, v, ...]` view, ready for a vertex buffer upload.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Returns `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.vertices.first()?;
        let mut bounds = Bounds {
            min: first.position(),
            max: first.position(),
        };
        for v in &self.vertices[1..] {
            for axis in 0..3 {
                bounds.min[axis] = bounds.min[axis].min(v.position()[axis]);
                bounds.max[axis] = bounds.max[axis].max(v.position()[axis]);
            }
        }
        Some(bounds)
    }
}
