//! Asset loading/parsers.
//! Meshes: OBJ positions + texture coordinates into an interleaved,
//! non-indexed vertex buffer.

pub mod mesh;
pub mod obj;

pub use mesh::{Bounds, MeshBuffer, Vertex};
pub use obj::{
    FaceMode, LoadOptions, MeshError, ParseError, ParseErrorKind, load_obj_from_path,
    load_obj_from_path_with, load_obj_from_reader, load_obj_from_str, load_obj_from_str_with,
};
