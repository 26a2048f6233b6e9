//! Minimal OBJ parser: positions and texture coordinates into an expanded
//! (non-indexed) vertex buffer. Normals and every other directive are skipped.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
    str::SplitWhitespace,
};

use thiserror::Error;

use crate::mesh::{MeshBuffer, Vertex};

/// What went wrong while parsing a single OBJ line.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum ParseErrorKind {
    #[error("malformed vertex")]
    MalformedVertex,
    #[error("malformed texture coordinate")]
    MalformedTexCoord,
    #[error("malformed face")]
    MalformedFace,
    #[error("index out of range")]
    IndexOutOfRange,
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("{kind} on line {line}: {detail}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// 1-based source line.
    pub line: usize,
    pub detail: String,
}

impl ParseError {
    fn new(kind: ParseErrorKind, line: usize, detail: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            detail: detail.into(),
        }
    }
}

/// Errors from the reader/path entry points.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to open OBJ file {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read line {line}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl MeshError {
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self {
            Self::Parse(e) => Some(e.kind),
            _ => None,
        }
    }
}

/// How `f` lines with more than three references are turned into triangles.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FaceMode {
    /// Keep only the first three references of every face.
    #[default]
    FirstTriangle,
    /// Fan-triangulate the whole polygon around its first reference.
    Fan,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LoadOptions {
    pub face_mode: FaceMode,
}

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<MeshBuffer, MeshError> {
    load_obj_from_path_with(path, LoadOptions::default())
}

pub fn load_obj_from_path_with(
    path: impl AsRef<Path>,
    options: LoadOptions,
) -> Result<MeshBuffer, MeshError> {
    let path = path.as_ref();
    log::info!("Loading OBJ from {:?}", path);
    let file = File::open(path).map_err(|source| MeshError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_obj_from_reader_with(BufReader::new(file), options)
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> Result<MeshBuffer, MeshError> {
    load_obj_from_reader_with(reader, LoadOptions::default())
}

pub fn load_obj_from_reader_with<R: BufRead>(
    reader: R,
    options: LoadOptions,
) -> Result<MeshBuffer, MeshError> {
    let mut raw = RawGeometry::new(options.face_mode);
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| MeshError::Read {
            line: line_no + 1,
            source,
        })?;
        raw.feed_line(line_no + 1, &line)?;
    }
    Ok(raw.assemble()?)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> Result<MeshBuffer, ParseError> {
    load_obj_from_str_with(contents, LoadOptions::default())
}

pub fn load_obj_from_str_with(
    contents: &str,
    options: LoadOptions,
) -> Result<MeshBuffer, ParseError> {
    let mut raw = RawGeometry::new(options.face_mode);
    for (line_no, line) in contents.lines().enumerate() {
        raw.feed_line(line_no + 1, line)?;
    }
    raw.assemble()
}

/// One face corner, already converted to 0-based indices.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct FaceRef {
    position: usize,
    texcoord: Option<usize>,
    line: usize,
}

/// Parse-local state; dropped once the buffer is assembled.
struct RawGeometry {
    face_mode: FaceMode,
    positions: Vec<[f32; 3]>,
    texcoords: Vec<[f32; 2]>,
    faces: Vec<FaceRef>,
    truncated_faces: usize,
    dropped_texcoords: usize,
}

impl RawGeometry {
    fn new(face_mode: FaceMode) -> Self {
        Self {
            face_mode,
            positions: Vec::new(),
            texcoords: Vec::new(),
            faces: Vec::new(),
            truncated_faces: 0,
            dropped_texcoords: 0,
        }
    }

    fn feed_line(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }

        let mut parts = trimmed.split_whitespace();
        let Some(tag) = parts.next() else {
            return Ok(());
        };

        match tag {
            "v" => {
                let [x, y, z] =
                    parse_floats::<3>(&mut parts, ParseErrorKind::MalformedVertex, line_no)?;
                self.positions.push([x, y, z]);
            }
            "vt" => {
                let [u, v] =
                    parse_floats::<2>(&mut parts, ParseErrorKind::MalformedTexCoord, line_no)?;
                self.texcoords.push([u, v]);
            }
            "f" => self.feed_face(parts, line_no)?,
            other => {
                log::trace!("Skipping OBJ directive '{}' on line {}", other, line_no);
            }
        }
        Ok(())
    }

    fn feed_face<'a>(
        &mut self,
        parts: impl Iterator<Item = &'a str>,
        line_no: usize,
    ) -> Result<(), ParseError> {
        let tokens: Vec<&str> = parts.collect();
        if tokens.len() < 3 {
            return Err(ParseError::new(
                ParseErrorKind::MalformedFace,
                line_no,
                format!("face needs at least 3 references, found {}", tokens.len()),
            ));
        }

        match self.face_mode {
            FaceMode::FirstTriangle => {
                if tokens.len() > 3 {
                    self.truncated_faces += 1;
                }
                for token in &tokens[..3] {
                    let face_ref = self.parse_face_ref(token, line_no)?;
                    self.faces.push(face_ref);
                }
            }
            FaceMode::Fan => {
                let refs = tokens
                    .iter()
                    .map(|token| self.parse_face_ref(token, line_no))
                    .collect::<Result<Vec<_>, _>>()?;
                for i in 1..refs.len() - 1 {
                    self.faces.extend([refs[0], refs[i], refs[i + 1]]);
                }
            }
        }
        Ok(())
    }

    /// `pos[/tex[/normal]]`; the normal segment is ignored.
    fn parse_face_ref(&mut self, token: &str, line_no: usize) -> Result<FaceRef, ParseError> {
        let mut split = token.split('/');
        let pos = split.next().unwrap_or_default();
        if pos.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::MalformedFace,
                line_no,
                format!("face element '{}' has no position index", token),
            ));
        }
        let raw_pos = parse_index(pos, token, line_no)?;
        let position = resolve_index(raw_pos, self.positions.len()).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::IndexOutOfRange,
                line_no,
                format!(
                    "position index {} does not resolve (positions so far: {})",
                    raw_pos,
                    self.positions.len()
                ),
            )
        })?;

        let texcoord = match split.next() {
            Some(value) if !value.is_empty() => {
                let raw_tex = parse_index(value, token, line_no)?;
                let resolved = resolve_index(raw_tex, self.texcoords.len());
                if resolved.is_none() {
                    self.dropped_texcoords += 1;
                }
                resolved
            }
            _ => None,
        };

        Ok(FaceRef {
            position,
            texcoord,
            line: line_no,
        })
    }

    fn assemble(self) -> Result<MeshBuffer, ParseError> {
        let mut dropped_texcoords = self.dropped_texcoords;
        let mut vertices = Vec::with_capacity(self.faces.len());

        for face_ref in &self.faces {
            let position = self.positions.get(face_ref.position).copied().ok_or_else(|| {
                ParseError::new(
                    ParseErrorKind::IndexOutOfRange,
                    face_ref.line,
                    format!(
                        "position index {} out of bounds (len={})",
                        face_ref.position + 1,
                        self.positions.len()
                    ),
                )
            })?;
            let uv = match face_ref.texcoord {
                Some(i) => self.texcoords.get(i).copied().unwrap_or_else(|| {
                    dropped_texcoords += 1;
                    [0.0, 0.0]
                }),
                None => [0.0, 0.0],
            };
            vertices.push(Vertex::new(position, uv));
        }

        if self.truncated_faces > 0 {
            log::warn!(
                "{} face(s) had more than 3 vertices; only the first triangle of each was kept",
                self.truncated_faces
            );
        }
        if dropped_texcoords > 0 {
            log::warn!(
                "{} face reference(s) pointed at missing texture coordinates; using (0, 0)",
                dropped_texcoords
            );
        }
        log::info!(
            "Loaded OBJ: {} positions, {} texcoords, {} vertices ({} triangles)",
            self.positions.len(),
            self.texcoords.len(),
            vertices.len(),
            vertices.len() / 3
        );

        Ok(MeshBuffer::new(vertices))
    }
}

fn parse_floats<const N: usize>(
    parts: &mut SplitWhitespace<'_>,
    kind: ParseErrorKind,
    line_no: usize,
) -> Result<[f32; N], ParseError> {
    let mut out = [0.0; N];
    for (i, slot) in out.iter_mut().enumerate() {
        let token = parts.next().ok_or_else(|| {
            ParseError::new(kind, line_no, format!("expected {} values, found {}", N, i))
        })?;
        *slot = token
            .parse::<f32>()
            .map_err(|e| ParseError::new(kind, line_no, format!("'{}': {}", token, e)))?;
    }
    Ok(out)
}

fn parse_index(value: &str, token: &str, line_no: usize) -> Result<i64, ParseError> {
    value.parse::<i64>().map_err(|_| {
        ParseError::new(
            ParseErrorKind::MalformedFace,
            line_no,
            format!("invalid index '{}' in face element '{}'", value, token),
        )
    })
}

/// 1-based positive indices map to `raw - 1`; negative ones count back from
/// the elements read so far. Zero never resolves.
fn resolve_index(raw: i64, len: usize) -> Option<usize> {
    match raw {
        0 => None,
        r if r > 0 => usize::try_from(r - 1).ok(),
        r => {
            let back = usize::try_from(r.unsigned_abs()).ok()?;
            len.checked_sub(back)
        }
    }
}
