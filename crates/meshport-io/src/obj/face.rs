//! Face record parsing for Wavefront OBJ.
//!
//! A face line names three or four corners. Each corner uses one of four
//! index grammars:
//!
//! | grammar                     | form    |
//! |-----------------------------|---------|
//! | position                    | `v`     |
//! | position + texture          | `v/t`   |
//! | position + normal           | `v//n`  |
//! | position + texture + normal | `v/t/n` |
//!
//! An empty sub-field counts as absent, so `v/` and `v/t/` are accepted.
//! All corners of one face must use the same grammar. Indices are 1-based;
//! negative indices count back from the end of the table read so far.

use crate::error::{MeshIoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceKind {
    Triangle,
    Quad,
}

impl FaceKind {
    pub fn corner_count(self) -> usize {
        match self {
            FaceKind::Triangle => 3,
            FaceKind::Quad => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexGrammar {
    Position,
    PositionTexture,
    PositionNormal,
    PositionTextureNormal,
}

/// Attribute tables a face resolves its indices against.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tables<'a> {
    pub positions: &'a [[f32; 3]],
    pub normals: &'a [[f32; 3]],
    pub textures: &'a [[f32; 3]],
}

/// One resolved face corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub position_index: usize,
    pub texture_index: Option<usize>,
    pub normal_index: Option<usize>,
    pub position: [f32; 3],
    pub texture: Option<[f32; 3]>,
    pub normal: Option<[f32; 3]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub kind: FaceKind,
    pub grammar: IndexGrammar,
    pub corners: Vec<Corner>,
}

impl Face {
    /// Zero-based position indices, one per corner.
    pub fn vertex_indices(&self) -> Vec<usize> {
        self.corners.iter().map(|c| c.position_index).collect()
    }

    /// Zero-based texture indices of the corners that resolved one.
    pub fn texture_indices(&self) -> Vec<usize> {
        self.corners.iter().filter_map(|c| c.texture_index).collect()
    }

    /// Zero-based normal indices of the corners that carry one.
    pub fn normal_indices(&self) -> Vec<usize> {
        self.corners.iter().filter_map(|c| c.normal_index).collect()
    }

    /// Corners as triangles; quads split along the 0-2 diagonal.
    pub fn triangles(&self) -> Vec<[&Corner; 3]> {
        let c = &self.corners;
        match self.kind {
            FaceKind::Triangle => vec![[&c[0], &c[1], &c[2]]],
            FaceKind::Quad => vec![[&c[0], &c[1], &c[2]], [&c[0], &c[2], &c[3]]],
        }
    }
}

/// Parses a face line already split into words, `f` included.
pub fn parse_face(words: &[&str], tables: &Tables<'_>) -> Result<Face> {
    let kind = match words.len() {
        4 => FaceKind::Triangle,
        5 => FaceKind::Quad,
        n => {
            return Err(MeshIoError::UnexpectedArity {
                context: "face (expected 3 or 4 corners)".to_string(),
                found: n.saturating_sub(1),
            })
        }
    };

    let mut grammar = None;
    let mut corners = Vec::with_capacity(kind.corner_count());
    for word in &words[1..] {
        let (corner, corner_grammar) = parse_corner(word, tables)?;
        match grammar {
            None => grammar = Some(corner_grammar),
            Some(g) if g != corner_grammar => {
                return Err(MeshIoError::token(word, "face mixes index grammars"));
            }
            Some(_) => {}
        }
        corners.push(corner);
    }

    Ok(Face {
        kind,
        grammar: grammar.unwrap_or(IndexGrammar::Position),
        corners,
    })
}

fn parse_corner<'w>(word: &'w str, tables: &Tables<'_>) -> Result<(Corner, IndexGrammar)> {
    let fields: Vec<&str> = word.split('/').collect();
    // An empty sub-field is absent: `1/` reads as `1`, `1/2/` as `1/2`.
    let present = |s: &&'w str| -> Option<&'w str> { (!s.is_empty()).then_some(*s) };
    let (position, texture, normal) = match fields.as_slice() {
        [v] => (*v, None, None),
        [v, t] => (*v, present(t), None),
        [v, t, n] => (*v, present(t), present(n)),
        _ => return Err(MeshIoError::token(word, "too many '/' separated fields")),
    };
    let grammar = match (texture, normal) {
        (None, None) => IndexGrammar::Position,
        (Some(_), None) => IndexGrammar::PositionTexture,
        (None, Some(_)) => IndexGrammar::PositionNormal,
        (Some(_), Some(_)) => IndexGrammar::PositionTextureNormal,
    };

    let position_index = resolve(parse_index(position, word)?, tables.positions.len())
        .ok_or_else(|| MeshIoError::token(word, "position index out of range"))?;

    let texture_index = match texture {
        Some(t) => resolve(parse_index(t, word)?, tables.textures.len()),
        None => None,
    };

    let normal_index = match normal {
        Some(n) => Some(
            resolve(parse_index(n, word)?, tables.normals.len())
                .ok_or_else(|| MeshIoError::token(word, "normal index out of range"))?,
        ),
        None => None,
    };

    let corner = Corner {
        position_index,
        texture_index,
        normal_index,
        position: tables.positions[position_index],
        texture: texture_index.map(|i| tables.textures[i]),
        normal: normal_index.map(|i| tables.normals[i]),
    };
    Ok((corner, grammar))
}

fn parse_index(field: &str, word: &str) -> Result<i64> {
    match field.parse::<i64>() {
        Ok(0) => Err(MeshIoError::token(word, "indices start at 1")),
        Ok(i) => Ok(i),
        Err(_) => Err(MeshIoError::token(word, "index is not an integer")),
    }
}

/// Maps a non-zero 1-based or negative relative index into `0..len`.
fn resolve(index: i64, len: usize) -> Option<usize> {
    let resolved = if index > 0 {
        usize::try_from(index - 1).ok()?
    } else {
        len.checked_sub(usize::try_from(index.unsigned_abs()).ok()?)?
    };
    (resolved < len).then_some(resolved)
}
