//! Wavefront material library (`.mtl`) parsing.
//!
//! Only the statements that map onto [`Material`] are read: `newmtl`, `Ka`,
//! `Kd`, `Ks`, `Ns` and `map_Kd`. Other statements are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use meshport_core::{Color, Material};
use tracing::{debug, trace};

use crate::error::{MeshIoError, Result};

/// Materials of one library, keyed by name in definition order.
pub type MaterialLibrary = IndexMap<String, Material>;

/// Parses a material library.
///
/// `file_name` is recorded on every material; texture map paths are joined
/// onto `context_dir` when one is given.
pub fn parse_mtl<R: BufRead>(
    reader: R,
    file_name: &str,
    context_dir: Option<&Path>,
) -> Result<MaterialLibrary> {
    let mut library = MaterialLibrary::new();
    let mut current: Option<Material> = None;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_no + 1;
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = words.first() else {
            continue;
        };

        if command == "newmtl" {
            if let Some(done) = current.take() {
                library.insert(done.name.clone(), done);
            }
            let name = words[1..].join(" ");
            if name.is_empty() {
                return Err(MeshIoError::UnexpectedArity {
                    context: format!("'newmtl' on line {line_no}"),
                    found: 0,
                });
            }
            let mut material = Material::new(name);
            material.file_name = Some(file_name.to_string());
            current = Some(material);
            continue;
        }
        if command.starts_with('#') {
            continue;
        }

        let material = match (command, current.as_mut()) {
            ("Ka" | "Kd" | "Ks" | "Ns" | "map_Kd", None) => {
                return Err(MeshIoError::token(
                    command,
                    format!("material statement before 'newmtl' (line {line_no})"),
                ))
            }
            (_, Some(material)) => material,
            (other, None) => {
                trace!(line = line_no, command = other, "skipping MTL statement");
                continue;
            }
        };

        match command {
            "Ka" => material.ambient_color = parse_color(&words, line_no)?,
            "Kd" => material.diffuse_color = parse_color(&words, line_no)?,
            "Ks" => material.specular_color = parse_color(&words, line_no)?,
            "Ns" => {
                let value = words.get(1).ok_or_else(|| MeshIoError::UnexpectedArity {
                    context: format!("'Ns' on line {line_no}"),
                    found: 0,
                })?;
                material.specular_exponent = value
                    .parse()
                    .map_err(|_| MeshIoError::token(value, format!("not a number (line {line_no})")))?;
            }
            "map_Kd" => {
                // Options such as `-s 1 1 1` precede the file name.
                let texture = words.last().filter(|_| words.len() > 1).ok_or_else(|| {
                    MeshIoError::UnexpectedArity {
                        context: format!("'map_Kd' on line {line_no}"),
                        found: 0,
                    }
                })?;
                material.diffuse_texture = Some(match context_dir {
                    Some(dir) => dir.join(texture),
                    None => PathBuf::from(*texture),
                });
            }
            other => trace!(line = line_no, command = other, "skipping MTL statement"),
        }
    }

    if let Some(done) = current {
        library.insert(done.name.clone(), done);
    }
    Ok(library)
}

/// Reads the library at `path`, resolving texture maps next to it.
pub fn load_mtl(path: &Path) -> Result<MaterialLibrary> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let library = parse_mtl(BufReader::new(File::open(path)?), &file_name, path.parent())?;
    debug!(path = %path.display(), materials = library.len(), "loaded material library");
    Ok(library)
}

/// Reads an RGB(A) color.
///
/// Components are normalized floats as written by most exporters; when any
/// component exceeds 1 the values are taken as 0-255 bytes instead. A missing
/// alpha is opaque.
fn parse_color(words: &[&str], line: usize) -> Result<Color> {
    let values = &words[1..];
    if !(3..=4).contains(&values.len()) {
        return Err(MeshIoError::UnexpectedArity {
            context: format!("'{}' on line {line} (expected 3 or 4 components)", words[0]),
            found: values.len(),
        });
    }

    let mut components = [1.0f32; 4];
    for (slot, word) in components.iter_mut().zip(values) {
        *slot = word
            .parse()
            .map_err(|_| MeshIoError::token(word, format!("not a number (line {line})")))?;
        if *slot < 0.0 || *slot > 255.0 {
            return Err(MeshIoError::token(word, format!("color component out of range (line {line})")));
        }
    }

    let bytes = components[..values.len()].iter().any(|c| *c > 1.0);
    let to_byte = |c: f32| {
        if bytes {
            c.round() as u8
        } else {
            (c * 255.0).round() as u8
        }
    };
    let alpha = if values.len() == 4 { to_byte(components[3]) } else { u8::MAX };
    Ok(Color::new(
        to_byte(components[0]),
        to_byte(components[1]),
        to_byte(components[2]),
        alpha,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LIBRARY: &str = "# two materials\n\
        newmtl red\n\
        Ka 0 0 0\n\
        Kd 1 0 0\n\
        Ks 0.5 0.5 0.5\n\
        Ns 96\n\
        illum 2\n\
        \n\
        newmtl wood\n\
        Kd 200 150 100 255\n\
        map_Kd -s 1 1 1 textures/oak.png\n";

    fn parse(text: &str) -> Result<MaterialLibrary> {
        parse_mtl(Cursor::new(text), "scene.mtl", Some(Path::new("/assets")))
    }

    #[test]
    fn test_parse_library() {
        let library = parse(LIBRARY).unwrap();
        let names: Vec<&str> = library.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["red", "wood"]);

        let red = &library["red"];
        assert_eq!(red.file_name.as_deref(), Some("scene.mtl"));
        assert_eq!(red.ambient_color, Color::BLACK);
        assert_eq!(red.diffuse_color, Color::RED);
        assert_eq!(red.specular_color, Color::rgb(128, 128, 128));
        assert_eq!(red.specular_exponent, 96.0);
        assert!(red.diffuse_texture.is_none());

        let wood = &library["wood"];
        assert_eq!(wood.diffuse_color, Color::new(200, 150, 100, 255));
        assert_eq!(wood.specular_exponent, 16.0);
        assert_eq!(wood.diffuse_texture, Some(PathBuf::from("/assets/textures/oak.png")));
    }

    #[test]
    fn test_statement_before_newmtl() {
        assert!(matches!(parse("Kd 1 1 1\n"), Err(MeshIoError::InvalidToken { .. })));
        assert!(parse("illum 2\n").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_colors() {
        assert!(matches!(
            parse("newmtl a\nKd 1 1\n"),
            Err(MeshIoError::UnexpectedArity { found: 2, .. })
        ));
        assert!(matches!(
            parse("newmtl a\nKd 1 x 1\n"),
            Err(MeshIoError::InvalidToken { .. })
        ));
        assert!(matches!(
            parse("newmtl a\nKd 1 300 1\n"),
            Err(MeshIoError::InvalidToken { .. })
        ));
    }
}
