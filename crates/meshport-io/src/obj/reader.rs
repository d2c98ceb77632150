//! Wavefront OBJ import: vertex tables, grouped faces and their materials.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use meshport_core::{Material, Mesh, Scene};
use tracing::{info, trace, warn};

use crate::error::{MeshIoError, Result};
use crate::obj::face::{parse_face, Face, Tables};
use crate::obj::material::{load_mtl, MaterialLibrary};
use crate::traits::{PointCloudReader, Reader};

const DEFAULT_GROUP: &str = "default";

/// Faces collected under one `g` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    /// Name given by the governing `usemtl`.
    pub material: Option<String>,
    pub faces: Vec<Face>,
}

/// Parsed contents of an OBJ file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjDocument {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub textures: Vec<[f32; 3]>,
    pub groups: Vec<Group>,
    /// `mtllib` file names in order of appearance.
    pub material_libraries: Vec<String>,
    /// Materials loaded from `material_libraries`.
    pub materials: MaterialLibrary,
    active_material: Option<String>,
}

impl ObjDocument {
    pub fn num_faces(&self) -> usize {
        self.groups.iter().map(|g| g.faces.len()).sum()
    }

    fn current_group(&mut self) -> &mut Group {
        if self.groups.is_empty() {
            self.start_group(DEFAULT_GROUP.to_string());
        }
        let last = self.groups.len() - 1;
        &mut self.groups[last]
    }

    fn start_group(&mut self, name: String) {
        self.groups.push(Group {
            name,
            material: self.active_material.clone(),
            faces: Vec::new(),
        });
    }

    /// Switches material. Faces already collected keep theirs, so a switch
    /// inside a populated group continues in a new group of the same name.
    fn use_material(&mut self, name: String) {
        self.active_material = Some(name.clone());
        let group = self.current_group();
        if group.faces.is_empty() {
            group.material = Some(name);
        } else {
            let group_name = group.name.clone();
            self.start_group(group_name);
        }
    }

    /// Resolves a group's material, falling back to [`Material::fallback`]
    /// when it names none or an unknown one.
    pub fn material_for(&self, group: &Group) -> Material {
        group
            .material
            .as_ref()
            .and_then(|name| self.materials.get(name))
            .cloned()
            .unwrap_or_else(Material::fallback)
    }

    /// One mesh per group with every face corner expanded into its own point.
    ///
    /// A document without faces becomes a single point-cloud mesh named
    /// `fallback_name`.
    pub fn to_meshes(&self, fallback_name: &str) -> Vec<Mesh> {
        if self.num_faces() == 0 {
            let mut mesh = Mesh::with_name(fallback_name);
            mesh.points = self.positions.clone();
            if self.normals.len() == self.positions.len() {
                mesh.normals = self.normals.clone();
            }
            if self.textures.len() == self.positions.len() {
                mesh.texture_coordinates = self.textures.clone();
            }
            return vec![mesh];
        }

        self.groups
            .iter()
            .filter(|g| !g.faces.is_empty())
            .map(|g| group_mesh(g, self.material_for(g)))
            .collect()
    }
}

fn group_mesh(group: &Group, material: Material) -> Mesh {
    let mut mesh = Mesh::with_name(group.name.as_str());
    mesh.material = Some(material);
    let mut normals = Vec::new();
    let mut textures = Vec::new();

    for face in &group.faces {
        for triangle in face.triangles() {
            let base = mesh.points.len() as u32;
            for corner in triangle {
                mesh.points.push(corner.position);
                normals.push(corner.normal);
                textures.push(corner.texture);
            }
            mesh.add_face([base, base + 1, base + 2]);
        }
    }

    if normals.iter().any(Option::is_some) {
        mesh.normals = normals.into_iter().map(Option::unwrap_or_default).collect();
    }
    if textures.iter().any(Option::is_some) {
        mesh.texture_coordinates = textures.into_iter().map(Option::unwrap_or_default).collect();
    }
    mesh
}

/// Parses OBJ commands from `reader`.
pub fn parse_obj<R: BufRead>(reader: R) -> Result<ObjDocument> {
    let mut doc = ObjDocument::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = words.first() else {
            continue;
        };

        match command {
            "v" => {
                let [x, y, z] = parse_vec(&words, 3, line_no + 1)?;
                doc.positions.push([x, y, z]);
            }
            "vn" => {
                let [x, y, z] = parse_vec(&words, 3, line_no + 1)?;
                doc.normals.push([x, y, z]);
            }
            "vt" => {
                let [u, v, w] = parse_vec(&words, 2, line_no + 1)?;
                doc.textures.push([u, v, w]);
            }
            "f" => {
                let tables = Tables {
                    positions: &doc.positions,
                    normals: &doc.normals,
                    textures: &doc.textures,
                };
                let face = parse_face(&words, &tables)?;
                doc.current_group().faces.push(face);
            }
            "g" => {
                let name = words.get(1..).map(|w| w.join(" ")).unwrap_or_default();
                let name = if name.is_empty() { DEFAULT_GROUP.to_string() } else { name };
                doc.start_group(name);
            }
            "usemtl" => {
                let name = words[1..].join(" ");
                if name.is_empty() {
                    return Err(MeshIoError::UnexpectedArity {
                        context: format!("'usemtl' on line {}", line_no + 1),
                        found: 0,
                    });
                }
                doc.use_material(name);
            }
            "mtllib" => doc
                .material_libraries
                .extend(words[1..].iter().map(|w| w.to_string())),
            c if c.starts_with('#') => {}
            other => trace!(line = line_no + 1, command = other, "skipping OBJ command"),
        }
    }

    Ok(doc)
}

/// Reads `required` to three float components after the command word.
/// Missing trailing components are zero; extra ones (such as a `w` weight on
/// `v`) are ignored.
fn parse_vec(words: &[&str], required: usize, line: usize) -> Result<[f32; 3]> {
    let values = &words[1..];
    if values.len() < required {
        return Err(MeshIoError::UnexpectedArity {
            context: format!("'{}' on line {line}", words[0]),
            found: values.len(),
        });
    }
    let mut out = [0.0f32; 3];
    for (slot, word) in out.iter_mut().zip(values) {
        *slot = word
            .parse()
            .map_err(|_| MeshIoError::token(word, format!("not a number (line {line})")))?;
    }
    Ok(out)
}

/// Wavefront OBJ importer.
#[derive(Debug)]
pub struct ObjReader {
    path: PathBuf,
}

impl ObjReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(MeshIoError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )));
        }
        Ok(Self { path })
    }

    /// Parses the file and loads its material libraries from the same
    /// directory. A missing library is skipped with a warning.
    pub fn read_document(&self) -> Result<ObjDocument> {
        let mut doc = parse_obj(BufReader::new(File::open(&self.path)?))?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new(""));
        for library in &doc.material_libraries {
            let path = dir.join(library);
            if !path.is_file() {
                warn!(path = %path.display(), "material library not found");
                continue;
            }
            for (name, material) in load_mtl(&path)? {
                doc.materials.entry(name).or_insert(material);
            }
        }
        Ok(doc)
    }
}

impl Reader for ObjReader {
    fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        ObjReader::open(path)
    }

    #[tracing::instrument(skip_all, fields(path = %self.path.display()))]
    fn read_meshes(&mut self) -> Result<Vec<Mesh>> {
        let doc = self.read_document()?;
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_GROUP.to_string());
        let meshes = doc.to_meshes(&stem);
        info!(
            meshes = meshes.len(),
            positions = doc.positions.len(),
            faces = doc.num_faces(),
            "imported OBJ document"
        );
        Ok(meshes)
    }
}

impl PointCloudReader for ObjReader {
    fn read_points(&mut self) -> Result<Vec<[f32; 3]>> {
        Ok(self.read_document()?.positions)
    }
}

/// Imports an OBJ file, one mesh per group.
pub fn read_scene(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    let meshes = ObjReader::open(path)?.read_meshes()?;
    let mut scene = Scene {
        file_path: Some(path.to_path_buf()),
        ..Scene::default()
    };
    for material in meshes.iter().filter_map(|m| m.material.as_ref()) {
        scene.add_material(material);
    }
    scene.meshes = meshes;
    Ok(scene)
}
