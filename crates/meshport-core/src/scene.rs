use std::path::PathBuf;

use crate::material::Material;
use crate::mesh::Mesh;

/// Meshes loaded from, or destined for, one file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Scene {
    pub file_path: Option<PathBuf>,
    pub meshes: Vec<Mesh>,
    /// Distinct materials referenced by `meshes`.
    pub materials: Vec<Material>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene holding exactly one mesh.
    pub fn single(mesh: Mesh) -> Self {
        Self {
            meshes: vec![mesh],
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Records `material` unless an equal one is already listed.
    pub fn add_material(&mut self, material: &Material) {
        if !self.materials.contains(material) {
            self.materials.push(material.clone());
        }
    }

    pub fn metrics(&self) -> String {
        let mut out = format!("Mesh Count = {}", self.meshes.len());
        for mesh in &self.meshes {
            out.push('\n');
            out.push_str(&mesh.metrics());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_materials_are_deduplicated() {
        let mut scene = Scene::single(Mesh::new());
        scene.add_material(&Material::fallback());
        scene.add_material(&Material::new("red"));
        scene.add_material(&Material::fallback());
        assert_eq!(scene.materials.len(), 2);
        assert_eq!(scene.materials[1].name, "red");
    }
}
