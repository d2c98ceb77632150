use crate::color::Color;
use crate::material::Material;

/// Triangle as three point indices.
pub type Face = [u32; 3];

/// Line segment between two points, colored as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub start: i32,
    pub end: i32,
    pub color: Color,
}

impl Edge {
    pub fn new(start: i32, end: i32, color: Color) -> Self {
        Self { start, end, color }
    }
}

/// Flat triangle mesh or point cloud.
///
/// Per-point channels (`normals`, `colors`, `texture_coordinates`) are either
/// empty or parallel to `points`. Texture coordinates carry a third `w`
/// component, zero for formats that only store `(s, t)`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub points: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<Color>,
    pub texture_coordinates: Vec<[f32; 3]>,
    pub edges: Vec<Edge>,
    pub material: Option<Material>,
    faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn from_points(points: Vec<[f32; 3]>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub fn set_face(&mut self, face_id: usize, face: Face) {
        if face_id >= self.faces.len() {
            self.faces.resize(face_id + 1, [0; 3]);
        }
        self.faces[face_id] = face;
    }

    pub fn face(&self, face_id: usize) -> Face {
        self.faces[face_id]
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Flattened triangle indices, three per face.
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.faces.iter().flat_map(|f| f.iter().copied())
    }

    /// True when at least one normal is non-zero.
    pub fn contains_normals(&self) -> bool {
        self.normals.iter().any(|n| n.iter().any(|c| *c != 0.0))
    }

    /// True when at least one color has a non-zero channel.
    pub fn contains_colors(&self) -> bool {
        self.colors.iter().any(|c| !c.is_zero())
    }

    pub fn contains_edges(&self) -> bool {
        !self.edges.is_empty()
    }

    /// One-line summary used in log output.
    pub fn metrics(&self) -> String {
        let non_zero_normals = self
            .normals
            .iter()
            .filter(|n| n.iter().any(|c| *c != 0.0))
            .count();
        format!(
            "Name = {}, Point Count = {}, Face Count = {}, Non-Zero Normals = {}",
            self.name,
            self.points.len(),
            self.faces.len(),
            non_zero_normals
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_detection() {
        let mut mesh = Mesh::from_points(vec![[0.0; 3], [1.0; 3]]);
        assert!(!mesh.contains_normals());
        assert!(!mesh.contains_colors());
        assert!(!mesh.contains_edges());

        mesh.normals = vec![[0.0; 3], [0.0; 3]];
        assert!(!mesh.contains_normals());
        mesh.normals[1] = [0.0, 0.0, 1.0];
        assert!(mesh.contains_normals());

        mesh.colors = vec![Color::new(0, 0, 0, 0); 2];
        assert!(!mesh.contains_colors());
        mesh.colors[0] = Color::RED;
        assert!(mesh.contains_colors());

        mesh.edges.push(Edge::new(0, 1, Color::RED));
        assert!(mesh.contains_edges());
    }

    #[test]
    fn test_set_face_grows() {
        let mut mesh = Mesh::new();
        mesh.set_face(2, [3, 4, 5]);
        assert_eq!(mesh.num_faces(), 3);
        assert_eq!(mesh.face(0), [0, 0, 0]);
        assert_eq!(mesh.face(2), [3, 4, 5]);
        assert_eq!(mesh.indices().collect::<Vec<_>>(), vec![0, 0, 0, 0, 0, 0, 3, 4, 5]);
    }
}
