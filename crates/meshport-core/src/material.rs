use std::path::PathBuf;

use crate::color::Color;

/// Surface appearance attached to a mesh.
///
/// Defaults follow the usual MTL conventions: white diffuse and specular,
/// cornflower-blue ambient, specular exponent 16.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// Material library the definition was read from, if any.
    pub file_name: Option<String>,
    pub ambient_color: Color,
    pub diffuse_color: Color,
    pub specular_color: Color,
    pub specular_exponent: f32,
    /// Diffuse texture map, resolved against the library's directory.
    pub diffuse_texture: Option<PathBuf>,
}

impl Material {
    pub const CORNFLOWER_BLUE: Color = Color::rgb(100, 149, 237);

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Material given to OBJ groups that name no known material.
    pub fn fallback() -> Self {
        Self {
            name: "Default".to_string(),
            diffuse_color: Color::GRAY,
            specular_color: Color::WHITE,
            specular_exponent: 64.0,
            ..Self::default()
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            file_name: None,
            ambient_color: Self::CORNFLOWER_BLUE,
            diffuse_color: Color::WHITE,
            specular_color: Color::WHITE,
            specular_exponent: 16.0,
            diffuse_texture: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let material = Material::new("steel");
        assert_eq!(material.name, "steel");
        assert_eq!(material.diffuse_color, Color::WHITE);
        assert_eq!(material.ambient_color, Material::CORNFLOWER_BLUE);
        assert_eq!(material.specular_exponent, 16.0);
        assert!(material.diffuse_texture.is_none());
    }

    #[test]
    fn test_fallback_is_gray() {
        let material = Material::fallback();
        assert_eq!(material.name, "Default");
        assert_eq!(material.diffuse_color, Color::GRAY);
        assert_eq!(material.specular_exponent, 64.0);
    }
}
