//! Light records carried by light leaves of the scene graph.
//!
//! Lights are data only; the rasterizer does not shade with them.

use jrtr_math::{Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Point,
    Directional,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub position: Vec3,
    pub direction: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub ambient: Vec3,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            kind: LightKind::Point,
            position: Vec3::ZERO,
            direction: Vec3::new(0.0, 0.0, 1.0),
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
            ambient: Vec3::ZERO,
        }
    }
}

impl Light {
    pub fn point(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn directional(direction: Vec3) -> Self {
        Self {
            kind: LightKind::Directional,
            direction,
            ..Default::default()
        }
    }

    /// Return a copy with position and direction mapped by `world`.
    pub fn transformed(&self, world: &Mat4) -> Self {
        Self {
            position: world.transform_point3(self.position),
            direction: world
                .transform_vector3(self.direction)
                .try_normalize()
                .unwrap_or(self.direction),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transformed_point_light() {
        let light = Light::point(Vec3::new(1.0, 0.0, 0.0));
        let moved = light.transformed(&Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0)));
        assert_eq!(moved.position, Vec3::new(1.0, 5.0, 0.0));
        assert_eq!(moved.kind, LightKind::Point);
    }

    #[test]
    fn test_transformed_direction_ignores_translation() {
        let light = Light::directional(Vec3::X);
        let moved = light.transformed(&Mat4::from_translation(Vec3::splat(3.0)));
        assert_eq!(moved.direction, Vec3::X);
    }
}
