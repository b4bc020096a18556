//! Warning shapes shown before a delayed effect lands.

use glam::Vec2;

/// Geometry of a telegraph. `radius` on [`Telegraph`] is the outer extent
/// (circle radius, ring outer radius, line length, cone length).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TelegraphShape {
    Circle,
    Ring { inner: f32 },
    /// Rectangle starting at the center and extending along `dir`.
    Line { width: f32, dir: Vec2 },
    Cone { half_angle: f32, dir: Vec2 },
}

impl TelegraphShape {
    /// Returns true if `point` lies inside this shape.
    pub fn contains(&self, center: Vec2, radius: f32, point: Vec2) -> bool {
        let offset = point - center;
        let distance = offset.length();
        match *self {
            TelegraphShape::Circle => distance <= radius,
            TelegraphShape::Ring { inner } => distance >= inner && distance <= radius,
            TelegraphShape::Line { width, dir } => {
                let dir = dir.normalize_or_zero();
                if dir == Vec2::ZERO {
                    return false;
                }
                let along = offset.dot(dir);
                let across = offset.perp_dot(dir).abs();
                along >= 0.0 && along <= radius && across <= width * 0.5
            }
            TelegraphShape::Cone { half_angle, dir } => {
                if distance > radius {
                    return false;
                }
                if distance <= f32::EPSILON {
                    return true;
                }
                let dir = dir.normalize_or_zero();
                if dir == Vec2::ZERO {
                    return false;
                }
                dir.angle_to(offset).abs() <= half_angle
            }
        }
    }
}

/// A transient telegraph owned by a boss for the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Telegraph {
    pub shape: TelegraphShape,
    pub center: Vec2,
    pub radius: f32,
    /// RGB color hint.
    pub color: u32,
    /// Seconds until the effect resolves.
    pub remaining: f32,
}

impl Telegraph {
    pub fn contains(&self, point: Vec2) -> bool {
        self.shape.contains(self.center, self.radius, point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_excludes_inner_hole() {
        let shape = TelegraphShape::Ring { inner: 50.0 };
        assert!(!shape.contains(Vec2::ZERO, 100.0, Vec2::new(10.0, 0.0)));
        assert!(shape.contains(Vec2::ZERO, 100.0, Vec2::new(75.0, 0.0)));
        assert!(!shape.contains(Vec2::ZERO, 100.0, Vec2::new(120.0, 0.0)));
    }

    #[test]
    fn line_extends_forward_only() {
        let shape = TelegraphShape::Line {
            width: 20.0,
            dir: Vec2::X,
        };
        assert!(shape.contains(Vec2::ZERO, 200.0, Vec2::new(150.0, 5.0)));
        assert!(!shape.contains(Vec2::ZERO, 200.0, Vec2::new(-10.0, 0.0)));
        assert!(!shape.contains(Vec2::ZERO, 200.0, Vec2::new(100.0, 30.0)));
    }

    #[test]
    fn cone_respects_half_angle() {
        let shape = TelegraphShape::Cone {
            half_angle: 0.5,
            dir: Vec2::Y,
        };
        assert!(shape.contains(Vec2::ZERO, 100.0, Vec2::new(0.0, 80.0)));
        assert!(!shape.contains(Vec2::ZERO, 100.0, Vec2::new(80.0, 10.0)));
    }
}
