//! Level layout documents
//!
//! A layout lists the bodies of one scene. The border loop and the bottom
//! strip are implied by the scene size and added by the world builder.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::LevelId;
use crate::error::LevelLoadError;
use crate::sim::BodyCategory;

/// Collision shape of a body in a layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeSpec {
    Rect { size: Vec2 },
    Circle { radius: f32 },
}

fn default_mass() -> f32 {
    1.0
}

/// One body in a layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    pub category: BodyCategory,
    pub shape: ShapeSpec,
    /// Centre position in scene coordinates (origin bottom-left)
    pub position: Vec2,
    /// Mass used to turn impulses into velocity changes (dynamic bodies only)
    #[serde(default = "default_mass")]
    pub mass: f32,
}

impl BodySpec {
    pub fn rect(category: BodyCategory, position: Vec2, size: Vec2) -> Self {
        Self {
            category,
            shape: ShapeSpec::Rect { size },
            position,
            mass: default_mass(),
        }
    }

    pub fn ball(position: Vec2, radius: f32, mass: f32) -> Self {
        Self {
            category: BodyCategory::Ball,
            shape: ShapeSpec::Circle { radius },
            position,
            mass,
        }
    }
}

/// Complete description of one level scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    /// Scene size in points
    pub size: Vec2,
    pub bodies: Vec<BodySpec>,
}

impl LevelLayout {
    /// Parse a layout document
    pub fn from_json(id: LevelId, json: &str) -> Result<Self, LevelLoadError> {
        serde_json::from_str(json).map_err(|source| LevelLoadError::Parse { id, source })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Number of destructible blocks in the layout
    pub fn block_count(&self) -> usize {
        self.bodies
            .iter()
            .filter(|b| b.category == BodyCategory::Block)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layout() {
        let json = r#"{
            "size": [320.0, 480.0],
            "bodies": [
                { "category": "ball", "shape": { "kind": "circle", "radius": 8.0 },
                  "position": [160.0, 60.0], "mass": 0.02 },
                { "category": "paddle", "shape": { "kind": "rect", "size": [80.0, 12.0] },
                  "position": [160.0, 30.0] },
                { "category": "block", "shape": { "kind": "rect", "size": [40.0, 16.0] },
                  "position": [40.0, 400.0] }
            ]
        }"#;
        let layout = LevelLayout::from_json(LevelId(3), json).unwrap();
        assert_eq!(layout.size, Vec2::new(320.0, 480.0));
        assert_eq!(layout.bodies.len(), 3);
        assert_eq!(layout.block_count(), 1);
        assert_eq!(layout.bodies[1].mass, 1.0);
        assert_eq!(layout.bodies[0].shape, ShapeSpec::Circle { radius: 8.0 });
    }

    #[test]
    fn test_parse_error_names_level() {
        let err = LevelLayout::from_json(LevelId(4), "{ \"size\": [1.0, 2.0] }").unwrap_err();
        assert!(matches!(err, LevelLoadError::Parse { id: LevelId(4), .. }));
        assert!(err.to_string().contains("level 4"));
    }
}
