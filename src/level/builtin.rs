//! Levels generated in code
//!
//! Used when no level directory is configured. Later levels get more rows,
//! and every other level is laid out as a checkerboard with gaps.

use glam::Vec2;

use super::LevelId;
use super::layout::{BodySpec, LevelLayout};
use super::loader::{LevelResult, LevelSource};
use crate::error::LevelLoadError;
use crate::sim::BodyCategory;

pub const SCENE_SIZE: Vec2 = Vec2::new(640.0, 960.0);

const BALL_RADIUS: f32 = 12.0;
/// Launch impulse of 3 gives 300 points/s per axis
const BALL_MASS: f32 = 0.01;
const PADDLE_SIZE: Vec2 = Vec2::new(140.0, 24.0);
const PADDLE_Y: f32 = 80.0;

const BLOCK_SIZE: Vec2 = Vec2::new(90.0, 30.0);
const BLOCK_COLUMNS: u32 = 6;
const COLUMN_SPACING: f32 = 100.0;
const ROW_SPACING: f32 = 45.0;
const TOP_ROW_Y: f32 = 860.0;
const MAX_ROWS: u32 = 6;

/// Source producing `total_levels` generated layouts
#[derive(Debug, Clone, Copy)]
pub struct BuiltinSource {
    total_levels: u32,
}

impl BuiltinSource {
    pub fn new(total_levels: u32) -> Self {
        Self { total_levels }
    }

    /// Layout for a level number (no range check)
    pub fn generate(level: u32) -> LevelLayout {
        let mut bodies = vec![
            BodySpec::ball(
                Vec2::new(SCENE_SIZE.x / 2.0, PADDLE_Y + 60.0),
                BALL_RADIUS,
                BALL_MASS,
            ),
            BodySpec::rect(
                BodyCategory::Paddle,
                Vec2::new(SCENE_SIZE.x / 2.0, PADDLE_Y),
                PADDLE_SIZE,
            ),
        ];

        let rows = (1 + level).min(MAX_ROWS);
        let spaced = level % 2 == 0;
        let left = (SCENE_SIZE.x - (BLOCK_COLUMNS - 1) as f32 * COLUMN_SPACING) / 2.0;

        for row in 0..rows {
            for col in 0..BLOCK_COLUMNS {
                if spaced && (row + col) % 2 == 1 {
                    continue;
                }
                let pos = Vec2::new(
                    left + col as f32 * COLUMN_SPACING,
                    TOP_ROW_Y - row as f32 * ROW_SPACING,
                );
                bodies.push(BodySpec::rect(BodyCategory::Block, pos, BLOCK_SIZE));
            }
        }

        LevelLayout {
            size: SCENE_SIZE,
            bodies,
        }
    }
}

impl LevelSource for BuiltinSource {
    fn fetch(&self, id: LevelId) -> LevelResult {
        if id.0 == 0 || id.0 > self.total_levels {
            return Err(LevelLoadError::NotFound(id));
        }
        Ok(Self::generate(id.0))
    }
}
