//! Level progress tracking
//!
//! Remaining blocks are always counted from the world rather than cached, so
//! a block removed by any path is reflected immediately.

use serde::{Deserialize, Serialize};

use super::body::BodyCategory;
use super::world::PhysicsWorld;
use crate::consts::{FIRST_NEXT_LEVEL, TOTAL_LEVELS};
use crate::level::LevelId;

/// Where the level stands after a block breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStatus {
    /// Blocks remain
    InProgress,
    /// No blocks remain and more levels follow
    Cleared,
    /// No blocks remain on the final level
    GameWon,
}

/// Per-scene level data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    /// Level the next scene will load; the first scene of a run carries 2
    pub next_level: u32,
    pub total_levels: u32,
}

impl Default for LevelDescriptor {
    fn default() -> Self {
        Self::first(TOTAL_LEVELS)
    }
}

impl LevelDescriptor {
    pub fn new(next_level: u32, total_levels: u32) -> Self {
        Self {
            next_level,
            total_levels,
        }
    }

    /// Descriptor for the opening scene of a run
    pub fn first(total_levels: u32) -> Self {
        Self::new(FIRST_NEXT_LEVEL, total_levels)
    }

    /// Descriptor for the scene loaded after this one
    pub fn advanced(&self) -> Self {
        Self::new(self.next_level + 1, self.total_levels)
    }

    /// Identifier of the level the next scene loads
    pub fn next_level_id(&self) -> LevelId {
        LevelId(self.next_level)
    }

    /// Live blocks in the world
    pub fn remaining_blocks(&self, world: &impl PhysicsWorld) -> usize {
        world.count(BodyCategory::Block)
    }

    /// True once the final level is cleared.
    ///
    /// Tied to `next_level + 1 == total_levels`, exactly as the level
    /// numbering has always worked.
    pub fn is_game_won(&self, world: &impl PhysicsWorld) -> bool {
        self.remaining_blocks(world) == 0 && self.next_level + 1 == self.total_levels
    }

    pub fn status(&self, world: &impl PhysicsWorld) -> LevelStatus {
        if self.is_game_won(world) {
            LevelStatus::GameWon
        } else if self.remaining_blocks(world) == 0 {
            LevelStatus::Cleared
        } else {
            LevelStatus::InProgress
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::ArenaWorld;
    use glam::Vec2;

    fn world_with_blocks(n: usize) -> ArenaWorld {
        let mut world = ArenaWorld::new(Vec2::new(320.0, 480.0));
        for i in 0..n {
            world.add_rect(
                BodyCategory::Block,
                Vec2::new(30.0 + i as f32 * 50.0, 400.0),
                Vec2::new(40.0, 16.0),
            );
        }
        world
    }

    #[test]
    fn test_remaining_counts_live_blocks() {
        let mut world = world_with_blocks(3);
        let level = LevelDescriptor::default();
        assert_eq!(level.remaining_blocks(&world), 3);
        let block = world.first_of(BodyCategory::Block).unwrap();
        world.remove_body(block);
        assert_eq!(level.remaining_blocks(&world), 2);
    }

    #[test]
    fn test_game_won_requires_final_level() {
        let world = world_with_blocks(0);
        assert!(LevelDescriptor::new(5, 6).is_game_won(&world));
        assert!(!LevelDescriptor::new(4, 6).is_game_won(&world));
        assert!(!LevelDescriptor::new(6, 6).is_game_won(&world));

        let world = world_with_blocks(1);
        assert!(!LevelDescriptor::new(5, 6).is_game_won(&world));
    }

    #[test]
    fn test_status() {
        assert_eq!(
            LevelDescriptor::new(3, 6).status(&world_with_blocks(2)),
            LevelStatus::InProgress
        );
        assert_eq!(
            LevelDescriptor::new(3, 6).status(&world_with_blocks(0)),
            LevelStatus::Cleared
        );
        assert_eq!(
            LevelDescriptor::new(5, 6).status(&world_with_blocks(0)),
            LevelStatus::GameWon
        );
    }

    #[test]
    fn test_first_and_advanced() {
        let first = LevelDescriptor::first(6);
        assert_eq!(first.next_level, 2);
        assert_eq!(first.next_level_id(), LevelId(2));
        assert_eq!(first.advanced(), LevelDescriptor::new(3, 6));
    }
}
