//! Body categories and node handles

use serde::{Deserialize, Serialize};

/// Category tag attached to every physics body
///
/// Declaration order matches the category bit values, so the derived `Ord`
/// is the numeric ordering used to canonicalise contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyCategory {
    Ball,
    Bottom,
    Block,
    Paddle,
    Border,
}

impl BodyCategory {
    pub const ALL: [BodyCategory; 5] = [
        BodyCategory::Ball,
        BodyCategory::Bottom,
        BodyCategory::Block,
        BodyCategory::Paddle,
        BodyCategory::Border,
    ];

    /// Category bit mask
    pub fn bits(self) -> u32 {
        match self {
            BodyCategory::Ball => 1 << 0,
            BodyCategory::Bottom => 1 << 1,
            BodyCategory::Block => 1 << 2,
            BodyCategory::Paddle => 1 << 3,
            BodyCategory::Border => 1 << 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BodyCategory::Ball => "ball",
            BodyCategory::Bottom => "bottom",
            BodyCategory::Block => "block",
            BodyCategory::Paddle => "paddle",
            BodyCategory::Border => "border",
        }
    }
}

/// Opaque handle to a scene node (physics body or plain render node)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeHandle(pub u32);

impl NodeHandle {
    /// The centred game message sprite ("tap to play", win/lose banner)
    pub const GAME_MESSAGE: NodeHandle = NodeHandle(0);
}
