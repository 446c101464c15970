//! Levels: layout documents, sources and the asynchronous loader

pub mod builtin;
pub mod layout;
pub mod loader;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use builtin::BuiltinSource;
pub use layout::{BodySpec, LevelLayout, ShapeSpec};
pub use loader::{DirectorySource, LevelLoader, LevelRequest, LevelResponder, LevelResult, LevelSource};

/// 1-based level number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LevelId(pub u32);

impl LevelId {
    pub const FIRST: LevelId = LevelId(1);

    /// On-demand resource tag (`level3`)
    pub fn tag(&self) -> String {
        format!("level{}", self.0)
    }

    /// Scene name (`GameScene3`)
    pub fn scene_name(&self) -> String {
        format!("GameScene{}", self.0)
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
