//! Session simulation module
//!
//! All gameplay rules live here. This module is single-threaded and has no
//! rendering or platform dependencies:
//! - Physics is reached only through `PhysicsWorld`
//! - Render/audio output goes through `Effects`
//! - Randomness comes from an injected `RandomSource`

pub mod body;
pub mod contact;
pub mod effects;
pub mod input;
pub mod progress;
pub mod regulator;
pub mod session;
pub mod state;
pub mod world;

pub use body::{BodyCategory, NodeHandle};
pub use contact::{Contact, ContactEvent, ContactRule, classify};
pub use effects::{EffectCommand, EffectLog, Effects, Emitter, NodeAction, Prompt, SceneTransition};
pub use input::{Intent, SceneRequest};
pub use progress::{LevelDescriptor, LevelStatus};
pub use regulator::{PcgRandom, RandomSource, Regulation, VelocityRegulator};
pub use session::{SceneNodes, Session};
pub use state::{Outcome, SessionState};
pub use world::{ArenaWorld, PhysicsWorld};
