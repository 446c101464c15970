//! Ball velocity regulation
//!
//! Runs once per tick while playing. Keeps the ball from stalling on either
//! axis (endless wall-hugging) and drags it back under the speed cap.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::NodeHandle;
use super::world::PhysicsWorld;
use crate::settings::RegulatorSettings;

/// Source of uniform draws in [0, 1)
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;

    /// Pick -1 or +1 with equal probability
    fn random_sign(&mut self) -> f32 {
        if self.next_unit() >= 0.5 { -1.0 } else { 1.0 }
    }
}

/// Seeded PCG random source
#[derive(Debug, Clone)]
pub struct PcgRandom {
    rng: Pcg32,
}

impl PcgRandom {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for PcgRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// What one regulation pass did
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Regulation {
    /// Sum of stall-correction impulses applied this tick
    pub impulse: Vec2,
    /// Damping coefficient now set on the ball
    pub damping: f32,
}

/// Per-tick speed band policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityRegulator {
    settings: RegulatorSettings,
}

impl Default for VelocityRegulator {
    fn default() -> Self {
        Self::new(RegulatorSettings::default())
    }
}

impl VelocityRegulator {
    pub fn new(settings: RegulatorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RegulatorSettings {
        &self.settings
    }

    /// Random initial kick given when play starts
    pub fn launch_impulse(&self, rng: &mut impl RandomSource) -> Vec2 {
        let x = rng.random_sign() * self.settings.stall_impulse;
        let y = rng.random_sign() * self.settings.stall_impulse;
        Vec2::new(x, y)
    }

    /// Regulate the ball for one tick. Returns `None` if the ball is gone.
    ///
    /// Stall checks and the overspeed check all read the velocity as it was
    /// before any correction, and each runs independently.
    pub fn regulate(
        &self,
        world: &mut impl PhysicsWorld,
        ball: NodeHandle,
        rng: &mut impl RandomSource,
    ) -> Option<Regulation> {
        let vel = world.velocity(ball)?;
        let mut applied = Vec2::ZERO;

        if vel.x.abs() <= self.settings.stall_speed {
            let impulse = Vec2::new(rng.random_sign() * self.settings.stall_impulse, 0.0);
            world.apply_impulse(ball, impulse);
            applied += impulse;
        }
        if vel.y.abs() <= self.settings.stall_speed {
            let impulse = Vec2::new(0.0, rng.random_sign() * self.settings.stall_impulse);
            world.apply_impulse(ball, impulse);
            applied += impulse;
        }
        if applied != Vec2::ZERO {
            log::debug!("Stall correction on {:?}: {:?}", ball, applied);
        }

        let damping = if vel.length() > self.settings.max_speed {
            self.settings.damping
        } else {
            0.0
        };
        world.set_linear_damping(ball, damping);

        Some(Regulation {
            impulse: applied,
            damping,
        })
    }
}
