//! Physics world seam and a headless arena implementation
//!
//! The session only reads and nudges bodies through `PhysicsWorld`; it never
//! integrates motion itself. `ArenaWorld` is a small kinematic world (one or
//! more circles moving among static rectangles inside an edge loop) that is
//! enough to run a full session without a rendering engine.

use glam::Vec2;

use super::body::{BodyCategory, NodeHandle};
use super::contact::{Contact, ContactEvent};
use crate::level::layout::{LevelLayout, ShapeSpec};

/// Physics services the session consumes
pub trait PhysicsWorld {
    /// Scene size (origin bottom-left)
    fn scene_size(&self) -> Vec2;
    fn category(&self, node: NodeHandle) -> Option<BodyCategory>;
    fn position(&self, node: NodeHandle) -> Option<Vec2>;
    fn set_position(&mut self, node: NodeHandle, pos: Vec2);
    /// Full width/height of the body's bounding box
    fn extent(&self, node: NodeHandle) -> Option<Vec2>;
    fn velocity(&self, node: NodeHandle) -> Option<Vec2>;
    /// Instantaneous impulse (velocity change = impulse / mass)
    fn apply_impulse(&mut self, node: NodeHandle, impulse: Vec2);
    /// Continuous drag coefficient
    fn set_linear_damping(&mut self, node: NodeHandle, damping: f32);
    /// Remove a body; returns false if it was already gone
    fn remove_body(&mut self, node: NodeHandle) -> bool;
    /// Number of live bodies with the given category
    fn count(&self, category: BodyCategory) -> usize;
    /// First body of a category, in creation order
    fn first_of(&self, category: BodyCategory) -> Option<NodeHandle>;
    /// Topmost body containing a point
    fn body_at(&self, point: Vec2) -> Option<NodeHandle>;
    /// Advance the simulation, appending contacts in the order they happen
    fn step(&mut self, dt: f32, contacts: &mut Vec<ContactEvent>);
}

/// Body shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half: Vec2 },
    /// Loop along the scene edges
    EdgeLoop,
}

/// A body in the arena
#[derive(Debug, Clone)]
pub struct Body {
    pub handle: NodeHandle,
    pub category: BodyCategory,
    pub shape: Shape,
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    pub damping: f32,
    /// Dynamic bodies move; everything else is static
    pub dynamic: bool,
}

impl Body {
    fn contains(&self, point: Vec2) -> bool {
        match self.shape {
            Shape::Circle { radius } => (point - self.pos).length_squared() <= radius * radius,
            Shape::Rect { half } => {
                let d = (point - self.pos).abs();
                d.x <= half.x && d.y <= half.y
            }
            Shape::EdgeLoop => false,
        }
    }
}

/// Push-out distance added after resolving a penetration
const SEPARATION: f32 = 0.5;
/// Upper bound on substeps per step
const MAX_STEPS: usize = 20;

/// Frictionless, gravity-free arena
#[derive(Debug, Clone)]
pub struct ArenaWorld {
    size: Vec2,
    bodies: Vec<Body>,
    next_id: u32,
}

impl ArenaWorld {
    /// Empty arena with its border loop
    pub fn new(size: Vec2) -> Self {
        let mut world = Self {
            size,
            bodies: Vec::new(),
            next_id: 1,
        };
        world.add_body(BodyCategory::Border, Shape::EdgeLoop, size / 2.0, 1.0, false);
        world
    }

    /// Build the arena for a level: border loop, bottom strip, then the
    /// layout's bodies in order
    pub fn from_layout(layout: &LevelLayout) -> Self {
        let mut world = Self::new(layout.size);
        world.add_rect(
            BodyCategory::Bottom,
            Vec2::new(layout.size.x / 2.0, 0.5),
            Vec2::new(layout.size.x, 1.0),
        );

        for spec in &layout.bodies {
            match (spec.category, spec.shape) {
                (BodyCategory::Border | BodyCategory::Bottom, _) => {
                    log::warn!("Ignoring explicit {} body in layout", spec.category.name());
                }
                (BodyCategory::Ball, ShapeSpec::Circle { radius }) => {
                    world.add_ball(spec.position, radius, spec.mass);
                }
                (BodyCategory::Ball, ShapeSpec::Rect { size }) => {
                    world.add_ball(spec.position, size.min_element() / 2.0, spec.mass);
                }
                (category, ShapeSpec::Rect { size }) => {
                    world.add_rect(category, spec.position, size);
                }
                (category, ShapeSpec::Circle { radius }) => {
                    let handle = world.add_body(
                        category,
                        Shape::Circle { radius },
                        spec.position,
                        spec.mass,
                        false,
                    );
                    log::debug!("Static circle {:?} for {}", handle, category.name());
                }
            }
        }
        world
    }

    pub fn add_body(
        &mut self,
        category: BodyCategory,
        shape: Shape,
        pos: Vec2,
        mass: f32,
        dynamic: bool,
    ) -> NodeHandle {
        let handle = NodeHandle(self.next_id);
        self.next_id += 1;
        self.bodies.push(Body {
            handle,
            category,
            shape,
            pos,
            vel: Vec2::ZERO,
            mass: mass.max(f32::EPSILON),
            damping: 0.0,
            dynamic,
        });
        handle
    }

    /// Add a dynamic ball
    pub fn add_ball(&mut self, pos: Vec2, radius: f32, mass: f32) -> NodeHandle {
        self.add_body(BodyCategory::Ball, Shape::Circle { radius }, pos, mass, true)
    }

    /// Add a static rectangle
    pub fn add_rect(&mut self, category: BodyCategory, pos: Vec2, size: Vec2) -> NodeHandle {
        self.add_body(category, Shape::Rect { half: size / 2.0 }, pos, 1.0, false)
    }

    /// Set a body's velocity directly
    pub fn set_velocity(&mut self, node: NodeHandle, vel: Vec2) {
        if let Some(body) = self.body_mut(node) {
            body.vel = vel;
        }
    }

    pub fn damping(&self, node: NodeHandle) -> Option<f32> {
        self.body(node).map(|b| b.damping)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    fn body(&self, node: NodeHandle) -> Option<&Body> {
        self.bodies.iter().find(|b| b.handle == node)
    }

    fn body_mut(&mut self, node: NodeHandle) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.handle == node)
    }

    /// Move body `idx` by one substep and resolve at most one collision
    fn substep(&mut self, idx: usize, radius: f32, dt: f32) -> Option<ContactEvent> {
        let mover = self.bodies[idx].clone();
        let mut pos = mover.pos + mover.vel * dt;
        let mut vel = mover.vel;
        let mut hit = None;

        for other in &self.bodies {
            if other.handle == mover.handle {
                continue;
            }
            let Shape::Rect { half } = other.shape else {
                continue;
            };
            if let Some((normal, penetration)) = circle_rect(pos, radius, other.pos, half) {
                if vel.dot(normal) < 0.0 {
                    vel = reflect_velocity(vel, normal);
                }
                pos += normal * (penetration + SEPARATION);
                hit = Some(Contact::new(other.handle, other.category));
                break; // One collision per substep
            }
        }

        if hit.is_none() {
            if let Some(border) = self.bodies.iter().find(|b| b.shape == Shape::EdgeLoop) {
                let mut touched = false;
                if pos.x - radius < 0.0 {
                    pos.x = radius + SEPARATION;
                    vel.x = vel.x.abs();
                    touched = true;
                } else if pos.x + radius > self.size.x {
                    pos.x = self.size.x - radius - SEPARATION;
                    vel.x = -vel.x.abs();
                    touched = true;
                }
                if pos.y - radius < 0.0 {
                    pos.y = radius + SEPARATION;
                    vel.y = vel.y.abs();
                    touched = true;
                } else if pos.y + radius > self.size.y {
                    pos.y = self.size.y - radius - SEPARATION;
                    vel.y = -vel.y.abs();
                    touched = true;
                }
                if touched {
                    hit = Some(Contact::new(border.handle, border.category));
                }
            }
        }

        let body = &mut self.bodies[idx];
        body.pos = pos;
        body.vel = vel;
        hit.map(|other| ContactEvent::new(Contact::new(mover.handle, mover.category), other))
    }
}

impl PhysicsWorld for ArenaWorld {
    fn scene_size(&self) -> Vec2 {
        self.size
    }

    fn category(&self, node: NodeHandle) -> Option<BodyCategory> {
        self.body(node).map(|b| b.category)
    }

    fn position(&self, node: NodeHandle) -> Option<Vec2> {
        self.body(node).map(|b| b.pos)
    }

    fn set_position(&mut self, node: NodeHandle, pos: Vec2) {
        if let Some(body) = self.body_mut(node) {
            body.pos = pos;
        }
    }

    fn extent(&self, node: NodeHandle) -> Option<Vec2> {
        let size = self.size;
        self.body(node).map(|b| match b.shape {
            Shape::Circle { radius } => Vec2::splat(radius * 2.0),
            Shape::Rect { half } => half * 2.0,
            Shape::EdgeLoop => size,
        })
    }

    fn velocity(&self, node: NodeHandle) -> Option<Vec2> {
        self.body(node).map(|b| b.vel)
    }

    fn apply_impulse(&mut self, node: NodeHandle, impulse: Vec2) {
        if let Some(body) = self.body_mut(node) {
            if body.dynamic {
                body.vel += impulse / body.mass;
            }
        }
    }

    fn set_linear_damping(&mut self, node: NodeHandle, damping: f32) {
        if let Some(body) = self.body_mut(node) {
            body.damping = damping.max(0.0);
        }
    }

    fn remove_body(&mut self, node: NodeHandle) -> bool {
        let before = self.bodies.len();
        self.bodies.retain(|b| b.handle != node);
        self.bodies.len() != before
    }

    fn count(&self, category: BodyCategory) -> usize {
        self.bodies.iter().filter(|b| b.category == category).count()
    }

    fn first_of(&self, category: BodyCategory) -> Option<NodeHandle> {
        self.bodies
            .iter()
            .find(|b| b.category == category)
            .map(|b| b.handle)
    }

    fn body_at(&self, point: Vec2) -> Option<NodeHandle> {
        self.bodies
            .iter()
            .rev()
            .find(|b| b.contains(point))
            .map(|b| b.handle)
    }

    fn step(&mut self, dt: f32, contacts: &mut Vec<ContactEvent>) {
        for idx in 0..self.bodies.len() {
            let body = &mut self.bodies[idx];
            if !body.dynamic {
                continue;
            }
            let radius = match body.shape {
                Shape::Circle { radius } => radius,
                Shape::Rect { half } => half.min_element(),
                Shape::EdgeLoop => continue,
            };

            if body.damping > 0.0 {
                body.vel *= (1.0 - body.damping * dt).max(0.0);
            }

            let move_dist = body.vel.length() * dt;
            let step_size = (radius * 0.5).max(0.5);
            let num_steps = ((move_dist / step_size).ceil() as usize).clamp(1, MAX_STEPS);
            let step_dt = dt / num_steps as f32;

            for _ in 0..num_steps {
                if let Some(contact) = self.substep(idx, radius, step_dt) {
                    contacts.push(contact);
                }
            }
        }
    }
}

/// Reflect velocity off a surface with the given unit normal
pub fn reflect_velocity(vel: Vec2, normal: Vec2) -> Vec2 {
    vel - 2.0 * vel.dot(normal) * normal
}

/// Circle vs axis-aligned rectangle; returns the push-out normal and depth
fn circle_rect(center: Vec2, radius: f32, rect_center: Vec2, half: Vec2) -> Option<(Vec2, f32)> {
    let closest = center.clamp(rect_center - half, rect_center + half);
    let delta = center - closest;
    let dist = delta.length();
    if dist >= radius {
        return None;
    }
    if dist > 1e-4 {
        return Some((delta / dist, radius - dist));
    }

    // Centre is inside the rectangle: leave along the shallowest axis
    let local = center - rect_center;
    let overlap_x = half.x - local.x.abs();
    let overlap_y = half.y - local.y.abs();
    if overlap_x < overlap_y {
        let sign = if local.x < 0.0 { -1.0 } else { 1.0 };
        Some((Vec2::new(sign, 0.0), overlap_x + radius))
    } else {
        let sign = if local.y < 0.0 { -1.0 } else { 1.0 };
        Some((Vec2::new(0.0, sign), overlap_y + radius))
    }
}
