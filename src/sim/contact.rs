//! Contact events and their classification
//!
//! The physics world reports each discrete contact as an unordered pair of
//! bodies. Classification sorts the pair by category so every rule is written
//! for one ordering only.

use super::body::{BodyCategory, NodeHandle};

/// One side of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub node: NodeHandle,
    pub category: BodyCategory,
}

impl Contact {
    pub fn new(node: NodeHandle, category: BodyCategory) -> Self {
        Self { node, category }
    }
}

/// A single discrete collision between two tagged bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub a: Contact,
    pub b: Contact,
}

impl ContactEvent {
    pub fn new(a: Contact, b: Contact) -> Self {
        Self { a, b }
    }

    /// The pair with the lower category first
    pub fn canonical(&self) -> (Contact, Contact) {
        if self.a.category < self.b.category {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

/// What a contact means for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactRule {
    /// Ball reached the bottom edge
    BallLost,
    /// Ball struck a block, which breaks
    BlockHit { block: NodeHandle },
    /// Ball bounced off the border
    BorderBounce,
    /// Ball bounced off the paddle
    PaddleBounce,
    /// No gameplay meaning
    Ignore,
}

/// Map a contact to its rule
pub fn classify(event: &ContactEvent) -> ContactRule {
    let (first, second) = event.canonical();
    if first.category != BodyCategory::Ball {
        return ContactRule::Ignore;
    }
    match second.category {
        BodyCategory::Bottom => ContactRule::BallLost,
        BodyCategory::Block => ContactRule::BlockHit { block: second.node },
        BodyCategory::Border => ContactRule::BorderBounce,
        BodyCategory::Paddle => ContactRule::PaddleBounce,
        BodyCategory::Ball => ContactRule::Ignore,
    }
}
