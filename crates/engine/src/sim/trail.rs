use std::collections::VecDeque;

use super::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailNode {
    pub position: Vec2,
    pub life: f32,
}

/// Bounded FIFO of past agent positions. Oldest nodes are evicted from the front
/// once `cap` is exceeded; life only ever decays.
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    nodes: VecDeque<TrailNode>,
    cap: usize,
}

impl TrailBuffer {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            nodes: VecDeque::with_capacity(cap + 1),
            cap,
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn push(&mut self, position: Vec2) {
        self.nodes.push_back(TrailNode {
            position,
            life: 1.0,
        });
        while self.nodes.len() > self.cap {
            self.nodes.pop_front();
        }
    }

    pub fn decay(&mut self, amount: f32) {
        if !(amount > 0.0) {
            return;
        }
        for node in &mut self.nodes {
            node.life = (node.life - amount).max(0.0);
        }
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TrailNode> {
        self.nodes.iter()
    }
}
