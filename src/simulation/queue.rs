use super::Vehicle;
use std::collections::VecDeque;

/// FIFO of vehicles waiting for an active slot on one approach. The queue
/// itself is unbounded; the administrative capacity is enforced by the
/// engine's `spawn_request`, and the controller reads `len` every evaluation
/// as its congestion signal.
#[derive(Debug, Clone, Default)]
pub struct LaneQueue {
    pending: VecDeque<Vehicle>,
}

impl LaneQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, vehicle: Vehicle) {
        self.pending.push_back(vehicle);
    }

    pub fn pop(&mut self) -> Option<Vehicle> {
        self.pending.pop_front()
    }

    pub fn peek(&self) -> Option<&Vehicle> {
        self.pending.front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.pending.iter()
    }
}
