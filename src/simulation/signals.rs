use super::Direction;
use crate::config::SignalsConfig;
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightState {
    Red,
    Green,
}

/// Paired lights: the two approaches of a group always share a state, and
/// exactly one group is green at any time. Both invariants hold by
/// construction because the controller stores only the green group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalGroup {
    NorthSouth,
    EastWest,
}

impl SignalGroup {
    pub fn other(self) -> SignalGroup {
        match self {
            SignalGroup::NorthSouth => SignalGroup::EastWest,
            SignalGroup::EastWest => SignalGroup::NorthSouth,
        }
    }

    pub fn directions(self) -> [Direction; 2] {
        match self {
            SignalGroup::NorthSouth => [Direction::North, Direction::South],
            SignalGroup::EastWest => [Direction::East, Direction::West],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideReason {
    Emergency,
    Congestion,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerMode {
    /// Green group toggles every cycle interval.
    Cycling,
    /// One group forced green for an emergency vehicle or a congested queue.
    Override {
        group: SignalGroup,
        reason: OverrideReason,
        since: f32,
    },
}

/// Congestion classification per approach, refreshed every evaluation with
/// set/reset hysteresis so the override does not toggle rapidly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanePriority {
    Normal,
    High,
}

pub struct SignalController {
    config: SignalsConfig,
    green: SignalGroup,
    mode: ControllerMode,
    last_cycle: f32,
    lane_priorities: [LanePriority; 4],
}

impl SignalController {
    pub fn new(config: SignalsConfig) -> Self {
        Self {
            config,
            // East-west starts green.
            green: SignalGroup::EastWest,
            mode: ControllerMode::Cycling,
            last_cycle: 0.0,
            lane_priorities: [LanePriority::Normal; 4],
        }
    }

    pub fn light(&self, direction: Direction) -> LightState {
        if direction.group() == self.green {
            LightState::Green
        } else {
            LightState::Red
        }
    }

    pub fn green_group(&self) -> SignalGroup {
        self.green
    }

    pub fn mode(&self) -> ControllerMode {
        self.mode
    }

    pub fn lane_priorities(&self) -> [LanePriority; 4] {
        self.lane_priorities
    }

    /// Runs once per tick. Policy in priority order: emergency preemption,
    /// congestion preemption, normal cycling.
    pub fn evaluate(&mut self, now: f32, queue_lengths: [usize; 4], emergency: [bool; 4]) {
        self.refresh_priorities(queue_lengths);

        // 1. Emergency preemption. An active override holds for its minimum
        // duration and for as long as an emergency remains on the group.
        if let ControllerMode::Override {
            group,
            reason: OverrideReason::Emergency,
            since,
        } = self.mode
        {
            let held_long_enough = now - since >= self.config.emergency_hold;
            let still_present = group
                .directions()
                .iter()
                .any(|d| emergency[d.index()]);
            if still_present || !held_long_enough {
                self.green = group;
                return;
            }
            info!("emergency cleared on {:?}, resuming normal cycling", group);
            self.release(now);
        }

        if let Some(direction) = Direction::ALL.into_iter().find(|d| emergency[d.index()]) {
            let group = direction.group();
            info!(
                "emergency vehicle on {:?} approach, forcing {:?} green",
                direction, group
            );
            self.mode = ControllerMode::Override {
                group,
                reason: OverrideReason::Emergency,
                since: now,
            };
            self.green = group;
            return;
        }

        // 2. Congestion preemption, held until every lane of the forced
        // group has drained below the reset threshold.
        if let ControllerMode::Override {
            group,
            reason: OverrideReason::Congestion,
            ..
        } = self.mode
        {
            let still_congested = group
                .directions()
                .iter()
                .any(|d| self.lane_priorities[d.index()] == LanePriority::High);
            if still_congested {
                self.green = group;
                return;
            }
            info!("congestion drained on {:?}, resuming normal cycling", group);
            self.release(now);
        }

        if let Some(direction) = Direction::ALL
            .into_iter()
            .find(|d| self.lane_priorities[d.index()] == LanePriority::High)
        {
            let group = direction.group();
            info!(
                "queue on {:?} approach over threshold, forcing {:?} green",
                direction, group
            );
            self.mode = ControllerMode::Override {
                group,
                reason: OverrideReason::Congestion,
                since: now,
            };
            self.green = group;
            return;
        }

        // 3. Normal cycling.
        if now - self.last_cycle >= self.config.cycle_duration {
            self.green = self.green.other();
            self.last_cycle = now;
            debug!("cycled green group to {:?}", self.green);
        }
    }

    fn release(&mut self, now: f32) {
        self.mode = ControllerMode::Cycling;
        self.last_cycle = now;
    }

    fn refresh_priorities(&mut self, queue_lengths: [usize; 4]) {
        for direction in Direction::ALL {
            let index = direction.index();
            let length = queue_lengths[index];
            if length > self.config.congestion_set_threshold {
                self.lane_priorities[index] = LanePriority::High;
            } else if length < self.config.congestion_reset_threshold {
                self.lane_priorities[index] = LanePriority::Normal;
            }
        }
    }
}
