use super::Validate;
use crate::simulation::{Direction, LaneSide, Point, TurnIntent};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IntersectionConfig {
    pub intersection: IntersectionProfile,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IntersectionProfile {
    pub name: String,
    pub description: String,
    pub geometry: GeometryConfig,
    pub rules: TrafficRules,
    pub signals: SignalsConfig,
}

/// Visible-area and road geometry. Each road has two directional halves of
/// width `2 * lane_width`; every half carries a left (inner) and right
/// (outer) lane of `lane_width` each.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeometryConfig {
    pub window_width: f32,
    pub window_height: f32,
    pub center_x: f32,
    pub center_y: f32,
    pub lane_width: f32,
}

/// Distance a vehicle spawns inside the window edge.
pub const SPAWN_INSET: f32 = 20.0;

impl GeometryConfig {
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// Half-width of a road: one directional half, two lanes.
    pub fn road_half_width(&self) -> f32 {
        2.0 * self.lane_width
    }

    /// Cross-axis offset of a lane center, measured from the road centerline
    /// toward the travel direction's right-hand side.
    pub fn lane_offset(&self, side: LaneSide) -> f32 {
        match side {
            LaneSide::Left => self.lane_width / 2.0,
            LaneSide::Right => self.lane_width * 1.5,
        }
    }

    /// Intersection center projected onto the travel axis of `direction`.
    pub fn center_progress(&self, direction: Direction) -> f32 {
        self.center().coords.dot(&direction.unit())
    }

    /// Stop line along the travel axis: one road half-width before center.
    pub fn stop_line(&self, direction: Direction) -> f32 {
        self.center_progress(direction) - self.road_half_width()
    }

    /// Travel-axis coordinate where a turn arc begins. Right turns start at
    /// the intersection entry edge, left turns half a lane before center;
    /// with the matching radii the arc exits exactly on the exit lane center.
    pub fn turn_trigger(&self, direction: Direction, intent: TurnIntent) -> f32 {
        let setback = match intent {
            TurnIntent::Right => self.road_half_width(),
            TurnIntent::Left => self.lane_width / 2.0,
            TurnIntent::None => {
                debug_assert!(false, "turn trigger queried without turn intent");
                0.0
            }
        };
        self.center_progress(direction) - setback
    }

    pub fn turn_radius(&self, intent: TurnIntent) -> f32 {
        match intent {
            TurnIntent::Right => self.lane_width / 2.0,
            TurnIntent::Left => self.lane_width,
            TurnIntent::None => {
                debug_assert!(false, "turn radius queried without turn intent");
                self.lane_width
            }
        }
    }

    /// Distance from the intersection center to the spawn point of an
    /// approach, along the travel axis.
    pub fn entry_distance(&self, direction: Direction) -> f32 {
        match direction {
            Direction::North => self.window_height - self.center_y - SPAWN_INSET,
            Direction::South => self.center_y - SPAWN_INSET,
            Direction::East => self.center_x - SPAWN_INSET,
            Direction::West => self.window_width - self.center_x - SPAWN_INSET,
        }
    }

    /// Where a vehicle of the given approach and lane enters the window.
    pub fn spawn_point(&self, direction: Direction, side: LaneSide) -> Point {
        self.center() + direction.right().unit() * self.lane_offset(side)
            - direction.unit() * self.entry_distance(direction)
    }

    pub fn out_of_bounds(&self, position: Point, margin: f32) -> bool {
        position.x < -margin
            || position.x > self.window_width + margin
            || position.y < -margin
            || position.y > self.window_height + margin
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrafficRules {
    /// Window before the stop line in which a red light begins deceleration.
    pub stop_trigger_distance: f32,
    /// Minimum gap to the vehicle ahead in the same lane.
    pub min_following_distance: f32,
    /// How far past a window edge a vehicle must be to retire.
    pub retire_margin: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignalsConfig {
    /// Seconds between green-group toggles under normal cycling.
    pub cycle_duration: f32,
    /// Queue length that marks a lane high-priority.
    pub congestion_set_threshold: usize,
    /// Queue length below which a high-priority lane resets to normal.
    pub congestion_reset_threshold: usize,
    /// Minimum seconds an emergency override holds before re-evaluation.
    pub emergency_hold: f32,
}

impl Validate for IntersectionConfig {
    fn validate(&self) -> Result<()> {
        let geometry = &self.intersection.geometry;

        if geometry.window_width <= 0.0 || geometry.window_height <= 0.0 {
            return Err(anyhow!("Window dimensions must be positive"));
        }

        if geometry.center_x <= 0.0
            || geometry.center_x >= geometry.window_width
            || geometry.center_y <= 0.0
            || geometry.center_y >= geometry.window_height
        {
            return Err(anyhow!("Intersection center must lie inside the window"));
        }

        if geometry.lane_width <= 0.0 {
            return Err(anyhow!("Lane width must be positive"));
        }

        let road_width = 2.0 * geometry.road_half_width();
        if road_width >= geometry.window_width || road_width >= geometry.window_height {
            return Err(anyhow!(
                "Road width {} does not fit the {}x{} window",
                road_width,
                geometry.window_width,
                geometry.window_height
            ));
        }

        for direction in Direction::ALL {
            if geometry.entry_distance(direction) <= geometry.road_half_width() {
                return Err(anyhow!(
                    "No approach room for {:?}: center too close to the window edge",
                    direction
                ));
            }
        }

        let rules = &self.intersection.rules;
        if rules.stop_trigger_distance <= 0.0 {
            return Err(anyhow!("Stop trigger distance must be positive"));
        }

        if rules.min_following_distance <= 0.0 {
            return Err(anyhow!("Minimum following distance must be positive"));
        }

        if rules.retire_margin < 0.0 {
            return Err(anyhow!("Retire margin must be non-negative"));
        }

        let signals = &self.intersection.signals;
        if signals.cycle_duration <= 0.0 {
            return Err(anyhow!("Signal cycle duration must be positive"));
        }

        if signals.congestion_reset_threshold >= signals.congestion_set_threshold {
            return Err(anyhow!(
                "Congestion reset threshold {} must be below the set threshold {}",
                signals.congestion_reset_threshold,
                signals.congestion_set_threshold
            ));
        }

        if signals.emergency_hold < 0.0 {
            return Err(anyhow!("Emergency hold duration must be non-negative"));
        }

        Ok(())
    }
}
