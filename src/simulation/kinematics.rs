use super::{
    Direction, LaneSide, LightState, MotionState, Point, SignalController, SlotId, TurnIntent,
    TurnPath, Vehicle, VehicleArena,
};
use crate::config::{GeometryConfig, TrafficRules, VehiclesConfig};

/// Multiplicative speed decay per tick while decelerating.
const DECELERATION_FACTOR: f32 = 0.9;
/// Below this speed a decelerating vehicle counts as stopped.
const STOP_EPSILON: f32 = 0.1;
/// Vehicles take turns at half their straight-line speed.
const TURN_SPEED_FACTOR: f32 = 0.5;
/// How far past a stop target a vehicle may sit and still be held by it.
const CROSSED_EPSILON: f32 = 0.5;

/// Per-vehicle position/state update: stop decision, lane spacing, turn
/// arcs and retirement. Reads the whole arena first, then applies, so every
/// vehicle in a tick sees the same pre-tick world.
pub struct KinematicsEngine {
    geometry: GeometryConfig,
    rules: TrafficRules,
    vehicles: VehiclesConfig,
}

impl KinematicsEngine {
    pub fn new(geometry: GeometryConfig, rules: TrafficRules, vehicles: VehiclesConfig) -> Self {
        Self {
            geometry,
            rules,
            vehicles,
        }
    }

    pub fn update(&self, arena: &mut VehicleArena, signals: &SignalController) {
        let mut updates: Vec<(SlotId, VehicleUpdate)> = Vec::with_capacity(arena.active_count());

        for (id, vehicle) in arena.iter() {
            if !vehicle.active {
                continue;
            }
            updates.push((id, self.plan(id, vehicle, arena, signals)));
        }

        for (id, update) in updates {
            if let Some(vehicle) = arena.get_mut(id) {
                update.apply(vehicle);
            }
        }
    }

    fn plan(
        &self,
        id: SlotId,
        vehicle: &Vehicle,
        arena: &VehicleArena,
        signals: &SignalController,
    ) -> VehicleUpdate {
        let mut update = VehicleUpdate::carry_over(vehicle);

        if vehicle.turn_path.is_some() {
            self.advance_turn(vehicle, &mut update);
        } else {
            self.advance_straight(id, vehicle, arena, signals, &mut update);
        }

        // Leaving the visible area (plus margin) is the sole removal path.
        if self
            .geometry
            .out_of_bounds(update.position, self.rules.retire_margin)
        {
            update.active = false;
        }

        update
    }

    fn advance_straight(
        &self,
        id: SlotId,
        vehicle: &Vehicle,
        arena: &VehicleArena,
        signals: &SignalController,
        update: &mut VehicleUpdate,
    ) {
        let unit = vehicle.direction.unit();
        let progress = vehicle.progress();

        // Nearest travel-axis coordinate this vehicle must not pass, from the
        // red light and from the vehicle ahead; the nearer one governs.
        let mut stop_target: Option<f32> = None;

        if !vehicle.kind.is_emergency() && signals.light(vehicle.direction) == LightState::Red {
            let line = self.geometry.stop_line(vehicle.direction);
            let ahead = line - progress;
            if ahead > -CROSSED_EPSILON && ahead <= self.rules.stop_trigger_distance {
                stop_target = Some(line);
            }
        }

        if let Some(leader_progress) = self.leader_progress(id, vehicle, progress, arena) {
            let gap = leader_progress - progress;
            if gap <= self.rules.min_following_distance + self.rules.stop_trigger_distance {
                let target = leader_progress - self.rules.min_following_distance;
                stop_target = Some(match stop_target {
                    Some(existing) => existing.min(target),
                    None => target,
                });
            }
        }

        if let Some(target) = stop_target {
            update.speed = vehicle.speed * DECELERATION_FACTOR;
            update.motion = MotionState::Decelerating;
            if update.speed < STOP_EPSILON {
                update.speed = 0.0;
                update.motion = MotionState::Stopped;
            }
            // Never cross the stop target, whatever the residual speed.
            let advance = update.speed.min((target - progress).max(0.0));
            update.position = vehicle.position + unit * advance;
            return;
        }

        if matches!(
            vehicle.motion,
            MotionState::Decelerating | MotionState::Stopped
        ) {
            update.motion = MotionState::Moving;
            update.speed = self.vehicles.cruise_speed(vehicle.kind);
        }

        if vehicle.intent != TurnIntent::None
            && update.motion == MotionState::Moving
            && progress >= self.geometry.turn_trigger(vehicle.direction, vehicle.intent)
        {
            self.begin_turn(vehicle, progress, update);
            return;
        }

        update.position = vehicle.position + unit * update.speed;
    }

    fn begin_turn(&self, vehicle: &Vehicle, progress: f32, update: &mut VehicleUpdate) {
        let trigger = self.geometry.turn_trigger(vehicle.direction, vehicle.intent);
        let radius = self.geometry.turn_radius(vehicle.intent);
        let (sense, to) = match vehicle.intent {
            TurnIntent::Right => (1.0, vehicle.direction.right()),
            TurnIntent::Left => (-1.0, vehicle.direction.left()),
            TurnIntent::None => unreachable!("begin_turn requires a turn intent"),
        };

        // Anchor the arc at the exact trigger point rather than the current
        // position, so the quarter circle exits on the exit lane center even
        // when the vehicle overshot the trigger within this tick.
        let overshoot = progress - trigger;
        let entry_point = vehicle.position - vehicle.direction.unit() * overshoot;
        let center = entry_point + to.unit() * radius;

        let mut path = TurnPath {
            center,
            radius,
            entry: entry_point - center,
            sense,
            to,
            progress: 0.0,
        };

        path.progress = (vehicle.speed * TURN_SPEED_FACTOR) / path.arc_length();
        update.position = path.at(path.progress);
        update.motion = MotionState::Turning;
        update.turn_path = Some(path);
    }

    fn advance_turn(&self, vehicle: &Vehicle, update: &mut VehicleUpdate) {
        let Some(path) = vehicle.turn_path.as_ref() else {
            debug_assert!(false, "advance_turn without a turn path");
            return;
        };
        let mut path = path.clone();
        let arc_length = path.arc_length();
        path.progress += (vehicle.speed * TURN_SPEED_FACTOR) / arc_length;

        if path.progress >= 1.0 {
            // Arc complete: heading flips to the exit direction, the turn
            // intent clears and the leftover travel continues straight.
            let leftover = (path.progress - 1.0) * arc_length;
            update.position = path.at(1.0) + path.to.unit() * leftover;
            update.direction = path.to;
            update.intent = TurnIntent::None;
            update.lane = exit_lane(vehicle.lane);
            update.motion = MotionState::Moving;
            update.turn_path = None;
        } else {
            update.position = path.at(path.progress);
            update.motion = MotionState::Turning;
            update.turn_path = Some(path);
        }
    }

    /// Travel-axis coordinate of the nearest vehicle ahead in the same
    /// direction and lane, if any.
    fn leader_progress(
        &self,
        id: SlotId,
        vehicle: &Vehicle,
        progress: f32,
        arena: &VehicleArena,
    ) -> Option<f32> {
        let mut nearest: Option<f32> = None;
        for (other_id, other) in arena.iter() {
            if other_id == id || !other.active {
                continue;
            }
            if other.direction != vehicle.direction || other.lane != vehicle.lane {
                continue;
            }
            let other_progress = other.progress();
            if other_progress > progress {
                nearest = Some(match nearest {
                    Some(best) => best.min(other_progress),
                    None => other_progress,
                });
            }
        }
        nearest
    }
}

/// The quarter-arc geometry maps each entry lane onto the exit lane on the
/// same relative side of the new heading.
fn exit_lane(lane: LaneSide) -> LaneSide {
    lane
}

#[derive(Debug, Clone)]
struct VehicleUpdate {
    position: Point,
    speed: f32,
    motion: MotionState,
    direction: Direction,
    intent: TurnIntent,
    lane: LaneSide,
    active: bool,
    turn_path: Option<TurnPath>,
}

impl VehicleUpdate {
    fn carry_over(vehicle: &Vehicle) -> Self {
        Self {
            position: vehicle.position,
            speed: vehicle.speed,
            motion: vehicle.motion,
            direction: vehicle.direction,
            intent: vehicle.intent,
            lane: vehicle.lane,
            active: vehicle.active,
            turn_path: vehicle.turn_path.clone(),
        }
    }

    fn apply(self, vehicle: &mut Vehicle) {
        debug_assert!(
            !(self.motion == MotionState::Turning && self.speed == 0.0),
            "a committed turn must keep moving"
        );
        vehicle.position = self.position;
        vehicle.speed = self.speed;
        vehicle.motion = self.motion;
        vehicle.direction = self.direction;
        vehicle.intent = self.intent;
        vehicle.lane = self.lane;
        vehicle.active = self.active;
        vehicle.turn_path = self.turn_path;
    }
}
