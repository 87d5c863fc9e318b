use super::{Direction, LaneSide, MotionState, TurnIntent, Vehicle, VehicleKind};
use crate::config::{GeometryConfig, VehiclesConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Builds spawn-ready vehicles: random kind by configured weight, turn
/// intent by configured probabilities, lane side from the turn intent
/// (right-turners take the right lane, left-turners the left, straight
/// traffic picks a side at random).
pub struct VehicleFactory {
    geometry: GeometryConfig,
    vehicles: VehiclesConfig,
    rng: StdRng,
}

impl VehicleFactory {
    pub fn new(geometry: GeometryConfig, vehicles: VehiclesConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            geometry,
            vehicles,
            rng,
        }
    }

    /// A new vehicle at the approach's spawn point. `kind` comes from the
    /// caller (e.g. the file feed) or is rolled from the spawn weights.
    pub fn build(&mut self, direction: Direction, kind: Option<VehicleKind>) -> Vehicle {
        let kind = kind.unwrap_or_else(|| self.roll_kind());
        let intent = self.roll_intent();
        let lane = match intent {
            TurnIntent::Right => LaneSide::Right,
            TurnIntent::Left => LaneSide::Left,
            TurnIntent::None => {
                if self.rng.gen::<bool>() {
                    LaneSide::Right
                } else {
                    LaneSide::Left
                }
            }
        };

        Vehicle {
            kind,
            direction,
            position: self.geometry.spawn_point(direction, lane),
            speed: self.vehicles.cruise_speed(kind),
            motion: MotionState::Moving,
            intent,
            lane,
            active: true,
            turn_path: None,
        }
    }

    fn roll_kind(&mut self) -> VehicleKind {
        let total_weight: u32 = self.vehicles.vehicle_types.iter().map(|t| t.weight).sum();
        let mut random_value = self.rng.gen_range(0..total_weight);

        let mut selected = self.vehicles.vehicle_types[0].kind;
        for entry in &self.vehicles.vehicle_types {
            if random_value < entry.weight {
                selected = entry.kind;
                break;
            }
            random_value -= entry.weight;
        }
        selected
    }

    fn roll_intent(&mut self) -> TurnIntent {
        let turning = &self.vehicles.turning;
        let roll: f32 = self.rng.gen();
        if roll < turning.left_probability {
            TurnIntent::Left
        } else if roll < turning.left_probability + turning.right_probability {
            TurnIntent::Right
        } else {
            TurnIntent::None
        }
    }
}
