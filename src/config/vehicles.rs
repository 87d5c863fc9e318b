use super::Validate;
use crate::simulation::VehicleKind;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VehiclesConfig {
    pub simulation: SimulationParams,
    pub vehicle_types: Vec<VehicleTypeConfig>,
    pub turning: TurningConfig,
    pub random: RandomConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationParams {
    /// Global cap on concurrently active vehicles (arena capacity).
    pub max_active: usize,
    /// Administrative limit per approach queue; spawns beyond it are rejected.
    pub queue_capacity: usize,
    /// Seconds between generated spawn rounds in the console binary.
    pub spawn_interval: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VehicleTypeConfig {
    pub kind: VehicleKind,
    /// Spawn probability weight; weights sum to 100.
    pub weight: u32,
    /// Nominal speed in distance units per tick.
    pub cruise_speed: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TurningConfig {
    pub left_probability: f32,
    pub right_probability: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RandomConfig {
    pub seed: Option<u64>,
}

impl VehiclesConfig {
    /// Nominal cruising speed for a vehicle kind. A missing type entry is a
    /// configuration invariant violation caught by `validate`.
    pub fn cruise_speed(&self, kind: VehicleKind) -> f32 {
        match self.vehicle_types.iter().find(|t| t.kind == kind) {
            Some(entry) => entry.cruise_speed,
            None => {
                debug_assert!(false, "no vehicle type entry for {kind:?}");
                2.0
            }
        }
    }
}

impl Validate for VehiclesConfig {
    fn validate(&self) -> Result<()> {
        let sim = &self.simulation;
        if sim.max_active == 0 {
            return Err(anyhow!("Max active vehicles must be greater than zero"));
        }

        if sim.queue_capacity == 0 {
            return Err(anyhow!("Queue capacity must be greater than zero"));
        }

        if sim.spawn_interval <= 0.0 {
            return Err(anyhow!("Spawn interval must be positive"));
        }

        if self.vehicle_types.is_empty() {
            return Err(anyhow!("At least one vehicle type must be defined"));
        }

        let total_weight: u32 = self.vehicle_types.iter().map(|t| t.weight).sum();
        if total_weight != 100 {
            return Err(anyhow!(
                "Vehicle type weights must sum to 100, got {}",
                total_weight
            ));
        }

        for entry in &self.vehicle_types {
            if entry.cruise_speed <= 0.0 {
                return Err(anyhow!("Cruise speed for {:?} must be positive", entry.kind));
            }
        }

        for kind in [
            VehicleKind::Car,
            VehicleKind::Ambulance,
            VehicleKind::Police,
            VehicleKind::FireTruck,
        ] {
            let count = self.vehicle_types.iter().filter(|t| t.kind == kind).count();
            if count == 0 {
                return Err(anyhow!("Missing vehicle type entry for {:?}", kind));
            }
            if count > 1 {
                return Err(anyhow!("Duplicate vehicle type entry for {:?}", kind));
            }
        }

        let turning = &self.turning;
        if !(0.0..=1.0).contains(&turning.left_probability)
            || !(0.0..=1.0).contains(&turning.right_probability)
        {
            return Err(anyhow!("Turn probabilities must be in range [0, 1]"));
        }

        if turning.left_probability + turning.right_probability > 1.0 {
            return Err(anyhow!("Turn probabilities must sum to at most 1.0"));
        }

        Ok(())
    }
}
