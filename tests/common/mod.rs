use intersection_sim::config::{
    GeometryConfig, IntersectionConfig, IntersectionProfile, RandomConfig, SignalsConfig,
    SimulationConfig, SimulationParams, TrafficRules, TurningConfig, VehicleTypeConfig,
    VehiclesConfig,
};
use intersection_sim::simulation::VehicleKind;

/// Small world for fast traversal in tests: vehicles cross the window in a
/// few dozen ticks. Signals default to a near-infinite cycle so individual
/// tests control light changes through overrides or explicit settings.
pub fn base_config() -> SimulationConfig {
    SimulationConfig {
        intersection: IntersectionConfig {
            intersection: IntersectionProfile {
                name: "test-crossing".to_string(),
                description: "compact intersection for tests".to_string(),
                geometry: GeometryConfig {
                    window_width: 240.0,
                    window_height: 240.0,
                    center_x: 120.0,
                    center_y: 120.0,
                    lane_width: 20.0,
                },
                rules: TrafficRules {
                    stop_trigger_distance: 20.0,
                    min_following_distance: 40.0,
                    retire_margin: 30.0,
                },
                signals: SignalsConfig {
                    cycle_duration: 1000.0,
                    congestion_set_threshold: 8,
                    congestion_reset_threshold: 2,
                    emergency_hold: 3.0,
                },
            },
        },
        vehicles: VehiclesConfig {
            simulation: SimulationParams {
                max_active: 50,
                queue_capacity: 50,
                spawn_interval: 1.0,
            },
            vehicle_types: vec![
                VehicleTypeConfig {
                    kind: VehicleKind::Car,
                    weight: 85,
                    cruise_speed: 10.0,
                },
                VehicleTypeConfig {
                    kind: VehicleKind::Ambulance,
                    weight: 5,
                    cruise_speed: 12.0,
                },
                VehicleTypeConfig {
                    kind: VehicleKind::Police,
                    weight: 5,
                    cruise_speed: 12.0,
                },
                VehicleTypeConfig {
                    kind: VehicleKind::FireTruck,
                    weight: 5,
                    cruise_speed: 11.0,
                },
            ],
            turning: TurningConfig {
                left_probability: 0.0,
                right_probability: 0.0,
            },
            random: RandomConfig { seed: Some(7) },
        },
    }
}
