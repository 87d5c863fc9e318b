use anyhow::Result;

pub mod intersection;
pub mod vehicles;

pub use intersection::*;
pub use vehicles::*;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub intersection: IntersectionConfig,
    pub vehicles: VehiclesConfig,
}

impl SimulationConfig {
    pub fn load_from_files(intersection_path: &str, vehicles_path: &str) -> Result<Self> {
        let intersection_content = std::fs::read_to_string(intersection_path)?;
        let vehicles_content = std::fs::read_to_string(vehicles_path)?;

        let intersection: IntersectionConfig = toml::from_str(&intersection_content)?;
        let vehicles: VehiclesConfig = toml::from_str(&vehicles_content)?;

        // Validate configurations
        intersection.validate()?;
        vehicles.validate()?;

        Ok(SimulationConfig {
            intersection,
            vehicles,
        })
    }
}

pub trait Validate {
    fn validate(&self) -> Result<()>;
}
