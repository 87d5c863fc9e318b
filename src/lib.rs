pub mod config;
pub mod feed;
pub mod simulation;

pub use config::*;
pub use simulation::*;
