pub mod config;
pub mod graph;
pub mod metrics;
pub mod payoff;
pub mod population;
pub mod rng;
pub mod world;

pub use config::{SimConfig, SimConfigError};
pub use graph::{Graph, GraphError};
pub use metrics::{RunSummary, StepMetrics};
pub use payoff::{PayoffMatrix, Strategy};
pub use population::Population;
pub use world::{ExperimentError, StepError, World, WorldInitError};
