pub mod config;
pub mod errors;
pub mod functions;
pub mod logging;
pub mod report;
pub mod swarm;

pub use config::SwarmConfig;
pub use errors::SwarmError;
