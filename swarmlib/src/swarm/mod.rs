pub mod engine;
pub mod events;
pub mod objective;
pub mod particle;
pub mod stopping;
pub mod velocity;

pub use engine::*;
pub use events::*;
pub use objective::*;
pub use particle::*;
pub use stopping::*;
pub use velocity::*;
