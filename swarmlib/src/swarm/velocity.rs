use rand::{Rng, RngCore};

use crate::errors::SwarmError;
use crate::swarm::particle::Particle;

// Computes a particle's next velocity from its own state and the swarm best.
// The engine lends its random source on every call so one seed fixes a run.
pub trait VelocityUpdate {
    fn compute_velocity(
        &mut self,
        particle: &Particle,
        swarm_best: &[f64],
        rng: &mut dyn RngCore,
    ) -> Vec<f64>;
}

// The inertia-weighted update of Shi and Eberhart:
//   v' = w*v + c1*r1*(p - x) + c2*r2*(g - x)
// with r1, r2 drawn from [0, 1) independently for every dimension and call.
#[derive(Debug, Clone, PartialEq)]
pub struct Canonical {
    pub inertia: f64,
    pub cognitive: f64,
    pub social: f64,

    // Optional symmetric clamp applied after the update; unclamped if None
    pub max_speed: Option<f64>,
}

impl Canonical {
    pub fn new(inertia: f64, cognitive: f64, social: f64) -> Self {
        Canonical {
            inertia,
            cognitive,
            social,
            max_speed: None,
        }
    }

    // No inertia damping, both attractions weighted by 2
    pub fn classic() -> Self {
        Canonical::new(1.0, 2.0, 2.0)
    }

    pub fn with_max_speed(mut self, max_speed: f64) -> Result<Self, SwarmError> {
        if !max_speed.is_finite() || max_speed <= 0.0 {
            return Err(SwarmError::InvalidMaxSpeed { value: max_speed });
        }
        self.max_speed = Some(max_speed);
        Ok(self)
    }
}

impl VelocityUpdate for Canonical {
    fn compute_velocity(
        &mut self,
        particle: &Particle,
        swarm_best: &[f64],
        rng: &mut dyn RngCore,
    ) -> Vec<f64> {
        let mut velocity = Vec::with_capacity(particle.velocity.len());
        for d in 0..particle.velocity.len() {
            let r1: f64 = rng.gen();
            let r2: f64 = rng.gen();
            let x = particle.position[d];

            let mut v = self.inertia * particle.velocity[d]
                + self.cognitive * r1 * (particle.personal_best[d] - x)
                + self.social * r2 * (swarm_best[d] - x);

            if let Some(max_speed) = self.max_speed {
                v = v.clamp(-max_speed, max_speed);
            }
            velocity.push(v);
        }
        velocity
    }
}
