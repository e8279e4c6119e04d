use std::error::Error;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::SwarmConfig;
use crate::errors::SwarmError;
use crate::swarm::events::{Event, EventChannel, Observer};
use crate::swarm::objective::{checked_evaluate, Objective};
use crate::swarm::particle::Particle;
use crate::swarm::stopping::{Progress, StoppingCondition};
use crate::swarm::velocity::{Canonical, VelocityUpdate};

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    pub best: Vec<f64>,
    pub best_value: f64,
}

pub struct SwarmEngine<O: Objective> {
    // Input parameters
    objective: O,
    strategy: Box<dyn VelocityUpdate>,
    events: EventChannel,
    rng: SmallRng,

    // Search state
    particles: Vec<Particle>,
    best: Vec<f64>,
    best_value: f64,

    // Steps completed so far; also the step index of the next step's events
    steps: usize,
}

impl<O: Objective> SwarmEngine<O> {
    // Builds a swarm using the canonical velocity update with the configured weights
    pub fn new(objective: O, config: &SwarmConfig) -> Result<Self, SwarmError> {
        config.validate()?;
        let mut strategy = Canonical::new(config.inertia, config.cognitive, config.social);
        if let Some(max_speed) = config.max_speed {
            strategy = strategy.with_max_speed(max_speed)?;
        }
        Self::initialise(objective, config, Box::new(strategy))
    }

    // Builds a swarm with a custom velocity update. The weights and max speed
    // in the config are ignored; particle count, ranges and seed still apply.
    pub fn with_strategy(
        objective: O,
        config: &SwarmConfig,
        strategy: Box<dyn VelocityUpdate>,
    ) -> Result<Self, SwarmError> {
        config.validate_population()?;
        Self::initialise(objective, config, strategy)
    }

    // Expects the population part of the config to be validated already
    fn initialise(
        objective: O,
        config: &SwarmConfig,
        strategy: Box<dyn VelocityUpdate>,
    ) -> Result<Self, SwarmError> {
        let dimensions = objective.dimensions();
        if dimensions == 0 {
            return Err(SwarmError::NoDimensions);
        }

        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        // Every particle is evaluated once here, so the swarm best is valid
        // before the first step. Ties go to the earliest particle.
        let mut particles: Vec<Particle> = Vec::with_capacity(config.particles);
        let mut best_index = 0;
        for i in 0..config.particles {
            let (position, velocity) = Particle::random_state(
                &mut rng,
                dimensions,
                config.position_range,
                config.velocity_range,
            );
            let value = checked_evaluate(&objective, &position)?;
            if i == 0 || value < particles[best_index].best_value {
                best_index = i;
            }
            particles.push(Particle::new(position, velocity, value));
        }

        let best = particles[best_index].personal_best.clone();
        let best_value = particles[best_index].best_value;
        log::debug!(
            "Initialised {} particles in {} dimensions, best value {}",
            particles.len(),
            dimensions,
            best_value
        );

        Ok(SwarmEngine {
            objective,
            strategy,
            events: EventChannel::new(),
            rng,
            particles,
            best,
            best_value,
            steps: 0,
        })
    }

    pub fn subscribe(&mut self, observer: Box<dyn Observer>) {
        self.events.subscribe(observer);
    }

    pub fn objective(&self) -> &O {
        &self.objective
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn best(&self) -> &[f64] {
        &self.best
    }

    pub fn best_value(&self) -> f64 {
        self.best_value
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn progress(&self) -> Progress {
        Progress {
            steps: self.steps,
            best_value: self.best_value,
        }
    }

    // Steps until the condition says stop. Returns what this call achieved;
    // the step counter keeps counting across calls.
    pub fn run<C: StoppingCondition + ?Sized>(
        &mut self,
        condition: &mut C,
    ) -> Result<RunSummary, Box<dyn Error>> {
        let start = self.steps;
        log::info!(
            "Starting run with {} particles, best value {}",
            self.particles.len(),
            self.best_value
        );

        while condition.should_continue(&self.progress()) {
            self.step()?;
        }

        let summary = RunSummary {
            steps: self.steps - start,
            best: self.best.clone(),
            best_value: self.best_value,
        };
        log::info!(
            "Run finished after {} steps, best value {} at {:?}",
            summary.steps,
            summary.best_value,
            summary.best
        );
        Ok(summary)
    }

    // Moves every particle once, in creation order, updating its personal best
    // and the swarm best as it goes. An error (including one raised by an
    // observer) abandons the rest of the step and leaves the counter alone.
    pub fn step(&mut self) -> Result<(), Box<dyn Error>> {
        let step_index = self.steps;
        let dimensions = self.objective.dimensions();

        for i in 0..self.particles.len() {
            let velocity =
                self.strategy
                    .compute_velocity(&self.particles[i], &self.best, &mut self.rng);
            if velocity.len() != dimensions {
                return Err(Box::new(SwarmError::DimensionMismatch {
                    expected: dimensions,
                    got: velocity.len(),
                }));
            }

            let particle = &mut self.particles[i];
            particle.velocity = velocity;
            particle.advance();

            let value = checked_evaluate(&self.objective, &particle.position)?;
            self.events.publish(&Event::ParticleUpdated {
                step_index,
                particle_index: i,
                position: particle.position.clone(),
                velocity: particle.velocity.clone(),
                value,
            })?;

            particle.record_if_better(value);

            if particle.best_value < self.best_value {
                self.best.copy_from_slice(&particle.personal_best);
                self.best_value = particle.best_value;
                log::debug!(
                    "Step {}: particle {} improved swarm best to {}",
                    step_index,
                    i,
                    self.best_value
                );

                self.events.publish(&Event::BestUpdated {
                    step_index,
                    particle_index: i,
                    position: self.best.clone(),
                    value: self.best_value,
                })?;
            }
        }

        self.steps += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swarm::objective::FnObjective;
    use crate::swarm::stopping::RunNumberTimes;
    use rand::RngCore;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sphere(dimensions: usize) -> FnObjective<impl Fn(&[f64]) -> f64> {
        FnObjective::new(dimensions, |x: &[f64]| x.iter().map(|xi| xi * xi).sum())
    }

    #[test]
    fn initial_best_is_the_best_starting_position() {
        let config = SwarmConfig::new(20, 0.6, 1.0, 2.0).with_seed(11);
        let engine = SwarmEngine::new(sphere(3), &config).unwrap();

        let objective = engine.objective();
        let lowest = engine
            .particles()
            .iter()
            .map(|p| objective.evaluate(&p.position))
            .fold(f64::INFINITY, f64::min);
        assert_eq!(engine.best_value(), lowest);
        assert_eq!(objective.evaluate(engine.best()), lowest);
        assert_eq!(engine.steps(), 0);
    }

    #[test]
    fn ties_go_to_the_first_particle() {
        let flat = FnObjective::new(2, |_: &[f64]| 1.0);
        let config = SwarmConfig::new(5, 0.6, 1.0, 2.0).with_seed(3);
        let engine = SwarmEngine::new(flat, &config).unwrap();
        assert_eq!(engine.best(), engine.particles()[0].position.as_slice());
    }

    #[test]
    fn zero_dimensions_is_rejected() {
        let config = SwarmConfig::default();
        match SwarmEngine::new(sphere(0), &config) {
            Err(err) => assert_eq!(err, SwarmError::NoDimensions),
            Ok(_) => panic!("expected NoDimensions"),
        }
    }

    #[test]
    fn non_finite_objective_fails_at_construction() {
        let config = SwarmConfig::new(3, 0.6, 1.0, 2.0).with_seed(1);
        let result = SwarmEngine::new(FnObjective::new(1, |_: &[f64]| f64::INFINITY), &config);
        assert!(matches!(result, Err(SwarmError::NonFiniteValue { .. })));
    }

    #[test]
    fn step_advances_the_counter() {
        let config = SwarmConfig::new(4, 0.6, 1.0, 2.0).with_seed(5);
        let mut engine = SwarmEngine::new(sphere(2), &config).unwrap();
        engine.step().unwrap();
        engine.step().unwrap();
        assert_eq!(engine.steps(), 2);

        let summary = engine.run(&mut RunNumberTimes::new(3)).unwrap();
        assert_eq!(summary.steps, 3);
        assert_eq!(engine.steps(), 5);
    }

    struct WrongLength;

    impl VelocityUpdate for WrongLength {
        fn compute_velocity(&mut self, _: &Particle, _: &[f64], _: &mut dyn RngCore) -> Vec<f64> {
            vec![0.0; 5]
        }
    }

    #[test]
    fn strategy_returning_wrong_length_is_an_error() {
        let config = SwarmConfig::new(2, 0.6, 1.0, 2.0).with_seed(8);
        let mut engine = SwarmEngine::with_strategy(sphere(2), &config, Box::new(WrongLength)).unwrap();
        let err = engine.step().unwrap_err();
        assert_eq!(
            err.downcast_ref::<SwarmError>(),
            Some(&SwarmError::DimensionMismatch { expected: 2, got: 5 })
        );
    }

    struct Stay;

    impl VelocityUpdate for Stay {
        fn compute_velocity(&mut self, particle: &Particle, _: &[f64], _: &mut dyn RngCore) -> Vec<f64> {
            vec![0.0; particle.dimensions()]
        }
    }

    #[test]
    fn oversized_init_range_is_an_error_not_a_panic() {
        let config = SwarmConfig::default()
            .with_seed(1)
            .with_ranges((-1e308, 1e308), (-1.0, 1.0));
        match SwarmEngine::new(sphere(2), &config) {
            Err(err) => assert!(matches!(err, SwarmError::InvalidRange { name: "position", .. })),
            Ok(_) => panic!("expected InvalidRange"),
        }
    }

    #[test]
    fn custom_strategy_ignores_weight_settings() {
        let config = SwarmConfig::new(4, f64::NAN, 1.0, 2.0)
            .with_max_speed(-1.0)
            .with_seed(2);
        assert!(SwarmEngine::with_strategy(sphere(2), &config, Box::new(Stay)).is_ok());
        assert!(SwarmEngine::new(sphere(2), &config).is_err());
    }

    // Sends every particle far along the first axis
    struct Jump;

    impl VelocityUpdate for Jump {
        fn compute_velocity(&mut self, particle: &Particle, _: &[f64], _: &mut dyn RngCore) -> Vec<f64> {
            let mut velocity = vec![0.0; particle.dimensions()];
            velocity[0] = 10.0;
            velocity
        }
    }

    #[test]
    fn non_finite_value_after_a_move_fails_the_step() {
        let cliff = FnObjective::new(2, |x: &[f64]| {
            if x[0] > 5.0 {
                f64::NAN
            } else {
                x.iter().map(|xi| xi * xi).sum()
            }
        });
        let config = SwarmConfig::new(3, 0.6, 1.0, 2.0).with_seed(4);
        let mut engine = SwarmEngine::with_strategy(cliff, &config, Box::new(Jump)).unwrap();

        let published = Rc::new(RefCell::new(0));
        let counter = published.clone();
        engine.subscribe(Box::new(move |_: &Event| -> Result<(), Box<dyn Error>> {
            *counter.borrow_mut() += 1;
            Ok(())
        }));

        let err = engine.step().unwrap_err();
        match err.downcast_ref::<SwarmError>() {
            Some(SwarmError::NonFiniteValue { value }) => assert!(value.is_nan()),
            other => panic!("expected NonFiniteValue, got {:?}", other),
        }
        assert_eq!(engine.steps(), 0);
        assert_eq!(*published.borrow(), 0);
    }

    #[test]
    fn stationary_swarm_keeps_its_best() {
        let config = SwarmConfig::new(10, 0.6, 1.0, 2.0).with_seed(21);
        let mut engine = SwarmEngine::with_strategy(sphere(2), &config, Box::new(Stay)).unwrap();
        let before = engine.best().to_vec();
        engine.run(&mut RunNumberTimes::new(5)).unwrap();
        assert_eq!(engine.best(), before.as_slice());
    }
}
