use rand::Rng;

// One candidate solution. The engine moves it and keeps personal_best up to
// date; the particle itself enforces nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
    pub personal_best: Vec<f64>,

    // Objective value of personal_best, recorded together with it
    pub best_value: f64,
}

impl Particle {
    pub fn new(position: Vec<f64>, velocity: Vec<f64>, value: f64) -> Self {
        Particle {
            personal_best: position.clone(),
            position,
            velocity,
            best_value: value,
        }
    }

    // Draws a position and a velocity uniformly from the given half-open ranges.
    // The caller is expected to have validated the ranges.
    pub fn random_state<R: Rng + ?Sized>(
        rng: &mut R,
        dimensions: usize,
        position_range: (f64, f64),
        velocity_range: (f64, f64),
    ) -> (Vec<f64>, Vec<f64>) {
        let position = (0..dimensions)
            .map(|_| rng.gen_range(position_range.0..position_range.1))
            .collect();
        let velocity = (0..dimensions)
            .map(|_| rng.gen_range(velocity_range.0..velocity_range.1))
            .collect();
        (position, velocity)
    }

    pub fn dimensions(&self) -> usize {
        self.position.len()
    }

    // Moves the particle by its current velocity
    pub fn advance(&mut self) {
        for (x, v) in self.position.iter_mut().zip(self.velocity.iter()) {
            *x += v;
        }
    }

    // Records the current position as the personal best if it improves on it.
    // The position is copied, so later moves never touch the recorded best.
    pub fn record_if_better(&mut self, value: f64) -> bool {
        if value < self.best_value {
            self.personal_best.copy_from_slice(&self.position);
            self.best_value = value;
            return true;
        }
        false
    }
}
