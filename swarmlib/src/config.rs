use serde::{Deserialize, Serialize};

use crate::errors::SwarmError;

// Everything the engine needs besides the objective itself.
// Field names follow the camelCase used by the settings files.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SwarmConfig {
    pub particles: usize,
    pub inertia: f64,
    pub cognitive: f64,
    pub social: f64,
    #[serde(rename = "positionRange")]
    pub position_range: (f64, f64),
    #[serde(rename = "velocityRange")]
    pub velocity_range: (f64, f64),
    #[serde(rename = "maxSpeed")]
    pub max_speed: Option<f64>,
    pub seed: Option<u64>,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        SwarmConfig {
            particles: 100,
            inertia: 0.6,
            cognitive: 1.0,
            social: 2.0,
            position_range: (-1.0, 1.0),
            velocity_range: (-1.0, 1.0),
            max_speed: None,
            seed: None,
        }
    }
}

impl SwarmConfig {
    pub fn new(particles: usize, inertia: f64, cognitive: f64, social: f64) -> Self {
        SwarmConfig {
            particles,
            inertia,
            cognitive,
            social,
            ..SwarmConfig::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_ranges(mut self, position_range: (f64, f64), velocity_range: (f64, f64)) -> Self {
        self.position_range = position_range;
        self.velocity_range = velocity_range;
        self
    }

    pub fn with_max_speed(mut self, max_speed: f64) -> Self {
        self.max_speed = Some(max_speed);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: SwarmConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    // Reports the first invalid field
    pub fn validate(&self) -> Result<(), SwarmError> {
        self.validate_population()?;

        for (name, value) in [
            ("inertia", self.inertia),
            ("cognitive", self.cognitive),
            ("social", self.social),
        ] {
            if !value.is_finite() {
                return Err(SwarmError::NonFiniteWeight { name, value });
            }
        }

        if let Some(value) = self.max_speed {
            if !value.is_finite() || value <= 0.0 {
                return Err(SwarmError::InvalidMaxSpeed { value });
            }
        }
        Ok(())
    }

    // Only what is needed to create the particles: count and init ranges.
    // The width must be finite too, or uniform sampling overflows.
    pub fn validate_population(&self) -> Result<(), SwarmError> {
        if self.particles == 0 {
            return Err(SwarmError::NoParticles);
        }

        for (name, (low, high)) in [
            ("position", self.position_range),
            ("velocity", self.velocity_range),
        ] {
            if !low.is_finite() || !high.is_finite() || low >= high || !(high - low).is_finite() {
                return Err(SwarmError::InvalidRange { name, low, high });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_experiment() {
        let config = SwarmConfig::default();
        assert_eq!(config.particles, 100);
        assert_eq!((config.inertia, config.cognitive, config.social), (0.6, 1.0, 2.0));
        assert_eq!(config.position_range, (-1.0, 1.0));
        assert_eq!(config.max_speed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_particles_is_rejected() {
        let config = SwarmConfig::new(0, 0.6, 1.0, 2.0);
        assert_eq!(config.validate(), Err(SwarmError::NoParticles));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let config = SwarmConfig::default().with_ranges((-1.0, 1.0), (2.0, 2.0));
        assert_eq!(
            config.validate(),
            Err(SwarmError::InvalidRange { name: "velocity", low: 2.0, high: 2.0 })
        );
    }

    #[test]
    fn range_wider_than_f64_is_rejected() {
        let config = SwarmConfig::default().with_ranges((-1e308, 1e308), (-1.0, 1.0));
        assert_eq!(
            config.validate(),
            Err(SwarmError::InvalidRange { name: "position", low: -1e308, high: 1e308 })
        );
    }

    #[test]
    fn population_check_ignores_weights() {
        let config = SwarmConfig::new(10, f64::NAN, 1.0, 2.0).with_max_speed(-1.0);
        assert!(config.validate_population().is_ok());
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_finite_weight_is_rejected() {
        let config = SwarmConfig::new(10, f64::NAN, 1.0, 2.0);
        assert!(matches!(
            config.validate(),
            Err(SwarmError::NonFiniteWeight { name: "inertia", .. })
        ));
    }

    #[test]
    fn negative_max_speed_is_rejected() {
        let config = SwarmConfig::default().with_max_speed(-1.0);
        assert_eq!(config.validate(), Err(SwarmError::InvalidMaxSpeed { value: -1.0 }));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = SwarmConfig::from_json(r#"{"particles": 30, "social": 1.5, "seed": 4}"#).unwrap();
        assert_eq!(config.particles, 30);
        assert_eq!(config.social, 1.5);
        assert_eq!(config.inertia, 0.6);
        assert_eq!(config.seed, Some(4));
    }

    #[test]
    fn invalid_json_config_is_an_error() {
        assert!(SwarmConfig::from_json(r#"{"particles": 0}"#).is_err());
        assert!(SwarmConfig::from_json(r#"{"particles": "many"}"#).is_err());
    }
}
