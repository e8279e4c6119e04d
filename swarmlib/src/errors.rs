// Configuration errors raised while building or stepping a swarm.
// Observer failures are not wrapped here; they travel through the same
// Box<dyn Error> channel untouched, so callers can downcast either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SwarmError {
    NoParticles,
    NoDimensions,
    DimensionMismatch { expected: usize, got: usize },
    NonFiniteValue { value: f64 },
    NonFiniteWeight { name: &'static str, value: f64 },
    InvalidRange { name: &'static str, low: f64, high: f64 },
    InvalidMaxSpeed { value: f64 },
    UnknownFunction { name: String },
}

impl std::fmt::Display for SwarmError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SwarmError::NoParticles => write!(f, "SwarmError: particle count must be positive"),
            SwarmError::NoDimensions => {
                write!(f, "SwarmError: objective must have at least one dimension")
            }
            SwarmError::DimensionMismatch { expected, got } => write!(
                f,
                "SwarmError: point has {} dimensions, objective expects {}",
                got, expected
            ),
            SwarmError::NonFiniteValue { value } => {
                write!(f, "SwarmError: objective returned non-finite value {}", value)
            }
            SwarmError::NonFiniteWeight { name, value } => {
                write!(f, "SwarmError: weight {} must be finite, got {}", name, value)
            }
            SwarmError::InvalidRange { name, low, high } => write!(
                f,
                "SwarmError: {} range [{}, {}) is empty or not finite",
                name, low, high
            ),
            SwarmError::InvalidMaxSpeed { value } => {
                write!(f, "SwarmError: max speed must be positive and finite, got {}", value)
            }
            SwarmError::UnknownFunction { name } => {
                write!(f, "SwarmError: unknown objective function: {}", name)
            }
        }
    }
}

impl std::error::Error for SwarmError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let err = SwarmError::DimensionMismatch { expected: 2, got: 3 };
        assert_eq!(
            err.to_string(),
            "SwarmError: point has 3 dimensions, objective expects 2"
        );

        let err = SwarmError::InvalidRange { name: "position", low: 1.0, high: -1.0 };
        assert!(err.to_string().contains("position range [1, -1)"));
    }

    #[test]
    fn boxes_and_downcasts() {
        let boxed: Box<dyn std::error::Error> = Box::new(SwarmError::NoParticles);
        assert_eq!(
            boxed.downcast_ref::<SwarmError>(),
            Some(&SwarmError::NoParticles)
        );
    }
}
