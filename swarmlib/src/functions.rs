use crate::errors::SwarmError;
use crate::swarm::Objective;

// A bowl: squared distance from `minimum`
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    pub minimum: Vec<f64>,
}

impl Polynomial {
    pub fn new(minimum: Vec<f64>) -> Self {
        Polynomial { minimum }
    }
}

impl Objective for Polynomial {
    fn dimensions(&self) -> usize {
        self.minimum.len()
    }

    fn evaluate(&self, point: &[f64]) -> f64 {
        point
            .iter()
            .zip(self.minimum.iter())
            .map(|(x, m)| (x - m).powi(2))
            .sum()
    }
}

// Schaffer's F6: concentric rings of local minima around a global minimum of 0.
// Local minima sit near radius k*pi from `minimum`, which makes it a good
// test of whether the swarm escapes them.
#[derive(Debug, Clone, PartialEq)]
pub struct SchafferF6 {
    pub minimum: [f64; 2],
}

impl SchafferF6 {
    pub fn new(minimum: [f64; 2]) -> Self {
        SchafferF6 { minimum }
    }
}

impl Objective for SchafferF6 {
    fn dimensions(&self) -> usize {
        2
    }

    fn evaluate(&self, point: &[f64]) -> f64 {
        let x = point[0] - self.minimum[0];
        let y = point[1] - self.minimum[1];
        let r2 = x * x + y * y;

        let temp1 = r2.sqrt().sin();
        let temp2 = 1.0 + 0.001 * r2;
        0.5 + (temp1 * temp1 - 0.5) / (temp2 * temp2)
    }
}

// The functions that can be selected by name from a settings file
#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    Polynomial(Polynomial),
    SchafferF6(SchafferF6),
}

impl Function {
    pub fn from_name(name: &str, minimum: &[f64]) -> Result<Self, SwarmError> {
        match name {
            "polynomial" => {
                if minimum.is_empty() {
                    return Err(SwarmError::NoDimensions);
                }
                Ok(Function::Polynomial(Polynomial::new(minimum.to_vec())))
            }
            "schaffer_f6" => match minimum {
                [x, y] => Ok(Function::SchafferF6(SchafferF6::new([*x, *y]))),
                _ => Err(SwarmError::DimensionMismatch {
                    expected: 2,
                    got: minimum.len(),
                }),
            },
            _ => Err(SwarmError::UnknownFunction {
                name: name.to_string(),
            }),
        }
    }
}

impl Objective for Function {
    fn dimensions(&self) -> usize {
        match self {
            Function::Polynomial(f) => f.dimensions(),
            Function::SchafferF6(f) => f.dimensions(),
        }
    }

    fn evaluate(&self, point: &[f64]) -> f64 {
        match self {
            Function::Polynomial(f) => f.evaluate(point),
            Function::SchafferF6(f) => f.evaluate(point),
        }
    }
}
