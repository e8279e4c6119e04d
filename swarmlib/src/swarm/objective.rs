use crate::errors::SwarmError;

// A function to minimise. Implementations must be pure: the engine caches the
// value of every recorded best instead of evaluating it again.
pub trait Objective {
    fn dimensions(&self) -> usize;
    fn evaluate(&self, point: &[f64]) -> f64;
}

impl<T: Objective + ?Sized> Objective for Box<T> {
    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn evaluate(&self, point: &[f64]) -> f64 {
        (**self).evaluate(point)
    }
}

// Wraps a plain closure so it can be optimised without a dedicated type
pub struct FnObjective<F> {
    dimensions: usize,
    f: F,
}

impl<F: Fn(&[f64]) -> f64> FnObjective<F> {
    pub fn new(dimensions: usize, f: F) -> Self {
        FnObjective { dimensions, f }
    }
}

impl<F: Fn(&[f64]) -> f64> Objective for FnObjective<F> {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn evaluate(&self, point: &[f64]) -> f64 {
        (self.f)(point)
    }
}

// Evaluates a point after checking it against the declared dimensionality.
// Non-finite results are rejected so they can never become a recorded best.
pub fn checked_evaluate<O: Objective + ?Sized>(objective: &O, point: &[f64]) -> Result<f64, SwarmError> {
    if point.len() != objective.dimensions() {
        return Err(SwarmError::DimensionMismatch {
            expected: objective.dimensions(),
            got: point.len(),
        });
    }

    let value = objective.evaluate(point);
    if !value.is_finite() {
        return Err(SwarmError::NonFiniteValue { value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_objective_reports_its_dimensions() {
        let sum = FnObjective::new(3, |x: &[f64]| x.iter().sum());
        assert_eq!(sum.dimensions(), 3);
        assert_eq!(sum.evaluate(&[1.0, 2.0, 3.0]), 6.0);
    }

    #[test]
    fn checked_evaluate_rejects_wrong_length() {
        let sum = FnObjective::new(2, |x: &[f64]| x.iter().sum());
        let err = checked_evaluate(&sum, &[1.0]).unwrap_err();
        assert_eq!(err, SwarmError::DimensionMismatch { expected: 2, got: 1 });
    }

    #[test]
    fn checked_evaluate_rejects_nan() {
        let broken = FnObjective::new(1, |_: &[f64]| f64::NAN);
        match checked_evaluate(&broken, &[0.0]) {
            Err(SwarmError::NonFiniteValue { value }) => assert!(value.is_nan()),
            other => panic!("expected NonFiniteValue, got {:?}", other),
        }
    }

    #[test]
    fn boxed_objectives_delegate() {
        let boxed: Box<dyn Objective> = Box::new(FnObjective::new(1, |x: &[f64]| x[0] * 2.0));
        assert_eq!(checked_evaluate(&boxed, &[4.0]), Ok(8.0));
    }
}
