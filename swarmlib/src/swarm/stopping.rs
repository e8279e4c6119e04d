use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// What a stopping condition may look at when deciding whether to go on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub steps: usize,
    pub best_value: f64,
}

// Consulted once at the top of every iteration of SwarmEngine::run.
// Each call consumes a tick, including the call that ends the run.
pub trait StoppingCondition {
    fn should_continue(&mut self, progress: &Progress) -> bool;
}

impl<F: FnMut(&Progress) -> bool> StoppingCondition for F {
    fn should_continue(&mut self, progress: &Progress) -> bool {
        self(progress)
    }
}

// Runs a fixed number of steps
#[derive(Debug, Clone)]
pub struct RunNumberTimes {
    remaining: usize,
}

impl RunNumberTimes {
    pub fn new(n: usize) -> Self {
        RunNumberTimes { remaining: n }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl StoppingCondition for RunNumberTimes {
    fn should_continue(&mut self, _progress: &Progress) -> bool {
        match self.remaining.checked_sub(1) {
            Some(remaining) => {
                self.remaining = remaining;
                true
            }
            None => false,
        }
    }
}

// Keeps going while the swarm best improved by more than epsilon over the
// last `window` observations. Always runs until the window has filled once;
// the window holds at least two values so there is an improvement to measure.
#[derive(Debug, Clone)]
pub struct Converged {
    window: usize,
    epsilon: f64,
    history: VecDeque<f64>,
}

impl Converged {
    pub fn new(window: usize, epsilon: f64) -> Self {
        let window = window.max(2);
        Converged {
            window,
            epsilon,
            history: VecDeque::with_capacity(window + 1),
        }
    }
}

impl StoppingCondition for Converged {
    fn should_continue(&mut self, progress: &Progress) -> bool {
        self.history.push_back(progress.best_value);
        if self.history.len() > self.window {
            self.history.pop_front();
        }
        if self.history.len() < self.window {
            return true;
        }

        match (self.history.front(), self.history.back()) {
            (Some(oldest), Some(newest)) => oldest - newest > self.epsilon,
            _ => true,
        }
    }
}

// Stops as soon as the shared flag goes false (e.g. from a SIGINT handler),
// otherwise defers to the wrapped condition
pub struct Interruptible<C> {
    inner: C,
    running: Arc<AtomicBool>,
}

impl<C: StoppingCondition> Interruptible<C> {
    pub fn new(inner: C, running: Arc<AtomicBool>) -> Self {
        Interruptible { inner, running }
    }
}

impl<C: StoppingCondition> StoppingCondition for Interruptible<C> {
    fn should_continue(&mut self, progress: &Progress) -> bool {
        if !self.running.load(Ordering::SeqCst) {
            log::info!("Interrupted after {} steps", progress.steps);
            return false;
        }
        self.inner.should_continue(progress)
    }
}
