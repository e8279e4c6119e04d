use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

use serde::Serialize;

// Something that happened during a step. Positions are copies taken at the
// moment of publishing, so observers may keep them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    #[serde(rename_all = "camelCase")]
    ParticleUpdated {
        step_index: usize,
        particle_index: usize,
        position: Vec<f64>,
        velocity: Vec<f64>,
        value: f64,
    },
    #[serde(rename_all = "camelCase")]
    BestUpdated {
        step_index: usize,
        particle_index: usize,
        position: Vec<f64>,
        value: f64,
    },
}

impl Event {
    pub fn step_index(&self) -> usize {
        match self {
            Event::ParticleUpdated { step_index, .. } => *step_index,
            Event::BestUpdated { step_index, .. } => *step_index,
        }
    }

    pub fn particle_index(&self) -> usize {
        match self {
            Event::ParticleUpdated { particle_index, .. } => *particle_index,
            Event::BestUpdated { particle_index, .. } => *particle_index,
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            Event::ParticleUpdated { value, .. } => *value,
            Event::BestUpdated { value, .. } => *value,
        }
    }
}

// A sink for events. Errors are handed back to the engine, which stops the
// step that published the event.
pub trait Observer {
    fn notify(&mut self, event: &Event) -> Result<(), Box<dyn Error>>;
}

impl<F> Observer for F
where
    F: FnMut(&Event) -> Result<(), Box<dyn Error>>,
{
    fn notify(&mut self, event: &Event) -> Result<(), Box<dyn Error>> {
        self(event)
    }
}

// Lets the caller keep a handle on an observer (e.g. to flush a report)
impl<T: Observer> Observer for Rc<RefCell<T>> {
    fn notify(&mut self, event: &Event) -> Result<(), Box<dyn Error>> {
        self.borrow_mut().notify(event)
    }
}

// Ordered list of observers. Publishing is synchronous: every observer has
// seen the event, in subscription order, by the time publish returns.
#[derive(Default)]
pub struct EventChannel {
    observers: Vec<Box<dyn Observer>>,
}

impl EventChannel {
    pub fn new() -> Self {
        EventChannel {
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn publish(&mut self, event: &Event) -> Result<(), Box<dyn Error>> {
        for observer in &mut self.observers {
            observer.notify(event)?;
        }
        Ok(())
    }
}
