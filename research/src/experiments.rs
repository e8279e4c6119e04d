use std::cell::RefCell;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;

use swarmlib::functions::Function;
use swarmlib::report::{CsvReport, JsonLines, TraceWriter};
use swarmlib::swarm::{Interruptible, RunNumberTimes, RunSummary, SwarmEngine};
use swarmlib::{logging, SwarmConfig, SwarmError};

// Library errors come back boxed without Send + Sync, so anyhow can't take
// them with `?` directly. SwarmErrors are moved across intact; anything else
// (observer or I/O failures) keeps its chain of causes as context layers.
pub fn lift(err: Box<dyn std::error::Error>) -> anyhow::Error {
    let err = match err.downcast::<SwarmError>() {
        Ok(swarm) => return anyhow::Error::new(*swarm),
        Err(other) => other,
    };

    let mut messages = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        messages.push(cause.to_string());
        source = cause.source();
    }

    let mut messages = messages.into_iter().rev();
    let root = messages.next().unwrap_or_default();
    messages.fold(anyhow!(root), |chain, message| chain.context(message))
}

#[derive(Debug, Clone, Deserialize)]
pub struct Experiment {
    pub name: String,
    pub function: String,
    pub minimum: Vec<f64>,
    pub steps: usize,
    #[serde(default)]
    pub swarm: SwarmConfig,

    // Optional outputs besides the CSV table
    #[serde(default)]
    pub trace: bool,
    #[serde(default)]
    pub events: bool,
}

impl Experiment {
    fn new(name: &str, function: &str, minimum: Vec<f64>, steps: usize) -> Self {
        Experiment {
            name: name.to_string(),
            function: function.to_string(),
            minimum,
            steps,
            swarm: SwarmConfig::default(),
            trace: false,
            events: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResearchSettings {
    #[serde(rename = "outputDir", default = "default_output_dir")]
    pub output_dir: String,
    #[serde(rename = "logFile", default = "default_log_file")]
    pub log_file: String,
    #[serde(rename = "logLevel", default)]
    pub log_level: Option<String>,
    #[serde(rename = "minimaTable", default)]
    pub minima_table: bool,
    pub experiments: Vec<Experiment>,
}

fn default_output_dir() -> String {
    "runs".to_string()
}

fn default_log_file() -> String {
    "logs/research.log".to_string()
}

impl Default for ResearchSettings {
    // Schaffer F6 and the bowl, both with their minimum at (20, 0), plus the
    // trajectory of a swarm hunting an off-centre F6 minimum
    fn default() -> Self {
        let mut vis = Experiment::new("vis", "schaffer_f6", vec![53.0, 24.0], 300);
        vis.trace = true;

        ResearchSettings {
            output_dir: default_output_dir(),
            log_file: default_log_file(),
            log_level: None,
            minima_table: true,
            experiments: vec![
                Experiment::new("sf6", "schaffer_f6", vec![20.0, 0.0], 300),
                Experiment::new("poly", "polynomial", vec![20.0, 0.0], 300),
                vis,
            ],
        }
    }
}

impl ResearchSettings {
    pub fn load(path: &str) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("reading settings {}", path))?;
        Self::from_json(&contents).with_context(|| format!("invalid settings in {}", path))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: ResearchSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        logging::parse_level(self.log_level.as_deref())
            .with_context(|| format!("unknown log level: {:?}", self.log_level))?;

        let mut names = HashSet::new();
        for experiment in &self.experiments {
            if experiment.name.is_empty() {
                bail!("experiment names must not be empty");
            }
            if !names.insert(experiment.name.as_str()) {
                bail!("duplicate experiment name: {}", experiment.name);
            }
            Function::from_name(&experiment.function, &experiment.minimum)
                .with_context(|| format!("experiment {}", experiment.name))?;
            experiment
                .swarm
                .validate()
                .with_context(|| format!("experiment {}", experiment.name))?;
        }
        Ok(())
    }
}

fn create(dir: &Path, file_name: &str) -> Result<BufWriter<File>> {
    let path = dir.join(file_name);
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}

// Runs one experiment, writing `<name>.csv` (and the optional trace and event
// files) into `dir`. Stops early, with all files flushed, once `running` clears.
pub fn run_experiment(
    experiment: &Experiment,
    dir: &Path,
    running: &Arc<AtomicBool>,
) -> Result<RunSummary> {
    let objective = Function::from_name(&experiment.function, &experiment.minimum)?;
    let mut engine = SwarmEngine::new(objective, &experiment.swarm)?;

    let report = Rc::new(RefCell::new(
        CsvReport::new(create(dir, &format!("{}.csv", experiment.name))?).map_err(lift)?,
    ));
    engine.subscribe(Box::new(report.clone()));

    let trace = if experiment.trace {
        let output = create(dir, &format!("{}.trace", experiment.name))?;
        let trace = Rc::new(RefCell::new(
            TraceWriter::new(output, experiment.steps, experiment.swarm.particles).map_err(lift)?,
        ));
        engine.subscribe(Box::new(trace.clone()));
        Some(trace)
    } else {
        None
    };

    let events = if experiment.events {
        let output = create(dir, &format!("{}.jsonl", experiment.name))?;
        let events = Rc::new(RefCell::new(JsonLines::new(output)));
        engine.subscribe(Box::new(events.clone()));
        Some(events)
    } else {
        None
    };

    log::info!(
        "Running {} ({} at {:?}) for {} steps...",
        experiment.name,
        experiment.function,
        experiment.minimum,
        experiment.steps
    );
    let mut condition = Interruptible::new(RunNumberTimes::new(experiment.steps), running.clone());
    let result = engine.run(&mut condition);

    // Whatever was written before a failure is still worth keeping
    report.borrow_mut().flush().map_err(lift)?;
    if let Some(trace) = &trace {
        trace.borrow_mut().flush().map_err(lift)?;
    }
    if let Some(events) = &events {
        events.borrow_mut().flush().map_err(lift)?;
    }

    let summary = result.map_err(lift)?;
    log::info!(
        "{}: best value {} at {:?} after {} steps",
        experiment.name,
        summary.best_value,
        summary.best,
        summary.steps
    );
    Ok(summary)
}
