use std::error::Error;
use std::f64::consts::PI;
use std::io::Write;

use crate::functions::SchafferF6;
use crate::swarm::{Event, Objective, Observer};

// Writes one row per event: the step, the particle (or "best"), the objective
// value and the kind of event.
pub struct CsvReport<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvReport<W> {
    pub fn new(output: W) -> Result<Self, Box<dyn Error>> {
        let mut writer = csv::Writer::from_writer(output);
        writer.write_record(["steps", "n", "y", "type"])?;
        Ok(CsvReport { writer })
    }

    pub fn flush(&mut self) -> Result<(), Box<dyn Error>> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, Box<dyn Error>> {
        self.writer.into_inner().map_err(|e| e.error().to_string().into())
    }
}

impl<W: Write> Observer for CsvReport<W> {
    fn notify(&mut self, event: &Event) -> Result<(), Box<dyn Error>> {
        match event {
            Event::ParticleUpdated {
                step_index,
                particle_index,
                value,
                ..
            } => self.writer.write_record(&[
                step_index.to_string(),
                particle_index.to_string(),
                value.to_string(),
                "particle".to_string(),
            ])?,
            Event::BestUpdated {
                step_index, value, ..
            } => self.writer.write_record(&[
                step_index.to_string(),
                "best".to_string(),
                value.to_string(),
                "best".to_string(),
            ])?,
        }
        Ok(())
    }
}

// Tab separated trajectory for the plotting front-end. The first two lines
// hold the step budget and the swarm size; every particle update then
// becomes `step  x...  v...`, with steps counted from 1.
pub struct TraceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> TraceWriter<W> {
    pub fn new(output: W, steps: usize, swarm_size: usize) -> Result<Self, Box<dyn Error>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_writer(output);
        writer.write_record([steps.to_string()])?;
        writer.write_record([swarm_size.to_string()])?;
        Ok(TraceWriter { writer })
    }

    pub fn flush(&mut self) -> Result<(), Box<dyn Error>> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, Box<dyn Error>> {
        self.writer.into_inner().map_err(|e| e.error().to_string().into())
    }
}

impl<W: Write> Observer for TraceWriter<W> {
    fn notify(&mut self, event: &Event) -> Result<(), Box<dyn Error>> {
        if let Event::ParticleUpdated {
            step_index,
            position,
            velocity,
            ..
        } = event
        {
            let mut record = Vec::with_capacity(1 + position.len() + velocity.len());
            record.push((step_index + 1).to_string());
            record.extend(position.iter().map(|x| x.to_string()));
            record.extend(velocity.iter().map(|v| v.to_string()));
            self.writer.write_record(&record)?;
        }
        Ok(())
    }
}

// One JSON object per line, for tools that want the full event
pub struct JsonLines<W: Write> {
    output: W,
}

impl<W: Write> JsonLines<W> {
    pub fn new(output: W) -> Self {
        JsonLines { output }
    }

    pub fn flush(&mut self) -> Result<(), Box<dyn Error>> {
        self.output.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}

impl<W: Write> Observer for JsonLines<W> {
    fn notify(&mut self, event: &Event) -> Result<(), Box<dyn Error>> {
        serde_json::to_writer(&mut self.output, event)?;
        self.output.write_all(b"\n")?;
        Ok(())
    }
}

// Value of Schaffer's F6 on each of its first rings of local minima,
// i.e. f(k*pi, 0) for k = 0..rings with the global minimum at the origin
pub fn write_minima_table<W: Write>(output: W, rings: usize) -> Result<(), Box<dyn Error>> {
    let f = SchafferF6::new([0.0, 0.0]);
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(["y"])?;
    for k in 0..rings {
        let x = k as f64 * PI;
        writer.write_record([f.evaluate(&[x, 0.0]).to_string()])?;
    }
    writer.flush()?;
    Ok(())
}
