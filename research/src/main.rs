mod experiments;

use std::env;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use swarmlib::{logging, report};

use experiments::{lift, run_experiment, ResearchSettings};

// Rings of local minima listed in the Schaffer F6 table
const MINIMA_RINGS: usize = 25;

// Every invocation writes into its own directory, named after the start time
fn create_run_directory(output_dir: &str) -> Result<PathBuf> {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
    let path = Path::new(output_dir).join(stamp);
    if !path.exists() {
        fs::create_dir_all(&path)
            .with_context(|| format!("creating output directory {}", path.display()))?;
    }
    Ok(path)
}

fn write_minima_table(dir: &Path) -> Result<()> {
    let path = dir.join("f6_mins.csv");
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    report::write_minima_table(BufWriter::new(file), MINIMA_RINGS).map_err(lift)?;
    log::info!("Saved Schaffer F6 minima to {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [settings.json]", args[0]);
        std::process::exit(1);
    }

    let settings = match args.get(1) {
        Some(path) => ResearchSettings::load(path)?,
        None => ResearchSettings::default(),
    };

    // Configure logger
    let level = logging::parse_level(settings.log_level.as_deref())?;
    logging::configure_logger_with_level(&settings.log_file, level).map_err(lift)?;

    // Handle SIGINT: the running swarm stops at the next step boundary
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let dir = create_run_directory(&settings.output_dir)?;
    log::info!("Saving results to {}...", dir.display());

    for experiment in &settings.experiments {
        run_experiment(experiment, &dir, &running)?;

        if !running.load(Ordering::SeqCst) {
            log::info!("Received SIGINT, results flushed, exiting...");
            return Ok(());
        }
    }

    if settings.minima_table {
        write_minima_table(&dir)?;
    }

    Ok(())
}
