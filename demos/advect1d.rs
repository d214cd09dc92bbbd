use std::sync::Arc;
use clap::Parser;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use gridnest::models::{self, Model};
use gridnest::output::{self, Format};
use gridnest::{Hierarchy, HierarchyConfig, PhysicalBoundary};




#[derive(Debug, Parser)]
#[clap(version = "0.1", author = "J. Zrake <jzrake@clemson.edu>")]
struct Opts {
    #[clap(short = 'm', long, default_value = "advection")]
    model: Model,

    #[clap(short = 's', long, default_value = "1.0")]
    speed: f64,

    #[clap(long, default_value = "0.0")]
    domain_start: f64,

    #[clap(long, default_value = "0.01")]
    base_spacing: f64,

    #[clap(short = 'n', long, default_value = "100")]
    base_zones: usize,

    #[clap(short = 'l', long, default_value = "3")]
    num_levels: usize,

    #[clap(short = 'c', long = "center", default_value = "0.5")]
    centers: Vec<f64>,

    #[clap(long, default_value = "100")]
    child_zones: usize,

    #[clap(short = 'g', long, default_value = "2")]
    num_guard: usize,

    #[clap(short = 'b', long, default_value = "Periodic")]
    boundary: PhysicalBoundary,

    #[clap(long, default_value = "0.5")]
    cfl: f64,

    #[clap(long, default_value = "0.5")]
    pulse_center: f64,

    #[clap(long, default_value = "0.03")]
    pulse_width: f64,

    #[clap(short = 't', long, default_value = "0.05")]
    tfinal: f64,

    #[clap(short = 'i', long)]
    output_interval: Option<f64>,

    #[clap(short = 'o', long, default_value = "chkpt")]
    prefix: String,

    #[clap(short = 'f', long, default_value = "cbor")]
    format: Format,

    #[clap(long, default_value = "info")]
    log_level: String,
}




// ============================================================================
impl Opts {
    fn config(&self) -> HierarchyConfig {
        HierarchyConfig {
            domain_start: self.domain_start,
            base_spacing: self.base_spacing,
            base_zones: self.base_zones,
            num_levels: self.num_levels,
            refinement_centers: self.centers.clone(),
            child_zones: self.child_zones,
            num_guard: self.num_guard,
            refinement_ratio: 2,
            boundary: self.boundary,
            cfl: self.cfl,
        }
    }

    fn output_path(&self, number: usize) -> String {
        format!("{}.{:04}.{}", self.prefix, number, self.format.extension())
    }
}




// ============================================================================
fn write_output(opts: &Opts, hierarchy: &Hierarchy, number: usize) -> Result<(), gridnest::Error> {
    let path = opts.output_path(number);
    let snapshot = hierarchy.snapshot();
    let peak = snapshot.patches
        .iter()
        .flat_map(|p| p.fields.iter().flatten())
        .fold(0.0, |a: f64, x| a.max(x.abs()));

    output::write_snapshot(&path, &snapshot)?;
    info!("[{}] t={:.4} max|u|={:.4} -> {}", hierarchy.iteration(), hierarchy.time(), peak, path);
    Ok(())
}




// ============================================================================
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = Opts::parse();
    let level: LevelFilter = opts.log_level.parse().map_err(|_| format!("bad log level: {}", opts.log_level))?;

    SimpleLogger::new().with_level(level).init().map_err(|e| e.to_string())?;
    info!("{:?}", opts);

    let interval = opts.output_interval.unwrap_or(opts.tfinal);

    if !(interval > 0.0) {
        return Err(format!("output interval must be positive, got {}", interval).into());
    }

    let problem = Arc::new(opts.model.problem(opts.speed)?);
    let mut hierarchy = Hierarchy::new(problem, opts.config())?;
    let num_outputs = (opts.tfinal / interval - 1e-9).ceil().max(0.0) as usize;

    hierarchy.seed(models::gaussian(opts.pulse_center, opts.pulse_width))?;
    write_output(&opts, &hierarchy, 0)?;

    for number in 1..=num_outputs {
        hierarchy.evolve((number as f64 * interval).min(opts.tfinal))?;
        write_output(&opts, &hierarchy, number)?;
    }
    Ok(())
}
