mod args;
mod util;

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use mlfq_sim::report::level_banner;
use mlfq_sim::{ConfigError, Report, Scenario, Simulation};
use tracing::{debug, error, info, instrument, Level};

use crate::args::{Args, Format};

fn main() -> ExitCode {
    let args = Args::parse();

    // Logging goes to stderr, keeping stdout for the trace and report.
    if args.debug {
        tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt().json().with_writer(io::stderr).init();
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if let Some(error) = error.downcast_ref::<ConfigError>() {
                error!(%error, "invalid configuration");
                ExitCode::from(2)
            } else {
                error!(?error, "run failed");
                ExitCode::FAILURE
            }
        },
    }
}

#[instrument(skip_all)]
fn run(args: Args) -> Result<()> {
    if args.seed != 0 {
        debug!(seed = args.seed, "seed accepted but unused");
    }

    let scenario = load_scenario(&args)?;
    let sim = Simulation::new(scenario.config()?, &scenario.jobs)?;

    let mut out = io::stdout().lock();
    if !args.quiet {
        writeln!(out, "{}", level_banner(sim.config()))?;
    }

    let outcome = sim.run();

    if !args.quiet {
        util::write_trace(&mut out, &outcome.events)
            .context("writing trace")?;
        writeln!(out)?;
    }

    let report = Report::from_outcome(&outcome);
    match args.format {
        Format::Table => write!(out, "{report}")?,
        Format::Yaml => {
            write!(out, "{}", report.to_yaml().context("serialising report")?)?
        },
    }
    out.flush()?;

    Ok(())
}

/// Builds the scenario from a YAML file if one was given, and from the
/// command line options otherwise.
fn load_scenario(args: &Args) -> Result<Scenario> {
    let Some(path) = &args.config else {
        return Ok(Scenario {
            levels: args.num_queues,
            quantums: args.quantums.0.clone(),
            allotments: args.allotments.0.clone(),
            boost_interval: args.boost,
            jobs: args.jobs.0.clone(),
        });
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let scenario = Scenario::from_yaml(&text)?;
    info!(
        path = %path.display(),
        jobs = scenario.jobs.len(),
        "loaded scenario"
    );

    Ok(scenario)
}
