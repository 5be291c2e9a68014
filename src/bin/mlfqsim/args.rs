use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use mlfq_sim::config::{DEFAULT_BOOST_INTERVAL, DEFAULT_LEVELS};
use mlfq_sim::parser::{JobList, TicksList};
use mlfq_sim::Ticks;

#[derive(Parser, Debug)]
#[command(about, long_about = None, version)]
pub(crate) struct Args {
    /// Random seed. Accepted for compatibility; scheduling never uses it.
    #[arg(short, long, default_value_t = 0)]
    pub(crate) seed: u64,
    /// Number of priority levels in the MLFQ.
    #[arg(short = 'n', long, default_value_t = DEFAULT_LEVELS)]
    pub(crate) num_queues: usize,
    /// Comma-separated quantum per level, highest priority first.
    #[arg(short = 'Q', long, default_value = "1,2,3")]
    pub(crate) quantums: TicksList,
    /// Comma-separated allotment per level, highest priority first.
    #[arg(short = 'A', long, default_value = "4,6,8")]
    pub(crate) allotments: TicksList,
    /// Time between priority boosts.
    #[arg(short, long, default_value_t = DEFAULT_BOOST_INTERVAL)]
    pub(crate) boost: Ticks,
    /// Semicolon-separated jobs, each as id,arrival,service.
    #[arg(short, long, default_value = "1,0,10;2,5,10")]
    pub(crate) jobs: JobList,
    /// Reads the configuration and jobs from a YAML scenario file instead.
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,
    /// Sets the format of the final statistics.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub(crate) format: Format,
    /// Suppresses the level table and event trace.
    #[arg(short, long, default_value_t)]
    pub(crate) quiet: bool,
    /// Enables human-friendly logging.
    #[arg(short, long, default_value_t)]
    pub(crate) debug: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum Format {
    Table,
    Yaml,
}
