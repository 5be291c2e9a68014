//! Scheduler configuration: per-level quantum and allotment, the boost
//! interval, and YAML scenario files bundling a configuration with a
//! workload.
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::types::job::{JobSpec, Ticks};

pub const DEFAULT_LEVELS: usize = 3;
pub const DEFAULT_QUANTUMS: [Ticks; 3] = [1, 2, 3];
pub const DEFAULT_ALLOTMENTS: [Ticks; 3] = [4, 6, 8];
pub const DEFAULT_BOOST_INTERVAL: Ticks = 20;

/// Limits applied to jobs running at one priority level.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Level {
    /// Longest contiguous run in a single dispatch.
    pub quantum: Ticks,
    /// Total run time allowed at this level before demotion.
    pub allotment: Ticks,
}

/// A validated scheduler configuration. Level 0 is the highest priority.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SchedulerConfig {
    levels: Vec<Level>,
    boost_interval: Ticks,
}

impl SchedulerConfig {
    /// Builds a configuration from lists that must already hold exactly one
    /// entry per level.
    pub fn new(
        quantums: &[Ticks],
        allotments: &[Ticks],
        boost_interval: Ticks,
    ) -> ConfigResult<Self> {
        if quantums.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        if allotments.len() != quantums.len() {
            return Err(ConfigError::LevelCountMismatch {
                what: "allotment list",
                expected: quantums.len(),
                got: allotments.len(),
            });
        }
        if boost_interval == 0 {
            return Err(ConfigError::ZeroBoostInterval);
        }

        let levels = quantums
            .iter()
            .zip(allotments)
            .enumerate()
            .map(|(level, (&quantum, &allotment))| {
                if quantum == 0 {
                    Err(ConfigError::ZeroQuantum { level })
                } else if allotment == 0 {
                    Err(ConfigError::ZeroAllotment { level })
                } else {
                    Ok(Level { quantum, allotment })
                }
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Self {
            levels,
            boost_interval,
        })
    }

    /// Builds a configuration for `num_levels` levels from loosely-sized
    /// lists. An empty list takes the defaults, a short list is padded by
    /// repeating its last entry, and a long list is truncated.
    pub fn resolve(
        num_levels: usize,
        quantums: &[Ticks],
        allotments: &[Ticks],
        boost_interval: Ticks,
    ) -> ConfigResult<Self> {
        if num_levels == 0 {
            return Err(ConfigError::NoLevels);
        }

        let quantums = fit_to_levels(quantums, &DEFAULT_QUANTUMS, num_levels);
        let allotments =
            fit_to_levels(allotments, &DEFAULT_ALLOTMENTS, num_levels);

        debug!(
            num_levels,
            quantums = %quantums.iter().join(","),
            allotments = %allotments.iter().join(","),
            "resolved level lists"
        );

        Self::new(&quantums, &allotments, boost_interval)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, level: usize) -> Level {
        self.levels[level]
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Index of the lowest priority level.
    pub fn lowest(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn boost_interval(&self) -> Ticks {
        self.boost_interval
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            levels: DEFAULT_QUANTUMS
                .iter()
                .zip(DEFAULT_ALLOTMENTS)
                .map(|(&quantum, allotment)| Level { quantum, allotment })
                .collect(),
            boost_interval: DEFAULT_BOOST_INTERVAL,
        }
    }
}

fn fit_to_levels(
    given: &[Ticks],
    defaults: &[Ticks],
    num_levels: usize,
) -> Vec<Ticks> {
    let source = if given.is_empty() { defaults } else { given };
    // `source` is never empty, so there's always a last entry to repeat.
    let last = source[source.len() - 1];

    source
        .iter()
        .copied()
        .chain(std::iter::repeat(last))
        .take(num_levels)
        .collect()
}

/// A configuration and workload, as stored in a YAML scenario file.
///
/// ```yaml
/// levels: 3
/// quantums: [1, 2, 3]
/// allotments: [4, 6, 8]
/// boost_interval: 20
/// jobs:
///   - { id: 1, arrival: 0, service: 10 }
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default = "default_levels")]
    pub levels: usize,
    #[serde(default)]
    pub quantums: Vec<Ticks>,
    #[serde(default)]
    pub allotments: Vec<Ticks>,
    #[serde(default = "default_boost_interval")]
    pub boost_interval: Ticks,
    #[serde(default)]
    pub jobs: Vec<JobSpec>,
}

fn default_levels() -> usize {
    DEFAULT_LEVELS
}

fn default_boost_interval() -> Ticks {
    DEFAULT_BOOST_INTERVAL
}

impl Scenario {
    pub fn from_yaml(input: &str) -> ConfigResult<Self> {
        serde_yaml::from_str(input)
            .map_err(|error| ConfigError::Scenario(error.to_string()))
    }

    /// Resolves the scenario's level lists into a validated configuration.
    pub fn config(&self) -> ConfigResult<SchedulerConfig> {
        SchedulerConfig::resolve(
            self.levels,
            &self.quantums,
            &self.allotments,
            self.boost_interval,
        )
    }
}
