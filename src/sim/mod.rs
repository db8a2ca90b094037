//! Workload simulator: drives a `ProbeTable` through a random insert/delete
//! trace and reports free-cell and cost statistics as the trace progresses.
//!
//! The simulator only uses the table's public operations. It exists to
//! measure how the tombstone policy behaves under a steady load, not to
//! check correctness, although it can run the consistency checker before
//! every step.

pub mod stats;
pub mod workload;

use crate::error::{InvariantViolation, TableError};
use crate::oracle::AssignedHomes;
use crate::probe_table::ProbeTable;
use core::fmt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};
use thiserror::Error;

pub use workload::{Decision, Workload};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid simulation config: {0}")]
    Config(&'static str),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("invariant violated before operation {iteration}: {source}")]
    Invariant {
        iteration: usize,
        #[source]
        source: InvariantViolation,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimConfig {
    /// Table capacity `m`.
    pub capacity: usize,
    /// Relative insert weight `k`; the load settles near `k / (1 + k)`.
    pub weight: u32,
    /// The trace ends after this many deletions.
    pub max_deletions: usize,
    pub seed: u64,
    /// Run the full consistency checker before every operation.
    pub check_invariants: bool,
}

impl SimConfig {
    pub fn new(capacity: usize, weight: u32, max_deletions: usize, seed: u64) -> Self {
        Self {
            capacity,
            weight,
            max_deletions,
            seed,
            check_invariants: false,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.capacity == 0 {
            return Err(SimError::Config("capacity must be positive"));
        }
        if self.weight == 0 {
            return Err(SimError::Config("weight must be positive"));
        }
        if self.max_deletions == 0 {
            return Err(SimError::Config("max_deletions must be positive"));
        }
        Ok(())
    }

    pub fn expected_load(&self) -> f64 {
        let w = f64::from(self.weight);
        w / (1.0 + w)
    }
}

/// One line of simulator output.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportRow {
    pub capacity: usize,
    /// Resident keys divided by capacity.
    pub load: f64,
    pub deletions: usize,
    pub free_fraction: f64,
    pub successful_search: f64,
    pub unsuccessful_search: f64,
    pub insertion: f64,
    /// Mean insert cost since the previous row.
    pub amortized_insertion: f64,
    /// Mean load over the last tenth of the trace; only set on the final row.
    pub time_avg_load: f64,
    pub weight: u32,
    pub elapsed: Duration,
}

impl fmt::Display for ReportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {} {} {} {}",
            self.capacity,
            self.load,
            self.deletions,
            self.free_fraction,
            self.successful_search,
            self.unsuccessful_search,
            self.insertion,
            self.amortized_insertion,
            self.time_avg_load,
            self.weight,
            self.elapsed.as_secs(),
        )
    }
}

pub struct Simulation {
    config: SimConfig,
    workload: Workload,
    table: ProbeTable<u64, AssignedHomes<u64>>,
}

impl Simulation {
    /// Generate the trace and key homes from `config.seed` and build an
    /// empty table.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let workload = Workload::generate(
            config.capacity,
            config.weight,
            config.max_deletions,
            &mut rng,
        );
        let homes = AssignedHomes::random(0..workload.inserts() as u64, config.capacity, &mut rng);
        let table = ProbeTable::new(config.capacity, homes)?;
        Ok(Self {
            config,
            workload,
            table,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    pub fn table(&self) -> &ProbeTable<u64, AssignedHomes<u64>> {
        &self.table
    }

    /// Comment lines printed ahead of the rows.
    pub fn header(&self) -> String {
        format!(
            "# m = {}, Approx. E[load]=(k/(1+k))={}, Kmax(Number of Deletions)={}\n\
             #m n K freeFraction successful-search unsuccessful-search insertion \
             timeavg-insertion timeavg-load k elapsed-sec",
            self.config.capacity,
            self.config.expected_load(),
            self.config.max_deletions,
        )
    }

    /// Replay the whole trace from an empty table, collecting every report
    /// row. Each call starts over, so repeated runs produce the same rows.
    pub fn run(&mut self) -> Result<Vec<ReportRow>, SimError> {
        let mut rows = Vec::new();
        self.run_with(|row| rows.push(row.clone()))?;
        Ok(rows)
    }

    /// Replay the whole trace from an empty table, handing each report row to
    /// `on_row` as soon as it is taken. A row is taken before the operation at that point in the
    /// trace: when the deletion count reaches the next tenth of
    /// `max_deletions`, and before the final operation.
    pub fn run_with<F>(&mut self, mut on_row: F) -> Result<usize, SimError>
    where
        F: FnMut(&ReportRow),
    {
        self.table.clear();
        let start = Instant::now();
        let total = self.workload.len();
        let m = self.config.capacity;
        let step = 0.1 * self.config.max_deletions as f64;
        let decile = total / 10;
        let tail_start = total * 9 / 10;
        tracing::info!(
            capacity = m,
            weight = self.config.weight,
            max_deletions = self.config.max_deletions,
            seed = self.config.seed,
            operations = total,
            "starting simulation"
        );

        let mut next_report = 1usize;
        let (mut next_insert, mut next_delete) = (0u64, 0u64);
        let (mut insert_cost, mut inserts_since_row) = (0usize, 0usize);
        let mut tail_load = 0u64;
        let mut rows = 0usize;

        for i in 0..total {
            if self.config.check_invariants {
                self.table
                    .check_invariants()
                    .map_err(|source| SimError::Invariant { iteration: i, source })?;
            }

            let last = i + 1 == total;
            if next_delete as usize == next_report || last {
                let time_avg_load = if last && decile > 0 {
                    tail_load as f64 / m as f64 / decile as f64
                } else {
                    0.0
                };
                let amortized_insertion = if inserts_since_row == 0 {
                    0.0
                } else {
                    insert_cost as f64 / inserts_since_row as f64
                };
                let row = ReportRow {
                    capacity: m,
                    load: (next_insert - next_delete) as f64 / m as f64,
                    deletions: next_delete as usize,
                    free_fraction: self.table.free_fraction(),
                    successful_search: stats::successful_search_cost(
                        &self.table,
                        next_delete..next_insert,
                    ),
                    unsuccessful_search: stats::unsuccessful_search_cost(&self.table),
                    insertion: stats::insertion_cost(&self.table),
                    amortized_insertion,
                    time_avg_load,
                    weight: self.config.weight,
                    elapsed: start.elapsed(),
                };
                tracing::debug!(table = %self.table, deletions = row.deletions, "report row");
                on_row(&row);
                rows += 1;

                next_report = ((next_report as f64 + step) as usize).max(next_report + 1);
                insert_cost = 0;
                inserts_since_row = 0;
            }

            match self.workload.decisions()[i] {
                Decision::Insert => {
                    insert_cost += self.table.insert(next_insert)?;
                    inserts_since_row += 1;
                    next_insert += 1;
                }
                Decision::Delete => {
                    self.table.remove(&next_delete)?;
                    next_delete += 1;
                }
            }

            if i > tail_start {
                tail_load += next_insert - next_delete;
            }
        }

        tracing::info!(
            rows,
            resident = self.table.len(),
            tombstones = self.table.tombstones(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "simulation finished"
        );
        Ok(rows)
    }
}
