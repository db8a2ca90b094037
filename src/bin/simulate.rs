//! Linear probing tombstone simulator.
//!
//! Usage:
//!   simulate <m> <k> <kmax> <seed>             # table size, insert weight, deletions, seed
//!   simulate 1000000 9 10000000 1 --validate   # check invariants before every operation
//!   RUST_LOG=debug simulate 16 3 40 7          # also dump the table at each row

use clap::Parser;
use ledger_hashtable::sim::{SimConfig, Simulation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "simulate", about = "Linear probing with referential integrity: load/cost simulator")]
struct Cli {
    /// Table capacity.
    m: usize,

    /// Relative insert weight; the load settles near k/(1+k).
    k: u32,

    /// Number of deletions after which the simulation stops.
    kmax: usize,

    /// Seed for the decision trace and the key homes.
    seed: u64,

    /// Run the table consistency checker before every operation.
    #[arg(long)]
    validate: bool,

    /// Log at debug level (table dumps at each report row).
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = SimConfig::new(cli.m, cli.k, cli.kmax, cli.seed);
    config.check_invariants = cli.validate;

    let mut sim = Simulation::new(config)?;
    println!("{}", sim.header());
    sim.run_with(|row| println!("{row}"))?;
    Ok(())
}
