//! numbench CLI: time linear-algebra operations across backends.

use std::path::PathBuf;

use clap::Parser;
use numbench::bench::{Capabilities, Operation, Platform, plan, run_suite};
use numbench::config::{BenchConfig, OperationToggles, PlatformToggles};
use numbench::error::Result;

#[derive(Parser)]
#[command(name = "numbench")]
#[command(about = "Benchmark dense and sparse linear algebra on CPU and GPU backends")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Timed executions per size
    #[arg(long)]
    repetitions: Option<u32>,

    /// Untimed executions per size, after setup
    #[arg(long)]
    warmup: Option<u32>,

    /// Fraction of nonzero entries in sparse matrices
    #[arg(long)]
    sparsity: Option<f64>,

    /// Random seed for reproducible operands
    #[arg(long)]
    seed: Option<u64>,

    /// Only run these operations
    #[arg(long, value_enum, value_delimiter = ',')]
    ops: Option<Vec<Operation>>,

    /// Only run on these platforms
    #[arg(long, value_enum, value_delimiter = ',')]
    platforms: Option<Vec<Platform>>,

    /// Print the sweeps that would run, then exit
    #[arg(long)]
    list: bool,
}

impl Cli {
    /// Defaults, then the config file, then flags.
    fn resolve(&self) -> Result<BenchConfig> {
        let mut config = match &self.config {
            Some(path) => BenchConfig::load(path)?,
            None => BenchConfig::default(),
        };

        if let Some(repetitions) = self.repetitions {
            config.repetitions = repetitions;
        }
        if let Some(warmup) = self.warmup {
            config.warmup = warmup;
        }
        if let Some(sparsity) = self.sparsity {
            config.sparsity = sparsity;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(ops) = &self.ops {
            config.operations = OperationToggles::only(ops);
        }
        if let Some(platforms) = &self.platforms {
            config.platforms = PlatformToggles::only(platforms);
        }

        config.validate()?;
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve()?;
    let caps = Capabilities::probe();

    if cli.list {
        for entry in plan(&config, &caps) {
            let sizes = config.sizes.for_operation(entry.operation);
            println!("{} ({} sizes)", entry.header(), sizes.len());
        }
        return Ok(());
    }

    run_suite(&config, &caps, &mut std::io::stdout().lock())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
