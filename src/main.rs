//! placement-index CLI
//!
//! ```bash
//! # State index of two gateways on the 10 x 10 scenario grid
//! placement-index encode --agents 2 -- 500 500 30 1500 500 30
//!
//! # Enumerate all 3-gateway placements and write the table
//! placement-index enumerate --agents 3 --parquet states.parquet
//!
//! # Size of the state table
//! placement-index space --agents 3
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `placement_index=info`).

use clap::{Args, Parser, Subcommand};
use placement_index::{
    AgentOrder, EnumerationConfig, PlacementIndexError, StatesToParquet, Strictness, enumerate,
    write_states_csv,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "placement-index")]
#[command(about = "Mixed-radix state indices for gateway/UAV placements")]
#[command(version)]
struct Cli {
    /// Path to an enumeration config JSON file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct EncoderArgs {
    /// Number of agents (gateways/UAVs)
    #[arg(short = 'n', long)]
    agents: Option<usize>,

    /// Number of x bins (NL)
    #[arg(long)]
    lines: Option<u32>,

    /// Number of y bins (NC)
    #[arg(long)]
    columns: Option<u32>,

    /// Number of altitude bins (NA)
    #[arg(long)]
    altitudes: Option<u32>,

    /// Reject positions whose digits fall outside the grid
    #[arg(long)]
    strict: bool,

    /// Sort agents before encoding so permuted placements share an index
    #[arg(long)]
    canonical: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode one position vector (x1 y1 z1 x2 y2 z2 ...)
    Encode {
        #[command(flatten)]
        encoder: EncoderArgs,

        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },
    /// Enumerate every placement of distinct candidates
    Enumerate {
        #[command(flatten)]
        encoder: EncoderArgs,

        /// Site extent as min_x,min_y,max_x,max_y
        #[arg(long, value_delimiter = ',', num_args = 4, allow_negative_numbers = true)]
        extent: Option<Vec<f64>>,

        /// Candidate spacing on the site
        #[arg(long)]
        step: Option<f64>,

        /// Flight level; repeat for several
        #[arg(long = "altitude")]
        altitude_levels: Vec<f64>,

        /// Write the state table as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the state table as Parquet
        #[arg(long)]
        parquet: Option<PathBuf>,
    },
    /// Print the state table size (NL*NC*NA)^N
    Space {
        #[command(flatten)]
        encoder: EncoderArgs,
    },
}

fn main() -> Result<(), PlacementIndexError> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "placement_index=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => EnumerationConfig::from_json_file(path)?,
        None => EnumerationConfig::default(),
    };

    match cli.command {
        Command::Encode { encoder, values } => {
            apply_encoder_args(&mut config, &encoder);
            let index = config.encoder.build()?.encode_flat(&values)?;
            println!("{}", index);
        }
        Command::Enumerate {
            encoder,
            extent,
            step,
            altitude_levels,
            csv,
            parquet,
        } => {
            apply_encoder_args(&mut config, &encoder);
            if let Some(&[min_x, min_y, max_x, max_y]) = extent.as_deref() {
                config.site.extent = [min_x, min_y, max_x, max_y];
            }
            if let Some(step) = step {
                config.site.step = step;
            }
            if !altitude_levels.is_empty() {
                config.site.altitudes = altitude_levels;
            }

            let grid = config.site.candidate_grid()?;
            let encoder = config.encoder.build()?;
            info!(
                agents = encoder.agents(),
                candidates = grid.len(),
                shape = ?encoder.shape(),
                "enumerating placements"
            );

            let states = enumerate(&encoder, &grid)?;
            println!(
                "states={} skipped={} duplicates={}",
                states.len(),
                states.skipped(),
                states.duplicates().len()
            );

            if let Some(path) = csv {
                write_states_csv(&states, &grid, &path)?;
                info!(path = %path.display(), "wrote CSV state table");
            }
            if let Some(path) = parquet {
                states.to_parquet(&grid, &path)?;
                info!(path = %path.display(), "wrote Parquet state table");
            }
        }
        Command::Space { encoder } => {
            apply_encoder_args(&mut config, &encoder);
            println!("{}", config.encoder.build()?.state_space_size()?);
        }
    }

    Ok(())
}

fn apply_encoder_args(config: &mut EnumerationConfig, args: &EncoderArgs) {
    let encoder = &mut config.encoder;
    if let Some(agents) = args.agents {
        encoder.agents = agents;
    }
    if let Some(lines) = args.lines {
        encoder.grid.lines = lines;
    }
    if let Some(columns) = args.columns {
        encoder.grid.columns = columns;
    }
    if let Some(altitudes) = args.altitudes {
        encoder.grid.altitudes = altitudes;
    }
    if args.strict {
        encoder.strictness = Strictness::Strict;
    }
    if args.canonical {
        encoder.order = AgentOrder::Canonical;
    }
}
