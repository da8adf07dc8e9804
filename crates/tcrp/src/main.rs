use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tcrp::{Overrides, Settings, commands, init_logging};
use tcrp_core::ReferencePeriod;

#[derive(Parser, Debug)]
#[command(name = "tcrp")]
#[command(about = "Tropical-cyclone wind return periods from synthetic track ensembles")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate return periods for every location in the settings file
    Run {
        /// Path to the YAML settings file
        settings: PathBuf,

        /// Number of resampling iterations
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Master seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,

        /// Synthetic climatology length per iteration
        #[arg(short, long)]
        n_years: Option<usize>,

        /// Directory for tables, summary and log
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Recompute the mean, spread and bands of a written table
    Aggregate {
        /// Table with `Wind_speed` and `RP_*` columns
        input: PathBuf,

        /// Where to write the result (default: overwrite the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// First year of the reference period
        #[arg(long, default_value_t = 1980)]
        start_year: i16,

        /// Last year of the reference period
        #[arg(long, default_value_t = 2021)]
        end_year: i16,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    match args.command {
        Command::Run {
            settings,
            iterations,
            seed,
            n_years,
            output_dir,
        } => {
            let mut settings = Settings::load(&settings)?;
            settings.apply(&Overrides {
                iterations,
                seed,
                n_years,
                output_dir,
            });
            init_logging(&settings.output_dir, &args.log_level)?;

            let report = commands::run(&settings)?;
            println!(
                "Wrote {} tables (seed {}) to {}",
                report.outputs.len(),
                report.seed,
                settings.output_dir.display()
            );
        }
        Command::Aggregate {
            input,
            output,
            start_year,
            end_year,
        } => {
            let output = output.unwrap_or_else(|| input.clone());
            let log_dir = output
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            init_logging(&log_dir, &args.log_level)?;

            let period = ReferencePeriod::years(start_year, end_year)?;
            commands::aggregate(&input, &output, &period)?;
        }
    }

    Ok(())
}
