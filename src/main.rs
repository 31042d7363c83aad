use std::{fs, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use log::{error, info, warn};

use rflcs_report::datastructures::Config;
use rflcs_report::report;

#[derive(Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Path to the json config
    #[arg(short, long)]
    pub config: PathBuf,
    /// Path to the output directory
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
    /// Only create the tables with these names
    #[arg(short, long, value_delimiter = ' ', num_args = 0..)]
    pub tables: Option<Vec<String>>,
    #[command(flatten)]
    pub verbosity: Verbosity,
}

fn config_from_cli(args: &Args) -> Result<Config> {
    let mut config = Config::from_file(&args.config)?;
    if let Some(out_dir) = &args.out_dir {
        config.out_dir = out_dir.to_path_buf();
    }
    if let Some(tables) = &args.tables {
        config.tables.retain(|table| tables.contains(&table.name));
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();
    let config = match config_from_cli(&args) {
        Ok(config) => config,
        Err(err) => {
            error!("{err:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };
    if config.tables.is_empty() {
        warn!("No tables selected, nothing to do");
    }
    fs::create_dir_all(&config.out_dir)?;
    for table in &config.tables {
        info!("Creating table {}", table.name);
        report::create_table(table, &config.out_dir)?;
    }
    Ok(())
}
