//! camgrid - Entry Point

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// camgrid - live camera grid with automatic layout and feed scanning
#[derive(Parser, Debug)]
#[command(name = "camgrid")]
#[command(version)]
#[command(about = "Responsive live camera grid with automatic layout, resolution selection and feed scanning")]
pub struct Args {
    /// Feed base URLs, one tile each (overrides `feeds` from the config file)
    pub feeds: Vec<String>,

    /// Seconds between automatic scan steps (must be positive)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub scan_interval: Option<u64>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config_file = camgrid::config::load_config_with_precedence(args.config.clone())?;

    // Logging first, so fallback warnings from merging reach the log file
    camgrid::logging::init(&camgrid::config::resolve_log_path(config_file.as_ref()))?;

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let merged = camgrid::config::merge_config(config_file);
        let with_env = camgrid::config::apply_env_overrides(merged);
        camgrid::config::apply_cli_overrides(with_env, args.feeds.clone(), args.scan_interval)
    };

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let controller = camgrid::integration::controller_from_config(&config)?;
    let options = camgrid::integration::grid_options_from_config(&config);

    camgrid::view::run(controller, options)?;

    Ok(())
}
