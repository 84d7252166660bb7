use clap::Parser;
use log::{error, info};
use soft_rasterizer::app::{run_cli, run_gui};
use soft_rasterizer::io::config::Config;
use std::path::PathBuf;
use std::process::ExitCode;

/// CPU triangle rasterizer driven by a TOML scene file.
#[derive(Parser, Debug)]
#[command(name = "soft-rasterizer", version)]
struct Cli {
    /// Scene configuration (TOML). Built-in scene when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Render one frame to the output file instead of opening a window.
    #[arg(long)]
    headless: bool,

    /// Overrides `render.output`.
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .filter_module("minifb", log::LevelFilter::Warn)
        .format_timestamp(None)
        .format_level(true)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading config file: {:?}", path);
            match Config::load(path) {
                Ok(config) => config,
                Err(e) => {
                    error!("{}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => {
            info!("No config file given, using the built-in scene");
            Config::default()
        }
    };

    if let Some(output) = cli.output {
        config.render.output = output;
    }

    let result = if cli.headless {
        run_cli(config)
    } else {
        run_gui(config, cli.config.as_deref())
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
