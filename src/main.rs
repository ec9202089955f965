use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use my_robot_sim::{
    camera::CameraPositioner, config::CameraSettings, gz_service::GzCli, logging, CameraError,
};

/// Moves the Gazebo GUI camera to the launch viewpoint.
#[derive(Parser, Debug)]
#[command(name = "set_camera", version)]
struct Cli {
    /// TOML file overriding delay, timeout, gz binary, service or pose
    #[arg(long)]
    config: Option<PathBuf>,

    /// Executable used for the service call
    #[arg(long)]
    gz_bin: Option<String>,

    /// Milliseconds to wait for the simulator GUI before calling
    #[arg(long)]
    delay_ms: Option<u64>,
}

async fn settings(cli: Cli) -> anyhow::Result<CameraSettings> {
    let mut settings = match &cli.config {
        Some(path) => CameraSettings::load(path).await?,
        None => CameraSettings::default(),
    };
    if let Some(bin) = cli.gz_bin {
        settings.gz_bin = bin;
    }
    if let Some(ms) = cli.delay_ms {
        settings.startup_delay = Duration::from_millis(ms);
    }
    settings.validate()?;
    Ok(settings)
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_logging();
    let cli = Cli::parse();

    let settings = match settings(cli).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("✗ Failed to set camera: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let mut positioner = CameraPositioner::new(GzCli::new(settings.gz_bin.clone()), &settings);
    match positioner.run().await {
        Ok(_) => {
            println!("✓ Camera position set successfully!");
            ExitCode::SUCCESS
        }
        Err(CameraError::CallFailed { stderr, .. }) => {
            eprintln!("✗ Failed to set camera: {stderr}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("✗ Failed to set camera: {e}");
            ExitCode::FAILURE
        }
    }
}
