use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use openarm_apps::{
    resolve_description, run_tracking,
    utils::{init_tracing, install_signal_handlers, INTERRUPTED},
    TrackingConfig,
};
use openarm_control::PacingMode;
use schemars::schema_for;
use tracing::{debug, info};

/// Minimal PD position tracking for OpenArm in MuJoCo.
///
/// Loads an MJCF description, swings every joint-driven actuator around its
/// initial pose and shows the result in the viewer.
#[derive(Parser, Debug)]
#[command(name = env!("CARGO_BIN_NAME"))]
struct Args {
    /// Path to the OpenArm MJCF (XML).
    #[arg(long, value_name = "PATH")]
    xml: Option<PathBuf>,
    /// Target amplitude (radians).
    #[arg(long)]
    amp: Option<f64>,
    /// Target frequency (Hz).
    #[arg(long)]
    freq: Option<f64>,
    /// PD proportional gain.
    #[arg(long)]
    kp: Option<f64>,
    /// PD derivative gain.
    #[arg(long)]
    kd: Option<f64>,
    /// Delay after every control tick (seconds).
    #[arg(long)]
    dt: Option<f64>,
    /// Path to the setting file. Flags take priority over its values.
    #[arg(short, long, value_name = "PATH")]
    config_path: Option<PathBuf>,
    /// Stop after this many seconds.
    #[arg(long)]
    duration: Option<f64>,
    /// Run without the viewer.
    #[arg(long)]
    headless: bool,
    /// Swing neighbouring actuators in opposite phase.
    #[arg(long)]
    alternate_phase: bool,
    /// Loop pacing: "fixed-delay" or "deadline".
    #[arg(long, value_name = "MODE")]
    pacing: Option<PacingMode>,
    /// Period of the status log line (seconds, 0 disables it).
    #[arg(long)]
    status_interval: Option<f64>,
    /// Comma separated amplitude factors, one per actuator.
    #[arg(long, value_delimiter = ',', value_name = "SCALES")]
    amplitude_scales: Option<Vec<f64>>,
    /// Swing one joint at a time for this many seconds each.
    #[arg(long, value_name = "SECONDS")]
    sweep_segment: Option<f64>,
    /// Prints the default setting as TOML.
    #[arg(long)]
    show_default_config: bool,
    /// Prints the JSON schema of the setting file.
    #[arg(long)]
    show_config_schema: bool,
}

impl Args {
    fn apply(&self, config: &mut TrackingConfig) {
        if let Some(xml) = &self.xml {
            config.description_path = Some(xml.clone());
        }
        let overrides = [
            (self.amp, &mut config.amplitude),
            (self.freq, &mut config.frequency),
            (self.kp, &mut config.kp),
            (self.kd, &mut config.kd),
            (self.dt, &mut config.dt),
            (self.status_interval, &mut config.status_interval),
        ];
        for (value, field) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
        if self.duration.is_some() {
            config.duration = self.duration;
        }
        if self.amplitude_scales.is_some() {
            config.amplitude_scales = self.amplitude_scales.clone();
        }
        if self.sweep_segment.is_some() {
            config.sweep_segment = self.sweep_segment;
        }
        if let Some(pacing) = self.pacing {
            config.pacing = pacing;
        }
        config.headless |= self.headless;
        config.alternate_phase |= self.alternate_phase;
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    debug!("{args:?}");

    if args.show_default_config {
        print!("{}", toml::to_string(&TrackingConfig::default())?);
        return Ok(());
    }
    if args.show_config_schema {
        println!(
            "{}",
            serde_json::to_string_pretty(&schema_for!(TrackingConfig))?
        );
        return Ok(());
    }

    let mut config = match &args.config_path {
        Some(path) => TrackingConfig::try_new(path)?,
        None => TrackingConfig::default(),
    };
    args.apply(&mut config);
    config.validate()?;

    let description =
        resolve_description(config.description_path.clone(), std::env::current_dir()?)?;
    info!("Loading description: {}", description.display());

    install_signal_handlers()?;
    let summary = run_tracking(&config, &description, &INTERRUPTED)?;
    info!(
        "{} after {} ticks ({:.2} s)",
        summary.reason,
        summary.ticks,
        summary.elapsed.as_secs_f64()
    );
    Ok(())
}
