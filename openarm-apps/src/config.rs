use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use openarm_control::{Pacing, PacingMode, PdGains, TrackingParams};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Error;

/// Settings of the PD tracking demo.
///
/// Every key is optional in the TOML file; command line flags override it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TrackingConfig {
    /// MJCF description. A relative path is resolved against the directory
    /// of the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_path: Option<PathBuf>,
    /// Swing amplitude (rad).
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
    /// Swing frequency (Hz).
    #[serde(default = "default_frequency")]
    pub frequency: f64,
    #[serde(default = "default_kp")]
    pub kp: f64,
    #[serde(default = "default_kd")]
    pub kd: f64,
    /// Control loop delay (s).
    #[serde(default = "default_dt")]
    pub dt: f64,
    #[serde(default)]
    pub pacing: PacingMode,
    #[serde(default)]
    pub alternate_phase: bool,
    /// Stop after this many seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Run without opening a viewer.
    #[serde(default)]
    pub headless: bool,
    /// Period of the status log line (s); 0 disables it.
    #[serde(default = "default_status_interval")]
    pub status_interval: f64,
    /// Factor applied to `amplitude` per actuator, one entry per actuator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amplitude_scales: Option<Vec<f64>>,
    /// Swing one joint at a time for this many seconds each.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep_segment: Option<f64>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            description_path: None,
            amplitude: default_amplitude(),
            frequency: default_frequency(),
            kp: default_kp(),
            kd: default_kd(),
            dt: default_dt(),
            pacing: PacingMode::default(),
            alternate_phase: false,
            duration: None,
            headless: false,
            status_interval: default_status_interval(),
            amplitude_scales: None,
            sweep_segment: None,
        }
    }
}

fn default_amplitude() -> f64 {
    TrackingParams::default().amplitude
}

fn default_frequency() -> f64 {
    TrackingParams::default().frequency
}

fn default_kp() -> f64 {
    PdGains::default().kp
}

fn default_kd() -> f64 {
    PdGains::default().kd
}

fn default_dt() -> f64 {
    1.0 / 240.0
}

fn default_status_interval() -> f64 {
    1.0
}

impl TrackingConfig {
    pub fn try_new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::from_str(
            &std::fs::read_to_string(&path)
                .map_err(|e| Error::NoFile(path.as_ref().to_owned(), e))?,
            &path,
        )
    }

    pub fn from_str<P: AsRef<Path>>(s: &str, path: P) -> Result<Self, Error> {
        let mut config: TrackingConfig =
            toml::from_str(s).map_err(|e| Error::TomlParseFailure(path.as_ref().to_owned(), e))?;
        if let Some(description_path) = &config.description_path {
            if description_path.is_relative() {
                config.description_path =
                    Some(resolve_relative_path(&path, description_path)?);
            }
        }
        debug!("loaded {:?} from {:?}", config, path.as_ref());
        Ok(config)
    }

    /// Rejects values the controller or the loop cannot use.
    pub fn validate(&self) -> Result<(), Error> {
        let finite = [
            ("amplitude", self.amplitude),
            ("frequency", self.frequency),
            ("kp", self.kp),
            ("kd", self.kd),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite (got {value})"
                )));
            }
        }
        for (i, scale) in self.amplitude_scales.iter().flatten().enumerate() {
            if !scale.is_finite() {
                return Err(Error::InvalidConfig(format!(
                    "amplitude_scales[{i}] must be finite (got {scale})"
                )));
            }
        }
        if let Some(segment) = self.sweep_segment {
            if !segment.is_finite() || segment <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "sweep_segment must be a finite positive number of seconds (got {segment})"
                )));
            }
        }
        let seconds = [
            ("dt", Some(self.dt)),
            ("duration", self.duration),
            ("status_interval", Some(self.status_interval)),
        ];
        for (name, value) in seconds {
            if let Some(value) = value {
                if let Err(e) = Duration::try_from_secs_f64(value) {
                    return Err(Error::InvalidConfig(format!(
                        "{name} must be a non-negative number of seconds (got {value}: {e})"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn tracking_params(&self) -> TrackingParams {
        TrackingParams {
            amplitude: self.amplitude,
            frequency: self.frequency,
            gains: PdGains::new(self.kp, self.kd),
            alternate_phase: self.alternate_phase,
            amplitude_scales: self.amplitude_scales.clone(),
            sweep_segment: self.sweep_segment,
        }
    }

    /// Call after [`validate`](Self::validate).
    pub fn pacing(&self) -> Pacing {
        Pacing::new(self.pacing, Duration::from_secs_f64(self.dt))
    }

    pub fn run_duration(&self) -> Option<Duration> {
        self.duration.map(Duration::from_secs_f64)
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_secs_f64(self.status_interval)
    }
}

/// Joins `path` onto the directory containing `base_path`.
pub fn resolve_relative_path<B, P>(base_path: B, path: P) -> Result<PathBuf, Error>
where
    B: AsRef<Path>,
    P: AsRef<Path>,
{
    Ok(base_path
        .as_ref()
        .parent()
        .ok_or_else(|| Error::NoParentDirectory(base_path.as_ref().to_owned()))?
        .join(path))
}
