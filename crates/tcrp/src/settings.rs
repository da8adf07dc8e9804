//! Run settings file
//!
//! A YAML document holding the engine configuration alongside the inputs
//! and output location of a run:
//!
//! ```yaml
//! engine:
//!   basin: NA
//!   storms_per_year: 11.3
//!   iterations: 10
//! tracks:
//!   - tracks/member_0.txt
//!   - tracks/member_1.txt
//! locations: locations.csv
//! output_dir: output
//! wind_factor: 0.88
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use serde::{Deserialize, Serialize};
use tcrp_core::{ConfigError, EngineConfig};

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_wind_factor() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub engine: EngineConfig,

    /// One track file per ensemble member, in member order
    pub tracks: Vec<PathBuf>,

    /// Location table (CSV, or YAML by extension)
    pub locations: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Multiplier applied to every wind speed as tracks are read
    #[serde(default = "default_wind_factor")]
    pub wind_factor: f64,
}

/// Command-line values that take precedence over the settings file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub iterations: Option<usize>,
    pub seed: Option<u64>,
    pub n_years: Option<usize>,
    pub output_dir: Option<PathBuf>,
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    /// Read, parse and path-resolve a settings file.
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read settings from {}", path.display()))?;
        let mut settings = Self::from_yaml(&content)
            .wrap_err_with(|| format!("Failed to parse settings in {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        settings.resolve_paths(base);
        Ok(settings)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        self.tracks.iter_mut().for_each(resolve);
        resolve(&mut self.locations);
        resolve(&mut self.output_dir);
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(iterations) = overrides.iterations {
            self.engine.iterations = iterations;
        }
        if let Some(seed) = overrides.seed {
            self.engine.seed = Some(seed);
        }
        if let Some(n_years) = overrides.n_years {
            self.engine.n_years = n_years;
        }
        if let Some(dir) = &overrides.output_dir {
            self.output_dir = dir.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        if !(self.wind_factor.is_finite() && self.wind_factor > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "wind_factor",
                reason: "must be a positive multiplier",
            });
        }
        Ok(())
    }
}
