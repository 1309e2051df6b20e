use std::path::PathBuf;

use serde::Deserialize;

/// Top-level qmbc configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QmbcConfig {
    /// Input files and variable names.
    pub input: InputToml,

    /// Preparation applied before correction.
    #[serde(default)]
    pub preprocess: PreprocessToml,

    /// Season catalog selection.
    #[serde(default)]
    pub seasons: SeasonsToml,

    /// Distribution fitting settings.
    #[serde(default)]
    pub fit: FitToml,

    /// Output settings.
    #[serde(default)]
    pub output: OutputToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputToml {
    pub hist: PathBuf,
    pub fut: PathBuf,
    pub obs: PathBuf,
    #[serde(default = "default_variable")]
    pub variable: String,
    /// Observation variable name when it differs from the model's.
    #[serde(default)]
    pub obs_variable: Option<String>,
    #[serde(default = "default_time_var")]
    pub time_var: String,
}

fn default_variable() -> String {
    "tas".to_string()
}
fn default_time_var() -> String {
    "time".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreprocessToml {
    #[serde(default = "default_true")]
    pub drop_leap_days: bool,
    /// Inclusive `["YYYY-MM-DD", "YYYY-MM-DD"]` window of the historical run.
    #[serde(default)]
    pub hist_period: Option<[String; 2]>,
    #[serde(default)]
    pub fut_period: Option<[String; 2]>,
    /// Defaults to `hist_period`.
    #[serde(default)]
    pub obs_period: Option<[String; 2]>,
    /// Half-open latitude index window `[start, end)`.
    #[serde(default)]
    pub lat_window: Option<[usize; 2]>,
    #[serde(default)]
    pub lon_window: Option<[usize; 2]>,
    /// Added to observations (273.15 turns °C into K).
    #[serde(default)]
    pub obs_offset: f64,
    /// Common grid all inputs are interpolated onto.
    #[serde(default)]
    pub target_grid: Option<TargetGridToml>,
}

impl Default for PreprocessToml {
    fn default() -> Self {
        Self {
            drop_leap_days: true,
            hist_period: None,
            fut_period: None,
            obs_period: None,
            lat_window: None,
            lon_window: None,
            obs_offset: 0.0,
            target_grid: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Axes given as `[start, stop, step]`, stop exclusive.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetGridToml {
    pub lat: [f64; 3],
    pub lon: [f64; 3],
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeasonsToml {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub lat_range: Option<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FitToml {
    #[serde(default = "default_cdf_ceiling")]
    pub cdf_ceiling: f64,
    #[serde(default = "default_min_unique")]
    pub min_unique: usize,
    #[serde(default = "default_max_iters")]
    pub max_iters: u64,
    #[serde(default = "default_sd_tolerance")]
    pub sd_tolerance: f64,
}

impl Default for FitToml {
    fn default() -> Self {
        Self {
            cdf_ceiling: default_cdf_ceiling(),
            min_unique: default_min_unique(),
            max_iters: default_max_iters(),
            sd_tolerance: default_sd_tolerance(),
        }
    }
}

fn default_cdf_ceiling() -> f64 {
    0.9999
}
fn default_min_unique() -> usize {
    3
}
fn default_max_iters() -> u64 {
    2000
}
fn default_sd_tolerance() -> f64 {
    1e-10
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Defaults to the input variable name.
    #[serde(default)]
    pub variable: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub chronological: bool,
    /// Where to write the JSON correction report.
    #[serde(default)]
    pub report: Option<PathBuf>,
}

impl Default for OutputToml {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            variable: None,
            units: None,
            chronological: false,
            report: None,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
