//! Configuration models and loaders for the slingshot workspace.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use slingshot_core::constants::MU_SUN;
use thiserror::Error;

/// Body catalog entry parsed from scenario manifests.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    /// Ephemeris identifier (1 = Mercury … 9 = Pluto).
    pub id: u8,
    pub mu_km3_s2: f64,
    pub radius_km: f64,
    /// Lowest allowed flyby altitude above `radius_km`.
    #[serde(default)]
    pub min_flyby_altitude_km: f64,
}

impl BodyConfig {
    /// Radius the flyby pericenter must stay above.
    pub fn safe_radius_km(&self) -> f64 {
        self.radius_km + self.min_flyby_altitude_km
    }
}

/// Controls for the flyby pericenter root-find.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct RootFinderConfig {
    pub x_tolerance: f64,
    pub f_tolerance: f64,
    pub max_iterations: usize,
    pub max_bracket_expansions: usize,
}

impl Default for RootFinderConfig {
    fn default() -> Self {
        Self {
            x_tolerance: 1e-14,
            f_tolerance: 1e-14,
            max_iterations: 200,
            max_bracket_expansions: 40,
        }
    }
}

/// Controls forwarded to the Lambert solver.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct LambertConfig {
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for LambertConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 500,
        }
    }
}

/// Numerical settings shared by the evaluator front-ends.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SolverConfig {
    pub central_mu_km3_s2: f64,
    pub root_finder: RootFinderConfig,
    pub lambert: LambertConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            central_mu_km3_s2: MU_SUN,
            root_finder: RootFinderConfig::default(),
            lambert: LambertConfig::default(),
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid body `{name}`: {reason}")]
    InvalidBody { name: String, reason: &'static str },
    #[error("invalid solver setting: {0}")]
    InvalidSolver(&'static str),
}

/// Load body configurations from a YAML file, a TOML file, or a directory of TOML files.
pub fn load_bodies<P: AsRef<Path>>(path: P) -> Result<Vec<BodyConfig>, ConfigError> {
    let bodies: Vec<BodyConfig> = load_records(path)?;
    for body in &bodies {
        validate_body(body)?;
    }
    Ok(bodies)
}

/// Find a body by case-insensitive name.
pub fn find_body<'a>(bodies: &'a [BodyConfig], name: &str) -> Option<&'a BodyConfig> {
    let upper = name.to_uppercase();
    bodies.iter().find(|b| b.name.to_uppercase() == upper)
}

/// Load solver settings from a TOML (or `.yaml`/`.yml`) file.
pub fn load_solver_config<P: AsRef<Path>>(path: P) -> Result<SolverConfig, ConfigError> {
    let path = path.as_ref();
    let config: SolverConfig = if is_yaml(path) {
        serde_yaml::from_reader(File::open(path)?)?
    } else {
        toml::from_str(&std::fs::read_to_string(path)?)?
    };
    validate_solver(&config)?;
    Ok(config)
}

fn validate_body(body: &BodyConfig) -> Result<(), ConfigError> {
    let invalid = |reason| ConfigError::InvalidBody {
        name: body.name.clone(),
        reason,
    };
    if !(body.mu_km3_s2 > 0.0) {
        return Err(invalid("mu_km3_s2 must be positive"));
    }
    if !(body.radius_km > 0.0) {
        return Err(invalid("radius_km must be positive"));
    }
    if body.min_flyby_altitude_km < 0.0 {
        return Err(invalid("min_flyby_altitude_km must not be negative"));
    }
    Ok(())
}

fn validate_solver(config: &SolverConfig) -> Result<(), ConfigError> {
    if !(config.central_mu_km3_s2 > 0.0) {
        return Err(ConfigError::InvalidSolver("central_mu_km3_s2 must be positive"));
    }
    if config.root_finder.max_iterations == 0 || config.lambert.max_iterations == 0 {
        return Err(ConfigError::InvalidSolver("iteration budgets must be non-zero"));
    }
    if !(config.root_finder.x_tolerance > 0.0) || !(config.lambert.tolerance > 0.0) {
        return Err(ConfigError::InvalidSolver("tolerances must be positive"));
    }
    Ok(())
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == "yaml" || ext == "yml")
        .unwrap_or(false)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
