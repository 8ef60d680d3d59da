//! Shared plumbing for the command-line drivers.

use std::path::Path;

use anyhow::{Context, anyhow};
use chrono::{NaiveDate, NaiveDateTime};
use slingshot::config::{self, BodyConfig, SolverConfig};
use slingshot::ephem::{Body, MeanElementEphemeris};
use slingshot::flyby::{FlybySolver, NewtonBisection};
use slingshot::impulsive::LambertSettings;
use slingshot::transfer::TransferCostEvaluator;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence; otherwise `--verbose` turns on debug output for the workspace
/// crates and trace output for the flyby and Lambert solvers.
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "slingshot=debug,slingshot_transfer=debug,slingshot_flyby=trace,slingshot_impulsive=trace"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Epoch parsing and formatting in MJD2000 days.
pub mod epoch {
    use super::*;

    fn origin() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    pub fn mjd2000_from_datetime(datetime: NaiveDateTime) -> f64 {
        let delta = datetime - origin();
        delta.num_milliseconds() as f64 / 86_400_000.0
    }

    /// Accept an MJD2000 number, an ISO date (`2003-04-01`), or an ISO datetime.
    pub fn parse_epoch(text: &str) -> anyhow::Result<f64> {
        let trimmed = text.trim();
        if let Ok(days) = trimmed.parse::<f64>() {
            if days.is_finite() {
                return Ok(days);
            }
        }
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
            return Ok(mjd2000_from_datetime(datetime));
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            let datetime = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| anyhow!("invalid date `{trimmed}`"))?;
            return Ok(mjd2000_from_datetime(datetime));
        }
        Err(anyhow!(
            "unrecognised epoch `{trimmed}` (expected MJD2000 days or YYYY-MM-DD[THH:MM:SS])"
        ))
    }

    /// Calendar rendering of an MJD2000 epoch, to the second.
    pub fn format_mjd2000(mjd2000: f64) -> String {
        let millis = (mjd2000 * 86_400_000.0).round() as i64;
        let datetime = origin() + chrono::Duration::milliseconds(millis);
        datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

/// A body resolved against the optional catalog.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedBody {
    pub body: Body,
    pub mu_km3_s2: f64,
    pub radius_km: f64,
    pub safe_radius_km: f64,
}

impl ResolvedBody {
    /// Flyby limit: an explicit altitude wins, then the catalog's safe radius, else `rp > 0` only.
    pub fn min_radius_km(&self, altitude_km: Option<f64>, from_catalog: bool) -> f64 {
        match altitude_km {
            Some(altitude) => self.radius_km + altitude,
            None if from_catalog => self.safe_radius_km,
            None => 0.0,
        }
    }
}

/// Load the body catalog if a path was supplied.
pub fn load_catalog(path: Option<&Path>) -> anyhow::Result<Option<Vec<BodyConfig>>> {
    path.map(|p| {
        config::load_bodies(p).with_context(|| format!("loading body catalog {}", p.display()))
    })
    .transpose()
}

/// Resolve a body by name or id; catalog entries override the built-in constants.
pub fn resolve_body(catalog: Option<&[BodyConfig]>, name: &str) -> anyhow::Result<ResolvedBody> {
    if let Some(entry) = catalog.and_then(|bodies| config::find_body(bodies, name)) {
        let body = Body::from_id(entry.id)
            .with_context(|| format!("catalog entry `{}` has no ephemeris", entry.name))?;
        return Ok(ResolvedBody {
            body,
            mu_km3_s2: entry.mu_km3_s2,
            radius_km: entry.radius_km,
            safe_radius_km: entry.safe_radius_km(),
        });
    }
    let body: Body = name
        .parse()
        .with_context(|| format!("body `{name}` not found"))?;
    Ok(ResolvedBody {
        body,
        mu_km3_s2: body.mu_km3_s2(),
        radius_km: body.radius_km(),
        safe_radius_km: body.radius_km(),
    })
}

/// Load solver settings if a path was supplied, else defaults.
pub fn load_solver(path: Option<&Path>) -> anyhow::Result<SolverConfig> {
    match path {
        Some(p) => config::load_solver_config(p)
            .with_context(|| format!("loading solver settings {}", p.display())),
        None => Ok(SolverConfig::default()),
    }
}

/// Build an evaluator over the analytic ephemeris with the given settings.
pub fn build_evaluator(solver: &SolverConfig) -> TransferCostEvaluator<MeanElementEphemeris> {
    let root = &solver.root_finder;
    TransferCostEvaluator::new(MeanElementEphemeris::new())
        .with_flyby_solver(FlybySolver::new(
            NewtonBisection::new(root.x_tolerance, root.f_tolerance, root.max_iterations),
            root.max_bracket_expansions,
        ))
        .with_lambert_settings(LambertSettings {
            tolerance: solver.lambert.tolerance,
            max_iterations: solver.lambert.max_iterations,
        })
}
