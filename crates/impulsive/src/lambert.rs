use lambert_bate::get_velocities;
use serde::Serialize;
use slingshot_core::vector::{self, Vector3};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub enum LambertSolverError {
    #[error("time of flight must be positive and finite, got {0} s")]
    InvalidTimeOfFlight(f64),
    #[error("iteration budget {0} does not fit the solver's counter type")]
    InvalidIterationBudget(u32),
    #[error("lambert solver failed: {0}")]
    Failure(String),
    #[error("lambert solver returned non-finite velocities")]
    NonFinite,
}

/// Convergence controls forwarded to the universal-variable solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LambertSettings {
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for LambertSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 500,
        }
    }
}

/// Velocities and endpoint costs of one heliocentric Lambert arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LambertLeg {
    /// Spacecraft velocity leaving the first endpoint.
    pub departure_velocity_km_s: Vector3,
    /// Spacecraft velocity reaching the second endpoint.
    pub arrival_velocity_km_s: Vector3,
    /// `|V1 - v_body1|`: cost to match the arc at the first endpoint.
    pub departure_delta_v_km_s: f64,
    /// `|v_body2 - V2|`: cost to match the second body at arrival.
    pub arrival_delta_v_km_s: f64,
}

pub fn solve(
    r1_km: [f64; 3],
    r2_km: [f64; 3],
    time_of_flight_s: f64,
    mu_km3_s2: f64,
    short: bool,
    settings: &LambertSettings,
) -> Result<([f64; 3], [f64; 3]), LambertSolverError> {
    if !(time_of_flight_s > 0.0) || !time_of_flight_s.is_finite() {
        return Err(LambertSolverError::InvalidTimeOfFlight(time_of_flight_s));
    }
    let max_iterations = settings
        .max_iterations
        .try_into()
        .map_err(|_| LambertSolverError::InvalidIterationBudget(settings.max_iterations))?;

    let (v1, v2) = get_velocities(
        r1_km,
        r2_km,
        time_of_flight_s,
        mu_km3_s2,
        short,
        settings.tolerance,
        max_iterations,
    )
    .map_err(|e| LambertSolverError::Failure(format!("{e:?}")))?;

    if !vector::is_finite(&v1) || !vector::is_finite(&v2) {
        return Err(LambertSolverError::NonFinite);
    }
    Ok((v1, v2))
}

/// Solve the prograde zero-revolution arc between two body states and split its cost.
///
/// The short-way branch is used when the transfer angle, measured counter-clockwise about +z,
/// is below π; otherwise the long way keeps the arc prograde.
pub fn solve_leg(
    r1_km: Vector3,
    r2_km: Vector3,
    body1_velocity_km_s: Vector3,
    body2_velocity_km_s: Vector3,
    time_of_flight_s: f64,
    mu_km3_s2: f64,
    settings: &LambertSettings,
) -> Result<LambertLeg, LambertSolverError> {
    let short = vector::cross(&r1_km, &r2_km)[2] >= 0.0;
    let (v1, v2) = solve(r1_km, r2_km, time_of_flight_s, mu_km3_s2, short, settings)?;

    let departure_delta_v_km_s = vector::norm(&vector::sub(&v1, &body1_velocity_km_s));
    let arrival_delta_v_km_s = vector::norm(&vector::sub(&body2_velocity_km_s, &v2));
    trace!(
        short,
        time_of_flight_s,
        departure_delta_v_km_s,
        arrival_delta_v_km_s,
        "lambert leg solved"
    );

    Ok(LambertLeg {
        departure_velocity_km_s: v1,
        arrival_velocity_km_s: v2,
        departure_delta_v_km_s,
        arrival_delta_v_km_s,
    })
}
