//! Powered gravity-assist solver.
//!
//! Given the planet-relative excess velocities before and after an encounter, the solver finds
//! the single pericenter radius at which an incoming and an outgoing hyperbola, joined by a
//! tangential burn at pericenter, together produce the required deflection. The two branches
//! generally have different eccentricities, so the pericenter radius has no closed form and is
//! found with [`NewtonBisection`].

use std::f64::consts::PI;

use serde::Serialize;
use slingshot_core::angle::safe_acos;
use slingshot_core::vector::{self, POLE, Vector3};
use slingshot_orbits::{hyperbola_elements, pericenter_speed, turn_angle};
use thiserror::Error;
use tracing::trace;

pub mod geometry;
pub mod residual;
pub mod root;

pub use geometry::FlybyPlane;
pub use residual::TurnAngleResidual;
pub use root::{NewtonBisection, RootEstimate, RootFindError};

/// Errors surfaced by [`FlybySolver::solve`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FlybyError {
    #[error("invalid flyby input: {0}")]
    InvalidInput(&'static str),
    #[error("infeasible flyby geometry: {reason}")]
    InfeasibleGeometry { reason: InfeasibleReason },
}

/// Why a flyby could not be realised.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InfeasibleReason {
    #[error("no finite pericenter produces a turn angle of {turn_angle_rad} rad")]
    NoBracket { turn_angle_rad: f64 },
    #[error("excess velocities are anti-parallel; reversal needs a zero pericenter")]
    Reversal,
    #[error("pericenter root-find failed: {0}")]
    RootFind(#[from] RootFindError),
    #[error("converged pericenter {rp_km} km leaves residual {residual_rad} rad")]
    Unconverged { rp_km: f64, residual_rad: f64 },
    #[error("pericenter {rp_km} km is not above the safe radius {limit_km} km")]
    BelowSafeRadius { rp_km: f64, limit_km: f64 },
}

impl From<InfeasibleReason> for FlybyError {
    fn from(reason: InfeasibleReason) -> Self {
        FlybyError::InfeasibleGeometry { reason }
    }
}

/// Accepted residual on the averaged turn angle at the returned pericenter (rad).
pub const TURN_ANGLE_ACCEPTANCE_RAD: f64 = 1e-10;

/// One side (incoming or outgoing) of the powered flyby.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HyperbolaBranch {
    pub vinf_km_s: f64,
    /// Semi-major axis (km), negative.
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
    /// Deflection this branch alone would produce, `2 asin(1/e)`.
    pub turn_angle_rad: f64,
    pub pericenter_speed_km_s: f64,
}

impl HyperbolaBranch {
    fn new(mu_km3_s2: f64, vinf_km_s: f64, rp_km: f64) -> Self {
        let elements = hyperbola_elements(mu_km3_s2, vinf_km_s, rp_km);
        Self {
            vinf_km_s,
            semi_major_axis_km: elements.semi_major_axis_km,
            eccentricity: elements.eccentricity,
            turn_angle_rad: turn_angle(elements.eccentricity),
            pericenter_speed_km_s: pericenter_speed(mu_km3_s2, rp_km, &elements),
        }
    }
}

/// Complete description of a feasible powered flyby.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlybySolution {
    /// Angle between the incoming and outgoing excess velocities, in `[0, π]`.
    pub turn_angle_rad: f64,
    pub pericenter_radius_km: f64,
    pub incoming: HyperbolaBranch,
    pub outgoing: HyperbolaBranch,
    /// Magnitude of the tangential burn at pericenter.
    pub pericenter_impulse_km_s: f64,
    /// `v⁺ₚ − v⁻ₚ`: positive for a prograde (accelerating) burn.
    pub pericenter_impulse_signed_km_s: f64,
    /// `|v∞⁺ − v∞⁻|`, the velocity change an unpowered flyby would have to supply.
    pub vinf_delta_km_s: f64,
    pub plane: FlybyPlane,
    pub iterations: usize,
}

/// Solver for the powered gravity-assist hyperbola.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlybySolver {
    pub root_finder: NewtonBisection,
    /// Number of ×10 expansions of the upper pericenter bound before giving up.
    pub max_bracket_expansions: usize,
}

impl Default for FlybySolver {
    fn default() -> Self {
        Self {
            root_finder: NewtonBisection::default(),
            max_bracket_expansions: 40,
        }
    }
}

impl FlybySolver {
    pub fn new(root_finder: NewtonBisection, max_bracket_expansions: usize) -> Self {
        Self {
            root_finder,
            max_bracket_expansions,
        }
    }

    /// Solve the flyby joining `vinf_minus` to `vinf_plus` about a body with `mu_km3_s2`.
    ///
    /// When `min_radius_km` is given, the pericenter must lie strictly above it.
    pub fn solve(
        &self,
        vinf_minus: &Vector3,
        vinf_plus: &Vector3,
        mu_km3_s2: f64,
        min_radius_km: Option<f64>,
    ) -> Result<FlybySolution, FlybyError> {
        if !(mu_km3_s2 > 0.0) || !mu_km3_s2.is_finite() {
            return Err(FlybyError::InvalidInput(
                "gravitational parameter must be positive",
            ));
        }
        if !vector::is_finite(vinf_minus) || !vector::is_finite(vinf_plus) {
            return Err(FlybyError::InvalidInput("excess velocity is not finite"));
        }
        let speed_minus = vector::norm(vinf_minus);
        let speed_plus = vector::norm(vinf_plus);
        if speed_minus == 0.0 || speed_plus == 0.0 {
            return Err(FlybyError::InvalidInput("excess velocity has zero length"));
        }

        let turn_angle_rad =
            safe_acos(vector::dot(vinf_minus, vinf_plus) / (speed_minus * speed_plus));
        if turn_angle_rad >= PI {
            return Err(InfeasibleReason::Reversal.into());
        }
        let residual = TurnAngleResidual::new(speed_minus, speed_plus, mu_km3_s2, turn_angle_rad);

        let hi = self.bracket_upper(&residual)?;
        let estimate = self
            .root_finder
            .find_root(|rp| residual.evaluate(rp), 0.0, hi)
            .map_err(InfeasibleReason::from)?;
        let rp_km = estimate.x;
        trace!(
            rp_km,
            iterations = estimate.iterations,
            turn_angle_rad,
            "flyby pericenter converged"
        );

        let residual_rad = residual.value(rp_km);
        if !(rp_km > 0.0) || !rp_km.is_finite() || residual_rad.abs() > TURN_ANGLE_ACCEPTANCE_RAD
        {
            return Err(InfeasibleReason::Unconverged {
                rp_km,
                residual_rad,
            }
            .into());
        }
        if let Some(limit_km) = min_radius_km {
            if rp_km <= limit_km {
                return Err(InfeasibleReason::BelowSafeRadius { rp_km, limit_km }.into());
            }
        }

        let incoming = HyperbolaBranch::new(mu_km3_s2, speed_minus, rp_km);
        let outgoing = HyperbolaBranch::new(mu_km3_s2, speed_plus, rp_km);
        let plane =
            FlybyPlane::from_asymptotes(vinf_minus, vinf_plus, incoming.turn_angle_rad, &POLE);

        let signed = outgoing.pericenter_speed_km_s - incoming.pericenter_speed_km_s;
        Ok(FlybySolution {
            turn_angle_rad,
            pericenter_radius_km: rp_km,
            incoming,
            outgoing,
            pericenter_impulse_km_s: signed.abs(),
            pericenter_impulse_signed_km_s: signed,
            vinf_delta_km_s: vector::norm(&vector::sub(vinf_plus, vinf_minus)),
            plane,
            iterations: estimate.iterations,
        })
    }

    /// Grow the upper pericenter bound until the residual turns negative.
    fn bracket_upper(&self, residual: &TurnAngleResidual) -> Result<f64, FlybyError> {
        let mut hi = residual.natural_scale_km();
        for _ in 0..=self.max_bracket_expansions {
            if residual.value(hi) <= 0.0 {
                return Ok(hi);
            }
            hi *= 10.0;
        }
        Err(InfeasibleReason::NoBracket {
            turn_angle_rad: residual.turn_angle_rad(),
        }
        .into())
    }
}

/// Solve with the default solver settings.
pub fn solve(
    vinf_minus: &Vector3,
    vinf_plus: &Vector3,
    mu_km3_s2: f64,
    min_radius_km: Option<f64>,
) -> Result<FlybySolution, FlybyError> {
    FlybySolver::default().solve(vinf_minus, vinf_plus, mu_km3_s2, min_radius_km)
}
