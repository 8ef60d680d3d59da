//! Turn-angle matching equation for the shared pericenter radius.

use slingshot_orbits::{hyperbolic_eccentricity, turn_angle, turn_angle_rp_derivative};

/// Residual returned for non-physical (non-positive) pericenter candidates.
///
/// It is positive, matching the sign of the residual as `rp → 0⁺`, so a bracket anchored at zero
/// stays valid.
pub const NON_PHYSICAL_RESIDUAL: f64 = 1.0e3;

/// `f(rp) = ½ (δ(rp, v∞⁻) + δ(rp, v∞⁺)) − δ_required`, with `δ(rp, v) = 2 asin(1/e(rp, v))`.
///
/// `f` decreases monotonically from `π − δ_required` at `rp → 0⁺` to `−δ_required` as
/// `rp → ∞`, so a root exists for every required deflection strictly inside `(0, π)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnAngleResidual {
    speed_minus_km_s: f64,
    speed_plus_km_s: f64,
    mu_km3_s2: f64,
    turn_angle_rad: f64,
}

impl TurnAngleResidual {
    pub fn new(
        speed_minus_km_s: f64,
        speed_plus_km_s: f64,
        mu_km3_s2: f64,
        turn_angle_rad: f64,
    ) -> Self {
        Self {
            speed_minus_km_s,
            speed_plus_km_s,
            mu_km3_s2,
            turn_angle_rad,
        }
    }

    pub fn turn_angle_rad(&self) -> f64 {
        self.turn_angle_rad
    }

    /// Pericenter at which the faster branch reaches `e = 2`; a sensible first upper bound.
    pub fn natural_scale_km(&self) -> f64 {
        let v_max = self.speed_minus_km_s.max(self.speed_plus_km_s);
        self.mu_km3_s2 / (v_max * v_max)
    }

    /// Averaged branch deflection at `rp_km`.
    pub fn mean_turn_angle(&self, rp_km: f64) -> f64 {
        let e_minus = hyperbolic_eccentricity(self.mu_km3_s2, self.speed_minus_km_s, rp_km);
        let e_plus = hyperbolic_eccentricity(self.mu_km3_s2, self.speed_plus_km_s, rp_km);
        0.5 * (turn_angle(e_minus) + turn_angle(e_plus))
    }

    pub fn value(&self, rp_km: f64) -> f64 {
        if rp_km <= 0.0 {
            return NON_PHYSICAL_RESIDUAL;
        }
        self.mean_turn_angle(rp_km) - self.turn_angle_rad
    }

    /// Residual and its derivative with respect to `rp_km`.
    pub fn evaluate(&self, rp_km: f64) -> (f64, f64) {
        if rp_km <= 0.0 {
            return (NON_PHYSICAL_RESIDUAL, 0.0);
        }
        let derivative = 0.5
            * (turn_angle_rp_derivative(self.mu_km3_s2, self.speed_minus_km_s, rp_km)
                + turn_angle_rp_derivative(self.mu_km3_s2, self.speed_plus_km_s, rp_km));
        (self.value(rp_km), derivative)
    }
}
