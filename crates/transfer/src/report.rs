//! Evaluation outputs.

use serde::Serialize;
use slingshot_core::vector::Vector3;
use slingshot_flyby::FlybySolution;

/// How much of the evaluation to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DetailLevel {
    /// Only the total delta-v.
    #[default]
    TotalOnly,
    /// Total plus velocities, itemised costs, and the flyby solution.
    Full,
}

/// Raw Lambert velocities of both legs, heliocentric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LambertVelocities {
    pub leg1_departure_km_s: Vector3,
    pub leg1_arrival_km_s: Vector3,
    pub leg2_departure_km_s: Vector3,
    pub leg2_arrival_km_s: Vector3,
}

/// Itemised delta-v. `total = departure + arrival + powered_flyby`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeltaVComponents {
    pub departure_km_s: f64,
    pub arrival_km_s: f64,
    /// `|v∞⁺ − v∞⁻|` at the flyby body; reported only, not paid.
    pub unpowered_flyby_km_s: f64,
    pub powered_flyby_km_s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransferDiagnostics {
    pub vinf_in_km_s: Vector3,
    pub vinf_out_km_s: Vector3,
    pub lambert: LambertVelocities,
    pub delta_v: DeltaVComponents,
    pub turn_angle_rad: f64,
    pub flyby: FlybySolution,
}

/// Result of one transfer evaluation.
///
/// A report is either complete or entirely empty: infeasible evaluations carry no partial data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransferCostReport {
    pub total_delta_v_km_s: Option<f64>,
    pub diagnostics: Option<TransferDiagnostics>,
}

impl TransferCostReport {
    pub(crate) fn feasible(
        total_delta_v_km_s: f64,
        diagnostics: Option<TransferDiagnostics>,
    ) -> Self {
        Self {
            total_delta_v_km_s: Some(total_delta_v_km_s),
            diagnostics,
        }
    }

    /// The report used for every infeasible evaluation.
    pub fn infeasible() -> Self {
        Self {
            total_delta_v_km_s: None,
            diagnostics: None,
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.total_delta_v_km_s.is_some()
    }

    /// Total delta-v, or NaN when infeasible; convenient as a minimisation objective.
    pub fn total_or_nan(&self) -> f64 {
        self.total_delta_v_km_s.unwrap_or(f64::NAN)
    }
}
