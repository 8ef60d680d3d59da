//! Departure → flyby → arrival cost evaluation.

use serde::Serialize;
use slingshot_core::constants::MU_SUN;
use slingshot_core::time::days_to_seconds;
use slingshot_core::vector;
use slingshot_ephem::{Body, EphemerisError, EphemerisProvider, MeanElementEphemeris};
use slingshot_flyby::{FlybyError, FlybySolver};
use slingshot_impulsive::{LambertSettings, LambertSolverError, solve_leg};
use thiserror::Error;
use tracing::debug;

use crate::report::{
    DeltaVComponents, DetailLevel, LambertVelocities, TransferCostReport, TransferDiagnostics,
};

/// Which Lambert arc failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Leg {
    DepartureToFlyby,
    FlybyToArrival,
}

impl std::fmt::Display for Leg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Leg::DepartureToFlyby => f.write_str("departure→flyby"),
            Leg::FlybyToArrival => f.write_str("flyby→arrival"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("ephemeris lookup failed: {0}")]
    Ephemeris(#[from] EphemerisError),
    #[error("{leg} lambert leg failed: {source}")]
    Lambert {
        leg: Leg,
        #[source]
        source: LambertSolverError,
    },
    #[error("flyby failed: {0}")]
    Flyby(#[from] FlybyError),
}

/// Epochs, bodies, and constants for one evaluation. Epochs are MJD2000 days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransferRequest {
    pub departure_epoch_mjd2000: f64,
    pub flyby_epoch_mjd2000: f64,
    pub arrival_epoch_mjd2000: f64,
    pub departure_body: Body,
    pub flyby_body: Body,
    pub arrival_body: Body,
    pub flyby_mu_km3_s2: f64,
    pub central_mu_km3_s2: f64,
    /// Pericenter must lie strictly above this radius; 0 only enforces a positive pericenter.
    pub flyby_min_radius_km: f64,
    pub detail: DetailLevel,
}

impl TransferRequest {
    /// Heliocentric request using the built-in constants of the flyby body.
    pub fn new(bodies: [Body; 3], epochs_mjd2000: [f64; 3], detail: DetailLevel) -> Self {
        let [departure_body, flyby_body, arrival_body] = bodies;
        let [departure_epoch_mjd2000, flyby_epoch_mjd2000, arrival_epoch_mjd2000] = epochs_mjd2000;
        Self {
            departure_epoch_mjd2000,
            flyby_epoch_mjd2000,
            arrival_epoch_mjd2000,
            departure_body,
            flyby_body,
            arrival_body,
            flyby_mu_km3_s2: flyby_body.mu_km3_s2(),
            central_mu_km3_s2: MU_SUN,
            flyby_min_radius_km: 0.0,
            detail,
        }
    }

    pub fn with_min_radius(mut self, flyby_min_radius_km: f64) -> Self {
        self.flyby_min_radius_km = flyby_min_radius_km;
        self
    }

    pub fn with_epochs(mut self, epochs_mjd2000: [f64; 3]) -> Self {
        [
            self.departure_epoch_mjd2000,
            self.flyby_epoch_mjd2000,
            self.arrival_epoch_mjd2000,
        ] = epochs_mjd2000;
        self
    }
}

/// Stateless evaluator; safe to share across threads when the provider is.
#[derive(Debug, Clone)]
pub struct TransferCostEvaluator<E> {
    ephemeris: E,
    flyby: FlybySolver,
    lambert: LambertSettings,
}

impl Default for TransferCostEvaluator<MeanElementEphemeris> {
    fn default() -> Self {
        Self::new(MeanElementEphemeris::new())
    }
}

impl<E: EphemerisProvider> TransferCostEvaluator<E> {
    pub fn new(ephemeris: E) -> Self {
        Self {
            ephemeris,
            flyby: FlybySolver::default(),
            lambert: LambertSettings::default(),
        }
    }

    pub fn with_flyby_solver(mut self, flyby: FlybySolver) -> Self {
        self.flyby = flyby;
        self
    }

    pub fn with_lambert_settings(mut self, lambert: LambertSettings) -> Self {
        self.lambert = lambert;
        self
    }

    pub fn ephemeris(&self) -> &E {
        &self.ephemeris
    }

    /// Evaluate a request, folding every failure into [`TransferCostReport::infeasible`].
    pub fn evaluate(&self, request: &TransferRequest) -> TransferCostReport {
        match self.try_evaluate(request) {
            Ok(report) => report,
            Err(err) => {
                debug!(
                    departure = request.departure_epoch_mjd2000,
                    flyby = request.flyby_epoch_mjd2000,
                    arrival = request.arrival_epoch_mjd2000,
                    error = %err,
                    "transfer infeasible"
                );
                TransferCostReport::infeasible()
            }
        }
    }

    /// Evaluate a request, surfacing the first failure.
    pub fn try_evaluate(
        &self,
        request: &TransferRequest,
    ) -> Result<TransferCostReport, TransferError> {
        let mu = request.central_mu_km3_s2;
        let departure = self.ephemeris.state(
            request.departure_epoch_mjd2000,
            request.departure_body,
            mu,
        )?;
        let flyby = self
            .ephemeris
            .state(request.flyby_epoch_mjd2000, request.flyby_body, mu)?;
        let arrival = self.ephemeris.state(
            request.arrival_epoch_mjd2000,
            request.arrival_body,
            mu,
        )?;

        let departure_s = days_to_seconds(request.departure_epoch_mjd2000);
        let flyby_s = days_to_seconds(request.flyby_epoch_mjd2000);
        let arrival_s = days_to_seconds(request.arrival_epoch_mjd2000);

        let leg1 = solve_leg(
            departure.position_km,
            flyby.position_km,
            departure.velocity_km_s,
            flyby.velocity_km_s,
            flyby_s - departure_s,
            mu,
            &self.lambert,
        )
        .map_err(|source| TransferError::Lambert {
            leg: Leg::DepartureToFlyby,
            source,
        })?;
        let leg2 = solve_leg(
            flyby.position_km,
            arrival.position_km,
            flyby.velocity_km_s,
            arrival.velocity_km_s,
            arrival_s - flyby_s,
            mu,
            &self.lambert,
        )
        .map_err(|source| TransferError::Lambert {
            leg: Leg::FlybyToArrival,
            source,
        })?;

        let vinf_in = vector::sub(&leg1.arrival_velocity_km_s, &flyby.velocity_km_s);
        let vinf_out = vector::sub(&leg2.departure_velocity_km_s, &flyby.velocity_km_s);

        let solution = self.flyby.solve(
            &vinf_in,
            &vinf_out,
            request.flyby_mu_km3_s2,
            Some(request.flyby_min_radius_km),
        )?;

        let delta_v = DeltaVComponents {
            departure_km_s: leg1.departure_delta_v_km_s,
            arrival_km_s: leg2.arrival_delta_v_km_s,
            unpowered_flyby_km_s: solution.vinf_delta_km_s,
            powered_flyby_km_s: solution.pericenter_impulse_km_s,
        };
        let total = delta_v.departure_km_s + delta_v.arrival_km_s + delta_v.powered_flyby_km_s;

        let diagnostics = match request.detail {
            DetailLevel::TotalOnly => None,
            DetailLevel::Full => Some(TransferDiagnostics {
                vinf_in_km_s: vinf_in,
                vinf_out_km_s: vinf_out,
                lambert: LambertVelocities {
                    leg1_departure_km_s: leg1.departure_velocity_km_s,
                    leg1_arrival_km_s: leg1.arrival_velocity_km_s,
                    leg2_departure_km_s: leg2.departure_velocity_km_s,
                    leg2_arrival_km_s: leg2.arrival_velocity_km_s,
                },
                delta_v,
                turn_angle_rad: solution.turn_angle_rad,
                flyby: solution,
            }),
        };

        Ok(TransferCostReport::feasible(total, diagnostics))
    }
}
