//! Planetary ephemerides for patched-conic transfer evaluation.
//!
//! Providers answer one question: the osculating heliocentric Keplerian elements of a body at an
//! epoch. The shipped [`MeanElementEphemeris`] evaluates analytic mean elements; anything else
//! (tabulated, SPICE-backed, test doubles) plugs in through [`EphemerisProvider`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod kepler;
pub mod mean_elements;

pub use kepler::{kepler_to_state, solve_kepler};
pub use mean_elements::MeanElementEphemeris;

/// Position and velocity relative to the central body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateVector {
    pub position_km: [f64; 3],
    pub velocity_km_s: [f64; 3],
}

/// Classical orbital elements. Angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeplerianElements {
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
    pub inclination_rad: f64,
    pub raan_rad: f64,
    pub arg_periapsis_rad: f64,
    pub true_anomaly_rad: f64,
}

/// Errors surfaced by ephemeris providers and the state converter.
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("unknown body id {0}")]
    UnknownBodyId(u8),
    #[error("unknown body name `{0}`")]
    UnknownBodyName(String),
    #[error("body {body} has no ephemeris in this provider")]
    Unsupported { body: Body },
    #[error("Kepler's equation did not converge (M = {mean_anomaly_rad}, e = {eccentricity})")]
    KeplerNonConvergence {
        mean_anomaly_rad: f64,
        eccentricity: f64,
    },
    #[error("elements do not describe a closed orbit (a = {semi_major_axis_km} km, e = {eccentricity})")]
    OpenOrbit {
        semi_major_axis_km: f64,
        eccentricity: f64,
    },
    #[error("non-finite epoch {0}")]
    InvalidEpoch(f64),
}

/// Source of heliocentric Keplerian elements for solar-system bodies.
///
/// Implementations must be deterministic: the same `(epoch, body)` always yields the same
/// elements. Epochs are MJD2000 days.
pub trait EphemerisProvider {
    /// Osculating elements of `body` at `epoch_mjd2000`.
    fn elements(&self, epoch_mjd2000: f64, body: Body) -> Result<KeplerianElements, EphemerisError>;

    /// Cartesian state of `body` relative to the central body with parameter `mu_km3_s2`.
    fn state(
        &self,
        epoch_mjd2000: f64,
        body: Body,
        mu_km3_s2: f64,
    ) -> Result<StateVector, EphemerisError> {
        let elements = self.elements(epoch_mjd2000, body)?;
        kepler_to_state(&elements, mu_km3_s2)
    }
}

impl<T: EphemerisProvider + ?Sized> EphemerisProvider for &T {
    fn elements(
        &self,
        epoch_mjd2000: f64,
        body: Body,
    ) -> Result<KeplerianElements, EphemerisError> {
        (**self).elements(epoch_mjd2000, body)
    }
}

/// Solar-system bodies addressable by the ephemeris, numbered outward from the Sun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Mercury,
    Venus,
    /// Earth–Moon barycentre for heliocentric purposes.
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    pub const ALL: [Body; 9] = [
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    /// Numeric identifier (1 = Mercury … 9 = Pluto).
    pub fn id(self) -> u8 {
        match self {
            Body::Mercury => 1,
            Body::Venus => 2,
            Body::Earth => 3,
            Body::Mars => 4,
            Body::Jupiter => 5,
            Body::Saturn => 6,
            Body::Uranus => 7,
            Body::Neptune => 8,
            Body::Pluto => 9,
        }
    }

    pub fn from_id(id: u8) -> Result<Self, EphemerisError> {
        Body::ALL
            .iter()
            .copied()
            .find(|body| body.id() == id)
            .ok_or(EphemerisError::UnknownBodyId(id))
    }

    pub fn name(self) -> &'static str {
        match self {
            Body::Mercury => "MERCURY",
            Body::Venus => "VENUS",
            Body::Earth => "EARTH",
            Body::Mars => "MARS",
            Body::Jupiter => "JUPITER",
            Body::Saturn => "SATURN",
            Body::Uranus => "URANUS",
            Body::Neptune => "NEPTUNE",
            Body::Pluto => "PLUTO",
        }
    }

    /// Gravitational parameter (km³/s²).
    pub fn mu_km3_s2(self) -> f64 {
        match self {
            Body::Mercury => 22_031.868,
            Body::Venus => 324_858.592,
            Body::Earth => 398_600.435,
            Body::Mars => 42_828.375,
            Body::Jupiter => 126_712_764.1,
            Body::Saturn => 37_940_584.8,
            Body::Uranus => 5_794_556.4,
            Body::Neptune => 6_836_527.1,
            Body::Pluto => 975.5,
        }
    }

    /// Mean equatorial radius (km).
    pub fn radius_km(self) -> f64 {
        match self {
            Body::Mercury => 2_439.7,
            Body::Venus => 6_051.8,
            Body::Earth => 6_378.137,
            Body::Mars => 3_396.19,
            Body::Jupiter => 71_492.0,
            Body::Saturn => 60_268.0,
            Body::Uranus => 25_559.0,
            Body::Neptune => 24_764.0,
            Body::Pluto => 1_188.3,
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = EphemerisError;

    /// Accepts a case-insensitive name or the numeric identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(id) = trimmed.parse::<u8>() {
            return Body::from_id(id);
        }
        let upper = trimmed.to_ascii_uppercase();
        let name = upper
            .strip_suffix(" BARYCENTER")
            .unwrap_or(upper.as_str());
        Body::ALL
            .iter()
            .copied()
            .find(|body| body.name() == name)
            .ok_or_else(|| EphemerisError::UnknownBodyName(s.to_string()))
    }
}
