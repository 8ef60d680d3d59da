//! Kepler's equation and the elements-to-Cartesian state conversion.

use slingshot_core::angle::wrap_pi;

use crate::{EphemerisError, KeplerianElements, StateVector};

const KEPLER_TOLERANCE: f64 = 1e-14;
const KEPLER_MAX_ITERATIONS: usize = 50;

/// Solve `E - e sin E = M` for the eccentric anomaly of an elliptic orbit.
pub fn solve_kepler(mean_anomaly_rad: f64, eccentricity: f64) -> Result<f64, EphemerisError> {
    if !(0.0..1.0).contains(&eccentricity) || !mean_anomaly_rad.is_finite() {
        return Err(EphemerisError::KeplerNonConvergence {
            mean_anomaly_rad,
            eccentricity,
        });
    }

    let m = wrap_pi(mean_anomaly_rad);
    let mut e_anomaly = if eccentricity > 0.8 {
        std::f64::consts::PI.copysign(m)
    } else {
        m + eccentricity * m.sin()
    };

    for _ in 0..KEPLER_MAX_ITERATIONS {
        let (sin, cos) = e_anomaly.sin_cos();
        let delta = (e_anomaly - eccentricity * sin - m) / (1.0 - eccentricity * cos);
        e_anomaly -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            return Ok(e_anomaly);
        }
    }

    Err(EphemerisError::KeplerNonConvergence {
        mean_anomaly_rad,
        eccentricity,
    })
}

/// True anomaly corresponding to an eccentric anomaly.
pub fn true_anomaly_from_eccentric(eccentric_anomaly_rad: f64, eccentricity: f64) -> f64 {
    let half = 0.5 * eccentric_anomaly_rad;
    2.0 * ((1.0 + eccentricity).sqrt() * half.sin())
        .atan2((1.0 - eccentricity).sqrt() * half.cos())
}

/// Convert closed-orbit Keplerian elements to a Cartesian state about a body with `mu_km3_s2`.
pub fn kepler_to_state(
    elements: &KeplerianElements,
    mu_km3_s2: f64,
) -> Result<StateVector, EphemerisError> {
    let a = elements.semi_major_axis_km;
    let e = elements.eccentricity;
    if !(a > 0.0) || !(0.0..1.0).contains(&e) {
        return Err(EphemerisError::OpenOrbit {
            semi_major_axis_km: a,
            eccentricity: e,
        });
    }

    let p = a * (1.0 - e * e);
    let (sin_nu, cos_nu) = elements.true_anomaly_rad.sin_cos();
    let r = p / (1.0 + e * cos_nu);
    let speed_factor = (mu_km3_s2 / p).sqrt();

    // Perifocal frame.
    let r_pf = [r * cos_nu, r * sin_nu];
    let v_pf = [-speed_factor * sin_nu, speed_factor * (e + cos_nu)];

    let (sin_o, cos_o) = elements.raan_rad.sin_cos();
    let (sin_w, cos_w) = elements.arg_periapsis_rad.sin_cos();
    let (sin_i, cos_i) = elements.inclination_rad.sin_cos();

    // First two columns of R3(-Ω) R1(-i) R3(-ω).
    let p_hat = [
        cos_o * cos_w - sin_o * sin_w * cos_i,
        sin_o * cos_w + cos_o * sin_w * cos_i,
        sin_w * sin_i,
    ];
    let q_hat = [
        -cos_o * sin_w - sin_o * cos_w * cos_i,
        -sin_o * sin_w + cos_o * cos_w * cos_i,
        cos_w * sin_i,
    ];

    let combine = |x: [f64; 2]| {
        [
            p_hat[0] * x[0] + q_hat[0] * x[1],
            p_hat[1] * x[0] + q_hat[1] * x[1],
            p_hat[2] * x[0] + q_hat[2] * x[1],
        ]
    };

    Ok(StateVector {
        position_km: combine(r_pf),
        velocity_km_s: combine(v_pf),
    })
}
