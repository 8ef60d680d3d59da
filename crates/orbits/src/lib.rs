//! Orbit utility helpers for planet-relative hyperbolic passes.
//!
//! All relations are closed-form two-body results. A hyperbola is described by a negative
//! semi-major axis and an eccentricity above one; both follow from the excess speed and the
//! pericenter radius alone.

use serde::Serialize;

/// Semi-major axis and eccentricity of a planar hyperbola.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HyperbolaElements {
    /// Semi-major axis (km), negative for hyperbolic orbits.
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
}

/// Eccentricity of the hyperbola with excess speed `vinf_km_s` and pericenter `rp_km`.
#[inline]
pub fn hyperbolic_eccentricity(mu_km3_s2: f64, vinf_km_s: f64, rp_km: f64) -> f64 {
    1.0 + rp_km * vinf_km_s * vinf_km_s / mu_km3_s2
}

/// Semi-major axis and eccentricity from `(mu, v∞, rp)`.
pub fn hyperbola_elements(mu_km3_s2: f64, vinf_km_s: f64, rp_km: f64) -> HyperbolaElements {
    HyperbolaElements {
        semi_major_axis_km: -mu_km3_s2 / (vinf_km_s * vinf_km_s),
        eccentricity: hyperbolic_eccentricity(mu_km3_s2, vinf_km_s, rp_km),
    }
}

/// Total deflection between the asymptotes of a hyperbola, `2 asin(1/e)`.
#[inline]
pub fn turn_angle(eccentricity: f64) -> f64 {
    2.0 * (1.0 / eccentricity).asin()
}

/// Derivative of [`turn_angle`] with respect to pericenter radius for a fixed excess speed.
///
/// Always negative: a wider pass bends the trajectory less.
pub fn turn_angle_rp_derivative(mu_km3_s2: f64, vinf_km_s: f64, rp_km: f64) -> f64 {
    let v2 = vinf_km_s * vinf_km_s;
    let e = hyperbolic_eccentricity(mu_km3_s2, vinf_km_s, rp_km);
    -2.0 * v2 / (mu_km3_s2 * e * (e * e - 1.0).sqrt())
}

/// Vis-viva speed at radius `r_km` on a conic with semi-major axis `a_km`.
#[inline]
pub fn vis_viva_speed(mu_km3_s2: f64, r_km: f64, a_km: f64) -> f64 {
    (mu_km3_s2 * (2.0 / r_km - 1.0 / a_km)).sqrt()
}

/// Pericenter speed of a hyperbola given its elements.
#[inline]
pub fn pericenter_speed(mu_km3_s2: f64, rp_km: f64, elements: &HyperbolaElements) -> f64 {
    vis_viva_speed(mu_km3_s2, rp_km, elements.semi_major_axis_km)
}
