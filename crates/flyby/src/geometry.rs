//! Orientation of the flyby hyperbola in the reference frame.

use std::f64::consts::TAU;

use serde::Serialize;
use slingshot_core::angle::safe_acos;
use slingshot_core::vector::{self, Vector3};

/// Below this `sin i` the node line is undefined and RAAN/argument of periapsis collapse to 0.
pub const NODE_LINE_EPSILON: f64 = 1e-12;

/// Plane and apse-line orientation of the flyby.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlybyPlane {
    pub inclination_rad: f64,
    pub raan_rad: f64,
    pub arg_periapsis_rad: f64,
    /// Unit normal along `v∞⁻ × v∞⁺` (the orbital angular momentum direction).
    pub normal: Vector3,
    /// Unit vector from the body towards pericenter.
    pub pericenter_direction: Vector3,
    /// Unit vector along the spacecraft velocity at pericenter.
    pub pericenter_velocity_direction: Vector3,
}

impl FlybyPlane {
    /// Orientation of the hyperbola whose incoming asymptote is `vinf_minus`.
    ///
    /// The pericenter velocity lies `incoming_turn_angle_rad / 2` past the incoming asymptote,
    /// rotating about the plane normal. When the asymptotes are parallel the plane is undefined;
    /// the normal then falls back to any unit vector perpendicular to `vinf_minus`.
    pub fn from_asymptotes(
        vinf_minus: &Vector3,
        vinf_plus: &Vector3,
        incoming_turn_angle_rad: f64,
        pole: &Vector3,
    ) -> Self {
        let v_hat = vector::unit(vinf_minus).unwrap_or(*pole);
        let normal = vector::unit(&vector::cross(vinf_minus, vinf_plus))
            .unwrap_or_else(|| any_perpendicular(&v_hat));

        let pericenter_velocity_direction =
            vector::rotate_about(&v_hat, &normal, 0.5 * incoming_turn_angle_rad);
        let pericenter_direction = vector::unit(&vector::cross(
            &pericenter_velocity_direction,
            &normal,
        ))
        .unwrap_or(v_hat);

        let (inclination_rad, raan_rad, arg_periapsis_rad) =
            orientation_angles(&normal, &pericenter_direction, pole);

        Self {
            inclination_rad,
            raan_rad,
            arg_periapsis_rad,
            normal,
            pericenter_direction,
            pericenter_velocity_direction,
        }
    }
}

/// Inclination, RAAN and argument of periapsis from the plane normal and apse direction.
pub fn orientation_angles(
    normal: &Vector3,
    pericenter: &Vector3,
    pole: &Vector3,
) -> (f64, f64, f64) {
    let inclination = safe_acos(vector::dot(pole, normal));

    let node = vector::cross(pole, normal);
    let node_norm = vector::norm(&node);
    if node_norm < NODE_LINE_EPSILON {
        return (inclination, 0.0, 0.0);
    }
    let node_hat = vector::scale(&node, 1.0 / node_norm);

    // Reference x-axis lies in the plane perpendicular to the pole.
    let x_axis = reference_x_axis(pole);
    let y_axis = vector::cross(pole, &x_axis);
    let raan = signed_quadrant(
        vector::dot(&node_hat, &x_axis),
        vector::dot(&node_hat, &y_axis),
    );

    // Argument of periapsis grows from the node in the direction of motion.
    let cos_w = vector::dot(&node_hat, pericenter);
    let sin_w = vector::dot(&vector::cross(&node_hat, pericenter), normal);
    let arg_periapsis = signed_quadrant(cos_w, sin_w);

    (inclination, raan, arg_periapsis)
}

/// `acos(cos)` when the sine component is non-negative, `2π − acos(cos)` otherwise.
fn signed_quadrant(cosine: f64, sine: f64) -> f64 {
    let angle = safe_acos(cosine);
    if sine >= 0.0 {
        angle
    } else {
        let wrapped = TAU - angle;
        if wrapped >= TAU { 0.0 } else { wrapped }
    }
}

fn reference_x_axis(pole: &Vector3) -> Vector3 {
    let candidate = vector::sub(&[1.0, 0.0, 0.0], &vector::scale(pole, pole[0]));
    vector::unit(&candidate).unwrap_or_else(|| any_perpendicular(pole))
}

fn any_perpendicular(v: &Vector3) -> Vector3 {
    let helper = if v[0].abs() < 0.9 {
        [1.0, 0.0, 0.0]
    } else {
        [0.0, 1.0, 0.0]
    };
    vector::unit(&vector::cross(v, &helper)).unwrap_or([0.0, 0.0, 1.0])
}
