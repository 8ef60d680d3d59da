//! Core units, constants, and shared primitives for the slingshot workspace.

/// Physical constants expressed in kilometre/second units unless stated otherwise.
pub mod constants {
    /// Gravitational parameter of the Sun (km³/s²).
    pub const MU_SUN: f64 = 1.327_124_400_18e11;
    /// Kilometres per astronomical unit.
    pub const AU_KM: f64 = 149_597_870.7;
    /// Seconds per Julian day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Days per Julian century.
    pub const DAYS_PER_CENTURY: f64 = 36_525.0;
    /// Julian date of the MJD2000 origin (2000-01-01 00:00).
    pub const MJD2000_JULIAN_DATE: f64 = 2_451_544.5;
    /// Julian date of the J2000 epoch (2000-01-01 12:00).
    pub const J2000_JULIAN_DATE: f64 = 2_451_545.0;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert astronomical units to kilometres.
    #[inline]
    pub fn au_to_km(v: f64) -> f64 {
        v * super::constants::AU_KM
    }
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use super::constants::{
        DAYS_PER_CENTURY, J2000_JULIAN_DATE, MJD2000_JULIAN_DATE, SECONDS_PER_DAY,
    };

    /// Convert days to seconds.
    #[inline]
    pub fn days_to_seconds(days: f64) -> f64 {
        days * SECONDS_PER_DAY
    }

    /// Julian date for an epoch given in MJD2000 days.
    #[inline]
    pub fn mjd2000_to_julian_date(mjd2000: f64) -> f64 {
        mjd2000 + MJD2000_JULIAN_DATE
    }

    /// Julian centuries elapsed since J2000 for an epoch given in MJD2000 days.
    #[inline]
    pub fn julian_centuries_since_j2000(mjd2000: f64) -> f64 {
        (mjd2000_to_julian_date(mjd2000) - J2000_JULIAN_DATE) / DAYS_PER_CENTURY
    }
}

/// Angle helpers.
pub mod angle {
    use std::f64::consts::TAU;

    /// Wrap an angle into `[0, 2π)`.
    #[inline]
    pub fn wrap_two_pi(angle_rad: f64) -> f64 {
        let wrapped = angle_rad.rem_euclid(TAU);
        if wrapped >= TAU { 0.0 } else { wrapped }
    }

    /// Wrap an angle into `[-π, π)`.
    #[inline]
    pub fn wrap_pi(angle_rad: f64) -> f64 {
        wrap_two_pi(angle_rad + std::f64::consts::PI) - std::f64::consts::PI
    }

    /// `acos` with its argument clamped to `[-1, 1]` so rounding never yields NaN.
    #[inline]
    pub fn safe_acos(cosine: f64) -> f64 {
        cosine.clamp(-1.0, 1.0).acos()
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector in kilometres or km/s depending on context.
    pub type Vector3 = [f64; 3];

    /// Unit vector along +z, the reference pole of the ecliptic frame.
    pub const POLE: Vector3 = [0.0, 0.0, 1.0];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Cross product `a × b`.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Normalize a vector, returning `None` for zero-length or non-finite input.
    #[inline]
    pub fn unit(v: &Vector3) -> Option<Vector3> {
        let n = norm(v);
        if n > 0.0 && n.is_finite() {
            Some(scale(v, 1.0 / n))
        } else {
            None
        }
    }

    /// True when every component is finite.
    #[inline]
    pub fn is_finite(v: &Vector3) -> bool {
        v.iter().all(|c| c.is_finite())
    }

    /// Angle between two non-zero vectors in `[0, π]`.
    pub fn angle_between(a: &Vector3, b: &Vector3) -> f64 {
        super::angle::safe_acos(dot(a, b) / (norm(a) * norm(b)))
    }

    /// Rotate `v` about the unit `axis` by `angle_rad` (right-hand rule, Rodrigues formula).
    pub fn rotate_about(v: &Vector3, axis: &Vector3, angle_rad: f64) -> Vector3 {
        let (sin, cos) = angle_rad.sin_cos();
        let k_cross_v = cross(axis, v);
        let k_dot_v = dot(axis, v);
        [
            v[0] * cos + k_cross_v[0] * sin + axis[0] * k_dot_v * (1.0 - cos),
            v[1] * cos + k_cross_v[1] * sin + axis[1] * k_dot_v * (1.0 - cos),
            v[2] * cos + k_cross_v[2] * sin + axis[2] * k_dot_v * (1.0 - cos),
        ]
    }
}
