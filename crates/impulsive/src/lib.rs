//! Impulsive transfer utilities: Lambert legs between two ephemeris states.

pub mod lambert;

pub use lambert::{
    LambertLeg, LambertSettings, LambertSolverError, solve as lambert_solve, solve_leg,
};
