//! Transfer cost evaluation for a departure → gravity assist → arrival sequence.
//!
//! The evaluator chains two heliocentric Lambert arcs around a powered flyby and reports the
//! propulsive cost. It is meant to be called many times from an outer search over epochs, so
//! [`TransferCostEvaluator::evaluate`] never fails: an infeasible combination produces an empty
//! report instead of an error.

pub mod evaluator;
pub mod report;

pub use evaluator::{Leg, TransferCostEvaluator, TransferError, TransferRequest};
pub use report::{
    DeltaVComponents, DetailLevel, LambertVelocities, TransferCostReport, TransferDiagnostics,
};
pub use slingshot_flyby as flyby;
pub use slingshot_impulsive as impulsive;
