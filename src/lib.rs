//! Powered gravity-assist transfer costing.
//!
//! The workspace crates are re-exported here so front-ends and tests can depend on a single
//! package: [`flyby`] solves the pericenter impulse for a pair of excess velocities, and
//! [`transfer`] chains two Lambert arcs around it to price a departure → flyby → arrival
//! sequence.

pub use slingshot_config as config;
pub use slingshot_core as common;
pub use slingshot_ephem as ephem;
pub use slingshot_export as export;
pub use slingshot_flyby as flyby;
pub use slingshot_impulsive as impulsive;
pub use slingshot_orbits as orbits;
pub use slingshot_transfer as transfer;

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
