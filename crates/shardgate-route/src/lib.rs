//! Table routing for the shardgate proxy: the `RouteAlgorithm` strategy
//! contract, the `RouteInfo` value it refines, and the date-bucketing router.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod algorithm;
pub mod clock;
pub mod config;
pub mod discovery;
pub mod error;
pub mod obs;
pub mod pattern;
pub mod route;

///
/// CONSTANTS
///

/// Separator placed between a logical table name and its bucket label.
pub const TABLE_LABEL_SEPARATOR: char = '_';

///
/// Prelude
///
/// Prelude contains the routing vocabulary a query planner needs.
/// Metrics and pattern internals are not re-exported here.
///

pub mod prelude {
    pub use crate::{
        algorithm::{AlgorithmKind, RouteAlgorithm, auto_date::DateAutoRouter},
        clock::{Clock, FixedClock, SystemClock},
        config::{AlgorithmConfig, TableConfig},
        discovery::{DiscoveryError, SchemaDiscovery, StaticCatalog, TableNamePattern},
        error::RouteError,
        route::{RouteContext, RouteInfo},
    };
}
