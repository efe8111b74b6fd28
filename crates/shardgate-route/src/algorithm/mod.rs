//! Sharding strategies.
//!
//! Every scheme implements `RouteAlgorithm`; the planner resolves one
//! algorithm per logical table at configuration time and then calls it
//! from any number of threads.

pub mod auto_date;

use crate::{
    config::{AlgorithmConfig, TableConfig},
    error::RouteError,
    route::{RouteContext, RouteInfo},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};

///
/// RouteAlgorithm
///
/// Strategy contract shared by all sharding schemes. Implementations are
/// immutable after `configure`, so routing calls never synchronize.
///

pub trait RouteAlgorithm: Send + Sync + fmt::Debug {
    /// Build the algorithm from its options; malformed options fail here,
    /// never at query time.
    fn configure(config: &AlgorithmConfig) -> Result<Self, RouteError>
    where
        Self: Sized;

    /// Resolve one shard-key value to one concrete table.
    fn calculate(
        &self,
        table: &TableConfig,
        route: RouteInfo,
        value: &str,
    ) -> Result<RouteInfo, RouteError>;

    /// Resolve a closed value interval to the routes covering it.
    /// A missing bound takes the other bound's value.
    fn calculate_range(
        &self,
        table: &TableConfig,
        routes: Vec<RouteInfo>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<RouteInfo>, RouteError>;

    /// Resolve a route when the query supplied no shard-key value.
    fn default_route(
        &self,
        table: &TableConfig,
        route: RouteInfo,
        ctx: &RouteContext<'_>,
    ) -> Result<RouteInfo, RouteError>;

    /// Routes that must physically exist now, plus lookahead.
    fn route_list_for_create(
        &self,
        table: &TableConfig,
        routes: Vec<RouteInfo>,
        ctx: &RouteContext<'_>,
    ) -> Result<Vec<RouteInfo>, RouteError>;

    /// Full fan-out for a query with no usable shard-key filter.
    fn all_route_list(
        &self,
        table: &TableConfig,
        routes: Vec<RouteInfo>,
        ctx: &RouteContext<'_>,
    ) -> Result<Vec<RouteInfo>, RouteError>;
}

///
/// AlgorithmKind
///
/// Registry of sharding schemes selectable from configuration.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmKind {
    AutoDate,
}

impl AlgorithmKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AutoDate => "auto-date",
        }
    }

    /// Configure the algorithm named by `config.kind`.
    pub fn build(config: &AlgorithmConfig) -> Result<Arc<dyn RouteAlgorithm>, RouteError> {
        let algorithm: Arc<dyn RouteAlgorithm> = match config.kind {
            Self::AutoDate => Arc::new(auto_date::DateAutoRouter::configure(config)?),
        };

        Ok(algorithm)
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto-date" => Ok(Self::AutoDate),
            other => Err(RouteError::configuration(
                "kind",
                format!("unknown route algorithm '{other}'"),
            )),
        }
    }
}

/// Cross product of routes and bucket labels, in (route, label) order.
/// Every output entry is an independent copy.
#[must_use]
pub fn fan_out(routes: &[RouteInfo], labels: &[String]) -> Vec<RouteInfo> {
    let mut out = Vec::with_capacity(routes.len() * labels.len());

    for route in routes {
        for label in labels {
            let mut copy = route.clone();
            copy.apply_label(label);
            out.push(copy);
        }
    }

    out
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FORMAT_PATTERN;

    #[test]
    fn kind_names_round_trip() {
        assert_eq!("auto-date".parse::<AlgorithmKind>().unwrap(), AlgorithmKind::AutoDate);
        assert_eq!(AlgorithmKind::AutoDate.to_string(), "auto-date");

        let err = "modulo".parse::<AlgorithmKind>().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn build_surfaces_configuration_errors() {
        let missing = AlgorithmConfig::new(AlgorithmKind::AutoDate);
        assert!(AlgorithmKind::build(&missing).unwrap_err().is_configuration());

        let valid = missing.with_param(FORMAT_PATTERN, "yyyyMM");
        assert!(AlgorithmKind::build(&valid).is_ok());
    }

    #[test]
    fn fan_out_is_route_major_and_sized_n_times_m() {
        let routes = vec![
            RouteInfo::new("g1", "shop", "orders"),
            RouteInfo::new("g2", "shop", "orders"),
        ];
        let labels = vec!["202401".to_string(), "202402".to_string(), "202403".to_string()];

        let out = fan_out(&routes, &labels);
        let names: Vec<_> = out
            .iter()
            .map(|r| format!("{}:{}", r.group(), r.table()))
            .collect();

        assert_eq!(
            names,
            vec![
                "g1:orders_202401",
                "g1:orders_202402",
                "g1:orders_202403",
                "g2:orders_202401",
                "g2:orders_202402",
                "g2:orders_202403",
            ]
        );
        assert!(out.iter().all(RouteInfo::is_resolved));
        assert!(fan_out(&routes, &[]).is_empty());
    }
}
