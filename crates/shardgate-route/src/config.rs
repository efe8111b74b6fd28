//! Per-table routing configuration.
//!
//! Loading and validating the surrounding proxy configuration happens
//! elsewhere; these types are what that loader hands to the router.

use crate::algorithm::AlgorithmKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// Option keys
///

/// Number of future buckets to pre-create.
pub const PREPARE_NUM: &str = "prepare-num";

/// Input parsing pattern for shard-key values.
pub const DATE_PATTERN: &str = "date-pattern";

/// Output bucket-naming pattern.
pub const FORMAT_PATTERN: &str = "format-pattern";

/// Default lookahead when `prepare-num` is absent or malformed.
pub const DEFAULT_PREPARE_NUM: u32 = 1;

///
/// AlgorithmConfig
///
/// Named options for one algorithm instance. Read once by `configure`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AlgorithmConfig {
    pub kind: AlgorithmKind,

    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl AlgorithmConfig {
    #[must_use]
    pub const fn new(kind: AlgorithmKind) -> Self {
        Self {
            kind,
            params: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Lookahead bucket count; malformed values fall back to the default.
    #[must_use]
    pub fn prepare_num(&self) -> u32 {
        let Some(raw) = self.param(PREPARE_NUM) else {
            return DEFAULT_PREPARE_NUM;
        };

        match raw.trim().parse::<u32>() {
            Ok(n) => n,
            Err(err) => {
                tracing::warn!(
                    option = PREPARE_NUM,
                    value = raw,
                    error = %err,
                    fallback = DEFAULT_PREPARE_NUM,
                    "ignoring malformed route option"
                );

                DEFAULT_PREPARE_NUM
            }
        }
    }
}

///
/// TableConfig
///
/// Static location of one logical table and its routing algorithm, if any.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TableConfig {
    pub name: String,
    pub group: String,
    pub database: String,

    #[serde(default)]
    pub route: Option<AlgorithmConfig>,
}

impl TableConfig {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            database: database.into(),
            route: None,
        }
    }

    #[must_use]
    pub fn with_route(mut self, route: AlgorithmConfig) -> Self {
        self.route = Some(route);
        self
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_num_defaults_and_falls_back() {
        let config = AlgorithmConfig::new(AlgorithmKind::AutoDate);
        assert_eq!(config.prepare_num(), 1);

        let config = config.with_param(PREPARE_NUM, "3");
        assert_eq!(config.prepare_num(), 3);

        let config = config.with_param(PREPARE_NUM, "three");
        assert_eq!(config.prepare_num(), 1);

        let config = config.with_param(PREPARE_NUM, "-2");
        assert_eq!(config.prepare_num(), 1);

        let config = config.with_param(PREPARE_NUM, "0");
        assert_eq!(config.prepare_num(), 0);
    }

    #[test]
    fn table_config_deserializes_from_kebab_case() {
        let json = r#"{
            "name": "orders",
            "group": "g1",
            "database": "shop",
            "route": {
                "kind": "auto-date",
                "params": { "format-pattern": "yyyyMMdd", "prepare-num": "2" }
            }
        }"#;

        let config: TableConfig = serde_json::from_str(json).unwrap();
        let route = config.route.as_ref().unwrap();

        assert_eq!(config.name, "orders");
        assert_eq!(route.kind, AlgorithmKind::AutoDate);
        assert_eq!(route.param(FORMAT_PATTERN), Some("yyyyMMdd"));
        assert_eq!(route.prepare_num(), 2);
    }

    #[test]
    fn table_config_without_route_is_unsharded() {
        let json = r#"{ "name": "users", "group": "g1", "database": "shop" }"#;
        let config: TableConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config, TableConfig::new("users", "g1", "shop"));
    }
}
