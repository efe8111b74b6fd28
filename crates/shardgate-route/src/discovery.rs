//! Schema discovery seam.
//!
//! Routing never talks to a backend catalog directly; it asks a
//! `SchemaDiscovery` implementation for the physical tables that exist now.
//! Results are a best-effort snapshot and may be stale by the time they are used.

use crate::TABLE_LABEL_SEPARATOR;
use regex::Regex;
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};
use thiserror::Error as ThisError;

///
/// DiscoveryError
///

#[derive(Debug, ThisError)]
pub enum DiscoveryError {
    #[error("schema discovery unavailable for {group}/{database}: {message}")]
    Unavailable {
        group: String,
        database: String,
        message: String,
    },

    #[error("schema discovery timed out for {group}/{database}")]
    Timeout { group: String, database: String },
}

///
/// TableNamePattern
///
/// Anchored name pattern matching a logical table followed by the label
/// separator and a numeric suffix. The source string is kept so remote
/// catalogs can push the pattern down to the database.
///

#[derive(Clone)]
pub struct TableNamePattern {
    regex: Regex,
}

impl TableNamePattern {
    /// Pattern for every numeric bucket of `table`.
    #[must_use]
    pub fn buckets_of(table: &str) -> Self {
        let source = format!(
            "^{}{TABLE_LABEL_SEPARATOR}[0-9]*$",
            regex::escape(table)
        );

        let regex = Regex::new(&source).expect("escaped table pattern compiles");

        Self { regex }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    #[must_use]
    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

impl fmt::Debug for TableNamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableNamePattern({})", self.as_str())
    }
}

impl fmt::Display for TableNamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// SchemaDiscovery
///
/// Blocking lookup of existing physical tables. Timeouts and retries belong
/// to the implementation; routing propagates whatever error it returns.
///

pub trait SchemaDiscovery: Send + Sync {
    fn list_tables(
        &self,
        group: &str,
        database: &str,
        pattern: &TableNamePattern,
    ) -> Result<BTreeSet<String>, DiscoveryError>;
}

///
/// StaticCatalog
///
/// In-memory catalog keyed by (group, database).
///

#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    tables: BTreeMap<(String, String), BTreeSet<String>>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register physical tables under one group and database.
    #[must_use]
    pub fn with_tables<I, S>(mut self, group: &str, database: &str, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(group, database, tables);
        self
    }

    pub fn insert<I, S>(&mut self, group: &str, database: &str, tables: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables
            .entry((group.to_string(), database.to_string()))
            .or_default()
            .extend(tables.into_iter().map(Into::into));
    }
}

impl SchemaDiscovery for StaticCatalog {
    fn list_tables(
        &self,
        group: &str,
        database: &str,
        pattern: &TableNamePattern,
    ) -> Result<BTreeSet<String>, DiscoveryError> {
        let key = (group.to_string(), database.to_string());
        let matched = self
            .tables
            .get(&key)
            .map(|tables| {
                tables
                    .iter()
                    .filter(|name| pattern.is_match(name))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(matched)
    }
}

///
/// TESTS
///
