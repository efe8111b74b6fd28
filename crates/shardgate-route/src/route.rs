use crate::{
    TABLE_LABEL_SEPARATOR,
    clock::Clock,
    config::TableConfig,
    discovery::SchemaDiscovery,
};
use std::fmt;
use time::PrimitiveDateTime;

///
/// RouteInfo
///
/// One resolved physical location (group, database, table).
/// Group and database are fixed at construction; only the table name is
/// refined by algorithm stages. `Clone` is the deep copy used for fan-out.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct RouteInfo {
    group: String,
    database: String,
    table: String,
    resolved: bool,
}

impl RouteInfo {
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        database: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            database: database.into(),
            table: table.into(),
            resolved: false,
        }
    }

    /// Unresolved route for a logical table, as configured.
    #[must_use]
    pub fn for_table(config: &TableConfig) -> Self {
        Self::new(&config.group, &config.database, &config.name)
    }

    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// True once a concrete shard-key value has been applied.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn set_table(&mut self, table: impl Into<String>) {
        self.table = table.into();
    }

    /// Copy of this route pointing at another table.
    #[must_use]
    pub fn with_table(&self, table: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.set_table(table);
        copy
    }

    /// Copy of this route pointing at `<table>_<label>`.
    #[must_use]
    pub fn with_label(&self, label: &str) -> Self {
        self.with_table(labeled_table(&self.table, label))
    }

    /// Apply a bucket label in place and mark the shard key as resolved.
    pub(crate) fn apply_label(&mut self, label: &str) {
        self.table = labeled_table(&self.table, label);
        self.resolved = true;
    }

    /// Point at an already-bucketed physical table.
    pub(crate) fn resolve_to(&mut self, table: impl Into<String>) {
        self.table = table.into();
        self.resolved = true;
    }
}

impl fmt::Display for RouteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}.{}", self.group, self.database, self.table)
    }
}

fn labeled_table(table: &str, label: &str) -> String {
    let mut name = String::with_capacity(table.len() + 1 + label.len());
    name.push_str(table);
    name.push(TABLE_LABEL_SEPARATOR);
    name.push_str(label);
    name
}

///
/// RouteContext
///
/// Per-resolution-pass context: one clock sample shared by every stage of
/// the pass, plus the discovery collaborator used for full scans.
///

#[derive(Clone, Copy)]
pub struct RouteContext<'a> {
    now: PrimitiveDateTime,
    discovery: &'a dyn SchemaDiscovery,
}

impl<'a> RouteContext<'a> {
    /// Sample `clock` once for this pass.
    #[must_use]
    pub fn new(clock: &dyn Clock, discovery: &'a dyn SchemaDiscovery) -> Self {
        Self::at(clock.now(), discovery)
    }

    #[must_use]
    pub const fn at(now: PrimitiveDateTime, discovery: &'a dyn SchemaDiscovery) -> Self {
        Self { now, discovery }
    }

    #[must_use]
    pub const fn now(&self) -> PrimitiveDateTime {
        self.now
    }

    #[must_use]
    pub const fn discovery(&self) -> &'a dyn SchemaDiscovery {
        self.discovery
    }
}

impl fmt::Debug for RouteContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteContext")
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

///
/// TESTS
///
