//! Date-bucketed tables (`orders_20240130`, `orders_202401`, ...).
//!
//! Bucket labels are produced by formatting a shard-key date with the
//! configured `format-pattern`. Common patterns take a slicing fast path
//! that skips date parsing entirely.


use crate::{
    algorithm::{RouteAlgorithm, fan_out},
    config::{AlgorithmConfig, DATE_PATTERN, FORMAT_PATTERN, TableConfig},
    discovery::TableNamePattern,
    error::RouteError,
    obs::sink::{self, FanOutKind, ResolvePath, RouteEvent},
    pattern::{DatePattern, Granularity, QuickFormat, fit_parse},
    route::{RouteContext, RouteInfo},
};
use time::{PrimitiveDateTime, Time};

///
/// DateAutoRouter
///
/// Routes a logical table to `<table>_<label>` buckets keyed by date.
/// All fields are fixed by `configure`.
///

#[derive(Clone, Debug)]
pub struct DateAutoRouter {
    date_pattern: Option<DatePattern>,
    format_pattern: DatePattern,
    quick: Option<QuickFormat>,
    granularity: Granularity,
    prepare_num: u32,
}

impl DateAutoRouter {
    #[must_use]
    pub const fn date_pattern(&self) -> Option<&DatePattern> {
        self.date_pattern.as_ref()
    }

    #[must_use]
    pub const fn format_pattern(&self) -> &DatePattern {
        &self.format_pattern
    }

    /// Recognized fast-path code for the output pattern.
    /// Only consulted when no `date-pattern` is configured.
    #[must_use]
    pub const fn quick_format(&self) -> Option<QuickFormat> {
        self.quick
    }

    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    #[must_use]
    pub const fn prepare_num(&self) -> u32 {
        self.prepare_num
    }

    /// Bucket label for one raw shard-key value.
    pub fn label_for_value(&self, value: &str) -> Result<String, RouteError> {
        if self.date_pattern.is_none()
            && let Some(code) = self.quick
            && let Some(label) = code.apply(value)
        {
            sink::record(RouteEvent::Resolve {
                path: ResolvePath::QuickFormat,
            });

            return Ok(label);
        }

        let at = self.parse_value(value)?;
        sink::record(RouteEvent::Resolve {
            path: ResolvePath::FullParse,
        });

        self.label_for(&at)
    }

    fn label_for(&self, at: &PrimitiveDateTime) -> Result<String, RouteError> {
        Ok(self.format_pattern.format(at)?)
    }

    fn parse_value(&self, value: &str) -> Result<PrimitiveDateTime, RouteError> {
        let parsed = match &self.date_pattern {
            Some(pattern) => pattern
                .parse(value)
                .ok_or_else(|| RouteError::value_parse(value, pattern.as_str())),
            None => fit_parse(value),
        };

        if let Err(err) = &parsed {
            sink::record(RouteEvent::ValueRejected);
            tracing::debug!(value, error = %err, "shard-key value rejected");
        }

        parsed
    }

    // Ordered, distinct labels from `start` through `end` inclusive.
    fn labels_between(
        &self,
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    ) -> Result<Vec<String>, RouteError> {
        let mut labels = Vec::new();
        let mut current = start;

        while current <= end {
            push_distinct(&mut labels, self.label_for(&current)?);

            // only the last representable date cannot step; end is then reached
            let Some(next) = self.granularity.step(current) else {
                break;
            };
            current = next;
        }

        // the end bucket may be skipped when start and end differ in time of day
        push_distinct(&mut labels, self.label_for(&end)?);

        Ok(labels)
    }
}

impl RouteAlgorithm for DateAutoRouter {
    fn configure(config: &AlgorithmConfig) -> Result<Self, RouteError> {
        let prepare_num = config.prepare_num();

        let date_pattern = config
            .param(DATE_PATTERN)
            .map(|source| compile_option(DATE_PATTERN, source))
            .transpose()?;

        let Some(format_source) = config.param(FORMAT_PATTERN) else {
            return Err(RouteError::configuration(
                FORMAT_PATTERN,
                "option is required for date routing",
            ));
        };
        let format_pattern = compile_option(FORMAT_PATTERN, format_source)?;

        let granularity = Granularity::of(&format_pattern).ok_or_else(|| {
            RouteError::configuration(
                FORMAT_PATTERN,
                format!("pattern '{format_source}' has no day, month or year field"),
            )
        })?;

        let quick = QuickFormat::from_pattern(format_source);

        tracing::debug!(
            date_pattern = ?date_pattern.as_ref().map(DatePattern::as_str),
            format_pattern = format_source,
            ?granularity,
            quick_format = quick.is_some(),
            prepare_num,
            "configured date routing"
        );

        Ok(Self {
            date_pattern,
            format_pattern,
            quick,
            granularity,
            prepare_num,
        })
    }

    fn calculate(
        &self,
        table: &TableConfig,
        mut route: RouteInfo,
        value: &str,
    ) -> Result<RouteInfo, RouteError> {
        let label = self.label_for_value(value)?;
        if label.is_empty() {
            return Err(RouteError::UnresolvedLabel {
                table: table.name.clone(),
                value: value.to_string(),
            });
        }

        route.apply_label(&label);

        Ok(route)
    }

    fn calculate_range(
        &self,
        table: &TableConfig,
        routes: Vec<RouteInfo>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<RouteInfo>, RouteError> {
        let (start, end) = match (start, end) {
            (None, None) => return Ok(routes),
            (Some(bound), None) | (None, Some(bound)) => (bound, bound),
            (Some(start), Some(end)) => (start, end),
        };

        let start_at = self.parse_value(start)?;
        let end_at = self.parse_value(end)?;
        if start_at > end_at {
            return Err(RouteError::InvertedRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let labels = self.labels_between(start_at, end_at)?;
        let out = fan_out(&routes, &labels);

        sink::record(RouteEvent::FanOut {
            kind: FanOutKind::Range,
            routes: count(out.len()),
        });
        tracing::debug!(
            table = %table.name,
            start,
            end,
            labels = labels.len(),
            routes = out.len(),
            "expanded date range"
        );

        Ok(out)
    }

    fn default_route(
        &self,
        table: &TableConfig,
        mut route: RouteInfo,
        ctx: &RouteContext<'_>,
    ) -> Result<RouteInfo, RouteError> {
        if route.is_resolved() {
            return Ok(route);
        }

        let label = self.label_for(&ctx.now())?;
        route.apply_label(&label);

        sink::record(RouteEvent::DefaultRoute);
        tracing::debug!(table = %table.name, %label, "routed to current bucket");

        Ok(route)
    }

    fn route_list_for_create(
        &self,
        table: &TableConfig,
        routes: Vec<RouteInfo>,
        ctx: &RouteContext<'_>,
    ) -> Result<Vec<RouteInfo>, RouteError> {
        let mut current = PrimitiveDateTime::new(ctx.now().date(), Time::MIDNIGHT);
        let mut labels = vec![self.label_for(&current)?];

        for _ in 0..self.prepare_num {
            current = self
                .granularity
                .step(current)
                .ok_or_else(|| RouteError::DateOverflow {
                    value: current.to_string(),
                })?;
            push_distinct(&mut labels, self.label_for(&current)?);
        }

        let out = fan_out(&routes, &labels);

        sink::record(RouteEvent::FanOut {
            kind: FanOutKind::Create,
            routes: count(out.len()),
        });
        tracing::debug!(
            table = %table.name,
            labels = ?labels,
            routes = out.len(),
            "computed buckets to provision"
        );

        Ok(out)
    }

    fn all_route_list(
        &self,
        table: &TableConfig,
        routes: Vec<RouteInfo>,
        ctx: &RouteContext<'_>,
    ) -> Result<Vec<RouteInfo>, RouteError> {
        let mut out = Vec::with_capacity(routes.len());

        for route in routes {
            let pattern = TableNamePattern::buckets_of(route.table());
            let tables = ctx
                .discovery()
                .list_tables(route.group(), route.database(), &pattern)
                .inspect_err(|err| {
                    tracing::warn!(
                        table = %table.name,
                        group = route.group(),
                        database = route.database(),
                        error = %err,
                        "schema discovery failed"
                    );
                })?;

            sink::record(RouteEvent::Discovery {
                matched: count(tables.len()),
            });

            if tables.is_empty() {
                tracing::debug!(%route, %pattern, "no buckets discovered, keeping base table");
                out.push(route);
                continue;
            }

            for name in tables {
                let mut copy = route.clone();
                copy.resolve_to(name);
                out.push(copy);
            }
        }

        sink::record(RouteEvent::FanOut {
            kind: FanOutKind::Scan,
            routes: count(out.len()),
        });

        Ok(out)
    }
}

fn compile_option(option: &str, source: &str) -> Result<DatePattern, RouteError> {
    DatePattern::compile(source).map_err(|err| RouteError::configuration(option, err.to_string()))
}

fn push_distinct(labels: &mut Vec<String>, label: String) {
    if !labels.contains(&label) {
        labels.push(label);
    }
}

fn count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}
