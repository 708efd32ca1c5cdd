//! Outbound query and filter payloads.
//!
//! These are only ever sent, never read back, so they carry no `extra` map
//! and do not implement `Deserialize`. Dates are passed through as strings:
//! ATSD accepts ISO dates as well as calendar expressions such as
//! `current_day - 1 * week`.

use std::collections::HashMap;

use serde::Serialize;

use crate::codec::{Field, Model, json, nested};
use crate::model::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

/// A duration expressed as `count` × `unit`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub count: i64,
    pub unit: TimeUnit,
}

impl Interval {
    pub fn new(count: i64, unit: TimeUnit) -> Self {
        Self { count, unit }
    }
}

impl Model for Interval {
    const TYPE_NAME: &'static str = "Interval";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<Interval>] = &[
            Field::required("count", |i| json(&i.count)),
            Field::required("unit", |i| json(&i.unit)),
        ];
        FIELDS
    }
}

/// Server-side aggregation of series samples into periods.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    /// Aggregation functions such as `AVG`, `MAX` or `PERCENTILE_95`.
    pub types: Vec<String>,
    pub period: Option<Interval>,
}

impl Aggregate {
    pub fn new<I, S>(types: I, period: Interval) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
            period: Some(period),
        }
    }
}

impl Model for Aggregate {
    const TYPE_NAME: &'static str = "Aggregate";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<Aggregate>] = &[
            Field::required("types", |a| json(&a.types)),
            Field::allowed("period", |a| nested(&a.period)),
        ];
        FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesQuery {
    pub entity: String,
    pub metric: String,
    pub tags: Option<HashMap<String, Vec<String>>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub interval: Option<Interval>,
    pub limit: Option<u32>,
    pub exact_match: Option<bool>,
    /// `ASC` or `DESC`.
    pub direction: Option<String>,
    pub aggregate: Option<Aggregate>,
    pub add_meta: Option<bool>,
    pub series_type: Option<String>,
}

impl SeriesQuery {
    pub fn new(entity: impl Into<String>, metric: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            metric: metric.into(),
            ..Default::default()
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .get_or_insert_with(HashMap::new)
            .entry(key.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn between(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    /// Selects the `count` × `unit` window ending at `endDate` (or now).
    pub fn last(mut self, count: i64, unit: TimeUnit) -> Self {
        self.interval = Some(Interval::new(count, unit));
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = Some(aggregate);
        self
    }
}

impl Model for SeriesQuery {
    const TYPE_NAME: &'static str = "SeriesQuery";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<SeriesQuery>] = &[
            Field::required("entity", |q| json(&q.entity)),
            Field::required("metric", |q| json(&q.metric)),
            Field::allowed("tags", |q| json(&q.tags)),
            Field::allowed("startDate", |q| json(&q.start_date)),
            Field::allowed("endDate", |q| json(&q.end_date)),
            Field::allowed("interval", |q| nested(&q.interval)),
            Field::allowed("limit", |q| json(&q.limit)),
            Field::allowed("exactMatch", |q| json(&q.exact_match)),
            Field::allowed("direction", |q| json(&q.direction)),
            Field::allowed("aggregate", |q| nested(&q.aggregate)),
            Field::allowed("addMeta", |q| json(&q.add_meta)),
            Field::allowed("type", |q| json(&q.series_type)),
        ];
        FIELDS
    }
}

/// Selects series whose samples are all deleted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesDeleteQuery {
    pub entity: String,
    pub metric: String,
    pub tags: Option<HashMap<String, Vec<String>>>,
    pub exact_match: Option<bool>,
}

impl SeriesDeleteQuery {
    pub fn new(entity: impl Into<String>, metric: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            metric: metric.into(),
            ..Default::default()
        }
    }
}

impl Model for SeriesDeleteQuery {
    const TYPE_NAME: &'static str = "SeriesDeleteQuery";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<SeriesDeleteQuery>] = &[
            Field::required("entity", |q| json(&q.entity)),
            Field::required("metric", |q| json(&q.metric)),
            Field::allowed("tags", |q| json(&q.tags)),
            Field::allowed("exactMatch", |q| json(&q.exact_match)),
        ];
        FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertiesQuery {
    pub property_type: String,
    pub entity: String,
    pub key: Option<HashMap<String, String>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub interval: Option<Interval>,
    pub limit: Option<u32>,
    pub exact_match: Option<bool>,
    pub key_tag_expression: Option<String>,
}

impl PropertiesQuery {
    pub fn new(property_type: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            property_type: property_type.into(),
            entity: entity.into(),
            ..Default::default()
        }
    }

    pub fn between(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }
}

impl Model for PropertiesQuery {
    const TYPE_NAME: &'static str = "PropertiesQuery";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<PropertiesQuery>] = &[
            Field::required("type", |q| json(&q.property_type)),
            Field::required("entity", |q| json(&q.entity)),
            Field::allowed("key", |q| json(&q.key)),
            Field::allowed("startDate", |q| json(&q.start_date)),
            Field::allowed("endDate", |q| json(&q.end_date)),
            Field::allowed("interval", |q| nested(&q.interval)),
            Field::allowed("limit", |q| json(&q.limit)),
            Field::allowed("exactMatch", |q| json(&q.exact_match)),
            Field::allowed("keyTagExpression", |q| json(&q.key_tag_expression)),
        ];
        FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyDeleteFilter {
    pub property_type: String,
    pub entity: Option<String>,
    pub key: Option<HashMap<String, String>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub exact_match: Option<bool>,
}

impl PropertyDeleteFilter {
    pub fn new(property_type: impl Into<String>) -> Self {
        Self {
            property_type: property_type.into(),
            ..Default::default()
        }
    }
}

impl Model for PropertyDeleteFilter {
    const TYPE_NAME: &'static str = "PropertyDeleteFilter";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<PropertyDeleteFilter>] = &[
            Field::required("type", |f| json(&f.property_type)),
            Field::allowed("entity", |f| json(&f.entity)),
            Field::allowed("key", |f| json(&f.key)),
            Field::allowed("startDate", |f| json(&f.start_date)),
            Field::allowed("endDate", |f| json(&f.end_date)),
            Field::allowed("exactMatch", |f| json(&f.exact_match)),
        ];
        FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertsQuery {
    pub metrics: Option<Vec<String>>,
    pub entities: Option<Vec<String>>,
    pub rules: Option<Vec<String>>,
    pub severities: Option<Vec<Severity>>,
    pub min_severity: Option<Severity>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub interval: Option<Interval>,
    pub acknowledged: Option<bool>,
}

impl Model for AlertsQuery {
    const TYPE_NAME: &'static str = "AlertsQuery";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<AlertsQuery>] = &[
            Field::allowed("metrics", |q| json(&q.metrics)),
            Field::allowed("entities", |q| json(&q.entities)),
            Field::allowed("rules", |q| json(&q.rules)),
            Field::allowed("severities", |q| json(&q.severities)),
            Field::allowed("minSeverity", |q| json(&q.min_severity)),
            Field::allowed("startDate", |q| json(&q.start_date)),
            Field::allowed("endDate", |q| json(&q.end_date)),
            Field::allowed("interval", |q| nested(&q.interval)),
            Field::allowed("acknowledged", |q| json(&q.acknowledged)),
        ];
        FIELDS
    }
}

/// Acknowledges or un-acknowledges one alert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertUpdate {
    pub id: i64,
    pub acknowledged: bool,
}

impl Model for AlertUpdate {
    const TYPE_NAME: &'static str = "AlertUpdate";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<AlertUpdate>] = &[
            Field::required("id", |u| json(&u.id)),
            Field::required("acknowledged", |u| json(&u.acknowledged)),
        ];
        FIELDS
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertDeleteFilter {
    pub id: i64,
}

impl Model for AlertDeleteFilter {
    const TYPE_NAME: &'static str = "AlertDeleteFilter";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<AlertDeleteFilter>] = &[Field::required("id", |f| json(&f.id))];
        FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertHistoryQuery {
    pub entity: Option<String>,
    pub metric: Option<String>,
    pub rule: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub interval: Option<Interval>,
    pub limit: Option<u32>,
}

impl Model for AlertHistoryQuery {
    const TYPE_NAME: &'static str = "AlertHistoryQuery";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<AlertHistoryQuery>] = &[
            Field::allowed("entity", |q| json(&q.entity)),
            Field::allowed("metric", |q| json(&q.metric)),
            Field::allowed("rule", |q| json(&q.rule)),
            Field::allowed("startDate", |q| json(&q.start_date)),
            Field::allowed("endDate", |q| json(&q.end_date)),
            Field::allowed("interval", |q| nested(&q.interval)),
            Field::allowed("limit", |q| json(&q.limit)),
        ];
        FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageQuery {
    pub entity: String,
    pub message_type: Option<String>,
    pub source: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub interval: Option<Interval>,
    pub severity: Option<Severity>,
    pub min_severity: Option<Severity>,
    pub tags: Option<HashMap<String, String>>,
    pub limit: Option<u32>,
}

impl MessageQuery {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            ..Default::default()
        }
    }

    pub fn last(mut self, count: i64, unit: TimeUnit) -> Self {
        self.interval = Some(Interval::new(count, unit));
        self
    }
}

impl Model for MessageQuery {
    const TYPE_NAME: &'static str = "MessageQuery";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<MessageQuery>] = &[
            Field::required("entity", |q| json(&q.entity)),
            Field::allowed("type", |q| json(&q.message_type)),
            Field::allowed("source", |q| json(&q.source)),
            Field::allowed("startDate", |q| json(&q.start_date)),
            Field::allowed("endDate", |q| json(&q.end_date)),
            Field::allowed("interval", |q| nested(&q.interval)),
            Field::allowed("severity", |q| json(&q.severity)),
            Field::allowed("minSeverity", |q| json(&q.min_severity)),
            Field::allowed("tags", |q| json(&q.tags)),
            Field::allowed("limit", |q| json(&q.limit)),
        ];
        FIELDS
    }
}

/// Filters for the metadata list endpoints, sent as URL query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    pub expression: Option<String>,
    pub active: Option<bool>,
    /// Comma-separated tag names to include, `*` for all.
    pub tags: Option<String>,
    pub limit: Option<u32>,
    pub min_insert_date: Option<String>,
    pub max_insert_date: Option<String>,
}

impl ListParams {
    pub fn expression(expression: impl Into<String>) -> Self {
        Self {
            expression: Some(expression.into()),
            ..Default::default()
        }
    }

    /// Query parameters for the set filters, in a fixed order.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        let mut push = |name: &str, value: Option<String>| {
            if let Some(value) = value {
                params.push((name.to_string(), value));
            }
        };
        push("expression", self.expression.clone());
        push("active", self.active.map(|a| a.to_string()));
        push("tags", self.tags.clone());
        push("limit", self.limit.map(|l| l.to_string()));
        push("minInsertDate", self.min_insert_date.clone());
        push("maxInsertDate", self.max_insert_date.clone());
        params
    }
}
