use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::clock::SystemClock;
use crate::codec::{Field, Model, json};
use crate::error::Result;
use crate::model::SampleTime;
use crate::time;

/// A property record: a set of tags of one `type` attached to an entity,
/// optionally told apart from sibling records by a `key`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub entity: Option<String>,
    pub tags: Option<HashMap<String, String>>,
    pub key: Option<HashMap<String, String>>,
    /// Epoch milliseconds.
    pub timestamp: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Property {
    pub fn new(
        property_type: impl Into<String>,
        entity: impl Into<String>,
        tags: HashMap<String, String>,
    ) -> Self {
        Self {
            property_type: Some(property_type.into()),
            entity: Some(entity.into()),
            tags: Some(tags),
            ..Default::default()
        }
    }

    pub fn with_key(mut self, key: HashMap<String, String>) -> Self {
        self.key = Some(key);
        self
    }

    /// Sets the record time from any [`SampleTime`] form.
    pub fn with_time(mut self, time: impl Into<SampleTime>) -> Result<Self> {
        self.timestamp = Some(time.into().resolve(&SystemClock)?);
        Ok(self)
    }

    /// Record time from `timestamp`, or from the ISO `date` key that query
    /// replies carry instead.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        let millis = self.timestamp.or_else(|| {
            self.extra
                .get("date")
                .and_then(Value::as_str)
                .and_then(|date| time::parse_date(date).ok())
        })?;
        Some(time::millis_to_utc(millis))
    }
}

impl Model for Property {
    const TYPE_NAME: &'static str = "Property";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<Property>] = &[
            Field::required("type", |p| json(&p.property_type)),
            Field::required("entity", |p| json(&p.entity)),
            Field::required("tags", |p| json(&p.tags)),
            Field::allowed("key", |p| json(&p.key)),
            Field::allowed("timestamp", |p| json(&p.timestamp)),
        ];
        FIELDS
    }
}
