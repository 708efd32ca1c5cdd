use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::codec::{Field, Model, json};
use crate::error::Result;
use crate::model::Severity;
use crate::time;

/// A log-style event attached to an entity.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub entity: Option<String>,
    #[serde(rename = "type")]
    pub message_type: Option<String>,
    pub source: Option<String>,
    /// ISO date as sent by the server.
    pub date: Option<String>,
    pub severity: Option<Severity>,
    pub tags: Option<HashMap<String, String>>,
    pub message: Option<String>,
    pub persist: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn new(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            entity: Some(entity.into()),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Message date in epoch milliseconds, if set.
    pub fn date_millis(&self) -> Result<Option<i64>> {
        self.date.as_deref().map(time::parse_date).transpose()
    }
}

impl Model for Message {
    const TYPE_NAME: &'static str = "Message";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<Message>] = &[
            Field::required("entity", |m| json(&m.entity)),
            Field::allowed("type", |m| json(&m.message_type)),
            Field::allowed("source", |m| json(&m.source)),
            Field::allowed("date", |m| json(&m.date)),
            Field::allowed("severity", |m| json(&m.severity)),
            Field::allowed("tags", |m| json(&m.tags)),
            Field::allowed("message", |m| json(&m.message)),
            Field::allowed("persist", |m| json(&m.persist)),
        ];
        FIELDS
    }
}
