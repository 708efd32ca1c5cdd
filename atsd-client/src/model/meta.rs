//! Metadata records: metrics, entities, entity groups and group membership
//! commands.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::codec::{Field, Model, json};
use crate::error::Result;
use crate::time;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub name: Option<String>,
    pub label: Option<String>,
    pub enabled: Option<bool>,
    /// One of `SHORT`, `INTEGER`, `FLOAT`, `LONG`, `DOUBLE` or `DECIMAL`.
    pub data_type: Option<String>,
    pub persistent: Option<bool>,
    pub filter: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub invalid_action: Option<String>,
    pub description: Option<String>,
    pub retention_days: Option<i64>,
    pub series_retention_days: Option<i64>,
    pub versioned: Option<bool>,
    pub interpolate: Option<String>,
    pub time_zone: Option<String>,
    pub units: Option<String>,
    pub tags: Option<HashMap<String, String>>,
    /// Server-maintained; never sent back.
    pub last_insert_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Metric {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn last_insert_millis(&self) -> Result<Option<i64>> {
        parse_optional_date(&self.last_insert_date)
    }
}

impl Model for Metric {
    const TYPE_NAME: &'static str = "Metric";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<Metric>] = &[
            Field::required("name", |m| json(&m.name)),
            Field::allowed("label", |m| json(&m.label)),
            Field::allowed("enabled", |m| json(&m.enabled)),
            Field::allowed("dataType", |m| json(&m.data_type)),
            Field::allowed("persistent", |m| json(&m.persistent)),
            Field::allowed("filter", |m| json(&m.filter)),
            Field::allowed("minValue", |m| json(&m.min_value)),
            Field::allowed("maxValue", |m| json(&m.max_value)),
            Field::allowed("invalidAction", |m| json(&m.invalid_action)),
            Field::allowed("description", |m| json(&m.description)),
            Field::allowed("retentionDays", |m| json(&m.retention_days)),
            Field::allowed("seriesRetentionDays", |m| json(&m.series_retention_days)),
            Field::allowed("versioned", |m| json(&m.versioned)),
            Field::allowed("interpolate", |m| json(&m.interpolate)),
            Field::allowed("timeZone", |m| json(&m.time_zone)),
            Field::allowed("units", |m| json(&m.units)),
            Field::allowed("tags", |m| json(&m.tags)),
        ];
        FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: Option<String>,
    pub label: Option<String>,
    pub enabled: Option<bool>,
    pub interpolate: Option<String>,
    pub time_zone: Option<String>,
    pub tags: Option<HashMap<String, String>>,
    /// Server-maintained; never sent back.
    pub last_insert_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn last_insert_millis(&self) -> Result<Option<i64>> {
        parse_optional_date(&self.last_insert_date)
    }
}

impl Model for Entity {
    const TYPE_NAME: &'static str = "Entity";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<Entity>] = &[
            Field::required("name", |e| json(&e.name)),
            Field::allowed("label", |e| json(&e.label)),
            Field::allowed("enabled", |e| json(&e.enabled)),
            Field::allowed("interpolate", |e| json(&e.interpolate)),
            Field::allowed("timeZone", |e| json(&e.time_zone)),
            Field::allowed("tags", |e| json(&e.tags)),
        ];
        FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityGroup {
    pub name: Option<String>,
    /// Membership expression; groups with an expression are read-only.
    pub expression: Option<String>,
    pub tags: Option<HashMap<String, String>>,
    pub enabled: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EntityGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

impl Model for EntityGroup {
    const TYPE_NAME: &'static str = "EntityGroup";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<EntityGroup>] = &[
            Field::required("name", |g| json(&g.name)),
            Field::allowed("expression", |g| json(&g.expression)),
            Field::allowed("tags", |g| json(&g.tags)),
            Field::allowed("enabled", |g| json(&g.enabled)),
        ];
        FIELDS
    }
}

/// One step of a batch change to an entity group's members.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntitiesCommand {
    /// `add` or `delete`.
    pub action: String,
    pub entities: Vec<String>,
    pub create_entities: Option<bool>,
}

impl BatchEntitiesCommand {
    /// Adds `entities` to the group; with `create_entities` unknown names are
    /// created on the fly.
    pub fn add<I, S>(entities: I, create_entities: Option<bool>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            action: "add".to_string(),
            entities: entities.into_iter().map(Into::into).collect(),
            create_entities,
        }
    }

    pub fn delete<I, S>(entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            action: "delete".to_string(),
            entities: entities.into_iter().map(Into::into).collect(),
            create_entities: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Model for BatchEntitiesCommand {
    const TYPE_NAME: &'static str = "BatchEntitiesCommand";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<BatchEntitiesCommand>] = &[
            Field::required("action", |c| json(&c.action)),
            Field::required("entities", |c| json(&c.entities)),
            Field::allowed("createEntities", |c| json(&c.create_entities)),
        ];
        FIELDS
    }
}

fn parse_optional_date(date: &Option<String>) -> Result<Option<i64>> {
    date.as_deref().map(time::parse_date).transpose()
}
