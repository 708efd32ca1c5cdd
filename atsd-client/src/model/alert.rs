use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::codec::{Field, Model, json};
use crate::model::Severity;

/// An open alert raised by a rule.
///
/// Times are epoch milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Option<i64>,
    pub rule: Option<String>,
    pub entity: Option<String>,
    pub metric: Option<String>,
    pub last_event_time: Option<i64>,
    pub open_values: Option<Value>,
    pub open_time: Option<i64>,
    pub value: Option<f64>,
    pub message: Option<String>,
    pub tags: Option<HashMap<String, String>>,
    pub text_value: Option<String>,
    pub severity: Option<Severity>,
    pub repeat_count: Option<i64>,
    pub acknowledged: Option<bool>,
    pub open_value: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Alert {
    pub fn new(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }
}

impl Model for Alert {
    const TYPE_NAME: &'static str = "Alert";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<Alert>] = &[
            Field::required("id", |a| json(&a.id)),
            Field::allowed("rule", |a| json(&a.rule)),
            Field::allowed("entity", |a| json(&a.entity)),
            Field::allowed("metric", |a| json(&a.metric)),
            Field::allowed("lastEventTime", |a| json(&a.last_event_time)),
            Field::allowed("openValues", |a| json(&a.open_values)),
            Field::allowed("openTime", |a| json(&a.open_time)),
            Field::allowed("value", |a| json(&a.value)),
            Field::allowed("message", |a| json(&a.message)),
            Field::allowed("tags", |a| json(&a.tags)),
            Field::allowed("textValue", |a| json(&a.text_value)),
            Field::allowed("severity", |a| json(&a.severity)),
            Field::allowed("repeatCount", |a| json(&a.repeat_count)),
            Field::allowed("acknowledged", |a| json(&a.acknowledged)),
            Field::allowed("openValue", |a| json(&a.open_value)),
        ];
        FIELDS
    }
}

/// A closed alert as recorded in the alert history log.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertHistory {
    /// Alert message text.
    pub alert: Option<String>,
    pub alert_duration: Option<i64>,
    pub alert_open_time: Option<i64>,
    pub entity: Option<String>,
    pub metric: Option<String>,
    pub received_time: Option<i64>,
    pub repeat_count: Option<i64>,
    pub rule: Option<String>,
    pub rule_expression: Option<String>,
    pub rule_filter: Option<String>,
    pub schedule: Option<String>,
    pub severity: Option<Severity>,
    pub tags: Option<HashMap<String, String>>,
    pub time: Option<i64>,
    /// Record kind, e.g. `OPEN`, `REPEAT` or `CANCEL`.
    #[serde(rename = "type")]
    pub history_type: Option<String>,
    pub value: Option<f64>,
    pub window: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Model for AlertHistory {
    const TYPE_NAME: &'static str = "AlertHistory";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<AlertHistory>] = &[
            Field::allowed("alert", |h| json(&h.alert)),
            Field::allowed("alertDuration", |h| json(&h.alert_duration)),
            Field::allowed("alertOpenTime", |h| json(&h.alert_open_time)),
            Field::allowed("entity", |h| json(&h.entity)),
            Field::allowed("metric", |h| json(&h.metric)),
            Field::allowed("receivedTime", |h| json(&h.received_time)),
            Field::allowed("repeatCount", |h| json(&h.repeat_count)),
            Field::allowed("rule", |h| json(&h.rule)),
            Field::allowed("ruleExpression", |h| json(&h.rule_expression)),
            Field::allowed("ruleFilter", |h| json(&h.rule_filter)),
            Field::allowed("schedule", |h| json(&h.schedule)),
            Field::allowed("severity", |h| json(&h.severity)),
            Field::allowed("tags", |h| json(&h.tags)),
            Field::allowed("time", |h| json(&h.time)),
            Field::allowed("type", |h| json(&h.history_type)),
            Field::allowed("value", |h| json(&h.value)),
            Field::allowed("window", |h| json(&h.window)),
        ];
        FIELDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{deserialize_list, deserialize_one, serialize};
    use crate::error::Error;
    use serde_json::json;

    #[test]
    fn should_require_only_id() {
        // given
        let alert = Alert {
            rule: Some("cpu_high".to_string()),
            ..Default::default()
        };

        // when
        let result = serialize(&alert);

        // then
        assert!(matches!(
            result,
            Err(Error::MissingRequiredField {
                field: "id",
                type_name: "Alert"
            })
        ));
    }

    #[test]
    fn should_round_trip_alert() {
        // given
        let value = json!({
            "id": 14,
            "rule": "cpu_high",
            "entity": "nurswgvml007",
            "metric": "cpu_busy",
            "openTime": 1_428_995_011_000_i64,
            "lastEventTime": 1_428_995_071_000_i64,
            "openValues": {"cpu_busy": 97.5},
            "value": 98.0,
            "severity": "CRITICAL",
            "repeatCount": 3,
            "acknowledged": false,
            "tags": {"core": "0"}
        });

        // when
        let alert: Alert = deserialize_one(value.clone()).unwrap();
        let out = alert.to_json().unwrap();

        // then
        assert_eq!(alert.severity, Some(Severity::Critical));
        assert_eq!(out, value);
    }

    #[test]
    fn should_accept_numeric_severity_in_history() {
        // given
        let value = json!([
            {"alert": "cpu high", "severity": 6, "type": "OPEN", "time": 10},
            {"alert": "cpu high", "severity": "NORMAL", "type": "CANCEL", "time": 20, "ruleType": "X"}
        ]);

        // when
        let history: Vec<AlertHistory> = deserialize_list(value).unwrap();

        // then
        assert_eq!(history[0].severity, Some(Severity::Critical));
        assert_eq!(history[1].history_type.as_deref(), Some("CANCEL"));
        assert_eq!(history[1].extra.get("ruleType"), Some(&json!("X")));
    }

    #[test]
    fn should_serialize_empty_history_record() {
        // when
        let out = serialize(&AlertHistory::default()).unwrap();

        // then
        assert!(out.is_empty());
    }
}
