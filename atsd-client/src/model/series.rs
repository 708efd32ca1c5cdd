//! Time series and their samples.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clock::{Clock, SystemClock};
use crate::codec::{Field, Model, json};
use crate::error::{Error, Result};
use crate::time;

/// Rows shown from each end of a long series in its text form.
const DISPLAY_EDGE_ROWS: usize = 10;

/// A single data point of a series.
///
/// On the wire a sample is `{"t": <epoch ms>, "v": <number|"NaN"|null>}` with
/// optional `"x"` text and an opaque `"version"`. Inbound samples may carry an
/// ISO `"d"` date instead of `"t"`.
///
/// `value` is `None` for an explicit `null` (a deleted value) and `Some(NaN)`
/// for a not-a-number sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSample", into = "RawSample")]
pub struct Sample {
    /// Sample time in epoch milliseconds.
    pub time: i64,
    pub value: Option<f64>,
    pub text: Option<String>,
    pub version: Option<Value>,
}

impl Sample {
    pub fn new(time: i64, value: f64) -> Self {
        Self {
            time,
            value: Some(value),
            text: None,
            version: None,
        }
    }

    pub fn with_version(mut self, version: Value) -> Self {
        self.version = Some(version);
        self
    }

    /// Sample time as a UTC datetime.
    pub fn date(&self) -> DateTime<Utc> {
        time::millis_to_utc(self.time)
    }
}

#[derive(Serialize, Deserialize)]
struct RawSample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    t: Option<i64>,
    #[serde(default, skip_serializing)]
    d: Option<String>,
    #[serde(default)]
    v: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<Value>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    fn into_f64(self) -> std::result::Result<f64, String> {
        match self {
            RawValue::Number(n) => Ok(n),
            RawValue::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| format!("sample value '{}' is not a number", s)),
        }
    }

    fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            RawValue::Number(value)
        } else if value.is_nan() {
            RawValue::Text("NaN".to_string())
        } else if value > 0.0 {
            RawValue::Text("Infinity".to_string())
        } else {
            RawValue::Text("-Infinity".to_string())
        }
    }
}

impl TryFrom<RawSample> for Sample {
    type Error = String;

    fn try_from(raw: RawSample) -> std::result::Result<Self, Self::Error> {
        let time = match (raw.t, raw.d) {
            (Some(t), _) => t,
            (None, Some(d)) => time::parse_date(&d).map_err(|e| e.to_string())?,
            (None, None) => return Err("sample has neither `t` nor `d`".to_string()),
        };

        Ok(Sample {
            time,
            value: raw.v.map(RawValue::into_f64).transpose()?,
            text: raw.x,
            version: raw.version,
        })
    }
}

impl From<Sample> for RawSample {
    fn from(sample: Sample) -> Self {
        RawSample {
            t: Some(sample.time),
            d: None,
            v: sample.value.map(RawValue::from_f64),
            x: sample.text,
            version: sample.version,
        }
    }
}

/// Time argument of [`Series::add_value`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SampleTime {
    /// Current time of the clock in use.
    #[default]
    Now,
    /// Epoch milliseconds, used as is.
    Millis(i64),
    /// Epoch milliseconds as a float, truncated.
    Float(f64),
    /// ATSD timestamp string or RFC 3339 date.
    Text(String),
    /// Datetime carrying its own offset.
    Calendar(DateTime<FixedOffset>),
    /// Wall-clock datetime observed at the given offset.
    Local(NaiveDateTime, FixedOffset),
}

impl SampleTime {
    pub fn local(naive: NaiveDateTime, offset: FixedOffset) -> Self {
        SampleTime::Local(naive, offset)
    }

    /// Converts to epoch milliseconds, reading `clock` for [`SampleTime::Now`].
    pub fn resolve(&self, clock: &dyn Clock) -> Result<i64> {
        match self {
            SampleTime::Now => Ok(clock.now_millis()),
            SampleTime::Millis(millis) => Ok(*millis),
            SampleTime::Float(millis) => {
                if millis.is_finite() && *millis >= i64::MIN as f64 && *millis < i64::MAX as f64 {
                    Ok(millis.trunc() as i64)
                } else {
                    Err(Error::InvalidTimeValue(format!(
                        "{} is not a valid epoch millisecond value",
                        millis
                    )))
                }
            }
            SampleTime::Text(text) => time::parse_date(text),
            SampleTime::Calendar(dt) => Ok(time::datetime_to_millis(dt)),
            SampleTime::Local(naive, offset) => Ok(time::naive_to_millis(*naive, *offset)),
        }
    }
}

impl From<i64> for SampleTime {
    fn from(millis: i64) -> Self {
        SampleTime::Millis(millis)
    }
}

impl From<f64> for SampleTime {
    fn from(millis: f64) -> Self {
        SampleTime::Float(millis)
    }
}

impl From<&str> for SampleTime {
    fn from(text: &str) -> Self {
        SampleTime::Text(text.to_string())
    }
}

impl From<String> for SampleTime {
    fn from(text: String) -> Self {
        SampleTime::Text(text)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for SampleTime {
    fn from(dt: DateTime<Tz>) -> Self {
        SampleTime::Calendar(dt.fixed_offset())
    }
}

/// A time series: entity, metric, optional tags and an append-only list of
/// samples.
///
/// Samples keep the order they were added in. When adjacent samples share a
/// timestamp, [`values`](Series::values) and [`times`](Series::times) report
/// only the later one; [`samples`](Series::samples) still exposes every
/// version.
///
/// # Example
///
/// ```
/// use atsd_client::Series;
///
/// let mut series = Series::new("nurswgvml007", "cpu_busy").with_tag("core", "0");
/// series.add_value(12.5, 1_428_995_011_000_i64, None).unwrap();
/// series.add_value(13.0, "2015-04-14T10:03:32Z+0300", None).unwrap();
/// assert_eq!(series.values(), vec![Some(12.5), Some(13.0)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub entity: Option<String>,
    pub metric: Option<String>,
    pub tags: Option<HashMap<String, String>>,
    /// Series kind such as `HISTORY` or `FORECAST`.
    #[serde(rename = "type")]
    pub series_type: Option<String>,
    #[serde(default)]
    pub data: Vec<Sample>,
    /// Keys the server sent that are not modeled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Series {
    pub fn new(entity: impl Into<String>, metric: impl Into<String>) -> Self {
        Self {
            entity: Some(entity.into()),
            metric: Some(metric.into()),
            ..Default::default()
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_tags(mut self, tags: HashMap<String, String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_data(mut self, data: Vec<Sample>) -> Self {
        self.data = data;
        self
    }

    /// Appends a sample, taking the current time from the system clock for
    /// [`SampleTime::Now`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimeValue`] if `time` cannot be converted; the
    /// series is left unchanged.
    pub fn add_value(
        &mut self,
        value: f64,
        time: impl Into<SampleTime>,
        version: Option<Value>,
    ) -> Result<()> {
        self.add_value_with_clock(value, time, version, &SystemClock)
    }

    /// Like [`add_value`](Series::add_value) with an explicit clock.
    pub fn add_value_with_clock(
        &mut self,
        value: f64,
        time: impl Into<SampleTime>,
        version: Option<Value>,
        clock: &dyn Clock,
    ) -> Result<()> {
        let time = time.into().resolve(clock)?;
        self.data.push(Sample {
            time,
            value: Some(value),
            text: None,
            version,
        });
        Ok(())
    }

    pub fn add_sample(&mut self, sample: Sample) {
        self.data.push(sample);
    }

    /// Raw samples in insertion order, duplicates included.
    pub fn samples(&self) -> &[Sample] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample values with adjacent same-timestamp samples collapsed into the
    /// later one.
    pub fn values(&self) -> Vec<Option<f64>> {
        self.collapsed().into_iter().map(|s| s.value).collect()
    }

    /// Epoch milliseconds aligned with [`values`](Series::values).
    pub fn timestamps(&self) -> Vec<i64> {
        self.collapsed().into_iter().map(|s| s.time).collect()
    }

    /// UTC datetimes aligned with [`values`](Series::values).
    pub fn times(&self) -> Vec<DateTime<Utc>> {
        self.collapsed().into_iter().map(Sample::date).collect()
    }

    /// `lastInsertDate` reported by series metadata queries.
    pub fn last_insert_date(&self) -> Option<&str> {
        self.extra.get("lastInsertDate").and_then(Value::as_str)
    }

    fn collapsed(&self) -> Vec<&Sample> {
        let mut view: Vec<&Sample> = Vec::with_capacity(self.data.len());
        for sample in &self.data {
            match view.last_mut() {
                Some(last) if last.time == sample.time => *last = sample,
                _ => view.push(sample),
            }
        }
        view
    }
}

impl Model for Series {
    const TYPE_NAME: &'static str = "Series";

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<Series>] = &[
            Field::required("entity", |s| json(&s.entity)),
            Field::required("metric", |s| json(&s.metric)),
            Field::required("data", |s| {
                if s.data.is_empty() {
                    return Ok(None);
                }
                json(&s.data)
            }),
            Field::allowed("tags", |s| json(&s.tags)),
            Field::allowed("type", |s| json(&s.series_type)),
        ];
        FIELDS
    }
}

fn sample_row(sample: &Sample) -> String {
    let value = match sample.value {
        Some(v) if v.is_nan() => "NaN".to_string(),
        Some(v) => v.to_string(),
        None => "null".to_string(),
    };
    let mut row = format!("{}\t{}", sample.time, value);
    if let Some(text) = &sample.text {
        row.push('\t');
        row.push_str(text);
    }
    if let Some(version) = &sample.version {
        row.push('\t');
        row.push_str(&version.to_string());
    }
    row
}

impl fmt::Display for Series {
    /// One `time\tvalue` row per sample, eliding the middle of series longer
    /// than twenty samples, followed by one `name: value` row per attribute.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines: Vec<String> = Vec::new();

        let count = self.data.len();
        if count > 2 * DISPLAY_EDGE_ROWS {
            lines.extend(self.data[..DISPLAY_EDGE_ROWS].iter().map(sample_row));
            lines.push("...".to_string());
            lines.extend(self.data[count - DISPLAY_EDGE_ROWS..].iter().map(sample_row));
        } else {
            lines.extend(self.data.iter().map(sample_row));
        }

        if let Some(entity) = &self.entity {
            lines.push(format!("entity: {}", entity));
        }
        if let Some(metric) = &self.metric {
            lines.push(format!("metric: {}", metric));
        }
        if let Some(tags) = &self.tags {
            let sorted: BTreeMap<_, _> = tags.iter().collect();
            lines.push(format!("tags: {:?}", sorted));
        }
        if let Some(series_type) = &self.series_type {
            lines.push(format!("type: {}", series_type));
        }
        let extra: BTreeMap<_, _> = self.extra.iter().collect();
        for (name, value) in extra {
            match value {
                Value::Object(_) | Value::Array(_) => {}
                Value::String(text) => lines.push(format!("{}: {}", name, text)),
                other => lines.push(format!("{}: {}", name, other)),
            }
        }

        f.write_str(&lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use crate::codec::{deserialize_one, serialize};
    use chrono::NaiveDate;
    use rstest::rstest;
    use serde_json::json;

    fn series_with(samples: &[(i64, f64)]) -> Series {
        let mut series = Series::new("e", "m");
        for (t, v) in samples {
            series.add_value(*v, *t, None).unwrap();
        }
        series
    }

    #[test]
    fn should_collapse_adjacent_duplicate_timestamps_on_read() {
        // given
        let series = series_with(&[(100, 1.0), (100, 2.0), (200, 3.0)]);

        // when
        let values = series.values();
        let times = series.times();

        // then
        assert_eq!(values, vec![Some(2.0), Some(3.0)]);
        assert_eq!(times.len(), 2);
        assert_eq!(series.timestamps(), vec![100, 200]);
        assert_eq!(series.samples().len(), 3);
    }

    #[test]
    fn should_keep_first_seen_position_of_collapsed_timestamp() {
        // given
        let series = series_with(&[(300, 1.0), (100, 2.0), (100, 5.0), (100, 7.0), (200, 3.0)]);

        // when/then
        assert_eq!(series.timestamps(), vec![300, 100, 200]);
        assert_eq!(series.values(), vec![Some(1.0), Some(7.0), Some(3.0)]);
    }

    #[test]
    fn should_not_collapse_non_adjacent_duplicates() {
        // given
        let series = series_with(&[(100, 1.0), (200, 2.0), (100, 3.0)]);

        // when/then
        assert_eq!(series.timestamps(), vec![100, 200, 100]);
    }

    #[test]
    fn should_append_without_resorting() {
        // given
        let series = series_with(&[(300, 1.0), (100, 2.0)]);

        // when/then
        assert_eq!(series.samples()[0].time, 300);
        assert_eq!(series.samples()[1].time, 100);
    }

    #[test]
    fn should_read_nan_string_as_nan_and_null_as_absent() {
        // given
        let value = json!({
            "entity": "e",
            "metric": "m",
            "data": [{"t": 1, "v": "NaN"}, {"t": 2, "v": null}, {"t": 3, "v": 4.5}]
        });

        // when
        let series: Series = deserialize_one(value).unwrap();
        let values = series.values();

        // then
        assert!(values[0].is_some_and(f64::is_nan));
        assert_eq!(values[1], None);
        assert_eq!(values[2], Some(4.5));
    }

    #[test]
    fn should_write_nan_as_string_and_absent_as_null() {
        // given
        let mut series = Series::new("e", "m");
        series.add_value(f64::NAN, 1_i64, None).unwrap();
        series.add_sample(Sample {
            time: 2,
            value: None,
            text: None,
            version: None,
        });

        // when
        let out = series.to_json().unwrap();

        // then
        assert_eq!(out["data"], json!([{"t": 1, "v": "NaN"}, {"t": 2, "v": null}]));
    }

    #[test]
    fn should_read_sample_with_iso_date_text_and_version() {
        // given
        let value = json!({"d": "2015-04-14T07:03:31.000Z", "v": 1, "x": "ok", "version": {"source": "s1"}});

        // when
        let sample: Sample = serde_json::from_value(value).unwrap();

        // then
        assert_eq!(sample.time, 1_428_995_011_000);
        assert_eq!(sample.value, Some(1.0));
        assert_eq!(sample.text.as_deref(), Some("ok"));
        assert_eq!(sample.version, Some(json!({"source": "s1"})));
    }

    #[rstest]
    #[case::no_time(json!({"v": 1}))]
    #[case::text_value(json!({"t": 1, "v": "high"}))]
    #[case::bad_date(json!({"d": "yesterday", "v": 1}))]
    fn should_reject_malformed_sample(#[case] value: Value) {
        // when
        let result = serde_json::from_value::<Sample>(value);

        // then
        assert!(result.is_err());
    }

    #[test]
    fn should_take_now_from_clock_when_time_omitted() {
        // given
        let clock = MockClock::at_millis(1_700_000_000_123);
        let mut series = Series::new("e", "m");

        // when
        series
            .add_value_with_clock(1.0, SampleTime::Now, None, &clock)
            .unwrap();

        // then
        assert_eq!(series.timestamps(), vec![1_700_000_000_123]);
    }

    #[rstest]
    #[case::millis(SampleTime::from(1_428_995_011_000_i64))]
    #[case::float(SampleTime::from(1_428_995_011_000.9_f64))]
    #[case::atsd_text(SampleTime::from("2015-04-14T10:03:31Z+0300"))]
    #[case::iso_text(SampleTime::from("2015-04-14T07:03:31Z"))]
    #[case::calendar(SampleTime::from(
        FixedOffset::west_opt(5 * 3600).unwrap().with_ymd_and_hms(2015, 4, 14, 2, 3, 31).unwrap()
    ))]
    #[case::local(SampleTime::local(
        NaiveDate::from_ymd_opt(2015, 4, 14).unwrap().and_hms_opt(12, 33, 31).unwrap(),
        FixedOffset::east_opt(5 * 3600 + 1800).unwrap()
    ))]
    fn should_convert_every_time_form(#[case] time: SampleTime) {
        // given
        let mut series = Series::new("e", "m");

        // when
        series.add_value(1.0, time, None).unwrap();

        // then
        assert_eq!(series.timestamps(), vec![1_428_995_011_000]);
    }

    #[rstest]
    #[case::nan_float(SampleTime::from(f64::NAN))]
    #[case::infinite_float(SampleTime::from(f64::INFINITY))]
    #[case::unparseable_text(SampleTime::from("last tuesday"))]
    fn should_reject_invalid_time_without_appending(#[case] time: SampleTime) {
        // given
        let mut series = series_with(&[(100, 1.0)]);

        // when
        let result = series.add_value(2.0, time, None);

        // then
        assert!(matches!(result, Err(Error::InvalidTimeValue(_))));
        assert_eq!(series.samples().len(), 1);
    }

    #[test]
    fn should_keep_version_on_added_sample() {
        // given
        let mut series = Series::new("e", "m");

        // when
        series
            .add_value(1.0, 100_i64, Some(json!({"status": "provisional"})))
            .unwrap();
        series
            .add_value(2.0, 100_i64, Some(json!({"status": "final"})))
            .unwrap();

        // then
        assert_eq!(series.values(), vec![Some(2.0)]);
        assert_eq!(series.samples()[0].version, Some(json!({"status": "provisional"})));
    }

    #[test]
    fn should_truncate_long_series_in_text_form() {
        // given
        let samples: Vec<(i64, f64)> = (0..25).map(|i| (i * 1000, i as f64)).collect();
        let series = series_with(&samples);

        // when
        let text = series.to_string();
        let lines: Vec<&str> = text.lines().collect();

        // then
        let sample_rows: Vec<&&str> = lines.iter().filter(|l| l.contains('\t')).collect();
        assert_eq!(sample_rows.len(), 20);
        assert_eq!(lines[10], "...");
        assert_eq!(lines[0], "0\t0");
        assert_eq!(lines[9], "9000\t9");
        assert_eq!(lines[11], "15000\t15");
        assert_eq!(lines[20], "24000\t24");
        assert_eq!(&lines[21..], &["entity: e", "metric: m"]);
    }

    #[test]
    fn should_show_every_row_of_short_series() {
        // given
        let samples: Vec<(i64, f64)> = (0..20).map(|i| (i, 1.5)).collect();
        let series = series_with(&samples);

        // when
        let text = series.to_string();

        // then
        assert!(!text.contains("..."));
        assert_eq!(text.lines().filter(|l| l.contains('\t')).count(), 20);
    }

    #[test]
    fn should_require_entity_and_metric() {
        // given
        let series = Series {
            metric: Some("m".to_string()),
            ..Default::default()
        };

        // when
        let result = serialize(&series);

        // then
        assert!(matches!(
            result,
            Err(Error::MissingRequiredField {
                field: "entity",
                type_name: "Series"
            })
        ));
    }

    #[test]
    fn should_require_data() {
        // given
        let series = Series::new("e", "m");

        // when
        let result = serialize(&series);

        // then
        assert!(matches!(
            result,
            Err(Error::MissingRequiredField {
                field: "data",
                type_name: "Series"
            })
        ));
    }

    #[test]
    fn should_show_server_attributes_in_text_form() {
        // given
        let value = json!({
            "entity": "e",
            "metric": "m",
            "data": [{"t": 1, "v": 1}],
            "lastInsertDate": "2018-01-01T00:00:00.000Z",
            "meta": {"metric": {}}
        });
        let series: Series = deserialize_one(value).unwrap();

        // when
        let text = series.to_string();

        // then
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            &lines[1..],
            ["entity: e", "metric: m", "lastInsertDate: 2018-01-01T00:00:00.000Z"]
        );
    }

    #[test]
    fn should_round_trip_declared_fields() {
        // given
        let mut series = Series::new("e", "m").with_tag("host", "h1");
        series.series_type = Some("HISTORY".to_string());
        series.add_value(1.25, 1_000_i64, None).unwrap();
        series
            .add_value(2.5, 2_000_i64, Some(json!({"source": "gateway"})))
            .unwrap();

        // when
        let restored: Series = deserialize_one(series.to_json().unwrap()).unwrap();

        // then
        assert_eq!(restored, series);
    }

    #[test]
    fn should_drop_extra_keys_on_serialize() {
        // given
        let value = json!({
            "entity": "e",
            "metric": "m",
            "data": [{"t": 1, "v": 1}],
            "lastInsertDate": "2018-01-01T00:00:00.000Z"
        });

        // when
        let series: Series = deserialize_one(value).unwrap();
        let out = series.to_json().unwrap();

        // then
        assert_eq!(series.last_insert_date(), Some("2018-01-01T00:00:00.000Z"));
        assert_eq!(out, json!({"entity": "e", "metric": "m", "data": [{"t": 1, "v": 1.0}]}));
    }
}
