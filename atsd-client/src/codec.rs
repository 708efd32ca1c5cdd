//! Mapping between JSON payloads and model types.
//!
//! Outbound, every model is a closed projection: [`serialize`] walks the
//! type's field table and emits only the fields declared there. Required
//! fields must resolve to a value; allowed fields are omitted when absent.
//!
//! Inbound, models are open records: [`deserialize`] matches JSON keys to
//! struct fields and keeps every unknown key in the model's `extra` map.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, Result, json_kind};

/// Resolves one field of a model to its JSON value, `None` when absent.
pub type Accessor<M> = fn(&M) -> Result<Option<Value>>;

/// One entry of a model's field table.
pub struct Field<M> {
    pub name: &'static str,
    pub required: bool,
    pub accessor: Accessor<M>,
}

impl<M> Field<M> {
    pub const fn required(name: &'static str, accessor: Accessor<M>) -> Self {
        Self {
            name,
            required: true,
            accessor,
        }
    }

    pub const fn allowed(name: &'static str, accessor: Accessor<M>) -> Self {
        Self {
            name,
            required: false,
            accessor,
        }
    }
}

/// A type with a declared set of wire fields.
///
/// Implementors list their fields in [`Model::fields`]; serialization never
/// emits anything outside that table.
pub trait Model: Sized + 'static {
    /// Type name reported in errors.
    const TYPE_NAME: &'static str;

    fn fields() -> &'static [Field<Self>];

    /// Serializes this model to a JSON object.
    fn to_json(&self) -> Result<Value> {
        serialize(self).map(Value::Object)
    }
}

/// Serializes a model into a JSON object holding only its declared fields.
///
/// Required fields are resolved first, then allowed fields, each in table
/// order.
///
/// # Errors
///
/// Returns [`Error::MissingRequiredField`] naming the field and the model
/// type when a required field is absent.
pub fn serialize<M: Model>(model: &M) -> Result<Map<String, Value>> {
    let mut out = Map::new();

    for field in M::fields().iter().filter(|f| f.required) {
        let value = (field.accessor)(model)?.ok_or(Error::MissingRequiredField {
            field: field.name,
            type_name: M::TYPE_NAME,
        })?;
        out.insert(field.name.to_string(), value);
    }

    for field in M::fields().iter().filter(|f| !f.required) {
        if let Some(value) = (field.accessor)(model)? {
            out.insert(field.name.to_string(), value);
        }
    }

    Ok(out)
}

/// Serializes a batch of models into a JSON array, failing on the first
/// invalid model.
pub fn serialize_all<M: Model>(models: &[M]) -> Result<Value> {
    models
        .iter()
        .map(Model::to_json)
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

/// Accessor helper: converts a plain value to JSON. `null` counts as absent.
pub fn json<V: Serialize + ?Sized>(value: &V) -> Result<Option<Value>> {
    match serde_json::to_value(value).map_err(Error::Encode)? {
        Value::Null => Ok(None),
        value => Ok(Some(value)),
    }
}

/// Accessor helper: serializes an optional nested model in place.
pub fn nested<M: Model>(model: &Option<M>) -> Result<Option<Value>> {
    model.as_ref().map(Model::to_json).transpose()
}

/// Result of [`deserialize`]: one record for a mapping, many for a sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Flattens into a vector, wrapping a single record.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

/// Deserializes a mapping into one model or a sequence of mappings into many,
/// preserving order.
///
/// # Errors
///
/// Returns [`Error::TypeMismatch`] when the value (or a sequence element) is
/// not a mapping.
pub fn deserialize<T: Model + DeserializeOwned>(value: Value) -> Result<OneOrMany<T>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(deserialize_record)
            .collect::<Result<Vec<_>>>()
            .map(OneOrMany::Many),
        Value::Object(_) => deserialize_record(value).map(OneOrMany::One),
        other => Err(mismatch::<T>("mapping or sequence", &other)),
    }
}

/// Deserializes a single mapping. A sequence is a type mismatch.
pub fn deserialize_one<T: Model + DeserializeOwned>(value: Value) -> Result<T> {
    match value {
        Value::Object(_) => deserialize_record(value),
        other => Err(mismatch::<T>("mapping", &other)),
    }
}

/// Deserializes a sequence of mappings. A lone mapping is a type mismatch.
pub fn deserialize_list<T: Model + DeserializeOwned>(value: Value) -> Result<Vec<T>> {
    match value {
        Value::Array(items) => items.into_iter().map(deserialize_record).collect(),
        other => Err(mismatch::<T>("sequence", &other)),
    }
}

fn deserialize_record<T: Model + DeserializeOwned>(value: Value) -> Result<T> {
    if !value.is_object() {
        return Err(mismatch::<T>("mapping", &value));
    }
    serde_json::from_value(value).map_err(|source| Error::Decode {
        type_name: T::TYPE_NAME,
        source,
    })
}

fn mismatch<T: Model>(expected: &'static str, found: &Value) -> Error {
    Error::TypeMismatch {
        type_name: T::TYPE_NAME,
        expected,
        found: json_kind(found),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Window {
        width: Option<i64>,
        unit: Option<String>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    }

    impl Model for Window {
        const TYPE_NAME: &'static str = "Window";

        fn fields() -> &'static [Field<Self>] {
            const FIELDS: &[Field<Window>] = &[
                Field::required("width", |w| json(&w.width)),
                Field::allowed("unit", |w| json(&w.unit)),
            ];
            FIELDS
        }
    }

    #[derive(Debug, Default)]
    struct Panel {
        title: Option<String>,
        window: Option<Window>,
        note: Option<String>,
    }

    impl Model for Panel {
        const TYPE_NAME: &'static str = "Panel";

        fn fields() -> &'static [Field<Self>] {
            const FIELDS: &[Field<Panel>] = &[
                Field::required("title", |p| json(&p.title)),
                Field::allowed("window", |p| nested(&p.window)),
            ];
            FIELDS
        }
    }

    #[test]
    fn should_fail_naming_missing_required_field_and_type() {
        // given
        let window = Window {
            unit: Some("HOUR".to_string()),
            ..Default::default()
        };

        // when
        let result = serialize(&window);

        // then
        match result {
            Err(Error::MissingRequiredField { field, type_name }) => {
                assert_eq!(field, "width");
                assert_eq!(type_name, "Window");
            }
            other => panic!("expected MissingRequiredField, got {:?}", other),
        }
    }

    #[test]
    fn should_omit_absent_allowed_fields() {
        // given
        let window = Window {
            width: Some(5),
            ..Default::default()
        };

        // when
        let out = serialize(&window).unwrap();

        // then
        assert_eq!(Value::Object(out), json!({"width": 5}));
    }

    #[test]
    fn should_drop_undeclared_fields() {
        // given
        let panel = Panel {
            title: Some("cpu".to_string()),
            note: Some("not on the wire".to_string()),
            ..Default::default()
        };

        // when
        let out = serialize(&panel).unwrap();

        // then
        assert_eq!(Value::Object(out), json!({"title": "cpu"}));
    }

    #[test]
    fn should_serialize_nested_model_in_place() {
        // given
        let panel = Panel {
            title: Some("cpu".to_string()),
            window: Some(Window {
                width: Some(15),
                unit: Some("MINUTE".to_string()),
                ..Default::default()
            }),
            note: None,
        };

        // when
        let out = panel.to_json().unwrap();

        // then
        assert_eq!(
            out,
            json!({"title": "cpu", "window": {"width": 15, "unit": "MINUTE"}})
        );
    }

    #[test]
    fn should_propagate_nested_missing_field() {
        // given
        let panel = Panel {
            title: Some("cpu".to_string()),
            window: Some(Window::default()),
            note: None,
        };

        // when
        let result = serialize(&panel);

        // then
        assert!(matches!(
            result,
            Err(Error::MissingRequiredField {
                field: "width",
                type_name: "Window"
            })
        ));
    }

    #[test]
    fn should_deserialize_mapping_into_one_record() {
        // given
        let value = json!({"width": 3, "unit": "DAY"});

        // when
        let result = deserialize::<Window>(value).unwrap();

        // then
        assert_eq!(
            result,
            OneOrMany::One(Window {
                width: Some(3),
                unit: Some("DAY".to_string()),
                extra: Map::new(),
            })
        );
    }

    #[test]
    fn should_deserialize_sequence_preserving_order() {
        // given
        let value = json!([{"width": 1}, {"width": 2}, {"width": 3}]);

        // when
        let result = deserialize::<Window>(value).unwrap().into_vec();

        // then
        let widths: Vec<_> = result.iter().map(|w| w.width).collect();
        assert_eq!(widths, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn should_keep_unknown_keys_on_deserialize_and_drop_them_on_serialize() {
        // given
        let value = json!({"width": 3, "alignment": "left"});

        // when
        let window = deserialize_one::<Window>(value).unwrap();
        let out = serialize(&window).unwrap();

        // then
        assert_eq!(window.extra.get("alignment"), Some(&json!("left")));
        assert_eq!(Value::Object(out), json!({"width": 3}));
    }

    #[test]
    fn should_reject_scalar_input() {
        // when
        let result = deserialize::<Window>(json!("window"));

        // then
        assert!(matches!(
            result,
            Err(Error::TypeMismatch {
                type_name: "Window",
                found: "string",
                ..
            })
        ));
    }

    #[test]
    fn should_reject_sequence_where_mapping_expected() {
        // when
        let result = deserialize_one::<Window>(json!([{"width": 1}]));

        // then
        assert!(matches!(
            result,
            Err(Error::TypeMismatch {
                expected: "mapping",
                found: "sequence",
                ..
            })
        ));
    }

    #[test]
    fn should_reject_mapping_where_sequence_expected() {
        // when
        let result = deserialize_list::<Window>(json!({"width": 1}));

        // then
        assert!(matches!(
            result,
            Err(Error::TypeMismatch {
                expected: "sequence",
                found: "mapping",
                ..
            })
        ));
    }

    #[test]
    fn should_reject_non_mapping_sequence_element() {
        // when
        let result = deserialize_list::<Window>(json!([{"width": 1}, 7]));

        // then
        assert!(matches!(
            result,
            Err(Error::TypeMismatch { found: "number", .. })
        ));
    }
}
