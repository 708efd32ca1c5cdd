//! Error types for the ATSD client.

use serde_json::Value;
use thiserror::Error;

/// Errors returned by model serialization, time conversion and service calls.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field had no value when the model was serialized.
    #[error("missing required field `{field}` for {type_name}")]
    MissingRequiredField {
        field: &'static str,
        type_name: &'static str,
    },

    /// A JSON value had the wrong shape for the requested model type.
    #[error("cannot deserialize {type_name}: expected {expected}, found {found}")]
    TypeMismatch {
        type_name: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// A sample time could not be converted to epoch milliseconds.
    #[error("invalid time value: {0}")]
    InvalidTimeValue(String),

    /// The server answered with a non-2xx status.
    #[error("server returned status {status_code}: {body}")]
    Server { status_code: u16, body: String },

    /// Input rejected before any request was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The response was valid JSON but not shaped as expected.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("failed to decode {type_name}: {source}")]
    Decode {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl Error {
    /// HTTP status code carried by a [`Error::Server`] error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Server { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Returns true for a 404 reply from the server.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Short name of a JSON value's shape, used in [`Error::TypeMismatch`].
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_expose_status_code_of_server_error() {
        // given
        let err = Error::Server {
            status_code: 404,
            body: "not found".to_string(),
        };

        // when/then
        assert_eq!(err.status_code(), Some(404));
        assert!(err.is_not_found());
    }

    #[test]
    fn should_have_no_status_code_for_local_errors() {
        // given
        let err = Error::InvalidInput("name is empty".to_string());

        // when/then
        assert_eq!(err.status_code(), None);
        assert!(!err.is_not_found());
    }

    #[test]
    fn should_name_field_and_type_in_missing_field_message() {
        // given
        let err = Error::MissingRequiredField {
            field: "entity",
            type_name: "Series",
        };

        // when
        let message = err.to_string();

        // then
        assert_eq!(message, "missing required field `entity` for Series");
    }
}
