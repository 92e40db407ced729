//! Backend call and result types.

use std::time::SystemTime;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::backend::error::BackendError;

/// Key carrying the numeric status code in a procedure result map.
pub const RETURN_CODE: &str = "RETURN_CODE";
/// Key carrying the serialized JSON payload in a procedure result map.
pub const RESULTS_STRING: &str = "RESULTS_STRING";

/// The normalized outcome of one backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResult {
    pub status_code: i64,
    /// Raw JSON text, `None` when the backend returned no content.
    pub payload: Option<String>,
}

impl BackendResult {
    pub fn new(status_code: i64, payload: Option<String>) -> Self {
        Self {
            status_code,
            payload,
        }
    }

    /// Normalize the map-based result contract returned by a procedure.
    ///
    /// `RETURN_CODE` must be an integer. `RESULTS_STRING` may be a string,
    /// null, or missing.
    pub fn from_result_map(map: &Map<String, Value>) -> Result<Self, BackendError> {
        let status_code = match map.get(RETURN_CODE) {
            Some(value) => value.as_i64().ok_or_else(|| {
                BackendError::Protocol(format!("{} is not an integer: {}", RETURN_CODE, value))
            })?,
            None => {
                return Err(BackendError::Protocol(format!("missing {}", RETURN_CODE)));
            }
        };

        let payload = match map.get(RESULTS_STRING) {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(other) => {
                return Err(BackendError::Protocol(format!(
                    "{} is not a string: {}",
                    RESULTS_STRING,
                    type_name(other)
                )));
            }
        };

        Ok(Self::new(status_code, payload))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Ordered, named arguments bound to a procedure call.
///
/// Values are passed through uninterpreted; absent optionals bind as null.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProcedureArgs(Vec<(String, Value)>);

impl ProcedureArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a named argument.
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.push((name.into(), value.into()));
        self
    }

    /// Bind an optional argument, null when absent.
    pub fn bind_opt<V: Into<Value>>(self, name: impl Into<String>, value: Option<V>) -> Self {
        let value = value.map(Into::into).unwrap_or(Value::Null);
        self.bind(name, value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Arguments as a JSON object keyed by name.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in self.iter() {
            map.insert(name.to_string(), value.clone());
        }
        Value::Object(map)
    }
}

/// One stored-procedure invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureCall {
    /// Procedure name, e.g. `GET_OUTAGE_HISTORY`.
    pub procedure: String,
    pub environment: String,
    pub correlation_id: String,
    pub requested_at: SystemTime,
    pub session_id: String,
    pub transaction_id: String,
    pub client_id: String,
    /// Operation-specific arguments.
    pub args: ProcedureArgs,
    pub output_table: String,
}

impl ProcedureCall {
    /// JSON envelope sent to the procedure gateway.
    pub fn to_json(&self) -> Value {
        let requested_at_ms = self
            .requested_at
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        serde_json::json!({
            "procedure": self.procedure,
            "environment": self.environment,
            "guid": self.correlation_id,
            "requestedAtMs": requested_at_ms,
            "sessionId": self.session_id,
            "transactionId": self.transaction_id,
            "clientId": self.client_id,
            "args": self.args.to_json(),
            "queryOutputTable": self.output_table,
        })
    }
}
