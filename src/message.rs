// src/message.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RelayError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
}

impl TryFrom<Value> for ChatRequest {
    type Error = RelayError;

    fn try_from(payload: Value) -> Result<Self, Self::Error> {
        let mut fields = match payload {
            Value::Object(fields) => fields,
            other => {
                return Err(RelayError::Unexpected(anyhow::anyhow!(
                    "request body must be a JSON object, got {}",
                    type_name(&other)
                )));
            }
        };

        match fields.remove("message") {
            None => Err(RelayError::Validation),
            Some(value) if is_falsy(&value) => Err(RelayError::Validation),
            Some(Value::String(message)) => Ok(Self { message }),
            Some(other) => Err(RelayError::Unexpected(anyhow::anyhow!(
                "message must be a string, got {}",
                type_name(&other)
            ))),
        }
    }
}

/// Either the generated text or an error message, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatResponse {
    Response(String),
    Error(String),
}

// null, false, 0, "", [] and {} all count as "no message".
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
