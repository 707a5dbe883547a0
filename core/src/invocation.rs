//! A single named-function call: name, ordered arguments, optional service.

use serde::Serialize;
use serde_json::Value;

use crate::error::ServiceError;

/// One outbound function call. Serializes directly as the request body
/// (`name`, `arguments`, then `service` when present).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invocation {
    pub name: String,
    pub arguments: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl Invocation {
    pub fn new(name: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
            service: None,
        }
    }

    /// Route the call to a named service instead of a user-defined function.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }
}

/// Encode one argument, keeping struct field order.
pub fn encode_arg<T: Serialize>(value: &T) -> Result<Value, ServiceError> {
    serde_json::to_value(value).map_err(|e| ServiceError::Encoding(e.to_string()))
}
