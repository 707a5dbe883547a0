//! Integration facades.
//!
//! # Design
//! A facade is a thin typed handle over one backend capability. It holds a
//! `ServiceClient` (shared dispatcher plus service name) and nothing else,
//! so it can be cloned and kept around freely. Facade methods only shape
//! arguments: presence checks, field order, function name. Auth, encoding,
//! transport and error mapping all happen in the dispatcher.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::dispatcher::Dispatcher;
use crate::error::ServiceError;
use crate::invocation::Invocation;

pub mod mongodb;
pub mod ses;
pub mod ses_legacy;
pub mod twilio;

/// A facade type that can be built from a service-bound client.
pub trait NamedService: Sized {
    /// Service name used when the caller does not pick one.
    const DEFAULT_NAME: &'static str;

    fn from_service_client(client: ServiceClient) -> Self;
}

/// Dispatcher handle bound to one named backend service.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    dispatcher: Arc<Dispatcher>,
    name: String,
}

impl ServiceClient {
    pub fn new(dispatcher: Arc<Dispatcher>, name: impl Into<String>) -> Self {
        Self {
            dispatcher,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Call `function` on this service and decode the result as `T`.
    pub fn call_function<T: DeserializeOwned>(
        &self,
        function: &str,
        arguments: Vec<Value>,
    ) -> Result<T, ServiceError> {
        let invocation = Invocation::new(function, arguments).with_service(self.name.as_str());
        self.dispatcher.invoke(&invocation)
    }
}

/// Reject a missing or blank value before anything is sent.
pub(crate) fn require_present(name: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidArgument {
            name: name.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}
