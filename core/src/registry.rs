//! Builds facades that share one dispatcher.
//!
//! Every facade handed out by a `ServiceRegistry` points at the same
//! `Dispatcher`, so they share one session: when it goes invalid, all of
//! them fail with `Authentication` together.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::dispatcher::Dispatcher;
use crate::error::ServiceError;
use crate::invocation::Invocation;
use crate::services::{NamedService, ServiceClient};

#[derive(Debug, Clone)]
pub struct ServiceRegistry {
    dispatcher: Arc<Dispatcher>,
}

impl ServiceRegistry {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn service_client(&self, name: &str) -> ServiceClient {
        ServiceClient::new(Arc::clone(&self.dispatcher), name)
    }

    /// Facade `F` bound to the service called `name`.
    pub fn get<F: NamedService>(&self, name: &str) -> F {
        F::from_service_client(self.service_client(name))
    }

    /// Facade `F` bound to its conventional service name.
    pub fn get_default<F: NamedService>(&self) -> F {
        self.get(F::DEFAULT_NAME)
    }

    /// Call a user-defined function that belongs to no service.
    pub fn call_function<T: DeserializeOwned>(
        &self,
        function: &str,
        arguments: Vec<Value>,
    ) -> Result<T, ServiceError> {
        self.dispatcher
            .invoke(&Invocation::new(function, arguments))
    }
}
