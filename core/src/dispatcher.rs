//! The single funnel for every outbound integration call.
//!
//! # Design
//! `Dispatcher` owns the endpoint identity, a read-only session handle and
//! the transport. It is immutable after construction and shared behind an
//! `Arc` by every facade. Each call is split the same way throughout:
//! `build_request` produces an `HttpRequest`, the transport executes it
//! once, `parse_response` turns the `HttpResponse` into a typed value or a
//! `ServiceError`. Both halves are pure so they can be tested without I/O.
//!
//! Nothing is cached and nothing is retried here. A second `invoke` with the
//! same arguments is a second backend call.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::ServiceError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::invocation::Invocation;
use crate::session::Session;
use crate::transport::{Transport, UreqTransport};

/// Backend error code meaning the session is no longer valid.
pub const INVALID_SESSION_CODE: &str = "InvalidSession";

/// Code reported when a failure body is not in the backend's error shape.
pub const UNKNOWN_ERROR_CODE: &str = "Unknown";

/// Base URL and application id of the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
    app_id: String,
}

impl Endpoint {
    pub fn new(base_url: &str, app_id: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            app_id: app_id.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn function_call_url(&self) -> String {
        format!(
            "{}/api/client/v2.0/app/{}/functions/call",
            self.base_url, self.app_id
        )
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    error_code: Option<String>,
}

pub struct Dispatcher {
    endpoint: Endpoint,
    session: Arc<dyn Session>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(
        endpoint: Endpoint,
        session: Arc<dyn Session>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            endpoint,
            session,
            transport,
        }
    }

    /// Dispatcher over HTTP using the blocking `ureq` transport.
    pub fn connect(config: &ClientConfig, session: Arc<dyn Session>) -> Self {
        Self::new(
            Endpoint::new(&config.base_url, &config.app_id),
            session,
            Arc::new(UreqTransport::new(config.timeout)),
        )
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Build the function-call request for `invocation`.
    ///
    /// Reads the session token exactly once. Fails with `Authentication`
    /// when there is no token, so nothing goes out with stale credentials.
    pub fn build_request(&self, invocation: &Invocation) -> Result<HttpRequest, ServiceError> {
        if invocation.name.trim().is_empty() {
            return Err(ServiceError::InvalidArgument {
                name: "function name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        let token = self
            .session
            .access_token()
            .ok_or_else(|| ServiceError::Authentication {
                message: "no active session".to_string(),
            })?;
        let body =
            serde_json::to_string(invocation).map_err(|e| ServiceError::Encoding(e.to_string()))?;

        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.endpoint.function_call_url(),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("authorization".to_string(), format!("Bearer {token}")),
            ],
            body: Some(body),
        })
    }

    /// Decode a backend response into `T`, or map the failure.
    pub fn parse_response<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<T, ServiceError> {
        if !response.is_success() {
            return Err(failure_from(&response));
        }
        serde_json::from_str(&response.body).map_err(|e| ServiceError::Decoding(e.to_string()))
    }

    /// Invoke a backend function and decode its result as `T`.
    pub fn invoke<T: DeserializeOwned>(&self, invocation: &Invocation) -> Result<T, ServiceError> {
        let service = invocation.service.as_deref().unwrap_or("-");

        let result = self
            .build_request(invocation)
            .and_then(|request| {
                tracing::debug!(
                    function = %invocation.name,
                    service,
                    arguments = invocation.arguments.len(),
                    "Invoking function"
                );
                self.transport.execute(request)
            })
            .and_then(|response| self.parse_response(response));

        if let Err(err) = &result {
            match err {
                ServiceError::Decoding(reason) => tracing::error!(
                    function = %invocation.name,
                    service,
                    %reason,
                    "Response did not match the expected result type"
                ),
                other => tracing::warn!(
                    function = %invocation.name,
                    service,
                    error = %other,
                    "Function call failed"
                ),
            }
        }

        result
    }
}

/// Map a non-2xx response to `Authentication` or `Backend`.
fn failure_from(response: &HttpResponse) -> ServiceError {
    let (code, message) = match serde_json::from_str::<ErrorBody>(&response.body) {
        Ok(body) => (
            body.error_code
                .unwrap_or_else(|| UNKNOWN_ERROR_CODE.to_string()),
            body.error,
        ),
        Err(_) => (UNKNOWN_ERROR_CODE.to_string(), response.body.clone()),
    };

    if response.status == 401 || code == INVALID_SESSION_CODE {
        return ServiceError::Authentication { message };
    }
    ServiceError::Backend {
        status: response.status,
        code,
        message,
    }
}
