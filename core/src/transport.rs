//! The network boundary.
//!
//! # Design
//! `Transport` executes one `HttpRequest` and returns whatever the server
//! answered, including 4xx/5xx, as an `HttpResponse`. Only failures that
//! produce no response at all (connect errors, I/O, timeouts) come back as
//! `ServiceError::Transport`. Status interpretation stays in the dispatcher.

use std::time::Duration;

use crate::error::ServiceError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes a single HTTP exchange.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ServiceError>;
}

impl<F> Transport for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, ServiceError> + Send + Sync,
{
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ServiceError> {
        self(request)
    }
}

/// Blocking transport backed by a shared `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        // Statuses are handed back as data so the dispatcher can map them.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ServiceError> {
        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.path);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.path);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_transports() {
        let transport = |req: HttpRequest| -> Result<HttpResponse, ServiceError> {
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: req.path,
            })
        };
        let response = transport
            .execute(HttpRequest {
                method: HttpMethod::Get,
                path: "http://localhost/ping".to_string(),
                headers: Vec::new(),
                body: None,
            })
            .unwrap();
        assert_eq!(response.body, "http://localhost/ping");
    }

    #[test]
    fn unreachable_host_is_transport_error() {
        // Grab a free port, then close it so nothing is listening there.
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let transport = UreqTransport::new(Duration::from_secs(2));
        let err = transport
            .execute(HttpRequest {
                method: HttpMethod::Post,
                path: format!("http://{addr}/functions/call"),
                headers: vec![("content-type".to_string(), "application/json".to_string())],
                body: Some("{}".to_string()),
            })
            .unwrap_err();
        assert!(err.is_retryable(), "got {err:?}");
    }

    #[test]
    fn silent_server_times_out_as_transport_error() {
        // The kernel completes the handshake, but nobody ever answers.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let transport = UreqTransport::new(Duration::from_secs(1));

        let started = std::time::Instant::now();
        let err = transport
            .execute(HttpRequest {
                method: HttpMethod::Post,
                path: format!("http://{addr}/functions/call"),
                headers: vec![("content-type".to_string(), "application/json".to_string())],
                body: Some("{}".to_string()),
            })
            .unwrap_err();

        assert!(matches!(err, ServiceError::Transport(_)), "got {err:?}");
        assert!(err.is_retryable());
        assert!(started.elapsed() < Duration::from_secs(10));
        drop(listener);
    }
}
