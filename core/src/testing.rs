//! In-process transports for unit tests.

use std::sync::{Arc, Mutex};

use crate::dispatcher::{Dispatcher, Endpoint};
use crate::error::ServiceError;
use crate::http::{HttpRequest, HttpResponse};
use crate::session::StaticSession;
use crate::transport::Transport;

type Responder = Box<dyn Fn() -> Result<HttpResponse, ServiceError> + Send + Sync>;

/// Records every request and answers each with the same canned outcome.
pub(crate) struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    respond: Responder,
}

impl RecordingTransport {
    pub(crate) fn replying(status: u16, body: &str) -> Arc<Self> {
        let body = body.to_string();
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            respond: Box::new(move || {
                Ok(HttpResponse {
                    status,
                    headers: Vec::new(),
                    body: body.clone(),
                })
            }),
        })
    }

    pub(crate) fn failing<F>(error: F) -> Arc<Self>
    where
        F: Fn() -> ServiceError + Send + Sync + 'static,
    {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            respond: Box::new(move || Err(error())),
        })
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Request bodies in send order.
    pub(crate) fn bodies(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| r.body.unwrap_or_default())
            .collect()
    }
}

impl Transport for RecordingTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ServiceError> {
        self.requests.lock().unwrap().push(request);
        (self.respond)()
    }
}

pub(crate) fn dispatcher_over(transport: Arc<RecordingTransport>) -> Arc<Dispatcher> {
    Arc::new(Dispatcher::new(
        Endpoint::new("http://localhost:3000", "app-1"),
        Arc::new(StaticSession::new("tok")),
        transport,
    ))
}
