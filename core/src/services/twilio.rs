//! SMS sending through the Twilio service.

use serde::Serialize;

use crate::error::ServiceError;
use crate::invocation::encode_arg;
use crate::services::{require_present, NamedService, ServiceClient};

pub const SEND_FUNCTION: &str = "send";

#[derive(Serialize)]
struct SendMessageArgs<'a> {
    to: &'a str,
    from: &'a str,
    body: &'a str,
}

#[derive(Debug, Clone)]
pub struct TwilioServiceClient {
    client: ServiceClient,
}

impl TwilioServiceClient {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// Send a text message. The backend returns no payload on success.
    pub fn send_message(&self, to: &str, from: &str, body: &str) -> Result<(), ServiceError> {
        require_present("to", to)?;
        require_present("from", from)?;
        require_present("body", body)?;

        let args = SendMessageArgs { to, from, body };
        self.client
            .call_function(SEND_FUNCTION, vec![encode_arg(&args)?])
    }
}

impl NamedService for TwilioServiceClient {
    const DEFAULT_NAME: &'static str = "twilio";

    fn from_service_client(client: ServiceClient) -> Self {
        Self::new(client)
    }
}
