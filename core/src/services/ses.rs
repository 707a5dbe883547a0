//! Email sending through the SES service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ServiceError;
use crate::invocation::encode_arg;
use crate::services::{require_present, NamedService, ServiceClient};

pub const SEND_FUNCTION: &str = "send";

/// Outcome of a successful send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    #[serde(rename = "messageId")]
    pub message_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailArgs<'a> {
    to_address: &'a str,
    from_address: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Argument list for `send`: one object with the four fields in fixed order.
pub(crate) fn send_email_arguments(
    to: &str,
    from: &str,
    subject: &str,
    body: &str,
) -> Result<Vec<Value>, ServiceError> {
    require_present("to", to)?;
    require_present("from", from)?;
    require_present("subject", subject)?;
    require_present("body", body)?;

    let args = SendEmailArgs {
        to_address: to,
        from_address: from,
        subject,
        body,
    };
    Ok(vec![encode_arg(&args)?])
}

/// Anything that can send an email. Implemented by every SES facade variant.
pub trait SesSender {
    /// Send one email. Address syntax is checked by the backend; blank values
    /// are rejected locally with `InvalidArgument` and nothing is sent.
    fn send_email(
        &self,
        to: &str,
        from: &str,
        subject: &str,
        body: &str,
    ) -> Result<SendResult, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct SesServiceClient {
    client: ServiceClient,
}

impl SesServiceClient {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    pub fn service_name(&self) -> &str {
        self.client.name()
    }
}

impl SesSender for SesServiceClient {
    fn send_email(
        &self,
        to: &str,
        from: &str,
        subject: &str,
        body: &str,
    ) -> Result<SendResult, ServiceError> {
        let arguments = send_email_arguments(to, from, subject, body)?;
        self.client.call_function(SEND_FUNCTION, arguments)
    }
}

impl NamedService for SesServiceClient {
    const DEFAULT_NAME: &'static str = "ses";

    fn from_service_client(client: ServiceClient) -> Self {
        Self::new(client)
    }
}
