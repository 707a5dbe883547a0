//! Older SES facade, kept for callers that have not migrated.
//!
//! It owns no state of its own: it forwards to a `SesServiceClient` bound
//! to the same service client, so removing this module cannot change the
//! current facade's behavior.
#![allow(deprecated)]

use crate::error::ServiceError;
use crate::services::ses::{SendResult, SesSender, SesServiceClient};
use crate::services::{NamedService, ServiceClient};

#[deprecated(note = "use SesServiceClient instead")]
#[derive(Debug, Clone)]
pub struct LegacySesServiceClient {
    proxy: SesServiceClient,
}

impl LegacySesServiceClient {
    pub fn new(client: ServiceClient) -> Self {
        Self {
            proxy: SesServiceClient::new(client),
        }
    }
}

impl SesSender for LegacySesServiceClient {
    fn send_email(
        &self,
        to: &str,
        from: &str,
        subject: &str,
        body: &str,
    ) -> Result<SendResult, ServiceError> {
        self.proxy.send_email(to, from, subject, body)
    }
}

impl NamedService for LegacySesServiceClient {
    const DEFAULT_NAME: &'static str = SesServiceClient::DEFAULT_NAME;

    fn from_service_client(client: ServiceClient) -> Self {
        Self::new(client)
    }
}
