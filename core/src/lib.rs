//! Typed service facades over one shared, authenticated dispatcher.
//!
//! # Overview
//! Each backend integration (email, SMS, ...) is exposed as a small facade
//! type. Facades only shape arguments; every call funnels through a single
//! `Dispatcher` that attaches the session token, encodes the request, hands
//! it to a `Transport` and maps the response to a typed result or a
//! `ServiceError`.
//!
//! # Design
//! - `Dispatcher` is immutable and `Send + Sync`; facades share it through
//!   `Arc` and can be cloned freely.
//! - Request building and response parsing are pure functions of plain
//!   `HttpRequest` / `HttpResponse` data, so the I/O boundary is explicit.
//! - `ServiceRegistry` builds any number of facades against one dispatcher,
//!   so they all share one session.
//! - `todo` is the headless binding model for a todo list view.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod invocation;
pub mod registry;
pub mod services;
pub mod session;
pub mod todo;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ClientConfig, ConfigError};
pub use dispatcher::{Dispatcher, Endpoint};
pub use error::ServiceError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use invocation::{encode_arg, Invocation};
pub use registry::ServiceRegistry;
pub use services::mongodb::{
    DeleteResult, InsertOneResult, RemoteMongoCollection, RemoteMongoServiceClient, UpdateResult,
};
pub use services::ses::{SendResult, SesSender, SesServiceClient};
#[allow(deprecated)]
pub use services::ses_legacy::LegacySesServiceClient;
pub use services::twilio::TwilioServiceClient;
pub use services::{NamedService, ServiceClient};
pub use session::{Session, SharedSession, StaticSession};
pub use todo::{ItemUpdater, TodoItem, TodoListAdapter, TodoRow};
pub use transport::{Transport, UreqTransport};
