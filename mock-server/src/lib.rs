use std::{collections::HashSet, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub mod mongodb;

pub const DEFAULT_APP_ID: &str = "test-app";
pub const DEFAULT_TOKEN: &str = "test-token";

/// Body of `POST .../functions/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub error_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SentEmail {
    pub message_id: String,
    pub to_address: String,
    pub from_address: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SentMessage {
    pub to: String,
    pub from: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Ses,
    Twilio,
    MongoDb,
}

/// What the backend accepts: app id, valid tokens, service names.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub app_id: String,
    pub tokens: HashSet<String>,
    pub services: Vec<(String, ServiceKind)>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            tokens: HashSet::from([DEFAULT_TOKEN.to_string()]),
            services: vec![
                ("ses".to_string(), ServiceKind::Ses),
                ("twilio".to_string(), ServiceKind::Twilio),
                ("mongodb-atlas".to_string(), ServiceKind::MongoDb),
            ],
        }
    }
}

/// Everything sent through the messaging services, as listed by `/sent`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outbox {
    pub emails: Vec<SentEmail>,
    pub messages: Vec<SentMessage>,
}

#[derive(Clone)]
pub struct Backend {
    config: Arc<BackendConfig>,
    outbox: Arc<RwLock<Outbox>>,
    collections: Arc<RwLock<mongodb::Collections>>,
}

type Failure = (StatusCode, Json<ErrorBody>);

fn failure(status: StatusCode, code: &str, error: impl Into<String>) -> Failure {
    (
        status,
        Json(ErrorBody {
            error: error.into(),
            error_code: code.to_string(),
        }),
    )
}

fn invalid_parameter(error: impl Into<String>) -> Failure {
    failure(StatusCode::BAD_REQUEST, "InvalidParameter", error)
}

pub fn app() -> Router {
    app_with(BackendConfig::default())
}

pub fn app_with(config: BackendConfig) -> Router {
    let backend = Backend {
        config: Arc::new(config),
        outbox: Arc::new(RwLock::new(Outbox::default())),
        collections: Arc::new(RwLock::new(mongodb::Collections::new())),
    };
    Router::new()
        .route("/api/client/v2.0/app/{app_id}/functions/call", post(call_function))
        .route("/api/client/v2.0/app/{app_id}/sent", get(list_sent))
        .with_state(backend)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, config: BackendConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

fn authorize(backend: &Backend, app_id: &str, headers: &HeaderMap) -> Result<(), Failure> {
    if app_id != backend.config.app_id {
        return Err(failure(
            StatusCode::NOT_FOUND,
            "AppNotFound",
            format!("app not found: {app_id}"),
        ));
    }
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match token {
        Some(token) if backend.config.tokens.contains(token) => Ok(()),
        _ => Err(failure(
            StatusCode::UNAUTHORIZED,
            "InvalidSession",
            "invalid session",
        )),
    }
}

// The body is taken raw so the session is checked before it is decoded.
async fn call_function(
    State(backend): State<Backend>,
    Path(app_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, Failure> {
    authorize(&backend, &app_id, &headers)?;
    let call: FunctionCall = serde_json::from_slice(&body)
        .map_err(|e| invalid_parameter(format!("malformed function call: {e}")))?;

    let Some(service) = call.service.as_deref() else {
        tracing::info!(function = %call.name, "User function call");
        return user_function(&call);
    };
    let kind = backend
        .config
        .services
        .iter()
        .find(|(name, _)| name == service)
        .map(|(_, kind)| *kind)
        .ok_or_else(|| {
            failure(
                StatusCode::NOT_FOUND,
                "ServiceNotFound",
                format!("service not found: '{service}'"),
            )
        })?;

    tracing::info!(service, function = %call.name, "Function call");

    match (kind, call.name.as_str()) {
        (ServiceKind::Ses, "send") => ses_send(&backend, &call.arguments).await,
        (ServiceKind::Twilio, "send") => twilio_send(&backend, &call.arguments).await,
        (ServiceKind::MongoDb, name @ ("find" | "insertOne" | "updateOne" | "deleteOne")) => {
            mongodb_call(&backend, name, &call.arguments).await
        }
        (_, name) => Err(function_not_found(name)),
    }
}

fn function_not_found(name: &str) -> Failure {
    failure(
        StatusCode::NOT_FOUND,
        "FunctionNotFound",
        format!("function not found: '{name}'"),
    )
}

fn user_function(call: &FunctionCall) -> Result<Json<Value>, Failure> {
    match call.name.as_str() {
        "echo" => Ok(Json(Value::Array(call.arguments.clone()))),
        name => Err(function_not_found(name)),
    }
}

fn first_arg<T: serde::de::DeserializeOwned>(arguments: &[Value]) -> Result<T, Failure> {
    let arg = arguments
        .first()
        .cloned()
        .ok_or_else(|| invalid_parameter("expected one argument"))?;
    serde_json::from_value(arg).map_err(|e| invalid_parameter(e.to_string()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailArgs {
    to_address: String,
    from_address: String,
    subject: String,
    body: String,
}

async fn ses_send(backend: &Backend, arguments: &[Value]) -> Result<Json<Value>, Failure> {
    let args: SendEmailArgs = first_arg(arguments)?;
    if !args.to_address.contains('@') {
        return Err(invalid_parameter(format!(
            "invalid recipient: {}",
            args.to_address
        )));
    }
    let email = SentEmail {
        message_id: Uuid::new_v4().to_string(),
        to_address: args.to_address,
        from_address: args.from_address,
        subject: args.subject,
        body: args.body,
    };
    let message_id = email.message_id.clone();
    backend.outbox.write().await.emails.push(email);
    Ok(Json(serde_json::json!({ "messageId": message_id })))
}

async fn twilio_send(backend: &Backend, arguments: &[Value]) -> Result<Json<Value>, Failure> {
    let message: SentMessage = first_arg(arguments)?;
    backend.outbox.write().await.messages.push(message);
    Ok(Json(Value::Null))
}

async fn mongodb_call(
    backend: &Backend,
    name: &str,
    arguments: &[Value],
) -> Result<Json<Value>, Failure> {
    let result = match name {
        "find" => mongodb::find(&*backend.collections.read().await, first_arg(arguments)?),
        "insertOne" => {
            mongodb::insert_one(&mut *backend.collections.write().await, first_arg(arguments)?)
        }
        "updateOne" => {
            mongodb::update_one(&mut *backend.collections.write().await, first_arg(arguments)?)
                .map_err(invalid_parameter)?
        }
        "deleteOne" => {
            mongodb::delete_one(&mut *backend.collections.write().await, first_arg(arguments)?)
        }
        other => return Err(function_not_found(other)),
    };
    Ok(Json(result))
}

async fn list_sent(
    State(backend): State<Backend>,
    Path(app_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Outbox>, Failure> {
    authorize(&backend, &app_id, &headers)?;
    let outbox = backend.outbox.read().await.clone();
    tracing::info!(
        emails = outbox.emails.len(),
        messages = outbox.messages.len(),
        "Listing outbox"
    );
    Ok(Json(outbox))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_call_omits_absent_service() {
        let call = FunctionCall {
            name: "echo".to_string(),
            arguments: vec![Value::from(1)],
            service: None,
        };
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["name"], "echo");
        assert!(json.get("service").is_none());
    }

    #[test]
    fn function_call_arguments_default_to_empty() {
        let call: FunctionCall = serde_json::from_str(r#"{"name":"echo"}"#).unwrap();
        assert!(call.arguments.is_empty());
        assert!(call.service.is_none());
    }

    #[test]
    fn function_call_rejects_missing_name() {
        let result: Result<FunctionCall, _> = serde_json::from_str(r#"{"arguments":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn sent_email_uses_camel_case() {
        let email = SentEmail {
            message_id: "m".to_string(),
            to_address: "a@x.com".to_string(),
            from_address: "b@x.com".to_string(),
            subject: "Hi".to_string(),
            body: "Body".to_string(),
        };
        let json = serde_json::to_value(&email).unwrap();
        assert_eq!(json["messageId"], "m");
        assert_eq!(json["toAddress"], "a@x.com");
    }

    #[test]
    fn user_function_echoes_arguments() {
        let call = FunctionCall {
            name: "echo".to_string(),
            arguments: vec![Value::from("a"), Value::from(2)],
            service: None,
        };
        let Json(value) = user_function(&call).unwrap();
        assert_eq!(value, serde_json::json!(["a", 2]));
    }

    #[test]
    fn first_arg_requires_an_argument() {
        let (status, Json(body)) = first_arg::<SentMessage>(&[]).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error_code, "InvalidParameter");
    }
}
