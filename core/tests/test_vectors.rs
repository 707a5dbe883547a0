//! Verify facades and response mapping against JSON test vectors stored in
//! `test-vectors/`.
//!
//! Each vector describes inputs, the expected outbound request, a simulated
//! backend response and the expected result or error kind. The transport is
//! a closure that records the request and answers with the simulated
//! response, so nothing touches the network.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use service_core::{
    Dispatcher, Endpoint, HttpMethod, HttpRequest, HttpResponse, Invocation, SendResult,
    SesSender, SesServiceClient, ServiceClient, ServiceError, StaticSession,
};

const BASE_URL: &str = "http://localhost:3000";

/// Dispatcher whose transport records the request and replies with `response`.
fn dispatcher_replying(response: HttpResponse) -> (Arc<Dispatcher>, Arc<Mutex<Vec<HttpRequest>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let transport = move |req: HttpRequest| -> Result<HttpResponse, ServiceError> {
        recorder.lock().unwrap().push(req);
        Ok(response.clone())
    };
    let dispatcher = Dispatcher::new(
        Endpoint::new(BASE_URL, "app-1"),
        Arc::new(StaticSession::new("tok")),
        Arc::new(transport),
    );
    (Arc::new(dispatcher), seen)
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn assert_error_matches(name: &str, err: &ServiceError, expected: &Value) {
    match (expected["kind"].as_str().unwrap(), err) {
        ("authentication", ServiceError::Authentication { .. }) => {}
        ("decoding", ServiceError::Decoding(_)) => {}
        (
            "backend",
            ServiceError::Backend {
                status,
                code,
                message,
            },
        ) => {
            assert_eq!(code, expected["code"].as_str().unwrap(), "{name}: code");
            if let Some(expected_status) = expected.get("status") {
                assert_eq!(u64::from(*status), expected_status.as_u64().unwrap(), "{name}: status");
            }
            if let Some(expected_message) = expected.get("message") {
                assert_eq!(message, expected_message.as_str().unwrap(), "{name}: message");
            }
        }
        (kind, other) => panic!("{name}: expected {kind} error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// send_email
// ---------------------------------------------------------------------------

#[test]
fn send_email_test_vectors() {
    let raw = include_str!("../../test-vectors/send_email.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let (dispatcher, seen) = dispatcher_replying(simulated(case));
        let ses = SesServiceClient::new(ServiceClient::new(dispatcher, "ses"));

        let result = ses.send_email(
            input["to"].as_str().unwrap(),
            input["from"].as_str().unwrap(),
            input["subject"].as_str().unwrap(),
            input["body"].as_str().unwrap(),
        );

        // Verify the outbound request
        let requests = seen.lock().unwrap();
        assert_eq!(requests.len(), 1, "{name}: exactly one call");
        let req = &requests[0];
        let expected_req = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
        assert_eq!(
            req.body.as_deref(),
            Some(expected_req["body"].as_str().unwrap()),
            "{name}: body bytes"
        );

        // Verify the outcome
        if let Some(expected_error) = case.get("expected_error") {
            assert_error_matches(name, &result.unwrap_err(), expected_error);
        } else {
            let expected: SendResult = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Failure mapping
// ---------------------------------------------------------------------------

#[test]
fn failure_test_vectors() {
    let raw = include_str!("../../test-vectors/failures.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let (dispatcher, _) = dispatcher_replying(simulated(case));

        let err = dispatcher
            .parse_response::<Value>(simulated(case))
            .unwrap_err();
        assert_error_matches(name, &err, &case["expected_error"]);

        let err = dispatcher
            .invoke::<Value>(&Invocation::new("echo", Vec::new()))
            .unwrap_err();
        assert_error_matches(name, &err, &case["expected_error"]);
    }
}
