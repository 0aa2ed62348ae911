//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and either an expected parse result or an expected error. Comparing parsed
//! JSON (not raw strings) avoids false negatives from field-ordering
//! differences.

use serde_json::Value;
use todo_core::{
    ApiError, CreateTask, Credentials, HttpMethod, HttpRequest, HttpResponse, Task, TodoClient, UpdateTask,
};

const BASE_URL: &str = "http://localhost:8080";

fn client() -> TodoClient {
    TodoClient::new(BASE_URL)
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|h| {
                    let arr = h.as_array().unwrap();
                    (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
                })
                .collect()
        })
        .unwrap_or_default()
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");
    if expected.get("headers").is_some() {
        assert_eq!(req.headers, pairs(&expected["headers"]), "{name}: headers");
    }
    match expected.get("body") {
        Some(body) => {
            let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&sent, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: pairs(&sim["headers"]),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_error(name: &str, err: ApiError, expected: &Value) {
    let (status, message) = match err {
        ApiError::Server { status, message } => (status, message),
        other => panic!("{name}: expected server error, got {other:?}"),
    };
    assert_eq!(u64::from(status), expected["status"].as_u64().unwrap(), "{name}: status");
    assert_eq!(message, expected["message"].as_str().unwrap(), "{name}: message");
}

// ---------------------------------------------------------------------------
// Register / login
// ---------------------------------------------------------------------------

#[test]
fn auth_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/auth.json")) {
        let name = case["name"].as_str().unwrap();
        let input: Credentials = serde_json::from_value(case["input"].clone()).unwrap();
        let login = case["operation"] == "login";

        let req = if login { c.build_login(&input) } else { c.build_register(&input) }.unwrap();
        check_request(name, &req, &case["expected_request"]);

        let response = simulated(&case);
        let result = if login { c.parse_login(response) } else { c.parse_register(response) };
        match case.get("expected_error") {
            Some(expected) => check_error(name, result.unwrap_err(), expected),
            None => {
                let reply = result.unwrap();
                assert_eq!(
                    reply.message.as_deref(),
                    case["expected_result"]["message"].as_str(),
                    "{name}: message"
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();
        let req = c.build_list_tasks(case["input_email"].as_str().unwrap());
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_list_tasks(simulated(&case));
        match case.get("expected_error") {
            Some(expected) => check_error(name, result.unwrap_err(), expected),
            None => {
                let expected: Vec<Task> = serde_json::from_value(case["expected_result"].clone()).unwrap();
                assert_eq!(result.unwrap(), expected, "{name}: parsed result");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let input: CreateTask = serde_json::from_value(case["input"].clone()).unwrap();
        let req = c.build_create_task(&input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_create_task(simulated(&case));
        match case.get("expected_error") {
            Some(expected) => check_error(name, result.unwrap_err(), expected),
            None => {
                let expected: Task = serde_json::from_value(case["expected_result"].clone()).unwrap();
                assert_eq!(result.unwrap(), expected, "{name}: parsed result");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/update.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();
        let input: UpdateTask = serde_json::from_value(case["input"].clone()).unwrap();
        let req = c.build_update_task(id, &input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_update_task(simulated(&case));
        match case.get("expected_error") {
            Some(expected) => check_error(name, result.unwrap_err(), expected),
            None => {
                let expected: Task = serde_json::from_value(case["expected_result"].clone()).unwrap();
                assert_eq!(result.unwrap(), expected, "{name}: parsed result");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();
        let req = c.build_delete_task(case["input_id"].as_str().unwrap());
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_delete_task(simulated(&case));
        match case.get("expected_error") {
            Some(expected) => check_error(name, result.unwrap_err(), expected),
            None => assert_eq!(
                result.unwrap().as_deref(),
                case["expected_result"].as_str(),
                "{name}: parsed result"
            ),
        }
    }
}
