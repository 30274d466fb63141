use std::sync::Arc;
use std::thread;

use agent_tools::{
    CallErrorKind, CallRequest, ToolRegistry, merge_registries, merge_tools, tool,
};
use serde_json::{Value, json};

/// Compute the sum of two integers.
#[tool]
fn add_numbers(a: i64, b: i64) -> Value {
    json!({ "result": a + b })
}

/// Repeat a word.
#[tool(default(times = 2))]
fn repeat(word: String, times: u8) -> String {
    word.repeat(usize::from(times))
}

/// Always fails.
#[tool]
fn explode(code: i32) -> i32 {
    panic!("exploded with code {code}");
}

/// Report the current status.
#[tool]
fn status() -> &'static str {
    "ok"
}

fn registry() -> ToolRegistry {
    let registry = ToolRegistry::new();
    registry
        .register_all([add_numbers_tool(), repeat_tool(), explode_tool(), status_tool()])
        .unwrap();
    registry
}

#[test]
fn model_call_round_trip() {
    let registry = registry();
    let request: CallRequest = serde_json::from_value(json!({
        "id": "call_001",
        "type": "function",
        "function": { "name": "add_numbers", "arguments": "{\"a\": 39, \"b\": 186}" }
    }))
    .unwrap();

    let result = registry.call_tool(&request);
    assert!(!result.is_error());
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({ "role": "tool", "tool_call_id": "call_001", "content": "{\"result\":225}" })
    );
}

#[test]
fn catalog_follows_registration_order() {
    let registry = registry();
    let catalog = serde_json::to_value(registry.generate_tools()).unwrap();
    let names: Vec<&str> = catalog
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| {
            assert_eq!(tool["type"], json!("function"));
            tool["function"]["name"].as_str().unwrap()
        })
        .collect();
    assert_eq!(names, vec!["add_numbers", "repeat", "explode", "status"]);
    assert_eq!(
        catalog[0]["function"]["description"],
        json!("Compute the sum of two integers.")
    );
    assert_eq!(
        catalog[3]["function"]["parameters"],
        json!({ "properties": {}, "title": "StatusInput", "type": "object" })
    );
}

#[test]
fn unknown_tool_is_reported() {
    let result = registry().call_tool(&CallRequest::new("call_x", "missing", "{}"));
    assert_eq!(result.call_id(), "call_x");
    assert_eq!(result.error_kind(), Some(CallErrorKind::ToolNotFound));
    assert_eq!(
        result.content_json().unwrap()["error"]["kind"],
        json!("tool_not_found")
    );
}

#[test]
fn malformed_arguments_are_reported() {
    let result = registry().call_tool(&CallRequest::new("call_bad", "add_numbers", "{\"a\": 1,"));
    assert_eq!(result.error_kind(), Some(CallErrorKind::ArgumentParseError));
}

#[test]
fn empty_arguments_mean_no_arguments() {
    let registry = registry();
    let result = registry.call_tool(&CallRequest::new("call_empty", "status", ""));
    assert_eq!(result.content_json().unwrap(), json!("ok"));

    let result = registry.call_tool(&CallRequest::new("call_empty", "add_numbers", "  "));
    assert_eq!(result.error_kind(), Some(CallErrorKind::ValidationError));
}

#[test]
fn validation_lists_every_field() {
    let result = registry().call_tool(&CallRequest::new(
        "call_v",
        "add_numbers",
        r#"{"a": "39", "c": 1}"#,
    ));
    let content = result.content_json().unwrap();
    assert_eq!(content["error"]["kind"], json!("validation_error"));
    let issues = content["error"]["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 2);
    assert!(issues.contains(&json!({ "path": "b", "message": "field required" })));
    let a = issues.iter().find(|issue| issue["path"] == "a").unwrap();
    assert!(a["message"].as_str().unwrap().contains("integer"));
}

#[test]
fn out_of_range_values_fail_validation() {
    let result = registry().call_tool(&CallRequest::new(
        "call_r",
        "repeat",
        r#"{"word": "ab", "times": 300}"#,
    ));
    assert_eq!(result.error_kind(), Some(CallErrorKind::ValidationError));

    let result = registry().call_tool(&CallRequest::new("call_r", "repeat", r#"{"word": "ab"}"#));
    assert_eq!(result.content_json().unwrap(), json!("abab"));
}

#[test]
fn panics_are_contained() {
    let registry = registry();
    let result = registry.call_tool(&CallRequest::new("call_p", "explode", r#"{"code": 7}"#));
    assert_eq!(result.error_kind(), Some(CallErrorKind::ToolExecutionError));
    let message = result.content_json().unwrap()["error"]["message"]
        .as_str()
        .unwrap()
        .to_owned();
    assert!(message.contains("exploded with code 7"), "{message}");

    // The registry stays usable afterwards.
    let result = registry.call_tool(&CallRequest::new("call_ok", "status", "{}"));
    assert!(!result.is_error());
}

#[test]
fn concurrent_calls_share_one_registry() {
    let registry = Arc::new(registry());
    let handles: Vec<_> = (0..8_i64)
        .map(|n| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let request = CallRequest::new(
                    format!("call_{n}"),
                    "add_numbers",
                    json!({ "a": n, "b": n }).to_string(),
                );
                let result = registry.call_tool(&request);
                assert_eq!(result.call_id(), format!("call_{n}"));
                result.content_json().unwrap()["result"].as_i64().unwrap()
            })
        })
        .collect();

    let sums: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(sums, (0..8).map(|n| n * 2).collect::<Vec<_>>());
}

#[test]
fn merged_registries_prefer_the_first() {
    let primary = ToolRegistry::new();
    primary.register(add_numbers_tool()).unwrap();

    let secondary = ToolRegistry::new();
    secondary
        .register(add_numbers_tool().with_description("Shadowed"))
        .unwrap();
    secondary.register(status_tool()).unwrap();

    let catalog = merge_tools(&[&primary, &secondary]);
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[0].description(), "Compute the sum of two integers.");

    let merged = merge_registries(&[&primary, &secondary]).unwrap();
    assert_eq!(merged.tool_names(), vec!["add_numbers", "status"]);
    let result = merged.call_tool(&CallRequest::new("call_m", "status", "{}"));
    assert_eq!(result.content_json().unwrap(), json!("ok"));
    assert_eq!(secondary.len(), 2);
}
