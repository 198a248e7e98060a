//! Verify URL materialization and body encoding against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Each case describes a request as data and the exact URL, content type and
//! entity every transport must produce for it.

use serde_json::Value;
use unihttp_core::{Builder, EncodedBody, Method, ParamValue, Request};

/// Parse the method string from test vectors into `Method`.
fn parse_method(s: &str) -> Method {
    match s {
        "GET" => Method::Get,
        "POST" => Method::Post,
        "PUT" => Method::Put,
        "DELETE" => Method::Delete,
        other => panic!("unknown method: {other}"),
    }
}

/// Convert a JSON vector value into a parameter value.
fn param(value: &Value) -> ParamValue {
    match value {
        Value::Null => ParamValue::Null,
        Value::Bool(b) => ParamValue::Bool(*b),
        Value::Number(n) => n
            .as_i64()
            .map(ParamValue::Int)
            .unwrap_or_else(|| ParamValue::Float(n.as_f64().unwrap())),
        Value::String(s) => ParamValue::Text(s.clone()),
        Value::Array(items) => ParamValue::List(items.iter().map(param).collect()),
        Value::Object(_) => panic!("objects are not parameter values"),
    }
}

fn build(case: &Value) -> Request {
    let mut builder = Builder::new(case["url"].as_str().unwrap());
    for value in case["positional"].as_array().into_iter().flatten() {
        builder = builder.replace(value.as_str().unwrap());
    }
    for pair in case["named"].as_array().into_iter().flatten() {
        builder = builder.replace_named(pair[0].as_str().unwrap(), pair[1].as_str().unwrap());
    }
    if let Some(raw) = case["raw"].as_str() {
        builder = builder.body(raw);
    }
    for pair in case["params"].as_array().into_iter().flatten() {
        builder = builder.body_param(pair[0].as_str().unwrap(), param(&pair[1]));
    }
    builder = match parse_method(case["method"].as_str().unwrap()) {
        Method::Get => builder.get(),
        Method::Post => builder.post(),
        Method::Put => builder.put(),
        Method::Delete => builder.delete(),
    };
    builder.build()
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let request = build(case);

        assert_eq!(request.effective_url(), case["expected_url"].as_str().unwrap(), "{name}: url");

        let encoded = match request.method() {
            Method::Get => None,
            _ => EncodedBody::encode(request.body()),
        };
        assert_eq!(
            encoded.as_ref().map(EncodedBody::content_type),
            case["expected_content_type"].as_str(),
            "{name}: content type"
        );
        if let Some(expected) = case.get("expected_body") {
            let bytes = encoded.map(|e| e.bytes).unwrap_or_default();
            assert_eq!(String::from_utf8(bytes).unwrap(), expected.as_str().unwrap(), "{name}: body");
        }
    }
}
