//! Echo server the transport tests talk to.
//!
//! `/echo` reflects whatever request reached it as JSON, so a test can
//! assert on exactly what a backend put on the wire. `/status/{code}`
//! answers with an arbitrary status, `/multi-header` repeats a response
//! header and `/bytes/{len}` serves a body of `len` bytes.

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::Path,
    http::{header::HeaderName, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What `/echo` saw.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Echo {
    pub method: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub headers: BTreeMap<String, Vec<String>>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/multi-header", get(multi_header))
        .route("/bytes/{len}", get(bytes))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let mut collected: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in &headers {
        collected
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(Echo {
        method: method.to_string(),
        query: uri.query().map(str::to_string),
        content_type,
        headers: collected,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, format!("status {code}")))
}

async fn multi_header() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    let name = HeaderName::from_static("x-multi");
    headers.append(name.clone(), HeaderValue::from_static("one"));
    headers.append(name, HeaderValue::from_static("two"));
    (headers, "multi")
}

async fn bytes(Path(len): Path<usize>) -> Vec<u8> {
    vec![b'x'; len]
}
