//! Wire-facing pieces shared by every transport.
//!
//! # Design
//! Transports never decide how a `Request` looks on the wire. They call
//! [`effective_url`] for the final URL and [`EncodedBody::encode`] for the
//! entity, so the query string and the content type are identical no matter
//! which HTTP library performs the call.

use std::fmt;

use crate::parameter::{format_value, url_encode};
use crate::request::{Body, Request};

pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded; charset=utf-8";
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the query contribution of a GET body, if any.
///
/// Parameters render as `key=value` pairs in map order with null values
/// skipped; a raw string body is percent-encoded as a whole.
pub fn query_string(body: &Body) -> Option<String> {
    let query = match body {
        Body::Params(parameter) => parameter
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| format!("{}={}", url_encode(key), format_value(value)))
            .collect::<Vec<_>>()
            .join("&"),
        Body::Raw(raw) => url_encode(raw),
        Body::None => String::new(),
    };
    if query.is_empty() {
        None
    } else {
        Some(query)
    }
}

/// Append `query` to `url`, keeping any query the URL already carries.
pub fn append_query(url: &str, query: &str) -> String {
    if !url.contains('?') {
        format!("{url}?{query}")
    } else if url.ends_with('&') {
        format!("{url}{query}")
    } else {
        format!("{url}&{query}")
    }
}

/// The URL a transport must call: the resolved template plus, for GET, the
/// body rendered as a query string.
pub fn effective_url(request: &Request) -> String {
    let url = request.url();
    if request.method() != Method::Get {
        return url.to_string();
    }
    match query_string(request.body()) {
        Some(query) => append_query(url, &query),
        None => url.to_string(),
    }
}

/// How a non-GET entity is labelled on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Form,
    Json,
    Text,
}

impl ContentKind {
    pub fn content_type(self) -> &'static str {
        match self {
            ContentKind::Form => CONTENT_TYPE_FORM,
            ContentKind::Json => CONTENT_TYPE_JSON,
            ContentKind::Text => CONTENT_TYPE_TEXT,
        }
    }

    /// Raw text is JSON when its trimmed form opens an object or array.
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            ContentKind::Json
        } else {
            ContentKind::Text
        }
    }
}

/// A request entity ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub kind: ContentKind,
    pub bytes: Vec<u8>,
}

impl EncodedBody {
    /// Encode `body` for a non-GET request. `Body::None` has no entity.
    pub fn encode(body: &Body) -> Option<Self> {
        match body {
            Body::Params(parameter) => {
                let mut form = url::form_urlencoded::Serializer::new(String::new());
                for (key, value) in parameter.iter().filter(|(_, v)| !v.is_null()) {
                    form.append_pair(key, &value.to_string());
                }
                Some(Self {
                    kind: ContentKind::Form,
                    bytes: form.finish().into_bytes(),
                })
            }
            Body::Raw(raw) => Some(Self {
                kind: ContentKind::classify(raw),
                bytes: raw.as_bytes().to_vec(),
            }),
            Body::None => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        self.kind.content_type()
    }
}
