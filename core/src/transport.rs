//! The contract every HTTP backend implements.
//!
//! # Design
//! A backend only knows how to move bytes: it receives an [`Outgoing`]
//! description and returns an [`Incoming`] response or a
//! [`TransportError`]. [`dispatch`] wraps that single round-trip with
//! everything that must be identical across backends: URL materialization,
//! body encoding, UTF-8 decoding, the `Detail` callback, failure
//! normalization and error reporting.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::detail::{Detail, Exchange};
use crate::error::{Result, TransportError};
use crate::header::HeaderMap;
use crate::http::{EncodedBody, Method};
use crate::normalize::{normalize, Outcome};
use crate::request::Request;

pub const USER_AGENT_HINT: &str = "maybe you should add 'User-Agent' for headers, for example: \
    Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
    Chrome/70.0.3538.110 Safari/537.36";

/// Settable string-consuming error hook. Defaults to a `tracing` error event.
#[derive(Clone)]
pub struct ErrorSink(Arc<dyn Fn(&str) + Send + Sync>);

impl ErrorSink {
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self(Arc::new(sink))
    }

    pub fn report(&self, message: &str) {
        (self.0)(message)
    }
}

impl Default for ErrorSink {
    fn default() -> Self {
        Self::new(|message| tracing::error!(target: "unihttp", "{message}"))
    }
}

impl fmt::Debug for ErrorSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrorSink")
    }
}

/// A concrete HTTP execution strategy.
pub trait Transport: Send + Sync {
    /// Short label used in diagnostics, e.g. `"ureq"`.
    fn name(&self) -> &str;

    /// Perform `request`. Returns the decoded body, a synthetic `"408 ..."`
    /// string for a normalized connection failure, or `None`.
    fn execute(&self, request: &Request, detail: Option<&mut dyn Detail>) -> Option<String>;

    /// Report a diagnostic through this transport's error hook.
    fn error(&self, message: &str);
}

/// Conveniences available on every transport.
pub trait TransportExt: Transport {
    fn execute_plain(&self, request: &Request) -> Option<String> {
        self.execute(request, None)
    }

    /// Apply `convert` to the result when there is one.
    fn execute_as<R, F>(&self, request: &Request, convert: F, detail: Option<&mut dyn Detail>) -> Option<R>
    where
        F: FnOnce(String) -> R,
    {
        self.execute(request, detail).map(convert)
    }

    /// Deserialize the result as JSON when there is one.
    fn execute_json<T>(&self, request: &Request, detail: Option<&mut dyn Detail>) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        self.execute(request, detail)
            .map(|body| serde_json::from_str(&body))
            .transpose()
            .map_err(Into::into)
    }
}

impl<T: Transport + ?Sized> TransportExt for T {}

/// What a backend must put on the wire.
#[derive(Debug)]
pub struct Outgoing<'a> {
    pub url: &'a str,
    pub method: Method,
    pub header: Option<&'a HeaderMap>,
    /// Present only for non-GET requests that carry an entity.
    pub body: Option<EncodedBody>,
}

impl Outgoing<'_> {
    /// Caller headers in order. A caller `Content-Type` is dropped when an
    /// entity is attached; the classified type replaces it.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        let replaced = self.body.is_some();
        self.header
            .into_iter()
            .flat_map(|header| header.iter())
            .filter(move |(name, _)| !(replaced && name.eq_ignore_ascii_case("content-type")))
    }
}

/// A completed HTTP exchange as seen by a backend.
#[derive(Debug, Clone, Default)]
pub struct Incoming {
    pub status: u16,
    pub header: HeaderMap,
    pub body: Vec<u8>,
}

/// Whether a response with `status` carries an entity at all.
pub fn has_entity(status: u16) -> bool {
    !matches!(status, 100..=199 | 204 | 304)
}

/// Run one request through `send` and apply the shared execution contract.
///
/// `send` owns whatever resources it acquires and must release them before
/// returning, on success and failure alike.
pub fn dispatch<T, F>(
    transport: &T,
    request: &Request,
    detail: Option<&mut dyn Detail>,
    send: F,
) -> Outcome
where
    T: Transport + ?Sized,
    F: FnOnce(&Outgoing<'_>) -> std::result::Result<Incoming, TransportError>,
{
    let url = request.effective_url();
    let method = request.method();
    let outgoing = Outgoing {
        url: &url,
        method,
        header: request.header(),
        body: match method {
            Method::Get => None,
            _ => EncodedBody::encode(request.body()),
        },
    };
    debug!(transport = transport.name(), %method, %url, "sending request");

    let outcome = match send(&outgoing) {
        Ok(incoming) => {
            if incoming.status == 403 {
                transport.error(USER_AGENT_HINT);
            }
            let result = String::from_utf8_lossy(&incoming.body).into_owned();
            if let Some(detail) = detail {
                detail.accept(&Exchange {
                    url: &url,
                    method,
                    request_header: request.header(),
                    body: request.body(),
                    status: Some(incoming.status),
                    response_header: &incoming.header,
                    result: Some(result.as_str()),
                });
            }
            debug!(transport = transport.name(), status = incoming.status, %url, "request completed");
            Outcome::Success(result)
        }
        Err(err) => {
            warn!(transport = transport.name(), error = %err, %url, "request failed");
            transport.error(&format!("{} {err}: {url}", transport.name()));
            let response_header = HeaderMap::new();
            normalize(
                &err.reason(),
                detail,
                Exchange {
                    url: &url,
                    method,
                    request_header: request.header(),
                    body: request.body(),
                    status: None,
                    response_header: &response_header,
                    result: None,
                },
            )
        }
    };

    if outcome.is_opaque() {
        transport.error(&format!("{} result is absent. url --> {url}", transport.name()));
    }
    outcome
}
