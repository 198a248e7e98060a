//! Transport-agnostic HTTP request core.
//!
//! # Overview
//! Callers describe a request once with [`Request::builder`] and execute it
//! against any [`Transport`]. The core owns everything that must not vary
//! between HTTP libraries: URL templating, query-string and form encoding,
//! content-type classification, the [`Detail`] callback and the
//! normalization of connection failures into a synthetic `408` response.
//!
//! # Design
//! - No network I/O lives here. Backends implement [`Transport`] by handing
//!   a single round-trip closure to [`dispatch`].
//! - [`HeaderMap`] and [`ParameterMap`] preserve insertion order so every
//!   backend puts the same bytes on the wire.
//! - Failures never escape `execute`: the caller sees a result string or
//!   `None`, with richer information only through `Detail`.

pub mod detail;
pub mod error;
pub mod header;
pub mod http;
pub mod normalize;
pub mod parameter;
pub mod request;
pub mod transport;

pub use detail::{Detail, Exchange, Recorded, Recorder};
pub use error::{Error, Result, TransportError};
pub use header::{HeaderMap, Pair};
pub use http::{effective_url, ContentKind, EncodedBody, Method};
pub use normalize::{normalize, Outcome};
pub use parameter::{format_value, url_encode, ParamValue, ParameterMap};
pub use request::{Body, Builder, Request, UrlTemplate};
pub use transport::{
    dispatch, has_entity, ErrorSink, Incoming, Outgoing, Transport, TransportExt,
};
