//! Per-execution observer carrying full request/response metadata.

use crate::header::HeaderMap;
use crate::http::Method;
use crate::request::Body;

/// Everything known about one execution when it completes.
///
/// `status` is `None` when the transport failed before a response existed.
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    pub url: &'a str,
    pub method: Method,
    pub request_header: Option<&'a HeaderMap>,
    pub body: &'a Body,
    pub status: Option<u16>,
    pub response_header: &'a HeaderMap,
    pub result: Option<&'a str>,
}

/// Callback invoked at most once per `Transport::execute`, synchronously on
/// the calling thread.
pub trait Detail {
    fn accept(&mut self, exchange: &Exchange<'_>);
}

impl<F> Detail for F
where
    F: FnMut(&Exchange<'_>),
{
    fn accept(&mut self, exchange: &Exchange<'_>) {
        self(exchange)
    }
}

/// Owned copy of an [`Exchange`], for callers that keep it past the call.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub url: String,
    pub method: Method,
    pub request_header: Option<HeaderMap>,
    pub body: Body,
    pub status: Option<u16>,
    pub response_header: HeaderMap,
    pub result: Option<String>,
}

impl From<&Exchange<'_>> for Recorded {
    fn from(exchange: &Exchange<'_>) -> Self {
        Self {
            url: exchange.url.to_string(),
            method: exchange.method,
            request_header: exchange.request_header.cloned(),
            body: exchange.body.clone(),
            status: exchange.status,
            response_header: exchange.response_header.clone(),
            result: exchange.result.map(str::to_string),
        }
    }
}

/// A `Detail` that stores every exchange it sees.
#[derive(Debug, Default)]
pub struct Recorder {
    pub exchanges: Vec<Recorded>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The single recorded exchange, if exactly one was seen.
    pub fn only(&self) -> Option<&Recorded> {
        match self.exchanges.as_slice() {
            [one] => Some(one),
            _ => None,
        }
    }
}

impl Detail for Recorder {
    fn accept(&mut self, exchange: &Exchange<'_>) {
        self.exchanges.push(exchange.into());
    }
}
