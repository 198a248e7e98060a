//! Blocking transport backed by `reqwest`.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::trace;
use unihttp_core::{
    dispatch, has_entity, Detail, ErrorSink, HeaderMap, Incoming, Method, Outgoing, Request,
    Transport, TransportError,
};

use crate::config::TransportConfig;
use crate::error::{classify, BuildError};

/// `Transport` over a blocking `reqwest::Client`.
///
/// Must not be created or used from inside an async runtime; the blocking
/// client drives its own.
#[derive(Debug)]
pub struct ReqwestTransport {
    client: Client,
    sink: ErrorSink,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, BuildError> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout);
        if let Some(proxy) = &config.proxy {
            let parsed = reqwest::Proxy::all(proxy).map_err(|e| BuildError::InvalidProxy {
                proxy: proxy.clone(),
                message: e.to_string(),
            })?;
            builder = builder.proxy(parsed);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let client = builder
            .build()
            .map_err(|e| BuildError::Client(e.to_string()))?;
        Ok(Self {
            client,
            sink: ErrorSink::default(),
        })
    }

    pub fn with_error_sink(mut self, sink: ErrorSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn set_error_sink(&mut self, sink: ErrorSink) {
        self.sink = sink;
    }

    fn send(&self, out: &Outgoing<'_>) -> Result<Incoming, TransportError> {
        let method = match out.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, out.url);
        for (name, value) in out.headers() {
            builder = builder.header(name, value);
        }
        if let Some(body) = &out.body {
            builder = builder
                .header(CONTENT_TYPE, body.content_type())
                .body(body.bytes.clone());
        }

        let response = builder.send().map_err(map_error)?;
        let status = response.status().as_u16();
        if !has_entity(status) {
            return Err(TransportError::MissingBody);
        }
        let header: HeaderMap = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().map_err(map_error)?.to_vec();
        trace!(status, bytes = body.len(), "reqwest response read");
        Ok(Incoming {
            status,
            header,
            body,
        })
    }
}

impl Transport for ReqwestTransport {
    fn name(&self) -> &str {
        "reqwest"
    }

    fn execute(&self, request: &Request, detail: Option<&mut dyn Detail>) -> Option<String> {
        dispatch(self, request, detail, |out| self.send(out)).into_result()
    }

    fn error(&self, message: &str) {
        self.sink.report(message);
    }
}

fn map_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::ConnectTimeout(err.to_string());
    }
    classify(&err)
}
