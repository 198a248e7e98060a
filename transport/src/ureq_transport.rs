//! Blocking transport backed by `ureq`.

use tracing::trace;
use unihttp_core::{
    dispatch, has_entity, Detail, EncodedBody, ErrorSink, HeaderMap, Incoming, Method, Outgoing,
    Request, Transport, TransportError,
};
use ureq::http::Response;
use ureq::typestate::WithBody;
use ureq::{Body, RequestBuilder};

use crate::config::TransportConfig;
use crate::error::BuildError;

/// `Transport` over a `ureq::Agent`. The agent pools connections; share one
/// transport by reference instead of creating one per call.
#[derive(Debug)]
pub struct UreqTransport {
    agent: ureq::Agent,
    sink: ErrorSink,
}

impl UreqTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, BuildError> {
        let proxy = match &config.proxy {
            Some(proxy) => Some(ureq::Proxy::new(proxy).map_err(|e| BuildError::InvalidProxy {
                proxy: proxy.clone(),
                message: e.to_string(),
            })?),
            None => None,
        };
        Ok(Self {
            agent: agent(config, proxy),
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
        let body = out.body.as_ref();
        let response = match out.method {
            Method::Get => with_headers(self.agent.get(out.url), out).call(),
            Method::Post => send_entity(with_headers(self.agent.post(out.url), out), body),
            Method::Put => send_entity(with_headers(self.agent.put(out.url), out), body),
            Method::Delete if body.is_some() => send_entity(
                with_headers(self.agent.delete(out.url).force_send_body(), out),
                body,
            ),
            Method::Delete => with_headers(self.agent.delete(out.url), out).call(),
        };
        let mut response = response.map_err(classify)?;

        let status = response.status().as_u16();
        if !has_entity(status) {
            return Err(TransportError::MissingBody);
        }
        let mut header = HeaderMap::new();
        for (name, value) in response.headers() {
            header.add(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }
        // The agent's default read limit is 10 MB; read everything.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(classify)?;
        trace!(status, bytes = body.len(), "ureq response read");
        Ok(Incoming {
            status,
            header,
            body,
        })
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self {
            agent: agent(&TransportConfig::default(), None),
            sink: ErrorSink::default(),
        }
    }
}

impl Transport for UreqTransport {
    fn name(&self) -> &str {
        "ureq"
    }

    fn execute(&self, request: &Request, detail: Option<&mut dyn Detail>) -> Option<String> {
        dispatch(self, request, detail, |out| self.send(out)).into_result()
    }

    fn error(&self, message: &str) {
        self.sink.report(message);
    }
}

/// Build an agent that returns 4xx/5xx responses as data.
fn agent(config: &TransportConfig, proxy: Option<ureq::Proxy>) -> ureq::Agent {
    let mut builder = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .timeout_connect(Some(config.connect_timeout))
        .timeout_global(Some(config.timeout))
        .proxy(proxy);
    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }
    builder.build().new_agent()
}

fn with_headers<B>(mut builder: RequestBuilder<B>, out: &Outgoing<'_>) -> RequestBuilder<B> {
    for (name, value) in out.headers() {
        builder = builder.header(name, value);
    }
    builder
}

fn send_entity(
    builder: RequestBuilder<WithBody>,
    body: Option<&EncodedBody>,
) -> Result<Response<Body>, ureq::Error> {
    match body {
        Some(body) => builder
            .content_type(body.content_type())
            .send(body.bytes.as_slice()),
        None => builder.send_empty(),
    }
}

fn classify(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::ConnectTimeout(err.to_string()),
        ureq::Error::Io(io) => io.into(),
        ureq::Error::ConnectionFailed => TransportError::ConnectionRefused(err.to_string()),
        other => TransportError::Io(other.to_string()),
    }
}
