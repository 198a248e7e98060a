//! Immutable request description and its builder.
//!
//! # Design
//! A `Request` is plain data built once and executed against any
//! [`Transport`]. The body is a tagged [`Body`] so a parameter body and a raw
//! string body can never coexist. URL placeholders live in a [`UrlTemplate`]
//! that `Builder::build` resolves exactly once; the built request holds only
//! the resolved URL and is safe to share across threads.

use std::fmt;

use crate::detail::Detail;
use crate::header::HeaderMap;
use crate::http::{effective_url, Method};
use crate::parameter::{ParamValue, ParameterMap};
use crate::transport::Transport;

/// Request entity: nothing, a raw string, or structured parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    #[default]
    None,
    Raw(String),
    Params(ParameterMap),
}

impl Body {
    pub fn is_none(&self) -> bool {
        matches!(self, Body::None)
    }

    pub fn as_params(&self) -> Option<&ParameterMap> {
        match self {
            Body::Params(parameter) => Some(parameter),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Body::Raw(raw) => Some(raw),
            _ => None,
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::None => Ok(()),
            Body::Raw(raw) => f.write_str(raw),
            Body::Params(parameter) => f.write_str(&parameter.concat_default()),
        }
    }
}

/// A URL containing `{name}` or `{n}` placeholders plus their substitutions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlTemplate {
    raw: String,
    replacements: Vec<(String, String)>,
    positional: usize,
}

impl UrlTemplate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            ..Self::default()
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn replacements(&self) -> &[(String, String)] {
        &self.replacements
    }

    /// Record the next positional substitution: `{1}`, `{2}`, ...
    pub fn push_positional(&mut self, value: impl fmt::Display) {
        self.positional += 1;
        let key = self.positional.to_string();
        self.set(key, value.to_string());
    }

    /// Record a named substitution for `{name}`, overwriting an earlier one.
    pub fn push_named(&mut self, name: impl Into<String>, value: impl fmt::Display) {
        self.set(name.into(), value.to_string());
    }

    fn set(&mut self, key: String, value: String) {
        match self.replacements.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.replacements.push((key, value)),
        }
    }

    /// Replace every `{key}` occurrence with its value, in insertion order.
    pub fn resolve(&self) -> String {
        self.replacements
            .iter()
            .fold(self.raw.clone(), |url, (key, value)| {
                url.replace(&format!("{{{key}}}"), value)
            })
    }
}

/// A fully built HTTP call description.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    url: String,
    template: UrlTemplate,
    method: Method,
    header: Option<HeaderMap>,
    body: Body,
    extra: Option<String>,
}

impl Request {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// The URL with every placeholder substituted, before any query string.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The URL a transport calls, including the GET query string.
    pub fn effective_url(&self) -> String {
        effective_url(self)
    }

    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn header(&self) -> Option<&HeaderMap> {
        self.header.as_ref()
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn parameter(&self) -> Option<&ParameterMap> {
        self.body.as_params()
    }

    pub fn string(&self) -> Option<&str> {
        self.body.as_raw()
    }

    /// Caller bookkeeping carried alongside the request; never sent.
    pub fn extra(&self) -> Option<&str> {
        self.extra.as_deref()
    }

    pub fn execute<T>(&self, transport: &T, detail: Option<&mut dyn Detail>) -> Option<String>
    where
        T: Transport + ?Sized,
    {
        transport.execute(self, detail)
    }
}

/// Chainable construction of a [`Request`].
#[derive(Debug, Clone, Default)]
pub struct Builder {
    template: UrlTemplate,
    method: Method,
    header: Option<HeaderMap>,
    body: Body,
    extra: Option<String>,
}

impl Builder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            template: UrlTemplate::new(url),
            ..Self::default()
        }
    }

    /// Set the URL template, keeping substitutions already recorded.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.template.raw = url.into();
        self
    }

    /// Substitute the next positional placeholder (`{1}`, `{2}`, ...).
    pub fn replace(mut self, value: impl fmt::Display) -> Self {
        self.template.push_positional(value);
        self
    }

    /// Substitute the `{name}` placeholder.
    pub fn replace_named(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.template.push_named(name, value);
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn get(self) -> Self {
        self.method(Method::Get)
    }

    /// Switch to POST. A POST always carries an entity, so an unset body
    /// becomes the empty string.
    pub fn post(mut self) -> Self {
        if self.body.is_none() {
            self.body = Body::Raw(String::new());
        }
        self.method(Method::Post)
    }

    pub fn put(self) -> Self {
        self.method(Method::Put)
    }

    pub fn delete(self) -> Self {
        self.method(Method::Delete)
    }

    /// Append one header value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header.get_or_insert_with(HeaderMap::new).add(name, value);
        self
    }

    /// Adopt `header` when none is set yet, otherwise append its pairs.
    pub fn headers(mut self, header: HeaderMap) -> Self {
        match self.header.as_mut() {
            Some(existing) => {
                existing.merge(&header);
            }
            None => self.header = Some(header),
        }
        self
    }

    /// Use `body` as a raw string entity, discarding any parameters.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Body::Raw(body.into());
        self
    }

    /// Add one parameter, discarding any raw string body.
    pub fn body_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        match &mut self.body {
            Body::Params(parameter) => {
                parameter.add(key, value);
            }
            _ => self.body = Body::Params(ParameterMap::with(key, value)),
        }
        self
    }

    /// Adopt or merge `parameter`, discarding any raw string body.
    pub fn body_params(mut self, parameter: ParameterMap) -> Self {
        match &mut self.body {
            Body::Params(existing) => {
                existing.merge(parameter);
            }
            _ => self.body = Body::Params(parameter),
        }
        self
    }

    pub fn extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Snapshot the builder into a `Request`, resolving the URL template.
    pub fn build(&self) -> Request {
        let body = match (&self.body, self.method) {
            (Body::None, Method::Post) => Body::Raw(String::new()),
            (body, _) => body.clone(),
        };
        Request {
            url: self.template.resolve(),
            template: self.template.clone(),
            method: self.method,
            header: self.header.clone(),
            body,
            extra: self.extra.clone(),
        }
    }

    pub fn execute<T>(&self, transport: &T, detail: Option<&mut dyn Detail>) -> Option<String>
    where
        T: Transport + ?Sized,
    {
        transport.execute(&self.build(), detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_and_named_replacements() {
        let request = Builder::new("http://x/s?wd={1}_{name}")
            .replace("abc")
            .replace_named("name", "def")
            .build();
        assert_eq!(request.url(), "http://x/s?wd=abc_def");
        assert_eq!(request.template().raw(), "http://x/s?wd={1}_{name}");
    }

    #[test]
    fn positional_numbering_ignores_named_entries() {
        let request = Builder::new("/{user}/{1}/{2}")
            .replace_named("user", "bob")
            .replace(7)
            .replace(true)
            .build();
        assert_eq!(request.url(), "/bob/7/true");
    }

    #[test]
    fn every_occurrence_is_replaced() {
        let request = Builder::new("/{id}/{id}").replace_named("id", 3).build();
        assert_eq!(request.url(), "/3/3");
    }

    #[test]
    fn named_replacement_overwrites() {
        let template = {
            let mut t = UrlTemplate::new("/{a}");
            t.push_named("a", 1);
            t.push_named("a", 2);
            t
        };
        assert_eq!(template.replacements().len(), 1);
        assert_eq!(template.resolve(), "/2");
    }

    #[test]
    fn resolution_is_idempotent() {
        let builder = Builder::new("/{1}").replace("x");
        assert_eq!(builder.build().url(), builder.build().url());
    }

    #[test]
    fn last_method_wins() {
        let request = Builder::new("/").post().put().delete().get().build();
        assert_eq!(request.method(), Method::Get);
    }

    #[test]
    fn post_without_body_gets_empty_string() {
        let request = Builder::new("/").post().build();
        assert_eq!(request.string(), Some(""));

        let request = Builder::new("/").method(Method::Post).build();
        assert_eq!(request.string(), Some(""));
    }

    #[test]
    fn post_keeps_existing_body() {
        let request = Builder::new("/").body("payload").post().build();
        assert_eq!(request.string(), Some("payload"));
    }

    #[test]
    fn param_body_clears_string_body() {
        let request = Builder::new("/").body("raw").body_param("k", "v").build();
        assert!(request.string().is_none());
        assert_eq!(request.parameter().map(ParameterMap::len), Some(1));
    }

    #[test]
    fn string_body_clears_param_body() {
        let request = Builder::new("/").body_param("k", "v").body("raw").build();
        assert!(request.parameter().is_none());
        assert_eq!(request.string(), Some("raw"));
    }

    #[test]
    fn body_params_merge() {
        let request = Builder::new("/")
            .body_param("a", 1)
            .body_params(ParameterMap::with("b", 2))
            .build();
        assert_eq!(request.parameter().unwrap().concat_default(), "a=1&b=2");
    }

    #[test]
    fn header_map_is_adopted_then_merged() {
        let request = Builder::new("/")
            .headers(HeaderMap::with("x-a", "1"))
            .headers(HeaderMap::with("x-a", "2"))
            .header("x-b", "3")
            .build();
        let header = request.header().unwrap();
        assert_eq!(header.len(), 3);
        assert_eq!(header.get("x-a").unwrap(), ["1", "2"]);
    }

    #[test]
    fn extra_is_carried() {
        let request = Builder::new("/").extra("job-42").build();
        assert_eq!(request.extra(), Some("job-42"));
        assert!(request.header().is_none());
    }
}
