//! Blocking HTTP backends for `unihttp-core`.
//!
//! Each backend implements [`unihttp_core::Transport`] by translating an
//! [`unihttp_core::Outgoing`] into a library call and the reply back into an
//! [`unihttp_core::Incoming`]. Normalization, detail callbacks and logging
//! all happen in [`unihttp_core::dispatch`], so every backend behaves the
//! same way on failure.
//!
//! Both backends are enabled by default and can be switched off with
//! `default-features = false`.

mod config;
mod error;
#[cfg(feature = "reqwest")]
mod reqwest_transport;
#[cfg(feature = "ureq")]
mod ureq_transport;

pub use config::{TransportConfig, TransportConfigBuilder};
pub use error::BuildError;
#[cfg(feature = "reqwest")]
pub use reqwest_transport::ReqwestTransport;
#[cfg(feature = "ureq")]
pub use ureq_transport::UreqTransport;
