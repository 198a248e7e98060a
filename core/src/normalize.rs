//! Turning connection failures into a uniform synthetic response.
//!
//! Recognized reasons become status 408 with a result such as
//! `"408 REQUEST TIMEOUT"`, delivered through the same `Detail` path as a
//! real response. Anything else is left to the generic failure path.

use crate::detail::{Detail, Exchange};
use crate::error::{REASON_REFUSED, REASON_TIMEOUT};

pub const NORMALIZED_STATUS: u16 = 408;

/// Final shape of one execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A completed HTTP exchange, any status code.
    Success(String),
    /// A connection failure replaced by a synthetic response.
    Normalized { code: u16, body: String },
    /// A failure with no usable result.
    Opaque,
}

impl Outcome {
    /// The caller-visible result string.
    pub fn into_result(self) -> Option<String> {
        match self {
            Outcome::Success(body) | Outcome::Normalized { body, .. } => Some(body),
            Outcome::Opaque => None,
        }
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, Outcome::Opaque)
    }
}

/// Suffix appended to `408` for a recognized failure reason.
fn cause(reason: &str) -> Option<&'static str> {
    let lower = reason.to_ascii_lowercase();
    if reason == REASON_TIMEOUT || lower.contains("connection timed out") {
        Some("REQUEST TIMEOUT")
    } else if reason == REASON_REFUSED || lower.contains("connection refused") {
        Some("CONNECTION REFUSED")
    } else {
        None
    }
}

/// Normalize a failure described by `reason`.
///
/// `context` is what was gathered before the failure; its `status` and
/// `result` are replaced by the synthetic pair before `detail` sees it.
pub fn normalize(reason: &str, detail: Option<&mut dyn Detail>, context: Exchange<'_>) -> Outcome {
    let Some(cause) = cause(reason) else {
        return Outcome::Opaque;
    };
    let body = format!("{NORMALIZED_STATUS} {cause}");
    if let Some(detail) = detail {
        detail.accept(&Exchange {
            status: Some(NORMALIZED_STATUS),
            result: Some(body.as_str()),
            ..context
        });
    }
    Outcome::Normalized {
        code: NORMALIZED_STATUS,
        body,
    }
}
