//! One-shot HTTP execution with the outcome classified into [`NetworkResult`].

use std::error::Error as _;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Outcome of a network fetch, before any domain mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkResult<T> {
    Success {
        data: T,
    },
    Failure {
        status_code: Option<u16>,
        message: Option<String>,
    },
}

impl<T> NetworkResult<T> {
    pub fn success(data: T) -> Self {
        NetworkResult::Success { data }
    }

    pub fn failure(status_code: Option<u16>, message: impl Into<String>) -> Self {
        NetworkResult::Failure {
            status_code,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, NetworkResult::Success { .. })
    }

    /// Continue with the payload of a `Success`; a `Failure` is carried over unchanged.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> NetworkResult<U>) -> NetworkResult<U> {
        match self {
            NetworkResult::Success { data } => f(data),
            NetworkResult::Failure {
                status_code,
                message,
            } => NetworkResult::Failure {
                status_code,
                message,
            },
        }
    }
}

/// Send `request` once and classify the result.
///
/// - 2xx: the body is decoded as `T`. A body that does not decode becomes a
///   `Failure` without status code.
/// - any other status: `Failure` with the status and the body text.
/// - transport fault: `Failure` without status code, carrying the fault description.
pub async fn safe_request<T: DeserializeOwned>(request: RequestBuilder) -> NetworkResult<T> {
    let response = match request.send().await {
        Ok(res) => res,
        Err(err) => return transport_failure(&err),
    };

    let status = response.status();
    debug!(%status, url = %response.url(), "received response");

    let body = match response.text().await {
        Ok(body) => body,
        Err(err) => return transport_failure(&err),
    };

    if !status.is_success() {
        warn!(%status, "request failed");
        return NetworkResult::failure(Some(status.as_u16()), body);
    }

    match serde_json::from_str::<T>(&body) {
        Ok(data) => NetworkResult::success(data),
        Err(err) => {
            warn!(error = %err, "response body did not match expected shape");
            NetworkResult::failure(None, format!("Failed to decode response body: {err}"))
        }
    }
}

fn transport_failure<T>(err: &reqwest::Error) -> NetworkResult<T> {
    let description = describe(err);
    warn!(error = %description, "transport failure");

    if description.is_empty() {
        NetworkResult::failure(None, UNKNOWN_ERROR)
    } else {
        NetworkResult::failure(None, description)
    }
}

/// reqwest's top-level message is terse ("error sending request"); append the source chain.
fn describe(err: &reqwest::Error) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !description.contains(&text) {
            if !description.is_empty() {
                description.push_str(": ");
            }
            description.push_str(&text);
        }
        source = cause.source();
    }
    description
}
