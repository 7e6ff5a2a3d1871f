//! Request and response values exchanged with the transport.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A single logical call, independent of how many attempts it takes.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    /// Path segments appended to the base address; each is percent-encoded.
    pub segments: Vec<String>,
    pub body: Option<Value>,
}

impl TransportRequest {
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method: Method::GET,
            segments: segments.into_iter().map(Into::into).collect(),
            body: None,
        }
    }

    pub fn post<I, S>(segments: I, body: Value) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method: Method::POST,
            segments: segments.into_iter().map(Into::into).collect(),
            body: Some(body),
        }
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TransportResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}
