use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::io;
use tracing::warn;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// Where a responder writes: headers, one status line, then the body.
///
/// Every responder call sets headers, writes the status once and writes the
/// body at most once. Reusing a sink for a second response is a caller error.
pub trait ResponseSink {
    fn set_header(&mut self, name: &str, value: &str);

    fn write_status(&mut self, status_code: u16);

    fn write_body(&mut self, body: &[u8]) -> io::Result<()>;
}

/// In-memory sink that can be inspected or turned into an axum response
#[derive(Debug, Clone, Default)]
pub struct BufferedResponse {
    status_code: Option<u16>,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Header lookup, case-insensitive on the name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_str(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl ResponseSink for BufferedResponse {
    fn set_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    fn write_status(&mut self, status_code: u16) {
        self.status_code = Some(status_code);
    }

    fn write_body(&mut self, body: &[u8]) -> io::Result<()> {
        self.body.extend_from_slice(body);
        Ok(())
    }
}

impl IntoResponse for BufferedResponse {
    fn into_response(self) -> Response {
        let status = match self.status_code {
            None => StatusCode::OK,
            Some(code) => StatusCode::from_u16(code).unwrap_or_else(|_| {
                warn!(status = code, "Status code out of range, sending 500 instead");
                StatusCode::INTERNAL_SERVER_ERROR
            }),
        };

        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;

        for (name, value) in self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                (Ok(name), Ok(value)) => {
                    response.headers_mut().insert(name, value);
                }
                _ => warn!(header = %name, "Dropping invalid response header"),
            }
        }

        response
    }
}
