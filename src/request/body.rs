use axum::body::Body;
use http_body_util::LengthLimitError;
use serde::de::DeserializeOwned;
use std::error::Error as StdError;
use std::io::Read;
use thiserror::Error;

use crate::errors::{ErrorCategory, TypedError};

const TOO_LARGE_MESSAGE: &str = "request body is too large";
const NOT_JSON_MESSAGE: &str = "request body is not proper json";

/// Failures reading a request body before it reaches the JSON decoder
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("failed to read request body: {0}")]
    Read(String),
}

/// Decode a JSON body from any reader.
///
/// With `max_bytes` set, reading more than that many bytes fails with a
/// [`ErrorCategory::TooLarge`] error; malformed JSON is a
/// [`ErrorCategory::BadRequest`].
pub fn unmarshal_body<T, R>(reader: R, max_bytes: Option<u64>) -> Result<T, TypedError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut buf = Vec::new();

    match max_bytes {
        Some(limit) => {
            reader
                .take(limit.saturating_add(1))
                .read_to_end(&mut buf)
                .map_err(read_failed)?;
            if buf.len() as u64 > limit {
                return Err(too_large(limit));
            }
        }
        None => {
            let mut reader = reader;
            reader.read_to_end(&mut buf).map_err(read_failed)?;
        }
    }

    decode(&buf)
}

/// Collect an axum body and decode it as JSON, with the same classification
/// as [`unmarshal_body`]
pub async fn read_json<T>(body: Body, max_bytes: Option<usize>) -> Result<T, TypedError>
where
    T: DeserializeOwned,
{
    let limit = max_bytes.unwrap_or(usize::MAX);

    let bytes = axum::body::to_bytes(body, limit).await.map_err(|err| {
        if exceeded_limit(&err) {
            too_large(limit as u64)
        } else {
            ErrorCategory::BadRequest.wrap(BodyError::Read(err.to_string()), NOT_JSON_MESSAGE)
        }
    })?;

    decode(&bytes)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, TypedError> {
    serde_json::from_slice(bytes).map_err(|err| ErrorCategory::BadRequest.wrap(err, NOT_JSON_MESSAGE))
}

fn too_large(limit: u64) -> TypedError {
    ErrorCategory::TooLarge.wrap(BodyError::TooLarge { limit }, TOO_LARGE_MESSAGE)
}

fn read_failed(err: std::io::Error) -> TypedError {
    ErrorCategory::BadRequest.wrap(BodyError::Read(err.to_string()), NOT_JSON_MESSAGE)
}

fn exceeded_limit(err: &axum::Error) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err as &(dyn StdError + 'static));
    while let Some(inner) = current {
        if inner.is::<LengthLimitError>() {
            return true;
        }
        current = inner.source();
    }
    false
}
