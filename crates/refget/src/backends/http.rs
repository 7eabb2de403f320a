//! HTTP(S) backend
//!
//! Uses `ureq`'s blocking client. Non-success statuses are errors.

use crate::error::GetError;

/// GET `url` and return the response body
pub fn get(url: &str) -> Result<Vec<u8>, GetError> {
    tracing::debug!(url, "HTTP GET");

    let mut response = ureq::get(url)
        .call()
        .map_err(|e| GetError::http(url, e.to_string()))?;

    response
        .body_mut()
        .read_to_vec()
        .map_err(|e| GetError::http(url, format!("failed to read body: {}", e)))
}
