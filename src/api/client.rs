//! HTTP client for todolist API requests.
//!
//! This module provides a low-level wrapper around `reqwest` that attaches
//! the API key, keeps session cookies, and turns responses into typed models.

use super::error::ApiError;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const API_KEY_HEADER: &str = "API-KEY";

/// Makes requests to the todolist API and tries to conform response data to
/// the given model.
///
pub struct Client {
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: String,
    pub(crate) http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given base URL, optional API key and
    /// request timeout.
    ///
    pub fn new(base_url: &str, api_key: Option<&str>, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Client {
            api_key: api_key.map(str::to_owned),
            base_url: base_url.trim_end_matches('/').to_owned(),
            http_client,
        })
    }

    /// Send a request without a body and decode the JSON response.
    ///
    pub async fn fetch<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T, ApiError> {
        let response = self.call(method, path, None::<&()>).await?;
        decode(response).await
    }

    /// Send a request with a JSON body and decode the JSON response.
    ///
    pub async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.call(method, path, Some(body)).await?;
        decode(response).await
    }

    /// Make request and return the raw response or a transport error.
    ///
    async fn call<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request_url = format!("{}/{}", &self.base_url, path.trim_start_matches('/'));
        log::debug!("{} {}", method, request_url);

        let mut request = self.http_client.request(method, &request_url);
        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }
}

/// Check the status before trying to deserialize, keeping the body around so
/// it can be logged if decoding fails.
///
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("Unable to read response"));
        log::error!("API request failed with status {}: {}", status, message);
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        log::error!(
            "Failed to deserialize API response: {}. Response body: {}",
            e,
            String::from_utf8_lossy(&bytes)
        );
        ApiError::Deserialization(e)
    })
}
