use crate::core::error::ForgeError;
use reqwest::{Client, Response};
use serde::Serialize;
use std::collections::HashMap;

/// Thin reqwest wrapper carrying an endpoint, an optional auth header, and any
/// extra headers the provider wants on every request.
pub struct HttpClient {
    client: Client,
    endpoint: String,
    auth_header: Option<(String, String)>,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    pub fn new(
        endpoint: String,
        auth_header: Option<(String, String)>,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            auth_header,
            extra_headers: extra_headers.unwrap_or_default(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), path)
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, ForgeError> {
        let mut request = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json");

        if let Some((name, value)) = &self.auth_header {
            request = request.header(name, value);
        }
        for (key, value) in &self.extra_headers {
            request = request.header(key, value);
        }

        let response = request.json(payload).send().await?;
        Ok(response)
    }

    pub async fn get(&self, path: &str) -> Result<Response, ForgeError> {
        let mut request = self.client.get(self.url(path));

        if let Some((name, value)) = &self.auth_header {
            request = request.header(name, value);
        }
        for (key, value) in &self.extra_headers {
            request = request.header(key, value);
        }

        let response = request.send().await?;
        Ok(response)
    }
}
