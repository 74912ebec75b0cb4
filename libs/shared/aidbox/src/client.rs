use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::fhir::Bundle;

/// Thin client for the Aidbox FHIR REST API. All resource I/O in the
/// application goes through this type.
pub struct AidboxClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl AidboxClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.aidbox_base_url.clone(),
            username: config.aidbox_username.clone(),
            password: config.aidbox_password.clone(),
        }
    }

    /// Client pointed at an arbitrary base URL, for tests against a mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            username: String::new(),
            password: String::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    async fn request<T>(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(String, String)]>,
        body: Option<Value>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.get_headers());

        if !self.username.is_empty() {
            req = req.basic_auth(&self.username, Some(&self.password));
        }
        if let Some(params) = query {
            req = req.query(params);
        }
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Aidbox error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("Aidbox error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Search a resource type; repeated parameter names are allowed, as FHIR
    /// range searches use (e.g. `date=ge...&date=le...`).
    pub async fn search(
        &self,
        resource_type: &str,
        params: &[(String, String)],
    ) -> Result<Bundle> {
        let path = format!("/fhir/{}", resource_type);
        self.request(Method::GET, &path, Some(params), None).await
    }

    pub async fn read<T: DeserializeOwned>(&self, resource_type: &str, id: &str) -> Result<T> {
        let path = format!("/fhir/{}/{}", resource_type, id);
        self.request(Method::GET, &path, None, None).await
    }

    /// Create a resource; the server assigns and returns the identifier.
    pub async fn create<T>(&self, resource_type: &str, resource: &T) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let path = format!("/fhir/{}", resource_type);
        let body = serde_json::to_value(resource)?;
        self.request(Method::POST, &path, None, Some(body)).await
    }

    pub async fn update<T>(&self, resource_type: &str, id: &str, resource: &T) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let path = format!("/fhir/{}/{}", resource_type, id);
        let body = serde_json::to_value(resource)?;
        self.request(Method::PUT, &path, None, Some(body)).await
    }

    /// Delete by identifier. The response body is ignored; Aidbox returns the
    /// deleted resource on 200 and nothing on 204.
    pub async fn delete(&self, resource_type: &str, id: &str) -> Result<()> {
        let url = format!("{}/fhir/{}/{}", self.base_url, resource_type, id);
        debug!("Making request to {}", url);

        let mut req = self
            .client
            .request(Method::DELETE, &url)
            .headers(self.get_headers());
        if !self.username.is_empty() {
            req = req.basic_auth(&self.username, Some(&self.password));
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Aidbox error ({}): {}", status, error_text);
            return Err(anyhow!("Aidbox error ({}): {}", status, error_text));
        }

        Ok(())
    }
}
