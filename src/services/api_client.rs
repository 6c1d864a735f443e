use std::time::Duration;

use bytes::Bytes;
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};

/// Thin wrapper over `reqwest` bound to the tracker backend.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let mut base_url = Url::parse(base_url.trim())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        debug!(%method, %url, "sending request");
        Ok(self.client.request(method, url))
    }

    /// Sends the request and turns any non-2xx answer into [`Error::Api`].
    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(status, &body);
        warn!(status = status.as_u16(), %detail, "backend rejected request");
        Err(Error::Api {
            status: status.as_u16(),
            detail,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let builder = self.request(Method::GET, path)?;
        Ok(self.send(builder).await?.json::<T>().await?)
    }

    pub async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path)?.query(query);
        Ok(self.send(builder).await?.json::<T>().await?)
    }

    pub async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(method, path)?.json(body);
        Ok(self.send(builder).await?.json::<T>().await?)
    }

    pub async fn send_multipart<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: Form,
    ) -> Result<T> {
        let builder = self.request(method, path)?.multipart(form);
        Ok(self.send(builder).await?.json::<T>().await?)
    }

    pub async fn get_bytes(&self, path: &str) -> Result<Bytes> {
        let builder = self.request(Method::GET, path)?;
        Ok(self.send(builder).await?.bytes().await?)
    }

    /// DELETE, ignoring whatever confirmation body comes back.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, path)?;
        self.send(builder).await?;
        Ok(())
    }
}

/// Best-effort human message from an error body.
///
/// Understands `{"detail": "..."}` and the validation-error list shape
/// `{"detail": [{"loc": [...], "msg": "..."}]}`; falls back to the raw body,
/// then to the status reason.
pub fn extract_detail(status: StatusCode, body: &str) -> String {
    let fallback = || {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
        } else {
            trimmed.chars().take(300).collect()
        }
    };

    let Ok(json) = serde_json::from_str::<JsonValue>(body) else {
        return fallback();
    };

    match json.get("detail").or_else(|| json.get("error")) {
        Some(JsonValue::String(detail)) => detail.clone(),
        Some(JsonValue::Array(items)) => {
            let messages: Vec<String> = items.iter().filter_map(describe_validation_item).collect();
            if messages.is_empty() {
                fallback()
            } else {
                messages.join("; ")
            }
        }
        Some(other) if !other.is_null() => other.to_string(),
        _ => fallback(),
    }
}

fn describe_validation_item(item: &JsonValue) -> Option<String> {
    if let Some(text) = item.as_str() {
        return Some(text.to_string());
    }
    let msg = item.get("msg").and_then(|m| m.as_str())?;
    let location: Vec<String> = item
        .get("loc")
        .and_then(|loc| loc.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter(|p| p.as_str() != Some("body"))
                .map(|p| match p {
                    JsonValue::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    if location.is_empty() {
        Some(msg.to_string())
    } else {
        Some(format!("{}: {}", location.join("."), msg))
    }
}
