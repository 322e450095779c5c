//! `reqwest`-backed resource client.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use quillpad_app::ports::KEY_TOKEN;
use quillpad_app::{ApiRequest, AppConfig, FormValue, KeyValueStore, Method, RequestBody, ResourceClient};
use quillpad_core::ApiError;

use crate::error::ClientError;

/// Issues API requests over HTTP. The auth token is read from the session
/// store on every authenticated request, so sign-in and sign-out take effect
/// immediately.
pub struct HttpResourceClient {
    api_root: String,
    http: reqwest::Client,
    store: Arc<dyn KeyValueStore>,
}

impl HttpResourceClient {
    /// Client for `config.api_base_url` with the configured timeout.
    pub fn new(config: &AppConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;
        Ok(Self {
            api_root: config.api_root().to_string(),
            http,
            store,
        })
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }

    fn auth_header(&self) -> Option<String> {
        match self.store.get(KEY_TOKEN) {
            Ok(token) => token.filter(|t| !t.is_empty()).map(|t| format!("Token {t}")),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read auth token");
                None
            }
        }
    }
}

fn method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn multipart(fields: Vec<(String, FormValue)>) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = match value {
            FormValue::Text(text) => form.text(name, text),
            FormValue::File(file) => {
                let mut part = Part::bytes(file.bytes).file_name(file.file_name);
                if let Some(content_type) = &file.content_type {
                    part = part
                        .mime_str(content_type)
                        .map_err(|e| ApiError::transport(format!("invalid content type: {e}")))?;
                }
                form.part(name, part)
            }
        };
    }
    Ok(form)
}

fn transport_reason(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "timeout".to_string()
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}

/// Decode a success body. Empty bodies are `Null`; non-JSON text is returned
/// as a string.
pub fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn request(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.url(&request.path);
        let mut builder = self.http.request(method(request.method), &url);
        if request.authenticated {
            if let Some(header) = self.auth_header() {
                builder = builder.header(reqwest::header::AUTHORIZATION, header);
            }
        }
        builder = match request.body {
            Some(RequestBody::Json(body)) => builder.json(&body),
            Some(RequestBody::Multipart(fields)) => builder.multipart(multipart(fields)?),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = %request.method, url = %url, error = %e, "Transport failure");
            ApiError::transport(transport_reason(&e))
        })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::transport(transport_reason(&e)))?;
        tracing::debug!(method = %request.method, url = %url, status = status.as_u16(), "Response");

        if status.is_success() {
            Ok(decode_body(&body))
        } else {
            Err(ApiError::from_response(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                &body,
            ))
        }
    }
}
