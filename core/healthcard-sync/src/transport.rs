//! Transport abstraction between the synchronizer and the server.
//!
//! Every endpoint answers with an [`Envelope`]. The HTTP status is secondary:
//! many failures arrive as `200 {success: false}` and some as `4xx` with a
//! perfectly good envelope, so the body is parsed first and the status only
//! decides how an unparseable body is reported.

use crate::config::ClientConfig;
use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use healthcard_model::{HttpMethod, ModuleSchema, MultipartBody, RequestBody};
use healthcard_types::{Envelope, RecordId};
use reqwest::Client;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use tracing::debug;

/// One request to the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: RequestBody) -> Self {
        Self::new(HttpMethod::Post, path).body(body)
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn query<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

/// A decoded response: HTTP status plus envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub envelope: Envelope,
}

impl ApiResponse {
    pub fn ok(envelope: Envelope) -> Self {
        Self {
            status: 200,
            envelope,
        }
    }

    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests for a module's records.
///
/// Implementors only provide [`send`](Self::send); the record operations are
/// derived from the module's routes.
#[async_trait]
pub trait RecordTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> SyncResult<ApiResponse>;

    /// Fetches the module's collection.
    async fn list(
        &self,
        schema: &'static ModuleSchema,
        params: Vec<(&'static str, String)>,
    ) -> SyncResult<Envelope> {
        let request = ApiRequest::get(schema.endpoints.list).query(params);
        Ok(self.send(request).await?.envelope)
    }

    async fn create(&self, schema: &'static ModuleSchema, body: RequestBody) -> SyncResult<Envelope> {
        let route = schema.endpoints.create.ok_or(SyncError::Unsupported {
            module: schema.name,
            operation: "create",
        })?;
        let request = ApiRequest::new(route.method, route.path_for(None)).body(body);
        Ok(self.send(request).await?.envelope)
    }

    async fn update(
        &self,
        schema: &'static ModuleSchema,
        id: RecordId,
        body: RequestBody,
    ) -> SyncResult<Envelope> {
        let route = schema.endpoints.update.ok_or(SyncError::Unsupported {
            module: schema.name,
            operation: "update",
        })?;
        let body = if route.id_in_body {
            body.with_record_id(id)
        } else {
            body
        };
        let request = ApiRequest::new(route.method, route.path_for(Some(id))).body(body);
        Ok(self.send(request).await?.envelope)
    }

    async fn delete(&self, schema: &'static ModuleSchema, id: RecordId) -> SyncResult<Envelope> {
        let route = schema.endpoints.delete.ok_or(SyncError::Unsupported {
            module: schema.name,
            operation: "delete",
        })?;
        let mut request = ApiRequest::new(route.method, route.path_for(Some(id)));
        if route.id_in_body {
            request = request.body(RequestBody::Empty.with_record_id(id));
        }
        Ok(self.send(request).await?.envelope)
    }
}

/// [`RecordTransport`] over HTTP.
pub struct HttpTransport {
    config: ClientConfig,
    client: Client,
}

impl HttpTransport {
    /// Creates a transport for `config`.
    pub fn new(config: ClientConfig) -> SyncResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(session) = &config.session_cookie {
            let cookie = HeaderValue::from_str(&format!("session={session}"))
                .map_err(|e| SyncError::Config(format!("invalid session cookie: {e}")))?;
            headers.insert(COOKIE, cookie);
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| SyncError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }

    fn multipart(body: &MultipartBody) -> SyncResult<Form> {
        let mut form = Form::new();
        for (name, value) in &body.fields {
            form = form.text(name.clone(), value.clone());
        }
        for (name, file) in &body.files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.content_type)
                .map_err(|e| SyncError::Protocol(format!("bad content type: {e}")))?;
            form = form.part(name.clone(), part);
        }
        Ok(form)
    }
}

#[async_trait]
impl RecordTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> SyncResult<ApiResponse> {
        let url = self.config.url(&request.path);
        debug!("{} {} {:?}", request.method.as_str(), url, request.query);

        let mut builder = self.client.request(Self::method(request.method), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match &request.body {
            RequestBody::Json(map) => builder.json(map),
            RequestBody::Multipart(body) => builder.multipart(Self::multipart(body)?),
            RequestBody::Empty => builder,
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                SyncError::Timeout
            } else {
                SyncError::Network(format!("{} {url} failed: {e}", request.method.as_str()))
            }
        })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SyncError::Network(format!("failed to read response: {e}")))?;
        debug!("{} {url} -> {status} ({} bytes)", request.method.as_str(), bytes.len());

        match Envelope::from_slice(&bytes) {
            Ok(envelope) => Ok(ApiResponse {
                status: status.as_u16(),
                envelope,
            }),
            Err(_) if !status.is_success() => Err(SyncError::Http {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).chars().take(200).collect(),
            }),
            Err(e) => Err(SyncError::Decode(format!("{url}: {e}"))),
        }
    }
}
