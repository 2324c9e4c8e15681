use crate::{
    auth::{Authentication, BasicAuth},
    config::Settings,
    error::{TrackorError, TrackorResult},
    apis::{TrackorApi, FileApi},
};
use log::debug;
use reqwest::{
    header::{HeaderValue, CONTENT_ENCODING, CONTENT_TYPE},
    Client, RequestBuilder, Response,
};
use serde::de::DeserializeOwned;
use std::{sync::Arc, time::Duration};
use url::Url;

/// Bound on a file download before it is reported as a transport failure
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Bound on a file upload before it is reported as a transport failure
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Main Trackor client
#[derive(Clone)]
pub struct TrackorClient {
    client: Client,
    base_url: Url,
    auth: Arc<dyn Authentication>,
    download_timeout: Duration,
    upload_timeout: Duration,
}

impl TrackorClient {
    /// Create a new Trackor client with authentication
    pub fn new(
        base_url: impl AsRef<str>,
        auth: impl Authentication + 'static,
    ) -> TrackorResult<Self> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Self::with_client(client, base_url, auth)
    }

    /// Create a new Trackor client with custom reqwest client
    pub fn with_client(
        client: Client,
        base_url: impl AsRef<str>,
        auth: impl Authentication + 'static,
    ) -> TrackorResult<Self> {
        let base_url = Url::parse(base_url.as_ref())?;

        Ok(Self {
            client,
            base_url,
            auth: Arc::new(auth),
            download_timeout: DOWNLOAD_TIMEOUT,
            upload_timeout: UPLOAD_TIMEOUT,
        })
    }

    /// Create a client from the loaded OneVizion settings
    pub fn from_settings(settings: &Settings) -> TrackorResult<Self> {
        Self::new(
            settings.base_url(),
            BasicAuth::new(&settings.login_onevizion, &settings.pass_onevizion),
        )
    }

    /// Override the download and upload timeouts
    pub fn with_file_timeouts(mut self, download: Duration, upload: Duration) -> Self {
        self.download_timeout = download;
        self.upload_timeout = upload;
        self
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn download_timeout(&self) -> Duration {
        self.download_timeout
    }

    pub fn upload_timeout(&self) -> Duration {
        self.upload_timeout
    }

    /// Get Trackor record API
    pub fn trackors(&self) -> TrackorApi<'_> {
        TrackorApi::new(self)
    }

    /// Get EFile API
    pub fn files(&self) -> FileApi<'_> {
        FileApi::new(self)
    }

    /// Full URL for an API path. The path is appended to the base URL, so a
    /// base such as `https://host/prefix` keeps its prefix.
    pub fn endpoint(&self, path: &str) -> TrackorResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}", base, path))?)
    }

    /// Build a request to the given path with authentication.
    ///
    /// `path` may carry a query string; it is kept verbatim.
    pub async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> TrackorResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        debug!("HTTP {} {}", method, url);
        let mut request = self.client.request(method, url);

        // Apply authentication
        let mut headers = reqwest::header::HeaderMap::new();
        self.auth.apply_auth(&mut headers).await?;
        headers.insert(CONTENT_ENCODING, HeaderValue::from_static("utf-8"));

        for (name, value) in headers.iter() {
            request = request.header(name, value);
        }

        Ok(request)
    }

    /// Build a request carrying the JSON header set
    pub async fn json_request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> TrackorResult<RequestBuilder> {
        let request = self.request(method, path).await?;
        Ok(request.header(CONTENT_TYPE, HeaderValue::from_static("application/json")))
    }

    /// Execute a request and decode the JSON body, failing on any non-2xx
    pub async fn execute<T>(&self, request: RequestBuilder) -> TrackorResult<T>
    where
        T: DeserializeOwned,
    {
        let text = self.execute_text(request).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Execute a request and return the raw body text, failing on any non-2xx
    pub async fn execute_text(&self, request: RequestBuilder) -> TrackorResult<String> {
        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Success bodies are returned as text; anything else becomes an
    /// `Api` error carrying the backend's text unchanged.
    async fn handle_response(&self, response: Response) -> TrackorResult<String> {
        let status = response.status();
        let text = response.text().await?;
        debug!("Response status: {}", status);

        if status.is_success() {
            Ok(text)
        } else {
            Err(TrackorError::api_error(status.as_u16(), text))
        }
    }
}

/// Percent-encode a single path segment
pub(crate) fn segment(value: impl std::fmt::Display) -> String {
    urlencoding::encode(&value.to_string()).into_owned()
}
