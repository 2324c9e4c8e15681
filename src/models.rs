use bytes::Bytes;
use futures_util::{
    stream::{self, BoxStream},
    StreamExt, TryStreamExt,
};
use reqwest::header::HeaderMap;
use serde::Serialize;

use crate::error::TrackorResult;

/// Field name to value mapping sent as the body of create/update calls.
/// Keys are passed through as-is; the backend owns the schema.
pub type FieldSet = serde_json::Map<String, serde_json::Value>;

/// MIME type used for uploads when the caller does not pick one
pub const DEFAULT_UPLOAD_MIME: &str = "application/pdf";

/// Body of `POST /api/v3/trackor_types/{type}/trackors`
#[derive(Debug, Clone, Serialize)]
pub struct NewTrackor<'a, F> {
    pub fields: &'a F,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<ParentRef<'a>>,
}

impl<'a, F: Serialize> NewTrackor<'a, F> {
    /// Record without a parent; serializes with no `parents` key at all
    pub fn orphan(fields: &'a F) -> Self {
        Self {
            fields,
            parents: Vec::new(),
        }
    }

    /// Record attached to exactly one parent located by `filter`
    pub fn with_parent(fields: &'a F, parent: ParentRef<'a>) -> Self {
        Self {
            fields,
            parents: vec![parent],
        }
    }
}

/// Parent descriptor: the parent's trackor type plus a filter locating it
#[derive(Debug, Clone, Serialize)]
pub struct ParentRef<'a> {
    pub trackor_type: &'a str,
    pub filter: serde_json::Value,
}

/// File to upload into an EFile field
#[derive(Debug, Clone)]
pub struct FileBlob {
    pub bytes: Bytes,
    pub file_name: String,
    pub mime_type: String,
}

impl FileBlob {
    pub fn new(bytes: impl Into<Bytes>, file_name: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: file_name.into(),
            mime_type: DEFAULT_UPLOAD_MIME.to_string(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }
}

/// Successful file download: response headers plus the body as a byte
/// stream. The body has already been read in full when this is built.
pub struct FileDownload {
    pub headers: HeaderMap,
    pub body: BoxStream<'static, reqwest::Result<Bytes>>,
}

impl FileDownload {
    /// Wrap an already-read body as a single-chunk stream
    pub fn buffered(headers: HeaderMap, bytes: Bytes) -> Self {
        Self {
            headers,
            body: stream::once(async move { Ok::<_, reqwest::Error>(bytes) }).boxed(),
        }
    }

    /// Drain the body stream into memory
    pub async fn bytes(self) -> TrackorResult<Bytes> {
        let chunks: Vec<Bytes> = self.body.try_collect().await?;
        Ok(chunks.concat().into())
    }
}

impl std::fmt::Debug for FileDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDownload")
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Successful file upload: response headers plus the decoded body
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub headers: HeaderMap,
    pub body: UploadBody,
}

/// Upload responses are JSON (usually a blob_data_id) but not always
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UploadBody {
    Json(serde_json::Value),
    Text(String),
}

impl UploadBody {
    /// JSON if the text parses, otherwise the raw text
    pub fn decode(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }
}
