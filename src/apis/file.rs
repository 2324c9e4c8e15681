use crate::{
    client::{segment, TrackorClient},
    models::{FileBlob, FileDownload, FileUpload, UploadBody},
};
use reqwest::{multipart, Method, StatusCode};
use log::{debug, error, info};
use std::fmt::Display;

/// EFile API operations.
///
/// Unlike [`crate::TrackorApi`], these never return errors: a missing file,
/// a rejected upload, and a transport failure all come back as `None` and
/// are only told apart in the log.
pub struct FileApi<'a> {
    client: &'a TrackorClient,
}

impl<'a> FileApi<'a> {
    pub fn new(client: &'a TrackorClient) -> Self {
        Self { client }
    }

    fn file_path(trackor_id: &dyn Display, field_name: &str) -> String {
        format!("/api/v3/trackor/{}/file/{}", segment(trackor_id), segment(field_name))
    }

    /// Download the file stored in an EFile field
    ///
    /// # Arguments
    /// * `trackor_id` - Trackor holding the file
    /// * `field_name` - EFile field name
    pub async fn get_file(
        &self,
        trackor_id: impl Display,
        field_name: &str,
    ) -> Option<FileDownload> {
        info!("Attempting to retrieve file from trackor {}, field {}", trackor_id, field_name);
        let path = Self::file_path(&trackor_id, field_name);

        let req = match self.client.json_request(Method::GET, &path).await {
            Ok(req) => req.timeout(self.client.download_timeout()),
            Err(e) => {
                error!("Error in get_file: {}", e);
                return None;
            }
        };

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Error in get_file: {}", e);
                return None;
            }
        };

        let status = response.status();
        debug!("Response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            error!("File not found (404) at {}", path);
            return None;
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("File retrieval failed: {} - {}", status.as_u16(), text);
            return None;
        }

        // Read the whole body here so a cut connection or a slow body is
        // still reported as `None`.
        let headers = response.headers().clone();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Error in get_file: {}", e);
                return None;
            }
        };
        info!("Successfully retrieved file (size: {} bytes)", bytes.len());

        Some(FileDownload::buffered(headers, bytes))
    }

    /// Upload a file into an EFile field as `multipart/form-data`
    ///
    /// Only HTTP 200 counts as success; any other status, 2xx included,
    /// yields `None`.
    ///
    /// # Arguments
    /// * `trackor_id` - Trackor receiving the file
    /// * `field_name` - EFile field name
    /// * `blob` - File contents, name and MIME type
    pub async fn post_file(
        &self,
        trackor_id: impl Display,
        field_name: &str,
        blob: FileBlob,
    ) -> Option<FileUpload> {
        info!(
            "Uploading file to trackor {}, field {}, name {}",
            trackor_id, field_name, blob.file_name
        );
        let path = Self::file_path(&trackor_id, field_name);

        let part = match multipart::Part::stream(blob.bytes)
            .file_name(blob.file_name.clone())
            .mime_str(&blob.mime_type)
        {
            Ok(part) => part,
            Err(e) => {
                error!("Error in post_file: {}", e);
                return None;
            }
        };
        let form = multipart::Form::new().part("file", part);

        // No Content-Type here: reqwest sets it with the multipart boundary
        let req = match self.client.request(Method::POST, &path).await {
            Ok(req) => req
                .query(&[("file_name", blob.file_name.as_str())])
                .multipart(form)
                .timeout(self.client.upload_timeout()),
            Err(e) => {
                error!("Error in post_file: {}", e);
                return None;
            }
        };

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Error in post_file: {}", e);
                return None;
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                error!("Error in post_file: {}", e);
                return None;
            }
        };
        debug!(
            "Upload response {}: {}",
            status.as_u16(),
            text.chars().take(500).collect::<String>()
        );

        match status {
            StatusCode::OK => Some(FileUpload {
                headers,
                body: UploadBody::decode(text),
            }),
            StatusCode::NOT_FOUND => {
                error!("Upload 404: check trackor_id/field_name {}/{}", trackor_id, field_name);
                None
            }
            _ => {
                error!("File upload failed {}: {}", status.as_u16(), text);
                None
            }
        }
    }
}
