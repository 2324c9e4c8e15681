/*
 * Trackor bridge - OneVizion Trackor API client and meeting-transcript webhook
 */

// Internal modules
mod client;
pub mod models;  // Make models public
mod apis;
mod error;
mod auth;
mod config;
pub mod filter;
pub mod ingest;
pub mod server;
pub mod middleware;

// Re-export public types and interfaces
pub use client::{TrackorClient, DOWNLOAD_TIMEOUT, UPLOAD_TIMEOUT};
pub use models::*;
pub use apis::*;
pub use error::{TrackorError, TrackorResult};
pub use auth::{Authentication, BasicAuth};
pub use config::Settings;
pub use filter::Filter;
pub use ingest::{MeetingRecord, WebhookIngestor, WebhookPayload};

// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        TrackorClient,
        BasicAuth, Settings,
        TrackorError, TrackorResult,
        // Common model types
        FieldSet, FileBlob, FileDownload, FileUpload, UploadBody,
        Filter, WebhookIngestor, WebhookPayload,
    };
}
