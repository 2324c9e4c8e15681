use crate::{
    client::{segment, TrackorClient},
    error::{TrackorError, TrackorResult},
    models::{NewTrackor, ParentRef},
};
use reqwest::Method;
use serde::Serialize;
use log::{debug, error, info};
use std::fmt::Display;

/// Returned by a successful delete; the backend's body is not used
pub const DELETE_CONFIRMATION: &str = "Trackor Deleted";

/// Trackor record API operations.
///
/// Every call here fails on a non-2xx response with
/// [`TrackorError::Api`] holding the backend's response text.
pub struct TrackorApi<'a> {
    client: &'a TrackorClient,
}

impl<'a> TrackorApi<'a> {
    pub fn new(client: &'a TrackorClient) -> Self {
        Self { client }
    }

    /// Update a single trackor
    ///
    /// # Arguments
    /// * `trackor_id` - Backend-assigned trackor ID
    /// * `fields` - Field values to write
    pub async fn update_trackor<F>(
        &self,
        trackor_id: impl Display,
        fields: &F,
    ) -> TrackorResult<serde_json::Value>
    where
        F: Serialize,
    {
        info!("Updating trackor: {}", trackor_id);
        let path = format!("/api/v3/trackors/{}", segment(&trackor_id));
        let req = self.client.json_request(Method::PUT, &path).await?;
        let body = serde_json::to_vec(fields)?;

        self.client.execute(req.body(body)).await
    }

    /// Search trackors of a type through a filter expression
    ///
    /// # Arguments
    /// * `trackor_type` - Trackor Type name (not its label), e.g. `BILL_OF_MATERIALS`
    /// * `fields` - Field names to return. An unknown field yields HTTP 404.
    /// * `filter` - Filter expression sent verbatim as the request body.
    ///   See [`crate::filter::Filter`] for the operator vocabulary.
    pub async fn search_trackors<S>(
        &self,
        trackor_type: &str,
        fields: &[S],
        filter: &str,
    ) -> TrackorResult<serde_json::Value>
    where
        S: AsRef<str>,
    {
        info!("Searching {} trackors", trackor_type);
        let field_list = fields.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        let path = format!(
            "/api/v3/trackor_types/{}/trackors/search?fields={}",
            segment(trackor_type),
            field_list
        );
        let req = self.client.json_request(Method::POST, &path).await?;
        debug!("Search filter: {}", filter);

        self.client.execute(req.body(filter.to_owned())).await
    }

    /// Create a trackor under a parent located by `parent_filter`
    ///
    /// # Arguments
    /// * `trackor_type` - Trackor Type of the new record
    /// * `fields` - Field values of the new record
    /// * `parent_type` - Trackor Type of the parent
    /// * `parent_filter` - Field/value mapping that identifies the parent
    pub async fn create_child_trackor<F, P>(
        &self,
        trackor_type: &str,
        fields: &F,
        parent_type: &str,
        parent_filter: &P,
    ) -> TrackorResult<serde_json::Value>
    where
        F: Serialize,
        P: Serialize,
    {
        let parent = ParentRef {
            trackor_type: parent_type,
            filter: serde_json::to_value(parent_filter)?,
        };
        let data = serde_json::to_string(&NewTrackor::with_parent(fields, parent))?;
        info!("Creating trackor with data: {}", data);

        let path = format!("/api/v3/trackor_types/{}/trackors", segment(trackor_type));
        let req = self.client.json_request(Method::POST, &path).await?;

        match self.client.execute(req.body(data)).await {
            Err(TrackorError::Api { status, message }) => {
                error!("Error creating trackor: {}", message);
                Err(TrackorError::Api { status, message })
            }
            result => result,
        }
    }

    /// Create a trackor with no parent
    ///
    /// # Arguments
    /// * `trackor_type` - Trackor Type of the new record
    /// * `fields` - Field values of the new record
    pub async fn create_trackor<F>(
        &self,
        trackor_type: &str,
        fields: &F,
    ) -> TrackorResult<serde_json::Value>
    where
        F: Serialize,
    {
        info!("Creating {} trackor without parent", trackor_type);
        let path = format!("/api/v3/trackor_types/{}/trackors", segment(trackor_type));
        let req = self.client.json_request(Method::POST, &path).await?;
        let body = serde_json::to_vec(&NewTrackor::orphan(fields))?;

        self.client.execute(req.body(body)).await
    }

    /// Delete a trackor
    ///
    /// The request body is the JSON-encoded trackor type, not the ID. The
    /// backend has always accepted this, so it is sent unchanged.
    ///
    /// # Arguments
    /// * `trackor_type` - Trackor Type of the record
    /// * `trackor_id` - Backend-assigned trackor ID
    pub async fn delete_trackor(
        &self,
        trackor_type: &str,
        trackor_id: impl Display,
    ) -> TrackorResult<&'static str> {
        info!("Deleting {} trackor {}", trackor_type, trackor_id);
        let path = format!(
            "/api/v3/trackor_types/{}/trackors?trackor_id={}",
            segment(trackor_type),
            urlencoding::encode(&trackor_id.to_string())
        );
        let req = self.client.json_request(Method::DELETE, &path).await?;
        let body = serde_json::to_vec(trackor_type)?;

        self.client.execute_text(req.body(body)).await?;
        Ok(DELETE_CONFIRMATION)
    }
}
