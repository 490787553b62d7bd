//! File attachment operations.

use std::fmt;

use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::client::PlatformClient;
use crate::error::{Error, InvalidInputError};
use crate::types::Table;

/// Metadata for a binary blob stored by the platform.
///
/// Addressed either by database id (`file_id`) or by globally unique id
/// (`unique_file_id`); the blob itself is never cached locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileDescription {
    /// Database file id.
    pub file_id: i64,
    /// Globally unique file id, usable for unauthenticated content reads.
    pub unique_file_id: Uuid,
    /// Original file name.
    pub file_name: String,
    /// Size in bytes.
    #[serde(default)]
    pub file_size: Option<i64>,
    /// Caller-supplied description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether this file is the default image for its record.
    #[serde(default)]
    pub is_default_image: bool,
    /// Table the file is attached to.
    #[serde(default)]
    pub table_name: Option<String>,
    /// Record the file is attached to.
    #[serde(default)]
    pub record_id: Option<i64>,
    /// Last modification time reported by the platform.
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// A file to upload: name, optional content type, and raw bytes.
#[derive(Clone)]
pub struct FilePayload {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl FilePayload {
    /// Create a payload from a file name and its bytes.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Set an explicit content type (e.g., `image/svg+xml`).
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Returns the file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    fn into_part(self) -> Result<Part, Error> {
        let mut part = Part::bytes(self.bytes).file_name(self.file_name);
        if let Some(content_type) = self.content_type {
            part = part
                .mime_str(&content_type)
                .map_err(|_| InvalidInputError::ContentType {
                    value: content_type,
                })?;
        }
        Ok(part)
    }
}

// Debug shows the byte count, not the bytes
impl fmt::Debug for FilePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePayload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .finish()
    }
}

/// Optional metadata for uploads and updates.
#[derive(Debug, Clone, Default)]
pub struct FileParams {
    description: Option<String>,
    default_image: Option<bool>,
    longest_dimension: Option<u32>,
    user_id: Option<i64>,
}

impl FileParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// File description (`$description`).
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the file as its record's default image (`$isDefaultImage`).
    pub fn default_image(mut self, default: bool) -> Self {
        self.default_image = Some(default);
        self
    }

    /// Ask the platform to resize images to this longest dimension
    /// (`$longestDimension`).
    pub fn longest_dimension(mut self, pixels: u32) -> Self {
        self.longest_dimension = Some(pixels);
        self
    }

    /// Acting user for audit logging (`$userId`).
    pub fn user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(ref v) = self.description {
            pairs.push(("$description".to_string(), v.clone()));
        }
        if let Some(v) = self.default_image {
            pairs.push(("$isDefaultImage".to_string(), v.to_string()));
        }
        if let Some(v) = self.longest_dimension {
            pairs.push(("$longestDimension".to_string(), v.to_string()));
        }
        if let Some(v) = self.user_id {
            pairs.push(("$userId".to_string(), v.to_string()));
        }
        pairs
    }
}

/// File operations against `/files/...`.
///
/// Uploads are all-or-nothing: a multipart call with several files either
/// succeeds or fails as a unit, per platform behavior. The single
/// unauthenticated path is [`content_by_unique_id`], which is keyed by the
/// globally unique id and acquires no token; it serves public-facing
/// rendering without exposing credentials.
///
/// [`content_by_unique_id`]: FileService::content_by_unique_id
#[derive(Debug, Clone)]
pub struct FileService {
    client: PlatformClient,
}

impl FileService {
    /// Create a file service over the given client.
    pub fn new(client: PlatformClient) -> Self {
        Self { client }
    }

    /// List file metadata attached to one record.
    #[instrument(skip(self), fields(table = %table))]
    pub async fn files_for_record(
        &self,
        table: &Table,
        record_id: i64,
        default_only: Option<bool>,
    ) -> Result<Vec<FileDescription>, Error> {
        debug!("listing files for record");

        let mut query = Vec::new();
        if let Some(default_only) = default_only {
            query.push(("$default".to_string(), default_only.to_string()));
        }

        let token = self.client.ensure_valid_token().await?;
        self.client
            .http()
            .get(&record_path(table, record_id), &query, Some(&token))
            .await
    }

    /// Upload one or more files to a record.
    ///
    /// Returns the created file descriptions in response order.
    #[instrument(skip(self, files, params), fields(table = %table, count = files.len()))]
    pub async fn upload(
        &self,
        table: &Table,
        record_id: i64,
        files: Vec<FilePayload>,
        params: &FileParams,
    ) -> Result<Vec<FileDescription>, Error> {
        debug!("uploading files");

        let mut form = Form::new();
        for file in files {
            let name = file.file_name().to_string();
            form = form.part(name, file.into_part()?);
        }

        let token = self.client.ensure_valid_token().await?;
        self.client
            .http()
            .post_multipart(
                &record_path(table, record_id),
                &params.to_pairs(),
                form,
                Some(&token),
            )
            .await
    }

    /// Replace content and/or metadata for an existing file.
    ///
    /// Passing `None` for the payload updates metadata only.
    #[instrument(skip(self, file, params))]
    pub async fn update(
        &self,
        file_id: i64,
        file: Option<FilePayload>,
        params: &FileParams,
    ) -> Result<FileDescription, Error> {
        debug!("updating file");

        let mut form = Form::new();
        if let Some(file) = file {
            let name = file.file_name().to_string();
            form = form.part(name, file.into_part()?);
        }

        let token = self.client.ensure_valid_token().await?;
        self.client
            .http()
            .put_multipart(
                &file_path(file_id),
                &params.to_pairs(),
                form,
                Some(&token),
            )
            .await
    }

    /// Delete a file.
    ///
    /// Fire-and-forget from the caller's perspective: no representation of
    /// the removed file is returned.
    #[instrument(skip(self))]
    pub async fn delete(&self, file_id: i64, user_id: Option<i64>) -> Result<(), Error> {
        debug!("deleting file");

        let mut query = Vec::new();
        if let Some(user_id) = user_id {
            query.push(("$userId".to_string(), user_id.to_string()));
        }

        let token = self.client.ensure_valid_token().await?;
        self.client
            .http()
            .delete_empty(&file_path(file_id), &query, Some(&token))
            .await
    }

    /// Fetch raw file content by globally unique id, without
    /// authentication.
    ///
    /// No token is acquired or sent; this is the public read path used
    /// for image rendering on pages that hold no credentials.
    #[instrument(skip(self))]
    pub async fn content_by_unique_id(
        &self,
        unique_id: &Uuid,
        thumbnail: bool,
    ) -> Result<Vec<u8>, Error> {
        debug!("fetching file content");

        let mut query = Vec::new();
        if thumbnail {
            query.push(("$thumbnail".to_string(), "true".to_string()));
        }

        self.client
            .http()
            .get_bytes(&format!("files/{}", unique_id), &query, None)
            .await
    }

    /// Fetch file metadata by database id.
    #[instrument(skip(self))]
    pub async fn metadata(&self, file_id: i64) -> Result<FileDescription, Error> {
        debug!("fetching file metadata");

        let token = self.client.ensure_valid_token().await?;
        self.client
            .http()
            .get(&format!("files/{}/metadata", file_id), &[], Some(&token))
            .await
    }

    /// Fetch file metadata by globally unique id.
    #[instrument(skip(self))]
    pub async fn metadata_by_unique_id(
        &self,
        unique_id: &Uuid,
    ) -> Result<FileDescription, Error> {
        debug!("fetching file metadata");

        let token = self.client.ensure_valid_token().await?;
        self.client
            .http()
            .get(&format!("files/{}/metadata", unique_id), &[], Some(&token))
            .await
    }
}

fn record_path(table: &Table, record_id: i64) -> String {
    format!("files/{}/{}", table, record_id)
}

fn file_path(file_id: i64) -> String {
    format!("files/{}", file_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_description_parses_platform_shape() {
        let description: FileDescription = serde_json::from_value(json!({
            "FileId": 311,
            "UniqueFileId": "7b0a6a66-5dd7-4c3e-9c14-9a7d61cf3a0e",
            "FileName": "campus.svg",
            "FileSize": 2048,
            "IsDefaultImage": true,
            "TableName": "Congregations",
            "RecordId": 4
        }))
        .unwrap();

        assert_eq!(description.file_id, 311);
        assert_eq!(description.file_name, "campus.svg");
        assert!(description.is_default_image);
        assert_eq!(description.record_id, Some(4));
        assert_eq!(description.last_updated, None);
    }

    #[test]
    fn payload_debug_omits_bytes() {
        let payload = FilePayload::new("banner.png", vec![0u8; 4096]);
        let debug = format!("{:?}", payload);
        assert!(debug.contains("banner.png"));
        assert!(debug.contains("4096 bytes"));
    }

    #[test]
    fn payload_rejects_invalid_content_type() {
        let payload = FilePayload::new("banner.png", vec![1, 2, 3])
            .with_content_type("not a mime type");
        assert!(payload.into_part().is_err());
    }

    #[test]
    fn file_params_render_expected_keys() {
        let pairs = FileParams::new()
            .description("campus icon")
            .default_image(true)
            .longest_dimension(400)
            .user_id(12)
            .to_pairs();

        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            ["$description", "$isDefaultImage", "$longestDimension", "$userId"]
        );
    }
}
