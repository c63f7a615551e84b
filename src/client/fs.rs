//! Filesystem operations scoped to a sandbox: list, upload/download, search,
//! find, and replace-in-files.

use bytes::Bytes;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::types::{FileInfo, ReplaceResult, SearchMatch};
use super::{Result, SandboxClient};

/// One file in a batch upload.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub destination: String,
    pub data: Vec<u8>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplaceRequest<'a> {
    files: &'a [String],
    pattern: &'a str,
    new_value: &'a str,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    files: Vec<String>,
}

#[derive(Deserialize)]
struct FindResponse {
    #[serde(default)]
    matches: Vec<SearchMatch>,
}

impl SandboxClient {
    pub async fn list_files(&self, id: &str, path: &str) -> Result<Vec<FileInfo>> {
        let resp = self
            .execute(
                self.request(Method::GET, &format!("/toolbox/{id}/files"))
                    .query(&[("path", path)]),
            )
            .await?;
        Ok(resp.json().await?)
    }

    pub async fn create_folder(&self, id: &str, path: &str) -> Result<()> {
        self.execute(
            self.request(Method::POST, &format!("/toolbox/{id}/files/folder"))
                .query(&[("path", path), ("mode", "0755")]),
        )
        .await?;
        Ok(())
    }

    /// Upload a single buffer to `path` inside the sandbox.
    pub async fn upload_file(&self, id: &str, path: &str, data: Vec<u8>) -> Result<()> {
        self.execute(
            self.request(Method::POST, &format!("/toolbox/{id}/files/upload"))
                .query(&[("path", path)])
                .header("Content-Type", "application/octet-stream")
                .body(data),
        )
        .await?;
        Ok(())
    }

    /// Upload a batch of source/destination pairs, in order.
    pub async fn upload_files(&self, id: &str, files: Vec<FileUpload>) -> Result<()> {
        for file in files {
            self.upload_file(id, &file.destination, file.data).await?;
        }
        Ok(())
    }

    pub async fn download_file(&self, id: &str, path: &str) -> Result<Bytes> {
        let resp = self
            .execute(
                self.request(Method::GET, &format!("/toolbox/{id}/files/download"))
                    .query(&[("path", path)]),
            )
            .await?;
        Ok(resp.bytes().await?)
    }

    /// Glob match on file names under `path`. Returns matching paths.
    pub async fn search_files(&self, id: &str, path: &str, pattern: &str) -> Result<Vec<String>> {
        let resp = self
            .execute(
                self.request(Method::GET, &format!("/toolbox/{id}/files/search"))
                    .query(&[("path", path), ("pattern", pattern)]),
            )
            .await?;
        let body: SearchResponse = resp.json().await?;
        Ok(body.files)
    }

    /// Text match inside files under `path`. Returns file/line/content hits.
    pub async fn find_in_files(
        &self,
        id: &str,
        path: &str,
        pattern: &str,
    ) -> Result<Vec<SearchMatch>> {
        let resp = self
            .execute(
                self.request(Method::GET, &format!("/toolbox/{id}/files/find"))
                    .query(&[("path", path), ("pattern", pattern)]),
            )
            .await?;
        let body: FindResponse = resp.json().await?;
        Ok(body.matches)
    }

    pub async fn replace_in_files(
        &self,
        id: &str,
        files: &[String],
        pattern: &str,
        new_value: &str,
    ) -> Result<Vec<ReplaceResult>> {
        let req = ReplaceRequest {
            files,
            pattern,
            new_value,
        };
        let resp = self
            .execute(
                self.request(Method::POST, &format!("/toolbox/{id}/files/replace"))
                    .json(&req),
            )
            .await?;
        Ok(resp.json().await?)
    }
}
