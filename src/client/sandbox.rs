//! Sandbox lifecycle operations: create, start/stop, labels, auto-lifecycle
//! intervals, delete.

use reqwest::Method;
use std::collections::HashMap;

use super::types::{CreateSandboxRequest, SandboxInfo};
use super::{Result, SandboxClient};

impl SandboxClient {
    pub async fn create_sandbox(&self, req: &CreateSandboxRequest) -> Result<SandboxInfo> {
        let resp = self
            .execute(self.request(Method::POST, "/sandbox").json(req))
            .await?;
        Ok(resp.json().await?)
    }

    pub async fn get_sandbox(&self, id: &str) -> Result<SandboxInfo> {
        self.get_json(&format!("/sandbox/{id}")).await
    }

    pub async fn list_sandboxes(&self) -> Result<Vec<SandboxInfo>> {
        self.get_json("/sandbox").await
    }

    pub async fn start_sandbox(&self, id: &str) -> Result<()> {
        self.execute(self.request(Method::POST, &format!("/sandbox/{id}/start")))
            .await?;
        Ok(())
    }

    pub async fn stop_sandbox(&self, id: &str) -> Result<()> {
        self.execute(self.request(Method::POST, &format!("/sandbox/{id}/stop")))
            .await?;
        Ok(())
    }

    pub async fn delete_sandbox(&self, id: &str) -> Result<()> {
        self.execute(
            self.request(Method::DELETE, &format!("/sandbox/{id}"))
                .query(&[("force", "true")]),
        )
        .await?;
        Ok(())
    }

    /// Replace the sandbox's label set. Returns the updated record.
    pub async fn set_labels(
        &self,
        id: &str,
        labels: &HashMap<String, String>,
    ) -> Result<SandboxInfo> {
        let resp = self
            .execute(
                self.request(Method::PUT, &format!("/sandbox/{id}/labels"))
                    .json(labels),
            )
            .await?;
        Ok(resp.json().await?)
    }

    /// Minutes of inactivity before the service deletes the sandbox.
    /// 0 deletes immediately on stop; negative disables auto-delete.
    pub async fn set_auto_delete_interval(&self, id: &str, minutes: i64) -> Result<()> {
        self.execute(self.request(
            Method::POST,
            &format!("/sandbox/{id}/autodelete/{minutes}"),
        ))
        .await?;
        Ok(())
    }

    /// Minutes of inactivity before a stopped sandbox is archived.
    pub async fn set_auto_archive_interval(&self, id: &str, minutes: i64) -> Result<()> {
        self.execute(self.request(
            Method::POST,
            &format!("/sandbox/{id}/autoarchive/{minutes}"),
        ))
        .await?;
        Ok(())
    }
}
