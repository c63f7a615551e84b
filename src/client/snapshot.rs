//! Snapshot management: declarative image definitions and prebuilt
//! environment templates for fast sandbox provisioning.

use reqwest::Method;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

use super::types::{Resources, SnapshotInfo, SnapshotState};
use super::{spawn_chunk_forwarder, ApiError, LogChunkStream, Result, SandboxClient};

/// Declarative image: base OS image plus package installs, shell commands,
/// working directory, and environment variables, applied in order by the
/// remote builder.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    base: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    packages: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    commands: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    workdir: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    env: BTreeMap<String, String>,
}

impl Image {
    pub fn base(image: &str) -> Self {
        Self {
            base: image.to_string(),
            packages: Vec::new(),
            commands: Vec::new(),
            workdir: None,
            env: BTreeMap::new(),
        }
    }

    pub fn packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages.extend(packages.into_iter().map(Into::into));
        self
    }

    pub fn run(mut self, command: &str) -> Self {
        self.commands.push(command.to_string());
        self
    }

    pub fn workdir(mut self, path: &str) -> Self {
        self.workdir = Some(path.to_string());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSnapshotRequest<'a> {
    name: &'a str,
    image: &'a Image,
    #[serde(skip_serializing_if = "Option::is_none")]
    resources: Option<&'a Resources>,
}

impl SandboxClient {
    /// Start a snapshot build from a declarative image. The build runs
    /// remotely; follow it with [`stream_snapshot_logs`] and
    /// [`wait_snapshot_active`].
    ///
    /// [`stream_snapshot_logs`]: SandboxClient::stream_snapshot_logs
    /// [`wait_snapshot_active`]: SandboxClient::wait_snapshot_active
    pub async fn create_snapshot(
        &self,
        name: &str,
        image: &Image,
        resources: Option<&Resources>,
    ) -> Result<SnapshotInfo> {
        let resp = self
            .execute(
                self.request(Method::POST, "/snapshot")
                    .json(&CreateSnapshotRequest {
                        name,
                        image,
                        resources,
                    }),
            )
            .await?;
        Ok(resp.json().await?)
    }

    pub async fn get_snapshot(&self, name: &str) -> Result<SnapshotInfo> {
        self.get_json(&format!("/snapshot/{name}")).await
    }

    pub async fn delete_snapshot(&self, name: &str) -> Result<()> {
        self.execute(self.request(Method::DELETE, &format!("/snapshot/{name}")))
            .await?;
        Ok(())
    }

    /// Follow build logs for a snapshot; the stream ends when the build
    /// finishes.
    pub async fn stream_snapshot_logs(&self, name: &str) -> Result<LogChunkStream> {
        let resp = self
            .execute(
                self.request(Method::GET, &format!("/snapshot/{name}/logs"))
                    .query(&[("follow", "true")]),
            )
            .await?;
        Ok(spawn_chunk_forwarder(resp))
    }

    /// Poll until the snapshot leaves its build states. Returns the final
    /// record, or an error when the build failed.
    pub async fn wait_snapshot_active(&self, name: &str) -> Result<SnapshotInfo> {
        loop {
            let snapshot = self.get_snapshot(name).await?;
            match snapshot.state {
                SnapshotState::Active => return Ok(snapshot),
                SnapshotState::Error => {
                    return Err(ApiError::Api {
                        status: 500,
                        message: format!("snapshot {name} failed to build"),
                    })
                }
                SnapshotState::Pending | SnapshotState::Building | SnapshotState::Unknown => {
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_serializes_in_build_order() {
        let image = Image::base("ubuntu:22.04")
            .packages(["python3", "git"])
            .run("pip install requests")
            .workdir("/home/app")
            .env("DEBIAN_FRONTEND", "noninteractive");
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["base"], "ubuntu:22.04");
        assert_eq!(json["packages"][1], "git");
        assert_eq!(json["commands"][0], "pip install requests");
        assert_eq!(json["workdir"], "/home/app");
        assert_eq!(json["env"]["DEBIAN_FRONTEND"], "noninteractive");
    }

    #[test]
    fn test_bare_image_omits_empty_sections() {
        let json = serde_json::to_value(Image::base("alpine:3.20")).unwrap();
        assert!(json.get("packages").is_none());
        assert!(json.get("commands").is_none());
        assert!(json.get("workdir").is_none());
        assert!(json.get("env").is_none());
    }
}
