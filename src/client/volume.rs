//! Volume management: named persistent storage mountable into sandboxes.

use reqwest::Method;
use serde::Serialize;

use super::types::VolumeInfo;
use super::{Result, SandboxClient};

#[derive(Serialize)]
struct CreateVolumeRequest<'a> {
    name: &'a str,
}

impl SandboxClient {
    pub async fn get_volume(&self, name: &str) -> Result<VolumeInfo> {
        self.get_json(&format!("/volume/{name}")).await
    }

    pub async fn create_volume(&self, name: &str) -> Result<VolumeInfo> {
        let resp = self
            .execute(
                self.request(Method::POST, "/volume")
                    .json(&CreateVolumeRequest { name }),
            )
            .await?;
        Ok(resp.json().await?)
    }

    /// Fetch the named volume, creating it when the service reports 404.
    pub async fn get_or_create_volume(&self, name: &str) -> Result<VolumeInfo> {
        match self.get_volume(name).await {
            Ok(volume) => Ok(volume),
            Err(e) if e.is_not_found() => self.create_volume(name).await,
            Err(e) => Err(e),
        }
    }

    pub async fn delete_volume(&self, id: &str) -> Result<()> {
        self.execute(self.request(Method::DELETE, &format!("/volume/{id}")))
            .await?;
        Ok(())
    }
}
