//! Volume check: get-or-create named volumes, mount them into a sandbox,
//! and write/read through the mounts. Volumes persist past the sandbox.

use anyhow::{ensure, Context, Result};
use async_trait::async_trait;

use crate::client::types::{CreateSandboxRequest, VolumeMount};
use crate::suite::{Check, CheckContext};

const NAME: &str = "volumes";

pub struct VolumesCheck;

#[async_trait]
impl Check for VolumesCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn run(&self, ctx: &CheckContext) -> Result<()> {
        let data_volume = ctx
            .api
            .get_or_create_volume("sandcheck-data")
            .await
            .context("get-or-create data volume")?;
        let cache_volume = ctx
            .api
            .get_or_create_volume("sandcheck-cache")
            .await
            .context("get-or-create cache volume")?;
        ctx.log.info(
            NAME,
            &format!("Volumes ready: {} and {}", data_volume.name, cache_volume.name),
        );

        // Second get-or-create must resolve to the same volume, not a new one.
        let again = ctx.api.get_or_create_volume("sandcheck-data").await?;
        ensure!(
            again.id == data_volume.id,
            "get-or-create returned a different volume id"
        );

        let req = CreateSandboxRequest {
            volumes: vec![
                VolumeMount {
                    volume_id: data_volume.id.clone(),
                    mount_path: "/data".to_string(),
                },
                VolumeMount {
                    volume_id: cache_volume.id.clone(),
                    mount_path: "/cache".to_string(),
                },
            ],
            ..Default::default()
        };
        let sandbox = ctx
            .api
            .create_sandbox(&req)
            .await
            .context("create sandbox with mounts")?;
        ctx.log.info(
            NAME,
            &format!("Created sandbox {} with two mounts", sandbox.id),
        );

        let outcome = exercise(ctx, &sandbox.id).await;

        if let Err(e) = ctx.api.delete_sandbox(&sandbox.id).await {
            ctx.log
                .warning(NAME, &format!("cleanup of {} failed: {e}", sandbox.id));
        }
        outcome
    }
}

async fn exercise(ctx: &CheckContext, id: &str) -> Result<()> {
    let payload = b"persisted-through-volume\n".to_vec();
    ctx.api
        .upload_file(id, "/data/marker.txt", payload.clone())
        .await
        .context("write through mount")?;

    let read_back = ctx
        .api
        .download_file(id, "/data/marker.txt")
        .await
        .context("read through mount")?;
    ensure!(
        read_back.as_ref() == payload.as_slice(),
        "volume read-back differs from write"
    );
    ctx.log.info(NAME, "Write/read through /data mount verified");

    let listing = ctx.api.list_files(id, "/cache").await.context("list /cache")?;
    ctx.log.info(
        NAME,
        &format!("/cache mount visible with {} entries", listing.len()),
    );

    Ok(())
}
