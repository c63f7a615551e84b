//! Snapshot check: build a declarative image into a snapshot, follow the
//! build logs, then provision a sandbox from the result.

use anyhow::{ensure, Context, Result};
use async_trait::async_trait;
use uuid::Uuid;

use crate::client::types::{CreateSandboxRequest, Resources};
use crate::client::Image;
use crate::suite::{Check, CheckContext};

const NAME: &str = "snapshots";

pub struct SnapshotsCheck;

#[async_trait]
impl Check for SnapshotsCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn run(&self, ctx: &CheckContext) -> Result<()> {
        let snapshot_name = format!("sandcheck-{}", Uuid::new_v4());

        let image = Image::base("ubuntu:22.04")
            .packages(["python3", "curl"])
            .run("python3 -c 'print(\"image build probe\")'")
            .workdir("/home/app")
            .env("SANDCHECK_BUILT", "1");

        let resources = Resources {
            cpu: Some(1),
            memory: Some(1),
            disk: Some(3),
        };
        let snapshot = ctx
            .api
            .create_snapshot(&snapshot_name, &image, Some(&resources))
            .await
            .context("create snapshot")?;
        ctx.log
            .info(NAME, &format!("Snapshot {} submitted", snapshot.name));

        // Follow the remote build; the stream ends when the build finishes.
        let mut logs = ctx
            .api
            .stream_snapshot_logs(&snapshot_name)
            .await
            .context("open build log stream")?;
        while let Some(chunk) = logs.next_chunk().await {
            ctx.log
                .info(NAME, &format!("build: {}", chunk.trim_end()));
        }

        let built = ctx
            .api
            .wait_snapshot_active(&snapshot_name)
            .await
            .context("wait for snapshot build")?;
        ctx.log
            .info(NAME, &format!("Snapshot {} active", built.name));

        let outcome = provision_from_snapshot(ctx, &snapshot_name).await;

        if let Err(e) = ctx.api.delete_snapshot(&snapshot_name).await {
            ctx.log
                .warning(NAME, &format!("snapshot cleanup failed: {e}"));
        }
        outcome
    }
}

async fn provision_from_snapshot(ctx: &CheckContext, snapshot_name: &str) -> Result<()> {
    let req = CreateSandboxRequest {
        snapshot: Some(snapshot_name.to_string()),
        ..Default::default()
    };
    let sandbox = ctx
        .api
        .create_sandbox(&req)
        .await
        .context("create sandbox from snapshot")?;
    ctx.log.info(
        NAME,
        &format!("Sandbox {} provisioned from snapshot", sandbox.id),
    );

    let outcome = async {
        // The baked-in environment variable proves the image was applied.
        let probe = ctx
            .api
            .execute_command(&sandbox.id, "echo $SANDCHECK_BUILT", None, Some(30))
            .await
            .context("probe baked environment")?;
        ensure!(
            probe.output.trim() == "1",
            "snapshot environment missing: {:?}",
            probe.output
        );
        ctx.log.info(NAME, "Snapshot environment verified");
        Ok(())
    }
    .await;

    if let Err(e) = ctx.api.delete_sandbox(&sandbox.id).await {
        ctx.log
            .warning(NAME, &format!("cleanup of {} failed: {e}", sandbox.id));
    }
    outcome
}
