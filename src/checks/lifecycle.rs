//! Sandbox lifecycle check: create, inspect, label, stop/start, lifecycle
//! policies, delete.

use anyhow::{ensure, Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;

use crate::client::types::{CreateSandboxRequest, SandboxState};
use crate::suite::{Check, CheckContext};

const NAME: &str = "sandbox-lifecycle";

pub struct LifecycleCheck;

#[async_trait]
impl Check for LifecycleCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn run(&self, ctx: &CheckContext) -> Result<()> {
        let req = CreateSandboxRequest {
            language: Some("python".to_string()),
            labels: HashMap::from([("purpose".to_string(), "sandcheck".to_string())]),
            auto_delete_interval: Some(60),
            auto_archive_interval: Some(30),
            ..Default::default()
        };
        let sandbox = ctx
            .api
            .create_sandbox(&req)
            .await
            .context("failed to create sandbox")?;
        ctx.log
            .info(NAME, &format!("Created sandbox {}", sandbox.id));

        let outcome = exercise(ctx, &sandbox.id).await;

        match ctx.api.delete_sandbox(&sandbox.id).await {
            Ok(()) => ctx
                .log
                .info(NAME, &format!("Deleted sandbox {}", sandbox.id)),
            Err(e) => ctx
                .log
                .warning(NAME, &format!("cleanup of {} failed: {e}", sandbox.id)),
        }
        outcome
    }
}

async fn exercise(ctx: &CheckContext, id: &str) -> Result<()> {
    let fetched = ctx.api.get_sandbox(id).await.context("get sandbox")?;
    ensure!(fetched.id == id, "get returned a different sandbox");
    ctx.log
        .info(NAME, &format!("Sandbox state: {:?}", fetched.state));

    let listed = ctx.api.list_sandboxes().await.context("list sandboxes")?;
    ensure!(
        listed.iter().any(|s| s.id == id),
        "new sandbox missing from list"
    );
    ctx.log
        .info(NAME, &format!("Listed {} sandboxes", listed.len()));

    let labels = HashMap::from([
        ("purpose".to_string(), "sandcheck".to_string()),
        ("phase".to_string(), "relabeled".to_string()),
    ]);
    let updated = ctx
        .api
        .set_labels(id, &labels)
        .await
        .context("set labels")?;
    ensure!(
        updated.labels.get("phase").map(String::as_str) == Some("relabeled"),
        "label update not reflected"
    );
    ctx.log.info(NAME, "Labels updated");

    ctx.api.stop_sandbox(id).await.context("stop sandbox")?;
    ctx.log.info(NAME, "Sandbox stopped");

    ctx.api.start_sandbox(id).await.context("start sandbox")?;
    let restarted = ctx.api.get_sandbox(id).await?;
    ensure!(
        restarted.state == SandboxState::Started,
        "sandbox did not report started after restart (state {:?})",
        restarted.state
    );
    ctx.log.info(NAME, "Sandbox started again");

    ctx.api
        .set_auto_delete_interval(id, 120)
        .await
        .context("set auto-delete interval")?;
    ctx.api
        .set_auto_archive_interval(id, 45)
        .await
        .context("set auto-archive interval")?;
    let policed = ctx.api.get_sandbox(id).await?;
    ctx.log.info(
        NAME,
        &format!(
            "Lifecycle policy: auto-delete {:?}m, auto-archive {:?}m",
            policed.auto_delete_interval, policed.auto_archive_interval
        ),
    );

    Ok(())
}
