//! File operations check: folders, single and batch uploads, download,
//! glob search, text find, and replace-in-files.

use anyhow::{ensure, Context, Result};
use async_trait::async_trait;

use crate::client::fs::FileUpload;
use crate::client::types::CreateSandboxRequest;
use crate::suite::{Check, CheckContext};

const NAME: &str = "file-operations";
const WORK_DIR: &str = "/home/user/sandcheck";

pub struct FileOpsCheck;

#[async_trait]
impl Check for FileOpsCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn run(&self, ctx: &CheckContext) -> Result<()> {
        let sandbox = ctx
            .api
            .create_sandbox(&CreateSandboxRequest::default())
            .await
            .context("failed to create sandbox")?;
        ctx.log
            .info(NAME, &format!("Created sandbox {}", sandbox.id));

        let outcome = exercise(ctx, &sandbox.id).await;

        if let Err(e) = ctx.api.delete_sandbox(&sandbox.id).await {
            ctx.log
                .warning(NAME, &format!("cleanup of {} failed: {e}", sandbox.id));
        }
        outcome
    }
}

async fn exercise(ctx: &CheckContext, id: &str) -> Result<()> {
    ctx.api
        .create_folder(id, WORK_DIR)
        .await
        .context("create folder")?;
    ctx.log.info(NAME, &format!("Created {WORK_DIR}"));

    let note = b"sandcheck was here\n".to_vec();
    ctx.api
        .upload_file(id, &format!("{WORK_DIR}/note.txt"), note.clone())
        .await
        .context("single upload")?;

    let batch = vec![
        FileUpload {
            destination: format!("{WORK_DIR}/config.toml"),
            data: b"retries = 3\n".to_vec(),
        },
        FileUpload {
            destination: format!("{WORK_DIR}/script.py"),
            data: b"print('placeholder')\n".to_vec(),
        },
    ];
    ctx.api
        .upload_files(id, batch)
        .await
        .context("batch upload")?;
    ctx.log.info(NAME, "Uploaded one file plus a batch of two");

    let listing = ctx.api.list_files(id, WORK_DIR).await.context("list")?;
    ensure!(listing.len() >= 3, "expected 3 files, saw {}", listing.len());
    ctx.log
        .info(NAME, &format!("Listing shows {} entries", listing.len()));

    let downloaded = ctx
        .api
        .download_file(id, &format!("{WORK_DIR}/note.txt"))
        .await
        .context("download")?;
    ensure!(
        downloaded.as_ref() == note.as_slice(),
        "downloaded bytes differ from upload"
    );
    ctx.log.info(NAME, "Download round-trip matches");

    let hits = ctx
        .api
        .search_files(id, WORK_DIR, "*.py")
        .await
        .context("glob search")?;
    ensure!(
        hits.iter().any(|p| p.ends_with("script.py")),
        "glob search missed script.py"
    );

    let matches = ctx
        .api
        .find_in_files(id, WORK_DIR, "placeholder")
        .await
        .context("find in files")?;
    ensure!(!matches.is_empty(), "text find returned no matches");
    ctx.log.info(
        NAME,
        &format!("Found {} text match(es) for 'placeholder'", matches.len()),
    );

    let targets = vec![format!("{WORK_DIR}/script.py")];
    let replaced = ctx
        .api
        .replace_in_files(id, &targets, "placeholder", "replaced")
        .await
        .context("replace in files")?;
    ensure!(
        replaced.iter().all(|r| r.success),
        "replace reported failures"
    );

    let after = ctx
        .api
        .download_file(id, &format!("{WORK_DIR}/script.py"))
        .await?;
    ensure!(
        String::from_utf8_lossy(&after).contains("replaced"),
        "replacement not visible in file content"
    );
    ctx.log.info(NAME, "Replace-in-files verified");

    Ok(())
}
