//! Language-server check: clone a repository, start an LSP inside the
//! sandbox, and run symbol and completion queries against it.

use anyhow::{ensure, Context, Result};
use async_trait::async_trait;

use crate::client::types::CreateSandboxRequest;
use crate::suite::{Check, CheckContext};

const NAME: &str = "lsp";
const REPO_URL: &str = "https://github.com/pallets/click.git";
const PROJECT_DIR: &str = "/home/user/project";
const SAMPLE_FILE: &str = "src/click/decorators.py";

pub struct LspCheck;

#[async_trait]
impl Check for LspCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn run(&self, ctx: &CheckContext) -> Result<()> {
        let req = CreateSandboxRequest {
            language: Some("python".to_string()),
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

        if let Err(e) = ctx.api.delete_sandbox(&sandbox.id).await {
            ctx.log
                .warning(NAME, &format!("cleanup of {} failed: {e}", sandbox.id));
        }
        outcome
    }
}

async fn exercise(ctx: &CheckContext, id: &str) -> Result<()> {
    ctx.api
        .git_clone(id, REPO_URL, PROJECT_DIR, Some("main"))
        .await
        .context("git clone")?;
    ctx.log.info(NAME, &format!("Cloned {REPO_URL}"));

    let lsp = ctx
        .api
        .start_lsp(id, "python", PROJECT_DIR)
        .await
        .context("start language server")?;
    ctx.log.info(NAME, "Language server started");

    lsp.did_open(SAMPLE_FILE).await.context("did-open")?;

    let symbols = lsp
        .document_symbols(SAMPLE_FILE)
        .await
        .context("document symbols")?;
    ensure!(!symbols.is_empty(), "no symbols reported for {SAMPLE_FILE}");
    ctx.log.info(
        NAME,
        &format!(
            "{} symbols, first: {} ({})",
            symbols.len(),
            symbols[0].name,
            symbols[0].kind
        ),
    );

    let completions = lsp
        .completions(SAMPLE_FILE, 10, 4)
        .await
        .context("completions")?;
    ctx.log.info(
        NAME,
        &format!("{} completion item(s) offered", completions.items.len()),
    );

    lsp.did_close(SAMPLE_FILE).await.context("did-close")?;
    ctx.log.info(NAME, "Document closed");

    Ok(())
}
