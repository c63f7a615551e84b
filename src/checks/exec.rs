//! Command execution check: one-shot code and shell runs, persistent
//! sessions, and streamed session command logs.

use anyhow::{ensure, Context, Result};
use async_trait::async_trait;
use uuid::Uuid;

use crate::client::types::CreateSandboxRequest;
use crate::suite::{Check, CheckContext};

const NAME: &str = "exec-commands";

pub struct ExecCheck;

#[async_trait]
impl Check for ExecCheck {
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
    // One-shot code execution in the sandbox's language runtime.
    let code = ctx
        .api
        .code_run(id, "print(6 * 7)")
        .await
        .context("code run")?;
    ensure!(code.exit_code == 0, "code run exited {}", code.exit_code);
    ensure!(
        code.output.trim() == "42",
        "unexpected code output: {:?}",
        code.output
    );
    ctx.log.info(NAME, "Code run returned expected output");

    // One-shot command with a remote-side timeout.
    let cmd = ctx
        .api
        .execute_command(id, "echo hello-from-shell", None, Some(30))
        .await
        .context("execute command")?;
    ensure!(cmd.exit_code == 0, "command exited {}", cmd.exit_code);
    ctx.log
        .info(NAME, &format!("Command output: {}", cmd.output.trim()));

    // Session: sequential commands share shell state.
    let session_id = format!("sandcheck-{}", Uuid::new_v4());
    ctx.api
        .create_session(id, &session_id)
        .await
        .context("create session")?;
    ctx.log.info(NAME, &format!("Created session {session_id}"));

    ctx.api
        .session_execute(id, &session_id, "export GREETING=hello", false)
        .await
        .context("session export")?;
    let echoed = ctx
        .api
        .session_execute(id, &session_id, "echo $GREETING", false)
        .await
        .context("session echo")?;
    ensure!(
        echoed.output.as_deref().map(str::trim) == Some("hello"),
        "session did not preserve shell state: {:?}",
        echoed.output
    );
    ctx.log.info(NAME, "Session preserved environment across commands");

    let session = ctx
        .api
        .get_session(id, &session_id)
        .await
        .context("get session")?;
    ensure!(
        session.commands.len() >= 2,
        "session history missing commands"
    );

    // Async dispatch plus streamed logs.
    let dispatched = ctx
        .api
        .session_execute(
            id,
            &session_id,
            "for i in 1 2 3; do echo line-$i; sleep 1; done",
            true,
        )
        .await
        .context("async session execute")?;
    ctx.log
        .info(NAME, &format!("Dispatched async command {}", dispatched.cmd_id));

    let mut stream = ctx
        .api
        .stream_session_command_logs(id, &session_id, &dispatched.cmd_id)
        .await
        .context("open log stream")?;
    let mut streamed = String::new();
    while let Some(chunk) = stream.next_chunk().await {
        ctx.log.info(NAME, &format!("log chunk: {}", chunk.trim_end()));
        streamed.push_str(&chunk);
    }
    ensure!(
        streamed.contains("line-3"),
        "streamed logs incomplete: {streamed:?}"
    );

    let full = ctx
        .api
        .session_command_logs(id, &session_id, &dispatched.cmd_id)
        .await
        .context("fetch full logs")?;
    ensure!(full.contains("line-1"), "full logs incomplete");
    ctx.log.info(NAME, "Streamed and full logs both complete");

    ctx.api
        .delete_session(id, &session_id)
        .await
        .context("delete session")?;
    ctx.log.info(NAME, "Session deleted");

    Ok(())
}
