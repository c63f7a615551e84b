//! Process operations: one-shot code and command execution, sessions, and
//! session command logs (full fetch or chunked stream).

use reqwest::Method;
use serde::Serialize;

use super::types::{ExecResult, SessionExecResult, SessionInfo};
use super::{spawn_chunk_forwarder, LogChunkStream, Result, SandboxClient};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CodeRunRequest<'a> {
    code: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteRequest<'a> {
    command: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cwd: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest<'a> {
    session_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionExecuteRequest<'a> {
    command: &'a str,
    run_async: bool,
}

impl SandboxClient {
    /// One-shot code execution in the sandbox's configured language runtime.
    pub async fn code_run(&self, id: &str, code: &str) -> Result<ExecResult> {
        let resp = self
            .execute(
                self.request(Method::POST, &format!("/toolbox/{id}/process/code-run"))
                    .json(&CodeRunRequest { code }),
            )
            .await?;
        Ok(resp.json().await?)
    }

    /// One-shot shell command; `timeout_secs` is enforced remotely.
    pub async fn execute_command(
        &self,
        id: &str,
        command: &str,
        cwd: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Result<ExecResult> {
        let resp = self
            .execute(
                self.request(Method::POST, &format!("/toolbox/{id}/process/execute"))
                    .json(&ExecuteRequest {
                        command,
                        cwd,
                        timeout: timeout_secs,
                    }),
            )
            .await?;
        Ok(resp.json().await?)
    }

    /// Open a persistent command-execution session. Commands in one session
    /// share shell state (cwd, environment variables).
    pub async fn create_session(&self, id: &str, session_id: &str) -> Result<()> {
        self.execute(
            self.request(Method::POST, &format!("/toolbox/{id}/process/session"))
                .json(&CreateSessionRequest { session_id }),
        )
        .await?;
        Ok(())
    }

    pub async fn get_session(&self, id: &str, session_id: &str) -> Result<SessionInfo> {
        self.get_json(&format!("/toolbox/{id}/process/session/{session_id}"))
            .await
    }

    pub async fn delete_session(&self, id: &str, session_id: &str) -> Result<()> {
        self.execute(self.request(
            Method::DELETE,
            &format!("/toolbox/{id}/process/session/{session_id}"),
        ))
        .await?;
        Ok(())
    }

    /// Execute a command inside a session. With `run_async` the call returns
    /// immediately with only a command id; fetch logs separately.
    pub async fn session_execute(
        &self,
        id: &str,
        session_id: &str,
        command: &str,
        run_async: bool,
    ) -> Result<SessionExecResult> {
        let resp = self
            .execute(
                self.request(
                    Method::POST,
                    &format!("/toolbox/{id}/process/session/{session_id}/exec"),
                )
                .json(&SessionExecuteRequest { command, run_async }),
            )
            .await?;
        Ok(resp.json().await?)
    }

    /// Full log text of a session command, after it has completed.
    pub async fn session_command_logs(
        &self,
        id: &str,
        session_id: &str,
        command_id: &str,
    ) -> Result<String> {
        let resp = self
            .execute(self.request(
                Method::GET,
                &format!("/toolbox/{id}/process/session/{session_id}/command/{command_id}/logs"),
            ))
            .await?;
        Ok(resp.text().await?)
    }

    /// Follow a session command's logs as they are produced. The stream ends
    /// when the remote command completes or when stopped by the caller.
    pub async fn stream_session_command_logs(
        &self,
        id: &str,
        session_id: &str,
        command_id: &str,
    ) -> Result<LogChunkStream> {
        let resp = self
            .execute(
                self.request(
                    Method::GET,
                    &format!(
                        "/toolbox/{id}/process/session/{session_id}/command/{command_id}/logs"
                    ),
                )
                .query(&[("follow", "true")]),
            )
            .await?;
        Ok(spawn_chunk_forwarder(resp))
    }
}
