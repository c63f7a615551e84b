//! Git clone and language-server operations inside a sandbox.
//!
//! The language server is a remote process; this is only the request side
//! of its start/notify/query surface.

use reqwest::Method;
use serde::Serialize;

use super::types::{CompletionList, LspSymbol};
use super::{Result, SandboxClient};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GitCloneRequest<'a> {
    url: &'a str,
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LspRequest<'a> {
    language_id: &'a str,
    path_to_project: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LspDocumentRequest<'a> {
    language_id: &'a str,
    path_to_project: &'a str,
    uri: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LspCompletionRequest<'a> {
    language_id: &'a str,
    path_to_project: &'a str,
    uri: &'a str,
    line: u64,
    character: u64,
}

impl SandboxClient {
    /// Clone a git repository into the sandbox filesystem.
    pub async fn git_clone(
        &self,
        id: &str,
        url: &str,
        path: &str,
        branch: Option<&str>,
    ) -> Result<()> {
        self.execute(
            self.request(Method::POST, &format!("/toolbox/{id}/git/clone"))
                .json(&GitCloneRequest { url, path, branch }),
        )
        .await?;
        Ok(())
    }

    /// Start a language server for a project and return a handle scoped to
    /// that sandbox, language, and project root.
    pub async fn start_lsp(
        &self,
        id: &str,
        language_id: &str,
        project_path: &str,
    ) -> Result<LspServer> {
        self.execute(
            self.request(Method::POST, &format!("/toolbox/{id}/lsp/start"))
                .json(&LspRequest {
                    language_id,
                    path_to_project: project_path,
                }),
        )
        .await?;
        Ok(LspServer {
            client: self.clone(),
            sandbox_id: id.to_string(),
            language_id: language_id.to_string(),
            project_path: project_path.to_string(),
        })
    }
}

/// Handle to a running language server inside one sandbox.
pub struct LspServer {
    client: SandboxClient,
    sandbox_id: String,
    language_id: String,
    project_path: String,
}

impl LspServer {
    fn document<'a>(&'a self, uri: &'a str) -> LspDocumentRequest<'a> {
        LspDocumentRequest {
            language_id: &self.language_id,
            path_to_project: &self.project_path,
            uri,
        }
    }

    pub async fn did_open(&self, uri: &str) -> Result<()> {
        let id = &self.sandbox_id;
        self.client
            .execute(
                self.client
                    .request(Method::POST, &format!("/toolbox/{id}/lsp/did-open"))
                    .json(&self.document(uri)),
            )
            .await?;
        Ok(())
    }

    pub async fn did_close(&self, uri: &str) -> Result<()> {
        let id = &self.sandbox_id;
        self.client
            .execute(
                self.client
                    .request(Method::POST, &format!("/toolbox/{id}/lsp/did-close"))
                    .json(&self.document(uri)),
            )
            .await?;
        Ok(())
    }

    pub async fn document_symbols(&self, uri: &str) -> Result<Vec<LspSymbol>> {
        let id = &self.sandbox_id;
        let resp = self
            .client
            .execute(
                self.client
                    .request(Method::POST, &format!("/toolbox/{id}/lsp/document-symbols"))
                    .json(&self.document(uri)),
            )
            .await?;
        Ok(resp.json().await?)
    }

    pub async fn completions(&self, uri: &str, line: u64, character: u64) -> Result<CompletionList> {
        let id = &self.sandbox_id;
        let resp = self
            .client
            .execute(
                self.client
                    .request(Method::POST, &format!("/toolbox/{id}/lsp/completions"))
                    .json(&LspCompletionRequest {
                        language_id: &self.language_id,
                        path_to_project: &self.project_path,
                        uri,
                        line,
                        character,
                    }),
            )
            .await?;
        Ok(resp.json().await?)
    }
}
