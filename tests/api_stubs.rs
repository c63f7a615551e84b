//! SandboxClient tests against a local stub server -- request shapes, auth
//! header, error mapping, and chunked log streaming.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sandcheck::client::types::{CreateSandboxRequest, SandboxState};
use sandcheck::client::{Image, SandboxClient};
use sandcheck::config::Settings;

fn client_for(server: &MockServer) -> SandboxClient {
    let settings = Settings {
        api_key: "test-key".to_string(),
        base_url: server.uri(),
        target: Some("eu".to_string()),
    };
    SandboxClient::new(&settings).expect("client construction is local")
}

#[tokio::test]
async fn test_create_sandbox_sends_auth_and_target() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sandbox"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("X-Sandbox-Target", "eu"))
        .and(body_partial_json(json!({ "language": "python" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "sb-1",
            "state": "started",
            "labels": { "purpose": "sandcheck" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server);
    let req = CreateSandboxRequest {
        language: Some("python".to_string()),
        ..Default::default()
    };
    let sandbox = api.create_sandbox(&req).await.unwrap();
    assert_eq!(sandbox.id, "sb-1");
    assert_eq!(sandbox.state, SandboxState::Started);
    assert_eq!(
        sandbox.labels.get("purpose").map(String::as_str),
        Some("sandcheck")
    );
}

#[tokio::test]
async fn test_api_error_carries_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sandbox/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "sandbox not found" })),
        )
        .mount(&server)
        .await;

    let api = client_for(&server);
    let err = api.get_sandbox("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("sandbox not found"));
}

#[tokio::test]
async fn test_plain_text_error_body_still_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sandbox/sb-1/start"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .mount(&server)
        .await;

    let api = client_for(&server);
    let err = api.start_sandbox("sb-1").await.unwrap_err();
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("internal failure"));
}

#[tokio::test]
async fn test_get_or_create_volume_falls_back_to_create() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/volume/scratch"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "no volume" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/volume"))
        .and(body_partial_json(json!({ "name": "scratch" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "vol-9", "name": "scratch" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server);
    let volume = api.get_or_create_volume("scratch").await.unwrap();
    assert_eq!(volume.id, "vol-9");
}

#[tokio::test]
async fn test_execute_command_sends_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/toolbox/sb-1/process/execute"))
        .and(body_partial_json(json!({ "command": "echo hi", "timeout": 30 })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "exitCode": 0, "output": "hi\n" })),
        )
        .mount(&server)
        .await;

    let api = client_for(&server);
    let result = api
        .execute_command("sb-1", "echo hi", None, Some(30))
        .await
        .unwrap();
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.output, "hi\n");
}

#[tokio::test]
async fn test_session_log_stream_delivers_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/toolbox/sb-1/process/session/s-1/command/c-1/logs"))
        .and(query_param("follow", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string("line-1\nline-2\nline-3\n"))
        .mount(&server)
        .await;

    let api = client_for(&server);
    let stream = api
        .stream_session_command_logs("sb-1", "s-1", "c-1")
        .await
        .unwrap();
    let collected = stream.collect_all().await;
    assert!(collected.contains("line-1"));
    assert!(collected.contains("line-3"));
}

#[tokio::test]
async fn test_upload_and_download_round_trip_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/toolbox/sb-1/files/upload"))
        .and(query_param("path", "/tmp/a.txt"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/toolbox/sb-1/files/download"))
        .and(query_param("path", "/tmp/a.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"payload".to_vec()))
        .mount(&server)
        .await;

    let api = client_for(&server);
    api.upload_file("sb-1", "/tmp/a.txt", b"payload".to_vec())
        .await
        .unwrap();
    let bytes = api.download_file("sb-1", "/tmp/a.txt").await.unwrap();
    assert_eq!(bytes.as_ref(), b"payload");
}

#[tokio::test]
async fn test_create_snapshot_serializes_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/snapshot"))
        .and(body_partial_json(json!({
            "name": "snap-1",
            "image": {
                "base": "ubuntu:22.04",
                "packages": ["python3"],
                "commands": ["pip install requests"]
            }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "snap-1", "state": "pending" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/snapshot/snap-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "snap-1", "state": "active" })),
        )
        .mount(&server)
        .await;

    let api = client_for(&server);
    let image = Image::base("ubuntu:22.04")
        .packages(["python3"])
        .run("pip install requests");
    let snapshot = api.create_snapshot("snap-1", &image, None).await.unwrap();
    assert_eq!(snapshot.name, "snap-1");

    let built = api.wait_snapshot_active("snap-1").await.unwrap();
    assert_eq!(
        built.state,
        sandcheck::client::types::SnapshotState::Active
    );
}

#[tokio::test]
async fn test_lsp_flow_against_stub() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/toolbox/sb-1/lsp/start"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/toolbox/sb-1/lsp/did-open"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/toolbox/sb-1/lsp/document-symbols"))
        .and(body_partial_json(json!({
            "languageId": "python",
            "pathToProject": "/proj",
            "uri": "main.py"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "main", "kind": "function" }
        ])))
        .mount(&server)
        .await;

    let api = client_for(&server);
    let lsp = api.start_lsp("sb-1", "python", "/proj").await.unwrap();
    lsp.did_open("main.py").await.unwrap();
    let symbols = lsp.document_symbols("main.py").await.unwrap();
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].name, "main");
}
