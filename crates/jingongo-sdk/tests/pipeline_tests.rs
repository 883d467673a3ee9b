//! End-to-end tests for the conversion pipeline
//!
//! Each test runs the SDK against a wiremock server standing in for both the
//! Jingongo API and the signed-URL storage endpoints.

use jingongo::{Client, ClientConfig, ConversionOptions, JingongoError, PollConfig, VariableSpec};
use serde_json::{json, Value};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

/// Mount a whoami endpoint that accepts any key
async fn mount_whoami(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user_id": "user-1"})))
        .mount(server)
        .await;
}

async fn connect(server: &MockServer) -> Client {
    mount_whoami(server).await;
    Client::connect(ClientConfig::new(server.uri(), "secret-key"))
        .await
        .expect("client should connect")
}

/// Create a small model project, optionally with a `.jingongo.yml`
fn create_project(config: Option<&str>) -> TempDir {
    let dir = TempDir::new().expect("Failed to create project dir");
    fs::write(dir.path().join("model.py"), "def step(u):\n    return u\n").unwrap();
    fs::create_dir(dir.path().join("resources")).unwrap();
    fs::write(dir.path().join("resources").join("table.csv"), "t,u\n0,1\n").unwrap();
    if let Some(config) = config {
        fs::write(dir.path().join(".jingongo.yml"), config).unwrap();
    }
    dir
}

async fn requests_to(server: &MockServer, http_method: &str, url_path: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == http_method && r.url.path() == url_path)
        .collect()
}

async fn mount_upload(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/models/upload-init"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "upload_url": format!("{}/bucket/archive.zip", server.uri()),
            "upload_id": "upload-9"
        })))
        .mount(server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/bucket/archive.zip"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

fn status_body(status: &str) -> Value {
    json!({"job_id": "job-5", "status": status})
}

// ============================================================================
// Construction
// ============================================================================

#[tokio::test]
async fn test_missing_api_key_fails_before_any_request() {
    let server = MockServer::start().await;
    mount_whoami(&server).await;

    let err = Client::connect(ClientConfig::new(server.uri(), ""))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_api_key_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "bad key"})))
        .mount(&server)
        .await;

    let err = Client::connect(ClientConfig::new(server.uri(), "revoked"))
        .await
        .unwrap_err();

    assert!(err.is_authentication());
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_whoami_without_user_id_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "a@b.c"})))
        .mount(&server)
        .await;

    let err = Client::connect(ClientConfig::new(server.uri(), "k"))
        .await
        .unwrap_err();

    assert!(matches!(err, JingongoError::Api { .. }));
    assert!(err.to_string().contains("did not return a user ID"));
}

// ============================================================================
// Submission
// ============================================================================

#[tokio::test]
async fn test_submit_conversion_full_pipeline() {
    let server = MockServer::start().await;
    let client = connect(&server).await;
    mount_upload(&server).await;
    Mock::given(method("POST"))
        .and(path("/models/convert-fmu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job_id": "job-5"})))
        .mount(&server)
        .await;

    let project = create_project(Some(
        r#"
model:
  model_name: FileModel
  version: 0.1.0
  description: From the project file
  inputs:
    - name: u
  parameters:
    - name: gain
      default: 1.5
"#,
    ));
    let options = ConversionOptions::new()
        .version("2.0.0")
        .outputs(vec![VariableSpec::typed("y", "Integer")]);

    let job = client
        .submit_conversion(project.path(), &options)
        .await
        .unwrap();
    assert_eq!(job.job_id, "job-5");
    assert_eq!(job.model_name, "FileModel");

    // Storage sees the archive but never the API key
    let puts = requests_to(&server, "PUT", "/bucket/archive.zip").await;
    assert_eq!(puts.len(), 1);
    let put = &puts[0];
    assert!(put.headers.get("x-api-key").is_none());
    assert_eq!(
        put.headers.get("content-type").unwrap().to_str().unwrap(),
        "application/zip"
    );
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(put.body.clone())).unwrap();
    let mut model = String::new();
    archive
        .by_name("model.py")
        .unwrap()
        .read_to_string(&mut model)
        .unwrap();
    assert!(model.contains("def step"));
    assert!(archive.by_name("resources/table.csv").is_ok());

    // API calls carry the key
    let inits = requests_to(&server, "POST", "/models/upload-init").await;
    assert_eq!(
        inits[0].headers.get("x-api-key").unwrap().to_str().unwrap(),
        "secret-key"
    );
    let init: Value = serde_json::from_slice(&inits[0].body).unwrap();
    assert_eq!(init["model_name"], "FileModel");
    assert_eq!(init["version"], "2.0.0");
    assert_eq!(init["file_size_bytes"].as_u64().unwrap(), put.body.len() as u64);

    let converts = requests_to(&server, "POST", "/models/convert-fmu").await;
    let body: Value = serde_json::from_slice(&converts[0].body).unwrap();
    assert_eq!(body["model_name"], "FileModel");
    assert_eq!(body["version"], "2.0.0");
    assert_eq!(body["description"], "From the project file");
    assert_eq!(body["language"], "python");
    assert_eq!(body["component_type"], "unknown");
    assert_eq!(body["fmi_type"], "CoSimulation");
    assert_eq!(body["input_variables"], json!({"u": "Real"}));
    assert_eq!(body["output_variables"], json!({"y": "Integer"}));
    assert_eq!(body["parameters"], json!({"gain": 1.5}));
    assert_eq!(body["upload_id"], "upload-9");
}

#[tokio::test]
async fn test_submit_without_job_id_is_api_error() {
    let server = MockServer::start().await;
    let client = connect(&server).await;
    mount_upload(&server).await;
    Mock::given(method("POST"))
        .and(path("/models/convert-fmu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "queued"})))
        .mount(&server)
        .await;

    let project = create_project(None);
    let err = client
        .submit_conversion(project.path(), &ConversionOptions::new())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("did not return a job ID"));
}

#[tokio::test]
async fn test_submit_missing_directory_makes_no_requests() {
    let server = MockServer::start().await;
    let client = connect(&server).await;
    let missing = TempDir::new().unwrap().path().join("nope");

    let err = client
        .submit_conversion(&missing, &ConversionOptions::new())
        .await
        .unwrap_err();

    assert!(err.is_validation());
    // Only the whoami call from connect
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_project_config_is_validation_error() {
    let server = MockServer::start().await;
    let client = connect(&server).await;
    let project = create_project(Some("model: [unclosed"));

    let err = client
        .submit_conversion(project.path(), &ConversionOptions::new())
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(requests_to(&server, "POST", "/models/upload-init")
        .await
        .is_empty());
}

// ============================================================================
// Polling
// ============================================================================

#[tokio::test]
async fn test_await_completion_polls_until_completed() {
    let server = MockServer::start().await;
    let client = connect(&server).await;
    Mock::given(method("GET"))
        .and(path("/models/conversion-status/job-5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body("PENDING")))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/models/conversion-status/job-5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body("COMPLETED")))
        .mount(&server)
        .await;

    let poll = PollConfig::default().with_interval(Duration::from_millis(10));
    let record = client.await_completion("job-5", &poll).await.unwrap();

    assert!(record.is_completed());
    assert_eq!(
        requests_to(&server, "GET", "/models/conversion-status/job-5")
            .await
            .len(),
        3
    );
}

#[tokio::test]
async fn test_convert_reports_failed_job() {
    let server = MockServer::start().await;
    let client = connect(&server).await;
    mount_upload(&server).await;
    Mock::given(method("POST"))
        .and(path("/models/convert-fmu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job_id": "job-5"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/models/conversion-status/job-5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "FAILED",
            "error_message": "bad syntax"
        })))
        .mount(&server)
        .await;

    let project = create_project(None);
    let poll = PollConfig::default().with_interval(Duration::from_millis(10));
    let err = client
        .convert(project.path(), &ConversionOptions::new(), &poll)
        .await
        .unwrap_err();

    assert!(matches!(err, JingongoError::Conversion(_)));
    assert!(err.to_string().contains("bad syntax"));
}

#[tokio::test]
async fn test_polling_bound_stops_waiting() {
    let server = MockServer::start().await;
    let client = connect(&server).await;
    Mock::given(method("GET"))
        .and(path("/models/conversion-status/job-5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body("RUNNING")))
        .mount(&server)
        .await;

    let poll = PollConfig::default()
        .with_interval(Duration::from_millis(5))
        .with_max_attempts(4);
    let err = client.await_completion("job-5", &poll).await.unwrap_err();

    assert!(matches!(
        err,
        JingongoError::PollingTimedOut { attempts: 4, .. }
    ));
}

// ============================================================================
// Download
// ============================================================================

#[tokio::test]
async fn test_download_creates_nested_destination() {
    let server = MockServer::start().await;
    let client = connect(&server).await;
    Mock::given(method("GET"))
        .and(path("/models/download/job-5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "download_url": format!("{}/bucket/IdentityBlock.fmu", server.uri()),
            "fmu_filename": "IdentityBlock.fmu"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bucket/IdentityBlock.fmu"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04fmu".to_vec()))
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let destination = root.path().join("a").join("b").join("c");
    let saved = client.download_fmu("job-5", &destination).await.unwrap();

    assert_eq!(saved, destination.join("IdentityBlock.fmu"));
    assert_eq!(fs::read(&saved).unwrap(), b"PK\x03\x04fmu");

    // Storage never sees the API key
    let gets = requests_to(&server, "GET", "/bucket/IdentityBlock.fmu").await;
    assert!(gets[0].headers.get("x-api-key").is_none());
}

/// Serve one response that promises more bytes than it sends, then hang up
async fn truncated_storage() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let head = "HTTP/1.1 200 OK\r\n\
                    Content-Type: application/octet-stream\r\n\
                    Content-Length: 1000\r\n\r\n";
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(&[0xAB; 100]).await.unwrap();
        socket.flush().await.unwrap();
        drop(socket);
    });

    format!("http://{}/model.fmu", addr)
}

#[tokio::test]
async fn test_interrupted_download_leaves_no_file() {
    let server = MockServer::start().await;
    let client = connect(&server).await;
    let storage_url = truncated_storage().await;
    Mock::given(method("GET"))
        .and(path("/models/download/job-5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "download_url": storage_url,
            "fmu_filename": "model.fmu"
        })))
        .mount(&server)
        .await;

    let destination = TempDir::new().unwrap();
    let err = client
        .download_fmu("job-5", destination.path())
        .await
        .unwrap_err();

    assert!(matches!(err, JingongoError::Api { .. }));
    assert!(err.to_string().contains("model.fmu"));
    assert_no_entries(destination.path());
}

/// Serve a 2000-byte body in small pieces spread over about two seconds
async fn slow_storage() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let head = "HTTP/1.1 200 OK\r\n\
                    Content-Type: application/octet-stream\r\n\
                    Content-Length: 2000\r\n\r\n";
        socket.write_all(head.as_bytes()).await.unwrap();
        for _ in 0..20 {
            socket.write_all(&[0xCD; 100]).await.unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    });

    format!("http://{}/slow.fmu", addr)
}

#[tokio::test]
async fn test_slow_download_outlives_request_timeout() {
    let server = MockServer::start().await;
    mount_whoami(&server).await;
    let config = ClientConfig::new(server.uri(), "secret-key").with_timeout(Duration::from_secs(1));
    let client = Client::connect(config).await.unwrap();

    let storage_url = slow_storage().await;
    Mock::given(method("GET"))
        .and(path("/models/download/job-6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "download_url": storage_url,
            "fmu_filename": "slow.fmu"
        })))
        .mount(&server)
        .await;

    let destination = TempDir::new().unwrap();
    let saved = client
        .download_fmu("job-6", destination.path())
        .await
        .unwrap();

    assert_eq!(fs::read(&saved).unwrap(), vec![0xCD; 2000]);
    assert!(!destination.path().join("slow.fmu.part").exists());
}

fn assert_no_entries(dir: &Path) {
    let entries: Vec<_> = fs::read_dir(dir).unwrap().collect();
    assert!(entries.is_empty(), "expected empty directory, found {:?}", entries);
}
