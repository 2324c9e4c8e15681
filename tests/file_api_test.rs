use serde_json::json;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use trackor_bridge::{BasicAuth, FileBlob, TrackorClient, UploadBody};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a client pointed at the mock backend
fn create_test_client(server: &MockServer) -> TrackorClient {
    TrackorClient::new(server.uri(), BasicAuth::new("admin", "admin"))
        .expect("Failed to create client")
        .with_file_timeouts(Duration::from_millis(200), Duration::from_millis(200))
}

fn sample_blob() -> FileBlob {
    FileBlob::new(b"%PDF-1.4 minutes".to_vec(), "minutes.pdf")
}

/// Test downloading a file returns headers and the full body
#[tokio::test]
async fn test_get_file() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/trackor/1001/file/OSPD_REPORT"))
        .and(header("authorization", "Basic YWRtaW46YWRtaW4="))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; filename=\"report.pdf\"")
                .set_body_bytes(b"binary-report".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let download = client.files().get_file(1001, "OSPD_REPORT").await
        .expect("File should be returned");

    assert_eq!(
        download.headers.get("content-disposition").unwrap(),
        "attachment; filename=\"report.pdf\""
    );
    let bytes = download.bytes().await.expect("Failed to read body");
    assert_eq!(&bytes[..], b"binary-report");
}

/// Test a missing file is None rather than an error
#[tokio::test]
async fn test_get_file_not_found() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/trackor/1001/file/OSPD_REPORT"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    assert!(client.files().get_file(1001, "OSPD_REPORT").await.is_none());
}

/// Test other failing statuses are also None
#[tokio::test]
async fn test_get_file_server_error() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/trackor/1001/file/OSPD_REPORT"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    assert!(client.files().get_file(1001, "OSPD_REPORT").await.is_none());
}

/// Test a download that outlives the timeout is None
#[tokio::test]
async fn test_get_file_timeout() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/trackor/1001/file/OSPD_REPORT"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"late".to_vec())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    assert!(client.files().get_file(1001, "OSPD_REPORT").await.is_none());
}

/// Test a body cut short after the headers is None, not a late error
#[tokio::test]
async fn test_get_file_truncated_body() {
    let _ = env_logger::try_init();

    // Promises 100 bytes, sends 5, then hangs up
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await;
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nshort")
            .await
            .unwrap();
        socket.shutdown().await.ok();
    });

    let client = TrackorClient::new(format!("http://{}", addr), BasicAuth::new("admin", "admin")).unwrap();
    assert!(client.files().get_file(1001, "OSPD_REPORT").await.is_none());
}

/// Test a download from an unreachable backend is None
#[tokio::test]
async fn test_get_file_unreachable() {
    let _ = env_logger::try_init();

    // Nothing listens on port 1
    let client = TrackorClient::new("http://127.0.0.1:1", BasicAuth::new("admin", "admin")).unwrap();
    assert!(client.files().get_file(1, "OSPD_REPORT").await.is_none());
}

/// Test uploading sends a multipart form with a single "file" part
#[tokio::test]
async fn test_post_file() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/trackor/1001/file/OSPD_REPORT"))
        .and(query_param("file_name", "minutes.pdf"))
        .and(header("content-encoding", "utf-8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"blob_data_id": 4242})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let upload = client.files().post_file(1001, "OSPD_REPORT", sample_blob()).await
        .expect("Upload should succeed");

    assert_eq!(upload.body, UploadBody::Json(json!({"blob_data_id": 4242})));

    let requests = server.received_requests().await.expect("Request recording disabled");
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .expect("Upload must carry a content type");
    assert!(
        content_type.starts_with("multipart/form-data; boundary="),
        "Unexpected content type: {}",
        content_type
    );

    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"minutes.pdf\""));
    assert!(body.contains("Content-Type: application/pdf"));
    assert!(body.contains("%PDF-1.4 minutes"));
}

/// Test a plain-text 200 body is returned as text
#[tokio::test]
async fn test_post_file_text_response() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/trackor/1001/file/OSPD_NOTES"))
        .respond_with(ResponseTemplate::new(200).set_body_string("stored"))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let blob = FileBlob::new(b"notes".to_vec(), "notes.txt").with_mime_type("text/plain");
    let upload = client.files().post_file(1001, "OSPD_NOTES", blob).await
        .expect("Upload should succeed");

    assert_eq!(upload.body, UploadBody::Text("stored".to_string()));
}

/// Test only an exact 200 counts as a successful upload
#[tokio::test]
async fn test_post_file_created_is_failure() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/trackor/1001/file/OSPD_REPORT"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"blob_data_id": 1})))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    assert!(client.files().post_file(1001, "OSPD_REPORT", sample_blob()).await.is_none());
}

/// Test upload to an unknown trackor/field is None
#[tokio::test]
async fn test_post_file_not_found() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/trackor/404/file/OSPD_REPORT"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Trackor not found"))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    assert!(client.files().post_file(404, "OSPD_REPORT", sample_blob()).await.is_none());
}

/// Test an upload that outlives the timeout is None
#[tokio::test]
async fn test_post_file_timeout() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/trackor/1001/file/OSPD_REPORT"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    assert!(client.files().post_file(1001, "OSPD_REPORT", sample_blob()).await.is_none());
}

/// Test an invalid MIME type is None rather than an error
#[tokio::test]
async fn test_post_file_invalid_mime() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    let client = create_test_client(&server);
    let blob = sample_blob().with_mime_type("not a mime type");
    assert!(client.files().post_file(1001, "OSPD_REPORT", blob).await.is_none());
}
