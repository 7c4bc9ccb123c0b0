use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use trip::net::{ReqwestTransport, Transport};
use trip::{Command, TransportConfig, BAD_RESPONSE, PARSE_FAILURE};

#[derive(Debug, Default, Deserialize)]
struct Trip {
    #[serde(rename = "Name")]
    name: String,
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn transport() -> Arc<dyn Transport> {
    Arc::new(ReqwestTransport::new().unwrap())
}

/// Serves exactly one connection with a canned response and returns the base URL.
async fn serve_once(status_line: &'static str, extra_headers: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // Read the request head; none of the tests send a body.
        let mut buf = vec![0u8; 8192];
        let mut read = 0;
        while read < buf.len() {
            let n = socket.read(&mut buf[read..]).await.unwrap();
            if n == 0 {
                break;
            }
            read += n;
            if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n{extra_headers}\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
    });

    format!("http://{addr}/")
}

/// Returns a URL nobody listens on.
async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

#[tokio::test]
async fn output_decodes_json_body() {
    init_logging();
    let url = serve_once("200 OK", "", "{\"Name\":\"trip\"}\n").await;
    let mut cmd = Command::get(&url).unwrap().with_transport(transport());
    let mut model = Trip::default();

    let status = cmd.output(&mut model).await.unwrap();

    assert_eq!(status, 200);
    assert_eq!(model.name, "trip");
    assert_eq!(cmd.error(), "");
}

#[tokio::test]
async fn output_reports_parse_failure_for_broken_json() {
    init_logging();
    let url = serve_once("200 OK", "", "\"Name\":\"trip\"}\n").await;
    let mut cmd = Command::get(&url).unwrap().with_transport(transport());
    let mut model = Trip::default();

    let err = cmd.output(&mut model).await.unwrap_err();

    assert_eq!(err.status_code(), PARSE_FAILURE);
    assert_eq!(model.name, "");
    assert_eq!(cmd.response().map(|r| r.status), Some(200));
}

#[tokio::test]
async fn output_reports_parse_failure_for_empty_body() {
    init_logging();
    let url = serve_once("200 OK", "", "").await;
    let mut cmd = Command::get(&url).unwrap().with_transport(transport());
    let mut model = Trip::default();

    let err = cmd.output(&mut model).await.unwrap_err();
    assert_eq!(err.status_code(), PARSE_FAILURE);
}

#[tokio::test]
async fn not_found_keeps_real_status() {
    init_logging();
    let url = serve_once("404 Not Found", "", "{\"Name\":\"trip\"}").await;
    let mut cmd = Command::get(&url).unwrap().with_transport(transport());
    let mut model = Trip::default();

    let err = cmd.output(&mut model).await.unwrap_err();

    assert_eq!(err.status_code(), 404);
    assert!(err.to_string().contains("404"));
    assert_eq!(cmd.error(), "404 Not Found");
    assert_eq!(model.name, "");
}

#[tokio::test]
async fn unacceptable_error_uses_reason_phrase_from_the_wire() {
    init_logging();
    let url = serve_once("404 Nope Gone", "", "").await;
    let mut cmd = Command::get(&url).unwrap().with_transport(transport());

    let err = cmd.run().await.unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.to_string(), "404 Nope Gone");

    let url = serve_once("499 Client Closed Request", "", "").await;
    let mut cmd = Command::get(&url).unwrap().with_transport(transport());

    let err = cmd.run().await.unwrap_err();
    assert_eq!(err.status_code(), 499);
    assert_eq!(cmd.error(), "499 Client Closed Request");
    assert_eq!(cmd.response().unwrap().status_text, "Client Closed Request");
}

#[tokio::test]
async fn connection_refused_is_bad_response() {
    init_logging();
    let url = refused_url().await;
    let mut cmd = Command::get(&url).unwrap().with_transport(transport());

    let err = cmd.run().await.unwrap_err();

    assert_eq!(err.status_code(), BAD_RESPONSE);
    assert!(err.is_transport());
    assert!(cmd.response().is_none());
    assert!(!cmd.error().is_empty());
}

#[tokio::test]
async fn default_transport_runs_plain_request() {
    init_logging();
    let url = serve_once("204 No Content", "", "").await;
    let mut cmd = Command::get(&url).unwrap();

    assert_eq!(cmd.run().await.unwrap(), 204);
    assert!(cmd.last_error().is_none());
}

#[tokio::test]
async fn redirects_can_be_disabled() {
    init_logging();
    let url = serve_once("302 Found", "Location: /elsewhere\r\n", "").await;
    let config = TransportConfig::builder().max_redirects(0).build().unwrap();
    let transport = Arc::new(ReqwestTransport::with_config(&config).unwrap());
    let mut cmd = Command::get(&url).unwrap().with_transport(transport);

    assert_eq!(cmd.run().await.unwrap(), 302);
    let location = cmd.response().and_then(|r| r.headers.get("location")).unwrap();
    assert_eq!(location, "/elsewhere");
}

#[tokio::test]
async fn timeout_is_bad_response() {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        // Accept and never answer.
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let config = TransportConfig::builder().timeout(Duration::from_millis(200)).build().unwrap();
    let transport = Arc::new(ReqwestTransport::with_config(&config).unwrap());
    let mut cmd = Command::get(&format!("http://{addr}/")).unwrap().with_transport(transport);

    let err = cmd.run().await.unwrap_err();
    assert_eq!(err.status_code(), BAD_RESPONSE);
}

#[tokio::test]
async fn dump_shows_exchange() {
    init_logging();
    let url = serve_once("200 OK", "", "{\"Name\":\"trip\"}").await;
    let mut cmd = Command::get(&url).unwrap().with_transport(transport());
    cmd.run().await.unwrap();

    let mut out = Vec::new();
    cmd.dump(&mut out, true);
    let out = String::from_utf8(out).unwrap();

    assert!(out.starts_with("GET / HTTP/1.1\r\n"));
    assert!(out.contains("HTTP/1.1 200 OK\r\n"));
    assert!(out.contains("Content-Type: application/json\r\n"));
    assert!(out.ends_with("{\"Name\":\"trip\"}\n"));
    // headers added by the client are not part of the held request
    let request_part = &out[..out.find("HTTP/1.1 200 OK").unwrap()];
    assert!(!request_part.contains("User-Agent"));
}
