//! CLI integration tests
//!
//! Tests the issh binary using assert_cmd.

use std::io::Write;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use std::time::Duration;

use assert_cmd::cargo::CommandCargoExt;
use assert_cmd::Command;
use futures::{SinkExt, StreamExt};
use predicates::prelude::*;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;

const TEST_TIMEOUT: Duration = Duration::from_secs(20);

fn issh() -> Command {
    Command::cargo_bin("issh")
        .expect("Failed to locate issh binary - ensure it's built before running tests")
}

/// Temp dir with an empty config file and a downloads directory
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "").unwrap();
        std::fs::create_dir(dir.path().join("Downloads")).unwrap();
        Self { dir }
    }

    fn config(&self) -> std::path::PathBuf {
        self.dir.path().join("config.toml")
    }

    fn downloads(&self) -> std::path::PathBuf {
        self.dir.path().join("Downloads")
    }

    fn write_credential(&self, name: &str, content: &str) {
        std::fs::write(self.downloads().join(name), content).unwrap();
    }

    fn base_args(&self) -> Vec<String> {
        vec![
            "--config".to_string(),
            path_str(&self.config()),
            "--download-dir".to_string(),
            path_str(&self.downloads()),
        ]
    }
}

fn path_str(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

/// A listener nobody should connect to; returns its ws:// URL
fn untouched_listener() -> (std::net::TcpListener, String) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let url = format!("ws://{}/ws", listener.local_addr().unwrap());
    (listener, url)
}

fn assert_never_connected(listener: &std::net::TcpListener) {
    match listener.accept() {
        Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
        Ok(_) => panic!("issh connected although it should have stopped earlier"),
        Err(e) => panic!("unexpected accept error: {}", e),
    }
}

#[test]
fn test_cli_help() {
    issh()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("issh"))
        .stdout(predicate::str::contains("--verify-certs"));
}

#[test]
fn test_cli_version() {
    issh()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("issh"));
}

#[test]
fn test_no_credential_found() {
    let fixture = Fixture::new();
    fixture.write_credential("unrelated.json", r#"{"cookie":"x"}"#);
    let (listener, url) = untouched_listener();

    issh()
        .args(fixture.base_args())
        .arg(&url)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No credential found"));

    assert_never_connected(&listener);
}

#[test]
fn test_invalid_json_credential() {
    let fixture = Fixture::new();
    fixture.write_credential("issh_login_data.json", "{\"cookie\": ");
    let (listener, url) = untouched_listener();

    issh()
        .args(fixture.base_args())
        .arg(&url)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unable to parse credential file"));

    assert_never_connected(&listener);
}

#[test]
fn test_missing_download_dir() {
    let fixture = Fixture::new();
    let missing = fixture.dir.path().join("nope");

    issh()
        .args(["--config", &path_str(&fixture.config())])
        .args(["--download-dir", &path_str(&missing)])
        .arg("ws://127.0.0.1:1/ws")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to read download directory"));
}

#[test]
fn test_missing_explicit_config() {
    let fixture = Fixture::new();

    issh()
        .args(["--config", &path_str(&fixture.dir.path().join("absent.toml"))])
        .arg("ws://127.0.0.1:1/ws")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_no_endpoint_and_no_domain() {
    let fixture = Fixture::new();
    fixture.write_credential("issh_login_data.json", r#"{"cookie":"abc"}"#);

    issh()
        .args(fixture.base_args())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No endpoint given"));
}

#[test]
fn test_connection_refused() {
    let fixture = Fixture::new();
    fixture.write_credential("issh_login_data.json", r#"{"cookie":"abc"}"#);
    let (listener, url) = untouched_listener();
    drop(listener);

    issh()
        .args(fixture.base_args())
        .arg(&url)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Handshake with"));
}

#[tokio::test]
async fn test_session_relays_stdin_and_exits_cleanly() {
    let fixture = Fixture::new();
    fixture.write_credential("issh_login_data_1.json", r#"{"cookie":"old"}"#);
    std::thread::sleep(Duration::from_millis(1100));
    fixture.write_credential("issh_login_data_2.json", r#"{"cookie":"abc123"}"#);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/terminal", listener.local_addr().unwrap());

    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut cookie = None;
        let callback = |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            cookie = req
                .headers()
                .get("cookie")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            Ok(resp)
        };
        let mut ws = tokio_tungstenite::accept_hdr_async(tcp, callback).await.unwrap();

        let mut data = Vec::new();
        while let Some(Ok(message)) = ws.next().await {
            match message {
                Message::Binary(chunk) => data.extend_from_slice(&chunk),
                Message::Close(_) => break,
                _ => {}
            }
        }
        (cookie, data)
    });

    let mut args = fixture.base_args();
    args.extend(["setup-text".to_string(), url]);
    let output = tokio::task::spawn_blocking(move || {
        let mut cmd = StdCommand::cargo_bin("issh").unwrap();
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let mut child = cmd.spawn().unwrap();
        child.stdin.take().unwrap().write_all(b"uname -a\n").unwrap();
        child.wait_with_output().unwrap()
    });
    let output = timeout(TEST_TIMEOUT, output).await.unwrap().unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let (cookie, data) = timeout(TEST_TIMEOUT, server).await.unwrap().unwrap();
    assert_eq!(cookie.as_deref(), Some("abc123"));
    assert_eq!(data, b"uname -a\n");
}

#[tokio::test]
async fn test_remote_close_exits_nonzero() {
    let fixture = Fixture::new();
    fixture.write_credential("issh_login_data.json", r#"{"cookie":"abc123"}"#);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/terminal", listener.local_addr().unwrap());

    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        ws.send(Message::Binary(b"welcome\r\n".to_vec())).await.unwrap();
        ws.send(Message::Text("$ ".to_string())).await.unwrap();
        ws.close(None).await.unwrap();
        // Drain until the client goes away
        while let Some(Ok(_)) = ws.next().await {}
    });

    let mut args = fixture.base_args();
    args.push(url);
    let output = tokio::task::spawn_blocking(move || {
        let mut cmd = StdCommand::cargo_bin("issh").unwrap();
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let mut child = cmd.spawn().unwrap();
        // Keep stdin open so only the remote can end the session
        let stdin = child.stdin.take().unwrap();
        let output = child.wait_with_output().unwrap();
        drop(stdin);
        output
    });
    let output = timeout(TEST_TIMEOUT, output).await.unwrap().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(output.stdout, b"welcome\r\n$ ");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Session closed by remote"));
}
