//! End-to-end tests: a live router on an ephemeral port next to a
//! scripted AnkiConnect mock.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use deckrelay_anki_connect::Client;
use deckrelay_file_store::FileStore;
use deckrelay_server::{AppState, router};

/// Scripted AnkiConnect endpoint recording every action it sees.
struct MockAnki {
    url: String,
    actions: Arc<Mutex<Vec<String>>>,
}

impl MockAnki {
    fn seen_actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }
}

/// Spawns a mock endpoint; `respond` maps `(action, request body)` to the
/// JSON response body and may perform side effects (e.g. writing the
/// export file named in the params).
async fn spawn_mock_anki<F>(respond: F) -> MockAnki
where
    F: Fn(&str, &Value) -> Value + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());
    let actions: Arc<Mutex<Vec<String>>> = Arc::default();
    let recorded = Arc::clone(&actions);

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let request = read_json_request(&mut stream).await;
            let action = request["action"].as_str().unwrap_or_default().to_owned();
            recorded.lock().unwrap().push(action.clone());

            let body = respond(&action, &request).to_string();
            let resp = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(resp.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    MockAnki { url, actions }
}

/// Reads one HTTP request off the stream and decodes its JSON body.
async fn read_json_request(stream: &mut TcpStream) -> Value {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut tmp).await.unwrap();
        if n == 0 {
            return Value::Null;
        }
        buf.extend_from_slice(&tmp[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut tmp).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&tmp[..n]);
    }

    serde_json::from_slice(&buf[header_end..header_end + content_length]).unwrap_or(Value::Null)
}

/// Spawns the relay over `anki_url` with `dir` as its staging directory.
async fn spawn_relay(anki_url: &str, dir: &Path) -> SocketAddr {
    let store = FileStore::new(dir).unwrap();
    let state = AppState::new(Client::new(anki_url.to_owned()), store);
    let app = router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn upload_file(addr: SocketAddr, file_name: &str, bytes: &[u8]) -> reqwest::Response {
    let part = reqwest::multipart::Part::bytes(bytes.to_vec()).file_name(file_name.to_owned());
    let form = reqwest::multipart::Form::new().part("deck", part);
    reqwest::Client::new()
        .post(format!("http://{addr}/upload-deck"))
        .multipart(form)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn upload_success_keeps_file_and_reports_name() {
    let mock = spawn_mock_anki(|action, _| match action {
        "importPackage" => json!({"result": true, "error": null}),
        _ => json!({"result": 6, "error": null}),
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_relay(&mock.url, dir.path()).await;

    let response = upload_file(addr, "deck.apkg", b"deck bytes").await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Deck uploaded successfully");
    assert_eq!(body["file"], "deck.apkg");

    assert!(dir.path().join("deck.apkg").exists());
    assert_eq!(mock.seen_actions(), vec!["importPackage"]);
}

#[tokio::test]
async fn upload_rejects_wrong_extension_without_automation_call() {
    let mock = spawn_mock_anki(|_, _| json!({"result": true, "error": null})).await;
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_relay(&mock.url, dir.path()).await;

    let response = upload_file(addr, "notes.txt", b"not a deck").await;
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains(".apkg"));

    assert!(!dir.path().join("notes.txt").exists());
    assert!(mock.seen_actions().is_empty());
}

#[tokio::test]
async fn upload_without_file_is_400() {
    let mock = spawn_mock_anki(|_, _| json!({"result": true, "error": null})).await;
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_relay(&mock.url, dir.path()).await;

    let form = reqwest::multipart::Form::new().text("deck", "not a file");
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/upload-deck"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    assert!(mock.seen_actions().is_empty());
}

#[tokio::test]
async fn failed_import_removes_staged_file() {
    let mock = spawn_mock_anki(|action, _| match action {
        "importPackage" => json!({"result": null, "error": "not a valid apkg"}),
        _ => json!({"result": 6, "error": null}),
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_relay(&mock.url, dir.path()).await;

    let response = upload_file(addr, "deck.apkg", b"corrupt").await;
    assert_eq!(response.status(), 500);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "failed to import deck");
    assert!(body["details"].as_str().unwrap().contains("not a valid apkg"));

    assert!(!dir.path().join("deck.apkg").exists());
}

#[tokio::test]
async fn upload_rejects_traversal_filename() {
    let mock = spawn_mock_anki(|_, _| json!({"result": true, "error": null})).await;
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_relay(&mock.url, dir.path()).await;

    let response = upload_file(addr, "../escape.apkg", b"deck bytes").await;
    assert_eq!(response.status(), 400);
    assert!(mock.seen_actions().is_empty());
}

#[tokio::test]
async fn export_missing_file_is_404() {
    // The mock acknowledges the export but writes nothing.
    let mock = spawn_mock_anki(|_, _| json!({"result": null, "error": null})).await;
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_relay(&mock.url, dir.path()).await;

    let response = reqwest::get(format!("http://{addr}/exportDeck/MyDeck"))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("MyDeck"));
    assert_eq!(mock.seen_actions(), vec!["exportPackage"]);
}

#[tokio::test]
async fn export_streams_bytes_and_deletes_file() {
    let mock = spawn_mock_anki(|action, request| {
        if action == "exportPackage" {
            let path = request["params"]["path"].as_str().unwrap();
            std::fs::write(path, b"exported deck bytes").unwrap();
        }
        json!({"result": null, "error": null})
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_relay(&mock.url, dir.path()).await;

    let response = reqwest::get(format!("http://{addr}/exportDeck/MyDeck"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let disposition = response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();
    assert!(disposition.contains("MyDeck.apkg"));

    let bytes = response.bytes().await.unwrap();
    assert_eq!(&bytes[..], b"exported deck bytes");

    // A fully streamed transfer removes the archive.
    assert!(!dir.path().join("MyDeck.apkg").exists());
}

#[tokio::test]
async fn export_automation_failure_is_500() {
    let mock = spawn_mock_anki(|_, _| json!({"result": null, "error": "deck was not found"})).await;
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_relay(&mock.url, dir.path()).await;

    let response = reqwest::get(format!("http://{addr}/exportDeck/MyDeck"))
        .await
        .unwrap();
    assert_eq!(response.status(), 500);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "failed to export deck");
    assert!(body["details"].as_str().unwrap().contains("deck was not found"));
}

#[tokio::test]
async fn export_rejects_traversal_deck_name() {
    let mock = spawn_mock_anki(|_, _| json!({"result": null, "error": null})).await;
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_relay(&mock.url, dir.path()).await;

    let response = reqwest::get(format!("http://{addr}/exportDeck/..%2Fescape"))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert!(mock.seen_actions().is_empty());
}

#[tokio::test]
async fn status_connected_reports_version() {
    let mock = spawn_mock_anki(|_, _| json!({"result": 6, "error": null})).await;
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_relay(&mock.url, dir.path()).await;

    let response = reqwest::get(format!("http://{addr}/anki-connect-status"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "connected");
    assert_eq!(body["version"], 6);
}

#[tokio::test]
async fn status_disconnected_is_500() {
    // Point the relay at a known-closed port.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_url = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_relay(&dead_url, dir.path()).await;

    let response = reqwest::get(format!("http://{addr}/anki-connect-status"))
        .await
        .unwrap();
    assert_eq!(response.status(), 500);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "disconnected");
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn index_serves_upload_form() {
    let mock = spawn_mock_anki(|_, _| json!({"result": 6, "error": null})).await;
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_relay(&mock.url, dir.path()).await;

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(
        response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );

    let html = response.text().await.unwrap();
    assert!(html.contains("<form action=\"/upload-deck\""));
}
