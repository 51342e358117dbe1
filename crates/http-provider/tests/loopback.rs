use std::time::Duration;

use fin_chat_http_provider::{HttpConfigBuilder, HttpQueryProvider};
use fin_chat_model::{
    AdvisorPayload, ErrorKind, QueryProvider, QueryProviderError,
    QueryRequest,
};
use reqwest::Client;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

struct CapturedRequest {
    head: String,
    body: Vec<u8>,
}

async fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers ended");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().unwrap())
        })
        .unwrap_or(0);

    let mut body = buf[head_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before body ended");
        body.extend_from_slice(&chunk[..n]);
    }
    CapturedRequest { head, body }
}

/// Serves exactly one request with the given status line and body.
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let task = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let captured = read_request(&mut stream).await;
        let resp = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(resp.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
        captured
    });
    (base_url, task)
}

fn provider_for(base_url: &str) -> HttpQueryProvider {
    let config = HttpConfigBuilder::new().with_base_url(base_url).build();
    let client = Client::builder().no_proxy().build().unwrap();
    HttpQueryProvider::with_client(config, client)
}

#[tokio::test]
async fn test_posts_query_and_decodes_response() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"advisor_response":"Save 20%","web_links":"a.com, b.com"}"#,
    )
    .await;

    let resp = provider_for(&base_url)
        .send_query(&QueryRequest::new("How do I budget?"))
        .await
        .unwrap();
    assert_eq!(
        resp.advisor_payload(),
        AdvisorPayload::Text("Save 20%".to_owned())
    );
    assert_eq!(resp.web_links.as_deref(), Some("a.com, b.com"));

    let captured = server.await.unwrap();
    assert!(captured.head.starts_with("POST /query HTTP/1.1\r\n"));
    assert!(
        captured
            .head
            .to_ascii_lowercase()
            .contains("content-type: application/json")
    );
    let body: Value = serde_json::from_slice(&captured.body).unwrap();
    assert_eq!(body, json!({ "query": "How do I budget?" }));
}

#[tokio::test]
async fn test_non_json_success_body_is_not_a_transport_error() {
    let (base_url, server) = serve_once("200 OK", "<html>hello</html>").await;

    let resp = provider_for(&base_url)
        .send_query(&QueryRequest::new("hi"))
        .await
        .unwrap();
    assert_eq!(resp.advisor_payload(), AdvisorPayload::Malformed);
    assert_eq!(resp.web_links, None);
    server.await.unwrap();
}

#[tokio::test]
async fn test_non_2xx_status() {
    let (base_url, server) = serve_once(
        "500 Internal Server Error",
        r#"{"advisor_response":"should not be read"}"#,
    )
    .await;

    let err = provider_for(&base_url)
        .send_query(&QueryRequest::new("hi"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Status(500));
    server.await.unwrap();
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = provider_for(&base_url)
        .send_query(&QueryRequest::new("hi"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unreachable);
}

#[tokio::test]
async fn test_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        // Hold the connection open without ever answering.
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(stream);
    });

    let config = HttpConfigBuilder::new()
        .with_base_url(&base_url)
        .with_timeout(Duration::from_millis(100))
        .build();
    let client = Client::builder().no_proxy().build().unwrap();
    let provider = HttpQueryProvider::with_client(config, client);

    let err = provider
        .send_query(&QueryRequest::new("hi"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    server.abort();
}
