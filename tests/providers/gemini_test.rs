//! Gemini wire format and client tests.

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use soulcanvas::prompt::TextRequest;
use soulcanvas::providers::gemini::{
    build_image_request, build_text_request, parse_image_response, parse_text_response,
    GeminiClient,
};
use soulcanvas::providers::{ImageGenerator, ImageRequest, ProviderError, TextGenerator};

/// Serve one HTTP exchange and hand the raw request back to the test.
async fn serve_once(status_line: &str, body: &str) -> (String, oneshot::Receiver<String>) {
    let listener = match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) => panic!("listener should bind: {err}"),
    };
    let addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(err) => panic!("listener should expose local addr: {err}"),
    };

    let (tx, rx) = oneshot::channel();
    let status_line_owned = status_line.to_owned();
    let body_owned = body.to_owned();
    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status_line_owned}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body_owned}",
            body_owned.len()
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = tx.send(request);
    });

    (format!("http://{addr}/v1beta"), rx)
}

/// Read headers plus a `Content-Length` body.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0_u8; 4096];
    loop {
        let n = match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        raw.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&raw);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if raw.len() >= header_end.saturating_add(4).saturating_add(content_length) {
                break;
            }
        }
    }
    String::from_utf8_lossy(&raw).into_owned()
}

fn request_body(raw: &str) -> Value {
    let body = raw.split_once("\r\n\r\n").map(|(_, b)| b).unwrap_or("");
    match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) => panic!("request body should be JSON: {err}\n{raw}"),
    }
}

fn text_request() -> TextRequest {
    TextRequest {
        prompt: "Describe the landscape.".to_owned(),
        response_schema: json!({"type": "OBJECT"}),
    }
}

#[test]
fn text_request_asks_for_json_with_schema() {
    let wire = build_text_request(&text_request());
    let value = match serde_json::to_value(&wire) {
        Ok(value) => value,
        Err(err) => panic!("request should serialize: {err}"),
    };
    assert_eq!(value["contents"][0]["role"], "user");
    assert_eq!(value["contents"][0]["parts"][0]["text"], "Describe the landscape.");
    assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
}

#[test]
fn text_response_joins_first_candidate_parts() {
    let body = json!({
        "candidates": [
            {"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}, "finishReason": "STOP"},
            {"content": {"parts": [{"text": "ignored"}]}}
        ]
    })
    .to_string();
    match parse_text_response(&body) {
        Ok(text) => assert_eq!(text, "{\"a\":1}"),
        Err(err) => panic!("expected text, got {err}"),
    }
}

#[test]
fn text_response_without_text_is_empty() {
    for body in [
        json!({"candidates": []}),
        json!({"candidates": [{"finishReason": "SAFETY"}]}),
        json!({"candidates": [{"content": {"parts": [{"text": "  "}]}}]}),
    ] {
        assert!(matches!(
            parse_text_response(&body.to_string()),
            Err(ProviderError::EmptyResponse)
        ));
    }
    assert!(matches!(
        parse_text_response("<html>"),
        Err(ProviderError::Parse(_))
    ));
}

#[test]
fn image_request_is_single_portrait_jpeg() {
    let wire = build_image_request(&ImageRequest::portrait("Cliffs at dusk."));
    let value = match serde_json::to_value(&wire) {
        Ok(value) => value,
        Err(err) => panic!("request should serialize: {err}"),
    };
    assert_eq!(value["instances"][0]["prompt"], "Cliffs at dusk.");
    assert_eq!(value["parameters"]["sampleCount"], 1);
    assert_eq!(value["parameters"]["aspectRatio"], "3:4");
    assert_eq!(value["parameters"]["outputOptions"]["mimeType"], "image/jpeg");
}

#[test]
fn image_response_decodes_first_prediction() {
    let body = json!({"predictions": [{"bytesBase64Encoded": "aGVsbG8=", "mimeType": "image/png"}]})
        .to_string();
    match parse_image_response(&body, "image/jpeg") {
        Ok(image) => {
            assert_eq!(image.bytes, b"hello");
            assert_eq!(image.mime_type, "image/png");
            assert_eq!(image.data_uri(), "data:image/png;base64,aGVsbG8=");
        }
        Err(err) => panic!("expected image, got {err}"),
    }
}

#[test]
fn image_response_falls_back_to_requested_mime() {
    let body = json!({"predictions": [{"bytesBase64Encoded": "aGVsbG8="}]}).to_string();
    match parse_image_response(&body, "image/jpeg") {
        Ok(image) => assert_eq!(image.mime_type, "image/jpeg"),
        Err(err) => panic!("expected image, got {err}"),
    }
}

#[test]
fn image_response_without_bytes_is_missing_image() {
    for body in [
        json!({}),
        json!({"predictions": []}),
        json!({"predictions": [{"raiFilteredReason": "blocked"}]}),
    ] {
        assert!(matches!(
            parse_image_response(&body.to_string(), "image/jpeg"),
            Err(ProviderError::MissingImage)
        ));
    }
}

#[test]
fn debug_output_redacts_api_key() {
    let client = GeminiClient::new("https://example.test/v1beta/", "text-m", "image-m", "AIza-secret");
    let rendered = format!("{client:?}");
    assert!(!rendered.contains("AIza-secret"));
    assert!(rendered.contains("[REDACTED]"));
    assert_eq!(
        client.endpoint("text-m", "generateContent"),
        "https://example.test/v1beta/models/text-m:generateContent"
    );
}

#[tokio::test]
async fn generate_json_posts_to_generate_content() {
    let response = json!({"candidates": [{"content": {"parts": [{"text": "{\"ok\":true}"}]}}]})
        .to_string();
    let (base_url, request_rx) = serve_once("200 OK", &response).await;
    let client = GeminiClient::new(base_url, "gemini-test", "imagen-test", "test-key");

    match client.generate_json(&text_request()).await {
        Ok(text) => assert_eq!(text, "{\"ok\":true}"),
        Err(err) => panic!("expected text, got {err}"),
    }

    let raw = match request_rx.await {
        Ok(raw) => raw,
        Err(err) => panic!("server should capture request: {err}"),
    };
    assert!(raw.starts_with("POST /v1beta/models/gemini-test:generateContent "));
    assert!(raw.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
    let body = request_body(&raw);
    assert_eq!(body["contents"][0]["parts"][0]["text"], "Describe the landscape.");
}

#[tokio::test]
async fn generate_image_posts_to_predict() {
    let response = json!({"predictions": [{"bytesBase64Encoded": "aGVsbG8=", "mimeType": "image/jpeg"}]})
        .to_string();
    let (base_url, request_rx) = serve_once("200 OK", &response).await;
    let client = GeminiClient::new(base_url, "gemini-test", "imagen-test", "test-key");

    match client.generate_image(&ImageRequest::portrait("Dunes.")).await {
        Ok(image) => assert_eq!(image.bytes, b"hello"),
        Err(err) => panic!("expected image, got {err}"),
    }

    let raw = match request_rx.await {
        Ok(raw) => raw,
        Err(err) => panic!("server should capture request: {err}"),
    };
    assert!(raw.starts_with("POST /v1beta/models/imagen-test:predict "));
    assert_eq!(request_body(&raw)["instances"][0]["prompt"], "Dunes.");
}

#[tokio::test]
async fn upstream_error_status_is_reported() {
    let (base_url, _request_rx) = serve_once("503 Service Unavailable", "{\"error\":\"overloaded\"}").await;
    let client = GeminiClient::new(base_url, "gemini-test", "imagen-test", "test-key");

    match client.generate_json(&text_request()).await {
        Err(ProviderError::HttpStatus { status, body }) => {
            assert_eq!(status, 503);
            assert!(body.contains("overloaded"));
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}
