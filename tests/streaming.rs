//! Integration tests driving the client against a local mock server.

use futures::StreamExt;
use gemini_image_gen::models::{ModelParams, Request};
use gemini_image_gen::{AssembleError, GenerativeModel};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn model_for(server: &MockServer) -> GenerativeModel {
    GenerativeModel::new(
        "test-key",
        ModelParams::builder().model("test-model").build(),
    )
    .with_base_url(server.uri())
}

const STREAM_PATH: &str = "/v1beta/models/test-model:streamGenerateContent";

#[tokio::test]
async fn streamed_array_is_decoded_into_fragments() {
    let server = MockServer::start().await;
    let body = concat!(
        r#"[{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello "}]}}]},"#,
        r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"world"}]}}]}]"#,
    );
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let model = model_for(&server);
    let mut stream = model
        .stream_generate_response(Request::from_prompt("hi"))
        .await
        .unwrap();

    let mut transcript = String::new();
    let mut fragments = 0;
    while let Some(fragment) = stream.next().await {
        transcript.push_str(&fragment.unwrap().text());
        fragments += 1;
    }
    assert_eq!(fragments, 2);
    assert_eq!(transcript, "Hello world");
}

#[tokio::test]
async fn error_status_is_surfaced_before_streaming() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let model = model_for(&server);
    let error = model
        .stream_generate_response(Request::from_prompt("hi"))
        .await
        .unwrap_err();
    let message = error.to_string();
    assert!(message.contains("429"), "unexpected error: {message}");
    assert!(message.contains("quota exceeded"), "unexpected error: {message}");
}

#[tokio::test]
async fn generate_image_assembles_artifact_and_transcript() {
    let server = MockServer::start().await;
    // "AAEC" is base64 for the bytes [0, 1, 2].
    let body = concat!(
        r#"[{"candidates":[{"content":{"role":"model","parts":[{"text":"Here you go."}]}}]},"#,
        r#"{"candidates":[{"content":{"role":"model","parts":"#,
        r#"[{"inlineData":{"mimeType":"image/png","data":"AAEC"}}]}}]}]"#,
    );
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("pic");
    let base = base.to_str().unwrap();

    let model = model_for(&server);
    let assembly = model.generate_image("a lighthouse", base).await.unwrap();

    assert_eq!(assembly.transcript, "Here you go.");
    let artifact = assembly.artifact.unwrap();
    assert_eq!(artifact.file_name, format!("{base}.png"));
    assert_eq!(artifact.bytes, vec![0u8, 1, 2]);
    assert_eq!(std::fs::read(&artifact.file_name).unwrap(), vec![0u8, 1, 2]);
}

#[tokio::test]
async fn blocked_prompt_aborts_the_assembly() {
    let server = MockServer::start().await;
    let body = r#"[{"promptFeedback":{"blockReason":"SAFETY"}}]"#;
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let model = model_for(&server);
    let error = model.generate_image("something", "unused").await.unwrap_err();
    match error {
        AssembleError::Transport { source, .. } => {
            assert!(source.to_string().contains("SAFETY"), "got: {source}");
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}
