//! Provider HTTP clients against a local mock server.

use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use talkback_core::completion::openai::OpenAiCompletion;
use talkback_core::completion::{CompletionError, CompletionProvider, CompletionSettings};
use talkback_core::video::did::{ClipSettings, DidClips};
use talkback_core::video::{JobStatus, VideoError, VideoProvider};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion_client(server: &MockServer) -> OpenAiCompletion {
    let settings = CompletionSettings {
        api_url: format!("{}/v1/chat/completions", server.uri()),
        ..CompletionSettings::default()
    };
    OpenAiCompletion::new(Client::new(), "sk-test", settings)
}

fn clip_client(server: &MockServer) -> DidClips {
    let settings = ClipSettings {
        api_url: server.uri(),
        submit_timeout: Duration::from_secs(2),
        status_timeout: Duration::from_millis(200),
        ..ClipSettings::default()
    };
    DidClips::new(Client::new(), "dXNlcjpwYXNz", settings)
}

#[tokio::test]
async fn completion_sends_prompt_and_reads_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "max_tokens": 150,
            "messages": [
                {"role": "system"},
                {"role": "user", "content": "What is Rust?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "A systems language."}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let completion = completion_client(&server)
        .complete("What is Rust?")
        .await
        .unwrap();

    assert_eq!(completion.text, "A systems language.");
}

#[tokio::test]
async fn completion_unauthorized_keeps_provider_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": "invalid_api_key"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = completion_client(&server).complete("hi").await.unwrap_err();

    assert_eq!(err.upstream_status(), Some(401));
    assert_eq!(err.details()["error"]["code"], "invalid_api_key");
}

#[tokio::test]
async fn completion_without_choices_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = completion_client(&server).complete("hi").await.unwrap_err();

    assert!(matches!(err, CompletionError::Malformed(_)));
}

#[tokio::test]
async fn clip_submit_returns_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/clips"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .and(body_partial_json(json!({
            "presenter_id": "lily-ldwi8a_LdG",
            "script": {"input": "Hello", "provider": {"voice_id": "Sara"}}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "clp_abc", "status": "created"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = clip_client(&server).submit("Hello").await.unwrap();

    assert_eq!(id, "clp_abc");
}

#[tokio::test]
async fn clip_status_maps_done_with_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clips/clp_abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "clp_abc",
            "status": "done",
            "result_url": "https://d-id.example/clp_abc.mp4"
        })))
        .mount(&server)
        .await;

    let job = clip_client(&server).status("clp_abc").await.unwrap();

    assert_eq!(job.id, "clp_abc");
    assert_eq!(job.status, JobStatus::Done);
    assert_eq!(job.result_url.as_deref(), Some("https://d-id.example/clp_abc.mp4"));
}

#[tokio::test]
async fn clip_status_started_is_processing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clips/clp_abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "clp_abc", "status": "started"
        })))
        .mount(&server)
        .await;

    let job = clip_client(&server).status("clp_abc").await.unwrap();

    assert_eq!(job.status, JobStatus::Processing);
    assert!(job.result_url.is_none());
}

#[tokio::test]
async fn clip_submit_rejected_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/clips"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "kind": "InsufficientCreditsError"
        })))
        .mount(&server)
        .await;

    let err = clip_client(&server).submit("Hello").await.unwrap_err();

    assert!(matches!(err, VideoError::Upstream { status: 402, .. }));
    assert_eq!(err.details()["kind"], "InsufficientCreditsError");
}

#[tokio::test]
async fn clip_status_slower_than_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clips/clp_slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "clp_slow", "status": "done"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = clip_client(&server).status("clp_slow").await.unwrap_err();

    assert!(matches!(err, VideoError::Transport(_)));
}
