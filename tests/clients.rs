use serde_json::json;
use wiremock::matchers::{bearer_token, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use ytsum::config::LlmConfig;
use ytsum::summarize::{OpenRouter, Summarizer};
use ytsum::youtube::{TranscriptSource, YouTubeCaptions};

fn llm_config(base_url: String, site: bool) -> LlmConfig {
    LlmConfig {
        api_key: "sk-or-test".to_string(),
        model: "openai/gpt-4o-mini".to_string(),
        base_url,
        site_url: site.then(|| "https://bluedoraemon.github.io".to_string()),
        site_name: site.then(|| "Video TLDR".to_string()),
    }
}

// ─── OpenRouter ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_openrouter_sends_prompt_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(bearer_token("sk-or-test"))
        .and(header("HTTP-Referer", "https://bluedoraemon.github.io"))
        .and(header("X-Title", "Video TLDR"))
        .and(body_json(json!({
            "model": "openai/gpt-4o-mini",
            "messages": [
                {"role": "user", "content": "Summarize this text: Sample transcript"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "gen-1",
            "choices": [{"message": {"role": "assistant", "content": "  Summary\n"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenRouter::new(reqwest::Client::new(), llm_config(server.uri(), true));
    let summary = client.summarize("Sample transcript").await.unwrap();
    assert_eq!(summary, "Summary");
}

#[tokio::test]
async fn test_openrouter_omits_unset_site_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "ok"}}]
        })))
        .mount(&server)
        .await;

    let client = OpenRouter::new(reqwest::Client::new(), llm_config(server.uri(), false));
    assert_eq!(client.summarize("text").await.unwrap(), "ok");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("HTTP-Referer"));
    assert!(!requests[0].headers.contains_key("X-Title"));
}

#[tokio::test]
async fn test_openrouter_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("No auth credentials found"))
        .mount(&server)
        .await;

    let client = OpenRouter::new(reqwest::Client::new(), llm_config(server.uri(), false));
    let err = client.summarize("text").await.unwrap_err().to_string();
    assert!(err.contains("401"));
    assert!(err.contains("No auth credentials found"));
}

// ─── YouTube captions ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_youtube_captions_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/watch"))
        .and(query_param("v", "dQw4w9WgXcQ"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<script>ytcfg.set({"INNERTUBE_API_KEY":"test-key"});</script>"#))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/youtubei/v1/player"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "playabilityStatus": {"status": "OK"},
            "captions": {"playerCaptionsTracklistRenderer": {"captionTracks": [
                {"baseUrl": format!("{}/api/timedtext?lang=de", server.uri()), "languageCode": "de"},
                {"baseUrl": format!("{}/api/timedtext?lang=en", server.uri()), "languageCode": "en"}
            ]}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/timedtext"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.0" dur="1.2">Hello</text><text start="1.2" dur="0.8">World</text></transcript>"#,
        ))
        .mount(&server)
        .await;

    let captions = YouTubeCaptions::new(reqwest::Client::new(), server.uri(), "en");
    let transcript = captions.fetch_transcript("dQw4w9WgXcQ").await.unwrap();

    assert_eq!(transcript.language, "en");
    assert_eq!(transcript.segments.len(), 2);
    assert_eq!(transcript.text(), "Hello World");
}

#[tokio::test]
async fn test_youtube_captions_missing_video() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/watch"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let captions = YouTubeCaptions::new(reqwest::Client::new(), server.uri(), "en");
    let err = ytsum::youtube::get_transcript(&captions, "missing").await.unwrap_err();
    assert!(matches!(err, ytsum::Error::TranscriptFetch(_)));
    assert!(err.detail().starts_with("Error fetching transcript: "));
}
