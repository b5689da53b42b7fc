use mockito::Matcher;
use serde_json::json;

use super::*;

const TEST_TOKEN: &str = "r8_0123456789012345678901234567890123456";

fn client_for(server: &mockito::ServerGuard, params: GenerationParams) -> Replicate {
    Replicate::new(
        TEST_TOKEN,
        ModelVariant::Llama2_13b,
        params,
        Some(server.url()),
        None,
    )
}

#[test]
fn output_events_become_fragments() {
    let verdict = parse_stream_event("event: output\ndata: Hello\n\n").unwrap();
    match verdict {
        SseVerdict::Fragment(text) => assert_eq!(text, "Hello"),
        _ => panic!("expected a fragment"),
    }
}

#[test]
fn multiline_data_is_joined_with_newlines() {
    let verdict = parse_stream_event("event: output\ndata: line one\ndata: line two\n\n").unwrap();
    match verdict {
        SseVerdict::Fragment(text) => assert_eq!(text, "line one\nline two"),
        _ => panic!("expected a fragment"),
    }
}

#[test]
fn only_one_leading_space_is_stripped_from_data() {
    let verdict = parse_stream_event("event: output\ndata:   indented\n\n").unwrap();
    match verdict {
        SseVerdict::Fragment(text) => assert_eq!(text, "  indented"),
        _ => panic!("expected a fragment"),
    }
}

#[test]
fn trailing_spaces_in_data_are_preserved() {
    let verdict = parse_stream_event("event: output\ndata: Hello, \n\n").unwrap();
    match verdict {
        SseVerdict::Fragment(text) => assert_eq!(text, "Hello, "),
        _ => panic!("expected a fragment"),
    }
}

#[test]
fn done_events_close_the_stream() {
    let verdict = parse_stream_event("event: done\ndata: {}\n\n").unwrap();
    assert!(matches!(verdict, SseVerdict::Done));
}

#[test]
fn error_events_surface_the_detail_field() {
    let err =
        parse_stream_event("event: error\ndata: {\"detail\": \"prediction failed\"}\n\n")
            .unwrap_err();
    match err {
        BlogGenError::ProviderError(message) => assert_eq!(message, "prediction failed"),
        other => panic!("expected a provider error, got {other}"),
    }
}

#[test]
fn error_events_without_json_fall_back_to_the_raw_payload() {
    let err = parse_stream_event("event: error\ndata: out of capacity\n\n").unwrap_err();
    match err {
        BlogGenError::ProviderError(message) => assert_eq!(message, "out of capacity"),
        other => panic!("expected a provider error, got {other}"),
    }
}

#[test]
fn unnamed_events_and_comments_are_ignored() {
    assert!(matches!(
        parse_stream_event("data: stray\n\n").unwrap(),
        SseVerdict::Ignore
    ));
    assert!(matches!(
        parse_stream_event(": keepalive\n\n").unwrap(),
        SseVerdict::Ignore
    ));
}

#[test]
fn prediction_body_carries_parameters_verbatim() {
    let params = GenerationParams::new(0.2, 1.0, 500).unwrap();
    let body = PredictionRequest {
        version: ModelVariant::Llama2_7b.version_id(),
        input: PredictionInput {
            prompt: "A prompt",
            temperature: params.temperature(),
            top_p: params.top_p(),
            max_length: params.max_length(),
            min_new_tokens: MIN_NEW_TOKENS_DISABLED,
        },
        stream: true,
    };
    let json = serde_json::to_string(&body).unwrap();
    assert!(json.contains("\"temperature\":0.2"));
    assert!(json.contains("\"top_p\":1.0"));
    assert!(json.contains("\"max_length\":500"));
    assert!(json.contains("\"min_new_tokens\":-1"));
    assert!(json.contains("\"stream\":true"));
}

#[tokio::test]
async fn generate_assembles_and_trims_streamed_fragments() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    let post_mock = server
        .mock("POST", "/predictions")
        .match_header("authorization", format!("Bearer {TEST_TOKEN}").as_str())
        .match_body(Matcher::Json(json!({
            "version": ModelVariant::Llama2_13b.version_id(),
            "input": {
                "prompt": "Write a blog post about rust",
                "temperature": 0.7,
                "top_p": 0.9,
                "max_length": 300,
                "min_new_tokens": -1,
            },
            "stream": true,
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"id":"p1","urls":{{"stream":"{base}/stream/p1"}}}}"#
        ))
        .create_async()
        .await;

    let stream_mock = server
        .mock("GET", "/stream/p1")
        .match_header("accept", "text/event-stream")
        .with_status(200)
        .with_body(
            "event: output\ndata: Hello, \n\nevent: output\ndata: world!\n\nevent: done\ndata: {}\n\n",
        )
        .create_async()
        .await;

    let client = client_for(&server, GenerationParams::default());
    let text = client.generate("Write a blog post about rust").await.unwrap();

    assert_eq!(text, "Hello, world!");
    post_mock.assert_async().await;
    stream_mock.assert_async().await;
}

#[tokio::test]
async fn generate_trims_whitespace_around_the_assembled_text() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    server
        .mock("POST", "/predictions")
        .with_status(201)
        .with_body(format!(
            r#"{{"id":"p2","urls":{{"stream":"{base}/stream/p2"}}}}"#
        ))
        .create_async()
        .await;

    server
        .mock("GET", "/stream/p2")
        .with_status(200)
        .with_body("event: output\ndata:  padded text \n\nevent: done\ndata: {}\n\n")
        .create_async()
        .await;

    let client = client_for(&server, GenerationParams::default());
    let text = client.generate("anything").await.unwrap();

    assert_eq!(text, "padded text");
}

#[tokio::test]
async fn generate_fails_without_partial_text_on_a_stream_error_event() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    server
        .mock("POST", "/predictions")
        .with_status(201)
        .with_body(format!(
            r#"{{"id":"p3","urls":{{"stream":"{base}/stream/p3"}}}}"#
        ))
        .create_async()
        .await;

    server
        .mock("GET", "/stream/p3")
        .with_status(200)
        .with_body(
            "event: output\ndata: partial\n\nevent: error\ndata: {\"detail\": \"model crashed\"}\n\n",
        )
        .create_async()
        .await;

    let client = client_for(&server, GenerationParams::default());
    let err = client.generate("anything").await.unwrap_err();

    assert!(matches!(err, BlogGenError::ProviderError(_)));
    assert!(err.to_string().contains("model crashed"));
}

#[tokio::test]
async fn generate_requires_a_token_before_any_request_is_made() {
    let client = Replicate::new(
        "",
        ModelVariant::Llama2_7b,
        GenerationParams::default(),
        Some("http://127.0.0.1:9".to_string()),
        None,
    );
    let err = client.generate("anything").await.unwrap_err();
    assert!(matches!(err, BlogGenError::AuthError(_)));
}

#[tokio::test]
async fn generate_surfaces_http_error_statuses_with_the_raw_body() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/predictions")
        .with_status(402)
        .with_body("Payment required")
        .create_async()
        .await;

    let client = client_for(&server, GenerationParams::default());
    let err = client.generate("anything").await.unwrap_err();

    match err {
        BlogGenError::ResponseFormatError {
            message,
            raw_response,
        } => {
            assert!(message.contains("402"));
            assert_eq!(raw_response, "Payment required");
        }
        other => panic!("expected a response format error, got {other}"),
    }
}

#[tokio::test]
async fn generate_surfaces_prediction_level_errors() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/predictions")
        .with_status(201)
        .with_body(r#"{"id":"p4","error":"version not found"}"#)
        .create_async()
        .await;

    let client = client_for(&server, GenerationParams::default());
    let err = client.generate("anything").await.unwrap_err();

    match err {
        BlogGenError::ProviderError(message) => assert_eq!(message, "version not found"),
        other => panic!("expected a provider error, got {other}"),
    }
}

#[tokio::test]
async fn generate_rejects_predictions_without_a_stream_url() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/predictions")
        .with_status(201)
        .with_body(r#"{"id":"p5","urls":{}}"#)
        .create_async()
        .await;

    let client = client_for(&server, GenerationParams::default());
    let err = client.generate("anything").await.unwrap_err();

    match err {
        BlogGenError::ResponseFormatError { message, .. } => {
            assert!(message.contains("stream URL"));
        }
        other => panic!("expected a response format error, got {other}"),
    }
}

#[test]
fn base_url_trailing_slashes_do_not_double_up() {
    let client = Replicate::new(
        TEST_TOKEN,
        ModelVariant::Llama2_7b,
        GenerationParams::default(),
        Some("https://api.replicate.com/v1/".to_string()),
        None,
    );
    assert_eq!(
        client.predictions_url(),
        "https://api.replicate.com/v1/predictions"
    );
}

#[test]
fn default_base_url_is_used_when_none_is_given() {
    let client = Replicate::new(
        TEST_TOKEN,
        ModelVariant::Llama2_7b,
        GenerationParams::default(),
        None,
        None,
    );
    assert_eq!(client.base_url(), DEFAULT_BASE_URL);
}

#[test]
fn config_debug_output_redacts_the_token() {
    let client = Replicate::new(
        TEST_TOKEN,
        ModelVariant::Llama2_7b,
        GenerationParams::default(),
        None,
        None,
    );
    let rendered = format!("{:?}", client.config);
    assert!(!rendered.contains("0123456789"));
}
