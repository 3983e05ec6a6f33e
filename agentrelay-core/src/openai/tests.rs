use super::*;
use crate::runtime::collect_run;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse_body(chunks: &[Value]) -> String {
    let mut body: String = chunks
        .iter()
        .map(|chunk| format!("data: {}\n\n", chunk))
        .collect();
    body.push_str("data: [DONE]\n\n");
    body
}

fn sse_response(chunks: &[Value]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(sse_body(chunks), "text/event-stream")
}

fn text_chunk(text: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion.chunk",
        "choices": [{"index": 0, "delta": {"content": text}, "finish_reason": null}]
    })
}

fn finish_chunk(reason: &str) -> Value {
    json!({"choices": [{"index": 0, "delta": {}, "finish_reason": reason}]})
}

fn usage_chunk(prompt: usize, completion: usize) -> Value {
    json!({
        "choices": [],
        "usage": {
            "prompt_tokens": prompt,
            "completion_tokens": completion,
            "total_tokens": prompt + completion
        }
    })
}

fn runtime_for(server: &MockServer) -> OpenAiRuntime {
    let config = OpenAiConfig::new("test-key").base_url(format!("{}/v1", server.uri()));
    OpenAiRuntime::new(config).unwrap()
}

async fn events_of(runtime: &OpenAiRuntime, prompt: &str) -> Vec<Result<RunEvent, AgentError>> {
    runtime
        .run_stream(prompt, vec![])
        .await
        .unwrap()
        .collect()
        .await
}

#[tokio::test]
async fn test_streams_text_chunks_then_completes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_string_contains("\"stream\":true"))
        .respond_with(sse_response(&[
            text_chunk("Hel"),
            text_chunk("lo"),
            finish_chunk("stop"),
            usage_chunk(10, 2),
        ]))
        .expect(1)
        .mount(&server)
        .await;

    let runtime = runtime_for(&server);
    let events = events_of(&runtime, "Hi").await;

    let events: Vec<RunEvent> = events.into_iter().map(|e| e.unwrap()).collect();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0], RunEvent::Chunk("Hel".into()));
    assert_eq!(events[1], RunEvent::Chunk("lo".into()));

    match &events[2] {
        RunEvent::Completed(output) => {
            assert_eq!(output.content, "Hello");
            let usage = output.usage.unwrap();
            assert_eq!(usage.input_tokens, 10);
            assert_eq!(usage.output_tokens, 2);
            assert_eq!(output.cost(), None);
        }
        other => panic!("expected Completed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_sends_system_prompt_history_and_tools() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("You are a helpful weather assistant."))
        .and(body_string_contains("\"name\":\"get_weather\""))
        .and(body_string_contains("\"content\":\"earlier question\""))
        .and(body_string_contains("\"include_usage\":true"))
        .respond_with(sse_response(&[text_chunk("ok"), finish_chunk("stop")]))
        .expect(1)
        .mount(&server)
        .await;

    let config = OpenAiConfig::new("test-key").base_url(format!("{}/v1", server.uri()));
    let runtime = OpenAiRuntime::for_profile(config, AgentProfile::WeatherChat).unwrap();
    assert_eq!(runtime.name(), "weather_chat");

    let stream = runtime
        .run_stream("What's the weather?", vec![Message::user("earlier question")])
        .await
        .unwrap();
    let output = collect_run(stream).await.unwrap();
    assert_eq!(output.content, "ok");
    assert!(output.usage.is_none());
}

#[tokio::test]
async fn test_tool_call_round_trip() {
    let server = MockServer::start().await;

    // Second turn: the request carries the tool output
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("\"tool_call_id\":\"call_1\""))
        .and(body_string_contains("Tokyo, Japan"))
        .respond_with(sse_response(&[
            text_chunk("It is overcast in Tokyo."),
            finish_chunk("stop"),
            usage_chunk(40, 8),
        ]))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    // First turn: the model asks for the weather tool
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(sse_response(&[
            json!({"choices": [{"index": 0, "delta": {"tool_calls": [{
                "index": 0,
                "id": "call_1",
                "type": "function",
                "function": {"name": "get_weather", "arguments": ""}
            }]}}]}),
            json!({"choices": [{"index": 0, "delta": {"tool_calls": [{
                "index": 0,
                "function": {"arguments": "{\"location\": \"tokyo\"}"}
            }]}}]}),
            finish_chunk("tool_calls"),
            usage_chunk(20, 5),
        ]))
        .expect(1)
        .mount(&server)
        .await;

    let config = OpenAiConfig::new("test-key")
        .base_url(format!("{}/v1", server.uri()))
        .prices(1_000_000.0, 1_000_000.0);
    let runtime = OpenAiRuntime::new(config)
        .unwrap()
        .with_tools(AgentProfile::WeatherChat.registry());

    let output = collect_run(runtime.run_stream("weather in tokyo?", vec![]).await.unwrap())
        .await
        .unwrap();

    assert_eq!(output.content, "It is overcast in Tokyo.");
    let usage = output.usage.unwrap();
    assert_eq!(usage.input_tokens, 60);
    assert_eq!(usage.output_tokens, 13);
    assert_eq!(output.cost(), Some(73.0));
}

#[tokio::test]
async fn test_unknown_tool_is_reported_to_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("tool not found: launch_rocket"))
        .respond_with(sse_response(&[text_chunk("I can't do that."), finish_chunk("stop")]))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(sse_response(&[
            json!({"choices": [{"index": 0, "delta": {"tool_calls": [{
                "index": 0,
                "id": "call_9",
                "function": {"name": "launch_rocket", "arguments": "{}"}
            }]}}]}),
            finish_chunk("tool_calls"),
        ]))
        .expect(1)
        .mount(&server)
        .await;

    let runtime = runtime_for(&server);
    let output = collect_run(runtime.run_stream("go", vec![]).await.unwrap())
        .await
        .unwrap();
    assert_eq!(output.content, "I can't do that.");
}

#[tokio::test]
async fn test_exceeding_tool_rounds_is_model_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(sse_response(&[
            json!({"choices": [{"index": 0, "delta": {"tool_calls": [{
                "index": 0,
                "id": "call_loop",
                "function": {"name": "get_current_time", "arguments": "{}"}
            }]}}]}),
            finish_chunk("tool_calls"),
        ]))
        .expect(3)
        .mount(&server)
        .await;

    let config = OpenAiConfig::new("test-key")
        .base_url(format!("{}/v1", server.uri()))
        .max_tool_rounds(2);
    let runtime = OpenAiRuntime::new(config)
        .unwrap()
        .with_tools(AgentProfile::AgenticChat.registry());

    let err = collect_run(runtime.run_stream("time?", vec![]).await.unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::Model(_)));
    assert_eq!(err.to_string(), "model error: exceeded 2 tool rounds");
}

#[tokio::test]
async fn test_http_errors_are_classified() {
    let cases: [(u16, fn(&AgentError) -> bool); 4] = [
        (401, |e| e.is_auth()),
        (429, |e| e.is_rate_limited()),
        (503, |e| matches!(e, AgentError::ServiceUnavailable(_))),
        (400, |e| matches!(e, AgentError::Model(_))),
    ];

    for (status, check) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {"message": format!("status {}", status), "type": "test"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let runtime = runtime_for(&server);
        let events = events_of(&runtime, "Hi").await;

        assert_eq!(events.len(), 1, "status {}", status);
        let err = events.into_iter().next().unwrap().unwrap_err();
        assert!(check(&err), "status {} gave {:?}", status, err);
        assert!(err.to_string().contains(&format!("status {}", status)));
    }
}

#[tokio::test]
async fn test_malformed_chunk_is_stream_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("data: {\"choices\": [\n\n", "text/event-stream"),
        )
        .mount(&server)
        .await;

    let runtime = runtime_for(&server);
    let events = events_of(&runtime, "Hi").await;
    assert_eq!(events.len(), 1);
    assert!(events[0].as_ref().unwrap_err().is_stream());
}

#[tokio::test]
async fn test_stream_closed_without_done_still_completes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!("data: {}\n\n", text_chunk("partial answer")),
            "text/event-stream",
        ))
        .mount(&server)
        .await;

    let runtime = runtime_for(&server);
    let output = collect_run(runtime.run_stream("Hi", vec![]).await.unwrap())
        .await
        .unwrap();
    assert_eq!(output.content, "partial answer");
}

#[test]
fn test_initial_messages_order() {
    let runtime = OpenAiRuntime::new(OpenAiConfig::new("k"))
        .unwrap()
        .with_system_prompt("be brief");

    let messages = runtime.initial_messages(
        "latest",
        &[Message::user("first"), Message::assistant("reply")],
    );
    let roles: Vec<&str> = messages.iter().map(|m| m.role.as_str()).collect();
    assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
    assert_eq!(messages[3].content.as_deref(), Some("latest"));
}

#[test]
fn test_debug_hides_api_key() {
    let runtime = OpenAiRuntime::new(OpenAiConfig::new("sk-secret")).unwrap();
    assert!(!format!("{:?}", runtime).contains("sk-secret"));
}
