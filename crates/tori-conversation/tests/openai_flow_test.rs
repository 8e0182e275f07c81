use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use tori_conversation::{ConversationError, ConversationService, DriverConfig, Emotion};
use tori_llm::{OpenAIClient, RunRequest};
use tori_persist::FirebaseClient;

fn service_for(server: &mockito::ServerGuard) -> ConversationService {
    let client = Arc::new(
        OpenAIClient::new("test-key")
            .unwrap()
            .with_base_url(server.url()),
    );
    let store = FirebaseClient::builder()
        .database_url(server.url())
        .build()
        .unwrap();

    ConversationService::builder()
        .llm_client(client)
        .store(Arc::new(store))
        .driver_config(
            DriverConfig::new(RunRequest::new("asst_tori"))
                .with_poll_interval(Duration::from_millis(10))
                .with_timeout(Duration::from_secs(5)),
        )
        .fallback_message("잠시 후에 다시 말해줘")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_send_message_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let append = server
        .mock("POST", "/threads/thread_1/messages")
        .match_body(Matcher::Json(json!({"role": "user", "content": "시험 끝났어!"})))
        .with_status(200)
        .with_body(r#"{"id":"msg_1","role":"user","content":[{"type":"text","text":{"value":"시험 끝났어!","annotations":[]}}]}"#)
        .create_async()
        .await;
    let run = server
        .mock("POST", "/threads/thread_1/runs")
        .match_body(Matcher::PartialJson(json!({"assistant_id": "asst_tori"})))
        .with_status(200)
        .with_body(r#"{"id":"run_1","thread_id":"thread_1","status":"queued"}"#)
        .create_async()
        .await;
    let poll = server
        .mock("GET", "/threads/thread_1/runs/run_1")
        .with_status(200)
        .with_body(r#"{"id":"run_1","thread_id":"thread_1","status":"completed"}"#)
        .create_async()
        .await;
    let latest = server
        .mock("GET", Matcher::Regex(r"^/threads/thread_1/messages".to_string()))
        .with_status(200)
        .with_body(
            json!({
                "object": "list",
                "data": [{
                    "id": "msg_2",
                    "role": "assistant",
                    "content": [{"type": "text", "text": {"value": "와, 고생 많았어!", "annotations": []}}]
                }],
                "has_more": false
            })
            .to_string(),
        )
        .create_async()
        .await;

    let reply = service_for(&server)
        .send_message("thread_1", "시험 끝났어!")
        .await
        .unwrap();

    assert_eq!(reply, "와, 고생 많았어!");
    append.assert_async().await;
    run.assert_async().await;
    poll.assert_async().await;
    latest.assert_async().await;
}

#[tokio::test]
async fn test_expired_run_falls_back() {
    let mut server = mockito::Server::new_async().await;
    let _append = server
        .mock("POST", "/threads/thread_1/messages")
        .with_status(200)
        .with_body(r#"{"id":"msg_1","role":"user","content":[]}"#)
        .create_async()
        .await;
    let _run = server
        .mock("POST", "/threads/thread_1/runs")
        .with_status(200)
        .with_body(r#"{"id":"run_1","thread_id":"thread_1","status":"queued"}"#)
        .create_async()
        .await;
    let _poll = server
        .mock("GET", "/threads/thread_1/runs/run_1")
        .with_status(200)
        .with_body(r#"{"id":"run_1","thread_id":"thread_1","status":"expired"}"#)
        .create_async()
        .await;

    let reply = service_for(&server)
        .send_message("thread_1", "hello")
        .await
        .unwrap();

    assert_eq!(reply, "잠시 후에 다시 말해줘");
}

#[tokio::test]
async fn test_run_creation_error_propagates() {
    let mut server = mockito::Server::new_async().await;
    let _append = server
        .mock("POST", "/threads/thread_1/messages")
        .with_status(200)
        .with_body(r#"{"id":"msg_1","role":"user","content":[]}"#)
        .create_async()
        .await;
    let _run = server
        .mock("POST", "/threads/thread_1/runs")
        .with_status(400)
        .with_body(r#"{"error":{"message":"Thread already has an active run"}}"#)
        .create_async()
        .await;

    let err = service_for(&server)
        .send_message("thread_1", "hello")
        .await
        .unwrap_err();

    assert!(matches!(err, ConversationError::RunCreationFailed { .. }));
}

#[tokio::test]
async fn test_summarize_thread_from_store() {
    let mut server = mockito::Server::new_async().await;
    let _tree = server
        .mock("GET", "/conversations.json")
        .with_status(200)
        .with_body(
            json!({
                "2024-06-01": {
                    "threadId": "thread_1",
                    "messages": [
                        {"role": "assistant", "content": "오늘 어땠어?"},
                        {"role": "user", "content": "친구랑 한강 갔어"}
                    ]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let chat = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-4o-mini",
            "response_format": {"type": "json_schema", "json_schema": {"name": "diary_summary"}}
        })))
        .with_status(200)
        .with_body(
            json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "created": 1,
                "model": "gpt-4o-mini",
                "choices": [{
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": "{\"emotion\":\"happy\",\"summary\":[{\"content\":\"친구와 한강에 갔다.\"},{\"content\":\"오늘 어땠어?\"}]}",
                        "refusal": null
                    },
                    "finish_reason": "stop"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (date, result) = service_for(&server)
        .summarize_thread("thread_1", None)
        .await
        .unwrap();

    assert_eq!(date, "2024-06-01");
    assert_eq!(result.emotion, Emotion::Happy);
    assert_eq!(result.summary.len(), 1);
    assert_eq!(result.summary[0].content, "친구와 한강에 갔다.");
    chat.assert_async().await;
}
