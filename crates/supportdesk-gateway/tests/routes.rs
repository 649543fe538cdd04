// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router tests driving every route through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use supportdesk_core::{ChatMessage, StreamEvent, SupportError, UnavailableProvider};
use supportdesk_test_utils::{MockProvider, TestHarness};
use tower::ServiceExt;

fn conversation() -> Value {
    serde_json::to_value(vec![
        ChatMessage::user("my app is down"),
        ChatMessage::assistant("Which page fails?"),
        ChatMessage::user("the login page"),
    ])
    .unwrap()
}

fn ticket_body(title: &str) -> Value {
    json!({
        "title": title,
        "customerName": "Ada Lovelace",
        "customerEmail": "ada@example.com",
        "messages": conversation(),
    })
}

// --- chat ---

#[tokio::test]
async fn chat_streams_only_text_deltas() {
    let mock = MockProvider::new().with_stream(vec![
        Ok(StreamEvent::Other {
            kind: "response.created".into(),
        }),
        Ok(StreamEvent::TextDelta("Try ".into())),
        Ok(StreamEvent::TextDelta(String::new())),
        Ok(StreamEvent::TextDelta("clearing cookies.".into())),
        Ok(StreamEvent::Other {
            kind: "response.completed".into(),
        }),
    ]);
    let harness = TestHarness::builder().with_mock(mock).build().unwrap();

    let response = harness
        .send_json(
            Method::POST,
            "/api/ai/support-chat",
            Some(json!({ "messages": conversation() })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(response.headers[header::CACHE_CONTROL], "no-store");
    assert_eq!(response.text(), "Try clearing cookies.");

    let instructions = harness.mock().last_instructions().await.unwrap();
    assert!(instructions.starts_with("You are a support assistant"));
    assert_eq!(harness.mock().last_messages().await.unwrap().len(), 3);
}

#[tokio::test]
async fn chat_rejects_empty_messages() {
    let harness = TestHarness::new().unwrap();

    for body in [json!({ "messages": [] }), json!({}), json!({ "messages": null })] {
        let response = harness
            .send_json(Method::POST, "/api/ai/support-chat", Some(body))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.json()["error"], "At least one message is required.");
    }
    assert_eq!(harness.mock().chat_calls(), 0);
}

#[tokio::test]
async fn chat_with_malformed_json_is_bad_request() {
    let harness = TestHarness::new().unwrap();
    let response = harness
        .send_raw(Method::POST, "/api/ai/support-chat", "{\"messages\": [")
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["error"].is_string());
}

#[tokio::test]
async fn chat_without_json_content_type_is_bad_request() {
    let harness = TestHarness::new().unwrap();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/ai/support-chat")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(json!({ "messages": conversation() }).to_string()))
        .unwrap();

    let response = harness.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"].is_string());
    assert_eq!(harness.mock().chat_calls(), 0);
}

#[tokio::test]
async fn chat_provider_failure_is_server_error() {
    let mock = MockProvider::new()
        .with_stream_failure(SupportError::upstream("OpenAI chat request failed after 3 attempt(s)"));
    let harness = TestHarness::builder().with_mock(mock).build().unwrap();

    let response = harness
        .send_json(
            Method::POST,
            "/api/ai/support-chat",
            Some(json!({ "messages": conversation() })),
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        response.json()["error"]
            .as_str()
            .unwrap()
            .contains("after 3 attempt(s)")
    );
}

#[tokio::test]
async fn chat_without_api_key_is_server_error() {
    let harness = TestHarness::builder()
        .with_provider(Arc::new(UnavailableProvider::new("missing OpenAI API key")))
        .build()
        .unwrap();

    let response = harness
        .send_json(
            Method::POST,
            "/api/ai/support-chat",
            Some(json!({ "messages": conversation() })),
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().contains("missing OpenAI API key"));
}

#[tokio::test]
async fn chat_mid_stream_failure_keeps_sent_text_and_aborts_body() {
    let mock = MockProvider::new().with_stream(vec![
        Ok(StreamEvent::TextDelta("partial".into())),
        Err(SupportError::upstream("connection reset")),
    ]);
    let harness = TestHarness::builder().with_mock(mock).build().unwrap();

    let response = harness
        .send_json(
            Method::POST,
            "/api/ai/support-chat",
            Some(json!({ "messages": conversation() })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text().starts_with("body error"));

    let probes = harness.mock().source_probes().await;
    assert!(probes[0].is_dropped());
}

// --- tickets ---

#[tokio::test]
async fn create_ticket_uses_model_summary() {
    let mock = MockProvider::new().with_completion("Issue:\nLogin page fails\n");
    let harness = TestHarness::builder().with_mock(mock).build().unwrap();

    let response = harness
        .send_json(
            Method::POST,
            "/api/support/tickets",
            Some(ticket_body("  Login broken  ")),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let ticket = &response.json()["ticket"];
    assert_eq!(ticket["title"], "Login broken");
    assert_eq!(ticket["status"], "open");
    assert_eq!(ticket["summary"], "Issue:\nLogin page fails");
    assert_eq!(ticket["createdAt"], ticket["updatedAt"]);
    assert_eq!(ticket["messages"].as_array().unwrap().len(), 3);

    let prompt = harness.mock().last_prompt().await.unwrap();
    assert!(prompt.contains("USER: my app is down\nASSISTANT: Which page fails?"));
}

#[tokio::test]
async fn create_ticket_falls_back_when_summary_fails() {
    let mock = MockProvider::new().with_completion_failure(SupportError::upstream("Server error 500"));
    let harness = TestHarness::builder().with_mock(mock).build().unwrap();

    let response = harness
        .send_json(Method::POST, "/api/support/tickets", Some(ticket_body("Down")))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let summary = response.json()["ticket"]["summary"].as_str().unwrap().to_string();
    assert!(summary.starts_with("Issue:\nthe login page\n"), "{summary}");
}

#[tokio::test]
async fn create_ticket_requires_every_field() {
    let harness = TestHarness::new().unwrap();
    let mut missing_email = ticket_body("t");
    missing_email["customerEmail"] = json!("   ");
    let mut no_messages = ticket_body("t");
    no_messages["messages"] = json!([]);

    for body in [missing_email, no_messages, json!({})] {
        let response = harness
            .send_json(Method::POST, "/api/support/tickets", Some(body))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json()["error"],
            "title, customerName, customerEmail and messages are required."
        );
    }
    assert_eq!(harness.mock().complete_calls(), 0);
}

#[tokio::test]
async fn list_returns_most_recently_updated_first() {
    let harness = TestHarness::new().unwrap();
    let mut ids = Vec::new();
    for title in ["first", "second", "third"] {
        let response = harness
            .send_json(Method::POST, "/api/support/tickets", Some(ticket_body(title)))
            .await;
        ids.push(response.json()["ticket"]["id"].as_str().unwrap().to_string());
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let response = harness
        .send_json(
            Method::PATCH,
            &format!("/api/support/tickets/{}", ids[0]),
            Some(json!({ "status": "in_progress" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["ticket"]["status"], "in_progress");

    let response = harness
        .send_json(Method::GET, "/api/support/tickets", None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let titles: Vec<String> = response.json()["tickets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, ["first", "third", "second"]);
}

#[tokio::test]
async fn status_update_validates_status() {
    let harness = TestHarness::new().unwrap();
    let created = harness
        .send_json(Method::POST, "/api/support/tickets", Some(ticket_body("t")))
        .await;
    let id = created.json()["ticket"]["id"].as_str().unwrap().to_string();

    for body in [json!({ "status": "closed" }), json!({ "status": "Open" }), json!({})] {
        let response = harness
            .send_json(
                Method::PATCH,
                &format!("/api/support/tickets/{id}"),
                Some(body),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json()["error"],
            "status must be one of: open, in_progress, resolved"
        );
    }
}

#[tokio::test]
async fn status_update_for_unknown_id_is_not_found_and_writes_nothing() {
    let harness = TestHarness::new().unwrap();
    harness
        .send_json(Method::POST, "/api/support/tickets", Some(ticket_body("t")))
        .await;
    let before = std::fs::read(harness.tickets_path()).unwrap();

    let response = harness
        .send_json(
            Method::PATCH,
            "/api/support/tickets/no-such-ticket",
            Some(json!({ "status": "resolved" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "Ticket not found.");
    assert_eq!(std::fs::read(harness.tickets_path()).unwrap(), before);
}

#[tokio::test]
async fn corrupt_store_is_server_error() {
    let harness = TestHarness::new().unwrap();
    let path = harness.tickets_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, "not json").unwrap();

    let response = harness
        .send_json(Method::GET, "/api/support/tickets", None)
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.json()["error"].as_str().unwrap().contains("persistence"));
}

// --- health ---

#[tokio::test]
async fn health_reports_version() {
    let harness = TestHarness::new().unwrap();
    let response = harness.send_json(Method::GET, "/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_secs"].is_u64());
}
