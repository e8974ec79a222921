use std::sync::Arc;

use chatdock_client::{
    ChatApi, ChatApiConfig, ChatApiHandler, ClientError, HistoryEntry, HistoryKind,
    QueryEndpoint, QueryReply, SendOptions, UNRECOGNIZED_REPLY,
};
use chatdock_ui::{HandlerReply, MessageHandler};
use pretty_assertions::assert_eq;
use serde_json::{Map, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ChatApi {
    ChatApi::new(ChatApiConfig::new(server.uri()).with_session_id("session-1")).unwrap()
}

#[tokio::test]
async fn send_message_posts_the_query_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/query"))
        .and(query_param("team_name", "OA-TEST"))
        .and(query_param("version", "1.0.0"))
        .and(header("x-tenant", "acme"))
        .and(body_json(json!({
            "session_id": "session-1",
            "team_name": "OA-TEST",
            "version": "1.0.0",
            "query": "hello"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"content": "**hi**"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reply = api_for(&server)
        .send_message("hello", SendOptions::default().with_header("X-Tenant", "acme"))
        .await
        .unwrap();

    assert_eq!(reply, QueryReply::Markdown("**hi**".to_string()));
}

#[tokio::test]
async fn configured_team_routes_the_query_while_the_body_keeps_fixed_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/query"))
        .and(query_param("team_name", "ACME"))
        .and(query_param("version", "2.0"))
        .and(body_json(json!({
            "session_id": "session-1",
            "team_name": "OA-TEST",
            "version": "1.0.0",
            "query": "q"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = ChatApiConfig::new(server.uri()).with_session_id("session-1");
    config.team_name = "ACME".to_string();
    config.version = "2.0".to_string();
    let api = ChatApi::new(config).unwrap();

    let reply = api.send_message("q", SendOptions::default()).await.unwrap();

    assert_eq!(reply, QueryReply::Plain("ok".to_string()));
}

#[tokio::test]
async fn metadata_and_endpoint_variant_are_honored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/query-config"))
        .and(body_json(json!({
            "session_id": "session-1",
            "team_name": "OA-TEST",
            "version": "1.0.0",
            "query": "hi",
            "metadata": {"page": "pricing"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"reply": "sure"}})))
        .mount(&server)
        .await;

    let api = ChatApi::new(
        ChatApiConfig::new(server.uri())
            .with_session_id("session-1")
            .with_endpoint(QueryEndpoint::QueryConfig),
    )
    .unwrap();
    let mut metadata = Map::new();
    metadata.insert("page".to_string(), json!("pricing"));

    let reply = api
        .send_message("hi", SendOptions::default().with_metadata(metadata))
        .await
        .unwrap();

    assert_eq!(reply, QueryReply::Plain("sure".to_string()));
}

#[tokio::test]
async fn history_is_returned_in_chronological_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chat/history"))
        .and(query_param("session_id", "session-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"type": "AssistantMessage", "content": "b"},
            {"type": "UserMessage", "content": "a"}
        ])))
        .mount(&server)
        .await;

    let history = api_for(&server)
        .fetch_history(&Default::default())
        .await
        .unwrap();

    assert_eq!(
        history,
        vec![
            HistoryEntry {
                kind: HistoryKind::UserMessage,
                content: "a".to_string(),
            },
            HistoryEntry {
                kind: HistoryKind::AssistantMessage,
                content: "b".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn non_array_history_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chat/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"messages": []})))
        .mount(&server)
        .await;

    let error = api_for(&server)
        .fetch_history(&Default::default())
        .await
        .unwrap_err();

    assert!(matches!(error, ClientError::UnexpectedPayload { .. }));
}

#[tokio::test]
async fn handler_renders_markdown_replies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/query"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"content": "**ok**"}})),
        )
        .mount(&server)
        .await;

    let handler = ChatApiHandler::new(Arc::new(api_for(&server)));
    let reply = handler.handle("q".to_string()).await.unwrap();

    assert_eq!(reply, HandlerReply::markup("<p><strong>ok</strong></p>\n", true));
}

#[tokio::test]
async fn handler_flags_unexpected_shapes_and_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/query"))
        .and(body_json(json!({
            "session_id": "session-1",
            "team_name": "OA-TEST",
            "version": "1.0.0",
            "query": "odd"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"x": 1}})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/query"))
        .and(body_json(json!({
            "session_id": "session-1",
            "team_name": "OA-TEST",
            "version": "1.0.0",
            "query": "fail"
        })))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let handler = ChatApiHandler::new(Arc::new(api_for(&server)));

    let reply = handler.handle("odd".to_string()).await.unwrap();
    assert_eq!(reply, HandlerReply::markup(UNRECOGNIZED_REPLY, false));

    let error = handler.handle("fail".to_string()).await.unwrap_err();
    assert!(error.to_string().contains("HTTP 503"));
}
