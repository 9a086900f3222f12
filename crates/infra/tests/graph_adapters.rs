//! Graph adapters against a mock Graph server.

mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use daybrief_core::{
    AccessToken, DayWindow, DeliveryChannel, Digest, DirectoryGateway, ScheduleAnalyzer,
    TokenProvider,
};
use daybrief_domain::{ChannelKind, DigestError, Member};
use daybrief_infra::{
    ClientCredentialsAuthenticator, GraphChatChannel, GraphClient, GraphDirectory,
    GraphFileDropChannel, GraphMailChannel,
};
use serde_json::json;
use support::{analysis_date, config_for, graph_event, init_tracing, token_path, user, SENDER};
use wiremock::matchers::{body_partial_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token() -> AccessToken {
    AccessToken::new("test-token")
}

fn member() -> Member {
    Member {
        id: "u-1".into(),
        display_name: "Ana Souza".into(),
        mail: "ana@example.com".into(),
        chat_identity: "u-1".into(),
    }
}

fn graph(server: &MockServer) -> GraphClient {
    GraphClient::from_config(&config_for(server)).unwrap()
}

fn digest(server: &MockServer) -> Digest {
    let config = config_for(server);
    let analyzer = ScheduleAnalyzer::from_config(&config.schedule).unwrap();
    let day = DayWindow::for_date(analysis_date(), analyzer.timezone()).unwrap();
    Digest::new(member(), &day, Vec::new(), analyzer.analyze(&[], analysis_date()))
}

#[tokio::test]
async fn token_exchange_retries_transient_failures() {
    init_tracing();
    let server = MockServer::start().await;
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    Mock::given(method("POST"))
        .and(path(token_path()))
        .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
            if seen.fetch_add(1, Ordering::SeqCst) < 2 {
                ResponseTemplate::new(503)
            } else {
                ResponseTemplate::new(200).set_body_json(json!({"access_token": "fresh"}))
            }
        })
        .expect(3)
        .mount(&server)
        .await;

    let auth = ClientCredentialsAuthenticator::from_config(&config_for(&server)).unwrap();
    let token = auth.acquire_token().await.unwrap();
    assert_eq!(token.secret(), "fresh");
}

#[tokio::test]
async fn token_exchange_returns_second_attempt_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(token_path()))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(token_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "second"})))
        .expect(1)
        .mount(&server)
        .await;

    let auth = ClientCredentialsAuthenticator::from_config(&config_for(&server)).unwrap();
    let token = auth.acquire_token().await.unwrap();
    assert_eq!(token.secret(), "second");
}

#[tokio::test]
async fn token_exchange_gives_up_after_attempt_cap() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(token_path()))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let auth = ClientCredentialsAuthenticator::from_config(&config_for(&server)).unwrap();
    let err = auth.acquire_token().await.unwrap_err();
    assert!(matches!(err, DigestError::Authentication(msg) if msg.contains("3 attempt")));
}

#[tokio::test]
async fn roster_follows_next_links() {
    let server = MockServer::start().await;
    let next = format!("{}/users?$skiptoken=page2", server.uri());
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("$select", "id,displayName,mail,userPrincipalName"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [user("u-1", "Ana", Some("ana@example.com"))],
            "@odata.nextLink": next,
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("$skiptoken", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [user("u-2", "Bruno", None)],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let entries = GraphDirectory::new(graph(&server)).list_members(&token()).await.unwrap();
    let ids: Vec<_> = entries.iter().filter_map(|e| e.id.as_deref()).collect();
    assert_eq!(ids, vec!["u-1", "u-2"]);
    assert_eq!(entries[1].user_principal_name.as_deref(), Some("u-2@example.com"));
}

#[tokio::test]
async fn empty_roster_is_a_data_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .mount(&server)
        .await;

    let err = GraphDirectory::new(graph(&server)).list_members(&token()).await.unwrap_err();
    assert!(matches!(err, DigestError::Data(_)));
}

#[tokio::test]
async fn calendar_view_requests_utc_and_maps_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/u-1/calendarView"))
        .and(query_param("startDateTime", "2024-05-06T00:00:00Z"))
        .and(query_param("endDateTime", "2024-05-07T00:00:00Z"))
        .and(header("Prefer", r#"outlook.timezone="UTC""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                graph_event("e-1", "Standup", "2024-05-06T09:00:00.0000000", "2024-05-06T09:15:00.0000000"),
                graph_event("e-2", "Broken", "2024-05-06T11:00:00", "2024-05-06T10:00:00"),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let day = DayWindow::for_date(analysis_date(), chrono_tz::UTC).unwrap();
    let events = GraphDirectory::new(graph(&server))
        .events_for_day(&token(), &member(), &day)
        .await
        .unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].subject, "Standup");
}

#[tokio::test]
async fn calendar_client_error_is_permanent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/u-1/calendarView"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let day = DayWindow::for_date(analysis_date(), chrono_tz::UTC).unwrap();
    let err = GraphDirectory::new(graph(&server))
        .events_for_day(&token(), &member(), &day)
        .await
        .unwrap_err();
    assert!(matches!(err, DigestError::PermanentRequest(_)));
}

#[tokio::test]
async fn mail_accepts_empty_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/users/{}/sendMail", urlencoding::encode(SENDER))))
        .and(body_partial_json(json!({
            "saveToSentItems": "false",
            "message": {
                "subject": "Your agenda for today - 2024-05-06",
                "body": {"contentType": "HTML"},
                "toRecipients": [{"emailAddress": {"address": "ana@example.com"}}]
            }
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let channel = GraphMailChannel::new(graph(&server), SENDER, Arc::default());
    let outcome = channel.deliver(&token(), &digest(&server)).await;
    assert!(outcome.success, "{outcome:?}");
    assert_eq!(outcome.channel, ChannelKind::Email);
}

#[tokio::test]
async fn chat_opens_conversation_then_posts() {
    let server = MockServer::start().await;
    let sender_bind = format!("{}/users/{SENDER}", server.uri());
    let member_bind = format!("{}/users/u-1", server.uri());
    Mock::given(method("POST"))
        .and(path("/chats"))
        .and(body_partial_json(json!({
            "chatType": "oneOnOne",
            "members": [
                {"@odata.type": "#microsoft.graph.aadUserConversationMember", "roles": ["owner"], "user@odata.bind": sender_bind},
                {"@odata.type": "#microsoft.graph.aadUserConversationMember", "roles": ["owner"], "user@odata.bind": member_bind}
            ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "chat-9"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chats/chat-9/messages"))
        .and(body_partial_json(json!({"body": {"contentType": "text"}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "msg-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let channel = GraphChatChannel::new(graph(&server), SENDER, Arc::default());
    let outcome = channel.deliver(&token(), &digest(&server)).await;
    assert!(outcome.success, "{outcome:?}");
}

#[tokio::test]
async fn chat_without_id_fails_before_posting() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chats"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"chatType": "oneOnOne"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex("^/chats/.+/messages$"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let channel = GraphChatChannel::new(graph(&server), SENDER, Arc::default());
    let outcome = channel.deliver(&token(), &digest(&server)).await;
    assert!(!outcome.success);
    assert!(outcome.detail.unwrap().contains("no id"));
}

#[tokio::test]
async fn file_drop_reports_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/u-1/drive/root:/Daily%20Agenda/Agenda%20-%202024-05-06.txt:/content"))
        .and(header("Content-Type", "text/plain; charset=utf-8"))
        .respond_with(ResponseTemplate::new(403).set_body_json(
            json!({"error": {"code": "accessDenied", "message": "no drive access"}}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let channel = GraphFileDropChannel::new(graph(&server), "Daily Agenda", Arc::default());
    let outcome = channel.deliver(&token(), &digest(&server)).await;
    assert!(!outcome.success);
    assert!(outcome.detail.unwrap().contains("accessDenied"));
}
