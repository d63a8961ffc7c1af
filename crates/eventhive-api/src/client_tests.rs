//! Unit and wiremock tests for the EventHiveClient.

use super::*;

fn fast_client(base_url: impl Into<String>) -> EventHiveClient {
    EventHiveClient::builder()
        .base_url(base_url)
        .initial_backoff(Duration::from_millis(1))
        .max_backoff(Duration::from_millis(5))
        .build()
        .unwrap()
}

#[test]
fn test_builder_default_values() {
    let client = EventHiveClientBuilder::new().build().unwrap();

    assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    assert_eq!(client.max_retries(), DEFAULT_MAX_RETRIES);
    assert_eq!(
        client.initial_backoff(),
        Duration::from_secs(DEFAULT_INITIAL_BACKOFF_SECS)
    );
    assert_eq!(
        client.max_backoff(),
        Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS)
    );
}

#[test]
fn test_builder_chaining() {
    let client = EventHiveClient::builder()
        .base_url("https://events.example.com/")
        .max_retries(5)
        .initial_backoff(Duration::from_millis(500))
        .max_backoff(Duration::from_secs(60))
        .request_timeout(Duration::from_secs(45))
        .build()
        .unwrap();

    assert_eq!(client.base_url(), "https://events.example.com");
    assert_eq!(client.max_retries(), 5);
    assert_eq!(client.initial_backoff(), Duration::from_millis(500));
    assert_eq!(client.max_backoff(), Duration::from_secs(60));
}

#[test]
fn test_default_timeout_constant() {
    assert_eq!(DEFAULT_TIMEOUT_SECS, 30);
}

#[test]
fn test_debug_output() {
    let client = EventHiveClient::with_base_url("http://localhost:9999").unwrap();
    let debug = format!("{:?}", client);
    assert!(debug.contains("localhost:9999"));
}

#[test]
fn test_calculate_backoff_defaults() {
    let config = RetryConfig::default();

    assert_eq!(config.calculate_backoff(0, None), Duration::from_secs(1));
    assert_eq!(config.calculate_backoff(1, None), Duration::from_secs(2));
    assert_eq!(config.calculate_backoff(2, None), Duration::from_secs(4));
    assert_eq!(
        config.calculate_backoff(10, None),
        Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS)
    );
    assert_eq!(config.calculate_backoff(0, Some(5)), Duration::from_secs(5));
    assert_eq!(
        config.calculate_backoff(0, Some(120)),
        Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS)
    );
}

#[test]
fn test_validate_event_id() {
    assert_eq!(validate_event_id(" 65a1f0c2e4b0 "), Ok("65a1f0c2e4b0"));
    assert_eq!(validate_event_id("event_42-b"), Ok("event_42-b"));
    assert!(validate_event_id("").is_err());
    assert!(validate_event_id("../admin").is_err());
    assert!(validate_event_id("1?x=2").is_err());
}

mod wiremock_tests {
    use super::*;
    use crate::models::Cost;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    fn admin_session() -> Session {
        Session::from_token("admin-token", Role::Admin)
    }

    fn sample_events() -> serde_json::Value {
        json!([
            {
                "_id": "1",
                "title": "Rust Workshop",
                "venue": "Pune",
                "event_type": "workshop",
                "start_date": "2024-01-10",
                "start_time": "10:00",
                "cost": "0"
            },
            {
                "_id": "2",
                "title": "Jazz Night",
                "venue": "Mumbai",
                "event_type": "concert",
                "start_date": "2024-01-13",
                "start_time": "20:00",
                "cost": 499
            }
        ])
    }

    #[tokio::test]
    async fn test_health() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/test/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"message": "connected"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = fast_client(mock_server.uri());
        let health = client.health().await.unwrap();
        assert_eq!(health.message, "connected");
    }

    #[tokio::test]
    async fn test_list_events_without_auth() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/events/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_events()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = fast_client(mock_server.uri());
        let decoded = client.list_events().await.unwrap();

        assert_eq!(decoded.events.len(), 2);
        assert!(decoded.rejected.is_empty());
        assert_eq!(decoded.events[0].title, "Rust Workshop");
        assert!(decoded.events[0].is_free());
        assert_eq!(decoded.events[1].cost, Some(Cost::Number(499.0)));

        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[test_log::test(tokio::test)]
    async fn test_list_events_drops_malformed_records() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/events/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "1", "title": "Kept"},
                {"title": "No id"},
                {"_id": "3", "title": ""},
                {"_id": "4", "title": "Also kept", "venue": null}
            ])))
            .mount(&mock_server)
            .await;

        let client = fast_client(mock_server.uri());
        let decoded = client.list_events().await.unwrap();

        let titles: Vec<_> = decoded.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Kept", "Also kept"]);
        let rejected: Vec<_> = decoded.rejected.iter().map(|r| r.index).collect();
        assert_eq!(rejected, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_list_events_rejects_non_array_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/events/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": []})))
            .mount(&mock_server)
            .await;

        let client = fast_client(mock_server.uri());
        let err = client.list_events().await.unwrap_err();
        assert!(matches!(err, Error::InvalidPayload(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_list_admin_events_sends_bearer_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/admin/admin_events/"))
            .and(header("Authorization", "Bearer admin-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_events()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = fast_client(mock_server.uri());
        let decoded = client.list_admin_events(&admin_session()).await.unwrap();
        assert_eq!(decoded.events.len(), 2);
    }

    #[tokio::test]
    async fn test_list_admin_events_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/admin/admin_events/"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid token"})),
            )
            .mount(&mock_server)
            .await;

        let client = fast_client(mock_server.uri());
        let err = client
            .list_admin_events(&admin_session())
            .await
            .unwrap_err();

        match err {
            Error::Api(ApiError::Auth { message }) => assert_eq!(message, "Invalid token"),
            e => panic!("Expected Auth error, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_sign_in_user_endpoint() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/signin/"))
            .and(body_json(json!({"email": "ada@example.com", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "user-tok"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = fast_client(mock_server.uri());
        let request = SignInRequest::new("ada@example.com", "pw").unwrap();
        let session = client.sign_in(&request, Role::User).await.unwrap();

        assert_eq!(session.token, "user-tok");
        assert_eq!(session.role, Role::User);
        assert_eq!(session.email.as_deref(), Some("ada@example.com"));
        assert!(session.created_at.is_some());
    }

    #[tokio::test]
    async fn test_sign_in_admin_endpoint() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/admin/signin/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "adm"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = fast_client(mock_server.uri());
        let request = SignInRequest::new("root@example.com", "pw").unwrap();
        let session = client.sign_in(&request, Role::Admin).await.unwrap();
        assert!(session.is_admin());
    }

    #[tokio::test]
    async fn test_sign_in_bad_credentials() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/signin/"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid credentials"})),
            )
            .mount(&mock_server)
            .await;

        let client = fast_client(mock_server.uri());
        let request = SignInRequest::new("ada@example.com", "wrong").unwrap();
        let err = client.sign_in(&request, Role::User).await.unwrap_err();

        match err {
            Error::Api(ApiError::Validation { message, .. }) => {
                assert_eq!(message, "Invalid credentials")
            }
            e => panic!("Expected Validation error, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_sign_in_empty_token_is_invalid_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/signin/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": ""})))
            .mount(&mock_server)
            .await;

        let client = fast_client(mock_server.uri());
        let request = SignInRequest::new("ada@example.com", "pw").unwrap();
        let err = client.sign_in(&request, Role::User).await.unwrap_err();
        assert!(matches!(err, Error::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn test_sign_up_ignores_response_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/signup/"))
            .and(body_json(
                json!({"name": "Ada", "email": "ada@example.com", "password": "pw"}),
            ))
            .respond_with(ResponseTemplate::new(201).set_body_string("created"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = fast_client(mock_server.uri());
        let request = SignUpRequest::new("Ada", "ada@example.com", "pw", "pw").unwrap();
        client.sign_up(&request).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_event_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/user/events/abc123/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "abc123",
                "title": "Jazz Night",
                "description": "Live music",
                "end_date": "2024-01-13",
                "image_base64": "aGk="
            })))
            .mount(&mock_server)
            .await;

        let client = fast_client(mock_server.uri());
        let event = client.get_event("abc123").await.unwrap();

        assert_eq!(event.id, "abc123");
        assert_eq!(event.description.as_deref(), Some("Live music"));
        assert_eq!(event.decode_image().unwrap().unwrap(), b"hi");
    }

    #[tokio::test]
    async fn test_get_event_not_found_names_the_event() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/user/events/missing/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = fast_client(mock_server.uri());
        let err = client.get_event("missing").await.unwrap_err();

        assert_eq!(
            err.as_api_error(),
            Some(&ApiError::NotFound {
                resource: "event".to_string(),
                id: "missing".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_get_event_rejects_unsafe_id_without_request() {
        let mock_server = MockServer::start().await;

        let client = fast_client(mock_server.uri());
        let err = client.get_event("../admin").await.unwrap_err();

        assert!(matches!(err, Error::Api(ApiError::Validation { .. })));
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_event_posts_draft_with_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/admin/create_event/"))
            .and(header("Authorization", "Bearer admin-token"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "ok"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let draft = EventDraft {
            title: "Rust Meetup".to_string(),
            venue: "Pune".to_string(),
            start_date: "2024-01-10".to_string(),
            end_date: "2024-01-10".to_string(),
            start_time: "18:00".to_string(),
            end_time: "20:00".to_string(),
            cost: "0".to_string(),
            ..EventDraft::default()
        }
        .with_image_bytes(b"img");

        let client = fast_client(mock_server.uri());
        client
            .create_event(&admin_session(), &draft)
            .await
            .unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["eventType"], "ONLINE");
        assert_eq!(body["image_base64"], "aW1n");
    }

    #[tokio::test]
    async fn test_create_event_invalid_draft_is_not_sent() {
        let mock_server = MockServer::start().await;

        let client = fast_client(mock_server.uri());
        let err = client
            .create_event(&admin_session(), &EventDraft::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Api(ApiError::Validation { .. })));
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_description() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/admin/ai_description/"))
            .and(header("Authorization", "Bearer admin-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"description": "An evening of Rust."})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let request = DescriptionRequest {
            title: "Rust Meetup".to_string(),
            venue: "Pune".to_string(),
            start_date: "2024-01-10".to_string(),
            end_date: "2024-01-10".to_string(),
            start_time: "18:00".to_string(),
            end_time: "20:00".to_string(),
            cost: "0".to_string(),
        };

        let client = fast_client(mock_server.uri());
        let description = client
            .generate_description(&admin_session(), &request)
            .await
            .unwrap();
        assert_eq!(description, "An evening of Rust.");
    }

    #[tokio::test]
    async fn test_get_retry_on_429_then_success() {
        let mock_server = MockServer::start().await;
        let call_count = Arc::new(AtomicU32::new(0));

        struct RetryThenSuccessResponder {
            call_count: Arc<AtomicU32>,
        }

        impl Respond for RetryThenSuccessResponder {
            fn respond(&self, _request: &Request) -> ResponseTemplate {
                let count = self.call_count.fetch_add(1, Ordering::SeqCst);
                if count == 0 {
                    ResponseTemplate::new(429)
                        .insert_header("Retry-After", "1")
                        .set_body_string("Rate limited")
                } else {
                    ResponseTemplate::new(200).set_body_json(json!({"message": "ok"}))
                }
            }
        }

        Mock::given(method("GET"))
            .and(path("/api/test/"))
            .respond_with(RetryThenSuccessResponder {
                call_count: call_count.clone(),
            })
            .expect(2)
            .mount(&mock_server)
            .await;

        let client = fast_client(mock_server.uri());
        let health = client.health().await.unwrap();

        assert_eq!(health.message, "ok");
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_get_fails_after_max_retries() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/events/"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
            .expect(4) // initial attempt + 3 retries
            .mount(&mock_server)
            .await;

        let client = fast_client(mock_server.uri());
        let err = client.list_events().await.unwrap_err();

        match err {
            Error::Api(ApiError::RateLimit { retry_after }) => assert_eq!(retry_after, Some(7)),
            e => panic!("Expected RateLimit error, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_post_empty_retry_on_429() {
        let mock_server = MockServer::start().await;
        let call_count = Arc::new(AtomicU32::new(0));

        struct RetryThenCreatedResponder {
            call_count: Arc<AtomicU32>,
        }

        impl Respond for RetryThenCreatedResponder {
            fn respond(&self, _request: &Request) -> ResponseTemplate {
                let count = self.call_count.fetch_add(1, Ordering::SeqCst);
                if count < 2 {
                    ResponseTemplate::new(429)
                } else {
                    ResponseTemplate::new(201)
                }
            }
        }

        Mock::given(method("POST"))
            .and(path("/api/signup/"))
            .respond_with(RetryThenCreatedResponder {
                call_count: call_count.clone(),
            })
            .expect(3)
            .mount(&mock_server)
            .await;

        let client = fast_client(mock_server.uri());
        let request = SignUpRequest::new("Ada", "ada@example.com", "pw", "pw").unwrap();
        client.sign_up(&request).await.unwrap();
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_server_error_maps_to_http() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/events/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = fast_client(mock_server.uri());
        let err = client.list_events().await.unwrap_err();

        assert_eq!(
            err.as_api_error(),
            Some(&ApiError::Http {
                status: 500,
                message: "boom".to_string()
            })
        );
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let client = fast_client("http://127.0.0.1:1");
        let err = client.health().await.unwrap_err();

        assert!(matches!(err, Error::Api(ApiError::Network { .. })), "got {:?}", err);
        assert_eq!(err.exit_code(), 3);
    }
}
