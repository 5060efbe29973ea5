use congress_api::{Client, Error, FeedClient, RetryClass};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn get_json_sends_key_and_format() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bill/118/hr/2882"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("format", "json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"bill": {"congress": 118, "number": "2882"}}"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key").unwrap();
    let value = client.get_json("/bill/118/hr/2882", &[]).await.unwrap();
    assert_eq!(value["bill"]["number"], "2882");
}

#[tokio::test]
async fn get_json_passes_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bill"))
        .and(query_param("query", "farm"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"bills": []}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "k").unwrap();
    let params = vec![
        ("query".to_string(), "farm".to_string()),
        ("offset".to_string(), "100".to_string()),
    ];
    let value = client.get_json("/bill", &params).await.unwrap();
    assert!(value["bills"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn get_json_classifies_client_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bill/118/hr/999999"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"error": "not found"}"#))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "secret-key").unwrap();
    let err = client.get_json("/bill/118/hr/999999", &[]).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.retry_class(), RetryClass::Fatal);
    assert!(!err.to_string().contains("secret-key"));
    assert!(err.url().ends_with("/bill/118/hr/999999"));
}

#[tokio::test]
async fn get_json_classifies_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/member"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "k").unwrap();
    let err = client.get_json("/member", &[]).await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
    assert_eq!(err.retry_class(), RetryClass::Http);
}

#[tokio::test]
async fn get_json_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bill"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "k").unwrap();
    let err = client.get_json("/bill", &[]).await.unwrap_err();
    assert_eq!(err.retry_class(), RetryClass::Unexpected);
}

#[tokio::test]
async fn fetch_document_parses_xml() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/evs/2024/roll042.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<rollcall-vote><vote-metadata><congress>118</congress></vote-metadata></rollcall-vote>",
        ))
        .mount(&mock_server)
        .await;

    let house = format!("{}/evs", mock_server.uri());
    let client = FeedClient::with_base_urls(&house, &mock_server.uri()).unwrap();
    let url = client.house_vote_url(2024, 42);
    let root = client.fetch_document(&url).await.unwrap();
    assert_eq!(root.name(), "rollcall-vote");
    assert_eq!(
        root.descendant("vote-metadata")
            .and_then(|m| m.child_text("congress"))
            .as_deref(),
        Some("118")
    );
}

#[tokio::test]
async fn fetch_document_rejects_malformed_xml() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vote1181/vote_118_1_00007.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<roll_call_vote><congress>"))
        .mount(&mock_server)
        .await;

    let client = FeedClient::with_base_urls(&mock_server.uri(), &mock_server.uri()).unwrap();
    let url = client.senate_vote_url(118, 1, 7);
    let err = client.fetch_document(&url).await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert_eq!(err.url(), url);
}

#[tokio::test]
async fn fetch_document_surfaces_http_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = FeedClient::with_base_urls(&mock_server.uri(), &mock_server.uri()).unwrap();
    let url = client.house_vote_url(2024, 999);
    let err = client.fetch_document(&url).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}
