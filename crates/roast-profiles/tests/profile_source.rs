//! Integration tests for `ProfileClient`, `PostsClient`, and `LinkedInSource`.
//!
//! Each test stands up a `wiremock` server so no real network traffic is made.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use roast_core::{CollaboratorError, ProfileSource};
use roast_profiles::{LinkedInSource, PostsClient, ProfileClient, ProfileError};

const GRACE: &str = "https://www.linkedin.com/in/grace-hopper";
const ADA: &str = "https://www.linkedin.com/in/ada-lovelace";

fn profile_client(server: &MockServer) -> ProfileClient {
    ProfileClient::with_base_url("pc-key", 5, "roast-test/0.1", &server.uri())
        .expect("failed to build test ProfileClient")
}

fn posts_client(server: &MockServer) -> PostsClient {
    PostsClient::with_base_url("apify-token", 5, "roast-test/0.1", 10, &server.uri())
        .expect("failed to build test PostsClient")
}

fn profile_json(name: &str, connections: u32) -> serde_json::Value {
    json!({
        "full_name": name,
        "headline": "Computing pioneer",
        "summary": "Wrote the first compiler.",
        "city": "Arlington",
        "country_full_name": "United States",
        "connections": connections,
        "experiences": [{
            "title": "Rear Admiral",
            "company": "US Navy",
            "starts_at": {"day": 1, "month": 1, "year": 1943},
            "ends_at": null
        }],
        "languages": ["English"]
    })
}

async fn mount_profile(server: &MockServer, url: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/linkedin"))
        .and(query_param("url", url))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_profile_sends_bearer_auth_and_cache_hint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/linkedin"))
        .and(header("authorization", "Bearer pc-key"))
        .and(query_param("url", GRACE))
        .and(query_param("use_cache", "if-present"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json("Grace Hopper", 800)))
        .expect(1)
        .mount(&server)
        .await;

    let raw = profile_client(&server).fetch_profile(GRACE).await.unwrap();
    assert_eq!(raw.full_name.as_deref(), Some("Grace Hopper"));
    assert_eq!(raw.connections, Some(800));
}

#[tokio::test]
async fn fetch_profile_maps_status_codes() {
    let server = MockServer::start().await;
    mount_profile(&server, GRACE, 401, json!({})).await;
    mount_profile(&server, ADA, 402, json!({})).await;
    mount_profile(&server, "https://www.linkedin.com/in/missing", 404, json!({})).await;
    mount_profile(&server, "https://www.linkedin.com/in/busy", 503, json!({})).await;

    let client = profile_client(&server);
    assert!(matches!(
        client.fetch_profile(GRACE).await,
        Err(ProfileError::Unauthorized)
    ));
    assert!(matches!(
        client.fetch_profile(ADA).await,
        Err(ProfileError::CreditsExhausted)
    ));
    assert!(matches!(
        client
            .fetch_profile("https://www.linkedin.com/in/missing")
            .await,
        Err(ProfileError::NotFound { .. })
    ));
    assert!(matches!(
        client.fetch_profile("https://www.linkedin.com/in/busy").await,
        Err(ProfileError::UnexpectedStatus { status: 503, .. })
    ));
}

#[tokio::test]
async fn fetch_profile_rejects_non_profile_url_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = profile_client(&server)
        .fetch_profile("https://example.com/someone")
        .await;
    assert!(matches!(result, Err(ProfileError::InvalidProfileUrl { .. })));
}

#[tokio::test]
async fn fetch_profile_reports_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/linkedin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let result = profile_client(&server).fetch_profile(GRACE).await;
    assert!(matches!(result, Err(ProfileError::Deserialize { .. })));
}

#[tokio::test]
async fn fetch_posts_posts_actor_input() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/acts/harvestapi~linkedin-profile-posts/run-sync-get-dataset-items",
        ))
        .and(header("authorization", "Bearer apify-token"))
        .and(body_partial_json(json!({"startUrls": [GRACE], "maxItems": 10})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            {"text": "Shipped COBOL", "publishedAt": "2025-04-01T00:00:00Z", "likesCount": 3},
            {"content": "Nanoseconds", "date": "2025-03-01", "likes": 9}
        ])))
        .mount(&server)
        .await;

    let posts = posts_client(&server).fetch_posts(GRACE).await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[1].content.as_deref(), Some("Nanoseconds"));
}

#[tokio::test]
async fn acquire_preserves_order_and_isolates_item_failures() {
    let server = MockServer::start().await;
    mount_profile(&server, GRACE, 200, profile_json("Grace Hopper", 800)).await;
    mount_profile(&server, ADA, 404, json!({})).await;

    let source = LinkedInSource::new(profile_client(&server), None, 4);
    let ids = vec![
        ADA.to_string(),
        "not a profile".to_string(),
        GRACE.to_string(),
    ];
    let acquired = source.acquire(&ids).await.unwrap();

    assert_eq!(acquired.len(), 3);
    assert!(matches!(acquired[0], Err(CollaboratorError::NotFound(_))));
    assert!(matches!(
        acquired[1],
        Err(CollaboratorError::InvalidIdentifier(_))
    ));
    let grace = acquired[2].as_ref().unwrap();
    assert_eq!(grace.identifier(), GRACE);
    assert_eq!(grace.display_name.as_deref(), Some("Grace Hopper"));
    assert_eq!(grace.location.as_deref(), Some("Arlington, United States"));
    assert!(grace.experience[0].current);
    assert_eq!(grace.skills[0].name, "English");
    assert!(grace.posts.is_empty());
}

#[tokio::test]
async fn acquire_fails_whole_batch_when_credits_run_out() {
    let server = MockServer::start().await;
    mount_profile(&server, GRACE, 200, profile_json("Grace Hopper", 800)).await;
    mount_profile(&server, ADA, 402, json!({})).await;

    let source = LinkedInSource::new(profile_client(&server), None, 1);
    let ids = vec![GRACE.to_string(), ADA.to_string()];
    let result = source.acquire(&ids).await;

    assert!(matches!(result, Err(CollaboratorError::QuotaExhausted(_))));
}

#[tokio::test]
async fn acquire_attaches_posts_when_configured() {
    let server = MockServer::start().await;
    mount_profile(&server, GRACE, 200, profile_json("Grace Hopper", 800)).await;
    Mock::given(method("POST"))
        .and(path(
            "/acts/harvestapi~linkedin-profile-posts/run-sync-get-dataset-items",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"text": "Limited spots for my compiler course", "publishedAt": "2025-04-01T00:00:00Z"}
        ])))
        .mount(&server)
        .await;

    let source = LinkedInSource::new(profile_client(&server), Some(posts_client(&server)), 2);
    let acquired = source.acquire(&[GRACE.to_string()]).await.unwrap();
    let grace = acquired[0].as_ref().unwrap();
    assert_eq!(grace.posts.len(), 1);
    assert!(grace.posts[0].text.starts_with("Limited spots"));
}

#[tokio::test]
async fn acquire_continues_without_posts_when_posts_fail() {
    let server = MockServer::start().await;
    mount_profile(&server, GRACE, 200, profile_json("Grace Hopper", 800)).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let source = LinkedInSource::new(profile_client(&server), Some(posts_client(&server)), 2);
    let acquired = source.acquire(&[GRACE.to_string()]).await.unwrap();
    let grace = acquired[0].as_ref().unwrap();
    assert!(grace.posts.is_empty());
    assert_eq!(grace.display_name.as_deref(), Some("Grace Hopper"));
}
