use std::time::Duration;

use marketplace_lib::cache::PageCache;
use marketplace_lib::{
    CachedClient, FetchError, FilterState, PagedFilterQuery, QueryConfig, QueryError,
    QueryParams, RetryPolicy,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixture() -> String {
    include_str!("fixtures/categories.json").to_string()
}

fn fast_retry(max_retries: usize) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
    }
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

fn default_params() -> QueryParams {
    QueryParams::derive(&FilterState::default(), "")
}

#[tokio::test]
async fn repeated_params_are_served_from_cache() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = CachedClient::with_base_url(
        &mock_server.uri(),
        PageCache::new(Duration::from_secs(60)),
    )
    .with_retry_policy(RetryPolicy::none());

    let first = client.get_categories(&default_params()).await.unwrap();
    let second = client.get_categories(&default_params()).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.total_pages, 6);
}

#[tokio::test]
async fn different_params_miss_the_cache() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = CachedClient::with_base_url(
        &mock_server.uri(),
        PageCache::new(Duration::from_secs(60)),
    )
    .with_retry_policy(RetryPolicy::none());

    let mut filters = FilterState::default();
    client.get_categories(&default_params()).await.unwrap();
    filters.set_page(2).unwrap();
    client
        .get_categories(&QueryParams::derive(&filters, ""))
        .await
        .unwrap();
}

#[tokio::test]
async fn transient_errors_are_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = CachedClient::with_base_url(&mock_server.uri(), PageCache::disabled())
        .with_retry_policy(fast_retry(2));
    let page = client.get_categories(&default_params()).await.unwrap();
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn rate_limited_requests_are_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = CachedClient::with_base_url(&mock_server.uri(), PageCache::disabled())
        .with_retry_policy(fast_retry(1));
    let page = client.get_categories(&default_params()).await.unwrap();
    assert_eq!(page.total_count, 12);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(400).set_body_string("limit invalide"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = CachedClient::with_base_url(&mock_server.uri(), PageCache::disabled())
        .with_retry_policy(fast_retry(3));
    let err = client.get_categories(&default_params()).await.unwrap_err();
    assert_eq!(
        err,
        FetchError::Server {
            status: Some(400),
            message: "limit invalide".to_string()
        }
    );
}

#[tokio::test]
async fn failures_are_not_cached() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture()))
        .mount(&mock_server)
        .await;

    let client = CachedClient::with_base_url(
        &mock_server.uri(),
        PageCache::new(Duration::from_secs(60)),
    )
    .with_retry_policy(RetryPolicy::none());
    assert!(client.get_categories(&default_params()).await.is_err());
    assert!(client.get_categories(&default_params()).await.is_ok());
}

#[tokio::test]
async fn get_category_maps_not_found() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Catégorie non trouvée"))
        .mount(&mock_server)
        .await;

    let client = CachedClient::with_base_url(&mock_server.uri(), PageCache::disabled())
        .with_retry_policy(RetryPolicy::none());
    let err = client.get_category(99).await.unwrap_err();
    assert!(matches!(
        err,
        QueryError::Fetch(FetchError::Server {
            status: Some(404),
            ..
        })
    ));
}

#[tokio::test]
async fn paged_query_end_to_end() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .and(query_param("search", "alg"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": 1, "name": "Algèbre" }],
            "totalCount": 1,
            "totalPages": 1,
            "hasSearch": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture()))
        .mount(&mock_server)
        .await;

    let client = CachedClient::with_base_url(
        &mock_server.uri(),
        PageCache::new(Duration::from_secs(60)),
    )
    .with_retry_policy(RetryPolicy::none());
    let config = QueryConfig::default().with_debounce(Duration::from_millis(20));
    let mut query = PagedFilterQuery::new(client, config);

    let snapshot = query.settle().await;
    assert_eq!(snapshot.items.len(), 2);
    assert_eq!(snapshot.total_count, 12);
    assert!(!snapshot.has_search);

    query.set_page(3).unwrap();
    query.set_search_term("a");
    query.set_search_term("al");
    query.set_search_term("alg");
    let snapshot = query.settle().await;
    assert_eq!(snapshot.current_page, 1);
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].display_name(), "Algèbre");
    assert!(snapshot.has_search);
    assert!(!snapshot.is_searching);
}

#[tokio::test]
async fn refetch_bypasses_the_page_cache() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": 4, "name": "Jouets" }],
            "totalCount": 1,
            "totalPages": 1,
            "hasSearch": false
        })))
        .mount(&mock_server)
        .await;

    let client = CachedClient::with_base_url(
        &mock_server.uri(),
        PageCache::new(Duration::from_secs(300)),
    )
    .with_retry_policy(RetryPolicy::none());
    let config = QueryConfig::default().with_debounce(Duration::ZERO);
    let mut query = PagedFilterQuery::new(client, config);
    query.settle().await;

    assert_eq!(request_count(&mock_server).await, 1);

    query.refetch();
    let snapshot = query.settle().await;
    assert_eq!(snapshot.items[0].display_name(), "Jouets");
    assert_eq!(request_count(&mock_server).await, 2);
}
