/// Multi-page iteration through `SearchClient::get`.
use censys::{CensysError, GetOptions, Index};
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{client, hosts, mount_pages, page_body, requested_pages, search_path};

#[tokio::test]
async fn test_cap_stops_mid_page() {
    let server = MockServer::start().await;
    mount_pages(&server, Index::Ipv4, 4, 3).await;

    let mut api = client(&server, Index::Ipv4);
    let results = api
        .get(GetOptions::default().query("nginx").fields(["ip"]).max_results(5))
        .try_collect()
        .await
        .unwrap();

    assert_eq!(results.len(), 5);
    let pages: Vec<u32> = results.iter().map(|r| r.parent().current_page()).collect();
    assert_eq!(pages, vec![1, 1, 1, 2, 2]);
    assert_eq!(results[4].field("ip").unwrap(), &json!("10.2.0.1"));
    assert_eq!(requested_pages(&server).await, vec![1, 2]);
}

#[tokio::test]
async fn test_zero_cap_runs_until_pages_exhausted() {
    let server = MockServer::start().await;
    mount_pages(&server, Index::Ipv4, 3, 3).await;

    let mut api = client(&server, Index::Ipv4);
    let results = api
        .get(GetOptions::default().query("nginx").max_results(0))
        .try_collect()
        .await
        .unwrap();

    assert_eq!(results.len(), 9);
    // the last page is fetched once and nothing past it
    assert_eq!(requested_pages(&server).await, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_default_cap_is_one_hundred() {
    let server = MockServer::start().await;
    mount_pages(&server, Index::Certificates, 3, 60).await;

    let mut api = client(&server, Index::Certificates);
    let results = api
        .get(GetOptions::default().query("example.com"))
        .try_collect()
        .await
        .unwrap();

    assert_eq!(results.len(), 100);
    assert_eq!(requested_pages(&server).await, vec![1, 2]);
}

#[tokio::test]
async fn test_start_page() {
    let server = MockServer::start().await;
    mount_pages(&server, Index::Ipv4, 3, 2).await;

    let mut api = client(&server, Index::Ipv4);
    let results = api
        .get(GetOptions::default().query("nginx").start_page(2).max_results(0))
        .try_collect()
        .await
        .unwrap();

    assert_eq!(results.len(), 4);
    assert_eq!(requested_pages(&server).await, vec![2, 3]);
}

#[tokio::test]
async fn test_empty_result_set_stops_after_one_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(search_path(Index::Ipv4)))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 0, vec![])))
        .expect(1)
        .mount(&server)
        .await;

    let mut api = client(&server, Index::Ipv4);
    let mut cursor = api.get(GetOptions::default().query("nothing matches").max_results(0));
    assert!(cursor.next().await.unwrap().is_none());
    assert!(cursor.is_done());
    assert_eq!(cursor.total_pages(), Some(0));
}

#[tokio::test]
async fn test_cursor_is_lazy() {
    let server = MockServer::start().await;
    mount_pages(&server, Index::Ipv4, 3, 2).await;

    let mut api = client(&server, Index::Ipv4);
    let mut cursor = api.get(GetOptions::default().query("nginx").max_results(0));
    assert!(requested_pages(&server).await.is_empty());

    cursor.next().await.unwrap().unwrap();
    cursor.next().await.unwrap().unwrap();
    assert_eq!(cursor.count(), 2);
    assert_eq!(cursor.page(), 1);
    assert_eq!(requested_pages(&server).await, vec![1]);

    cursor.next().await.unwrap().unwrap();
    assert_eq!(cursor.page(), 2);
    assert_eq!(requested_pages(&server).await, vec![1, 2]);
}

#[tokio::test]
async fn test_error_halts_iteration() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"page": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 3, hosts(1, 2))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"page": 2})))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({"error": "Rate limit exceeded", "error_code": 429})),
        )
        .mount(&server)
        .await;

    let mut api = client(&server, Index::Ipv4);
    let mut cursor = api.get(GetOptions::default().query("nginx").max_results(0));

    assert!(cursor.next().await.unwrap().is_some());
    assert!(cursor.next().await.unwrap().is_some());
    let err = cursor.next().await.unwrap_err();
    assert!(matches!(err, CensysError::Search { code: 429, .. }));

    assert!(cursor.is_done());
    assert!(cursor.next().await.unwrap().is_none());
    assert_eq!(requested_pages(&server).await, vec![1, 2]);
}

#[tokio::test]
async fn test_falls_back_to_client_configuration() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(search_path(Index::Websites)))
        .and(body_partial_json(json!({
            "query": "google.com",
            "fields": ["alexa_rank", "domain"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 1, hosts(1, 2))))
        .expect(1)
        .mount(&server)
        .await;

    let mut api = client(&server, Index::Websites);
    api.set_query("google.com");
    api.set_fields(["domain", "alexa_rank"]).unwrap();

    let results = api
        .get(GetOptions::default().fields(Vec::<String>::new()))
        .try_collect()
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_sleep_between_pages() {
    let server = MockServer::start().await;
    mount_pages(&server, Index::Ipv4, 3, 1).await;

    let sleep = Duration::from_millis(40);
    let mut api = client(&server, Index::Ipv4);
    let started = Instant::now();
    let results = api
        .get(GetOptions::default().query("nginx").max_results(0).sleep(sleep))
        .try_collect()
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    // no pause before the first page, one before each later page
    assert!(started.elapsed() >= sleep * 2);
}

#[tokio::test]
async fn test_overall_numbers_across_pages() {
    let server = MockServer::start().await;
    mount_pages(&server, Index::Ipv4, 2, 2).await;

    let mut api = client(&server, Index::Ipv4);
    let results = api
        .get(GetOptions::default().query("nginx").max_results(0))
        .try_collect()
        .await
        .unwrap();

    let numbers: Vec<usize> = results.iter().map(|r| r.overall_number()).collect();
    // page 1 assumes 100 per page; page 2 is the last page and uses its own length
    assert_eq!(numbers, vec![100, 101, 4, 5]);
}

#[tokio::test]
async fn test_empty_query_override_uses_client_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(search_path(Index::Ipv4)))
        .and(body_partial_json(json!({ "query": "nginx", "page": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 1, hosts(1, 2))))
        .expect(1)
        .mount(&server)
        .await;

    let mut api = client(&server, Index::Ipv4);
    api.set_query("nginx");

    let results = api
        .get(GetOptions::default().query(""))
        .try_collect()
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_last_representable_page_ends_walk() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(search_path(Index::Ipv4)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "metadata": {
                "count": 2,
                "query": "nginx",
                "backend_time": 1,
                "page": u32::MAX,
                "pages": u32::MAX
            },
            "results": hosts(1, 2)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut api = client(&server, Index::Ipv4);
    let mut cursor = api.get(
        GetOptions::default()
            .query("nginx")
            .max_results(0)
            .start_page(u32::MAX),
    );

    assert!(cursor.next().await.unwrap().is_some());
    assert!(cursor.next().await.unwrap().is_some());
    assert!(cursor.next().await.unwrap().is_none());
    assert!(cursor.is_done());
    assert_eq!(cursor.count(), 2);
}
