use censys::{ClientConfig, Index, SearchClient};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_ROOT: &str = "/api/v1";

pub fn search_path(index: Index) -> String {
    format!("{}/search/{}", API_ROOT, index.as_str())
}

pub fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::default()
        .with_base_url(format!("{}{}", server.uri(), API_ROOT))
        .with_credentials(Some("test-id".to_string()), Some("test-secret".to_string()))
}

pub fn client(server: &MockServer, index: Index) -> SearchClient {
    SearchClient::new(index, config(server))
}

/// `n` host records for page `page`, e.g. `{"ip": "10.2.0.1"}`.
pub fn hosts(page: u32, n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| json!({"ip": format!("10.{}.0.{}", page, i), "protocols": ["443/https"]}))
        .collect()
}

pub fn page_body(page: u32, pages: u32, results: Vec<Value>) -> Value {
    json!({
        "status": "ok",
        "metadata": {
            "count": results.len() as u32 * pages.max(1),
            "query": "nginx",
            "backend_time": 42,
            "page": page,
            "pages": pages
        },
        "results": results
    })
}

/// Mount one mock per page, each returning `per_page` hosts.
#[allow(dead_code)]
pub async fn mount_pages(server: &MockServer, index: Index, pages: u32, per_page: usize) {
    for page in 1..=pages {
        Mock::given(method("POST"))
            .and(path(search_path(index)))
            .and(body_partial_json(json!({ "page": page })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(page_body(page, pages, hosts(page, per_page))),
            )
            .mount(server)
            .await;
    }
}

/// Pages requested so far, in order.
#[allow(dead_code)]
pub async fn requested_pages(server: &MockServer) -> Vec<u64> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|req| req.body_json::<Value>().ok())
        .filter_map(|body| body["page"].as_u64())
        .collect()
}
