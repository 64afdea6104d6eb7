//! End-to-end tests against a spawned server instance.

use plasma::adapters::AppState;
use plasma::config::{ServerSettings, Settings};
use plasma::persistence::RequestLog;
use serde_json::Value;
use std::sync::Arc;

struct TestServer {
    base_url: String,
}

impl TestServer {
    async fn new() -> Self {
        Self::start(None).await
    }

    async fn with_request_log() -> Self {
        let log = RequestLog::connect("sqlite::memory:", 1).await.unwrap();
        Self::start(Some(log)).await
    }

    async fn start(request_log: Option<RequestLog>) -> Self {
        let settings = Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            generation: Default::default(),
            rate_limit: None,
            database: None,
        };
        let state = AppState::new(Arc::new(settings), request_log);
        let app = plasma::create_app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        TestServer {
            base_url: format!("http://{}", addr),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn get_json(server: &TestServer, path: &str) -> (reqwest::StatusCode, Value) {
    let response = reqwest::get(server.url(path)).await.unwrap();
    let status = response.status();
    let body = response.json().await.unwrap();
    (status, body)
}

#[tokio::test]
async fn users_default_to_five_records() {
    let server = TestServer::new().await;
    let (status, body) = get_json(&server, "/users").await;
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn count_is_clamped_into_bounds() {
    let server = TestServer::new().await;
    let (_, body) = get_json(&server, "/users?count=20").await;
    assert_eq!(body.as_array().unwrap().len(), 20);
    let (_, body) = get_json(&server, "/users?count=0").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    let (_, body) = get_json(&server, "/users?count=-7").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn non_numeric_count_is_a_400() {
    let server = TestServer::new().await;
    let (status, body) = get_json(&server, "/users?count=banana").await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("count"));
}

#[tokio::test]
async fn seeded_requests_are_byte_identical() {
    let server = TestServer::new().await;
    // Run sequentially: determinism is per request, not cross-request.
    let first = reqwest::get(server.url("/users?seed=42&count=5"))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    let second = reqwest::get(server.url("/users?seed=42&count=5"))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    assert_eq!(first, second);

    let third = reqwest::get(server.url("/users?seed=43&count=5"))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    assert_ne!(first, third);
}

#[tokio::test]
async fn seeded_transactions_are_reproducible() {
    let server = TestServer::new().await;
    let (_, first) = get_json(&server, "/transactions?seed=9&count=8").await;
    let (_, second) = get_json(&server, "/transactions?seed=9&count=8").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn users_contain_exactly_the_requested_fields() {
    let server = TestServer::new().await;
    let (_, body) = get_json(&server, "/users?fields=name,job&count=10").await;
    for record in body.as_array().unwrap() {
        let mut keys: Vec<&str> = record.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        // `id` is always present; `age` stays internal to job derivation.
        assert_eq!(keys, vec!["id", "job", "name"]);
    }
}

#[tokio::test]
async fn unknown_field_tokens_are_dropped() {
    let server = TestServer::new().await;
    let (status, body) = get_json(&server, "/users?fields=name,password,email").await;
    assert_eq!(status, 200);
    for record in body.as_array().unwrap() {
        let object = record.as_object().unwrap();
        assert!(object.contains_key("name"));
        assert!(object.contains_key("email"));
        assert!(!object.contains_key("password"));
    }
}

#[tokio::test]
async fn age_range_bounds_every_record() {
    let server = TestServer::new().await;
    let (_, body) = get_json(&server, "/users?fields=age&ageRange=20-30&count=50").await;
    for record in body.as_array().unwrap() {
        let age = record["age"].as_u64().unwrap();
        assert!((20..=30).contains(&age), "age {} out of range", age);
    }
}

#[tokio::test]
async fn inverted_age_range_is_rejected() {
    let server = TestServer::new().await;
    let (status, body) = get_json(&server, "/users?ageRange=30-20").await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("ageRange"));
}

#[tokio::test]
async fn csv_has_header_plus_one_line_per_record() {
    let server = TestServer::new().await;
    let response = reqwest::get(server.url("/users?format=csv&count=4"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    let body = response.text().await.unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 5);
    // Default fields with address flattened in place.
    assert_eq!(lines[0], "name,email,age,street,city,country");
}

#[tokio::test]
async fn unknown_format_falls_back_to_json() {
    let server = TestServer::new().await;
    let response = reqwest::get(server.url("/users?format=xml")).await.unwrap();
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("application/json"));
}

#[tokio::test]
async fn transactions_reference_a_bounded_pool() {
    let server = TestServer::new().await;
    let (_, body) = get_json(&server, "/transactions?count=5").await;
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 5);

    let mut user_ids: Vec<&str> = records
        .iter()
        .map(|t| t["user"]["id"].as_str().unwrap())
        .collect();
    user_ids.sort_unstable();
    user_ids.dedup();
    assert!(user_ids.len() <= 5);

    let mut product_ids: Vec<&str> = records
        .iter()
        .map(|t| t["product"]["id"].as_str().unwrap())
        .collect();
    product_ids.sort_unstable();
    product_ids.dedup();
    assert!(product_ids.len() <= 5);

    for record in records {
        assert!(record["product"]["price"].as_f64().unwrap() >= 0.0);
        assert!(record["amount"].as_f64().unwrap() >= 0.0);
        let status = record["status"].as_str().unwrap();
        assert!(["completed", "pending", "failed"].contains(&status));
    }
}

#[tokio::test]
async fn dataset_rows_join_pooled_entities() {
    let server = TestServer::new().await;
    let (_, body) = get_json(&server, "/dataset?count=12&seed=3").await;
    for record in body.as_array().unwrap() {
        assert!(record["user"]["id"].is_string());
        assert!(record["product"]["id"].is_string());
        let rating = record["rating"].as_u64().unwrap();
        assert!((1..=5).contains(&rating));
        let quantity = record["quantity"].as_u64().unwrap();
        assert!((1..=10).contains(&quantity));
    }
}

#[tokio::test]
async fn products_carry_all_variant_sizes() {
    let server = TestServer::new().await;
    let (_, body) = get_json(&server, "/products?count=3").await;
    for record in body.as_array().unwrap() {
        let sizes: Vec<&str> = record["variants"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["size"].as_str().unwrap())
            .collect();
        assert_eq!(sizes, vec!["S", "M", "L", "XL"]);
        for variant in record["variants"].as_array().unwrap() {
            assert!(variant["stock"].as_u64().unwrap() <= 100);
        }
        assert!(record["price"].as_f64().unwrap() >= 0.0);
    }
}

#[tokio::test]
async fn companies_have_bounded_departments() {
    let server = TestServer::new().await;
    let (_, body) = get_json(&server, "/companies?count=6").await;
    for record in body.as_array().unwrap() {
        let departments = record["departments"].as_array().unwrap();
        assert!((2..=4).contains(&departments.len()));
        let employees = record["employees"].as_u64().unwrap();
        assert!((10..=10_000).contains(&employees));
    }
}

#[tokio::test]
async fn timeseries_steps_from_the_given_start() {
    let server = TestServer::new().await;
    let (_, body) = get_json(
        &server,
        "/timeseries?count=3&interval=hour&start=2024-01-01T00:00:00Z",
    )
    .await;
    let timestamps: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["timestamp"].as_str().unwrap())
        .collect();
    assert_eq!(
        timestamps,
        vec![
            "2024-01-01T00:00:00Z",
            "2024-01-01T01:00:00Z",
            "2024-01-01T02:00:00Z",
        ]
    );
}

#[tokio::test]
async fn timeseries_rejects_bad_interval_and_start() {
    let server = TestServer::new().await;
    let (status, body) = get_json(&server, "/timeseries?interval=week").await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("interval"));

    let (status, body) = get_json(&server, "/timeseries?start=yesterday").await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("start"));
}

#[tokio::test]
async fn custom_schema_drives_record_shape() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    let response = client
        .post(server.url("/custom?count=3"))
        .json(&serde_json::json!({"schema": {"name": "name", "score": "number"}}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 3);
    for record in records {
        let object = record.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object["name"].is_string());
        let score = object["score"].as_i64().unwrap();
        assert!((1..=100).contains(&score));
    }
}

#[tokio::test]
async fn custom_rejects_missing_and_unknown_schemas() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client.post(server.url("/custom")).send().await.unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .post(server.url("/custom"))
        .json(&serde_json::json!({"schema": {}}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .post(server.url("/custom"))
        .json(&serde_json::json!({"schema": {"avatar": "image"}}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("schema"));
}

#[tokio::test]
async fn large_counts_stream_the_same_logical_array() {
    let server = TestServer::new().await;
    let response = reqwest::get(server.url("/users?count=1500&seed=7"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1500);
}

#[tokio::test]
async fn stats_aggregates_logged_requests() {
    let server = TestServer::with_request_log().await;
    let _ = get_json(&server, "/users").await;
    let _ = get_json(&server, "/users").await;
    let _ = get_json(&server, "/products").await;
    // Logging is fire-and-forget; give the spawned inserts a moment.
    tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;

    let (status, body) = get_json(&server, "/stats").await;
    assert_eq!(status, 200);
    let requests = body["requests"].as_array().unwrap();
    let users = requests
        .iter()
        .find(|r| r["endpoint"] == "/users")
        .expect("missing /users entry");
    assert_eq!(users["count"], 2);
}

#[tokio::test]
async fn stats_answers_without_a_sink() {
    let server = TestServer::new().await;
    let (status, body) = get_json(&server, "/stats").await;
    assert_eq!(status, 200);
    assert_eq!(body["requests"], serde_json::json!([]));
}

#[tokio::test]
async fn root_docs_and_health_respond() {
    let server = TestServer::new().await;
    let (status, body) = get_json(&server, "/").await;
    assert_eq!(status, 200);
    assert_eq!(body["name"], "plasma");

    let (status, body) = get_json(&server, "/docs").await;
    assert_eq!(status, 200);
    assert!(body["endpoints"].is_object());

    let (status, body) = get_json(&server, "/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
}
