// menu-server/tests/api_integration.rs
// End-to-end tests: real router on an ephemeral port, driven with reqwest

use std::sync::Arc;

use chrono::{Duration, Utc};
use async_trait::async_trait;
use menu_server::{Config, MemoryMenuStore, ServerState};
use reqwest::StatusCode;
use serde_json::{Value, json};
use shared::client::{AuthResponse, HealthResponse};
use shared::models::{FoodCreate, FoodItem, ReviewEntry};
use shared::rating::MAX_COMMENT_LEN;
use shared::store::{MenuStore, StoreResult};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct TestServer {
    base: String,
    http: reqwest::Client,
    state: ServerState,
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    async fn start(items: Vec<FoodItem>) -> Self {
        let store = Arc::new(MemoryMenuStore::with_items(items));
        Self::start_with(Config::for_store("memory://"), store).await
    }

    async fn start_with(config: Config, store: Arc<dyn MenuStore>) -> Self {
        let state = ServerState::with_store(&config, store);
        let serving = state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            menu_server::core::serve(listener, serving, async {
                let _ = rx.await;
            })
            .await
            .unwrap();
        });

        Self {
            base: format!("http://{}", addr),
            http: reqwest::Client::new(),
            state,
            _shutdown: tx,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn signup(&self, email: &str, password: &str) -> reqwest::Response {
        self.http
            .post(self.url("/api/auth/signup"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap()
    }

    async fn token(&self) -> String {
        let resp = self.signup("diner@example.com", "secret123").await;
        assert_eq!(resp.status(), StatusCode::OK);
        resp.json::<AuthResponse>().await.unwrap().token
    }

    async fn review(&self, token: &str, food_id: &str, rating: u8, comment: &str) -> reqwest::Response {
        self.http
            .post(self.url(&format!("/api/foods/{}/reviews", food_id)))
            .bearer_auth(token)
            .json(&json!({ "rating": rating, "comment": comment }))
            .send()
            .await
            .unwrap()
    }
}

fn food(id: &str, name: &str, price: &str, age_minutes: i64) -> FoodItem {
    let mut item = FoodItem::new(
        id,
        FoodCreate {
            name: name.to_string(),
            price: price.parse().unwrap(),
            image: format!("https://example.com/{}.jpg", id),
        },
    );
    item.created_at = Utc::now() - Duration::minutes(age_minutes);
    item
}

#[tokio::test]
async fn test_root_and_health() {
    let server = TestServer::start(vec![]).await;

    let text = server
        .http
        .get(server.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(text, "Restaurant Backend is running");

    let health: HealthResponse = server
        .http
        .get(server.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health.status, "healthy");
    assert!(health.store.is_ok());
}

#[tokio::test]
async fn test_signup_login_me_logout() {
    let server = TestServer::start(vec![]).await;

    let signup = server.signup("Diner@Example.com", "secret123").await;
    assert_eq!(signup.status(), StatusCode::OK);
    let signup: AuthResponse = signup.json().await.unwrap();
    assert_eq!(signup.user.email, "diner@example.com");
    assert!(signup.expires_in > 0);

    // duplicate email
    let dup = server.signup("diner@example.com", "secret123").await;
    assert_eq!(dup.status(), StatusCode::CONFLICT);

    let bad = server
        .http
        .post(server.url("/api/auth/login"))
        .json(&json!({ "email": "diner@example.com", "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
    let body: Value = bad.json().await.unwrap();
    assert_eq!(body["message"], "Incorrect password.");

    let login: AuthResponse = server
        .http
        .post(server.url("/api/auth/login"))
        .json(&json!({ "email": "diner@example.com", "password": "secret123" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let me = server
        .http
        .get(server.url("/api/auth/me"))
        .bearer_auth(&login.token)
        .send()
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);
    let me: Value = me.json().await.unwrap();
    assert_eq!(me["email"], "diner@example.com");

    let logout = server
        .http
        .post(server.url("/api/auth/logout"))
        .bearer_auth(&login.token)
        .send()
        .await
        .unwrap();
    assert_eq!(logout.status(), StatusCode::OK);

    // revoked token is rejected
    let me_again = server
        .http
        .get(server.url("/api/auth/me"))
        .bearer_auth(&login.token)
        .send()
        .await
        .unwrap();
    assert_eq!(me_again.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_rejects_weak_password() {
    let server = TestServer::start(vec![]).await;
    let resp = server.signup("diner@example.com", "123").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Password should be at least 6 characters.");
}

#[tokio::test]
async fn test_foods_require_auth() {
    let server = TestServer::start(vec![food("f1", "Ramen", "12.99", 0)]).await;

    let resp = server.http.get(server.url("/api/foods")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = server
        .http
        .get(server.url("/api/foods"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_newest_first_and_sorted() {
    let server = TestServer::start(vec![
        food("old", "Soup", "4.50", 30),
        food("mid", "Steak", "24.00", 20),
        food("new", "Salad", "8.00", 10),
    ])
    .await;
    let token = server.token().await;

    let list: Vec<FoodItem> = server
        .http
        .get(server.url("/api/foods"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<&str> = list.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);

    let by_price: Vec<FoodItem> = server
        .http
        .get(server.url("/api/foods?sort=price_asc"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<&str> = by_price.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["old", "new", "mid"]);

    let bad_sort = server
        .http
        .get(server.url("/api/foods?sort=alphabetical"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(bad_sort.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_and_get_food() {
    let server = TestServer::start(vec![]).await;
    let token = server.token().await;

    let created = server
        .http
        .post(server.url("/api/foods"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Ramen", "price": 12.99, "image": "https://example.com/r.jpg" }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::OK);
    let created: FoodItem = created.json().await.unwrap();
    assert_eq!(created.name, "Ramen");
    assert_eq!(created.rating, None);
    assert!(created.reviews.is_empty());

    let fetched: FoodItem = server
        .http
        .get(server.url(&format!("/api/foods/{}", created.id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, created);

    let invalid = server
        .http
        .post(server.url("/api/foods"))
        .bearer_auth(&token)
        .json(&json!({ "name": "   ", "price": 1.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
}

// First review on an unrated item, then a second one moves the mean
#[tokio::test]
async fn test_first_review_then_second() {
    let server = TestServer::start(vec![food("f1", "Ramen", "12.99", 0)]).await;
    let token = server.token().await;

    let resp = server.review(&token, "f1", 4, "Nice broth").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: FoodItem = resp.json().await.unwrap();
    assert_eq!(updated.rating, Some(4.0));
    assert_eq!(updated.reviews.len(), 1);
    assert_eq!(updated.reviews[0].comment, "Nice broth");

    let updated: FoodItem = server
        .review(&token, "f1", 5, "Even better today")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(updated.rating, Some(4.5));
    assert_eq!(updated.reviews.len(), 2);
}

#[tokio::test]
async fn test_empty_comment_is_rejected_without_write() {
    let server = TestServer::start(vec![food("f1", "Ramen", "12.99", 0)]).await;
    let token = server.token().await;

    let resp = server.review(&token, "f1", 5, "   ").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], 6101);

    let resp = server.review(&token, "f1", 0, "zero stars").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let unchanged: FoodItem = server
        .http
        .get(server.url("/api/foods/f1"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(unchanged.reviews.is_empty());
    assert_eq!(unchanged.rating, None);
}

#[tokio::test]
async fn test_review_unknown_food_is_not_found() {
    let server = TestServer::start(vec![]).await;
    let token = server.token().await;

    let resp = server.review(&token, "missing", 5, "Where is it?").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["details"]["food_id"], "missing");
}

#[tokio::test]
async fn test_concurrent_reviews_are_all_kept() {
    let seeded = food("f1", "Ramen", "12.99", 0).with_review(ReviewEntry::new(3, "fine"));
    let server = TestServer::start(vec![seeded]).await;
    let token = server.token().await;

    let requests = (0..10).map(|i| {
        let rating = if i % 2 == 0 { 5 } else { 4 };
        server.review(&token, "f1", rating, "concurrent")
    });
    for resp in futures::future::join_all(requests).await {
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let final_state: FoodItem = server
        .http
        .get(server.url("/api/foods/f1"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(final_state.reviews.len(), 11);
    // (3 + 5*5 + 4*5) / 11
    let expected = 48.0 / 11.0;
    assert!((final_state.rating.unwrap() - expected).abs() < 1e-9);
}

async fn error_code(resp: reqwest::Response) -> (StatusCode, Value) {
    let status = resp.status();
    let body: Value = resp.json().await.unwrap();
    (status, body["code"].clone())
}

#[tokio::test]
async fn test_malformed_bodies_use_error_envelope() {
    let server = TestServer::start(vec![food("f1", "Ramen", "12.99", 0)]).await;
    let token = server.token().await;

    for body in [
        json!({ "rating": 4.5, "comment": "half star" }),
        json!({ "rating": 300, "comment": "too many" }),
        json!({ "comment": "no rating" }),
    ] {
        let resp = server
            .http
            .post(server.url("/api/foods/f1/reviews"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(error_code(resp).await, (StatusCode::BAD_REQUEST, json!(2)), "{body}");
    }

    let resp = server
        .http
        .post(server.url("/api/foods"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Soup", "price": "cheap" }))
        .send()
        .await
        .unwrap();
    assert_eq!(error_code(resp).await, (StatusCode::BAD_REQUEST, json!(2)));

    let resp = server
        .http
        .post(server.url("/api/auth/login"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{")
        .send()
        .await
        .unwrap();
    assert_eq!(error_code(resp).await, (StatusCode::BAD_REQUEST, json!(2)));

    let unchanged: FoodItem = server
        .http
        .get(server.url("/api/foods/f1"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(unchanged.reviews.is_empty());
}

#[tokio::test]
async fn test_comment_is_trimmed_and_capped() {
    let server = TestServer::start(vec![food("f1", "Ramen", "12.99", 0)]).await;
    let token = server.token().await;

    let updated: FoodItem = server
        .review(&token, "f1", 4, "  Nice broth \n")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(updated.reviews[0].comment, "Nice broth");

    let long = "a".repeat(MAX_COMMENT_LEN + 1);
    let resp = server.review(&token, "f1", 4, &long).await;
    let (status, body) = (resp.status(), resp.json::<Value>().await.unwrap());
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    assert_eq!(body["details"]["max_len"], MAX_COMMENT_LEN);
}

#[tokio::test]
async fn test_disabled_account_token_is_refused() {
    let server = TestServer::start(vec![food("f1", "Ramen", "12.99", 0)]).await;
    let token = server.token().await;

    let ok = server
        .http
        .get(server.url("/api/foods"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    assert!(server.state.accounts.set_disabled("diner@example.com", true));
    let resp = server
        .http
        .get(server.url("/api/foods"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(error_code(resp).await, (StatusCode::FORBIDDEN, json!(1007)));

    let resp = server.review(&token, "f1", 5, "still here?").await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_password_sign_in_can_be_switched_off() {
    let config = Config {
        password_sign_in: false,
        ..Config::for_store("memory://")
    };
    let server = TestServer::start_with(config, Arc::new(MemoryMenuStore::new())).await;

    let resp = server.signup("diner@example.com", "secret123").await;
    assert_eq!(error_code(resp).await, (StatusCode::FORBIDDEN, json!(1014)));
    assert!(server.state.accounts.is_empty());
}

/// Store whose reads take longer than the request timeout
struct SlowStore(MemoryMenuStore);

#[async_trait]
impl MenuStore for SlowStore {
    async fn list_food_items(&self) -> StoreResult<Vec<FoodItem>> {
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        self.0.list_food_items().await
    }

    async fn get_food_item(&self, id: &str) -> StoreResult<FoodItem> {
        self.0.get_food_item(id).await
    }

    async fn append_review(&self, food_id: &str, review: ReviewEntry) -> StoreResult<FoodItem> {
        self.0.append_review(food_id, review).await
    }

    async fn add_food_item(&self, data: FoodCreate) -> StoreResult<FoodItem> {
        self.0.add_food_item(data).await
    }
}

#[tokio::test]
async fn test_slow_request_times_out_with_408() {
    let config = Config {
        request_timeout_ms: 50,
        ..Config::for_store("memory://")
    };
    let server = TestServer::start_with(config, Arc::new(SlowStore(MemoryMenuStore::new()))).await;

    let resp = server.http.get(server.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);

    // routes that finish in time are unaffected
    let resp = server.http.get(server.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
