use auction_marketplace::app::{self, AppState};
use auction_marketplace::identity::USER_ID_HEADER;
use auction_marketplace::store::InMemoryMarketStore;
use axum::http::StatusCode;
use reqwest::header::LOCATION;
use reqwest::{redirect, Client, Response};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

/// 트레이싱 초기화
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// 테스트 서버 (메모리 저장소)
struct TestApp {
    base: String,
    client: Client,
}

impl TestApp {
    async fn spawn() -> Self {
        init_tracing();
        let state = AppState::new(Arc::new(InMemoryMarketStore::new()));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app::router(state).into_make_service())
                .await
                .unwrap();
        });

        // 리다이렉트 응답을 그대로 확인하기 위해 자동 이동 비활성화
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .unwrap();
        Self {
            base: format!("http://{addr}"),
            client,
        }
    }

    async fn get(&self, path: &str, user: Option<i64>) -> Response {
        let mut request = self.client.get(format!("{}{}", self.base, path));
        if let Some(user_id) = user {
            request = request.header(USER_ID_HEADER, user_id.to_string());
        }
        request.send().await.expect("Failed to send request")
    }

    async fn post(&self, path: &str, user: Option<i64>, body: Value) -> Response {
        let mut request = self
            .client
            .post(format!("{}{}", self.base, path))
            .json(&body);
        if let Some(user_id) = user {
            request = request.header(USER_ID_HEADER, user_id.to_string());
        }
        request.send().await.expect("Failed to send request")
    }

    async fn register(&self, username: &str) -> i64 {
        let response = self
            .post(
                "/register",
                None,
                json!({ "username": username, "email": format!("{username}@example.com") }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let user: Value = response.json().await.unwrap();
        user["id"].as_i64().unwrap()
    }

    async fn create_listing(&self, owner: i64, price: &str) -> i64 {
        let response = self
            .post(
                "/listings/new",
                Some(owner),
                json!({
                    "title": "listing#1 title",
                    "description": "listing#1 description",
                    "img_url": "",
                    "price": price,
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::FOUND);
        let location = location(&response);
        location
            .trim_start_matches("/listings/")
            .parse()
            .unwrap()
    }
}

fn location(response: &Response) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// 입찰 및 낙찰 전체 흐름 테스트
#[tokio::test]
async fn test_auction_lifecycle() {
    let app = TestApp::spawn().await;
    let foo = app.register("foo").await;
    let bar = app.register("bar").await;
    let listing_id = app.create_listing(foo, "10.00").await;
    let bid_path = format!("/listings/{listing_id}/bid");
    let close_path = format!("/listings/{listing_id}/close");

    // 시작 가격이 현재 최고가
    let detail: Value = app
        .get(&format!("/listings/{listing_id}"), None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(detail["max_bid"], "10.00");
    assert_eq!(detail["bids_count"], 0);

    // 로그인하지 않은 입찰은 로그인 페이지로
    let response = app.post(&bid_path, None, json!({ "price": "100.00" })).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).starts_with("/login"));

    // 존재하지 않는 상품
    let response = app
        .post(
            &format!("/listings/{}/bid", listing_id + 100),
            Some(bar),
            json!({ "price": "100.00" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // 판매자 본인 입찰
    let response = app.post(&bid_path, Some(foo), json!({ "price": "100.00" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_STATE");

    // 낮은 금액
    let response = app.post(&bid_path, Some(bar), json!({ "price": "5.00" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "LOW_BID");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("must be greater than the current max bid of ($10.00)"));

    // 정상 입찰
    let response = app.post(&bid_path, Some(bar), json!({ "price": "100.00" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let placed: Value = response.json().await.unwrap();
    assert_eq!(placed["bids_count"], 1);
    assert_eq!(placed["current_price"], "100.00");

    // 판매자가 아닌 사용자의 종료 요청
    let response = app.post(&close_path, Some(bar), json!({})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // 존재하지 않는 상품 종료
    let response = app
        .post(
            &format!("/listings/{}/close", listing_id + 100),
            Some(foo),
            json!({}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // 판매자의 종료 요청
    let response = app.post(&close_path, Some(foo), json!({})).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("/listings/{listing_id}"));

    let detail: Value = app
        .get(&format!("/listings/{listing_id}"), Some(bar))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(detail["listing"]["is_active"], false);
    assert_eq!(detail["winning_bid"]["is_winner"], true);
    assert_eq!(detail["winning_bid"]["price"], "100.00");
    assert_eq!(detail["viewer_is_winner"], true);

    // 종료 후 입찰 거부
    let response = app.post(&bid_path, Some(bar), json!({ "price": "200.00" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_STATE");
}

/// 입찰 없는 상품 종료 테스트
#[tokio::test]
async fn test_close_without_bids() {
    let app = TestApp::spawn().await;
    let foo = app.register("foo").await;
    let listing_id = app.create_listing(foo, "10.00").await;

    let response = app
        .post(&format!("/listings/{listing_id}/close"), None, json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).starts_with("/login"));

    let response = app
        .post(&format!("/listings/{listing_id}/close"), Some(foo), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let detail: Value = app
        .get(&format!("/listings/{listing_id}"), Some(foo))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(detail["listing"]["is_active"], true);
}

/// 관심목록 추가/제거 테스트
#[tokio::test]
async fn test_watchlist_toggle() {
    let app = TestApp::spawn().await;
    let foo = app.register("foo").await;
    let bar = app.register("bar").await;
    let listing_id = app.create_listing(foo, "10.00").await;
    let watch = format!("/listings/{listing_id}/watch");
    let unwatch = format!("/listings/{listing_id}/unwatch");

    let response = app.post(&watch, Some(foo), json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.post(&watch, Some(bar), json!({})).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let watchlist: Value = app.get("/watchlist", Some(bar)).await.json().await.unwrap();
    assert_eq!(watchlist.as_array().unwrap().len(), 1);

    let response = app.post(&watch, Some(bar), json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.post(&unwatch, Some(bar), json!({})).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let watchlist: Value = app.get("/watchlist", Some(bar)).await.json().await.unwrap();
    assert!(watchlist.as_array().unwrap().is_empty());

    let response = app.post(&unwatch, Some(bar), json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post(
            &format!("/listings/{}/watch", listing_id + 100),
            Some(bar),
            json!({}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/watchlist", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
}

/// 댓글, 카테고리, 프로필 조회 테스트
#[tokio::test]
async fn test_comments_categories_and_profiles() {
    let app = TestApp::spawn().await;
    let foo = app.register("foo").await;
    let bar = app.register("bar").await;

    // 중복 사용자명
    let response = app.post("/register", None, json!({ "username": "foo" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post("/categories", Some(foo), json!({ "name": "Books" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let category: Value = response.json().await.unwrap();
    let category_id = category["id"].as_i64().unwrap();

    let response = app
        .post(
            "/listings/new",
            Some(foo),
            json!({
                "title": "A book",
                "description": "Hardcover",
                "price": "12.50",
                "category_id": category_id,
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let listing_id: i64 = location(&response)
        .trim_start_matches("/listings/")
        .parse()
        .unwrap();

    // 잘못된 시작 가격
    let response = app
        .post(
            "/listings/new",
            Some(foo),
            json!({ "title": "t", "description": "d", "price": "0" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post(
            &format!("/listings/{listing_id}/comment"),
            Some(bar),
            json!({ "content": "Which edition?" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = app
        .post(
            &format!("/listings/{}/comment", listing_id + 100),
            Some(bar),
            json!({ "content": "hello" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let detail: Value = app
        .get(&format!("/listings/{listing_id}"), None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(detail["comments"].as_array().unwrap().len(), 1);
    assert_eq!(detail["comments"][0]["content"], "Which edition?");

    let categories: Value = app.get("/categories", None).await.json().await.unwrap();
    assert_eq!(categories.as_array().unwrap().len(), 1);

    let in_category: Value = app
        .get(&format!("/categories/{category_id}"), None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(in_category["category"]["name"], "Books");
    assert_eq!(in_category["listings"][0]["id"], listing_id);

    let response = app.get("/categories/9999", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let profile: Value = app.get("/users/foo", None).await.json().await.unwrap();
    assert_eq!(profile["user"]["username"], "foo");
    assert_eq!(profile["listings"].as_array().unwrap().len(), 1);

    let response = app.get("/users/nobody", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let index: Value = app.get("/", None).await.json().await.unwrap();
    assert_eq!(index.as_array().unwrap().len(), 1);
}
