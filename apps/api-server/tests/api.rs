//! HTTP surface tests against in-memory state and offline generation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test};
use serde_json::{Value, json};

use api_server::configure_app;
use api_server::state::AppState;
use scribe_core::domain::NewPost;
use scribe_infra::{InMemoryRateLimiter, JwtConfig, JwtTokenService, RateLimitConfig};

fn state() -> AppState {
    AppState::in_memory(Arc::new(JwtTokenService::new(JwtConfig {
        secret: "api-test-secret".to_string(),
        ..JwtConfig::default()
    })))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(App::new().configure(configure_app($state))).await
    };
}

async fn json<B: MessageBody>(res: ServiceResponse<B>) -> (StatusCode, Value) {
    let status = res.status();
    let body = test::read_body(res).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

fn get(uri: &str) -> test::TestRequest {
    test::TestRequest::get().uri(uri)
}

fn post_json(uri: &str, body: &Value) -> test::TestRequest {
    test::TestRequest::post().uri(uri).set_json(body)
}

fn titled(title: &str) -> NewPost {
    NewPost {
        title: Some(title.to_string()),
        ..Default::default()
    }
}

fn limited_state(max_requests: u32) -> AppState {
    let limiter = InMemoryRateLimiter::new(RateLimitConfig {
        max_requests,
        window: Duration::from_secs(60),
    });
    state().with_rate_limiter(Arc::new(limiter))
}

fn peer(addr: &str) -> SocketAddr {
    addr.parse().unwrap()
}

// ---------- Liveness ----------

#[actix_web::test]
async fn health_and_root_respond() {
    let app = app!(state());

    let (status, body) = json(test::call_service(&app, get("/health").to_request()).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));

    let (status, body) = json(test::call_service(&app, get("/").to_request()).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

// ---------- Posts ----------

#[actix_web::test]
async fn create_empty_post_is_untitled_draft() {
    let app = app!(state());

    let req = post_json("/api/posts/", &json!({})).to_request();
    let (status, body) = json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Untitled");
    assert_eq!(body["status"], "draft");
    assert!(body["id"].is_string());
    assert!(body["content_json"].is_null());
    assert!(body["author_id"].is_null());
    assert!(body["created_at"].is_string());
    assert_eq!(body["created_at"], body["updated_at"]);
}

#[actix_web::test]
async fn create_rejects_null_title() {
    let app = app!(state());

    let req = post_json("/api/posts/", &json!({"title": null})).to_request();
    let (status, body) = json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["title"], "Validation Failed");

    let (_, listed) = json(test::call_service(&app, get("/api/posts/").to_request()).await).await;
    assert_eq!(listed["total"], 0);
}

#[actix_web::test]
async fn collection_route_works_without_trailing_slash() {
    let app = app!(state());

    let req = post_json("/api/posts", &json!({"title": "No Slash"})).to_request();
    let (status, _) = json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = json(test::call_service(&app, get("/api/posts").to_request()).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
}

#[actix_web::test]
async fn content_json_round_trips_through_http() {
    let app = app!(state());
    let tree = json!({
        "root": {
            "children": [{
                "type": "heading",
                "tag": "h1",
                "children": [{"type": "text", "text": "Ünïcødé ✓", "format": 3}]
            }],
            "direction": null,
            "version": 1
        }
    });

    let body = json!({"title": "Tree", "content_json": tree, "content_html": "<h1>x</h1>"});
    let req = post_json("/api/posts/", &body).to_request();
    let (_, created) = json(test::call_service(&app, req).await).await;

    let uri = format!("/api/posts/{}", created["id"].as_str().unwrap());
    let (status, fetched) = json(test::call_service(&app, get(&uri).to_request()).await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["content_json"], tree);
    assert_eq!(fetched["content_html"], "<h1>x</h1>");
}

#[actix_web::test]
async fn unknown_or_malformed_id_is_not_found() {
    let app = app!(state());

    for uri in [
        "/api/posts/not-a-uuid".to_string(),
        format!("/api/posts/{}", uuid::Uuid::new_v4()),
    ] {
        let (status, body) = json(test::call_service(&app, get(&uri).to_request()).await).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
    }

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{}/publish", uuid::Uuid::new_v4()))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn patch_changes_only_supplied_fields() {
    let state = state();
    let post = state
        .posts
        .create(NewPost {
            title: Some("Original".to_string()),
            content_html: Some("<p>keep</p>".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let app = app!(state);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/posts/{}", post.id))
        .set_json(json!({"content_json": {"root": {"children": []}}}))
        .to_request();
    let (status, body) = json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Original");
    assert_eq!(body["content_html"], "<p>keep</p>");
    assert_eq!(body["content_json"], json!({"root": {"children": []}}));
    assert_eq!(body["status"], "draft");
    assert_ne!(body["updated_at"], body["created_at"]);
}

#[actix_web::test]
async fn patch_with_explicit_null_clears_content() {
    let state = state();
    let post = state
        .posts
        .create(NewPost {
            content_html: Some("<p>gone</p>".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let app = app!(state);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/posts/{}", post.id))
        .set_json(json!({"content_html": null}))
        .to_request();
    let (status, body) = json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["content_html"].is_null());
}

#[actix_web::test]
async fn patch_rejects_null_or_overlong_title() {
    let state = state();
    let post = state.posts.create(NewPost::default()).await.unwrap();
    let app = app!(state);
    let uri = format!("/api/posts/{}", post.id);

    for body in [json!({"title": null}), json!({"title": "x".repeat(501)})] {
        let req = test::TestRequest::patch()
            .uri(&uri)
            .set_json(&body)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}

#[actix_web::test]
async fn publish_is_idempotent() {
    let state = state();
    let post = state.posts.create(titled("Ship it")).await.unwrap();
    let app = app!(state);
    let uri = format!("/api/posts/{}/publish", post.id);

    let req = test::TestRequest::post().uri(&uri).to_request();
    let (status, first) = json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["status"], "published");

    let req = test::TestRequest::post().uri(&uri).to_request();
    let (status, second) = json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["status"], "published");
    assert_eq!(second["title"], "Ship it");
}

#[actix_web::test]
async fn delete_twice_is_no_content_then_not_found() {
    let state = state();
    let post = state.posts.create(titled("Doomed")).await.unwrap();
    let app = app!(state);
    let uri = format!("/api/posts/{}", post.id);

    let req = test::TestRequest::delete().uri(&uri).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(test::read_body(res).await.is_empty());

    let req = test::TestRequest::delete().uri(&uri).to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let res = test::call_service(&app, get(&uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_orders_filters_and_counts() {
    let state = state();
    let first = state.posts.create(titled("first")).await.unwrap();
    state.posts.create(titled("second")).await.unwrap();
    state.posts.create(titled("third")).await.unwrap();
    state.posts.publish(first.id).await.unwrap();
    let app = app!(state);

    let (status, all) = json(test::call_service(&app, get("/api/posts/").to_request()).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["total"], 3);
    assert_eq!(all["posts"][0]["id"], first.id.to_string());

    let req = get("/api/posts/?status=published").to_request();
    let (_, published) = json(test::call_service(&app, req).await).await;
    assert_eq!(published["total"], 1);
    assert_eq!(published["posts"][0]["status"], "published");

    let req = get("/api/posts/?status=draft&skip=1&limit=1").to_request();
    let (_, drafts) = json(test::call_service(&app, req).await).await;
    assert_eq!(drafts["total"], 2);
    assert_eq!(drafts["posts"].as_array().unwrap().len(), 1);
    assert_eq!(drafts["posts"][0]["status"], "draft");

    let req = get("/api/posts/?status=").to_request();
    let (status, unfiltered) = json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unfiltered["total"], 3);
}

#[actix_web::test]
async fn list_unknown_status_matches_nothing() {
    let state = state();
    state.posts.create(titled("draft")).await.unwrap();
    let app = app!(state);

    let req = get("/api/posts/?status=archived").to_request();
    let (status, body) = json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"posts": [], "total": 0}));
}

#[actix_web::test]
async fn list_accepts_limits_above_the_default() {
    let state = state();
    for i in 0..3 {
        state.posts.create(titled(&format!("post {i}"))).await.unwrap();
    }
    let app = app!(state);

    let req = get("/api/posts/?limit=200").to_request();
    let (status, body) = json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["posts"].as_array().unwrap().len(), 3);
}

#[actix_web::test]
async fn list_rejects_undecodable_query_parameters() {
    let app = app!(state());

    for uri in ["/api/posts/?skip=-1", "/api/posts/?limit=many"] {
        let (status, body) = json(test::call_service(&app, get(uri).to_request()).await).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert_eq!(body["title"], "Validation Failed");
    }
}

#[actix_web::test]
async fn malformed_json_body_is_validation_failure() {
    let app = app!(state());

    let req = test::TestRequest::post()
        .uri("/api/posts/")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"title\": ")
        .to_request();
    let (status, body) = json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);
}

// ---------- Auth ----------

#[actix_web::test]
async fn signup_login_and_me() {
    let app = app!(state());
    let credentials = json!({"email": "writer@example.com", "password": "secret123"});

    let req = post_json("/api/auth/signup", &credentials).to_request();
    let (status, user) = json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], "writer@example.com");
    assert!(user.get("password_hash").is_none());

    let req = post_json("/api/auth/login", &credentials).to_request();
    let (status, token) = json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(token["token_type"], "bearer");
    assert_eq!(token["expires_in"], 3600);

    let bearer = format!("Bearer {}", token["access_token"].as_str().unwrap());
    let req = get("/api/auth/me")
        .insert_header((header::AUTHORIZATION, bearer))
        .to_request();
    let (status, me) = json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], user["id"]);
    assert_eq!(me["email"], "writer@example.com");
}

#[actix_web::test]
async fn duplicate_signup_conflicts() {
    let app = app!(state());
    let body = json!({"email": "dup@example.com", "password": "secret123"});

    let req = post_json("/api/auth/signup", &body).to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = post_json("/api/auth/signup", &body).to_request();
    let (status, problem) = json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(problem["title"], "Conflict");
}

#[actix_web::test]
async fn signup_validates_shape() {
    let app = app!(state());

    for body in [
        json!({"email": "not-an-email", "password": "secret123"}),
        json!({"email": "short@example.com", "password": "12345"}),
        json!({"email": "long@example.com", "password": "x".repeat(129)}),
        json!({"email": "missing@example.com"}),
    ] {
        let req = post_json("/api/auth/signup", &body).to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "{body}"
        );
    }
}

#[actix_web::test]
async fn bad_credentials_are_unauthorized() {
    let state = state();
    state
        .accounts
        .signup("known@example.com", "secret123")
        .await
        .unwrap();
    let app = app!(state);

    for body in [
        json!({"email": "known@example.com", "password": "wrongpass"}),
        json!({"email": "unknown@example.com", "password": "secret123"}),
    ] {
        let req = post_json("/api/auth/login", &body).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            res.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}

#[actix_web::test]
async fn me_requires_a_valid_bearer_token() {
    let app = app!(state());

    let req = get("/api/auth/me").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    for value in ["Bearer not.a.token", "Basic dXNlcjpwYXNz", "Bearer "] {
        let req = get("/api/auth/me")
            .insert_header((header::AUTHORIZATION, value))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED,
            "{value}"
        );
    }
}

// ---------- AI ----------

#[actix_web::test]
async fn offline_summarize_keeps_first_thirty_words() {
    let app = app!(state());
    let words = |n: usize| (1..=n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");

    let body = json!({"text": words(40), "action": "summarize"});
    let req = post_json("/api/ai/generate", &body).to_request();
    let (status, body) = json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "summarize");
    assert_eq!(
        body["result"],
        format!("Summary (offline): {}...", words(30))
    );
}

#[actix_web::test]
async fn offline_fix_grammar_is_identity() {
    let app = app!(state());

    let body = json!({"text": "their going too the store", "action": "fix_grammar"});
    let req = post_json("/api/ai/generate", &body).to_request();
    let (status, body) = json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "their going too the store");
}

#[actix_web::test]
async fn generate_rejects_unknown_action_and_empty_text() {
    let app = app!(state());

    for body in [
        json!({"text": "hello", "action": "translate"}),
        json!({"text": "hello", "action": " summarize "}),
        json!({"text": "hello", "action": "Summarize"}),
        json!({"text": "", "action": "summarize"}),
        json!({"text": "hello"}),
    ] {
        let req = post_json("/api/ai/generate", &body).to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "{body}"
        );
    }
}

#[actix_web::test]
async fn generate_is_rate_limited() {
    let app = app!(limited_state(2));
    let body = json!({"text": "hello", "action": "fix_grammar"});

    for _ in 0..2 {
        let req = post_json("/api/ai/generate", &body)
            .peer_addr(peer("10.0.0.1:40000"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = post_json("/api/ai/generate", &body)
        .peer_addr(peer("10.0.0.1:40000"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(res.headers().contains_key(header::RETRY_AFTER));

    // Other routes are not limited
    let req = get("/health").peer_addr(peer("10.0.0.1:40000")).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn rate_limit_ignores_forwarding_headers() {
    let app = app!(limited_state(1));
    let body = json!({"text": "hello", "action": "fix_grammar"});

    let mut statuses = Vec::new();
    for i in 0..5 {
        let req = post_json("/api/ai/generate", &body)
            .peer_addr(peer(&format!("10.0.0.7:{}", 40000 + i)))
            .insert_header(("X-Forwarded-For", format!("10.9.9.{i}")))
            .insert_header((header::FORWARDED, format!("for=10.8.8.{i}")))
            .to_request();
        statuses.push(test::call_service(&app, req).await.status());
    }

    assert_eq!(statuses[0], StatusCode::OK);
    assert!(
        statuses[1..]
            .iter()
            .all(|status| *status == StatusCode::TOO_MANY_REQUESTS),
        "{statuses:?}"
    );
}

#[actix_web::test]
async fn rate_limit_buckets_are_per_peer_ip() {
    let app = app!(limited_state(1));
    let body = json!({"text": "hello", "action": "fix_grammar"});

    for addr in ["10.0.0.1:40000", "10.0.0.2:40000"] {
        let req = post_json("/api/ai/generate", &body)
            .peer_addr(peer(addr))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}
