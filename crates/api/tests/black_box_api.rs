use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use eventreg_auth::{TokenConfig, TokenService};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use eventreg_api::app::{build_app, services::AppServices};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        // Same router as prod, in-memory database, ephemeral port.
        let pool = eventreg_infra::db::connect_in_memory()
            .await
            .expect("failed to open in-memory database");
        let tokens = TokenService::new(&TokenConfig::new(jwt_secret, 1).expect("bad token config"));
        let app = build_app(AppServices::sqlite(pool, Arc::new(tokens)));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn signup(client: &reqwest::Client, srv: &TestServer, email: &str, password: &str) -> serde_json::Value {
    let res = client
        .post(srv.url("/auth/signup"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn login(client: &reqwest::Client, srv: &TestServer, email: &str, password: &str) -> String {
    let res = client
        .post(srv.url("/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

fn event_body(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "description": "Monthly meetup",
        "location": "Berlin",
        "dateTime": "2026-11-05T18:30:00Z",
    })
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn("test-secret").await;

    let res = reqwest::get(srv.url("/health")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/api/whoami")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "missing_credentials");

    let res = client
        .get(srv.url("/api/events"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_credentials");

    let res = client
        .get(srv.url("/api/whoami"))
        .header("Authorization", "Bearer")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_credentials");
}

#[tokio::test]
async fn signup_login_whoami_and_tampered_token() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let created = signup(&client, &srv, "a@x.com", "secret1").await;
    assert_eq!(created["email"], "a@x.com");
    let token = login(&client, &srv, "a@x.com", "secret1").await;

    let res = client
        .get(srv.url("/api/whoami"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: serde_json::Value = res.json().await.unwrap();
    assert_eq!(me["id"], created["id"]);
    assert_eq!(me["email"], "a@x.com");

    // Alter the last signature character.
    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let res = client
        .get(srv.url("/api/whoami"))
        .bearer_auth(&tampered)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_signup_and_bad_login_are_rejected() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    signup(&client, &srv, "a@x.com", "secret1").await;

    let res = client
        .post(srv.url("/auth/signup"))
        .json(&json!({ "email": "a@x.com", "password": "another1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .post(srv.url("/auth/signup"))
        .json(&json!({ "email": "no-at-sign", "password": "secret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    for (email, password) in [("a@x.com", "wrong-pass"), ("nobody@x.com", "secret1")] {
        let res = client
            .post(srv.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "invalid_credentials");
    }
}

#[tokio::test]
async fn only_the_owner_can_modify_an_event() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    signup(&client, &srv, "alice@x.com", "secret1").await;
    signup(&client, &srv, "bob@x.com", "secret1").await;
    let alice = login(&client, &srv, "alice@x.com", "secret1").await;
    let bob = login(&client, &srv, "bob@x.com", "secret1").await;

    let res = client
        .post(srv.url("/api/events"))
        .bearer_auth(&alice)
        .json(&event_body("Rust Meetup"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();

    let res = client
        .put(srv.url(&format!("/api/events/{id}")))
        .bearer_auth(&bob)
        .json(&event_body("Hijacked"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(srv.url(&format!("/api/events/{id}")))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Blank fields are checked after ownership; an unbindable body is not.
    let res = client
        .put(srv.url(&format!("/api/events/{id}")))
        .bearer_auth(&bob)
        .json(&event_body("   "))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .put(srv.url(&format!("/api/events/{id}")))
        .bearer_auth(&bob)
        .json(&json!({ "name": "No date" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .put(srv.url(&format!("/api/events/{id}")))
        .bearer_auth(&alice)
        .json(&event_body("Rust Meetup (moved)"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["name"], "Rust Meetup (moved)");
    assert_eq!(updated["userId"], created["userId"]);

    // Any authenticated user can read it.
    let res = client
        .get(srv.url(&format!("/api/events/{id}")))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(srv.url("/api/events"))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    let list: serde_json::Value = res.json().await.unwrap();
    assert_eq!(list["items"].as_array().unwrap().len(), 1);

    let res = client
        .delete(srv.url(&format!("/api/events/{id}")))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(srv.url(&format!("/api/events/{id}")))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_event_payloads_and_ids_are_400() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    signup(&client, &srv, "a@x.com", "secret1").await;
    let token = login(&client, &srv, "a@x.com", "secret1").await;

    let res = client
        .post(srv.url("/api/events"))
        .bearer_auth(&token)
        .json(&event_body("   "))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(srv.url("/api/events"))
        .bearer_auth(&token)
        .json(&json!({ "name": "No date" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(srv.url("/api/events/abc"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn registration_lifecycle() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    signup(&client, &srv, "alice@x.com", "secret1").await;
    let bob_user = signup(&client, &srv, "bob@x.com", "secret1").await;
    let alice = login(&client, &srv, "alice@x.com", "secret1").await;
    let bob = login(&client, &srv, "bob@x.com", "secret1").await;

    let res = client
        .post(srv.url("/api/events"))
        .bearer_auth(&alice)
        .json(&event_body("Workshop"))
        .send()
        .await
        .unwrap();
    let event: serde_json::Value = res.json().await.unwrap();
    let path = format!("/api/events/{}/registrations", event["id"]);

    let res = client.post(srv.url(&path)).bearer_auth(&bob).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["eventId"], event["id"]);
    assert_eq!(body["userId"], bob_user["id"]);

    let res = client.post(srv.url(&path)).bearer_auth(&bob).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "duplicate_registration");

    let res = client.delete(srv.url(&path)).bearer_auth(&bob).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.delete(srv.url(&path)).bearer_auth(&bob).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_registered");

    let res = client
        .post(srv.url("/api/events/9999/registrations"))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let created = signup(&client, &srv, "a@x.com", "secret1").await;

    let now = Utc::now();
    let claims = json!({
        "sub": created["id"],
        "email": "a@x.com",
        "iat": now.timestamp_millis(),
        "exp": (now + ChronoDuration::minutes(10)).timestamp_millis(),
    });
    let forged = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .expect("failed to encode jwt");

    let res = client
        .get(srv.url("/api/whoami"))
        .bearer_auth(&forged)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
