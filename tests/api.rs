//! End-to-end checks through the full route table and middleware chain.

use std::sync::Arc;

use roster::users::SqliteUserStore;
use roster::{Config, Method, Request, Response, Router, routes};
use serde_json::{Value, json};

fn app() -> Router {
    let store = Arc::new(SqliteUserStore::in_memory().unwrap());
    routes::app(store, &Config::default())
}

fn json_body(res: &Response) -> Value {
    serde_json::from_slice(res.body()).unwrap()
}

async fn send(app: &Router, method: Method, path: &str, body: Option<&str>) -> Response {
    let mut req = Request::new(method, path).with_header("content-type", "application/json");
    if let Some(body) = body {
        req = req.with_body(body.to_owned());
    }
    app.dispatch(req).await
}

#[tokio::test]
async fn ping_answers_pong() {
    let res = send(&app(), Method::Get, "/ping", None).await;

    assert_eq!(res.status_code(), 200);
    assert_eq!(json_body(&res), json!({"status": "pong"}));
}

#[tokio::test]
async fn create_read_delete_lifecycle() {
    let app = app();

    let created = send(&app, Method::Post, "/users", Some(r#"{"name":"Alice"}"#)).await;
    assert_eq!(created.status_code(), 201);
    let created = json_body(&created);
    assert_eq!(created["name"], "Alice");
    let id = created["id"].as_i64().unwrap();

    let fetched = send(&app, Method::Get, &format!("/users/{id}"), None).await;
    assert_eq!(fetched.status_code(), 200);
    assert_eq!(json_body(&fetched), created);

    let deleted = send(&app, Method::Delete, &format!("/users/{id}"), None).await;
    assert_eq!(deleted.status_code(), 200);
    assert_eq!(json_body(&deleted), json!({"message": "User deleted"}));

    let gone = send(&app, Method::Get, &format!("/users/{id}"), None).await;
    assert_eq!(gone.status_code(), 404);
    assert_eq!(json_body(&gone), json!({"error": "User not found"}));
}

#[tokio::test]
async fn update_keeps_fields_absent_from_payload() {
    let app = app();
    let created = send(
        &app,
        Method::Post,
        "/users",
        Some(r#"{"name":"Bob","email":"bob@example.com"}"#),
    )
    .await;
    let id = json_body(&created)["id"].as_i64().unwrap();

    let updated = send(&app, Method::Put, &format!("/users/{id}"), Some(r#"{"email":"robert@example.com"}"#)).await;

    assert_eq!(updated.status_code(), 200);
    let v = json_body(&updated);
    assert_eq!(v["id"], id);
    assert_eq!(v["name"], "Bob");
    assert_eq!(v["email"], "robert@example.com");

    let fetched = send(&app, Method::Get, &format!("/users/{id}"), None).await;
    assert_eq!(json_body(&fetched), v);
}

#[tokio::test]
async fn invalid_records_never_reach_the_store() {
    let app = app();

    let create = send(&app, Method::Post, "/users", Some(r#"{"name":""}"#)).await;
    assert_eq!(create.status_code(), 400);
    assert_eq!(json_body(&create), json!({"error": "name is required"}));

    let list = send(&app, Method::Get, "/users", None).await;
    assert_eq!(json_body(&list), json!([]));
}

#[tokio::test]
async fn list_returns_users_in_creation_order() {
    let app = app();
    for name in ["Ann", "Ben", "Cid"] {
        send(&app, Method::Post, "/users", Some(&format!(r#"{{"name":"{name}"}}"#))).await;
    }

    let res = send(&app, Method::Get, "/users", None).await;

    assert_eq!(res.status_code(), 200);
    let names: Vec<Value> = json_body(&res)
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].clone())
        .collect();
    assert_eq!(names, ["Ann", "Ben", "Cid"]);
}

#[tokio::test]
async fn unknown_route_and_wrong_method() {
    let app = app();

    assert_eq!(send(&app, Method::Get, "/nope", None).await.status_code(), 404);
    assert_eq!(send(&app, Method::Patch, "/users/1", None).await.status_code(), 405);
}

#[tokio::test]
async fn cors_preflight_on_resource_route() {
    let req = Request::new(Method::Options, "/users/1")
        .with_header("Origin", "https://app.example")
        .with_header("Access-Control-Request-Method", "DELETE");

    let res = app().dispatch(req).await;

    assert_eq!(res.status_code(), 200);
    assert_eq!(res.header("access-control-allow-origin"), Some("*"));
    assert_eq!(res.header("access-control-allow-methods"), Some("DELETE"));
}

#[tokio::test]
async fn cross_origin_error_responses_carry_cors_headers() {
    let req = Request::new(Method::Get, "/users/12345").with_header("Origin", "https://app.example");

    let res = app().dispatch(req).await;

    assert_eq!(res.status_code(), 404);
    assert_eq!(res.header("access-control-allow-origin"), Some("*"));
}

#[tokio::test]
async fn default_policy_does_not_hand_credentials_to_any_origin() {
    let req = Request::new(Method::Get, "/users").with_header("Origin", "https://evil.example");

    let res = app().dispatch(req).await;

    assert_eq!(res.status_code(), 200);
    assert_ne!(res.header("access-control-allow-origin"), Some("https://evil.example"));
    assert_eq!(res.header("access-control-allow-credentials"), None);
}

#[tokio::test]
async fn configured_origin_is_echoed_with_credentials() {
    let mut config = Config::default();
    config.cors = config.cors.with_origins(vec!["https://app.example".to_owned()]);
    let app = routes::app(Arc::new(SqliteUserStore::in_memory().unwrap()), &config);
    let req = Request::new(Method::Get, "/users").with_header("Origin", "https://app.example");

    let res = app.dispatch(req).await;

    assert_eq!(res.header("access-control-allow-origin"), Some("https://app.example"));
    assert_eq!(res.header("access-control-allow-credentials"), Some("true"));
}
