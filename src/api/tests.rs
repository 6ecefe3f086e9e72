//! Router-level tests: in-memory store, static key set, tokens signed with the
//! fixture key.
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::repos::{Drink, DrinkRepo, Ingredient, MemoryDrinkRepo, NewDrink, RepoError};
use crate::services::auth::test_support::{bearer, claims, gate, sign};
use crate::state::AppState;

const ALL: &[&str] = &[
    "get:drinks-detail",
    "post:drinks",
    "patch:drinks",
    "delete:drinks",
];

fn app() -> (Router, Arc<MemoryDrinkRepo>) {
    let repo = Arc::new(MemoryDrinkRepo::new());
    let state = AppState::new(repo.clone(), Arc::new(gate()));
    (super::routes().with_state(state), repo)
}

/// Store whose every call fails, as with an unreachable database.
struct UnavailableRepo;

fn pool_timeout<T>() -> Result<T, RepoError> {
    Err(RepoError::Db(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl DrinkRepo for UnavailableRepo {
    fn backend_name(&self) -> &'static str {
        "unavailable"
    }

    async fn list(&self) -> Result<Vec<Drink>, RepoError> {
        pool_timeout()
    }

    async fn get(&self, _id: i64) -> Result<Option<Drink>, RepoError> {
        pool_timeout()
    }

    async fn insert(&self, _drink: NewDrink) -> Result<Drink, RepoError> {
        pool_timeout()
    }

    async fn update(&self, _drink: &Drink) -> Result<Option<Drink>, RepoError> {
        pool_timeout()
    }

    async fn delete(&self, _id: i64) -> Result<bool, RepoError> {
        pool_timeout()
    }

    async fn reset(&self) -> Result<(), RepoError> {
        pool_timeout()
    }
}

fn unavailable_app() -> Router {
    let state = AppState::new(Arc::new(UnavailableRepo), Arc::new(gate()));
    super::routes().with_state(state)
}

async fn seed(repo: &MemoryDrinkRepo, title: &str) -> i64 {
    repo.insert(NewDrink {
        title: title.to_string(),
        recipe: vec![Ingredient {
            name: "coffee".to_string(),
            color: "brown".to_string(),
            parts: 2.0,
        }],
    })
    .await
    .unwrap()
    .id
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        req = req.header(header::AUTHORIZATION, auth);
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn public_list_of_empty_store_is_404() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/drinks", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"success": false, "error": 404, "message": "resource not found"})
    );
}

#[tokio::test]
async fn public_list_redacts_quantities() {
    let (app, repo) = app();
    let id = seed(&repo, "espresso").await;

    let (status, body) = send(&app, Method::GET, "/drinks", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "drinks": [{"id": id, "title": "espresso", "recipe": [{"name": "coffee", "color": "brown"}]}]
        })
    );
}

#[tokio::test]
async fn detail_requires_authorization_header() {
    let (app, repo) = app();
    seed(&repo, "espresso").await;

    let (status, body) = send(&app, Method::GET, "/drinks-detail", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], 401);
    assert_eq!(body["message"], "Authorization header is expected.");
}

#[tokio::test]
async fn malformed_header_is_401() {
    let (app, repo) = app();
    seed(&repo, "espresso").await;

    for (value, message) in [
        ("Token abc", "Authorization header must start with \"Bearer\"."),
        ("Bearer", "Authorization header must be bearer token."),
        ("Bearer a b", "Authorization header must be bearer token."),
    ] {
        let (status, body) = send(&app, Method::GET, "/drinks-detail", Some(value), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "header: {value}");
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], message, "header: {value}");
    }
}

#[tokio::test]
async fn detail_with_permission_returns_long_form() {
    let (app, repo) = app();
    seed(&repo, "espresso").await;
    let auth = bearer(&["get:drinks-detail"]);

    let (status, body) = send(&app, Method::GET, "/drinks-detail", Some(&auth), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["drinks"][0]["recipe"][0]["parts"], 2.0);
}

#[tokio::test]
async fn detail_without_permission_is_401() {
    let (app, repo) = app();
    seed(&repo, "espresso").await;
    let auth = bearer(&["post:drinks"]);

    let (status, body) = send(&app, Method::GET, "/drinks-detail", Some(&auth), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Permission not found.");
}

#[tokio::test]
async fn token_without_permissions_claim_is_400() {
    let (app, repo) = app();
    seed(&repo, "espresso").await;
    let mut c = claims(&[]);
    c.as_object_mut().unwrap().remove("permissions");
    let auth = format!("Bearer {}", sign(&c));

    let (status, _) = send(&app, Method::GET, "/drinks-detail", Some(&auth), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn every_protected_route_checks_its_own_permission() {
    let (app, repo) = app();
    let id = seed(&repo, "espresso").await;
    let cases = [
        (Method::GET, "/drinks-detail".to_string(), "get:drinks-detail", None),
        (
            Method::POST,
            "/drinks".to_string(),
            "post:drinks",
            Some(json!({"title": "latte", "recipe": {"name": "milk", "color": "white", "parts": 1}})),
        ),
        (
            Method::PATCH,
            format!("/drinks/{id}"),
            "patch:drinks",
            Some(json!({"title": "ristretto"})),
        ),
        (Method::DELETE, format!("/drinks/{id}"), "delete:drinks", None),
    ];

    for (method, uri, permission, body) in cases {
        let others: Vec<&str> = ALL.iter().copied().filter(|p| *p != permission).collect();
        let denied = bearer(&others);
        let (status, _) = send(&app, method.clone(), &uri, Some(&denied), body.clone()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri} without {permission}");

        let granted = bearer(&[permission]);
        let (status, _) = send(&app, method.clone(), &uri, Some(&granted), body).await;
        assert_eq!(status, StatusCode::OK, "{method} {uri} with {permission}");
    }
}

#[tokio::test]
async fn create_normalizes_single_recipe_object() {
    let (app, repo) = app();
    let auth = bearer(&["post:drinks"]);

    let (status, body) = send(
        &app,
        Method::POST,
        "/drinks",
        Some(&auth),
        Some(json!({"title": "latte", "recipe": {"name": "milk", "color": "white", "parts": 1}})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let created = &body["drinks"][0];
    assert_eq!(created["title"], "latte");
    assert_eq!(created["recipe"].as_array().unwrap().len(), 1);

    let id = created["id"].as_i64().unwrap();
    let stored = repo.get(id).await.unwrap().unwrap();
    assert_eq!(stored.recipe.len(), 1);
}

#[tokio::test]
async fn create_with_malformed_body_is_400() {
    let (app, repo) = app();
    let auth = bearer(&["post:drinks"]);

    for body in [
        json!({"title": "latte"}),
        json!({"recipe": [{"name": "milk", "color": "white", "parts": 1}]}),
        json!({"title": "latte", "recipe": "milk"}),
        json!({"title": "latte", "recipe": []}),
    ] {
        let (status, resp) = send(&app, Method::POST, "/drinks", Some(&auth), Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(resp["error"], 400);
    }

    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_with_invalid_json_is_400() {
    let (app, _) = app();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/drinks")
        .header(header::AUTHORIZATION, bearer(&["post:drinks"]))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_applies_only_present_fields() {
    let (app, repo) = app();
    let id = seed(&repo, "espresso").await;
    let auth = bearer(&["patch:drinks"]);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/drinks/{id}"),
        Some(&auth),
        Some(json!({"title": "doppio"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["title"], "doppio");
    assert_eq!(body["drinks"][0]["recipe"][0]["name"], "coffee");
    assert_eq!(repo.get(id).await.unwrap().unwrap().title, "doppio");
}

#[tokio::test]
async fn update_of_unknown_id_is_404() {
    let (app, _) = app();
    let auth = bearer(&["patch:drinks"]);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/drinks/999999",
        Some(&auth),
        Some(json!({"title": "ghost"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "resource not found");
}

#[tokio::test]
async fn update_with_empty_title_is_400() {
    let (app, repo) = app();
    let id = seed(&repo, "espresso").await;
    let auth = bearer(&["patch:drinks"]);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/drinks/{id}"),
        Some(&auth),
        Some(json!({"title": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(repo.get(id).await.unwrap().unwrap().title, "espresso");
}

#[tokio::test]
async fn delete_removes_drink_from_listing() {
    let (app, repo) = app();
    let keep = seed(&repo, "espresso").await;
    let gone = seed(&repo, "latte").await;
    let auth = bearer(&["delete:drinks"]);

    let (status, body) = send(&app, Method::DELETE, &format!("/drinks/{gone}"), Some(&auth), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "delete": gone}));

    let (_, listing) = send(&app, Method::GET, "/drinks", None, None).await;
    let ids: Vec<i64> = listing["drinks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![keep]);
}

#[tokio::test]
async fn delete_of_unknown_id_is_404() {
    let (app, _) = app();
    let auth = bearer(&["delete:drinks"]);

    let (status, _) = send(&app, Method::DELETE, "/drinks/999999", Some(&auth), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_integer_id_is_404() {
    let (app, _) = app();
    let auth = bearer(&["delete:drinks"]);

    let (status, body) = send(&app, Method::DELETE, "/drinks/abc", Some(&auth), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], 404);
}

#[tokio::test]
async fn auth_runs_before_id_lookup() {
    let (app, _) = app();

    let (status, _) = send(&app, Method::DELETE, "/drinks/999999", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_path_uses_error_envelope() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/coffee", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn health_needs_no_token() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn store_failure_while_modifying_is_400() {
    let app = unavailable_app();

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/drinks/1",
        Some(&bearer(&["patch:drinks"])),
        Some(json!({"title": "doppio"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], 400);
    assert_eq!(body["success"], false);

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/drinks/1",
        Some(&bearer(&["delete:drinks"])),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], 400);
}

#[tokio::test]
async fn store_failure_while_listing_is_500() {
    let app = unavailable_app();

    let (status, body) = send(&app, Method::GET, "/drinks", None, None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "internal server error");
}

#[tokio::test]
async fn unsupported_method_uses_error_envelope() {
    let (app, repo) = app();
    let id = seed(&repo, "espresso").await;

    for (method, uri) in [(Method::GET, format!("/drinks/{id}")), (Method::PUT, "/drinks".to_string())] {
        let (status, body) = send(&app, method.clone(), &uri, None, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
        assert_eq!(
            body,
            json!({"success": false, "error": 405, "message": "method not allowed"})
        );
    }
}

#[tokio::test]
async fn oversized_json_body_is_413() {
    let (app, _) = app();
    let app = app.layer(DefaultBodyLimit::max(64));

    let (status, body) = send(
        &app,
        Method::POST,
        "/drinks",
        Some(&bearer(&["post:drinks"])),
        Some(json!({
            "title": "x".repeat(200),
            "recipe": {"name": "milk", "color": "white", "parts": 1}
        })),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], 413);
    assert_eq!(body["message"], "request body is too large");
}
