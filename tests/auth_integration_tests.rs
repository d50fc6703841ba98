mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use common::{issue_codes, json_request, spawn_app, spawn_production_app, uuid_of};
use institute_portal::{
    MockRepository,
    auth::{TokenClaims, hash_password, issue_token, verify_token},
    models::hr::USERS_TABLE,
};
use serde_json::{Value, json};

const EMAIL: &str = "karim@example.edu";
const PASSWORD: &str = "correct-horse";

fn seed_user(repo: &MockRepository, email: &str, pass: &str, status: bool) -> String {
    let uuid = uuid_of(if status { 'k' } else { 'x' });
    repo.seed(
        &USERS_TABLE,
        json!({
            "id": 1,
            "uuid": uuid,
            "name": "Karim Hossain",
            "email": email,
            "pass": pass,
            "status": status,
            "can_access": "hr__users,procure__item",
            "department_name": "Registrar",
            "designation_name": "Officer",
        }),
    );
    uuid
}

fn repo_with_active_user() -> MockRepository {
    let repo = MockRepository::new();
    seed_user(&repo, EMAIL, &hash_password(PASSWORD).unwrap(), true);
    repo
}

fn sign_in_request(email: &str, pass: &str) -> Request<Body> {
    json_request(Method::POST, "/v1/signin", json!({ "email": email, "pass": pass }))
}

fn bearer_get(uri: &str, token: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

// --- Sign-in ---

#[tokio::test]
async fn test_sign_in_returns_verifiable_token() {
    let app = spawn_production_app(repo_with_active_user());

    let (status, body) = app.send(sign_in_request(EMAIL, PASSWORD)).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let token = body["token"].as_str().unwrap();
    assert!(verify_token(token, &app.config.jwt_secret));

    assert_eq!(body["payload"]["username"], "Karim Hossain");
    assert_eq!(body["payload"]["email"], EMAIL);
    assert_eq!(body["can_access"], "hr__users,procure__item");
    assert_eq!(
        body["user"],
        json!({
            "uuid": uuid_of('k'),
            "name": "Karim Hossain",
            "department_name": "Registrar",
            "designation_name": "Officer",
        })
    );
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let app = spawn_production_app(repo_with_active_user());

    let (wrong_status, wrong) = app.send(sign_in_request(EMAIL, "battery-staple")).await;
    let (unknown_status, unknown) = app
        .send(sign_in_request("nobody@example.edu", PASSWORD))
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong, json!({ "message": "Email/Password does not match" }));
    assert_eq!(unknown_status, wrong_status);
    assert_eq!(unknown, wrong);
    assert!(wrong.get("token").is_none());
}

#[tokio::test]
async fn test_disabled_account_is_refused_before_password_check() {
    let repo = MockRepository::new();
    // An unparsable hash would surface as a 500 if the password were compared.
    seed_user(&repo, EMAIL, "not-a-password-hash", false);
    let app = spawn_production_app(repo);

    let (status, body) = app.send(sign_in_request(EMAIL, PASSWORD)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Account is disabled" }));
}

#[tokio::test]
async fn test_malformed_sign_in_is_a_validation_error() {
    let app = spawn_production_app(repo_with_active_user());

    let (status, body) = app.send(sign_in_request("not-an-email", "")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(issue_codes(&body), vec!["email", "length"]);
}

// --- Bearer enforcement ---

#[tokio::test]
async fn test_signed_in_token_opens_protected_routes() {
    let app = spawn_production_app(repo_with_active_user());
    let (_, body) = app.send(sign_in_request(EMAIL, PASSWORD)).await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, users) = app.send(bearer_get("/v1/hr/users", &token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_protected_routes_reject_missing_or_bad_tokens() {
    let app = spawn_production_app(MockRepository::new());

    let expired = {
        let mut claims = TokenClaims::new(&uuid_of('k'), "Karim", EMAIL, None);
        claims.exp -= 2 * 24 * 60 * 60;
        issue_token(&claims, &app.config.jwt_secret).unwrap()
    };
    let foreign = issue_token(
        &TokenClaims::new(&uuid_of('k'), "Karim", EMAIL, None),
        "some-other-secret",
    )
    .unwrap();

    let (status, body) = app.get("/v1/hr/users").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Unauthorized" }));

    for token in ["garbage", expired.as_str(), foreign.as_str()] {
        let (status, _) = app.send(bearer_get("/v1/procure/vendor", token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "token {token} was accepted");
    }

    let (status, _) = app
        .json(Method::POST, "/v1/portfolio/offer", json!({ "title": "x" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let app = spawn_production_app(MockRepository::new());

    let (status, _) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/v1/portfolio/offer").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    // Reaches validation rather than being turned away at the door.
    let (status, _) = app
        .json(Method::POST, "/v1/portfolio/online-admission", json!({}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_visitor_submissions_need_a_token_to_read() {
    let app = spawn_production_app(repo_with_active_user());

    for uri in [
        "/v1/portfolio/contact-us".to_string(),
        "/v1/portfolio/online-admission".to_string(),
        format!("/v1/portfolio/online-admission/{}", uuid_of('a')),
    ] {
        let (status, _) = app.get(&uri).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri} was readable without a token");
    }

    let (_, body) = app.send(sign_in_request(EMAIL, PASSWORD)).await;
    let token = body["token"].as_str().unwrap().to_string();
    let (status, body) = app
        .send(bearer_get("/v1/portfolio/contact-us", &token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_preflight_is_answered_without_a_token() {
    let app = spawn_production_app(MockRepository::new());
    let origin = app.config.cors_origins[0].clone();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/v1/hr/users")
        .header(header::ORIGIN, &origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        origin.as_str()
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );
}

#[tokio::test]
async fn test_local_mode_skips_bearer_checks() {
    let app = spawn_app();

    let (status, body) = app.get("/v1/hr/users").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(vec![]));
}
