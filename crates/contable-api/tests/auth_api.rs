mod common;

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use contable_security::JwtService;

use common::{spawn_app, AUDIENCE, ISSUER, PASSWORD, SECRET, USERNAME};

const PROTECTED: [(&str, &str); 5] = [
    ("GET", "/api/document"),
    ("GET", "/api/document/1"),
    ("POST", "/api/document"),
    ("PUT", "/api/document/1"),
    ("DELETE", "/api/taxdocuments/1"),
];

fn method(name: &str) -> Method {
    Method::from_bytes(name.as_bytes()).unwrap()
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = spawn_app().await;

    for (verb, uri) in PROTECTED {
        let body = (verb == "POST" || verb == "PUT").then(|| json!({"Id": 1}));
        let res = app.call(method(verb), uri, None, body).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{} {}", verb, uri);
        assert_eq!(res.headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    }
}

#[tokio::test]
async fn test_valid_token_passes_gate() {
    let app = spawn_app().await;

    let anonymous = app.call(Method::GET, "/api/document", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let authed = app.authed(Method::GET, "/api/document", None).await;
    assert_eq!(authed.status, StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_tokens_rejected() {
    let app = spawn_app().await;

    let wrong_secret = JwtService::new("another-secret-another-secret-1234", ISSUER, AUDIENCE, 3600)
        .generate_access_token(1, USERNAME)
        .unwrap();
    let wrong_issuer = JwtService::new(SECRET, "intruso", AUDIENCE, 3600)
        .generate_access_token(1, USERNAME)
        .unwrap();
    let wrong_audience = JwtService::new(SECRET, ISSUER, "otra-api", 3600)
        .generate_access_token(1, USERNAME)
        .unwrap();

    for token in [
        wrong_secret.as_str(),
        wrong_issuer.as_str(),
        wrong_audience.as_str(),
        "not.a.jwt",
    ] {
        let res = app
            .call(Method::GET, "/api/document", Some(token), None)
            .await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_login_issues_usable_token() {
    let app = spawn_app().await;

    let res = app
        .call(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"Username": USERNAME, "Password": PASSWORD})),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["TokenType"], "Bearer");
    assert_eq!(res.body["ExpiresIn"], 3600);

    let token = res.body["AccessToken"].as_str().unwrap().to_string();
    let claims = app.jwt.validate_token(&token).unwrap();
    assert_eq!(claims.username, USERNAME);

    let created = app
        .call(
            Method::POST,
            "/api/document",
            Some(&token),
            Some(json!({"Folio": "1"})),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let app = spawn_app().await;

    for body in [
        json!({"Username": USERNAME, "Password": "incorrecta"}),
        json!({"Username": "nadie", "Password": PASSWORD}),
    ] {
        let res = app
            .call(Method::POST, "/api/auth/login", None, Some(body))
            .await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
        assert_eq!(res.body["message"], "Invalid credentials");
    }
}

#[tokio::test]
async fn test_login_requires_fields() {
    let app = spawn_app().await;
    let res = app
        .call(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"Username": "", "Password": PASSWORD})),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = spawn_app().await;
    let res = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "healthy");
}
