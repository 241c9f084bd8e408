#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use contable_api::{build_router, AppState};
use contable_core::services::{AuthService, DocumentService};
use contable_infrastructure::{InMemoryDocumentRepository, InMemoryUserRepository};
use contable_security::JwtService;

pub const SECRET: &str = "test-secret-test-secret-test-secret";
pub const ISSUER: &str = "sistema-contable";
pub const AUDIENCE: &str = "contable-api";
pub const USERNAME: &str = "contador";
pub const PASSWORD: &str = "s3creta";

pub struct TestApp {
    pub router: Router,
    pub jwt: Arc<JwtService>,
    pub token: String,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn spawn_app() -> TestApp {
    let jwt = Arc::new(JwtService::new(SECRET, ISSUER, AUDIENCE, 3600));
    let auth = Arc::new(AuthService::new(
        Arc::new(InMemoryUserRepository::new()),
        jwt.clone(),
    ));
    auth.ensure_bootstrap_user(USERNAME, PASSWORD).await.unwrap();

    let state = AppState {
        documents: Arc::new(DocumentService::new(Arc::new(
            InMemoryDocumentRepository::new(),
        ))),
        auth,
        jwt: jwt.clone(),
    };

    let token = jwt.generate_access_token(1, USERNAME).unwrap();
    TestApp {
        router: build_router(state, &[]),
        jwt,
        token,
    }
}

impl TestApp {
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Same as [`TestApp::call`] with the default valid token.
    pub async fn authed(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let token = self.token.clone();
        self.call(method, uri, Some(&token), body).await
    }
}
