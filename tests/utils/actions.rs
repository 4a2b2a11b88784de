use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Request, StatusCode},
};
use cookie::Cookie;
use serde::de::DeserializeOwned;
use serde_json::json;
use tower::ServiceExt; // for `oneshot`

use postboard::TokenResponse;

use super::setup::TestApp;

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("response body is not the expected JSON")
    }

    /// The `jid` cookie set by this response, if any
    pub fn refresh_cookie(&self) -> Option<Cookie<'static>> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| Cookie::parse(value.to_string()).ok())
            .find(|cookie| cookie.name() == "jid")
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.refresh_cookie()
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn access_token(&self) -> String {
        self.json::<TokenResponse>().access_token
    }
}

/// Actions that drive the router like an HTTP client would
impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn register(&self, username: &str, password: &str) -> TestResponse {
        self.post_json(
            "/register",
            json!({ "username": username, "password": password }),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.post_json(
            "/login",
            json!({ "username": username, "password": password }),
        )
        .await
    }

    /// Registers and logs in, returning the login response
    pub async fn signed_in(&self, username: &str, password: &str) -> TestResponse {
        assert_eq!(
            self.register(username, password).await.status,
            StatusCode::CREATED
        );
        let login = self.login(username, password).await;
        assert_eq!(login.status, StatusCode::OK);
        login
    }

    async fn post_with_refresh_cookie(&self, uri: &str, refresh_token: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(token) = refresh_token {
            builder = builder.header(header::COOKIE, format!("jid={}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn refresh(&self, refresh_token: Option<&str>) -> TestResponse {
        self.post_with_refresh_cookie("/token", refresh_token).await
    }

    pub async fn logout(&self, refresh_token: Option<&str>) -> TestResponse {
        self.post_with_refresh_cookie("/token/logout", refresh_token)
            .await
    }

    pub async fn create_post(
        &self,
        access_token: Option<&str>,
        title: &str,
        content: &str,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/posts")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = access_token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = json!({ "title": title, "content": content }).to_string();
        self.send(builder.body(Body::from(body)).unwrap()).await
    }
}
