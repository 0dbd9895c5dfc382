#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use campground_api::config::AppConfig;
use campground_api::database::{MemoryStore, ResourceStore};
use campground_api::state::AppState;

/// One router plus the store behind it, shared by every client of a test
#[derive(Clone)]
pub struct TestApp {
    pub store: Arc<dyn ResourceStore>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn ResourceStore>) -> Self {
        let router = campground_api::app(AppState::new(store.clone()), &AppConfig::development());
        Self { store, router }
    }

    /// A browser with an empty cookie jar
    pub fn client(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// A browser already registered and logged in as `username`
    pub async fn user(&self, username: &str) -> Result<(TestClient, String)> {
        let mut client = self.client();
        let res = client
            .post("/register", json!({ "username": username, "password": "correct horse" }))
            .await?;
        anyhow::ensure!(res.status == StatusCode::FOUND, "register failed: {:?}", res.body);
        let id = res.body["data"]["user"]["user_id"]
            .as_str()
            .context("register response carries no user id")?
            .to_string();
        // Drop the welcome notice so tests start with an empty queue
        client.get("/campgrounds").await?;
        Ok((client, id))
    }
}

pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn code(&self) -> Option<&str> {
        self.body["code"].as_str()
    }
}

impl TestClient {
    pub async fn get(&mut self, path: &str) -> Result<TestResponse> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&mut self, path: &str, body: Value) -> Result<TestResponse> {
        self.send(Method::POST, path, Some(body.to_string())).await
    }

    pub async fn put(&mut self, path: &str, body: Value) -> Result<TestResponse> {
        self.send(Method::PUT, path, Some(body.to_string())).await
    }

    pub async fn delete(&mut self, path: &str) -> Result<TestResponse> {
        self.send(Method::DELETE, path, None).await
    }

    /// Send a raw, possibly malformed, JSON body
    pub async fn post_raw(&mut self, path: &str, body: &str) -> Result<TestResponse> {
        self.send(Method::POST, path, Some(body.to_string())).await
    }

    /// Pending notices, drained the way any rendered view drains them
    pub async fn notices(&mut self) -> Result<Value> {
        let res = self.get("/login").await?;
        Ok(res.body["notices"].clone())
    }

    async fn send(&mut self, method: Method, path: &str, body: Option<String>) -> Result<TestResponse> {
        let mut request = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))?,
            None => request.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str()?.split(';').next().unwrap_or_default();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };

        Ok(TestResponse { status, location, body })
    }
}

pub fn campground(title: &str, price: f64) -> Value {
    json!({
        "campground": {
            "title": title,
            "price": price,
            "location": "長野県白馬村",
            "description": "Quiet lakeside pitches"
        }
    })
}

pub fn review(body: &str, rating: i64) -> Value {
    json!({ "review": { "body": body, "rating": rating } })
}

/// Create a campground as `client` and return its id
pub async fn create_campground(client: &mut TestClient, title: &str) -> Result<String> {
    let res = client.post("/campgrounds", campground(title, 1500.0)).await?;
    anyhow::ensure!(res.status == StatusCode::FOUND, "create failed: {:?}", res.body);
    Ok(res.data()["id"].as_str().context("no campground id")?.to_string())
}
