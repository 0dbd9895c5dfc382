mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn register_logs_in_and_redirects() -> Result<()> {
    let app = TestApp::new();
    let mut client = app.client();

    let res = client
        .post("/register", json!({ "username": "alice", "email": "alice@example.com", "password": "pw" }))
        .await?;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location.as_deref(), Some("/campgrounds"));
    assert_eq!(res.data()["user"]["username"], "alice");

    let notices = client.notices().await?;
    assert_eq!(notices["success"], json!(["Welcome, alice!"]));

    // Logged in: the new-campground form is reachable
    let res = client.get("/campgrounds/new").await?;
    assert_eq!(res.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_is_rejected() -> Result<()> {
    let app = TestApp::new();
    app.user("alice").await?;

    let res = app
        .client()
        .post("/register", json!({ "username": "alice", "password": "other" }))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.code(), Some("VALIDATION_FAILED"));
    Ok(())
}

#[tokio::test]
async fn registration_checks_username_format() -> Result<()> {
    let app = TestApp::new();
    let res = app
        .client()
        .post("/register", json!({ "username": "_x", "password": "pw" }))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn login_failure_does_not_reveal_which_part_was_wrong() -> Result<()> {
    let app = TestApp::new();
    app.user("alice").await?;

    let unknown = app
        .client()
        .post("/login", json!({ "username": "nobody", "password": "correct horse" }))
        .await?;
    let wrong = app
        .client()
        .post("/login", json!({ "username": "alice", "password": "wrong" }))
        .await?;

    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body, wrong.body);
    assert_eq!(unknown.code(), Some("AUTHENTICATION_FAILED"));
    Ok(())
}

#[tokio::test]
async fn login_resumes_interrupted_page() -> Result<()> {
    let app = TestApp::new();
    app.user("alice").await?;

    let mut client = app.client();
    let res = client.get("/campgrounds/new").await?;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location.as_deref(), Some("/login"));

    let res = client
        .post("/login", json!({ "username": "alice", "password": "correct horse" }))
        .await?;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location.as_deref(), Some("/campgrounds/new"));

    // return_to is consumed by the first login
    client.get("/logout").await?;
    let res = client
        .post("/login", json!({ "username": "alice", "password": "correct horse" }))
        .await?;
    assert_eq!(res.location.as_deref(), Some("/campgrounds"));
    Ok(())
}

#[tokio::test]
async fn logout_drops_identity() -> Result<()> {
    let app = TestApp::new();
    let (mut client, _) = app.user("alice").await?;

    let res = client.get("/logout").await?;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location.as_deref(), Some("/campgrounds"));
    assert_eq!(res.data()["logged_out"], true);

    let res = client.get("/campgrounds/new").await?;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location.as_deref(), Some("/login"));
    Ok(())
}

#[tokio::test]
async fn login_form_drains_notices_once() -> Result<()> {
    let app = TestApp::new();
    let mut client = app.client();

    client.get("/campgrounds/new").await?;
    let first = client.notices().await?;
    assert_eq!(first["error"], json!(["Please log in first"]));

    let second = client.notices().await?;
    assert_eq!(second["error"], json!([]));
    Ok(())
}

#[tokio::test]
async fn password_is_checked_verbatim() -> Result<()> {
    let app = TestApp::new();
    let res = app
        .client()
        .post("/register", json!({ "username": "dave", "password": "  hunter2  " }))
        .await?;
    assert_eq!(res.status, StatusCode::FOUND);

    let trimmed = app
        .client()
        .post("/login", json!({ "username": "dave", "password": "hunter2" }))
        .await?;
    assert_eq!(trimmed.status, StatusCode::UNAUTHORIZED);

    let exact = app
        .client()
        .post("/login", json!({ "username": "dave", "password": "  hunter2  " }))
        .await?;
    assert_eq!(exact.status, StatusCode::FOUND);

    // Whitespace is a legal credential too
    let res = app
        .client()
        .post("/register", json!({ "username": "erin", "password": "   " }))
        .await?;
    assert_eq!(res.status, StatusCode::FOUND);
    Ok(())
}
