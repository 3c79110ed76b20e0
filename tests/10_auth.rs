mod common;

use anyhow::Result;
use common::{send, TestApp, PASSWORD};
use internship_portal::types::Role;
use reqwest::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn health_and_root_respond() -> Result<()> {
    let app = TestApp::spawn().await?;

    let (status, body) = send(app.request(Method::GET, "/health", None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");

    let (status, body) = send(app.request(Method::GET, "/", None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["endpoints"]["faculty"].is_string());
    Ok(())
}

#[tokio::test]
async fn register_then_login_and_whoami() -> Result<()> {
    let app = TestApp::spawn().await?;

    let (status, body) = send(app.request(Method::POST, "/auth/register", None).json(&json!({
        "email": "Asha@College.edu",
        "name": "Asha",
        "password": PASSWORD,
        "rollNumber": "CS-042"
    })))
    .await?;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["user"]["role"], "STUDENT");
    assert_eq!(body["data"]["user"]["email"], "asha@college.edu");
    assert!(body["data"]["user"].get("passwordHash").is_none());
    assert!(body["data"]["expiresIn"].as_u64().unwrap_or(0) > 0);

    let token = app.login("asha@college.edu").await?;
    let (status, body) = app.get("/api/auth/whoami", &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rollNumber"], "CS-042");

    let (status, body) = send(app.request(Method::PUT, "/api/auth/session/refresh", Some(&token))).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].is_string());
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_conflicts() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.seed_user("asha@college.edu", Role::Student).await?;

    let (status, body) = send(app.request(Method::POST, "/auth/register", None).json(&json!({
        "email": "ASHA@college.edu",
        "name": "Someone Else",
        "password": PASSWORD
    })))
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
    Ok(())
}

#[tokio::test]
async fn registration_validates_fields() -> Result<()> {
    let app = TestApp::spawn().await?;

    let (status, body) = send(app.request(Method::POST, "/auth/register", None).json(&json!({
        "email": "not-an-email",
        "name": "",
        "password": "short"
    })))
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["email"].is_string());
    assert!(body["field_errors"]["name"].is_string());
    assert!(body["field_errors"]["password"].is_string());
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.seed_user("asha@college.edu", Role::Student).await?;

    let (status, body) = send(
        app.request(Method::POST, "/auth/login", None)
            .json(&json!({ "email": "asha@college.edu", "password": "wrong-password" })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid email or password");
    Ok(())
}

#[tokio::test]
async fn role_guards_protect_route_groups() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (_, student) = app.seed_and_login("asha@college.edu", Role::Student).await?;
    let (_, faculty) = app.seed_and_login("mentor@college.edu", Role::Faculty).await?;

    let (status, _) = send(app.request(Method::GET, "/api/faculty/profile", None)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/api/faculty/profile", &student).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = app.get("/api/student/profile", &faculty).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/principal/dashboard", &faculty).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get("/api/faculty/profile", &faculty).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "FACULTY");
    Ok(())
}

#[tokio::test]
async fn deactivated_account_token_is_refused() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (mut user, token) = app.seed_and_login("asha@college.edu", Role::Student).await?;

    user.is_active = false;
    app.state.service.store().update_user(user).await?;

    let (status, _) = app.get("/api/student/profile", &token).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}
