use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use roster::config::Config;
use tower::ServiceExt;

/// Password seeded for the bootstrap admin account by the initial migration
const ADMIN_PASSWORD: &str = "Admin123!";

async fn spawn_app() -> Router {
    let db_path = std::env::temp_dir().join(format!("roster-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = roster::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    roster::api::router(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Signs in and returns the session cookie to replay on later requests.
async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "username": username, "password": password }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_requests_without_session_are_rejected() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/people")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["success"], serde_json::json!(false));
    assert_eq!(json["error"], "Not authenticated");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users/import")
                .body(Body::from("alice,Passw0rd"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "username": "admin",
                        "password": "invalid-password"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid credentials");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "username": "nobody",
                        "password": "Passw0rd"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "username": "", "password": "Passw0rd" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_session_and_logout_flow() {
    let app = spawn_app().await;

    // Username matching is case-insensitive; the session keeps the
    // canonical casing from the database.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "username": "ADMIN",
                        "password": ADMIN_PASSWORD
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "admin");
    assert_eq!(json["data"]["must_change_password"], serde_json::json!(false));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, cookie.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // Account data must never be cached by the browser
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-cache, no-store, must-revalidate"
    );

    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "admin");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .header(header::COOKIE, cookie.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, cookie.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password_verifies_current_and_policy() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", ADMIN_PASSWORD).await;

    // A wrong current password leaves the credential untouched
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/auth/password")
                .header("Content-Type", "application/json")
                .header(header::COOKIE, cookie.as_str())
                .body(Body::from(
                    serde_json::json!({
                        "current_password": "WrongPass1",
                        "new_password": "Chang3dPw"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["field"], "current_password");
    assert_eq!(json["error"], "Current password is incorrect");

    login(&app, "admin", ADMIN_PASSWORD).await;

    // Weak replacement rejected
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/auth/password")
                .header("Content-Type", "application/json")
                .header(header::COOKIE, cookie.as_str())
                .body(Body::from(
                    serde_json::json!({
                        "current_password": ADMIN_PASSWORD,
                        "new_password": "weak"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["field"], "new_password");
    assert_eq!(json["error"], "Password must be between 8 and 12 characters");

    // Reusing the current password rejected
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/auth/password")
                .header("Content-Type", "application/json")
                .header(header::COOKIE, cookie.as_str())
                .body(Body::from(
                    serde_json::json!({
                        "current_password": ADMIN_PASSWORD,
                        "new_password": ADMIN_PASSWORD
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "New password must be different from current password"
    );

    // Valid change takes effect immediately
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/auth/password")
                .header("Content-Type", "application/json")
                .header(header::COOKIE, cookie.as_str())
                .body(Body::from(
                    serde_json::json!({
                        "current_password": ADMIN_PASSWORD,
                        "new_password": "Chang3dPw"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["message"], "Password updated successfully");

    login(&app, "admin", "Chang3dPw").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "username": "admin",
                        "password": ADMIN_PASSWORD
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_users_crud() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", ADMIN_PASSWORD).await;

    // Policy violations are rejected up front
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users")
                .header("Content-Type", "application/json")
                .header(header::COOKIE, cookie.as_str())
                .body(Body::from(
                    serde_json::json!({ "username": "alice", "password": "weak" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["field"], "password");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users")
                .header("Content-Type", "application/json")
                .header(header::COOKIE, cookie.as_str())
                .body(Body::from(
                    serde_json::json!({ "username": "   ", "password": "Passw0rd" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["field"], "username");

    // Create
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users")
                .header("Content-Type", "application/json")
                .header(header::COOKIE, cookie.as_str())
                .body(Body::from(
                    serde_json::json!({ "username": "alice", "password": "Passw0rd" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "alice");
    assert_eq!(json["data"]["must_change_password"], serde_json::json!(false));
    let alice_id = json["data"]["id"].as_i64().unwrap();

    // Usernames collide case-insensitively
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users")
                .header("Content-Type", "application/json")
                .header(header::COOKIE, cookie.as_str())
                .body(Body::from(
                    serde_json::json!({ "username": "ALICE", "password": "Another1A" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "A user with that username already exists");

    // Listed alphabetically
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .header(header::COOKIE, cookie.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let users = json["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "admin");
    assert_eq!(users[1]["username"], "alice");

    // The new account can sign in
    login(&app, "alice", "Passw0rd").await;

    // Delete
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/users/{alice_id}"))
                .header(header::COOKIE, cookie.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/users/{alice_id}"))
                .header(header::COOKIE, cookie.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "username": "alice", "password": "Passw0rd" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_account_is_protected() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", ADMIN_PASSWORD).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .header(header::COOKIE, cookie.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_json(response).await;
    let admin_id = json["data"][0]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/users/{admin_id}"))
                .header(header::COOKIE, cookie.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Cannot delete the admin account");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/users/{admin_id}/password"))
                .header("Content-Type", "application/json")
                .header(header::COOKIE, cookie.as_str())
                .body(Body::from(
                    serde_json::json!({ "new_password": "Tempor4ry" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Cannot reset the admin account's password");
}

#[tokio::test]
async fn test_password_reset_forces_rotation() {
    let app = spawn_app().await;
    let admin_cookie = login(&app, "admin", ADMIN_PASSWORD).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users")
                .header("Content-Type", "application/json")
                .header(header::COOKIE, admin_cookie.as_str())
                .body(Body::from(
                    serde_json::json!({ "username": "bob", "password": "Passw0rd" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let bob_id = json["data"]["id"].as_i64().unwrap();

    // Reset must satisfy the same policy as every other password
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/users/{bob_id}/password"))
                .header("Content-Type", "application/json")
                .header(header::COOKIE, admin_cookie.as_str())
                .body(Body::from(
                    serde_json::json!({ "new_password": "weak" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/users/{bob_id}/password"))
                .header("Content-Type", "application/json")
                .header(header::COOKIE, admin_cookie.as_str())
                .body(Body::from(
                    serde_json::json!({ "new_password": "Tempor4ry" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // The old credential no longer works
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "username": "bob", "password": "Passw0rd" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The reset credential signs in flagged for rotation
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "username": "bob", "password": "Tempor4ry" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bob_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    let json = body_json(response).await;
    assert_eq!(json["data"]["must_change_password"], serde_json::json!(true));

    // Every registry and admin route is gated until the change happens
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/people")
                .header(header::COOKIE, bob_cookie.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "You must change your password before continuing."
    );

    // The identity and password-change endpoints stay reachable
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, bob_cookie.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["must_change_password"], serde_json::json!(true));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/auth/password")
                .header("Content-Type", "application/json")
                .header(header::COOKIE, bob_cookie.as_str())
                .body(Body::from(
                    serde_json::json!({
                        "current_password": "Tempor4ry",
                        "new_password": "Fresh5tart"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // The gate lifts on the same session, no re-login needed
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/people")
                .header(header::COOKIE, bob_cookie.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
