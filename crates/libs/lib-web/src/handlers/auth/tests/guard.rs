//! # Session Guard Tests

use super::*;
use crate::middleware::mw_auth::LOGIN_REQUIRED_MESSAGE;

#[tokio::test]
async fn test_protected_route_redirects_to_login() {
    let state = test_state(None).await;

    let response = test_app(&state).oneshot(get("/", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/login"));
    assert_eq!(
        flashes(&response),
        vec![("info".to_string(), LOGIN_REQUIRED_MESSAGE.to_string())]
    );
}

#[tokio::test]
async fn test_guard_flash_shows_on_login_page() {
    let state = test_state(None).await;

    let response = test_app(&state).oneshot(get("/", None)).await.unwrap();
    let flash = set_cookies(&response)
        .into_iter()
        .find(|c| c.starts_with("flash="))
        .unwrap();

    let response = test_app(&state).oneshot(get("/login", Some(&flash))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    // Shown once, then the cookie is cleared
    assert!(set_cookies(&response).contains(&"flash=".to_string()));
    assert!(body_string(response).await.contains(LOGIN_REQUIRED_MESSAGE));
}

#[tokio::test]
async fn test_tampered_token_is_rejected() {
    let state = test_state(None).await;
    let user = create_user(&state.db, "testuser", "password").await;
    let cookie = format!("{}x", session_cookie(&user));

    let response = test_app(&state).oneshot(get("/", Some(&cookie))).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_deleted_user_loses_access() {
    let state = test_state(None).await;
    let user = create_user(&state.db, "testuser", "password").await;
    let cookie = session_cookie(&user);

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user.id)
        .execute(&state.db)
        .await
        .unwrap();

    let response = test_app(&state).oneshot(get("/", Some(&cookie))).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_plot_requires_login() {
    let state = test_state(Some(bars_frame(3))).await;

    let response = test_app(&state)
        .oneshot(post_form(
            "/plot",
            "ticker=AAPL&start_date=2023-01-01&end_date=2023-01-03",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_health_is_public() {
    let state = test_state(None).await;

    let response = test_app(&state).oneshot(get("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_string(response).await, "OK");
}
