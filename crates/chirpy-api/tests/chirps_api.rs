//! Chirp endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{bearer, body_json, build_test_app, send, signup_and_login};
use serde_json::json;

#[tokio::test]
async fn create_and_list_chirps() {
    let t = build_test_app();
    let (user_id, token, _) = signup_and_login(&t.app, "a@example.com", "pw").await;

    for n in 1..=3 {
        let response = send(
            &t.app,
            Method::POST,
            "/api/chirps",
            Some(&bearer(&token)),
            Some(json!({ "body": format!("chirp {}", n) })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["id"], n);
        assert_eq!(json["author_id"], user_id);
    }

    let response = send(&t.app, Method::GET, "/api/chirps", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let ids: Vec<u64> = body_json(response)
        .await
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let one = send(&t.app, Method::GET, "/api/chirps/2", None, None).await;
    assert_eq!(body_json(one).await["body"], "chirp 2");
}

#[tokio::test]
async fn create_chirp_requires_valid_token() {
    let t = build_test_app();
    let body = json!({ "body": "hello" });

    let anonymous = send(&t.app, Method::POST, "/api/chirps", None, Some(body.clone())).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let forged = chirpy_api::jwt::issue_access_token(1, "other-secret", chrono::Duration::hours(1))
        .unwrap();
    let response = send(
        &t.app,
        Method::POST,
        "/api/chirps",
        Some(&bearer(&forged)),
        Some(body),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn chirp_length_and_profanity() {
    let t = build_test_app();
    let (_, token, _) = signup_and_login(&t.app, "a@example.com", "pw").await;

    let too_long = send(
        &t.app,
        Method::POST,
        "/api/chirps",
        Some(&bearer(&token)),
        Some(json!({ "body": "x".repeat(141) })),
    )
    .await;
    assert_eq!(too_long.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(too_long).await["error"], "Chirp is too long");

    let cleaned = send(
        &t.app,
        Method::POST,
        "/api/chirps",
        Some(&bearer(&token)),
        Some(json!({ "body": "what a Kerfuffle today" })),
    )
    .await;
    assert_eq!(cleaned.status(), StatusCode::CREATED);
    assert_eq!(body_json(cleaned).await["body"], "what a **** today");
}

#[tokio::test]
async fn only_author_can_delete() {
    let t = build_test_app();
    let (_, alice, _) = signup_and_login(&t.app, "alice@example.com", "pw").await;
    let (_, bob, _) = signup_and_login(&t.app, "bob@example.com", "pw").await;

    let created = send(
        &t.app,
        Method::POST,
        "/api/chirps",
        Some(&bearer(&alice)),
        Some(json!({ "body": "alice was here" })),
    )
    .await;
    let id = body_json(created).await["id"].as_u64().unwrap();
    let uri = format!("/api/chirps/{}", id);

    let by_bob = send(&t.app, Method::DELETE, &uri, Some(&bearer(&bob)), None).await;
    assert_eq!(by_bob.status(), StatusCode::FORBIDDEN);

    let by_alice = send(&t.app, Method::DELETE, &uri, Some(&bearer(&alice)), None).await;
    assert_eq!(by_alice.status(), StatusCode::NO_CONTENT);

    let gone = send(&t.app, Method::GET, &uri, None, None).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_is_a_bad_request() {
    let t = build_test_app();
    let response = send(&t.app, Method::GET, "/api/chirps/abc", None, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}
