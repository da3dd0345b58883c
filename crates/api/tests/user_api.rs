//! HTTP-level integration tests for user profiles.

mod common;

use axum::http::StatusCode;
use campus_db::models::payment::{CreatePayment, PaymentMethod};
use campus_db::repositories::PaymentRepo;
use common::{assert_json, get, patch_json, seed_user};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn profile_embeds_payment_history(pool: PgPool) {
    let (user_id, token) = seed_user(&pool, "profile@example.com").await;

    PaymentRepo::create(
        &pool,
        &CreatePayment {
            user_id,
            amount_minor: 4_900,
            payment_method: PaymentMethod::Cash,
            paid_course_id: None,
            paid_lesson_id: None,
            provider_product_id: None,
            provider_price_id: None,
            provider_session_id: None,
            payment_url: None,
        },
    )
    .await
    .unwrap();

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/users/{user_id}"), Some(&token)).await;

    let json = assert_json(response, StatusCode::OK).await;
    assert_eq!(json["email"], "profile@example.com");
    assert_eq!(json["full_name"], "profile@example.com");
    let payments = json["payments"].as_array().unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0]["amount_minor"], 4900);
    assert_eq!(payments[0]["payment_method"], "cash");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn profile_updates_are_self_only(pool: PgPool) {
    let (alice_id, alice_token) = seed_user(&pool, "alice@example.com").await;
    let (_, bob_token) = seed_user(&pool, "bob@example.com").await;

    // Alice edits her own profile.
    let app = common::build_test_app(pool.clone());
    let response = patch_json(
        app,
        &format!("/api/v1/users/{alice_id}"),
        Some(&alice_token),
        serde_json::json!({"first_name": "Alice", "last_name": "Doe", "city": "Utrecht"}),
    )
    .await;
    let json = assert_json(response, StatusCode::OK).await;
    assert_eq!(json["full_name"], "Alice Doe");
    assert_eq!(json["city"], "Utrecht");

    // Bob cannot edit Alice's profile.
    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/users/{alice_id}"),
        Some(&bob_token),
        serde_json::json!({"first_name": "Mallory"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn user_list_requires_authentication(pool: PgPool) {
    seed_user(&pool, "someone@example.com").await;

    let app = common::build_test_app(pool.clone());
    let anonymous = get(app, "/api/v1/users", None).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let (_, token) = seed_user(&pool, "viewer@example.com").await;
    let app = common::build_test_app(pool);
    let listed = get(app, "/api/v1/users", Some(&token)).await;
    let json = assert_json(listed, StatusCode::OK).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}
