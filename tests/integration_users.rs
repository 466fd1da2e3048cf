mod common;

use axum::http::StatusCode;
use common::{body_json, create_test_user, request, setup_test_app};
use rollbook_models::UserRole;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_lists_users(pool: PgPool) {
    let admin = create_test_user(&pool, UserRole::Admin).await;
    create_test_user(&pool, UserRole::Teacher).await;
    let app = setup_test_app(pool);

    let response = app
        .oneshot(request("GET", "/api/users", Some(&admin.token()), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 2);
    assert!(
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|u| u.get("password").is_none())
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_cannot_list_users(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let app = setup_test_app(pool);

    let response = app
        .oneshot(request("GET", "/api/users", Some(&teacher.token()), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await["error"],
        "User role teacher is not authorized to access this route"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_users_by_role(pool: PgPool) {
    let admin = create_test_user(&pool, UserRole::Admin).await;
    create_test_user(&pool, UserRole::Teacher).await;
    create_test_user(&pool, UserRole::Teacher).await;
    create_test_user(&pool, UserRole::Staff).await;
    let app = setup_test_app(pool);

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/users/role/teacher",
            Some(&admin.token()),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 2);
    assert!(
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|u| u["role"] == "teacher")
    );

    let response = app
        .oneshot(request(
            "GET",
            "/api/users/role/principal",
            Some(&admin.token()),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_user_can_read_self_but_not_others(pool: PgPool) {
    let staff = create_test_user(&pool, UserRole::Staff).await;
    let other = create_test_user(&pool, UserRole::Staff).await;
    let app = setup_test_app(pool);

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/users/{}", staff.id),
            Some(&staff.token()),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request(
            "GET",
            &format!("/api/users/{}", other.id),
            Some(&staff.token()),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_and_malformed_ids_are_not_found(pool: PgPool) {
    let admin = create_test_user(&pool, UserRole::Admin).await;
    let app = setup_test_app(pool);

    for id in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/api/users/{}", id),
                Some(&admin.token()),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_self_profile(pool: PgPool) {
    let staff = create_test_user(&pool, UserRole::Staff).await;
    let app = setup_test_app(pool);

    let response = app
        .oneshot(request(
            "PUT",
            &format!("/api/users/{}", staff.id),
            Some(&staff.token()),
            Some(json!({ "department": "Library", "position": "Librarian" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["department"], "Library");
    assert_eq!(body["data"]["role"], "staff");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_non_admin_cannot_change_own_role(pool: PgPool) {
    let staff = create_test_user(&pool, UserRole::Staff).await;
    let app = setup_test_app(pool);

    let response = app
        .oneshot(request(
            "PUT",
            &format!("/api/users/{}", staff.id),
            Some(&staff.token()),
            Some(json!({ "role": "admin" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cannot_delete_last_admin(pool: PgPool) {
    let admin = create_test_user(&pool, UserRole::Admin).await;
    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(request(
            "DELETE",
            &format!("/api/users/{}", admin.id),
            Some(&admin.token()),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Cannot delete the only admin"
    );

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cannot_demote_last_admin(pool: PgPool) {
    let admin = create_test_user(&pool, UserRole::Admin).await;
    let app = setup_test_app(pool);

    let response = app
        .oneshot(request(
            "PUT",
            &format!("/api/users/{}", admin.id),
            Some(&admin.token()),
            Some(json!({ "role": "teacher" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_admin_deletes_keep_one_admin(pool: PgPool) {
    let first = create_test_user(&pool, UserRole::Admin).await;
    let second = create_test_user(&pool, UserRole::Admin).await;
    let app = setup_test_app(pool.clone());

    // each admin deletes the other at the same time
    let (a, b) = tokio::join!(
        app.clone().oneshot(request(
            "DELETE",
            &format!("/api/users/{}", second.id),
            Some(&first.token()),
            None,
        )),
        app.clone().oneshot(request(
            "DELETE",
            &format!("/api/users/{}", first.id),
            Some(&second.token()),
            None,
        )),
    );

    let mut statuses = vec![a.unwrap().status(), b.unwrap().status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::BAD_REQUEST]);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_deleted_when_another_remains(pool: PgPool) {
    let admin = create_test_user(&pool, UserRole::Admin).await;
    let second = create_test_user(&pool, UserRole::Admin).await;
    let app = setup_test_app(pool.clone());

    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/users/{}", second.id),
            Some(&admin.token()),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);

    // now the survivor is the last one
    let response = app
        .oneshot(request(
            "DELETE",
            &format!("/api/users/{}", admin.id),
            Some(&admin.token()),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_cannot_delete_users(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let staff = create_test_user(&pool, UserRole::Staff).await;
    let app = setup_test_app(pool);

    let response = app
        .oneshot(request(
            "DELETE",
            &format!("/api/users/{}", staff.id),
            Some(&teacher.token()),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
