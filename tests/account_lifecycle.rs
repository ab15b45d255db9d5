use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, Set,
};
use serde_json::{Value, json};
use tower::ServiceExt; // for `oneshot`
use uuid::Uuid;

use mentoria_server::{
    db::entities::{refresh_token, teacher_profile, user},
    routes::API_PREFIX,
    test_helpers::{sqlite_memory_db, test_router},
};

struct Registered {
    id: Uuid,
    bearer: String,
}

async fn send(
    app: &Router,
    method: &str,
    path: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(format!("{API_PREFIX}{path}"));
    if let Some(bearer) = bearer {
        builder = builder.header(header::AUTHORIZATION, bearer);
    }
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn register(app: &Router) -> Registered {
    let (status, body) = send(
        app,
        "POST",
        "/auth/register/",
        None,
        Some(json!({
            "username": "ana",
            "email": "ana@x.com",
            "first_name": "Ana",
            "last_name": "B",
            "password": "Str0ng!pass",
            "password_confirm": "Str0ng!pass",
            "teacher_profile": {
                "school_name": "École A",
                "grade_levels": ["3e"],
                "subjects": ["Math"]
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    Registered {
        id: Uuid::parse_str(body["user"]["id"].as_str().unwrap()).unwrap(),
        bearer: format!("Bearer {}", body["tokens"]["access"].as_str().unwrap()),
    }
}

async fn profile_count(db: &DatabaseConnection, user_id: Uuid) -> u64 {
    teacher_profile::Entity::find()
        .filter(teacher_profile::Column::UserId.eq(user_id))
        .count(db)
        .await
        .unwrap()
}

async fn stored_profile(db: &DatabaseConnection, user_id: Uuid) -> teacher_profile::Model {
    teacher_profile::Entity::find()
        .filter(teacher_profile::Column::UserId.eq(user_id))
        .one(db)
        .await
        .unwrap()
        .expect("profile should exist")
}

#[tokio::test]
async fn every_save_keeps_exactly_one_profile() {
    let db = sqlite_memory_db().await;
    let app = test_router(db.clone());

    let ana = register(&app).await;
    assert_eq!(profile_count(&db, ana.id).await, 1);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/login/",
        None,
        Some(json!({"username": "ana", "password": "Str0ng!pass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile_count(&db, ana.id).await, 1);

    let (status, body) = send(
        &app,
        "PATCH",
        "/auth/profile/",
        Some(&ana.bearer),
        Some(json!({"first_name": "Anna", "teacher_profile": {"phone_number": "555-1234"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["full_name"], "Anna B");
    assert_eq!(profile_count(&db, ana.id).await, 1);

    let (status, _) = send(
        &app,
        "PUT",
        "/auth/profile/teacher/",
        Some(&ana.bearer),
        Some(json!({"school_name": "École B"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile_count(&db, ana.id).await, 1);
    assert_eq!(teacher_profile::Entity::find().count(&db).await.unwrap(), 1);

    let profile = stored_profile(&db, ana.id).await;
    assert_eq!(profile.school_name, "École B");
    assert_eq!(profile.phone_number, "555-1234");
    assert_eq!(profile.grade_levels(), vec!["3e"]);
}

#[tokio::test]
async fn teacher_patch_never_touches_verification() {
    let db = sqlite_memory_db().await;
    let app = test_router(db.clone());
    let ana = register(&app).await;

    let mut verified = stored_profile(&db, ana.id).await.into_active_model();
    verified.is_verified = Set(true);
    verified.update(&db).await.unwrap();

    let (status, body) = send(
        &app,
        "PATCH",
        "/auth/profile/teacher/",
        Some(&ana.bearer),
        Some(json!({"school_name": "École B", "is_verified": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["user"]["teacher_profile"]["school_name"], "École B");

    let profile = stored_profile(&db, ana.id).await;
    assert!(profile.is_verified);
    assert_eq!(profile.school_name, "École B");
    assert_eq!(profile.subjects(), vec!["Math"]);
}

#[tokio::test]
async fn deactivated_account_cannot_use_its_access_token() {
    let db = sqlite_memory_db().await;
    let app = test_router(db.clone());
    let ana = register(&app).await;

    let owner = user::Entity::find_by_id(ana.id)
        .one(&db)
        .await
        .unwrap()
        .expect("user should exist");
    let mut inactive = owner.into_active_model();
    inactive.is_active = Set(false);
    inactive.update(&db).await.unwrap();

    let (status, body) = send(&app, "GET", "/auth/profile/", Some(&ana.bearer), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Le jeton est invalide ou expiré.");

    let (status, _) = send(
        &app,
        "PATCH",
        "/auth/profile/teacher/",
        Some(&ana.bearer),
        Some(json!({"school_name": "École B"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(stored_profile(&db, ana.id).await.school_name, "École A");
}

#[tokio::test]
async fn deleting_an_account_removes_its_profile_and_tokens() {
    let db = sqlite_memory_db().await;
    let app = test_router(db.clone());
    let ana = register(&app).await;

    user::Entity::delete_by_id(ana.id).exec(&db).await.unwrap();

    assert_eq!(profile_count(&db, ana.id).await, 0);
    let tokens = refresh_token::Entity::find()
        .filter(refresh_token::Column::UserId.eq(ana.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(tokens, 0);

    let (status, _) = send(&app, "GET", "/auth/profile/", Some(&ana.bearer), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
