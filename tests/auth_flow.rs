use axum::{
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use chrono::Duration;
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::{Value, json};
use tower::ServiceExt; // for `oneshot`
use uuid::Uuid;

use mentoria_server::{
    auth::password,
    db::entities::user,
    routes::API_PREFIX,
    test_helpers::{
        fixtures::{profile_model, refresh_token_model, user_model},
        sqlite_memory_db, test_router,
    },
};

fn api_path(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}

fn post_json(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(api_path(path))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(res: axum::response::Response) -> Value {
    let body = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn registration() -> Value {
    json!({
        "username": "ana",
        "email": "ana@x.com",
        "first_name": "Ana",
        "last_name": "B",
        "password": "Str0ng!pass",
        "password_confirm": "Str0ng!pass",
        "teacher_profile": {
            "commission_scolaire": "CS1",
            "school_name": "École A",
            "grade_levels": ["3e"],
            "subjects": ["Math"],
            "phone_number": "555-1234"
        }
    })
}

#[tokio::test]
async fn health_reports_running() {
    let app = test_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let res = app
        .oneshot(
            Request::builder()
                .uri(api_path("/health/"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        read_json(res).await,
        json!({"status": "healthy", "message": "MentorIA API is running"})
    );
}

#[tokio::test]
async fn register_returns_user_profile_and_tokens() {
    let user_id = Uuid::new_v4();
    let mut stored_user = user_model(user_id, "ana", "ana@x.com");
    stored_user.first_name = "Ana".to_string();
    stored_user.last_name = "B".to_string();
    let mut stored_profile = profile_model(user_id);
    stored_profile.commission_scolaire = "CS1".to_string();
    stored_profile.school_name = "École A".to_string();
    stored_profile.grade_levels = json!(["3e"]);
    stored_profile.subjects = json!(["Math"]);
    stored_profile.phone_number = "555-1234".to_string();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .append_query_results([Vec::<user::Model>::new()])
        .append_query_results([[stored_user]])
        .append_query_results([[stored_profile]])
        .append_query_results([[refresh_token_model("refresh-1", user_id, Duration::days(1))]])
        .into_connection();

    let res = test_router(db)
        .oneshot(post_json("/auth/register/", registration()))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = read_json(res).await;
    assert_eq!(body["message"], "Inscription réussie");
    assert_eq!(body["user"]["id"], user_id.to_string());
    assert_eq!(body["user"]["full_name"], "Ana B");
    assert_eq!(body["user"]["teacher_profile"]["school_name"], "École A");
    assert_eq!(body["user"]["teacher_profile"]["subjects"], json!(["Math"]));
    assert!(!body["tokens"]["access"].as_str().unwrap().is_empty());
    assert_eq!(body["tokens"]["refresh"], "refresh-1");
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn register_with_mismatched_passwords_fails_on_confirm_field() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let mut payload = registration();
    payload["password_confirm"] = json!("Different!pass1");

    let res = test_router(db)
        .oneshot(post_json("/auth/register/", payload))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(
        body["errors"]["password_confirm"],
        json!(["Les mots de passe ne correspondent pas."])
    );
}

#[tokio::test]
async fn register_with_taken_email_fails_on_email_field() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[user_model(Uuid::new_v4(), "other", "ana@x.com")]])
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();

    let res = test_router(db)
        .oneshot(post_json("/auth/register/", registration()))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(
        body["errors"]["email"],
        json!(["Un utilisateur avec cette adresse email existe déjà."])
    );
}

#[tokio::test]
async fn register_without_profile_reports_missing_field() {
    let app = test_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let mut payload = registration();
    payload.as_object_mut().unwrap().remove("teacher_profile");

    let res = app
        .oneshot(post_json("/auth/register/", payload))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body["errors"]["teacher_profile"], json!(["Ce champ est obligatoire."]));
}

#[tokio::test]
async fn register_reports_every_missing_field_at_once() {
    let app = test_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let res = app
        .oneshot(post_json("/auth/register/", json!({"username": "c"})))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    let errors = body["errors"].as_object().unwrap();
    for field in [
        "email",
        "first_name",
        "last_name",
        "password",
        "password_confirm",
        "teacher_profile",
    ] {
        assert_eq!(errors[field], json!(["Ce champ est obligatoire."]), "{field}");
    }
    assert!(!errors.contains_key("username"));
}

#[tokio::test]
async fn register_with_wrongly_typed_field_reports_that_field() {
    let app = test_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let mut payload = registration();
    payload["teacher_profile"]["grade_levels"] = json!("3e");

    let res = app
        .oneshot(post_json("/auth/register/", payload))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(
        body["errors"]["teacher_profile.grade_levels"],
        json!(["Valeur invalide."])
    );
}

#[tokio::test]
async fn login_without_password_reports_the_field() {
    let app = test_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let res = app
        .oneshot(post_json("/auth/login/", json!({"username": "ana"})))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body["errors"]["password"], json!(["Ce champ est obligatoire."]));
}

#[tokio::test]
async fn register_with_malformed_email_is_rejected_before_lookup() {
    let app = test_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let mut payload = registration();
    payload["email"] = json!("not-an-email");

    let res = app
        .oneshot(post_json("/auth/register/", payload))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body["errors"]["email"], json!(["Saisissez une adresse e-mail valide."]));
}

#[tokio::test]
async fn login_returns_token_pair() {
    let user_id = Uuid::new_v4();
    let mut stored = user_model(user_id, "ana", "ana@x.com");
    stored.password_hash = password::hash_password("Str0ng!pass").unwrap();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[stored.clone()]])
        .append_query_results([[stored]])
        .append_query_results([[profile_model(user_id)]])
        .append_query_results([[profile_model(user_id)]])
        .append_query_results([[refresh_token_model("refresh-login", user_id, Duration::days(1))]])
        .into_connection();

    let res = test_router(db)
        .oneshot(post_json(
            "/auth/login/",
            json!({"username": "ana", "password": "Str0ng!pass"}),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert!(!body["access"].as_str().unwrap().is_empty());
    assert_eq!(body["refresh"], "refresh-login");
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let mut stored = user_model(Uuid::new_v4(), "ana", "ana@x.com");
    stored.password_hash = password::hash_password("Str0ng!pass").unwrap();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[stored]])
        .into_connection();

    let res = test_router(db)
        .oneshot(post_json(
            "/auth/login/",
            json!({"username": "ana", "password": "wrong"}),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(res).await;
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn refresh_returns_new_access_token() {
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[refresh_token_model("refresh-1", user_id, Duration::days(1))]])
        .append_query_results([[user_model(user_id, "ana", "ana@x.com")]])
        .into_connection();

    let res = test_router(db)
        .oneshot(post_json("/auth/token/refresh/", json!({"refresh": "refresh-1"})))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert!(!body["access"].as_str().unwrap().is_empty());
    assert!(body.get("refresh").is_none());
}

#[tokio::test]
async fn refresh_with_unknown_token_is_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<mentoria_server::db::entities::refresh_token::Model>::new()])
        .into_connection();

    let res = test_router(db)
        .oneshot(post_json("/auth/token/refresh/", json!({"refresh": "nope"})))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_route_returns_json_error() {
    let app = test_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let res = app
        .oneshot(
            Request::builder()
                .uri(api_path("/does-not-exist/"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = read_json(res).await;
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn register_login_refresh_against_sqlite() {
    let app = test_router(sqlite_memory_db().await);

    let res = app
        .clone()
        .oneshot(post_json("/auth/register/", registration()))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let registered = read_json(res).await;
    assert_eq!(registered["user"]["teacher_profile"]["grade_levels"], json!(["3e"]));

    let res = app
        .clone()
        .oneshot(post_json(
            "/auth/login/",
            json!({"username": "ana", "password": "Str0ng!pass"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let tokens = read_json(res).await;

    let res = app
        .oneshot(post_json(
            "/auth/token/refresh/",
            json!({"refresh": tokens["refresh"]}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
