//! Endpoint tests running against the in-memory context.

use super::*;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::json_error_handler;

async fn test_service(
    context: AppContext,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(context))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .service(web::scope("/api/v1").configure(configure)),
    )
    .await
}

fn create_body(username: &str) -> Value {
    json!({
        "username": username,
        "firstName": "Ada",
        "lastName": "Lovelace",
    })
}

async fn create<S>(app: &S, username: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(create_body(username))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    body["id"].as_str().expect("id in body").to_owned()
}

#[rstest]
#[actix_web::test]
async fn created_user_can_be_fetched_by_id_and_username() {
    let app = test_service(AppContext::in_memory()).await;
    let id = create(&app, "ada").await;

    let by_id: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/users/{id}"))
            .to_request(),
    )
    .await;
    let by_name: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/by-username/ada")
            .to_request(),
    )
    .await;

    assert_eq!(by_id, by_name);
    assert_eq!(by_id["fullName"], "Ada Lovelace");
}

#[rstest]
#[actix_web::test]
async fn uppercase_id_finds_the_same_user() {
    let app = test_service(AppContext::in_memory()).await;
    let id = create(&app, "ada").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/users/{}", id.to_uppercase()))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["id"], id);
}

#[rstest]
#[actix_web::test]
async fn create_sets_location_header() {
    let app = test_service(AppContext::in_memory()).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(create_body("ada"))
        .to_request();

    let response = actix_test::call_service(&app, request).await;
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location header")
        .to_owned();
    let body: Value = actix_test::read_body_json(response).await;

    assert_eq!(
        location,
        format!("/api/v1/users/{}", body["id"].as_str().expect("id"))
    );
}

#[rstest]
#[actix_web::test]
async fn duplicate_username_is_a_conflict() {
    let app = test_service(AppContext::in_memory()).await;
    create(&app, "ada").await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(create_body("ada"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "conflict");
    assert_eq!(body["details"]["field"], "username");
}

#[rstest]
#[case("1x", "username")]
#[case("a", "username")]
#[actix_web::test]
async fn invalid_usernames_are_rejected(#[case] username: &str, #[case] field: &str) {
    let app = test_service(AppContext::in_memory()).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(create_body(username))
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[case("/api/v1/users/not-a-uuid", StatusCode::BAD_REQUEST)]
#[case(
    "/api/v1/users/3fa85f64-5717-4562-b3fc-2c963f66afa6",
    StatusCode::NOT_FOUND
)]
#[case("/api/v1/users/by-username/nobody", StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn lookups_report_bad_or_unknown_keys(#[case] uri: &str, #[case] status: StatusCode) {
    let app = test_service(AppContext::in_memory()).await;
    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(response.status(), status);
}

#[rstest]
#[actix_web::test]
async fn list_is_empty_then_sorted() {
    let app = test_service(AppContext::in_memory()).await;
    let empty: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/users").to_request(),
    )
    .await;
    assert_eq!(empty, json!([]));

    create(&app, "zoe").await;
    create(&app, "bob").await;
    let users: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/users").to_request(),
    )
    .await;

    let names: Vec<&str> = users
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|user| user["username"].as_str())
        .collect();
    assert_eq!(names, ["bob", "zoe"]);
}

#[rstest]
#[actix_web::test]
async fn username_and_full_name_updates_are_visible() {
    let app = test_service(AppContext::in_memory()).await;
    let id = create(&app, "ada").await;

    let rename = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/users/{id}/username"))
        .set_json(json!({ "username": "countess" }))
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, rename).await.status(),
        StatusCode::NO_CONTENT
    );

    let set_name = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/users/{id}/full-name"))
        .set_json(json!({
            "firstName": "Augusta",
            "middleName": "Ada",
            "lastName": "King",
        }))
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, set_name).await.status(),
        StatusCode::NO_CONTENT
    );

    let user: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/by-username/countess")
            .to_request(),
    )
    .await;
    assert_eq!(user["id"], id.as_str());
    assert_eq!(user["fullName"], "Augusta Ada King");
}

#[rstest]
#[actix_web::test]
async fn renaming_onto_taken_username_conflicts() {
    let app = test_service(AppContext::in_memory()).await;
    create(&app, "ada").await;
    let id = create(&app, "bob").await;

    let rename = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/users/{id}/username"))
        .set_json(json!({ "username": "ada" }))
        .to_request();

    assert_eq!(
        actix_test::call_service(&app, rename).await.status(),
        StatusCode::CONFLICT
    );
}

#[rstest]
#[actix_web::test]
async fn malformed_body_is_an_invalid_request() {
    let app = test_service(AppContext::in_memory()).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(json!({ "username": "ada" }))
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
}
