//! Users API handlers.
//!
//! ```text
//! GET  /api/v1/users
//! GET  /api/v1/users/{user_id}
//! GET  /api/v1/users/by-username/{username}
//! POST /api/v1/users {"username":"ada","firstName":"Ada","lastName":"Lovelace"}
//! PUT  /api/v1/users/{user_id}/username {"username":"countess"}
//! PUT  /api/v1/users/{user_id}/full-name {"firstName":"Ada","lastName":"King"}
//! ```
//!
//! Every handler opens a request context, runs one query or command and
//! closes the context before responding.

use actix_web::{HttpResponse, get, http::header, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::context::AppContext;
use crate::domain::{
    CommandHandler, CreateUser, Error, GetUserById, GetUserByUsername, GetUsers, QueryHandler,
    SetFullName, UpdateUsername, UserDto, UserId, Username,
};
use crate::inbound::http::ApiResult;

/// Body of `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            username: value.username,
            first_name: value.first_name,
            last_name: value.last_name,
            middle_name: value.middle_name,
        }
    }
}

/// Identifier of a newly created user.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreatedUser {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
}

/// Body of `PUT /api/v1/users/{user_id}/username`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateUsernameRequest {
    #[schema(example = "countess")]
    pub username: String,
}

/// Body of `PUT /api/v1/users/{user_id}/full-name`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetFullNameRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
}

fn parse_user_id(raw: &str) -> ApiResult<UserId> {
    UserId::new(raw).map_err(Error::from)
}

/// List every user ordered by username.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserDto]),
        (status = 503, description = "Storage unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(context: web::Data<AppContext>) -> ApiResult<web::Json<Vec<UserDto>>> {
    let request = context.begin_request().await?;
    let result = request.get_users().handle(GetUsers).await;
    request.close().await;
    Ok(web::Json(result?))
}

/// Fetch one user by identifier.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 200, description = "User", body = UserDto),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUserById"
)]
#[get("/users/{user_id}")]
pub async fn get_user_by_id(
    context: web::Data<AppContext>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserDto>> {
    let user_id = parse_user_id(&path)?;
    let request = context.begin_request().await?;
    let result = request.get_user_by_id().handle(GetUserById { user_id }).await;
    request.close().await;
    Ok(web::Json(result?))
}

/// Fetch one user by username.
#[utoipa::path(
    get,
    path = "/api/v1/users/by-username/{username}",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User", body = UserDto),
        (status = 400, description = "Malformed username", body = Error),
        (status = 404, description = "Unknown username", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUserByUsername"
)]
#[get("/users/by-username/{username}")]
pub async fn get_user_by_username(
    context: web::Data<AppContext>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserDto>> {
    let username = Username::new(path.into_inner()).map_err(Error::from)?;
    let request = context.begin_request().await?;
    let result = request
        .get_user_by_username()
        .handle(GetUserByUsername { username })
        .await;
    request.close().await;
    Ok(web::Json(result?))
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = CreatedUser,
            headers(("Location" = String, description = "URL of the new user"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Identifier or username taken", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    context: web::Data<AppContext>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let request = context.begin_request().await?;
    let result = request
        .commands()
        .handle(CreateUser::from(payload.into_inner()))
        .await;
    request.close().await;

    let id = result?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/v1/users/{id}")))
        .json(CreatedUser { id }))
}

/// Change a user's username.
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/username",
    params(("user_id" = String, Path, description = "User identifier (UUID)")),
    request_body = UpdateUsernameRequest,
    responses(
        (status = 204, description = "Username updated"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 409, description = "Username taken", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUsername"
)]
#[put("/users/{user_id}/username")]
pub async fn update_username(
    context: web::Data<AppContext>,
    path: web::Path<String>,
    payload: web::Json<UpdateUsernameRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = parse_user_id(&path)?;
    let request = context.begin_request().await?;
    let result = request
        .commands()
        .handle(UpdateUsername {
            user_id,
            username: payload.into_inner().username,
        })
        .await;
    request.close().await;

    result?;
    Ok(HttpResponse::NoContent().finish())
}

/// Replace a user's full name.
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/full-name",
    params(("user_id" = String, Path, description = "User identifier (UUID)")),
    request_body = SetFullNameRequest,
    responses(
        (status = 204, description = "Full name updated"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "setFullName"
)]
#[put("/users/{user_id}/full-name")]
pub async fn set_full_name(
    context: web::Data<AppContext>,
    path: web::Path<String>,
    payload: web::Json<SetFullNameRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = parse_user_id(&path)?;
    let SetFullNameRequest {
        first_name,
        last_name,
        middle_name,
    } = payload.into_inner();
    let request = context.begin_request().await?;
    let result = request
        .commands()
        .handle(SetFullName {
            user_id,
            first_name,
            last_name,
            middle_name,
        })
        .await;
    request.close().await;

    result?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register every user endpoint on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(get_user_by_username)
        .service(get_user_by_id)
        .service(create_user)
        .service(update_username)
        .service(set_full_name);
}

#[cfg(test)]
mod tests;
