//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every user endpoint, the health probes and the
//! request, response and error schemas. The document is printed by the
//! `openapi-dump` binary.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, UserDto};
use crate::inbound::http::users::{
    CreateUserRequest, CreatedUser, SetFullNameRequest, UpdateUsernameRequest,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User service API",
        description = "Create, rename and look up users; health probes for orchestration."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user_by_id,
        crate::inbound::http::users::get_user_by_username,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_username,
        crate::inbound::http::users::set_full_name,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserDto,
        Error,
        ErrorCode,
        CreateUserRequest,
        CreatedUser,
        UpdateUsernameRequest,
        SetFullNameRequest,
    )),
    tags(
        (name = "users", description = "Operations related to users"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas
            .iter()
            .find(|(key, _)| key.ends_with(name))
            .map(|(_, schema)| schema)
            .unwrap_or_else(|| panic!("{name} schema registered"));
        match schema {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected Object schema for {name}"),
        }
    }

    #[rstest]
    #[case("UserDto", &["id", "username", "firstName", "lastName", "fullName"])]
    #[case("CreateUserRequest", &["username", "firstName", "lastName"])]
    fn schemas_use_camel_case_fields(#[case] name: &str, #[case] expected: &[&str]) {
        let fields = schema_fields(name);
        for field in expected {
            assert!(fields.iter().any(|f| f == field), "{name} lacks {field}");
        }
    }

    #[rstest]
    fn every_user_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/users",
            "/api/v1/users/{user_id}",
            "/api/v1/users/by-username/{username}",
            "/api/v1/users/{user_id}/username",
            "/api/v1/users/{user_id}/full-name",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
    }
}
