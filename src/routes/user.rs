use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::error::service_error::{ErrorCode, ServiceError};
use crate::middleware::RequestDeadline;
use crate::models::user::{UserList, UserRequest};
use crate::service::user::SharedUserApi;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{Request, State, delete, get, post, put};
use rocket_okapi::OpenApiError;
use rocket_okapi::openapi;
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::Responses;
use rocket_okapi::response::OpenApiResponderInner;
use tracing::warn;
use uuid::Uuid;

/// Accepted textual lengths: simple, hyphenated, braced and urn forms.
const UUID_LENGTHS: [usize; 4] = [32, 36, 38, 45];

/// Successful answer: the `{"data": [...]}` envelope with its status.
#[derive(Debug)]
pub struct UserEnvelope {
    status: Status,
    body: UserList,
}

impl UserEnvelope {
    pub fn ok(body: impl Into<UserList>) -> Self {
        Self {
            status: Status::Ok,
            body: body.into(),
        }
    }

    pub fn created(body: impl Into<UserList>) -> Self {
        Self {
            status: Status::Created,
            body: body.into(),
        }
    }
}

impl<'r> Responder<'r, 'static> for UserEnvelope {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'static> {
        let mut response = Json(self.body).respond_to(req)?;
        response.set_status(self.status);
        Ok(response)
    }
}

impl OpenApiResponderInner for UserEnvelope {
    fn responses(generator: &mut OpenApiGenerator) -> Result<Responses, OpenApiError> {
        let mut responses = <Json<UserList> as OpenApiResponderInner>::responses(generator)?;
        if let Some(ok) = responses.responses.get("200").cloned() {
            responses.responses.insert("201".to_string(), ok);
        }
        Ok(responses)
    }
}

fn parse_user_id(raw: &str) -> Result<Uuid, ServiceError> {
    if !UUID_LENGTHS.contains(&raw.len()) {
        warn!(id = %raw, "could not parse user id");
        return Err(ServiceError::bad_request(
            ErrorCode::InvalidUserId,
            format!("invalid UUID length: {}", raw.len()),
        ));
    }

    Uuid::parse_str(raw).map_err(|e| {
        warn!(id = %raw, error = %e, "could not parse user id");
        ServiceError::bad_request(ErrorCode::InvalidUserId, e.to_string())
    })
}

/// A `null` body carries no fields, so it goes on to validation like `{}`.
fn decode_request(payload: Result<JsonBody<Option<UserRequest>>, serde_json::Error>) -> Result<UserRequest, ServiceError> {
    payload.map(|body| body.into_inner().unwrap_or_default()).map_err(|e| {
        warn!(error = %e, "decode user data");
        ServiceError::bad_request(ErrorCode::InvalidUserData, e.to_string())
    })
}

/// List all users
#[openapi(tag = "Users")]
#[get("/")]
pub async fn list_users(service: &State<SharedUserApi>, deadline: &State<RequestDeadline>) -> Result<UserEnvelope, AppError> {
    let users = deadline.run(service.list_users()).await?;
    Ok(UserEnvelope::ok(users))
}

/// Create a new user
#[openapi(tag = "Users")]
#[post("/", data = "<payload>")]
pub async fn create_user(
    service: &State<SharedUserApi>,
    deadline: &State<RequestDeadline>,
    payload: Result<JsonBody<Option<UserRequest>>, serde_json::Error>,
) -> Result<UserEnvelope, AppError> {
    let request = decode_request(payload)?;
    let user = deadline.run(service.create_user(&request)).await?;
    Ok(UserEnvelope::created(user))
}

/// Get a user by ID
#[openapi(tag = "Users")]
#[get("/<id>")]
pub async fn get_user(service: &State<SharedUserApi>, deadline: &State<RequestDeadline>, id: String) -> Result<UserEnvelope, AppError> {
    let user_id = parse_user_id(&id)?;
    let user = deadline.run(service.get_user(&user_id)).await?;
    Ok(UserEnvelope::ok(user))
}

/// Update a user's names by ID
#[openapi(tag = "Users")]
#[put("/<id>", data = "<payload>")]
pub async fn update_user(
    service: &State<SharedUserApi>,
    deadline: &State<RequestDeadline>,
    id: String,
    payload: Result<JsonBody<Option<UserRequest>>, serde_json::Error>,
) -> Result<UserEnvelope, AppError> {
    let user_id = parse_user_id(&id)?;
    let request = decode_request(payload)?;
    let user = deadline.run(service.update_user(&user_id, &request)).await?;
    Ok(UserEnvelope::ok(user))
}

/// Delete a user by ID
#[openapi(tag = "Users")]
#[delete("/<id>")]
pub async fn delete_user(service: &State<SharedUserApi>, deadline: &State<RequestDeadline>, id: String) -> Result<UserEnvelope, AppError> {
    let user_id = parse_user_id(&id)?;
    deadline.run(service.delete_user(&user_id)).await?;
    Ok(UserEnvelope::ok(UserList::default()))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![list_users, create_user, get_user, update_user, delete_user]
}
