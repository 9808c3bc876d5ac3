use crate::error::service_error::{ErrorCode, ServiceError};
use rocket::{Catcher, Request, catch, catchers};
use tracing::warn;

#[catch(400)]
pub fn bad_request(req: &Request) -> ServiceError {
    warn!(method = %req.method(), uri = %req.uri(), "malformed request");
    ServiceError::bad_request(ErrorCode::InvalidUserData, "bad request")
}

#[catch(404)]
pub fn not_found(req: &Request) -> ServiceError {
    warn!(method = %req.method(), uri = %req.uri(), "no route matched");
    ServiceError::not_found(ErrorCode::NotFound, "not found")
}

#[catch(422)]
pub fn unprocessable_entity(_: &Request) -> ServiceError {
    ServiceError::validation(ErrorCode::ValidationError, "unprocessable entity")
}

#[catch(500)]
pub fn internal_error(_: &Request) -> ServiceError {
    ServiceError::internal_server()
}

pub fn catchers() -> Vec<Catcher> {
    catchers![bad_request, not_found, unprocessable_entity, internal_error]
}
