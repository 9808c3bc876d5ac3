use rocket::http::{ContentType, Status};
use rocket::response::Responder;
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};
use schemars::JsonSchema;
use std::io::Cursor;
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidUserId,
    InvalidUserData,
    ValidationError,
    NotFound,
    InternalServerError,
}

/// Error that knows how it is presented to the client.
///
/// The HTTP status is fixed by the constructor; only `code` and `message`
/// travel on the wire.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Error, JsonSchema)]
#[error("{message}")]
pub struct ServiceError {
    #[serde(skip)]
    #[schemars(skip)]
    pub status: Status,
    pub code: ErrorCode,
    pub message: String,
}

impl ServiceError {
    pub fn bad_request(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Status::BadRequest, code, message)
    }

    pub fn validation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Status::UnprocessableEntity, code, message)
    }

    pub fn not_found(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Status::NotFound, code, message)
    }

    pub fn internal(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Status::InternalServerError, code, message)
    }

    /// The payload sent for every failure that carries no presentation of its own.
    pub fn internal_server() -> Self {
        Self::internal(ErrorCode::InternalServerError, "internal server error")
    }

    fn new(status: Status, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ServiceError {
    fn respond_to(self, _req: &'r Request<'_>) -> rocket::response::Result<'static> {
        let body = match serde_json::to_string(&self) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize service error");
                r#"{"code":"INTERNAL_SERVER_ERROR","message":"internal server error"}"#.to_string()
            }
        };

        Response::build()
            .status(self.status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}
