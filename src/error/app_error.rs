use crate::error::repository_error::RepositoryError;
use crate::error::service_error::ServiceError;
use rocket::Request;
use rocket::http::Status;
use rocket::response::Responder;
use rocket_okapi::OpenApiError;
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::Responses;
use rocket_okapi::response::OpenApiResponderInner;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// Storage failure with the operation that hit it.
    #[error("{message}: {source}")]
    Repository {
        message: String,
        #[source]
        source: RepositoryError,
    },
    #[error(transparent)]
    Storage(#[from] RepositoryError),
    #[error("request exceeded its deadline of {0:?}")]
    Timeout(Duration),
}

impl AppError {
    pub fn repository(message: impl Into<String>, source: RepositoryError) -> Self {
        Self::Repository {
            message: message.into(),
            source,
        }
    }
}

impl From<&AppError> for Status {
    fn from(e: &AppError) -> Self {
        match e {
            AppError::Service(service_error) => service_error.status,
            AppError::Repository { .. } => Status::InternalServerError,
            AppError::Storage(_) => Status::InternalServerError,
            AppError::Timeout(_) => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'static> {
        let method = req.method();
        let uri = req.uri();

        let request_id = req
            .local_cache(|| None::<crate::middleware::RequestId>)
            .as_ref()
            .map(|r| r.0.as_str())
            .unwrap_or("unknown");

        let status = Status::from(&self);

        let payload = match self {
            AppError::Service(service_error) => {
                if status.class().is_server_error() {
                    error!(error = ?service_error, request_id = %request_id, method = %method, uri = %uri, "request failed");
                } else {
                    warn!(
                        code = ?service_error.code,
                        message = %service_error.message,
                        request_id = %request_id,
                        method = %method,
                        uri = %uri,
                        "request rejected"
                    );
                }
                service_error
            }
            other => {
                // Full detail stays in the log; the client only sees the generic payload.
                error!(error = ?other, request_id = %request_id, method = %method, uri = %uri, "request failed");
                ServiceError::internal_server()
            }
        };

        payload.respond_to(req)
    }
}

impl OpenApiResponderInner for AppError {
    fn responses(_gen: &mut OpenApiGenerator) -> Result<Responses, OpenApiError> {
        use rocket_okapi::okapi::openapi3::{RefOr, Response as OpenApiResponse};
        let mut responses = Responses::default();
        for (code, description) in [
            ("400", "Bad Request"),
            ("404", "Not Found"),
            ("422", "Unprocessable Entity"),
            ("500", "Internal Server Error"),
        ] {
            responses.responses.insert(
                code.to_string(),
                RefOr::Object(OpenApiResponse {
                    description: description.to_string(),
                    ..Default::default()
                }),
            );
        }
        Ok(responses)
    }
}
