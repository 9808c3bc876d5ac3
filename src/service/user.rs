use crate::database::user::UserRepository;
use crate::error::app_error::AppError;
use crate::error::repository_error::RepositoryError;
use crate::error::service_error::{ErrorCode, ServiceError};
use crate::models::user::{User, UserRequest};
use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;
use validator::Validate;

/// Operations the HTTP layer can ask for.
#[async_trait::async_trait]
pub trait UserApi: Send + Sync {
    async fn get_user(&self, id: &Uuid) -> Result<User, AppError>;
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn create_user(&self, request: &UserRequest) -> Result<User, AppError>;
    async fn update_user(&self, id: &Uuid, request: &UserRequest) -> Result<User, AppError>;
    async fn delete_user(&self, id: &Uuid) -> Result<(), AppError>;
}

pub type SharedUserApi = Arc<dyn UserApi>;

pub struct UserService<R> {
    repository: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        UserService { repository }
    }
}

fn validate_request(request: &UserRequest) -> Result<(), ServiceError> {
    request.validate().map_err(|errors| {
        warn!(error = %errors, "user request validation failed");
        ServiceError::validation(ErrorCode::ValidationError, UserRequest::violation_message(&errors))
    })
}

fn user_not_found(id: &Uuid) -> AppError {
    warn!(id = %id, "user not found");
    ServiceError::not_found(ErrorCode::NotFound, "user not found").into()
}

#[async_trait::async_trait]
impl<R: UserRepository> UserApi for UserService<R> {
    async fn get_user(&self, id: &Uuid) -> Result<User, AppError> {
        match self.repository.get_user_by_id(id).await {
            Ok(user) => Ok(user),
            Err(RepositoryError::NotExists) => Err(user_not_found(id)),
            Err(e) => {
                error!(error = %e, id = %id, "could not get user");
                Err(AppError::repository("could not get user", e))
            }
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.repository.list_users().await.map_err(|e| {
            error!(error = %e, "could not fetch users");
            AppError::repository("list", e)
        })
    }

    async fn create_user(&self, request: &UserRequest) -> Result<User, AppError> {
        validate_request(request)?;

        let user = User::new(request);

        self.repository.create_user(&user).await.map_err(|e| {
            error!(error = %e, "could not create user");
            AppError::repository("could not create user", e)
        })?;

        Ok(user)
    }

    async fn update_user(&self, id: &Uuid, request: &UserRequest) -> Result<User, AppError> {
        validate_request(request)?;

        let mut user = match self.repository.get_user_by_id(id).await {
            Ok(user) => user,
            Err(RepositoryError::NotExists) => return Err(user_not_found(id)),
            Err(e) => {
                error!(error = %e, id = %id, "could not get user");
                return Err(AppError::repository("could not get user", e));
            }
        };

        // Keeps the stored birthday even when the request carries another one.
        user.apply(request);

        self.repository.update_user(&user).await.map_err(|e| {
            error!(error = %e, id = %id, "update user error");
            AppError::from(e)
        })?;

        Ok(user)
    }

    async fn delete_user(&self, id: &Uuid) -> Result<(), AppError> {
        self.repository.delete_user(id).await.map_err(|e| {
            error!(error = %e, id = %id, "could not delete user");
            AppError::repository("delete user", e)
        })
    }
}
