use crate::database::user::UserRepository;
use crate::error::repository_error::RepositoryError;
use crate::models::user::{User, UserRequest};
use chrono::{TimeZone, Utc};
use std::collections::HashSet;
use std::sync::Mutex;
use uuid::Uuid;

pub const SAMPLE_USER_ID: &str = "ccae37ea-d41e-4371-a3a3-89203b9e2608";

pub fn sample_user() -> User {
    User {
        id: Uuid::parse_str(SAMPLE_USER_ID).unwrap(),
        first_name: "Elon".to_string(),
        last_name: "Musk".to_string(),
        birthday: "1971-06-28".to_string(),
        created_at: Utc.with_ymd_and_hms(2022, 11, 17, 20, 0, 0).unwrap(),
        updated_at: None,
    }
}

pub fn sample_request() -> UserRequest {
    UserRequest {
        first_name: "Elon".to_string(),
        last_name: "Rogozin".to_string(),
        birthday: "1971-06-28".to_string(),
    }
}

/// In-memory repository that records every call and can be told to fail.
#[derive(Default)]
pub struct MockRepository {
    users: Mutex<Vec<User>>,
    calls: Mutex<Vec<&'static str>>,
    failing: Mutex<HashSet<&'static str>>,
}

impl MockRepository {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
            ..Self::default()
        }
    }

    /// Makes the named operation (`list`, `get`, `create`, `update`, `delete`) fail.
    pub fn failing_on(self, operation: &'static str) -> Self {
        self.failing.lock().unwrap().insert(operation);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.calls().iter().filter(|call| matches!(**call, "create" | "update" | "delete")).count()
    }

    pub fn stored(&self, id: &Uuid) -> Option<User> {
        self.users.lock().unwrap().iter().find(|user| &user.id == id).cloned()
    }

    fn record(&self, operation: &'static str) -> Result<(), RepositoryError> {
        self.calls.lock().unwrap().push(operation);
        if self.failing.lock().unwrap().contains(operation) {
            return Err(RepositoryError::db("exec", sqlx::Error::Protocol("some error".to_string())));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserRepository for MockRepository {
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        self.record("list")?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<User, RepositoryError> {
        self.record("get")?;
        self.stored(id).ok_or(RepositoryError::NotExists)
    }

    async fn create_user(&self, user: &User) -> Result<(), RepositoryError> {
        self.record("create")?;
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<(), RepositoryError> {
        self.record("update")?;
        let mut users = self.users.lock().unwrap();
        if let Some(stored) = users.iter_mut().find(|stored| stored.id == user.id) {
            stored.first_name = user.first_name.clone();
            stored.last_name = user.last_name.clone();
            stored.birthday = user.birthday.clone();
            stored.updated_at = user.updated_at;
        }
        Ok(())
    }

    async fn delete_user(&self, id: &Uuid) -> Result<(), RepositoryError> {
        self.record("delete")?;
        self.users.lock().unwrap().retain(|user| &user.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_calls() {
        let repo = MockRepository::with_users(vec![sample_user()]);
        let user = sample_user();

        assert_eq!(repo.get_user_by_id(&user.id).await.unwrap(), user);
        repo.delete_user(&user.id).await.unwrap();

        assert_eq!(repo.calls(), vec!["get", "delete"]);
        assert_eq!(repo.write_count(), 1);
        assert!(repo.stored(&user.id).is_none());
    }

    #[tokio::test]
    async fn test_mock_fails_on_request() {
        let repo = MockRepository::default().failing_on("list");
        assert!(matches!(repo.list_users().await, Err(RepositoryError::Db { .. })));
    }
}
