use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use rocket::serde::{Deserialize, Serialize};
use serde::Deserializer;
use schemars::JsonSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birthday: String,
    pub created_at: DateTime<Utc>,
    /// `None` until the first update.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Current time at the precision Postgres keeps, so a stored row reads back unchanged.
fn now() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(TimeDelta::microseconds(1)).unwrap_or(now)
}

/// Reads an explicit `null` the same way as an absent field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl User {
    /// Builds a fresh entity from a validated request: new random id, creation time now.
    pub fn new(request: &UserRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            birthday: request.birthday.clone(),
            created_at: now(),
            updated_at: None,
        }
    }

    /// Applies an update request. Only the names are taken from the request;
    /// birthday and creation time are left as stored.
    pub fn apply(&mut self, request: &UserRequest) {
        self.first_name = request.first_name.clone();
        self.last_name = request.last_name.clone();
        self.updated_at = Some(now());
    }
}

/// Payload of `POST /v1/users` and `PUT /v1/users/<id>`.
///
/// Missing and `null` fields decode to empty strings so they are reported by
/// validation rather than by the JSON decoder.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq, Validate, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRequest {
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, code = "required", message = "firstName is required"))]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, code = "required", message = "lastName is required"))]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, code = "required", message = "birthday is required"))]
    pub birthday: String,
}

impl UserRequest {
    /// Field order used to pick the reported violation.
    const FIELDS: [&'static str; 3] = ["first_name", "last_name", "birthday"];

    /// Describes the first offending field in declaration order.
    pub fn violation_message(errors: &ValidationErrors) -> String {
        let field_errors = errors.field_errors();

        Self::FIELDS
            .iter()
            .filter_map(|field| field_errors.get(*field))
            .filter_map(|errors| errors.first())
            .find_map(|error| error.message.as_ref().map(|message| message.to_string()))
            .unwrap_or_else(|| errors.to_string())
    }
}

/// Response envelope: every successful call answers with a list under `data`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct UserList {
    pub data: Vec<User>,
}

impl From<User> for UserList {
    fn from(user: User) -> Self {
        Self { data: vec![user] }
    }
}

impl From<Vec<User>> for UserList {
    fn from(data: Vec<User>) -> Self {
        Self { data }
    }
}
