use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Stored user record. `password` is always a bcrypt hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
    pub favorite_movies: Vec<Uuid>,
}

/// User identity without the password hash, handed out on login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
    pub favorite_movies: Vec<Uuid>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            birthday: user.birthday,
            favorite_movies: user.favorite_movies,
        }
    }
}

/// Insert payload for the storage layer; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
}

impl NewUser {
    pub fn into_user(self, id: Uuid) -> User {
        User {
            id,
            username: self.username,
            password: self.password_hash,
            email: self.email,
            birthday: self.birthday,
            favorite_movies: Vec::new(),
        }
    }
}

/// Partial update: `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password_hash.is_none()
            && self.email.is_none()
            && self.birthday.is_none()
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(hash) = &self.password_hash {
            user.password = hash.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(birthday) = self.birthday {
            user.birthday = Some(birthday);
        }
    }
}

/// Body of `POST /users`. Missing fields deserialize as empty and fail validation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct RegisterRequest {
    #[serde(rename = "Username")]
    #[validate(
        length(min = 5, message = "Username is required"),
        custom = "validate_alphanumeric"
    )]
    pub username: String,

    #[serde(rename = "Password")]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[serde(rename = "Email")]
    #[validate(email(message = "Email does not appear to be valid"))]
    pub email: String,

    #[serde(rename = "Birthday", deserialize_with = "deserialize_birthday")]
    pub birthday: Option<NaiveDate>,
}

/// Body of `PUT /users/:Username`. Only supplied, non-empty fields are applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[serde(rename = "Username")]
    #[validate(
        length(min = 5, message = "Username must be at least 5 characters"),
        custom = "validate_alphanumeric"
    )]
    pub username: Option<String>,

    #[serde(rename = "Password")]
    pub password: Option<String>,

    #[serde(rename = "Email")]
    #[validate(email(message = "Email does not appear to be valid"))]
    pub email: Option<String>,

    #[serde(rename = "Birthday", deserialize_with = "deserialize_birthday")]
    pub birthday: Option<NaiveDate>,
}

impl UpdateUserRequest {
    /// Empty strings count as "not supplied".
    pub fn normalized(self) -> Self {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Self {
            username: present(self.username),
            password: present(self.password),
            email: present(self.email),
            birthday: self.birthday,
        }
    }
}

/// Credentials for `POST /login`, accepted from the JSON body or the query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    #[serde(rename = "Username")]
    pub username: Option<String>,
    #[serde(rename = "Password")]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Fields present in `other` win.
    pub fn merge(self, other: LoginRequest) -> Self {
        Self {
            username: other.username.or(self.username),
            password: other.password.or(self.password),
        }
    }
}

/// Parse a birthday given as a calendar date or as a full timestamp.
///
/// Timestamps are reduced to their UTC calendar date.
pub fn parse_birthday(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.with_timezone(&Utc).date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

fn deserialize_birthday<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_birthday(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom("expected a date such as 1990-04-12")),
    }
}

fn validate_alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Ok(());
    }
    let mut error = ValidationError::new("alphanumeric");
    error.message = Some(Cow::from(
        "Username contains non alphanumeric characters - not allowed.",
    ));
    Err(error)
}
