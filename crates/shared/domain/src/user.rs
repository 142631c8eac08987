//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::constants::MSG_REQUIRED;
use crate::validation::{
    validate_bio, validate_email_address, validate_name, validate_username, validate_website,
};

/// User domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// None only for rows written outside this service
    pub profile: Option<Profile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile attached 1:1 to a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Profile {
    /// Personal website URL
    pub website: Option<String>,
    /// Free-text biography
    pub bio: Option<String>,
}

/// Complete set of user columns, produced from a validated `NewUser`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Profile fields accepted on input. Omitted fields are left untouched on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProfileInput {
    /// Website URL (blank allowed)
    #[validate(custom(function = "validate_website"))]
    pub website: Option<String>,
    /// Biography, at least 50 characters when given (blank allowed)
    #[validate(custom(function = "validate_bio"))]
    pub bio: Option<String>,
}

/// User creation (and full replacement) data transfer object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewUser {
    /// Unique login name
    pub username: Option<String>,
    /// Email address (blank allowed)
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Nested profile
    pub profile: Option<ProfileInput>,
}

impl Validate for NewUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_required(&mut errors, "username", self.username.as_deref(), validate_username);
        check_required(&mut errors, "email", self.email.as_deref(), validate_email_address);
        check_required(&mut errors, "first_name", self.first_name.as_deref(), validate_name);
        check_required(&mut errors, "last_name", self.last_name.as_deref(), validate_name);

        match &self.profile {
            Some(profile) => {
                errors.merge_self("profile", profile.validate());
            }
            None => errors.add("profile", required_error()),
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl NewUser {
    /// Validate and split into the user columns and the profile fields.
    pub fn into_parts(self) -> Result<(UserRecord, ProfileInput), ValidationErrors> {
        self.validate()?;

        // every field is present once validation passed
        Ok((
            UserRecord {
                username: self.username.unwrap_or_default(),
                email: self.email.unwrap_or_default(),
                first_name: self.first_name.unwrap_or_default(),
                last_name: self.last_name.unwrap_or_default(),
            },
            self.profile.unwrap_or_default(),
        ))
    }
}

fn check_required(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&str>,
    rule: fn(&str) -> Result<(), ValidationError>,
) {
    match value.map(rule) {
        None => errors.add(field, required_error()),
        Some(Err(error)) => errors.add(field, error),
        Some(Ok(())) => {}
    }
}

fn required_error() -> ValidationError {
    ValidationError::new("required").with_message(MSG_REQUIRED.into())
}

/// Partial user update data transfer object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserChanges {
    #[validate(custom(function = "validate_username"))]
    pub username: Option<String>,
    #[validate(custom(function = "validate_email_address"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_name"))]
    pub first_name: Option<String>,
    #[validate(custom(function = "validate_name"))]
    pub last_name: Option<String>,
    /// Profile fields to change
    #[validate(nested)]
    pub profile: Option<ProfileInput>,
}

impl UserChanges {
    /// Changes that overwrite every user column and apply the given profile fields.
    pub fn replacing(record: UserRecord, profile: ProfileInput) -> Self {
        Self {
            username: Some(record.username),
            email: Some(record.email),
            first_name: Some(record.first_name),
            last_name: Some(record.last_name),
            profile: Some(profile),
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    /// Unique user identifier
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Nested profile
    pub profile: Option<Profile>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            profile: user.profile,
        }
    }
}
