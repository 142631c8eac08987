//! Field rules that the derive attributes cannot express on their own.

use std::borrow::Cow;

use validator::{ValidateEmail, ValidateUrl, ValidationError};

use crate::constants::{
    MAX_NAME_LENGTH, MAX_WEBSITE_LENGTH, MIN_BIO_LENGTH, MSG_BIO_TOO_SHORT, MSG_BLANK,
    MSG_INVALID_EMAIL, MSG_INVALID_URL, MSG_INVALID_USERNAME, MSG_NAME_TOO_LONG, MSG_WEBSITE_TOO_LONG,
    USERNAME_EXTRA_CHARS, WEBSITE_SCHEMES,
};

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Non-blank, at most `MAX_NAME_LENGTH` characters, letters, digits and `@.+-_` only.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(error("blank", MSG_BLANK));
    }
    if username.chars().count() > MAX_NAME_LENGTH {
        return Err(error("length", MSG_NAME_TOO_LONG));
    }

    let valid = username
        .chars()
        .all(|c| c.is_alphanumeric() || USERNAME_EXTRA_CHARS.contains(&c));

    if valid {
        Ok(())
    } else {
        Err(error("username", MSG_INVALID_USERNAME))
    }
}

/// First or last name, at most `MAX_NAME_LENGTH` characters (blank allowed)
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(error("length", MSG_NAME_TOO_LONG));
    }
    Ok(())
}

/// Blank is allowed.
pub fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || email.validate_email() {
        Ok(())
    } else {
        Err(error("email", MSG_INVALID_EMAIL))
    }
}

/// Blank is allowed; anything else must be an absolute http(s)/ftp(s) URL.
pub fn validate_website(website: &str) -> Result<(), ValidationError> {
    if website.is_empty() {
        return Ok(());
    }
    if website.chars().count() > MAX_WEBSITE_LENGTH {
        return Err(error("length", MSG_WEBSITE_TOO_LONG));
    }

    let lowered = website.to_ascii_lowercase();
    let known_scheme = WEBSITE_SCHEMES
        .iter()
        .any(|scheme| lowered.starts_with(scheme));

    if known_scheme && website.validate_url() {
        Ok(())
    } else {
        Err(error("url", MSG_INVALID_URL))
    }
}

/// Blank is allowed; a non-empty bio needs at least `MIN_BIO_LENGTH` characters.
pub fn validate_bio(bio: &str) -> Result<(), ValidationError> {
    if bio.is_empty() || bio.chars().count() >= MIN_BIO_LENGTH {
        Ok(())
    } else {
        Err(error("bio_length", MSG_BIO_TOO_SHORT))
    }
}
