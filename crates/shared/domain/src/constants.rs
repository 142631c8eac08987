//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Users
// =============================================================================

/// Maximum length of username, first name and last name
pub const MAX_NAME_LENGTH: usize = 150;

/// Characters allowed in a username besides letters and digits
pub const USERNAME_EXTRA_CHARS: &[char] = &['@', '.', '+', '-', '_'];

// =============================================================================
// Profiles
// =============================================================================

/// Minimum bio length when a bio is given
pub const MIN_BIO_LENGTH: usize = 50;

/// Maximum website length
pub const MAX_WEBSITE_LENGTH: usize = 200;

/// URL schemes accepted for a profile website
pub const WEBSITE_SCHEMES: &[&str] = &["http://", "https://", "ftp://", "ftps://"];

// =============================================================================
// Catalog
// =============================================================================

/// Maximum category name length
pub const MAX_CATEGORY_NAME_LENGTH: u32 = 100;

/// Maximum product name length
pub const MAX_PRODUCT_NAME_LENGTH: u32 = 200;

/// Products kept per category by the ranked views
pub const TOP_PRODUCTS_PER_CATEGORY: u32 = 10;

// =============================================================================
// Messages
// =============================================================================

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_BLANK: &str = "This field may not be blank.";
pub const MSG_INVALID_USERNAME: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const MSG_USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const MSG_INVALID_EMAIL: &str = "Enter a valid email address.";
pub const MSG_INVALID_URL: &str = "Enter a valid URL.";
pub const MSG_BIO_TOO_SHORT: &str = "Bio must be at least 50 characters long";
pub const MSG_NAME_TOO_LONG: &str = "Ensure this field has no more than 150 characters.";
pub const MSG_WEBSITE_TOO_LONG: &str = "Ensure this field has no more than 200 characters.";
