//! Name and credential validation for deployed resources.
//!
//! The rules mirror what the management service enforces, so invalid input is rejected
//! before any resource is created.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static GROUP_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_().\-]{1,90}$").expect("Invalid regex pattern"));

static RESOURCE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9_.\-]{0,78}[A-Za-z0-9_])?$")
        .expect("Invalid regex pattern")
});

const FORBIDDEN_USERNAME_CHARS: &[char] = &[
    '\\', '/', '"', '[', ']', ':', '|', '<', '>', '+', '=', ';', ',', '?', '*', '@', '&',
];

const RESERVED_USERNAMES: &[&str] = &[
    "administrator",
    "admin",
    "user",
    "user1",
    "test",
    "user2",
    "test1",
    "user3",
    "admin1",
    "1",
    "123",
    "a",
    "actuser",
    "adm",
    "admin2",
    "aspnet",
    "backup",
    "console",
    "david",
    "guest",
    "john",
    "owner",
    "root",
    "server",
    "sql",
    "support",
    "support_388945a0",
    "sys",
    "test2",
    "test3",
    "user4",
    "user5",
];

/// Minimum admin password length
pub const MIN_PASSWORD_LEN: usize = 12;
/// Maximum admin password length
pub const MAX_PASSWORD_LEN: usize = 123;

/// Validate a resource group name and return it trimmed.
///
/// # Errors
///
/// Returns [`Error::ValidationError`] if the name is empty, longer than 90 characters,
/// contains characters outside `[A-Za-z0-9_().-]` or ends with a period.
pub fn validate_group_name(name: &str) -> Result<String> {
    let name = name.trim();
    if !GROUP_NAME.is_match(name) {
        return Err(Error::ValidationError(format!(
            "Resource group name '{name}' must be 1-90 characters of letters, digits, '_', '(', ')', '.' or '-'"
        )));
    }
    if name.ends_with('.') {
        return Err(Error::ValidationError(format!(
            "Resource group name '{name}' must not end with a period"
        )));
    }
    Ok(name.to_string())
}

/// Validate a network or compute resource name.
///
/// # Errors
///
/// Returns [`Error::ValidationError`] if the name breaks the 1-80 character rule set.
pub fn validate_resource_name(name: &str) -> Result<()> {
    if RESOURCE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(Error::ValidationError(format!(
            "Resource name '{name}' must be 1-80 characters, start with a letter or digit and end with a letter, digit or '_'"
        )))
    }
}

/// Validate a VM administrator username.
///
/// # Errors
///
/// Returns [`Error::ValidationError`] on length, character or reserved-name violations.
pub fn validate_admin_username(name: &str) -> Result<()> {
    let len = name.chars().count();
    if len == 0 || len > 20 {
        return Err(Error::ValidationError(
            "Admin username must be between 1 and 20 characters".to_string(),
        ));
    }
    if name
        .chars()
        .any(|c| c.is_whitespace() || FORBIDDEN_USERNAME_CHARS.contains(&c))
    {
        return Err(Error::ValidationError(format!(
            "Admin username '{name}' contains a forbidden character"
        )));
    }
    if name.ends_with('.') {
        return Err(Error::ValidationError(format!(
            "Admin username '{name}' must not end with a period"
        )));
    }
    let lowered = name.to_lowercase();
    if RESERVED_USERNAMES.contains(&lowered.as_str()) {
        return Err(Error::ValidationError(format!(
            "Admin username '{name}' is reserved"
        )));
    }
    Ok(())
}

/// Validate a VM administrator password.
///
/// # Errors
///
/// Returns [`Error::ValidationError`] if the password is too short, too long or uses
/// fewer than three character classes.
pub fn validate_admin_password(password: &str) -> Result<()> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(Error::ValidationError(format!(
            "Admin password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters"
        )));
    }

    let classes = [
        password.chars().any(char::is_lowercase),
        password.chars().any(char::is_uppercase),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_alphanumeric()),
    ];
    if classes.iter().filter(|present| **present).count() < 3 {
        return Err(Error::ValidationError(
            "Admin password needs three of: lowercase, uppercase, digit, special character"
                .to_string(),
        ));
    }
    Ok(())
}
