//! Application identifiers and the REST paths derived from them.
//!
//! The scheduler reports ids with a leading `/` (`/web-1`) while URL paths
//! are built from the id with that root stripped. Callers may pass either
//! form, so every comparison goes through [`normalize_app_id`].

use thiserror::Error;

/// REST endpoint prefixes.
pub mod paths {
    /// Application collection.
    /// GET: list, POST: create.
    pub const APPS: &str = "/v2/apps";

    /// Suffix for the rolling-restart endpoint of a single application.
    pub const RESTART: &str = "restart";

    /// Suffix for the version history of a single application.
    pub const VERSIONS: &str = "versions";
}

/// Reasons an application id is rejected before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppIdError {
    #[error("application id must not be empty")]
    Empty,

    #[error("application id '{0}' contains an empty path segment")]
    EmptySegment(String),

    #[error("application id '{id}' contains invalid character {ch:?} (allowed: a-z 0-9 . - _ /)")]
    InvalidChar { id: String, ch: char },
}

/// Validate an application id.
///
/// Accepts both `/group/app` and `group/app`. Segments may contain lowercase
/// ASCII letters, digits, `.`, `-` and `_`.
pub fn validate_app_id(id: &str) -> Result<(), AppIdError> {
    let trimmed = id.trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(AppIdError::Empty);
    }
    if let Some(ch) = trimmed
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | '_' | '/')))
    {
        return Err(AppIdError::InvalidChar {
            id: id.to_string(),
            ch,
        });
    }
    if trimmed.split('/').any(str::is_empty) {
        return Err(AppIdError::EmptySegment(id.to_string()));
    }
    Ok(())
}

/// Canonical form of an id: exactly one leading `/`.
#[must_use]
pub fn normalize_app_id(id: &str) -> String {
    format!("/{}", id.trim_start_matches('/'))
}

/// Whether two ids name the same application.
#[must_use]
pub fn same_app(a: &str, b: &str) -> bool {
    a.trim_start_matches('/') == b.trim_start_matches('/')
}

/// `/v2/apps/{id}` with the id's root stripped.
#[must_use]
pub fn app_path(id: &str) -> String {
    format!("{}/{}", paths::APPS, id.trim_start_matches('/'))
}

/// `/v2/apps/{id}/restart`
#[must_use]
pub fn restart_path(id: &str) -> String {
    format!("{}/{}", app_path(id), paths::RESTART)
}

/// `/v2/apps/{id}/versions`
#[must_use]
pub fn versions_path(id: &str) -> String {
    format!("{}/{}", app_path(id), paths::VERSIONS)
}
