//! Session identifiers
//!
//! Session IDs are caller-supplied (one per client) and are used as keys in
//! the session store. They are validated to be filesystem-safe so that any
//! per-session paths derived from them cannot escape their directory.

use crate::{Error, Result};

/// Session identifier
pub type SessionId = String;

/// Validate a session ID to prevent path traversal attacks
pub fn validate_session_id(session_id: &str) -> Result<()> {
    // Check length
    if session_id.is_empty() || session_id.len() > 255 {
        return Err(Error::InvalidSession("invalid session ID length".to_string()));
    }

    // Only allow alphanumeric, dash, and underscore (safe for filesystem)
    if !session_id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::InvalidSession(format!(
            "invalid session ID format: {}. Only alphanumeric, dash, and underscore allowed",
            session_id
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_session_ids() {
        assert!(validate_session_id("client-1").is_ok());
        assert!(validate_session_id("a1b2c3d4e5f6").is_ok());
        assert!(validate_session_id("warehouse_east_02").is_ok());
    }

    #[test]
    fn test_rejects_empty_and_oversized() {
        assert!(validate_session_id("").is_err());
        assert!(validate_session_id(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_rejects_path_traversal() {
        assert!(validate_session_id("../etc").is_err());
        assert!(validate_session_id("a/b").is_err());
        assert!(validate_session_id("a\\b").is_err());
        assert!(validate_session_id("a b").is_err());
    }
}
