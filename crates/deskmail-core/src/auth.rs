//! Pre-flight authorization.
//!
//! Runs once before any database access. Implementations must not prompt.

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// The run may proceed.
    Allowed,
    /// The run is refused, with a reason for the operator.
    Denied(String),
}

impl Authorization {
    /// Converts a denial into [`crate::Error::Unauthorized`].
    ///
    /// # Errors
    ///
    /// Returns an error if authorization was denied.
    pub fn into_result(self) -> crate::Result<()> {
        match self {
            Self::Allowed => Ok(()),
            Self::Denied(reason) => Err(crate::Error::Unauthorized(reason)),
        }
    }
}

/// Decides whether a run may start.
pub trait Authorizer {
    /// Performs the check.
    fn authorize(&self) -> Authorization;
}

/// Allows every run. Used when no registration key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn authorize(&self) -> Authorization {
        Authorization::Allowed
    }
}

/// Compares a provided registration key against the expected one.
#[derive(Debug, Clone)]
pub struct RegistrationKey {
    expected: String,
    provided: Option<String>,
}

impl RegistrationKey {
    /// Creates a check for `expected`, using the key the operator supplied.
    #[must_use]
    pub fn new(expected: impl Into<String>, provided: Option<String>) -> Self {
        Self {
            expected: expected.into(),
            provided,
        }
    }
}

impl Authorizer for RegistrationKey {
    fn authorize(&self) -> Authorization {
        match self.provided.as_deref().map(str::trim) {
            None | Some("") => Authorization::Denied("no registration key supplied".to_string()),
            Some(key) if key == self.expected => Authorization::Allowed,
            Some(_) => Authorization::Denied("registration key does not match".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_all() {
        assert_eq!(AllowAll.authorize(), Authorization::Allowed);
    }

    #[test]
    fn test_registration_key_match() {
        let check = RegistrationKey::new("ABC-123", Some(" ABC-123 ".to_string()));
        assert_eq!(check.authorize(), Authorization::Allowed);
    }

    #[test]
    fn test_registration_key_mismatch() {
        let check = RegistrationKey::new("ABC-123", Some("nope".to_string()));
        assert!(matches!(check.authorize(), Authorization::Denied(_)));
        assert!(check.authorize().into_result().is_err());
    }

    #[test]
    fn test_registration_key_missing() {
        let check = RegistrationKey::new("ABC-123", None);
        assert_eq!(
            check.authorize(),
            Authorization::Denied("no registration key supplied".to_string())
        );
    }
}
