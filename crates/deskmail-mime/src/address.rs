//! Email address types.

use crate::encoding::encode_phrase;
use crate::error::{Error, Result};
use std::fmt;

/// Characters that may not appear unquoted in an address.
const FORBIDDEN: &str = "<>()[],;:\\\"";

/// A validated `local@domain` email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    /// Creates a new address from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn new(addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();
        Self::validate(&addr)?;
        Ok(Self(addr))
    }

    /// Returns true if the string is a valid address.
    #[must_use]
    pub fn is_valid(addr: &str) -> bool {
        Self::validate(addr).is_ok()
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validates an email address (basic structural validation).
    fn validate(addr: &str) -> Result<()> {
        if addr.is_empty() {
            return Err(Error::InvalidAddress("Address cannot be empty".into()));
        }

        // Headers are written without SMTPUTF8, so 8-bit addresses are refused.
        if !addr.is_ascii() {
            return Err(Error::InvalidAddress(format!(
                "Address must be ASCII: {addr}"
            )));
        }

        if addr
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || FORBIDDEN.contains(c))
        {
            return Err(Error::InvalidAddress(format!(
                "Address contains invalid characters: {addr}"
            )));
        }

        let Some((local, domain)) = addr.split_once('@') else {
            return Err(Error::InvalidAddress(format!("Address must contain @: {addr}")));
        };

        if domain.contains('@') {
            return Err(Error::InvalidAddress(format!(
                "Address must have exactly one @: {addr}"
            )));
        }

        if local.is_empty() || domain.is_empty() {
            return Err(Error::InvalidAddress(format!(
                "Local and domain parts cannot be empty: {addr}"
            )));
        }

        let dotted_badly = |part: &str| part.starts_with('.') || part.ends_with('.') || part.contains("..");
        if dotted_badly(local) || dotted_badly(domain) {
            return Err(Error::InvalidAddress(format!("Misplaced dot in address: {addr}")));
        }

        Ok(())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mailbox (optional display name + address).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    /// Display name (optional).
    pub name: Option<String>,
    /// Email address.
    pub address: Address,
}

impl Mailbox {
    /// Creates a new mailbox with just an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn new(address: impl Into<String>) -> Result<Self> {
        Ok(Self {
            name: None,
            address: Address::new(address)?,
        })
    }

    /// Creates a new mailbox with a display name and address.
    ///
    /// An empty name is treated as no name.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn with_name(name: impl Into<String>, address: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Ok(Self {
            name: (!name.trim().is_empty()).then(|| name.trim().to_string()),
            address: Address::new(address)?,
        })
    }
}

impl From<Address> for Mailbox {
    fn from(address: Address) -> Self {
        Self {
            name: None,
            address,
        }
    }
}

impl fmt::Display for Mailbox {
    /// Renders the header form: `Name <addr>` or bare `addr`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", encode_phrase(name), self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_address() {
        let addr = Address::new("user@example.com").unwrap();
        assert_eq!(addr.as_str(), "user@example.com");
    }

    #[test]
    fn test_invalid_address_no_at() {
        assert!(Address::new("userexample.com").is_err());
    }

    #[test]
    fn test_invalid_address_empty() {
        assert!(Address::new("").is_err());
    }

    #[test]
    fn test_invalid_address_empty_parts() {
        assert!(Address::new("@example.com").is_err());
        assert!(Address::new("user@").is_err());
    }

    #[test]
    fn test_invalid_address_two_ats() {
        assert!(Address::new("a@b@example.com").is_err());
    }

    #[test]
    fn test_invalid_address_whitespace_and_brackets() {
        assert!(!Address::is_valid("jane doe@example.com"));
        assert!(!Address::is_valid("<jane@example.com>"));
        assert!(!Address::is_valid("jane@example..com"));
    }

    #[test]
    fn test_invalid_address_non_ascii() {
        assert!(Address::new("jöhn@example.com").is_err());
        assert!(Address::new("john@exämple.com").is_err());
        assert!(!Address::is_valid("用户@例子.广告"));
    }

    #[test]
    fn test_mailbox_with_name() {
        let mailbox = Mailbox::with_name("John Doe", "john@example.com").unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("John Doe"));
        assert_eq!(mailbox.to_string(), "John Doe <john@example.com>");
    }

    #[test]
    fn test_mailbox_blank_name() {
        let mailbox = Mailbox::with_name("  ", "john@example.com").unwrap();
        assert!(mailbox.name.is_none());
        assert_eq!(mailbox.to_string(), "john@example.com");
    }

    #[test]
    fn test_mailbox_display_quotes_specials() {
        let mailbox = Mailbox::with_name("Doe, John", "john@example.com").unwrap();
        assert_eq!(mailbox.to_string(), "\"Doe, John\" <john@example.com>");
    }
}
