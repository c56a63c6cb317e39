//! Checkout contact email.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ContactEmail`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email is required")]
    Empty,
    #[error("Email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("Enter a valid email address")]
    Malformed,
}

/// The email a cart's order confirmation is sent to.
///
/// Input is trimmed. Validation is structural only (one `@`, non-empty
/// local part, a dot somewhere in the domain); the backend has the final say.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ContactEmail(String);

impl ContactEmail {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse a contact email from form input.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError`] if the input is blank, too long, or not shaped
    /// like `local@domain.tld`.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::Malformed)?;
        let domain_ok = !domain.contains('@')
            && domain
                .split_once('.')
                .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty());
        if local.is_empty() || !domain_ok || s.contains(char::is_whitespace) {
            return Err(EmailError::Malformed);
        }

        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let email = ContactEmail::parse("  buyer@shop.example ").unwrap();
        assert_eq!(email.as_str(), "buyer@shop.example");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(ContactEmail::parse("   "), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["no-at", "@shop.example", "a@b", "a@@b.c", "a b@c.d", "a@.c"] {
            assert_eq!(ContactEmail::parse(input), Err(EmailError::Malformed), "{input}");
        }
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            ContactEmail::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }
}
