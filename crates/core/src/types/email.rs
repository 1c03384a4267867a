//! Contact email addresses.

use core::fmt;

use serde::Serialize;

/// Why a contact email was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    /// Not of the form `local@domain.tld`.
    #[error("'{0}' is not a valid email address")]
    Invalid(String),
}

/// An email address left on the contact form, trimmed and lowercased.
///
/// Requires a single `@` with a non-empty local part before it and a dotted
/// domain after it. Whitespace is rejected.
///
/// ```
/// use gototech_core::Email;
///
/// let email = Email::parse(" Ana@GotoTech.PE ").unwrap();
/// assert_eq!(email.as_str(), "ana@gototech.pe");
///
/// assert!(Email::parse("ana@localhost").is_err());
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Normalize and validate `s`.
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Empty` for blank input and `EmailError::Invalid`
    /// for anything that does not look like `local@domain.tld`.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim().to_lowercase();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        let valid = match s.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !s.chars().any(char::is_whitespace)
            }
            None => false,
        };

        if valid { Ok(Self(s)) } else { Err(EmailError::Invalid(s)) }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_common_addresses() {
        for raw in ["ana@example.pe", "ana.torres+pedidos@gototech.com.pe", "a@b.c"] {
            assert!(Email::parse(raw).is_ok(), "{raw} should parse");
        }
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let email = Email::parse("  Ana.Torres@GotoTech.PE ").unwrap();
        assert_eq!(email.as_str(), "ana.torres@gototech.pe");
        assert_eq!(email.to_string(), "ana.torres@gototech.pe");
    }

    #[test]
    fn test_parse_blank_is_empty() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for raw in [
            "not-an-email",
            "@gototech.pe",
            "ana@",
            "ana@localhost",
            "ana@@gototech.pe",
            "ana@gototech.",
            "ana torres@gototech.pe",
        ] {
            assert!(
                matches!(Email::parse(raw), Err(EmailError::Invalid(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let email = Email::parse("ana@example.pe").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"ana@example.pe\"");
    }
}
