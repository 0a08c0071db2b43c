//! Email address newtype.
//!
//! Logins and customer records are keyed by email, and the local part doubles
//! as the display-name fallback when a token payload carries no name. The
//! validation here is deliberately shallow (shape, not deliverability); the
//! backend is the authority on whether an address is acceptable.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a string failed to parse as an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email vazio")]
    Empty,
    #[error("email com mais de {0} caracteres")]
    TooLong(usize),
    #[error("email sem @ ou com parte vazia")]
    Malformed,
}

/// A structurally valid email address.
///
/// Guarantees after parsing: trimmed, at most 254 characters (RFC 5321), and
/// of the shape `local@domain` with both sides non-empty.
///
/// ```
/// use doceria_core::Email;
///
/// let email: Email = "maria@doceria.com.br".parse().unwrap();
/// assert_eq!(email.local_part(), "maria");
/// assert!("sem-arroba".parse::<Email>().is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum accepted length (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse and validate, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// [`EmailError`] when the input is empty, too long, lacks an `@`, or has
    /// an empty local part or domain.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(EmailError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong(Self::MAX_LENGTH));
        }

        match trimmed.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(EmailError::Malformed),
        }
    }

    /// The address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Everything before the `@`.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or(self.0.as_str(), |(local, _)| local)
    }

    /// Everything after the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }

    /// Case-insensitive comparison against a raw address.
    ///
    /// The backend matches customer emails with `ilike`; client-side lookups
    /// must compare the same way.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
