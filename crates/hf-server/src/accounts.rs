//! Account field normalisation and password hashing.

use hf_core::{Error, Result};
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Prefix marking a password hash that can never be verified.
pub const UNUSABLE_PASSWORD_PREFIX: char = '!';

/// Normalise an email address: trim it and lower-case the domain part.
///
/// The local part is kept as entered. Addresses without an `@`, with an
/// empty local or domain part, or containing whitespace are rejected.
pub fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim();
    let Some((local, domain)) = email.rsplit_once('@') else {
        return Err(Error::Validation("Enter a valid email address.".into()));
    };
    if local.is_empty() || domain.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(Error::Validation("Enter a valid email address.".into()));
    }
    Ok(format!("{local}@{}", domain.to_lowercase()))
}

/// Trim a username; blank usernames are stored as absent.
pub fn normalize_username(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|u| !u.is_empty())
        .map(String::from)
}

/// Hash a password with bcrypt.
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| Error::Internal(format!("bcrypt error: {e}")))
}

/// A hash value that no password verifies against.
pub fn unusable_password() -> String {
    let tail: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(40)
        .map(char::from)
        .collect();
    format!("{UNUSABLE_PASSWORD_PREFIX}{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_domain_is_lowercased() {
        assert_eq!(
            normalize_email("  Jane.Doe@Example.COM ").unwrap(),
            "Jane.Doe@example.com"
        );
    }

    #[test]
    fn invalid_emails_rejected() {
        for bad in ["", "no-at-sign", "@example.com", "jane@", "ja ne@example.com"] {
            assert!(
                matches!(normalize_email(bad), Err(Error::Validation(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn blank_username_is_none() {
        assert_eq!(normalize_username(Some("   ")), None);
        assert_eq!(normalize_username(None), None);
        assert_eq!(normalize_username(Some(" kim ")), Some("kim".into()));
    }

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("s3cret").unwrap();
        assert!(bcrypt::verify("s3cret", &hash).unwrap());
        assert!(!bcrypt::verify("wrong", &hash).unwrap());
    }

    #[test]
    fn unusable_password_shape() {
        let a = unusable_password();
        assert!(a.starts_with(UNUSABLE_PASSWORD_PREFIX));
        assert_eq!(a.len(), 41);
        assert_ne!(a, unusable_password());
    }
}
