//! Format rules for user-supplied credentials.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Minimum number of characters in an acceptable password.
pub const MIN_PASSWORD_LENGTH: usize = 9;

/// Check that `email` looks like `local@domain.tld`.
///
/// Surrounding whitespace is ignored. The final domain label must be at least
/// two ASCII letters.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

/// Check password strength.
///
/// Requires at least [`MIN_PASSWORD_LENGTH`] characters including one ASCII
/// lowercase letter, one ASCII uppercase letter and one digit. The value is
/// not trimmed.
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("ann@x.com"));
        assert!(is_valid_email("first.last+notes@mail.example.org"));
        assert!(is_valid_email("  padded@example.io  "));
        assert!(is_valid_email("under_score%tag@sub-domain.example.co"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("short@tld.c"));
        assert!(!is_valid_email("digits@tld.c0m"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spa ce@example.com"));
        assert!(!is_valid_email("ünicode@example.com"));
    }

    #[test]
    fn test_valid_passwords() {
        assert!(is_valid_password("Abcdefg1!"));
        assert!(is_valid_password("aB3456789"));
        assert!(is_valid_password("with spaces Aa1"));
    }

    #[test]
    fn test_invalid_passwords() {
        // eight characters
        assert!(!is_valid_password("Abcdef1!"));
        assert!(!is_valid_password("abcdefgh1"));
        assert!(!is_valid_password("ABCDEFGH1"));
        assert!(!is_valid_password("Abcdefghi"));
        assert!(!is_valid_password(""));
    }

    #[test]
    fn test_password_length_counts_characters() {
        // multi-byte characters count once each
        assert!(!is_valid_password("Aa1éééé"));
        assert!(is_valid_password("Aa1éééééé"));
    }
}
