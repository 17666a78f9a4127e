//! Email normalization

/// Lower-case the domain part of an email address
///
/// The address is split at its last `@`; only the part after it is
/// lower-cased and surrounding whitespace is trimmed. An address without
/// `@` is returned untouched.
pub fn normalize_email(email: &str) -> String {
    match email.trim().rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}
