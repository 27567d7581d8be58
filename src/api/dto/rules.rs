//! Field rules shared by the payload validators.

use url::Url;

/// Length in characters (not bytes), so Cyrillic names count the same as Latin ones.
pub fn len_between(value: &str, min: usize, max: usize) -> bool {
    let len = value.trim().chars().count();
    (min..=max).contains(&len)
}

pub fn is_http_url(value: &str) -> bool {
    match Url::parse(value.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}

pub fn is_email(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || value.len() > 254 || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !local.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

/// bcrypt only reads this many bytes of a password.
pub const MAX_PASSWORD_BYTES: usize = 72;

pub fn is_password(value: &str) -> bool {
    !value.is_empty() && value.len() <= MAX_PASSWORD_BYTES
}

pub fn normalize_email(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}
