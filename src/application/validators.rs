use validator::ValidateEmail;

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

/// Lower-cases and trims an email so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates a waitlist source tag (the page surface that submitted the form).
/// Rules:
/// - 1-50 characters
/// - Only lowercase ASCII letters, numbers, hyphens, underscores
/// - Must start with a letter or number
pub fn is_valid_source_tag(tag: &str) -> bool {
    if tag.is_empty() || tag.len() > 50 {
        return false;
    }

    let Some(first) = tag.chars().next() else {
        return false;
    };
    if !first.is_ascii_lowercase() && !first.is_ascii_digit() {
        return false;
    }

    tag.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}
