use validator::ValidationError;

/// Slugs may only contain ASCII letters, digits, hyphens and underscores.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let valid = slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_slug");
        error.message = Some("must contain only letters, digits, hyphens and underscores".into());
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("rust-2024_notes").is_ok());
        assert!(validate_slug("with space").is_err());
        assert!(validate_slug("слаг").is_err());
    }
}
