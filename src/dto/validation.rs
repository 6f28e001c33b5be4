//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a team alias is 2 or 3 uppercase ASCII letters.
///
/// # Examples
///
/// ```ignore
/// validate_team_alias("KC")  // Ok
/// validate_team_alias("buf") // Err - lowercase
/// validate_team_alias("BUFF") // Err - too long
/// ```
pub fn validate_team_alias(alias: &str) -> Result<(), ValidationError> {
    if !(2..=3).contains(&alias.len()) {
        let mut err = ValidationError::new("team_alias_length");
        err.message = Some(
            format!(
                "Team alias must be 2 or 3 characters (got {})",
                alias.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !alias.chars().all(|c| c.is_ascii_uppercase()) {
        let mut err = ValidationError::new("team_alias_format");
        err.message = Some("Team alias must contain only uppercase letters".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_team_alias_valid() {
        assert!(validate_team_alias("KC").is_ok());
        assert!(validate_team_alias("BUF").is_ok());
        assert!(validate_team_alias("LAR").is_ok());
    }

    #[test]
    fn test_validate_team_alias_invalid_length() {
        assert!(validate_team_alias("K").is_err()); // too short
        assert!(validate_team_alias("BUFF").is_err()); // too long
        assert!(validate_team_alias("").is_err()); // empty
    }

    #[test]
    fn test_validate_team_alias_invalid_format() {
        assert!(validate_team_alias("buf").is_err()); // lowercase
        assert!(validate_team_alias("Kc").is_err()); // mixed case
        assert!(validate_team_alias("N1").is_err()); // digit
        assert!(validate_team_alias("S F").is_err()); // space
    }
}
