use crate::utils::error::{Result, TallyError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(TallyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(TallyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| TallyError::MissingConfigError {
        field: field_name.to_string(),
    })
}

/// Whitespace counts as content; only `""` is rejected.
pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(TallyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("input.files", "cave.tmlu").is_ok());
        assert!(validate_path("input.files", "/data/surveys/cave.tmlu").is_ok());
        assert!(validate_path("input.files", "").is_err());
        assert!(validate_path("input.files", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_required_and_non_empty() {
        let needle: Option<String> = None;
        assert!(validate_required_field("filter.needle", &needle).is_err());

        let needle = Some("Fred".to_string());
        assert_eq!(validate_required_field("filter.needle", &needle).unwrap(), "Fred");

        assert!(validate_non_empty_string("filter.needle", "").is_err());
        assert!(validate_non_empty_string("filter.needle", " ").is_ok());
        assert!(validate_non_empty_string("filter.needle", "Fred").is_ok());
    }
}
