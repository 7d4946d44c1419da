use crate::utils::error::{Result, SimError};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// True when a source location should be fetched over HTTP rather than read from disk.
pub fn is_remote_location(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SimError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SimError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SimError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SimError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SimError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// A source location is either an http(s) URL or a local path.
pub fn validate_location(field_name: &str, location: &str) -> Result<()> {
    if is_remote_location(location) {
        validate_url(field_name, location)
    } else {
        validate_path(field_name, location)
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(SimError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_file_extension(
    field_name: &str,
    file: &str,
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_set.contains(extension) => Ok(()),
        Some(extension) => Err(SimError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(SimError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_one_of(field_name: &str, values: &[String], allowed: &[&str]) -> Result<()> {
    for value in values {
        let value_norm = value.trim();
        if !allowed.iter().any(|a| a.eq_ignore_ascii_case(value_norm)) {
            return Err(SimError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.clone(),
                reason: format!("Unsupported value. Valid values: {}", allowed.join(", ")),
            });
        }
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SimError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(SimError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("sources.parties", "https://example.com/parties.json").is_ok());
        assert!(validate_url("sources.parties", "http://example.com").is_ok());
        assert!(validate_url("sources.parties", "").is_err());
        assert!(validate_url("sources.parties", "invalid-url").is_err());
        assert!(validate_url("sources.parties", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_location_dispatches_on_scheme() {
        assert!(validate_location("sources.parties", "data/parties.json").is_ok());
        assert!(validate_location("sources.parties", "https://example.com/p.json").is_ok());
        assert!(validate_location("sources.parties", "https://").is_err());
        assert!(validate_location("sources.parties", "").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("simulation.runs", 5, 1).is_ok());
        assert!(validate_positive_number("simulation.runs", 0, 1).is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("sources.demographics", "pref.csv", &["json", "csv"]).is_ok());
        assert!(validate_file_extension("sources.demographics", "pref.txt", &["json", "csv"]).is_err());
        assert!(validate_file_extension("sources.demographics", "pref", &["json", "csv"]).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("popularity", 40, 0, 100).is_ok());
        assert!(validate_range("popularity", 101, 0, 100).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        let formats = vec!["json".to_string(), "csv".to_string()];
        assert!(validate_one_of("output.formats", &formats, &["json", "csv", "tsv"]).is_ok());
        let bad = vec!["xml".to_string()];
        assert!(validate_one_of("output.formats", &bad, &["json", "csv", "tsv"]).is_err());
        let shouted = vec!["JSON".to_string(), " Tsv ".to_string()];
        assert!(validate_one_of("output.formats", &shouted, &["json", "csv", "tsv"]).is_ok());
    }
}
