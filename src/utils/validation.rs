use crate::utils::error::{EtlError, Result};
use std::fmt::Display;
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl Display, reason: impl Into<String>) -> EtlError {
    EtlError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Dataset URLs must be absolute http(s) URLs.
pub fn validate_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| invalid(field, value, format!("not a valid URL: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(field, value, format!("scheme '{}' is not http or https", url.scheme())));
    }
    Ok(())
}

pub fn validate_path(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(invalid(field, value, "path is empty"));
    }
    if value.contains('\0') {
        return Err(invalid(field, value, "path contains a NUL byte"));
    }
    Ok(())
}

/// Checks the file name's extension against `allowed`, case-insensitively.
pub fn validate_extension(field: &str, file_name: &str, allowed: &[&str]) -> Result<()> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| invalid(field, file_name, "file name has no extension"))?;

    if allowed.iter().any(|ok| ok.eq_ignore_ascii_case(extension)) {
        Ok(())
    } else {
        Err(invalid(
            field,
            file_name,
            format!("extension '{}' is not one of: {}", extension, allowed.join(", ")),
        ))
    }
}

pub fn validate_non_empty_string(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "value is blank"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + Display>(field: &str, value: T, min: T, max: T) -> Result<()> {
    if value < min || value > max {
        let reason = format!("must be within {}..={}", min, max);
        return Err(invalid(field, value, reason));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("source.airports_url", "https://example.com/airports.dat").is_ok());
        assert!(validate_url("source.airports_url", "http://127.0.0.1:8080/routes.dat").is_ok());
        assert!(validate_url("source.airports_url", "").is_err());
        assert!(validate_url("source.airports_url", "airports.dat").is_err());

        let err = validate_url("source.routes_url", "ftp://example.com/routes.dat").unwrap_err();
        assert!(matches!(err, EtlError::InvalidConfigValueError { field, .. } if field == "source.routes_url"));
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("load.output_path", "./output").is_ok());
        assert!(validate_path("load.output_path", "").is_err());
        assert!(validate_path("load.output_path", "out\0put").is_err());
    }

    #[test]
    fn test_validate_extension() {
        assert!(validate_extension("load.filename", "routes_with_distances.csv", &["csv"]).is_ok());
        assert!(validate_extension("load.filename", "ROUTES.CSV", &["csv"]).is_ok());
        assert!(validate_extension("load.filename", "routes.json", &["csv"]).is_err());
        assert!(validate_extension("load.filename", "routes", &["csv"]).is_err());
    }

    #[test]
    fn test_validate_range_and_non_empty() {
        assert!(validate_range("source.timeout_seconds", 30u64, 1, 3600).is_ok());
        assert!(validate_range("source.timeout_seconds", 3600u64, 1, 3600).is_ok());
        assert!(validate_range("source.timeout_seconds", 0u64, 1, 3600).is_err());
        assert!(validate_non_empty_string("pipeline.name", "  ").is_err());
        assert!(validate_non_empty_string("pipeline.name", "mirror").is_ok());
    }
}
