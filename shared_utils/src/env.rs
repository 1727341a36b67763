use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads a required environment variable, returning a structured error if it
/// is missing or empty.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn require(name: &str) -> Result<String, MissingEnvVarError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(MissingEnvVarError(name.to_string())),
    }
}

/// Reads an optional environment variable.
///
/// Unset and empty variables both map to `None`, so callers can treat
/// `FOO=""` and an absent `FOO` the same way.
pub fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_reports_the_variable_name() {
        let err = require("SHARED_UTILS_TEST_UNSET_VAR").unwrap_err();
        assert!(err.to_string().contains("SHARED_UTILS_TEST_UNSET_VAR"));
    }

    #[test]
    fn optional_treats_unset_as_none() {
        assert_eq!(optional("SHARED_UTILS_TEST_UNSET_VAR"), None);
    }
}
