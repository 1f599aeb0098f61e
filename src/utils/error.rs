use thiserror::Error;

#[derive(Error, Debug)]
pub enum CareError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{provider} unavailable: {message}")]
    ProviderUnavailable { provider: String, message: String },

    #[error("Invalid coordinate ({latitude}, {longitude}): {reason}")]
    InvalidCoordinate {
        latitude: f64,
        longitude: f64,
        reason: String,
    },

    #[error("Could not open external link: {message}")]
    LaunchError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Provider,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CareError {
    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        CareError::ProviderUnavailable {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CareError::ConfigError { .. }
            | CareError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CareError::HttpError(_) | CareError::ProviderUnavailable { .. } => {
                ErrorCategory::Provider
            }
            CareError::InvalidCoordinate { .. } => ErrorCategory::Data,
            CareError::IoError(_) | CareError::LaunchError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Provider => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => match self {
                CareError::LaunchError { .. } => ErrorSeverity::Low,
                _ => ErrorSeverity::Critical,
            },
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CareError::HttpError(_) | CareError::ProviderUnavailable { .. } => {
                "A location service could not be reached.".to_string()
            }
            CareError::InvalidCoordinate { .. } => {
                "The location service returned an unusable position.".to_string()
            }
            CareError::ConfigError { message } => format!("Configuration problem: {}", message),
            CareError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            CareError::LaunchError { .. } => "The link could not be opened.".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the configuration file and command-line flags",
            ErrorCategory::Provider => "Check your network connection or enter the address manually",
            ErrorCategory::Data => "Try again or enter the address manually",
            ErrorCategory::System => "Copy the printed link and open it yourself",
        }
    }
}

pub type Result<T> = std::result::Result<T, CareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_errors_are_recoverable() {
        let err = CareError::provider("ip-lookup", "timed out");
        assert_eq!(err.category(), ErrorCategory::Provider);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.to_string(), "ip-lookup unavailable: timed out");
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = CareError::InvalidConfigValueError {
            field: "providers.ip_lookup_url".to_string(),
            value: String::new(),
            reason: "URL cannot be empty".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("providers.ip_lookup_url"));
    }

    #[test]
    fn test_launch_error_is_low_severity() {
        let err = CareError::LaunchError {
            message: "no browser".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
    }
}
