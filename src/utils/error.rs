use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Malformed capabilities document: {message}")]
    MalformedDocument { message: String },

    #[error("The WMS service must be in version {expected} but is {found}")]
    UnsupportedVersion { found: String, expected: String },

    #[error("The WMS service does not advertise the {operation} operation")]
    UnsupportedOperation { operation: String },

    #[error("Refusing to fetch non-https capabilities URL: {url}")]
    InsecureUrl { url: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} while loading {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Document,
    Service,
    Network,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PreviewError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedDocument { .. } => ErrorCategory::Document,
            Self::UnsupportedVersion { .. } | Self::UnsupportedOperation { .. } => {
                ErrorCategory::Service
            }
            Self::InsecureUrl { .. } | Self::Http(_) | Self::HttpStatus { .. } => {
                ErrorCategory::Network
            }
            Self::ConfigValidation { .. } | Self::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
            Self::Io(_) | Self::Serialization(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // The service simply has nothing to offer for this request.
            ErrorCategory::Service => ErrorSeverity::Low,
            ErrorCategory::Document | ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Errors that the search popup renders as an empty result list.
    pub fn is_no_results(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Document | ErrorCategory::Service | ErrorCategory::Network
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MalformedDocument { .. } => {
                "Check that the URL points to a WMS GetCapabilities document (REQUEST=GetCapabilities)"
            }
            Self::UnsupportedVersion { .. } => "Request the capabilities with VERSION=1.3.0",
            Self::UnsupportedOperation { .. } => {
                "Pick the other attachment mode or a service that advertises this operation"
            }
            Self::InsecureUrl { .. } => "Use an https:// URL for the capabilities document",
            Self::Http(_) | Self::HttpStatus { .. } => {
                "Check the network connection and whether the resource sends CORS headers"
            }
            Self::ConfigValidation { .. } | Self::InvalidConfigValue { .. } => {
                "Fix the configuration file or CLI arguments"
            }
            Self::Io(_) | Self::Serialization(_) => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MalformedDocument { .. } => {
                "The capabilities document could not be read".to_string()
            }
            Self::UnsupportedVersion { found, expected } => format!(
                "The WMS service must be in version {} but is {}",
                expected, found
            ),
            Self::UnsupportedOperation { operation } => {
                format!("The WMS service does not offer {}", operation)
            }
            Self::Http(_) | Self::HttpStatus { .. } => {
                "Unable to load GetCapabilities document: does the resource contain CORS headers?"
                    .to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PreviewError>;
