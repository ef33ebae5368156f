use thiserror::Error;

/// 測試夾具本身拋出的錯誤
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixtureError {
    #[error("Error in method of verification")]
    VerificationFailed,

    #[error("{message}")]
    InvalidInput { message: String },

    #[error("cannot allocate {requested} bytes")]
    Allocation { requested: usize },
}

impl FixtureError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error("The class {class_name} cannot be found")]
    ClassNotFound { class_name: String },

    #[error("The match public method {method} in class {class_name} cannot be found")]
    MethodNotFound { method: String, class_name: String },

    #[error("{kind} value type <{type_name}> is not accepted")]
    UnsupportedType { kind: String, type_name: String },

    #[error("The output type {type_name} does not match")]
    OutputMismatch { type_name: String },

    #[error("Argument mismatch for {method}: {reason}")]
    ArgumentMismatch { method: String, reason: String },

    #[error("time limit of {limit_ms} ms exceeded")]
    TimeLimitExceeded { limit_ms: u64 },

    #[error("memory limit of {limit_mb} MB exceeded")]
    MemoryLimitExceeded { limit_mb: u64 },

    #[error("Worker failed: {message}")]
    WorkerError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Fixture,
    Signature,
    Limit,
    Configuration,
    System,
}

impl HarnessError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            HarnessError::Fixture(_) | HarnessError::ArgumentMismatch { .. } => {
                ErrorCategory::Fixture
            }
            HarnessError::ClassNotFound { .. }
            | HarnessError::MethodNotFound { .. }
            | HarnessError::UnsupportedType { .. }
            | HarnessError::OutputMismatch { .. } => ErrorCategory::Signature,
            HarnessError::TimeLimitExceeded { .. } | HarnessError::MemoryLimitExceeded { .. } => {
                ErrorCategory::Limit
            }
            HarnessError::ConfigValidationError { .. }
            | HarnessError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            HarnessError::WorkerError { .. }
            | HarnessError::IoError(_)
            | HarnessError::SerializationError(_) => ErrorCategory::System,
        }
    }

    /// CLI 結束碼
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Fixture | ErrorCategory::Limit => 2,
            ErrorCategory::Signature | ErrorCategory::Configuration => 1,
            ErrorCategory::System => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Fixture => format!("Fixture method failed: {}", self),
            ErrorCategory::Signature => format!("Method signature check failed: {}", self),
            ErrorCategory::Limit => format!("Resource limit hit: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            HarnessError::ClassNotFound { .. } => {
                "Use GuessRandom or MockedClass as the class name"
            }
            HarnessError::MethodNotFound { .. } | HarnessError::OutputMismatch { .. } => {
                "Check method name, input types and output type against the fixture"
            }
            HarnessError::UnsupportedType { .. } => {
                "Supported types: void, int, double, string, int[], double[], string[]"
            }
            HarnessError::ArgumentMismatch { .. } => {
                "Pass one JSON value per method parameter, matching its type"
            }
            HarnessError::TimeLimitExceeded { .. } => {
                "Raise time_limit_ms or use a smaller input"
            }
            HarnessError::MemoryLimitExceeded { .. } => {
                "Raise max_memory_mb; it limits the whole harness process, not only the fixture"
            }
            HarnessError::ConfigValidationError { .. }
            | HarnessError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and run again"
            }
            HarnessError::Fixture(_) => "The fixture rejected its input; this is often expected",
            HarnessError::WorkerError { .. }
            | HarnessError::IoError(_)
            | HarnessError::SerializationError(_) => "Check the environment and retry",
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_messages() {
        let err = HarnessError::MethodNotFound {
            method: "testVectorStrInOutReverse".to_string(),
            class_name: "MockedClass".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "The match public method testVectorStrInOutReverse in class MockedClass cannot be found"
        );
        assert_eq!(err.category(), ErrorCategory::Signature);
        assert_eq!(err.exit_code(), 1);

        let err = HarnessError::UnsupportedType {
            kind: "input".to_string(),
            type_name: "long".to_string(),
        };
        assert_eq!(err.to_string(), "input value type <long> is not accepted");
    }

    #[test]
    fn test_fixture_error_is_transparent() {
        let err: HarnessError = FixtureError::invalid_input("sleep time must be positive").into();
        assert_eq!(err.to_string(), "sleep time must be positive");
        assert_eq!(err.category(), ErrorCategory::Fixture);

        let err: HarnessError = FixtureError::VerificationFailed.into();
        assert_eq!(err.to_string(), "Error in method of verification");
    }

    #[test]
    fn test_memory_limit_mentions_process_footprint() {
        let err = HarnessError::MemoryLimitExceeded { limit_mb: 1 };
        assert_eq!(err.to_string(), "memory limit of 1 MB exceeded");
        assert!(err.recovery_suggestion().contains("whole harness process"));
    }
}
