//! CLI-specific error types and exit code mapping

use logweave_core::error::LogweaveError;
use logweave_parsers::ParsersError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The requested log type is not registered.
    #[error("unknown log type '{name}' (see `logweave types`)")]
    UnknownLogType { name: String },

    /// Some input lines could not be parsed.
    #[error("{failed} of {lines} lines failed to parse")]
    ParseFailures { failed: u64, lines: u64 },

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from logweave-core.
    #[error("{0}")]
    Core(#[from] LogweaveError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                              |
    /// |------|--------------------------------------|
    /// | 0    | Success                              |
    /// | 1    | General / command error              |
    /// | 2    | Configuration error                  |
    /// | 3    | Unknown log type                     |
    /// | 4    | One or more lines failed to parse    |
    /// | 10   | IO error                             |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(LogweaveError::Config(_)) => 2,
            Self::UnknownLogType { .. } => 3,
            Self::ParseFailures { .. } => 4,
            Self::Io(_) | Self::Core(LogweaveError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<ParsersError> for CliError {
    fn from(e: ParsersError) -> Self {
        Self::Core(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logweave_core::error::{ConfigError, RegistryError};

    #[test]
    fn test_exit_code_config_error() {
        let err = CliError::Config("test error".to_owned());
        assert_eq!(err.exit_code(), 2, "config error should return exit code 2");
    }

    #[test]
    fn test_exit_code_core_config_error() {
        let err: CliError = LogweaveError::Config(ConfigError::ParseFailed {
            reason: "bad toml".to_owned(),
        })
        .into();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_unknown_log_type() {
        let err = CliError::UnknownLogType {
            name: "Nginx.Access".to_owned(),
        };
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("Nginx.Access"));
    }

    #[test]
    fn test_exit_code_parse_failures() {
        let err = CliError::ParseFailures {
            failed: 2,
            lines: 10,
        };
        assert_eq!(err.exit_code(), 4);
        assert_eq!(err.to_string(), "2 of 10 lines failed to parse");
    }

    #[test]
    fn test_exit_code_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CliError::Io(io_err);
        assert_eq!(err.exit_code(), 10, "io error should return exit code 10");
    }

    #[test]
    fn test_exit_code_command_error() {
        let err = CliError::Command("test error".to_owned());
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "test error");
    }

    #[test]
    fn test_exit_code_registry_error_is_general() {
        let err: CliError = LogweaveError::Registry(RegistryError::MissingName).into();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_from_parsers_config_error() {
        let err: CliError = ParsersError::Config {
            field: "enabled_log_types".to_owned(),
            reason: "unknown log type 'X'".to_owned(),
        }
        .into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("enabled_log_types"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let cli_err: CliError = io_err.into();
        match cli_err {
            CliError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::PermissionDenied),
            _ => panic!("expected Io error variant"),
        }
    }
}
