//! Exit codes for the CLI.
//!
//! Each failure mode gets its own code so scripts and CI systems can tell
//! them apart.

use graphql_persist_engine::EngineError;
use graphql_persist_extract::ExtractError;

/// Exit codes used by the CLI.
///
/// 0 is success; 3 is not used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Manifest written
    Success = 0,
    /// Two or more definitions share an operation name
    DuplicateNames = 1,
    /// Missing or invalid config file, or invalid flags
    ConfigError = 2,
    /// File read/write failure
    IoError = 4,
    /// Invalid GraphQL or script syntax
    ParseError = 5,
}

impl ExitCode {
    /// Exit the process with this exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }

    /// Get the numeric value of this exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl From<&EngineError> for ExitCode {
    fn from(error: &EngineError) -> Self {
        match error {
            EngineError::DuplicateOperationNames(_) => Self::DuplicateNames,
            EngineError::InvalidExcludePattern { .. } => Self::ConfigError,
            EngineError::Syntax(_) | EngineError::Extract(ExtractError::Script { .. }) => {
                Self::ParseError
            }
            EngineError::Io { .. }
            | EngineError::Walk { .. }
            | EngineError::Extract(ExtractError::Io { .. })
            | EngineError::Manifest(_) => Self::IoError,
        }
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::DuplicateNames => write!(f, "duplicate operation names"),
            Self::ConfigError => write!(f, "configuration error"),
            Self::IoError => write!(f, "I/O error"),
            Self::ParseError => write!(f, "parse error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_codes() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::DuplicateNames.code(), 1);
        assert_eq!(ExitCode::ConfigError.code(), 2);
        assert_eq!(ExitCode::IoError.code(), 4);
        assert_eq!(ExitCode::ParseError.code(), 5);
    }

    #[test]
    fn test_engine_error_mapping() {
        let duplicates = EngineError::DuplicateOperationNames(vec!["A".into()]);
        assert_eq!(ExitCode::from(&duplicates), ExitCode::DuplicateNames);

        let syntax = EngineError::Syntax("unexpected end of input".into());
        assert_eq!(ExitCode::from(&syntax), ExitCode::ParseError);

        let script = EngineError::Extract(ExtractError::Script {
            message: "Expected ident".into(),
            offset: 6,
        });
        assert_eq!(ExitCode::from(&script), ExitCode::ParseError);

        let io = EngineError::Io {
            path: PathBuf::from("queries.graphql"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(ExitCode::from(&io), ExitCode::IoError);
    }
}
