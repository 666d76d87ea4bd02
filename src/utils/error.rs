use thiserror::Error;

#[derive(Error, Debug)]
pub enum DockrError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Module config parse error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to spawn module '{module}': {source}")]
    SpawnError {
        module: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No module config found at {path}")]
    ModuleNotFound { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Io,
    Process,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DockrError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DockrError::IoError(_) => ErrorCategory::Io,
            DockrError::SerializationError(_)
            | DockrError::ConfigError { .. }
            | DockrError::InvalidConfigValueError { .. }
            | DockrError::ModuleNotFound { .. } => ErrorCategory::Config,
            DockrError::SpawnError { .. } => ErrorCategory::Process,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DockrError::ModuleNotFound { .. } => ErrorSeverity::Medium,
            DockrError::SerializationError(_)
            | DockrError::ConfigError { .. }
            | DockrError::InvalidConfigValueError { .. }
            | DockrError::SpawnError { .. } => ErrorSeverity::High,
            DockrError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// Exit code used by the CLI for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DockrError::IoError(_) => {
                "Check that the path exists and that you have permission to read it".to_string()
            }
            DockrError::SerializationError(_) => {
                "Module configs need \"name\", \"cmd\" and \"args\" entries in valid JSON"
                    .to_string()
            }
            DockrError::ConfigError { .. } => "Fix the settings file and try again".to_string(),
            DockrError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}'", field)
            }
            DockrError::SpawnError { .. } => {
                "Make sure 'cmd' is executable and resolvable from the module directory"
                    .to_string()
            }
            DockrError::ModuleNotFound { .. } => {
                "Point at a module config file or a directory of module folders".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DockrError::SpawnError { module, .. } => {
                format!("Module '{}' could not be started", module)
            }
            DockrError::ModuleNotFound { path } => format!("No modules found under {}", path),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DockrError>;
