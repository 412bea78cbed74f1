//! Configuration error types.

/// A startup setting that could not be loaded or does not validate.
///
/// `setting` is the dotted key of the offending value (`database.mode`,
/// `server.bind`, ...) when one can be named; a file that fails to parse as a
/// whole has none. These errors are fatal at startup and never surface per
/// request.
#[derive(Debug, Clone, derive_more::Error)]
pub struct ConfigError {
    /// Dotted key of the offending setting
    pub setting: Option<String>,
    /// What is wrong with it
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Error not tied to a single setting.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabula_error::ConfigError;
    ///
    /// let err = ConfigError::new("Failed to parse configuration: expected a table");
    /// assert!(err.setting.is_none());
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::located(None, message.into())
    }

    /// Error in the value of `setting`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabula_error::ConfigError;
    ///
    /// let err = ConfigError::for_setting("database.mode", "unknown mode 'sqlserver'");
    /// assert_eq!(err.setting.as_deref(), Some("database.mode"));
    /// assert!(err.to_string().starts_with("Configuration Error: database.mode: unknown mode"));
    /// ```
    #[track_caller]
    pub fn for_setting(setting: impl Into<String>, message: impl Into<String>) -> Self {
        Self::located(Some(setting.into()), message.into())
    }

    #[track_caller]
    fn located(setting: Option<String>, message: String) -> Self {
        let location = std::panic::Location::caller();
        Self {
            setting,
            message,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration Error: ")?;
        if let Some(setting) = &self.setting {
            write!(f, "{}: ", setting)?;
        }
        write!(f, "{} at line {} in {}", self.message, self.line, self.file)
    }
}
