//! Id generation for newly created todos.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::error::TodoError;

/// How the server assigns ids to new todos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdScheme {
    /// Random v4 UUID.
    #[default]
    Uuid,
    /// Wall-clock milliseconds since the Unix epoch, as a decimal string.
    /// Two todos created within the same millisecond get the same id.
    Timestamp,
}

impl IdScheme {
    /// Generate a fresh id.
    pub fn generate(self) -> String {
        match self {
            Self::Uuid => Uuid::new_v4().to_string(),
            Self::Timestamp => chrono::Utc::now().timestamp_millis().to_string(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::Timestamp => "timestamp",
        }
    }
}

impl FromStr for IdScheme {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uuid" => Ok(Self::Uuid),
            "timestamp" => Ok(Self::Timestamp),
            other => Err(TodoError::UnknownIdScheme(other.to_string())),
        }
    }
}

impl fmt::Display for IdScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
