//! Operation results produced by validators and provisioners

use crate::kind::OperationType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity of a [`Log`] entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Debug
    Debug,
    /// Info
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
}

/// Timestamped message reported by a handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// When the entry was recorded
    pub timestamp: DateTime<Utc>,
    /// Severity
    pub level: LogLevel,
    /// Message
    pub message: String,
    /// Phase of the operation this entry belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
}

impl Log {
    /// Entry recorded now
    #[must_use]
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            phase: None,
        }
    }

    /// Info entry recorded now
    #[inline]
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    /// Error entry recorded now
    #[inline]
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    /// Set the phase
    #[must_use]
    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }
}

/// Result of a provision, unprovision or access control update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionInfo {
    /// Information shown to users
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_info: Option<Value>,
    /// Information kept by the platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_info: Option<Value>,
    /// Handler logs
    #[serde(default)]
    pub logs: Vec<Log>,
}

impl ProvisionInfo {
    /// Info with a public section
    #[must_use]
    pub fn with_public_info(mut self, info: Value) -> Self {
        self.public_info = Some(info);
        self
    }

    /// Info with a private section
    #[must_use]
    pub fn with_private_info(mut self, info: Value) -> Self {
        self.private_info = Some(info);
        self
    }

    /// Append a log entry
    #[must_use]
    pub fn with_log(mut self, log: Log) -> Self {
        self.logs.push(log);
        self
    }
}

/// Result of a reverse provisioning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseProvisionInfo {
    /// Updates to apply to the component descriptor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updates: Option<Value>,
    /// Handler logs
    #[serde(default)]
    pub logs: Vec<Log>,
}

impl ReverseProvisionInfo {
    /// Info carrying `updates`
    #[must_use]
    pub fn new(updates: Value) -> Self {
        Self {
            updates: Some(updates),
            logs: Vec::new(),
        }
    }

    /// Append a log entry
    #[must_use]
    pub fn with_log(mut self, log: Log) -> Self {
        self.logs.push(log);
        self
    }
}

/// Lifecycle status of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    /// Accepted, not started
    Waiting,
    /// In progress
    Running,
    /// Finished successfully
    Completed,
    /// Finished with an error
    Failed,
}

/// Status of a provision, unprovision or access control update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionOperationStatus {
    /// Lifecycle status
    pub status: OperationStatus,
    /// Operation this status refers to
    pub operation_type: OperationType,
    /// Handler result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<ProvisionInfo>,
}

impl ProvisionOperationStatus {
    /// Completed status carrying `info`
    #[must_use]
    pub fn completed(operation_type: OperationType, info: ProvisionInfo) -> Self {
        Self {
            status: OperationStatus::Completed,
            operation_type,
            info: Some(info),
        }
    }
}

/// Status of a reverse provisioning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseProvisionOperationStatus {
    /// Lifecycle status
    pub status: OperationStatus,
    /// Handler result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<ReverseProvisionInfo>,
}

impl ReverseProvisionOperationStatus {
    /// Completed status carrying `info`
    #[must_use]
    pub fn completed(info: ReverseProvisionInfo) -> Self {
        Self {
            status: OperationStatus::Completed,
            info: Some(info),
        }
    }
}

/// Outcome of a validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationInfo {
    /// Whether the request is valid
    pub valid: bool,
    /// Error messages, empty when valid
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ValidationInfo {
    /// Valid outcome
    #[inline]
    #[must_use]
    pub fn valid() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Invalid outcome listing `errors`
    #[inline]
    #[must_use]
    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }
}
