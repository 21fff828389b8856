//! Response views returned to callers
//!
//! - [`ValidationResult`], [`ProvisioningStatus`], [`ReverseProvisioningStatus`]:
//!   success views built from operation statuses
//! - [`RequestValidationError`], [`SystemError`]: error views built from
//!   failures; both always offer the platform team fallback solution

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error as StdError;
use tap_model::{
    ConstraintViolation, FailedOperation, Log, OperationStatus, ProvisionOperationStatus,
    ReverseProvisionOperationStatus, ValidationInfo, PLATFORM_TEAM_SOLUTION,
};

/// Default user message of a [`RequestValidationError`]
pub const VALIDATION_USER_MESSAGE: &str =
    "Validation on the received descriptor failed, check the error details for more information";

/// Default user message of a [`SystemError`]
pub const SYSTEM_ERROR_USER_MESSAGE: &str = "An unexpected error occurred while processing the request. Check the error details for more information";

const SCHEMA_COMPLIANCE_SOLUTION: &str = "Check the input descriptor is compliant with the schema expected by this Data Catalog Plugin and try again";

/// Outcome of a validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the request is valid
    pub valid: bool,
    /// Error messages, empty when valid
    pub errors: Vec<String>,
}

impl From<ValidationInfo> for ValidationResult {
    fn from(info: ValidationInfo) -> Self {
        Self {
            valid: info.valid,
            errors: info.errors,
        }
    }
}

/// Lifecycle status as shown to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// Still in progress
    Running,
    /// Finished successfully
    Completed,
    /// Finished with an error
    Failed,
}

impl From<OperationStatus> for ResponseStatus {
    fn from(status: OperationStatus) -> Self {
        match status {
            OperationStatus::Waiting | OperationStatus::Running => Self::Running,
            OperationStatus::Completed => Self::Completed,
            OperationStatus::Failed => Self::Failed,
        }
    }
}

/// Result of provision, unprovision or access control update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningStatus {
    /// Lifecycle status
    pub status: ResponseStatus,
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

impl From<ProvisionOperationStatus> for ProvisioningStatus {
    fn from(status: ProvisionOperationStatus) -> Self {
        let info = status.info.unwrap_or_default();
        Self {
            status: status.status.into(),
            public_info: info.public_info,
            private_info: info.private_info,
            logs: info.logs,
        }
    }
}

/// Result of reverse provisioning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseProvisioningStatus {
    /// Lifecycle status
    pub status: ResponseStatus,
    /// Updates to apply to the component descriptor
    pub updates: Value,
    /// Handler logs
    #[serde(default)]
    pub logs: Vec<Log>,
}

impl From<ReverseProvisionOperationStatus> for ReverseProvisioningStatus {
    fn from(status: ReverseProvisionOperationStatus) -> Self {
        let info = status.info.unwrap_or_default();
        Self {
            status: status.status.into(),
            updates: info.updates.unwrap_or_else(|| Value::Object(Map::new())),
            logs: info.logs,
        }
    }
}

/// Problems and solutions behind an error view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMoreInfo {
    /// Problem messages
    pub problems: Vec<String>,
    /// Solution hints, platform team fallback included
    pub solutions: Vec<String>,
}

/// Error view for requests rejected by the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestValidationError {
    /// Problem messages
    pub errors: Vec<String>,
    /// Message shown to users
    pub user_message: String,
    /// Offending input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Offending field path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_error_field: Option<String>,
    /// Problems and solutions
    pub more_info: ErrorMoreInfo,
}

impl RequestValidationError {
    /// View of `failed`
    #[must_use]
    pub fn from_failed_operation(failed: &FailedOperation) -> Self {
        let problems: Vec<String> = failed.problems().iter().map(|p| p.message()).collect();
        let solutions = with_platform_solution(
            failed
                .problems()
                .iter()
                .flat_map(|p| p.solutions().iter().cloned()),
        );
        Self {
            errors: problems.clone(),
            user_message: failed.message().to_string(),
            input: failed.input().map(str::to_string),
            input_error_field: failed.input_error_field().map(str::to_string),
            more_info: ErrorMoreInfo { problems, solutions },
        }
    }

    /// View of constraint violations
    #[must_use]
    pub fn from_violations(violations: &[ConstraintViolation]) -> Self {
        let problems: Vec<String> = violations.iter().map(ToString::to_string).collect();
        let input_error_field = match violations {
            [only] => Some(only.path().to_string()),
            _ => None,
        };
        Self {
            errors: problems.clone(),
            user_message: VALIDATION_USER_MESSAGE.to_string(),
            input: None,
            input_error_field,
            more_info: ErrorMoreInfo {
                problems,
                solutions: with_platform_solution([SCHEMA_COMPLIANCE_SOLUTION.to_string()]),
            },
        }
    }

    /// Replace the user message
    #[must_use]
    pub fn with_user_message(mut self, message: impl Into<String>) -> Self {
        self.user_message = message.into();
        self
    }
}

impl From<&FailedOperation> for RequestValidationError {
    fn from(failed: &FailedOperation) -> Self {
        Self::from_failed_operation(failed)
    }
}

/// Error view for unexpected failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemError {
    /// Error message
    pub error: String,
    /// Message shown to users
    pub user_message: String,
    /// Problems and solutions
    pub more_info: ErrorMoreInfo,
}

impl SystemError {
    /// View of an unexpected error
    #[must_use]
    pub fn from_error(error: &(dyn StdError + 'static)) -> Self {
        let mut problems = vec![error.to_string()];
        let mut source = error.source();
        while let Some(cause) = source {
            problems.push(cause.to_string());
            source = cause.source();
        }
        Self {
            error: error.to_string(),
            user_message: SYSTEM_ERROR_USER_MESSAGE.to_string(),
            more_info: ErrorMoreInfo {
                problems,
                solutions: vec![PLATFORM_TEAM_SOLUTION.to_string()],
            },
        }
    }

    /// Replace the user message
    #[must_use]
    pub fn with_user_message(mut self, message: impl Into<String>) -> Self {
        self.user_message = message.into();
        self
    }
}

fn with_platform_solution(solutions: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut all: IndexSet<String> = solutions.into_iter().collect();
    all.insert(PLATFORM_TEAM_SOLUTION.to_string());
    all.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io;
    use tap_model::{OperationType, Problem, ProvisionInfo, ReverseProvisionInfo};

    #[test]
    fn failed_operation_view_carries_everything() {
        let failed = FailedOperation::new(
            "bad input",
            vec![
                Problem::new("a").with_solution("fix a"),
                Problem::with_cause("b", io::Error::other("c")).with_solution("fix a"),
            ],
        )
        .with_input("{}")
        .with_input_error_field("dataProduct.components");
        let view = RequestValidationError::from_failed_operation(&failed);
        assert_eq!(view.errors, vec!["a", "b: c"]);
        assert_eq!(view.user_message, "bad input");
        assert_eq!(view.input.as_deref(), Some("{}"));
        assert_eq!(view.input_error_field.as_deref(), Some("dataProduct.components"));
        assert_eq!(view.more_info.solutions, vec!["fix a", PLATFORM_TEAM_SOLUTION]);
    }

    #[test]
    fn platform_solution_appears_once() {
        let failed = FailedOperation::new(
            "x",
            vec![
                Problem::new("a").with_solution(PLATFORM_TEAM_SOLUTION),
                Problem::new("b").with_solution(PLATFORM_TEAM_SOLUTION),
            ],
        );
        let view = RequestValidationError::from(&failed);
        assert_eq!(view.more_info.solutions, vec![PLATFORM_TEAM_SOLUTION]);
    }

    #[test]
    fn violations_view() {
        let view = RequestValidationError::from_violations(&[ConstraintViolation::missing("id")]);
        assert_eq!(view.errors, vec!["id must not be null"]);
        assert_eq!(view.input_error_field.as_deref(), Some("id"));
        assert_eq!(view.user_message, VALIDATION_USER_MESSAGE);
        assert_eq!(view.more_info.solutions, vec![SCHEMA_COMPLIANCE_SOLUTION, PLATFORM_TEAM_SOLUTION]);
    }

    #[test]
    fn system_error_view() {
        let view = SystemError::from_error(&io::Error::other("disk on fire"));
        assert_eq!(view.error, "disk on fire");
        assert_eq!(view.user_message, SYSTEM_ERROR_USER_MESSAGE);
        assert_eq!(view.more_info.solutions, vec![PLATFORM_TEAM_SOLUTION]);
    }

    #[test]
    fn waiting_and_running_map_to_running() {
        assert_eq!(ResponseStatus::from(OperationStatus::Waiting), ResponseStatus::Running);
        assert_eq!(ResponseStatus::from(OperationStatus::Running), ResponseStatus::Running);
        assert_eq!(ResponseStatus::from(OperationStatus::Failed), ResponseStatus::Failed);
    }

    #[test]
    fn provisioning_status_flattens_info() {
        let status = ProvisionOperationStatus::completed(
            OperationType::Provision,
            ProvisionInfo::default().with_private_info(json!({"arn": "x"})),
        );
        let view = ProvisioningStatus::from(status);
        let tree = serde_json::to_value(&view).unwrap();
        assert_eq!(tree, json!({"status": "completed", "privateInfo": {"arn": "x"}, "logs": []}));
    }

    #[test]
    fn reverse_status_defaults_updates() {
        let status = ReverseProvisionOperationStatus::completed(ReverseProvisionInfo::default());
        let view = ReverseProvisioningStatus::from(status);
        assert_eq!(view.updates, json!({}));
        assert_eq!(view.status, ResponseStatus::Completed);
    }
}
