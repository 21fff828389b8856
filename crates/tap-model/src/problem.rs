//! Failure model shared by every pipeline step
//!
//! - [`Problem`]: a single failure with an optional cause and solution hints
//! - [`FailedOperation`]: user-facing aggregate of problems
//! - [`ConstraintViolation`]: field-level violation found by constraint checks
//!
//! Every fallible operation in the pipeline returns [`OperationResult`];
//! failures are values, never panics.

use indexmap::IndexSet;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Fallback hint appended to every error view shown to users
pub const PLATFORM_TEAM_SOLUTION: &str = "If the problem persists, contact the platform team";

/// Result of a pipeline step
pub type OperationResult<T> = Result<T, FailedOperation>;

/// Shared underlying error attached to a [`Problem`]
pub type ProblemCause = Arc<dyn StdError + Send + Sync + 'static>;

/// A single failure instance
#[derive(Clone)]
pub struct Problem {
    description: String,
    cause: Option<ProblemCause>,
    solutions: IndexSet<String>,
}

impl Problem {
    /// Create problem with just a description
    #[inline]
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            cause: None,
            solutions: IndexSet::new(),
        }
    }

    /// Create problem caused by `cause`
    #[must_use]
    pub fn with_cause<E>(description: impl Into<String>, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            cause: Some(Arc::new(cause)),
            solutions: IndexSet::new(),
        }
    }

    /// Attach solution hints (duplicates collapse)
    #[must_use]
    pub fn with_solutions<I, S>(mut self, solutions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.solutions.extend(solutions.into_iter().map(Into::into));
        self
    }

    /// Attach a single solution hint
    #[must_use]
    pub fn with_solution(self, solution: impl Into<String>) -> Self {
        self.with_solutions([solution.into()])
    }

    /// Problem describing a constraint violation as `"<path> <message>"`
    #[must_use]
    pub fn from_violation(violation: &ConstraintViolation) -> Self {
        Self::new(violation.to_string())
    }

    /// Problem description
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Underlying cause, if any
    #[inline]
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Solution hints in insertion order
    #[inline]
    #[must_use]
    pub fn solutions(&self) -> &IndexSet<String> {
        &self.solutions
    }

    /// `"<description>: <cause message>"` when a cause exists, else the description
    #[must_use]
    pub fn message(&self) -> String {
        match &self.cause {
            Some(cause) => format!("{}: {}", self.description, cause),
            None => self.description.clone(),
        }
    }
}

impl From<&ConstraintViolation> for Problem {
    fn from(violation: &ConstraintViolation) -> Self {
        Self::from_violation(violation)
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl fmt::Debug for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("description", &self.description)
            .field("cause", &self.cause.as_ref().map(ToString::to_string))
            .field("solutions", &self.solutions)
            .finish()
    }
}

impl PartialEq for Problem {
    fn eq(&self, other: &Self) -> bool {
        self.description == other.description
            && self.cause.as_ref().map(ToString::to_string)
                == other.cause.as_ref().map(ToString::to_string)
            && self.solutions == other.solutions
    }
}

/// User-facing failure of a pipeline step
///
/// Carries a human message, optionally the offending input rendered as text
/// and the path of the offending field, plus one or more [`Problem`]s.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct FailedOperation {
    message: String,
    input: Option<String>,
    input_error_field: Option<String>,
    problems: Vec<Problem>,
}

impl FailedOperation {
    /// Create failure from a message and its problems
    ///
    /// An empty problem list is replaced by a single problem echoing the
    /// message so that every failure has at least one problem.
    #[must_use]
    pub fn new(message: impl Into<String>, problems: Vec<Problem>) -> Self {
        let message = message.into();
        let problems = if problems.is_empty() {
            vec![Problem::new(message.clone())]
        } else {
            problems
        };
        Self {
            message,
            input: None,
            input_error_field: None,
            problems,
        }
    }

    /// Create failure with a single problem
    #[inline]
    #[must_use]
    pub fn single(message: impl Into<String>, problem: Problem) -> Self {
        Self::new(message, vec![problem])
    }

    /// Create failure whose only problem repeats the message
    #[inline]
    #[must_use]
    pub fn simple(message: impl Into<String>) -> Self {
        Self::new(message, Vec::new())
    }

    /// Create failure from constraint violations
    ///
    /// Each violation becomes a `"<path> <message>"` problem. A single
    /// violation also sets the offending field path.
    #[must_use]
    pub fn from_violations(message: impl Into<String>, violations: &[ConstraintViolation]) -> Self {
        let failed = Self::new(message, violations.iter().map(Problem::from).collect());
        match violations {
            [only] => failed.with_input_error_field(only.path()),
            _ => failed,
        }
    }

    /// Attach the offending input rendered as text
    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Attach the path of the offending field
    #[must_use]
    pub fn with_input_error_field(mut self, field: impl Into<String>) -> Self {
        self.input_error_field = Some(field.into());
        self
    }

    /// Human message
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Offending input, if attached
    #[inline]
    #[must_use]
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    /// Offending field path, if attached
    #[inline]
    #[must_use]
    pub fn input_error_field(&self) -> Option<&str> {
        self.input_error_field.as_deref()
    }

    /// Problems (never empty)
    #[inline]
    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Message followed by every problem message
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        std::iter::once(self.message.clone())
            .chain(self.problems.iter().map(Problem::message))
            .collect()
    }
}

/// A field-level constraint violation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstraintViolation {
    path: String,
    message: String,
}

impl ConstraintViolation {
    /// Create violation for the field at `path`
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Violation for a required field that is absent or null
    #[inline]
    #[must_use]
    pub fn missing(path: impl Into<String>) -> Self {
        Self::new(path, "must not be null")
    }

    /// Same violation relocated under `prefix`
    #[must_use]
    pub fn nested_under(self, prefix: &str) -> Self {
        let path = if self.path.is_empty() {
            prefix.to_string()
        } else {
            format!("{prefix}.{}", self.path)
        };
        Self { path, ..self }
    }

    /// Path of the offending field
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Violation message
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path, self.message)
    }
}
