/*
 * Findings
 *
 * Pure-data diagnostics. Presentation (formatting, exit codes, filtering)
 * belongs to the external reporter consuming the findings stream.
 *
 * Message discipline, per requirement kind:
 * - summary (creation site):  "<var>.<method> is not called on all paths"
 *   with ", possible memory leak" appended for the finalizer
 * - detail (violating exit):  "return can be reached without calling
 *   <var>.<method>"
 * - unassigned creation:      "<resource> is unassigned, probable memory leak"
 */

use super::requirement::{MethodVocabulary, Requirement};
use crate::shared::models::SourceSpan;
use serde::{Deserialize, Serialize};

/// Finding role: one summary per (value, requirement), one detail per
/// violating exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FindingRole {
    Summary,
    Detail,
}

/// Finding severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// One diagnostic record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Enclosing function name
    pub function: String,
    /// Anchor position (creation statement or violating exit)
    pub location: SourceSpan,
    /// Variable (or resource noun) the finding is about
    pub variable: String,
    /// Requirement that went unsatisfied
    pub requirement: Requirement,
    pub role: FindingRole,
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
}

impl Finding {
    /// Summary finding anchored at the creation statement
    pub fn summary(
        function: impl Into<String>,
        location: SourceSpan,
        variable: &str,
        requirement: Requirement,
        vocabulary: &MethodVocabulary,
    ) -> Self {
        let method = vocabulary.method(requirement);
        let message = match requirement {
            Requirement::Finalizer => format!(
                "{}.{} is not called on all paths, possible memory leak",
                variable, method
            ),
            _ => format!("{}.{} is not called on all paths", variable, method),
        };
        Self {
            function: function.into(),
            location,
            variable: variable.to_string(),
            requirement,
            role: FindingRole::Summary,
            severity: Severity::Warning,
            message,
        }
    }

    /// Detail finding anchored at a violating exit statement
    pub fn detail(
        function: impl Into<String>,
        location: SourceSpan,
        variable: &str,
        requirement: Requirement,
        vocabulary: &MethodVocabulary,
    ) -> Self {
        let method = vocabulary.method(requirement);
        Self {
            function: function.into(),
            location,
            variable: variable.to_string(),
            requirement,
            role: FindingRole::Detail,
            severity: Severity::Warning,
            message: format!(
                "return can be reached without calling {}.{}",
                variable, method
            ),
        }
    }

    /// Unconditional finding for a creation whose result is discarded
    pub fn unassigned(
        function: impl Into<String>,
        location: SourceSpan,
        vocabulary: &MethodVocabulary,
    ) -> Self {
        let resource = vocabulary.resource_name.clone();
        let message = format!("{} is unassigned, probable memory leak", resource);
        Self {
            function: function.into(),
            location,
            variable: resource,
            requirement: Requirement::Finalizer,
            role: FindingRole::Summary,
            severity: Severity::Warning,
            message,
        }
    }

    /// Stable ordering key for deterministic output
    pub fn sort_key(&self) -> (String, SourceSpan, Requirement, FindingRole, String) {
        (
            self.function.clone(),
            self.location,
            self.requirement,
            self.role,
            self.variable.clone(),
        )
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.function, self.location, self.message)
    }
}
