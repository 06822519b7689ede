/*
 * Lifecycle Requirements
 *
 * A tracked value carries up to three requirements:
 * - Finalizer: mandatory end-of-lifetime call (span.End)
 * - StatusSetter: required on error-returning paths (span.SetStatus)
 * - ErrorRecorder: required on error-returning paths (span.RecordError)
 *
 * Policies widen or disable the conditional requirements per configuration.
 */

use serde::{Deserialize, Serialize};

/// One requirement of the paired-lifecycle contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Requirement {
    /// Mandatory end-of-lifetime call
    Finalizer,
    /// Status must be set on error paths
    StatusSetter,
    /// Error must be recorded on error paths
    ErrorRecorder,
}

impl Requirement {
    pub const ALL: [Requirement; 3] = [
        Requirement::Finalizer,
        Requirement::StatusSetter,
        Requirement::ErrorRecorder,
    ];
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Requirement::Finalizer => write!(f, "finalizer"),
            Requirement::StatusSetter => write!(f, "status-setter"),
            Requirement::ErrorRecorder => write!(f, "error-recorder"),
        }
    }
}

/// Where a requirement applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequirementPolicy {
    /// Never checked
    Disabled,
    /// Checked only at exits whose error slot is syntactically non-nil
    ErrorPathsOnly,
    /// Checked at every exit
    AllPaths,
}

/// Per-starter requirement profile
///
/// Maps each requirement kind to its policy for values created by one
/// starter signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementProfile {
    pub finalizer: RequirementPolicy,
    pub status_setter: RequirementPolicy,
    pub error_recorder: RequirementPolicy,
}

impl Default for RequirementProfile {
    fn default() -> Self {
        Self {
            finalizer: RequirementPolicy::AllPaths,
            status_setter: RequirementPolicy::ErrorPathsOnly,
            error_recorder: RequirementPolicy::ErrorPathsOnly,
        }
    }
}

impl RequirementProfile {
    pub fn policy(&self, requirement: Requirement) -> RequirementPolicy {
        match requirement {
            Requirement::Finalizer => self.finalizer,
            Requirement::StatusSetter => self.status_setter,
            Requirement::ErrorRecorder => self.error_recorder,
        }
    }

    /// Requirements not disabled under this profile
    pub fn active(&self) -> RequirementSet {
        let mut set = RequirementSet::empty();
        for requirement in Requirement::ALL {
            if self.policy(requirement) != RequirementPolicy::Disabled {
                set.insert(requirement);
            }
        }
        set
    }
}

/// Method-name vocabulary for one starter family
///
/// Binds requirement kinds to the concrete method names used both for
/// qualifying-call matching and for diagnostic text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodVocabulary {
    /// Resource noun used in messages when no variable is bound ("span")
    pub resource_name: String,
    pub finalizer: String,
    pub status_setter: String,
    pub error_recorder: String,
}

impl Default for MethodVocabulary {
    fn default() -> Self {
        Self {
            resource_name: "span".to_string(),
            finalizer: "End".to_string(),
            status_setter: "SetStatus".to_string(),
            error_recorder: "RecordError".to_string(),
        }
    }
}

impl MethodVocabulary {
    /// Method name for a requirement
    pub fn method(&self, requirement: Requirement) -> &str {
        match requirement {
            Requirement::Finalizer => &self.finalizer,
            Requirement::StatusSetter => &self.status_setter,
            Requirement::ErrorRecorder => &self.error_recorder,
        }
    }

    /// Requirement satisfied by a method name, if any
    pub fn requirement_for(&self, method: &str) -> Option<Requirement> {
        if method == self.finalizer {
            Some(Requirement::Finalizer)
        } else if method == self.status_setter {
            Some(Requirement::StatusSetter)
        } else if method == self.error_recorder {
            Some(Requirement::ErrorRecorder)
        } else {
            None
        }
    }
}

/// Compact requirement set (bit per kind)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RequirementSet(u8);

impl RequirementSet {
    const fn bit(requirement: Requirement) -> u8 {
        match requirement {
            Requirement::Finalizer => 0b001,
            Requirement::StatusSetter => 0b010,
            Requirement::ErrorRecorder => 0b100,
        }
    }

    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, requirement: Requirement) {
        self.0 |= Self::bit(requirement);
    }

    pub fn with(mut self, requirement: Requirement) -> Self {
        self.insert(requirement);
        self
    }

    pub fn contains(&self, requirement: Requirement) -> bool {
        self.0 & Self::bit(requirement) != 0
    }

    pub fn contains_all(&self, other: RequirementSet) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Requirement> + '_ {
        Requirement::ALL.into_iter().filter(|r| self.contains(*r))
    }
}
