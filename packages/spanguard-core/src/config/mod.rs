/*
 * Checker Configuration
 *
 * Process-wide, read-only tables loaded once before analysis:
 * - starter signatures (creation sites) with their requirement profiles
 * - ownership-transfer signatures (calls that take over finalization)
 * - the err-correlation mode for deferred closures
 *
 * Compiled patterns are shared freely across concurrent per-function
 * analyses; nothing here mutates during traversal. Pattern compilation and
 * conflict validation happen up front so a caller mistake aborts the run
 * before any function is analyzed.
 */

use crate::errors::{Result, SpanguardError};
use crate::features::lifecycle::domain::{MethodVocabulary, RequirementProfile};
use crate::shared::models::CallSig;
use regex::Regex;

/// Compiled signature pattern, matched against the fully-qualified
/// `package.Type.method` form
#[derive(Debug, Clone)]
pub struct SigPattern {
    raw: String,
    regex: Regex,
}

impl SigPattern {
    pub fn compile(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let regex = Regex::new(&raw)
            .map_err(|e| SpanguardError::config(format!("invalid signature pattern '{raw}': {e}")))?;
        Ok(Self { raw, regex })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, sig: &CallSig) -> bool {
        self.regex.is_match(&sig.fq())
    }
}

/// One starter-table entry: pattern plus requirement profile
#[derive(Debug, Clone)]
pub struct StarterSignature {
    /// Family label, e.g. "otel" or "opencensus"
    pub name: String,
    pub pattern: SigPattern,
    /// Result slot that holds the tracked value; `None` = last slot,
    /// which covers both `ctx, span := ...` and `span := ...` shapes
    pub tracked_slot: Option<usize>,
    pub profile: RequirementProfile,
    pub vocabulary: MethodVocabulary,
}

impl StarterSignature {
    pub fn new(name: impl Into<String>, pattern: SigPattern) -> Self {
        Self {
            name: name.into(),
            pattern,
            tracked_slot: None,
            profile: RequirementProfile::default(),
            vocabulary: MethodVocabulary::default(),
        }
    }

    pub fn with_tracked_slot(mut self, slot: usize) -> Self {
        self.tracked_slot = Some(slot);
        self
    }

    pub fn with_profile(mut self, profile: RequirementProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: MethodVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }
}

/// How branch conditions inside deferred closures are correlated with
/// error-returning exits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrCorrelation {
    /// Correlate `if err != nil` on the named error return (syntactic,
    /// documented approximation)
    #[default]
    NamedErrorReturn,
    /// Treat every condition as opaque
    Disabled,
}

/// Full checker configuration
#[derive(Debug, Clone, Default)]
pub struct CheckConfig {
    /// Starter signature table (built-in plus user "extra start types")
    pub starters: Vec<StarterSignature>,
    /// Ownership-transfer signature table
    pub transfers: Vec<SigPattern>,
    pub err_correlation: ErrCorrelation,
}

impl CheckConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_starter(mut self, starter: StarterSignature) -> Self {
        self.starters.push(starter);
        self
    }

    /// Register a user-declared extra start signature with the default
    /// profile and vocabulary
    pub fn add_extra_start(&mut self, pattern: &str) -> Result<()> {
        let compiled = SigPattern::compile(pattern)?;
        self.starters.push(StarterSignature::new("extra", compiled));
        Ok(())
    }

    pub fn add_transfer(&mut self, pattern: &str) -> Result<()> {
        self.transfers.push(SigPattern::compile(pattern)?);
        Ok(())
    }

    /// First starter entry matching a resolved signature
    pub fn starter_for(&self, sig: &CallSig) -> Option<&StarterSignature> {
        self.starters.iter().find(|s| s.pattern.matches(sig))
    }

    /// True when passing a value to this call transfers ownership
    pub fn is_transfer(&self, sig: &CallSig) -> bool {
        self.transfers.iter().any(|p| p.matches(sig))
    }

    /// Reject conflicting starter entries (same raw pattern mapped to
    /// different profiles). Called once at load time; a failure aborts the
    /// whole run.
    pub fn validate(&self) -> Result<()> {
        for (i, a) in self.starters.iter().enumerate() {
            for b in &self.starters[i + 1..] {
                if a.pattern.raw() == b.pattern.raw() && a.profile != b.profile {
                    return Err(SpanguardError::config(format!(
                        "starter pattern '{}' declared twice with conflicting profiles",
                        a.pattern.raw()
                    )));
                }
            }
        }
        for starter in &self.starters {
            if starter.vocabulary.finalizer.is_empty() {
                return Err(SpanguardError::config(format!(
                    "starter '{}' has an empty finalizer method name",
                    starter.name
                )));
            }
        }
        Ok(())
    }
}
