/*
 * Tracked Values
 *
 * A tracked value is one creation-site match: identity is the (block,
 * statement index) of the creation call. The alias set recorded here is
 * the binding at creation; traversal clones and mutates it per path.
 */

use super::requirement::{MethodVocabulary, RequirementProfile};
use crate::shared::models::SourceSpan;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// One value whose lifecycle must be checked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedValue {
    /// Block containing the creation statement
    pub block_id: String,
    /// Index of the creation statement within that block
    pub stmt_index: usize,
    /// Source position of the creation statement
    pub origin: SourceSpan,
    /// Requirement profile declared by the matching starter signature
    pub profile: RequirementProfile,
    /// Method vocabulary of the matching starter family
    pub vocabulary: MethodVocabulary,
    /// Variables aliasing the value at creation
    pub aliases: FxHashSet<String>,
    /// Result slot was discarded (`_`) or absent — the value can never be
    /// finalized
    pub unassigned: bool,
    /// Extent of the binding's declaring scope; exits outside it are never
    /// anchors for this value. `None` = function-wide.
    pub scope: Option<SourceSpan>,
}

impl TrackedValue {
    pub fn new(
        block_id: impl Into<String>,
        stmt_index: usize,
        origin: SourceSpan,
        profile: RequirementProfile,
        vocabulary: MethodVocabulary,
    ) -> Self {
        Self {
            block_id: block_id.into(),
            stmt_index,
            origin,
            profile,
            vocabulary,
            aliases: FxHashSet::default(),
            unassigned: false,
            scope: None,
        }
    }

    pub fn with_alias(mut self, variable: impl Into<String>) -> Self {
        self.aliases.insert(variable.into());
        self
    }

    pub fn with_scope(mut self, scope: SourceSpan) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn unassigned(mut self) -> Self {
        self.unassigned = true;
        self
    }

    /// Display name used in diagnostics: the bound variable, or the
    /// vocabulary's resource noun when nothing is bound
    pub fn display_name(&self) -> &str {
        self.aliases
            .iter()
            .min_by_key(|v| v.as_str())
            .map(|v| v.as_str())
            .unwrap_or(&self.vocabulary.resource_name)
    }
}
