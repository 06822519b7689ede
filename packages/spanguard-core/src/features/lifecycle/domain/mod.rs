/*
 * Lifecycle Domain Models
 *
 * Core types for the paired-lifecycle contract.
 */

mod finding;
mod requirement;
mod tracked;

pub use finding::{Finding, FindingRole, Severity};
pub use requirement::{
    MethodVocabulary, Requirement, RequirementPolicy, RequirementProfile, RequirementSet,
};
pub use tracked::TrackedValue;
