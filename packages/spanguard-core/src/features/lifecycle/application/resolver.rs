/*
 * Requirement Resolver
 *
 * Decides which requirements apply where:
 * - per exit: finalizer under AllPaths; conditional requirements only at
 *   exits whose error slot is syntactically non-nil (unless widened to
 *   AllPaths by policy)
 * - per function: a function whose own signature matches the starter table
 *   is itself a creator/forwarder, not a consumer — nothing applies, the
 *   value escapes to the caller by design
 */

use crate::config::CheckConfig;
use crate::features::lifecycle::domain::{
    Requirement, RequirementPolicy, RequirementProfile, RequirementSet,
};
use crate::shared::models::FuncGraph;

/// Requirements that must be satisfied at an exit of the given kind
pub fn applicable_at_exit(profile: &RequirementProfile, is_error_exit: bool) -> RequirementSet {
    let mut set = RequirementSet::empty();
    for requirement in Requirement::ALL {
        match profile.policy(requirement) {
            RequirementPolicy::Disabled => {}
            RequirementPolicy::AllPaths => set.insert(requirement),
            RequirementPolicy::ErrorPathsOnly => {
                if is_error_exit {
                    set.insert(requirement);
                }
            }
        }
    }
    set
}

/// True when the enclosing function is itself a recognized starter
/// (its resolved signature matches the starter table, including user
/// "extra start types"), which exempts it from all requirements.
pub fn function_is_forwarder(func: &FuncGraph, config: &CheckConfig) -> bool {
    func.signature
        .as_ref()
        .map(|sig| config.starter_for(sig).is_some())
        .unwrap_or(false)
}
