/*
 * Creation-Site Detector
 *
 * Scans one function's statements for calls matching the starter table and
 * emits a TrackedValue per match, bound to the statement's result targets.
 * Read-only over the CFG.
 *
 * A creation whose tracked result slot is `_` (or missing entirely) is
 * marked unassigned: the value is unreachable for later finalization and
 * the reporter turns it into an unconditional violation.
 */

use crate::config::CheckConfig;
use crate::features::lifecycle::domain::TrackedValue;
use crate::shared::models::{BindTarget, FuncGraph, StmtKind};

/// Detect all tracked values created in `func`
///
/// Nested closures are separate analysis units delivered by the supplier;
/// only the function's own blocks are scanned here.
pub fn detect_creation_sites(func: &FuncGraph, config: &CheckConfig) -> Vec<TrackedValue> {
    let mut tracked = Vec::new();

    for block in &func.blocks {
        for (stmt_index, stmt) in block.statements.iter().enumerate() {
            let StmtKind::Call { call, targets } = &stmt.kind else {
                continue;
            };
            let Some(starter) = config.starter_for(&call.sig) else {
                continue;
            };

            let mut value = TrackedValue::new(
                block.id.clone(),
                stmt_index,
                stmt.span,
                starter.profile,
                starter.vocabulary.clone(),
            );
            if let Some(scope) = stmt.binding_scope {
                value = value.with_scope(scope);
            }

            let slot = starter
                .tracked_slot
                .unwrap_or_else(|| targets.len().saturating_sub(1));
            let value = match targets.get(slot) {
                Some(BindTarget::Var(name)) => value.with_alias(name.clone()),
                Some(BindTarget::Ignored) | None => value.unassigned(),
            };

            tracked.push(value);
        }
    }

    tracked
}
