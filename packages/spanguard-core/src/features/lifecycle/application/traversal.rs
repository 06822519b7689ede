/*
 * Path Traversal Engine
 *
 * Depth-first exploration of every path from one creation site to every
 * reachable exit point. State carried per path: satisfied requirements,
 * alias bindings, armed deferred effects, per-block visit counts.
 *
 * Termination on cyclic flow is by bounded revisit, not fixed-point
 * iteration: a block is re-entered at most once per path while
 * requirements remain unsatisfied, so a qualifying call inside a loop body
 * is seen, but a call appearing only on a second iteration may be missed.
 * Accepted approximation, traded for guaranteed termination.
 *
 * Exits are deduplicated: one record per (exit statement, requirement)
 * regardless of how many paths reach it. Exits lying outside the creation
 * binding's declaring scope are skipped entirely: the variable does not
 * exist there, so nothing can be demanded of it.
 */

use super::bindings::BindingState;
use super::deferred::{DeferCoverage, DeferEffects};
use super::resolver::applicable_at_exit;
use crate::config::CheckConfig;
use crate::features::lifecycle::domain::{
    Requirement, RequirementPolicy, RequirementSet, TrackedValue,
};
use crate::shared::models::{Block, FuncGraph, SourceSpan, StmtKind};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::warn;

/// Maximum entries into one block along a single path
const MAX_BLOCK_VISITS: u8 = 2;

/// One unsatisfied requirement at one exit statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitViolation {
    pub requirement: Requirement,
    pub block_id: String,
    /// Index of the exit statement; `statements.len()` for an implicit
    /// fall-through exit
    pub stmt_index: usize,
    pub location: SourceSpan,
}

/// Traversal result for one tracked value
#[derive(Debug, Default)]
pub struct TraversalOutcome {
    pub violations: Vec<ExitViolation>,
    pub paths_explored: usize,
}

/// A deferred effect armed on the current path
#[derive(Debug, Clone)]
struct ArmedEffect {
    variable: String,
    requirement: Requirement,
    coverage: DeferCoverage,
}

#[derive(Debug, Clone)]
struct PathState {
    satisfied: RequirementSet,
    bindings: BindingState,
    armed: Vec<ArmedEffect>,
    visits: FxHashMap<String, u8>,
}

struct Traversal<'a> {
    func: &'a FuncGraph,
    value: &'a TrackedValue,
    effects: &'a DeferEffects,
    config: &'a CheckConfig,
    blocks: FxHashMap<&'a str, &'a Block>,
    seen_exits: FxHashSet<(String, usize, Requirement)>,
    outcome: TraversalOutcome,
    /// Requirements that could ever be demanded for this value
    active: RequirementSet,
}

/// Explore all paths for one tracked value
pub fn traverse(
    func: &FuncGraph,
    value: &TrackedValue,
    effects: &DeferEffects,
    config: &CheckConfig,
) -> TraversalOutcome {
    let blocks: FxHashMap<&str, &Block> =
        func.blocks.iter().map(|b| (b.id.as_str(), b)).collect();
    let Some(origin) = blocks.get(value.block_id.as_str()).copied() else {
        warn!(
            function = %func.name,
            block = %value.block_id,
            "creation block missing from graph, value not checked"
        );
        return TraversalOutcome::default();
    };

    let active = if value.unassigned {
        // An unassigned value can never be finalized; only the mandatory
        // requirement is reported for it.
        match value.profile.finalizer {
            RequirementPolicy::Disabled => RequirementSet::empty(),
            _ => RequirementSet::empty().with(Requirement::Finalizer),
        }
    } else {
        value.profile.active()
    };

    let mut traversal = Traversal {
        func,
        value,
        effects,
        config,
        blocks,
        seen_exits: FxHashSet::default(),
        outcome: TraversalOutcome::default(),
        active,
    };

    let state = PathState {
        satisfied: RequirementSet::empty(),
        bindings: BindingState::from_value(value),
        armed: Vec::new(),
        visits: FxHashMap::default(),
    };

    // Analysis begins at the statement after the creation call
    traversal.walk(origin, value.stmt_index + 1, state);
    traversal.outcome
}

impl<'a> Traversal<'a> {
    fn walk(&mut self, block: &'a Block, start_index: usize, mut state: PathState) {
        let visits = state.visits.entry(block.id.clone()).or_insert(0);
        if *visits >= MAX_BLOCK_VISITS {
            self.outcome.paths_explored += 1;
            return;
        }
        *visits += 1;

        for (stmt_index, stmt) in block.statements.iter().enumerate().skip(start_index) {
            match &stmt.kind {
                StmtKind::Call { call, .. } => {
                    // A qualifying call on a current alias satisfies its
                    // requirement for every continuation of this path.
                    if let Some(receiver) = &call.receiver {
                        if state.bindings.is_aliased(receiver) {
                            if let Some(requirement) =
                                self.value.vocabulary.requirement_for(&call.sig.method)
                            {
                                state.satisfied.insert(requirement);
                            }
                        }
                    }
                    self.apply_bindings(&mut state, &stmt.kind);
                }
                StmtKind::Assign { .. } => {
                    self.apply_bindings(&mut state, &stmt.kind);
                }
                StmtKind::Defer { .. } => {
                    for effect in self.effects.at(&block.id, stmt_index) {
                        if !state.bindings.is_aliased(&effect.variable) {
                            continue;
                        }
                        if let Some(requirement) =
                            self.value.vocabulary.requirement_for(&effect.method)
                        {
                            state.armed.push(ArmedEffect {
                                variable: effect.variable.clone(),
                                requirement,
                                coverage: effect.coverage,
                            });
                        }
                    }
                }
                StmtKind::Return { error } => {
                    self.record_exit(&state, &block.id, stmt_index, stmt.span, error.is_error());
                    self.outcome.paths_explored += 1;
                    return;
                }
                StmtKind::Branch { .. } | StmtKind::Other => {}
            }

            if state.bindings.exempt {
                // Ownership left this function; nothing further to check
                self.outcome.paths_explored += 1;
                return;
            }
        }

        if block.successors.is_empty() {
            let location = block
                .statements
                .last()
                .map(|s| s.span)
                .unwrap_or_else(SourceSpan::zero);
            self.record_exit(&state, &block.id, block.statements.len(), location, false);
            self.outcome.paths_explored += 1;
            return;
        }

        if self.fully_covered(&state) {
            // No reachable exit can produce a violation on this path
            self.outcome.paths_explored += 1;
            return;
        }

        for succ_id in &block.successors {
            if let Some(succ) = self.blocks.get(succ_id.as_str()).copied() {
                self.walk(succ, 0, state.clone());
            }
        }
    }

    fn apply_bindings(&self, state: &mut PathState, kind: &StmtKind) {
        let delta = state.bindings.apply(kind, self.config);
        if !delta.dropped.is_empty() {
            // A rebound variable's by-reference captures now see the new
            // value; pending effects no longer cover the old one.
            state
                .armed
                .retain(|effect| !delta.dropped.contains(&effect.variable));
        }
    }

    /// Inline satisfaction plus Always-covered deferred effects already
    /// cover every requirement that could ever apply
    fn fully_covered(&self, state: &PathState) -> bool {
        let mut covered = state.satisfied;
        for effect in &state.armed {
            if effect.coverage == DeferCoverage::Always {
                covered.insert(effect.requirement);
            }
        }
        covered.contains_all(self.active)
    }

    fn record_exit(
        &mut self,
        state: &PathState,
        block_id: &str,
        stmt_index: usize,
        location: SourceSpan,
        is_error_exit: bool,
    ) {
        if state.bindings.exempt {
            return;
        }
        // Exits past the end of the binding's declaring scope are not
        // anchors for this value (the variable no longer exists there).
        if let Some(scope) = self.value.scope {
            if !scope.contains_line(location.start_line) {
                return;
            }
        }

        let mut satisfied = state.satisfied;
        for effect in &state.armed {
            match effect.coverage {
                DeferCoverage::Always => satisfied.insert(effect.requirement),
                DeferCoverage::OnErrorOnly => {
                    // Correlated with the error test: covers the
                    // conditional requirements exactly where they apply,
                    // never the finalizer.
                    if is_error_exit && effect.requirement != Requirement::Finalizer {
                        satisfied.insert(effect.requirement);
                    }
                }
                DeferCoverage::Partial => {}
            }
        }

        let mut applicable = applicable_at_exit(&self.value.profile, is_error_exit);
        if self.value.unassigned {
            let mut narrowed = RequirementSet::empty();
            if applicable.contains(Requirement::Finalizer) {
                narrowed.insert(Requirement::Finalizer);
            }
            applicable = narrowed;
        }

        for requirement in applicable.iter() {
            if satisfied.contains(requirement) {
                continue;
            }
            let key = (block_id.to_string(), stmt_index, requirement);
            if self.seen_exits.insert(key) {
                self.outcome.violations.push(ExitViolation {
                    requirement,
                    block_id: block_id.to_string(),
                    stmt_index,
                    location,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::lifecycle::domain::{MethodVocabulary, RequirementProfile};
    use crate::shared::models::{
        BindTarget, CallExpr, CallSig, DeferBody, ReturnError, Stmt,
    };

    fn span_value() -> TrackedValue {
        TrackedValue::new(
            "entry",
            0,
            SourceSpan::line(1),
            RequirementProfile::default(),
            MethodVocabulary::default(),
        )
        .with_alias("span")
    }

    fn method_call(receiver: &str, method: &str, line: u32) -> Stmt {
        Stmt::call(
            CallExpr::new(CallSig::new("", "", method)).with_receiver(receiver),
            vec![],
            SourceSpan::line(line),
        )
    }

    fn creation_stmt(line: u32) -> Stmt {
        Stmt::call(
            CallExpr::new(CallSig::new("go.opentelemetry.io/otel", "Tracer", "Start")),
            vec![
                BindTarget::Var("ctx".to_string()),
                BindTarget::Var("span".to_string()),
            ],
            SourceSpan::line(line),
        )
    }

    fn run(func: &FuncGraph, value: &TrackedValue) -> TraversalOutcome {
        let config = CheckConfig::new();
        let effects = DeferEffects::build(func, &config);
        traverse(func, value, &effects, &config)
    }

    #[test]
    fn test_inline_end_on_single_path_is_clean() {
        let func = FuncGraph::new("f").with_block(
            Block::new("entry")
                .with_stmt(creation_stmt(1))
                .with_stmt(method_call("span", "End", 2))
                .with_stmt(Stmt::ret(ReturnError::NoErrorSlot, SourceSpan::line(3))),
        );
        let outcome = run(&func, &span_value());
        assert!(outcome.violations.is_empty());
    }

    #[test]
    fn test_missing_end_reported_at_exit() {
        let func = FuncGraph::new("f").with_block(
            Block::new("entry")
                .with_stmt(creation_stmt(1))
                .with_stmt(Stmt::ret(ReturnError::NoErrorSlot, SourceSpan::line(3))),
        );
        let outcome = run(&func, &span_value());
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].requirement, Requirement::Finalizer);
        assert_eq!(outcome.violations[0].location, SourceSpan::line(3));
    }

    #[test]
    fn test_branch_with_one_missing_side() {
        // entry -> (then | else); then calls End, else does not
        let mut func = FuncGraph::new("f")
            .with_block(Block::new("entry").with_stmt(creation_stmt(1)))
            .with_block(
                Block::new("then")
                    .with_stmt(method_call("span", "End", 3))
                    .with_stmt(Stmt::ret(ReturnError::NoErrorSlot, SourceSpan::line(4))),
            )
            .with_block(
                Block::new("else")
                    .with_stmt(Stmt::ret(ReturnError::NoErrorSlot, SourceSpan::line(6))),
            );
        func.add_edge("entry", "then");
        func.add_edge("entry", "else");

        let outcome = run(&func, &span_value());
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].block_id, "else");
    }

    #[test]
    fn test_deferred_end_covers_all_exits() {
        let mut func = FuncGraph::new("f")
            .with_block(
                Block::new("entry").with_stmt(creation_stmt(1)).with_stmt(Stmt::defer(
                    DeferBody::Call(
                        CallExpr::new(CallSig::new("", "", "End")).with_receiver("span"),
                    ),
                    SourceSpan::line(2),
                )),
            )
            .with_block(
                Block::new("a").with_stmt(Stmt::ret(ReturnError::NilLiteral, SourceSpan::line(4))),
            )
            .with_block(
                Block::new("b").with_stmt(Stmt::ret(ReturnError::NilLiteral, SourceSpan::line(6))),
            );
        func.add_edge("entry", "a");
        func.add_edge("entry", "b");

        let outcome = run(&func, &span_value());
        assert!(outcome.violations.is_empty());
    }

    #[test]
    fn test_conditional_requirements_fire_only_on_error_exits() {
        let mut func = FuncGraph::new("f")
            .with_block(
                Block::new("entry").with_stmt(creation_stmt(1)).with_stmt(Stmt::defer(
                    DeferBody::Call(
                        CallExpr::new(CallSig::new("", "", "End")).with_receiver("span"),
                    ),
                    SourceSpan::line(2),
                )),
            )
            .with_block(
                Block::new("errexit")
                    .with_stmt(Stmt::ret(ReturnError::NonNil, SourceSpan::line(5))),
            )
            .with_block(
                Block::new("okexit")
                    .with_stmt(Stmt::ret(ReturnError::NilLiteral, SourceSpan::line(7))),
            );
        func.add_edge("entry", "errexit");
        func.add_edge("entry", "okexit");

        let outcome = run(&func, &span_value());
        let reqs: Vec<_> = outcome
            .violations
            .iter()
            .map(|v| (v.block_id.as_str(), v.requirement))
            .collect();
        assert!(reqs.contains(&("errexit", Requirement::StatusSetter)));
        assert!(reqs.contains(&("errexit", Requirement::ErrorRecorder)));
        assert_eq!(outcome.violations.len(), 2);
    }

    #[test]
    fn test_loop_back_edge_terminates_and_sees_loop_body_call() {
        // entry -> loop -> loop (back edge), loop -> exit
        let mut func = FuncGraph::new("f")
            .with_block(Block::new("entry").with_stmt(creation_stmt(1)))
            .with_block(Block::new("loop").with_stmt(method_call("span", "End", 3)))
            .with_block(
                Block::new("exit")
                    .with_stmt(Stmt::ret(ReturnError::NoErrorSlot, SourceSpan::line(5))),
            );
        func.add_edge("entry", "loop");
        func.add_edge("loop", "loop");
        func.add_edge("loop", "exit");

        let outcome = run(&func, &span_value());
        assert!(outcome.violations.is_empty());
        assert!(outcome.paths_explored > 0);
    }

    #[test]
    fn test_reassignment_ends_tracking_of_old_value() {
        // span is rebound to a fresh creation; End afterwards binds the new
        // value, so the old value's finalizer stays unsatisfied.
        let func = FuncGraph::new("f").with_block(
            Block::new("entry")
                .with_stmt(creation_stmt(1))
                .with_stmt(creation_stmt(2))
                .with_stmt(method_call("span", "End", 3))
                .with_stmt(Stmt::ret(ReturnError::NoErrorSlot, SourceSpan::line(4))),
        );
        let outcome = run(&func, &span_value());
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].requirement, Requirement::Finalizer);
    }

    #[test]
    fn test_rebinding_cancels_armed_deferred_effect() {
        // defer registered for the old value's variable, then the variable
        // is rebound; the by-reference capture sees the new value only.
        let func = FuncGraph::new("f").with_block(
            Block::new("entry")
                .with_stmt(creation_stmt(1))
                .with_stmt(Stmt::defer(
                    DeferBody::Call(
                        CallExpr::new(CallSig::new("", "", "End")).with_receiver("span"),
                    ),
                    SourceSpan::line(2),
                ))
                .with_stmt(creation_stmt(3))
                .with_stmt(Stmt::ret(ReturnError::NoErrorSlot, SourceSpan::line(4))),
        );
        let outcome = run(&func, &span_value());
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].requirement, Requirement::Finalizer);
    }

    #[test]
    fn test_implicit_fallthrough_exit() {
        let func = FuncGraph::new("f")
            .with_block(Block::new("entry").with_stmt(creation_stmt(1)));
        let outcome = run(&func, &span_value());
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].stmt_index, 1);
    }

    #[test]
    fn test_exit_deduplicated_across_paths() {
        // Two paths converge on one exit; one detail per exit, not per path
        let mut func = FuncGraph::new("f")
            .with_block(Block::new("entry").with_stmt(creation_stmt(1)))
            .with_block(Block::new("a"))
            .with_block(Block::new("b"))
            .with_block(
                Block::new("exit")
                    .with_stmt(Stmt::ret(ReturnError::NoErrorSlot, SourceSpan::line(9))),
            );
        func.add_edge("entry", "a");
        func.add_edge("entry", "b");
        func.add_edge("a", "exit");
        func.add_edge("b", "exit");

        let outcome = run(&func, &span_value());
        assert_eq!(outcome.violations.len(), 1);
    }

    #[test]
    fn test_exit_outside_binding_scope_not_anchored() {
        // Creation scoped to a conditional block; the error return after
        // the block closes cannot be an anchor for this value.
        let mut func = FuncGraph::new("f")
            .with_block(
                Block::new("ifblk")
                    .with_stmt(creation_stmt(3))
                    .with_stmt(method_call("span", "End", 4)),
            )
            .with_block(
                Block::new("exit").with_stmt(Stmt::ret(ReturnError::NonNil, SourceSpan::line(7))),
            );
        func.add_edge("ifblk", "exit");

        let value = TrackedValue::new(
            "ifblk",
            0,
            SourceSpan::line(3),
            RequirementProfile::default(),
            MethodVocabulary::default(),
        )
        .with_alias("span")
        .with_scope(SourceSpan::new(2, 0, 5, 0));

        let outcome = run(&func, &value);
        assert!(outcome.violations.is_empty());
    }

    #[test]
    fn test_exit_inside_binding_scope_still_anchored() {
        let func = FuncGraph::new("f").with_block(
            Block::new("ifblk")
                .with_stmt(creation_stmt(3))
                .with_stmt(Stmt::ret(ReturnError::NonNil, SourceSpan::line(4))),
        );
        let value = TrackedValue::new(
            "ifblk",
            0,
            SourceSpan::line(3),
            RequirementProfile::default(),
            MethodVocabulary::default(),
        )
        .with_alias("span")
        .with_scope(SourceSpan::new(2, 0, 5, 0));

        let outcome = run(&func, &value);
        assert_eq!(outcome.violations.len(), 3);
    }

    #[test]
    fn test_unassigned_value_reports_finalizer_only() {
        let value = TrackedValue::new(
            "entry",
            0,
            SourceSpan::line(1),
            RequirementProfile::default(),
            MethodVocabulary::default(),
        )
        .unassigned();

        let func = FuncGraph::new("f").with_block(
            Block::new("entry")
                .with_stmt(creation_stmt(1))
                .with_stmt(Stmt::ret(ReturnError::NonNil, SourceSpan::line(2))),
        );
        let outcome = run(&func, &value);
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].requirement, Requirement::Finalizer);
    }
}
